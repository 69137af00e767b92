//! Input validators
//!
//! Stateless checks for everything a user types or picks. Each failure is a
//! typed error so the conversation layer can map it to a precise message.

use std::sync::LazyLock;

use chrono::{Local, NaiveDate, NaiveTime};
use regex::Regex;

use crate::models::Category;
use crate::utils::errors::{GameKeeperError, ParseError, Result, ValidationError};
use crate::utils::helpers::{DATE_FORMAT, TIME_FORMAT};

pub const TITLE_MIN_CHARS: usize = 2;
pub const TITLE_MAX_CHARS: usize = 100;
pub const MIN_PLAYERS: i32 = 1;
pub const MAX_PLAYERS: i32 = 16;

/// Two-digit day and month, four-digit year
static DATE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[0-9]{2}\.[0-9]{2}\.[0-9]{4}$").expect("date pattern compiles"));

/// 24-hour clock with leading zeros
static TIME_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^([01][0-9]|2[0-3]):[0-5][0-9]$").expect("time pattern compiles"));

/// Title length in characters must be within [2, 100]
pub fn valid_title(title: &str) -> std::result::Result<(), ValidationError> {
    let actual = title.trim().chars().count();
    if (TITLE_MIN_CHARS..=TITLE_MAX_CHARS).contains(&actual) {
        Ok(())
    } else {
        Err(ValidationError::TitleLength {
            min: TITLE_MIN_CHARS,
            max: TITLE_MAX_CHARS,
            actual,
        })
    }
}

/// Case-insensitive membership in the category set
pub fn valid_category(input: &str) -> std::result::Result<Category, ValidationError> {
    input.parse()
}

pub fn valid_min_players(min: i32) -> std::result::Result<(), ValidationError> {
    if (MIN_PLAYERS..=MAX_PLAYERS).contains(&min) {
        Ok(())
    } else {
        Err(ValidationError::MinPlayersRange(min))
    }
}

pub fn valid_max_players(min: i32, max: i32) -> std::result::Result<(), ValidationError> {
    if !(MIN_PLAYERS..=MAX_PLAYERS).contains(&max) {
        return Err(ValidationError::MaxPlayersRange(max));
    }
    if max < min {
        return Err(ValidationError::MaxBelowMin { min, max });
    }
    Ok(())
}

/// Parse a player count typed by the user
pub fn parse_player_count(input: &str) -> std::result::Result<i32, ParseError> {
    input
        .trim()
        .parse::<i32>()
        .map_err(|_| ParseError::Number(input.trim().to_string()))
}

/// Strict DD.MM.YYYY parsing
pub fn parse_date(input: &str) -> std::result::Result<NaiveDate, ParseError> {
    let input = input.trim();
    if !DATE_RE.is_match(input) {
        return Err(ParseError::Date(input.to_string()));
    }
    NaiveDate::parse_from_str(input, DATE_FORMAT).map_err(|_| ParseError::Date(input.to_string()))
}

/// Parse a date that must not be before today (server local time)
pub fn valid_date(input: &str) -> Result<NaiveDate> {
    valid_date_on(input, Local::now().date_naive())
}

pub fn valid_date_on(input: &str, today: NaiveDate) -> Result<NaiveDate> {
    let date = parse_date(input)?;
    if date < today {
        return Err(GameKeeperError::PastDate);
    }
    Ok(date)
}

/// Strict 24-hour HH:MM parsing
pub fn parse_time(input: &str) -> std::result::Result<NaiveTime, ParseError> {
    let input = input.trim();
    if !TIME_RE.is_match(input) {
        return Err(ParseError::Time(input.to_string()));
    }
    NaiveTime::parse_from_str(input, TIME_FORMAT).map_err(|_| ParseError::Time(input.to_string()))
}
