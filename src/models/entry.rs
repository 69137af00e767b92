//! Catalog entry model

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::utils::errors::ValidationError;

/// A game in the user's collection
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Entry {
    pub id: i64,
    pub title: String,
    pub category: Category,
    pub min_players: i32,
    pub max_players: i32,
    /// Stored for display only; always re-derived from `last_played`.
    #[serde(default)]
    pub status: EntryStatus,
    pub last_played: Option<DateTime<Utc>>,
}

impl Entry {
    pub fn is_single_player(&self) -> bool {
        self.max_players == 1
    }

    pub fn is_multiplayer(&self) -> bool {
        self.max_players > 1
    }

    /// Check whether a group of `players` fits this game
    pub fn fits_players(&self, players: i32) -> bool {
        self.min_players <= players && players <= self.max_players
    }
}

/// Fields of an entry a store needs to create it
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewEntry {
    pub title: String,
    pub category: Category,
    pub min_players: i32,
    pub max_players: i32,
}

impl NewEntry {
    /// Materialize the entry under an id assigned by the store
    pub fn into_entry(self, id: i64) -> Entry {
        Entry {
            id,
            title: self.title,
            category: self.category,
            min_players: self.min_players,
            max_players: self.max_players,
            status: EntryStatus::Active,
            last_played: None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EntryStatus {
    #[default]
    Active,
    Inactive,
}

impl EntryStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            EntryStatus::Active => "active",
            EntryStatus::Inactive => "inactive",
        }
    }
}

impl FromStr for EntryStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "active" => Ok(EntryStatus::Active),
            "inactive" => Ok(EntryStatus::Inactive),
            other => Err(format!("unknown status: {}", other)),
        }
    }
}

impl fmt::Display for EntryStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The fixed set of game genres
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Category {
    Strategy,
    #[serde(rename = "RPG")]
    Rpg,
    Shooter,
    Adventure,
    Simulation,
    Racing,
    Puzzle,
    Sports,
    Fighting,
    Horror,
    Sandbox,
    Survival,
}

impl Category {
    pub const ALL: [Category; 12] = [
        Category::Strategy,
        Category::Rpg,
        Category::Shooter,
        Category::Adventure,
        Category::Simulation,
        Category::Racing,
        Category::Puzzle,
        Category::Sports,
        Category::Fighting,
        Category::Horror,
        Category::Sandbox,
        Category::Survival,
    ];

    /// Canonical name, used in storage and selection tokens
    pub fn as_str(&self) -> &'static str {
        match self {
            Category::Strategy => "Strategy",
            Category::Rpg => "RPG",
            Category::Shooter => "Shooter",
            Category::Adventure => "Adventure",
            Category::Simulation => "Simulation",
            Category::Racing => "Racing",
            Category::Puzzle => "Puzzle",
            Category::Sports => "Sports",
            Category::Fighting => "Fighting",
            Category::Horror => "Horror",
            Category::Sandbox => "Sandbox",
            Category::Survival => "Survival",
        }
    }

    /// Russian genre name, accepted as an alias when parsing
    fn russian_name(&self) -> &'static str {
        match self {
            Category::Strategy => "Стратегия",
            Category::Rpg => "Ролевая игра",
            Category::Shooter => "Шутер",
            Category::Adventure => "Приключения",
            Category::Simulation => "Симулятор",
            Category::Racing => "Гонки",
            Category::Puzzle => "Головоломка",
            Category::Sports => "Спортивная",
            Category::Fighting => "Файтинг",
            Category::Horror => "Хоррор",
            Category::Sandbox => "Песочница",
            Category::Survival => "Выживание",
        }
    }

    /// Case-insensitive substring match against both names
    pub fn matches_query(&self, query_lower: &str) -> bool {
        self.as_str().to_lowercase().contains(query_lower)
            || self.russian_name().to_lowercase().contains(query_lower)
    }
}

impl FromStr for Category {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let needle = s.trim().to_lowercase();
        Category::ALL
            .iter()
            .copied()
            .find(|c| c.as_str().to_lowercase() == needle || c.russian_name().to_lowercase() == needle)
            .ok_or_else(|| ValidationError::UnknownCategory(s.trim().to_string()))
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Entry fields a user may change through the edit flow
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EditableField {
    Title,
    Category,
    MinPlayers,
    MaxPlayers,
}

impl EditableField {
    pub const ALL: [EditableField; 4] = [
        EditableField::Title,
        EditableField::Category,
        EditableField::MinPlayers,
        EditableField::MaxPlayers,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            EditableField::Title => "title",
            EditableField::Category => "category",
            EditableField::MinPlayers => "min_players",
            EditableField::MaxPlayers => "max_players",
        }
    }

    /// Render the field's current value on `entry`
    pub fn current_value(&self, entry: &Entry) -> String {
        match self {
            EditableField::Title => entry.title.clone(),
            EditableField::Category => entry.category.to_string(),
            EditableField::MinPlayers => entry.min_players.to_string(),
            EditableField::MaxPlayers => entry.max_players.to_string(),
        }
    }
}

impl FromStr for EditableField {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        EditableField::ALL
            .iter()
            .copied()
            .find(|f| f.as_str() == s)
            .ok_or_else(|| ValidationError::UnknownField(s.to_string()))
    }
}

impl fmt::Display for EditableField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
