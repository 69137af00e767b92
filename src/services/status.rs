//! Entry status rule
//!
//! A game that has not been played for three calendar months is shown as
//! inactive. Status is never taken from storage; it is recomputed from the
//! last-played timestamp every time an entry is surfaced.

use chrono::{DateTime, Months, Utc};

use crate::models::{Entry, EntryStatus};

/// Months of disuse after which a game becomes inactive
pub const INACTIVITY_MONTHS: u32 = 3;

/// Derive the status of `entry` as of `now`
pub fn derive_status(entry: &Entry, now: DateTime<Utc>) -> EntryStatus {
    match entry.last_played {
        Some(last_played) if last_played < inactivity_cutoff(now) => EntryStatus::Inactive,
        _ => EntryStatus::Active,
    }
}

/// Recompute the status in place. Returns `true` if it changed.
pub fn refresh_status(entry: &mut Entry, now: DateTime<Utc>) -> bool {
    let status = derive_status(entry, now);
    let changed = entry.status != status;
    entry.status = status;
    changed
}

fn inactivity_cutoff(now: DateTime<Utc>) -> DateTime<Utc> {
    now.checked_sub_months(Months::new(INACTIVITY_MONTHS))
        .unwrap_or(DateTime::<Utc>::MIN_UTC)
}
