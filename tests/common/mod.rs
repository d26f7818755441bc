#![allow(dead_code)]

use chrono::{TimeZone, Utc};
use money_note::{core::time::FixedClock, domain::MoneyNote, storage::JsonFileStore};
use tempfile::TempDir;

/// File-backed store rooted in a fresh temporary directory; keep the guard alive.
pub fn temp_store() -> (JsonFileStore, TempDir) {
    let temp = TempDir::new().expect("create temp dir");
    let store = JsonFileStore::new(temp.path().join("store")).expect("create file store");
    (store, temp)
}

pub fn clock_at(year: i32, month: u32, day: u32, hour: u32, minute: u32) -> FixedClock {
    FixedClock(
        Utc.with_ymd_and_hms(year, month, day, hour, minute, 0)
            .single()
            .expect("valid timestamp"),
    )
}

pub fn note(id: &str, date: &str, time: &str, amount: f64, category: &str) -> MoneyNote {
    MoneyNote {
        id: id.into(),
        amount,
        description: String::new(),
        date: date.into(),
        time: time.into(),
        category: category.into(),
    }
}
