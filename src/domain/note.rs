//! Domain type representing a single recorded expense.

use chrono::{NaiveDate, NaiveTime};
use serde::{Deserialize, Serialize};

use crate::domain::common::*;

/// Date format used for the `date` field (`YYYY-MM-DD`).
pub const DATE_FORMAT: &str = "%Y-%m-%d";
/// Time format used for the `time` field (`HH:mm`, 24-hour).
pub const TIME_FORMAT: &str = "%H:%M";

/// A dated money entry. Field names match the persisted JSON document.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct MoneyNote {
    pub id: String,
    pub amount: f64,
    pub description: String,
    pub date: String,
    pub time: String,
    pub category: String,
}

impl MoneyNote {
    pub fn new(
        id: impl Into<String>,
        amount: f64,
        date: NaiveDate,
        time: NaiveTime,
        category: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            amount,
            description: String::new(),
            date: date.format(DATE_FORMAT).to_string(),
            time: time.format(TIME_FORMAT).to_string(),
            category: category.into(),
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    /// Hour component of `time`, read from the text before the first `:`.
    pub fn hour(&self) -> Option<u32> {
        self.time.split(':').next()?.trim().parse().ok()
    }

    pub fn parsed_date(&self) -> Option<NaiveDate> {
        NaiveDate::parse_from_str(&self.date, DATE_FORMAT).ok()
    }
}

impl Identifiable for MoneyNote {
    fn id(&self) -> &str {
        &self.id
    }
}

impl Displayable for MoneyNote {
    fn display_label(&self) -> String {
        if self.description.is_empty() {
            format!("{} {}", self.date, self.time)
        } else {
            format!("{} {} {}", self.date, self.time, self.description)
        }
    }
}

/// Field values collected from the user before an identifier is assigned.
#[derive(Debug, Clone, PartialEq)]
pub struct MoneyNoteDraft {
    pub amount: f64,
    pub description: String,
    pub date: NaiveDate,
    pub time: NaiveTime,
    pub category: String,
}

impl MoneyNoteDraft {
    pub fn into_note(self, id: impl Into<String>) -> MoneyNote {
        MoneyNote::new(id, self.amount, self.date, self.time, self.category)
            .with_description(self.description)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn note_at(time: &str) -> MoneyNote {
        MoneyNote {
            id: "1".into(),
            amount: 10.0,
            description: String::new(),
            date: "2024-05-01".into(),
            time: time.into(),
            category: "food".into(),
        }
    }

    #[test]
    fn hour_reads_leading_component() {
        assert_eq!(note_at("07:30").hour(), Some(7));
        assert_eq!(note_at("23:59").hour(), Some(23));
        assert_eq!(note_at("garbage").hour(), None);
    }

    #[test]
    fn serializes_with_original_field_names() {
        let note = MoneyNote::new(
            "1714550400000",
            100.0,
            NaiveDate::from_ymd_opt(2024, 5, 1).unwrap(),
            NaiveTime::from_hms_opt(7, 5, 0).unwrap(),
            "food",
        )
        .with_description("Pho");
        let json = serde_json::to_value(&note).unwrap();
        assert_eq!(json["id"], "1714550400000");
        assert_eq!(json["date"], "2024-05-01");
        assert_eq!(json["time"], "07:05");
        assert_eq!(json["category"], "food");
        assert_eq!(json["description"], "Pho");
    }

    #[test]
    fn deserializes_integer_amounts() {
        let raw = r#"{"id":"1","amount":25000,"description":"","date":"2024-05-02","time":"12:00","category":"x"}"#;
        let note: MoneyNote = serde_json::from_str(raw).unwrap();
        assert_eq!(note.amount, 25000.0);
    }
}
