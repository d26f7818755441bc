use crate::core::time::{TimeRange, YearMonth};
use crate::domain::MoneyNote;
use crate::storage::KeyValueStore;

use super::note_service::notes_in_month;
use super::NoteService;

/// Sum of amounts for a single category id.
#[derive(Debug, Clone, PartialEq)]
pub struct CategoryTotal {
    pub category_id: String,
    pub amount: f64,
}

/// Monthly total plus per-category sums in first-encountered order.
#[derive(Debug, Clone, PartialEq)]
pub struct MonthlyStats {
    pub month: YearMonth,
    pub total: f64,
    pub by_category: Vec<CategoryTotal>,
}

impl MonthlyStats {
    pub fn amount_for(&self, category_id: &str) -> Option<f64> {
        self.by_category
            .iter()
            .find(|entry| entry.category_id == category_id)
            .map(|entry| entry.amount)
    }

    pub fn percentage_of(&self, amount: f64) -> f64 {
        StatsService::percentage(amount, self.total)
    }
}

/// Notes of one day split by part of day, each bucket in input order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TimeRangeGroups {
    pub morning: Vec<MoneyNote>,
    pub afternoon: Vec<MoneyNote>,
    pub evening: Vec<MoneyNote>,
}

impl TimeRangeGroups {
    pub fn get(&self, range: TimeRange) -> &[MoneyNote] {
        match range {
            TimeRange::Morning => &self.morning,
            TimeRange::Afternoon => &self.afternoon,
            TimeRange::Evening => &self.evening,
        }
    }

    /// Non-empty buckets in display order.
    pub fn sections(&self) -> impl Iterator<Item = (TimeRange, &[MoneyNote])> {
        TimeRange::ALL
            .into_iter()
            .map(move |range| (range, self.get(range)))
            .filter(|(_, notes)| !notes.is_empty())
    }
}

pub struct StatsService;

impl StatsService {
    /// Aggregates the notes dated within `month`; other notes are ignored.
    pub fn compute_monthly_stats(notes: &[MoneyNote], month: YearMonth) -> MonthlyStats {
        let mut total = 0.0;
        let mut by_category: Vec<CategoryTotal> = Vec::new();
        for note in notes_in_month(notes, month) {
            total += note.amount;
            match by_category
                .iter_mut()
                .find(|entry| entry.category_id == note.category)
            {
                Some(entry) => entry.amount += note.amount,
                None => by_category.push(CategoryTotal {
                    category_id: note.category,
                    amount: note.amount,
                }),
            }
        }
        MonthlyStats {
            month,
            total,
            by_category,
        }
    }

    pub fn monthly_stats(store: &dyn KeyValueStore, month: YearMonth) -> MonthlyStats {
        Self::compute_monthly_stats(&NoteService::list(store), month)
    }

    /// `amount / total * 100`, or `0` when the total is zero.
    pub fn percentage(amount: f64, total: f64) -> f64 {
        if total == 0.0 {
            return 0.0;
        }
        let value = amount / total * 100.0;
        if value.is_finite() {
            value
        } else {
            0.0
        }
    }

    pub fn group_by_time_range(notes: &[MoneyNote]) -> TimeRangeGroups {
        let mut groups = TimeRangeGroups::default();
        for note in notes {
            let bucket = match TimeRange::from_hour(note.hour()) {
                TimeRange::Morning => &mut groups.morning,
                TimeRange::Afternoon => &mut groups.afternoon,
                TimeRange::Evening => &mut groups.evening,
            };
            bucket.push(note.clone());
        }
        groups
    }

    pub fn daily_total(notes: &[MoneyNote]) -> f64 {
        notes.iter().map(|note| note.amount).sum()
    }
}
