use crate::core::errors::MoneyNoteError;
use crate::core::time::{parse_date, parse_time, Clock, YearMonth};
use crate::domain::common::time_based_id;
use crate::domain::note::{DATE_FORMAT, TIME_FORMAT};
use crate::domain::{MoneyNote, MoneyNoteDraft};
use crate::storage::{Collection, KeyValueStore, MONEY_NOTES_KEY};

use super::ServiceResult;

pub struct NoteService;

impl NoteService {
    fn collection(store: &dyn KeyValueStore) -> Collection<'_, MoneyNote> {
        Collection::new(store, MONEY_NOTES_KEY)
    }

    /// All persisted notes in stored order; empty when nothing readable is stored.
    pub fn list(store: &dyn KeyValueStore) -> Vec<MoneyNote> {
        Self::collection(store).list()
    }

    pub fn find(store: &dyn KeyValueStore, id: &str) -> Option<MoneyNote> {
        Self::list(store).into_iter().find(|note| note.id == id)
    }

    /// Inserts the note, or replaces the stored note with the same id.
    pub fn save(store: &dyn KeyValueStore, note: MoneyNote) -> ServiceResult<()> {
        Self::validate(&note)?;
        tracing::debug!(id = %note.id, date = %note.date, "saving note");
        Self::collection(store).upsert(note)?;
        Ok(())
    }

    /// Removes every note with `id`. Unknown ids are a no-op.
    pub fn delete(store: &dyn KeyValueStore, id: &str) -> ServiceResult<()> {
        let removed = Self::collection(store).remove(id)?;
        tracing::debug!(id, removed, "deleted note");
        Ok(())
    }

    /// Notes whose `date` field equals `date` exactly, in stored order.
    pub fn list_by_date(store: &dyn KeyValueStore, date: &str) -> Vec<MoneyNote> {
        Self::list(store)
            .into_iter()
            .filter(|note| note.date == date)
            .collect()
    }

    /// Notes dated on any calendar day of `month`, ordered by day then stored order.
    pub fn list_by_month(store: &dyn KeyValueStore, month: YearMonth) -> Vec<MoneyNote> {
        notes_in_month(&Self::list(store), month)
    }

    /// Assigns a time-based id to the draft and persists it.
    pub fn create(
        store: &dyn KeyValueStore,
        clock: &dyn Clock,
        draft: MoneyNoteDraft,
    ) -> ServiceResult<MoneyNote> {
        let existing = Self::list(store);
        let id = time_based_id(clock.now().timestamp_millis(), |candidate| {
            existing.iter().any(|note| note.id == candidate)
        });
        let note = draft.into_note(id);
        Self::save(store, note.clone())?;
        tracing::info!(id = %note.id, amount = note.amount, "note created");
        Ok(note)
    }

    /// Replaces every field of an existing note except its id and date.
    pub fn update(
        store: &dyn KeyValueStore,
        id: &str,
        amount: f64,
        category: &str,
        time: &str,
        description: &str,
    ) -> ServiceResult<MoneyNote> {
        let mut note =
            Self::find(store, id).ok_or_else(|| MoneyNoteError::NoteNotFound(id.to_string()))?;
        note.amount = amount;
        note.category = category.to_string();
        note.time = parse_time(time)?.format(TIME_FORMAT).to_string();
        note.description = description.to_string();
        Self::save(store, note.clone())?;
        Ok(note)
    }

    fn validate(note: &MoneyNote) -> ServiceResult<()> {
        if note.id.trim().is_empty() {
            return Err(MoneyNoteError::InvalidInput("note id must not be empty".into()));
        }
        validate_amount(note.amount)?;
        parse_date(&note.date)?;
        parse_time(&note.time)?;
        Ok(())
    }
}

pub fn validate_amount(amount: f64) -> ServiceResult<()> {
    if !amount.is_finite() || amount < 0.0 {
        return Err(MoneyNoteError::InvalidInput(format!(
            "amount must be a non-negative number, got {}",
            amount
        )));
    }
    Ok(())
}

/// Visits the month day by day and collects the notes dated on each day.
pub(crate) fn notes_in_month(notes: &[MoneyNote], month: YearMonth) -> Vec<MoneyNote> {
    let mut selected = Vec::new();
    for day in month.days() {
        let key = day.format(DATE_FORMAT).to_string();
        selected.extend(notes.iter().filter(|note| note.date == key).cloned());
    }
    selected
}
