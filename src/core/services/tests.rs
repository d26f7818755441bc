use chrono::{NaiveDate, NaiveTime, TimeZone, Utc};

use super::*;
use crate::core::errors::MoneyNoteError;
use crate::core::time::{Clock, FixedClock, YearMonth};
use crate::domain::{CategoryIcon, CustomCategory, MoneyNote, MoneyNoteDraft};
use crate::storage::{KeyValueStore, MemoryStore, CATEGORIES_KEY, MONEY_NOTES_KEY};

fn note(id: &str, date: &str, amount: f64, category: &str) -> MoneyNote {
    MoneyNote {
        id: id.into(),
        amount,
        description: String::new(),
        date: date.into(),
        time: "09:00".into(),
        category: category.into(),
    }
}

fn clock() -> FixedClock {
    FixedClock(Utc.with_ymd_and_hms(2024, 5, 2, 8, 30, 0).unwrap())
}

fn may() -> YearMonth {
    "2024-05".parse().unwrap()
}

#[test]
fn saving_same_note_twice_keeps_one_entry() {
    let store = MemoryStore::new();
    let entry = note("1", "2024-05-01", 100.0, "food");
    NoteService::save(&store, entry.clone()).expect("first save");
    NoteService::save(&store, entry.clone()).expect("second save");
    assert_eq!(NoteService::list(&store), vec![entry]);
}

#[test]
fn save_updates_existing_note_in_place() {
    let store = MemoryStore::new();
    NoteService::save(&store, note("1", "2024-05-01", 100.0, "food")).unwrap();
    NoteService::save(&store, note("2", "2024-05-01", 20.0, "food")).unwrap();
    NoteService::save(&store, note("1", "2024-05-01", 42.0, "transport")).unwrap();

    let notes = NoteService::list(&store);
    assert_eq!(notes.len(), 2);
    assert_eq!(notes[0].id, "1");
    assert_eq!(notes[0].amount, 42.0);
    assert_eq!(notes[0].category, "transport");
}

#[test]
fn delete_removes_note_and_ignores_unknown_ids() {
    let store = MemoryStore::new();
    NoteService::save(&store, note("1", "2024-05-01", 100.0, "food")).unwrap();
    NoteService::save(&store, note("2", "2024-05-02", 50.0, "food")).unwrap();

    NoteService::delete(&store, "1").unwrap();
    NoteService::delete(&store, "missing").unwrap();

    let ids: Vec<_> = NoteService::list(&store).into_iter().map(|n| n.id).collect();
    assert_eq!(ids, vec!["2".to_string()]);
}

#[test]
fn list_by_date_filters_exactly_in_order() {
    let store = MemoryStore::new();
    NoteService::save(&store, note("a", "2024-05-02", 1.0, "x")).unwrap();
    NoteService::save(&store, note("b", "2024-05-01", 2.0, "x")).unwrap();
    NoteService::save(&store, note("c", "2024-05-02", 3.0, "x")).unwrap();

    let ids: Vec<_> = NoteService::list_by_date(&store, "2024-05-02")
        .into_iter()
        .map(|n| n.id)
        .collect();
    assert_eq!(ids, vec!["a".to_string(), "c".to_string()]);
}

#[test]
fn corrupt_notes_read_as_empty() {
    let store = MemoryStore::new().with_entry(MONEY_NOTES_KEY, "[{\"id\":");
    assert!(NoteService::list(&store).is_empty());
    assert!(NoteService::list_by_date(&store, "2024-05-01").is_empty());
}

#[test]
fn save_rejects_negative_amounts_and_bad_dates() {
    let store = MemoryStore::new();
    let err = NoteService::save(&store, note("1", "2024-05-01", -5.0, "food"))
        .expect_err("negative amount");
    assert!(matches!(err, MoneyNoteError::InvalidInput(_)));

    let err = NoteService::save(&store, note("1", "2024-02-30", 5.0, "food"))
        .expect_err("invalid date");
    assert!(matches!(err, MoneyNoteError::InvalidInput(_)));
    assert!(store.get(MONEY_NOTES_KEY).unwrap().is_none());
}

#[test]
fn create_assigns_time_based_unique_ids() {
    let store = MemoryStore::new();
    let draft = MoneyNoteDraft {
        amount: 30_000.0,
        description: "Coffee".into(),
        date: NaiveDate::from_ymd_opt(2024, 5, 2).unwrap(),
        time: NaiveTime::from_hms_opt(8, 15, 0).unwrap(),
        category: "drinks".into(),
    };
    let first = NoteService::create(&store, &clock(), draft.clone()).expect("create");
    let second = NoteService::create(&store, &clock(), draft).expect("create again");

    let millis = clock().0.timestamp_millis();
    assert_eq!(first.id, millis.to_string());
    assert_eq!(second.id, (millis + 1).to_string());
    assert_eq!(first.time, "08:15");
    assert_eq!(NoteService::list(&store).len(), 2);
}

#[test]
fn update_replaces_fields_but_keeps_id_and_date() {
    let store = MemoryStore::new();
    NoteService::save(&store, note("1", "2024-05-01", 100.0, "food")).unwrap();
    let updated = NoteService::update(&store, "1", 80.0, "transport", "19:45", "Taxi")
        .expect("update");
    assert_eq!(updated.date, "2024-05-01");
    assert_eq!(updated.time, "19:45");
    assert_eq!(NoteService::find(&store, "1"), Some(updated));

    let err = NoteService::update(&store, "nope", 1.0, "x", "10:00", "")
        .expect_err("unknown id");
    assert!(matches!(err, MoneyNoteError::NoteNotFound(_)));
}

#[test]
fn monthly_stats_match_reference_example() {
    let notes = vec![
        note("1", "2024-05-01", 100.0, "food"),
        note("2", "2024-05-02", 50.0, "food"),
        note("3", "2024-05-02", 25.0, "transport"),
        note("4", "2024-06-01", 999.0, "food"),
    ];
    let stats = StatsService::compute_monthly_stats(&notes, may());
    assert_eq!(stats.total, 175.0);
    assert_eq!(
        stats.by_category,
        vec![
            CategoryTotal {
                category_id: "food".into(),
                amount: 150.0
            },
            CategoryTotal {
                category_id: "transport".into(),
                amount: 25.0
            },
        ]
    );
    let food = stats.percentage_of(150.0);
    let transport = stats.percentage_of(25.0);
    assert!((food - 85.714).abs() < 0.01, "food percentage {food}");
    assert!((transport - 14.286).abs() < 0.01, "transport percentage {transport}");
}

#[test]
fn category_order_follows_day_order() {
    let notes = vec![
        note("late", "2024-05-20", 10.0, "transport"),
        note("early", "2024-05-03", 10.0, "food"),
    ];
    let stats = StatsService::compute_monthly_stats(&notes, may());
    let order: Vec<_> = stats
        .by_category
        .iter()
        .map(|entry| entry.category_id.as_str())
        .collect();
    assert_eq!(order, vec!["food", "transport"]);
}

#[test]
fn zero_total_gives_zero_percentage() {
    let notes = vec![note("1", "2024-05-01", 0.0, "food")];
    let stats = StatsService::compute_monthly_stats(&notes, may());
    assert_eq!(stats.total, 0.0);
    assert_eq!(stats.percentage_of(0.0), 0.0);
    assert_eq!(StatsService::percentage(0.0, 0.0), 0.0);
}

#[test]
fn monthly_stats_read_from_store() {
    let store = MemoryStore::new();
    NoteService::save(&store, note("1", "2024-05-31", 12.0, "food")).unwrap();
    NoteService::save(&store, note("2", "2024-04-30", 7.0, "food")).unwrap();
    let stats = StatsService::monthly_stats(&store, may());
    assert_eq!(stats.total, 12.0);
    assert_eq!(stats.amount_for("food"), Some(12.0));
    assert_eq!(stats.amount_for("other"), None);
}

#[test]
fn time_range_grouping_preserves_order() {
    let mut notes = Vec::new();
    for (id, time) in [
        ("a", "07:30"),
        ("b", "12:00"),
        ("c", "23:59"),
        ("d", "00:15"),
        ("e", "11:59"),
    ] {
        let mut entry = note(id, "2024-05-01", 1.0, "x");
        entry.time = time.into();
        notes.push(entry);
    }
    let groups = StatsService::group_by_time_range(&notes);
    fn ids(bucket: &[MoneyNote]) -> Vec<String> {
        bucket.iter().map(|n| n.id.clone()).collect()
    }
    assert_eq!(ids(&groups.morning), vec!["a", "e"]);
    assert_eq!(ids(&groups.afternoon), vec!["b"]);
    assert_eq!(ids(&groups.evening), vec!["c", "d"]);
    assert_eq!(groups.sections().count(), 3);
    assert_eq!(StatsService::daily_total(&notes), 5.0);
}

#[test]
fn empty_time_ranges_are_skipped() {
    let notes = vec![note("a", "2024-05-01", 1.0, "x")];
    let groups = StatsService::group_by_time_range(&notes);
    let sections: Vec<_> = groups.sections().map(|(range, _)| range.label()).collect();
    assert_eq!(sections, vec!["Morning"]);
}

#[test]
fn deleting_category_leaves_notes_dangling() {
    let store = MemoryStore::new();
    let food = CategoryService::create(&store, &clock(), "Food", "#ff0000", CategoryIcon::Utensils)
        .expect("create category");
    NoteService::save(&store, note("1", "2024-05-01", 10.0, &food.id)).unwrap();

    CategoryService::delete(&store, &food.id).unwrap();

    let notes = NoteService::list(&store);
    assert_eq!(notes[0].category, food.id);
    let label = CategoryService::label(&CategoryService::list(&store), &notes[0].category);
    assert_eq!(label.name, "Uncategorized");
}

#[test]
fn category_edit_requires_existing_id() {
    let store = MemoryStore::new();
    let err = CategoryService::edit(&store, "x", "Name", "#fff", CategoryIcon::Film)
        .expect_err("missing category");
    assert!(matches!(err, MoneyNoteError::CategoryNotFound(_)));

    let film = CategoryService::create(&store, &clock(), "Movies", "#fff", CategoryIcon::Film)
        .unwrap();
    let edited = CategoryService::edit(&store, &film.id, "Cinema", "#000", CategoryIcon::Game)
        .expect("edit");
    assert_eq!(CategoryService::list(&store), vec![edited]);
}

#[test]
fn category_validation_rejects_bad_colors() {
    let store = MemoryStore::new();
    let err = CategoryService::create(&store, &clock(), "Food", "red", CategoryIcon::Utensils)
        .expect_err("bad color");
    assert!(matches!(err, MoneyNoteError::InvalidInput(_)));
    assert!(CategoryService::list(&store).is_empty());
}

#[test]
fn export_document_has_original_shape() {
    let store = MemoryStore::new();
    CategoryService::save(
        &store,
        CustomCategory::new("1", "Food", "#ff0000", CategoryIcon::Utensils),
    )
    .unwrap();
    let export = SettingsService::export(&store, &clock());
    let json = serde_json::to_value(&export).unwrap();
    assert_eq!(json["exportDate"], "2024-05-02T08:30:00.000Z");
    assert_eq!(json["categories"][0]["icon"], "Utensils");
    assert_eq!(
        SettingsService::export_file_name(clock().today()),
        "money-note-settings-2024-05-02.json"
    );
}

#[test]
fn import_replaces_categories_and_keeps_notes() {
    let store = MemoryStore::new();
    CategoryService::save(
        &store,
        CustomCategory::new("old", "Old", "#123456", CategoryIcon::Fuel),
    )
    .unwrap();
    NoteService::save(&store, note("n1", "2024-05-01", 10.0, "old")).unwrap();

    let raw = r##"{
        "categories": [
            {"id": "1", "name": "Food", "color": "#ff0000", "icon": "Utensils"},
            {"id": "2", "name": "Train", "color": "#00ff00", "icon": "Train"}
        ],
        "exportDate": "2024-05-02T08:30:00.000Z"
    }"##;
    let outcome = SettingsService::import_str(&store, raw).expect("import");
    assert_eq!(outcome, ImportOutcome::Replaced(2));

    let names: Vec<_> = CategoryService::list(&store)
        .into_iter()
        .map(|c| c.name)
        .collect();
    assert_eq!(names, vec!["Food", "Train"]);
    assert_eq!(NoteService::list(&store)[0].category, "old");
}

#[test]
fn invalid_import_leaves_categories_untouched() {
    let store = MemoryStore::new();
    let existing = CustomCategory::new("old", "Old", "#123456", CategoryIcon::Fuel);
    CategoryService::save(&store, existing.clone()).unwrap();

    let malformed_entry = r##"{"categories": [
        {"id": "1", "name": "Food", "color": "#ff0000", "icon": "Utensils"},
        {"id": "2", "name": "Broken"}
    ]}"##;
    let err = SettingsService::import_str(&store, malformed_entry).expect_err("invalid entry");
    assert!(matches!(err, MoneyNoteError::InvalidSettings(_)));

    let err = SettingsService::import_str(&store, "not json").expect_err("invalid json");
    assert!(err.to_string().starts_with("Invalid settings file"));

    let duplicate = r##"{"categories": [
        {"id": "1", "name": "A", "color": "#ff0000", "icon": "Film"},
        {"id": "1", "name": "B", "color": "#ff0000", "icon": "Film"}
    ]}"##;
    assert!(SettingsService::import_str(&store, duplicate).is_err());

    assert_eq!(CategoryService::list(&store), vec![existing]);
}

#[test]
fn exported_unknown_icon_imports_back_as_default() {
    let store = MemoryStore::new();
    store
        .set(
            CATEGORIES_KEY,
            r##"[{"id":"1","name":"Food","color":"#ff0000","icon":"Rocket"}]"##,
        )
        .unwrap();
    assert_eq!(CategoryService::list(&store).len(), 1);

    let exported = serde_json::to_string(&SettingsService::export(&store, &clock())).unwrap();
    let outcome = SettingsService::import_str(&store, &exported).expect("round trip");
    assert_eq!(outcome, ImportOutcome::Replaced(1));

    let food = CategoryService::list(&store).remove(0);
    assert_eq!(food.icon, "ShoppingBag");
    assert_eq!(food.icon(), CategoryIcon::ShoppingBag);
}

#[test]
fn imported_icon_names_are_stored_canonically() {
    let store = MemoryStore::new();
    let raw = r##"{"categories": [
        {"id": "1", "name": "Cafe", "color": "#6b4f2a", "icon": "coffee"}
    ]}"##;
    SettingsService::import_str(&store, raw).expect("import");
    assert_eq!(CategoryService::list(&store)[0].icon, "Coffee");
}

#[test]
fn import_without_categories_array_changes_nothing() {
    let store = MemoryStore::new();
    let existing = CustomCategory::new("old", "Old", "#123456", CategoryIcon::Fuel);
    CategoryService::save(&store, existing.clone()).unwrap();

    let outcome = SettingsService::import_str(&store, r#"{"categories": "nope"}"#).unwrap();
    assert_eq!(outcome, ImportOutcome::NoCategories);
    let outcome = SettingsService::import_str(&store, r#"{}"#).unwrap();
    assert_eq!(outcome, ImportOutcome::NoCategories);
    assert_eq!(CategoryService::list(&store), vec![existing]);
    assert!(store.get(CATEGORIES_KEY).unwrap().is_some());
}
