use chrono::NaiveDate;

use crate::cli::core::{CommandError, CommandResult, ShellContext};
use crate::cli::io;
use crate::cli::output::{self, render_table, TableColumn};
use crate::cli::registry::CommandEntry;
use crate::core::services::{CategoryService, NoteService, StatsService};
use crate::core::time::{format_day_label, next_day, parse_date, previous_day};
use crate::domain::note::DATE_FORMAT;
use crate::domain::{CustomCategory, MoneyNote};

const USAGE: &str = "day [YYYY-MM-DD|today|prev|next]";

pub(crate) fn definitions() -> Vec<CommandEntry> {
    vec![CommandEntry::new(
        "day",
        "Select a day and list its notes",
        USAGE,
        cmd_day,
    )
    .with_actions(&["today", "prev", "next"])]
}

fn cmd_day(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    if let Some(target) = args.first() {
        context.selected_date = resolve_day(context, target)?;
    }
    render_day(context);
    Ok(())
}

fn resolve_day(context: &ShellContext, target: &str) -> Result<NaiveDate, CommandError> {
    let date = match target.to_ascii_lowercase().as_str() {
        "today" => context.clock().today(),
        "prev" | "yesterday" => previous_day(context.selected_date),
        "next" | "tomorrow" => next_day(context.selected_date),
        other => parse_date(other)?,
    };
    Ok(date)
}

/// Prints the selected day's notes grouped by part of day, with the day total.
pub(crate) fn render_day(context: &ShellContext) {
    let date_key = context.selected_date.format(DATE_FORMAT).to_string();
    let notes = NoteService::list_by_date(context.store(), &date_key);
    let categories = CategoryService::list(context.store());

    output::section(format_day_label(context.selected_date));
    io::print_info(format!(
        "Total: {}",
        context.money(StatsService::daily_total(&notes))
    ));

    if notes.is_empty() {
        io::print_info("No notes for this day. Add one with `note add`.");
        return;
    }

    let groups = StatsService::group_by_time_range(&notes);
    for (range, notes) in groups.sections() {
        io::print_info("");
        io::print_info(format!("{} ({})", range, notes.len()));
        let rows: Vec<Vec<String>> = notes
            .iter()
            .map(|note| note_row(context, note, &categories))
            .collect();
        let table = render_table(
            &[
                TableColumn::left("ID"),
                TableColumn::left("Time"),
                TableColumn::left("Category"),
                TableColumn::right("Amount"),
                TableColumn::left("Description"),
            ],
            &rows,
        );
        for line in table.lines() {
            io::print_info(format!("  {}", line));
        }
    }
}

fn note_row(context: &ShellContext, note: &MoneyNote, categories: &[CustomCategory]) -> Vec<String> {
    let label = CategoryService::label(categories, &note.category);
    vec![
        note.id.clone(),
        note.time.clone(),
        output::tinted(&label.name, &label.color),
        context.money(note.amount),
        note.description.clone(),
    ]
}
