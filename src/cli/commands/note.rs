use chrono::{NaiveTime, Timelike};

use crate::cli::commands::day::render_day;
use crate::cli::core::{parse_amount, CommandError, CommandResult, ShellContext};
use crate::cli::io;
use crate::cli::registry::CommandEntry;
use crate::core::errors::MoneyNoteError;
use crate::core::services::NoteService;
use crate::core::time::parse_time;
use crate::domain::note::TIME_FORMAT;
use crate::domain::{CategoryLabel, Displayable, MoneyNote, MoneyNoteDraft};

const USAGE: &str = "note add <amount> <category> [HH:MM] [description...]
note edit <id> <amount> <category> <HH:MM> [description...]
note delete <id>";
const ADD_USAGE: &str = "note add <amount> <category> [HH:MM] [description...]";
const EDIT_USAGE: &str = "note edit <id> <amount> <category> <HH:MM> [description...]";
const DELETE_USAGE: &str = "note delete <id>";

pub(crate) fn definitions() -> Vec<CommandEntry> {
    vec![CommandEntry::new(
        "note",
        "Add, edit or delete notes on the selected day",
        USAGE,
        cmd_note,
    )
    .with_actions(&["add", "edit", "delete"])]
}

fn cmd_note(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let Some((action, rest)) = args.split_first() else {
        return Err(CommandError::usage(USAGE));
    };
    match action.to_ascii_lowercase().as_str() {
        "add" | "new" => add_note(context, rest),
        "edit" => edit_note(context, rest),
        "delete" | "rm" => delete_note(context, rest),
        other => Err(CommandError::InvalidArguments(format!(
            "unknown note action `{}` (expected add, edit or delete)",
            other
        ))),
    }
}

fn add_note(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let draft = match args {
        [] if context.is_interactive() => note_wizard(context, None)?,
        [amount, category, rest @ ..] => {
            let amount = parse_amount(amount)?;
            let category = context.resolve_category(category)?;
            let (time, description) = match rest.split_first() {
                Some((first, tail)) => match parse_time(first) {
                    Ok(time) => (time, tail.join(" ")),
                    Err(_) => (current_time(context), rest.join(" ")),
                },
                None => (current_time(context), String::new()),
            };
            MoneyNoteDraft {
                amount,
                description,
                date: context.selected_date,
                time,
                category: category.id,
            }
        }
        _ => return Err(CommandError::usage(ADD_USAGE)),
    };

    let note = NoteService::create(context.store(), context.clock(), draft)?;
    io::print_success(format!(
        "Added {} at {} (id {}).",
        context.money(note.amount),
        note.time,
        note.id
    ));
    render_day(context);
    Ok(())
}

fn edit_note(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let Some((id, rest)) = args.split_first() else {
        return Err(CommandError::usage(EDIT_USAGE));
    };
    let existing = NoteService::find(context.store(), id)
        .ok_or_else(|| MoneyNoteError::NoteNotFound(id.to_string()))?;

    let (amount, category, time, description) = match rest {
        [] if context.is_interactive() => {
            let draft = note_wizard(context, Some(&existing))?;
            (
                draft.amount,
                draft.category,
                draft.time.format(TIME_FORMAT).to_string(),
                draft.description,
            )
        }
        [amount, category, time, description @ ..] => (
            parse_amount(amount)?,
            context.resolve_category(category)?.id,
            time.to_string(),
            description.join(" "),
        ),
        _ => return Err(CommandError::usage(EDIT_USAGE)),
    };

    let note = NoteService::update(
        context.store(),
        &existing.id,
        amount,
        &category,
        &time,
        &description,
    )?;
    io::print_success(format!("Updated note {}.", note.id));
    render_day(context);
    Ok(())
}

fn delete_note(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let [id] = args else {
        return Err(CommandError::usage(DELETE_USAGE));
    };
    let note = NoteService::find(context.store(), id)
        .ok_or_else(|| MoneyNoteError::NoteNotFound(id.to_string()))?;

    if context.is_interactive() {
        let prompt = format!(
            "Delete {} note ({})?",
            context.money(note.amount),
            note.display_label()
        );
        if !io::confirm_action(&context.theme, &prompt, false)? {
            io::print_info("Kept the note.");
            return Ok(());
        }
    }

    NoteService::delete(context.store(), &note.id)?;
    io::print_success(format!("Deleted note {}.", note.id));
    Ok(())
}

/// Local wall-clock time truncated to the minute.
fn current_time(context: &ShellContext) -> NaiveTime {
    let now = context.clock().now_local().time();
    NaiveTime::from_hms_opt(now.hour(), now.minute(), 0).unwrap_or(now)
}

/// Prompts for every note field; `existing` supplies the defaults when editing.
fn note_wizard(
    context: &ShellContext,
    existing: Option<&MoneyNote>,
) -> Result<MoneyNoteDraft, CommandError> {
    let categories = context.categories();
    if categories.is_empty() {
        return Err(CommandError::InvalidArguments(
            "no categories yet; create one with `category add` first".into(),
        ));
    }

    let initial_amount = existing.map(|note| note.amount.to_string());
    let amount = loop {
        let raw = io::prompt_text(&context.theme, "Amount", initial_amount.as_deref(), false)?;
        match parse_amount(&raw) {
            Ok(amount) => break amount,
            Err(err) => io::print_warning(err),
        }
    };

    let names: Vec<String> = categories
        .iter()
        .map(|category| category.display_label())
        .collect();
    let default = existing
        .and_then(|note| categories.iter().position(|c| c.id == note.category))
        .unwrap_or(0);
    if let Some(note) = existing {
        if !categories.iter().any(|c| c.id == note.category) {
            io::print_warning(format!(
                "Current category is {}; pick a replacement.",
                CategoryLabel::fallback().name
            ));
        }
    }
    let index = io::select_index(&context.theme, "Category", &names, default)?;
    let category = categories[index].id.clone();

    let initial_time = existing
        .map(|note| note.time.clone())
        .unwrap_or_else(|| current_time(context).format(TIME_FORMAT).to_string());
    let time = loop {
        let raw = io::prompt_text(&context.theme, "Time (HH:MM)", Some(&initial_time), false)?;
        match parse_time(&raw) {
            Ok(time) => break time,
            Err(err) => io::print_warning(err),
        }
    };

    let description = io::prompt_text(
        &context.theme,
        "Description",
        existing.map(|note| note.description.as_str()),
        true,
    )?;

    Ok(MoneyNoteDraft {
        amount,
        description: description.trim().to_string(),
        date: existing
            .and_then(MoneyNote::parsed_date)
            .unwrap_or(context.selected_date),
        time,
        category,
    })
}
