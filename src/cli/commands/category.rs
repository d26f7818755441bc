use crate::cli::core::{CommandError, CommandResult, ShellContext};
use crate::cli::io;
use crate::cli::output::{self, render_table, TableColumn};
use crate::cli::registry::CommandEntry;
use crate::core::errors::MoneyNoteError;
use crate::core::services::{CategoryService, NoteService};
use crate::domain::category::{is_hex_color, FALLBACK_CATEGORY_COLOR, FALLBACK_CATEGORY_NAME};
use crate::domain::{CategoryIcon, CustomCategory};

const USAGE: &str = "category list
category icons
category add <name> <#color> <icon>
category edit <id> <name> <#color> <icon>
category delete <id>";
const ADD_USAGE: &str = "category add <name> <#color> <icon>";
const EDIT_USAGE: &str = "category edit <id> <name> <#color> <icon>";
const DELETE_USAGE: &str = "category delete <id>";

pub(crate) fn definitions() -> Vec<CommandEntry> {
    vec![CommandEntry::new(
        "category",
        "Manage custom categories",
        USAGE,
        cmd_category,
    )
    .with_actions(&["list", "icons", "add", "edit", "delete"])]
}

fn cmd_category(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let Some((action, rest)) = args.split_first() else {
        return list_categories(context);
    };
    match action.to_ascii_lowercase().as_str() {
        "list" | "ls" => list_categories(context),
        "icons" => list_icons(),
        "add" | "new" => add_category(context, rest),
        "edit" => edit_category(context, rest),
        "delete" | "rm" => delete_category(context, rest),
        other => Err(CommandError::InvalidArguments(format!(
            "unknown category action `{}` (expected list, icons, add, edit or delete)",
            other
        ))),
    }
}

fn list_categories(context: &ShellContext) -> CommandResult {
    let categories = context.categories();
    output::section("Categories");
    if categories.is_empty() {
        io::print_info("No categories yet. Add one with `category add`.");
        return Ok(());
    }
    let rows: Vec<Vec<String>> = categories
        .iter()
        .map(|category| {
            vec![
                category.id.clone(),
                output::tinted(&category.name, &category.color),
                category.color.clone(),
                category.icon().to_string(),
            ]
        })
        .collect();
    let table = render_table(
        &[
            TableColumn::left("ID"),
            TableColumn::left("Name"),
            TableColumn::left("Color"),
            TableColumn::left("Icon"),
        ],
        &rows,
    );
    io::print_info(table);
    Ok(())
}

fn list_icons() -> CommandResult {
    output::section("Icons");
    for icon in CategoryIcon::ALL {
        let marker = if icon == CategoryIcon::default() {
            " (default)"
        } else {
            ""
        };
        io::print_info(format!("  {}{}", icon, marker));
    }
    Ok(())
}

fn add_category(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let (name, color, icon) = match args {
        [] if context.is_interactive() => category_wizard(context, None)?,
        [name, color, icon] => (name.to_string(), color.to_string(), parse_icon(icon)?),
        _ => return Err(CommandError::usage(ADD_USAGE)),
    };
    let category = CategoryService::create(context.store(), context.clock(), &name, &color, icon)?;
    io::print_success(format!(
        "Created category {} (id {}).",
        output::tinted(&category.name, &category.color),
        category.id
    ));
    Ok(())
}

fn edit_category(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let Some((id, rest)) = args.split_first() else {
        return Err(CommandError::usage(EDIT_USAGE));
    };
    let existing = CategoryService::find(context.store(), id)
        .ok_or_else(|| MoneyNoteError::CategoryNotFound(id.to_string()))?;

    let (name, color, icon) = match rest {
        [] if context.is_interactive() => category_wizard(context, Some(&existing))?,
        [name, color, icon] => (name.to_string(), color.to_string(), parse_icon(icon)?),
        _ => return Err(CommandError::usage(EDIT_USAGE)),
    };
    let category = CategoryService::edit(context.store(), &existing.id, &name, &color, icon)?;
    io::print_success(format!(
        "Updated category {}.",
        output::tinted(&category.name, &category.color)
    ));
    Ok(())
}

fn delete_category(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let [id] = args else {
        return Err(CommandError::usage(DELETE_USAGE));
    };
    let category = CategoryService::find(context.store(), id)
        .ok_or_else(|| MoneyNoteError::CategoryNotFound(id.to_string()))?;
    let referencing = NoteService::list(context.store())
        .iter()
        .filter(|note| note.category == category.id)
        .count();

    if context.is_interactive() {
        let prompt = format!("Delete category `{}`?", category.name);
        if !io::confirm_action(&context.theme, &prompt, false)? {
            io::print_info("Kept the category.");
            return Ok(());
        }
    }

    CategoryService::delete(context.store(), &category.id)?;
    io::print_success(format!("Deleted category {}.", category.name));
    if referencing > 0 {
        io::print_warning(format!(
            "{} note(s) still reference it and will show as {}.",
            referencing, FALLBACK_CATEGORY_NAME
        ));
    }
    Ok(())
}

fn parse_icon(value: &str) -> Result<CategoryIcon, CommandError> {
    value.parse().map_err(|err: String| {
        CommandError::InvalidArguments(format!("{} (see `category icons`)", err))
    })
}

fn category_wizard(
    context: &ShellContext,
    existing: Option<&CustomCategory>,
) -> Result<(String, String, CategoryIcon), CommandError> {
    let name = loop {
        let raw = io::prompt_text(
            &context.theme,
            "Name",
            existing.map(|category| category.name.as_str()),
            false,
        )?;
        if raw.trim().is_empty() {
            io::print_warning("Name cannot be empty.");
        } else {
            break raw.trim().to_string();
        }
    };

    let initial_color = existing
        .map(|category| category.color.as_str())
        .unwrap_or(FALLBACK_CATEGORY_COLOR);
    let color = loop {
        let raw = io::prompt_text(&context.theme, "Color (#rrggbb)", Some(initial_color), false)?;
        if is_hex_color(raw.trim()) {
            break raw.trim().to_string();
        }
        io::print_warning(format!("`{}` is not a hex color such as #ff8800.", raw));
    };

    let icons: Vec<String> = CategoryIcon::ALL.iter().map(ToString::to_string).collect();
    let default = existing
        .and_then(|category| CategoryIcon::ALL.iter().position(|icon| *icon == category.icon()))
        .unwrap_or(0);
    let index = io::select_index(&context.theme, "Icon", &icons, default)?;

    Ok((name, color, CategoryIcon::ALL[index]))
}

#[cfg(test)]
mod tests {
    use crate::cli::core::test_support::{run, script_context};
    use crate::core::services::{CategoryService, NoteService};
    use crate::domain::CategoryIcon;

    #[test]
    fn add_edit_delete_round() {
        let (mut context, _guard) = script_context();
        run(&mut context, &["category add \"Street food\" #f80 hamburger"]);
        let created = CategoryService::list(context.store()).remove(0);
        assert_eq!(created.name, "Street food");
        assert_eq!(created.icon(), CategoryIcon::Hamburger);
        assert_eq!(created.icon, "Hamburger");

        run(
            &mut context,
            &[&format!("category edit {} Snacks #00ff00 Coffee", created.id)],
        );
        let edited = CategoryService::find(context.store(), &created.id).expect("category");
        assert_eq!(edited.name, "Snacks");
        assert_eq!(edited.color, "#00ff00");
        assert_eq!(edited.icon(), CategoryIcon::Coffee);

        run(&mut context, &[&format!("category delete {}", created.id)]);
        assert!(CategoryService::list(context.store()).is_empty());
    }

    #[test]
    fn invalid_fields_are_rejected() {
        let (mut context, _guard) = script_context();
        assert!(context.process_line("category add Food red Utensils").is_err());
        assert!(context.process_line("category add Food #ff0000 Rocket").is_err());
        assert!(context.process_line("category add Food").is_err());
        assert!(context.process_line("category edit 404 Food #ff0000 Coffee").is_err());
        assert!(CategoryService::list(context.store()).is_empty());
    }

    #[test]
    fn deleting_keeps_referencing_notes() {
        let (mut context, _guard) = script_context();
        run(
            &mut context,
            &["category add Food #ff0000 Utensils", "note add 100 Food"],
        );
        let id = CategoryService::list(context.store()).remove(0).id;
        run(&mut context, &[&format!("category delete {}", id)]);

        let notes = NoteService::list(context.store());
        assert_eq!(notes.len(), 1);
        assert_eq!(notes[0].category, id);
    }

    #[test]
    fn listing_commands_succeed() {
        let (mut context, _guard) = script_context();
        run(&mut context, &["category", "category icons", "category list"]);
    }
}
