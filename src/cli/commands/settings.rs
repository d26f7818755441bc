use std::path::PathBuf;

use crate::cli::core::{CommandError, CommandResult, ShellContext};
use crate::cli::io;
use crate::cli::registry::CommandEntry;
use crate::core::services::{ImportOutcome, SettingsService};

const USAGE: &str = "settings export [directory]
settings import <file>";
const IMPORT_USAGE: &str = "settings import <file>";

pub(crate) fn definitions() -> Vec<CommandEntry> {
    vec![CommandEntry::new(
        "settings",
        "Export or import categories as a settings file",
        USAGE,
        cmd_settings,
    )
    .with_actions(&["export", "import"])]
}

fn cmd_settings(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    match args {
        ["export"] => export(context, PathBuf::from(".")),
        ["export", dir] => export(context, PathBuf::from(dir)),
        ["import", file] => import(context, PathBuf::from(file)),
        ["import", ..] => Err(CommandError::usage(IMPORT_USAGE)),
        _ => Err(CommandError::usage(USAGE)),
    }
}

fn export(context: &ShellContext, dir: PathBuf) -> CommandResult {
    let path = SettingsService::export_to_dir(context.store(), context.clock(), &dir)?;
    io::print_success(format!("Settings exported to {}", path.display()));
    Ok(())
}

fn import(context: &ShellContext, file: PathBuf) -> CommandResult {
    if context.is_interactive() {
        let prompt = format!(
            "Replace all categories with the ones in {}?",
            file.display()
        );
        if !io::confirm_action(&context.theme, &prompt, false)? {
            io::print_info("Import cancelled.");
            return Ok(());
        }
    }

    match SettingsService::import_file(context.store(), &file)? {
        ImportOutcome::Replaced(count) => {
            io::print_success(format!("Settings imported successfully ({} categories).", count))
        }
        ImportOutcome::NoCategories => {
            io::print_warning("The file has no categories list; nothing changed.")
        }
    }
    Ok(())
}
