use crate::cli::core::{CommandError, CommandResult, ShellContext};
use crate::cli::io;
use crate::cli::output;
use crate::cli::registry::CommandEntry;

const USAGE: &str = "config show
config set <currency|locale|color> <value>";

pub(crate) fn definitions() -> Vec<CommandEntry> {
    vec![CommandEntry::new(
        "config",
        "Show or change preferences",
        USAGE,
        cmd_config,
    )
    .with_actions(&["show", "set"])]
}

fn cmd_config(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    match args {
        [] | ["show"] => {
            show(context);
            Ok(())
        }
        ["set", key, value @ ..] if !value.is_empty() => {
            let applied = context.config.set_value(key, &value.join(" "))?;
            context.persist_config()?;
            io::print_success(format!("{} set to {}", key, applied));
            Ok(())
        }
        _ => Err(CommandError::usage(USAGE)),
    }
}

fn show(context: &ShellContext) {
    output::section("Configuration");
    io::print_info(format!("  currency : {}", context.config.currency));
    io::print_info(format!("  locale   : {}", context.config.locale));
    io::print_info(format!(
        "  color    : {}",
        if context.config.ui_color_enabled {
            "on"
        } else {
            "off"
        }
    ));
    io::print_info(format!(
        "  file     : {}",
        context.config_manager.path().display()
    ));
}

#[cfg(test)]
mod tests {
    use crate::cli::core::test_support::{run, script_context};

    #[test]
    fn set_persists_to_disk() {
        let (mut context, _guard) = script_context();
        run(&mut context, &["config set currency USD", "config set color off"]);
        assert_eq!(context.config.currency, "USD");
        assert!(!context.config.ui_color_enabled);

        let reloaded = context.config_manager.load().expect("load");
        assert_eq!(reloaded, context.config);
    }

    #[test]
    fn rejects_unknown_keys() {
        let (mut context, _guard) = script_context();
        assert!(context.process_line("config set theme dark").is_err());
        assert!(context.process_line("config set currency").is_err());
        run(&mut context, &["config", "config show"]);
    }
}
