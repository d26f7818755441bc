use crate::cli::core::{CommandError, CommandResult, ShellContext};
use crate::cli::io;
use crate::cli::output::{self, bar, render_table, TableColumn};
use crate::cli::registry::CommandEntry;
use crate::core::format::format_percentage;
use crate::core::services::{CategoryService, StatsService};
use crate::core::time::YearMonth;

const USAGE: &str = "stats [YYYY-MM|current|prev|next]";
const BAR_WIDTH: usize = 20;

pub(crate) fn definitions() -> Vec<CommandEntry> {
    vec![CommandEntry::new(
        "stats",
        "Show monthly totals by category",
        USAGE,
        cmd_stats,
    )
    .with_actions(&["current", "prev", "next"])]
}

fn cmd_stats(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    match args {
        [] => {}
        [target] => context.selected_month = resolve_month(context, target)?,
        _ => return Err(CommandError::usage(USAGE)),
    }
    render_stats(context);
    Ok(())
}

fn resolve_month(context: &ShellContext, target: &str) -> Result<YearMonth, CommandError> {
    let month = match target.to_ascii_lowercase().as_str() {
        "current" | "this" => YearMonth::of(context.clock().today()),
        "prev" => context.selected_month.prev(),
        "next" => context.selected_month.next(),
        other => other.parse()?,
    };
    Ok(month)
}

fn render_stats(context: &ShellContext) {
    let month = context.selected_month;
    let stats = StatsService::monthly_stats(context.store(), month);
    let categories = CategoryService::list(context.store());

    output::section(format!("Monthly Statistics - {}", month.label()));
    io::print_info(format!(
        "Total: {}",
        context.money(stats.total)
    ));
    if stats.by_category.is_empty() {
        io::print_info("No expenses recorded this month.");
        return;
    }

    let rows: Vec<Vec<String>> = stats
        .by_category
        .iter()
        .map(|entry| {
            let label = CategoryService::label(&categories, &entry.category_id);
            let share = stats.percentage_of(entry.amount);
            vec![
                output::tinted(&label.name, &label.color),
                context.money(entry.amount),
                format_percentage(share),
                bar(share, BAR_WIDTH),
            ]
        })
        .collect();
    let table = render_table(
        &[
            TableColumn::left("Category"),
            TableColumn::right("Amount"),
            TableColumn::right("Share"),
            TableColumn::left(""),
        ],
        &rows,
    );
    io::print_info(table);
}
