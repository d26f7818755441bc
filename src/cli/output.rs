use std::fmt;
use std::sync::{OnceLock, RwLock};

use colored::Colorize;

/// Message categories used by the CLI output helpers.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MessageKind {
    Info,
    Success,
    Warning,
    Error,
    Section,
}

#[derive(Clone, Copy, Debug)]
pub struct OutputPreferences {
    pub color_enabled: bool,
}

impl Default for OutputPreferences {
    fn default() -> Self {
        Self {
            color_enabled: true,
        }
    }
}

static PREFERENCES: OnceLock<RwLock<OutputPreferences>> = OnceLock::new();

pub fn set_preferences(prefs: OutputPreferences) {
    let lock = PREFERENCES.get_or_init(|| RwLock::new(OutputPreferences::default()));
    if let Ok(mut guard) = lock.write() {
        *guard = prefs;
    }
}

pub fn current_preferences() -> OutputPreferences {
    PREFERENCES
        .get_or_init(|| RwLock::new(OutputPreferences::default()))
        .read()
        .map(|guard| *guard)
        .unwrap_or_default()
}

fn label(kind: MessageKind) -> &'static str {
    match kind {
        MessageKind::Success => "[ok]",
        MessageKind::Warning => "[!]",
        MessageKind::Error => "[x]",
        MessageKind::Info | MessageKind::Section => "",
    }
}

pub(crate) fn apply_style(
    kind: MessageKind,
    message: impl fmt::Display,
    prefs: &OutputPreferences,
) -> String {
    let text = message.to_string();
    let base = match kind {
        MessageKind::Section => format!("=== {} ===", text.trim()),
        _ => match label(kind) {
            "" => text,
            icon => format!("{} {}", icon, text),
        },
    };

    if !prefs.color_enabled {
        return base;
    }

    match kind {
        MessageKind::Success => base.bright_green().to_string(),
        MessageKind::Warning => base.bright_yellow().to_string(),
        MessageKind::Error => base.bright_red().to_string(),
        MessageKind::Section => base.bold().to_string(),
        MessageKind::Info => base,
    }
}

pub fn print(kind: MessageKind, message: impl fmt::Display) {
    let formatted = apply_style(kind, message, &current_preferences());
    match kind {
        MessageKind::Section => println!("\n{}", formatted),
        _ => println!("{}", formatted),
    }
}

pub fn info(message: impl fmt::Display) {
    print(MessageKind::Info, message);
}

pub fn success(message: impl fmt::Display) {
    print(MessageKind::Success, message);
}

pub fn warning(message: impl fmt::Display) {
    print(MessageKind::Warning, message);
}

pub fn error(message: impl fmt::Display) {
    print(MessageKind::Error, message);
}

pub fn section(title: impl fmt::Display) {
    print(MessageKind::Section, title);
}

/// Renders `text` in the category's hex color when colors are enabled.
pub fn tinted(text: &str, hex: &str) -> String {
    if !current_preferences().color_enabled {
        return text.to_string();
    }
    match parse_hex(hex) {
        Some((r, g, b)) => text.truecolor(r, g, b).to_string(),
        None => text.to_string(),
    }
}

fn parse_hex(hex: &str) -> Option<(u8, u8, u8)> {
    let digits = hex.strip_prefix('#').filter(|digits| digits.is_ascii())?;
    let channel = |s: &str| u8::from_str_radix(s, 16).ok();
    match digits.len() {
        6 => Some((
            channel(&digits[0..2])?,
            channel(&digits[2..4])?,
            channel(&digits[4..6])?,
        )),
        3 => {
            let mut parts = digits.chars().map(|c| channel(&format!("{c}{c}")));
            Some((parts.next()??, parts.next()??, parts.next()??))
        }
        _ => None,
    }
}

/// Horizontal bar proportional to `percentage` (0..=100).
pub fn bar(percentage: f64, width: usize) -> String {
    let clamped = percentage.clamp(0.0, 100.0);
    let filled = ((clamped / 100.0) * width as f64).round() as usize;
    format!("{}{}", "#".repeat(filled), ".".repeat(width - filled.min(width)))
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Alignment {
    Left,
    Right,
}

pub struct TableColumn {
    pub header: &'static str,
    pub alignment: Alignment,
}

impl TableColumn {
    pub const fn left(header: &'static str) -> Self {
        Self {
            header,
            alignment: Alignment::Left,
        }
    }

    pub const fn right(header: &'static str) -> Self {
        Self {
            header,
            alignment: Alignment::Right,
        }
    }
}

/// Renders rows under a header line and a rule, padding cells to the widest value.
pub fn render_table(columns: &[TableColumn], rows: &[Vec<String>]) -> String {
    let widths: Vec<usize> = columns
        .iter()
        .enumerate()
        .map(|(idx, column)| {
            rows.iter()
                .filter_map(|row| row.get(idx))
                .map(|cell| visible_width(cell))
                .chain(std::iter::once(column.header.chars().count()))
                .max()
                .unwrap_or(0)
        })
        .collect();

    let render_row = |cells: Vec<&str>| -> String {
        cells
            .iter()
            .zip(columns)
            .zip(&widths)
            .map(|((cell, column), width)| {
                let gap = " ".repeat(width.saturating_sub(visible_width(cell)));
                match column.alignment {
                    Alignment::Left => format!("{}{}", cell, gap),
                    Alignment::Right => format!("{}{}", gap, cell),
                }
            })
            .collect::<Vec<_>>()
            .join("  ")
            .trim_end()
            .to_string()
    };

    let mut lines = Vec::with_capacity(rows.len() + 2);
    lines.push(render_row(columns.iter().map(|c| c.header).collect()));
    let rule_width = widths.iter().sum::<usize>() + 2 * widths.len().saturating_sub(1);
    lines.push("-".repeat(rule_width));
    for row in rows {
        let cells = (0..columns.len())
            .map(|idx| row.get(idx).map(String::as_str).unwrap_or(""))
            .collect();
        lines.push(render_row(cells));
    }
    lines.join("\n")
}

/// Character count ignoring ANSI escape sequences.
fn visible_width(text: &str) -> usize {
    let mut width = 0;
    let mut chars = text.chars();
    while let Some(ch) = chars.next() {
        if ch == '\u{1b}' {
            for next in chars.by_ref() {
                if next.is_ascii_alphabetic() {
                    break;
                }
            }
            continue;
        }
        width += 1;
    }
    width
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plain_style_keeps_labels() {
        let prefs = OutputPreferences {
            color_enabled: false,
        };
        assert_eq!(apply_style(MessageKind::Success, "saved", &prefs), "[ok] saved");
        assert_eq!(apply_style(MessageKind::Info, "hello", &prefs), "hello");
        assert_eq!(
            apply_style(MessageKind::Section, " Categories ", &prefs),
            "=== Categories ==="
        );
    }

    #[test]
    fn table_pads_columns() {
        let rendered = render_table(
            &[TableColumn::left("Name"), TableColumn::right("Amount")],
            &[
                vec!["Food".into(), "150".into()],
                vec!["Transport".into(), "25,000".into()],
            ],
        );
        let lines: Vec<_> = rendered.lines().collect();
        assert_eq!(lines[0], "Name       Amount");
        assert_eq!(lines[2], "Food          150");
        assert_eq!(lines[3], "Transport  25,000");
    }

    #[test]
    fn width_ignores_escape_codes() {
        assert_eq!(visible_width("\u{1b}[31mred\u{1b}[0m"), 3);
    }

    #[test]
    fn bar_fills_proportionally() {
        assert_eq!(bar(50.0, 10), "#####.....");
        assert_eq!(bar(150.0, 4), "####");
        assert_eq!(bar(0.0, 3), "...");
    }

    #[test]
    fn short_hex_expands() {
        assert_eq!(parse_hex("#f80"), Some((0xff, 0x88, 0x00)));
        assert_eq!(parse_hex("#00ff00"), Some((0, 255, 0)));
        assert_eq!(parse_hex("blue"), None);
    }
}
