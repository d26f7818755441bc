/// Digit separators for one locale.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NumberStyle {
    pub decimal_separator: char,
    pub grouping_separator: char,
}

impl Default for NumberStyle {
    fn default() -> Self {
        Self {
            decimal_separator: '.',
            grouping_separator: ',',
        }
    }
}

impl NumberStyle {
    /// Picks separators from a language tag such as `vi-VN` or `de`.
    /// Unrecognized tags use the `en-US` style.
    pub fn for_locale(tag: &str) -> Self {
        let language = tag
            .trim()
            .split(['-', '_'])
            .next()
            .unwrap_or_default()
            .to_ascii_lowercase();
        match language.as_str() {
            "vi" | "de" | "es" | "it" | "pt" | "nl" | "id" | "tr" | "da" => Self {
                decimal_separator: ',',
                grouping_separator: '.',
            },
            "fr" | "ru" | "pl" | "cs" | "sv" | "nb" | "fi" | "uk" => Self {
                decimal_separator: ',',
                grouping_separator: ' ',
            },
            _ => Self::default(),
        }
    }
}

/// Formats an amount with up to three fraction digits, trailing zeros dropped
/// (`25000` -> `25,000`, `1234.5` -> `1,234.5` in the default style).
pub fn format_number(amount: f64, style: NumberStyle) -> String {
    if !amount.is_finite() {
        return "0".into();
    }
    let negative = amount < 0.0;
    let fixed = format!("{:.3}", amount.abs());
    let (whole, fraction) = fixed.split_once('.').unwrap_or((fixed.as_str(), ""));

    let mut grouped = String::with_capacity(whole.len() + whole.len() / 3);
    for (index, digit) in whole.chars().enumerate() {
        if index > 0 && (whole.len() - index) % 3 == 0 {
            grouped.push(style.grouping_separator);
        }
        grouped.push(digit);
    }

    let fraction = fraction.trim_end_matches('0');
    let mut out = String::new();
    if negative && (grouped != "0" || !fraction.is_empty()) {
        out.push('-');
    }
    out.push_str(&grouped);
    if !fraction.is_empty() {
        out.push(style.decimal_separator);
        out.push_str(fraction);
    }
    out
}

/// Amount in the separators of `locale`, followed by the currency label.
pub fn format_amount(amount: f64, currency: &str, locale: &str) -> String {
    let number = format_number(amount, NumberStyle::for_locale(locale));
    if currency.trim().is_empty() {
        number
    } else {
        format!("{} {}", number, currency.trim())
    }
}

/// One decimal place, as shown next to category bars.
pub fn format_percentage(value: f64) -> String {
    format!("{:.1}%", value)
}
