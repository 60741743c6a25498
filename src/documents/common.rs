use chrono::{Datelike, NaiveDate};

use super::schema::LineItem;

/// Russian month names in genitive case, as they appear in document dates.
const MONTHS_GENITIVE: [&str; 12] = [
    "января",
    "февраля",
    "марта",
    "апреля",
    "мая",
    "июня",
    "июля",
    "августа",
    "сентября",
    "октября",
    "ноября",
    "декабря",
];

/// Format a monetary amount the Russian way: two decimals, space-grouped
/// thousands, decimal comma. `1234567.5` becomes `"1 234 567,50"`.
pub fn format_number(value: f64) -> String {
    let rendered = format!("{:.2}", value);
    let (int_part, frac_part) = rendered.split_once('.').unwrap_or((rendered.as_str(), "00"));
    let (sign, digits) = match int_part.strip_prefix('-') {
        Some(rest) => ("-", rest),
        None => ("", int_part),
    };

    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (offset, ch) in digits.chars().enumerate() {
        if offset > 0 && (digits.len() - offset) % 3 == 0 {
            grouped.push(' ');
        }
        grouped.push(ch);
    }

    format!("{}{},{}", sign, grouped, frac_part)
}

/// Format a date for document text: `24 августа 2026 г.`
pub fn format_date(date: NaiveDate) -> String {
    let month = MONTHS_GENITIVE[(date.month0() as usize).min(MONTHS_GENITIVE.len() - 1)];
    format!("{} {} {} г.", date.day(), month, date.year())
}

/// VAT column label for a line item: `20%`, or `-` when the item carries no
/// positive VAT rate. Fractional rates are truncated for display.
pub fn vat_label(item: &LineItem) -> String {
    match item.vat_rate {
        Some(rate) if rate > 0.0 => format!("{}%", rate.trunc() as i64),
        _ => "-".to_string(),
    }
}

/// Treat `None` and empty strings alike, mirroring how absent requisites
/// arrive from upstream form fillers.
pub fn non_empty(value: &Option<String>) -> Option<&str> {
    value.as_deref().filter(|s| !s.is_empty())
}
