//! Localized cell formatting

use jiff::{
    Timestamp,
    civil::{Date, DateTime},
};

/// Placeholder for absent optional values.
pub const MISSING: &str = "N/A";

/// Maximum characters of long free text shown in a PDF cell.
pub const PDF_TEXT_BUDGET: usize = 30;

/// `dd/MM/yyyy`.
pub fn format_date(date: Date) -> String {
    date.strftime("%d/%m/%Y").to_string()
}

/// `dd/MM/yyyy` of a timestamp, in UTC.
pub fn format_timestamp_date(timestamp: Timestamp) -> String {
    timestamp.strftime("%d/%m/%Y").to_string()
}

/// `dd/MM/yyyy HH:mm`.
pub fn format_datetime(datetime: DateTime) -> String {
    datetime.strftime("%d/%m/%Y %H:%M").to_string()
}

/// `dd/MM/yyyy a dd/MM/yyyy`.
pub fn format_period(start: Date, end: Date) -> String {
    format!("{} a {}", format_date(start), format_date(end))
}

/// `dd-MM-yyyy`, as used in export file names.
pub fn format_file_date(date: Date) -> String {
    date.strftime("%d-%m-%Y").to_string()
}

/// The value, or [`MISSING`] when absent or blank.
pub fn or_missing(value: Option<&str>) -> String {
    match value {
        Some(value) if !value.trim().is_empty() => value.to_string(),
        _ => MISSING.to_string(),
    }
}

/// Cut `text` to `budget` characters, appending `...` when anything was dropped.
pub fn truncate(text: &str, budget: usize) -> String {
    if text.chars().count() <= budget {
        return text.to_string();
    }

    let mut truncated: String = text.chars().take(budget).collect();
    truncated.push_str("...");
    truncated
}
