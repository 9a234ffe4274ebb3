//! Registers
//!
//! One module per register. Each defines the entity, its form and schema, its filter criteria,
//! its export projections and its headline statistics.

use std::str::FromStr;

use jiff::civil::Date;

use crate::validation::ValidationErrors;

pub mod bidders;
pub mod bidding_processes;
pub mod direct_contracts;
pub mod penalties;

/// Blank notes are stored as absent.
pub(crate) fn notes(text: &str) -> Option<String> {
    let trimmed = text.trim();

    (!trimmed.is_empty()).then(|| trimmed.to_string())
}

/// Parse an ISO date field, attributing failures to `field`.
pub(crate) fn parse_date(
    field: &'static str,
    text: &str,
    message: &str,
) -> Result<Date, ValidationErrors> {
    text.parse()
        .map_err(|_err| ValidationErrors::single(field, message))
}

/// Parse a labelled select field, attributing failures to `field`.
pub(crate) fn parse_label<T: FromStr>(
    field: &'static str,
    text: &str,
    message: &str,
) -> Result<T, ValidationErrors> {
    text.parse()
        .map_err(|_err| ValidationErrors::single(field, message))
}

#[cfg(test)]
mod tests {
    use jiff::civil::date;
    use testresult::TestResult;

    use super::*;

    #[test]
    fn blank_notes_are_absent() {
        assert_eq!(notes(""), None);
        assert_eq!(notes("   "), None);
        assert_eq!(notes(" Fase de lances "), Some("Fase de lances".to_string()));
    }

    #[test]
    fn dates_parse_from_iso() -> TestResult {
        assert_eq!(parse_date("start", "2025-05-01", "Data inválida")?, date(2025, 5, 1));

        let errors = parse_date("start", "01/05/2025", "Data inválida")
            .err()
            .unwrap_or_default();

        assert_eq!(errors.get("start"), Some("Data inválida"));

        Ok(())
    }
}
