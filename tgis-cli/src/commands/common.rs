//! Argument parsing helpers shared across commands.

use chrono::{NaiveDate, NaiveDateTime};

use crate::error::CliError;

const DATETIME_FORMATS: [&str; 3] = ["%Y-%m-%d %H:%M:%S", "%Y-%m-%dT%H:%M:%S", "%Y-%m-%d %H:%M"];

/// Parse `YYYY-MM-DD[ HH:MM[:SS]]`; a bare date means midnight.
pub fn parse_datetime(value: &str) -> Result<NaiveDateTime, CliError> {
    let value = value.trim();
    for format in DATETIME_FORMATS {
        if let Ok(parsed) = NaiveDateTime::parse_from_str(value, format) {
            return Ok(parsed);
        }
    }
    NaiveDate::parse_from_str(value, "%Y-%m-%d")
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .ok_or_else(|| {
            CliError::InvalidArgument(format!(
                "cannot parse {value:?} as a date, expected YYYY-MM-DD[ HH:MM:SS]"
            ))
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_dates_and_datetimes() {
        let midnight = parse_datetime("2001-01-01").unwrap();
        assert_eq!(midnight.to_string(), "2001-01-01 00:00:00");
        let full = parse_datetime("2001-01-01 12:30:15").unwrap();
        assert_eq!(full.to_string(), "2001-01-01 12:30:15");
        let iso = parse_datetime("2001-01-01T06:00:00").unwrap();
        assert_eq!(iso.to_string(), "2001-01-01 06:00:00");
        assert_eq!(
            parse_datetime("2001-01-01 06:00").unwrap().to_string(),
            "2001-01-01 06:00:00"
        );
    }

    #[test]
    fn rejects_garbage() {
        assert!(matches!(
            parse_datetime("yesterday"),
            Err(CliError::InvalidArgument(_))
        ));
        assert!(parse_datetime("2001-13-01").is_err());
    }
}
