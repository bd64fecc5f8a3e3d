//! Result export — CSV files and the timestamp text shared with the CLI table.

pub mod csv;

pub use self::csv::{
    export_csv, is_csv_path, read_csv, validate_export_target, CsvRow, CSV_HEADER,
};

use chrono::{DateTime, FixedOffset, Local};
use std::time::SystemTime;

/// Text layout for timestamps in every output: local time with offset.
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S%.f %z";

/// Render a modification time in the local timezone.
///
/// An unset time (a subtree with no files) renders as an empty string.
pub fn format_timestamp(time: Option<SystemTime>) -> String {
    time.map(|t| DateTime::<Local>::from(t).format(TIMESTAMP_FORMAT).to_string())
        .unwrap_or_default()
}

/// Inverse of [`format_timestamp`]. Empty text is `Ok(None)`.
pub fn parse_timestamp(text: &str) -> Result<Option<DateTime<FixedOffset>>, chrono::ParseError> {
    if text.is_empty() {
        return Ok(None);
    }
    DateTime::parse_from_str(text, TIMESTAMP_FORMAT).map(Some)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[test]
    fn unset_timestamp_is_empty() {
        assert_eq!(format_timestamp(None), "");
        assert_eq!(parse_timestamp("").unwrap(), None);
    }

    #[test]
    fn timestamp_text_parses_back_to_same_instant() {
        let t = SystemTime::UNIX_EPOCH + Duration::new(1_700_000_000, 250_000_000);
        let text = format_timestamp(Some(t));
        let parsed = parse_timestamp(&text).unwrap().unwrap();
        assert_eq!(SystemTime::from(parsed), t);
    }
}
