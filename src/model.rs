use std::fmt;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// How analysis reports are delivered.
///
/// String representations match the config file / CLI format (`"text"`, `"json"`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum OutputFormat {
    Text,
    Json,
}

impl OutputFormat {
    /// Parse a config-format string into an `OutputFormat`.
    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "text" => Some(Self::Text),
            "json" => Some(Self::Json),
            _ => None,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Text => "text",
            Self::Json => "json",
        }
    }
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Half-open calendar range `[start, end)` of trading days.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DateRange {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl DateRange {
    pub fn contains(&self, date: NaiveDate) -> bool {
        self.start <= date && date < self.end
    }
}

impl fmt::Display for DateRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}..{}", self.start, self.end)
    }
}

/// One trading day of price history.
///
/// Only the close is guaranteed; the other fields are whatever the source
/// happened to provide for that day.
#[derive(Debug, Clone, PartialEq)]
pub struct Candle {
    pub date: NaiveDate,
    pub open: Option<f64>,
    pub high: Option<f64>,
    pub low: Option<f64>,
    pub close: f64,
}

impl Candle {
    pub fn open_or_close(&self) -> f64 {
        self.open.unwrap_or(self.close)
    }

    pub fn high_or_close(&self) -> f64 {
        self.high.unwrap_or(self.close)
    }

    pub fn low_or_close(&self) -> f64 {
        self.low.unwrap_or(self.close)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn output_format_round_trip() {
        for (s, format) in [("text", OutputFormat::Text), ("json", OutputFormat::Json)] {
            assert_eq!(OutputFormat::from_str(s), Some(format));
            assert_eq!(format.as_str(), s);
        }
    }

    #[test]
    fn output_format_invalid_string_returns_none() {
        assert_eq!(OutputFormat::from_str("xml"), None);
        assert_eq!(OutputFormat::from_str(""), None);
    }

    #[test]
    fn date_range_is_half_open() {
        let range = DateRange {
            start: NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
            end: NaiveDate::from_ymd_opt(2024, 1, 31).unwrap(),
        };
        assert!(range.contains(NaiveDate::from_ymd_opt(2024, 1, 1).unwrap()));
        assert!(range.contains(NaiveDate::from_ymd_opt(2024, 1, 30).unwrap()));
        assert!(!range.contains(NaiveDate::from_ymd_opt(2024, 1, 31).unwrap()));
        assert!(!range.contains(NaiveDate::from_ymd_opt(2023, 12, 31).unwrap()));
        assert_eq!(range.to_string(), "2024-01-01..2024-01-31");
    }

    #[test]
    fn missing_ohlc_fields_fall_back_to_close() {
        let candle = Candle {
            date: NaiveDate::from_ymd_opt(2024, 3, 1).unwrap(),
            open: None,
            high: Some(105.0),
            low: None,
            close: 101.5,
        };
        assert_eq!(candle.open_or_close(), 101.5);
        assert_eq!(candle.high_or_close(), 105.0);
        assert_eq!(candle.low_or_close(), 101.5);
    }
}
