use chrono::{Days, NaiveDate};
use error_stack::{Report, ResultExt};
use tracing::info;

use crate::config::DATE_FORMAT;
use crate::error::AnalysisError;
use crate::model::DateRange;

/// Limits applied when a requested date range is normalized.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RangePolicy {
    /// Starts older than `today - max_lookback_days` are pulled forward.
    pub max_lookback_days: u64,
    /// A start in the future is replaced by `today - default_lookback_days`.
    pub default_lookback_days: u64,
}

/// Parse and normalize a requested `[date_from, date_to)` range.
///
/// Adjustments happen in a fixed order: an end in the future becomes today,
/// a start in the future falls back to the default lookback, reversed bounds
/// are swapped, and finally the start is clamped to the maximum lookback.
pub fn normalize(
    date_from: &str,
    date_to: &str,
    today: NaiveDate,
    policy: &RangePolicy,
) -> Result<DateRange, Report<AnalysisError>> {
    let mut start = parse_date(date_from)?;
    let mut end = parse_date(date_to)?;

    if end > today {
        info!(requested = %end, %today, "end date is in the future, using today");
        end = today;
    }

    if start > today {
        start = days_before(today, policy.default_lookback_days);
        info!(
            requested = date_from,
            adjusted = %start,
            "start date is in the future, using default lookback"
        );
    }

    if start > end {
        info!(%start, %end, "start date after end date, swapping");
        std::mem::swap(&mut start, &mut end);
    }

    let earliest = days_before(today, policy.max_lookback_days);
    if start < earliest {
        info!(requested = %start, adjusted = %earliest, "start date too far back, clamping");
        start = earliest;
    }

    Ok(DateRange { start, end })
}

fn parse_date(value: &str) -> Result<NaiveDate, Report<AnalysisError>> {
    NaiveDate::parse_from_str(value.trim(), DATE_FORMAT).change_context(
        AnalysisError::InvalidDate {
            value: value.to_string(),
        },
    )
}

fn days_before(date: NaiveDate, days: u64) -> NaiveDate {
    date.checked_sub_days(Days::new(days))
        .unwrap_or(NaiveDate::MIN)
}

#[cfg(test)]
mod tests {
    use super::*;

    const POLICY: RangePolicy = RangePolicy {
        max_lookback_days: 365 * 5,
        default_lookback_days: 30,
    };

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn today() -> NaiveDate {
        date(2026, 10, 16)
    }

    #[test]
    fn valid_range_is_unchanged() {
        let range = normalize("2026-01-05", "2026-03-01", today(), &POLICY).unwrap();
        assert_eq!(range.start, date(2026, 1, 5));
        assert_eq!(range.end, date(2026, 3, 1));
    }

    #[test]
    fn future_end_is_clamped_to_today() {
        let range = normalize("2026-09-01", "2027-01-01", today(), &POLICY).unwrap();
        assert_eq!(range.end, today());
        assert_eq!(range.start, date(2026, 9, 1));
    }

    #[test]
    fn future_start_uses_default_lookback() {
        let range = normalize("2027-05-01", "2026-10-10", today(), &POLICY).unwrap();
        assert_eq!(range.start, date(2026, 9, 16));
        assert_eq!(range.end, date(2026, 10, 10));
    }

    #[test]
    fn reversed_bounds_are_swapped() {
        let range = normalize("2026-06-30", "2026-01-01", today(), &POLICY).unwrap();
        assert_eq!(range.start, date(2026, 1, 1));
        assert_eq!(range.end, date(2026, 6, 30));
    }

    #[test]
    fn start_is_clamped_to_max_lookback() {
        let range = normalize("2001-01-01", "2026-01-01", today(), &POLICY).unwrap();
        assert_eq!(range.start, today() - Days::new(365 * 5));
        assert_eq!(range.end, date(2026, 1, 1));
    }

    #[test]
    fn swap_happens_before_lookback_clamp() {
        // After swapping, the new start (2000) is older than the lookback.
        let range = normalize("2026-02-01", "2000-01-01", today(), &POLICY).unwrap();
        assert_eq!(range.start, today() - Days::new(365 * 5));
        assert_eq!(range.end, date(2026, 2, 1));
    }

    #[test]
    fn surrounding_whitespace_is_ignored() {
        let range = normalize(" 2026-01-05 ", "2026-03-01\n", today(), &POLICY).unwrap();
        assert_eq!(range.start, date(2026, 1, 5));
    }

    #[test]
    fn malformed_date_is_rejected() {
        let err = normalize("2026/01/05", "2026-03-01", today(), &POLICY).unwrap_err();
        assert!(matches!(
            err.current_context(),
            AnalysisError::InvalidDate { value } if value == "2026/01/05"
        ));
        assert!(normalize("2026-01-05", "not-a-date", today(), &POLICY).is_err());
    }

    #[test]
    fn huge_lookback_does_not_overflow() {
        let policy = RangePolicy {
            max_lookback_days: u64::MAX,
            default_lookback_days: 30,
        };
        let range = normalize("1990-01-01", "2026-01-01", today(), &policy).unwrap();
        assert_eq!(range.start, date(1990, 1, 1));
    }
}
