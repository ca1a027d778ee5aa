use std::io::Write;

use crate::analysis::report::AnalysisReport;
use crate::reporter::Reporter;

/// Writes each report to stdout as a pretty-printed JSON document.
pub struct JsonReporter;

impl JsonReporter {
    fn render(report: &AnalysisReport) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(report)
    }
}

impl Reporter for JsonReporter {
    fn report(&self, report: &AnalysisReport) {
        let rendered = match Self::render(report) {
            Ok(s) => s,
            Err(e) => {
                tracing::error!(error = %e, symbol = %report.symbol, "failed to serialize report");
                return;
            }
        };

        let mut stdout = std::io::stdout().lock();
        if let Err(e) = writeln!(stdout, "{rendered}") {
            tracing::error!(error = %e, symbol = %report.symbol, "failed to write report");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::report::{Chart, OhlcPoint};
    use crate::signal::{Momentum, Risk, Signal, Trend};
    use chrono::NaiveDate;

    fn sample() -> AnalysisReport {
        AnalysisReport {
            symbol: "TCS.NS".into(),
            date_from: NaiveDate::from_ymd_opt(2024, 3, 1).unwrap(),
            date_to: NaiveDate::from_ymd_opt(2024, 3, 5).unwrap(),
            current_price: 4012.35,
            volatility: 95.1,
            volatility_percent: 2.41,
            sma: 3950.0,
            ema: 3890.2,
            rsi: 44.7,
            support: 3801.0,
            resistance: 4120.0,
            trend: Trend::Bearish,
            momentum: Momentum::Neutral,
            risk: Risk::Low,
            signal: Signal::Sell,
            chart: Chart {
                dates: vec!["2024-03-04".into()],
                ohlc: vec![OhlcPoint {
                    x: "2024-03-04".into(),
                    o: 4000.0,
                    h: 4030.5,
                    l: 3990.0,
                    c: 4012.35,
                }],
            },
        }
    }

    #[test]
    fn render_produces_expected_fields() {
        let rendered = JsonReporter::render(&sample()).unwrap();
        let value: serde_json::Value = serde_json::from_str(&rendered).unwrap();
        assert_eq!(value["symbol"], "TCS.NS");
        assert_eq!(value["signal"], "sell");
        assert_eq!(value["trend"], "bearish");
        assert_eq!(value["current_price"], 4012.35);
        assert_eq!(value["date_to"], "2024-03-05");
        assert_eq!(value["chart"]["dates"][0], "2024-03-04");
        assert_eq!(value["chart"]["ohlc"][0]["h"], 4030.5);
    }

    #[test]
    fn json_reporter_does_not_panic() {
        JsonReporter.report(&sample());
    }
}
