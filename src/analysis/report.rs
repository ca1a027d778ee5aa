use chrono::NaiveDate;
use serde::Serialize;

use crate::indicator::IndicatorSet;
use crate::model::{Candle, DateRange};
use crate::signal::classifier::risk_ratio;
use crate::signal::{Classification, Momentum, Risk, Signal, Trend};

/// Result of one analysis, ready for display or serialization.
///
/// Prices and indicator values are rounded to two decimals.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AnalysisReport {
    pub symbol: String,
    pub date_from: NaiveDate,
    pub date_to: NaiveDate,
    pub current_price: f64,
    pub volatility: f64,
    pub volatility_percent: f64,
    pub sma: f64,
    pub ema: f64,
    pub rsi: f64,
    pub support: f64,
    pub resistance: f64,
    pub trend: Trend,
    pub momentum: Momentum,
    pub risk: Risk,
    pub signal: Signal,
    pub chart: Chart,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Chart {
    pub dates: Vec<String>,
    pub ohlc: Vec<OhlcPoint>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OhlcPoint {
    pub x: String,
    pub o: f64,
    pub h: f64,
    pub l: f64,
    pub c: f64,
}

impl AnalysisReport {
    /// `candles` must be non-empty and in date order.
    pub fn build(
        symbol: &str,
        range: DateRange,
        candles: &[Candle],
        indicators: &IndicatorSet,
        classification: &Classification,
        chart_window: usize,
    ) -> Self {
        let current_price = candles.last().map_or(0.0, |c| c.close);
        let volatility_percent = risk_ratio(indicators.volatility, indicators.sma) * 100.0;

        Self {
            symbol: symbol.to_string(),
            date_from: range.start,
            date_to: range.end,
            current_price: round2(current_price),
            volatility: round2(indicators.volatility),
            volatility_percent: round2(volatility_percent),
            sma: round2(indicators.sma),
            ema: round2(indicators.ema),
            rsi: round2(indicators.rsi),
            support: round2(indicators.support_level),
            resistance: round2(indicators.resistance_level),
            trend: classification.trend,
            momentum: classification.momentum,
            risk: classification.risk,
            signal: classification.signal,
            chart: Chart::from_candles(candles, chart_window),
        }
    }

    /// One-line verdict, e.g. `TCS.NS: BUY (trend=bullish, momentum=neutral, risk=low)`.
    pub fn summary(&self) -> String {
        format!(
            "{}: {} (trend={}, momentum={}, risk={})",
            self.symbol,
            self.signal.to_string().to_uppercase(),
            self.trend,
            self.momentum,
            self.risk
        )
    }
}

impl Chart {
    /// The trailing `window` candles as chart points.
    fn from_candles(candles: &[Candle], window: usize) -> Self {
        let tail = &candles[candles.len().saturating_sub(window)..];

        let ohlc: Vec<OhlcPoint> = tail
            .iter()
            .map(|c| OhlcPoint {
                x: c.date.to_string(),
                o: round2(c.open_or_close()),
                h: round2(c.high_or_close()),
                l: round2(c.low_or_close()),
                c: round2(c.close),
            })
            .collect();
        let dates = ohlc.iter().map(|p| p.x.clone()).collect();

        Self { dates, ohlc }
    }
}

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}
