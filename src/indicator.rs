pub mod extrema;
pub mod ma;
pub mod rsi;
pub mod volatility;

use crate::indicator::extrema::support_resistance;
use crate::indicator::ma::{Ema, sma};
use crate::indicator::rsi::rsi;
use crate::indicator::volatility::volatility;
use crate::model::Candle;

/// Indicator values computed from one price series.
///
/// Every field has a defined value even for empty or very short input; see the
/// individual functions for the sentinels they fall back to.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct IndicatorSet {
    pub volatility: f64,
    pub sma: f64,
    pub ema: f64,
    pub rsi: f64,
    /// Lowest detected support, or the series minimum when none was detected.
    pub support_level: f64,
    /// Highest detected resistance, or the series maximum when none was detected.
    pub resistance_level: f64,
}

impl IndicatorSet {
    /// Compute all indicators over `prices` (oldest first).
    pub fn compute(prices: &[f64], ema: &Ema) -> Self {
        let extrema = support_resistance(prices);

        let support_level = extrema
            .supports
            .iter()
            .copied()
            .reduce(f64::min)
            .or_else(|| prices.iter().copied().reduce(f64::min))
            .unwrap_or(0.0);
        let resistance_level = extrema
            .resistances
            .iter()
            .copied()
            .reduce(f64::max)
            .or_else(|| prices.iter().copied().reduce(f64::max))
            .unwrap_or(0.0);

        Self {
            volatility: volatility(prices),
            sma: sma(prices),
            ema: ema.calculate(prices),
            rsi: rsi(prices),
            support_level,
            resistance_level,
        }
    }
}

/// Extract close prices from a slice of candles.
pub fn close_prices(candles: &[Candle]) -> Vec<f64> {
    candles.iter().map(|c| c.close).collect()
}
