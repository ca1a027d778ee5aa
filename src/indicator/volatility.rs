use crate::indicator::ma::sma;

/// Population standard deviation of `prices`.
///
/// Computed in two passes (mean first, then mean squared deviation) so the
/// result does not suffer the cancellation of the sum-of-squares formula.
/// Returns `0.0` for an empty slice.
pub fn volatility(prices: &[f64]) -> f64 {
    if prices.is_empty() {
        return 0.0;
    }
    let mean = sma(prices);
    let variance =
        prices.iter().map(|&p| (p - mean).powi(2)).sum::<f64>() / prices.len() as f64;
    variance.sqrt()
}
