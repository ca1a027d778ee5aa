/// RSI returned when there are fewer than two prices to compare.
pub const NEUTRAL_RSI: f64 = 50.0;

/// Relative Strength Index over the entire supplied series.
///
/// Unlike the usual 14-period Wilder RSI there is no lookback window and no
/// smoothing: gains and losses are summed across every consecutive pair.
/// A series with no losing step returns `100.0`.
pub fn rsi(prices: &[f64]) -> f64 {
    if prices.len() < 2 {
        return NEUTRAL_RSI;
    }

    let (gain, loss) = prices
        .windows(2)
        .map(|w| w[1] - w[0])
        .fold((0.0_f64, 0.0_f64), |(gain, loss), delta| {
            if delta > 0.0 {
                (gain + delta, loss)
            } else {
                (gain, loss - delta)
            }
        });

    rsi_value(gain, loss)
}

fn rsi_value(gain: f64, loss: f64) -> f64 {
    if loss == 0.0 {
        return 100.0;
    }
    let rs = gain / loss;
    100.0 - 100.0 / (1.0 + rs)
}
