use error_stack::Report;

use crate::error::IndicatorError;

pub const DEFAULT_EMA_ALPHA: f64 = 0.1;

/// Simple moving average over the whole of `prices`.
///
/// The window is whatever the caller passes in; there is no fixed period.
/// Returns `0.0` for an empty slice.
pub fn sma(prices: &[f64]) -> f64 {
    if prices.is_empty() {
        return 0.0;
    }
    prices.iter().sum::<f64>() / prices.len() as f64
}

/// Exponential moving average with a validated smoothing factor.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Ema {
    alpha: f64,
}

impl Ema {
    pub fn new(alpha: f64) -> Result<Self, Report<IndicatorError>> {
        if !(alpha > 0.0 && alpha <= 1.0) {
            return Err(Report::new(IndicatorError::InvalidParameter {
                name: "alpha".to_string(),
            })
            .attach(format!("must be in (0, 1], got {alpha}")));
        }
        Ok(Self { alpha })
    }

    pub fn alpha(&self) -> f64 {
        self.alpha
    }

    pub fn calculate(&self, prices: &[f64]) -> f64 {
        ema(prices, self.alpha)
    }
}

/// EMA seeded with the first price, folded forward in index order.
///
/// Returns `0.0` for an empty slice.
pub fn ema(prices: &[f64], alpha: f64) -> f64 {
    let Some((&seed, rest)) = prices.split_first() else {
        return 0.0;
    };
    rest.iter()
        .fold(seed, |ema, &price| alpha * price + (1.0 - alpha) * ema)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sma_empty_is_zero() {
        assert_eq!(sma(&[]), 0.0);
    }

    #[test]
    fn sma_flat_prices() {
        assert_eq!(sma(&[10.0; 5]), 10.0);
    }

    #[test]
    fn sma_is_mean_of_entire_window() {
        // Not a rolling window: all four values contribute.
        assert!((sma(&[1.0, 2.0, 3.0, 4.0]) - 2.5).abs() < 1e-9);
    }

    #[test]
    fn ema_empty_is_zero() {
        assert_eq!(ema(&[], 0.1), 0.0);
    }

    #[test]
    fn ema_single_value_is_returned_for_any_alpha() {
        for alpha in [0.01, 0.1, 0.5, 1.0] {
            assert_eq!(ema(&[123.45], alpha), 123.45);
        }
    }

    #[test]
    fn ema_flat_prices() {
        let value = ema(&[10.0; 6], DEFAULT_EMA_ALPHA);
        assert!((value - 10.0).abs() < 1e-9);
    }

    #[test]
    fn ema_known_value() {
        // seed 10 -> 0.1*20 + 0.9*10 = 11 -> 0.1*30 + 0.9*11 = 12.9
        let value = ema(&[10.0, 20.0, 30.0], 0.1);
        assert!((value - 12.9).abs() < 1e-9);
    }

    #[test]
    fn ema_alpha_one_tracks_last_price() {
        assert_eq!(ema(&[3.0, 7.0, 5.0], 1.0), 5.0);
    }

    #[test]
    fn higher_alpha_weights_recent_prices_more() {
        let prices = [10.0, 10.0, 10.0, 20.0];
        assert!(ema(&prices, 0.5) > ema(&prices, 0.1));
    }

    #[test]
    fn ema_alpha_out_of_range_invalid() {
        assert!(Ema::new(0.0).is_err());
        assert!(Ema::new(-0.1).is_err());
        assert!(Ema::new(1.5).is_err());
        assert!(Ema::new(f64::NAN).is_err());
    }

    #[test]
    fn invalid_alpha_names_the_parameter() {
        let err = Ema::new(2.0).unwrap_err();
        assert!(matches!(
            err.current_context(),
            IndicatorError::InvalidParameter { name } if name == "alpha"
        ));
        assert_eq!(err.current_context().to_string(), "invalid parameter: alpha");
    }

    #[test]
    fn ema_struct_matches_free_function() {
        let prices = [100.0, 102.0, 101.0, 105.0];
        let indicator = Ema::new(0.2).unwrap();
        assert_eq!(indicator.alpha(), 0.2);
        assert_eq!(indicator.calculate(&prices), ema(&prices, 0.2));
    }
}
