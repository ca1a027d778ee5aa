use crate::indicator::IndicatorSet;
use crate::signal::{Classification, Momentum, Risk, Signal, Trend};

// EMA must clear the SMA by 1% either way before a trend is called.
const BULLISH_EMA_RATIO: f64 = 1.01;
const BEARISH_EMA_RATIO: f64 = 0.99;

const OVERBOUGHT_RSI: f64 = 70.0;
const OVERSOLD_RSI: f64 = 30.0;

const HIGH_RISK_RATIO: f64 = 0.08;
const MEDIUM_RISK_RATIO: f64 = 0.04;

const BUY_MAX_RSI: f64 = 60.0;
const SELL_MIN_RSI: f64 = 40.0;

/// Map indicator values to trend, momentum, risk and a final signal.
pub fn classify(indicators: &IndicatorSet) -> Classification {
    let trend = trend(indicators.ema, indicators.sma);
    let momentum = momentum(indicators.rsi);
    let risk = risk(risk_ratio(indicators.volatility, indicators.sma));
    let signal = signal(trend, risk, indicators.rsi);

    Classification {
        trend,
        momentum,
        risk,
        signal,
    }
}

/// Volatility relative to the average price; `0.0` when the SMA is not positive.
pub fn risk_ratio(volatility: f64, sma: f64) -> f64 {
    if sma > 0.0 { volatility / sma } else { 0.0 }
}

fn trend(ema: f64, sma: f64) -> Trend {
    if ema > BULLISH_EMA_RATIO * sma {
        Trend::Bullish
    } else if ema < BEARISH_EMA_RATIO * sma {
        Trend::Bearish
    } else {
        Trend::Neutral
    }
}

fn momentum(rsi: f64) -> Momentum {
    if rsi > OVERBOUGHT_RSI {
        Momentum::Overbought
    } else if rsi < OVERSOLD_RSI {
        Momentum::Oversold
    } else {
        Momentum::Neutral
    }
}

fn risk(ratio: f64) -> Risk {
    if ratio > HIGH_RISK_RATIO {
        Risk::High
    } else if ratio > MEDIUM_RISK_RATIO {
        Risk::Medium
    } else {
        Risk::Low
    }
}

fn signal(trend: Trend, risk: Risk, rsi: f64) -> Signal {
    match trend {
        Trend::Bullish if rsi < BUY_MAX_RSI && risk != Risk::High => Signal::Buy,
        Trend::Bearish if rsi > SELL_MIN_RSI => Signal::Sell,
        _ => Signal::Hold,
    }
}
