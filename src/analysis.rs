pub mod range;
pub mod report;

use std::sync::Arc;

use chrono::NaiveDate;
use error_stack::Report;
use tokio::sync::Semaphore;
use tracing::{debug, info, warn};

use crate::analysis::range::RangePolicy;
use crate::analysis::report::AnalysisReport;
use crate::config::{AppConfig, WatchConfig};
use crate::error::{AnalysisError, IndicatorError, SourceError};
use crate::indicator::ma::Ema;
use crate::indicator::{IndicatorSet, close_prices};
use crate::model::{Candle, DateRange};
use crate::signal::classifier::classify;
use crate::source::PriceSource;

/// One symbol to analyze over a requested date range.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnalysisRequest {
    pub symbol: String,
    pub date_from: String,
    pub date_to: String,
}

impl From<&WatchConfig> for AnalysisRequest {
    fn from(entry: &WatchConfig) -> Self {
        Self {
            symbol: entry.symbol.clone(),
            date_from: entry.date_from.clone(),
            date_to: entry.date_to.clone(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct AnalysisSettings {
    pub symbol_suffix: String,
    pub range_policy: RangePolicy,
    pub chart_window: usize,
    pub ema: Ema,
}

impl AnalysisSettings {
    pub fn from_config(config: &AppConfig) -> Result<Self, Report<IndicatorError>> {
        Ok(Self {
            symbol_suffix: config.general.symbol_suffix.clone(),
            range_policy: RangePolicy {
                max_lookback_days: config.general.max_lookback_days,
                default_lookback_days: config.general.default_lookback_days,
            },
            chart_window: config.general.chart_window,
            ema: Ema::new(config.engine.ema_alpha)?,
        })
    }
}

/// Runs the load -> indicators -> classification pipeline for one request.
pub struct Analyzer {
    source: Arc<dyn PriceSource>,
    settings: AnalysisSettings,
}

impl Analyzer {
    pub fn new(source: Arc<dyn PriceSource>, settings: AnalysisSettings) -> Self {
        Self { source, settings }
    }

    pub async fn analyze(
        &self,
        request: &AnalysisRequest,
        today: NaiveDate,
    ) -> Result<AnalysisReport, Report<AnalysisError>> {
        let range = range::normalize(
            &request.date_from,
            &request.date_to,
            today,
            &self.settings.range_policy,
        )?;

        let (symbol, candles) = self.load(&request.symbol, range).await?;
        let prices = close_prices(&candles);

        info!(
            symbol = %symbol,
            %range,
            points = prices.len(),
            alpha = self.settings.ema.alpha(),
            "computing indicators"
        );

        let indicators = IndicatorSet::compute(&prices, &self.settings.ema);
        let classification = classify(&indicators);

        debug!(?indicators, ?classification, symbol = %symbol, "classified");

        Ok(AnalysisReport::build(
            &symbol,
            range,
            &candles,
            &indicators,
            &classification,
            self.settings.chart_window,
        ))
    }

    /// Try each candidate spelling of `symbol` until one has data in `range`.
    async fn load(
        &self,
        symbol: &str,
        range: DateRange,
    ) -> Result<(String, Vec<Candle>), Report<AnalysisError>> {
        let candidates = candidate_symbols(symbol, &self.settings.symbol_suffix);
        let mut last_error: Option<Report<SourceError>> = None;

        for candidate in &candidates {
            match self.source.fetch_history(candidate, range).await {
                Ok(candles) if !candles.is_empty() => {
                    return Ok((candidate.clone(), candles));
                }
                Ok(_) => {
                    debug!(
                        source = self.source.name(),
                        symbol = %candidate,
                        %range,
                        "no prices in range"
                    );
                }
                Err(e) => {
                    debug!(
                        source = self.source.name(),
                        symbol = %candidate,
                        error = ?e,
                        "price source failed"
                    );
                    last_error = Some(e);
                }
            }
        }

        let no_data = AnalysisError::NoData {
            symbol: symbol.to_string(),
        };
        let tried = format!("tried: {}", candidates.join(", "));
        Err(match last_error {
            Some(e) => e.change_context(no_data).attach(tried),
            None => Report::new(no_data).attach(tried),
        })
    }
}

/// Symbol spellings to try, most specific first.
///
/// A bare symbol (no `.`) is tried with `suffix` appended and then as is.
/// A symbol already ending in `suffix` falls back to its stripped form;
/// any other qualified symbol is used unchanged.
pub fn candidate_symbols(symbol: &str, suffix: &str) -> Vec<String> {
    let symbol = symbol.trim();
    if suffix.is_empty() {
        return vec![symbol.to_string()];
    }
    if let Some(base) = symbol
        .strip_suffix(suffix)
        .filter(|base| !base.is_empty() && !base.contains('.'))
    {
        return vec![symbol.to_string(), base.to_string()];
    }
    if symbol.contains('.') {
        return vec![symbol.to_string()];
    }
    vec![format!("{symbol}{suffix}"), symbol.to_string()]
}

/// Analyze every request concurrently, at most `max_concurrency` at a time.
///
/// Results come back in request order; one failing symbol does not affect
/// the others.
pub async fn run_batch(
    analyzer: Arc<Analyzer>,
    requests: Vec<AnalysisRequest>,
    today: NaiveDate,
    max_concurrency: usize,
) -> Vec<Result<AnalysisReport, Report<AnalysisError>>> {
    let semaphore = Arc::new(Semaphore::new(max_concurrency.max(1)));

    let handles: Vec<_> = requests
        .into_iter()
        .map(|request| {
            let analyzer = Arc::clone(&analyzer);
            let semaphore = Arc::clone(&semaphore);
            let symbol = request.symbol.clone();
            let handle = tokio::spawn(async move {
                let _permit = match semaphore.acquire_owned().await {
                    Ok(permit) => permit,
                    Err(e) => {
                        return Err(Report::new(e).change_context(AnalysisError::Task {
                            symbol: request.symbol.clone(),
                        }));
                    }
                };
                analyzer.analyze(&request, today).await
            });
            (symbol, handle)
        })
        .collect();

    let mut results = Vec::with_capacity(handles.len());
    for (symbol, handle) in handles {
        let result = match handle.await {
            Ok(result) => result,
            Err(e) => Err(Report::new(e).change_context(AnalysisError::Task { symbol })),
        };
        if let Err(e) = &result {
            warn!(error = ?e, "analysis failed (continuing)");
        }
        results.push(result);
    }
    results
}
