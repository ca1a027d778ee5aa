use std::io;
use std::path::{Path, PathBuf};

use chrono::NaiveDate;
use error_stack::{Report, ResultExt};
use futures::future::BoxFuture;
use serde::{Deserialize, Deserializer};
use tracing::debug;

use crate::error::SourceError;
use crate::model::{Candle, DateRange};
use crate::source::PriceSource;

/// Reads daily history from `<data_dir>/<symbol>.csv`.
///
/// Expected header: `Date,Open,High,Low,Close,Volume` (lowercase also
/// accepted, extra columns such as `Adj Close` and `Volume` ignored). Any
/// price column may be empty, `null` or `NaN`.
pub struct CsvPriceSource {
    data_dir: PathBuf,
}

impl CsvPriceSource {
    pub fn new(data_dir: impl Into<PathBuf>) -> Self {
        Self {
            data_dir: data_dir.into(),
        }
    }

    fn path_for(&self, symbol: &str) -> PathBuf {
        self.data_dir.join(format!("{symbol}.csv"))
    }
}

#[derive(Debug, Deserialize)]
struct CsvRow {
    #[serde(rename = "Date", alias = "date")]
    date: NaiveDate,
    #[serde(rename = "Open", alias = "open", default, deserialize_with = "price")]
    open: Option<f64>,
    #[serde(rename = "High", alias = "high", default, deserialize_with = "price")]
    high: Option<f64>,
    #[serde(rename = "Low", alias = "low", default, deserialize_with = "price")]
    low: Option<f64>,
    #[serde(rename = "Close", alias = "close", default, deserialize_with = "price")]
    close: Option<f64>,
}

/// Price cell; gaps are written as an empty cell, `null` or `NaN`.
fn price<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw: Option<String> = Option::deserialize(deserializer)?;
    match raw.as_deref().map(str::trim) {
        None | Some("") => Ok(None),
        Some(s) if s.eq_ignore_ascii_case("null") || s.eq_ignore_ascii_case("nan") => Ok(None),
        Some(s) => s.parse::<f64>().map(Some).map_err(serde::de::Error::custom),
    }
}

impl PriceSource for CsvPriceSource {
    fn name(&self) -> &str {
        "csv"
    }

    fn fetch_history(
        &self,
        symbol: &str,
        range: DateRange,
    ) -> BoxFuture<'_, Result<Vec<Candle>, Report<SourceError>>> {
        let symbol = symbol.to_string();
        Box::pin(async move {
            if !is_plain_symbol(&symbol) {
                return Err(Report::new(SourceError::NotFound { symbol })
                    .attach("symbol must not contain path separators"));
            }

            let path = self.path_for(&symbol);
            let bytes = read_file(&path, &symbol).await?;
            let candles = parse_candles(&symbol, &bytes)?;
            let total = candles.len();

            let candles: Vec<Candle> = candles
                .into_iter()
                .filter(|c| range.contains(c.date))
                .collect();

            debug!(
                symbol = %symbol,
                path = %path.display(),
                %range,
                total,
                in_range = candles.len(),
                "loaded price history"
            );

            Ok(candles)
        })
    }
}

fn is_plain_symbol(symbol: &str) -> bool {
    !symbol.is_empty() && !symbol.contains(['/', '\\']) && symbol != "." && symbol != ".."
}

async fn read_file(path: &Path, symbol: &str) -> Result<Vec<u8>, Report<SourceError>> {
    match tokio::fs::read(path).await {
        Ok(bytes) => Ok(bytes),
        Err(e) if e.kind() == io::ErrorKind::NotFound => Err(Report::new(e)
            .change_context(SourceError::NotFound {
                symbol: symbol.to_string(),
            })
            .attach(format!("path: {}", path.display()))),
        Err(e) => Err(Report::new(e)
            .change_context(SourceError::Read {
                symbol: symbol.to_string(),
            })
            .attach(format!("path: {}", path.display()))),
    }
}

/// Parse CSV bytes into candles sorted by date, dropping rows without a
/// finite close.
fn parse_candles(symbol: &str, data: &[u8]) -> Result<Vec<Candle>, Report<SourceError>> {
    let mut reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(data);

    let mut candles = Vec::new();
    let mut dropped = 0usize;

    for (index, record) in reader.deserialize::<CsvRow>().enumerate() {
        let row = record
            .change_context(SourceError::Parse {
                symbol: symbol.to_string(),
            })
            // +2: one for the header, one for 1-based line numbers
            .attach_with(|| format!("line: {}", index + 2))?;

        match row.close {
            Some(close) if close.is_finite() => candles.push(Candle {
                date: row.date,
                open: row.open.filter(|v| v.is_finite()),
                high: row.high.filter(|v| v.is_finite()),
                low: row.low.filter(|v| v.is_finite()),
                close,
            }),
            _ => dropped += 1,
        }
    }

    if dropped > 0 {
        debug!(symbol, dropped, "dropped rows without a usable close");
    }

    candles.sort_by_key(|c| c.date);
    Ok(candles)
}
