use std::path::Path;

use chrono::NaiveDate;
use error_stack::{Report, ResultExt};
use serde::Deserialize;

use crate::error::ConfigError;
use crate::indicator::ma::DEFAULT_EMA_ALPHA;
use crate::model::OutputFormat;

pub const DATE_FORMAT: &str = "%Y-%m-%d";

fn default_log_level() -> String {
    "info".into()
}

fn default_log_format() -> String {
    "text".into()
}

fn default_data_dir() -> String {
    "./data".into()
}

fn default_symbol_suffix() -> String {
    ".NS".into()
}

fn default_max_lookback_days() -> u64 {
    365 * 5
}

fn default_lookback_days() -> u64 {
    30
}

fn default_chart_window() -> usize {
    90
}

fn default_max_concurrency() -> usize {
    4
}

fn default_ema_alpha() -> f64 {
    DEFAULT_EMA_ALPHA
}

fn default_output_format() -> String {
    "text".into()
}

#[derive(Debug, Deserialize)]
pub struct AppConfig {
    pub general: GeneralConfig,
    #[serde(default)]
    pub engine: EngineConfig,
    #[serde(default)]
    pub output: OutputConfig,
    #[serde(default)]
    pub watchlist: Vec<WatchConfig>,
}

#[derive(Debug, Deserialize)]
pub struct GeneralConfig {
    #[serde(default = "default_log_level")]
    pub log_level: String,
    /// Accepted values: `"text"` | `"json"`
    #[serde(default = "default_log_format")]
    pub log_format: String,
    /// Directory holding one `<SYMBOL>.csv` file per instrument.
    #[serde(default = "default_data_dir")]
    pub data_dir: String,
    /// Appended to symbols without an exchange suffix; empty disables.
    #[serde(default = "default_symbol_suffix")]
    pub symbol_suffix: String,
    #[serde(default = "default_max_lookback_days")]
    pub max_lookback_days: u64,
    #[serde(default = "default_lookback_days")]
    pub default_lookback_days: u64,
    #[serde(default = "default_chart_window")]
    pub chart_window: usize,
    #[serde(default = "default_max_concurrency")]
    pub max_concurrency: usize,
}

#[derive(Debug, Deserialize)]
pub struct EngineConfig {
    #[serde(default = "default_ema_alpha")]
    pub ema_alpha: f64,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            ema_alpha: default_ema_alpha(),
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct OutputConfig {
    /// Accepted values: `"text"` | `"json"`
    #[serde(default = "default_output_format")]
    pub format: String,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            format: default_output_format(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct WatchConfig {
    pub symbol: String,
    pub date_from: String,
    pub date_to: String,
}

impl AppConfig {
    /// Output format from the validated config.
    pub fn output_format(&self) -> OutputFormat {
        OutputFormat::from_str(&self.output.format).unwrap_or(OutputFormat::Text)
    }
}

/// Load and validate an `AppConfig` from a TOML file at `path`.
pub fn load(path: &Path) -> Result<AppConfig, Report<ConfigError>> {
    let content = std::fs::read_to_string(path)
        .change_context(ConfigError::ReadFile)
        .attach_with(|| format!("path: {}", path.display()))?;

    let config: AppConfig = toml::from_str(&content).change_context(ConfigError::Parse {
        reason: "invalid TOML syntax or schema mismatch".into(),
    })?;

    validate(&config)?;

    Ok(config)
}

const VALID_LOG_FORMATS: &[&str] = &["text", "json"];

fn validate(config: &AppConfig) -> Result<(), Report<ConfigError>> {
    validate_formats(config)?;
    validate_engine(config)?;
    validate_limits(config)?;
    validate_watchlist(config)?;
    Ok(())
}

fn validation_error(field: String) -> Report<ConfigError> {
    Report::new(ConfigError::Validation { field })
}

fn validate_formats(config: &AppConfig) -> Result<(), Report<ConfigError>> {
    if !VALID_LOG_FORMATS.contains(&config.general.log_format.as_str()) {
        return Err(validation_error(format!(
            "general.log_format \"{}\" is not valid",
            config.general.log_format
        )));
    }
    if OutputFormat::from_str(&config.output.format).is_none() {
        return Err(validation_error(format!(
            "output.format \"{}\" is not valid",
            config.output.format
        )));
    }
    Ok(())
}

fn validate_engine(config: &AppConfig) -> Result<(), Report<ConfigError>> {
    let alpha = config.engine.ema_alpha;
    if !(alpha > 0.0 && alpha <= 1.0) {
        return Err(validation_error(format!(
            "engine.ema_alpha must be in (0, 1], got {alpha}"
        )));
    }
    Ok(())
}

fn validate_limits(config: &AppConfig) -> Result<(), Report<ConfigError>> {
    if config.general.chart_window == 0 {
        return Err(validation_error("general.chart_window must be > 0".into()));
    }
    if config.general.max_concurrency == 0 {
        return Err(validation_error("general.max_concurrency must be > 0".into()));
    }
    Ok(())
}

fn validate_watchlist(config: &AppConfig) -> Result<(), Report<ConfigError>> {
    let mut seen = std::collections::HashSet::new();
    for entry in &config.watchlist {
        if entry.symbol.trim().is_empty() {
            return Err(validation_error("watchlist: symbol must not be empty".into()));
        }
        if !seen.insert(entry.symbol.as_str()) {
            return Err(validation_error(format!(
                "watchlist: duplicate symbol \"{}\"",
                entry.symbol
            )));
        }
        for (name, value) in [("date_from", &entry.date_from), ("date_to", &entry.date_to)] {
            if NaiveDate::parse_from_str(value, DATE_FORMAT).is_err() {
                return Err(validation_error(format!(
                    "watchlist[\"{}\"].{name}: \"{value}\" is not a YYYY-MM-DD date",
                    entry.symbol
                )));
            }
        }
    }
    Ok(())
}
