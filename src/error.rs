use derive_more::{Display, Error};

#[derive(Debug, Display, Error)]
pub enum ConfigError {
    #[display("failed to read config file")]
    ReadFile,
    #[display("failed to parse config: {reason}")]
    Parse { reason: String },
    #[display("invalid config: {field}")]
    Validation { field: String },
}

#[derive(Debug, Display, Error)]
pub enum SourceError {
    #[display("no price history found for {symbol}")]
    NotFound { symbol: String },
    #[display("failed to read price history for {symbol}")]
    Read { symbol: String },
    #[display("failed to parse price history for {symbol}")]
    Parse { symbol: String },
}

#[derive(Debug, Display, Error)]
pub enum IndicatorError {
    #[display("invalid parameter: {name}")]
    InvalidParameter { name: String },
}

#[derive(Debug, Display, Error)]
pub enum AnalysisError {
    #[display("invalid date: {value}")]
    InvalidDate { value: String },
    #[display("no usable price data for {symbol}")]
    NoData { symbol: String },
    #[display("analysis task for {symbol} failed")]
    Task { symbol: String },
}
