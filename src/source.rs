pub mod csv_file;

use error_stack::Report;
use futures::future::BoxFuture;

use crate::error::SourceError;
use crate::model::{Candle, DateRange};

/// Supplier of historical daily prices.
///
/// Uses `BoxFuture` (from `futures` crate) instead of `async fn` in trait
/// to keep the trait object-safe (`dyn PriceSource`).
pub trait PriceSource: Send + Sync {
    fn name(&self) -> &str;

    /// Fetch the candles of `symbol` that fall inside `range`, oldest first.
    ///
    /// Days without a usable close are left out, so the result may have gaps
    /// or be empty.
    fn fetch_history(
        &self,
        symbol: &str,
        range: DateRange,
    ) -> BoxFuture<'_, Result<Vec<Candle>, Report<SourceError>>>;
}
