//! Where price bars come from.
//!
//! The analysis pipeline only sees the [`DataSource`] trait, so the HTTP
//! client can be swapped for a canned source in tests.

pub mod yahoo;

use async_trait::async_trait;
use chrono::NaiveDate;

use crate::error::DataSourceError;
use crate::models::PriceBar;

pub use yahoo::YahooFinanceClient;

#[async_trait]
pub trait DataSource: Send + Sync {
    /// Daily bars for `ticker` from `start` (inclusive) to `end` (exclusive),
    /// sorted ascending with one bar per date. An empty vector means the
    /// provider has nothing for that ticker/range.
    async fn fetch(
        &self,
        ticker: &str,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<Vec<PriceBar>, DataSourceError>;
}
