//! The raw fetcher contract and its Yahoo Finance implementation.

use async_trait::async_trait;
use tickvault_types::{DataCategory, ProviderError, RawRecord, Ticker};

use crate::YahooClient;
use crate::parse::{parse_dividends, parse_price_history, parse_quote_summary, parse_statements};
use crate::url::{SNAPSHOT_MODULES, STATEMENT_MODULES, chart_url, quote_summary_url};

/// Source of raw market data.
///
/// Implementations return the provider's data unfiltered; a failed call is
/// reported once and never retried.
#[async_trait]
pub trait Provider: Send + Sync {
    /// Fetches the raw record for a ticker and category.
    ///
    /// # Errors
    ///
    /// Returns a [`ProviderError`] if the identifier is unknown, the provider
    /// is unreachable, or the response cannot be read.
    async fn fetch(&self, ticker: &Ticker, category: DataCategory) -> Result<RawRecord, ProviderError>;
}

#[async_trait]
impl Provider for YahooClient {
    async fn fetch(&self, ticker: &Ticker, category: DataCategory) -> Result<RawRecord, ProviderError> {
        let base_query1 = &self.config().query1_base;
        let base_query2 = &self.config().query2_base;

        let record = match category {
            DataCategory::Info | DataCategory::GeneralInfo => {
                let crumb = self.crumb().await?;
                let url = quote_summary_url(base_query2, ticker, SNAPSHOT_MODULES, crumb);
                let body = self.get_text(ticker, &url).await?;
                RawRecord::Snapshot(parse_quote_summary(ticker, &body)?)
            }
            DataCategory::Financials => {
                let crumb = self.crumb().await?;
                let url = quote_summary_url(base_query2, ticker, STATEMENT_MODULES, crumb);
                let body = self.get_text(ticker, &url).await?;
                RawRecord::Statements(parse_statements(ticker, &body)?)
            }
            DataCategory::HistoricPrice => {
                let body = self.get_text(ticker, &chart_url(base_query1, ticker)).await?;
                RawRecord::Series(parse_price_history(ticker, &body)?)
            }
            DataCategory::Dividends => {
                let body = self.get_text(ticker, &chart_url(base_query1, ticker)).await?;
                RawRecord::Series(parse_dividends(ticker, &body)?)
            }
        };

        tracing::info!(%ticker, %category, shape = %record.shape(), "fetched raw record");
        Ok(record)
    }
}
