//! One fetch, normalize and write run.

use thiserror::Error;
use tickvault_fetch::Provider;
use tickvault_normalize::normalize;
use tickvault_store::{ConnectionProvider, DiagnosticLog, WriteOutcome, write};
use tickvault_types::{DataCategory, DestinationName, ProviderError, ShapeError, Ticker};
use uuid::Uuid;

/// Errors that abort a run before anything is written.
///
/// Write failures are not part of this type: they are recorded and reported
/// through [`RunReport::outcome`].
#[derive(Error, Debug)]
pub enum PipelineError {
    /// The provider call failed.
    #[error(transparent)]
    Provider(#[from] ProviderError),

    /// The provider data had an unexpected shape.
    #[error(transparent)]
    Shape(#[from] ShapeError),
}

/// Summary of a completed run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunReport {
    /// Identifier tagging this run's diagnostic entries.
    pub run_id: Uuid,
    /// Relation the table was written to.
    pub destination: DestinationName,
    /// What happened at the store.
    pub outcome: WriteOutcome,
}

/// Retrieval, normalization and persistence for one (ticker, category) at a time.
#[derive(Debug)]
pub struct Pipeline<P, C> {
    provider: P,
    store: C,
    log: DiagnosticLog,
}

impl<P: Provider, C: ConnectionProvider> Pipeline<P, C> {
    /// Creates a pipeline from its three collaborators.
    pub const fn new(provider: P, store: C, log: DiagnosticLog) -> Self {
        Self {
            provider,
            store,
            log,
        }
    }

    /// Returns the provider.
    pub const fn provider(&self) -> &P {
        &self.provider
    }

    /// Returns the destination store.
    pub const fn store(&self) -> &C {
        &self.store
    }

    /// Returns the diagnostic log.
    pub const fn log(&self) -> &DiagnosticLog {
        &self.log
    }

    /// Fetches, normalizes and writes the data for `ticker` and `category`.
    ///
    /// Steps run strictly in sequence. A write failure does not abort the run;
    /// it is recorded in the diagnostic log and reported in the outcome.
    ///
    /// # Errors
    ///
    /// Returns [`PipelineError::Provider`] if retrieval fails and
    /// [`PipelineError::Shape`] if the data cannot be normalized. Nothing is
    /// written in either case.
    pub async fn run(&self, ticker: &Ticker, category: DataCategory) -> Result<RunReport, PipelineError> {
        let run_id = Uuid::new_v4();
        let destination = DestinationName::for_run(ticker, category);
        tracing::info!(%run_id, %ticker, %category, %destination, "starting run");

        let record = self.provider.fetch(ticker, category).await?;
        let table = normalize(category, &record)?;
        tracing::info!(%run_id, rows = table.len(), columns = table.columns().len(), "normalized table");

        let outcome = write(&self.store, &destination, &table, &self.log, run_id);
        tracing::info!(%run_id, materialized = outcome.is_materialized(), "run finished");

        Ok(RunReport {
            run_id,
            destination,
            outcome,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use chrono::{TimeZone, Utc};
    use rusqlite::OptionalExtension;
    use tickvault_store::{SqliteStore, StoreConnection, WriteError};
    use tickvault_types::{RawRecord, SeriesRow, Snapshot, TimeSeries, Value};

    struct StaticProvider(RawRecord);

    #[async_trait]
    impl Provider for StaticProvider {
        async fn fetch(&self, _: &Ticker, _: DataCategory) -> Result<RawRecord, ProviderError> {
            Ok(self.0.clone())
        }
    }

    struct MissingProvider;

    #[async_trait]
    impl Provider for MissingProvider {
        async fn fetch(&self, ticker: &Ticker, _: DataCategory) -> Result<RawRecord, ProviderError> {
            Err(ProviderError::UnknownIdentifier(ticker.to_string()))
        }
    }

    fn dividends() -> RawRecord {
        let rows = [(2024, 2, 15, 0.75), (2024, 5, 15, 0.75), (2024, 8, 15, 0.83)]
            .into_iter()
            .map(|(y, m, d, amount)| {
                SeriesRow::new(
                    Utc.with_ymd_and_hms(y, m, d, 0, 0, 0).unwrap(),
                    vec![Value::Float(amount)],
                )
            })
            .collect();
        RawRecord::Series(TimeSeries::new(vec!["Dividends".into()], rows))
    }

    fn ticker() -> Ticker {
        Ticker::new("msft").unwrap()
    }

    #[tokio::test]
    async fn test_run_writes_table() {
        let dir = tempfile::tempdir().unwrap();
        let store = SqliteStore::file(dir.path().join("stocks.db"));
        let pipeline = Pipeline::new(StaticProvider(dividends()), store, DiagnosticLog::discard());

        let report = pipeline.run(&ticker(), DataCategory::Dividends).await.unwrap();

        assert_eq!(report.destination.as_str(), "MSFT Dividends");
        assert_eq!(
            report.outcome,
            WriteOutcome::Materialized {
                name: report.destination.clone(),
                rows: 3
            }
        );

        let conn = pipeline.store().acquire().unwrap();
        let count: i64 = conn
            .inner()
            .query_row("SELECT COUNT(*) FROM \"MSFT Dividends\"", [], |row| row.get(0))
            .unwrap();
        assert_eq!(count, 3);
        conn.release().unwrap();
    }

    #[tokio::test]
    async fn test_repeated_run_records_conflict() {
        let dir = tempfile::tempdir().unwrap();
        let log_path = dir.path().join("logfile.log");
        let pipeline = Pipeline::new(
            StaticProvider(dividends()),
            SqliteStore::file(dir.path().join("stocks.db")),
            DiagnosticLog::file(&log_path),
        );

        pipeline.run(&ticker(), DataCategory::Dividends).await.unwrap();
        let second = pipeline.run(&ticker(), DataCategory::Dividends).await.unwrap();

        assert_eq!(
            second.outcome,
            WriteOutcome::Failed(WriteError::NameConflict("MSFT Dividends".into()))
        );
        let contents = std::fs::read_to_string(&log_path).unwrap();
        assert_eq!(contents.lines().count(), 1);
        assert!(contents.contains(&format!("run={}", second.run_id)));
    }

    const QUOTE_SUMMARY: &str = r#"{"quoteSummary":{"result":[{
        "assetProfile":{
            "address1":"One Apple Park Way","city":"Cupertino","country":"United States",
            "website":"https://www.apple.com","industry":"Consumer Electronics",
            "longBusinessSummary":"Apple Inc. designs smartphones.",
            "fullTimeEmployees":161000,
            "companyOfficers":[
                {"name":"Mr. Timothy D. Cook","title":"CEO & Director","age":62,
                 "totalPay":{"raw":16239562,"fmt":"16.24M"}}
            ]
        },
        "price":{"symbol":"AAPL","longName":"Apple Inc.","regularMarketPrice":{"raw":189.84,"fmt":"189.84"}}
    }],"error":null}}"#;

    #[tokio::test]
    async fn test_run_stores_info_snapshot() {
        let ticker = Ticker::new("AAPL").unwrap();
        let snapshot = tickvault_fetch::parse::parse_quote_summary(&ticker, QUOTE_SUMMARY).unwrap();
        let dir = tempfile::tempdir().unwrap();
        let pipeline = Pipeline::new(
            StaticProvider(RawRecord::Snapshot(snapshot)),
            SqliteStore::file(dir.path().join("stocks.db")),
            DiagnosticLog::discard(),
        );

        let report = pipeline.run(&ticker, DataCategory::Info).await.unwrap();
        assert!(report.outcome.is_materialized(), "{:?}", report.outcome);
        assert_eq!(report.destination.as_str(), "AAPL Info");

        let conn = pipeline.store().acquire().unwrap();
        let lookup = |key: &str| {
            conn.inner()
                .query_row(
                    "SELECT value FROM \"AAPL Info\" WHERE key = ?1",
                    [key],
                    |row| row.get::<_, Option<String>>(0),
                )
                .optional()
                .unwrap()
        };
        let officers = lookup("companyOfficers").flatten().unwrap();
        let officers: serde_json::Value = serde_json::from_str(&officers).unwrap();
        assert_eq!(officers[0]["name"], "Mr. Timothy D. Cook");
        assert_eq!(officers[0]["totalPay"]["raw"], 16_239_562);
        assert_eq!(lookup("website"), None);
        assert_eq!(lookup("longBusinessSummary"), None);
        assert_eq!(lookup("symbol"), Some(Some("AAPL".to_string())));
        conn.release().unwrap();
    }

    #[tokio::test]
    async fn test_provider_error_aborts_run() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("stocks.db");
        let pipeline = Pipeline::new(
            MissingProvider,
            SqliteStore::file(&path),
            DiagnosticLog::discard(),
        );

        let err = pipeline.run(&ticker(), DataCategory::Info).await.unwrap_err();
        assert!(matches!(err, PipelineError::Provider(ProviderError::UnknownIdentifier(_))));
        assert!(!path.exists());
    }

    #[tokio::test]
    async fn test_shape_mismatch_aborts_run() {
        let snapshot: Snapshot = [("symbol", Value::from("MSFT"))].into_iter().collect();
        let pipeline = Pipeline::new(
            StaticProvider(RawRecord::Snapshot(snapshot)),
            SqliteStore::in_memory(),
            DiagnosticLog::discard(),
        );

        let err = pipeline
            .run(&ticker(), DataCategory::HistoricPrice)
            .await
            .unwrap_err();
        assert!(matches!(err, PipelineError::Shape(ShapeError::UnexpectedShape { .. })));
    }
}
