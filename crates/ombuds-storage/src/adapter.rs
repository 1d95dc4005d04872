// SPDX-FileCopyrightText: 2026 Ombuds Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! SQLite implementation of the ReportStore trait.

use async_trait::async_trait;
use tokio::sync::OnceCell;
use tracing::debug;

use ombuds_config::model::StorageConfig;
use ombuds_core::{
    AdapterType, HealthStatus, OmbudsError, PluginAdapter, ReportStore, SubmissionRecord,
};

use crate::database::Database;
use crate::queries;

/// SQLite-backed report store.
///
/// Wraps a [`Database`] handle and delegates all query operations to the
/// typed query modules. The database is lazily initialized on the first
/// call to [`ReportStore::initialize`].
pub struct SqliteReportStore {
    config: StorageConfig,
    db: OnceCell<Database>,
}

impl SqliteReportStore {
    /// Create a new SqliteReportStore with the given configuration.
    ///
    /// The database connection is not opened until [`ReportStore::initialize`]
    /// is called.
    pub fn new(config: StorageConfig) -> Self {
        Self {
            config,
            db: OnceCell::new(),
        }
    }

    /// Returns a reference to the underlying Database, or an error if not initialized.
    fn db(&self) -> Result<&Database, OmbudsError> {
        self.db.get().ok_or_else(|| OmbudsError::Storage {
            source: "storage not initialized -- call initialize() first".into(),
        })
    }
}

#[async_trait]
impl PluginAdapter for SqliteReportStore {
    fn name(&self) -> &str {
        "sqlite"
    }

    fn version(&self) -> semver::Version {
        semver::Version::new(0, 1, 0)
    }

    fn adapter_type(&self) -> AdapterType {
        AdapterType::Storage
    }

    async fn health_check(&self) -> Result<HealthStatus, OmbudsError> {
        let db = self.db()?;
        db.connection()
            .call(|conn| {
                conn.execute_batch("SELECT 1;")?;
                Ok(())
            })
            .await
            .map_err(crate::database::map_tr_err)?;
        Ok(HealthStatus::Healthy)
    }

    async fn shutdown(&self) -> Result<(), OmbudsError> {
        // Shutdown delegates to close if the DB was initialized.
        if let Some(db) = self.db.get() {
            db.close().await?;
            debug!("shutdown: WAL checkpoint complete");
        }
        Ok(())
    }
}

#[async_trait]
impl ReportStore for SqliteReportStore {
    async fn initialize(&self) -> Result<(), OmbudsError> {
        let db = Database::open(&self.config.database_path, self.config.wal_mode).await?;
        self.db.set(db).map_err(|_| OmbudsError::Storage {
            source: "storage already initialized".into(),
        })?;
        debug!(path = %self.config.database_path, "SQLite report store initialized");
        Ok(())
    }

    async fn close(&self) -> Result<(), OmbudsError> {
        self.db()?.close().await
    }

    async fn append(&self, record: &SubmissionRecord) -> Result<(), OmbudsError> {
        queries::reports::insert_report(self.db()?, record).await
    }

    async fn load_all(&self) -> Result<Vec<SubmissionRecord>, OmbudsError> {
        queries::reports::list_reports(self.db()?).await
    }

    async fn clear(&self) -> Result<(), OmbudsError> {
        queries::reports::clear_reports(self.db()?).await?;
        Ok(())
    }
}
