// SPDX-FileCopyrightText: 2026 Ombuds Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Report store trait for submission persistence backends.

use async_trait::async_trait;

use crate::error::OmbudsError;
use crate::traits::adapter::PluginAdapter;
use crate::types::SubmissionRecord;

/// Adapter for the append-only submission store.
///
/// Records are only ever appended or cleared wholesale; there is no
/// per-record update or delete.
#[async_trait]
pub trait ReportStore: PluginAdapter {
    /// Initializes the backend (opens the database, runs migrations).
    async fn initialize(&self) -> Result<(), OmbudsError>;

    /// Flushes and closes the backend.
    async fn close(&self) -> Result<(), OmbudsError>;

    /// Appends one submission. Either the whole record is stored or the
    /// call fails; a failed append leaves the store unchanged.
    async fn append(&self, record: &SubmissionRecord) -> Result<(), OmbudsError>;

    /// Loads all submissions in insertion order.
    async fn load_all(&self) -> Result<Vec<SubmissionRecord>, OmbudsError>;

    /// Deletes every submission.
    async fn clear(&self) -> Result<(), OmbudsError>;
}
