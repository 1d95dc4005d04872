// SPDX-FileCopyrightText: 2026 Ombuds Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Test utilities for Ombuds integration tests.
//!
//! Provides mock adapters and test harness infrastructure for fast,
//! deterministic, CI-runnable tests without a live Telegram connection.
//!
//! # Components
//!
//! - [`MockChannel`] - Mock messaging channel with event injection and capture
//! - [`TestHarness`] - Full intake stack over a temp SQLite database

pub mod harness;
pub mod mock_channel;

pub use harness::TestHarness;
pub use mock_channel::MockChannel;
