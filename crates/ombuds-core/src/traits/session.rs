// SPDX-FileCopyrightText: 2026 Ombuds Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Session store trait for in-memory conversational state.

use std::time::Duration;

use crate::types::{Session, UserId};

/// Store for per-user conversation sessions.
///
/// Sessions are ephemeral by contract: implementations hold them in memory
/// only, and a restart loses all of them. The trait is synchronous since no
/// implementation needs to await anything.
pub trait SessionStore: Send + Sync + 'static {
    /// Returns a copy of the session for `user_id`, if any.
    fn get(&self, user_id: UserId) -> Option<Session>;

    /// Inserts or replaces the session for `user_id`.
    fn put(&self, user_id: UserId, session: Session);

    /// Removes the session for `user_id`.
    fn remove(&self, user_id: UserId);

    /// Drops every session idle for longer than `idle_timeout` and returns
    /// how many were dropped.
    fn evict_idle(&self, idle_timeout: Duration) -> usize;

    /// Number of live sessions.
    fn active_count(&self) -> usize;
}
