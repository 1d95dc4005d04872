// SPDX-FileCopyrightText: 2026 Ombuds Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! In-memory session store backed by a concurrent map.

use std::time::Duration;

use dashmap::DashMap;

use ombuds_core::{Session, SessionStore, UserId};

/// Process-local [`SessionStore`] implementation.
///
/// Sessions live only in memory; a restart drops every in-flight
/// conversation, which matches the ephemeral session contract.
#[derive(Default)]
pub struct InMemorySessionStore {
    sessions: DashMap<i64, Session>,
}

impl InMemorySessionStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl SessionStore for InMemorySessionStore {
    fn get(&self, user_id: UserId) -> Option<Session> {
        self.sessions.get(&user_id.0).map(|s| s.clone())
    }

    fn put(&self, user_id: UserId, session: Session) {
        self.sessions.insert(user_id.0, session);
    }

    fn remove(&self, user_id: UserId) {
        self.sessions.remove(&user_id.0);
    }

    fn evict_idle(&self, idle_timeout: Duration) -> usize {
        let cutoff = chrono::Utc::now()
            - chrono::Duration::from_std(idle_timeout).unwrap_or(chrono::Duration::MAX);
        let before = self.sessions.len();
        self.sessions.retain(|_, session| session.last_activity >= cutoff);
        before - self.sessions.len()
    }

    fn active_count(&self) -> usize {
        self.sessions.len()
    }
}
