// SPDX-FileCopyrightText: 2026 Ombuds Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Intake loop and conversation handling for the Ombuds bot.
//!
//! The [`IntakeLoop`] is the central coordinator that:
//! - Receives events from a channel adapter
//! - Steps each user's session through the questionnaire or admin flow
//! - Sweeps idle sessions on a fixed interval
//! - Handles graceful shutdown

pub mod controller;
pub mod directory;
pub mod session_store;
pub mod shutdown;
pub mod texts;

use std::sync::Arc;
use std::time::Duration;

use tokio_util::sync::CancellationToken;
use tracing::{error, info};

use ombuds_core::{ChannelAdapter, OmbudsError, SessionStore};

pub use crate::controller::ConversationController;
pub use crate::directory::build_directory;
pub use crate::session_store::InMemorySessionStore;
pub use crate::shutdown::install_signal_handler;

/// The main intake loop driving the bot.
///
/// Receives inbound events from a channel adapter, hands each one to the
/// conversation controller, and evicts idle sessions between events.
pub struct IntakeLoop {
    channel: Arc<dyn ChannelAdapter>,
    controller: Arc<ConversationController>,
    sessions: Arc<dyn SessionStore>,
    idle_timeout: Duration,
    sweep_interval: Duration,
}

impl IntakeLoop {
    pub fn new(
        channel: Arc<dyn ChannelAdapter>,
        controller: Arc<ConversationController>,
        sessions: Arc<dyn SessionStore>,
        idle_timeout: Duration,
        sweep_interval: Duration,
    ) -> Self {
        Self {
            channel,
            controller,
            sessions,
            idle_timeout,
            sweep_interval,
        }
    }

    /// Runs the intake loop until the cancellation token is triggered.
    ///
    /// Events are handled sequentially; each event produces at most one
    /// state transition and one reply. A periodic sweep drops sessions that
    /// have been idle longer than the configured timeout.
    pub async fn run(&self, cancel: CancellationToken) -> Result<(), OmbudsError> {
        info!(
            idle_timeout_secs = self.idle_timeout.as_secs(),
            sweep_interval_secs = self.sweep_interval.as_secs(),
            "intake loop running"
        );

        let mut sweep = tokio::time::interval(self.sweep_interval);
        sweep.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Skip);
        // The first tick fires immediately; consume it.
        sweep.tick().await;

        loop {
            tokio::select! {
                event = self.channel.receive() => {
                    match event {
                        Ok(inbound) => {
                            if let Err(e) = self.controller.handle_event(inbound).await {
                                error!(error = %e, "failed to handle inbound event");
                            }
                        }
                        Err(e) => {
                            error!(error = %e, "channel receive error");
                            // If the channel is closed, break out of the loop.
                            if e.to_string().contains("closed") {
                                break;
                            }
                        }
                    }
                }
                _ = sweep.tick() => {
                    let evicted = self.sessions.evict_idle(self.idle_timeout);
                    if evicted > 0 {
                        info!(
                            evicted,
                            active = self.sessions.active_count(),
                            "evicted idle sessions"
                        );
                    }
                }
                _ = cancel.cancelled() => {
                    info!("shutdown signal received, stopping intake loop");
                    break;
                }
            }
        }

        info!("intake loop stopped");
        Ok(())
    }
}
