// SPDX-FileCopyrightText: 2026 Ombuds Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Configuration loader using Figment for layered config merging.
//!
//! Supports XDG hierarchy: `./ombuds.toml` > `~/.config/ombuds/ombuds.toml` > `/etc/ombuds/ombuds.toml`
//! with environment variable overrides via `OMBUDS_` prefix.

#![allow(clippy::result_large_err)] // figment::Error is external and cannot be boxed without wrapper

use std::path::Path;

use figment::{
    providers::{Env, Format, Serialized, Toml},
    Figment,
};

use crate::model::OmbudsConfig;

/// Load configuration from the standard XDG hierarchy with env var overrides.
///
/// Merge order (later overrides earlier):
/// 1. Compiled defaults
/// 2. `/etc/ombuds/ombuds.toml` (system-wide)
/// 3. `~/.config/ombuds/ombuds.toml` (user XDG config)
/// 4. `./ombuds.toml` (local directory)
/// 5. `OMBUDS_*` environment variables
pub fn load_config() -> Result<OmbudsConfig, figment::Error> {
    Figment::new()
        .merge(Serialized::defaults(OmbudsConfig::default()))
        .merge(Toml::file("/etc/ombuds/ombuds.toml"))
        .merge(Toml::file(
            dirs::config_dir()
                .map(|d| d.join("ombuds/ombuds.toml"))
                .unwrap_or_default(),
        ))
        .merge(Toml::file("ombuds.toml"))
        .merge(env_provider())
        .extract()
}

/// Load configuration from a TOML string only (no XDG lookup).
///
/// Used for testing and explicit config specification.
pub fn load_config_from_str(toml_content: &str) -> Result<OmbudsConfig, figment::Error> {
    Figment::new()
        .merge(Serialized::defaults(OmbudsConfig::default()))
        .merge(Toml::string(toml_content))
        .extract()
}

/// Load configuration from a specific file path with env var overrides.
pub fn load_config_from_path(path: &Path) -> Result<OmbudsConfig, figment::Error> {
    Figment::new()
        .merge(Serialized::defaults(OmbudsConfig::default()))
        .merge(Toml::file(path))
        .merge(env_provider())
        .extract()
}

/// Create the environment variable provider using explicit `map()` for section-to-dot mapping.
///
/// CRITICAL: Uses `Env::map()` NOT `Env::split("_")` to avoid ambiguity with
/// underscore-containing key names. For example, `OMBUDS_TELEGRAM_BOT_TOKEN` must
/// map to `telegram.bot_token`, not `telegram.bot.token`.
fn env_provider() -> Env {
    Env::prefixed("OMBUDS_").map(|key| {
        // The mapper sees the env var name as-is (prefix stripped, still
        // uppercase); lowercasing happens after the key path is emitted.
        // Example: OMBUDS_TELEGRAM_BOT_TOKEN -> "TELEGRAM_BOT_TOKEN"
        let key = key.as_str().to_ascii_lowercase();
        for section in ["bot", "telegram", "storage", "server", "session"] {
            // Anchored at the start so "bot" never splits telegram_bot_token.
            if let Some(rest) = key
                .strip_prefix(section)
                .and_then(|rest| rest.strip_prefix('_'))
            {
                return format!("{section}.{rest}").into();
            }
        }
        key.into()
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_load_without_any_source() {
        let config = load_config_from_str("").unwrap();
        assert_eq!(config.bot.name, "ombuds");
        assert_eq!(config.bot.log_level, "info");
        assert_eq!(config.server.host, "0.0.0.0");
        assert_eq!(config.server.port, 10000);
        assert_eq!(config.session.idle_timeout_secs, 3600);
        assert!(config.telegram.bot_token.is_none());
        assert!(config.telegram.admin_chat_id.is_none());
    }

    #[test]
    fn toml_overrides_defaults() {
        let config = load_config_from_str(
            r#"
[telegram]
bot_token = "123:abc"
admin_chat_id = 777
admin_password = "hunter2"

[server]
port = 8080

[session]
idle_timeout_secs = 60
"#,
        )
        .unwrap();
        assert_eq!(config.telegram.bot_token.as_deref(), Some("123:abc"));
        assert_eq!(config.telegram.admin_chat_id, Some(777));
        assert_eq!(config.telegram.admin_password.as_deref(), Some("hunter2"));
        assert_eq!(config.server.port, 8080);
        assert_eq!(config.session.idle_timeout_secs, 60);
        // Untouched sections keep their defaults.
        assert_eq!(config.server.host, "0.0.0.0");
        assert_eq!(config.session.sweep_interval_secs, 300);
    }

    #[test]
    fn env_vars_map_into_their_sections() {
        figment::Jail::expect_with(|jail| {
            jail.set_env("OMBUDS_TELEGRAM_BOT_TOKEN", "123:abc");
            jail.set_env("OMBUDS_TELEGRAM_ADMIN_CHAT_ID", "777");
            jail.set_env("OMBUDS_BOT_LOG_LEVEL", "debug");
            jail.set_env("OMBUDS_SESSION_IDLE_TIMEOUT_SECS", "120");
            let config: OmbudsConfig = Figment::new()
                .merge(Serialized::defaults(OmbudsConfig::default()))
                .merge(env_provider())
                .extract()?;
            assert_eq!(config.telegram.bot_token.as_deref(), Some("123:abc"));
            assert_eq!(config.telegram.admin_chat_id, Some(777));
            assert_eq!(config.bot.log_level, "debug");
            assert_eq!(config.session.idle_timeout_secs, 120);
            Ok(())
        });
    }

    #[test]
    fn env_vars_override_file_values() {
        figment::Jail::expect_with(|jail| {
            jail.set_env("OMBUDS_TELEGRAM_ADMIN_PASSWORD", "env-parol");
            jail.set_env("OMBUDS_SERVER_PORT", "9999");
            let config: OmbudsConfig = Figment::new()
                .merge(Serialized::defaults(OmbudsConfig::default()))
                .merge(Toml::string(
                    r#"
[telegram]
admin_password = "file-parol"

[server]
port = 8080
"#,
                ))
                .merge(env_provider())
                .extract()?;
            assert_eq!(config.telegram.admin_password.as_deref(), Some("env-parol"));
            assert_eq!(config.server.port, 9999);
            Ok(())
        });
    }

    #[test]
    fn unknown_key_is_rejected() {
        let result = load_config_from_str(
            r#"
[telegram]
bot_tken = "123:abc"
"#,
        );
        assert!(result.is_err());
    }
}
