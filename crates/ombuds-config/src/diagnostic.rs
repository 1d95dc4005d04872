// SPDX-FileCopyrightText: 2026 Ombuds Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Figment-to-miette error bridge.
//!
//! Turns Figment deserialization failures into miette diagnostics: unknown
//! keys get a source span pointing at the offending TOML line, the list of
//! keys the section accepts, and a Jaro-Winkler "did you mean?" suggestion.

#![allow(unused_assignments)] // miette's Diagnostic derive generates code triggering this lint

use miette::{Diagnostic, NamedSource, SourceSpan};
use thiserror::Error;

/// Minimum Jaro-Winkler similarity for a "did you mean" suggestion.
/// High enough to filter noise, low enough to catch a dropped letter
/// (`bot_tken`) or a missing underscore (`admin_chatid`).
const SUGGESTION_THRESHOLD: f64 = 0.75;

/// A configuration error carrying whatever context was recoverable from
/// figment: key name, suggestion, span, and the blamed source file.
#[derive(Debug, Error, Diagnostic)]
pub enum ConfigError {
    /// A key the target section does not accept.
    #[error("unknown configuration key `{key}`")]
    #[diagnostic(
        code(ombuds::config::unknown_key),
        help("{}", unknown_key_help(suggestion.as_deref(), valid_keys))
    )]
    UnknownKey {
        key: String,
        /// Closest valid key, when one is close enough.
        suggestion: Option<String>,
        /// Comma-joined keys the section accepts.
        valid_keys: String,
        #[label("this key is not recognized")]
        span: Option<SourceSpan>,
        #[source_code]
        src: Option<NamedSource<String>>,
    },

    /// A value of the wrong TOML type.
    #[error("invalid type for key `{key}`: {detail}")]
    #[diagnostic(
        code(ombuds::config::invalid_type),
        help("expected {expected}")
    )]
    InvalidType {
        key: String,
        detail: String,
        expected: String,
        #[label("wrong type here")]
        span: Option<SourceSpan>,
        #[source_code]
        src: Option<NamedSource<String>>,
    },

    /// A required key with no value from any source.
    #[error("missing required key `{key}`")]
    #[diagnostic(
        code(ombuds::config::missing_key),
        help("add `{key} = <value>` to your ombuds.toml")
    )]
    MissingKey { key: String },

    /// A semantic constraint violated by an otherwise well-formed value.
    #[error("validation error: {message}")]
    #[diagnostic(code(ombuds::config::validation))]
    Validation { message: String },

    /// Anything figment reports that has no richer mapping.
    #[error("configuration error: {0}")]
    #[diagnostic(code(ombuds::config::other))]
    Other(String),
}

fn unknown_key_help(suggestion: Option<&str>, valid_keys: &str) -> String {
    match suggestion {
        Some(s) => format!("did you mean `{s}`? Valid keys: {valid_keys}"),
        None => format!("valid keys: {valid_keys}"),
    }
}

/// Convert a `figment::Error` (which may aggregate several failures) into
/// one `ConfigError` per failure.
pub fn figment_to_config_errors(
    err: figment::Error,
    toml_sources: &[(String, String)],
) -> Vec<ConfigError> {
    use figment::error::Kind;

    err.into_iter()
        .map(|error| match &error.kind {
            Kind::UnknownField(field, expected) => {
                let (span, src) = span_for_key(&error, field, toml_sources);
                ConfigError::UnknownKey {
                    key: field.clone(),
                    suggestion: suggest_key(field, expected),
                    valid_keys: expected.join(", "),
                    span,
                    src,
                }
            }
            Kind::MissingField(field) => ConfigError::MissingKey {
                key: field.clone().into_owned(),
            },
            Kind::InvalidType(actual, expected) => ConfigError::InvalidType {
                key: error.path.join("."),
                detail: format!("found {actual}, expected {expected}"),
                expected: expected.to_string(),
                span: None,
                src: None,
            },
            _ => ConfigError::Other(error.to_string()),
        })
        .collect()
}

/// Resolve a span for `key` in whichever TOML file figment blamed.
///
/// Env-var and default providers have no file source, so both halves stay
/// `None` and miette renders the diagnostic without a snippet.
fn span_for_key(
    error: &figment::Error,
    key: &str,
    toml_sources: &[(String, String)],
) -> (Option<SourceSpan>, Option<NamedSource<String>>) {
    let blamed = error
        .metadata
        .as_ref()
        .and_then(|m| m.source.as_ref())
        .and_then(|s| match s {
            figment::Source::File(path) => Some(path.display().to_string()),
            _ => None,
        });
    let Some(path) = blamed else {
        return (None, None);
    };
    let Some((name, content)) = toml_sources.iter().find(|(p, _)| *p == path) else {
        return (None, None);
    };

    let section = error.path.first().map(String::as_str);
    match locate_key(content, section, key) {
        Some(offset) => (
            Some(SourceSpan::new(offset.into(), key.len())),
            Some(NamedSource::new(name, content.clone())),
        ),
        None => (None, None),
    }
}

/// Byte offset of `key` at the start of a line, inside `[section]` if given.
///
/// The config is one level deep, so a linear scan is enough: after the
/// wanted section header the first `key =` line wins, and any later
/// `[...]` header ends the section.
fn locate_key(content: &str, section: Option<&str>, key: &str) -> Option<usize> {
    let mut in_section = section.is_none();
    let mut offset = 0;

    for line in content.split_inclusive('\n') {
        let trimmed = line.trim();
        if trimmed.starts_with('[') {
            in_section = section.is_some_and(|s| trimmed == format!("[{s}]"));
        } else if in_section {
            let indent = line.len() - line.trim_start().len();
            if let Some(after) = line[indent..].strip_prefix(key)
                && after.trim_start().starts_with('=')
            {
                return Some(offset + indent);
            }
        }
        offset += line.len();
    }

    None
}

/// Closest valid key by Jaro-Winkler similarity, if any scores above the
/// threshold.
pub fn suggest_key(unknown: &str, valid_keys: &[&str]) -> Option<String> {
    valid_keys
        .iter()
        .map(|key| (strsim::jaro_winkler(unknown, key), *key))
        .filter(|(score, _)| *score > SUGGESTION_THRESHOLD)
        .max_by(|a, b| a.0.total_cmp(&b.0))
        .map(|(_, key)| key.to_string())
}

/// Render diagnostics to stderr through miette's graphical handler.
pub fn render_errors(errors: &[ConfigError]) {
    let handler = miette::GraphicalReportHandler::new();
    for error in errors {
        let mut rendered = String::new();
        if handler
            .render_report(&mut rendered, error as &dyn Diagnostic)
            .is_ok()
        {
            eprint!("{rendered}");
        } else {
            eprintln!("Error: {error}");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn suggest_bot_tken_for_bot_token() {
        let valid = &["bot_token", "admin_chat_id", "admin_password"];
        assert_eq!(
            suggest_key("bot_tken", valid),
            Some("bot_token".to_string())
        );
    }

    #[test]
    fn suggest_admin_chatid_for_admin_chat_id() {
        let valid = &["bot_token", "admin_chat_id", "admin_password"];
        assert_eq!(
            suggest_key("admin_chatid", valid),
            Some("admin_chat_id".to_string())
        );
    }

    #[test]
    fn no_suggestion_for_distant_typo() {
        let valid = &["name", "log_level"];
        assert_eq!(suggest_key("zzzzzz", valid), None);
    }

    #[test]
    fn locate_key_inside_section() {
        let content = "[telegram]\nbot_tken = \"123:abc\"\n";
        let offset = locate_key(content, Some("telegram"), "bot_tken").unwrap();
        assert_eq!(&content[offset..offset + 8], "bot_tken");
    }

    #[test]
    fn locate_key_ignores_other_sections() {
        let content = "[server]\nport = 8080\n\n[session]\nport = 1\n";
        let offset = locate_key(content, Some("session"), "port").unwrap();
        assert_eq!(&content[offset..offset + 4], "port");
        assert!(offset > content.find("[session]").unwrap());
    }

    #[test]
    fn locate_key_at_top_level_stops_at_first_header() {
        let content = "name = \"ombuds\"\n[bot]\nname = \"other\"\n";
        assert_eq!(locate_key(content, None, "name"), Some(0));
        assert_eq!(locate_key(content, Some("storage"), "name"), None);
    }
}
