// SPDX-FileCopyrightText: 2026 Ombuds Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Recipient directory built from the submission log.
//!
//! Collapses all records to one entry per distinct user, keeping the most
//! recently seen non-placeholder name, contact, and category, and the most
//! recent submission timestamp.

use std::cmp::Ordering;

use ombuds_core::{DirectoryEntry, SubmissionRecord};

use crate::texts::UNKNOWN;

/// Build the deduplicated recipient directory.
///
/// Entries are sorted by descending most-recent timestamp; entries without
/// any timestamp sort last. RFC 3339 timestamps compare correctly as
/// strings within the same UTC offset.
pub fn build_directory(records: &[SubmissionRecord]) -> Vec<DirectoryEntry> {
    let mut entries: Vec<DirectoryEntry> = Vec::new();

    for record in records {
        match entries.iter_mut().find(|e| e.user_id == record.user_id) {
            None => entries.push(DirectoryEntry {
                user_id: record.user_id,
                name: field_or_unknown(&record.name),
                contact: field_or_unknown(&record.contact),
                last_category: field_or_unknown(&record.category),
                last_seen: record.submitted_at.clone(),
            }),
            Some(entry) => {
                if let Some(name) = non_placeholder(&record.name) {
                    entry.name = name;
                }
                if let Some(contact) = non_placeholder(&record.contact) {
                    entry.contact = contact;
                }
                if let Some(category) = non_placeholder(&record.category) {
                    entry.last_category = category;
                }
                if let Some(ts) = &record.submitted_at
                    && entry.last_seen.as_deref().is_none_or(|seen| ts.as_str() > seen)
                {
                    entry.last_seen = Some(ts.clone());
                }
            }
        }
    }

    // Stable sort keeps insertion order among equal timestamps.
    entries.sort_by(|a, b| match (&a.last_seen, &b.last_seen) {
        (None, None) => Ordering::Equal,
        (None, Some(_)) => Ordering::Greater,
        (Some(_), None) => Ordering::Less,
        (Some(x), Some(y)) => y.cmp(x),
    });

    entries
}

fn field_or_unknown(field: &Option<String>) -> String {
    field.clone().unwrap_or_else(|| UNKNOWN.to_string())
}

fn non_placeholder(field: &Option<String>) -> Option<String> {
    field.as_ref().filter(|v| v.as_str() != UNKNOWN).cloned()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(
        user_id: i64,
        name: Option<&str>,
        contact: Option<&str>,
        category: Option<&str>,
        ts: Option<&str>,
    ) -> SubmissionRecord {
        SubmissionRecord {
            category: category.map(String::from),
            name: name.map(String::from),
            contact: contact.map(String::from),
            message: Some("x".into()),
            is_secret: Some(false),
            submitted_at: ts.map(String::from),
            user_id,
            username: None,
        }
    }

    #[test]
    fn one_entry_per_distinct_user() {
        let records = vec![
            record(1, Some("A"), None, Some("Diniy"), Some("2026-01-01T00:00:00Z")),
            record(2, Some("B"), None, Some("Diniy"), Some("2026-01-02T00:00:00Z")),
            record(1, Some("A"), None, Some("Diniy"), Some("2026-01-03T00:00:00Z")),
        ];
        let dir = build_directory(&records);
        assert_eq!(dir.len(), 2);
    }

    #[test]
    fn placeholder_name_is_replaced_by_later_real_name() {
        let records = vec![
            record(42, Some("Noma'lum"), None, None, Some("2026-01-01T00:00:00Z")),
            record(42, Some("Vali"), None, None, Some("2026-01-02T00:00:00Z")),
        ];
        let dir = build_directory(&records);
        assert_eq!(dir.len(), 1);
        assert_eq!(dir[0].name, "Vali");
    }

    #[test]
    fn placeholder_never_overwrites_a_real_value() {
        let records = vec![
            record(42, Some("Vali"), Some("+99890"), Some("Diniy"), None),
            record(42, Some("Noma'lum"), Some("Noma'lum"), Some("Noma'lum"), None),
        ];
        let dir = build_directory(&records);
        assert_eq!(dir[0].name, "Vali");
        assert_eq!(dir[0].contact, "+99890");
        assert_eq!(dir[0].last_category, "Diniy");
    }

    #[test]
    fn missing_fields_show_placeholder() {
        let records = vec![record(7, None, None, None, None)];
        let dir = build_directory(&records);
        assert_eq!(dir[0].name, UNKNOWN);
        assert_eq!(dir[0].contact, UNKNOWN);
        assert_eq!(dir[0].last_category, UNKNOWN);
        assert!(dir[0].last_seen.is_none());
    }

    #[test]
    fn keeps_most_recent_timestamp_per_user() {
        let records = vec![
            record(1, Some("A"), None, None, Some("2026-01-05T00:00:00Z")),
            record(1, Some("A"), None, None, Some("2026-01-02T00:00:00Z")),
        ];
        let dir = build_directory(&records);
        assert_eq!(dir[0].last_seen.as_deref(), Some("2026-01-05T00:00:00Z"));
    }

    #[test]
    fn sorted_descending_with_missing_timestamps_last() {
        let records = vec![
            record(1, Some("Old"), None, None, Some("2026-01-01T00:00:00Z")),
            record(2, Some("None"), None, None, None),
            record(3, Some("New"), None, None, Some("2026-02-01T00:00:00Z")),
        ];
        let dir = build_directory(&records);
        let ids: Vec<i64> = dir.iter().map(|e| e.user_id).collect();
        assert_eq!(ids, vec![3, 1, 2]);
    }

    #[test]
    fn empty_records_give_empty_directory() {
        assert!(build_directory(&[]).is_empty());
    }
}
