//! Knowledge base data shapes

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// One knowledge row: field name to value.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct KnowledgeEntry {
    fields: HashMap<String, String>,
}

impl KnowledgeEntry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style insert
    pub fn with(mut self, field: impl Into<String>, value: impl Into<String>) -> Self {
        self.insert(field, value);
        self
    }

    pub fn insert(&mut self, field: impl Into<String>, value: impl Into<String>) {
        self.fields.insert(field.into(), value.into());
    }

    /// Field lookup; exact name first, then case-insensitive
    pub fn get(&self, field: &str) -> Option<&str> {
        if let Some(v) = self.fields.get(field) {
            return Some(v.as_str());
        }
        self.fields
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(field))
            .map(|(_, v)| v.as_str())
    }

    /// Values of all fields, unordered
    pub fn values(&self) -> impl Iterator<Item = &str> {
        self.fields.values().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for KnowledgeEntry {
    fn from_iter<T: IntoIterator<Item = (K, V)>>(iter: T) -> Self {
        Self {
            fields: iter.into_iter().map(|(k, v)| (k.into(), v.into())).collect(),
        }
    }
}

/// A complete knowledge base as fetched from a source.
///
/// Either fully present or absent; stores swap whole snapshots.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct KnowledgeSnapshot {
    /// Field names in source order
    pub headers: Vec<String>,
    pub rows: Vec<KnowledgeEntry>,
    /// Plain-text rendering used as a prompt excerpt
    #[serde(default)]
    pub raw_content: String,
}

impl KnowledgeSnapshot {
    pub fn new(headers: Vec<String>, rows: Vec<KnowledgeEntry>) -> Self {
        let raw_content = render_raw_content(&headers, &rows);
        Self {
            headers,
            rows,
            raw_content,
        }
    }

    /// Build from a table whose first row holds the headers.
    ///
    /// Cells are trimmed; short rows leave missing fields empty.
    pub fn from_table(table: &[Vec<String>]) -> Option<Self> {
        let (header_row, data) = table.split_first()?;
        let headers: Vec<String> = header_row.iter().map(|h| h.trim().to_string()).collect();
        if headers.iter().all(|h| h.is_empty()) {
            return None;
        }

        let rows = data
            .iter()
            .map(|row| {
                headers
                    .iter()
                    .enumerate()
                    .map(|(i, h)| {
                        let value = row.get(i).map(|c| c.trim()).unwrap_or_default();
                        (h.clone(), value.to_string())
                    })
                    .collect()
            })
            .collect();

        Some(Self::new(headers, rows))
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

fn render_raw_content(headers: &[String], rows: &[KnowledgeEntry]) -> String {
    let mut out = format!("Available information categories: {}\n\n", headers.join(", "));
    for (i, row) in rows.iter().enumerate() {
        out.push_str(&format!("Entry {}:\n", i + 1));
        for header in headers {
            if let Some(value) = row.get(header).filter(|v| !v.is_empty()) {
                out.push_str(&format!("- {}: {}\n", header, value));
            }
        }
        out.push('\n');
    }
    out
}

/// Outcome of a topical relevance check
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RelevanceResult {
    pub is_relevant: bool,
    /// 0..=100
    pub confidence: u8,
    #[serde(default)]
    pub reasoning: Option<String>,
}

impl RelevanceResult {
    /// Fail-closed value: unknown is treated as "can't answer"
    pub fn not_relevant() -> Self {
        Self {
            is_relevant: false,
            confidence: 0,
            reasoning: None,
        }
    }

    /// Relevant and at least `min_confidence`
    pub fn is_answerable(&self, min_confidence: u8) -> bool {
        self.is_relevant && self.confidence >= min_confidence
    }
}
