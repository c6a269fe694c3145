//! Local file knowledge source
//!
//! JSON or YAML (by extension) with a `headers` list and `rows` given either
//! as cell lists in header order or as field maps:
//!
//! ```yaml
//! headers: [Question, Answer]
//! rows:
//!   - [What are your hours?, 9am-5pm]
//!   - Question: Do you deliver?
//!     Answer: Yes, within the city
//! ```

use async_trait::async_trait;
use serde::Deserialize;
use std::path::{Path, PathBuf};

use support_agent_core::{Error, KnowledgeEntry, KnowledgeSnapshot, KnowledgeSource, Result};

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum FileRow {
    Cells(Vec<String>),
    Fields(KnowledgeEntry),
}

#[derive(Debug, Deserialize)]
struct FileTable {
    headers: Vec<String>,
    #[serde(default)]
    rows: Vec<FileRow>,
}

impl FileTable {
    fn into_snapshot(self) -> Result<KnowledgeSnapshot> {
        let headers: Vec<String> = self.headers.iter().map(|h| h.trim().to_string()).collect();
        if headers.iter().all(|h| h.is_empty()) {
            return Err(Error::KnowledgeSource("knowledge file has no headers".into()));
        }

        let rows = self
            .rows
            .into_iter()
            .map(|row| match row {
                FileRow::Cells(cells) => headers
                    .iter()
                    .enumerate()
                    .map(|(i, h)| {
                        let value = cells.get(i).map(|c| c.trim()).unwrap_or_default();
                        (h.clone(), value.to_string())
                    })
                    .collect(),
                FileRow::Fields(entry) => headers
                    .iter()
                    .map(|h| (h.clone(), entry.get(h).unwrap_or_default().trim().to_string()))
                    .collect(),
            })
            .collect();

        Ok(KnowledgeSnapshot::new(headers, rows))
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
enum Format {
    Json,
    Yaml,
}

pub struct FileSource {
    path: PathBuf,
}

impl FileSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn format(&self) -> Format {
        match self.path.extension().and_then(|e| e.to_str()) {
            Some(ext) if ext.eq_ignore_ascii_case("yaml") || ext.eq_ignore_ascii_case("yml") => {
                Format::Yaml
            }
            _ => Format::Json,
        }
    }
}

fn parse_table(content: &str, format: Format) -> Result<KnowledgeSnapshot> {
    let table: FileTable = match format {
        Format::Json => serde_json::from_str(content)
            .map_err(|e| Error::KnowledgeSource(format!("invalid knowledge JSON: {}", e)))?,
        Format::Yaml => serde_yaml::from_str(content)
            .map_err(|e| Error::KnowledgeSource(format!("invalid knowledge YAML: {}", e)))?,
    };
    table.into_snapshot()
}

#[async_trait]
impl KnowledgeSource for FileSource {
    async fn fetch(&self) -> Result<KnowledgeSnapshot> {
        let content = tokio::fs::read_to_string(&self.path).await.map_err(|e| {
            Error::KnowledgeSource(format!("{}: {}", self.path.display(), e))
        })?;
        let snapshot = parse_table(&content, self.format())?;
        tracing::info!(
            entries = snapshot.len(),
            path = %self.path.display(),
            "Read knowledge file"
        );
        Ok(snapshot)
    }

    fn name(&self) -> &str {
        "file"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_json_cells() {
        let snapshot = parse_table(
            r#"{"headers": ["Question", "Answer"], "rows": [["Hours?", " 9-5 "], ["Parking?"]]}"#,
            Format::Json,
        )
        .unwrap();
        assert_eq!(snapshot.len(), 2);
        assert_eq!(snapshot.rows[0].get("Answer"), Some("9-5"));
        assert_eq!(snapshot.rows[1].get("Answer"), Some(""));
    }

    #[test]
    fn test_yaml_mixed_rows() {
        let yaml = "headers: [Question, Answer]\nrows:\n  - [What are your hours?, 9am-5pm]\n  - Question: Do you deliver?\n    Answer: Yes\n";
        let snapshot = parse_table(yaml, Format::Yaml).unwrap();
        assert_eq!(snapshot.rows[1].get("Question"), Some("Do you deliver?"));
        assert!(snapshot.raw_content.contains("- Answer: Yes"));
    }

    #[test]
    fn test_missing_headers_rejected() {
        assert!(parse_table(r#"{"headers": [" "], "rows": []}"#, Format::Json).is_err());
        assert!(parse_table(r#"{"rows": []}"#, Format::Json).is_err());
    }

    #[tokio::test]
    async fn test_fetch_from_disk() {
        let mut file = tempfile::Builder::new().suffix(".yml").tempfile().unwrap();
        writeln!(file, "headers: [Question, Answer]").unwrap();
        writeln!(file, "rows:\n  - [Hours?, 9-5]").unwrap();

        let source = FileSource::new(file.path());
        let snapshot = source.fetch().await.unwrap();
        assert_eq!(snapshot.rows[0].get("Answer"), Some("9-5"));
    }

    #[tokio::test]
    async fn test_missing_file() {
        let source = FileSource::new("/nonexistent/knowledge.json");
        assert!(matches!(source.fetch().await, Err(Error::KnowledgeSource(_))));
    }
}
