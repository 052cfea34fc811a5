use std::fmt;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Name of a topical category (`financial`, `reputation`, ...).
///
/// Categories are data, not code: any tag declared in `profiles.yaml` is valid.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CategoryTag(String);

impl CategoryTag {
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for CategoryTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(&self.0)
    }
}

impl From<&str> for CategoryTag {
    fn from(name: &str) -> Self {
        Self::new(name)
    }
}

/// A raw news item as supplied by a fetch collaborator.
///
/// `published` is kept as the feed's raw text; the engine parses it only
/// when it needs a calendar day for near-duplicate grouping.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CandidateRecord {
    #[serde(default)]
    pub title: String,
    /// Article summary or extracted body text. Empty when unavailable.
    #[serde(default)]
    pub snippet: String,
    #[serde(default)]
    pub url: String,
    #[serde(default)]
    pub published: Option<String>,
}

impl CandidateRecord {
    #[must_use]
    pub fn new(title: impl Into<String>, url: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            snippet: String::new(),
            url: url.into(),
            published: None,
        }
    }

    #[must_use]
    pub fn with_snippet(mut self, snippet: impl Into<String>) -> Self {
        self.snippet = snippet.into();
        self
    }

    #[must_use]
    pub fn with_published(mut self, published: impl Into<String>) -> Self {
        self.published = Some(published.into());
        self
    }

    /// A record without a title or URL cannot be classified or deduplicated.
    #[must_use]
    pub fn is_malformed(&self) -> bool {
        self.title.trim().is_empty() || self.url.trim().is_empty()
    }
}

/// Confidence tier assigned by tiered (reputation-style) categories.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Importance {
    Important,
    Medium,
    Low,
}

impl fmt::Display for Importance {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Importance::Important => write!(f, "important"),
            Importance::Medium => write!(f, "medium"),
            Importance::Low => write!(f, "low"),
        }
    }
}

/// A candidate that passed classification, tagged with its category.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClassifiedRecord {
    #[serde(flatten)]
    pub record: CandidateRecord,
    pub category: CategoryTag,
    /// Only populated for tiered categories.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub importance: Option<Importance>,
}

/// The date range a fetch query covered. Used for diagnostics only.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TimeWindow {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl TimeWindow {
    #[must_use]
    pub fn new(start: NaiveDate, end: NaiveDate) -> Self {
        Self { start, end }
    }
}

impl fmt::Display for TimeWindow {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}..{}", self.start, self.end)
    }
}

/// All candidates returned by one (category, time-window) fetch.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CandidateBatch {
    pub category: CategoryTag,
    pub window: TimeWindow,
    #[serde(default)]
    pub records: Vec<CandidateRecord>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn malformed_when_title_blank() {
        let record = CandidateRecord::new("   ", "https://example.com/a");
        assert!(record.is_malformed());
    }

    #[test]
    fn malformed_when_url_missing() {
        let record = CandidateRecord::new("Nvidia beats estimates", "");
        assert!(record.is_malformed());
    }

    #[test]
    fn empty_snippet_is_not_malformed() {
        let record = CandidateRecord::new("Nvidia beats estimates", "https://example.com/a");
        assert!(!record.is_malformed());
        assert!(record.snippet.is_empty());
    }

    #[test]
    fn candidate_deserializes_with_missing_fields() {
        let record: CandidateRecord =
            serde_json::from_str(r#"{"title": "Nvidia sued"}"#).unwrap();
        assert_eq!(record.title, "Nvidia sued");
        assert!(record.url.is_empty());
        assert!(record.published.is_none());
        assert!(record.is_malformed());
    }

    #[test]
    fn classified_record_flattens_candidate_fields() {
        let classified = ClassifiedRecord {
            record: CandidateRecord::new("Nvidia wins award", "https://example.com/b")
                .with_published("Tue, 03 Oct 2023 07:00:00 GMT"),
            category: CategoryTag::new("reputation"),
            importance: Some(Importance::Important),
        };
        let json = serde_json::to_value(&classified).unwrap();
        assert_eq!(json["title"], "Nvidia wins award");
        assert_eq!(json["category"], "reputation");
        assert_eq!(json["importance"], "important");
    }

    #[test]
    fn classified_record_omits_absent_importance() {
        let classified = ClassifiedRecord {
            record: CandidateRecord::new("Nvidia revenue up", "https://example.com/c"),
            category: CategoryTag::new("financial"),
            importance: None,
        };
        let json = serde_json::to_value(&classified).unwrap();
        assert!(json.get("importance").is_none());
    }

    #[test]
    fn time_window_display() {
        let window = TimeWindow::new(
            NaiveDate::from_ymd_opt(2024, 3, 1).unwrap(),
            NaiveDate::from_ymd_opt(2024, 3, 3).unwrap(),
        );
        assert_eq!(window.to_string(), "2024-03-01..2024-03-03");
    }

    #[test]
    fn importance_display() {
        assert_eq!(Importance::Important.to_string(), "important");
        assert_eq!(Importance::Medium.to_string(), "medium");
        assert_eq!(Importance::Low.to_string(), "low");
    }
}
