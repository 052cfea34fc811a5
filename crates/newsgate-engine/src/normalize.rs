//! Text normalization shared by the classifier and the dedup engine.

use std::collections::BTreeSet;
use std::sync::LazyLock;

use newsgate_core::{CandidateRecord, ConfigError, MatchScope};
use regex::Regex;

/// Minimum token length kept by [`title_tokens`].
pub const MIN_TOKEN_LEN: usize = 3;

/// Function words ignored when comparing titles by token overlap.
pub const STOPWORDS: &[&str] = &[
    "the", "a", "an", "and", "or", "but", "if", "on", "in", "at", "for", "to", "of", "by", "with",
    "about", "from", "up", "out", "over", "after", "before", "between", "under", "into", "through",
    "during", "without", "within", "against", "among",
];

static TOKEN_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\w+").expect("valid regex"));
static NON_ALNUM_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[^a-z0-9 ]").expect("valid regex"));
static WHITESPACE_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\s+").expect("valid regex"));

/// Lower-cased text a category's lexicons are matched against.
///
/// With [`MatchScope::TitleAndSnippet`] the title and snippet are joined by a
/// single space; an empty snippet contributes nothing.
#[must_use]
pub fn match_text(record: &CandidateRecord, scope: MatchScope) -> String {
    match scope {
        MatchScope::Title => record.title.to_lowercase(),
        MatchScope::TitleAndSnippet => format!(
            "{} {}",
            record.title.to_lowercase(),
            record.snippet.to_lowercase()
        ),
    }
}

/// Canonical token set of a title for overlap comparison.
///
/// Tokens are lower-cased word runs. Stopwords, tokens shorter than
/// [`MIN_TOKEN_LEN`] characters, and all-digit tokens are dropped.
#[must_use]
pub fn title_tokens(title: &str) -> BTreeSet<String> {
    let lowered = title.to_lowercase();
    TOKEN_RE
        .find_iter(&lowered)
        .map(|m| m.as_str())
        .filter(|w| !STOPWORDS.contains(w))
        .filter(|w| w.chars().count() >= MIN_TOKEN_LEN)
        .filter(|w| !w.chars().all(char::is_numeric))
        .map(str::to_string)
        .collect()
}

/// Strips entity name variants from titles before character comparison, so
/// two headlines are not judged similar merely for naming the same company.
#[derive(Debug, Clone)]
pub struct TitleCleaner {
    variants: Option<Regex>,
}

impl TitleCleaner {
    /// Build a cleaner that removes the given variants as whole words.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidPattern`] if the combined variant regex
    /// cannot be built, e.g. when it exceeds the compiled size limit.
    pub fn new(category: &str, entity_variants: &[String]) -> Result<Self, ConfigError> {
        let mut escaped: Vec<String> = entity_variants
            .iter()
            .map(|v| clean_chars(&v.to_lowercase()))
            .filter(|v| !v.is_empty())
            .map(|v| regex::escape(&v))
            .collect();
        // Longest first so "nvidia corporation" wins over "nvidia".
        escaped.sort_by(|a, b| b.len().cmp(&a.len()).then_with(|| a.cmp(b)));
        escaped.dedup();

        if escaped.is_empty() {
            return Ok(Self { variants: None });
        }
        let pattern = format!(r"\b(?:{})\b", escaped.join("|"));
        let re = Regex::new(&pattern).map_err(|source| ConfigError::InvalidPattern {
            category: category.to_string(),
            pattern,
            source,
        })?;
        Ok(Self { variants: Some(re) })
    }

    /// Lower-case, replace non-alphanumerics with spaces, remove the entity
    /// variants, and collapse whitespace.
    #[must_use]
    pub fn clean(&self, title: &str) -> String {
        let mut cleaned = clean_chars(&title.to_lowercase());
        if let Some(re) = &self.variants {
            cleaned = re.replace_all(&cleaned, "").into_owned();
        }
        WHITESPACE_RE.replace_all(&cleaned, " ").trim().to_string()
    }
}

fn clean_chars(lowered: &str) -> String {
    NON_ALNUM_RE.replace_all(lowered, " ").into_owned()
}
