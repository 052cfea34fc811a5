//! Rule-based category classifier.
//!
//! Checks run in a fixed order and stop at the first rejection:
//! entity gate, exclusion gate, context gate, then keyword scoring or
//! tiering. Exclusion is evaluated before any acceptance signal, so no
//! number of keyword hits can overturn it.

use std::fmt;

use newsgate_core::{CandidateRecord, CategoryProfile, CategoryTag, ConfigError, Importance};

use crate::lexicon::{contains_any, CategoryLexicon, Rule};
use crate::normalize::match_text;

/// Why a candidate was not accepted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Rejection {
    /// Missing title or URL.
    Malformed,
    /// No entity variant appears in the text.
    NoEntity,
    /// An exclusion pattern matched.
    Excluded { pattern: String },
    /// The category's co-mention lexicon found nothing.
    MissingContext,
    /// Too few keyword hits for a threshold category.
    InsufficientHits { hits: usize },
    /// Tiered category placed the record in the `low` tier.
    LowImportance,
    /// A medium-tier accept matched a sibling category's shadow lexicon.
    Shadowed { by: CategoryTag },
}

impl fmt::Display for Rejection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Rejection::Malformed => write!(f, "malformed record"),
            Rejection::NoEntity => write!(f, "entity not mentioned"),
            Rejection::Excluded { pattern } => write!(f, "excluded by '{pattern}'"),
            Rejection::MissingContext => write!(f, "no co-mention context"),
            Rejection::InsufficientHits { hits } => write!(f, "insufficient keyword hits ({hits})"),
            Rejection::LowImportance => write!(f, "low importance"),
            Rejection::Shadowed { by } => write!(f, "shadowed by '{by}'"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Verdict {
    Accepted { importance: Option<Importance> },
    Rejected(Rejection),
}

impl Verdict {
    #[must_use]
    pub fn is_accepted(&self) -> bool {
        matches!(self, Verdict::Accepted { .. })
    }

    #[must_use]
    pub fn importance(&self) -> Option<Importance> {
        match self {
            Verdict::Accepted { importance } => *importance,
            Verdict::Rejected(_) => None,
        }
    }

    #[must_use]
    pub fn rejection(&self) -> Option<&Rejection> {
        match self {
            Verdict::Rejected(reason) => Some(reason),
            Verdict::Accepted { .. } => None,
        }
    }
}

#[derive(Debug, Clone)]
pub struct Classifier {
    lexicon: CategoryLexicon,
}

impl Classifier {
    /// Build a classifier for one category profile.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidPattern`] if the profile has a bad regex.
    pub fn new(profile: &CategoryProfile) -> Result<Self, ConfigError> {
        Ok(Self {
            lexicon: CategoryLexicon::compile(profile)?,
        })
    }

    #[must_use]
    pub fn lexicon(&self) -> &CategoryLexicon {
        &self.lexicon
    }

    #[must_use]
    pub fn category(&self) -> &CategoryTag {
        self.lexicon.name()
    }

    /// Classify one candidate. Never fails: empty snippets simply score fewer hits.
    #[must_use]
    pub fn classify(&self, record: &CandidateRecord) -> Verdict {
        if record.is_malformed() {
            return Verdict::Rejected(Rejection::Malformed);
        }
        let text = match_text(record, self.lexicon.scope());
        self.classify_text(&text)
    }

    /// Classify already-normalized match text (see [`match_text`]).
    #[must_use]
    pub fn classify_text(&self, text: &str) -> Verdict {
        let lexicon = &self.lexicon;

        if !lexicon.mentions_entity(text) {
            return Verdict::Rejected(Rejection::NoEntity);
        }

        if let Some(pattern) = lexicon.excluded_by(text) {
            return Verdict::Rejected(Rejection::Excluded {
                pattern: pattern.to_string(),
            });
        }

        let money = lexicon.has_money(text);
        if !lexicon.context_satisfied(text, money) {
            return Verdict::Rejected(Rejection::MissingContext);
        }

        match lexicon.rule() {
            Rule::Threshold { min_hits, triggers } => {
                let hits = lexicon.keyword_hits(text);
                let corroborated = hits >= 1 && money;
                // A lone hit only counts when a high-specificity trigger is present.
                let triggered = hits == 1 && contains_any(text, triggers);
                if hits >= *min_hits || corroborated || triggered {
                    Verdict::Accepted { importance: None }
                } else {
                    Verdict::Rejected(Rejection::InsufficientHits { hits })
                }
            }
            Rule::Tiered { .. } => match lexicon.tier(text) {
                Some(Importance::Low) | None => Verdict::Rejected(Rejection::LowImportance),
                Some(tier) => Verdict::Accepted {
                    importance: Some(tier),
                },
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeMap;

    use newsgate_core::{Acceptance, ContextLexicon, MatchScope};

    use super::*;

    fn strings(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| (*s).to_string()).collect()
    }

    fn legal_profile() -> CategoryProfile {
        CategoryProfile {
            name: CategoryTag::new("legal"),
            scope: MatchScope::TitleAndSnippet,
            entity_variants: strings(&["nvidia", "nvda"]),
            exclude_patterns: strings(&[r"\bgaming\b", r"\bgraphics card\b"]),
            keywords: strings(&["lawsuit", "court", "fine", "sec", "probe", "ruling"]),
            keyword_patterns: vec![],
            money_pattern: None,
            context: None,
            acceptance: Acceptance::Threshold {
                min_hits: 2,
                triggers: strings(&["lawsuit", "probe"]),
            },
            shadow_lexicons: BTreeMap::new(),
            dedup: None,
        }
    }

    fn mna_profile() -> CategoryProfile {
        CategoryProfile {
            name: CategoryTag::new("mna"),
            keywords: strings(&["acquisition", "stake", "merger"]),
            money_pattern: Some(r"\$?\d+(\.\d+)?\s?(million|billion|bn|m)\b".to_string()),
            acceptance: Acceptance::Threshold {
                min_hits: 2,
                triggers: vec![],
            },
            ..legal_profile()
        }
    }

    fn reputation_profile() -> CategoryProfile {
        CategoryProfile {
            name: CategoryTag::new("reputation"),
            keywords: vec![],
            acceptance: Acceptance::Tiered {
                strong_negative: strings(&["scandal", "backlash"]),
                strong_positive: strings(&["award"]),
                weak: strings(&["viral", "ceo"]),
            },
            ..legal_profile()
        }
    }

    fn record(title: &str) -> CandidateRecord {
        CandidateRecord::new(title, "https://news.test/item")
    }

    #[test]
    fn rejects_without_entity_even_with_many_hits() {
        let classifier = Classifier::new(&legal_profile()).unwrap();
        let verdict = classifier.classify(&record("AMD lawsuit: court ruling and SEC probe"));
        assert_eq!(verdict, Verdict::Rejected(Rejection::NoEntity));
    }

    #[test]
    fn exclusion_beats_keyword_hits() {
        let classifier = Classifier::new(&legal_profile()).unwrap();
        let verdict = classifier
            .classify(&record("Nvidia gaming lawsuit heads to court after SEC probe"));
        assert!(
            matches!(verdict, Verdict::Rejected(Rejection::Excluded { ref pattern }) if pattern == r"\bgaming\b"),
            "got: {verdict:?}"
        );
    }

    #[test]
    fn accepts_at_min_hits() {
        let classifier = Classifier::new(&legal_profile()).unwrap();
        let verdict = classifier.classify(&record("Nvidia loses court ruling"));
        assert_eq!(verdict, Verdict::Accepted { importance: None });
    }

    #[test]
    fn single_hit_with_trigger_accepts() {
        let classifier = Classifier::new(&legal_profile()).unwrap();
        let verdict = classifier.classify(&record("Nvidia faces new probe"));
        assert!(verdict.is_accepted(), "got: {verdict:?}");
    }

    #[test]
    fn single_hit_without_trigger_rejects() {
        let classifier = Classifier::new(&legal_profile()).unwrap();
        let verdict = classifier.classify(&record("Nvidia pays fine"));
        assert_eq!(
            verdict,
            Verdict::Rejected(Rejection::InsufficientHits { hits: 1 })
        );
    }

    #[test]
    fn snippet_contributes_hits() {
        let classifier = Classifier::new(&legal_profile()).unwrap();
        let with_snippet =
            record("Nvidia pays fine").with_snippet("The court approved the settlement.");
        assert!(classifier.classify(&with_snippet).is_accepted());
    }

    #[test]
    fn single_hit_with_money_accepts() {
        let classifier = Classifier::new(&mna_profile()).unwrap();
        let verdict = classifier.classify(&record("Nvidia takes $200 million stake in startup"));
        assert!(verdict.is_accepted(), "got: {verdict:?}");
    }

    #[test]
    fn single_hit_without_money_rejects() {
        let classifier = Classifier::new(&mna_profile()).unwrap();
        let verdict = classifier.classify(&record("Nvidia takes stake in startup"));
        assert_eq!(
            verdict,
            Verdict::Rejected(Rejection::InsufficientHits { hits: 1 })
        );
    }

    #[test]
    fn money_alone_does_not_accept() {
        let classifier = Classifier::new(&mna_profile()).unwrap();
        let verdict = classifier.classify(&record("Nvidia spends $5 billion"));
        assert_eq!(
            verdict,
            Verdict::Rejected(Rejection::InsufficientHits { hits: 0 })
        );
    }

    #[test]
    fn context_gate_rejects_before_scoring() {
        let mut profile = legal_profile();
        profile.context = Some(ContextLexicon {
            terms: strings(&["amd", "intel"]),
            money_counts: false,
        });
        let classifier = Classifier::new(&profile).unwrap();
        assert_eq!(
            classifier.classify(&record("Nvidia lawsuit in court")),
            Verdict::Rejected(Rejection::MissingContext)
        );
        assert!(classifier
            .classify(&record("Nvidia and AMD lawsuit in court"))
            .is_accepted());
    }

    #[test]
    fn tiered_strong_is_important() {
        let classifier = Classifier::new(&reputation_profile()).unwrap();
        let verdict = classifier.classify(&record("Nvidia CEO wins award"));
        assert_eq!(verdict.importance(), Some(Importance::Important));
    }

    #[test]
    fn tiered_weak_is_medium() {
        let classifier = Classifier::new(&reputation_profile()).unwrap();
        let verdict = classifier.classify(&record("Nvidia CEO keynote goes viral"));
        assert_eq!(verdict.importance(), Some(Importance::Medium));
    }

    #[test]
    fn tiered_low_is_rejected() {
        let classifier = Classifier::new(&reputation_profile()).unwrap();
        let verdict = classifier.classify(&record("Nvidia opens new office"));
        assert_eq!(verdict, Verdict::Rejected(Rejection::LowImportance));
    }

    #[test]
    fn tiering_is_exhaustive() {
        let classifier = Classifier::new(&reputation_profile()).unwrap();
        for title in [
            "Nvidia scandal",
            "Nvidia award",
            "Nvidia viral",
            "Nvidia plain",
            "Nvidia",
        ] {
            let verdict = classifier.classify(&record(title));
            let tier = classifier.lexicon().tier(&title.to_lowercase());
            assert!(tier.is_some(), "tiered profile must always assign a tier");
            match tier {
                Some(Importance::Low) => {
                    assert_eq!(verdict, Verdict::Rejected(Rejection::LowImportance));
                }
                other => assert_eq!(verdict.importance(), other),
            }
        }
    }

    #[test]
    fn rejection_display() {
        assert_eq!(
            Rejection::InsufficientHits { hits: 1 }.to_string(),
            "insufficient keyword hits (1)"
        );
        assert_eq!(
            Rejection::Shadowed {
                by: CategoryTag::new("product")
            }
            .to_string(),
            "shadowed by 'product'"
        );
    }

    #[test]
    fn malformed_record_is_rejected() {
        let classifier = Classifier::new(&legal_profile()).unwrap();
        let verdict = classifier.classify(&CandidateRecord::new("Nvidia lawsuit court", ""));
        assert_eq!(verdict, Verdict::Rejected(Rejection::Malformed));
    }

    #[test]
    fn empty_snippet_never_panics() {
        let classifier = Classifier::new(&reputation_profile()).unwrap();
        let verdict = classifier.classify(&record("Nvidia").with_snippet(""));
        assert!(!verdict.is_accepted());
    }

    #[test]
    fn title_scope_ignores_snippet_hits() {
        let mut profile = legal_profile();
        profile.scope = MatchScope::Title;
        let classifier = Classifier::new(&profile).unwrap();
        let verdict = classifier
            .classify(&record("Nvidia pays fine").with_snippet("court ruling lawsuit"));
        assert_eq!(
            verdict,
            Verdict::Rejected(Rejection::InsufficientHits { hits: 1 })
        );
    }
}
