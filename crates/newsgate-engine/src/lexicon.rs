//! Compiled, read-only lexicons for one category.
//!
//! A [`CategoryLexicon`] is built once from a [`CategoryProfile`] at startup:
//! terms are lower-cased and de-duplicated, and every regex is compiled so a
//! bad pattern surfaces as a [`ConfigError`] before classification begins.

use std::collections::HashSet;

use newsgate_core::{Acceptance, CategoryProfile, CategoryTag, ConfigError, Importance, MatchScope};
use regex::{Regex, RegexBuilder};

#[derive(Debug, Clone)]
pub(crate) enum Rule {
    Threshold {
        min_hits: usize,
        triggers: Vec<String>,
    },
    Tiered {
        strong: Vec<String>,
        weak: Vec<String>,
    },
}

#[derive(Debug, Clone)]
pub struct CategoryLexicon {
    name: CategoryTag,
    scope: MatchScope,
    entity_variants: Vec<String>,
    exclude: Vec<Regex>,
    keywords: Vec<String>,
    keyword_patterns: Vec<Regex>,
    money: Option<Regex>,
    context_terms: Vec<String>,
    context_money_counts: bool,
    has_context: bool,
    rule: Rule,
}

impl CategoryLexicon {
    /// Compile a profile's lexicons.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidPattern`] if any regex fails to compile.
    pub fn compile(profile: &CategoryProfile) -> Result<Self, ConfigError> {
        let category = profile.name.as_str();
        let compile_all = |patterns: &[String]| -> Result<Vec<Regex>, ConfigError> {
            patterns.iter().map(|p| compile_pattern(category, p)).collect()
        };

        let rule = match &profile.acceptance {
            Acceptance::Threshold { min_hits, triggers } => Rule::Threshold {
                min_hits: *min_hits,
                triggers: lower_terms(triggers),
            },
            Acceptance::Tiered {
                strong_negative,
                strong_positive,
                weak,
            } => {
                let strong: Vec<String> = strong_negative
                    .iter()
                    .chain(strong_positive)
                    .cloned()
                    .collect();
                Rule::Tiered {
                    strong: lower_terms(&strong),
                    weak: lower_terms(weak),
                }
            }
        };

        Ok(Self {
            name: profile.name.clone(),
            scope: profile.scope,
            entity_variants: lower_terms(&profile.entity_variants),
            exclude: compile_all(&profile.exclude_patterns)?,
            keywords: lower_terms(&profile.keywords),
            keyword_patterns: compile_all(&profile.keyword_patterns)?,
            money: profile
                .money_pattern
                .as_deref()
                .map(|p| compile_pattern(category, p))
                .transpose()?,
            context_terms: profile
                .context
                .as_ref()
                .map(|c| lower_terms(&c.terms))
                .unwrap_or_default(),
            context_money_counts: profile.context.as_ref().is_some_and(|c| c.money_counts),
            has_context: profile.context.is_some(),
            rule,
        })
    }

    #[must_use]
    pub fn name(&self) -> &CategoryTag {
        &self.name
    }

    #[must_use]
    pub fn scope(&self) -> MatchScope {
        self.scope
    }

    #[must_use]
    pub fn entity_variants(&self) -> &[String] {
        &self.entity_variants
    }

    #[must_use]
    pub fn is_tiered(&self) -> bool {
        matches!(self.rule, Rule::Tiered { .. })
    }

    pub(crate) fn rule(&self) -> &Rule {
        &self.rule
    }

    /// True when no variants are configured or at least one is a substring.
    pub(crate) fn mentions_entity(&self, text: &str) -> bool {
        self.entity_variants.is_empty() || contains_any(text, &self.entity_variants)
    }

    /// The first exclusion pattern matching `text`, if any.
    pub(crate) fn excluded_by(&self, text: &str) -> Option<&str> {
        self.exclude
            .iter()
            .find(|re| re.is_match(text))
            .map(Regex::as_str)
    }

    pub(crate) fn has_money(&self, text: &str) -> bool {
        self.money.as_ref().is_some_and(|re| re.is_match(text))
    }

    pub(crate) fn context_satisfied(&self, text: &str, money: bool) -> bool {
        if !self.has_context {
            return true;
        }
        (self.context_money_counts && money) || contains_any(text, &self.context_terms)
    }

    /// Distinct keyword substrings plus distinct matching keyword patterns.
    pub(crate) fn keyword_hits(&self, text: &str) -> usize {
        let substring_hits = self
            .keywords
            .iter()
            .filter(|k| text.contains(k.as_str()))
            .count();
        let pattern_hits = self
            .keyword_patterns
            .iter()
            .filter(|re| re.is_match(text))
            .count();
        substring_hits + pattern_hits
    }

    /// Confidence tier for tiered categories; `None` for threshold categories.
    pub(crate) fn tier(&self, text: &str) -> Option<Importance> {
        match &self.rule {
            Rule::Tiered { strong, weak } => Some(if contains_any(text, strong) {
                Importance::Important
            } else if contains_any(text, weak) {
                Importance::Medium
            } else {
                Importance::Low
            }),
            Rule::Threshold { .. } => None,
        }
    }
}

pub(crate) fn contains_any(text: &str, terms: &[String]) -> bool {
    terms.iter().any(|t| text.contains(t.as_str()))
}

/// Lower-case and de-duplicate terms, keeping first-seen order.
pub(crate) fn lower_terms(terms: &[String]) -> Vec<String> {
    let mut seen = HashSet::new();
    terms
        .iter()
        .map(|t| t.to_lowercase())
        .filter(|t| seen.insert(t.clone()))
        .collect()
}

fn compile_pattern(category: &str, pattern: &str) -> Result<Regex, ConfigError> {
    RegexBuilder::new(pattern)
        .case_insensitive(true)
        .build()
        .map_err(|source| ConfigError::InvalidPattern {
            category: category.to_string(),
            pattern: pattern.to_string(),
            source,
        })
}
