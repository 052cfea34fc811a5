use std::collections::{BTreeMap, HashSet};
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::records::CategoryTag;
use crate::ConfigError;

/// Which part of a record a category's lexicons are matched against.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchScope {
    Title,
    #[default]
    TitleAndSnippet,
}

/// A co-mention lexicon: at least one term must appear before keyword
/// scoring runs (rival names, deal objects).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ContextLexicon {
    pub terms: Vec<String>,
    /// When set, a monetary match satisfies the gate on its own.
    #[serde(default)]
    pub money_counts: bool,
}

/// How a category turns lexicon hits into an accept/reject decision.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "shape", rename_all = "snake_case")]
pub enum Acceptance {
    /// Accept when `hits >= min_hits`, when a single hit is corroborated by
    /// a monetary match, or when a single hit co-occurs with a trigger term.
    Threshold {
        min_hits: usize,
        #[serde(default)]
        triggers: Vec<String>,
    },
    /// Strong terms mark a record `important`, weak terms `medium`; anything
    /// else is `low` and rejected.
    Tiered {
        #[serde(default)]
        strong_negative: Vec<String>,
        #[serde(default)]
        strong_positive: Vec<String>,
        #[serde(default)]
        weak: Vec<String>,
    },
}

impl Acceptance {
    #[must_use]
    pub fn is_tiered(&self) -> bool {
        matches!(self, Acceptance::Tiered { .. })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DedupMethod {
    TokenOverlap,
    CharRatio,
}

/// Per-profile near-duplicate settings as written in `profiles.yaml`.
///
/// Omitted parameters fall back to [`DedupDefaults`].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DedupSettings {
    pub method: DedupMethod,
    #[serde(default)]
    pub min_common: Option<usize>,
    #[serde(default)]
    pub threshold: Option<f64>,
}

/// Fallback dedup parameters, normally taken from [`crate::AppConfig`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DedupDefaults {
    pub min_common: usize,
    pub ratio_threshold: f64,
}

impl Default for DedupDefaults {
    fn default() -> Self {
        Self {
            min_common: 4,
            ratio_threshold: 0.75,
        }
    }
}

/// A fully-resolved near-duplicate strategy.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum DedupStrategy {
    /// Drop a title sharing at least `min_common` normalized tokens with a kept title.
    TokenOverlap { min_common: usize },
    /// Drop a title whose similarity ratio to a kept title exceeds `threshold`.
    CharRatio { threshold: f64 },
}

impl DedupStrategy {
    /// Resolve optional per-profile settings against the defaults.
    ///
    /// A profile without a `dedup` block uses token overlap.
    #[must_use]
    pub fn resolve(settings: Option<&DedupSettings>, defaults: DedupDefaults) -> Self {
        match settings {
            Some(DedupSettings {
                method: DedupMethod::CharRatio,
                threshold,
                ..
            }) => DedupStrategy::CharRatio {
                threshold: threshold.unwrap_or(defaults.ratio_threshold),
            },
            Some(DedupSettings {
                method: DedupMethod::TokenOverlap,
                min_common,
                ..
            }) => DedupStrategy::TokenOverlap {
                min_common: min_common.unwrap_or(defaults.min_common),
            },
            None => DedupStrategy::TokenOverlap {
                min_common: defaults.min_common,
            },
        }
    }
}

impl std::fmt::Display for DedupStrategy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DedupStrategy::TokenOverlap { min_common } => {
                write!(f, "token_overlap(min_common={min_common})")
            }
            DedupStrategy::CharRatio { threshold } => {
                write!(f, "char_ratio(threshold={threshold})")
            }
        }
    }
}

/// Lexicon configuration for one category.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CategoryProfile {
    pub name: CategoryTag,
    #[serde(default)]
    pub scope: MatchScope,
    /// Hard gate: a record mentioning none of these is rejected. Empty means
    /// the input is already scoped to the entity.
    #[serde(default)]
    pub entity_variants: Vec<String>,
    /// Regexes that reject a record outright, regardless of keyword hits.
    #[serde(default)]
    pub exclude_patterns: Vec<String>,
    /// Substring lexicon; each distinct entry found counts as one hit.
    #[serde(default)]
    pub keywords: Vec<String>,
    /// Regex lexicon; each matching pattern counts as one hit.
    #[serde(default)]
    pub keyword_patterns: Vec<String>,
    #[serde(default)]
    pub money_pattern: Option<String>,
    #[serde(default)]
    pub context: Option<ContextLexicon>,
    pub acceptance: Acceptance,
    /// Sibling category name -> that category's core terms. Used to veto
    /// medium-tier accepts.
    #[serde(default)]
    pub shadow_lexicons: BTreeMap<CategoryTag, Vec<String>>,
    #[serde(default)]
    pub dedup: Option<DedupSettings>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ProfilesFile {
    pub profiles: Vec<CategoryProfile>,
}

impl ProfilesFile {
    #[must_use]
    pub fn get(&self, name: &CategoryTag) -> Option<&CategoryProfile> {
        self.profiles.iter().find(|p| &p.name == name)
    }
}

/// Load and validate category profiles from a YAML file.
///
/// # Errors
///
/// Returns `ConfigError` if the file cannot be read, parsed, or fails validation.
pub fn load_profiles(path: &Path) -> Result<ProfilesFile, ConfigError> {
    let content = std::fs::read_to_string(path).map_err(|e| ConfigError::ProfilesFileIo {
        path: path.display().to_string(),
        source: e,
    })?;

    parse_profiles(&content)
}

/// Parse and validate category profiles from YAML text.
///
/// # Errors
///
/// Returns `ConfigError` if the YAML is malformed or a profile fails validation.
pub fn parse_profiles(yaml: &str) -> Result<ProfilesFile, ConfigError> {
    let profiles_file: ProfilesFile = serde_yaml::from_str(yaml)?;
    validate_profiles(&profiles_file)?;
    Ok(profiles_file)
}

fn validate_profiles(profiles_file: &ProfilesFile) -> Result<(), ConfigError> {
    if profiles_file.profiles.is_empty() {
        return Err(ConfigError::Validation(
            "at least one category profile is required".to_string(),
        ));
    }

    let mut seen_names = HashSet::new();
    for profile in &profiles_file.profiles {
        let name = profile.name.as_str();
        if name.trim().is_empty() {
            return Err(ConfigError::Validation(
                "category name must be non-empty".to_string(),
            ));
        }
        if !seen_names.insert(name.to_lowercase()) {
            return Err(ConfigError::Validation(format!(
                "duplicate category name: '{name}'"
            )));
        }
        validate_profile(profile)?;
    }

    Ok(())
}

fn validate_profile(profile: &CategoryProfile) -> Result<(), ConfigError> {
    let name = profile.name.as_str();

    reject_blank_terms(name, "entity_variants", &profile.entity_variants)?;
    reject_blank_terms(name, "keywords", &profile.keywords)?;

    match &profile.acceptance {
        Acceptance::Threshold { min_hits, triggers } => {
            if *min_hits == 0 {
                return Err(ConfigError::Validation(format!(
                    "category '{name}' has min_hits 0; must be at least 1"
                )));
            }
            if profile.keywords.is_empty() && profile.keyword_patterns.is_empty() {
                return Err(ConfigError::Validation(format!(
                    "category '{name}' uses threshold acceptance but has no keywords or keyword_patterns"
                )));
            }
            reject_blank_terms(name, "triggers", triggers)?;
            if !profile.shadow_lexicons.is_empty() {
                return Err(ConfigError::Validation(format!(
                    "category '{name}' declares shadow_lexicons but only tiered categories are shadowed"
                )));
            }
        }
        Acceptance::Tiered {
            strong_negative,
            strong_positive,
            weak,
        } => {
            if strong_negative.is_empty() && strong_positive.is_empty() {
                return Err(ConfigError::Validation(format!(
                    "tiered category '{name}' requires a strong_negative or strong_positive lexicon"
                )));
            }
            if weak.is_empty() {
                return Err(ConfigError::Validation(format!(
                    "tiered category '{name}' requires a weak lexicon"
                )));
            }
            reject_blank_terms(name, "strong_negative", strong_negative)?;
            reject_blank_terms(name, "strong_positive", strong_positive)?;
            reject_blank_terms(name, "weak", weak)?;
            if !profile.keywords.is_empty() || !profile.keyword_patterns.is_empty() {
                return Err(ConfigError::Validation(format!(
                    "tiered category '{name}' does not score keywords or keyword_patterns"
                )));
            }
            let money_is_context = profile.context.as_ref().is_some_and(|c| c.money_counts);
            if profile.money_pattern.is_some() && !money_is_context {
                return Err(ConfigError::Validation(format!(
                    "tiered category '{name}' has a money_pattern that only context.money_counts could use"
                )));
            }
        }
    }

    if let Some(context) = &profile.context {
        if context.terms.is_empty() {
            return Err(ConfigError::Validation(format!(
                "category '{name}' declares a context lexicon with no terms"
            )));
        }
        if context.money_counts && profile.money_pattern.is_none() {
            return Err(ConfigError::Validation(format!(
                "category '{name}' counts money as context but has no money_pattern"
            )));
        }
        reject_blank_terms(name, "context.terms", &context.terms)?;
    }

    for (sibling, terms) in &profile.shadow_lexicons {
        if terms.is_empty() {
            return Err(ConfigError::Validation(format!(
                "category '{name}' has an empty shadow lexicon for '{sibling}'"
            )));
        }
        reject_blank_terms(name, "shadow_lexicons", terms)?;
    }

    if let Some(dedup) = &profile.dedup {
        match dedup.method {
            DedupMethod::TokenOverlap if dedup.threshold.is_some() => {
                return Err(ConfigError::Validation(format!(
                    "category '{name}' sets dedup threshold but token_overlap only reads min_common"
                )));
            }
            DedupMethod::CharRatio if dedup.min_common.is_some() => {
                return Err(ConfigError::Validation(format!(
                    "category '{name}' sets dedup min_common but char_ratio only reads threshold"
                )));
            }
            _ => {}
        }
        if dedup.min_common == Some(0) {
            return Err(ConfigError::Validation(format!(
                "category '{name}' has dedup min_common 0; must be at least 1"
            )));
        }
        if let Some(threshold) = dedup.threshold {
            if !(threshold > 0.0 && threshold <= 1.0) {
                return Err(ConfigError::Validation(format!(
                    "category '{name}' has dedup threshold {threshold}; must be in (0, 1]"
                )));
            }
        }
    }

    Ok(())
}

fn reject_blank_terms(category: &str, field: &str, terms: &[String]) -> Result<(), ConfigError> {
    if terms.iter().any(|t| t.trim().is_empty()) {
        return Err(ConfigError::Validation(format!(
            "category '{category}' has a blank entry in {field}"
        )));
    }
    Ok(())
}

#[cfg(test)]
#[path = "profiles_test.rs"]
mod tests;
