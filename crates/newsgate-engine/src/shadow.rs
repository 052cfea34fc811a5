//! Cross-category shadow suppression.
//!
//! A tiered category with a broad lexicon tends to pick up stories that
//! belong to a more specific sibling. Medium-tier accepts that mention a
//! sibling's characteristic terms are dropped; important accepts always
//! survive.

use std::collections::BTreeMap;

use newsgate_core::{CategoryProfile, CategoryTag, Importance};

use crate::lexicon::{contains_any, lower_terms};

#[derive(Debug, Clone, Default)]
pub struct ShadowSuppressor {
    siblings: BTreeMap<CategoryTag, Vec<String>>,
}

impl ShadowSuppressor {
    #[must_use]
    pub fn from_profile(profile: &CategoryProfile) -> Self {
        let siblings = profile
            .shadow_lexicons
            .iter()
            .map(|(sibling, terms)| (sibling.clone(), lower_terms(terms)))
            .collect();
        Self { siblings }
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.siblings.is_empty()
    }

    /// The first sibling (in name order) whose lexicon appears in `text`.
    ///
    /// The current category is never considered its own shadow.
    #[must_use]
    pub fn shadowing_category(&self, current: &CategoryTag, text: &str) -> Option<&CategoryTag> {
        self.siblings
            .iter()
            .filter(|(sibling, _)| *sibling != current)
            .find(|(_, terms)| contains_any(text, terms))
            .map(|(sibling, _)| sibling)
    }

    /// Whether an accepted record of the given tier survives suppression.
    #[must_use]
    pub fn keep(&self, current: &CategoryTag, text: &str, importance: Option<Importance>) -> bool {
        match importance {
            Some(Importance::Important) | None => true,
            Some(Importance::Medium) => self.shadowing_category(current, text).is_none(),
            Some(Importance::Low) => false,
        }
    }
}
