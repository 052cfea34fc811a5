//! Exact-key and near-duplicate removal over classified records.

use std::collections::{BTreeMap, BTreeSet, HashSet};

use chrono::{DateTime, FixedOffset, NaiveDate};
use newsgate_core::{ClassifiedRecord, ConfigError, DedupStrategy};
use strsim::normalized_levenshtein;

use crate::dates::parse_published;
use crate::normalize::{title_tokens, TitleCleaner};

/// Drop records whose `(title, url)` pair was already seen, keeping the
/// first occurrence. Returns the number removed.
pub fn dedup_exact(records: &mut Vec<ClassifiedRecord>) -> usize {
    let before = records.len();
    let mut seen: HashSet<(String, String)> = HashSet::new();
    records.retain(|r| seen.insert((r.record.title.clone(), r.record.url.clone())));
    before - records.len()
}

/// Near-duplicate suppression within calendar-day groups.
///
/// Each day is walked in order of instant (ties keep input order) against a
/// running list of kept titles. Records without a parsable `published`
/// date are their own group and always survive.
#[derive(Debug, Clone)]
pub struct NearDuplicateFilter {
    strategy: DedupStrategy,
    cleaner: TitleCleaner,
}

impl NearDuplicateFilter {
    /// `entity_variants` are stripped from titles before character comparison.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidPattern`] if the variant regex for
    /// `category` cannot be built.
    pub fn new(
        category: &str,
        strategy: DedupStrategy,
        entity_variants: &[String],
    ) -> Result<Self, ConfigError> {
        Ok(Self {
            strategy,
            cleaner: TitleCleaner::new(category, entity_variants)?,
        })
    }

    #[must_use]
    pub fn strategy(&self) -> DedupStrategy {
        self.strategy
    }

    /// Remove near-duplicates. Survivors keep their input order.
    #[must_use]
    pub fn apply(&self, records: Vec<ClassifiedRecord>) -> Vec<ClassifiedRecord> {
        let mut keep = vec![true; records.len()];

        let mut days: BTreeMap<NaiveDate, Vec<(DateTime<FixedOffset>, usize)>> =
            BTreeMap::new();
        for (idx, classified) in records.iter().enumerate() {
            if let Some(ts) = classified.record.published.as_deref().and_then(parse_published) {
                days.entry(ts.date_naive()).or_default().push((ts, idx));
            }
        }

        for members in days.values_mut() {
            members.sort_unstable();
            let order: Vec<usize> = members.iter().map(|(_, idx)| *idx).collect();
            for idx in self.duplicates_in(&records, &order) {
                keep[idx] = false;
            }
        }

        records
            .into_iter()
            .zip(keep)
            .filter_map(|(record, kept)| kept.then_some(record))
            .collect()
    }

    /// Indices within `order` judged duplicates of an earlier kept record.
    fn duplicates_in(&self, records: &[ClassifiedRecord], order: &[usize]) -> Vec<usize> {
        let mut dropped = Vec::new();
        match self.strategy {
            DedupStrategy::TokenOverlap { min_common } => {
                let mut kept: Vec<BTreeSet<String>> = Vec::new();
                for &idx in order {
                    let tokens = title_tokens(&records[idx].record.title);
                    if tokens.is_empty() {
                        continue;
                    }
                    let duplicate = kept
                        .iter()
                        .any(|k| k.intersection(&tokens).count() >= min_common);
                    if duplicate {
                        tracing::debug!(
                            title = %records[idx].record.title,
                            min_common,
                            "dropping near-duplicate by token overlap"
                        );
                        dropped.push(idx);
                    } else {
                        kept.push(tokens);
                    }
                }
            }
            DedupStrategy::CharRatio { threshold } => {
                let mut kept: Vec<String> = Vec::new();
                for &idx in order {
                    let cleaned = self.cleaner.clean(&records[idx].record.title);
                    if cleaned.is_empty() {
                        continue;
                    }
                    let duplicate = kept
                        .iter()
                        .any(|k| normalized_levenshtein(k, &cleaned) > threshold);
                    if duplicate {
                        tracing::debug!(
                            title = %records[idx].record.title,
                            threshold,
                            "dropping near-duplicate by character ratio"
                        );
                        dropped.push(idx);
                    } else {
                        kept.push(cleaned);
                    }
                }
            }
        }
        dropped
    }
}

#[cfg(test)]
#[path = "dedup_test.rs"]
mod tests;
