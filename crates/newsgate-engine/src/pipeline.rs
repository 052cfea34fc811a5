//! Result aggregation: classify every batch, merge windows per category,
//! then run exact-key and near-duplicate dedup in that order.

use newsgate_core::{
    AppConfig, CandidateBatch, CandidateRecord, CategoryTag, ClassifiedRecord, DedupDefaults,
    DedupStrategy, ProfilesFile, TimeWindow,
};
use serde::Serialize;

use crate::classifier::{Classifier, Rejection, Verdict};
use crate::dedup::{dedup_exact, NearDuplicateFilter};
use crate::diagnostics::{DedupStats, DiagnosticsSink, WindowStats};
use crate::error::EngineError;
use crate::normalize::match_text;
use crate::shadow::ShadowSuppressor;

/// Engine-wide switches that are not part of any one profile.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EngineOptions {
    /// When false, medium-tier accepts are never checked against sibling lexicons.
    pub shadow_suppression: bool,
    /// Fallbacks for profiles whose `dedup` block omits a parameter.
    pub dedup_defaults: DedupDefaults,
}

impl Default for EngineOptions {
    fn default() -> Self {
        Self {
            shadow_suppression: true,
            dedup_defaults: DedupDefaults::default(),
        }
    }
}

impl EngineOptions {
    #[must_use]
    pub fn from_app_config(config: &AppConfig) -> Self {
        Self {
            shadow_suppression: config.shadow_suppression,
            dedup_defaults: config.dedup_defaults(),
        }
    }
}

/// Final category-tagged records, in profile order then arrival order.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct ResultTable(Vec<ClassifiedRecord>);

impl ResultTable {
    #[must_use]
    pub fn records(&self) -> &[ClassifiedRecord] {
        &self.0
    }

    #[must_use]
    pub fn into_records(self) -> Vec<ClassifiedRecord> {
        self.0
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn for_category<'a>(
        &'a self,
        category: &'a CategoryTag,
    ) -> impl Iterator<Item = &'a ClassifiedRecord> + 'a {
        self.0.iter().filter(move |r| &r.category == category)
    }
}

impl IntoIterator for ResultTable {
    type Item = ClassifiedRecord;
    type IntoIter = std::vec::IntoIter<ClassifiedRecord>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WindowReport {
    pub category: CategoryTag,
    pub window: TimeWindow,
    pub stats: WindowStats,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DedupReport {
    pub category: CategoryTag,
    pub stats: DedupStats,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct RunReport {
    pub table: ResultTable,
    pub windows: Vec<WindowReport>,
    pub dedup: Vec<DedupReport>,
}

#[derive(Debug, Clone)]
struct CategoryPipeline {
    classifier: Classifier,
    shadow: ShadowSuppressor,
    near_dup: NearDuplicateFilter,
}

/// Compiled engine for every loaded profile.
#[derive(Debug, Clone)]
pub struct Engine {
    pipelines: Vec<CategoryPipeline>,
    shadow_suppression: bool,
}

impl Engine {
    /// Compile all profiles up front.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::Config`] if any profile has an invalid pattern
    /// or its entity variants cannot be compiled for title cleaning.
    /// No engine is produced in that case.
    pub fn new(profiles: &ProfilesFile, options: EngineOptions) -> Result<Self, EngineError> {
        let pipelines = profiles
            .profiles
            .iter()
            .map(|profile| -> Result<CategoryPipeline, EngineError> {
                let classifier = Classifier::new(profile)?;
                let strategy =
                    DedupStrategy::resolve(profile.dedup.as_ref(), options.dedup_defaults);
                let near_dup = NearDuplicateFilter::new(
                    profile.name.as_str(),
                    strategy,
                    classifier.lexicon().entity_variants(),
                )?;
                Ok(CategoryPipeline {
                    classifier,
                    shadow: ShadowSuppressor::from_profile(profile),
                    near_dup,
                })
            })
            .collect::<Result<Vec<_>, _>>()?;

        tracing::debug!(
            categories = pipelines.len(),
            shadow_suppression = options.shadow_suppression,
            "engine compiled"
        );

        Ok(Self {
            pipelines,
            shadow_suppression: options.shadow_suppression,
        })
    }

    /// Loaded categories in profile order.
    pub fn categories(&self) -> impl Iterator<Item = &CategoryTag> {
        self.pipelines.iter().map(|p| p.classifier.category())
    }

    #[must_use]
    pub fn dedup_strategy(&self, category: &CategoryTag) -> Option<DedupStrategy> {
        self.find(category).map(|p| p.near_dup.strategy())
    }

    #[must_use]
    pub fn is_tiered(&self, category: &CategoryTag) -> Option<bool> {
        self.find(category).map(|p| p.classifier.lexicon().is_tiered())
    }

    fn find(&self, category: &CategoryTag) -> Option<&CategoryPipeline> {
        self.pipelines
            .iter()
            .find(|p| p.classifier.category() == category)
    }

    fn pipeline(&self, category: &CategoryTag) -> Result<&CategoryPipeline, EngineError> {
        self.find(category)
            .ok_or_else(|| EngineError::UnknownCategory(category.clone()))
    }

    /// Classify one record and, if enabled, apply shadow suppression.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::UnknownCategory`] if no profile is loaded for `category`.
    pub fn evaluate(
        &self,
        category: &CategoryTag,
        record: &CandidateRecord,
    ) -> Result<Verdict, EngineError> {
        let pipeline = self.pipeline(category)?;
        Ok(self.evaluate_with(pipeline, record))
    }

    fn evaluate_with(&self, pipeline: &CategoryPipeline, record: &CandidateRecord) -> Verdict {
        let verdict = pipeline.classifier.classify(record);
        if !self.shadow_suppression {
            return verdict;
        }
        let Verdict::Accepted { importance } = verdict else {
            return verdict;
        };

        let category = pipeline.classifier.category();
        let text = match_text(record, pipeline.classifier.lexicon().scope());
        if pipeline.shadow.keep(category, &text, importance) {
            return verdict;
        }
        match pipeline.shadow.shadowing_category(category, &text) {
            Some(by) => Verdict::Rejected(Rejection::Shadowed { by: by.clone() }),
            None => Verdict::Rejected(Rejection::LowImportance),
        }
    }

    /// Classify a single batch without deduplicating it.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::UnknownCategory`] if the batch's category has no profile.
    pub fn classify_batch(
        &self,
        batch: &CandidateBatch,
    ) -> Result<(Vec<ClassifiedRecord>, WindowStats), EngineError> {
        let pipeline = self.pipeline(&batch.category)?;
        Ok(self.classify_with(pipeline, batch))
    }

    fn classify_with(
        &self,
        pipeline: &CategoryPipeline,
        batch: &CandidateBatch,
    ) -> (Vec<ClassifiedRecord>, WindowStats) {
        let mut stats = WindowStats {
            seen: batch.records.len(),
            ..WindowStats::default()
        };
        let mut accepted = Vec::new();

        for record in &batch.records {
            match self.evaluate_with(pipeline, record) {
                Verdict::Accepted { importance } => {
                    stats.accepted += 1;
                    accepted.push(ClassifiedRecord {
                        record: record.clone(),
                        category: batch.category.clone(),
                        importance,
                    });
                }
                Verdict::Rejected(Rejection::Malformed) => {
                    tracing::debug!(
                        category = %batch.category,
                        url = %record.url,
                        "skipping malformed record"
                    );
                    stats.malformed += 1;
                }
                Verdict::Rejected(Rejection::Shadowed { by }) => {
                    tracing::debug!(
                        category = %batch.category,
                        shadowed_by = %by,
                        title = %record.title,
                        "medium accept suppressed by sibling category"
                    );
                    stats.suppressed += 1;
                }
                Verdict::Rejected(_) => stats.rejected += 1,
            }
        }

        (accepted, stats)
    }

    /// Classify, merge and deduplicate all batches.
    ///
    /// Every batch category is checked before any record is classified.
    /// Categories are processed in profile order; within a category,
    /// batches are merged in the order given, which decides which copy
    /// survives exact-key dedup.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::UnknownCategory`] if any batch names a category
    /// with no loaded profile.
    pub fn run(
        &self,
        batches: &[CandidateBatch],
        sink: &dyn DiagnosticsSink,
    ) -> Result<RunReport, EngineError> {
        for batch in batches {
            self.pipeline(&batch.category)?;
        }

        let mut report = RunReport::default();
        let mut table = Vec::new();

        for pipeline in &self.pipelines {
            let category = pipeline.classifier.category();
            let mut merged = Vec::new();
            let mut any_batch = false;

            for batch in batches.iter().filter(|b| &b.category == category) {
                any_batch = true;
                let (accepted, stats) = self.classify_with(pipeline, batch);
                sink.window_processed(category, &batch.window, &stats);
                report.windows.push(WindowReport {
                    category: category.clone(),
                    window: batch.window,
                    stats,
                });
                merged.extend(accepted);
            }

            if !any_batch {
                continue;
            }

            let input = merged.len();
            let exact_removed = dedup_exact(&mut merged);
            let after_exact = merged.len();
            let survivors = pipeline.near_dup.apply(merged);
            let stats = DedupStats {
                input,
                exact_removed,
                near_removed: after_exact - survivors.len(),
                output: survivors.len(),
            };
            sink.dedup_completed(category, &stats);
            report.dedup.push(DedupReport {
                category: category.clone(),
                stats,
            });
            table.extend(survivors);
        }

        report.table = ResultTable(table);
        Ok(report)
    }
}

#[cfg(test)]
#[path = "pipeline_test.rs"]
mod tests;
