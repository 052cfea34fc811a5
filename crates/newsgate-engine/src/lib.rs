//! Classification and deduplication engine for newsgate.
//!
//! Takes candidate news items per (category, time window), filters them
//! through data-driven category classifiers, optionally suppresses
//! medium-confidence accepts that belong to a sibling category, and
//! removes exact and near-duplicate stories before handing back one
//! category-tagged result table.

pub mod classifier;
pub mod dates;
pub mod dedup;
pub mod diagnostics;
pub mod error;
pub mod lexicon;
pub mod normalize;
pub mod pipeline;
pub mod shadow;

pub use classifier::{Classifier, Rejection, Verdict};
pub use dedup::{dedup_exact, NearDuplicateFilter};
pub use diagnostics::{DedupStats, DiagnosticsSink, NoopSink, TracingSink, WindowStats};
pub use error::EngineError;
pub use lexicon::CategoryLexicon;
pub use pipeline::{DedupReport, Engine, EngineOptions, ResultTable, RunReport, WindowReport};
pub use shadow::ShadowSuppressor;
