//! Statistics over resolved ships: per-policy summaries and two-ship deltas.

pub mod compare;
pub mod descriptive;
pub mod summary;

pub use compare::{compare, AttributeDelta, ComparisonReport, DeltaOutcome};
pub use summary::{
    reference_population, summarize, summarize_all, AttributeSummary, StatSummary, SummaryOutcome,
};
