//! Attribute-by-attribute comparison of two ships on raw values.

use serde::Serialize;

use crate::data::repository::ShipMatch;
use crate::data::vocabulary::{Attribute, HullClass};

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum DeltaOutcome {
    /// At least one of the two ships has no value for the attribute.
    Skipped {
        first: Option<f64>,
        second: Option<f64>,
    },
    Equal { value: f64 },
    /// `delta` is first − second.
    FirstGreater { first: f64, second: f64, delta: f64 },
    /// `delta` is second − first.
    SecondGreater { first: f64, second: f64, delta: f64 },
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct AttributeDelta {
    pub attribute: Attribute,
    #[serde(flatten)]
    pub outcome: DeltaOutcome,
}

impl AttributeDelta {
    /// first − second, or `None` when the attribute was skipped.
    pub fn signed_delta(&self) -> Option<f64> {
        match self.outcome {
            DeltaOutcome::Skipped { .. } => None,
            DeltaOutcome::Equal { .. } => Some(0.0),
            DeltaOutcome::FirstGreater { delta, .. } => Some(delta),
            DeltaOutcome::SecondGreater { delta, .. } => Some(-delta),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct ComparisonReport {
    pub first: String,
    pub second: String,
    pub first_class: HullClass,
    pub second_class: HullClass,
    pub deltas: Vec<AttributeDelta>,
}

impl ComparisonReport {
    /// Informational note when the two ships come from different hull classes.
    pub fn cross_class_note(&self) -> Option<String> {
        (self.first_class != self.second_class).then(|| {
            format!(
                "note: {} is a {} and {} is a {}; comparing across hull classes",
                self.first,
                self.first_class.display_name(),
                self.second,
                self.second_class.display_name()
            )
        })
    }
}

fn compare_values(first: Option<f64>, second: Option<f64>) -> DeltaOutcome {
    match (first, second) {
        (Some(first), Some(second)) if first == second => DeltaOutcome::Equal { value: first },
        (Some(first), Some(second)) if first > second => DeltaOutcome::FirstGreater {
            first,
            second,
            delta: first - second,
        },
        (Some(first), Some(second)) => DeltaOutcome::SecondGreater {
            first,
            second,
            delta: second - first,
        },
        (first, second) => DeltaOutcome::Skipped { first, second },
    }
}

/// Compare two resolved ships. A missing value skips only that attribute.
pub fn compare(first: &ShipMatch<'_>, second: &ShipMatch<'_>, attributes: &[Attribute]) -> ComparisonReport {
    let deltas = attributes
        .iter()
        .map(|&attribute| AttributeDelta {
            attribute,
            outcome: compare_values(first.record.stat(attribute), second.record.stat(attribute)),
        })
        .collect();

    ComparisonReport {
        first: first.record.name.clone(),
        second: second.record.name.clone(),
        first_class: first.class(),
        second_class: second.class(),
        deltas,
    }
}
