//! Compare one ship's stats with a reference population from its own table.

use serde::Serialize;
use tracing::debug;

use crate::data::repository::ShipMatch;
use crate::data::vocabulary::{Attribute, Policy};
use crate::stats::descriptive::{competition_rank, mean, median, round_one_decimal};

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct StatSummary {
    /// The target ship's own value.
    pub value: f64,
    /// Population mean, rounded to one decimal.
    pub mean: f64,
    /// Population median, rounded to one decimal.
    pub median: f64,
    /// Competition rank within the population; `None` when the target falls
    /// outside it (below the class median under [`Policy::AboveMedian`]).
    pub rank: Option<usize>,
    /// Number of present values in the population.
    pub population_size: usize,
    /// Class median used as the cut-off by [`Policy::AboveMedian`].
    #[serde(skip_serializing_if = "Option::is_none")]
    pub threshold: Option<f64>,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum SummaryOutcome {
    Summary(StatSummary),
    /// The target ship has no value for this attribute.
    NotAvailable,
    /// The table has no column for this attribute.
    AttributeNotFound,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct AttributeSummary {
    pub attribute: Attribute,
    pub policy: Policy,
    pub outcome: SummaryOutcome,
}

impl AttributeSummary {
    pub fn summary(&self) -> Option<&StatSummary> {
        match &self.outcome {
            SummaryOutcome::Summary(summary) => Some(summary),
            _ => None,
        }
    }
}

/// Values of `attribute` making up the reference population for `policy`.
///
/// Also returns the class median when it is the population's cut-off.
pub fn reference_population(
    ship: &ShipMatch<'_>,
    attribute: Attribute,
    policy: Policy,
) -> (Vec<f64>, Option<f64>) {
    let records = ship.table.records();
    match policy {
        Policy::AllInClass => (ship.table.values(attribute), None),
        Policy::SameRarity => {
            let values = records
                .iter()
                .filter(|record| record.rarity == ship.record.rarity)
                .filter_map(|record| record.stat(attribute))
                .collect();
            (values, None)
        }
        Policy::AboveMedian => {
            let class_values = ship.table.values(attribute);
            let Some(threshold) = median(&class_values) else {
                return (Vec::new(), None);
            };
            let values = class_values
                .into_iter()
                .filter(|value| *value >= threshold)
                .collect();
            (values, Some(threshold))
        }
    }
}

fn summarize_attribute(ship: &ShipMatch<'_>, attribute: Attribute, policy: Policy) -> SummaryOutcome {
    if !ship.table.has_column(attribute) {
        return SummaryOutcome::AttributeNotFound;
    }
    let Some(value) = ship.record.stat(attribute) else {
        return SummaryOutcome::NotAvailable;
    };

    let (population, threshold) = reference_population(ship, attribute, policy);
    let (Some(population_mean), Some(population_median)) = (mean(&population), median(&population))
    else {
        return SummaryOutcome::NotAvailable;
    };
    let in_population = threshold.map_or(true, |cut| value >= cut);

    debug!(
        ship = %ship.record.name,
        attribute = attribute.token(),
        ?policy,
        population = population.len(),
        "summarized attribute"
    );

    SummaryOutcome::Summary(StatSummary {
        value,
        mean: round_one_decimal(population_mean),
        median: round_one_decimal(population_median),
        rank: in_population.then(|| competition_rank(value, &population)),
        population_size: population.len(),
        threshold: threshold.map(round_one_decimal),
    })
}

/// One summary per requested attribute, in request order.
pub fn summarize(ship: &ShipMatch<'_>, attributes: &[Attribute], policy: Policy) -> Vec<AttributeSummary> {
    attributes
        .iter()
        .map(|&attribute| AttributeSummary {
            attribute,
            policy,
            outcome: summarize_attribute(ship, attribute, policy),
        })
        .collect()
}

/// Summaries under every policy, grouped by policy.
pub fn summarize_all(ship: &ShipMatch<'_>, attributes: &[Attribute]) -> Vec<(Policy, Vec<AttributeSummary>)> {
    Policy::ALL
        .into_iter()
        .map(|policy| (policy, summarize(ship, attributes, policy)))
        .collect()
}
