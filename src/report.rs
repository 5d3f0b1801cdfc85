//! Text and JSON rendering of lookup results.

use std::fmt;

use serde::Serialize;

use crate::data::repository::ShipMatch;
use crate::data::vocabulary::{Attribute, Policy, Rarity};
use crate::stats::{summarize, AttributeSummary, ComparisonReport, DeltaOutcome, SummaryOutcome};

const LABEL_WIDTH: usize = 16;

/// Stat values are mostly integers; print them without a trailing `.0`.
pub fn format_value(value: f64) -> String {
    let value = (value * 100.0).round() / 100.0;
    if value.fract() == 0.0 {
        format!("{value:.0}")
    } else {
        format!("{value}")
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct PolicySection {
    pub policy: Policy,
    pub summaries: Vec<AttributeSummary>,
}

/// Everything printed for one "explore" request.
#[derive(Debug, Clone, Serialize)]
pub struct ExploreReport {
    pub ship: String,
    pub table: String,
    pub rarity: Rarity,
    pub hull_type: String,
    pub sections: Vec<PolicySection>,
}

impl ExploreReport {
    pub fn new(ship: &ShipMatch<'_>, attributes: &[Attribute], policies: &[Policy]) -> Self {
        let sections = policies
            .iter()
            .map(|&policy| PolicySection {
                policy,
                summaries: summarize(ship, attributes, policy),
            })
            .collect();
        ExploreReport {
            ship: ship.record.name.clone(),
            table: ship.table.key.to_string(),
            rarity: ship.record.rarity,
            hull_type: ship.record.hull_type.clone(),
            sections,
        }
    }
}

impl fmt::Display for ExploreReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{} ({} {}, {})", self.ship, self.rarity, self.hull_type, self.table)?;
        for section in &self.sections {
            writeln!(f)?;
            writeln!(f, "Compared with {}:", section.policy.label())?;
            for summary in &section.summaries {
                write!(f, "  {:<width$}", summary.attribute.column_name(), width = LABEL_WIDTH)?;
                match &summary.outcome {
                    SummaryOutcome::Summary(stat) => {
                        write!(
                            f,
                            "value {:>6}  mean {:>7.1}  median {:>7.1}  ",
                            format_value(stat.value),
                            stat.mean,
                            stat.median
                        )?;
                        match (stat.rank, stat.threshold) {
                            (Some(rank), _) => writeln!(f, "rank {rank}/{}", stat.population_size)?,
                            (None, Some(threshold)) => writeln!(
                                f,
                                "unranked (below class median {threshold:.1}; {} ships above)",
                                stat.population_size
                            )?,
                            (None, None) => writeln!(f, "unranked")?,
                        }
                    }
                    SummaryOutcome::NotAvailable => writeln!(f, "not available")?,
                    SummaryOutcome::AttributeNotFound => writeln!(f, "attribute not found in table")?,
                }
            }
        }
        Ok(())
    }
}

impl fmt::Display for ComparisonReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(note) = self.cross_class_note() {
            writeln!(f, "{note}")?;
        }
        writeln!(f, "{} vs {}", self.first, self.second)?;
        for delta in &self.deltas {
            write!(f, "  {:<width$}", delta.attribute.column_name(), width = LABEL_WIDTH)?;
            match delta.outcome {
                DeltaOutcome::Skipped { .. } => writeln!(f, "skipped: missing value")?,
                DeltaOutcome::Equal { value } => writeln!(f, "equal ({})", format_value(value))?,
                DeltaOutcome::FirstGreater { first, second, delta } => writeln!(
                    f,
                    "{} higher by {} ({} vs {})",
                    self.first,
                    format_value(delta),
                    format_value(first),
                    format_value(second)
                )?,
                DeltaOutcome::SecondGreater { first, second, delta } => writeln!(
                    f,
                    "{} higher by {} ({} vs {})",
                    self.second,
                    format_value(delta),
                    format_value(first),
                    format_value(second)
                )?,
            }
        }
        Ok(())
    }
}
