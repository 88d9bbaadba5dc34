// src/tidy/mod.rs
//
// Reshapes wide survey rows into long-format records, one per
// (survey period × demographic group), ready for faceted charts.

pub mod age;
mod breakdowns;

pub use breakdowns::{
    disability_age_series, insurance_series, population_race_ethnicity_series, renter_series,
    unemployment_series, RaceGroup, RACE_GROUPS,
};

use serde::Serialize;
use std::collections::HashSet;

use crate::stats::Estimate;

/// One observation for one demographic group in one survey period.
///
/// Count breakdowns fill `amount`; share breakdowns fill `fraction`. The
/// margin of error belongs to whichever of the two is set.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TidyRecord {
    pub year: String,
    pub group: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub amount: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fraction: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub moe: Option<f64>,
}

impl TidyRecord {
    pub fn amount(year: &str, group: &str, estimate: Option<Estimate>) -> Self {
        TidyRecord {
            year: year.to_string(),
            group: group.to_string(),
            amount: estimate.map(|e| e.value),
            fraction: None,
            moe: estimate.map(|e| e.moe),
        }
    }

    pub fn fraction(year: &str, group: &str, estimate: Option<Estimate>) -> Self {
        TidyRecord {
            year: year.to_string(),
            group: group.to_string(),
            amount: None,
            fraction: estimate.map(|e| e.value),
            moe: estimate.map(|e| e.moe),
        }
    }

    /// Whether this record carries an observed value at all.
    pub fn has_observation(&self) -> bool {
        self.amount.is_some() || self.fraction.is_some()
    }
}

/// A reshaped breakdown: the long-format records plus the surviving group
/// order for legends and color scales.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TidySeries {
    pub records: Vec<TidyRecord>,
    pub groups: Vec<String>,
}

impl TidySeries {
    /// Keep the breakdown's fixed group order, minus any group with no valid
    /// observation across all periods. Records for dropped groups are dropped
    /// too; a group with zero observations must not appear with null values.
    fn from_records(mut records: Vec<TidyRecord>, order: &[&str]) -> TidySeries {
        let observed: HashSet<String> = records
            .iter()
            .filter(|r| r.has_observation())
            .map(|r| r.group.clone())
            .collect();

        let groups: Vec<String> = order
            .iter()
            .filter(|g| observed.contains(**g))
            .map(|g| g.to_string())
            .collect();

        records.retain(|r| observed.contains(r.group.as_str()));
        TidySeries { records, groups }
    }

    /// Records for a single group, in input (survey period) order.
    pub fn for_group<'a>(&'a self, group: &'a str) -> impl Iterator<Item = &'a TidyRecord> {
        self.records.iter().filter(move |r| r.group == group)
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}
