// src/series/mod.rs

use anyhow::{Context, Result};
use once_cell::sync::Lazy;
use regex::Regex;
use serde_json::Value;
use std::collections::HashMap;

use crate::stats::{self, Estimate};

/// Prefix that marks a field as the margin of error for its unprefixed twin,
/// e.g. `Mtenure__renter` is the margin of error for `tenure__renter`.
const MOE_PREFIX: &str = "M";

/// One wide survey record: a single geography for a single survey period.
///
/// Estimate fields follow the `<category>__<subgroup>__<measure>` naming
/// convention from the upstream data exports. Only present numeric values
/// are kept; nulls in the source JSON are dropped at parse time, so a field
/// lookup returning `None` always means "not collected for this period".
///
/// The `M`-prefix pairing is resolved here and nowhere else; everything
/// above this boundary works with [`Estimate`] pairs.
#[derive(Debug, Clone)]
pub struct SeriesRow {
    pub geography: String,
    pub year: String,
    fields: HashMap<String, f64>,
}

impl SeriesRow {
    pub fn from_fields(
        geography: impl Into<String>,
        year: impl Into<String>,
        fields: HashMap<String, f64>,
    ) -> Self {
        SeriesRow {
            geography: geography.into(),
            year: year.into(),
            fields,
        }
    }

    /// The raw value of a field, if it was present in the source row.
    pub fn value(&self, field: &str) -> Option<f64> {
        self.fields.get(field).copied()
    }

    /// The margin of error recorded for `field`, if any.
    pub fn moe(&self, field: &str) -> Option<f64> {
        self.fields.get(&format!("{MOE_PREFIX}{field}")).copied()
    }

    /// The field's value paired with its margin of error.
    ///
    /// A present value with no recorded margin gets `moe = 0.0`, which keeps
    /// it out of any downstream sum of squares.
    pub fn estimate(&self, field: &str) -> Option<Estimate> {
        let value = self.value(field)?;
        Some(Estimate::new(value, self.moe(field).unwrap_or(0.0)))
    }

    /// Sum several fields into one estimate (root-sum-of-squares margins).
    /// `None` when none of the fields are present.
    pub fn sum_fields(&self, fields: &[&str]) -> Option<Estimate> {
        stats::sum(fields.iter().map(|f| self.estimate(f)))
    }

    /// Derived proportion of summed numerator fields over summed denominator
    /// fields, with the ratio margin of error.
    pub fn proportion_of(&self, numerator: &[&str], denominator: &[&str]) -> Option<Estimate> {
        stats::proportion(self.sum_fields(numerator), self.sum_fields(denominator))
    }

    /// Every field name present in this row, margins included.
    pub fn field_names(&self) -> impl Iterator<Item = &str> {
        self.fields.keys().map(String::as_str)
    }

    /// Final calendar year of the survey period label
    /// (`"2018-2022"` → 2022, `"2010"` → 2010).
    pub fn end_year(&self) -> Option<i32> {
        static END_YEAR: Lazy<Regex> = Lazy::new(|| Regex::new(r"(\d{4})\s*$").unwrap());
        END_YEAR
            .captures(&self.year)
            .and_then(|caps| caps[1].parse().ok())
    }
}

/// Parse a dataset export: a JSON array of wide row objects.
///
/// String metadata picks the geography label (neighborhood name, else
/// GISJOIN/GEOID) and the survey period; every numeric member becomes a
/// field. Null and non-numeric members are dropped.
pub fn parse_rows(raw: &str) -> Result<Vec<SeriesRow>> {
    let parsed: Value = serde_json::from_str(raw).context("dataset is not valid JSON")?;
    let items = parsed
        .as_array()
        .context("dataset root is not a JSON array")?;

    let mut rows = Vec::with_capacity(items.len());
    for (index, item) in items.iter().enumerate() {
        let object = item
            .as_object()
            .with_context(|| format!("row {index} is not a JSON object"))?;

        let geography = ["neighborhood_name", "GISJOIN", "GEOID"]
            .iter()
            .find_map(|key| object.get(*key).and_then(Value::as_str))
            .with_context(|| format!("row {index} has no geography label"))?
            .to_string();

        let year = object
            .get("year_range")
            .or_else(|| object.get("year"))
            .map(label)
            .with_context(|| format!("row {index} has no survey period"))?;

        let fields = object
            .iter()
            .filter_map(|(key, value)| value.as_f64().map(|v| (key.clone(), v)))
            .collect();

        rows.push(SeriesRow::from_fields(geography, year, fields));
    }

    Ok(rows)
}

/// Survey periods arrive as strings (`"2018-2022"`) in ACS exports and as
/// bare numbers (`2020`) in decennial exports.
fn label(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}
