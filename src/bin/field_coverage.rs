// src/bin/field_coverage.rs
//
// Prints how many rows of a local dataset export carry each estimate field,
// and how many of those also carry its margin of error. Handy for spotting
// measures that a new export batch silently dropped.

use acsplot::series;
use anyhow::{Context, Result};
use std::collections::BTreeMap;
use std::{env, fs};

fn main() -> Result<()> {
    let path = env::args()
        .nth(1)
        .context("usage: field_coverage <dataset.json>")?;

    let raw = fs::read_to_string(&path).with_context(|| format!("reading `{path}`"))?;
    let rows = series::parse_rows(&raw)?;

    let mut estimates: BTreeMap<String, usize> = BTreeMap::new();
    let mut margins: BTreeMap<String, usize> = BTreeMap::new();

    for row in &rows {
        for field in row.field_names() {
            // Estimate fields are lowercase by convention, so a leading 'M'
            // always marks a margin.
            match field.strip_prefix('M') {
                Some(twin) => *margins.entry(twin.to_string()).or_default() += 1,
                None => *estimates.entry(field.to_string()).or_default() += 1,
            }
        }
    }

    println!("{} rows in `{path}`", rows.len());
    println!("{:<60} {:>6} {:>6}", "field", "est", "moe");
    for (field, count) in &estimates {
        let moe_count = margins.get(field).copied().unwrap_or(0);
        println!("{field:<60} {count:>6} {moe_count:>6}");
    }

    Ok(())
}
