// src/tidy/age.rs
//
// The survey publishes age counts in uneven raw cells (five-year spans,
// single years at 20 and 21, split cells at 15-17/18-19 and 65-66/67-69).
// Everything here rolls those cells up into the coarser brackets the charts
// use, combining margins by root sum of squares.

use crate::series::SeriesRow;
use crate::stats::{self, Estimate};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Sex {
    Male,
    Female,
}

impl Sex {
    pub fn label(self) -> &'static str {
        match self {
            Sex::Male => "M",
            Sex::Female => "F",
        }
    }

    fn suffix(self) -> &'static str {
        match self {
            Sex::Male => "male",
            Sex::Female => "female",
        }
    }
}

/// Five-year pyramid brackets: (start age, end age, raw cells).
/// `None` for the end age marks the open-ended 85-and-over bracket.
pub const PYRAMID_BRACKETS: [(u8, Option<u8>, &[&str]); 18] = [
    (0, Some(5), &["under_5"]),
    (5, Some(10), &["5-9"]),
    (10, Some(15), &["10-14"]),
    (15, Some(20), &["15-17", "18-19"]),
    (20, Some(25), &["20", "21", "22-24"]),
    (25, Some(30), &["25-29"]),
    (30, Some(35), &["30-34"]),
    (35, Some(40), &["35-39"]),
    (40, Some(45), &["40-44"]),
    (45, Some(50), &["45-49"]),
    (50, Some(55), &["50-54"]),
    (55, Some(60), &["55-59"]),
    (60, Some(65), &["60-61", "62-64"]),
    (65, Some(70), &["65-66", "67-69"]),
    (70, Some(75), &["70-74"]),
    (75, Some(80), &["75-79"]),
    (80, Some(85), &["80-84"]),
    (85, None, &["85_over"]),
];

const SENIOR_CELLS: [&str; 6] = ["65-66", "67-69", "70-74", "75-79", "80-84", "85_over"];

const UNDER_18_CELLS: [&str; 4] = ["under_5", "5-9", "10-14", "15-17"];

fn cell_field(cell: &str, sex: Sex) -> String {
    format!("age__{cell}__{}", sex.suffix())
}

/// Sum the raw cells of one bracket for one sex.
pub fn bracket_estimate(row: &SeriesRow, sex: Sex, cells: &[&str]) -> Option<Estimate> {
    stats::sum(cells.iter().map(|cell| row.estimate(&cell_field(cell, sex))))
}

/// Sum the raw cells of one bracket across both sexes.
fn both_sexes(row: &SeriesRow, cells: &[&str]) -> Option<Estimate> {
    stats::sum(
        [Sex::Male, Sex::Female]
            .into_iter()
            .map(|sex| bracket_estimate(row, sex, cells)),
    )
}

/// Population 65 and over.
pub fn seniors(row: &SeriesRow) -> Option<Estimate> {
    both_sexes(row, &SENIOR_CELLS)
}

/// Population under 18.
pub fn under_18(row: &SeriesRow) -> Option<Estimate> {
    both_sexes(row, &UNDER_18_CELLS)
}

/// Children under age 5.
pub fn under_5(row: &SeriesRow) -> Option<Estimate> {
    both_sexes(row, &["under_5"])
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn row(pairs: &[(&str, f64)]) -> SeriesRow {
        let fields: HashMap<String, f64> =
            pairs.iter().map(|(k, v)| (k.to_string(), *v)).collect();
        SeriesRow::from_fields("Nicholtown", "2018-2022", fields)
    }

    #[test]
    fn split_cells_roll_up_with_rss_margin() {
        let row = row(&[
            ("age__65-66__male", 5.0),
            ("Mage__65-66__male", 3.0),
            ("age__67-69__male", 3.0),
            ("Mage__67-69__male", 4.0),
        ]);

        let bracket = bracket_estimate(&row, Sex::Male, &["65-66", "67-69"]).unwrap();
        assert_eq!(bracket.value, 8.0);
        assert!((bracket.moe - 25.0_f64.sqrt()).abs() < 1e-12);
    }

    #[test]
    fn partially_collected_bracket_uses_present_cells() {
        let row = row(&[("age__20__female", 7.0)]);
        let bracket = bracket_estimate(&row, Sex::Female, &["20", "21", "22-24"]).unwrap();
        assert_eq!(bracket.value, 7.0);
    }

    #[test]
    fn absent_bracket_is_no_data() {
        let row = row(&[]);
        assert_eq!(bracket_estimate(&row, Sex::Male, &["25-29"]), None);
        assert_eq!(seniors(&row), None);
    }

    #[test]
    fn seniors_spans_both_sexes() {
        let row = row(&[
            ("age__65-66__male", 5.0),
            ("age__67-69__male", 3.0),
            ("age__70-74__male", 2.0),
            ("age__65-66__female", 4.0),
            ("age__67-69__female", 2.0),
            ("age__85_over__female", 1.0),
        ]);
        assert_eq!(seniors(&row).unwrap().value, 17.0);
    }

    #[test]
    fn under_18_spans_the_four_child_cells() {
        let row = row(&[
            ("age__under_5__male", 10.0),
            ("age__5-9__male", 12.0),
            ("age__10-14__male", 11.0),
            ("age__15-17__male", 6.0),
            ("age__under_5__female", 9.0),
            ("age__5-9__female", 13.0),
            ("age__10-14__female", 10.0),
            ("age__15-17__female", 7.0),
        ]);
        assert_eq!(under_18(&row).unwrap().value, 78.0);
    }
}
