// src/tidy/breakdowns.rs

use super::{TidyRecord, TidySeries};
use crate::series::SeriesRow;

/// The fixed race split shared by the tenure, employment, and insurance
/// breakdowns.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RaceGroup {
    Overall,
    Black,
    White,
    Hispanic,
}

pub const RACE_GROUPS: [RaceGroup; 4] = [
    RaceGroup::Overall,
    RaceGroup::Black,
    RaceGroup::White,
    RaceGroup::Hispanic,
];

impl RaceGroup {
    pub fn label(self) -> &'static str {
        match self {
            RaceGroup::Overall => "Overall",
            RaceGroup::Black => "Black",
            RaceGroup::White => "White",
            RaceGroup::Hispanic => "Hispanic or Latino",
        }
    }

    /// Field-name infix for this group; `Overall` fields carry no infix
    /// (`tenure__renter` vs `tenure__black__renter`).
    fn infix(self) -> Option<&'static str> {
        match self {
            RaceGroup::Overall => None,
            RaceGroup::Black => Some("black"),
            RaceGroup::White => Some("white"),
            RaceGroup::Hispanic => Some("hispanic"),
        }
    }

    fn field(self, category: &str, measure: &str) -> String {
        match self.infix() {
            Some(race) => format!("{category}__{race}__{measure}"),
            None => format!("{category}__{measure}"),
        }
    }
}

/// Share of `part` out of `part + rest` for each race group and period.
///
/// The numerator is the `part` measure alone; the denominator sums both
/// measures. Groups whose fields never appear are dropped from the result.
fn race_fraction_series(data: &[SeriesRow], category: &str, part: &str, rest: &str) -> TidySeries {
    let mut records = Vec::with_capacity(data.len() * RACE_GROUPS.len());

    for row in data {
        for group in RACE_GROUPS {
            let part_field = group.field(category, part);
            let rest_field = group.field(category, rest);
            let derived = row.proportion_of(
                &[part_field.as_str()],
                &[part_field.as_str(), rest_field.as_str()],
            );
            records.push(TidyRecord::fraction(&row.year, group.label(), derived));
        }
    }

    TidySeries::from_records(records, &RACE_GROUPS.map(RaceGroup::label))
}

/// Households that rent instead of own, by race of householder.
pub fn renter_series(data: &[SeriesRow]) -> TidySeries {
    race_fraction_series(data, "tenure", "renter", "owner")
}

/// Unemployed share of the labor force, by race.
pub fn unemployment_series(data: &[SeriesRow]) -> TidySeries {
    race_fraction_series(data, "employment", "unemployed", "employed")
}

/// Population with health insurance coverage, by race.
pub fn insurance_series(data: &[SeriesRow]) -> TidySeries {
    race_fraction_series(data, "insurance_coverage", "with_insurance", "without_insurance")
}

const ETHNICITY_GROUPS: [&str; 5] = [
    "White (not Hispanic or Latino)",
    "Black (not Hispanic or Latino)",
    "Hispanic or Latino",
    "Other race (not Hispanic or Latino)",
    "Two or more races (not Hispanic or Latino)",
];

/// Small single-race cells the survey publishes separately, combined here
/// into one "Other race" bucket.
const OTHER_RACE_FIELDS: [&str; 4] = [
    "ethnicity__not_hispanic_or_latino__other_race",
    "ethnicity__not_hispanic_or_latino__amer_indian_alaskan_native",
    "ethnicity__not_hispanic_or_latino__asian",
    "ethnicity__not_hispanic_or_latino__pacific_islander",
];

/// Population counts by race and Hispanic/Latino ethnicity.
pub fn population_race_ethnicity_series(data: &[SeriesRow]) -> TidySeries {
    let mut records = Vec::with_capacity(data.len() * ETHNICITY_GROUPS.len());

    for row in data {
        records.push(TidyRecord::amount(
            &row.year,
            ETHNICITY_GROUPS[0],
            row.estimate("ethnicity__not_hispanic_or_latino__white"),
        ));
        records.push(TidyRecord::amount(
            &row.year,
            ETHNICITY_GROUPS[1],
            row.estimate("ethnicity__not_hispanic_or_latino__black"),
        ));
        records.push(TidyRecord::amount(
            &row.year,
            ETHNICITY_GROUPS[2],
            row.estimate("ethnicity__hispanic_or_latino"),
        ));
        records.push(TidyRecord::amount(
            &row.year,
            ETHNICITY_GROUPS[3],
            row.sum_fields(&OTHER_RACE_FIELDS),
        ));
        records.push(TidyRecord::amount(
            &row.year,
            ETHNICITY_GROUPS[4],
            row.estimate("ethnicity__not_hispanic_or_latino__two_or_more_races"),
        ));
    }

    TidySeries::from_records(records, &ETHNICITY_GROUPS)
}

/// Age brackets of the disability table: (group label, field cell).
const DISABILITY_BRACKETS: [(&str, &str); 6] = [
    ("<5", "under_5"),
    ("5-17", "5-17"),
    ("18-34", "18-34"),
    ("35-64", "35-64"),
    ("65-74", "65-74"),
    ("≥75", "75_over"),
];

/// Population with a disability, by age bracket. Male and female cells are
/// summed with root-sum-of-squares margins.
pub fn disability_age_series(data: &[SeriesRow]) -> TidySeries {
    let mut records = Vec::with_capacity(data.len() * DISABILITY_BRACKETS.len());

    for row in data {
        for (label, cell) in DISABILITY_BRACKETS {
            let male = format!("disability__{cell}__male");
            let female = format!("disability__{cell}__female");
            let total = row.sum_fields(&[male.as_str(), female.as_str()]);
            records.push(TidyRecord::amount(&row.year, label, total));
        }
    }

    TidySeries::from_records(records, &DISABILITY_BRACKETS.map(|(label, _)| label))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn row(year: &str, pairs: &[(&str, f64)]) -> SeriesRow {
        let fields: HashMap<String, f64> =
            pairs.iter().map(|(k, v)| (k.to_string(), *v)).collect();
        SeriesRow::from_fields("West Greenville", year, fields)
    }

    #[test]
    fn renter_series_overall_fraction_and_margin() {
        let data = vec![row(
            "2018-2022",
            &[
                ("tenure__renter", 300.0),
                ("tenure__owner", 700.0),
                ("Mtenure__renter", 20.0),
                ("Mtenure__owner", 30.0),
            ],
        )];

        let series = renter_series(&data);
        let overall = series.for_group("Overall").next().unwrap();

        assert!((overall.fraction.unwrap() - 0.3).abs() < 1e-12);

        // moe_den = sqrt(20^2 + 30^2); radicand = 400 - 0.09 * 1300.
        let expected = (400.0 - 0.09 * 1300.0_f64).sqrt() / 1000.0;
        assert!((overall.moe.unwrap() - expected).abs() < 1e-12);

        // Only the overall fields exist, so the race groups drop out.
        assert_eq!(series.groups, vec!["Overall"]);
    }

    #[test]
    fn all_null_race_group_is_excluded() {
        let data = vec![
            row(
                "2013-2017",
                &[
                    ("tenure__renter", 250.0),
                    ("tenure__owner", 750.0),
                    ("tenure__black__renter", 120.0),
                    ("tenure__black__owner", 180.0),
                    ("tenure__white__renter", 90.0),
                    ("tenure__white__owner", 410.0),
                ],
            ),
            row(
                "2018-2022",
                &[
                    ("tenure__renter", 300.0),
                    ("tenure__owner", 700.0),
                    ("tenure__black__renter", 140.0),
                    ("tenure__black__owner", 160.0),
                    ("tenure__white__renter", 100.0),
                    ("tenure__white__owner", 400.0),
                ],
            ),
        ];

        let series = renter_series(&data);
        assert_eq!(series.groups, vec!["Overall", "Black", "White"]);
        assert!(series.for_group("Hispanic or Latino").next().is_none());
    }

    #[test]
    fn unemployment_numerator_is_the_unemployed_cell() {
        let data = vec![row(
            "2018-2022",
            &[
                ("employment__employed", 900.0),
                ("employment__unemployed", 100.0),
            ],
        )];

        let series = unemployment_series(&data);
        let overall = series.for_group("Overall").next().unwrap();
        assert!((overall.fraction.unwrap() - 0.1).abs() < 1e-12);
    }

    #[test]
    fn missing_numerator_leaves_record_without_observation() {
        // Owner count exists but the renter cell was not collected.
        let data = vec![row("2009-2013", &[("tenure__owner", 500.0)])];
        let series = renter_series(&data);
        assert!(series.is_empty());
        assert!(series.groups.is_empty());
    }

    #[test]
    fn other_race_bucket_combines_cells_with_rss_margin() {
        let data = vec![row(
            "2018-2022",
            &[
                ("ethnicity__not_hispanic_or_latino__other_race", 10.0),
                ("Methnicity__not_hispanic_or_latino__other_race", 3.0),
                ("ethnicity__not_hispanic_or_latino__asian", 20.0),
                ("Methnicity__not_hispanic_or_latino__asian", 4.0),
            ],
        )];

        let series = population_race_ethnicity_series(&data);
        let other = series
            .for_group("Other race (not Hispanic or Latino)")
            .next()
            .unwrap();

        assert_eq!(other.amount, Some(30.0));
        assert!((other.moe.unwrap() - 25.0_f64.sqrt()).abs() < 1e-12);
    }

    #[test]
    fn disability_brackets_sum_sexes() {
        let data = vec![row(
            "2018-2022",
            &[
                ("disability__65-74__male", 12.0),
                ("Mdisability__65-74__male", 5.0),
                ("disability__65-74__female", 9.0),
                ("Mdisability__65-74__female", 4.0),
            ],
        )];

        let series = disability_age_series(&data);
        assert_eq!(series.groups, vec!["65-74"]);

        let bracket = series.for_group("65-74").next().unwrap();
        assert_eq!(bracket.amount, Some(21.0));
        assert!((bracket.moe.unwrap() - 41.0_f64.sqrt()).abs() < 1e-12);
    }
}
