// src/plot/configs.rs
//
// One builder per published chart, registered by name. The names mirror the
// dataset field conventions so a chart can be addressed by the measure it
// shows (`tenure__black__renter_fraction`, `population__RACE_ETHNICITY_BREAKDOWN`, ...).

use once_cell::sync::Lazy;
use std::collections::BTreeMap;
use tracing::warn;

use super::colors;
use super::spec::{Axis, BarPoint, ColorScale, Margins, Mark, PlotSpec, PyramidPoint};
use crate::series::SeriesRow;
use crate::stats::Estimate;
use crate::tidy::{self, age, TidySeries};

pub type PlotFn = fn(&str, &[SeriesRow]) -> PlotSpec;

pub static PLOTS: Lazy<BTreeMap<&'static str, PlotFn>> = Lazy::new(|| {
    let mut plots: BTreeMap<&'static str, PlotFn> = BTreeMap::new();

    plots.insert("median_household_income", median_household_income);
    plots.insert("median_household_income__white", median_household_income_white);
    plots.insert("median_household_income__black", median_household_income_black);
    plots.insert(
        "median_household_income__hispanic",
        median_household_income_hispanic,
    );
    plots.insert(
        "median_household_income__inflation_adjusted",
        median_household_income_inflation_adjusted,
    );

    plots.insert("population__total", population_total);
    plots.insert("age__under_5", age_under_5);
    plots.insert("age__65_over", age_65_over);

    plots.insert(
        "education__high_school_or_higher",
        education_high_school_or_higher,
    );
    plots.insert(
        "education__some_college_or_higher",
        education_some_college_or_higher,
    );
    plots.insert("education__college_degree", education_college_degree);

    plots.insert(
        "poverty__below_poverty_household_fraction",
        poverty_below_poverty_household_fraction,
    );

    plots.insert("tenure__renter_fraction", tenure_renter_fraction);
    plots.insert("tenure__black__renter_fraction", tenure_black_renter_fraction);
    plots.insert("tenure__white__renter_fraction", tenure_white_renter_fraction);
    plots.insert(
        "tenure__hispanic__renter_fraction",
        tenure_hispanic_renter_fraction,
    );
    plots.insert(
        "tenure__RACE_BREAKDOWN__renter_fraction",
        tenure_race_breakdown_renter_fraction,
    );

    plots.insert("employment__unemployed_fraction", employment_unemployed_fraction);
    plots.insert(
        "employment__black__unemployed_fraction",
        employment_black_unemployed_fraction,
    );
    plots.insert(
        "employment__white__unemployed_fraction",
        employment_white_unemployed_fraction,
    );
    plots.insert(
        "employment__hispanic__unemployed_fraction",
        employment_hispanic_unemployed_fraction,
    );
    plots.insert(
        "employment__RACE_BREAKDOWN__unemployed_fraction",
        employment_race_breakdown_unemployed_fraction,
    );

    plots.insert(
        "insurance_coverage__with_insurance_fraction",
        insurance_with_insurance_fraction,
    );
    plots.insert(
        "insurance_coverage__black__with_insurance_fraction",
        insurance_black_with_insurance_fraction,
    );
    plots.insert(
        "insurance_coverage__white__with_insurance_fraction",
        insurance_white_with_insurance_fraction,
    );
    plots.insert(
        "insurance_coverage__hispanic__with_insurance_fraction",
        insurance_hispanic_with_insurance_fraction,
    );
    plots.insert(
        "insurance_coverage__RACE_BREAKDOWN__with_insurance_fraction",
        insurance_race_breakdown_with_insurance_fraction,
    );

    plots.insert(
        "population__RACE_ETHNICITY_BREAKDOWN",
        population_race_ethnicity_breakdown,
    );
    plots.insert("disability__AGE_BREAKDOWN", disability_age_breakdown);
    plots.insert("population_pyramid", population_pyramid);

    plots
});

/// Build a registered plot, or `None` for an unknown name.
pub fn build(name: &str, geography: &str, data: &[SeriesRow]) -> Option<PlotSpec> {
    PLOTS.get(name).map(|f| f(geography, data))
}

// ───────────────────────── shared pieces ─────────────────────────

const ACS_CAPTION: &str =
    "Data: US Census Bureau American Community Survey (5-year estimates)";

fn subtitle(geography: &str) -> String {
    format!("{geography}, 2009-2023")
}

/// Bars for a single wide field across the survey periods, periods with no
/// value skipped.
fn field_bars(data: &[SeriesRow], field: &str) -> Vec<BarPoint> {
    derived_bars(data, |row| row.estimate(field))
}

/// Bars for any per-row derived estimate.
fn derived_bars(data: &[SeriesRow], derive: impl Fn(&SeriesRow) -> Option<Estimate>) -> Vec<BarPoint> {
    data.iter()
        .filter_map(|row| {
            derive(row).map(|est| BarPoint {
                x: row.year.clone(),
                facet: None,
                y: est.value,
                moe: Some(est.moe),
                group: None,
            })
        })
        .collect()
}

/// One race variant of a fraction breakdown, period on the x axis.
fn group_fraction_bars(series: &TidySeries, group: &str) -> Vec<BarPoint> {
    series
        .for_group(group)
        .filter_map(|record| {
            record.fraction.map(|fraction| BarPoint {
                x: record.year.clone(),
                facet: None,
                y: fraction,
                moe: record.moe,
                group: None,
            })
        })
        .collect()
}

/// Grouped bars faceted by survey period, for breakdown charts.
fn breakdown_bars(series: &TidySeries) -> Vec<BarPoint> {
    series
        .records
        .iter()
        .filter_map(|record| {
            record.amount.or(record.fraction).map(|value| BarPoint {
                x: record.group.clone(),
                facet: Some(record.year.clone()),
                y: value,
                moe: record.moe,
                group: Some(record.group.clone()),
            })
        })
        .collect()
}

/// Color scale over the surviving groups of a breakdown. Groups dropped by
/// the reshaper never reach the legend.
fn color_scale(series: &TidySeries, palette: &[(&str, &str)]) -> ColorScale {
    let range = series
        .groups
        .iter()
        .map(|group| {
            palette
                .iter()
                .find(|(label, _)| *label == group.as_str())
                .map(|(_, color)| *color)
                .unwrap_or(colors::GRAY)
                .to_string()
        })
        .collect();

    ColorScale {
        legend: true,
        domain: series.groups.clone(),
        range,
    }
}

const RACE_PALETTE: [(&str, &str); 4] = [
    ("White", colors::ORANGE),
    ("Black", colors::BLUE),
    ("Hispanic or Latino", colors::TEAL),
    ("Overall", colors::GRAY),
];

const ETHNICITY_PALETTE: [(&str, &str); 5] = [
    ("White (not Hispanic or Latino)", colors::ORANGE),
    ("Black (not Hispanic or Latino)", colors::BLUE),
    ("Hispanic or Latino", colors::TEAL),
    ("Other race (not Hispanic or Latino)", colors::GRAY),
    ("Two or more races (not Hispanic or Latino)", colors::MAGENTA),
];

const AGE_PALETTE: [(&str, &str); 6] = [
    ("<5", colors::ORANGE),
    ("5-17", colors::BLUE),
    ("18-34", colors::TEAL),
    ("35-64", colors::MAGENTA),
    ("65-74", colors::LIGHT_BLUE),
    ("≥75", colors::GRAY),
];

/// Percent-axis plot of one variant of a race fraction breakdown.
fn fraction_variant_plot(
    geography: &str,
    series: &TidySeries,
    group: &str,
    title: String,
    caption: &str,
    y_label: &str,
) -> PlotSpec {
    let bars = group_fraction_bars(series, group);
    let marks = if bars.is_empty() {
        vec![Mark::NoData]
    } else {
        vec![Mark::BarY {
            data: bars,
            label_format: ".1%".to_string(),
            fill: colors::TEAL.to_string(),
        }]
    };

    PlotSpec {
        title,
        subtitle: subtitle(geography),
        caption: caption.to_string(),
        x: Axis::labeled("Survey period"),
        y: Axis::labeled(y_label).tick_format(".0%").domain([0.0, 1.0]),
        fx: None,
        color: None,
        margins: Margins::default(),
        marks,
    }
}

/// Faceted chart showing every surviving group of a fraction breakdown.
fn fraction_breakdown_plot(
    geography: &str,
    series: &TidySeries,
    title: &str,
    y_label: &str,
) -> PlotSpec {
    PlotSpec {
        title: title.to_string(),
        subtitle: subtitle(geography),
        caption: ACS_CAPTION.to_string(),
        x: Axis::default(),
        y: Axis::labeled(y_label).tick_format(".0%").domain([0.0, 1.0]),
        fx: Some(Axis::labeled("Survey period")),
        color: Some(color_scale(series, &RACE_PALETTE)),
        margins: Margins::default(),
        marks: vec![Mark::BarY {
            data: breakdown_bars(series),
            label_format: ".1%".to_string(),
            fill: "group".to_string(),
        }],
    }
}

fn variant_title(base: &str, noun: &str, group: &str) -> String {
    if group == "Overall" {
        format!("{base} (all {noun})")
    } else {
        format!("{base} ({group} {noun})")
    }
}

// ───────────────────────── income ─────────────────────────

const INCOME_FIELDS: [&str; 4] = [
    "median_household_income",
    "median_household_income__black",
    "median_household_income__white",
    "median_household_income__hispanic",
];

/// Shared y-axis ceiling so the per-race income charts stay comparable.
fn income_ceiling(data: &[SeriesRow]) -> Option<f64> {
    data.iter()
        .flat_map(|row| INCOME_FIELDS.iter().filter_map(|f| row.value(f)))
        .fold(None, |max, v| Some(max.map_or(v, |m: f64| m.max(v))))
}

fn income_plot(geography: &str, data: &[SeriesRow], field: &str, title: &str) -> PlotSpec {
    let bars = field_bars(data, field);
    let no_data = bars.is_empty();

    let mut y = Axis::labeled("Median household income").tick_format("$~s");
    if !no_data {
        if let Some(max) = income_ceiling(data) {
            y = y.domain([0.0, max]);
        }
    }

    PlotSpec {
        title: title.to_string(),
        subtitle: subtitle(geography),
        caption: ACS_CAPTION.to_string(),
        x: Axis::labeled("Survey period"),
        y,
        fx: None,
        color: None,
        margins: Margins::default(),
        marks: if no_data {
            vec![Mark::NoData]
        } else {
            vec![Mark::BarY {
                data: bars,
                label_format: "$,.0f".to_string(),
                fill: colors::TEAL.to_string(),
            }]
        },
    }
}

fn median_household_income(geography: &str, data: &[SeriesRow]) -> PlotSpec {
    income_plot(
        geography,
        data,
        "median_household_income",
        "Median household income",
    )
}

fn median_household_income_white(geography: &str, data: &[SeriesRow]) -> PlotSpec {
    income_plot(
        geography,
        data,
        "median_household_income__white",
        "Median household income (White householder)",
    )
}

fn median_household_income_black(geography: &str, data: &[SeriesRow]) -> PlotSpec {
    income_plot(
        geography,
        data,
        "median_household_income__black",
        "Median household income (Black householder)",
    )
}

fn median_household_income_hispanic(geography: &str, data: &[SeriesRow]) -> PlotSpec {
    income_plot(
        geography,
        data,
        "median_household_income__hispanic",
        "Median household income (Hispanic or Latino householder)",
    )
}

fn median_household_income_inflation_adjusted(geography: &str, data: &[SeriesRow]) -> PlotSpec {
    let target_year = data.iter().filter_map(SeriesRow::end_year).max();

    let bars = match target_year {
        Some(target) => derived_bars(data, |row| {
            let base = row.end_year()?;
            let est = row.estimate("median_household_income")?;
            match crate::inflation::adjust(Some(est.value), base, target) {
                // The whole margin restates in the same dollars, so it
                // scales by the same CPI ratio as the value.
                Ok(Some(value)) => {
                    let factor = value / est.value;
                    Some(Estimate::new(value, est.moe * factor))
                }
                Ok(None) => None,
                Err(error) => {
                    warn!(year = base, %error, "skipping period outside the CPI table");
                    None
                }
            }
        }),
        None => Vec::new(),
    };

    let title = match target_year {
        Some(target) => format!("Median household income ({target} dollars)"),
        None => "Median household income (inflation adjusted)".to_string(),
    };

    PlotSpec {
        title,
        subtitle: subtitle(geography),
        caption: format!("{ACS_CAPTION}; adjusted with annual CPI-U"),
        x: Axis::labeled("Survey period"),
        y: Axis::labeled("Median household income").tick_format("$~s"),
        fx: None,
        color: None,
        margins: Margins::default(),
        marks: if bars.is_empty() {
            vec![Mark::NoData]
        } else {
            vec![Mark::BarY {
                data: bars,
                label_format: "$,.0f".to_string(),
                fill: colors::TEAL.to_string(),
            }]
        },
    }
}

// ───────────────────────── population counts ─────────────────────────

/// Wider left margin once labels pass three digits.
fn count_margins(bars: &[BarPoint]) -> Margins {
    let widest = bars.iter().fold(0.0_f64, |max, bar| max.max(bar.y));
    if widest >= 1000.0 {
        Margins::with_left(50)
    } else {
        Margins::default()
    }
}

fn count_plot(geography: &str, bars: Vec<BarPoint>, title: &str, y_label: &str) -> PlotSpec {
    PlotSpec {
        title: title.to_string(),
        subtitle: subtitle(geography),
        caption: ACS_CAPTION.to_string(),
        x: Axis::labeled("Survey period"),
        y: Axis::labeled(y_label).tick_format(","),
        fx: None,
        color: None,
        margins: count_margins(&bars),
        marks: if bars.is_empty() {
            vec![Mark::NoData]
        } else {
            vec![Mark::BarY {
                data: bars,
                label_format: ".0f".to_string(),
                fill: colors::TEAL.to_string(),
            }]
        },
    }
}

fn population_total(geography: &str, data: &[SeriesRow]) -> PlotSpec {
    count_plot(
        geography,
        field_bars(data, "population__total"),
        "Total Population",
        "Total Population",
    )
}

fn age_under_5(geography: &str, data: &[SeriesRow]) -> PlotSpec {
    count_plot(
        geography,
        derived_bars(data, age::under_5),
        "Children under age 5",
        "Total Population",
    )
}

fn age_65_over(geography: &str, data: &[SeriesRow]) -> PlotSpec {
    count_plot(
        geography,
        derived_bars(data, age::seniors),
        "Senior population (65 and over)",
        "Total Population",
    )
}

// ───────────────────────── education ─────────────────────────

const HIGH_SCHOOL_OR_HIGHER_FIELDS: [&str; 8] = [
    "education__regular_high_school_diploma",
    "education__ged_or_alternative_credential",
    "education__some_college_no_degree",
    "education__associates_degree",
    "education__bachelors_degree",
    "education__masters_degree",
    "education__professional_school_degree",
    "education__doctorate_degree",
];

const SOME_COLLEGE_OR_HIGHER_FIELDS: [&str; 6] = [
    "education__some_college_no_degree",
    "education__associates_degree",
    "education__bachelors_degree",
    "education__masters_degree",
    "education__professional_school_degree",
    "education__doctorate_degree",
];

const COLLEGE_DEGREE_FIELDS: [&str; 5] = [
    "education__associates_degree",
    "education__bachelors_degree",
    "education__masters_degree",
    "education__professional_school_degree",
    "education__doctorate_degree",
];

fn education_plot(
    geography: &str,
    data: &[SeriesRow],
    fields: &[&str],
    title: &str,
    y_label: &str,
    caption: &str,
) -> PlotSpec {
    let bars = derived_bars(data, |row| {
        row.proportion_of(fields, &["population__total"])
    });

    PlotSpec {
        title: title.to_string(),
        subtitle: subtitle(geography),
        caption: caption.to_string(),
        x: Axis::labeled("Survey period"),
        y: Axis::labeled(y_label).tick_format(".0%").domain([0.0, 1.0]),
        fx: None,
        color: None,
        margins: Margins::default(),
        marks: if bars.is_empty() {
            vec![Mark::NoData]
        } else {
            vec![Mark::BarY {
                data: bars,
                label_format: ".1%".to_string(),
                fill: colors::TEAL.to_string(),
            }]
        },
    }
}

fn education_high_school_or_higher(geography: &str, data: &[SeriesRow]) -> PlotSpec {
    education_plot(
        geography,
        data,
        &HIGH_SCHOOL_OR_HIGHER_FIELDS,
        "Education: High school degree",
        "Percent with high school degree",
        "Includes regular high school degrees and GED or alternative credentials. \
         Data: US Census Bureau American Community Survey (5-year estimates)",
    )
}

fn education_some_college_or_higher(geography: &str, data: &[SeriesRow]) -> PlotSpec {
    education_plot(
        geography,
        data,
        &SOME_COLLEGE_OR_HIGHER_FIELDS,
        "Education: Some college or higher",
        "Percent with some college education",
        ACS_CAPTION,
    )
}

fn education_college_degree(geography: &str, data: &[SeriesRow]) -> PlotSpec {
    education_plot(
        geography,
        data,
        &COLLEGE_DEGREE_FIELDS,
        "Education: College graduate",
        "Percent with a college degree",
        ACS_CAPTION,
    )
}

// ───────────────────────── poverty ─────────────────────────

fn poverty_below_poverty_household_fraction(geography: &str, data: &[SeriesRow]) -> PlotSpec {
    let bars = field_bars(data, "poverty__below_poverty_household_fraction");

    PlotSpec {
        title: "Households below the poverty line".to_string(),
        subtitle: subtitle(geography),
        caption: ACS_CAPTION.to_string(),
        x: Axis::labeled("Survey period"),
        y: Axis::labeled("Percent of households")
            .tick_format(".0%")
            .domain([0.0, 1.0]),
        fx: None,
        color: None,
        margins: Margins::default(),
        marks: if bars.is_empty() {
            vec![Mark::NoData]
        } else {
            vec![Mark::BarY {
                data: bars,
                label_format: ".1%".to_string(),
                fill: colors::TEAL.to_string(),
            }]
        },
    }
}

// ───────────────────────── tenure ─────────────────────────

const RENTER_CAPTION: &str = "The Census categorizes households into renter-occupied and \
     owner-occupied status. This figure shows the percentage of households that rent instead \
     of own. Data: US Census Bureau American Community Survey (5-year estimates)";

fn renter_variant(geography: &str, data: &[SeriesRow], group: &str) -> PlotSpec {
    fraction_variant_plot(
        geography,
        &tidy::renter_series(data),
        group,
        variant_title("Renters", "households", group),
        RENTER_CAPTION,
        "Percent households who rent",
    )
}

fn tenure_renter_fraction(geography: &str, data: &[SeriesRow]) -> PlotSpec {
    renter_variant(geography, data, "Overall")
}

fn tenure_black_renter_fraction(geography: &str, data: &[SeriesRow]) -> PlotSpec {
    renter_variant(geography, data, "Black")
}

fn tenure_white_renter_fraction(geography: &str, data: &[SeriesRow]) -> PlotSpec {
    renter_variant(geography, data, "White")
}

fn tenure_hispanic_renter_fraction(geography: &str, data: &[SeriesRow]) -> PlotSpec {
    renter_variant(geography, data, "Hispanic or Latino")
}

fn tenure_race_breakdown_renter_fraction(geography: &str, data: &[SeriesRow]) -> PlotSpec {
    fraction_breakdown_plot(
        geography,
        &tidy::renter_series(data),
        "Renters",
        "Percent households who rent",
    )
}

// ───────────────────────── employment ─────────────────────────

fn unemployment_variant(geography: &str, data: &[SeriesRow], group: &str) -> PlotSpec {
    fraction_variant_plot(
        geography,
        &tidy::unemployment_series(data),
        group,
        variant_title("Unemployment", "population", group),
        ACS_CAPTION,
        "Percent unemployed population",
    )
}

fn employment_unemployed_fraction(geography: &str, data: &[SeriesRow]) -> PlotSpec {
    unemployment_variant(geography, data, "Overall")
}

fn employment_black_unemployed_fraction(geography: &str, data: &[SeriesRow]) -> PlotSpec {
    unemployment_variant(geography, data, "Black")
}

fn employment_white_unemployed_fraction(geography: &str, data: &[SeriesRow]) -> PlotSpec {
    unemployment_variant(geography, data, "White")
}

fn employment_hispanic_unemployed_fraction(geography: &str, data: &[SeriesRow]) -> PlotSpec {
    unemployment_variant(geography, data, "Hispanic or Latino")
}

fn employment_race_breakdown_unemployed_fraction(geography: &str, data: &[SeriesRow]) -> PlotSpec {
    fraction_breakdown_plot(
        geography,
        &tidy::unemployment_series(data),
        "Unemployment",
        "Percent unemployed population",
    )
}

// ───────────────────────── insurance ─────────────────────────

fn insurance_variant(geography: &str, data: &[SeriesRow], group: &str) -> PlotSpec {
    fraction_variant_plot(
        geography,
        &tidy::insurance_series(data),
        group,
        variant_title("With health insurance", "population", group),
        ACS_CAPTION,
        "Percent with insurance coverage",
    )
}

fn insurance_with_insurance_fraction(geography: &str, data: &[SeriesRow]) -> PlotSpec {
    insurance_variant(geography, data, "Overall")
}

fn insurance_black_with_insurance_fraction(geography: &str, data: &[SeriesRow]) -> PlotSpec {
    insurance_variant(geography, data, "Black")
}

fn insurance_white_with_insurance_fraction(geography: &str, data: &[SeriesRow]) -> PlotSpec {
    insurance_variant(geography, data, "White")
}

fn insurance_hispanic_with_insurance_fraction(geography: &str, data: &[SeriesRow]) -> PlotSpec {
    insurance_variant(geography, data, "Hispanic or Latino")
}

fn insurance_race_breakdown_with_insurance_fraction(
    geography: &str,
    data: &[SeriesRow],
) -> PlotSpec {
    fraction_breakdown_plot(
        geography,
        &tidy::insurance_series(data),
        "With health insurance",
        "Percent with insurance coverage",
    )
}

// ───────────────────────── breakdowns ─────────────────────────

fn population_race_ethnicity_breakdown(geography: &str, data: &[SeriesRow]) -> PlotSpec {
    let series = tidy::population_race_ethnicity_series(data);

    PlotSpec {
        title: "Population breakdown".to_string(),
        subtitle: subtitle(geography),
        caption: ACS_CAPTION.to_string(),
        x: Axis::default(),
        y: Axis::labeled("Population"),
        fx: Some(Axis::labeled("Survey period")),
        color: Some(color_scale(&series, &ETHNICITY_PALETTE)),
        margins: Margins::with_left(50),
        marks: vec![
            Mark::BarY {
                data: breakdown_bars(&series),
                label_format: ".0f".to_string(),
                fill: "group".to_string(),
            },
            Mark::RuleY { y: 0.0 },
        ],
    }
}

fn disability_age_breakdown(geography: &str, data: &[SeriesRow]) -> PlotSpec {
    let series = tidy::disability_age_series(data);

    PlotSpec {
        title: "Disability by age".to_string(),
        subtitle: subtitle(geography),
        caption: ACS_CAPTION.to_string(),
        x: Axis::default(),
        y: Axis::labeled("Population"),
        fx: Some(Axis::labeled("Survey period")),
        color: Some(color_scale(&series, &AGE_PALETTE)),
        margins: Margins::with_left(50),
        marks: vec![
            Mark::BarY {
                data: breakdown_bars(&series),
                label_format: ".0f".to_string(),
                fill: "group".to_string(),
            },
            Mark::RuleY { y: 0.0 },
        ],
    }
}

fn population_pyramid(geography: &str, data: &[SeriesRow]) -> PlotSpec {
    // Latest survey period only; the pyramid is a snapshot, not a series.
    let latest = data
        .iter()
        .max_by_key(|row| row.end_year().unwrap_or(i32::MIN));

    let (year_label, marks) = match latest {
        Some(row) => {
            let side = |sex: age::Sex, fill: &str| {
                let points: Vec<PyramidPoint> = age::PYRAMID_BRACKETS
                    .iter()
                    .filter_map(|(start, end, cells)| {
                        age::bracket_estimate(row, sex, cells).map(|est| PyramidPoint {
                            age_start: *start,
                            age_end: *end,
                            population: est.value,
                        })
                    })
                    .collect();
                Mark::AreaX {
                    data: points,
                    sex: sex.label().to_string(),
                    fill: fill.to_string(),
                    curve: "step-before".to_string(),
                }
            };
            (
                row.year.clone(),
                vec![
                    side(age::Sex::Male, colors::BLUE),
                    side(age::Sex::Female, colors::MAGENTA),
                ],
            )
        }
        None => (String::new(), vec![Mark::NoData]),
    };

    PlotSpec {
        title: "Population pyramid".to_string(),
        subtitle: format!("{geography}, {year_label}"),
        caption: ACS_CAPTION.to_string(),
        x: Axis::labeled("Population"),
        y: Axis::default().domain([0.0, 90.0]),
        fx: None,
        color: None,
        margins: Margins {
            top: 10,
            right: 46,
            bottom: 36,
            left: 46,
        },
        marks,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn row(year: &str, pairs: &[(&str, f64)]) -> SeriesRow {
        let fields: HashMap<String, f64> =
            pairs.iter().map(|(k, v)| (k.to_string(), *v)).collect();
        SeriesRow::from_fields("Sterling", year, fields)
    }

    #[test]
    fn registry_knows_every_published_chart() {
        assert!(PLOTS.contains_key("median_household_income"));
        assert!(PLOTS.contains_key("tenure__RACE_BREAKDOWN__renter_fraction"));
        assert!(PLOTS.contains_key("population_pyramid"));
        assert!(build("no_such_plot", "Sterling", &[]).is_none());
    }

    #[test]
    fn income_variant_without_observations_renders_no_data() {
        let data = vec![row("2018-2022", &[("median_household_income", 52_000.0)])];
        let spec = build("median_household_income__hispanic", "Sterling", &data).unwrap();
        assert!(matches!(spec.marks[0], Mark::NoData));
        // The no-data variant must not pin the shared income domain either.
        assert_eq!(spec.y.domain, None);
    }

    #[test]
    fn income_variants_share_a_y_ceiling() {
        let data = vec![row(
            "2018-2022",
            &[
                ("median_household_income", 52_000.0),
                ("median_household_income__black", 38_000.0),
                ("median_household_income__white", 61_000.0),
            ],
        )];
        let spec = build("median_household_income__black", "Sterling", &data).unwrap();
        assert_eq!(spec.y.domain, Some([0.0, 61_000.0]));
    }

    #[test]
    fn breakdown_color_domain_is_the_filtered_group_order() {
        let data = vec![row(
            "2018-2022",
            &[
                ("tenure__renter", 300.0),
                ("tenure__owner", 700.0),
                ("tenure__black__renter", 140.0),
                ("tenure__black__owner", 160.0),
            ],
        )];
        let spec = build("tenure__RACE_BREAKDOWN__renter_fraction", "Sterling", &data).unwrap();
        let color = spec.color.unwrap();
        assert_eq!(color.domain, vec!["Overall", "Black"]);
        assert_eq!(color.range, vec![colors::GRAY, colors::BLUE]);
    }

    #[test]
    fn education_fraction_uses_the_population_denominator() {
        let data = vec![row(
            "2018-2022",
            &[
                ("education__associates_degree", 50.0),
                ("education__bachelors_degree", 100.0),
                ("education__masters_degree", 30.0),
                ("education__professional_school_degree", 10.0),
                ("education__doctorate_degree", 10.0),
                ("population__total", 1000.0),
            ],
        )];
        let spec = build("education__college_degree", "Sterling", &data).unwrap();
        match &spec.marks[0] {
            Mark::BarY { data, .. } => {
                assert_eq!(data.len(), 1);
                assert!((data[0].y - 0.2).abs() < 1e-12);
            }
            other => panic!("expected bars, got {other:?}"),
        }
    }

    #[test]
    fn pyramid_uses_the_latest_period() {
        let data = vec![
            row("2009-2013", &[("age__25-29__male", 10.0)]),
            row("2018-2022", &[("age__25-29__male", 20.0)]),
        ];
        let spec = build("population_pyramid", "Sterling", &data).unwrap();
        assert!(spec.subtitle.ends_with("2018-2022"));
        match &spec.marks[0] {
            Mark::AreaX { data, sex, .. } => {
                assert_eq!(sex, "M");
                assert_eq!(data.len(), 1);
                assert_eq!(data[0].population, 20.0);
            }
            other => panic!("expected area marks, got {other:?}"),
        }
    }

    #[test]
    fn specs_serialize_to_json() {
        let data = vec![row(
            "2018-2022",
            &[("population__total", 1200.0), ("Mpopulation__total", 80.0)],
        )];
        let spec = build("population__total", "Sterling", &data).unwrap();
        let json = serde_json::to_value(&spec).unwrap();
        assert_eq!(json["title"], "Total Population");
        assert_eq!(json["marks"][0]["type"], "bar_y");
    }
}
