// src/inflation.rs

use anyhow::{anyhow, Result};

/// Annual CPI-U, U.S. city average, all items (1982-84 = 100).
/// Covers every survey period the data repository currently exports.
const ANNUAL_CPI: [(i32, f64); 15] = [
    (2009, 214.537),
    (2010, 218.056),
    (2011, 224.939),
    (2012, 229.594),
    (2013, 232.957),
    (2014, 236.736),
    (2015, 237.017),
    (2016, 240.007),
    (2017, 245.120),
    (2018, 251.107),
    (2019, 255.657),
    (2020, 258.811),
    (2021, 270.970),
    (2022, 292.655),
    (2023, 304.702),
];

fn annual_cpi(year: i32) -> Option<f64> {
    ANNUAL_CPI
        .iter()
        .find(|(y, _)| *y == year)
        .map(|(_, cpi)| *cpi)
}

/// Restate `amount` from `base_year` dollars in `target_year` dollars using
/// the annual CPI ratio. Absent amounts pass through; years outside the CPI
/// table are an error.
pub fn adjust(amount: Option<f64>, base_year: i32, target_year: i32) -> Result<Option<f64>> {
    let base = annual_cpi(base_year).ok_or_else(|| anyhow!("no CPI data for {base_year}"))?;
    let target = annual_cpi(target_year).ok_or_else(|| anyhow!("no CPI data for {target_year}"))?;

    Ok(amount.map(|a| a * (target / base)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn adjusts_by_the_annual_cpi_ratio() {
        let adjusted = adjust(Some(50_000.0), 2013, 2022).unwrap().unwrap();
        let expected = 50_000.0 * (292.655 / 232.957);
        assert!((adjusted - expected).abs() < 1e-9);
    }

    #[test]
    fn same_year_is_identity() {
        let adjusted = adjust(Some(42_000.0), 2020, 2020).unwrap().unwrap();
        assert!((adjusted - 42_000.0).abs() < 1e-9);
    }

    #[test]
    fn absent_amount_passes_through() {
        assert_eq!(adjust(None, 2013, 2022).unwrap(), None);
    }

    #[test]
    fn unknown_year_is_an_error() {
        assert!(adjust(Some(1.0), 1999, 2022).is_err());
        assert!(adjust(Some(1.0), 2013, 2050).is_err());
    }
}
