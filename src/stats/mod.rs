// src/stats/mod.rs

use serde::Serialize;

/// A survey estimate paired with its 90%-confidence margin of error.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Estimate {
    pub value: f64,
    pub moe: f64,
}

impl Estimate {
    pub fn new(value: f64, moe: f64) -> Self {
        Estimate { value, moe }
    }

    /// An estimate carrying no sampling error (decennial counts, constants).
    pub fn exact(value: f64) -> Self {
        Estimate { value, moe: 0.0 }
    }
}

/// Sum of survey estimates. Margins of error combine as the root sum of
/// squares of the component margins.
///
/// Absent components are skipped entirely. Returns `None` when every
/// component is absent, so callers can tell "no data" apart from a true zero.
pub fn sum<I>(parts: I) -> Option<Estimate>
where
    I: IntoIterator<Item = Option<Estimate>>,
{
    let mut value = 0.0;
    let mut squares = 0.0;
    let mut present = false;

    for part in parts.into_iter().flatten() {
        value += part.value;
        squares += part.moe * part.moe;
        present = true;
    }

    present.then(|| Estimate::new(value, squares.sqrt()))
}

/// Ratio of two aggregated estimates, with the margin of error from the
/// Census Bureau's approximation for derived proportions.
///
/// The standard form subtracts the proportion-scaled denominator variance
/// from the numerator variance. When that radicand goes negative (a
/// statistically unstable ratio), the Bureau's documented fallback adds the
/// two terms instead.
///
/// Returns `None` when either side is absent or the denominator is zero.
pub fn proportion(numerator: Option<Estimate>, denominator: Option<Estimate>) -> Option<Estimate> {
    let numerator = numerator?;
    let denominator = denominator?;
    if denominator.value == 0.0 {
        return None;
    }

    let p = numerator.value / denominator.value;

    let part1 = numerator.moe * numerator.moe;
    let part2 = p * p * denominator.moe * denominator.moe;
    let radicand = if part1 - part2 < 0.0 {
        part1 + part2
    } else {
        part1 - part2
    };

    Some(Estimate::new(p, radicand.sqrt() / denominator.value))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn close(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-12
    }

    #[test]
    fn sum_combines_values_and_root_sum_of_squares() {
        let total = sum([
            Some(Estimate::new(100.0, 10.0)),
            Some(Estimate::new(50.0, 5.0)),
        ])
        .unwrap();

        assert!(close(total.value, 150.0));
        assert!(close(total.moe, 125.0_f64.sqrt()));
    }

    #[test]
    fn sum_skips_absent_components() {
        let total = sum([Some(Estimate::new(40.0, 4.0)), None]).unwrap();
        assert!(close(total.value, 40.0));
        assert!(close(total.moe, 4.0));
    }

    #[test]
    fn sum_of_nothing_is_no_data() {
        assert_eq!(sum([None, None]), None);
        assert_eq!(sum(std::iter::empty()), None);
    }

    #[test]
    fn proportion_standard_case() {
        // n = 40 ± 5, d = 200 ± 10: radicand = 25 - 0.04 * 100 = 21.
        let ratio = proportion(
            Some(Estimate::new(40.0, 5.0)),
            Some(Estimate::new(200.0, 10.0)),
        )
        .unwrap();

        assert!(close(ratio.value, 0.2));
        assert!(close(ratio.moe, 21.0_f64.sqrt() / 200.0));
    }

    #[test]
    fn proportion_negative_radicand_falls_back_to_additive_form() {
        // n = 10 ± 1, d = 1000 ± 500: 1 - 0.0001 * 250000 = -24, so the
        // additive form must be used instead.
        let ratio = proportion(
            Some(Estimate::new(10.0, 1.0)),
            Some(Estimate::new(1000.0, 500.0)),
        )
        .unwrap();

        assert!(close(ratio.value, 0.01));
        let expected = (1.0 + 0.01_f64.powi(2) * 500.0_f64.powi(2)).sqrt() / 1000.0;
        assert!(close(ratio.moe, expected));
        assert!(ratio.moe.is_finite());
        assert!(ratio.moe >= 0.0);
    }

    #[test]
    fn proportion_zero_denominator_is_no_data() {
        let ratio = proportion(
            Some(Estimate::new(10.0, 1.0)),
            Some(Estimate::new(0.0, 1.0)),
        );
        assert_eq!(ratio, None);
    }

    #[test]
    fn proportion_missing_side_is_no_data() {
        assert_eq!(proportion(None, Some(Estimate::exact(100.0))), None);
        assert_eq!(proportion(Some(Estimate::exact(10.0)), None), None);
    }

    #[test]
    fn operations_are_idempotent() {
        let parts = [
            Some(Estimate::new(12.5, 3.25)),
            Some(Estimate::new(7.75, 1.5)),
        ];
        assert_eq!(sum(parts), sum(parts));

        let n = Some(Estimate::new(33.0, 6.0));
        let d = Some(Estimate::new(150.0, 12.0));
        assert_eq!(proportion(n, d), proportion(n, d));
    }
}
