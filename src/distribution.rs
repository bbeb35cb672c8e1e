//! Chi-squared distribution
//!
//! Maps a chi-squared statistic and its degrees of freedom to the probability
//! listed in chi-squared tables, using the exact gamma kernel for both the
//! incomplete and the complete gamma function.
use crate::errors::ChiSquaredError;
use crate::gamma::{GammaKernel, SeriesSum};
use crate::rational::{from_f64, integer, ratio, Rational};
use num::traits::{One, Signed};
use serde::{Deserialize, Serialize};

/// Chi-squared distribution with `degrees_of_freedom` degrees of freedom.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChiSquared {
    degrees_of_freedom: u64,
}

impl ChiSquared {
    /// * `degrees_of_freedom` - Must be at least 1, often `len(data) - 1`.
    pub fn new(degrees_of_freedom: u64) -> Result<Self, ChiSquaredError> {
        if degrees_of_freedom < 1 {
            return Err(ChiSquaredError::InvalidDegreesOfFreedom(degrees_of_freedom));
        }
        Ok(ChiSquared { degrees_of_freedom })
    }

    pub fn degrees_of_freedom(&self) -> u64 {
        self.degrees_of_freedom
    }

    /// `1 − γ(k/2, x/2) / Γ(k/2)` for the statistic `x`.
    ///
    /// This is the right-tail value tabulated against the statistic, so it is
    /// the p-value of an independence test: about 0.95 for `x = 0.004, k = 1`
    /// and about 0.001 for `x = 10.83, k = 1`. The result is exact apart from
    /// the series truncation. When the series stops at its term cap (large
    /// statistics, roughly `x > 60` with the defaults) the value is meaningless
    /// and can lie far outside `[0, 1]`; use [`ChiSquared::cdf_series`] to
    /// find out.
    pub fn cdf(&self, kernel: &GammaKernel, x: &Rational) -> Result<Rational, ChiSquaredError> {
        Ok(self.cdf_series(kernel, x)?.value)
    }

    /// [`ChiSquared::cdf`], also reporting whether the gamma series converged.
    pub fn cdf_series(&self, kernel: &GammaKernel, x: &Rational) -> Result<SeriesSum, ChiSquaredError> {
        let lower = self.lower_tail_series(kernel, x)?;
        Ok(SeriesSum {
            value: Rational::one() - lower.value,
            ..lower
        })
    }

    /// `γ(k/2, x/2) / Γ(k/2)`, the probability mass at or below `x`.
    ///
    /// Non-decreasing in `x`; [`ChiSquared::cdf`] is its complement.
    pub fn lower_tail(&self, kernel: &GammaKernel, x: &Rational) -> Result<Rational, ChiSquaredError> {
        Ok(self.lower_tail_series(kernel, x)?.value)
    }

    /// [`ChiSquared::lower_tail`], also reporting whether the gamma series converged.
    pub fn lower_tail_series(&self, kernel: &GammaKernel, x: &Rational) -> Result<SeriesSum, ChiSquaredError> {
        if x.is_negative() {
            return Err(ChiSquaredError::InvalidParameter(
                "x".to_string(),
                "a statistic >= 0".to_string(),
                x.to_string(),
            ));
        }
        let half = ratio(1, 2);
        let shape = integer(self.degrees_of_freedom) * &half;
        let lower = kernel.lower_incomplete_series(&shape, &(x * &half))?;
        let complete = kernel.complete_half(&shape)?;
        Ok(SeriesSum {
            value: lower.value / complete,
            ..lower
        })
    }

    /// [`ChiSquared::cdf`] for a float statistic, taken at its exact binary value.
    pub fn cdf_f64(&self, kernel: &GammaKernel, x: f64) -> Result<Rational, ChiSquaredError> {
        self.cdf(kernel, &from_f64(x)?)
    }
}

/// [`ChiSquared::cdf`] with a fresh default kernel.
pub fn cdf(x: &Rational, degrees_of_freedom: u64) -> Result<Rational, ChiSquaredError> {
    ChiSquared::new(degrees_of_freedom)?.cdf(&GammaKernel::new(), x)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rational::{limit_denominator, to_f64};

    fn round(v: f64, digits: i32) -> f64 {
        let scale = 10f64.powi(digits);
        (v * scale).round() / scale
    }

    fn p(kernel: &GammaKernel, x: f64, k: u64) -> f64 {
        to_f64(&ChiSquared::new(k).unwrap().cdf_f64(kernel, x).unwrap())
    }

    #[test]
    fn test_fixed_points() {
        let kernel = GammaKernel::new();
        assert!((p(&kernel, 0.004, 1) - 0.95).abs() <= 0.01);
        assert!((p(&kernel, 10.83, 1) - 0.001).abs() <= 0.001);
        assert!((p(&kernel, 19.18, 6) - 0.00387).abs() <= 0.00001);
        assert!((p(&kernel, 9.488, 4) - 0.05).abs() <= 0.01);
    }

    #[test]
    fn test_cdf_table_values() {
        let kernel = GammaKernel::new();
        let one = ChiSquared::new(1).unwrap();
        assert_eq!(round(p(&kernel, 0.004, 1), 2), 0.95);
        assert_eq!(
            limit_denominator(&one.cdf_f64(&kernel, 0.004).unwrap(), 100).unwrap(),
            ratio(94, 99)
        );
        assert_eq!(round(p(&kernel, 10.83, 1), 3), 0.001);
        assert_eq!(
            limit_denominator(&one.cdf_f64(&kernel, 10.83).unwrap(), 1000).unwrap(),
            ratio(1, 1000)
        );

        let ten = ChiSquared::new(10).unwrap();
        assert_eq!(round(p(&kernel, 3.94, 10), 2), 0.95);
        assert_eq!(
            limit_denominator(&ten.cdf_f64(&kernel, 3.94).unwrap(), 100).unwrap(),
            ratio(19, 20)
        );
        assert_eq!(round(p(&kernel, 29.59, 10), 3), 0.001);
        assert_eq!(
            limit_denominator(&ten.cdf_f64(&kernel, 29.59).unwrap(), 10000).unwrap(),
            ratio(8, 8005)
        );

        let chi2 = [0.004, 0.02, 0.06, 0.15, 0.46, 1.07, 1.64, 2.71, 3.84, 6.64, 10.83];
        let act: Vec<f64> = chi2.iter().map(|&x| round(p(&kernel, x, 1), 3)).collect();
        assert_eq!(act, vec![0.95, 0.888, 0.806, 0.699, 0.498, 0.301, 0.2, 0.1, 0.05, 0.01, 0.001]);
    }

    #[test]
    fn test_cdf_nist_values() {
        let kernel = GammaKernel::new();
        assert_eq!(round(p(&kernel, 19.18, 6), 5), 0.00387);
        assert_eq!(round(p(&kernel, 12.5916, 6), 2), 0.05);
        let six = ChiSquared::new(6).unwrap();
        assert_eq!(
            limit_denominator(&six.cdf_f64(&kernel, 19.18).unwrap(), 1000).unwrap(),
            ratio(3, 775)
        );

        let four = ChiSquared::new(4).unwrap();
        assert_eq!(round(p(&kernel, 12.131, 4), 4), 0.0164);
        assert_eq!(
            limit_denominator(&four.cdf_f64(&kernel, 12.131).unwrap(), 1000).unwrap(),
            ratio(16, 975)
        );
        assert_eq!(round(p(&kernel, 9.488, 4), 2), 0.05);
        assert_eq!(
            limit_denominator(&four.cdf_f64(&kernel, 9.488).unwrap(), 1000).unwrap(),
            ratio(1, 20)
        );
    }

    #[test]
    fn test_cdf_at_zero_is_one() {
        let kernel = GammaKernel::new();
        for k in 1..8 {
            let v = ChiSquared::new(k).unwrap().cdf(&kernel, &integer(0)).unwrap();
            assert_eq!(v, Rational::one());
        }
    }

    #[test]
    fn test_bounds_and_monotonicity() {
        let kernel = GammaKernel::new();
        for k in [1, 2, 3, 4, 6, 9] {
            let mut previous: Option<f64> = None;
            for step in 0..=60 {
                let x = step as f64 * 0.5;
                let v = p(&kernel, x, k);
                assert!((-1e-6..=1.0 + 1e-6).contains(&v), "cdf({}, {}) = {}", x, k, v);
                if let Some(prev) = previous {
                    // Tail probability falls as the statistic grows.
                    assert!(v <= prev + 1e-7, "cdf({}, {}) = {} > {}", x, k, v, prev);
                }
                previous = Some(v);
            }
        }
    }

    #[test]
    fn test_lower_tail_is_complement() {
        let kernel = GammaKernel::new();
        let six = ChiSquared::new(6).unwrap();
        let x = from_f64(19.18).unwrap();
        let upper = six.cdf(&kernel, &x).unwrap();
        let lower = six.lower_tail(&kernel, &x).unwrap();
        assert_eq!(upper + lower, Rational::one());

        let two = ChiSquared::new(2).unwrap();
        let mut previous = Rational::from_integer(0.into());
        for step in 1..=20 {
            let v = two.lower_tail(&kernel, &integer(step)).unwrap();
            // Closed form for two degrees of freedom is 1 - e^(-x/2).
            assert!((to_f64(&v) - (1.0 - (-(step as f64) / 2.0).exp())).abs() < 1e-7);
            assert!(v >= previous);
            previous = v;
        }
    }

    #[test]
    fn test_large_statistic_reports_truncation() {
        let kernel = GammaKernel::new();
        let six = ChiSquared::new(6).unwrap();

        let converged = six.cdf_series(&kernel, &integer(40)).unwrap();
        assert!(converged.converged);
        assert!(to_f64(&converged.value) < 1e-5);
        assert_eq!(converged.value, six.cdf(&kernel, &integer(40)).unwrap());

        for x in [70, 80, 200] {
            let series = six.cdf_series(&kernel, &integer(x)).unwrap();
            assert!(!series.converged, "cdf({}, 6) should hit the term cap", x);
            assert_eq!(series.terms, kernel.config().max_terms);
        }
    }

    #[test]
    fn test_invalid_arguments() {
        assert!(matches!(
            ChiSquared::new(0),
            Err(ChiSquaredError::InvalidDegreesOfFreedom(0))
        ));
        assert!(cdf(&ratio(-1, 2), 3).is_err());
        assert!(cdf(&ratio(1, 2), 3).is_ok());
    }
}
