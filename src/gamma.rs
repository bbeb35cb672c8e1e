//! Gamma
//!
//! Lower incomplete gamma function as a power series over exact rationals,
//! and the complete gamma function at integers and half-integers.
use crate::constants::{sqrt_pi, DEFAULT_MAX_TERMS, DEFAULT_TOLERANCE};
use crate::errors::ChiSquaredError;
use crate::factorial::Factorials;
use crate::rational::{from_f64, integer, pow, ratio, Rational};
use log::warn;
use num::bigint::BigInt;
use num::traits::{Signed, ToPrimitive, Zero};
use serde::{Deserialize, Serialize};

fn default_tolerance() -> f64 {
    DEFAULT_TOLERANCE
}
fn default_max_terms() -> usize {
    DEFAULT_MAX_TERMS
}

/// Stopping rule of the incomplete gamma series.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SeriesConfig {
    /// The sum stops at the first term whose magnitude is below this value.
    #[serde(default = "default_tolerance")]
    pub tolerance: f64,
    /// Maximum number of terms added before the partial sum is returned.
    #[serde(default = "default_max_terms")]
    pub max_terms: usize,
}

impl Default for SeriesConfig {
    fn default() -> Self {
        SeriesConfig {
            tolerance: default_tolerance(),
            max_terms: default_max_terms(),
        }
    }
}

impl SeriesConfig {
    /// Set the absolute tolerance.
    /// * `tolerance` - Terms smaller than this in magnitude end the series.
    pub fn set_tolerance(mut self, tolerance: f64) -> Self {
        self.tolerance = tolerance;
        self
    }

    /// Set the term cap.
    /// * `max_terms` - Number of terms summed before giving up on the tolerance.
    pub fn set_max_terms(mut self, max_terms: usize) -> Self {
        self.max_terms = max_terms;
        self
    }

    pub fn validate(&self) -> Result<(), ChiSquaredError> {
        if !(self.tolerance.is_finite() && self.tolerance > 0.0) {
            return Err(ChiSquaredError::InvalidParameter(
                "tolerance".to_string(),
                "a finite value > 0".to_string(),
                self.tolerance.to_string(),
            ));
        }
        if self.max_terms == 0 {
            return Err(ChiSquaredError::InvalidParameter(
                "max_terms".to_string(),
                "an integer >= 1".to_string(),
                self.max_terms.to_string(),
            ));
        }
        Ok(())
    }

    /// Load a configuration from a JSON string, missing fields take their defaults.
    pub fn from_json(json_str: &str) -> Result<Self, ChiSquaredError> {
        let cfg: SeriesConfig = serde_json::from_str(json_str)?;
        cfg.validate()?;
        Ok(cfg)
    }

    pub fn to_json(&self) -> Result<String, ChiSquaredError> {
        Ok(serde_json::to_string(self)?)
    }
}

/// Outcome of summing the incomplete gamma series.
#[derive(Clone, Debug, PartialEq)]
pub struct SeriesSum {
    /// The (partial) sum.
    pub value: Rational,
    /// Number of terms added.
    pub terms: usize,
    /// False when the term cap was reached before the tolerance.
    pub converged: bool,
}

/// Numeric kernel owning the series configuration and the factorial cache.
#[derive(Debug, Default)]
pub struct GammaKernel {
    cfg: SeriesConfig,
    factorials: Factorials,
}

impl GammaKernel {
    /// Kernel with the default tolerance of 1e-8 and a 100 term cap.
    pub fn new() -> Self {
        GammaKernel::default()
    }

    pub fn with_config(cfg: SeriesConfig) -> Result<Self, ChiSquaredError> {
        cfg.validate()?;
        Ok(GammaKernel {
            cfg,
            factorials: Factorials::new(),
        })
    }

    pub fn config(&self) -> &SeriesConfig {
        &self.cfg
    }

    pub fn factorials(&self) -> &Factorials {
        &self.factorials
    }

    /// Lower incomplete gamma function `γ(s, z)`.
    ///
    /// Sums `(-1)^k / k! · z^(s+k) / (s+k)` for `k = 0, 1, ...` and stops at the
    /// first term whose magnitude is below the tolerance; that term is not added.
    /// If the term cap is reached first, a warning is logged and the partial
    /// sum is returned.
    ///
    /// * `s` - Shape, must be > 0.
    /// * `z` - Upper integration limit, must be >= 0.
    pub fn lower_incomplete(&self, s: &Rational, z: &Rational) -> Result<Rational, ChiSquaredError> {
        Ok(self.lower_incomplete_series(s, z)?.value)
    }

    /// Same as [`GammaKernel::lower_incomplete`], also reporting how the series ended.
    pub fn lower_incomplete_series(&self, s: &Rational, z: &Rational) -> Result<SeriesSum, ChiSquaredError> {
        if !s.is_positive() {
            return Err(ChiSquaredError::InvalidParameter(
                "s".to_string(),
                "a shape > 0".to_string(),
                s.to_string(),
            ));
        }
        if z.is_negative() {
            return Err(ChiSquaredError::InvalidParameter(
                "z".to_string(),
                "a value >= 0".to_string(),
                z.to_string(),
            ));
        }

        let tolerance = from_f64(self.cfg.tolerance)?;
        let mut power = pow(z, s)?;
        let mut sum = Rational::zero();
        for k in 0..self.cfg.max_terms {
            if k > 0 {
                power *= z;
            }
            let exponent = s + integer(k as u64);
            let sign = if k % 2 == 0 { BigInt::from(1) } else { BigInt::from(-1) };
            let term = Rational::new(sign, self.factorials.get(k)) * &power / exponent;
            if term.abs() < tolerance {
                return Ok(SeriesSum {
                    value: sum,
                    terms: k,
                    converged: true,
                });
            }
            sum += term;
        }

        warn!(
            "Reached the limit of {} gamma series terms for s={}, z={} before the terms fell below {}. Returning the partial sum.",
            self.cfg.max_terms, s, z, self.cfg.tolerance
        );
        Ok(SeriesSum {
            value: sum,
            terms: self.cfg.max_terms,
            converged: false,
        })
    }

    /// Complete gamma function `Γ(k)` for a positive integer or half-integer `k`.
    ///
    /// `Γ(n) = (n-1)!` and `Γ(n + 1/2) = (2n)! / (4^n n!) · √π`, with √π taken
    /// from [`crate::constants::SQRT_PI_NUMER`].
    pub fn complete_half(&self, k: &Rational) -> Result<Rational, ChiSquaredError> {
        let unsupported = || ChiSquaredError::UnsupportedGammaArgument(k.to_string());
        if !k.is_positive() {
            return Err(unsupported());
        }
        if k.is_integer() {
            let n = k.to_integer().to_usize().ok_or_else(unsupported)?;
            return Ok(Rational::from_integer(self.factorials.get(n - 1)));
        }
        if k.denom() == &BigInt::from(2) {
            let n = (k - ratio(1, 2)).to_integer().to_usize().ok_or_else(unsupported)?;
            return Ok(self.factorials.double_factorial_ratio(n) * sqrt_pi());
        }
        Err(unsupported())
    }
}
