//! Analysis
//!
//! End to end independence test: statistic, degrees of freedom and p-value of
//! a contingency table.
use crate::contingency::{Category, ContingencyTable};
use crate::distribution::ChiSquared;
use crate::errors::ChiSquaredError;
use crate::gamma::GammaKernel;
use crate::rational::{limit_denominator, to_f64, Rational};
use log::info;
use serde::{Serialize, Serializer};

const UNCONVERGED: &str = " (series did not converge)";

fn serialize_rational<S: Serializer>(value: &Rational, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_str(&value.to_string())
}

/// Result of a chi-squared independence test.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Analysis {
    /// Exact chi-squared statistic.
    #[serde(serialize_with = "serialize_rational")]
    pub statistic: Rational,
    pub degrees_of_freedom: u64,
    /// `1 − γ(k/2, x/2) / Γ(k/2)` at the statistic.
    #[serde(serialize_with = "serialize_rational")]
    pub p_value: Rational,
    /// False when the gamma series hit its term cap, the p-value is then unreliable.
    pub converged: bool,
}

impl Analysis {
    /// Run the test on `table` with `(rows - 1) · (columns - 1)` degrees of freedom.
    pub fn run<R: Category, C: Category>(
        kernel: &GammaKernel,
        table: &ContingencyTable<R, C>,
    ) -> Result<Self, ChiSquaredError> {
        let degrees_of_freedom = table.degrees_of_freedom();
        let statistic = table.chi_squared()?;
        let tail = ChiSquared::new(degrees_of_freedom)?.cdf_series(kernel, &statistic)?;
        let analysis = Analysis {
            statistic,
            degrees_of_freedom,
            p_value: tail.value,
            converged: tail.converged,
        };
        info!(
            "χ² = {:.4} with {} degrees of freedom, P = {:.6}",
            analysis.statistic_f64(),
            degrees_of_freedom,
            analysis.p_value_f64()
        );
        Ok(analysis)
    }

    pub fn statistic_f64(&self) -> f64 {
        to_f64(&self.statistic)
    }

    pub fn p_value_f64(&self) -> f64 {
        to_f64(&self.p_value)
    }

    /// Closest fraction to the statistic with a denominator of at most `max_denominator`.
    pub fn statistic_approx(&self, max_denominator: u64) -> Result<Rational, ChiSquaredError> {
        limit_denominator(&self.statistic, max_denominator)
    }

    /// Closest fraction to the p-value with a denominator of at most `max_denominator`.
    pub fn p_value_approx(&self, max_denominator: u64) -> Result<Rational, ChiSquaredError> {
        limit_denominator(&self.p_value, max_denominator)
    }

    /// Three display lines: the statistic as a float, as a small fraction with
    /// the p-value in percent, and both as small fractions. P-values from a
    /// series that did not converge are flagged.
    pub fn summary(&self) -> Result<String, ChiSquaredError> {
        let flag = if self.converged { "" } else { UNCONVERGED };
        Ok(format!(
            "χ² = {:.2}\nχ² = {}, P = {:.3}%{}\nχ² = {}, P = {}{}",
            self.statistic_f64(),
            self.statistic_approx(50)?,
            self.p_value_f64() * 100.0,
            flag,
            self.statistic_approx(100)?,
            self.p_value_approx(1000)?,
            flag,
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::contingency::Observation;
    use crate::rational::ratio;

    #[test]
    fn test_single_row_has_no_degrees_of_freedom() {
        let table = ContingencyTable::from_observations(vec![
            Observation::new("x", "a", 3),
            Observation::new("x", "b", 5),
        ]);
        let kernel = GammaKernel::new();
        assert!(matches!(
            Analysis::run(&kernel, &table),
            Err(ChiSquaredError::InvalidDegreesOfFreedom(0))
        ));
    }

    #[test]
    fn test_independent_table() {
        let table = ContingencyTable::from_observations(vec![
            Observation::new("x", "a", 10),
            Observation::new("x", "b", 20),
            Observation::new("y", "a", 5),
            Observation::new("y", "b", 10),
        ]);
        let analysis = Analysis::run(&GammaKernel::new(), &table).unwrap();
        assert_eq!(analysis.statistic, ratio(0, 1));
        assert_eq!(analysis.degrees_of_freedom, 1);
        assert_eq!(analysis.p_value, ratio(1, 1));
        assert!(analysis.converged);
        assert!(!analysis.summary().unwrap().contains("did not converge"));
    }

    #[test]
    fn test_serialize() {
        let analysis = Analysis {
            statistic: ratio(326, 17),
            degrees_of_freedom: 6,
            p_value: ratio(3, 775),
            converged: true,
        };
        let json = serde_json::to_string(&analysis).unwrap();
        assert_eq!(
            json,
            r#"{"statistic":"326/17","degrees_of_freedom":6,"p_value":"3/775","converged":true}"#
        );
    }

    #[test]
    fn test_strongly_dependent_table_is_flagged() {
        let table = ContingencyTable::from_observations(vec![
            Observation::new("x", "a", 90),
            Observation::new("x", "b", 10),
            Observation::new("y", "a", 10),
            Observation::new("y", "b", 90),
        ]);
        let analysis = Analysis::run(&GammaKernel::new(), &table).unwrap();
        assert_eq!(analysis.statistic, ratio(128, 1));
        assert_eq!(analysis.degrees_of_freedom, 1);
        assert!(!analysis.converged);

        let summary = analysis.summary().unwrap();
        let lines: Vec<&str> = summary.lines().collect();
        assert_eq!(lines[0], "χ² = 128.00");
        assert!(lines[1].ends_with(" (series did not converge)"));
        assert!(lines[2].ends_with(" (series did not converge)"));

        let json = serde_json::to_string(&analysis).unwrap();
        assert!(json.ends_with(r#""converged":false}"#));
    }
}
