//! Chi-squared independence testing over contingency tables.
//!
//! Counts are tallied into a [`ContingencyTable`], expected counts and the
//! statistic are computed as exact rationals, and the statistic is mapped to a
//! p-value with an incomplete gamma series that is also summed exactly.

// Modules
pub mod analysis;
pub mod constants;
pub mod contingency;
pub mod distribution;
pub mod errors;
pub mod factorial;
pub mod gamma;
pub mod ingest;
pub mod rational;
pub mod report;


// Individual classes, and functions
pub use analysis::Analysis;
pub use contingency::{Axis, ContingencyTable, ExpectedTable, Observation};
pub use distribution::{cdf, ChiSquared};
pub use errors::ChiSquaredError;
pub use gamma::{GammaKernel, SeriesConfig, SeriesSum};
pub use rational::Rational;
pub use report::ContingencyReport;
