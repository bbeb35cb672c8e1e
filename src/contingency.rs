//! Contingency table
//!
//! Cross-tabulation of counted `(row, column)` observations, the expected
//! table under independence and the chi-squared statistic, all as exact
//! rationals.
use crate::errors::ChiSquaredError;
use crate::rational::{integer, Rational};
use hashbrown::HashMap;
use num::traits::Zero;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use std::fmt::{self, Debug, Display};
use std::hash::Hash;
use std::str::FromStr;

/// Label usable as a row or column category. Its `Display` form is the label
/// shown in errors and reports.
pub trait Category: Ord + Hash + Clone + Debug + Display {}
impl<T: Ord + Hash + Clone + Debug + Display> Category for T {}

/// Side of a contingency table.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Axis {
    Row,
    Column,
}

impl Display for Axis {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Axis::Row => f.write_str("row"),
            Axis::Column => f.write_str("column"),
        }
    }
}

impl FromStr for Axis {
    type Err = ChiSquaredError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "row" | "Row" => Ok(Axis::Row),
            "column" | "Column" => Ok(Axis::Column),
            _ => Err(ChiSquaredError::ParseString(
                s.to_string(),
                "Axis".to_string(),
                "row, column".to_string(),
            )),
        }
    }
}

/// One counted `(row, column)` pair.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Observation<R, C> {
    pub row: R,
    pub column: C,
    pub count: u64,
}

impl<R, C> Observation<R, C> {
    pub fn new(row: R, column: C, count: u64) -> Self {
        Observation { row, column, count }
    }
}

/// Observed counts keyed by `(row, column)`.
///
/// Cells that were never observed count as zero. Labels are kept sorted so
/// every derived table iterates in the same order.
#[derive(Clone, Debug)]
pub struct ContingencyTable<R, C> {
    observed: HashMap<(R, C), u64>,
    rows: BTreeSet<R>,
    columns: BTreeSet<C>,
}

impl<R: Category, C: Category> Default for ContingencyTable<R, C> {
    fn default() -> Self {
        Self::new()
    }
}

impl<R: Category, C: Category> ContingencyTable<R, C> {
    pub fn new() -> Self {
        ContingencyTable {
            observed: HashMap::new(),
            rows: BTreeSet::new(),
            columns: BTreeSet::new(),
        }
    }

    /// Tally raw pairs, one observation each.
    pub fn from_pairs<I: IntoIterator<Item = (R, C)>>(pairs: I) -> Self {
        let mut table = Self::new();
        for (row, column) in pairs {
            table.add(row, column, 1);
        }
        table
    }

    pub fn from_observations<I: IntoIterator<Item = Observation<R, C>>>(observations: I) -> Self {
        let mut table = Self::new();
        for o in observations {
            table.add(o.row, o.column, o.count);
        }
        table
    }

    /// Accumulate `count` into the `(row, column)` cell.
    ///
    /// A zero count still registers both labels, which makes their marginal
    /// totals visible (and possibly zero).
    pub fn add(&mut self, row: R, column: C, count: u64) {
        self.rows.insert(row.clone());
        self.columns.insert(column.clone());
        *self.observed.entry((row, column)).or_insert(0) += count;
    }

    /// Observed count of a cell, zero when it was never seen.
    pub fn observed(&self, row: &R, column: &C) -> u64 {
        self.observed.get(&(row.clone(), column.clone())).copied().unwrap_or(0)
    }

    pub fn row_labels(&self) -> impl Iterator<Item = &R> {
        self.rows.iter()
    }

    pub fn column_labels(&self) -> impl Iterator<Item = &C> {
        self.columns.iter()
    }

    /// Every cell of the row by column cross product, in label order.
    pub fn cells(&self) -> Vec<Observation<R, C>> {
        self.rows
            .iter()
            .flat_map(|r| {
                self.columns
                    .iter()
                    .map(move |c| Observation::new(r.clone(), c.clone(), self.observed(r, c)))
            })
            .collect()
    }

    pub fn row_totals(&self) -> BTreeMap<R, u64> {
        let mut totals: BTreeMap<R, u64> = self.rows.iter().map(|r| (r.clone(), 0)).collect();
        for ((r, _), v) in self.observed.iter() {
            if let Some(t) = totals.get_mut(r) {
                *t += v;
            }
        }
        totals
    }

    pub fn column_totals(&self) -> BTreeMap<C, u64> {
        let mut totals: BTreeMap<C, u64> = self.columns.iter().map(|c| (c.clone(), 0)).collect();
        for ((_, c), v) in self.observed.iter() {
            if let Some(t) = totals.get_mut(c) {
                *t += v;
            }
        }
        totals
    }

    pub fn grand_total(&self) -> u64 {
        self.observed.values().sum()
    }

    /// `(rows - 1) · (columns - 1)`, zero for a single row or column.
    pub fn degrees_of_freedom(&self) -> u64 {
        let rows = self.rows.len().saturating_sub(1) as u64;
        let columns = self.columns.len().saturating_sub(1) as u64;
        rows * columns
    }

    /// Share of the grand total in each row.
    pub fn row_probabilities(&self) -> Result<BTreeMap<R, Rational>, ChiSquaredError> {
        let total = self.nonzero_grand_total()?;
        Ok(self
            .row_totals()
            .into_iter()
            .map(|(r, t)| (r, integer(t) / &total))
            .collect())
    }

    /// Share of the grand total in each column.
    pub fn column_probabilities(&self) -> Result<BTreeMap<C, Rational>, ChiSquaredError> {
        let total = self.nonzero_grand_total()?;
        Ok(self
            .column_totals()
            .into_iter()
            .map(|(c, t)| (c, integer(t) / &total))
            .collect())
    }

    /// Expected counts under independence: `row_total · column_total / grand_total`
    /// for every cell of the cross product.
    pub fn expected(&self) -> Result<ExpectedTable<R, C>, ChiSquaredError> {
        let total = self.nonzero_grand_total()?;
        let row_totals = self.row_totals();
        let column_totals = self.column_totals();
        if let Some((r, _)) = row_totals.iter().find(|(_, t)| **t == 0) {
            return Err(ChiSquaredError::DegenerateCategory {
                axis: Axis::Row,
                label: r.to_string(),
            });
        }
        if let Some((c, _)) = column_totals.iter().find(|(_, t)| **t == 0) {
            return Err(ChiSquaredError::DegenerateCategory {
                axis: Axis::Column,
                label: c.to_string(),
            });
        }

        let mut cells = BTreeMap::new();
        for (r, rt) in row_totals.iter() {
            for (c, ct) in column_totals.iter() {
                let e = integer(*rt) * integer(*ct) / &total;
                cells.insert((r.clone(), c.clone()), e);
            }
        }
        Ok(ExpectedTable { cells })
    }

    /// `Σ (expected − observed)² / expected` over every cell of the cross product.
    pub fn chi_squared(&self) -> Result<Rational, ChiSquaredError> {
        let expected = self.expected()?;
        let mut statistic = Rational::zero();
        for ((r, c), e) in expected.cells() {
            let diff = e - integer(self.observed(r, c));
            statistic += &diff * &diff / e;
        }
        Ok(statistic)
    }

    fn nonzero_grand_total(&self) -> Result<Rational, ChiSquaredError> {
        match self.grand_total() {
            0 => Err(ChiSquaredError::EmptyTable),
            t => Ok(integer(t)),
        }
    }
}

/// Expected counts keyed by `(row, column)`.
#[derive(Clone, Debug, PartialEq)]
pub struct ExpectedTable<R, C> {
    cells: BTreeMap<(R, C), Rational>,
}

impl<R: Category, C: Category> ExpectedTable<R, C> {
    pub fn get(&self, row: &R, column: &C) -> Option<&Rational> {
        self.cells.get(&(row.clone(), column.clone()))
    }

    pub fn cells(&self) -> impl Iterator<Item = (&(R, C), &Rational)> {
        self.cells.iter()
    }

    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    /// Sum of the expected counts in a row, equal to the observed row total.
    pub fn row_sum(&self, row: &R) -> Rational {
        self.cells
            .iter()
            .filter(|((r, _), _)| r == row)
            .fold(Rational::zero(), |acc, (_, e)| acc + e)
    }

    /// Sum of the expected counts in a column, equal to the observed column total.
    pub fn column_sum(&self, column: &C) -> Rational {
        self.cells
            .iter()
            .filter(|((_, c), _)| c == column)
            .fold(Rational::zero(), |acc, (_, e)| acc + e)
    }
}
