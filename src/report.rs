//! Report
//!
//! Flattens a contingency table into plain strings, integers and rationals so
//! it can be rendered as text or emitted as JSON. Nothing here feeds back into
//! the numeric code.
use crate::contingency::{Category, ContingencyTable};
use crate::errors::ChiSquaredError;
use crate::rational::{to_f64, Rational};
use num::traits::Zero;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt::{self, Display};

/// One cell of the report.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ReportCell {
    pub row: String,
    pub column: String,
    pub observed: u64,
    /// Exact expected count as `numerator/denominator`.
    pub expected: String,
    /// Expected count rounded to the nearest float, for display.
    pub expected_f64: f64,
}

/// Observed and expected tables with their marginal totals.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ContingencyReport {
    pub title: String,
    /// Heading of the row label column, e.g. `shift`.
    pub row_header: String,
    pub rows: Vec<String>,
    pub columns: Vec<String>,
    pub cells: Vec<ReportCell>,
    pub row_totals: BTreeMap<String, u64>,
    pub column_totals: BTreeMap<String, u64>,
    pub grand_total: u64,
}

impl ContingencyReport {
    pub fn from_table<R, C>(title: &str, row_header: &str, table: &ContingencyTable<R, C>) -> Result<Self, ChiSquaredError>
    where
        R: Category,
        C: Category,
    {
        let expected = table.expected()?;
        let cells = table
            .cells()
            .into_iter()
            .map(|o| {
                let e = expected.get(&o.row, &o.column).cloned().unwrap_or_else(Rational::zero);
                ReportCell {
                    row: o.row.to_string(),
                    column: o.column.to_string(),
                    observed: o.count,
                    expected: e.to_string(),
                    expected_f64: to_f64(&e),
                }
            })
            .collect();
        Ok(ContingencyReport {
            title: title.to_string(),
            row_header: row_header.to_string(),
            rows: table.row_labels().map(|r| r.to_string()).collect(),
            columns: table.column_labels().map(|c| c.to_string()).collect(),
            cells,
            row_totals: table.row_totals().into_iter().map(|(r, t)| (r.to_string(), t)).collect(),
            column_totals: table
                .column_totals()
                .into_iter()
                .map(|(c, t)| (c.to_string(), t))
                .collect(),
            grand_total: table.grand_total(),
        })
    }

    pub fn to_json(&self) -> Result<String, ChiSquaredError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    fn cell(&self, row: &str, column: &str) -> Option<&ReportCell> {
        self.cells.iter().find(|c| c.row == row && c.column == column)
    }

    fn header(&self) -> Vec<String> {
        let mut header = vec![self.row_header.clone()];
        for c in self.columns.iter() {
            header.push(format!("{} obs", c));
            header.push(format!("{} exp", c));
        }
        header.push("total".to_string());
        header
    }

    fn body(&self) -> Vec<Vec<String>> {
        let mut body = Vec::with_capacity(self.rows.len());
        for r in self.rows.iter() {
            let mut line = vec![r.clone()];
            for c in self.columns.iter() {
                let (observed, expected) = self.cell(r, c).map_or((0, 0.0), |x| (x.observed, x.expected_f64));
                line.push(format!("{:3}", observed));
                line.push(format!("{:5.2}", expected));
            }
            line.push(format!("{:3}", self.row_totals.get(r).copied().unwrap_or(0)));
            body.push(line);
        }
        body
    }

    fn footer(&self) -> Vec<String> {
        let mut footer = vec!["total".to_string()];
        for c in self.columns.iter() {
            footer.push(format!("{:3}", self.column_totals.get(c).copied().unwrap_or(0)));
            footer.push(String::new());
        }
        footer.push(format!("{:3}", self.grand_total));
        footer
    }

    /// Box-drawn text table: label column, an `obs`/`exp` pair per column
    /// category and the row total, followed by a totals row.
    pub fn render(&self) -> String {
        let header = self.header();
        let body = self.body();
        let footer = self.footer();

        let mut widths: Vec<usize> = header.iter().map(|h| h.chars().count()).collect();
        for line in body.iter().chain(std::iter::once(&footer)) {
            for (w, v) in widths.iter_mut().zip(line.iter()) {
                *w = (*w).max(v.chars().count());
            }
        }
        let table_width = widths.iter().map(|w| w + 3).sum::<usize>() + 1;

        let mut out = String::new();
        out.push_str(&format!("{:^width$}", self.title, width = table_width).trim_end().to_string());
        out.push('\n');
        out.push_str(&rule(&widths, '┌', '┬', '┐'));
        out.push_str(&line(&widths, &header));
        out.push_str(&rule(&widths, '├', '┼', '┤'));
        for l in body.iter() {
            out.push_str(&line(&widths, l));
        }
        out.push_str(&rule(&widths, '├', '┼', '┤'));
        out.push_str(&line(&widths, &footer));
        out.push_str(&rule(&widths, '└', '┴', '┘'));
        out
    }
}

impl Display for ContingencyReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.render())
    }
}

fn rule(widths: &[usize], left: char, middle: char, right: char) -> String {
    let segments: Vec<String> = widths.iter().map(|w| "─".repeat(w + 2)).collect();
    format!("{}{}{}\n", left, segments.join(&middle.to_string()), right)
}

fn line(widths: &[usize], values: &[String]) -> String {
    let mut s = String::from("│");
    for (w, v) in widths.iter().zip(values.iter()) {
        let pad = w - v.chars().count();
        s.push(' ');
        s.push_str(v);
        s.push_str(&" ".repeat(pad + 1));
        s.push('│');
    }
    s.push('\n');
    s
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::contingency::Observation;

    fn small_table() -> ContingencyTable<String, String> {
        ContingencyTable::from_observations(vec![
            Observation::new("1".to_string(), "A".to_string(), 15),
            Observation::new("1".to_string(), "B".to_string(), 21),
            Observation::new("2".to_string(), "A".to_string(), 26),
            Observation::new("2".to_string(), "B".to_string(), 31),
        ])
    }

    #[test]
    fn test_report_values() {
        let report = ContingencyReport::from_table("Contingency Table", "shift", &small_table()).unwrap();
        assert_eq!(report.row_header, "shift");
        assert_eq!(report.rows, vec!["1", "2"]);
        assert_eq!(report.columns, vec!["A", "B"]);
        assert_eq!(report.cells.len(), 4);
        assert_eq!((report.cells[1].row.as_str(), report.cells[1].column.as_str()), ("1", "B"));
        assert_eq!(report.grand_total, 93);
        assert_eq!(report.row_totals["1"], 36);
        assert_eq!(report.column_totals["B"], 52);
        let cell = report.cell("1", "A").unwrap();
        assert_eq!(cell.observed, 15);
        // 36 · 41 / 93
        assert_eq!(cell.expected, "492/31");
        assert!((cell.expected_f64 - 492.0 / 31.0).abs() < 1e-12);
    }

    #[test]
    fn test_render() {
        let report = ContingencyReport::from_table("Contingency Table", "shift", &small_table()).unwrap();
        let text = report.render();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines[0].trim(), "Contingency Table");
        assert_eq!(lines[2], "│ shift │ A obs │ A exp │ B obs │ B exp │ total │");
        assert_eq!(lines[4], "│ 1     │  15   │ 15.87 │  21   │ 20.13 │  36   │");
        assert_eq!(lines[7], "│ total │  41   │       │  52   │       │  93   │");
        assert!(lines[8].starts_with('└'));
        let width = lines[1].chars().count();
        assert!(lines[1..].iter().all(|l| l.chars().count() == width));
        assert_eq!(format!("{}", report), text);
    }

    #[test]
    fn test_to_json() {
        let report = ContingencyReport::from_table("t", "shift", &small_table()).unwrap();
        let json = report.to_json().unwrap();
        let back: ContingencyReport = serde_json::from_str(&json).unwrap();
        assert_eq!(back, report);
    }

    #[test]
    fn test_degenerate_table_is_rejected() {
        let mut table = small_table();
        table.add("3".to_string(), "A".to_string(), 0);
        assert!(ContingencyReport::from_table("t", "shift", &table).is_err());
    }
}
