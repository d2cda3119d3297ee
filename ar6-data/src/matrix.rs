//! Plot-ready matrices for the sequestration bar chart.
//!
//! A [`PlotMatrix`] is the pivot of a quantile summary: rows are labelled
//! `"<year> <category>"`, columns are `(quantile, variable)` pairs. Selecting
//! one quantile yields a [`SubMatrix`] keyed by variable, which is what the
//! bars (median) and error bars (lower/upper quartile) are drawn from.

use crate::error::{DataError, Result};
use ar6_frame::{Filter, ScenarioFrame};
use serde::Serialize;
use std::collections::{BTreeMap, BTreeSet};

/// Divisor applied when pivoting (Mt to Gt).
pub const DEFAULT_SCALE: f64 = 1e3;

/// Column key of a [`PlotMatrix`].
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct ColumnKey {
    pub scenario: String,
    pub variable: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct PlotMatrix {
    rows: Vec<String>,
    columns: Vec<ColumnKey>,
    values: Vec<Vec<Option<f64>>>,
}

/// One scenario (quantile) of a [`PlotMatrix`], columns keyed by variable.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct SubMatrix {
    rows: Vec<String>,
    columns: Vec<String>,
    values: Vec<Vec<Option<f64>>>,
}

/// Asymmetric error of one column: distance from the median down to the
/// lower bound and up to the upper bound, per row.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ErrorSpan {
    pub column: String,
    pub minus: Vec<Option<f64>>,
    pub plus: Vec<Option<f64>>,
}

impl PlotMatrix {
    /// Pivot `frame` for plotting.
    ///
    /// Keeps `years`, labels rows `"<year> <model>"`, spreads
    /// `(scenario, variable)` into columns, divides every value by `scale`
    /// and finally reverses the row order for display.
    pub fn from_frame(frame: &ScenarioFrame, years: &[i32], scale: f64) -> Result<Self> {
        let selected = frame.filter(&Filter::new().years(years.iter().copied()));
        let mut cells: BTreeMap<(String, ColumnKey), f64> = BTreeMap::new();
        for row in selected.as_long(false) {
            let label = format!("{} {}", row.year, row.model);
            let column = ColumnKey {
                scenario: row.scenario,
                variable: row.variable,
            };
            let description = format!("{label} / {} / {}", column.scenario, column.variable);
            if cells.insert((label, column), row.value).is_some() {
                return Err(DataError::DuplicateEntry(description));
            }
        }

        let rows: Vec<String> = cells
            .keys()
            .map(|(row, _)| row.clone())
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect();
        let columns: Vec<ColumnKey> = cells
            .keys()
            .map(|(_, column)| column.clone())
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect();
        let values = rows
            .iter()
            .map(|row| {
                columns
                    .iter()
                    .map(|column| {
                        cells
                            .get(&(row.clone(), column.clone()))
                            .map(|value| value / scale)
                    })
                    .collect()
            })
            .collect();

        let matrix = PlotMatrix {
            rows,
            columns,
            values,
        }
        .reversed();
        log::debug!(
            "[AR6] matrix: {} rows x {} columns",
            matrix.rows.len(),
            matrix.columns.len()
        );
        Ok(matrix)
    }

    pub fn rows(&self) -> &[String] {
        &self.rows
    }

    pub fn columns(&self) -> &[ColumnKey] {
        &self.columns
    }

    pub fn values(&self) -> &[Vec<Option<f64>>] {
        &self.values
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn get(&self, row: &str, scenario: &str, variable: &str) -> Option<f64> {
        let r = self.rows.iter().position(|label| label == row)?;
        let c = self
            .columns
            .iter()
            .position(|key| key.scenario == scenario && key.variable == variable)?;
        self.values[r][c]
    }

    /// Same matrix with the row order reversed.
    pub fn reversed(&self) -> Self {
        PlotMatrix {
            rows: self.rows.iter().rev().cloned().collect(),
            columns: self.columns.clone(),
            values: self.values.iter().rev().cloned().collect(),
        }
    }

    /// Distinct variables in column order.
    pub fn variables(&self) -> Vec<String> {
        let mut seen = BTreeSet::new();
        self.columns
            .iter()
            .filter(|key| seen.insert(key.variable.as_str()))
            .map(|key| key.variable.clone())
            .collect()
    }

    /// Select the columns of one scenario (quantile label).
    pub fn scenario(&self, scenario: &str) -> Result<SubMatrix> {
        let picked: Vec<usize> = self
            .columns
            .iter()
            .enumerate()
            .filter(|(_, key)| key.scenario == scenario)
            .map(|(i, _)| i)
            .collect();
        if picked.is_empty() {
            return Err(DataError::MissingColumn(scenario.to_string()));
        }
        Ok(SubMatrix {
            rows: self.rows.clone(),
            columns: picked
                .iter()
                .map(|i| self.columns[*i].variable.clone())
                .collect(),
            values: self
                .values
                .iter()
                .map(|row| picked.iter().map(|i| row[*i]).collect())
                .collect(),
        })
    }
}

impl SubMatrix {
    pub fn new(rows: Vec<String>, columns: Vec<String>, values: Vec<Vec<Option<f64>>>) -> Self {
        SubMatrix {
            rows,
            columns,
            values,
        }
    }

    pub fn rows(&self) -> &[String] {
        &self.rows
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn values(&self) -> &[Vec<Option<f64>>] {
        &self.values
    }

    pub fn column(&self, name: &str) -> Option<Vec<Option<f64>>> {
        let c = self.columns.iter().position(|col| col == name)?;
        Some(self.values.iter().map(|row| row[c]).collect())
    }

    /// Keep only `order`, in that order.
    pub fn select<S: AsRef<str>>(&self, order: &[S]) -> Result<SubMatrix> {
        let picked = order
            .iter()
            .map(|name| {
                self.columns
                    .iter()
                    .position(|col| col == name.as_ref())
                    .ok_or_else(|| DataError::MissingColumn(name.as_ref().to_string()))
            })
            .collect::<Result<Vec<_>>>()?;
        Ok(SubMatrix {
            rows: self.rows.clone(),
            columns: picked.iter().map(|i| self.columns[*i].clone()).collect(),
            values: self
                .values
                .iter()
                .map(|row| picked.iter().map(|i| row[*i]).collect())
                .collect(),
        })
    }

    /// Sum of every row; missing cells count as zero.
    pub fn row_sums(&self) -> Vec<f64> {
        self.values
            .iter()
            .map(|row| row.iter().flatten().sum())
            .collect()
    }
}

/// Error spans `[base - lower, upper - base]` for every column of `base`.
pub fn error_bars(base: &SubMatrix, lower: &SubMatrix, upper: &SubMatrix) -> Result<Vec<ErrorSpan>> {
    base.columns
        .iter()
        .map(|name| -> Result<ErrorSpan> {
            let median = base
                .column(name)
                .ok_or_else(|| DataError::MissingColumn(name.clone()))?;
            let low = lower
                .column(name)
                .ok_or_else(|| DataError::MissingColumn(name.clone()))?;
            let high = upper
                .column(name)
                .ok_or_else(|| DataError::MissingColumn(name.clone()))?;
            let diff = |a: &[Option<f64>], b: &[Option<f64>]| -> Vec<Option<f64>> {
                a.iter()
                    .zip(b)
                    .map(|(x, y)| Some((*x)? - (*y)?))
                    .collect()
            };
            Ok(ErrorSpan {
                column: name.clone(),
                minus: diff(&median, &low),
                plus: diff(&high, &median),
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use ar6_frame::DataPoint;

    fn quantile_frame(factor: f64) -> ScenarioFrame {
        let mut points = Vec::new();
        for (label, shift) in [("1.5C", 0.0), ("2C", 100.0)] {
            for (year, base) in [(2030, 1000.0), (2050, 4000.0), (2070, 9000.0)] {
                for (q, spread) in [("0.25", -500.0), ("0.5", 0.0), ("0.75", 500.0)] {
                    for (variable, share) in [("Land", 0.25), ("Total", 1.0)] {
                        points.push(DataPoint::new(
                            label,
                            q,
                            "World",
                            variable,
                            "Mt CO2/yr",
                            year,
                            factor * (base + shift + spread) * share,
                        ));
                    }
                }
            }
        }
        ScenarioFrame::from_points(points).unwrap()
    }

    fn sub(columns: &[&str], values: Vec<Vec<f64>>) -> SubMatrix {
        SubMatrix::new(
            (0..values.len()).map(|i| format!("r{i}")).collect(),
            columns.iter().map(|c| c.to_string()).collect(),
            values
                .into_iter()
                .map(|row| row.into_iter().map(Some).collect())
                .collect(),
        )
    }

    #[test]
    fn test_from_frame_orders_and_scales() {
        let pdata = PlotMatrix::from_frame(&quantile_frame(1.0), &[2030, 2050], DEFAULT_SCALE)
            .unwrap();
        assert_eq!(pdata.rows(), ["2050 2C", "2050 1.5C", "2030 2C", "2030 1.5C"]);
        assert_eq!(pdata.columns().len(), 6);
        assert_eq!(pdata.columns()[0].scenario, "0.25");
        assert_eq!(pdata.columns()[0].variable, "Land");
        assert_eq!(pdata.get("2030 1.5C", "0.5", "Total"), Some(1.0));
        assert_eq!(pdata.get("2050 2C", "0.75", "Land"), Some(1.15));
        assert_eq!(pdata.variables(), vec!["Land", "Total"]);
    }

    #[test]
    fn test_double_reversal_is_identity() {
        let pdata = PlotMatrix::from_frame(&quantile_frame(1.0), &[2030, 2050, 2070], DEFAULT_SCALE)
            .unwrap();
        assert_eq!(pdata.reversed().reversed(), pdata);
        assert_ne!(pdata.reversed(), pdata);
    }

    #[test]
    fn test_scaling_is_linear() {
        let single = PlotMatrix::from_frame(&quantile_frame(1.0), &[2030], DEFAULT_SCALE).unwrap();
        let double = PlotMatrix::from_frame(&quantile_frame(2.0), &[2030], DEFAULT_SCALE).unwrap();
        for (a, b) in single.values().iter().flatten().zip(double.values().iter().flatten()) {
            assert!((a.unwrap() * 2.0 - b.unwrap()).abs() < 1e-12);
        }
    }

    #[test]
    fn test_duplicate_cells_are_rejected() {
        let df = ScenarioFrame::from_points(vec![
            DataPoint::new("1.5C", "0.5", "World", "Total", "Mt CO2/yr", 2030, 1.0),
            DataPoint::new("1.5C", "0.5", "R5ASIA", "Total", "Mt CO2/yr", 2030, 1.0),
        ])
        .unwrap();
        assert!(matches!(
            PlotMatrix::from_frame(&df, &[2030], DEFAULT_SCALE),
            Err(DataError::DuplicateEntry(_))
        ));
    }

    #[test]
    fn test_scenario_and_select() {
        let pdata = PlotMatrix::from_frame(&quantile_frame(1.0), &[2030], DEFAULT_SCALE).unwrap();
        let median = pdata.scenario("0.5").unwrap();
        assert_eq!(median.columns(), ["Land", "Total"]);
        let reordered = median.select(&["Total", "Land"]).unwrap();
        assert_eq!(reordered.columns(), ["Total", "Land"]);
        assert_eq!(reordered.values()[1], vec![Some(1.0), Some(0.25)]);
        assert!(matches!(
            median.select(&["Ocean"]),
            Err(DataError::MissingColumn(_))
        ));
        assert!(matches!(
            pdata.scenario("0.9"),
            Err(DataError::MissingColumn(_))
        ));
    }

    #[test]
    fn test_row_sums_skip_missing() {
        let m = SubMatrix::new(
            vec!["a".into(), "b".into()],
            vec!["x".into(), "y".into()],
            vec![vec![Some(1.0), None], vec![Some(2.0), Some(-0.5)]],
        );
        assert_eq!(m.row_sums(), vec![1.0, 1.5]);
    }

    #[test]
    fn test_error_bars() {
        let lower = sub(&["a", "b"], vec![vec![1.0, 1.0], vec![2.0, 2.0]]);
        let base = sub(&["a", "b"], vec![vec![2.0, 2.0], vec![4.0, 4.0]]);
        let upper = sub(&["a", "b"], vec![vec![3.0, 3.0], vec![6.0, 6.0]]);
        let errors = error_bars(&base, &lower, &upper).unwrap();
        assert_eq!(errors.len(), 2);
        for span in &errors {
            assert_eq!(span.minus, vec![Some(1.0), Some(2.0)]);
            assert_eq!(span.plus, vec![Some(1.0), Some(2.0)]);
        }
    }
}
