//! Order statistics across scenarios.

use crate::error::{FrameError, Result};
use crate::frame::ScenarioFrame;
use crate::index::DataPoint;
use std::collections::BTreeMap;

/// Model name given to every row of a quantile summary.
pub const QUANTILES_MODEL: &str = "Quantiles";

/// Scenario label of a quantile level, the shortest decimal form
/// (`0.5` -> `"0.5"`, `0.25` -> `"0.25"`).
pub fn quantile_label(level: f64) -> String {
    format!("{level}")
}

/// Linear interpolation between the closest ranks of `sorted`
/// (position `level * (n - 1)`). `None` when `sorted` is empty or `level`
/// lies outside `[0, 1]`.
pub fn quantile_sorted(sorted: &[f64], level: f64) -> Option<f64> {
    if !(0.0..=1.0).contains(&level) {
        return None;
    }
    let last = sorted.len().checked_sub(1)?;
    let pos = level * last as f64;
    let lower = pos.floor() as usize;
    let upper = pos.ceil() as usize;
    let frac = pos - lower as f64;
    Some(sorted[lower] + (sorted[upper] - sorted[lower]) * frac)
}

impl ScenarioFrame {
    /// Compute quantiles across all scenarios of a single variable.
    ///
    /// Values are grouped by `(region, variable, unit, year)`; for each
    /// level the result holds rows with model [`QUANTILES_MODEL`] and
    /// scenario [`quantile_label`]. Missing values are skipped.
    pub fn quantiles(&self, levels: &[f64]) -> Result<ScenarioFrame> {
        if self.is_empty() {
            return Err(FrameError::Empty("quantiles"));
        }
        let variables = self.variables();
        if variables.len() > 1 {
            return Err(FrameError::MultipleVariables {
                count: variables.len(),
                variables,
            });
        }
        if let Some(bad) = levels.iter().find(|q| !(0.0..=1.0).contains(*q)) {
            return Err(FrameError::InvalidQuantile(*bad));
        }

        let mut groups: BTreeMap<(&str, &str, &str, i32), Vec<f64>> = BTreeMap::new();
        for (key, value) in self.iter() {
            if value.is_nan() {
                continue;
            }
            groups
                .entry((
                    key.series.region.as_str(),
                    key.series.variable.as_str(),
                    key.series.unit.as_str(),
                    key.year,
                ))
                .or_default()
                .push(value);
        }
        for values in groups.values_mut() {
            values.sort_by(f64::total_cmp);
        }

        let mut points = Vec::with_capacity(levels.len() * groups.len());
        for level in levels {
            let label = quantile_label(*level);
            for ((region, variable, unit, year), values) in &groups {
                if let Some(value) = quantile_sorted(values, *level) {
                    points.push(DataPoint::new(
                        QUANTILES_MODEL,
                        label.clone(),
                        *region,
                        *variable,
                        *unit,
                        *year,
                        value,
                    ));
                }
            }
        }
        log::debug!(
            "[AR6] quantiles: {} levels over {} groups",
            levels.len(),
            groups.len()
        );
        ScenarioFrame::from_points(points)
    }
}
