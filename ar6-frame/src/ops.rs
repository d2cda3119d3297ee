//! Arithmetic between variables and offsets against a base year.

use crate::error::{FrameError, Result};
use crate::frame::ScenarioFrame;
use crate::index::{DataKey, SeriesKey};
use std::collections::BTreeMap;

/// Element-wise operation applied to two variables.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BinaryOp {
    Add,
    Subtract,
    Multiply,
    Divide,
}

impl BinaryOp {
    pub fn as_str(&self) -> &'static str {
        match self {
            BinaryOp::Add => "add",
            BinaryOp::Subtract => "subtract",
            BinaryOp::Multiply => "multiply",
            BinaryOp::Divide => "divide",
        }
    }

    fn apply(&self, a: f64, b: f64) -> f64 {
        match self {
            BinaryOp::Add => a + b,
            BinaryOp::Subtract => a - b,
            BinaryOp::Multiply => a * b,
            BinaryOp::Divide => a / b,
        }
    }

    /// Unit of `a <op> b`. Only identical and dimensionless units are
    /// understood; everything else needs an explicit override.
    fn result_unit(&self, a: &str, b: &str) -> Option<String> {
        match self {
            BinaryOp::Add | BinaryOp::Subtract => (a == b).then(|| a.to_string()),
            BinaryOp::Divide if a == b => Some(String::new()),
            BinaryOp::Divide if b.is_empty() => Some(a.to_string()),
            BinaryOp::Multiply if a.is_empty() => Some(b.to_string()),
            BinaryOp::Multiply if b.is_empty() => Some(a.to_string()),
            _ => None,
        }
    }
}

/// Alignment key of a binary operation: the index without variable and unit.
type Anchor = (String, String, String, i32);

fn anchor(key: &DataKey) -> Anchor {
    (
        key.series.model.clone(),
        key.series.scenario.clone(),
        key.series.region.clone(),
        key.year,
    )
}

impl ScenarioFrame {
    pub fn add(&self, a: &str, b: &str, name: &str, ignore_units: Option<&str>) -> Result<Self> {
        self.binary(BinaryOp::Add, a, b, name, ignore_units)
    }

    pub fn subtract(
        &self,
        a: &str,
        b: &str,
        name: &str,
        ignore_units: Option<&str>,
    ) -> Result<Self> {
        self.binary(BinaryOp::Subtract, a, b, name, ignore_units)
    }

    pub fn multiply(
        &self,
        a: &str,
        b: &str,
        name: &str,
        ignore_units: Option<&str>,
    ) -> Result<Self> {
        self.binary(BinaryOp::Multiply, a, b, name, ignore_units)
    }

    /// Divide variable `a` by `b` into a new variable `name`.
    ///
    /// With `ignore_units` the result carries that unit regardless of the
    /// operand units, e.g. `Some("fraction")` for a share of two flows.
    pub fn divide(&self, a: &str, b: &str, name: &str, ignore_units: Option<&str>) -> Result<Self> {
        self.binary(BinaryOp::Divide, a, b, name, ignore_units)
    }

    /// Apply `op` to variables `a` and `b` aligned on
    /// `(model, scenario, region, year)`. Only indices present for both
    /// operands produce a value; the result holds only variable `name`.
    /// Fails with [`FrameError::DuplicateIndex`] when an operand has more
    /// than one unit at the same index.
    pub fn binary(
        &self,
        op: BinaryOp,
        a: &str,
        b: &str,
        name: &str,
        ignore_units: Option<&str>,
    ) -> Result<Self> {
        let mut left: BTreeMap<Anchor, (&str, f64)> = BTreeMap::new();
        let mut right: BTreeMap<Anchor, (&str, f64)> = BTreeMap::new();
        for (key, value) in self.iter() {
            // a variable reported in two units at one index has no single operand
            for (side, variable) in [(&mut left, a), (&mut right, b)] {
                if key.series.variable == variable
                    && side
                        .insert(anchor(key), (key.series.unit.as_str(), value))
                        .is_some()
                {
                    return Err(FrameError::DuplicateIndex(key.to_string()));
                }
            }
        }
        if left.is_empty() {
            return Err(FrameError::MissingVariable(a.to_string()));
        }
        if right.is_empty() {
            return Err(FrameError::MissingVariable(b.to_string()));
        }

        let mut data = BTreeMap::new();
        for (at, (unit_a, value_a)) in &left {
            let Some((unit_b, value_b)) = right.get(at) else {
                continue;
            };
            let unit = match ignore_units {
                Some(unit) => unit.to_string(),
                None => op.result_unit(unit_a, unit_b).ok_or_else(|| {
                    FrameError::IncompatibleUnits {
                        op: op.as_str(),
                        left: unit_a.to_string(),
                        right: unit_b.to_string(),
                    }
                })?,
            };
            let (model, scenario, region, year) = at.clone();
            let key = DataKey {
                series: SeriesKey::new(model, scenario, region, name, unit),
                year,
            };
            data.insert(key, op.apply(*value_a, *value_b));
        }
        log::debug!(
            "[AR6] {}: {} = {} ({} values)",
            op.as_str(),
            name,
            a,
            data.len()
        );
        Ok(ScenarioFrame::from_parts(data, self.meta().clone()))
    }

    /// Subtract each timeseries' value in `base_year` from all of its
    /// values. Timeseries without a value in `base_year` are dropped.
    pub fn offset_year(&self, base_year: i32) -> Result<Self> {
        let mut base: BTreeMap<&SeriesKey, f64> = BTreeMap::new();
        for (key, value) in self.iter() {
            if key.year == base_year {
                base.insert(&key.series, value);
            }
        }
        let data: BTreeMap<DataKey, f64> = self
            .iter()
            .filter_map(|(key, value)| {
                base.get(&key.series)
                    .map(|offset| (key.clone(), value - offset))
            })
            .collect();
        if data.len() < self.len() {
            log::debug!(
                "[AR6] offset: dropped {} values without base year {}",
                self.len() - data.len(),
                base_year
            );
        }
        Ok(ScenarioFrame::from_parts(data, self.meta().clone()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::index::DataPoint;

    const TOTAL: &str = "Carbon Removal";
    const LAND: &str = "Carbon Removal|Land";

    fn sample() -> ScenarioFrame {
        ScenarioFrame::from_points(vec![
            DataPoint::new("m", "s1", "World", TOTAL, "Mt CO2/yr", 2030, 400.0),
            DataPoint::new("m", "s1", "World", LAND, "Mt CO2/yr", 2030, 100.0),
            DataPoint::new("m", "s1", "World", TOTAL, "Mt CO2/yr", 2050, 3000.0),
            DataPoint::new("m", "s1", "World", LAND, "Mt CO2/yr", 2050, 1200.0),
            DataPoint::new("m", "s2", "World", TOTAL, "Mt CO2/yr", 2030, 50.0),
            DataPoint::new("m", "s3", "World", LAND, "Gt CO2/yr", 2030, 0.1),
            DataPoint::new("m", "s3", "World", TOTAL, "Mt CO2/yr", 2030, 200.0),
        ])
        .unwrap()
    }

    fn key(scenario: &str, variable: &str, unit: &str, year: i32) -> DataKey {
        DataKey {
            series: SeriesKey::new("m", scenario, "World", variable, unit),
            year,
        }
    }

    #[test]
    fn test_divide_with_unit_override() {
        let share = sample()
            .divide(LAND, TOTAL, "Land Share", Some("fraction"))
            .unwrap();
        assert_eq!(share.variables(), vec!["Land Share"]);
        assert_eq!(share.units(), vec!["fraction"]);
        assert_eq!(share.get(&key("s1", "Land Share", "fraction", 2030)), Some(0.25));
        assert_eq!(share.get(&key("s1", "Land Share", "fraction", 2050)), Some(0.4));
        // s2 has no land removal
        assert_eq!(share.len(), 3);
    }

    #[test]
    fn test_divide_requires_compatible_units() {
        let result = sample().divide(LAND, TOTAL, "Land Share", None);
        assert!(matches!(result, Err(FrameError::IncompatibleUnits { .. })));

        let matching = sample()
            .filter(&crate::Filter::new().scenario("s1"))
            .divide(LAND, TOTAL, "Land Share", None)
            .unwrap();
        assert_eq!(matching.units(), vec![""]);
    }

    #[test]
    fn test_divide_rejects_two_units_at_one_index() {
        let df = ScenarioFrame::from_points(vec![
            DataPoint::new("m", "s1", "World", TOTAL, "Mt CO2/yr", 2030, 400.0),
            DataPoint::new("m", "s1", "World", LAND, "Mt CO2/yr", 2030, 100.0),
            DataPoint::new("m", "s1", "World", LAND, "Gt CO2/yr", 2030, 0.1),
        ])
        .unwrap();
        let result = df.divide(LAND, TOTAL, "Land Share", Some("fraction"));
        assert!(matches!(result, Err(FrameError::DuplicateIndex(_))));
    }

    #[test]
    fn test_divide_then_multiply_round_trips() {
        let df = sample().filter(&crate::Filter::new().scenario("s1"));
        let share = df.divide(LAND, TOTAL, "Share", None).unwrap();
        let both = ScenarioFrame::concat(vec![
            share,
            df.filter(&crate::Filter::new().variable(TOTAL)),
        ])
        .unwrap();
        let back = both.multiply("Share", TOTAL, "Land again", None).unwrap();
        for year in [2030, 2050] {
            let original = df.get(&key("s1", LAND, "Mt CO2/yr", year)).unwrap();
            let restored = back
                .get(&key("s1", "Land again", "Mt CO2/yr", year))
                .unwrap();
            assert!((original - restored).abs() < 1e-9);
        }
    }

    #[test]
    fn test_missing_operand_is_an_error() {
        let result = sample().subtract(TOTAL, "Nope", "x", None);
        assert!(matches!(result, Err(FrameError::MissingVariable(v)) if v == "Nope"));
    }

    #[test]
    fn test_offset_year() {
        let offset = sample()
            .filter(&crate::Filter::new().variable(TOTAL))
            .offset_year(2050)
            .unwrap();
        // only s1 has a 2050 value
        assert_eq!(offset.scenarios(), vec!["s1"]);
        assert_eq!(offset.get(&key("s1", TOTAL, "Mt CO2/yr", 2030)), Some(-2600.0));
        assert_eq!(offset.get(&key("s1", TOTAL, "Mt CO2/yr", 2050)), Some(0.0));
    }
}
