//! Index types for IAMC-style scenario data.
//!
//! Every value in a [`ScenarioFrame`](crate::ScenarioFrame) is addressed by
//! `(model, scenario, region, variable, unit, year)`. The derived orderings
//! sort lexicographically in that field order, which is the row order of
//! every export.

use crate::error::FrameError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// One of the string-valued index dimensions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Dimension {
    Model,
    Scenario,
    Region,
    Variable,
    Unit,
}

impl Dimension {
    pub const ALL: [Dimension; 5] = [
        Dimension::Model,
        Dimension::Scenario,
        Dimension::Region,
        Dimension::Variable,
        Dimension::Unit,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Dimension::Model => "model",
            Dimension::Scenario => "scenario",
            Dimension::Region => "region",
            Dimension::Variable => "variable",
            Dimension::Unit => "unit",
        }
    }
}

impl fmt::Display for Dimension {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Dimension {
    type Err = FrameError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Dimension::ALL
            .into_iter()
            .find(|dim| dim.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| FrameError::InvalidFormat(format!("unknown index dimension '{s}'")))
    }
}

/// Identifies a single timeseries (all index dimensions except year).
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct SeriesKey {
    pub model: String,
    pub scenario: String,
    pub region: String,
    pub variable: String,
    pub unit: String,
}

impl SeriesKey {
    pub fn new(
        model: impl Into<String>,
        scenario: impl Into<String>,
        region: impl Into<String>,
        variable: impl Into<String>,
        unit: impl Into<String>,
    ) -> Self {
        SeriesKey {
            model: model.into(),
            scenario: scenario.into(),
            region: region.into(),
            variable: variable.into(),
            unit: unit.into(),
        }
    }

    pub fn get(&self, dim: Dimension) -> &str {
        match dim {
            Dimension::Model => &self.model,
            Dimension::Scenario => &self.scenario,
            Dimension::Region => &self.region,
            Dimension::Variable => &self.variable,
            Dimension::Unit => &self.unit,
        }
    }

    pub(crate) fn get_mut(&mut self, dim: Dimension) -> &mut String {
        match dim {
            Dimension::Model => &mut self.model,
            Dimension::Scenario => &mut self.scenario,
            Dimension::Region => &mut self.region,
            Dimension::Variable => &mut self.variable,
            Dimension::Unit => &mut self.unit,
        }
    }

    pub fn scenario_id(&self) -> ScenarioId {
        ScenarioId::new(&self.model, &self.scenario)
    }
}

impl fmt::Display for SeriesKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} / {} / {} / {} [{}]",
            self.model, self.scenario, self.region, self.variable, self.unit
        )
    }
}

/// Full index of a single value.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct DataKey {
    pub series: SeriesKey,
    pub year: i32,
}

impl fmt::Display for DataKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} @ {}", self.series, self.year)
    }
}

/// A `(model, scenario)` pair, the unit that carries metadata.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ScenarioId {
    pub model: String,
    pub scenario: String,
}

impl ScenarioId {
    pub fn new(model: impl Into<String>, scenario: impl Into<String>) -> Self {
        ScenarioId {
            model: model.into(),
            scenario: scenario.into(),
        }
    }
}

impl fmt::Display for ScenarioId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} / {}", self.model, self.scenario)
    }
}

/// A single observation in flat form, used to build frames.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DataPoint {
    pub model: String,
    pub scenario: String,
    pub region: String,
    pub variable: String,
    pub unit: String,
    pub year: i32,
    pub value: f64,
}

impl DataPoint {
    pub fn new(
        model: impl Into<String>,
        scenario: impl Into<String>,
        region: impl Into<String>,
        variable: impl Into<String>,
        unit: impl Into<String>,
        year: i32,
        value: f64,
    ) -> Self {
        DataPoint {
            model: model.into(),
            scenario: scenario.into(),
            region: region.into(),
            variable: variable.into(),
            unit: unit.into(),
            year,
            value,
        }
    }

    pub(crate) fn into_entry(self) -> (DataKey, f64) {
        let series = SeriesKey {
            model: self.model,
            scenario: self.scenario,
            region: self.region,
            variable: self.variable,
            unit: self.unit,
        };
        (
            DataKey {
                series,
                year: self.year,
            },
            self.value,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dimension_from_str_is_case_insensitive() {
        assert_eq!("Model".parse::<Dimension>().unwrap(), Dimension::Model);
        assert_eq!(" VARIABLE ".parse::<Dimension>().unwrap(), Dimension::Variable);
        assert!("year".parse::<Dimension>().is_err());
    }

    #[test]
    fn test_data_key_orders_by_series_then_year() {
        let a = DataKey {
            series: SeriesKey::new("m", "s", "World", "Emissions|CO2", "Mt CO2/yr"),
            year: 2050,
        };
        let b = DataKey {
            series: SeriesKey::new("m", "s", "World", "Emissions|CO2", "Mt CO2/yr"),
            year: 2030,
        };
        let c = DataKey {
            series: SeriesKey::new("m", "s2", "World", "Emissions|CO2", "Mt CO2/yr"),
            year: 2020,
        };
        let mut keys = vec![c.clone(), a.clone(), b.clone()];
        keys.sort();
        assert_eq!(keys, vec![b, a, c]);
    }
}
