//! Selection of data by index dimensions, years and scenario metadata.
//!
//! String criteria accept several alternatives and `*` wildcards, so
//! `variable("Carbon Removal|*")` selects every sub-variable.

use crate::frame::ScenarioFrame;
use crate::index::{DataKey, Dimension, ScenarioId};
use crate::meta::MetaValue;
use std::collections::{BTreeMap, BTreeSet};
use std::ops::RangeInclusive;

/// Years to keep.
#[derive(Debug, Clone, PartialEq)]
pub enum YearSelection {
    List(BTreeSet<i32>),
    Range { start: i32, end: i32, step: i32 },
}

impl YearSelection {
    pub fn contains(&self, year: i32) -> bool {
        match self {
            YearSelection::List(years) => years.contains(&year),
            YearSelection::Range { start, end, step } => {
                year >= *start && year <= *end && (year - start) % (*step).max(1) == 0
            }
        }
    }
}

/// Builder of filter criteria; all criteria must match (AND), alternatives
/// within a criterion are OR-ed.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Filter {
    dims: BTreeMap<Dimension, Vec<String>>,
    years: Option<YearSelection>,
    meta: BTreeMap<String, Vec<MetaValue>>,
}

impl Filter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Match any of `patterns` on `dim`, replacing earlier criteria on it.
    pub fn dimension<I, S>(mut self, dim: Dimension, patterns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.dims
            .insert(dim, patterns.into_iter().map(Into::into).collect());
        self
    }

    pub fn model(self, pattern: impl Into<String>) -> Self {
        self.dimension(Dimension::Model, [pattern])
    }

    pub fn scenario(self, pattern: impl Into<String>) -> Self {
        self.dimension(Dimension::Scenario, [pattern])
    }

    pub fn region(self, pattern: impl Into<String>) -> Self {
        self.dimension(Dimension::Region, [pattern])
    }

    pub fn unit(self, pattern: impl Into<String>) -> Self {
        self.dimension(Dimension::Unit, [pattern])
    }

    pub fn variable(self, pattern: impl Into<String>) -> Self {
        self.dimension(Dimension::Variable, [pattern])
    }

    pub fn variables<I, S>(self, patterns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.dimension(Dimension::Variable, patterns)
    }

    pub fn year(self, year: i32) -> Self {
        self.years([year])
    }

    pub fn years<I>(mut self, years: I) -> Self
    where
        I: IntoIterator<Item = i32>,
    {
        self.years = Some(YearSelection::List(years.into_iter().collect()));
        self
    }

    /// Keep `start, start + step, ...` up to and including `end`.
    pub fn year_range(mut self, range: RangeInclusive<i32>, step: i32) -> Self {
        self.years = Some(YearSelection::Range {
            start: *range.start(),
            end: *range.end(),
            step,
        });
        self
    }

    /// Keep scenarios whose metadata column `name` equals `value`, see
    /// [`MetaValue::matches`].
    pub fn meta(self, name: &str, value: impl Into<MetaValue>) -> Self {
        self.meta_any(name, [value])
    }

    /// Keep scenarios whose metadata column `name` equals any of `values`.
    pub fn meta_any<I, V>(mut self, name: &str, values: I) -> Self
    where
        I: IntoIterator<Item = V>,
        V: Into<MetaValue>,
    {
        self.meta
            .insert(name.to_string(), values.into_iter().map(Into::into).collect());
        self
    }

    fn matches_key(&self, key: &DataKey) -> bool {
        let dims_match = self.dims.iter().all(|(dim, patterns)| {
            let value = key.series.get(*dim);
            patterns.iter().any(|p| pattern_match(p, value))
        });
        let year_match = self
            .years
            .as_ref()
            .map_or(true, |years| years.contains(key.year));
        dims_match && year_match
    }

    fn matches_meta(&self, frame: &ScenarioFrame, id: &ScenarioId) -> bool {
        self.meta.iter().all(|(name, accepted)| {
            frame
                .meta_value(id, name)
                .is_some_and(|value| accepted.iter().any(|a| a.matches(value)))
        })
    }
}

/// Anchored match where `*` stands for any (possibly empty) substring.
pub fn pattern_match(pattern: &str, value: &str) -> bool {
    if !pattern.contains('*') {
        return pattern == value;
    }
    let parts: Vec<&str> = pattern.split('*').collect();
    let (first, rest) = match parts.split_first() {
        Some(split) => split,
        None => return value.is_empty(),
    };
    let Some(mut remainder) = value.strip_prefix(first) else {
        return false;
    };
    let (last, middle) = match rest.split_last() {
        Some(split) => split,
        None => return remainder.is_empty(),
    };
    for part in middle {
        match remainder.find(part) {
            Some(pos) => remainder = &remainder[pos + part.len()..],
            None => return false,
        }
    }
    remainder.len() >= last.len() && remainder.ends_with(last)
}

impl ScenarioFrame {
    /// Return a new frame with only the values matching `filter`.
    pub fn filter(&self, filter: &Filter) -> ScenarioFrame {
        let data = self
            .data()
            .iter()
            .filter(|(key, _)| {
                filter.matches_key(key) && filter.matches_meta(self, &key.series.scenario_id())
            })
            .map(|(key, value)| (key.clone(), *value))
            .collect();
        let out = ScenarioFrame::from_parts(data, self.meta().clone());
        log::debug!(
            "[AR6] filter: kept {} of {} values",
            out.len(),
            self.len()
        );
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::index::DataPoint;

    fn sample() -> ScenarioFrame {
        let points = [2020, 2025, 2030, 2040, 2050].into_iter().flat_map(|year| {
            vec![
                DataPoint::new("m1", "s1", "World", "Carbon Removal", "Mt CO2/yr", year, 1.0),
                DataPoint::new("m1", "s1", "World", "Carbon Removal|Land", "Mt CO2/yr", year, 0.5),
                DataPoint::new("m1", "s2", "R5ASIA", "Carbon Removal", "Mt CO2/yr", year, 2.0),
            ]
        });
        ScenarioFrame::from_points(points)
            .unwrap()
            .with_scenario_meta("m1", "s1", "Category", "C1")
            .unwrap()
            .with_scenario_meta("m1", "s2", "Category", "C3")
            .unwrap()
    }

    #[test]
    fn test_pattern_match() {
        assert!(pattern_match("Carbon Removal", "Carbon Removal"));
        assert!(!pattern_match("Carbon Removal", "Carbon Removal|Land"));
        assert!(pattern_match("Carbon Removal|*", "Carbon Removal|Land"));
        assert!(pattern_match("*|Land", "Carbon Removal|Land"));
        assert!(pattern_match("C*R*l", "Carbon Removal"));
        assert!(pattern_match("*", ""));
        assert!(!pattern_match("a*a", "a"));
    }

    #[test]
    fn test_filter_by_dimensions() {
        let df = sample();
        let world = df.filter(&Filter::new().region("World").variable("Carbon Removal"));
        assert_eq!(world.len(), 5);
        assert_eq!(world.scenarios(), vec!["s1"]);
        // metadata of dropped scenarios goes away
        assert_eq!(world.meta().len(), 1);
    }

    #[test]
    fn test_filter_by_meta() {
        let df = sample();
        let c3 = df.filter(&Filter::new().meta("Category", "C3"));
        assert_eq!(c3.regions(), vec!["R5ASIA"]);
        let both = df.filter(&Filter::new().meta_any("Category", ["C1", "C3"]));
        assert_eq!(both.len(), df.len());
        assert!(df.filter(&Filter::new().meta("Category", "C8")).is_empty());
    }

    #[test]
    fn test_filter_by_years() {
        let df = sample();
        let decadal = df.filter(&Filter::new().year_range(2020..=2100, 10));
        assert_eq!(decadal.years(), vec![2020, 2030, 2040, 2050]);
        let listed = df.filter(&Filter::new().years([2030, 2050]));
        assert_eq!(listed.years(), vec![2030, 2050]);
    }

    #[test]
    fn test_multiple_variables_are_or_ed() {
        let df = sample();
        let both = df.filter(
            &Filter::new()
                .variables(["Carbon Removal", "Carbon Removal|Land"])
                .region("World"),
        );
        assert_eq!(both.variables().len(), 2);
    }
}
