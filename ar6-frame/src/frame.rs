//! The scenario timeseries collection.
//!
//! A [`ScenarioFrame`] holds at most one value per
//! `(model, scenario, region, variable, unit, year)` plus a metadata row for
//! every `(model, scenario)` that has data. All operations return new frames.

use crate::error::{FrameError, Result};
use crate::index::{DataKey, DataPoint, Dimension, ScenarioId, SeriesKey};
use crate::meta::{Meta, MetaValue};
use serde::Serialize;
use std::collections::{BTreeMap, BTreeSet};

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ScenarioFrame {
    data: BTreeMap<DataKey, f64>,
    meta: BTreeMap<ScenarioId, Meta>,
}

/// A value in long ("tidy") form with optional metadata columns.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LongRow {
    pub model: String,
    pub scenario: String,
    pub region: String,
    pub variable: String,
    pub unit: String,
    pub year: i32,
    pub value: f64,
    pub meta: Meta,
}

/// Wide form: one row per timeseries, one column per year.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Timeseries {
    pub years: Vec<i32>,
    pub rows: Vec<TimeseriesRow>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TimeseriesRow {
    pub key: SeriesKey,
    pub values: Vec<Option<f64>>,
}

impl ScenarioFrame {
    /// Build a frame from flat data points. Duplicate indices are rejected.
    pub fn from_points<I>(points: I) -> Result<Self>
    where
        I: IntoIterator<Item = DataPoint>,
    {
        let mut data = BTreeMap::new();
        for point in points {
            let (key, value) = point.into_entry();
            if data.contains_key(&key) {
                return Err(FrameError::DuplicateIndex(key.to_string()));
            }
            data.insert(key, value);
        }
        Ok(Self::from_parts(data, BTreeMap::new()))
    }

    /// Assemble a frame, keeping metadata only for scenarios that have data
    /// and adding an empty metadata row for scenarios that lack one.
    pub(crate) fn from_parts(
        data: BTreeMap<DataKey, f64>,
        mut meta: BTreeMap<ScenarioId, Meta>,
    ) -> Self {
        let present: BTreeSet<ScenarioId> = data.keys().map(|k| k.series.scenario_id()).collect();
        meta.retain(|id, _| present.contains(id));
        for id in present {
            meta.entry(id).or_default();
        }
        ScenarioFrame { data, meta }
    }

    pub(crate) fn data(&self) -> &BTreeMap<DataKey, f64> {
        &self.data
    }

    pub(crate) fn meta_mut(&mut self) -> &mut BTreeMap<ScenarioId, Meta> {
        &mut self.meta
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Iterate over all values in index order.
    pub fn iter(&self) -> impl Iterator<Item = (&DataKey, f64)> + '_ {
        self.data.iter().map(|(k, v)| (k, *v))
    }

    pub fn get(&self, key: &DataKey) -> Option<f64> {
        self.data.get(key).copied()
    }

    /// Sorted distinct values of an index dimension.
    pub fn dimension_values(&self, dim: Dimension) -> Vec<String> {
        self.data
            .keys()
            .map(|k| k.series.get(dim))
            .collect::<BTreeSet<_>>()
            .into_iter()
            .map(str::to_string)
            .collect()
    }

    pub fn models(&self) -> Vec<String> {
        self.dimension_values(Dimension::Model)
    }

    pub fn scenarios(&self) -> Vec<String> {
        self.dimension_values(Dimension::Scenario)
    }

    pub fn regions(&self) -> Vec<String> {
        self.dimension_values(Dimension::Region)
    }

    pub fn variables(&self) -> Vec<String> {
        self.dimension_values(Dimension::Variable)
    }

    pub fn units(&self) -> Vec<String> {
        self.dimension_values(Dimension::Unit)
    }

    pub fn years(&self) -> Vec<i32> {
        self.data
            .keys()
            .map(|k| k.year)
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect()
    }

    pub fn meta(&self) -> &BTreeMap<ScenarioId, Meta> {
        &self.meta
    }

    pub fn meta_value(&self, id: &ScenarioId, name: &str) -> Option<&MetaValue> {
        self.meta.get(id).and_then(|row| row.get(name))
    }

    /// Set a metadata column to the same value for every scenario.
    pub fn set_meta(&self, name: &str, value: impl Into<MetaValue>) -> Self {
        let value = value.into();
        let mut out = self.clone();
        for row in out.meta.values_mut() {
            row.insert(name.to_string(), value.clone());
        }
        out
    }

    /// Set a metadata column for a single scenario.
    pub fn with_scenario_meta(
        mut self,
        model: &str,
        scenario: &str,
        name: &str,
        value: impl Into<MetaValue>,
    ) -> Result<Self> {
        let id = ScenarioId::new(model, scenario);
        match self.meta.get_mut(&id) {
            Some(row) => {
                row.insert(name.to_string(), value.into());
                Ok(self)
            }
            None => Err(FrameError::UnknownScenario {
                model: id.model,
                scenario: id.scenario,
            }),
        }
    }

    /// Rename values of an index dimension, e.g. model `Quantiles` to `1.5C`.
    ///
    /// Metadata follows model and scenario renames. Renames that make two
    /// values collide on the same index are rejected.
    pub fn rename(&self, dim: Dimension, mapping: &[(&str, &str)]) -> Result<Self> {
        let lookup: BTreeMap<&str, &str> = mapping.iter().copied().collect();
        let renamed = |value: &mut String| {
            if let Some(new) = lookup.get(value.as_str()) {
                *value = (*new).to_string();
            }
        };

        let mut data = BTreeMap::new();
        for (key, value) in &self.data {
            let mut key = key.clone();
            renamed(key.series.get_mut(dim));
            if data.insert(key.clone(), *value).is_some() {
                return Err(FrameError::DuplicateIndex(key.to_string()));
            }
        }

        let mut meta: BTreeMap<ScenarioId, Meta> = BTreeMap::new();
        for (id, row) in &self.meta {
            let mut id = id.clone();
            match dim {
                Dimension::Model => renamed(&mut id.model),
                Dimension::Scenario => renamed(&mut id.scenario),
                _ => {}
            }
            meta.entry(id).or_default().extend(row.clone());
        }

        Ok(Self::from_parts(data, meta))
    }

    /// Concatenate frames. Overlapping indices are rejected; metadata rows of
    /// the same scenario are merged.
    pub fn concat<I>(frames: I) -> Result<Self>
    where
        I: IntoIterator<Item = ScenarioFrame>,
    {
        let mut data = BTreeMap::new();
        let mut meta: BTreeMap<ScenarioId, Meta> = BTreeMap::new();
        for frame in frames {
            for (key, value) in frame.data {
                if data.contains_key(&key) {
                    return Err(FrameError::DuplicateIndex(key.to_string()));
                }
                data.insert(key, value);
            }
            for (id, row) in frame.meta {
                meta.entry(id).or_default().extend(row);
            }
        }
        Ok(Self::from_parts(data, meta))
    }

    /// Flatten to long rows in index order. With `with_meta`, every row
    /// carries its scenario's metadata columns.
    pub fn as_long(&self, with_meta: bool) -> Vec<LongRow> {
        self.data
            .iter()
            .map(|(key, value)| {
                let meta = if with_meta {
                    self.meta
                        .get(&key.series.scenario_id())
                        .cloned()
                        .unwrap_or_default()
                } else {
                    Meta::new()
                };
                LongRow {
                    model: key.series.model.clone(),
                    scenario: key.series.scenario.clone(),
                    region: key.series.region.clone(),
                    variable: key.series.variable.clone(),
                    unit: key.series.unit.clone(),
                    year: key.year,
                    value: *value,
                    meta,
                }
            })
            .collect()
    }

    /// Pivot years into columns.
    pub fn timeseries(&self) -> Timeseries {
        let years = self.years();
        let column: BTreeMap<i32, usize> = years.iter().enumerate().map(|(i, y)| (*y, i)).collect();
        let mut rows: Vec<TimeseriesRow> = Vec::new();
        for (key, value) in &self.data {
            let needs_row = rows.last().map_or(true, |row| row.key != key.series);
            if needs_row {
                rows.push(TimeseriesRow {
                    key: key.series.clone(),
                    values: vec![None; years.len()],
                });
            }
            if let Some(row) = rows.last_mut() {
                row.values[column[&key.year]] = Some(*value);
            }
        }
        Timeseries { years, rows }
    }
}

impl Timeseries {
    pub fn value(&self, key: &SeriesKey, year: i32) -> Option<f64> {
        let column = self.years.iter().position(|y| *y == year)?;
        self.rows
            .iter()
            .find(|row| &row.key == key)
            .and_then(|row| row.values[column])
    }

    /// Stack tables vertically; year columns become the sorted union and rows
    /// keep their input order.
    pub fn concat<I>(parts: I) -> Timeseries
    where
        I: IntoIterator<Item = Timeseries>,
    {
        let parts: Vec<Timeseries> = parts.into_iter().collect();
        let years: Vec<i32> = parts
            .iter()
            .flat_map(|part| part.years.iter().copied())
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect();
        let mut rows = Vec::new();
        for part in parts {
            for row in part.rows {
                let values = years
                    .iter()
                    .map(|year| {
                        part.years
                            .iter()
                            .position(|y| y == year)
                            .and_then(|i| row.values[i])
                    })
                    .collect();
                rows.push(TimeseriesRow {
                    key: row.key,
                    values,
                });
            }
        }
        Timeseries { years, rows }
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}
