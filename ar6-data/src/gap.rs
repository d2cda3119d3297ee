//! Long-form data behind the regional gap box plot.

use crate::categories::{CategoryLabels, CATEGORY_COLUMN};
use crate::error::{DataError, Result};
use ar6_frame::{Filter, MetaValue, ScenarioFrame};
use serde::Serialize;
use std::collections::BTreeMap;

/// Year shown in the gap figure.
pub const DEFAULT_GAP_YEAR: i32 = 2030;

/// Exclusion filter: records whose `column` equals the value are dropped.
pub type DropFilter = BTreeMap<String, MetaValue>;

/// One value of the gap figure with its display category.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GapRecord {
    pub model: String,
    pub scenario: String,
    pub region: String,
    pub year: i32,
    #[serde(rename = "Category")]
    pub category: Option<String>,
    pub value: f64,
}

impl GapRecord {
    fn matches(&self, column: &str, value: &MetaValue) -> Result<bool> {
        let text = |field: &str| value.as_str() == Some(field);
        Ok(match column {
            "model" => text(&self.model),
            "scenario" => text(&self.scenario),
            "region" => text(&self.region),
            "year" => value.as_f64() == Some(f64::from(self.year)),
            "value" => value.as_f64() == Some(self.value),
            c if c == CATEGORY_COLUMN || c == "category" => {
                self.category.as_deref().is_some_and(text)
            }
            other => return Err(DataError::UnknownFilterColumn(other.to_string())),
        })
    }
}

/// Records keyed by `(model, scenario, region, year, Category)`.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct GapData {
    records: Vec<GapRecord>,
}

impl GapData {
    pub fn new(records: Vec<GapRecord>) -> Self {
        GapData { records }
    }

    pub fn records(&self) -> &[GapRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Drop incomplete records, then every record matching an entry of
    /// `drop`. Filter columns are `model`, `scenario`, `region`, `year`,
    /// `value` and `Category`.
    pub fn prepare(&self, drop: &DropFilter) -> Result<GapData> {
        let mut records: Vec<GapRecord> = self
            .records
            .iter()
            .filter(|r| r.category.is_some() && !r.value.is_nan())
            .cloned()
            .collect();
        let complete = records.len();
        for (column, value) in drop {
            let mut kept = Vec::with_capacity(records.len());
            for record in records {
                if !record.matches(column, value)? {
                    kept.push(record);
                }
            }
            records = kept;
        }
        log::debug!(
            "[AR6] gap: {} of {} records kept ({} incomplete)",
            records.len(),
            self.records.len(),
            self.records.len() - complete
        );
        Ok(GapData { records })
    }

    /// Distinct regions in order of first appearance.
    pub fn regions(&self) -> Vec<String> {
        first_seen(self.records.iter().map(|r| r.region.as_str()))
    }

    /// Distinct categories in order of first appearance.
    pub fn categories(&self) -> Vec<String> {
        first_seen(self.records.iter().filter_map(|r| r.category.as_deref()))
    }

    /// Values of one `(region, category)` cell.
    pub fn values(&self, region: &str, category: &str) -> Vec<f64> {
        self.records
            .iter()
            .filter(|r| r.region == region && r.category.as_deref() == Some(category))
            .map(|r| r.value)
            .collect()
    }
}

fn first_seen<'a>(items: impl Iterator<Item = &'a str>) -> Vec<String> {
    let mut seen: Vec<String> = Vec::new();
    for item in items {
        if !seen.iter().any(|s| s == item) {
            seen.push(item.to_string());
        }
    }
    seen
}

/// Values of `variable` in `year` for scenarios in any of `categories`,
/// with category codes replaced by their labels.
pub fn make_gap_data(
    df: &ScenarioFrame,
    variable: &str,
    categories: &CategoryLabels,
    year: i32,
) -> Result<GapData> {
    let selected = df
        .filter(&Filter::new().variable(variable).year(year))
        .filter(&Filter::new().meta_any(CATEGORY_COLUMN, categories.codes()));
    let records: Vec<GapRecord> = selected
        .as_long(true)
        .into_iter()
        .map(|row| {
            let category = row
                .meta
                .get(CATEGORY_COLUMN)
                .map(|code| categories.display(&code.to_string()).to_string());
            GapRecord {
                model: row.model,
                scenario: row.scenario,
                region: row.region,
                year: row.year,
                category,
                value: row.value,
            }
        })
        .collect();
    log::info!(
        "[AR6] make_gap_data: {} records of {} in {}",
        records.len(),
        variable,
        year
    );
    Ok(GapData { records })
}
