//! Mapping from raw scenario category codes to display labels.
//!
//! The figures group scenarios by their `Category` metadata (e.g. `C1`) and
//! show a short label instead (e.g. `1.5C`). Iteration order is insertion
//! order and drives the order in which categories are concatenated and
//! plotted, so (de)serialization keeps the order of the JSON object.

use serde::de::{MapAccess, Visitor};
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;

/// Metadata column holding the scenario category.
pub const CATEGORY_COLUMN: &str = "Category";

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CategoryLabels(Vec<(String, String)>);

impl CategoryLabels {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add or replace the label of `code`, keeping its position.
    pub fn insert(&mut self, code: impl Into<String>, label: impl Into<String>) {
        let code = code.into();
        let label = label.into();
        match self.0.iter_mut().find(|(c, _)| *c == code) {
            Some(entry) => entry.1 = label,
            None => self.0.push((code, label)),
        }
    }

    pub fn from_pairs<I, C, L>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (C, L)>,
        C: Into<String>,
        L: Into<String>,
    {
        let mut labels = Self::new();
        for (code, label) in pairs {
            labels.insert(code, label);
        }
        labels
    }

    pub fn label_for(&self, code: &str) -> Option<&str> {
        self.0
            .iter()
            .find(|(c, _)| c == code)
            .map(|(_, label)| label.as_str())
    }

    /// Substitute `code` by its label, leaving unknown codes untouched.
    pub fn display<'a>(&'a self, code: &'a str) -> &'a str {
        self.label_for(code).unwrap_or(code)
    }

    pub fn codes(&self) -> impl Iterator<Item = &str> + '_ {
        self.0.iter().map(|(code, _)| code.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> + '_ {
        self.0.iter().map(|(c, l)| (c.as_str(), l.as_str()))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl Serialize for CategoryLabels {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.0.len()))?;
        for (code, label) in &self.0 {
            map.serialize_entry(code, label)?;
        }
        map.end()
    }
}

struct CategoryLabelsVisitor;

impl<'de> Visitor<'de> for CategoryLabelsVisitor {
    type Value = CategoryLabels;

    fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str("a map of category codes to display labels")
    }

    fn visit_map<A: MapAccess<'de>>(self, mut access: A) -> Result<Self::Value, A::Error> {
        let mut labels = CategoryLabels::new();
        while let Some((code, label)) = access.next_entry::<String, String>()? {
            labels.insert(code, label);
        }
        Ok(labels)
    }
}

impl<'de> Deserialize<'de> for CategoryLabels {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_map(CategoryLabelsVisitor)
    }
}
