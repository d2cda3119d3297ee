use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// Scenario-level metadata: column name to value.
pub type Meta = BTreeMap<String, MetaValue>;

/// A single metadata cell, e.g. the `Category` of a scenario.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum MetaValue {
    Bool(bool),
    Num(f64),
    Str(String),
}

impl MetaValue {
    /// Interpret a raw CSV cell. Empty cells carry no value.
    pub fn parse(cell: &str) -> Option<MetaValue> {
        let cell = cell.trim();
        if cell.is_empty() {
            return None;
        }
        if cell.eq_ignore_ascii_case("true") {
            return Some(MetaValue::Bool(true));
        }
        if cell.eq_ignore_ascii_case("false") {
            return Some(MetaValue::Bool(false));
        }
        match cell.parse::<f64>() {
            Ok(num) => Some(MetaValue::Num(num)),
            Err(_) => Some(MetaValue::Str(cell.to_string())),
        }
    }

    /// Equality used when selecting by metadata. A string matches a number
    /// or flag with the same text, so a code written as `"1"` selects cells
    /// that were read as `1`.
    pub fn matches(&self, other: &MetaValue) -> bool {
        match (self, other) {
            (MetaValue::Str(a), MetaValue::Str(b)) => a == b,
            (MetaValue::Str(text), value) | (value, MetaValue::Str(text)) => {
                *text == value.to_string()
            }
            _ => self == other,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            MetaValue::Str(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_f64(&self) -> Option<f64> {
        match self {
            MetaValue::Num(n) => Some(*n),
            _ => None,
        }
    }
}

impl fmt::Display for MetaValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MetaValue::Bool(b) => write!(f, "{b}"),
            MetaValue::Num(n) => write!(f, "{n}"),
            MetaValue::Str(s) => f.write_str(s),
        }
    }
}

impl From<&str> for MetaValue {
    fn from(value: &str) -> Self {
        MetaValue::Str(value.to_string())
    }
}

impl From<String> for MetaValue {
    fn from(value: String) -> Self {
        MetaValue::Str(value)
    }
}

impl From<&String> for MetaValue {
    fn from(value: &String) -> Self {
        MetaValue::Str(value.clone())
    }
}

impl From<f64> for MetaValue {
    fn from(value: f64) -> Self {
        MetaValue::Num(value)
    }
}

impl From<i32> for MetaValue {
    fn from(value: i32) -> Self {
        MetaValue::Num(f64::from(value))
    }
}

impl From<bool> for MetaValue {
    fn from(value: bool) -> Self {
        MetaValue::Bool(value)
    }
}

#[cfg(test)]
mod tests {
    use super::MetaValue;

    #[test]
    fn test_parse_cells() {
        assert_eq!(MetaValue::parse("C1"), Some(MetaValue::Str("C1".into())));
        assert_eq!(MetaValue::parse(" 1.5 "), Some(MetaValue::Num(1.5)));
        assert_eq!(MetaValue::parse("TRUE"), Some(MetaValue::Bool(true)));
        assert_eq!(MetaValue::parse("   "), None);
    }

    #[test]
    fn test_untagged_json() {
        let values: Vec<MetaValue> = serde_json::from_str(r#"["C3", 2030, false]"#).unwrap();
        assert_eq!(
            values,
            vec![
                MetaValue::Str("C3".into()),
                MetaValue::Num(2030.0),
                MetaValue::Bool(false)
            ]
        );
    }

    #[test]
    fn test_matches_by_text() {
        let code = MetaValue::from("1");
        assert!(code.matches(&MetaValue::Num(1.0)));
        assert!(MetaValue::Num(1.0).matches(&code));
        assert!(!code.matches(&MetaValue::Num(1.5)));
        assert!(MetaValue::from("true").matches(&MetaValue::Bool(true)));
        assert!(!MetaValue::Num(1.0).matches(&MetaValue::Bool(true)));
        assert!(!MetaValue::from("C1").matches(&MetaValue::from("c1")));
    }
}
