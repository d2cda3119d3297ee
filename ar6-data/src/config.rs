//! Figure configuration, loadable from JSON.
//!
//! Every field has a default matching the published figures, so a config file
//! only needs the parts that differ:
//!
//! ```rust
//! use ar6_data::FigureConfig;
//!
//! let config = FigureConfig::from_json_str(r#"{"gap": {"year": 2050}}"#).unwrap();
//! assert_eq!(config.gap.year, 2050);
//! assert_eq!(config.sequestration.years, vec![2030, 2050]);
//! ```

use crate::categories::CategoryLabels;
use crate::error::Result;
use crate::gap::{make_gap_data, DropFilter, GapData, DEFAULT_GAP_YEAR};
use crate::matrix::PlotMatrix;
use crate::quantiles::{share_of_cdr_data, RANGE_QUANTILES};
use crate::sequestration::{make_sequestration_plot_data, DEFAULT_YEARS};
use ar6_frame::{ScenarioFrame, Timeseries};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FigureConfig {
    /// Category code to display label, in plotting order.
    pub categories: CategoryLabels,
    pub sequestration: SequestrationConfig,
    pub cdr_share: CdrShareConfig,
    pub gap: GapConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SequestrationConfig {
    pub variables: Vec<String>,
    pub years: Vec<i32>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CdrShareConfig {
    /// Base year subtracted from every series before taking the share.
    pub offset: Option<i32>,
    pub quantiles: Vec<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GapConfig {
    pub variable: String,
    pub year: i32,
    pub drop: DropFilter,
}

impl Default for FigureConfig {
    fn default() -> Self {
        FigureConfig {
            categories: CategoryLabels::from_pairs([("C1", "1.5C"), ("C3", "2C")]),
            sequestration: SequestrationConfig::default(),
            cdr_share: CdrShareConfig::default(),
            gap: GapConfig::default(),
        }
    }
}

impl Default for SequestrationConfig {
    fn default() -> Self {
        SequestrationConfig {
            variables: vec![
                "AR6 Reanalysis|OSCARv3.2|Carbon Removal|Land".to_string(),
                "Carbon Sequestration|CCS".to_string(),
            ],
            years: DEFAULT_YEARS.to_vec(),
        }
    }
}

impl Default for CdrShareConfig {
    fn default() -> Self {
        CdrShareConfig {
            offset: None,
            quantiles: RANGE_QUANTILES.to_vec(),
        }
    }
}

impl Default for GapConfig {
    fn default() -> Self {
        GapConfig {
            variable: "Emissions|Kyoto Gases".to_string(),
            year: DEFAULT_GAP_YEAR,
            drop: DropFilter::new(),
        }
    }
}

impl FigureConfig {
    pub fn from_json_str(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn to_json_string(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn sequestration_data(&self, df: &ScenarioFrame) -> Result<(ScenarioFrame, PlotMatrix)> {
        make_sequestration_plot_data(
            df,
            &self.sequestration.variables,
            &self.categories,
            &self.sequestration.years,
        )
    }

    pub fn cdr_share_data(&self, df: &ScenarioFrame) -> Result<Timeseries> {
        share_of_cdr_data(
            df,
            &self.categories,
            self.cdr_share.offset,
            &self.cdr_share.quantiles,
        )
    }

    /// Gap records with the configured exclusions already applied.
    pub fn gap_data(&self, df: &ScenarioFrame) -> Result<GapData> {
        make_gap_data(df, &self.gap.variable, &self.categories, self.gap.year)?
            .prepare(&self.gap.drop)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::DataError;
    use ar6_frame::MetaValue;

    #[test]
    fn test_defaults() {
        let config = FigureConfig::default();
        assert_eq!(
            config.categories.iter().collect::<Vec<_>>(),
            vec![("C1", "1.5C"), ("C3", "2C")]
        );
        assert_eq!(config.cdr_share.quantiles, vec![0.25, 0.5, 0.75]);
        assert_eq!(config.cdr_share.offset, None);
        assert_eq!(config.gap.year, 2030);
        assert!(config.gap.drop.is_empty());
    }

    #[test]
    fn test_partial_json() {
        let config = FigureConfig::from_json_str(
            r#"{
                "categories": {"C3": "2C", "C1": "1.5C"},
                "cdr_share": {"offset": 2020},
                "gap": {"drop": {"region": "World"}}
            }"#,
        )
        .unwrap();
        assert_eq!(config.categories.codes().collect::<Vec<_>>(), vec!["C3", "C1"]);
        assert_eq!(config.cdr_share.offset, Some(2020));
        assert_eq!(config.cdr_share.quantiles, vec![0.25, 0.5, 0.75]);
        assert_eq!(
            config.gap.drop.get("region"),
            Some(&MetaValue::Str("World".to_string()))
        );
        assert_eq!(config.sequestration, SequestrationConfig::default());
    }

    #[test]
    fn test_json_round_trip() {
        let config = FigureConfig::default();
        let json = config.to_json_string().unwrap();
        assert_eq!(FigureConfig::from_json_str(&json).unwrap(), config);
    }

    #[test]
    fn test_invalid_json() {
        assert!(matches!(
            FigureConfig::from_json_str(r#"{"gap": {"year": "soon"}}"#),
            Err(DataError::Config(_))
        ));
    }
}
