use crate::bar::SequestrationPlotOptions;
use crate::boxplot::GapPlotOptions;
use crate::error::Result;
use serde::{Deserialize, Serialize};

/// Styling of both figures, loadable from JSON.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ChartStyle {
    pub sequestration: SequestrationPlotOptions,
    pub gap: GapPlotOptions,
}

impl ChartStyle {
    pub fn from_json_str(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::boxplot::GapPalette;
    use crate::legend::LegendPosition;

    #[test]
    fn test_defaults() {
        let style = ChartStyle::default();
        assert_eq!(style.sequestration.cmap, "PiYG");
        assert_eq!(style.sequestration.alpha, 0.7);
        assert_eq!(style.sequestration.capsize, 4);
        assert!(style.sequestration.medians && style.sequestration.stacked);
        assert_eq!(style.gap.palette, GapPalette::Named("Set2_r".to_string()));
        assert_eq!(style.gap.whis, 0.0);
    }

    #[test]
    fn test_partial_json() {
        let style = ChartStyle::from_json_str(
            r##"{
                "sequestration": {"cmap": "BrBG", "medians": false, "legend": "upper_left"},
                "gap": {"palette": {"2C": "#fc8d59", "1.5C": "#91bfdb"}}
            }"##,
        )
        .unwrap();
        assert_eq!(style.sequestration.cmap, "BrBG");
        assert!(!style.sequestration.medians);
        assert_eq!(style.sequestration.legend, LegendPosition::UpperLeft);
        assert_eq!(style.sequestration.bar_height, 0.5);
        assert!(matches!(style.gap.palette, GapPalette::Mapping(ref m) if m.len() == 2));
        assert!(style.gap.show_zero_line);
    }
}
