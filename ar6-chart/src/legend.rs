use plotters::chart::SeriesLabelPosition;
use serde::{Deserialize, Serialize};
use std::ops::Range;

/// Where the series legend is placed inside the plot area.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LegendPosition {
    UpperLeft,
    UpperMiddle,
    UpperRight,
    MiddleLeft,
    MiddleMiddle,
    MiddleRight,
    LowerLeft,
    #[default]
    LowerMiddle,
    LowerRight,
}

impl From<LegendPosition> for SeriesLabelPosition {
    fn from(position: LegendPosition) -> Self {
        match position {
            LegendPosition::UpperLeft => SeriesLabelPosition::UpperLeft,
            LegendPosition::UpperMiddle => SeriesLabelPosition::UpperMiddle,
            LegendPosition::UpperRight => SeriesLabelPosition::UpperRight,
            LegendPosition::MiddleLeft => SeriesLabelPosition::MiddleLeft,
            LegendPosition::MiddleMiddle => SeriesLabelPosition::MiddleMiddle,
            LegendPosition::MiddleRight => SeriesLabelPosition::MiddleRight,
            LegendPosition::LowerLeft => SeriesLabelPosition::LowerLeft,
            LegendPosition::LowerMiddle => SeriesLabelPosition::LowerMiddle,
            LegendPosition::LowerRight => SeriesLabelPosition::LowerRight,
        }
    }
}

/// Indices of the last `keep` of `total` legend entries.
pub fn legend_window(total: usize, keep: usize) -> Range<usize> {
    total.saturating_sub(keep)..total
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_legend_window() {
        assert_eq!(legend_window(5, 3), 2..5);
        assert_eq!(legend_window(2, 3), 0..2);
        assert_eq!(legend_window(4, 0), 4..4);
    }

    #[test]
    fn test_position_serde() {
        let position: LegendPosition = serde_json::from_str("\"upper_right\"").unwrap();
        assert_eq!(position, LegendPosition::UpperRight);
        assert_eq!(LegendPosition::default(), LegendPosition::LowerMiddle);
    }
}
