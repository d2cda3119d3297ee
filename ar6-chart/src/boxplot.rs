//! Box plot of regional gap values, one box per region and category.
//!
//! Regions run along the x axis in order of first appearance; categories are
//! dodged side by side within each region. Quartiles use linear
//! interpolation, whiskers reach the furthest datum within `whis` times the
//! interquartile range and outliers are not drawn.

use crate::axis::category_tick_label;
use crate::colormap::{desaturate, parse_hex, Colormap};
use crate::error::{PlotError, Result};
use crate::legend::LegendPosition;
use crate::{SvgFigure, DEFAULT_FIGURE_SIZE};
use ar6_data::{DropFilter, GapData};
use ar6_frame::compute::quantile_sorted;
use plotters::coord::Shift;
use plotters::prelude::*;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Outline colour of boxes, whiskers and medians.
const LINE_GRAY: RGBColor = RGBColor(61, 61, 61);

/// Number of dashes across the zero line.
const ZERO_LINE_DASHES: usize = 60;

/// Colours of the categories: a named map or an explicit table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum GapPalette {
    Named(String),
    /// Category label to `#rrggbb`.
    Mapping(BTreeMap<String, String>),
}

impl Default for GapPalette {
    fn default() -> Self {
        GapPalette::Named("Set2_r".to_string())
    }
}

/// One colour per entry of `categories`.
pub fn resolve_palette(palette: &GapPalette, categories: &[String]) -> Result<Vec<RGBColor>> {
    match palette {
        GapPalette::Named(name) => Ok(Colormap::named(name)?.palette(categories.len())),
        GapPalette::Mapping(table) => categories
            .iter()
            .map(|category| {
                let hex = table.get(category).ok_or_else(|| {
                    PlotError::InvalidData(format!("no colour for category '{category}'"))
                })?;
                parse_hex(hex)
            })
            .collect(),
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GapPlotOptions {
    /// Records to leave out, e.g. `{"region": "World"}`.
    pub drop: DropFilter,
    pub palette: GapPalette,
    /// Saturation applied to the box fill colours.
    pub saturation: f64,
    pub show_zero_line: bool,
    /// Width shared by the boxes of one region.
    pub box_width: f64,
    pub whis: f64,
    pub legend: LegendPosition,
    pub title: Option<String>,
    pub y_label: String,
}

impl Default for GapPlotOptions {
    fn default() -> Self {
        GapPlotOptions {
            drop: DropFilter::new(),
            palette: GapPalette::default(),
            saturation: 0.75,
            show_zero_line: true,
            box_width: 0.8,
            whis: 0.0,
            legend: LegendPosition::UpperRight,
            title: None,
            y_label: "value".to_string(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct BoxStats {
    pub count: usize,
    pub q1: f64,
    pub median: f64,
    pub q3: f64,
    pub whislo: f64,
    pub whishi: f64,
}

/// Quartiles and whisker ends of `values`, ignoring NaN.
pub fn box_stats(values: &[f64], whis: f64) -> Option<BoxStats> {
    let mut sorted: Vec<f64> = values.iter().copied().filter(|v| !v.is_nan()).collect();
    sorted.sort_by(f64::total_cmp);
    let q1 = quantile_sorted(&sorted, 0.25)?;
    let median = quantile_sorted(&sorted, 0.5)?;
    let q3 = quantile_sorted(&sorted, 0.75)?;
    let iqr = q3 - q1;
    let low_fence = q1 - whis * iqr;
    let high_fence = q3 + whis * iqr;

    let whishi = sorted
        .iter()
        .copied()
        .filter(|v| *v <= high_fence)
        .fold(f64::NEG_INFINITY, f64::max);
    let whislo = sorted
        .iter()
        .copied()
        .filter(|v| *v >= low_fence)
        .fold(f64::INFINITY, f64::min);
    Some(BoxStats {
        count: sorted.len(),
        q1,
        median,
        q3,
        whislo: if whislo > q1 { q1 } else { whislo },
        whishi: if whishi < q3 { q3 } else { whishi },
    })
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GapBox {
    pub region: String,
    pub category: String,
    /// Index into [`GapLayout::categories`].
    pub hue: usize,
    pub center: f64,
    pub width: f64,
    pub stats: BoxStats,
}

/// Geometry of a gap box plot together with the records it shows.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GapLayout {
    pub data: GapData,
    pub regions: Vec<String>,
    pub categories: Vec<String>,
    pub boxes: Vec<GapBox>,
    pub y_range: (f64, f64),
}

/// Place one box per `(region, category)` cell of already prepared `data`.
pub fn gap_layout(data: &GapData, options: &GapPlotOptions) -> Result<GapLayout> {
    if data.is_empty() {
        return Err(PlotError::InvalidData("no records left to plot".to_string()));
    }
    let regions = data.regions();
    let categories = data.categories();
    let n_hues = categories.len().max(1) as f64;
    let each = options.box_width / n_hues;

    let mut boxes = Vec::new();
    for (x, region) in regions.iter().enumerate() {
        for (hue, category) in categories.iter().enumerate() {
            let Some(stats) = box_stats(&data.values(region, category), options.whis) else {
                continue;
            };
            let offset = hue as f64 * each - (options.box_width - each) / 2.0;
            boxes.push(GapBox {
                region: region.clone(),
                category: category.clone(),
                hue,
                center: x as f64 + offset,
                width: each,
                stats,
            });
        }
    }

    let mut ys: Vec<f64> = boxes
        .iter()
        .flat_map(|b| [b.stats.whislo, b.stats.whishi])
        .collect();
    if options.show_zero_line {
        ys.push(0.0);
    }
    let y_min = ys.iter().copied().fold(f64::INFINITY, f64::min);
    let y_max = ys.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    let pad = if y_max > y_min {
        (y_max - y_min) * 0.05
    } else {
        1.0
    };

    Ok(GapLayout {
        data: data.clone(),
        regions,
        categories,
        boxes,
        y_range: (y_min - pad, y_max + pad),
    })
}

/// Draw the gap box plot of `data` onto `area`, after removing records
/// matching `options.drop` and incomplete records.
pub fn make_gap_plot<DB: DrawingBackend>(
    data: &GapData,
    options: &GapPlotOptions,
    area: &DrawingArea<DB, Shift>,
) -> Result<GapLayout> {
    let prepared = data.prepare(&options.drop)?;
    let layout = gap_layout(&prepared, options)?;
    let colors = resolve_palette(&options.palette, &layout.categories)?;
    let n_regions = layout.regions.len();
    let x_span = -0.5..n_regions as f64 - 0.5;

    let mut builder = ChartBuilder::on(area);
    builder
        .margin(10)
        .x_label_area_size(40)
        .y_label_area_size(60);
    if let Some(title) = &options.title {
        builder.caption(title, ("sans-serif", 20));
    }
    let mut chart = builder
        .build_cartesian_2d(x_span.clone(), layout.y_range.0..layout.y_range.1)
        .map_err(|e| PlotError::ChartConfig(e.to_string()))?;

    let region_label = |x: &f64| category_tick_label(&layout.regions, *x);
    chart
        .configure_mesh()
        .disable_x_mesh()
        .x_labels(n_regions.max(1))
        .x_label_formatter(&region_label)
        .x_desc("region")
        .y_desc(options.y_label.as_str())
        .draw()
        .map_err(|e| PlotError::Drawing(e.to_string()))?;

    if options.show_zero_line {
        let step = (x_span.end - x_span.start) / ZERO_LINE_DASHES as f64;
        let dashes = (0..ZERO_LINE_DASHES).map(|k| {
            let x0 = x_span.start + k as f64 * step;
            PathElement::new(vec![(x0, 0.0), (x0 + step * 0.6, 0.0)], BLACK.mix(0.5))
        });
        chart
            .draw_series(dashes)
            .map_err(|e| PlotError::Drawing(e.to_string()))?;
    }

    for (hue, category) in layout.categories.iter().enumerate() {
        let fill = desaturate(colors[hue], options.saturation).filled();
        let bodies = layout.boxes.iter().filter(|b| b.hue == hue).map(|b| {
            Rectangle::new(
                [
                    (b.center - b.width / 2.0, b.stats.q1),
                    (b.center + b.width / 2.0, b.stats.q3),
                ],
                fill,
            )
        });
        chart
            .draw_series(bodies)
            .map_err(|e| PlotError::Drawing(e.to_string()))?
            .label(category.as_str())
            .legend(move |(x, y)| Rectangle::new([(x, y - 5), (x + 15, y + 5)], fill));
    }

    let outlines = layout.boxes.iter().map(|b| {
        Rectangle::new(
            [
                (b.center - b.width / 2.0, b.stats.q1),
                (b.center + b.width / 2.0, b.stats.q3),
            ],
            LINE_GRAY,
        )
    });
    chart
        .draw_series(outlines)
        .map_err(|e| PlotError::Drawing(e.to_string()))?;

    let mut lines: Vec<Vec<(f64, f64)>> = Vec::new();
    for b in &layout.boxes {
        let (left, right) = (b.center - b.width / 2.0, b.center + b.width / 2.0);
        let cap = b.width / 4.0;
        let s = &b.stats;
        lines.push(vec![(left, s.median), (right, s.median)]);
        lines.push(vec![(b.center, s.q1), (b.center, s.whislo)]);
        lines.push(vec![(b.center, s.q3), (b.center, s.whishi)]);
        lines.push(vec![(b.center - cap, s.whislo), (b.center + cap, s.whislo)]);
        lines.push(vec![(b.center - cap, s.whishi), (b.center + cap, s.whishi)]);
    }
    chart
        .draw_series(
            lines
                .into_iter()
                .map(|points| PathElement::new(points, LINE_GRAY)),
        )
        .map_err(|e| PlotError::Drawing(e.to_string()))?;

    chart
        .configure_series_labels()
        .position(options.legend.into())
        .background_style(WHITE.mix(0.8))
        .border_style(BLACK)
        .draw()
        .map_err(|e| PlotError::Drawing(e.to_string()))?;

    log::info!(
        "[AR6] make_gap_plot: {} boxes for {} regions, {} records",
        layout.boxes.len(),
        n_regions,
        layout.data.len()
    );
    Ok(layout)
}

/// Render the gap box plot onto a fresh 700x500 SVG surface.
pub fn make_gap_plot_svg(data: &GapData, options: &GapPlotOptions) -> Result<SvgFigure<GapLayout>> {
    let mut svg = String::new();
    let layout = {
        let root = SVGBackend::with_string(&mut svg, DEFAULT_FIGURE_SIZE).into_drawing_area();
        root.fill(&WHITE)
            .map_err(|e| PlotError::DrawingArea(e.to_string()))?;
        let layout = make_gap_plot(data, options, &root)?;
        root.present()
            .map_err(|e| PlotError::Drawing(e.to_string()))?;
        layout
    };
    Ok(SvgFigure { svg, layout })
}

#[cfg(test)]
mod tests {
    use super::*;
    use ar6_data::GapRecord;
    use ar6_frame::MetaValue;

    fn record(scenario: &str, region: &str, category: &str, value: f64) -> GapRecord {
        GapRecord {
            model: "m".to_string(),
            scenario: scenario.to_string(),
            region: region.to_string(),
            year: 2030,
            category: Some(category.to_string()),
            value,
        }
    }

    fn gap() -> GapData {
        GapData::new(vec![
            record("s1", "World", "2C", 10.0),
            record("s2", "World", "2C", 20.0),
            record("s3", "World", "1.5C", 5.0),
            record("s1", "R5ASIA", "2C", -4.0),
            record("s2", "R5ASIA", "2C", 2.0),
            record("s3", "R5ASIA", "1.5C", 1.0),
            record("s4", "R5ASIA", "1.5C", f64::NAN),
        ])
    }

    #[test]
    fn test_box_stats_zero_whiskers() {
        let stats = box_stats(&[5.0, 1.0, 4.0, 2.0, 3.0], 0.0).unwrap();
        assert_eq!(stats.count, 5);
        assert_eq!((stats.q1, stats.median, stats.q3), (2.0, 3.0, 4.0));
        assert_eq!((stats.whislo, stats.whishi), (2.0, 4.0));
    }

    #[test]
    fn test_box_stats_whiskers_and_missing() {
        let stats = box_stats(&[1.0, 2.0, f64::NAN, 3.0, 4.0, 100.0], 1.5).unwrap();
        assert_eq!(stats.count, 5);
        assert_eq!((stats.whislo, stats.whishi), (1.0, 4.0));
        assert!(box_stats(&[], 0.0).is_none());
        assert!(box_stats(&[f64::NAN], 0.0).is_none());
    }

    #[test]
    fn test_dodged_layout() {
        let layout = gap_layout(&gap().prepare(&DropFilter::new()).unwrap(), &GapPlotOptions::default())
            .unwrap();
        assert_eq!(layout.regions, vec!["World", "R5ASIA"]);
        assert_eq!(layout.categories, vec!["2C", "1.5C"]);
        assert_eq!(layout.boxes.len(), 4);
        let first = &layout.boxes[0];
        assert!((first.center + 0.2).abs() < 1e-12);
        assert!((first.width - 0.4).abs() < 1e-12);
        let last = &layout.boxes[3];
        assert_eq!((last.region.as_str(), last.category.as_str()), ("R5ASIA", "1.5C"));
        assert!((last.center - 1.2).abs() < 1e-12);
        assert_eq!(last.stats.count, 1);
        assert!(layout.y_range.0 < -2.5 && layout.y_range.1 > 17.5);
    }

    #[test]
    fn test_drop_world_leaves_no_world_rows() {
        let mut drop = DropFilter::new();
        drop.insert("region".to_string(), MetaValue::from("World"));
        let options = GapPlotOptions {
            drop,
            ..Default::default()
        };
        let figure = make_gap_plot_svg(&gap(), &options).unwrap();
        let layout = &figure.layout;
        assert!(layout.data.records().iter().all(|r| r.region != "World"));
        assert_eq!(layout.regions, vec!["R5ASIA"]);
        assert!(layout.boxes.iter().all(|b| b.region != "World"));
        assert!(figure.svg.contains("R5ASIA"));
    }

    #[test]
    fn test_palette_mapping() {
        let categories = vec!["1.5C".to_string(), "2C".to_string()];
        let palette: GapPalette =
            serde_json::from_str(r##"{"2C": "#fc8d59", "1.5C": "#91bfdb"}"##).unwrap();
        let colors = resolve_palette(&palette, &categories).unwrap();
        assert_eq!(colors, vec![RGBColor(0x91, 0xbf, 0xdb), RGBColor(0xfc, 0x8d, 0x59)]);

        let partial = GapPalette::Mapping(BTreeMap::from([(
            "2C".to_string(),
            "#fc8d59".to_string(),
        )]));
        assert!(matches!(
            resolve_palette(&partial, &categories),
            Err(PlotError::InvalidData(_))
        ));
        assert_eq!(
            resolve_palette(&GapPalette::default(), &categories).unwrap().len(),
            2
        );
    }

    #[test]
    fn test_everything_dropped() {
        let mut drop = DropFilter::new();
        drop.insert("model".to_string(), MetaValue::from("m"));
        let options = GapPlotOptions {
            drop,
            ..Default::default()
        };
        assert!(matches!(
            make_gap_plot_svg(&gap(), &options),
            Err(PlotError::InvalidData(_))
        ));
    }

    #[test]
    fn test_svg_region_ticks() {
        let figure = make_gap_plot_svg(&gap(), &GapPlotOptions::default()).unwrap();
        assert!(figure.svg.starts_with("<svg"));
        assert!(figure.svg.contains("R5ASIA"));
        assert!(figure.svg.contains("World"));
        assert!(figure.svg.contains("1.5C"));
        assert_eq!(figure.layout.boxes.len(), 4);
    }
}
