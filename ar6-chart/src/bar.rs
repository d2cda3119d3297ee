//! Horizontal stacked bar chart of sequestration quantiles.
//!
//! Bars show the median (`0.5`) of each variable; error bars span the
//! interquartile range (`0.25` to `0.75`) and sit at the end of each bar
//! segment. Row `i` of the plot matrix is drawn at `y = i`.

use crate::axis::category_tick_label;
use crate::colormap::Colormap;
use crate::error::{PlotError, Result};
use crate::legend::{legend_window, LegendPosition};
use crate::{SvgFigure, DEFAULT_FIGURE_SIZE};
use ar6_data::{error_bars, PlotMatrix};
use plotters::coord::Shift;
use plotters::prelude::*;
use serde::{Deserialize, Serialize};

pub const MEDIAN: &str = "0.5";
pub const LOWER: &str = "0.25";
pub const UPPER: &str = "0.75";

/// Legend label of the median total markers.
pub const MEDIAN_TOTAL: &str = "Median Total";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SequestrationPlotOptions {
    /// Variables to draw, in stacking order. All by default.
    pub order: Option<Vec<String>>,
    /// Mark the sum of medians of every row.
    pub medians: bool,
    /// Stack variables within a row instead of placing them side by side.
    pub stacked: bool,
    pub cmap: String,
    pub alpha: f64,
    /// Error bar cap half-length in pixels.
    pub capsize: u32,
    /// Row band occupied by the bars.
    pub bar_height: f64,
    pub legend: LegendPosition,
    pub title: Option<String>,
    pub x_label: String,
}

impl Default for SequestrationPlotOptions {
    fn default() -> Self {
        SequestrationPlotOptions {
            order: None,
            medians: true,
            stacked: true,
            cmap: "PiYG".to_string(),
            alpha: 0.7,
            capsize: 4,
            bar_height: 0.5,
            legend: LegendPosition::LowerMiddle,
            title: None,
            x_label: "Gt CO2/yr".to_string(),
        }
    }
}

/// One drawn bar.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BarSegment {
    pub row: usize,
    pub column: usize,
    pub start: f64,
    pub end: f64,
    pub y_low: f64,
    pub y_high: f64,
    /// Horizontal extent of the error bar, when both quartiles are known.
    pub error: Option<(f64, f64)>,
}

impl BarSegment {
    pub fn y_center(&self) -> f64 {
        (self.y_low + self.y_high) / 2.0
    }
}

/// Geometry of a sequestration chart, independent of any backend.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BarLayout {
    pub rows: Vec<String>,
    pub columns: Vec<String>,
    pub segments: Vec<BarSegment>,
    /// Row sums of the medians.
    pub medians: Option<Vec<f64>>,
    /// Labels shown in the legend, in drawing order.
    pub legend: Vec<String>,
    pub x_range: (f64, f64),
}

impl BarLayout {
    /// Legend label of series `index` (bar columns, then the median marker).
    fn series_label(&self, index: usize, all: &[String]) -> Option<String> {
        let window = legend_window(all.len(), self.legend.len());
        window.contains(&index).then(|| all[index].clone())
    }

    fn series_names(&self) -> Vec<String> {
        let mut names = self.columns.clone();
        if self.medians.is_some() {
            names.push(MEDIAN_TOTAL.to_string());
        }
        names
    }
}

/// Compute bar positions, error extents and legend entries for `pdata`.
pub fn bar_layout(pdata: &PlotMatrix, options: &SequestrationPlotOptions) -> Result<BarLayout> {
    if pdata.is_empty() {
        return Err(PlotError::InvalidData("plot matrix has no rows".to_string()));
    }
    let mut base = pdata.scenario(MEDIAN)?;
    let lower = pdata.scenario(LOWER)?;
    let upper = pdata.scenario(UPPER)?;
    if let Some(order) = &options.order {
        base = base.select(order)?;
    }
    let errors = error_bars(&base, &lower, &upper)?;

    let n_rows = base.rows().len();
    let n_cols = base.columns().len();
    let height = options.bar_height;
    let mut pos_prior = vec![0.0; n_rows];
    let mut neg_prior = vec![0.0; n_rows];
    let mut segments = Vec::new();
    for (column, span) in errors.iter().enumerate() {
        for (row, cells) in base.values().iter().enumerate() {
            let Some(value) = cells[column] else {
                continue;
            };
            let center = row as f64;
            let (start, y_low, y_high) = if options.stacked {
                let prior = if value >= 0.0 {
                    &mut pos_prior[row]
                } else {
                    &mut neg_prior[row]
                };
                let start = *prior;
                *prior += value;
                (start, center - height / 2.0, center + height / 2.0)
            } else {
                let width = height / n_cols as f64;
                let low = center - height / 2.0 + column as f64 * width;
                (0.0, low, low + width)
            };
            let end = start + value;
            let error = match (span.minus[row], span.plus[row]) {
                (Some(minus), Some(plus)) => Some((end - minus, end + plus)),
                _ => None,
            };
            segments.push(BarSegment {
                row,
                column,
                start,
                end,
                y_low,
                y_high,
                error,
            });
        }
    }

    let medians = options.medians.then(|| base.row_sums());

    let mut xs = vec![0.0];
    for segment in &segments {
        xs.extend([segment.start, segment.end]);
        if let Some((lo, hi)) = segment.error {
            xs.extend([lo, hi]);
        }
    }
    xs.extend(medians.iter().flatten().copied());
    let x_min = xs.iter().copied().fold(f64::INFINITY, f64::min);
    let x_max = xs.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    let pad = if x_max > x_min {
        (x_max - x_min) * 0.05
    } else {
        1.0
    };

    let mut layout = BarLayout {
        rows: base.rows().to_vec(),
        columns: base.columns().to_vec(),
        segments,
        medians,
        legend: Vec::new(),
        x_range: (x_min - pad, x_max + pad),
    };
    let names = layout.series_names();
    let keep = pdata.variables().len() + usize::from(options.medians);
    layout.legend = names[legend_window(names.len(), keep)].to_vec();
    log::debug!(
        "[AR6] bar layout: {} rows, {} columns, {} segments",
        n_rows,
        n_cols,
        layout.segments.len()
    );
    Ok(layout)
}

/// Draw the sequestration chart of `pdata` onto `area`.
pub fn sequestration_plot<DB: DrawingBackend>(
    pdata: &PlotMatrix,
    options: &SequestrationPlotOptions,
    area: &DrawingArea<DB, Shift>,
) -> Result<BarLayout> {
    let layout = bar_layout(pdata, options)?;
    let colors = Colormap::named(&options.cmap)?.sample(layout.columns.len());
    let names = layout.series_names();
    let n_rows = layout.rows.len();

    let mut builder = ChartBuilder::on(area);
    builder
        .margin(10)
        .x_label_area_size(40)
        .y_label_area_size(100);
    if let Some(title) = &options.title {
        builder.caption(title, ("sans-serif", 20));
    }
    let mut chart = builder
        .build_cartesian_2d(
            layout.x_range.0..layout.x_range.1,
            -0.5..n_rows as f64 - 0.5,
        )
        .map_err(|e| PlotError::ChartConfig(e.to_string()))?;

    let row_label = |y: &f64| category_tick_label(&layout.rows, *y);
    chart
        .configure_mesh()
        .disable_y_mesh()
        .y_labels(n_rows.max(1))
        .y_label_formatter(&row_label)
        .x_desc(options.x_label.as_str())
        .draw()
        .map_err(|e| PlotError::Drawing(e.to_string()))?;

    for (column, color) in colors.iter().enumerate() {
        let style = color.mix(options.alpha).filled();
        let bars = layout
            .segments
            .iter()
            .filter(|s| s.column == column)
            .map(|s| Rectangle::new([(s.start, s.y_low), (s.end, s.y_high)], style));
        let series = chart
            .draw_series(bars)
            .map_err(|e| PlotError::Drawing(e.to_string()))?;
        if let Some(label) = layout.series_label(column, &names) {
            series
                .label(label)
                .legend(move |(x, y)| Rectangle::new([(x, y - 5), (x + 15, y + 5)], style));
        }
    }

    let cap = options.capsize as i32;
    let with_error: Vec<(f64, f64, f64)> = layout
        .segments
        .iter()
        .filter_map(|s| s.error.map(|(lo, hi)| (lo, hi, s.y_center())))
        .collect();
    chart
        .draw_series(
            with_error
                .iter()
                .map(|(lo, hi, y)| PathElement::new(vec![(*lo, *y), (*hi, *y)], BLACK)),
        )
        .map_err(|e| PlotError::Drawing(e.to_string()))?;
    chart
        .draw_series(
            with_error
                .iter()
                .flat_map(|(lo, hi, y)| [(*lo, *y), (*hi, *y)])
                .map(|at| EmptyElement::at(at) + PathElement::new(vec![(0, -cap), (0, cap)], BLACK)),
        )
        .map_err(|e| PlotError::Drawing(e.to_string()))?;

    if let Some(medians) = &layout.medians {
        let markers = medians.iter().enumerate().map(|(row, total)| {
            EmptyElement::at((*total, row as f64))
                + Rectangle::new([(-4, -4), (4, 4)], BLACK.filled())
        });
        let series = chart
            .draw_series(markers)
            .map_err(|e| PlotError::Drawing(e.to_string()))?;
        if let Some(label) = layout.series_label(names.len() - 1, &names) {
            series.label(label).legend(|(x, y)| {
                Rectangle::new([(x + 3, y - 4), (x + 11, y + 4)], BLACK.filled())
            });
        }
    }

    if !layout.legend.is_empty() {
        chart
            .configure_series_labels()
            .position(options.legend.into())
            .background_style(WHITE.mix(0.8))
            .border_style(BLACK)
            .draw()
            .map_err(|e| PlotError::Drawing(e.to_string()))?;
    }

    log::info!(
        "[AR6] sequestration_plot: {} bars over {} rows",
        layout.segments.len(),
        n_rows
    );
    Ok(layout)
}

/// Render the sequestration chart onto a fresh 700x500 SVG surface.
pub fn sequestration_plot_svg(
    pdata: &PlotMatrix,
    options: &SequestrationPlotOptions,
) -> Result<SvgFigure<BarLayout>> {
    let mut svg = String::new();
    let layout = {
        let root = SVGBackend::with_string(&mut svg, DEFAULT_FIGURE_SIZE).into_drawing_area();
        root.fill(&WHITE)
            .map_err(|e| PlotError::DrawingArea(e.to_string()))?;
        let layout = sequestration_plot(pdata, options, &root)?;
        root.present()
            .map_err(|e| PlotError::Drawing(e.to_string()))?;
        layout
    };
    Ok(SvgFigure { svg, layout })
}
