//! SVG rendering of the AR6 carbon sequestration and gap figures.
//!
//! Each figure has a backend-agnostic function drawing onto a caller supplied
//! [`DrawingArea`](plotters::drawing::DrawingArea) and an `*_svg` variant that
//! creates its own surface:
//!
//! - [`sequestration_plot`] / [`sequestration_plot_svg`]: stacked horizontal
//!   bars with interquartile error bars
//! - [`make_gap_plot`] / [`make_gap_plot_svg`]: regional box plot by category
//!
//! Both return the computed layout, so the geometry can be inspected without
//! parsing the drawing.

pub mod axis;
pub mod bar;
pub mod boxplot;
pub mod colormap;
pub mod error;
pub mod legend;
pub mod style;

pub use bar::{
    bar_layout, sequestration_plot, sequestration_plot_svg, BarLayout, BarSegment,
    SequestrationPlotOptions,
};
pub use boxplot::{
    box_stats, gap_layout, make_gap_plot, make_gap_plot_svg, resolve_palette, BoxStats, GapBox,
    GapLayout, GapPalette, GapPlotOptions,
};
pub use colormap::Colormap;
pub use error::{PlotError, Result};
pub use legend::{legend_window, LegendPosition};
pub use style::ChartStyle;

/// Size of the figures in pixels (7 x 5 inches at 100 dpi).
pub const DEFAULT_FIGURE_SIZE: (u32, u32) = (700, 500);

/// A rendered SVG document with the layout it was drawn from.
#[derive(Debug, Clone)]
pub struct SvgFigure<L> {
    pub svg: String,
    pub layout: L,
}
