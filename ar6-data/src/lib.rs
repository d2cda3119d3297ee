//! Data preparation for the AR6 carbon sequestration and gap figures.
//!
//! This crate turns a [`ScenarioFrame`](ar6_frame::ScenarioFrame) into the
//! plot-ready structures consumed by `ar6-chart`:
//!
//! - [`make_quantiles`] and [`share_of_cdr_data`] summarise categories
//! - [`make_sequestration_plot_data`] builds the sequestration [`PlotMatrix`]
//! - [`make_gap_data`] builds the long-form [`GapData`] for the box plot

pub mod categories;
pub mod config;
pub mod error;
pub mod gap;
pub mod matrix;
pub mod quantiles;
pub mod sequestration;

pub use categories::{CategoryLabels, CATEGORY_COLUMN};
pub use config::{CdrShareConfig, FigureConfig, GapConfig, SequestrationConfig};
pub use error::{DataError, Result};
pub use gap::{make_gap_data, DropFilter, GapData, GapRecord, DEFAULT_GAP_YEAR};
pub use matrix::{error_bars, ColumnKey, ErrorSpan, PlotMatrix, SubMatrix, DEFAULT_SCALE};
pub use quantiles::{
    make_quantiles, share_of_cdr_data, CDR_LAND, CDR_TOTAL, LAND_SHARE, RANGE_QUANTILES,
    SUMMARY_QUANTILES,
};
pub use sequestration::{make_sequestration_plot_data, DEFAULT_YEARS};
