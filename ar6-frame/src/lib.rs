//! In-memory IAMC scenario timeseries collection.
//!
//! A [`ScenarioFrame`] stores values indexed by
//! `(model, scenario, region, variable, unit, year)` together with
//! scenario-level metadata such as the temperature `Category`, and offers the
//! operations the figure pipelines are built from:
//!
//! - [`ScenarioFrame::filter`] with a [`Filter`] builder (wildcards, year
//!   ranges, metadata criteria)
//! - [`ScenarioFrame::quantiles`] across scenarios
//! - variable arithmetic ([`ScenarioFrame::divide`] and friends) and
//!   [`ScenarioFrame::offset_year`]
//! - [`ScenarioFrame::rename`], [`ScenarioFrame::set_meta`],
//!   [`ScenarioFrame::concat`]
//! - long and wide exports ([`ScenarioFrame::as_long`],
//!   [`ScenarioFrame::timeseries`])
//!
//! # Usage
//!
//! ```rust
//! use ar6_frame::{Filter, ScenarioFrame};
//!
//! let df = ScenarioFrame::from_iamc_csv(
//!     "Model,Scenario,Region,Variable,Unit,2030\n\
//!      m1,s1,World,Carbon Removal,Mt CO2/yr,100\n\
//!      m2,s1,World,Carbon Removal,Mt CO2/yr,300\n",
//! )
//! .unwrap();
//! let q = df
//!     .filter(&Filter::new().region("World"))
//!     .quantiles(&[0.5])
//!     .unwrap();
//! assert_eq!(q.scenarios(), vec!["0.5"]);
//! ```

pub mod compute;
pub mod error;
pub mod filter;
pub mod frame;
pub mod iamc;
pub mod index;
pub mod meta;
pub mod ops;

pub use compute::{quantile_label, QUANTILES_MODEL};
pub use error::{FrameError, Result};
pub use filter::{Filter, YearSelection};
pub use frame::{LongRow, ScenarioFrame, Timeseries, TimeseriesRow};
pub use index::{DataKey, DataPoint, Dimension, ScenarioId, SeriesKey};
pub use meta::{Meta, MetaValue};
pub use ops::BinaryOp;
