//! Per-category quantile summaries.

use crate::categories::{CategoryLabels, CATEGORY_COLUMN};
use crate::error::Result;
use ar6_frame::{Dimension, Filter, ScenarioFrame, Timeseries, QUANTILES_MODEL};

/// Levels of the detailed summary produced by [`make_quantiles`].
pub const SUMMARY_QUANTILES: [f64; 5] = [0.1, 0.25, 0.5, 0.75, 0.9];

/// Interquartile levels used by the sequestration and CDR share figures.
pub const RANGE_QUANTILES: [f64; 3] = [0.25, 0.5, 0.75];

/// Total carbon removal from the OSCAR reanalysis.
pub const CDR_TOTAL: &str = "AR6 Reanalysis|OSCARv3.2|Carbon Removal";

/// Land-based part of [`CDR_TOTAL`].
pub const CDR_LAND: &str = "AR6 Reanalysis|OSCARv3.2|Carbon Removal|Land";

/// Name of the derived land share variable.
pub const LAND_SHARE: &str = "Land Share of Total CDR";

/// Unit assigned to the land share.
pub const LAND_SHARE_UNIT: &str = "fraction";

/// World-level rows of `variable` belonging to `category`.
pub(crate) fn world_category(df: &ScenarioFrame, variable: &str, category: &str) -> ScenarioFrame {
    df.filter(&Filter::new().region("World").variable(variable))
        .filter(&Filter::new().meta(CATEGORY_COLUMN, category))
}

/// Quantile summary of `variable` for scenarios in `category`.
///
/// The result carries model `category` instead of `Quantiles`, one scenario
/// per level of [`SUMMARY_QUANTILES`], and `Category = category` as meta.
pub fn make_quantiles(df: &ScenarioFrame, variable: &str, category: &str) -> Result<ScenarioFrame> {
    let data = world_category(df, variable, category)
        .quantiles(&SUMMARY_QUANTILES)?
        .set_meta(CATEGORY_COLUMN, category)
        .rename(Dimension::Model, &[(QUANTILES_MODEL, category)])?;
    log::info!(
        "[AR6] make_quantiles: {} rows for {} / {}",
        data.len(),
        category,
        variable
    );
    Ok(data)
}

/// Land share of total CDR, summarised per category as wide timeseries.
///
/// Decadal years 2020 to 2100 are used. With `offset`, every series is first
/// shifted by its value in that year. Rows of all categories are stacked in
/// the order of `categories`.
pub fn share_of_cdr_data(
    df: &ScenarioFrame,
    categories: &CategoryLabels,
    offset: Option<i32>,
    quantiles: &[f64],
) -> Result<Timeseries> {
    let mut parts = Vec::with_capacity(categories.len());
    for (category, label) in categories.iter() {
        let mut data = df
            .filter(
                &Filter::new()
                    .variables([CDR_TOTAL, CDR_LAND])
                    .region("World")
                    .year_range(2020..=2100, 10),
            )
            .filter(&Filter::new().meta(CATEGORY_COLUMN, category));
        if let Some(year) = offset {
            data = data.offset_year(year)?;
        }
        let share = data
            .divide(CDR_LAND, CDR_TOTAL, LAND_SHARE, Some(LAND_SHARE_UNIT))?
            .quantiles(quantiles)?
            .rename(Dimension::Model, &[(QUANTILES_MODEL, label)])?
            .timeseries();
        log::debug!("[AR6] share_of_cdr_data: {} rows for {}", share.len(), label);
        parts.push(share);
    }
    Ok(Timeseries::concat(parts))
}
