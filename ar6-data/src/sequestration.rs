//! Data behind the carbon sequestration bar chart.

use crate::categories::CategoryLabels;
use crate::error::Result;
use crate::matrix::{PlotMatrix, DEFAULT_SCALE};
use crate::quantiles::{world_category, RANGE_QUANTILES};
use ar6_frame::{Dimension, ScenarioFrame, QUANTILES_MODEL};
use itertools::iproduct;

/// Years shown in the sequestration figure.
pub const DEFAULT_YEARS: [i32; 2] = [2030, 2050];

/// Interquartile summaries of every `variable` for every category, plus the
/// pivoted matrix for `years`.
///
/// Summaries are concatenated category-major, each carrying the category's
/// display label as its model.
pub fn make_sequestration_plot_data<S: AsRef<str>>(
    df: &ScenarioFrame,
    variables: &[S],
    categories: &CategoryLabels,
    years: &[i32],
) -> Result<(ScenarioFrame, PlotMatrix)> {
    let parts = iproduct!(categories.iter(), variables.iter())
        .map(|((category, label), variable)| -> Result<ScenarioFrame> {
            let summary = world_category(df, variable.as_ref(), category)
                .quantiles(&RANGE_QUANTILES)?
                .rename(Dimension::Model, &[(QUANTILES_MODEL, label)])?;
            Ok(summary)
        })
        .collect::<Result<Vec<_>>>()?;
    let data = ScenarioFrame::concat(parts)?;
    let pdata = PlotMatrix::from_frame(&data, years, DEFAULT_SCALE)?;
    log::info!(
        "[AR6] sequestration: {} summary rows, {} plot rows",
        data.len(),
        pdata.rows().len()
    );
    Ok((data, pdata))
}

#[cfg(test)]
mod tests {
    use super::*;

    const SCENARIOS: &str = "Model,Scenario,Region,Variable,Unit,2030,2050,2100
m1,s1,World,Carbon Sequestration|CCS,Mt CO2/yr,1000,4000,9000
m1,s2,World,Carbon Sequestration|CCS,Mt CO2/yr,2000,6000,9000
m1,s3,World,Carbon Sequestration|CCS,Mt CO2/yr,3000,8000,9000
m1,s1,World,Carbon Sequestration|Land Use,Mt CO2/yr,500,1000,0
m1,s2,World,Carbon Sequestration|Land Use,Mt CO2/yr,700,1400,0
m1,s3,World,Carbon Sequestration|Land Use,Mt CO2/yr,900,1800,0
m1,s1,R10AFRICA,Carbon Sequestration|CCS,Mt CO2/yr,1,1,1
";

    const META: &str = "Model,Scenario,Category
m1,s1,C1
m1,s2,C1
m1,s3,C3
";

    const VARIABLES: [&str; 2] = ["Carbon Sequestration|CCS", "Carbon Sequestration|Land Use"];

    fn run() -> (ScenarioFrame, PlotMatrix) {
        let df = ScenarioFrame::from_iamc_csv(SCENARIOS)
            .unwrap()
            .with_meta_csv(META)
            .unwrap();
        let labels = CategoryLabels::from_pairs([("C1", "1.5C"), ("C3", "2C")]);
        make_sequestration_plot_data(&df, &VARIABLES, &labels, &DEFAULT_YEARS).unwrap()
    }

    #[test]
    fn test_summary_covers_categories_and_variables() {
        let (data, _) = run();
        assert_eq!(data.models(), vec!["1.5C", "2C"]);
        assert_eq!(data.scenarios(), vec!["0.25", "0.5", "0.75"]);
        assert_eq!(data.variables(), VARIABLES.to_vec());
        assert_eq!(data.regions(), vec!["World"]);
        assert_eq!(data.years(), vec![2030, 2050, 2100]);
    }

    #[test]
    fn test_plot_matrix() {
        let (_, pdata) = run();
        assert_eq!(pdata.rows(), ["2050 2C", "2050 1.5C", "2030 2C", "2030 1.5C"]);
        assert_eq!(pdata.columns().len(), 6);
        // 1.5C CCS in 2030: 1000 and 2000 Mt
        let close = |a: Option<f64>, b: f64| (a.unwrap() - b).abs() < 1e-9;
        assert!(close(pdata.get("2030 1.5C", "0.25", VARIABLES[0]), 1.25));
        assert!(close(pdata.get("2030 1.5C", "0.5", VARIABLES[0]), 1.5));
        assert!(close(pdata.get("2030 1.5C", "0.75", VARIABLES[0]), 1.75));
        assert!(close(pdata.get("2050 2C", "0.5", VARIABLES[1]), 1.8));
    }
}
