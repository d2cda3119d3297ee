//! Parsing of IAMC-format CSV text.
//!
//! # CSV Formats
//!
//! - **Data** (wide, has headers): `Model,Scenario,Region,Variable,Unit,<year>...`
//! - **Metadata** (has headers): `Model,Scenario,<column>...`
//!
//! Header names are matched case-insensitively and empty cells are skipped.
//!
//! # Example CSV
//! ```text
//! Model,Scenario,Region,Variable,Unit,2030,2050
//! MESSAGE,SSP1-19,World,Carbon Removal,Mt CO2/yr,120.5,2100
//! ```

use crate::error::{FrameError, Result};
use crate::frame::ScenarioFrame;
use crate::index::{DataPoint, Dimension, ScenarioId};
use crate::meta::MetaValue;
use csv::{ReaderBuilder, StringRecord};

fn column(headers: &StringRecord, name: &str) -> Result<usize> {
    headers
        .iter()
        .position(|h| h.trim().eq_ignore_ascii_case(name))
        .ok_or_else(|| FrameError::InvalidFormat(format!("missing column '{name}'")))
}

impl ScenarioFrame {
    /// Parse wide IAMC CSV text into a frame.
    pub fn from_iamc_csv(csv_data: &str) -> Result<Self> {
        let mut rdr = ReaderBuilder::new()
            .has_headers(true)
            .flexible(true)
            .from_reader(csv_data.as_bytes());
        let headers = rdr.headers()?.clone();

        let mut index = [0usize; 5];
        for (slot, dim) in index.iter_mut().zip(Dimension::ALL) {
            *slot = column(&headers, dim.as_str())?;
        }
        let mut years = Vec::new();
        for (i, header) in headers.iter().enumerate() {
            if index.contains(&i) {
                continue;
            }
            let year = header.trim().parse::<i32>().map_err(|_| {
                FrameError::InvalidFormat(format!("unexpected column '{header}'"))
            })?;
            years.push((i, year));
        }

        let mut points = Vec::new();
        for result in rdr.records() {
            let record = result?;
            let field = |i: usize| record.get(i).unwrap_or("").trim();
            for (i, year) in &years {
                let cell = field(*i);
                if cell.is_empty() {
                    continue;
                }
                let value = cell.parse::<f64>().map_err(|_| {
                    FrameError::InvalidFormat(format!("non-numeric value '{cell}' for {year}"))
                })?;
                points.push(DataPoint::new(
                    field(index[0]),
                    field(index[1]),
                    field(index[2]),
                    field(index[3]),
                    field(index[4]),
                    *year,
                    value,
                ));
            }
        }
        let frame = ScenarioFrame::from_points(points)?;
        log::info!(
            "[AR6] iamc: parsed {} values for {} scenarios",
            frame.len(),
            frame.meta().len()
        );
        Ok(frame)
    }

    /// Attach metadata columns from CSV text. Rows naming scenarios without
    /// data are ignored.
    pub fn with_meta_csv(mut self, csv_data: &str) -> Result<Self> {
        let mut rdr = ReaderBuilder::new()
            .has_headers(true)
            .flexible(true)
            .from_reader(csv_data.as_bytes());
        let headers = rdr.headers()?.clone();
        let model = column(&headers, "model")?;
        let scenario = column(&headers, "scenario")?;

        let mut skipped = 0u32;
        for result in rdr.records() {
            let record = result?;
            let id = ScenarioId::new(
                record.get(model).unwrap_or("").trim(),
                record.get(scenario).unwrap_or("").trim(),
            );
            let Some(row) = self.meta_mut().get_mut(&id) else {
                skipped += 1;
                continue;
            };
            for (i, name) in headers.iter().enumerate() {
                if i == model || i == scenario {
                    continue;
                }
                if let Some(value) = record.get(i).and_then(MetaValue::parse) {
                    row.insert(name.trim().to_string(), value);
                }
            }
        }
        if skipped > 0 {
            log::debug!("[AR6] iamc: skipped meta for {} unknown scenarios", skipped);
        }
        Ok(self)
    }
}
