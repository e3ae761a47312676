//! CSV writer: `cell_id, key_attrs.., value_attrs..`, one row per
//! `(cell, effort_key)` entry, in ascending cell-id then lexicographic
//! effort-key order (spec §4.5).

use std::collections::BTreeMap;
use std::path::Path;

use crate::error::OutputError;
use crate::values::{KeyedValues, ValueAttr};

pub(crate) fn write_csv(path: &Path, c_values: &BTreeMap<i64, KeyedValues>) -> Result<(), OutputError> {
    let mut writer = csv::Writer::from_path(path).map_err(|source| OutputError::Create { path: path.display().to_string(), source })?;

    writer
        .write_record(["cell_id", "gear_id", "time", "a", "hours_fished", "value"])
        .map_err(|source| OutputError::Write { source })?;

    for (cell_id, keyed_values) in c_values {
        for (key, values) in keyed_values {
            let row = [
                cell_id.to_string(),
                key.gear_id.clone().unwrap_or_default(),
                key.time.map(|t| t.to_string()).unwrap_or_default(),
                values.get(ValueAttr::A).to_string(),
                values.get(ValueAttr::HoursFished).to_string(),
                values.get(ValueAttr::Value).to_string(),
            ];
            writer.write_record(row).map_err(|source| OutputError::Write { source })?;
        }
    }

    writer.flush().map_err(|source| OutputError::Flush { path: path.display().to_string(), source })?;
    Ok(())
}
