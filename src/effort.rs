//! Effort ingestion and mapping: pulls raw CSV rows and coerces them into
//! typed `Effort` records via a small set of field processors. Mirrors the
//! `source_field, target_attr, processor` mapping list from spec §4.3.

use crate::config::GearMappings;
use crate::error::MappingError;
use crate::values::{EffortKey, ValueAttr, ValuesDict};

/// A single mapped effort row. Transient: built by the mapper, consumed by
/// the first-pass classifier, and discarded.
#[derive(Debug, Clone, Default)]
pub(crate) struct Effort {
    pub gear_id: Option<String>,
    pub time: Option<i64>,
    pub stat_area_id: Option<i64>,
    pub a: Option<f64>,
    pub value: Option<f64>,
    pub hours_fished: Option<f64>,
    pub lat: Option<f64>,
    pub lon: Option<f64>,
}

impl Effort {
    /// The grouping key `(gear_id, time)`.
    pub(crate) fn key(&self) -> EffortKey {
        EffortKey { gear_id: self.gear_id.clone(), time: self.time }
    }

    /// The value-attr dict for this effort; missing attrs are 0.0 (spec §3
    /// edge cases).
    pub(crate) fn values(&self) -> ValuesDict {
        let mut vd = ValuesDict::default();
        vd.add(ValueAttr::A, self.a.unwrap_or(0.0));
        vd.add(ValueAttr::HoursFished, self.hours_fished.unwrap_or(0.0));
        vd.add(ValueAttr::Value, self.value.unwrap_or(0.0));
        vd
    }

    /// Both lat and lon present, per spec §4.4.1 edge case ("lat or lon
    /// present but the other nil: treat as not-both-present").
    pub(crate) fn has_position(&self) -> bool {
        self.lat.is_some() && self.lon.is_some()
    }
}

/// Empty string or `"."` map to `None`; any other non-numeric string is a
/// `MappingError` for the caller to log and skip.
fn float_w_empty_dot(field: &'static str, raw: &str) -> Result<Option<f64>, MappingError> {
    if raw.is_empty() || raw == "." {
        return Ok(None);
    }
    raw.parse::<f64>().map(Some).map_err(|_| MappingError::UnparsableFloat { field, value: raw.to_string() })
}

/// Coerces the `year` column into an integer year. A non-integer value
/// fails with `MappingError` rather than silently truncating (spec §9,
/// "Float keys in tuples").
fn coerce_year(raw: Option<f64>) -> Result<Option<i64>, MappingError> {
    match raw {
        None => Ok(None),
        Some(v) if v.fract() == 0.0 => Ok(Some(v as i64)),
        Some(v) => Err(MappingError::NonIntegerTime { value: v }),
    }
}

/// Maps one raw CSV row (field -> string, as read from the header) into an
/// `Effort`. Recognized columns: `nemarea, trip_type, A, hours_fished,
/// value, year, lat, lon` (spec §6).
pub(crate) fn map_row(gear_mappings: &GearMappings, row: &RawEffortRow) -> Result<Effort, MappingError> {
    let gear_id = row.trip_type.as_deref().and_then(|t| gear_mappings.lookup(t));
    let year = float_w_empty_dot("year", row.year.as_deref().unwrap_or(""))?;
    let time = coerce_year(year)?;
    let stat_area_id = float_w_empty_dot("nemarea", row.nemarea.as_deref().unwrap_or(""))?.map(|v| v.round() as i64);
    let a = float_w_empty_dot("A", row.a.as_deref().unwrap_or(""))?;
    let value = float_w_empty_dot("value", row.value.as_deref().unwrap_or(""))?;
    let hours_fished = float_w_empty_dot("hours_fished", row.hours_fished.as_deref().unwrap_or(""))?;
    let lat = float_w_empty_dot("lat", row.lat.as_deref().unwrap_or(""))?;
    let lon = float_w_empty_dot("lon", row.lon.as_deref().unwrap_or(""))?;

    Ok(Effort { gear_id, time, stat_area_id, a, value, hours_fished, lat, lon })
}

/// The raw string fields pulled straight off a CSV row, before any
/// processor runs.
#[derive(Debug, Clone, Default)]
pub(crate) struct RawEffortRow {
    pub nemarea: Option<String>,
    pub trip_type: Option<String>,
    pub a: Option<String>,
    pub hours_fished: Option<String>,
    pub value: Option<String>,
    pub year: Option<String>,
    pub lat: Option<String>,
    pub lon: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_and_dot_map_to_none() {
        assert_eq!(float_w_empty_dot("A", "").unwrap(), None);
        assert_eq!(float_w_empty_dot("A", ".").unwrap(), None);
    }

    #[test]
    fn garbage_is_a_mapping_error() {
        assert!(float_w_empty_dot("A", "banana").is_err());
    }

    #[test]
    fn non_integer_year_fails() {
        assert!(coerce_year(Some(2020.5)).is_err());
        assert_eq!(coerce_year(Some(2020.0)).unwrap(), Some(2020));
    }

    #[test]
    fn map_row_resolves_gear_via_trip_type() {
        let mappings = GearMappings::default_table();
        let row = RawEffortRow { trip_type: Some("otter".to_string()), a: Some("1".to_string()), ..Default::default() };
        let effort = map_row(&mappings, &row).unwrap();
        assert_eq!(effort.gear_id.as_deref(), Some("GC10"));
        assert_eq!(effort.a, Some(1.0));
    }

    #[test]
    fn unknown_trip_type_yields_no_gear() {
        let mappings = GearMappings::default_table();
        let row = RawEffortRow { trip_type: Some("mystery".to_string()), ..Default::default() };
        let effort = map_row(&mappings, &row).unwrap();
        assert_eq!(effort.gear_id, None);
    }
}
