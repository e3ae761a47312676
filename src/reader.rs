//! Raw-efforts CSV reader: a pull-based stream over `csv::StringRecord`
//! rows, bounded to O(1) memory per row (spec §1, §5).

use std::path::Path;

use crate::effort::RawEffortRow;
use crate::error::IngestError;

pub(crate) struct EffortRowReader {
    reader: csv::Reader<std::fs::File>,
    headers: Vec<String>,
    path: String,
}

impl EffortRowReader {
    pub(crate) fn open(path: &Path) -> Result<Self, IngestError> {
        let path_str = path.display().to_string();
        let reader = csv::Reader::from_path(path).map_err(|_| IngestError::MissingField { path: path_str.clone(), field: "header" })?;
        let headers = reader.headers().map_err(|_| IngestError::MissingField { path: path_str.clone(), field: "header" })?.iter().map(str::to_string).collect();
        Ok(Self { reader, headers, path: path_str })
    }

    fn field<'a>(&self, record: &'a csv::StringRecord, name: &str) -> Option<&'a str> {
        self.headers.iter().position(|h| h == name).and_then(|i| record.get(i)).filter(|v| !v.is_empty())
    }

    /// Pulls the next row, or `None` at end of file. A malformed CSV row
    /// (wrong column count, bad UTF-8) is an `IngestError`: such a failure
    /// indicates the file itself is broken, not a single bad value, so it
    /// is fatal rather than logged-and-skipped.
    pub(crate) fn next_row(&mut self) -> Result<Option<RawEffortRow>, IngestError> {
        let mut record = csv::StringRecord::new();
        let more = self.reader.read_record(&mut record).map_err(|_| IngestError::MissingField { path: self.path.clone(), field: "row" })?;
        if !more {
            return Ok(None);
        }
        Ok(Some(RawEffortRow {
            nemarea: self.field(&record, "nemarea").map(str::to_string),
            trip_type: self.field(&record, "trip_type").map(str::to_string),
            a: self.field(&record, "A").map(str::to_string),
            hours_fished: self.field(&record, "hours_fished").map(str::to_string),
            value: self.field(&record, "value").map(str::to_string),
            year: self.field(&record, "year").map(str::to_string),
            lat: self.field(&record, "lat").map(str::to_string),
            lon: self.field(&record, "lon").map(str::to_string),
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn write_csv(contents: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "{contents}").unwrap();
        file
    }

    #[test]
    fn reads_recognized_columns_and_skips_unknown() {
        let file = write_csv("nemarea,trip_type,A,hours_fished,value,year,lat,lon,extra\n1,otter,3,,,1,0.5,0.5,junk\n");
        let mut reader = EffortRowReader::open(file.path()).unwrap();
        let row = reader.next_row().unwrap().unwrap();
        assert_eq!(row.trip_type.as_deref(), Some("otter"));
        assert_eq!(row.a.as_deref(), Some("3"));
        assert_eq!(row.hours_fished, None);
        assert!(reader.next_row().unwrap().is_none());
    }
}
