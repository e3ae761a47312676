use thiserror::Error;

/// CLI argument problems, surfaced before any gridding work starts.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("output path must be a file, not stdin/stdout ('-')")]
    StdoutNotSupported,

    #[error("invalid value '{value}' for --phase3-denominator (expected 'as-written' or 'as-documented')")]
    InvalidPhase3Denominator { value: String },

    #[error("unable to create a default output path")]
    DefaultOutputPath { source: std::io::Error },
}

/// Failures loading the grid or stat-area shapefiles.
#[derive(Error, Debug)]
pub enum IngestError {
    #[error("unable to open shapefile {path}")]
    Open { path: String, source: shapefile::Error },

    #[error("shapefile {path} is missing required integer field '{field}'")]
    MissingField { path: String, field: &'static str },

    #[error("duplicate id {id} encountered while ingesting {path}")]
    DuplicateId { path: String, id: i64 },

    #[error("degenerate (zero-area) geometry for id {id} in {path}")]
    DegenerateGeometry { path: String, id: i64 },
}

/// A single effort row could not be coerced. Non-fatal: logged at WARN and
/// the row is skipped.
#[derive(Error, Debug)]
pub enum MappingError {
    #[error("field '{field}' has non-numeric value '{value}'")]
    UnparsableFloat { field: &'static str, value: String },

    #[error("'time' value {value} is not an integer year")]
    NonIntegerTime { value: f64 },
}

/// Fatal geometry-library failures during redistribution, tagged with the
/// offending stat-area id.
#[derive(Error, Debug)]
pub enum GriddingError {
    #[error("geometry failure computing area for id {id}")]
    Area { id: i64 },
}

/// Output CSV could not be opened or written.
#[derive(Error, Debug)]
pub enum OutputError {
    #[error("unable to create output file {path}")]
    Create { path: String, source: csv::Error },

    #[error("unable to write output row")]
    Write { source: csv::Error },

    #[error("unable to flush output file {path}")]
    Flush { path: String, source: std::io::Error },
}

/// Top-level fatal error, composed of the other kinds via `#[from]`.
/// `MappingError` is intentionally absent: it never escapes the ingestion
/// stream, per spec.
#[derive(Error, Debug)]
pub enum GridderError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Ingest(#[from] IngestError),

    #[error(transparent)]
    Gridding(#[from] GriddingError),

    #[error(transparent)]
    Output(#[from] OutputError),
}
