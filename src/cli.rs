use std::path::PathBuf;

use clap::Parser;
use clap::ValueHint;

/// Grids fishing-effort records into a spatial grid with stat-area and
/// residual redistribution.
#[derive(Parser, Debug)]
#[command(name = "sasi-gridder", version, about, propagate_version = true)]
pub struct Cli {
    /// Increase output verbosity (-v, -vv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Grid cell shapefile (.shp), with an integer `ID` property
    #[arg(long, value_hint = ValueHint::FilePath)]
    pub grid: PathBuf,

    /// Stat-area shapefile (.shp), with an integer `SAREA` property
    #[arg(long, value_hint = ValueHint::FilePath)]
    pub stat_areas: PathBuf,

    /// Raw effort records (CSV)
    #[arg(long, value_hint = ValueHint::FilePath)]
    pub raw_efforts: PathBuf,

    /// Output CSV path (must be a file; "-" is rejected)
    #[arg(long, value_hint = ValueHint::FilePath)]
    pub output_path: PathBuf,

    /// Stop after reading this many effort rows (for smoke-testing large inputs)
    #[arg(long)]
    pub effort_limit: Option<u64>,

    /// Two-column `trip_type,gear_code` CSV overriding the built-in gear mapping table
    #[arg(long, value_hint = ValueHint::FilePath)]
    pub mappings_file: Option<PathBuf>,

    /// Which quantity phase 3 divides by when spreading unassigned effort
    /// across cells: the source's literal (and surprising) behavior
    /// ("as-written"), or the one matching its narrative documentation
    /// ("as-documented")
    #[arg(long, default_value = "as-written")]
    pub phase3_denominator: String,
}
