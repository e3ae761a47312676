use std::path::Path;
use std::str::FromStr;

use log::{info, warn};

use crate::cli::Cli;
use crate::config::{GearMappings, GridderConfig, Phase3Denominator};
use crate::engine::GriddingEngine;
use crate::error::{ConfigError, GridderError};
use crate::ingest::{ingest_grid, ingest_stat_areas};
use crate::reader::EffortRowReader;
use crate::writer::write_csv;

/// Builds a `GridderConfig` from parsed arguments, applying `--mappings-file`
/// and validating `--phase3-denominator`.
fn build_config(cli: &Cli) -> Result<GridderConfig, GridderError> {
    if cli.output_path.as_os_str() == "-" {
        return Err(GridderError::Config(ConfigError::StdoutNotSupported));
    }

    let phase3_denominator = Phase3Denominator::from_str(&cli.phase3_denominator)
        .map_err(|_| ConfigError::InvalidPhase3Denominator { value: cli.phase3_denominator.clone() })?;

    let gear_mappings = match &cli.mappings_file {
        Some(path) => GearMappings::from_csv(path)?,
        None => GearMappings::default_table(),
    };

    Ok(GridderConfig { gear_mappings, phase3_denominator, effort_limit: cli.effort_limit, ..GridderConfig::default() })
}

/// Runs the full pipeline: ingest, classify, redistribute, write.
pub fn run(cli: &Cli) -> Result<(), GridderError> {
    let config = build_config(cli)?;

    info!("ingesting grid from {}", cli.grid.display());
    let grid = ingest_grid(&cli.grid, config.cell_size)?;
    info!("ingested {} grid cells", grid.len());

    info!("ingesting stat areas from {}", cli.stat_areas.display());
    let stat_areas = ingest_stat_areas(&cli.stat_areas, config.cell_size)?;

    let mut engine = GriddingEngine::new(grid, stat_areas);

    classify_efforts(&mut engine, &cli.raw_efforts, &config)?;
    let stats = engine.stats();
    info!(
        "classified: with_position={} assigned_to_cell={} assigned_to_stat_area_via_position={} unassigned_via_position={} with_stat_area_id={} unassigned_unknown_stat_area={} unassigned_no_location={}",
        stats.with_position,
        stats.assigned_to_cell,
        stats.assigned_to_stat_area_via_position,
        stats.unassigned_via_position,
        stats.with_stat_area_id,
        stats.unassigned_unknown_stat_area,
        stats.unassigned_no_location,
    );

    let dropped = engine.redistribute_stat_areas()?;
    for d in &dropped {
        warn!(
            "stat area {} key {:?} attr {:?}: {} dropped, no cracked cell had clean activity for that key",
            d.stat_area_id, d.key, d.attr, d.amount
        );
    }

    engine.redistribute_unassigned(config.phase3_denominator);

    info!("writing output to {}", cli.output_path.display());
    let c_values = engine.into_cell_values();
    write_csv(&cli.output_path, &c_values)?;

    Ok(())
}

fn classify_efforts(engine: &mut GriddingEngine, raw_efforts: &Path, config: &GridderConfig) -> Result<(), GridderError> {
    let mut reader = EffortRowReader::open(raw_efforts)?;
    let mut count: u64 = 0;

    while let Some(row) = reader.next_row()? {
        if let Some(limit) = config.effort_limit {
            if count >= limit {
                break;
            }
        }
        count += 1;

        match crate::effort::map_row(&config.gear_mappings, &row) {
            Ok(effort) => engine.classify(&effort),
            Err(err) => warn!("skipping effort row {count}: {err}"),
        }
    }

    info!("read {count} effort rows");
    Ok(())
}
