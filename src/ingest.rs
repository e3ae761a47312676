//! Grid and stat-area ingestion from shapefiles. Reads `(id, shape)`
//! records already reprojected to EPSG:4326, computes each shape's MBR and
//! area, and inserts into the corresponding store + spatial hash.

use std::path::Path;

use geo::{Coord, LineString, MultiPolygon, Polygon};
use shapefile::dbase::{FieldValue, Record};
use shapefile::{Reader, Shape as ShpShape};

use crate::error::IngestError;
use crate::geom::Shape;
use crate::store::{GridStore, StatAreaStore};

/// Ingest the grid shapefile. Property `ID` (integer) is the cell id.
pub(crate) fn ingest_grid(path: &Path, cell_size: f64) -> Result<GridStore, IngestError> {
    let mut store = GridStore::new(cell_size);
    let path_str = path.display().to_string();
    let mut reader = open_reader(&path_str, path)?;

    for result in reader.iter_shapes_and_records() {
        let (shape, record) = result.map_err(|source| IngestError::Open { path: path_str.clone(), source })?;
        let id = integer_field(&path_str, &record, "ID")?;
        let geo_shape = Shape::new(shp_polygon_to_multipolygon(&path_str, &shape)?);
        store.insert(&path_str, id, geo_shape)?;
    }
    Ok(store)
}

/// Ingest the stat-areas shapefile. Property `SAREA` (integer) is the id.
pub(crate) fn ingest_stat_areas(path: &Path, cell_size: f64) -> Result<StatAreaStore, IngestError> {
    let mut store = StatAreaStore::new(cell_size);
    let path_str = path.display().to_string();
    let mut reader = open_reader(&path_str, path)?;

    for result in reader.iter_shapes_and_records() {
        let (shape, record) = result.map_err(|source| IngestError::Open { path: path_str.clone(), source })?;
        let id = integer_field(&path_str, &record, "SAREA")?;
        let geo_shape = Shape::new(shp_polygon_to_multipolygon(&path_str, &shape)?);
        store.insert(&path_str, id, geo_shape)?;
    }
    Ok(store)
}

fn open_reader(path_str: &str, path: &Path) -> Result<Reader<std::io::BufReader<std::fs::File>, std::io::BufReader<std::fs::File>>, IngestError> {
    Reader::from_path(path).map_err(|source| IngestError::Open { path: path_str.to_string(), source })
}

fn integer_field(path_str: &str, record: &Record, field: &'static str) -> Result<i64, IngestError> {
    match record.get(field) {
        Some(FieldValue::Numeric(Some(n))) => Ok(*n as i64),
        Some(FieldValue::Integer(n)) => Ok(*n as i64),
        _ => Err(IngestError::MissingField { path: path_str.to_string(), field }),
    }
}

/// Converts a `shapefile::Shape::Polygon` (MultiPolygon geometry, per the
/// shapefile spec's ring-grouping convention: a clockwise exterior ring is
/// followed by its counter-clockwise holes) into `geo::MultiPolygon<f64>`.
fn shp_polygon_to_multipolygon(path_str: &str, shape: &ShpShape) -> Result<MultiPolygon<f64>, IngestError> {
    let polygon = match shape {
        ShpShape::Polygon(p) => p,
        _ => return Err(IngestError::DegenerateGeometry { path: path_str.to_string(), id: -1 }),
    };

    fn ensure_closed(coords: &mut Vec<Coord<f64>>) {
        if !coords.is_empty() && coords[0] != coords[coords.len() - 1] {
            coords.push(coords[0]);
        }
    }

    fn signed_area(pts: &[Coord<f64>]) -> f64 {
        let mut a = 0.0;
        for w in pts.windows(2) {
            a += w[0].x * w[1].y - w[1].x * w[0].y;
        }
        a / 2.0
    }

    let mut polys: Vec<Polygon<f64>> = Vec::with_capacity(polygon.rings().len());
    let mut current_exterior: Option<LineString<f64>> = None;
    let mut current_holes: Vec<LineString<f64>> = Vec::new();

    for ring in polygon.rings().iter() {
        let mut coords: Vec<Coord<f64>> = ring.points().iter().map(|pt| Coord { x: pt.x, y: pt.y }).collect();
        ensure_closed(&mut coords);
        let is_exterior = signed_area(&coords) < 0.0;
        let ls = LineString(coords);

        if is_exterior {
            if let Some(ext) = current_exterior.take() {
                polys.push(Polygon::new(ext, std::mem::take(&mut current_holes)));
            }
            current_exterior = Some(ls);
        } else {
            current_holes.push(ls);
        }
    }
    if let Some(ext) = current_exterior {
        polys.push(Polygon::new(ext, current_holes));
    }

    Ok(MultiPolygon(polys))
}
