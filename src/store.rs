//! In-memory collections of `Cell` and `StatArea`, each keyed by id and
//! backed by a `SpatialHash` over their MBRs. Loaded once at ingest, kept
//! for the run, then discarded.

use std::collections::BTreeMap;

use crate::error::IngestError;
use crate::geom::Shape;
use crate::spatial_hash::SpatialHash;

pub(crate) struct Cell {
    pub id: i64,
    pub shape: Shape,
    pub area: f64,
}

pub(crate) struct StatArea {
    pub id: i64,
    pub shape: Shape,
}

/// Cells keyed by id, immutable after ingest, plus the spatial hash over
/// their MBRs used for both point-containment and cracked-cell rect
/// queries.
pub(crate) struct GridStore {
    cells: BTreeMap<i64, Cell>,
    hash: SpatialHash,
}

impl GridStore {
    pub(crate) fn new(cell_size: f64) -> Self {
        Self { cells: BTreeMap::new(), hash: SpatialHash::new(cell_size) }
    }

    /// Insert a cell. Fails on duplicate id or zero/degenerate area.
    pub(crate) fn insert(&mut self, path: &str, id: i64, shape: Shape) -> Result<(), IngestError> {
        if self.cells.contains_key(&id) {
            return Err(IngestError::DuplicateId { path: path.to_string(), id });
        }
        let area = shape.area();
        let mbr = shape.mbr().ok_or_else(|| IngestError::DegenerateGeometry { path: path.to_string(), id })?;
        if area <= 0.0 {
            return Err(IngestError::DegenerateGeometry { path: path.to_string(), id });
        }
        self.hash.add_rect(&mbr, id);
        self.cells.insert(id, Cell { id, shape, area });
        Ok(())
    }

    pub(crate) fn get(&self, id: i64) -> Option<&Cell> {
        self.cells.get(&id)
    }

    /// Cells in ascending id order, the iteration order phase 2/3 require
    /// for deterministic output (spec §5).
    pub(crate) fn iter(&self) -> impl Iterator<Item = &Cell> {
        self.cells.values()
    }

    pub(crate) fn len(&self) -> usize {
        self.cells.len()
    }

    /// Candidate ids for a point query, sorted for the deterministic
    /// first-hit tie-break.
    pub(crate) fn candidates_for_point(&self, x: f64, y: f64) -> Vec<i64> {
        self.hash.items_for_point(x, y)
    }

    pub(crate) fn candidates_for_mbr(&self, mbr: &crate::geom::Mbr) -> Vec<i64> {
        self.hash.items_for_rect(mbr)
    }
}

/// Stat areas keyed by id, with the same spatial-hash treatment as
/// `GridStore`.
pub(crate) struct StatAreaStore {
    areas: BTreeMap<i64, StatArea>,
    hash: SpatialHash,
}

impl StatAreaStore {
    pub(crate) fn new(cell_size: f64) -> Self {
        Self { areas: BTreeMap::new(), hash: SpatialHash::new(cell_size) }
    }

    pub(crate) fn insert(&mut self, path: &str, id: i64, shape: Shape) -> Result<(), IngestError> {
        if self.areas.contains_key(&id) {
            return Err(IngestError::DuplicateId { path: path.to_string(), id });
        }
        let area = shape.area();
        let mbr = shape.mbr().ok_or_else(|| IngestError::DegenerateGeometry { path: path.to_string(), id })?;
        if area <= 0.0 {
            return Err(IngestError::DegenerateGeometry { path: path.to_string(), id });
        }
        self.hash.add_rect(&mbr, id);
        self.areas.insert(id, StatArea { id, shape });
        Ok(())
    }

    pub(crate) fn get(&self, id: i64) -> Option<&StatArea> {
        self.areas.get(&id)
    }

    pub(crate) fn iter(&self) -> impl Iterator<Item = &StatArea> {
        self.areas.values()
    }

    pub(crate) fn candidates_for_point(&self, x: f64, y: f64) -> Vec<i64> {
        self.hash.items_for_point(x, y)
    }

    pub(crate) fn candidates_for_mbr(&self, mbr: &crate::geom::Mbr) -> Vec<i64> {
        self.hash.items_for_rect(mbr)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use geo::{Coord, LineString, MultiPolygon, Polygon};

    fn square(x0: f64, y0: f64, x1: f64, y1: f64) -> Shape {
        let ring = LineString(vec![
            Coord { x: x0, y: y0 },
            Coord { x: x1, y: y0 },
            Coord { x: x1, y: y1 },
            Coord { x: x0, y: y1 },
            Coord { x: x0, y: y0 },
        ]);
        Shape::new(MultiPolygon(vec![Polygon::new(ring, vec![])]))
    }

    #[test]
    fn duplicate_id_is_rejected() {
        let mut store = GridStore::new(0.1);
        store.insert("grid.shp", 1, square(0.0, 0.0, 1.0, 1.0)).unwrap();
        let err = store.insert("grid.shp", 1, square(1.0, 1.0, 2.0, 2.0)).unwrap_err();
        assert!(matches!(err, IngestError::DuplicateId { id: 1, .. }));
    }

    #[test]
    fn zero_area_is_rejected() {
        let mut store = StatAreaStore::new(0.1);
        let degenerate = square(0.0, 0.0, 0.0, 1.0);
        let err = store.insert("sa.shp", 1, degenerate).unwrap_err();
        assert!(matches!(err, IngestError::DegenerateGeometry { id: 1, .. }));
    }
}
