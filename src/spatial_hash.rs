//! Uniform-cell bucketed spatial index. Maps integer bucket coordinates to
//! the set of inserted ids. A candidate set returned by a query is a
//! superset of true hits: callers must verify with exact geometry
//! predicates (see `geom::Shape`).

use std::collections::{HashMap, HashSet};

use crate::geom::Mbr;

/// Side length of a bucket, in the input coordinate system's units.
pub(crate) const DEFAULT_CELL_SIZE: f64 = 0.1;

type BucketCoord = (i64, i64);

#[derive(Debug, Clone)]
pub(crate) struct SpatialHash {
    cell_size: f64,
    buckets: HashMap<BucketCoord, HashSet<i64>>,
}

impl SpatialHash {
    pub(crate) fn new(cell_size: f64) -> Self {
        Self { cell_size, buckets: HashMap::new() }
    }

    fn bucket_of_point(&self, x: f64, y: f64) -> BucketCoord {
        ((x / self.cell_size).floor() as i64, (y / self.cell_size).floor() as i64)
    }

    /// Buckets touched by a rectangle, inclusive on both the low and high
    /// edge. The inclusive upper bound (`<=`, not `<`) is load-bearing: a
    /// zero-width rect must still land in exactly one bucket.
    fn buckets_of_rect(&self, mbr: &Mbr) -> Vec<BucketCoord> {
        let mut out = Vec::new();
        let mut cy = (mbr.y0 / self.cell_size).floor() as i64;
        while (cy as f64) * self.cell_size <= mbr.y1 {
            let mut cx = (mbr.x0 / self.cell_size).floor() as i64;
            while (cx as f64) * self.cell_size <= mbr.x1 {
                out.push((cx, cy));
                cx += 1;
            }
            cy += 1;
        }
        out
    }

    pub(crate) fn add_rect(&mut self, mbr: &Mbr, id: i64) {
        for bucket in self.buckets_of_rect(mbr) {
            self.buckets.entry(bucket).or_default().insert(id);
        }
    }

    /// Ids in the single bucket containing `(x, y)`, sorted ascending for a
    /// deterministic tie-break (spec §4.4.1).
    pub(crate) fn items_for_point(&self, x: f64, y: f64) -> Vec<i64> {
        let bucket = self.bucket_of_point(x, y);
        let mut ids: Vec<i64> = self.buckets.get(&bucket).map(|s| s.iter().copied().collect()).unwrap_or_default();
        ids.sort_unstable();
        ids
    }

    /// Union of ids across every bucket the rect touches, sorted ascending.
    pub(crate) fn items_for_rect(&self, mbr: &Mbr) -> Vec<i64> {
        let mut ids: HashSet<i64> = HashSet::new();
        for bucket in self.buckets_of_rect(mbr) {
            if let Some(set) = self.buckets.get(&bucket) {
                ids.extend(set.iter().copied());
            }
        }
        let mut ids: Vec<i64> = ids.into_iter().collect();
        ids.sort_unstable();
        ids
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rect(x0: f64, y0: f64, x1: f64, y1: f64) -> Mbr {
        Mbr { x0, y0, x1, y1 }
    }

    #[test]
    fn point_lands_in_floor_bucket() {
        let mut hash = SpatialHash::new(1.0);
        hash.add_rect(&rect(0.0, 0.0, 0.5, 0.5), 1);
        assert_eq!(hash.items_for_point(0.2, 0.2), vec![1]);
        assert!(hash.items_for_point(1.5, 1.5).is_empty());
    }

    #[test]
    fn zero_width_rect_hits_one_bucket() {
        let mut hash = SpatialHash::new(1.0);
        hash.add_rect(&rect(2.0, 2.0, 2.0, 2.0), 7);
        assert_eq!(hash.items_for_point(2.0, 2.0), vec![7]);
    }

    #[test]
    fn rect_spanning_multiple_buckets_is_found_by_all_overlapping_queries() {
        let mut hash = SpatialHash::new(1.0);
        hash.add_rect(&rect(0.0, 0.0, 2.5, 0.5), 3);
        assert_eq!(hash.items_for_point(0.1, 0.1), vec![3]);
        assert_eq!(hash.items_for_point(2.4, 0.1), vec![3]);
        assert!(hash.items_for_point(3.1, 0.1).is_empty());
    }

    #[test]
    fn items_for_rect_is_superset_and_sorted() {
        let mut hash = SpatialHash::new(1.0);
        hash.add_rect(&rect(0.0, 0.0, 0.5, 0.5), 5);
        hash.add_rect(&rect(0.0, 0.0, 0.5, 0.5), 2);
        let ids = hash.items_for_rect(&rect(0.0, 0.0, 1.5, 1.5));
        assert_eq!(ids, vec![2, 5]);
    }

    #[test]
    fn negative_coordinates_floor_correctly() {
        let mut hash = SpatialHash::new(1.0);
        hash.add_rect(&rect(-0.5, -0.5, -0.1, -0.1), 9);
        assert_eq!(hash.items_for_point(-0.3, -0.3), vec![9]);
    }
}
