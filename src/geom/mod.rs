//! Geometry primitives: opaque shape values and the five operations the
//! gridding engine needs (`area`, `mbr`, `intersects`, `intersection`,
//! `contains_point`). Backed by `geo`; callers never reach into the
//! underlying `MultiPolygon` directly.

mod shape;

pub(crate) use shape::{Mbr, Shape};
