//! The three-phase redistribution engine: first-pass classification,
//! stat-area redistribution via cracked cells, and global redistribution
//! of unassigned residuals (spec §4.4).

use std::collections::BTreeMap;

use crate::config::Phase3Denominator;
use crate::effort::Effort;
use crate::error::GriddingError;
use crate::store::{GridStore, StatAreaStore};
use crate::values::{add_value, EffortKey, KeyedValues, ValueAttr};

/// First-pass classification counters, mirroring the original's progress
/// counters (`ll`, `ll_c`, `ll_sa`, `ll_ua`, `sa`, `sa_ua`, `ua`).
#[derive(Debug, Clone, Copy, Default)]
pub(crate) struct ClassificationStats {
    pub with_position: u64,
    pub assigned_to_cell: u64,
    pub assigned_to_stat_area_via_position: u64,
    pub unassigned_via_position: u64,
    pub with_stat_area_id: u64,
    pub unassigned_unknown_stat_area: u64,
    pub unassigned_no_location: u64,
}

/// A stat area whose `sa_values[key][attr]` mass could not be redistributed
/// to any cell because no cracked cell had nonzero parent-cell activity
/// for that key/attr (spec §4.4.2 caveat, testable property #2).
#[derive(Debug, Clone)]
pub(crate) struct DroppedMass {
    pub stat_area_id: i64,
    pub key: EffortKey,
    pub attr: ValueAttr,
    pub amount: f64,
}

enum Assignment {
    Cell(i64),
    StatArea(i64),
    Unassigned,
}

pub(crate) struct GriddingEngine {
    grid: GridStore,
    stat_areas: StatAreaStore,
    c_values: BTreeMap<i64, KeyedValues>,
    sa_values: BTreeMap<i64, KeyedValues>,
    unassigned: KeyedValues,
    stats: ClassificationStats,
}

impl GriddingEngine {
    pub(crate) fn new(grid: GridStore, stat_areas: StatAreaStore) -> Self {
        Self {
            grid,
            stat_areas,
            c_values: BTreeMap::new(),
            sa_values: BTreeMap::new(),
            unassigned: KeyedValues::new(),
            stats: ClassificationStats::default(),
        }
    }

    pub(crate) fn stats(&self) -> ClassificationStats {
        self.stats
    }

    /// Phase 1. Classifies one effort and folds its values into the
    /// appropriate bucket (spec §4.4.1).
    pub(crate) fn classify(&mut self, effort: &Effort) {
        let assignment = if effort.has_position() {
            self.stats.with_position += 1;
            let lon = effort.lon.unwrap();
            let lat = effort.lat.unwrap();

            if let Some(cell_id) = self.cell_for_point(lon, lat) {
                self.stats.assigned_to_cell += 1;
                Assignment::Cell(cell_id)
            } else if let Some(sa_id) = self.stat_area_for_point(lon, lat) {
                self.stats.assigned_to_stat_area_via_position += 1;
                Assignment::StatArea(sa_id)
            } else {
                self.stats.unassigned_via_position += 1;
                Assignment::Unassigned
            }
        } else if let Some(sa_id) = effort.stat_area_id {
            self.stats.with_stat_area_id += 1;
            if self.stat_areas.get(sa_id).is_some() {
                Assignment::StatArea(sa_id)
            } else {
                self.stats.unassigned_unknown_stat_area += 1;
                Assignment::Unassigned
            }
        } else {
            self.stats.unassigned_no_location += 1;
            Assignment::Unassigned
        };

        let key = effort.key();
        let values = effort.values();
        let target = match assignment {
            Assignment::Cell(id) => self.c_values.entry(id).or_default(),
            Assignment::StatArea(id) => self.sa_values.entry(id).or_default(),
            Assignment::Unassigned => &mut self.unassigned,
        };
        for attr in ValueAttr::ALL {
            add_value(target, key.clone(), attr, values.get(attr));
        }
    }

    /// First containing cell, candidates sorted ascending by id for a
    /// deterministic tie-break (spec §4.4.1, Scenario C).
    fn cell_for_point(&self, lon: f64, lat: f64) -> Option<i64> {
        self.grid.candidates_for_point(lon, lat).into_iter().find(|&id| self.grid.get(id).unwrap().shape.contains_point(lon, lat))
    }

    fn stat_area_for_point(&self, lon: f64, lat: f64) -> Option<i64> {
        self.stat_areas
            .candidates_for_point(lon, lat)
            .into_iter()
            .find(|&id| self.stat_areas.get(id).unwrap().shape.contains_point(lon, lat))
    }

    /// Phase 2. Redistributes each stat area's accumulated values across
    /// the cells it overlaps, in proportion to those cells' current clean
    /// totals clipped to the stat area (spec §4.4.2).
    pub(crate) fn redistribute_stat_areas(&mut self) -> Result<Vec<DroppedMass>, GriddingError> {
        let mut dropped = Vec::new();

        let stat_area_ids: Vec<i64> = self.stat_areas.iter().map(|sa| sa.id).collect();
        for sa_id in stat_area_ids {
            let Some(sa_kv) = self.sa_values.get(&sa_id).cloned() else { continue };
            if sa_kv.is_empty() {
                continue;
            }
            let sa = self.stat_areas.get(sa_id).expect("stat area id came from iter()");
            let sa_mbr = sa.shape.mbr().ok_or(GriddingError::Area { id: sa_id })?;

            let mut cracked: Vec<(i64, KeyedValues)> = Vec::new();
            for cell_id in self.grid.candidates_for_mbr(&sa_mbr) {
                let cell = self.grid.get(cell_id).expect("candidate id came from hash over cells");
                if !sa.shape.intersects(&cell.shape) {
                    continue;
                }
                let Some(inter) = sa.shape.intersection(&cell.shape) else { continue };
                let pct_area = inter.area() / cell.area;
                let scaled = self
                    .c_values
                    .get(&cell_id)
                    .map(|kv| kv.iter().map(|(k, v)| (k.clone(), v.scaled(pct_area))).collect())
                    .unwrap_or_default();
                cracked.push((cell_id, scaled));
            }

            let mut ccell_totals: KeyedValues = KeyedValues::new();
            for (_, kv) in &cracked {
                for (key, values) in kv {
                    let totals = ccell_totals.entry(key.clone()).or_default();
                    for attr in ValueAttr::ALL {
                        totals.add(attr, values.get(attr));
                    }
                }
            }

            for (key, sa_values) in &sa_kv {
                let any_total = ccell_totals.get(key).map(|t| ValueAttr::ALL.iter().any(|&a| t.get(a) != 0.0)).unwrap_or(false);
                if !any_total {
                    for attr in ValueAttr::ALL {
                        let amount = sa_values.get(attr);
                        if amount != 0.0 {
                            dropped.push(DroppedMass { stat_area_id: sa_id, key: key.clone(), attr, amount });
                        }
                    }
                }
            }

            for (cell_id, cc_values) in &cracked {
                for (key, sa_values) in &sa_kv {
                    let Some(cc_values) = cc_values.get(key) else { continue };
                    let Some(totals) = ccell_totals.get(key) else { continue };
                    let pcell_kv = self.c_values.entry(*cell_id).or_default();
                    for attr in ValueAttr::ALL {
                        let sa_value = sa_values.get(attr);
                        if sa_value == 0.0 {
                            continue;
                        }
                        let cc_value = cc_values.get(attr);
                        let total_value = totals.get(attr);
                        if cc_value == 0.0 || total_value == 0.0 {
                            continue;
                        }
                        let pct = cc_value / total_value;
                        add_value(pcell_kv, key.clone(), attr, sa_value * pct);
                    }
                }
            }
        }

        Ok(dropped)
    }

    /// Phase 3. Redistributes the global `unassigned` pool across every
    /// cell. `mode` selects the literal-source denominator ("as-written",
    /// the unassigned value itself) or the narrative-documented one (the
    /// global per-key total) — see spec §4.4.3.
    pub(crate) fn redistribute_unassigned(&mut self, mode: Phase3Denominator) {
        if self.unassigned.is_empty() {
            return;
        }

        let mut totals: KeyedValues = KeyedValues::new();
        for kv in self.c_values.values() {
            for (key, values) in kv {
                let t = totals.entry(key.clone()).or_default();
                for attr in ValueAttr::ALL {
                    t.add(attr, values.get(attr));
                }
            }
        }

        let cell_ids: Vec<i64> = self.grid.iter().map(|c| c.id).collect();
        for cell_id in cell_ids {
            let mut additions: Vec<(EffortKey, ValueAttr, f64)> = Vec::new();
            {
                let cell_kv = self.c_values.entry(cell_id).or_default();
                for (key, unassigned_values) in &self.unassigned {
                    let Some(cell_values) = cell_kv.get(key) else { continue };
                    for attr in ValueAttr::ALL {
                        let unassigned_value = unassigned_values.get(attr);
                        if unassigned_value == 0.0 {
                            continue;
                        }
                        let cell_value = cell_values.get(attr);
                        if cell_value == 0.0 {
                            continue;
                        }
                        let denom = match mode {
                            Phase3Denominator::AsWritten => unassigned_value,
                            Phase3Denominator::AsDocumented => totals.get(key).map(|t| t.get(attr)).unwrap_or(0.0),
                        };
                        if denom == 0.0 {
                            continue;
                        }
                        let pct = cell_value / denom;
                        additions.push((key.clone(), attr, unassigned_value * pct));
                    }
                }
            }
            let cell_kv = self.c_values.entry(cell_id).or_default();
            for (key, attr, amount) in additions {
                add_value(cell_kv, key, attr, amount);
            }
        }
    }

    /// Cell aggregates in ascending cell-id order, for the writer.
    pub(crate) fn into_cell_values(self) -> BTreeMap<i64, KeyedValues> {
        self.c_values
    }

    pub(crate) fn grid(&self) -> &GridStore {
        &self.grid
    }
}
