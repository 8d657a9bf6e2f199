//! Opponent clustering by BFS flood fill over the grid index.
//!
//! Two occupied cells in the same 3×3 neighborhood are joined only if some
//! pair of their units is strictly closer than the cell size. The adjacency
//! test prunes the search to neighboring cells; the distance test keeps
//! units that straddle a cell border together without merging merely
//! adjacent groups.
//!
//! Any two opponent units closer than the cell size sit in cells at most
//! one step apart on each axis, so they always end up in the same cluster.

use std::collections::{BTreeSet, VecDeque};

use crate::grid::{CellKey, NEIGHBORHOOD};
use crate::math::Vec2;
use crate::tracker::UnitTracker;
use crate::unit::{UnitId, UnitKind};

/// One opponent unit as seen by a cluster.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ClusterMember {
    /// Unit identifier.
    pub id: UnitId,
    /// Unit kind.
    pub kind: UnitKind,
    /// Position when the cluster was built.
    pub position: Vec2,
}

/// A maximal group of opponent units chained by sub-threshold distances.
///
/// Clusters are immutable snapshots; they are rebuilt wholesale, never
/// patched.
#[derive(Debug, Clone, PartialEq)]
pub struct Cluster {
    members: Vec<ClusterMember>,
    centroid: Vec2,
}

impl Cluster {
    fn from_members(members: Vec<ClusterMember>) -> Option<Self> {
        let centroid = Vec2::mean(members.iter().map(|m| m.position)).ok()?;
        Some(Self { members, centroid })
    }

    /// Members in discovery order.
    #[must_use]
    pub fn members(&self) -> &[ClusterMember] {
        &self.members
    }

    /// Member count.
    #[must_use]
    pub fn len(&self) -> usize {
        self.members.len()
    }

    /// Always false for clusters produced by [`compute_clusters`].
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }

    /// Mean member position.
    #[must_use]
    pub const fn centroid(&self) -> Vec2 {
        self.centroid
    }

    /// Largest distance between two members. Quadratic, so computed on demand.
    #[must_use]
    pub fn extent(&self) -> f64 {
        let mut max_sq = 0.0_f64;
        for (i, a) in self.members.iter().enumerate() {
            for b in &self.members[i + 1..] {
                max_sq = max_sq.max(a.position.distance_squared(b.position));
            }
        }
        max_sq.sqrt()
    }

    /// Member closest to `point`; earliest member wins ties.
    #[must_use]
    pub fn nearest_member(&self, point: Vec2) -> Option<&ClusterMember> {
        let mut best: Option<(&ClusterMember, f64)> = None;
        for member in &self.members {
            let d = member.position.distance_squared(point);
            if best.map_or(true, |(_, best_d)| d < best_d) {
                best = Some((member, d));
            }
        }
        best.map(|(member, _)| member)
    }

    /// Check if a unit belongs to this cluster.
    #[must_use]
    pub fn contains(&self, id: UnitId) -> bool {
        self.members.iter().any(|m| m.id == id)
    }
}

/// Partition all tracked opponent units into clusters.
///
/// Returned most-populous first. Seeds are taken in ascending cell order and
/// the sort is stable, so equal-sized clusters keep discovery order and the
/// result is fully determined by the grid contents.
#[must_use]
pub fn compute_clusters(tracker: &UnitTracker) -> Vec<Cluster> {
    let grid = tracker.grid();
    let threshold_sq = grid.cell_size() * grid.cell_size();
    let mut seeds: BTreeSet<CellKey> = grid.occupied_cells().collect();
    let mut clusters = Vec::new();

    while let Some(seed) = seeds.pop_first() {
        let members = flood_fill(tracker, &mut seeds, seed, threshold_sq);
        if let Some(cluster) = Cluster::from_members(members) {
            clusters.push(cluster);
        }
    }

    clusters.sort_by(|a, b| b.len().cmp(&a.len()));
    clusters
}

/// Collect every unit reachable from `start`, consuming visited seeds.
fn flood_fill(
    tracker: &UnitTracker,
    seeds: &mut BTreeSet<CellKey>,
    start: CellKey,
    threshold_sq: f64,
) -> Vec<ClusterMember> {
    let mut members = Vec::new();
    let mut queue = VecDeque::from([start]);

    while let Some(cell) = queue.pop_front() {
        members.extend(cell_members(tracker, cell));

        for (di, dj) in NEIGHBORHOOD {
            let next = (cell.0 + di, cell.1 + dj);
            if next == cell || !seeds.contains(&next) {
                continue;
            }
            if min_distance_squared(tracker, cell, next) < threshold_sq {
                seeds.remove(&next);
                queue.push_back(next);
            }
        }
    }

    members
}

fn cell_members(tracker: &UnitTracker, cell: CellKey) -> impl Iterator<Item = ClusterMember> + '_ {
    tracker
        .grid()
        .units_in(cell)
        .filter_map(move |id| tracker.get(id))
        .map(|unit| ClusterMember {
            id: unit.id,
            kind: unit.kind,
            position: unit.position,
        })
}

/// Smallest squared unit-to-unit distance between two cells.
fn min_distance_squared(tracker: &UnitTracker, a: CellKey, b: CellKey) -> f64 {
    let mut best = f64::INFINITY;
    for left in cell_members(tracker, a) {
        for right in cell_members(tracker, b) {
            best = best.min(left.position.distance_squared(right.position));
        }
    }
    best
}

/// Clusters cached against the tracker generation they were built from.
///
/// Nothing invalidates the cache behind the caller's back: [`Self::get`]
/// compares generations and rebuilds when they differ.
#[derive(Debug, Clone, Default)]
pub struct ClusterCache {
    generation: Option<u64>,
    clusters: Vec<Cluster>,
}

impl ClusterCache {
    /// Create an empty, stale cache.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether the cached clusters match the tracker's current grid.
    #[must_use]
    pub fn is_fresh(&self, tracker: &UnitTracker) -> bool {
        self.generation == Some(tracker.generation())
    }

    /// Clusters for the tracker's current grid, rebuilding if stale.
    pub fn get(&mut self, tracker: &UnitTracker) -> &[Cluster] {
        if !self.is_fresh(tracker) {
            self.clusters = compute_clusters(tracker);
            self.generation = Some(tracker.generation());
            tracing::debug!(
                generation = tracker.generation(),
                clusters = self.clusters.len(),
                largest = self.clusters.first().map_or(0, Cluster::len),
                "Recomputed opponent clusters"
            );
        }
        &self.clusters
    }

    /// Force a rebuild on the next [`Self::get`].
    pub fn invalidate(&mut self) {
        self.generation = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::unit::{PlayerState, Unit, WorldSnapshot};

    fn tracker_with(cell_size: f64, enemies: &[(i64, f64, f64)]) -> UnitTracker {
        let mut tracker = UnitTracker::new(cell_size);
        let snapshot = WorldSnapshot {
            me: PlayerState {
                id: 1,
                ..PlayerState::default()
            },
            opponent: PlayerState {
                id: 2,
                ..PlayerState::default()
            },
            new_units: enemies
                .iter()
                .map(|&(id, x, y)| Unit {
                    id,
                    player_id: 2,
                    position: Vec2::new(x, y),
                    kind: UnitKind::Ifv,
                    durability: 100,
                    groups: Vec::new(),
                    selected: false,
                    remaining_attack_cooldown_ticks: 0,
                })
                .collect(),
            ..WorldSnapshot::default()
        };
        tracker.apply_deltas(&snapshot).unwrap();
        tracker
    }

    fn ids(cluster: &Cluster) -> Vec<UnitId> {
        let mut ids: Vec<_> = cluster.members().iter().map(|m| m.id).collect();
        ids.sort_unstable();
        ids
    }

    #[test]
    fn test_close_pair_forms_one_cluster() {
        let tracker = tracker_with(16.0, &[(1, 100.0, 100.0), (2, 100.0, 100.5)]);
        let clusters = compute_clusters(&tracker);
        assert_eq!(clusters.len(), 1);
        assert_eq!(clusters[0].len(), 2);
    }

    #[test]
    fn test_merge_across_cell_border() {
        // 15.9 and 16.1 straddle the x = 16 border.
        let tracker = tracker_with(16.0, &[(1, 15.9, 5.0), (2, 16.1, 5.0)]);
        let clusters = compute_clusters(&tracker);
        assert_eq!(clusters.len(), 1);
        assert_eq!(ids(&clusters[0]), vec![1, 2]);
    }

    #[test]
    fn test_adjacent_cells_too_far_apart_stay_separate() {
        // Cells (0,0) and (1,0) are adjacent but the units are 31 apart.
        let tracker = tracker_with(16.0, &[(1, 0.5, 5.0), (2, 31.5, 5.0)]);
        assert_eq!(compute_clusters(&tracker).len(), 2);
    }

    #[test]
    fn test_exact_threshold_distance_does_not_merge() {
        let tracker = tracker_with(16.0, &[(1, 8.0, 5.0), (2, 24.0, 5.0)]);
        assert_eq!(compute_clusters(&tracker).len(), 2);
    }

    #[test]
    fn test_chain_merges_transitively() {
        let tracker = tracker_with(
            16.0,
            &[(1, 5.0, 5.0), (2, 17.0, 5.0), (3, 29.0, 5.0), (4, 41.0, 5.0)],
        );
        let clusters = compute_clusters(&tracker);
        assert_eq!(clusters.len(), 1);
        assert_eq!(ids(&clusters[0]), vec![1, 2, 3, 4]);
    }

    #[test]
    fn test_most_populous_first() {
        let tracker = tracker_with(
            16.0,
            &[
                (1, 500.0, 500.0),
                (2, 900.0, 900.0),
                (3, 901.0, 900.0),
                (4, 902.0, 900.0),
            ],
        );
        let clusters = compute_clusters(&tracker);
        assert_eq!(clusters.len(), 2);
        assert_eq!(ids(&clusters[0]), vec![2, 3, 4]);
        assert_eq!(ids(&clusters[1]), vec![1]);
    }

    #[test]
    fn test_centroid_and_extent() {
        let tracker = tracker_with(16.0, &[(1, 0.0, 0.0), (2, 6.0, 8.0)]);
        let clusters = compute_clusters(&tracker);
        assert_eq!(clusters[0].centroid(), Vec2::new(3.0, 4.0));
        assert!((clusters[0].extent() - 10.0).abs() < 1e-9);
    }

    #[test]
    fn test_no_opponents_no_clusters() {
        let tracker = tracker_with(16.0, &[]);
        assert!(compute_clusters(&tracker).is_empty());
    }

    #[test]
    fn test_cache_reuses_until_generation_changes() {
        let tracker = tracker_with(16.0, &[(1, 1.0, 1.0)]);
        let mut cache = ClusterCache::new();
        assert!(!cache.is_fresh(&tracker));
        assert_eq!(cache.get(&tracker).len(), 1);
        assert!(cache.is_fresh(&tracker));
        cache.invalidate();
        assert!(!cache.is_fresh(&tracker));
    }
}
