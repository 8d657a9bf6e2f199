//! Property-based testing strategies.

use proptest::collection::vec;
use proptest::prelude::*;
use proptest::sample::select;

use vanguard_core::math::Vec2;
use vanguard_core::unit::{PlayerId, Unit, UnitKind};

use crate::fixtures::{unit, WORLD_SIZE};

/// Any unit kind.
pub fn arb_kind() -> impl Strategy<Value = UnitKind> {
    select(UnitKind::ALL.to_vec())
}

/// A position inside the default world.
pub fn arb_position() -> impl Strategy<Value = Vec2> {
    (0.0..WORLD_SIZE, 0.0..WORLD_SIZE).prop_map(|(x, y)| Vec2::new(x, y))
}

/// A position inside a `size` x `size` square at the origin.
pub fn arb_position_within(size: f64) -> impl Strategy<Value = Vec2> {
    (0.0..size, 0.0..size).prop_map(|(x, y)| Vec2::new(x, y))
}

/// Up to `max` units of `owner` with ids `first_id..`, anywhere in the world.
pub fn arb_units(owner: PlayerId, first_id: i64, max: usize) -> impl Strategy<Value = Vec<Unit>> {
    vec((arb_kind(), arb_position()), 0..=max).prop_map(move |specs| {
        specs
            .into_iter()
            .zip(first_id..)
            .map(|((kind, p), id)| unit(id, owner, kind, p.x, p.y))
            .collect()
    })
}

/// Up to `max` units of `owner` packed into a `size` x `size` square, so
/// neighbouring cells are dense.
pub fn arb_packed_units(
    owner: PlayerId,
    first_id: i64,
    max: usize,
    size: f64,
) -> impl Strategy<Value = Vec<Unit>> {
    vec(arb_position_within(size), 1..=max).prop_map(move |positions| {
        positions
            .into_iter()
            .zip(first_id..)
            .map(|(p, id)| unit(id, owner, UnitKind::Tank, p.x, p.y))
            .collect()
    })
}
