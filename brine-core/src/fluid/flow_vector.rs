//! The direction a fluid cell pushes entities in.
//!
//! Only the grid's occupants and display states are read, so this works on
//! any cell the host can see, whether or not the engine has a level for it.

use brine_utils::{BlockPos, direction::Horizontal, math::Vector3};

use super::FluidKind;
use crate::grid::Grid;

/// Deepest column that still adds to the push.
pub const MAX_PUSH_DEPTH: i32 = 8;

/// How far the fluid at `pos` has thinned out, `0` for a full cell.
fn decay<G: Grid>(grid: &G, kind: FluidKind, pos: BlockPos) -> Option<i32> {
    grid.occupant(pos)
        .holds(kind)
        .then(|| i32::from(grid.metadata(pos).max(1)) - 1)
}

/// Unit vector of the flow at `pos`, zero when still or not `kind`.
#[must_use]
pub fn flow_vector<G: Grid>(grid: &G, kind: FluidKind, pos: BlockPos) -> Vector3<f64> {
    let Some(center) = decay(grid, kind, pos) else {
        return Vector3::ZERO;
    };

    let mut flow = Vector3::ZERO;
    for dir in Horizontal::rotated_cardinal(0) {
        let (dx, dz) = dir.offset();
        let neighbor = dir.relative(pos, 1);
        let difference = match decay(grid, kind, neighbor) {
            Some(decay) => decay - center,
            None if !grid.occupant(neighbor).blocks_movement() => {
                // Fluid falling off an edge pulls harder.
                match decay(grid, kind, neighbor.below()) {
                    Some(decay) => decay - (center - 8),
                    None => continue,
                }
            }
            None => continue,
        };
        flow += Vector3::new(f64::from(dx * difference), 0.0, f64::from(dz * difference));
    }
    flow.normalize()
}

/// The push applied to an entity inside the fluid at `pos`.
///
/// Deeper fluid pushes harder: the flow of the topmost of up to eight
/// stacked cells is scaled by `depth / 2 + 0.7`.
#[must_use]
pub fn entity_push<G: Grid>(grid: &G, kind: FluidKind, pos: BlockPos) -> Vector3<f64> {
    let mut top = pos;
    let mut depth = 0;
    while depth < MAX_PUSH_DEPTH && grid.occupant(top.above()).holds(kind) {
        top = top.above();
        depth += 1;
    }
    flow_vector(grid, kind, top) * (f64::from(depth) / 2.0 + 0.7)
}
