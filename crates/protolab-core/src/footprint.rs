//! Footprint calculation: how many grid tiles an entity occupies.
//!
//! A tile counts as occupied when the collision box covers its center. On an
//! axis with an even tile span the entity origin sits on a tile edge, so tile
//! centers are offset by half a tile from the origin; on an odd axis the
//! origin sits on a tile center. An explicit `tile_width`/`tile_height`
//! override decides the parity; otherwise the ceiling of the box span does.
//! A span that is already a whole number puts both box edges on tile centers
//! of the odd grid, so it keeps the odd rule.

use crate::prototype::EntityGeometry;
use serde::Serialize;

/// Occupied footprint as `[width, height]`.
///
/// Whole numbers for grid-aligned entities; the raw box span for entities
/// placed off-grid.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct Size(pub f64, pub f64);

impl Size {
    pub fn width(&self) -> f64 {
        self.0
    }

    pub fn height(&self) -> f64 {
        self.1
    }
}

/// Compute the footprint of an entity from its geometry.
pub fn entity_size(geometry: &EntityGeometry) -> Size {
    let Some(bounds) = geometry.collision_box else {
        return Size(0.0, 0.0);
    };

    if geometry.is_off_grid() {
        return Size(bounds.right - bounds.left, bounds.bottom - bounds.top);
    }

    Size(
        axis_tiles(bounds.left, bounds.right, geometry.tile_width),
        axis_tiles(bounds.top, bounds.bottom, geometry.tile_height),
    )
}

/// Count tile centers covered by `[low, high]` on one axis.
fn axis_tiles(low: f64, high: f64, tile_span: Option<u32>) -> f64 {
    let even = match tile_span {
        Some(span) => span % 2 == 0,
        None => {
            let span = high - low;
            span.fract() != 0.0 && span.ceil() % 2.0 == 0.0
        }
    };
    if even {
        (0.5 - low).floor() + (0.5 + high).floor()
    } else {
        1.0 + (-low).floor() + high.floor()
    }
}
