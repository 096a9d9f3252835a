use serde::{Deserialize, Serialize};

/// Coordinate of a point in the discretised profile.
///
/// The layer index counts sub-layers from the surface; an index equal to the
/// sub-layer count addresses the top of the half-space. The depth is measured
/// from the top of the addressed sub-layer.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Location {
    pub layer: usize,
    pub depth: f64,
}

impl Location {
    pub fn new(layer: usize, depth: f64) -> Self {
        Self { layer, depth }
    }
}
