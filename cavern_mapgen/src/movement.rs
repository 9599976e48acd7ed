// Headless movement step over the cave floor plane.
//
// Two axis inputs (horizontal -> x, vertical -> z) are turned into a unit
// direction, scaled by `speed * dt`, and added to the position. Diagonal input
// is no faster than straight input. No collision is done here; the mesh is
// render-only.

use serde::{Deserialize, Serialize};

/// World units per second for a default `Mover`.
pub const DEFAULT_SPEED: f32 = 5.0;

/// Input magnitudes below this count as "no input".
const INPUT_EPSILON: f32 = 1e-6;

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Mover {
    /// World units per second.
    pub speed: f32,
}

impl Default for Mover {
    fn default() -> Self {
        Self {
            speed: DEFAULT_SPEED,
        }
    }
}

impl Mover {
    pub fn new(speed: f32) -> Self {
        Self { speed }
    }

    /// Advance `position` by one step of `dt` seconds under `input`
    /// (`[horizontal, vertical]`, each nominally in `[-1, 1]`).
    pub fn step(&self, position: [f32; 3], input: [f32; 2], dt: f32) -> [f32; 3] {
        let [h, v] = input;
        let len = (h * h + v * v).sqrt();
        if len < INPUT_EPSILON {
            return position;
        }
        let scale = self.speed * dt / len;
        [position[0] + h * scale, position[1], position[2] + v * scale]
    }
}
