// cavern_mapgen: procedural cave maps and their contour meshes.
//
// This crate holds the whole cave pipeline: a seeded cellular automaton that
// carves a binary occupancy grid, a solid border ring, and a marching-squares
// mesher that turns the grid into a welded triangle mesh lying in the x/z
// plane. It has no engine dependencies and runs headless; the `cavern_cli`
// crate drives it from the command line.
//
// Module overview:
// - `grid.rs`:      OccupancyGrid (flat binary grid, out-of-bounds = solid) and PaddedGrid.
// - `automaton.rs`: Random fill and 4-5 rule smoothing passes.
// - `squares.rs`:   ControlNode/Node arena and the 2x2 Squares over it.
// - `contour.rs`:   Triangulation table, vertex welding, ContourMesh with outline-edge queries.
// - `adjacency.rs`: Vertex -> triangle index used for outline-edge tests.
// - `render.rs`:    RenderMesh with recomputed per-vertex normals, JSON-serializable.
// - `movement.rs`:  Mover: normalized x/z movement step.
// - `bake.rs`:      One-shot bake pipeline and CaveGenerator (regenerate on demand).
// - `config.rs`:    CaveConfig: all tunable parameters, JSON loading, validation.
// - `error.rs`:     ConfigError / CaveError.
// - `prng`:         Re-exported from `cavern_prng`: xoshiro256++ with FNV-1a string seeding.
//
// **Critical constraint: determinism.** A bake is a pure function of its
// config. All randomness comes from the seeded `CaveRng`; the only exception
// is the opt-in clock seed (`use_random_seed`), which is logged.

pub mod adjacency;
pub mod automaton;
pub mod bake;
pub mod config;
pub mod contour;
pub mod error;
pub mod grid;
pub mod movement;
pub use cavern_prng as prng;
pub mod render;
pub mod squares;

pub use bake::{CaveBake, CaveGenerator, bake};
pub use config::CaveConfig;
pub use contour::ContourMesh;
pub use error::{CaveError, ConfigError};
pub use grid::{Cell, OccupancyGrid, PaddedGrid};
pub use render::RenderMesh;
