// One-shot cave bake: config in, padded grid and contour mesh out.
//
// A bake is a single atomic pipeline run:
//
// 1. validate the config (rejects bad parameters before anything is
//    allocated),
// 2. resolve the seed string (the configured one, or a wall-clock one when
//    `use_random_seed` is set) and hash it into a fresh `CaveRng`,
// 3. random fill + smoothing (`automaton.rs`),
// 4. pad with the solid border ring,
// 5. contour mesh (`contour.rs`).
//
// Nothing is shared between bakes: each one owns its PRNG, grid, node arena,
// and mesh. `CaveGenerator` keeps the most recent bake and replaces it
// wholesale on `regenerate()`; the previous grid and mesh are dropped, never
// patched.
//
// See also: `config.rs` for the parameters, `cavern_cli` for the command-line
// driver.
//
// **Critical constraint: determinism.** With a fixed seed string, two bakes
// of the same config produce identical grids and meshes. The clock seed is
// the only nondeterministic input and it is logged.

use std::time::{SystemTime, UNIX_EPOCH};

use cavern_prng::CaveRng;
use log::{debug, info, warn};

use crate::automaton::generate_grid;
use crate::config::{BORDER_SIZE, CaveConfig};
use crate::contour::{ContourMesh, generate_contour_mesh};
use crate::error::Result;
use crate::grid::PaddedGrid;
use crate::render::RenderMesh;

/// Everything one bake produces.
#[derive(Clone, Debug)]
pub struct CaveBake {
    /// The seed string actually used (the clock seed when randomized).
    pub seed: String,
    pub grid: PaddedGrid,
    pub mesh: ContourMesh,
}

impl CaveBake {
    pub fn render_mesh(&self) -> RenderMesh {
        RenderMesh::from_contour(&self.mesh)
    }
}

/// Seed string derived from the current wall-clock time, `"{secs}.{millis}"`.
fn clock_seed() -> String {
    let elapsed = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default();
    format!("{}.{:03}", elapsed.as_secs(), elapsed.subsec_millis())
}

/// The seed string a bake of `config` will use.
pub fn resolve_seed(config: &CaveConfig) -> String {
    if config.use_random_seed {
        let seed = clock_seed();
        warn!("using clock seed \"{seed}\"; this bake is not reproducible from its config");
        seed
    } else {
        config.seed.clone()
    }
}

/// Run the full pipeline for `config`.
pub fn bake(config: &CaveConfig) -> Result<CaveBake> {
    config.validate()?;
    let seed = resolve_seed(config);
    Ok(bake_with_seed(config, seed))
}

/// The pipeline after validation and seed resolution.
fn bake_with_seed(config: &CaveConfig, seed: String) -> CaveBake {
    let mut rng = CaveRng::from_seed_str(&seed);
    let raw = generate_grid(
        config.width,
        config.height,
        config.fill_percent,
        config.smoothing_passes,
        &mut rng,
    );
    let grid = raw.padded(BORDER_SIZE);
    debug!(
        "padded grid with {BORDER_SIZE}-cell ring: {}x{}",
        grid.width(),
        grid.height()
    );
    let mesh = generate_contour_mesh(&grid, config.cell_size);

    info!(
        "baked cave \"{seed}\": {}x{} padded grid, {} solid cells, {} vertices, {} triangles",
        grid.width(),
        grid.height(),
        grid.solid_count(),
        mesh.vertex_count(),
        mesh.triangle_count()
    );

    CaveBake { seed, grid, mesh }
}

/// Owns a config and the most recent bake.
#[derive(Clone, Debug)]
pub struct CaveGenerator {
    config: CaveConfig,
    current: Option<CaveBake>,
}

impl CaveGenerator {
    /// Validates `config` up front; nothing is baked until `regenerate()`.
    pub fn new(config: CaveConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            config,
            current: None,
        })
    }

    pub fn config(&self) -> &CaveConfig {
        &self.config
    }

    /// Replace the config used by the next `regenerate()`. The current bake
    /// is kept until then.
    pub fn set_config(&mut self, config: CaveConfig) -> Result<()> {
        config.validate()?;
        self.config = config;
        Ok(())
    }

    /// Bake again and replace the previous result.
    pub fn regenerate(&mut self) -> Result<&CaveBake> {
        let baked = bake(&self.config)?;
        Ok(self.current.insert(baked))
    }

    /// The most recent bake, if any.
    pub fn current(&self) -> Option<&CaveBake> {
        self.current.as_ref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{CaveError, ConfigError};

    fn small_config(seed: &str) -> CaveConfig {
        CaveConfig {
            width: 24,
            height: 18,
            seed: seed.into(),
            ..CaveConfig::default()
        }
    }

    #[test]
    fn fixed_seed_is_used_verbatim() {
        assert_eq!(resolve_seed(&small_config("granite")), "granite");
    }

    #[test]
    fn clock_seed_has_seconds_and_millis() {
        let seed = resolve_seed(&CaveConfig {
            use_random_seed: true,
            ..small_config("ignored")
        });
        let (secs, millis) = seed.split_once('.').unwrap();
        assert!(secs.parse::<u64>().is_ok());
        assert_eq!(millis.len(), 3);
        assert!(millis.parse::<u32>().unwrap() < 1000);
    }

    #[test]
    fn bake_produces_padded_grid_and_mesh() {
        let result = bake(&small_config("granite")).unwrap();
        assert_eq!(result.seed, "granite");
        assert_eq!(result.grid.width(), 26);
        assert_eq!(result.grid.height(), 20);
        assert_eq!(result.grid.border(), 1);
        assert!(result.mesh.triangle_count() > 0);
    }

    #[test]
    fn invalid_config_is_rejected_before_baking() {
        let err = bake(&CaveConfig {
            fill_percent: 250,
            ..CaveConfig::default()
        })
        .unwrap_err();
        assert!(matches!(
            err,
            CaveError::Config(ConfigError::FillPercentOutOfRange(250))
        ));
    }

    #[test]
    fn generator_starts_empty_and_replaces_bakes() {
        let mut generator = CaveGenerator::new(small_config("first")).unwrap();
        assert!(generator.current().is_none());

        let first_grid = generator.regenerate().unwrap().grid.clone();
        generator.set_config(small_config("second")).unwrap();
        // The old bake survives a config change until the next regenerate.
        assert_eq!(generator.current().unwrap().seed, "first");

        let second = generator.regenerate().unwrap();
        assert_eq!(second.seed, "second");
        assert_ne!(second.grid, first_grid);
    }

    #[test]
    fn generator_rejects_invalid_config() {
        let err = CaveGenerator::new(CaveConfig {
            height: 1,
            ..CaveConfig::default()
        })
        .unwrap_err();
        assert!(matches!(err, CaveError::Config(ConfigError::HeightTooSmall { .. })));

        let mut generator = CaveGenerator::new(small_config("ok")).unwrap();
        assert!(generator
            .set_config(CaveConfig {
                cell_size: -2.0,
                ..CaveConfig::default()
            })
            .is_err());
        assert_eq!(generator.config().seed, "ok");
    }

    #[test]
    fn regenerate_with_fixed_seed_is_stable() {
        let mut generator = CaveGenerator::new(small_config("same")).unwrap();
        let a = generator.regenerate().unwrap().clone();
        let b = generator.regenerate().unwrap();
        assert_eq!(a.grid, b.grid);
        assert_eq!(a.mesh.vertices, b.mesh.vertices);
        assert_eq!(a.mesh.triangles, b.mesh.triangles);
    }

    #[test]
    fn render_mesh_matches_contour() {
        let result = bake(&small_config("render")).unwrap();
        let render = result.render_mesh();
        assert_eq!(render.positions.len(), result.mesh.vertex_count());
        assert_eq!(render.indices, result.mesh.triangles);
    }
}
