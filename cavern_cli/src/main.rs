// CLI entry point for baking caves outside an engine.
//
// Loads a `CaveConfig` (from `--config` or defaults), applies any flag
// overrides on top, runs one bake, and reports the result. `--ascii` prints
// the padded grid; `--export` writes the render mesh (positions, normals,
// indices) as JSON. See `cavern_mapgen::bake` for the pipeline itself.
//
// Usage:
//   bake [OPTIONS]
//     --config <PATH>          JSON config file (missing fields use defaults)
//     --width <N>              Map width in cells
//     --height <N>             Map height in cells
//     --fill-percent <N>       Initial solid chance, 0-100
//     --seed <SEED>            Seed string
//     --random-seed            Seed from the wall clock
//     --fixed-seed             Use the seed string even if the config asks for a clock seed
//     --cell-size <F>          World size of one cell
//     --smoothing-passes <N>   Automaton passes after the fill
//     --ascii                  Print the padded grid
//     --export <PATH>          Write the render mesh as JSON
//
// Logging goes through `env_logger`; the default filter is `info` and
// `RUST_LOG` overrides it.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use cavern_mapgen::automaton::smooth_until_stable;
use cavern_mapgen::{CaveBake, CaveConfig, RenderMesh, bake};
use clap::Parser;
use log::{debug, info};

/// Extra smoothing passes tried when reporting grid stability at debug level.
const STABILITY_PROBE_PASSES: u32 = 100;

#[derive(Parser, Debug)]
#[command(name = "bake")]
#[command(about = "Generate a cellular-automaton cave and its contour mesh", long_about = None)]
struct Args {
    /// JSON config file; flags below override its fields
    #[arg(long)]
    config: Option<PathBuf>,

    /// Map width in cells
    #[arg(long)]
    width: Option<u32>,

    /// Map height in cells
    #[arg(long)]
    height: Option<u32>,

    /// Chance (0-100) that an interior cell starts solid
    #[arg(long)]
    fill_percent: Option<u32>,

    /// Seed string
    #[arg(long)]
    seed: Option<String>,

    /// Derive the seed from the wall clock
    #[arg(long, conflicts_with = "fixed_seed")]
    random_seed: bool,

    /// Use the seed string, overriding `use_random_seed` from the config file
    #[arg(long)]
    fixed_seed: bool,

    /// World-space size of one cell
    #[arg(long)]
    cell_size: Option<f32>,

    /// Smoothing passes after the random fill
    #[arg(long)]
    smoothing_passes: Option<u32>,

    /// Print the padded grid as ASCII (`#` solid, `.` open)
    #[arg(long)]
    ascii: bool,

    /// Write the render mesh as JSON to this path
    #[arg(long)]
    export: Option<PathBuf>,
}

impl Args {
    /// The config file (or defaults) with flag overrides applied.
    fn resolve_config(&self) -> Result<CaveConfig> {
        let mut config = match &self.config {
            Some(path) => CaveConfig::from_json_file(path)
                .with_context(|| format!("loading config {}", path.display()))?,
            None => CaveConfig::default(),
        };
        if let Some(width) = self.width {
            config.width = width;
        }
        if let Some(height) = self.height {
            config.height = height;
        }
        if let Some(fill_percent) = self.fill_percent {
            config.fill_percent = fill_percent;
        }
        if let Some(seed) = &self.seed {
            config.seed = seed.clone();
        }
        if self.random_seed {
            config.use_random_seed = true;
        }
        if self.fixed_seed {
            config.use_random_seed = false;
        }
        if let Some(cell_size) = self.cell_size {
            config.cell_size = cell_size;
        }
        if let Some(passes) = self.smoothing_passes {
            config.smoothing_passes = passes;
        }
        Ok(config)
    }
}

fn report_stability(result: &CaveBake) {
    let mut grid = result.grid.as_grid().clone();
    match smooth_until_stable(&mut grid, STABILITY_PROBE_PASSES) {
        Some(0) => debug!("padded grid is a smoothing fixed point"),
        Some(passes) => debug!("padded grid settles after {passes} more smoothing passes"),
        None => debug!("padded grid still changing after {STABILITY_PROBE_PASSES} passes"),
    }
}

/// Write the bake's render mesh to `path` as pretty-printed JSON.
fn export_render_mesh(result: &CaveBake, path: &Path) -> Result<RenderMesh> {
    let render = result.render_mesh();
    let json = serde_json::to_string_pretty(&render).context("serializing render mesh")?;
    fs::write(path, json).with_context(|| format!("writing {}", path.display()))?;
    info!(
        "exported {} vertices / {} triangles to {}",
        render.positions.len(),
        render.triangle_count(),
        path.display()
    );
    Ok(render)
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args = Args::parse();
    let config = args.resolve_config()?;
    let result = bake(&config).context("bake failed")?;

    if log::log_enabled!(log::Level::Debug) {
        report_stability(&result);
    }

    if args.ascii {
        print!("{}", result.grid.as_grid());
    }

    if let Some(path) = &args.export {
        export_render_mesh(&result, path)?;
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> Args {
        Args::try_parse_from(std::iter::once("bake").chain(args.iter().copied())).unwrap()
    }

    #[test]
    fn no_flags_gives_default_config() {
        let config = parse(&[]).resolve_config().unwrap();
        assert_eq!(config, CaveConfig::default());
    }

    #[test]
    fn flags_override_defaults() {
        let config = parse(&[
            "--width",
            "20",
            "--fill-percent",
            "52",
            "--seed",
            "flag",
            "--random-seed",
            "--cell-size",
            "0.5",
            "--smoothing-passes",
            "0",
        ])
        .resolve_config()
        .unwrap();
        assert_eq!(config.width, 20);
        assert_eq!(config.height, CaveConfig::default().height);
        assert_eq!(config.fill_percent, 52);
        assert_eq!(config.seed, "flag");
        assert!(config.use_random_seed);
        assert!((config.cell_size - 0.5).abs() < 1e-6);
        assert_eq!(config.smoothing_passes, 0);
    }

    #[test]
    fn flags_override_config_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("cave.json");
        fs::write(&path, r#"{ "width": 30, "height": 12, "seed": "file" }"#).unwrap();

        let config = parse(&["--config", path.to_str().unwrap(), "--height", "9"])
            .resolve_config()
            .unwrap();
        assert_eq!(config.width, 30);
        assert_eq!(config.height, 9);
        assert_eq!(config.seed, "file");
    }

    #[test]
    fn fixed_seed_overrides_random_seed_from_config_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("cave.json");
        fs::write(&path, r#"{ "use_random_seed": true, "seed": "pinned" }"#).unwrap();
        let path = path.to_str().unwrap();

        let config = parse(&["--config", path]).resolve_config().unwrap();
        assert!(config.use_random_seed);

        let config = parse(&["--config", path, "--fixed-seed"])
            .resolve_config()
            .unwrap();
        assert!(!config.use_random_seed);
        assert_eq!(config.seed, "pinned");
    }

    #[test]
    fn random_and_fixed_seed_flags_conflict() {
        assert!(Args::try_parse_from(["bake", "--random-seed", "--fixed-seed"]).is_err());
    }

    #[test]
    fn ascii_and_export_flags_parse() {
        let args = parse(&["--ascii", "--export", "out.json"]);
        assert!(args.ascii);
        assert_eq!(args.export, Some(PathBuf::from("out.json")));
    }

    #[test]
    fn export_writes_parseable_render_mesh_json() {
        let config = parse(&["--width", "12", "--height", "9", "--seed", "export"])
            .resolve_config()
            .unwrap();
        let result = bake(&config).unwrap();
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("mesh.json");

        let written = export_render_mesh(&result, &path).unwrap();
        let restored: RenderMesh =
            serde_json::from_str(&fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(restored, written);
        assert_eq!(restored.positions.len(), result.mesh.vertex_count());
        assert_eq!(restored.indices, result.mesh.triangles);
    }

    #[test]
    fn export_to_missing_directory_is_an_error() {
        let config = parse(&["--width", "5", "--height", "5"]).resolve_config().unwrap();
        let result = bake(&config).unwrap();
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("no_such_dir").join("mesh.json");
        assert!(export_render_mesh(&result, &path).is_err());
    }

    #[test]
    fn ascii_output_is_the_padded_grid() {
        let config = parse(&["--width", "6", "--height", "4", "--fill-percent", "100"])
            .resolve_config()
            .unwrap();
        let result = bake(&config).unwrap();
        let rendered = result.grid.as_grid().to_string();
        let lines: Vec<&str> = rendered.lines().collect();
        assert_eq!(lines, vec!["########"; 6]);
    }

    #[test]
    fn missing_config_file_is_an_error() {
        assert!(
            parse(&["--config", "/nonexistent/cave.json"])
                .resolve_config()
                .is_err()
        );
    }
}
