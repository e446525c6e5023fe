//! `kinematic-reachability`: load or compute a reachability map for one of
//! the built-in robots, report on it, and optionally plot it.

mod options;
#[cfg(feature = "plot")]
mod plot;

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use file_format::CacheStore;
use reachability::{GenerationSummary, ReachabilityModel};
use robot_kernel::{HopfGridSampler, MockIkSolver, MockScene};
use serde::Serialize;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use crate::options::Cli;

/// Whether this build can plot. Fixed at compile time.
const PLOT_AVAILABLE: bool = cfg!(feature = "plot");

#[derive(Debug, Serialize)]
struct RunReport {
    robot: String,
    robot_hash: String,
    manipulator: String,
    cache_path: PathBuf,
    from_cache: bool,
    generation: Option<GenerationSummary>,
    reachable_poses: usize,
    reachable_voxels: usize,
    grid_shape: [usize; 3],
    plot: Option<PathBuf>,
}

fn init_tracing(cli: &Cli) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(cli.log_level()));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn run(cli: &Cli) -> Result<RunReport> {
    let mut scene = MockScene::new(cli.robot.build());
    let mut model = ReachabilityModel::new(&scene, &cli.manip_name)
        .with_context(|| format!("robot {:?} has no manipulator {:?}", cli.robot, cli.manip_name))?;
    let solver = MockIkSolver::for_manipulator(scene.robot(), model.manipulator())?;
    let sampler = HopfGridSampler::new();
    let store = CacheStore::new(&cli.cache_dir);
    let config = cli.generate_config();

    let from_cache = !cli.regenerate && model.load(&store);
    let generation = if from_cache {
        info!("loaded reachability from cache");
        None
    } else if cli.autogenerate {
        let force = !cli.no_force_generate;
        Some(
            model
                .autogenerate(&mut scene, &solver, &sampler, &store, &config, force)
                .context("autogeneration failed")?,
        )
    } else {
        let summary = model
            .generate(&mut scene, &solver, &sampler, &config)
            .context("generation failed")?;
        model.save(&store).context("failed to save reachability")?;
        Some(summary)
    };

    let data = model
        .data()
        .context("model has no reachability data after load/generate")?;

    let plot = if !cli.show {
        None
    } else if PLOT_AVAILABLE {
        show(cli, &model, &mut scene)?
    } else {
        warn!("built without plotting support, ignoring --show");
        None
    };

    Ok(RunReport {
        robot: model.robot_name().to_string(),
        robot_hash: model.robot_hash().to_string(),
        manipulator: model.manipulator().name.clone(),
        cache_path: store.path_for(&model.cache_key()),
        from_cache,
        generation,
        reachable_poses: data.stats.len(),
        reachable_voxels: data.density.nonzero_count(),
        grid_shape: data.density.shape,
        plot,
    })
}

#[cfg(feature = "plot")]
fn show(cli: &Cli, model: &ReachabilityModel, scene: &mut MockScene) -> Result<Option<PathBuf>> {
    plot::write_plot(cli, model, scene).map(Some)
}

#[cfg(not(feature = "plot"))]
fn show(_cli: &Cli, _model: &ReachabilityModel, _scene: &mut MockScene) -> Result<Option<PathBuf>> {
    Ok(None)
}

fn print_report(report: &RunReport) {
    let source = if report.from_cache { "cache" } else { "generated" };
    println!(
        "{} / {} [{}] ({source})",
        report.robot, report.manipulator, report.robot_hash
    );
    println!("  cache:     {}", report.cache_path.display());
    let [nx, ny, nz] = report.grid_shape;
    println!("  grid:      {nx}x{ny}x{nz}");
    println!("  reachable: {} poses, {} voxels", report.reachable_poses, report.reachable_voxels);
    if let Some(g) = &report.generation {
        println!(
            "  sampled:   {} positions x {} orientations (radius {:.3} m, quat delta {:.4})",
            g.positions, g.orientations, g.max_radius, g.quat_delta
        );
        println!("  took:      {:.2}s", g.seconds);
    }
    if let Some(path) = &report.plot {
        println!("  plot:      {}", path.display());
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(&cli);

    let report = run(&cli)?;
    if cli.json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        print_report(&report);
    }
    Ok(())
}
