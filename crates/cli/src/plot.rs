use std::path::PathBuf;

use anyhow::{Context, Result};
use reach_render::{
    build_plot, ObjPlotter, PlotOptions, Plotter, RobotOverlay, SurfaceStyle, SvgPlotter,
};
use reachability::ReachabilityModel;
use robot_kernel::MockScene;

use crate::options::{Cli, PlotFormat};

/// Render the model's density (and the robot) to `<plot_dir>/<robot>.<manip>.<ext>`.
pub fn write_plot(cli: &Cli, model: &ReachabilityModel, scene: &mut MockScene) -> Result<PathBuf> {
    let data = model.data().context("nothing to plot")?;
    let (robot_mesh, base) = model.robot_at_identity(scene)?;

    let options = PlotOptions {
        show_scale: cli.show_scale,
        x_range: cli.xrange.clone(),
        surface: if cli.voxel_shells {
            SurfaceStyle::Voxels
        } else {
            SurfaceStyle::Smooth
        },
        ..PlotOptions::default()
    };
    let overlay = RobotOverlay {
        mesh: &robot_mesh,
        base_anchor: [base.x, base.y, base.z],
    };
    let plot = build_plot(data, Some(overlay), &options)?;

    let plotter: Box<dyn Plotter> = match cli.plot_format {
        PlotFormat::Svg => Box::new(SvgPlotter::default()),
        PlotFormat::Obj => Box::new(ObjPlotter),
    };
    let path = cli.plot_dir.join(format!(
        "{}.{}.{}",
        model.robot_name(),
        model.manipulator().name,
        plotter.extension()
    ));
    let title = format!("{} / {}", model.robot_name(), model.manipulator().name);
    plotter.write(&plot, &title, &path)?;
    Ok(path)
}
