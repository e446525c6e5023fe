//! Visualization of reachability density fields.
//!
//! [`build_plot`] turns a density field into nested iso-surfaces (plus an
//! optional robot overlay) in voxel coordinates. Surfaces are interpolated by
//! default, or blocky voxel shells with [`SurfaceStyle::Voxels`]. A [`Plotter`] writes the
//! result out as SVG or OBJ.

pub mod error;
pub mod iso;
pub mod obj;
pub mod plot;
pub mod svg;

pub use error::PlotError;
pub use iso::{extract_iso_shell, extract_iso_surface};
pub use obj::ObjPlotter;
pub use plot::{
    build_plot, LayerKind, PlotLayer, PlotOptions, ReachabilityPlot, RobotOverlay,
    SurfaceStyle,
};
pub use svg::SvgPlotter;

use std::path::Path;

/// An output backend for a [`ReachabilityPlot`].
pub trait Plotter {
    /// File extension without the dot.
    fn extension(&self) -> &'static str;

    fn render(&self, plot: &ReachabilityPlot, title: &str) -> String;

    fn write(&self, plot: &ReachabilityPlot, title: &str, path: &Path) -> Result<(), PlotError> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(path, self.render(plot, title))?;
        tracing::info!(path = %path.display(), layers = plot.layers.len(), "wrote plot");
        Ok(())
    }
}
