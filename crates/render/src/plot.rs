use std::ops::Range;

use reach_types::{ReachabilityData, TriangleMesh};
use tracing::debug;

use crate::error::PlotError;
use crate::iso::{extract_iso_shell, extract_iso_surface};

/// How a contour is turned into triangles.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SurfaceStyle {
    /// Interpolated surface through the samples.
    #[default]
    Smooth,
    /// Boundary faces of the voxels at or above the level.
    Voxels,
}

/// What to draw and how.
#[derive(Debug, Clone, PartialEq)]
pub struct PlotOptions {
    /// Iso levels, each in `(0, 1]`.
    pub contours: Vec<f64>,
    /// One opacity per contour. Defaults to `min(1, 0.7 * level)`.
    pub opacities: Option<Vec<f64>>,
    /// Density multiplier applied before clamping to `[0, 1]`.
    pub show_scale: f64,
    /// Only show these x-planes of the grid.
    pub x_range: Option<Range<usize>>,
    pub show_robot: bool,
    pub surface: SurfaceStyle,
}

impl Default for PlotOptions {
    fn default() -> Self {
        Self {
            contours: vec![0.01, 0.1, 0.5, 0.9, 0.99],
            opacities: None,
            show_scale: 1.0,
            x_range: None,
            show_robot: true,
            surface: SurfaceStyle::Smooth,
        }
    }
}

impl PlotOptions {
    fn opacity(&self, index: usize, level: f64) -> f64 {
        match &self.opacities {
            Some(o) => o[index],
            None => (0.7 * level).min(1.0),
        }
    }

    fn validate(&self) -> Result<(), PlotError> {
        if !self.show_scale.is_finite() || self.show_scale <= 0.0 {
            return Err(PlotError::InvalidScale(self.show_scale));
        }
        if let Some(bad) = self.contours.iter().find(|c| !(**c > 0.0 && **c <= 1.0)) {
            return Err(PlotError::InvalidContour(*bad));
        }
        if let Some(o) = &self.opacities {
            if o.len() != self.contours.len() {
                return Err(PlotError::OpacityCountMismatch {
                    contours: self.contours.len(),
                    opacities: o.len(),
                });
            }
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum LayerKind {
    IsoShell { level: f64 },
    Robot,
}

#[derive(Debug, Clone, PartialEq)]
pub struct PlotLayer {
    pub name: String,
    pub kind: LayerKind,
    pub opacity: f64,
    /// Geometry in voxel coordinates.
    pub mesh: TriangleMesh,
}

/// Robot triangulation and the manipulator base it was sampled around, both
/// in the frame the reachability data was generated in.
#[derive(Debug, Clone, Copy)]
pub struct RobotOverlay<'a> {
    pub mesh: &'a TriangleMesh,
    pub base_anchor: [f64; 3],
}

/// Everything a plotter needs, in voxel coordinates.
#[derive(Debug, Clone, PartialEq)]
pub struct ReachabilityPlot {
    /// Iso-shells from lowest to highest level, then the robot.
    pub layers: Vec<PlotLayer>,
    /// Shape of the plotted (possibly sliced) field.
    pub shape: [usize; 3],
    /// x voxel index of the plotted field's first plane in the full field.
    pub x_offset: f64,
}

impl ReachabilityPlot {
    pub fn triangle_count(&self) -> usize {
        self.layers.iter().map(|l| l.mesh.triangle_count()).sum()
    }
}

/// Turn reachability data into iso-surface layers plus an optional robot overlay.
pub fn build_plot(
    data: &ReachabilityData,
    robot: Option<RobotOverlay<'_>>,
    options: &PlotOptions,
) -> Result<ReachabilityPlot, PlotError> {
    options.validate()?;

    let mut density = data.density.scaled_clamped(options.show_scale);
    let mut x_offset = 0.0;
    if let Some(range) = &options.x_range {
        let start = range.start.min(density.shape[0]);
        density = density.slab_x(range.clone());
        x_offset = start as f64 - 1.0;
    }

    let mut layers = Vec::with_capacity(options.contours.len() + 1);
    for (i, &level) in options.contours.iter().enumerate() {
        let mesh = match options.surface {
            SurfaceStyle::Smooth => extract_iso_surface(&density, level),
            SurfaceStyle::Voxels => extract_iso_shell(&density, level),
        };
        if mesh.is_empty() {
            debug!(level, "contour is empty");
            continue;
        }
        layers.push(PlotLayer {
            name: format!("contour_{level}"),
            kind: LayerKind::IsoShell { level },
            opacity: options.opacity(i, level),
            mesh,
        });
    }

    if let Some(overlay) = robot.filter(|_| options.show_robot) {
        let scale = data.point_scale;
        let base = overlay.base_anchor;
        let mut mesh = overlay.mesh.clone();
        mesh.map_vertices(|v| {
            let mut p = scale.to_voxel([v[0] - base[0], v[1] - base[1], v[2] - base[2]]);
            p[0] -= x_offset;
            p
        });
        layers.push(PlotLayer {
            name: "robot".to_string(),
            kind: LayerKind::Robot,
            opacity: 1.0,
            mesh,
        });
    }

    Ok(ReachabilityPlot {
        layers,
        shape: density.shape,
        x_offset,
    })
}
