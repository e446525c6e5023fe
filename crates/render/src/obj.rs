//! Wavefront OBJ export of a reachability plot, one object per layer.

use std::fmt::Write as _;

use crate::plot::{LayerKind, ReachabilityPlot};
use crate::Plotter;

#[derive(Debug, Clone, Copy, Default)]
pub struct ObjPlotter;

impl Plotter for ObjPlotter {
    fn extension(&self) -> &'static str {
        "obj"
    }

    fn render(&self, plot: &ReachabilityPlot, title: &str) -> String {
        let mut out = String::new();
        let _ = writeln!(out, "# {title}");
        let _ = writeln!(
            out,
            "# grid {}x{}x{}, x offset {}",
            plot.shape[0], plot.shape[1], plot.shape[2], plot.x_offset
        );

        // OBJ indices are 1-based and global across objects.
        let mut base = 1u64;
        for layer in &plot.layers {
            let mesh = &layer.mesh;
            let _ = writeln!(out, "o {}", layer.name);
            match layer.kind {
                LayerKind::IsoShell { level } => {
                    let _ = writeln!(out, "# level {level} opacity {:.3}", layer.opacity);
                }
                LayerKind::Robot => {
                    let _ = writeln!(out, "# robot");
                }
            }
            for i in 0..mesh.vertex_count() {
                let [x, y, z] = mesh.vertex(i);
                let _ = writeln!(out, "v {x} {y} {z}");
            }
            for tri in mesh.indices.chunks_exact(3) {
                let _ = writeln!(
                    out,
                    "f {} {} {}",
                    tri[0] as u64 + base,
                    tri[1] as u64 + base,
                    tri[2] as u64 + base
                );
            }
            base += mesh.vertex_count() as u64;
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::plot::PlotLayer;
    use reach_types::TriangleMesh;

    fn triangle() -> TriangleMesh {
        let mut mesh = TriangleMesh::new();
        let a = mesh.add_vertex([0.0, 0.0, 0.0]);
        let b = mesh.add_vertex([1.0, 0.0, 0.0]);
        let c = mesh.add_vertex([0.0, 1.0, 0.0]);
        mesh.add_triangle(a, b, c);
        mesh
    }

    #[test]
    fn indices_continue_across_objects() {
        let plot = ReachabilityPlot {
            layers: vec![
                PlotLayer {
                    name: "contour_0.1".into(),
                    kind: LayerKind::IsoShell { level: 0.1 },
                    opacity: 0.07,
                    mesh: triangle(),
                },
                PlotLayer {
                    name: "robot".into(),
                    kind: LayerKind::Robot,
                    opacity: 1.0,
                    mesh: triangle(),
                },
            ],
            shape: [2, 2, 2],
            x_offset: 0.0,
        };
        let obj = ObjPlotter.render(&plot, "test");
        assert!(obj.contains("o contour_0.1\n"));
        assert!(obj.contains("o robot\n"));
        assert!(obj.contains("f 1 2 3\n"));
        assert!(obj.contains("f 4 5 6\n"));
        assert_eq!(obj.lines().filter(|l| l.starts_with("v ")).count(), 6);
    }
}
