//! Isometric SVG rendering of a reachability plot.

use std::fmt::Write as _;

use crate::plot::{LayerKind, ReachabilityPlot};
use crate::Plotter;

/// Flat-shaded isometric renderer. Triangles from all layers are drawn far to
/// near, each filled with its layer's colour and opacity.
#[derive(Debug, Clone, Copy)]
pub struct SvgPlotter {
    pub width: f64,
    pub height: f64,
}

impl Default for SvgPlotter {
    fn default() -> Self {
        Self {
            width: 800.0,
            height: 600.0,
        }
    }
}

/// Rotate about z, tilt about x. Returns screen `(x, y)` and view depth.
fn project(p: [f64; 3]) -> (f64, f64, f64) {
    let (tilt, spin) = (0.6_f64, 0.8_f64);
    let rx = p[0] * spin.cos() - p[1] * spin.sin();
    let ry = p[0] * spin.sin() + p[1] * spin.cos();
    let depth = ry * tilt.cos() - p[2] * tilt.sin();
    let up = ry * tilt.sin() + p[2] * tilt.cos();
    (rx, -up, depth)
}

/// Colour ramp from blue (low density) through green to red (high density).
fn level_color(level: f64) -> (u8, u8, u8) {
    let t = level.clamp(0.0, 1.0);
    let r = (255.0 * (2.0 * t - 1.0).clamp(0.0, 1.0)) as u8;
    let g = (255.0 * (1.0 - (2.0 * t - 1.0).abs())) as u8;
    let b = (255.0 * (1.0 - 2.0 * t).clamp(0.0, 1.0)) as u8;
    (r, g, b)
}

struct Facet {
    points: [(f64, f64); 3],
    depth: f64,
    brightness: f64,
    color: (u8, u8, u8),
    opacity: f64,
}

impl Plotter for SvgPlotter {
    fn extension(&self) -> &'static str {
        "svg"
    }

    fn render(&self, plot: &ReachabilityPlot, title: &str) -> String {
        let (width, height) = (self.width, self.height);
        if plot.triangle_count() == 0 {
            return format!(
                "<svg xmlns=\"http://www.w3.org/2000/svg\" width=\"{width}\" height=\"{height}\">\
                 <text x=\"10\" y=\"20\" font-family=\"monospace\" font-size=\"14\" fill=\"#ccc\">{title} (empty)</text>\
                 </svg>\n"
            );
        }

        let light = {
            let l = [0.3_f64, -0.5, 0.8];
            let n = (l[0] * l[0] + l[1] * l[1] + l[2] * l[2]).sqrt();
            [l[0] / n, l[1] / n, l[2] / n]
        };

        let mut facets = Vec::with_capacity(plot.triangle_count());
        let (mut min_x, mut max_x) = (f64::MAX, f64::MIN);
        let (mut min_y, mut max_y) = (f64::MAX, f64::MIN);

        for layer in &plot.layers {
            let color = match layer.kind {
                LayerKind::IsoShell { level } => level_color(level),
                LayerKind::Robot => (150, 150, 160),
            };
            let mesh = &layer.mesh;
            for tri in mesh.indices.chunks_exact(3) {
                let v = [
                    mesh.vertex(tri[0] as usize),
                    mesh.vertex(tri[1] as usize),
                    mesh.vertex(tri[2] as usize),
                ];
                let a = [v[1][0] - v[0][0], v[1][1] - v[0][1], v[1][2] - v[0][2]];
                let b = [v[2][0] - v[0][0], v[2][1] - v[0][1], v[2][2] - v[0][2]];
                let n = [
                    a[1] * b[2] - a[2] * b[1],
                    a[2] * b[0] - a[0] * b[2],
                    a[0] * b[1] - a[1] * b[0],
                ];
                let len = (n[0] * n[0] + n[1] * n[1] + n[2] * n[2]).sqrt().max(1e-12);
                let dot = (n[0] * light[0] + n[1] * light[1] + n[2] * light[2]) / len;

                let mut points = [(0.0, 0.0); 3];
                let mut depth = 0.0;
                for (slot, p) in points.iter_mut().zip(v) {
                    let (px, py, d) = project(p);
                    *slot = (px, py);
                    depth += d / 3.0;
                    min_x = min_x.min(px);
                    max_x = max_x.max(px);
                    min_y = min_y.min(py);
                    max_y = max_y.max(py);
                }

                facets.push(Facet {
                    points,
                    depth,
                    brightness: 0.3 + 0.7 * dot.abs().min(1.0),
                    color,
                    opacity: layer.opacity,
                });
            }
        }

        facets.sort_by(|a, b| b.depth.total_cmp(&a.depth));

        let padding = 40.0;
        let avail_w = width - 2.0 * padding;
        let avail_h = height - 2.0 * padding - 25.0;
        let data_w = (max_x - min_x).max(0.001);
        let data_h = (max_y - min_y).max(0.001);
        let scale = (avail_w / data_w).min(avail_h / data_h);
        let offset_x = padding + (avail_w - data_w * scale) / 2.0;
        let offset_y = padding + 25.0 + (avail_h - data_h * scale) / 2.0;
        let tx = |px: f64| (px - min_x) * scale + offset_x;
        let ty = |py: f64| (py - min_y) * scale + offset_y;

        let stroke_width = if facets.len() > 2000 { 0.0 } else { 0.2 };
        let mut svg = format!(
            "<svg xmlns=\"http://www.w3.org/2000/svg\" width=\"{width}\" height=\"{height}\" style=\"background:#1a1a2e\">\n\
             <text x=\"{}\" y=\"20\" font-family=\"monospace\" font-size=\"13\" fill=\"#8892b0\" text-anchor=\"middle\">{title}</text>\n",
            width / 2.0
        );

        for f in &facets {
            let [(x0, y0), (x1, y1), (x2, y2)] = f.points;
            let (r, g, b) = f.color;
            let shade = |c: u8| (c as f64 * f.brightness) as u8;
            let _ = writeln!(
                svg,
                "  <polygon points=\"{:.1},{:.1} {:.1},{:.1} {:.1},{:.1}\" fill=\"rgb({},{},{})\" \
                 fill-opacity=\"{:.3}\" stroke=\"#222240\" stroke-width=\"{stroke_width}\"/>",
                tx(x0),
                ty(y0),
                tx(x1),
                ty(y1),
                tx(x2),
                ty(y2),
                shade(r),
                shade(g),
                shade(b),
                f.opacity,
            );
        }

        let _ = writeln!(
            svg,
            "  <text x=\"{}\" y=\"{}\" font-family=\"monospace\" font-size=\"10\" fill=\"#5a6080\" \
             text-anchor=\"middle\">{} layers, {} triangles, grid {}x{}x{}</text>",
            width / 2.0,
            height - 8.0,
            plot.layers.len(),
            facets.len(),
            plot.shape[0],
            plot.shape[1],
            plot.shape[2],
        );
        svg.push_str("</svg>\n");
        svg
    }
}
