use reach_render::{
    build_plot, ObjPlotter, PlotOptions, Plotter, RobotOverlay, SurfaceStyle, SvgPlotter,
};
use reach_types::{DensityField, PointScale, ReachabilityData, TriangleMesh};

fn hot_center() -> ReachabilityData {
    let mut density = DensityField::zeros([5, 5, 5]);
    let center = density.flat_index([2, 2, 2]).unwrap();
    density.values[center] = 1.0;
    ReachabilityData {
        stats: Vec::new(),
        density,
        point_scale: PointScale::new(4.0, 2.0),
        xyz_delta: 0.25,
        quat_delta: 0.0,
    }
}

fn stick() -> TriangleMesh {
    let mut mesh = TriangleMesh::new();
    mesh.add_quad([
        [0.0, 0.0, 0.0],
        [0.05, 0.0, 0.0],
        [0.05, 0.0, 0.5],
        [0.0, 0.0, 0.5],
    ]);
    mesh
}

#[test]
fn single_hot_voxel_gives_shell_per_contour() {
    let plot = build_plot(&hot_center(), None, &PlotOptions::default()).unwrap();
    assert_eq!(plot.layers.len(), 5);
    assert_eq!(plot.triangle_count(), 5 * 24);

    let voxels = PlotOptions {
        surface: SurfaceStyle::Voxels,
        ..PlotOptions::default()
    };
    let plot = build_plot(&hot_center(), None, &voxels).unwrap();
    assert_eq!(plot.triangle_count(), 5 * 12);
}

#[test]
fn svg_and_obj_files_are_written() {
    let dir = tempfile::tempdir().unwrap();
    let robot = stick();
    let overlay = RobotOverlay {
        mesh: &robot,
        base_anchor: [0.0, 0.0, 0.0],
    };
    let plot = build_plot(&hot_center(), Some(overlay), &PlotOptions::default()).unwrap();

    let svg_plotter = SvgPlotter::default();
    let plotters: [&dyn Plotter; 2] = [&svg_plotter, &ObjPlotter];
    for plotter in plotters {
        let path = dir
            .path()
            .join("plots")
            .join(format!("reachability.{}", plotter.extension()));
        plotter.write(&plot, "reference-arm / arm", &path).unwrap();
        let text = std::fs::read_to_string(&path).unwrap();
        assert!(!text.is_empty());
    }

    let svg = std::fs::read_to_string(dir.path().join("plots/reachability.svg")).unwrap();
    assert!(svg.contains("<svg"));
    assert_eq!(svg.matches("<polygon").count(), 5 * 24 + 2);

    let obj = std::fs::read_to_string(dir.path().join("plots/reachability.obj")).unwrap();
    assert_eq!(obj.lines().filter(|l| l.starts_with("o ")).count(), 6);
}
