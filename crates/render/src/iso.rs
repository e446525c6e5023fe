use nalgebra::Vector3;
use reach_types::{DensityField, TriangleMesh};

/// Closed surface around every voxel with value `>= level`.
///
/// Voxel `[i, j, k]` is the unit cube centred on `(i, j, k)`. A face is
/// emitted wherever an inside voxel meets an outside voxel or the edge of the
/// grid, wound counter-clockwise seen from outside.
pub fn extract_iso_shell(field: &DensityField, level: f64) -> TriangleMesh {
    let mut mesh = TriangleMesh::new();
    let inside = |v: [i64; 3]| -> bool {
        if v.iter().any(|c| *c < 0) {
            return false;
        }
        field
            .get([v[0] as usize, v[1] as usize, v[2] as usize])
            .is_some_and(|d| d >= level)
    };

    for (idx, value) in field.values.iter().enumerate() {
        if *value < level {
            continue;
        }
        let [i, j, k] = field.voxel_of(idx);
        let cell = [i as i64, j as i64, k as i64];
        for axis in 0..3 {
            for sign in [1i64, -1] {
                let mut neighbour = cell;
                neighbour[axis] += sign;
                if !inside(neighbour) {
                    mesh.add_quad(face_corners(cell, axis, sign));
                }
            }
        }
    }
    mesh
}

fn face_corners(cell: [i64; 3], axis: usize, sign: i64) -> [[f64; 3]; 4] {
    let u = (axis + 1) % 3;
    let v = (axis + 2) % 3;
    let center = cell.map(|c| c as f64);
    let corner = |du: f64, dv: f64| {
        let mut p = center;
        p[axis] += 0.5 * sign as f64;
        p[u] += du;
        p[v] += dv;
        p
    };
    let quad = [
        corner(-0.5, -0.5),
        corner(0.5, -0.5),
        corner(0.5, 0.5),
        corner(-0.5, 0.5),
    ];
    if sign > 0 {
        quad
    } else {
        [quad[3], quad[2], quad[1], quad[0]]
    }
}

/// Cube corner `c` sits at offset `(c & 1, (c >> 1) & 1, (c >> 2) & 1)`.
const CUBE_CORNERS: [[i64; 3]; 8] = [
    [0, 0, 0],
    [1, 0, 0],
    [0, 1, 0],
    [1, 1, 0],
    [0, 0, 1],
    [1, 0, 1],
    [0, 1, 1],
    [1, 1, 1],
];

/// Six tetrahedra sharing the 0-7 diagonal. Neighbouring cubes split their
/// shared face along the same diagonal, so the surface has no cracks.
const CUBE_TETRAHEDRA: [[usize; 4]; 6] = [
    [0, 1, 3, 7],
    [0, 3, 2, 7],
    [0, 2, 6, 7],
    [0, 6, 4, 7],
    [0, 4, 5, 7],
    [0, 5, 1, 7],
];

/// Interpolated iso-surface at `level` (marching tetrahedra).
///
/// Samples sit at integer voxel coordinates and everything outside the grid
/// reads as zero, so the surface is closed. Triangles are wound
/// counter-clockwise seen from the low side. Zero-area triangles, which
/// appear where a sample equals `level` exactly, are dropped.
pub fn extract_iso_surface(field: &DensityField, level: f64) -> TriangleMesh {
    let mut mesh = TriangleMesh::new();
    let [nx, ny, nz] = field.shape.map(|n| n as i64);
    let sample = |[i, j, k]: [i64; 3]| -> f64 {
        if i < 0 || j < 0 || k < 0 {
            return 0.0;
        }
        field
            .get([i as usize, j as usize, k as usize])
            .unwrap_or(0.0)
    };

    for i in -1..nx {
        for j in -1..ny {
            for k in -1..nz {
                let corners = CUBE_CORNERS.map(|[di, dj, dk]| [i + di, j + dj, k + dk]);
                let values = corners.map(sample);
                let above = values.iter().filter(|v| **v >= level).count();
                if above == 0 || above == 8 {
                    continue;
                }
                let points = corners.map(|c| Vector3::new(c[0] as f64, c[1] as f64, c[2] as f64));
                for tet in &CUBE_TETRAHEDRA {
                    march_tetrahedron(&mut mesh, tet, &points, &values, level);
                }
            }
        }
    }
    mesh
}

fn march_tetrahedron(
    mesh: &mut TriangleMesh,
    tet: &[usize; 4],
    points: &[Vector3<f64>; 8],
    values: &[f64; 8],
    level: f64,
) {
    let (inside, outside): (Vec<usize>, Vec<usize>) =
        tet.iter().partition(|&&c| values[c] >= level);
    let cut = |a: usize, b: usize| {
        let t = (level - values[a]) / (values[b] - values[a]);
        points[a] + (points[b] - points[a]) * t
    };

    let polygon: Vec<Vector3<f64>> = match (inside.as_slice(), outside.as_slice()) {
        (&[a], out) => out.iter().map(|&o| cut(a, o)).collect(),
        (ins, &[o]) if ins.len() == 3 => ins.iter().map(|&a| cut(a, o)).collect(),
        (&[a, b], &[c, d]) => vec![cut(a, c), cut(a, d), cut(b, d), cut(b, c)],
        _ => return,
    };

    let centroid = |corners: &[usize]| {
        corners.iter().map(|&c| points[c]).sum::<Vector3<f64>>() / corners.len() as f64
    };
    let outward = centroid(&outside) - centroid(&inside);

    for w in 1..polygon.len() - 1 {
        let (p0, mut p1, mut p2) = (polygon[0], polygon[w], polygon[w + 1]);
        let normal = (p1 - p0).cross(&(p2 - p0));
        if normal.norm_squared() <= f64::EPSILON * f64::EPSILON {
            continue;
        }
        if normal.dot(&outward) < 0.0 {
            std::mem::swap(&mut p1, &mut p2);
        }
        let a = mesh.add_vertex(p0.into());
        let b = mesh.add_vertex(p1.into());
        let c = mesh.add_vertex(p2.into());
        mesh.add_triangle(a, b, c);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn field_with(shape: [usize; 3], hot: &[([usize; 3], f64)]) -> DensityField {
        let mut field = DensityField::zeros(shape);
        for (voxel, value) in hot {
            if let Some(idx) = field.flat_index(*voxel) {
                field.values[idx] = *value;
            }
        }
        field
    }

    fn signed_volume(mesh: &TriangleMesh) -> f64 {
        (0..mesh.triangle_count())
            .map(|t| {
                let a = mesh.vertex(mesh.indices[t * 3] as usize);
                let b = mesh.vertex(mesh.indices[t * 3 + 1] as usize);
                let c = mesh.vertex(mesh.indices[t * 3 + 2] as usize);
                (a[0] * (b[1] * c[2] - b[2] * c[1]) - a[1] * (b[0] * c[2] - b[2] * c[0])
                    + a[2] * (b[0] * c[1] - b[1] * c[0]))
                    / 6.0
            })
            .sum()
    }

    #[test]
    fn single_hot_voxel_is_a_cube() {
        let field = field_with([3, 3, 3], &[([1, 1, 1], 1.0)]);
        let mesh = extract_iso_shell(&field, 0.5);
        assert_eq!(mesh.triangle_count(), 12);
        assert!((signed_volume(&mesh) - 1.0).abs() < 1e-6);
    }

    #[test]
    fn shared_faces_are_culled() {
        let field = field_with([4, 3, 3], &[([1, 1, 1], 1.0), ([2, 1, 1], 1.0)]);
        let mesh = extract_iso_shell(&field, 0.5);
        // 2x1x1 box: 10 unit faces
        assert_eq!(mesh.triangle_count(), 20);
        assert!((signed_volume(&mesh) - 2.0).abs() < 1e-6);
    }

    #[test]
    fn grid_boundary_closes_the_shell() {
        let field = field_with([1, 1, 1], &[([0, 0, 0], 0.9)]);
        assert_eq!(extract_iso_shell(&field, 0.5).triangle_count(), 12);
    }

    #[test]
    fn level_is_inclusive() {
        let field = field_with([3, 3, 3], &[([1, 1, 1], 0.5)]);
        assert_eq!(extract_iso_shell(&field, 0.5).triangle_count(), 12);
        assert!(extract_iso_shell(&field, 0.51).is_empty());
    }

    fn is_closed(mesh: &TriangleMesh) -> bool {
        use std::collections::HashMap;
        let key = |i: u32| mesh.vertex(i as usize).map(|c| (c * 1e5).round() as i64);
        let mut edges: HashMap<([i64; 3], [i64; 3]), i32> = HashMap::new();
        for tri in mesh.indices.chunks(3) {
            for (u, v) in [(tri[0], tri[1]), (tri[1], tri[2]), (tri[2], tri[0])] {
                *edges.entry((key(u), key(v))).or_default() += 1;
                *edges.entry((key(v), key(u))).or_default() -= 1;
            }
        }
        edges.values().all(|n| *n == 0)
    }

    #[test]
    fn smooth_single_voxel_is_closed_and_outward() {
        let field = field_with([3, 3, 3], &[([1, 1, 1], 1.0)]);
        let mesh = extract_iso_surface(&field, 0.5);
        assert_eq!(mesh.triangle_count(), 24);
        assert!((signed_volume(&mesh) - 0.5).abs() < 1e-6);
        assert!(is_closed(&mesh));
    }

    #[test]
    fn smooth_surface_closes_at_grid_edge() {
        let field = field_with([1, 1, 1], &[([0, 0, 0], 0.9)]);
        let mesh = extract_iso_surface(&field, 0.5);
        assert!(is_closed(&mesh));
        assert!(signed_volume(&mesh) > 0.0);
    }

    #[test]
    fn smooth_surface_of_a_cone_field_approximates_a_sphere() {
        let n = 21;
        let mut field = DensityField::zeros([n, n, n]);
        for idx in 0..field.len() {
            let [i, j, k] = field.voxel_of(idx).map(|c| c as f64 - 10.0);
            let r = (i * i + j * j + k * k).sqrt();
            field.values[idx] = (1.0 - r / 10.0).max(0.0);
        }
        let mesh = extract_iso_surface(&field, 0.5);
        let sphere = 4.0 / 3.0 * std::f64::consts::PI * 125.0;
        let volume = signed_volume(&mesh);
        assert!((volume - sphere).abs() / sphere < 0.05, "volume {volume}");
        assert!(is_closed(&mesh));
    }

    #[test]
    fn smooth_surface_below_every_sample_is_empty() {
        let field = field_with([3, 3, 3], &[([1, 1, 1], 0.5)]);
        assert!(extract_iso_surface(&field, 0.51).is_empty());
        // touching the level exactly encloses no area
        assert!(extract_iso_surface(&field, 0.5).is_empty());
    }
}
