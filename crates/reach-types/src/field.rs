use std::ops::Range;

use serde::{Deserialize, Serialize};

/// Affine map from base-relative positions to voxel coordinates:
/// `voxel = position * scale + offset`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PointScale {
    pub scale: f64,
    pub offset: f64,
}

impl PointScale {
    pub fn new(scale: f64, offset: f64) -> Self {
        Self { scale, offset }
    }

    pub fn to_voxel(&self, p: [f64; 3]) -> [f64; 3] {
        [
            p[0] * self.scale + self.offset,
            p[1] * self.scale + self.offset,
            p[2] * self.scale + self.offset,
        ]
    }

    pub fn from_voxel(&self, v: [f64; 3]) -> [f64; 3] {
        [
            (v[0] - self.offset) / self.scale,
            (v[1] - self.offset) / self.scale,
            (v[2] - self.offset) / self.scale,
        ]
    }
}

/// Dense 3D scalar field in row-major order (z varies fastest).
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct DensityField {
    pub shape: [usize; 3],
    pub values: Vec<f64>,
}

impl DensityField {
    pub fn zeros(shape: [usize; 3]) -> Self {
        Self {
            shape,
            values: vec![0.0; shape[0] * shape[1] * shape[2]],
        }
    }

    /// Wrap existing values. Returns `None` if the length does not match the shape.
    pub fn from_values(shape: [usize; 3], values: Vec<f64>) -> Option<Self> {
        (values.len() == shape[0] * shape[1] * shape[2]).then_some(Self { shape, values })
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn flat_index(&self, [i, j, k]: [usize; 3]) -> Option<usize> {
        if i < self.shape[0] && j < self.shape[1] && k < self.shape[2] {
            Some((i * self.shape[1] + j) * self.shape[2] + k)
        } else {
            None
        }
    }

    pub fn voxel_of(&self, index: usize) -> [usize; 3] {
        let k = index % self.shape[2];
        let j = (index / self.shape[2]) % self.shape[1];
        let i = index / (self.shape[1] * self.shape[2]);
        [i, j, k]
    }

    pub fn get(&self, voxel: [usize; 3]) -> Option<f64> {
        self.flat_index(voxel).map(|idx| self.values[idx])
    }

    pub fn max_value(&self) -> Option<f64> {
        self.values.iter().copied().reduce(f64::max)
    }

    /// Number of voxels with a strictly positive value.
    pub fn nonzero_count(&self) -> usize {
        self.values.iter().filter(|v| **v > 0.0).count()
    }

    /// Multiply every value by `factor` and clamp into `[0, 1]`.
    pub fn scaled_clamped(&self, factor: f64) -> Self {
        Self {
            shape: self.shape,
            values: self
                .values
                .iter()
                .map(|v| (v * factor).clamp(0.0, 1.0))
                .collect(),
        }
    }

    /// Extract the x-planes in `range`, padded with one zero plane on each side.
    ///
    /// The range is clipped to the field; an empty selection yields just the
    /// two padding planes.
    pub fn slab_x(&self, range: Range<usize>) -> Self {
        let start = range.start.min(self.shape[0]);
        let end = range.end.min(self.shape[0]).max(start);
        let plane = self.shape[1] * self.shape[2];
        let nx = end - start + 2;

        let mut values = Vec::with_capacity(nx * plane);
        values.extend(std::iter::repeat(0.0).take(plane));
        values.extend_from_slice(&self.values[start * plane..end * plane]);
        values.extend(std::iter::repeat(0.0).take(plane));

        Self {
            shape: [nx, self.shape[1], self.shape[2]],
            values,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn index_and_voxel_are_inverse() {
        let field = DensityField::zeros([3, 4, 5]);
        for idx in 0..field.len() {
            let voxel = field.voxel_of(idx);
            assert_eq!(field.flat_index(voxel), Some(idx));
        }
        assert_eq!(field.flat_index([3, 0, 0]), None);
    }

    #[test]
    fn z_varies_fastest() {
        let field = DensityField::zeros([2, 2, 2]);
        assert_eq!(field.flat_index([0, 0, 1]), Some(1));
        assert_eq!(field.flat_index([0, 1, 0]), Some(2));
        assert_eq!(field.flat_index([1, 0, 0]), Some(4));
    }

    #[test]
    fn scaled_clamped_stays_in_unit_interval() {
        let field = DensityField::from_values([1, 1, 4], vec![0.0, 0.2, 0.6, 3.0]).unwrap();
        let scaled = field.scaled_clamped(2.0);
        assert_eq!(scaled.values, vec![0.0, 0.4, 1.0, 1.0]);
    }

    #[test]
    fn slab_pads_both_sides() {
        let values: Vec<f64> = (0..8).map(|v| v as f64).collect();
        let field = DensityField::from_values([4, 1, 2], values).unwrap();
        let slab = field.slab_x(1..3);
        assert_eq!(slab.shape, [4, 1, 2]);
        assert_eq!(slab.values, vec![0.0, 0.0, 2.0, 3.0, 4.0, 5.0, 0.0, 0.0]);
    }

    #[test]
    fn from_values_rejects_wrong_length() {
        assert!(DensityField::from_values([2, 2, 2], vec![0.0; 7]).is_none());
    }

    #[test]
    fn point_scale_round_trip() {
        let ps = PointScale::new(4.0, 10.0);
        let v = ps.to_voxel([0.25, -0.5, 0.0]);
        assert_eq!(v, [11.0, 8.0, 10.0]);
        assert_eq!(ps.from_voxel(v), [0.25, -0.5, 0.0]);
    }
}
