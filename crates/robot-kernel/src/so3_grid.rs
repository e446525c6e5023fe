//! Deterministic, approximately uniform SO(3) grids.
//!
//! Rotations are parameterized with Hopf coordinates `(theta, phi, psi)`:
//! `(theta, phi)` come from a HEALPix grid on S^2 and `psi` from a regular
//! grid on S^1. Level `l` uses HEALPix `nside = 2^l` (`12 * 4^l` pixels) and
//! `6 * 2^l` circle points, giving `72 * 8^l` rotations. Each level roughly
//! halves the nearest-neighbour spacing.

use std::f64::consts::{FRAC_PI_2, PI};

use nalgebra::{Quaternion, UnitQuaternion};
use tracing::debug;

use crate::traits::RotationSampler;

/// Default rotation sampling service backed by the Hopf fibration grid.
#[derive(Debug, Clone, Copy, Default)]
pub struct HopfGridSampler;

impl HopfGridSampler {
    pub fn new() -> Self {
        Self
    }

    /// Number of rotations produced at `level`.
    pub fn sample_count(level: u32) -> usize {
        72 * 8usize.pow(level)
    }
}

impl RotationSampler for HopfGridSampler {
    fn sample_so3(&self, level: u32) -> Vec<UnitQuaternion<f64>> {
        let nside = 1u64 << level;
        let npix = 12 * nside * nside;
        let ncircle = 6 * nside;

        let mut out = Vec::with_capacity(Self::sample_count(level));
        for pix in 0..npix {
            let (theta, phi) = healpix_ring_center(nside, pix);
            for k in 0..ncircle {
                let psi = (k as f64 + 0.5) * 2.0 * PI / ncircle as f64;
                out.push(hopf_to_quaternion(theta, phi, psi));
            }
        }
        debug!(level, samples = out.len(), "sampled SO(3) grid");
        out
    }
}

/// Map Hopf coordinates to a unit quaternion (scalar first).
fn hopf_to_quaternion(theta: f64, phi: f64, psi: f64) -> UnitQuaternion<f64> {
    let (ct, st) = ((theta / 2.0).cos(), (theta / 2.0).sin());
    let w = ct * (psi / 2.0).cos();
    let x = ct * (psi / 2.0).sin();
    let y = st * (phi + psi / 2.0).cos();
    let z = st * (phi + psi / 2.0).sin();
    UnitQuaternion::new_normalize(Quaternion::new(w, x, y, z))
}

fn isqrt(v: u64) -> u64 {
    let mut r = (v as f64).sqrt() as u64;
    while r * r > v {
        r -= 1;
    }
    while (r + 1) * (r + 1) <= v {
        r += 1;
    }
    r
}

/// Center `(theta, phi)` of HEALPix pixel `ipix` in the RING scheme.
fn healpix_ring_center(nside: u64, ipix: u64) -> (f64, f64) {
    let npix = 12 * nside * nside;
    let ncap = 2 * nside * (nside - 1);
    let nsf = nside as f64;

    let (z, phi) = if ipix < ncap {
        // North polar cap
        let iring = (1 + isqrt(1 + 2 * ipix)) / 2;
        let iphi = ipix + 1 - 2 * iring * (iring - 1);
        let ir = iring as f64;
        let z = 1.0 - ir * ir / (3.0 * nsf * nsf);
        let phi = (iphi as f64 - 0.5) * FRAC_PI_2 / ir;
        (z, phi)
    } else if ipix < npix - ncap {
        // Equatorial belt
        let ip = ipix - ncap;
        let iring = ip / (4 * nside) + nside;
        let iphi = ip % (4 * nside) + 1;
        let fodd = if (iring + nside) % 2 == 1 { 1.0 } else { 0.5 };
        let z = (2 * nside - iring) as f64 * 2.0 / (3.0 * nsf);
        let phi = (iphi as f64 - fodd) * PI / (2.0 * nsf);
        (z, phi)
    } else {
        // South polar cap
        let ip = npix - ipix;
        let iring = (1 + isqrt(2 * ip - 1)) / 2;
        let iphi = 4 * iring + 1 - (ip - 2 * iring * (iring - 1));
        let ir = iring as f64;
        let z = -1.0 + ir * ir / (3.0 * nsf * nsf);
        let phi = (iphi as f64 - 0.5) * FRAC_PI_2 / ir;
        (z, phi)
    };

    (z.clamp(-1.0, 1.0).acos(), phi)
}
