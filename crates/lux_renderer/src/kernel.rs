//! Density estimation kernels for photon gathering.
//!
//! Every kernel is normalized over the disk of radius `R`:
//! `integral_0^R K(r, R) * 2 pi r dr = 1`, so a sum of photon flux
//! weighted by `K` estimates flux per unit area.

use serde::{Deserialize, Serialize};
use std::f32::consts::PI;

/// Normalization constant of the logistic kernel on the unit disk,
/// `1 / integral_0^1 2 pi s / (e^s + 2 + e^-s) ds`.
const LOGISTIC_NORM: f32 = 1.434_551_1;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Kernel {
    /// Constant weight (plain nearest-neighbour density)
    Box,
    Triangular,
    /// Gaussian with `sigma = R / 2`, truncated at `R`
    Gaussian,
    #[default]
    Epanechnikov,
    Quartic,
    Triweight,
    Tricube,
    Cosine,
    Logistic,
}

impl Kernel {
    pub const ALL: [Kernel; 9] = [
        Kernel::Box,
        Kernel::Triangular,
        Kernel::Gaussian,
        Kernel::Epanechnikov,
        Kernel::Quartic,
        Kernel::Triweight,
        Kernel::Tricube,
        Kernel::Cosine,
        Kernel::Logistic,
    ];

    /// Weight of a photon at `distance` for bandwidth `max_distance`.
    ///
    /// Zero outside the support and for a degenerate bandwidth.
    pub fn evaluate(self, distance: f32, max_distance: f32) -> f32 {
        if max_distance <= 0.0 || !(0.0..=max_distance).contains(&distance) {
            return 0.0;
        }

        let r2 = max_distance * max_distance;
        let s = distance / max_distance;
        let s2 = s * s;

        match self {
            Kernel::Box => 1.0 / (PI * r2),
            Kernel::Triangular => 3.0 / (PI * r2) * (1.0 - s),
            Kernel::Gaussian => {
                let norm = 2.0 / (PI * r2 * (1.0 - (-2.0f32).exp()));
                norm * (-2.0 * s2).exp()
            }
            Kernel::Epanechnikov => 2.0 / (PI * r2) * (1.0 - s2),
            Kernel::Quartic => 3.0 / (PI * r2) * (1.0 - s2).powi(2),
            Kernel::Triweight => 4.0 / (PI * r2) * (1.0 - s2).powi(3),
            Kernel::Tricube => 220.0 / (81.0 * PI * r2) * (1.0 - s2 * s).powi(3),
            Kernel::Cosine => PI / ((4.0 * PI - 8.0) * r2) * (0.5 * PI * s).cos(),
            Kernel::Logistic => LOGISTIC_NORM / r2 / (s.exp() + 2.0 + (-s).exp()),
        }
    }
}
