//! Point light sources.

use crate::Color;
use lux_math::Point;
use std::fmt;

/// Isotropic point light. `power` is the radiant intensity per channel.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PointLight {
    pub position: Point,
    pub power: Color,
}

impl PointLight {
    pub fn new(position: Point, power: Color) -> Self {
        Self { position, power }
    }

    /// White light of the given intensity.
    pub fn white(position: Point, intensity: f32) -> Self {
        Self::new(position, Color::splat(intensity))
    }

    /// Largest channel of `power`. Photon budgets are split by this value.
    pub fn peak_power(&self) -> f32 {
        self.power.max_element().max(0.0)
    }
}

impl fmt::Display for PointLight {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "PointLight(position: {}, power: ({}, {}, {}))",
            self.position, self.power.x, self.power.y, self.power.z
        )
    }
}
