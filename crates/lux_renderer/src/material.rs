//! Surface appearance and scattering probabilities.

use lux_math::{Direction, Vec3};

/// Linear RGB radiance or reflectance.
pub type Color = Vec3;

/// Upper bound on the summed diffuse + specular + transparency probability.
///
/// The remaining mass is the absorption probability, so every random walk
/// terminates with probability at least `1 - MAX_SCATTER_PROBABILITY`.
pub const MAX_SCATTER_PROBABILITY: f32 = 0.9;

/// Surface description shared by every primitive.
///
/// The three event probabilities are derived once at construction from the
/// lobe colours and are never stored independently of them.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Material {
    diffuse: Color,
    specular: Color,
    transparency: Color,
    emission: Color,
    refractive_index: f32,
    p_diffuse: f32,
    p_specular: f32,
    p_transparency: f32,
}

impl Material {
    pub fn new(diffuse: Color, specular: Color, transparency: Color, refractive_index: f32) -> Self {
        let diffuse = diffuse.max(Color::ZERO);
        let specular = specular.max(Color::ZERO);
        let transparency = transparency.max(Color::ZERO);

        let mut p_diffuse = diffuse.max_element();
        let mut p_specular = specular.max_element();
        let mut p_transparency = transparency.max_element();

        let total = p_diffuse + p_specular + p_transparency;
        if total > MAX_SCATTER_PROBABILITY {
            let scale = MAX_SCATTER_PROBABILITY / total;
            p_diffuse *= scale;
            p_specular *= scale;
            p_transparency *= scale;
        }

        Self {
            diffuse,
            specular,
            transparency,
            emission: Color::ZERO,
            refractive_index: refractive_index.max(1.0),
            p_diffuse,
            p_specular,
            p_transparency,
        }
    }

    /// Pure Lambertian surface.
    pub fn lambertian(albedo: Color) -> Self {
        Self::new(albedo, Color::ZERO, Color::ZERO, 1.0)
    }

    /// Perfect mirror.
    pub fn mirror(reflectance: Color) -> Self {
        Self::new(Color::ZERO, reflectance, Color::ZERO, 1.0)
    }

    /// Clear dielectric with the given transmittance and index of refraction.
    pub fn glass(transmittance: Color, refractive_index: f32) -> Self {
        Self::new(Color::ZERO, Color::ZERO, transmittance, refractive_index)
    }

    /// Black surface that only emits.
    pub fn emissive(emission: Color) -> Self {
        Self::lambertian(Color::ZERO).with_emission(emission)
    }

    pub fn with_emission(mut self, emission: Color) -> Self {
        self.emission = emission.max(Color::ZERO);
        self
    }

    #[inline]
    pub fn diffuse(&self) -> Color {
        self.diffuse
    }

    #[inline]
    pub fn specular(&self) -> Color {
        self.specular
    }

    #[inline]
    pub fn transparency(&self) -> Color {
        self.transparency
    }

    #[inline]
    pub fn emission(&self) -> Color {
        self.emission
    }

    #[inline]
    pub fn refractive_index(&self) -> f32 {
        self.refractive_index
    }

    #[inline]
    pub fn p_diffuse(&self) -> f32 {
        self.p_diffuse
    }

    #[inline]
    pub fn p_specular(&self) -> f32 {
        self.p_specular
    }

    #[inline]
    pub fn p_transparency(&self) -> f32 {
        self.p_transparency
    }

    /// `(p_diffuse, p_specular, p_transparency)`
    #[inline]
    pub fn probabilities(&self) -> (f32, f32, f32) {
        (self.p_diffuse, self.p_specular, self.p_transparency)
    }

    /// Probability that a walk is absorbed at this surface.
    #[inline]
    pub fn p_absorb(&self) -> f32 {
        1.0 - self.p_diffuse - self.p_specular - self.p_transparency
    }

    #[inline]
    pub fn is_emissive(&self) -> bool {
        self.emission.max_element() > 0.0
    }

    /// Snell refraction of unit `incident` through this surface.
    ///
    /// `outward_normal` is the geometric normal and `front_face` tells
    /// whether the ray arrives from outside. Returns `None` on total
    /// internal reflection.
    pub fn refract(
        &self,
        incident: Direction,
        outward_normal: Direction,
        front_face: bool,
    ) -> Option<Direction> {
        let (normal, eta) = if front_face {
            (outward_normal, 1.0 / self.refractive_index)
        } else {
            (-outward_normal, self.refractive_index)
        };

        let cos_i = (-incident.dot(normal)).min(1.0);
        let sin2_t = eta * eta * (1.0 - cos_i * cos_i);
        if sin2_t > 1.0 {
            return None;
        }

        let cos_t = (1.0 - sin2_t).sqrt();
        (incident * eta + normal * (eta * cos_i - cos_t)).normalize().ok()
    }
}

impl Default for Material {
    fn default() -> Self {
        Self::lambertian(Color::splat(0.5))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_probabilities_follow_max_component() {
        let m = Material::new(
            Color::new(0.2, 0.4, 0.1),
            Color::new(0.1, 0.0, 0.0),
            Color::ZERO,
            1.0,
        );
        assert!((m.p_diffuse() - 0.4).abs() < 1e-6);
        assert!((m.p_specular() - 0.1).abs() < 1e-6);
        assert_eq!(m.p_transparency(), 0.0);
        assert!((m.p_absorb() - 0.5).abs() < 1e-6);
    }

    #[test]
    fn test_probabilities_are_capped() {
        let m = Material::new(Color::ONE, Color::ONE, Color::splat(0.5), 1.5);
        let (pd, ps, pt) = m.probabilities();
        assert!(pd + ps + pt <= MAX_SCATTER_PROBABILITY + 1e-6);
        // Ratios survive the rescale
        assert!((pd - ps).abs() < 1e-6);
        assert!((pd - 2.0 * pt).abs() < 1e-6);
    }

    #[test]
    fn test_negative_reflectance_is_clamped() {
        let m = Material::lambertian(Color::new(-1.0, 0.5, 0.5));
        assert_eq!(m.diffuse(), Color::new(0.0, 0.5, 0.5));
        assert!(m.p_absorb() >= 0.0);
    }

    #[test]
    fn test_emissive() {
        assert!(!Material::default().is_emissive());
        let light = Material::emissive(Color::splat(4.0));
        assert!(light.is_emissive());
        assert_eq!(light.emission(), Color::splat(4.0));
    }

    #[test]
    fn test_refract_straight_through() {
        let glass = Material::glass(Color::ONE, 1.5);
        let down = Direction::new(0.0, -1.0, 0.0);
        let refracted = glass.refract(down, Direction::Y, true).unwrap();
        assert!((refracted - down).length() < 1e-5);
    }

    #[test]
    fn test_refract_bends_towards_normal() {
        let glass = Material::glass(Color::ONE, 1.5);
        let incident = Direction::new(1.0, -1.0, 0.0).normalize().unwrap();
        let refracted = glass.refract(incident, Direction::Y, true).unwrap();
        assert!(refracted.is_unit(1e-5));
        // sin(theta_t) = sin(45deg) / 1.5
        let expected_sin = std::f32::consts::FRAC_1_SQRT_2 / 1.5;
        assert!((refracted.x() - expected_sin).abs() < 1e-5);
        assert!(refracted.y() < 0.0);
    }

    #[test]
    fn test_total_internal_reflection() {
        let glass = Material::glass(Color::ONE, 1.5);
        // Leaving the glass at a grazing angle
        let incident = Direction::new(0.9, 0.2, 0.0).normalize().unwrap();
        assert!(glass.refract(incident, Direction::Y, false).is_none());
    }
}
