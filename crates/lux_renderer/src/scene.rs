//! Scene container: primitives, point lights and a background colour.

use crate::photon::{trace_photon, Photon, PhotonMap};
use crate::primitive::{Intersection, HIT_EPSILON};
use crate::sampling::{stream_rng, uniform_sphere};
use crate::{Color, Material, PointLight, Primitive};
use lux_math::{Direction, Interval, Point, Ray, EPSILON};
use rayon::prelude::*;
use std::f32::consts::PI;

/// Photon paths traced per parallel work item.
const PHOTON_BATCH: usize = 4096;

/// Stable index of a primitive inside its scene.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PrimitiveHandle(pub usize);

/// Stable index of a light inside its scene.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct LightHandle(pub usize);

/// Everything a ray can interact with.
///
/// Read-only during a render, so it is shared across workers by reference.
#[derive(Debug, Clone, Default)]
pub struct Scene {
    primitives: Vec<Primitive>,
    lights: Vec<PointLight>,
    background: Color,
}

impl Scene {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_object(&mut self, primitive: impl Into<Primitive>) -> PrimitiveHandle {
        self.primitives.push(primitive.into());
        PrimitiveHandle(self.primitives.len() - 1)
    }

    pub fn add_light(&mut self, light: PointLight) -> LightHandle {
        self.lights.push(light);
        LightHandle(self.lights.len() - 1)
    }

    pub fn set_background(&mut self, color: Color) {
        self.background = color;
    }

    pub fn with_background(mut self, color: Color) -> Self {
        self.background = color;
        self
    }

    pub fn primitive(&self, handle: PrimitiveHandle) -> Option<&Primitive> {
        self.primitives.get(handle.0)
    }

    pub fn light(&self, handle: LightHandle) -> Option<&PointLight> {
        self.lights.get(handle.0)
    }

    pub fn primitives(&self) -> &[Primitive] {
        &self.primitives
    }

    pub fn lights(&self) -> &[PointLight] {
        &self.lights
    }

    pub fn background(&self) -> Color {
        self.background
    }

    /// Closest hit along `ray` no farther than `max_distance`.
    pub fn intersect(&self, ray: &Ray, max_distance: f32) -> Option<Intersection> {
        let mut closest_so_far = max_distance;
        let mut closest = None;

        for primitive in &self.primitives {
            if let Some(hit) = primitive.intersect_within(ray, Interval::new(HIT_EPSILON, closest_so_far)) {
                closest_so_far = hit.distance;
                closest = Some(hit);
            }
        }

        closest
    }

    /// True if anything blocks the segment from `from` to `to`.
    pub fn is_occluded(&self, from: Point, to: Point) -> bool {
        let offset = to - from;
        let distance = offset.length();
        let Ok(ray) = Ray::new(from, offset) else {
            return false;
        };
        self.intersect(&ray, distance - HIT_EPSILON).is_some()
    }

    /// Unshadowed irradiance-style light arriving at `point`:
    /// the sum of `power / d^2` over every visible light.
    ///
    /// Lights closer than `EPSILON` are skipped.
    pub fn direct_light(&self, point: Point) -> Color {
        self.visible_lights(point)
            .map(|(light, _, distance)| light.power / (distance * distance))
            .sum()
    }

    /// Diffuse radiance reflected at `point` from direct illumination.
    ///
    /// Each visible light contributes `power / d^2 * diffuse / pi * cos`,
    /// attenuated by `exp(-sigma * d^2)` when `medium_sigma > 0`.
    pub fn direct_lighting(
        &self,
        point: Point,
        normal: Direction,
        material: &Material,
        medium_sigma: f32,
    ) -> Color {
        let brdf = material.diffuse() / PI;
        self.visible_lights(point)
            .map(|(light, to_light, distance)| {
                let cos = normal.dot(to_light).max(0.0);
                let d2 = distance * distance;
                let mut contribution = light.power / d2 * brdf * cos;
                if medium_sigma > 0.0 {
                    contribution *= (-medium_sigma * d2).exp();
                }
                contribution
            })
            .sum()
    }

    /// Lights visible from `point`, with the unit direction and distance to each.
    fn visible_lights(&self, point: Point) -> impl Iterator<Item = (&PointLight, Direction, f32)> + '_ {
        self.lights.iter().filter_map(move |light| {
            let offset = light.position - point;
            let distance = offset.length();
            if distance < EPSILON {
                return None;
            }
            let to_light = offset / distance;
            let shadow = Ray::from_unit(point, to_light);
            if self.intersect(&shadow, distance - HIT_EPSILON).is_some() {
                return None;
            }
            Some((light, to_light, distance))
        })
    }

    /// Emit `n_paths` photon paths from the scene's lights and collect the
    /// indirect diffuse photons into a k-d tree.
    ///
    /// Paths are split across lights in proportion to their peak power, and
    /// each photon starts with `4 pi * power / paths_for_that_light`.
    /// The result depends only on the scene, `n_paths`, `medium_sigma` and
    /// `seed`.
    pub fn generate_photon_map(&self, n_paths: usize, medium_sigma: f32, seed: u64) -> PhotonMap {
        let Some(split) = self.photon_path_split(n_paths) else {
            log::warn!("No photons emitted: {} paths, no light with positive power", n_paths);
            return PhotonMap::empty();
        };

        // (light index, batch index, paths in batch, flux per photon)
        let mut batches = Vec::new();
        for (index, (light, &paths)) in self.lights.iter().zip(&split).enumerate() {
            if paths == 0 {
                continue;
            }
            let flux = light.power * (4.0 * PI / paths as f32);
            log::debug!("Light {} emits {} photon paths", index, paths);
            let mut remaining = paths;
            let mut batch = 0;
            while remaining > 0 {
                let count = remaining.min(PHOTON_BATCH);
                batches.push((index, batch, count, flux));
                remaining -= count;
                batch += 1;
            }
        }

        let photons: Vec<Photon> = batches
            .par_iter()
            .map(|&(index, batch, count, flux)| {
                let mut rng = stream_rng(seed, index as u64, batch as u64);
                let origin = self.lights[index].position;
                let mut stored = Vec::new();
                for _ in 0..count {
                    let ray = Ray::from_unit(origin, uniform_sphere(&mut rng));
                    trace_photon(self, ray, flux, medium_sigma, &mut rng, &mut stored);
                }
                stored
            })
            .collect::<Vec<_>>()
            .concat();

        log::info!(
            "Traced {} photon paths from {} lights, stored {} photons",
            split.iter().sum::<usize>(),
            self.lights.len(),
            photons.len()
        );

        PhotonMap::build(photons)
    }

    /// Paths per light, summing to exactly `n_paths`.
    ///
    /// Each light gets the floor of its power share and the last powered
    /// light takes the remainder. `None` when nothing would be emitted.
    fn photon_path_split(&self, n_paths: usize) -> Option<Vec<usize>> {
        let total_peak: f32 = self.lights.iter().map(PointLight::peak_power).sum();
        let last = self.lights.iter().rposition(|light| light.peak_power() > 0.0)?;
        if n_paths == 0 || total_peak <= 0.0 {
            return None;
        }

        let mut split: Vec<usize> = self
            .lights
            .iter()
            .map(|light| (n_paths as f32 * light.peak_power() / total_peak).floor() as usize)
            .collect();
        split[last] = 0;
        let assigned: usize = split.iter().sum();
        split[last] = n_paths.saturating_sub(assigned);
        Some(split)
    }
}
