//! Light transport strategies.
//!
//! A strategy turns a primary ray into a radiance estimate. The renderer
//! only sees the `TransportStrategy` trait; `Algorithm::strategy` picks the
//! implementation.

use crate::sampling::{cosine_hemisphere, gen_f32};
use crate::{
    Algorithm, Camera, Color, Intersection, Kernel, Material, PhotonMap, RenderConfig, Scene,
    MAX_SCATTER_PROBABILITY,
};
use lux_math::{Direction, Point, Ray, EPSILON};
use rand::RngCore;
use std::f32::consts::PI;

/// Default bounce limit for path tracing and specular chains.
pub const MAX_PATH_DEPTH: u32 = 20;

/// Bounce index from which path tracing applies Russian roulette.
pub const RUSSIAN_ROULETTE_DEPTH: u32 = 3;

pub trait TransportStrategy: Send + Sync {
    fn name(&self) -> &'static str;

    /// Radiance arriving along `ray`.
    fn radiance(
        &self,
        ray: &Ray,
        scene: &Scene,
        config: &RenderConfig,
        rng: &mut dyn RngCore,
    ) -> Color;

    /// Average radiance of `samples` jittered rays through pixel `(x, y)`.
    fn calculate_pixel_color(
        &self,
        camera: &Camera,
        scene: &Scene,
        x: u32,
        y: u32,
        samples: u32,
        config: &RenderConfig,
        rng: &mut dyn RngCore,
    ) -> Color {
        let samples = samples.max(1);
        let width = camera.width() as f32;
        let height = camera.height() as f32;

        let mut sum = Color::ZERO;
        for _ in 0..samples {
            let u = (x as f32 + gen_f32(rng)) / width;
            let v = (y as f32 + gen_f32(rng)) / height;
            let ray = camera.generate_ray(u, v);
            sum += self.radiance(&ray, scene, config, rng);
        }
        sum / samples as f32
    }
}

impl Algorithm {
    pub fn strategy(self) -> Box<dyn TransportStrategy> {
        match self {
            Algorithm::RayTracing => Box::new(RayTracing),
            Algorithm::PathTracing => Box::new(PathTracing),
            Algorithm::PhotonMapping => Box::new(PhotonMapping),
        }
    }
}

/// Direction of a refracted ray, or the mirror direction on total internal
/// reflection.
fn transmit(ray: &Ray, hit: &Intersection) -> Direction {
    hit.material
        .refract(ray.direction(), hit.normal, hit.front_face)
        .unwrap_or_else(|| ray.direction().reflect(hit.facing_normal()))
}

/// Direct illumination only.
#[derive(Debug, Clone, Copy, Default)]
pub struct RayTracing;

impl TransportStrategy for RayTracing {
    fn name(&self) -> &'static str {
        "ray tracing"
    }

    fn radiance(
        &self,
        ray: &Ray,
        scene: &Scene,
        _config: &RenderConfig,
        _rng: &mut dyn RngCore,
    ) -> Color {
        match scene.intersect(ray, f32::INFINITY) {
            None => scene.background(),
            Some(hit) if hit.material.is_emissive() => hit.material.emission(),
            Some(hit) => scene.direct_lighting(hit.point, hit.facing_normal(), &hit.material, 0.0),
        }
    }
}

/// Monte Carlo path tracing with next-event estimation on diffuse bounces.
#[derive(Debug, Clone, Copy, Default)]
pub struct PathTracing;

impl TransportStrategy for PathTracing {
    fn name(&self) -> &'static str {
        "path tracing"
    }

    fn radiance(
        &self,
        ray: &Ray,
        scene: &Scene,
        config: &RenderConfig,
        rng: &mut dyn RngCore,
    ) -> Color {
        let mut radiance = Color::ZERO;
        let mut throughput = Color::ONE;
        let mut ray = *ray;

        for depth in 0..config.max_depth {
            let Some(hit) = scene.intersect(&ray, f32::INFINITY) else {
                radiance += throughput * scene.background();
                break;
            };

            let material = hit.material;
            if material.is_emissive() {
                radiance += throughput * material.emission();
                break;
            }

            let normal = hit.facing_normal();
            let (pd, ps, pt) = material.probabilities();
            let xi = gen_f32(rng);

            let (direction, weight, lobe) = if xi < pd {
                let direct = scene.direct_lighting(hit.point, normal, &material, 0.0);
                radiance += throughput * direct / pd;
                (
                    cosine_hemisphere(normal, rng),
                    material.diffuse() / pd,
                    material.diffuse(),
                )
            } else if xi < pd + ps {
                (
                    ray.direction().reflect(normal),
                    material.specular() / ps,
                    material.specular(),
                )
            } else if xi < pd + ps + pt {
                (
                    transmit(&ray, &hit),
                    material.transparency() / pt,
                    material.transparency(),
                )
            } else {
                break;
            };

            throughput *= weight;
            if depth >= RUSSIAN_ROULETTE_DEPTH {
                let survival = lobe.max_element().min(MAX_SCATTER_PROBABILITY);
                if survival <= 0.0 || gen_f32(rng) >= survival {
                    break;
                }
                throughput /= survival;
            }

            ray = Ray::from_unit(hit.point, direction);
        }

        radiance
    }
}

/// Direct lighting plus a photon density estimate for indirect light.
///
/// Specular and refractive chains are followed deterministically along the
/// more likely of the two lobes until a diffuse surface is reached.
#[derive(Debug, Clone, Copy, Default)]
pub struct PhotonMapping;

impl TransportStrategy for PhotonMapping {
    fn name(&self) -> &'static str {
        "photon mapping"
    }

    fn radiance(
        &self,
        ray: &Ray,
        scene: &Scene,
        config: &RenderConfig,
        _rng: &mut dyn RngCore,
    ) -> Color {
        let mut weight = Color::ONE;
        let mut ray = *ray;

        for _ in 0..config.max_depth {
            let Some(hit) = scene.intersect(&ray, f32::INFINITY) else {
                return weight * scene.background();
            };

            let material = hit.material;
            if material.is_emissive() {
                return weight * material.emission();
            }

            let normal = hit.facing_normal();
            if material.p_diffuse() > 0.0 {
                let direct =
                    scene.direct_lighting(hit.point, normal, &material, config.medium_sigma);
                let indirect = config.photon_map.as_deref().map_or(Color::ZERO, |map| {
                    estimate_photon_radiance(
                        map,
                        hit.point,
                        normal,
                        &material,
                        config.k_photons,
                        config.radius,
                        config.kernel,
                    )
                });
                return weight * (direct + indirect);
            }

            let direction = if material.p_specular() >= material.p_transparency() {
                weight *= material.specular();
                ray.direction().reflect(normal)
            } else {
                weight *= material.transparency();
                transmit(&ray, &hit)
            };

            if weight.max_element() <= 0.0 {
                return Color::ZERO;
            }
            ray = Ray::from_unit(hit.point, direction);
        }

        Color::ZERO
    }
}

/// Kernel density estimate of indirect diffuse radiance at `point`.
///
/// Gathers up to `k` photons within `radius`, uses the farthest one as the
/// kernel bandwidth and sums `diffuse / (pi * p_diffuse) * flux * K(d, R)`
/// over photons arriving from the side `normal` faces. Photons are only
/// stored on diffuse events, hence the `p_diffuse` compensation.
pub fn estimate_photon_radiance(
    map: &PhotonMap,
    point: Point,
    normal: Direction,
    material: &Material,
    k: usize,
    radius: f32,
    kernel: Kernel,
) -> Color {
    if material.p_diffuse() <= 0.0 {
        return Color::ZERO;
    }

    let photons = map.nearest_neighbors(point, k, radius);
    let Some(farthest) = photons.last() else {
        return Color::ZERO;
    };

    let mut bandwidth = farthest.position.distance(point);
    if bandwidth <= EPSILON {
        bandwidth = radius;
    }

    let brdf = material.diffuse() / (PI * material.p_diffuse());
    photons
        .iter()
        .filter(|photon| photon.direction.dot(normal) < 0.0)
        .map(|photon| brdf * photon.flux * kernel.evaluate(photon.position.distance(point), bandwidth))
        .sum()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Photon, PointLight, Sphere};
    use rand::rngs::StdRng;
    use crate::sampling::pixel_rng;
    use crate::{Cylinder, Plane};
    use rand::SeedableRng;
    use std::sync::Arc;

    fn camera() -> Camera {
        Camera::look_at(
            Point::new(0.0, 0.0, -5.0),
            Point::ORIGIN,
            Direction::Y,
            40.0,
            16,
            16,
        )
        .unwrap()
    }

    fn ray_at_origin() -> Ray {
        Ray::new(Point::new(0.0, 0.0, -5.0), Direction::Z).unwrap()
    }

    #[test]
    fn test_empty_scene_returns_background() {
        let background = Color::new(0.1, 0.2, 0.3);
        let scene = Scene::new().with_background(background);
        let config = RenderConfig::default();
        let mut rng = StdRng::seed_from_u64(0);

        for algorithm in [
            Algorithm::RayTracing,
            Algorithm::PathTracing,
            Algorithm::PhotonMapping,
        ] {
            let strategy = algorithm.strategy();
            let color = strategy.calculate_pixel_color(&camera(), &scene, 3, 7, 4, &config, &mut rng);
            assert!((color - background).length() < 1e-6, "{}", strategy.name());
        }
    }

    #[test]
    fn test_emissive_surface_returns_emission() {
        let mut scene = Scene::new();
        scene.add_object(Sphere::new(Point::ORIGIN, 1.0, Material::emissive(Color::splat(3.0))));
        let config = RenderConfig::default();
        let mut rng = StdRng::seed_from_u64(0);

        for algorithm in [
            Algorithm::RayTracing,
            Algorithm::PathTracing,
            Algorithm::PhotonMapping,
        ] {
            let color = algorithm
                .strategy()
                .radiance(&ray_at_origin(), &scene, &config, &mut rng);
            assert_eq!(color, Color::splat(3.0));
        }
    }

    #[test]
    fn test_ray_tracing_direct_light() {
        let mut scene = Scene::new();
        scene.add_object(Sphere::new(Point::ORIGIN, 1.0, Material::lambertian(Color::splat(0.5))));
        // Light 1 unit in front of the visible pole
        scene.add_light(PointLight::white(Point::new(0.0, 0.0, -2.0), PI));

        let mut rng = StdRng::seed_from_u64(0);
        let color = RayTracing.radiance(&ray_at_origin(), &scene, &RenderConfig::default(), &mut rng);
        assert!((color - Color::splat(0.5)).length() < 1e-4);
    }

    #[test]
    fn test_path_tracing_is_bounded_and_deterministic() {
        let mut scene = Scene::new().with_background(Color::splat(0.2));
        scene.add_object(Sphere::new(Point::ORIGIN, 1.0, Material::lambertian(Color::splat(0.7))));
        scene.add_light(PointLight::white(Point::new(0.0, 3.0, -3.0), 20.0));
        let config = RenderConfig::default();

        let a = PathTracing.calculate_pixel_color(&camera(), &scene, 8, 8, 16, &config, &mut StdRng::seed_from_u64(5));
        let b = PathTracing.calculate_pixel_color(&camera(), &scene, 8, 8, 16, &config, &mut StdRng::seed_from_u64(5));
        assert_eq!(a, b);
        assert!(a.is_finite());
        assert!(a.min_element() > 0.0);
    }

    #[test]
    fn test_photon_mapping_follows_mirror() {
        let mut scene = Scene::new().with_background(Color::new(0.0, 0.0, 1.0));
        scene.add_object(Sphere::new(Point::ORIGIN, 1.0, Material::mirror(Color::splat(0.5))));
        let config = RenderConfig::default().with_photon_map(Arc::new(PhotonMap::empty()));
        let mut rng = StdRng::seed_from_u64(0);

        // Head-on hit bounces straight back out to the background
        let color = PhotonMapping.radiance(&ray_at_origin(), &scene, &config, &mut rng);
        assert!((color - Color::new(0.0, 0.0, 0.5)).length() < 1e-5);
    }

    #[test]
    fn test_photon_estimate_box_kernel() {
        let down = -Direction::Y;
        let photons = vec![
            Photon::new(Point::new(0.1, 0.0, 0.0), down, Color::ONE),
            Photon::new(Point::new(-0.1, 0.0, 0.0), down, Color::ONE),
            Photon::new(Point::new(0.0, 0.0, 0.2), down, Color::ONE),
            // Arrives from below the surface, filtered out
            Photon::new(Point::new(0.0, 0.0, -0.1), Direction::Y, Color::ONE),
        ];
        let map = PhotonMap::build(photons);
        let material = Material::lambertian(Color::splat(0.5));

        let estimate = estimate_photon_radiance(
            &map,
            Point::ORIGIN,
            Direction::Y,
            &material,
            10,
            1.0,
            Kernel::Box,
        );

        // Bandwidth is the farthest gathered photon (0.2); brdf is 0.5 / (pi * 0.5)
        let expected = 3.0 / (PI * 0.04) / PI;
        assert!((estimate - Color::splat(expected)).length() < 1e-2);
    }

    #[test]
    fn test_photon_estimate_without_neighbours() {
        let map = PhotonMap::empty();
        let estimate = estimate_photon_radiance(
            &map,
            Point::ORIGIN,
            Direction::Y,
            &Material::default(),
            10,
            1.0,
            Kernel::Epanechnikov,
        );
        assert_eq!(estimate, Color::ZERO);
    }

    #[test]
    fn test_path_tracing_furnace_convex_sphere() {
        // Background 1, no lights: a convex Lambertian sphere averages to its albedo
        for albedo in [0.5, 0.95] {
            let mut scene = Scene::new().with_background(Color::ONE);
            scene.add_object(Sphere::new(Point::ORIGIN, 1.0, Material::lambertian(Color::splat(albedo))));
            let config = RenderConfig::default();
            let mut rng = StdRng::seed_from_u64(11);

            let n = 20_000;
            let mut sum = Color::ZERO;
            for _ in 0..n {
                sum += PathTracing.radiance(&ray_at_origin(), &scene, &config, &mut rng);
            }
            let mean = sum / n as f32;
            assert!((mean - Color::splat(albedo)).abs().max_element() < 0.03, "albedo {}: {}", albedo, mean);
        }
    }

    #[test]
    fn test_path_tracing_white_furnace_with_roulette() {
        // Rays entering a white open tube bounce several times before
        // escaping, so Russian roulette runs on a large share of paths
        let mut scene = Scene::new().with_background(Color::ONE);
        scene.add_object(
            Cylinder::new(Point::ORIGIN, Direction::Z, 0.5, 1.5, Material::lambertian(Color::ONE)).unwrap(),
        );
        let config = RenderConfig::default().with_max_depth(64);
        let mut rng = StdRng::seed_from_u64(3);
        let origin = Point::new(0.0, 0.0, -0.5);

        let n = 20_000;
        let mut sum = Color::ZERO;
        for _ in 0..n {
            let phi = 2.0 * PI * gen_f32(&mut rng);
            let depth = 0.2 + 1.1 * gen_f32(&mut rng);
            let target = Point::new(0.45 * phi.cos(), 0.45 * phi.sin(), depth);
            let ray = Ray::new(origin, target - origin).unwrap();
            sum += PathTracing.radiance(&ray, &scene, &config, &mut rng);
        }
        let mean = sum / n as f32;
        assert!((mean - Color::ONE).abs().max_element() < 0.05, "{}", mean);
    }

    fn closed_box() -> Scene {
        let wall = Material::lambertian(Color::splat(0.5));
        let mut scene = Scene::new();
        for axis in [Direction::X, Direction::Y, Direction::Z] {
            for side in [-1.0, 1.0] {
                scene.add_object(Plane::through(Point::ORIGIN + axis * side, -axis * side, wall).unwrap());
            }
        }
        scene.add_light(PointLight::white(Point::new(0.0, 0.5, -0.3), 4.0));
        scene
    }

    fn mean_image_radiance(
        strategy: &dyn TransportStrategy,
        scene: &Scene,
        camera: &Camera,
        samples: u32,
        config: &RenderConfig,
    ) -> f32 {
        let mut sum = 0.0;
        for y in 0..camera.height() {
            for x in 0..camera.width() {
                let mut rng = pixel_rng(config.seed, x, y);
                let color = strategy.calculate_pixel_color(camera, scene, x, y, samples, config, &mut rng);
                sum += color.element_sum() / 3.0;
            }
        }
        sum / (camera.width() * camera.height()) as f32
    }

    #[test]
    fn test_photon_mapping_matches_path_tracing_in_closed_box() {
        let scene = closed_box();
        let camera = Camera::look_at(
            Point::new(0.0, 0.0, -0.9),
            Point::new(0.0, 0.0, 1.0),
            Direction::Y,
            90.0,
            16,
            16,
        )
        .unwrap();

        let config = RenderConfig::default().with_seed(1);
        let direct = mean_image_radiance(&RayTracing, &scene, &camera, 4, &config);
        let path = mean_image_radiance(&PathTracing, &scene, &camera, 64, &config);

        let map = scene.generate_photon_map(200_000, 0.0, 9);
        let config = config.with_photon_map(Arc::new(map)).with_photon_search(100, 0.5);
        let photon = mean_image_radiance(&PhotonMapping, &scene, &camera, 4, &config);

        // Indirect light must be a large share of the total
        assert!(direct < 0.75 * path, "direct {} path {}", direct, path);
        assert!(
            ((photon - path) / path).abs() < 0.1,
            "photon mapping {} path tracing {}",
            photon,
            path
        );
    }
}
