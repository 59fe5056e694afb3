//! Cornell box render.
//!
//! Renders a closed box with a glass sphere, a mirror cone and a diffuse
//! cylinder, then writes an OpenEXR file.
//!
//! Usage: `cargo run --release --example cornell_box -- [ray|path|photon] [samples]`
//! Set `RUST_LOG=info` for progress output.

use anyhow::{bail, Context, Result};
use lux_renderer::{
    Algorithm, Camera, Color, Cone, Cylinder, Direction, Kernel, Material, Plane, Point,
    PointLight, RegionType, RenderConfig, Scene, Sphere, Triangle,
};
use std::sync::Arc;
use std::time::Instant;

const WIDTH: u32 = 320;
const HEIGHT: u32 = 320;

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let mut args = std::env::args().skip(1);
    let algorithm = match args.next().as_deref() {
        None | Some("path") => Algorithm::PathTracing,
        Some("ray") => Algorithm::RayTracing,
        Some("photon") => Algorithm::PhotonMapping,
        Some(other) => bail!("unknown algorithm '{other}', expected ray, path or photon"),
    };
    let samples: u32 = match args.next() {
        Some(s) => s.parse().with_context(|| format!("invalid sample count '{s}'"))?,
        None => 16,
    };

    let scene = build_scene()?;
    let camera = Camera::look_at(
        Point::new(0.0, 1.0, -3.4),
        Point::new(0.0, 1.0, 0.0),
        Direction::Y,
        40.0,
        WIDTH,
        HEIGHT,
    )?;

    let mut config = RenderConfig::default()
        .with_algorithm(algorithm)
        .with_regions(RegionType::Rectangle, 16)
        .with_seed(2024);

    if algorithm == Algorithm::PhotonMapping {
        let start = Instant::now();
        let photon_map = scene.generate_photon_map(200_000, 0.0, 7);
        log::info!("Photon map: {} photons in {:.2?}", photon_map.len(), start.elapsed());
        config = config
            .with_photon_map(Arc::new(photon_map))
            .with_photon_search(100, 0.15)
            .with_kernel(Kernel::Epanechnikov);
    }

    let image = camera.render(&scene, samples, &config)?;

    let filename = format!("cornell_box_{:?}.exr", algorithm).to_lowercase();
    image
        .to_rgb32f()
        .save(&filename)
        .with_context(|| format!("failed to write {filename}"))?;
    log::info!("Saved {}", filename);

    Ok(())
}

fn build_scene() -> Result<Scene> {
    let white = Material::lambertian(Color::splat(0.73));
    let red = Material::lambertian(Color::new(0.65, 0.05, 0.05));
    let green = Material::lambertian(Color::new(0.12, 0.45, 0.15));

    let mut scene = Scene::new();

    // Walls: floor y=0, ceiling y=2, back z=1, left x=-1, right x=1
    scene.add_object(Plane::through(Point::ORIGIN, Direction::Y, white)?);
    scene.add_object(Plane::through(Point::new(0.0, 2.0, 0.0), -Direction::Y, white)?);
    scene.add_object(Plane::through(Point::new(0.0, 0.0, 1.0), -Direction::Z, white)?);
    scene.add_object(Plane::through(Point::new(-1.0, 0.0, 0.0), Direction::X, red)?);
    scene.add_object(Plane::through(Point::new(1.0, 0.0, 0.0), -Direction::X, green)?);

    // Small emissive panel under the ceiling
    let panel = Material::emissive(Color::splat(6.0));
    let (a, b, c, d) = (
        Point::new(-0.2, 1.99, -0.2),
        Point::new(0.2, 1.99, -0.2),
        Point::new(0.2, 1.99, 0.2),
        Point::new(-0.2, 1.99, 0.2),
    );
    scene.add_object(Triangle::new(a, b, c, panel)?);
    scene.add_object(Triangle::new(a, c, d, panel)?);

    scene.add_object(Sphere::new(
        Point::new(-0.4, 0.35, 0.1),
        0.35,
        Material::glass(Color::splat(0.95), 1.5),
    ));
    scene.add_object(Cone::new(
        Point::new(0.45, 0.0, 0.3),
        Direction::Y,
        0.3,
        0.8,
        Material::mirror(Color::splat(0.9)),
    )?);
    scene.add_object(Cylinder::new(
        Point::new(0.1, 0.0, 0.6),
        Direction::Y,
        0.15,
        1.1,
        Material::lambertian(Color::new(0.8, 0.7, 0.3)),
    )?);

    scene.add_light(PointLight::white(Point::new(0.0, 1.8, 0.0), 3.0));

    for primitive in scene.primitives() {
        log::debug!("{}", primitive);
    }

    Ok(scene)
}
