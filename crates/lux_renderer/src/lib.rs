//! Lux Renderer - CPU light transport.
//!
//! Renders a scene of analytic primitives lit by point lights with one of
//! three transport algorithms:
//! - Direct ray tracing with shadow rays
//! - Path tracing with Russian roulette termination
//! - Photon mapping with kernel density estimation over a k-d tree
//!
//! The frame is split into tasks that a pool of worker threads pulls from
//! a shared queue. Every pixel draws its randomness from its own seeded
//! generator, so sequential and parallel renders are pixel-identical.

mod camera;
mod config;
mod cone;
mod cylinder;
mod error;
mod kernel;
mod light;
mod material;
mod photon;
mod plane;
mod primitive;
mod queue;
mod renderer;
mod sampling;
mod scene;
mod sphere;
mod strategy;
mod task;
mod triangle;

pub use camera::Camera;
pub use config::{Algorithm, RenderConfig, RenderMode};
pub use cone::Cone;
pub use cylinder::Cylinder;
pub use error::RenderError;
pub use kernel::Kernel;
pub use light::PointLight;
pub use material::{Color, Material, MAX_SCATTER_PROBABILITY};
pub use photon::{Photon, PhotonMap};
pub use plane::Plane;
pub use primitive::{Intersection, Primitive, HIT_EPSILON};
pub use queue::{BlockingTaskQueue, ChannelTaskQueue, QueueKind, TaskQueue};
pub use renderer::{
    benchmark, find_fastest, render, render_pixel, render_with_stats, Image, RenderStats,
};
pub use sampling::{cosine_hemisphere, gen_f32, pixel_rng, uniform_sphere};
pub use scene::{LightHandle, PrimitiveHandle, Scene};
pub use sphere::Sphere;
pub use strategy::{
    estimate_photon_radiance, PathTracing, PhotonMapping, RayTracing, TransportStrategy,
    MAX_PATH_DEPTH, RUSSIAN_ROULETTE_DEPTH,
};
pub use task::{render_task, RegionType, RenderTask, TaskGenerator, TaskResult};
pub use triangle::Triangle;

/// Re-export the geometry kernel
pub use lux_math::{Aabb, Direction, Interval, MathError, Point, Ray, Transform, Vec3};
