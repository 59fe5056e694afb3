//! Photon records and the k-d tree used to gather them.

use crate::sampling::{cosine_hemisphere, gen_f32};
use crate::{Color, Scene};
use lux_math::{Aabb, Direction, Point, Ray};
use ordered_float::OrderedFloat;
use rand::RngCore;
use std::collections::BinaryHeap;

/// Bounce cap for a single photon path.
pub(crate) const MAX_PHOTON_BOUNCES: u32 = 20;

/// A packet of light flux deposited on a diffuse surface.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Photon {
    pub position: Point,
    /// Travel direction of the photon when it arrived (unit length)
    pub direction: Direction,
    pub flux: Color,
}

impl Photon {
    pub fn new(position: Point, direction: Direction, flux: Color) -> Self {
        Self {
            position,
            direction,
            flux,
        }
    }
}

/// Balanced k-d tree over photon positions.
///
/// Stored implicitly: the subtree spanning `[lo, hi)` has its splitting
/// photon at `lo + (hi - lo) / 2`, everything before it on the low side
/// of that photon's split axis and everything after it on the high side.
/// Immutable once built, so it can be shared across render threads.
#[derive(Debug, Clone, PartialEq)]
pub struct PhotonMap {
    photons: Vec<Photon>,
    axes: Vec<u8>,
    bounds: Aabb,
}

impl PhotonMap {
    pub fn build(mut photons: Vec<Photon>) -> Self {
        let bounds = Aabb::enclosing(photons.iter().map(|p| p.position));
        let mut axes = vec![0u8; photons.len()];
        build_subtree(&mut photons, &mut axes);
        log::debug!("Built photon map: {} photons", photons.len());
        Self {
            photons,
            axes,
            bounds,
        }
    }

    pub fn empty() -> Self {
        Self::build(Vec::new())
    }

    pub fn len(&self) -> usize {
        self.photons.len()
    }

    pub fn is_empty(&self) -> bool {
        self.photons.is_empty()
    }

    /// Bounding box of all stored photon positions.
    pub fn bounds(&self) -> Aabb {
        self.bounds
    }

    pub fn photons(&self) -> &[Photon] {
        &self.photons
    }

    /// Up to `k` photons within `radius` of `point`, closest first.
    pub fn nearest_neighbors(&self, point: Point, k: usize, radius: f32) -> Vec<Photon> {
        if k == 0 || radius <= 0.0 || self.photons.is_empty() {
            return Vec::new();
        }

        let mut search = KnnSearch {
            query: point,
            k,
            max_dist2: radius * radius,
            heap: BinaryHeap::with_capacity(k + 1),
        };
        self.search(0, self.photons.len(), &mut search);

        search
            .heap
            .into_sorted_vec()
            .into_iter()
            .map(|(_, index)| self.photons[index])
            .collect()
    }

    fn search(&self, lo: usize, hi: usize, s: &mut KnnSearch) {
        if lo >= hi {
            return;
        }
        let mid = lo + (hi - lo) / 2;
        let photon = &self.photons[mid];
        let axis = self.axes[mid] as usize;

        let dist2 = photon.position.distance_squared(s.query);
        if dist2 <= s.max_dist2 {
            s.heap.push((OrderedFloat(dist2), mid));
            if s.heap.len() > s.k {
                s.heap.pop();
            }
            if s.heap.len() == s.k {
                // Only photons closer than the current k-th can still matter
                if let Some((worst, _)) = s.heap.peek() {
                    s.max_dist2 = worst.0;
                }
            }
        }

        let delta = s.query.axis(axis) - photon.position.axis(axis);
        let (near, far) = if delta < 0.0 {
            ((lo, mid), (mid + 1, hi))
        } else {
            ((mid + 1, hi), (lo, mid))
        };

        self.search(near.0, near.1, s);
        if delta * delta <= s.max_dist2 {
            self.search(far.0, far.1, s);
        }
    }
}

struct KnnSearch {
    query: Point,
    k: usize,
    max_dist2: f32,
    heap: BinaryHeap<(OrderedFloat<f32>, usize)>,
}

fn build_subtree(photons: &mut [Photon], axes: &mut [u8]) {
    if photons.is_empty() {
        return;
    }

    let bounds = Aabb::enclosing(photons.iter().map(|p| p.position));
    let axis = bounds.longest_axis();
    let mid = photons.len() / 2;

    photons.select_nth_unstable_by(mid, |a, b| {
        a.position.axis(axis).total_cmp(&b.position.axis(axis))
    });
    axes[mid] = axis as u8;

    let (left, rest) = photons.split_at_mut(mid);
    let (left_axes, rest_axes) = axes.split_at_mut(mid);
    build_subtree(left, left_axes);
    build_subtree(&mut rest[1..], &mut rest_axes[1..]);
}

/// Follow one photon from a light through the scene, appending a record at
/// every diffuse bounce after the first hit.
///
/// The first surface a photon reaches receives direct light, which the
/// renderer already computes with shadow rays, so it is not stored.
pub(crate) fn trace_photon(
    scene: &Scene,
    mut ray: Ray,
    mut flux: Color,
    medium_sigma: f32,
    rng: &mut dyn RngCore,
    photons: &mut Vec<Photon>,
) {
    for bounce in 0..MAX_PHOTON_BOUNCES {
        let Some(hit) = scene.intersect(&ray, f32::INFINITY) else {
            return;
        };

        if medium_sigma > 0.0 {
            flux *= (-medium_sigma * hit.distance * hit.distance).exp();
        }

        let material = hit.material;
        if material.is_emissive() {
            return;
        }

        let normal = hit.facing_normal();
        let (pd, ps, pt) = material.probabilities();
        let xi = gen_f32(rng);

        let direction = if xi < pd {
            if bounce > 0 {
                photons.push(Photon::new(hit.point, ray.direction(), flux));
            }
            flux *= material.diffuse() / pd;
            cosine_hemisphere(normal, rng)
        } else if xi < pd + ps {
            flux *= material.specular() / ps;
            ray.direction().reflect(normal)
        } else if xi < pd + ps + pt {
            flux *= material.transparency() / pt;
            material
                .refract(ray.direction(), hit.normal, hit.front_face)
                .unwrap_or_else(|| ray.direction().reflect(normal))
        } else {
            return;
        };

        ray = Ray::from_unit(hit.point, direction);
    }
}
