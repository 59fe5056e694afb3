//! Render configuration.

use crate::{Kernel, PhotonMap, QueueKind, RegionType, RenderError};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::thread;

/// Light transport algorithm.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Algorithm {
    /// Direct lighting only, one shadow ray per light
    RayTracing,
    /// Unbiased Monte Carlo path tracing
    #[default]
    PathTracing,
    /// Direct lighting plus photon density estimation
    PhotonMapping,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RenderMode {
    /// Every pixel on the calling thread
    Sequential,
    /// Tasks pulled from a shared queue by `num_threads` workers
    #[default]
    Parallel,
}

/// Everything that controls a render besides the scene and camera.
///
/// Deserializable from JSON with every field optional; missing fields take
/// their defaults. The photon map is attached in code.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RenderConfig {
    pub algorithm: Algorithm,
    pub mode: RenderMode,
    pub region_type: RegionType,
    /// Column/row/tile size in pixels
    pub region_size: u32,
    pub num_threads: usize,
    pub queue: QueueKind,
    /// Bounce limit for path tracing and specular chains
    pub max_depth: u32,
    /// Root seed for every per-pixel generator
    pub seed: u64,

    #[serde(skip)]
    pub photon_map: Option<Arc<PhotonMap>>,
    /// Photons gathered per estimate
    pub k_photons: usize,
    /// Photon search radius
    pub radius: f32,
    pub kernel: Kernel,
    /// Extinction coefficient of the participating medium (0 = vacuum)
    pub medium_sigma: f32,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            algorithm: Algorithm::default(),
            mode: RenderMode::default(),
            region_type: RegionType::default(),
            region_size: 8,
            num_threads: default_threads(),
            queue: QueueKind::default(),
            max_depth: crate::MAX_PATH_DEPTH,
            seed: 0,
            photon_map: None,
            k_photons: 50,
            radius: 0.1,
            kernel: Kernel::default(),
            medium_sigma: 0.0,
        }
    }
}

fn default_threads() -> usize {
    thread::available_parallelism().map_or(4, |n| n.get())
}

impl RenderConfig {
    pub fn with_algorithm(mut self, algorithm: Algorithm) -> Self {
        self.algorithm = algorithm;
        self
    }

    pub fn with_mode(mut self, mode: RenderMode) -> Self {
        self.mode = mode;
        self
    }

    pub fn with_regions(mut self, region_type: RegionType, region_size: u32) -> Self {
        self.region_type = region_type;
        self.region_size = region_size;
        self
    }

    pub fn with_threads(mut self, num_threads: usize) -> Self {
        self.num_threads = num_threads;
        self
    }

    pub fn with_queue(mut self, queue: QueueKind) -> Self {
        self.queue = queue;
        self
    }

    pub fn with_max_depth(mut self, max_depth: u32) -> Self {
        self.max_depth = max_depth;
        self
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    /// Attach a photon map and switch to photon mapping.
    pub fn with_photon_map(mut self, photon_map: Arc<PhotonMap>) -> Self {
        self.algorithm = Algorithm::PhotonMapping;
        self.photon_map = Some(photon_map);
        self
    }

    pub fn with_photon_search(mut self, k_photons: usize, radius: f32) -> Self {
        self.k_photons = k_photons;
        self.radius = radius;
        self
    }

    pub fn with_kernel(mut self, kernel: Kernel) -> Self {
        self.kernel = kernel;
        self
    }

    pub fn with_medium_sigma(mut self, sigma: f32) -> Self {
        self.medium_sigma = sigma.max(0.0);
        self
    }

    /// Check the settings that would make a render meaningless.
    pub fn validate(&self) -> Result<(), RenderError> {
        if self.region_size == 0 {
            return Err(RenderError::ZeroRegionSize);
        }
        if self.mode == RenderMode::Parallel && self.num_threads == 0 {
            return Err(RenderError::ZeroThreads);
        }
        // Ray tracing never follows a bounce
        if self.max_depth == 0 && self.algorithm != Algorithm::RayTracing {
            return Err(RenderError::ZeroMaxDepth(self.algorithm));
        }
        if self.algorithm == Algorithm::PhotonMapping {
            if self.photon_map.is_none() {
                return Err(RenderError::MissingPhotonMap);
            }
            if self.k_photons == 0 {
                return Err(RenderError::ZeroPhotonNeighbours);
            }
            if self.radius.is_nan() || self.radius <= 0.0 {
                return Err(RenderError::InvalidRadius(self.radius));
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = RenderConfig::default();
        assert_eq!(config.algorithm, Algorithm::PathTracing);
        assert_eq!(config.mode, RenderMode::Parallel);
        assert_eq!(config.region_type, RegionType::Column);
        assert_eq!(config.region_size, 8);
        assert_eq!(config.queue, QueueKind::Blocking);
        assert!(config.num_threads >= 1);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_bad_settings() {
        let base = RenderConfig::default();
        assert_eq!(
            base.clone().with_regions(RegionType::Line, 0).validate(),
            Err(RenderError::ZeroRegionSize)
        );
        assert_eq!(base.clone().with_threads(0).validate(), Err(RenderError::ZeroThreads));
        assert!(base
            .clone()
            .with_threads(0)
            .with_mode(RenderMode::Sequential)
            .validate()
            .is_ok());
        assert_eq!(
            base.clone().with_algorithm(Algorithm::PhotonMapping).validate(),
            Err(RenderError::MissingPhotonMap)
        );
        assert_eq!(
            base.clone().with_max_depth(0).validate(),
            Err(RenderError::ZeroMaxDepth(Algorithm::PathTracing))
        );
        assert!(base
            .clone()
            .with_max_depth(0)
            .with_algorithm(Algorithm::RayTracing)
            .validate()
            .is_ok());

        let map = Arc::new(PhotonMap::empty());
        let photon = base.with_photon_map(map);
        assert!(photon.validate().is_ok());
        assert_eq!(
            photon.clone().with_photon_search(0, 0.1).validate(),
            Err(RenderError::ZeroPhotonNeighbours)
        );
        assert_eq!(
            photon.with_photon_search(10, -1.0).validate(),
            Err(RenderError::InvalidRadius(-1.0))
        );
    }

    #[test]
    fn test_deserialize_partial_json() {
        let config: RenderConfig = serde_json::from_str(
            r#"{
                "algorithm": "PHOTON_MAPPING",
                "region_type": "RECTANGLE",
                "region_size": 16,
                "queue": "CHANNEL",
                "kernel": "gaussian",
                "num_threads": 3
            }"#,
        )
        .unwrap();

        assert_eq!(config.algorithm, Algorithm::PhotonMapping);
        assert_eq!(config.region_type, RegionType::Rectangle);
        assert_eq!(config.region_size, 16);
        assert_eq!(config.queue, QueueKind::Channel);
        assert_eq!(config.kernel, Kernel::Gaussian);
        assert_eq!(config.num_threads, 3);
        assert_eq!(config.mode, RenderMode::Parallel);
        assert_eq!(config.k_photons, 50);
        assert!(config.photon_map.is_none());
    }
}
