//! Frame rendering: the sequential loop and the worker-pool scheduler.

use crate::sampling::pixel_rng;
use crate::task::{render_task, TaskGenerator, TaskResult};
use crate::{
    Algorithm, Camera, Color, RegionType, RenderConfig, RenderError, RenderMode, Scene,
    TransportStrategy,
};
use image::{Rgb, Rgb32FImage};
use std::fmt;
use std::thread;
use std::time::{Duration, Instant};

/// Linear HDR framebuffer, row-major with `(0, 0)` at the top left.
#[derive(Debug, Clone, PartialEq)]
pub struct Image {
    width: u32,
    height: u32,
    pixels: Vec<Color>,
}

impl Image {
    /// Create a new image filled with black.
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            pixels: vec![Color::ZERO; width as usize * height as usize],
        }
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn pixels(&self) -> &[Color] {
        &self.pixels
    }

    pub fn get(&self, x: u32, y: u32) -> Color {
        self.pixels[self.index(x, y)]
    }

    pub fn set(&mut self, x: u32, y: u32, color: Color) {
        let index = self.index(x, y);
        self.pixels[index] = color;
    }

    /// Copy a finished task into place.
    pub fn write_task(&mut self, result: &TaskResult) {
        for ((x, y), color) in result.task.pixels().zip(&result.pixels) {
            self.set(x, y, *color);
        }
    }

    /// Float RGB copy for handing to an image encoder.
    pub fn to_rgb32f(&self) -> Rgb32FImage {
        Rgb32FImage::from_fn(self.width, self.height, |x, y| Rgb(self.get(x, y).to_array()))
    }

    fn index(&self, x: u32, y: u32) -> usize {
        debug_assert!(x < self.width && y < self.height, "pixel ({x}, {y}) out of bounds");
        y as usize * self.width as usize + x as usize
    }
}

/// Timing and layout of one finished render.
#[derive(Debug, Clone, PartialEq)]
pub struct RenderStats {
    pub elapsed: Duration,
    pub algorithm: Algorithm,
    pub mode: RenderMode,
    pub region_type: RegionType,
    pub region_size: u32,
    pub threads: usize,
    pub tasks: usize,
    pub pixels: usize,
    pub samples: u32,
}

impl RenderStats {
    pub fn pixels_per_second(&self) -> f64 {
        let seconds = self.elapsed.as_secs_f64();
        if seconds > 0.0 {
            self.pixels as f64 / seconds
        } else {
            f64::INFINITY
        }
    }
}

impl fmt::Display for RenderStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{:?} {:?}: {} px x {} spp in {:.3}s ({} tasks, {:?} size {}, {} threads, {:.0} px/s)",
            self.algorithm,
            self.mode,
            self.pixels,
            self.samples,
            self.elapsed.as_secs_f64(),
            self.tasks,
            self.region_type,
            self.region_size,
            self.threads,
            self.pixels_per_second()
        )
    }
}

/// Estimate pixel `(x, y)` from its own seeded generator.
///
/// The result depends only on the pixel, the inputs and `config.seed`,
/// never on which thread renders it or in what order.
pub fn render_pixel(
    strategy: &dyn TransportStrategy,
    camera: &Camera,
    scene: &Scene,
    x: u32,
    y: u32,
    samples: u32,
    config: &RenderConfig,
) -> Color {
    let mut rng = pixel_rng(config.seed, x, y);
    strategy.calculate_pixel_color(camera, scene, x, y, samples, config, &mut rng)
}

/// Render the scene to an image.
pub fn render(
    camera: &Camera,
    scene: &Scene,
    samples: u32,
    config: &RenderConfig,
) -> Result<Image, RenderError> {
    render_with_stats(camera, scene, samples, config).map(|(image, _)| image)
}

/// Render the scene and report how long it took.
pub fn render_with_stats(
    camera: &Camera,
    scene: &Scene,
    samples: u32,
    config: &RenderConfig,
) -> Result<(Image, RenderStats), RenderError> {
    config.validate()?;
    if samples == 0 {
        return Err(RenderError::ZeroSamples);
    }
    let (width, height) = (camera.width(), camera.height());
    if width == 0 || height == 0 {
        return Err(RenderError::EmptyImage { width, height });
    }

    let strategy = config.algorithm.strategy();
    log::info!(
        "Rendering {}x{} at {} spp with {} ({:?})",
        width,
        height,
        samples,
        strategy.name(),
        config.mode
    );

    let start = Instant::now();
    let (image, tasks, threads) = match config.mode {
        RenderMode::Sequential => {
            let image = render_sequential(strategy.as_ref(), camera, scene, samples, config);
            (image, 1, 1)
        }
        RenderMode::Parallel => render_parallel(strategy.as_ref(), camera, scene, samples, config)?,
    };

    let stats = RenderStats {
        elapsed: start.elapsed(),
        algorithm: config.algorithm,
        mode: config.mode,
        region_type: config.region_type,
        region_size: config.region_size,
        threads,
        tasks,
        pixels: width as usize * height as usize,
        samples,
    };
    log::info!("{stats}");

    Ok((image, stats))
}

fn render_sequential(
    strategy: &dyn TransportStrategy,
    camera: &Camera,
    scene: &Scene,
    samples: u32,
    config: &RenderConfig,
) -> Image {
    let mut image = Image::new(camera.width(), camera.height());
    for y in 0..camera.height() {
        for x in 0..camera.width() {
            let color = render_pixel(strategy, camera, scene, x, y, samples, config);
            image.set(x, y, color);
        }
    }
    image
}

/// Push every task, start `num_threads` workers that drain the queue, then
/// assemble the returned blocks. Returns the image, task count and thread
/// count.
fn render_parallel(
    strategy: &dyn TransportStrategy,
    camera: &Camera,
    scene: &Scene,
    samples: u32,
    config: &RenderConfig,
) -> Result<(Image, usize, usize), RenderError> {
    let tasks = TaskGenerator::generate(
        camera.width(),
        camera.height(),
        config.region_type,
        config.region_size,
    );
    let task_count = tasks.len();
    let threads = config.num_threads;
    if threads > task_count {
        log::warn!(
            "{} threads for only {} tasks; {} workers will idle",
            threads,
            task_count,
            threads - task_count
        );
    }

    let queue = config.queue.create();
    for task in tasks {
        queue.push(task);
    }
    let queue = queue.as_ref();

    let results = thread::scope(|s| {
        let workers: Vec<_> = (0..threads)
            .map(|worker| {
                s.spawn(move || {
                    let mut done = Vec::new();
                    let mut pixels = 0;
                    while let Some(task) = queue.pop() {
                        pixels += task.pixel_count();
                        done.push(render_task(&task, strategy, camera, scene, samples, config));
                    }
                    log::debug!("Worker {} rendered {} tasks ({} pixels)", worker, done.len(), pixels);
                    done
                })
            })
            .collect();

        queue.finish();

        workers
            .into_iter()
            .enumerate()
            .map(|(worker, handle)| handle.join().map_err(|_| RenderError::WorkerPanicked(worker)))
            .collect::<Result<Vec<_>, _>>()
    })?;

    let mut image = Image::new(camera.width(), camera.height());
    for result in results.iter().flatten() {
        image.write_task(result);
    }

    Ok((image, task_count, threads))
}

/// Render once per configuration and collect the timings.
pub fn benchmark(
    camera: &Camera,
    scene: &Scene,
    samples: u32,
    configs: &[RenderConfig],
) -> Result<Vec<RenderStats>, RenderError> {
    configs
        .iter()
        .map(|config| render_with_stats(camera, scene, samples, config).map(|(_, stats)| stats))
        .collect()
}

/// The configuration from `configs` that rendered fastest, if any.
pub fn find_fastest(
    camera: &Camera,
    scene: &Scene,
    samples: u32,
    configs: &[RenderConfig],
) -> Result<Option<RenderConfig>, RenderError> {
    let stats = benchmark(camera, scene, samples, configs)?;
    let fastest = stats
        .iter()
        .enumerate()
        .min_by_key(|(_, s)| s.elapsed)
        .map(|(index, s)| {
            log::info!("Fastest configuration: {s}");
            configs[index].clone()
        });
    Ok(fastest)
}
