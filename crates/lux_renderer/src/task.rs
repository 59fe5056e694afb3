//! Splitting a frame into independently renderable tasks.

use crate::renderer::render_pixel;
use crate::{Camera, Color, RenderConfig, Scene, TransportStrategy};
use serde::{Deserialize, Serialize};

/// Shape of the regions a frame is split into.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RegionType {
    /// One task per pixel
    Pixel,
    /// Full-width bands `region_size` rows tall
    Line,
    /// Full-height bands `region_size` columns wide
    #[default]
    Column,
    /// `region_size` square tiles, handed out from the centre outward
    Rectangle,
}

/// Half-open pixel rectangle `[start_x, end_x) x [start_y, end_y)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct RenderTask {
    /// Position in the dispatch order
    pub id: usize,
    pub start_x: u32,
    pub start_y: u32,
    pub end_x: u32,
    pub end_y: u32,
}

impl RenderTask {
    pub fn new(id: usize, start_x: u32, start_y: u32, end_x: u32, end_y: u32) -> Self {
        Self {
            id,
            start_x,
            start_y,
            end_x,
            end_y,
        }
    }

    pub fn width(&self) -> u32 {
        self.end_x - self.start_x
    }

    pub fn height(&self) -> u32 {
        self.end_y - self.start_y
    }

    pub fn pixel_count(&self) -> usize {
        self.width() as usize * self.height() as usize
    }

    pub fn contains(&self, x: u32, y: u32) -> bool {
        (self.start_x..self.end_x).contains(&x) && (self.start_y..self.end_y).contains(&y)
    }

    /// Pixel coordinates in row-major order.
    pub fn pixels(&self) -> impl Iterator<Item = (u32, u32)> {
        let (x0, x1) = (self.start_x, self.end_x);
        (self.start_y..self.end_y).flat_map(move |y| (x0..x1).map(move |x| (x, y)))
    }
}

/// Produces the task list for a frame.
pub struct TaskGenerator;

impl TaskGenerator {
    /// Tile a `width x height` frame. Tasks are disjoint and together cover
    /// every pixel exactly once; edge tasks are clipped to the frame.
    pub fn generate(
        width: u32,
        height: u32,
        region_type: RegionType,
        region_size: u32,
    ) -> Vec<RenderTask> {
        let size = region_size.max(1);
        let mut tasks = Vec::new();

        match region_type {
            RegionType::Pixel => {
                for y in 0..height {
                    for x in 0..width {
                        tasks.push(RenderTask::new(tasks.len(), x, y, x + 1, y + 1));
                    }
                }
            }
            RegionType::Line => {
                for y in (0..height).step_by(size as usize) {
                    tasks.push(RenderTask::new(tasks.len(), 0, y, width, (y + size).min(height)));
                }
            }
            RegionType::Column => {
                for x in (0..width).step_by(size as usize) {
                    tasks.push(RenderTask::new(tasks.len(), x, 0, (x + size).min(width), height));
                }
            }
            RegionType::Rectangle => {
                for y in (0..height).step_by(size as usize) {
                    for x in (0..width).step_by(size as usize) {
                        tasks.push(RenderTask::new(
                            tasks.len(),
                            x,
                            y,
                            (x + size).min(width),
                            (y + size).min(height),
                        ));
                    }
                }
                sort_center_out(&mut tasks, width, height);
            }
        }

        if width == 0 || height == 0 {
            tasks.clear();
        }
        tasks
    }
}

/// Order tiles by distance of their centre from the frame centre and
/// renumber them.
fn sort_center_out(tasks: &mut [RenderTask], width: u32, height: u32) {
    let center_x = width as f32 / 2.0;
    let center_y = height as f32 / 2.0;
    let distance = |t: &RenderTask| {
        let dx = (t.start_x + t.end_x) as f32 / 2.0 - center_x;
        let dy = (t.start_y + t.end_y) as f32 / 2.0 - center_y;
        dx * dx + dy * dy
    };

    tasks.sort_by(|a, b| distance(a).total_cmp(&distance(b)));
    for (i, task) in tasks.iter_mut().enumerate() {
        task.id = i;
    }
}

/// Pixels of a finished task.
#[derive(Debug, Clone, PartialEq)]
pub struct TaskResult {
    pub task: RenderTask,
    /// Row-major within the task
    pub pixels: Vec<Color>,
}

/// Render every pixel of `task`.
pub fn render_task(
    task: &RenderTask,
    strategy: &dyn TransportStrategy,
    camera: &Camera,
    scene: &Scene,
    samples: u32,
    config: &RenderConfig,
) -> TaskResult {
    let pixels = task
        .pixels()
        .map(|(x, y)| render_pixel(strategy, camera, scene, x, y, samples, config))
        .collect();

    TaskResult { task: *task, pixels }
}

#[cfg(test)]
mod tests {
    use super::*;

    const ALL_REGIONS: [RegionType; 4] = [
        RegionType::Pixel,
        RegionType::Line,
        RegionType::Column,
        RegionType::Rectangle,
    ];

    /// Every pixel is covered by exactly one task.
    fn assert_exact_cover(tasks: &[RenderTask], width: u32, height: u32) {
        let mut hits = vec![0u8; (width * height) as usize];
        for task in tasks {
            assert!(task.end_x <= width && task.end_y <= height, "{task:?} exceeds frame");
            assert!(task.pixel_count() > 0, "{task:?} is empty");
            for (x, y) in task.pixels() {
                hits[(y * width + x) as usize] += 1;
            }
        }
        assert!(hits.iter().all(|&h| h == 1));
    }

    #[test]
    fn test_tiling_covers_frame_exactly() {
        for region_type in ALL_REGIONS {
            for (width, height, size) in [(64, 64, 8), (37, 23, 8), (10, 3, 16), (1, 1, 1), (5, 7, 2)] {
                let tasks = TaskGenerator::generate(width, height, region_type, size);
                assert_exact_cover(&tasks, width, height);
            }
        }
    }

    #[test]
    fn test_task_counts() {
        assert_eq!(TaskGenerator::generate(37, 23, RegionType::Pixel, 8).len(), 37 * 23);
        assert_eq!(TaskGenerator::generate(37, 23, RegionType::Line, 8).len(), 3);
        assert_eq!(TaskGenerator::generate(37, 23, RegionType::Column, 8).len(), 5);
        assert_eq!(TaskGenerator::generate(37, 23, RegionType::Rectangle, 8).len(), 15);
    }

    #[test]
    fn test_edge_tasks_are_clipped() {
        let columns = TaskGenerator::generate(20, 4, RegionType::Column, 8);
        let last = columns.last().unwrap();
        assert_eq!((last.start_x, last.end_x), (16, 20));
        assert_eq!(last.height(), 4);
    }

    #[test]
    fn test_ids_follow_dispatch_order() {
        for region_type in ALL_REGIONS {
            let tasks = TaskGenerator::generate(30, 30, region_type, 7);
            for (i, task) in tasks.iter().enumerate() {
                assert_eq!(task.id, i);
            }
        }
    }

    #[test]
    fn test_rectangles_start_at_center() {
        let tasks = TaskGenerator::generate(192, 192, RegionType::Rectangle, 64);
        assert_eq!(tasks.len(), 9);
        assert_eq!((tasks[0].start_x, tasks[0].start_y), (64, 64));
        assert!(tasks[0].contains(96, 96));
    }

    #[test]
    fn test_empty_frame_has_no_tasks() {
        for region_type in ALL_REGIONS {
            assert!(TaskGenerator::generate(0, 10, region_type, 4).is_empty());
            assert!(TaskGenerator::generate(10, 0, region_type, 4).is_empty());
        }
    }

    #[test]
    fn test_zero_region_size_is_treated_as_one() {
        let tasks = TaskGenerator::generate(4, 4, RegionType::Column, 0);
        assert_eq!(tasks.len(), 4);
        assert_exact_cover(&tasks, 4, 4);
    }
}
