use log::debug;
use rayon::prelude::*;
use rayon::{ThreadPool, ThreadPoolBuilder};

use crate::{
    colors::iters_to_color,
    error::RenderError,
    fractals::{mandelbrot::escape_time, Viewport},
    pixel_buffer::{PixelBuffer, TileView},
};

/// Half-open rectangle of pixels: rows `row_start..row_end`, columns `col_start..col_end`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Tile {
    pub row_start: u32,
    pub row_end: u32,
    pub col_start: u32,
    pub col_end: u32,
}

fn ranges(len: u32, grain: u32) -> impl Iterator<Item = (u32, u32)> {
    (0..len)
        .step_by(grain as usize)
        .map(move |start| (start, start.saturating_add(grain).min(len)))
}

/// Cross product of `[0, g), [g, 2g), ...` over rows and columns, row-major.
/// Boundary tiles are truncated to the grid.
pub fn tile_grid(height: u32, width: u32, grain: u32) -> Vec<Tile> {
    assert!(grain > 0, "grain size must be positive");
    ranges(height, grain)
        .flat_map(|(row_start, row_end)| {
            ranges(width, grain).map(move |(col_start, col_end)| Tile {
                row_start,
                row_end,
                col_start,
                col_end,
            })
        })
        .collect()
}

fn render_tile(viewport: &Viewport, view: TileView<'_>) {
    let tile = view.tile;
    for (row, pixels) in (tile.row_start..).zip(view.rows) {
        for (column, pixel) in (tile.col_start..).zip(pixels.iter_mut()) {
            *pixel = iters_to_color(escape_time(viewport.pix_to_coord(column, row)));
        }
    }
}

/// Fixed-size worker pool running tiles of a pixel buffer in parallel.
pub struct TileScheduler {
    pool: ThreadPool,
}

impl TileScheduler {
    /// `jobs == 0` uses one worker per core.
    pub fn new(jobs: usize) -> Result<TileScheduler, RenderError> {
        let pool = ThreadPoolBuilder::new()
            .num_threads(jobs)
            .thread_name(|index| format!("tile-worker-{index}"))
            .build()?;
        Ok(TileScheduler { pool })
    }

    pub fn workers(&self) -> usize {
        self.pool.current_num_threads()
    }

    /// Runs `work` once per item, each item as its own task, and returns
    /// only after every item has finished.
    pub fn for_each_joined<T, F>(&self, items: Vec<T>, work: F)
    where
        T: Send,
        F: Fn(T) + Send + Sync,
    {
        self.pool.install(|| {
            items.into_par_iter().with_max_len(1).for_each(work);
        });
    }

    /// Renders every pixel of `buffer` using tiles of `grain` x `grain` pixels.
    /// Returns the number of tiles dispatched.
    pub fn render(&self, viewport: &Viewport, buffer: &mut PixelBuffer, grain: u32) -> usize {
        debug_assert_eq!(
            (buffer.width(), buffer.height()),
            (viewport.width(), viewport.height())
        );
        let views = buffer.tile_views(grain);
        let tile_count = views.len();
        debug!("grain size {grain}: dispatching {tile_count} tiles");
        self.for_each_joined(views, |view| render_tile(viewport, view));
        tile_count
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;
    use std::sync::atomic::{AtomicUsize, Ordering};

    use num::Complex;

    use super::*;
    use crate::colors::BLACK;

    fn small_viewport() -> Viewport {
        Viewport::new(Complex::new(-2.2, 1.5), Complex::new(0.8, -1.5), 37, 23).unwrap()
    }

    fn sequential(viewport: &Viewport) -> PixelBuffer {
        let mut buffer = PixelBuffer::new(viewport.width(), viewport.height()).unwrap();
        for view in buffer.tile_views(u32::MAX) {
            render_tile(viewport, view);
        }
        buffer
    }

    #[test_log::test]
    fn tiles_partition_the_grid() {
        let (height, width) = (23, 37);
        for grain in [1, 2, 3, 5, 8, 23, 37, 100] {
            let mut seen = HashSet::new();
            let mut covered = 0u64;
            for tile in tile_grid(height, width, grain) {
                assert!(tile.row_start < tile.row_end && tile.row_end <= height);
                assert!(tile.col_start < tile.col_end && tile.col_end <= width);
                assert!(tile.row_end - tile.row_start <= grain);
                assert!(tile.col_end - tile.col_start <= grain);
                covered += ((tile.row_end - tile.row_start) * (tile.col_end - tile.col_start)) as u64;
                for row in tile.row_start..tile.row_end {
                    for column in tile.col_start..tile.col_end {
                        assert!(seen.insert((row, column)), "pixel covered twice");
                    }
                }
            }
            assert_eq!(covered, (height * width) as u64);
            assert_eq!(seen.len() as u32, height * width);
        }
    }

    #[test_log::test]
    fn boundary_tiles_are_truncated() {
        let tiles = tile_grid(5, 7, 4);
        assert_eq!(tiles.len(), 4);
        assert_eq!(
            tiles[3],
            Tile {
                row_start: 4,
                row_end: 5,
                col_start: 4,
                col_end: 7
            }
        );
    }

    #[test_log::test]
    fn oversized_grain_is_one_tile() {
        let tiles = tile_grid(800, 800, 2048);
        assert_eq!(
            tiles,
            vec![Tile {
                row_start: 0,
                row_end: 800,
                col_start: 0,
                col_end: 800
            }]
        );
    }

    #[test_log::test]
    fn for_each_joined_runs_every_item_before_returning() {
        let scheduler = TileScheduler::new(4).unwrap();
        let counter = AtomicUsize::new(0);
        scheduler.for_each_joined((0..1000).collect(), |_: usize| {
            counter.fetch_add(1, Ordering::Relaxed);
        });
        assert_eq!(counter.load(Ordering::Relaxed), 1000);
    }

    #[test_log::test]
    fn render_is_independent_of_grain_size() {
        let viewport = small_viewport();
        let expected = sequential(&viewport);
        let scheduler = TileScheduler::new(3).unwrap();
        for grain in [1, 2, 4, 7, 16, 37, 64] {
            let mut buffer = PixelBuffer::new(37, 23).unwrap();
            let tiles = scheduler.render(&viewport, &mut buffer, grain);
            assert_eq!(tiles, tile_grid(23, 37, grain).len());
            assert_eq!(buffer, expected, "grain {grain}");
        }
    }

    #[test_log::test]
    fn every_pixel_matches_kernel() {
        let viewport = small_viewport();
        let scheduler = TileScheduler::new(2).unwrap();
        let mut buffer = PixelBuffer::new(37, 23).unwrap();
        scheduler.render(&viewport, &mut buffer, 5);
        for row in 0..23 {
            for column in 0..37 {
                let c = viewport.pix_to_coord(column, row);
                assert_eq!(buffer.get(column, row), iters_to_color(escape_time(c)));
            }
        }
        assert_eq!(buffer.get(0, 0), BLACK);
    }
}
