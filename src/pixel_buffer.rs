use image::{Rgb, RgbImage};

use crate::{colors::BLACK, error::RenderError, tiles::Tile};

/// Row-major arena of colors, one per (column, row).
#[derive(Debug, Clone, PartialEq)]
pub struct PixelBuffer {
    width: u32,
    height: u32,
    pixels: Vec<Rgb<u8>>,
}

/// Exclusive access to the pixels of one tile.
///
/// `rows[i]` is the slice of row `tile.row_start + i` covering
/// `tile.col_start..tile.col_end`.
pub struct TileView<'a> {
    pub tile: Tile,
    pub rows: Vec<&'a mut [Rgb<u8>]>,
}

impl PixelBuffer {
    pub fn new(width: u32, height: u32) -> Result<PixelBuffer, RenderError> {
        if width == 0 || height == 0 {
            return Err(RenderError::InvalidConfig(format!(
                "pixel buffer must have positive dimensions, got {width}x{height}"
            )));
        }
        let len = (width as usize)
            .checked_mul(height as usize)
            .ok_or(RenderError::Allocation { width, height })?;
        let mut pixels = Vec::new();
        pixels
            .try_reserve_exact(len)
            .map_err(|_| RenderError::Allocation { width, height })?;
        pixels.resize(len, BLACK);
        Ok(PixelBuffer {
            width,
            height,
            pixels,
        })
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn get(&self, column: u32, row: u32) -> Rgb<u8> {
        self.pixels[row as usize * self.width as usize + column as usize]
    }

    /// Splits the buffer into one view per tile of `grain` x `grain` pixels,
    /// in the same order as [`crate::tiles::tile_grid`].
    ///
    /// The views borrow disjoint slices, so they can be handed to different
    /// workers without locking.
    pub fn tile_views(&mut self, grain: u32) -> Vec<TileView<'_>> {
        assert!(grain > 0, "grain size must be positive");
        let width = self.width as usize;
        let grain = grain as usize;
        let tiles_per_band = width.div_ceil(grain);
        let band_len = grain.saturating_mul(width);

        let mut views: Vec<TileView<'_>> = Vec::new();
        for (band_index, band) in self.pixels.chunks_mut(band_len).enumerate() {
            let row_start = band_index * grain;
            let band_rows = band.len() / width;
            let first = views.len();
            for tile_col in 0..tiles_per_band {
                let col_start = tile_col * grain;
                views.push(TileView {
                    tile: Tile {
                        row_start: row_start as u32,
                        row_end: (row_start + band_rows) as u32,
                        col_start: col_start as u32,
                        col_end: (col_start + grain).min(width) as u32,
                    },
                    rows: Vec::with_capacity(band_rows),
                });
            }
            for row in band.chunks_mut(width) {
                for (tile_col, segment) in row.chunks_mut(grain).enumerate() {
                    views[first + tile_col].rows.push(segment);
                }
            }
        }
        views
    }

    pub fn to_image(&self) -> RgbImage {
        RgbImage::from_fn(self.width, self.height, |x, y| self.get(x, y))
    }
}
