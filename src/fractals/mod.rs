pub mod mandelbrot;

use num::Complex;

use crate::{config::BenchConfig, error::RenderError};

pub const MAX_ITER: u32 = 256;
pub const ESCAPE_RADIUS_SQR: f64 = 4.0;

/// Affine map from pixel (column, row) to a point of the complex plane.
///
/// Pixel (0, 0) lands exactly on `top_left`; the last pixel lands one step
/// short of `lower_right`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Viewport {
    top_left: Complex<f64>,
    delta: Complex<f64>,
    width: u32,
    height: u32,
}

impl Viewport {
    pub fn new(
        top_left: Complex<f64>,
        lower_right: Complex<f64>,
        width: u32,
        height: u32,
    ) -> Result<Viewport, RenderError> {
        if width == 0 || height == 0 {
            return Err(RenderError::InvalidConfig(format!(
                "viewport must have positive dimensions, got {width}x{height}"
            )));
        }
        let diff = lower_right - top_left;
        Ok(Viewport {
            top_left,
            delta: Complex::new(diff.re / width as f64, diff.im / height as f64),
            width,
            height,
        })
    }

    pub fn from_config(config: &BenchConfig) -> Result<Viewport, RenderError> {
        Viewport::new(
            config.top_left,
            config.lower_right,
            config.width,
            config.height,
        )
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn pix_to_coord(&self, column: u32, row: u32) -> Complex<f64> {
        self.top_left + Complex::new(self.delta.re * column as f64, self.delta.im * row as f64)
    }
}
