use num::Complex;

use crate::error::RenderError;

pub const DISPLAY_WIDTH: u32 = 800;
pub const DISPLAY_HEIGHT: u32 = 800;
pub const TOP_LEFT: Complex<f64> = Complex::new(-2.2, 1.5);
pub const LOWER_RIGHT: Complex<f64> = Complex::new(0.8, -1.5);
pub const GRAIN_SIZES: [u32; 12] = [1, 2, 4, 8, 16, 32, 64, 128, 256, 512, 1024, 2048];
pub const JOBS: usize = 0; // 0 lets rayon pick one thread per core
pub const GENERATED_DIR: &str = "generated";
pub const IMAGE_FILE: &str = "mandelbrot.png";
pub const TIMING_FILE: &str = "grain_time.txt";

/// Everything a benchmark run needs, fixed before the first grain size is rendered.
#[derive(Debug, Clone, PartialEq)]
pub struct BenchConfig {
    pub width: u32,
    pub height: u32,
    pub top_left: Complex<f64>,
    pub lower_right: Complex<f64>,
    pub grain_sizes: Vec<u32>,
    pub jobs: usize,
    pub verify: bool,
}

impl Default for BenchConfig {
    fn default() -> Self {
        BenchConfig {
            width: DISPLAY_WIDTH,
            height: DISPLAY_HEIGHT,
            top_left: TOP_LEFT,
            lower_right: LOWER_RIGHT,
            grain_sizes: GRAIN_SIZES.to_vec(),
            jobs: JOBS,
            verify: true,
        }
    }
}

impl BenchConfig {
    pub fn validate(&self) -> Result<(), RenderError> {
        if self.width == 0 || self.height == 0 {
            return Err(RenderError::InvalidConfig(format!(
                "image dimensions must be positive, got {}x{}",
                self.width, self.height
            )));
        }
        if self.grain_sizes.is_empty() {
            return Err(RenderError::InvalidConfig(
                "no grain sizes to benchmark".to_string(),
            ));
        }
        if self.grain_sizes.contains(&0) {
            return Err(RenderError::InvalidConfig(
                "grain sizes must be positive".to_string(),
            ));
        }
        Ok(())
    }
}
