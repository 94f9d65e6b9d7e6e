use image::Rgb;

use crate::fractals::MAX_ITER;

pub const BLACK: Rgb<u8> = Rgb([0, 0, 0]);

/// Red bands of ten levels per iteration, wrapping every 25.6 iterations.
pub fn iters_to_color(iters: u32) -> Rgb<u8> {
    if iters >= MAX_ITER {
        return BLACK;
    }
    // 8-bit multiply, so 10 * iters is taken mod 256
    let red = (iters as u8).wrapping_mul(10);
    Rgb([red, 0, 0])
}
