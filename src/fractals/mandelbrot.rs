use num::Complex;

use super::{ESCAPE_RADIUS_SQR, MAX_ITER};

fn z_escaped(z: Complex<f64>) -> bool {
    z.norm_sqr() >= ESCAPE_RADIUS_SQR
}

/// Escape-time of `c`, in `[0, MAX_ITER]`.
///
/// The orbit is seeded at `z = c`, not at zero, so the image is one step
/// ahead of the textbook recurrence.
pub fn escape_time(c: Complex<f64>) -> u32 {
    let mut z = c;
    let mut i = 0;
    while i < MAX_ITER && !z_escaped(z) {
        z = z * z + c;
        i += 1;
    }
    i
}
