use std::collections::HashSet;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Endpoints of an epipolar line across an image of the given width.
///
/// The line `a*x + b*y + c = 0` is evaluated at `x = 0` and `x = width`.
///
/// # Returns
///
/// `None` for lines that are (almost) vertical, where `y` is undefined.
pub fn line_segment(line: &[f64; 3], width: f64) -> Option<([f64; 2], [f64; 2])> {
    let [a, b, c] = *line;
    if b.abs() <= f64::EPSILON {
        return None;
    }
    let y0 = -c / b;
    let y1 = -(c + a * width) / b;
    Some(([0.0, y0], [width, y1]))
}

/// An RGB color.
pub type Rgb = [u8; 3];

/// Deterministic generator of distinct colors for drawing epipolar lines.
///
/// Hues are spread with the golden angle from a start hue picked by the seed,
/// so the same seed always yields the same colors.
#[derive(Debug, Clone)]
pub struct Palette {
    seed: u64,
}

const GOLDEN_RATIO_CONJUGATE: f64 = 0.618_033_988_749_895;

// hue steps tried per color before a repeat is accepted
const MAX_ATTEMPTS: usize = 32;

impl Palette {
    /// Create a palette for the given seed.
    pub fn new(seed: u64) -> Self {
        Self { seed }
    }

    /// Generate `n` colors.
    ///
    /// Colors are pairwise distinct as long as distinct ones are found within a few hue
    /// steps; past that point (several thousand colors) repeats are allowed.
    pub fn colors(&self, n: usize) -> Vec<Rgb> {
        let mut rng = StdRng::seed_from_u64(self.seed);
        let mut hue = rng.random::<f64>();

        let mut colors: Vec<Rgb> = Vec::with_capacity(n);
        let mut seen: HashSet<Rgb> = HashSet::with_capacity(n);
        let mut step = 0usize;
        for _ in 0..n {
            let mut color = [0; 3];
            for _ in 0..MAX_ATTEMPTS {
                hue = (hue + GOLDEN_RATIO_CONJUGATE).fract();
                // cycle saturation and value so that colors with the same rounded hue still differ
                let saturation = 0.95 - 0.3 * ((step / 3) % 3) as f64;
                let value = 0.95 - 0.15 * (step % 3) as f64;
                step += 1;

                color = hsv_to_rgb(hue, saturation, value);
                if !seen.contains(&color) {
                    break;
                }
            }
            seen.insert(color);
            colors.push(color);
        }
        colors
    }
}

fn hsv_to_rgb(h: f64, s: f64, v: f64) -> Rgb {
    let h6 = h * 6.0;
    let sector = h6.floor();
    let f = h6 - sector;
    let (p, q, t) = (v * (1.0 - s), v * (1.0 - s * f), v * (1.0 - s * (1.0 - f)));
    let (r, g, b) = match sector as u8 % 6 {
        0 => (v, t, p),
        1 => (q, v, p),
        2 => (p, v, t),
        3 => (p, q, v),
        4 => (t, p, v),
        _ => (v, p, q),
    };
    let to_u8 = |x: f64| (x * 255.0).round().clamp(0.0, 255.0) as u8;
    [to_u8(r), to_u8(g), to_u8(b)]
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_line_segment() {
        // y = 0.5 * x + 10  <=>  0.5 x - y + 10 = 0
        let (p0, p1) = line_segment(&[0.5, -1.0, 10.0], 640.0).expect("not vertical");
        assert_relative_eq!(p0[0], 0.0);
        assert_relative_eq!(p0[1], 10.0);
        assert_relative_eq!(p1[0], 640.0);
        assert_relative_eq!(p1[1], 330.0);
    }

    #[test]
    fn test_line_segment_vertical() {
        assert!(line_segment(&[1.0, 0.0, -20.0], 640.0).is_none());
    }

    #[test]
    fn test_palette_deterministic_and_distinct() {
        let a = Palette::new(42).colors(64);
        let b = Palette::new(42).colors(64);
        assert_eq!(a, b);
        for i in 0..a.len() {
            for j in (i + 1)..a.len() {
                assert_ne!(a[i], a[j]);
            }
        }
        assert_ne!(Palette::new(7).colors(4), a[..4]);
    }

    #[test]
    fn test_palette_many_colors() {
        let colors = Palette::new(42).colors(10_000);
        assert_eq!(colors.len(), 10_000);
        assert_eq!(colors[..64], Palette::new(42).colors(64)[..]);
        let distinct = colors.iter().collect::<HashSet<_>>().len();
        assert!(distinct > 1_000, "{distinct} distinct colors");
    }

    #[test]
    fn test_hsv_to_rgb() {
        assert_eq!(hsv_to_rgb(0.0, 1.0, 1.0), [255, 0, 0]);
        assert_eq!(hsv_to_rgb(1.0 / 3.0, 1.0, 1.0), [0, 255, 0]);
        assert_eq!(hsv_to_rgb(0.5, 0.0, 1.0), [255, 255, 255]);
    }
}
