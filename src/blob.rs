// src/blob.rs
use ndarray::Array1;
use rand::Rng;
use rand_distr::StandardNormal;
use std::f64::consts::PI;

/// Number of outline points every poster blob is drawn with
pub const BLOB_POINTS: usize = 200;

/// Closed wobbly outline, stored as parallel coordinate arrays
#[derive(Debug, Clone, PartialEq)]
pub struct BlobShape {
    xs: Array1<f64>,
    ys: Array1<f64>,
}

impl BlobShape {
    pub fn xs(&self) -> &Array1<f64> {
        &self.xs
    }

    pub fn ys(&self) -> &Array1<f64> {
        &self.ys
    }

    pub fn len(&self) -> usize {
        self.xs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.xs.is_empty()
    }

    pub fn points(&self) -> impl Iterator<Item = (f64, f64)> + '_ {
        self.xs.iter().copied().zip(self.ys.iter().copied())
    }

    /// Axis-aligned bounds as (min_x, min_y, max_x, max_y), None for an empty shape
    pub fn bounds(&self) -> Option<(f64, f64, f64, f64)> {
        if self.is_empty() {
            return None;
        }
        let fold = |a: &Array1<f64>| {
            a.iter()
                .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), &v| {
                    (lo.min(v), hi.max(v))
                })
        };
        let (min_x, max_x) = fold(&self.xs);
        let (min_y, max_y) = fold(&self.ys);
        Some((min_x, min_y, max_x, max_y))
    }
}

/// Perturbed circle around (x_center, y_center).
///
/// Angles span [0, 2π] inclusive, so the first and last points share an angle.
/// Each point's radius is `radius * (1 + wobble * z)` with `z` a standard
/// normal draw from `rng`. Fewer than three points yields a degenerate shape.
pub fn blob<R: Rng + ?Sized>(
    rng: &mut R,
    x_center: f64,
    y_center: f64,
    radius: f64,
    wobble: f64,
    n_points: usize,
) -> BlobShape {
    let angles: Array1<f64> = Array1::linspace(0.0, 2.0 * PI, n_points);
    let noise: Array1<f64> = Array1::from_shape_fn(n_points, |_| rng.sample(StandardNormal));
    let radii = radius * (1.0 + wobble * noise);

    let xs = x_center + &radii * &angles.mapv(f64::cos);
    let ys = y_center + &radii * &angles.mapv(f64::sin);

    BlobShape { xs, ys }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    #[test]
    fn test_point_count() {
        let mut rng = ChaCha8Rng::seed_from_u64(1);
        for n in [0, 1, 2, 3, 17, BLOB_POINTS] {
            let shape = blob(&mut rng, 0.0, 0.0, 1.0, 0.1, n);
            assert_eq!(shape.len(), n);
            assert_eq!(shape.ys().len(), n);
        }
    }

    #[test]
    fn test_zero_wobble_is_circle() {
        let mut rng = ChaCha8Rng::seed_from_u64(7);
        let shape = blob(&mut rng, 3.0, -2.0, 1.5, 0.0, 64);

        for (x, y) in shape.points() {
            let r = ((x - 3.0).powi(2) + (y + 2.0).powi(2)).sqrt();
            assert_abs_diff_eq!(r, 1.5, epsilon = 1e-12);
        }

        // first and last share angle 0 / 2π
        assert_abs_diff_eq!(shape.xs()[0], 4.5, epsilon = 1e-12);
        assert_abs_diff_eq!(shape.xs()[63], 4.5, epsilon = 1e-12);
        assert_abs_diff_eq!(shape.ys()[0], -2.0, epsilon = 1e-12);
        assert_abs_diff_eq!(shape.ys()[63], -2.0, epsilon = 1e-9);
    }

    #[test]
    fn test_same_seed_same_shape() {
        let a = blob(&mut ChaCha8Rng::seed_from_u64(42), 1.0, 1.0, 2.0, 0.1, BLOB_POINTS);
        let b = blob(&mut ChaCha8Rng::seed_from_u64(42), 1.0, 1.0, 2.0, 0.1, BLOB_POINTS);
        let c = blob(&mut ChaCha8Rng::seed_from_u64(43), 1.0, 1.0, 2.0, 0.1, BLOB_POINTS);
        assert_eq!(a, b);
        assert_ne!(a, c);
    }

    #[test]
    fn test_consecutive_calls_differ() {
        let mut rng = ChaCha8Rng::seed_from_u64(5);
        let a = blob(&mut rng, 0.0, 0.0, 2.0, 0.1, BLOB_POINTS);
        let b = blob(&mut rng, 0.0, 0.0, 2.0, 0.1, BLOB_POINTS);
        assert_ne!(a, b);
    }

    #[test]
    fn test_wobble_spread() {
        // mean radius stays near the base radius, spread near radius * wobble
        let mut rng = ChaCha8Rng::seed_from_u64(11);
        let shape = blob(&mut rng, 0.0, 0.0, 2.0, 0.1, 20_000);
        let radii: Vec<f64> = shape.points().map(|(x, y)| (x * x + y * y).sqrt()).collect();
        let n = radii.len() as f64;
        let mean = radii.iter().sum::<f64>() / n;
        let var = radii.iter().map(|r| (r - mean).powi(2)).sum::<f64>() / n;
        assert_abs_diff_eq!(mean, 2.0, epsilon = 0.01);
        assert_abs_diff_eq!(var.sqrt(), 0.2, epsilon = 0.01);
    }

    #[test]
    fn test_bounds() {
        let mut rng = ChaCha8Rng::seed_from_u64(3);
        assert!(blob(&mut rng, 0.0, 0.0, 1.0, 0.1, 0).bounds().is_none());

        let shape = blob(&mut rng, 5.0, 5.0, 1.0, 0.0, 360);
        let (min_x, min_y, max_x, max_y) = shape.bounds().unwrap();
        assert_abs_diff_eq!(min_x, 4.0, epsilon = 1e-3);
        assert_abs_diff_eq!(max_x, 6.0, epsilon = 1e-12);
        assert_abs_diff_eq!(min_y, 4.0, epsilon = 1e-3);
        assert_abs_diff_eq!(max_y, 6.0, epsilon = 1e-3);
    }
}
