use num_complex::Complex64;
use rand::Rng;

/// Uniform sample in [0, 1).
pub fn sample_unit_interval<R: Rng>(rng: &mut R) -> f64 {
    rng.random::<f64>()
}

/// `n` real-valued slots drawn uniformly from [0, 1), imaginary parts zero.
pub fn sample_real_slots<R: Rng>(n: usize, rng: &mut R) -> Vec<Complex64> {
    (0..n)
        .map(|_| Complex64::new(sample_unit_interval(rng), 0.0))
        .collect()
}
