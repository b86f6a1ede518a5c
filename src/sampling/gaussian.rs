use num_complex::Complex64;
use rand::Rng;

/// Sample from N(0, σ²) with Box-Muller (NOT constant time).
/// Only for simulating approximation error; never for key material.
pub fn sample_gaussian<R: Rng>(sigma: f64, rng: &mut R) -> f64 {
    // 1 - u keeps the logarithm argument in (0, 1]
    let u1: f64 = 1.0 - rng.random::<f64>();
    let u2: f64 = rng.random::<f64>();
    let z = (-2.0 * u1.ln()).sqrt() * (2.0 * std::f64::consts::PI * u2).cos();
    z * sigma
}

/// Independent Gaussian noise on the real and imaginary part of each slot.
pub fn sample_complex_noise<R: Rng>(n: usize, sigma: f64, rng: &mut R) -> Vec<Complex64> {
    (0..n)
        .map(|_| {
            let re = sample_gaussian(sigma, rng);
            let im = sample_gaussian(sigma, rng);
            Complex64::new(re, im)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha20Rng;

    #[test]
    fn test_gaussian_distribution() {
        let mut rng = ChaCha20Rng::seed_from_u64(42);
        let sigma = 3.2;
        let n = 10000;

        let samples: Vec<f64> = (0..n).map(|_| sample_gaussian(sigma, &mut rng)).collect();

        let mean: f64 = samples.iter().sum::<f64>() / n as f64;
        assert!(mean.abs() < 0.2, "mean = {mean}");

        let var: f64 = samples.iter().map(|&x| (x - mean).powi(2)).sum::<f64>() / n as f64;
        let expected_var = sigma * sigma;
        assert!((var - expected_var).abs() < 1.0, "var = {var}, expected ≈ {expected_var}");

        for &s in &samples {
            assert!(s.is_finite());
        }
    }

    #[test]
    fn test_complex_noise_scale() {
        let mut rng = ChaCha20Rng::seed_from_u64(7);
        let sigma = 2f64.powi(-20);
        let noise = sample_complex_noise(1024, sigma, &mut rng);
        assert_eq!(noise.len(), 1024);
        // 8σ is never reached at this sample size
        for z in &noise {
            assert!(z.re.abs() < 8.0 * sigma && z.im.abs() < 8.0 * sigma);
        }
    }
}
