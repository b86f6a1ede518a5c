//! In-process stand-in for a CKKS bootstrapping backend.
//!
//! Ciphertexts carry their slot values in the clear. Each refresh adds seeded Gaussian
//! noise sized to the precision the pass would reach and moves the level exactly as a
//! real bootstrapping circuit planned with [`crate::depth`] would.

use std::sync::{Arc, Mutex};

use num_complex::Complex64;
use rand::SeedableRng;
use rand_chacha::ChaCha20Rng;
use tracing::trace;

use crate::bootstrap::primitive::{BootstrapPrimitive, LevelledCiphertext, SlotDecoder};
use crate::depth::check_iterations;
use crate::error::{RefreshError, Result};
use crate::params::{ContextParams, MAX_REFRESH_ITERATIONS};
use crate::sampling::sample_complex_noise;

/// Best precision the simulation will report for any number of passes.
pub const SIM_PRECISION_CEILING_BITS: f64 = 48.0;

#[derive(Clone, Debug, PartialEq)]
pub struct SimCiphertext {
    slots: Vec<Complex64>,
    level: u32,
    noise_scale_degree: u32,
}

impl SimCiphertext {
    pub fn new(slots: Vec<Complex64>, level: u32, noise_scale_degree: u32) -> Self {
        Self {
            slots,
            level,
            noise_scale_degree,
        }
    }

    /// Encode `values` at the last level of the chain, as if every level had been used.
    pub fn encrypt_depleted(values: &[Complex64], params: &ContextParams) -> Result<Self> {
        if values.is_empty() || values.len() > params.num_slots {
            return Err(RefreshError::InvalidParam(format!(
                "expected 1..={} slot values, got {}",
                params.num_slots,
                values.len()
            )));
        }
        Ok(Self::new(values.to_vec(), params.depleted_level()?, 1))
    }

    pub fn slots(&self) -> &[Complex64] {
        &self.slots
    }
}

impl LevelledCiphertext for SimCiphertext {
    fn level(&self) -> u32 {
        self.level
    }

    fn noise_scale_degree(&self) -> u32 {
        self.noise_scale_degree
    }
}

/// Simulated bootstrapping with a fixed single-pass precision.
///
/// Precision model: one pass reaches `single_pass_bits`. With `n` passes and hint `h`
/// each extra pass adds `h` bits as long as `h` does not exceed what one pass really
/// achieves; an overstated hint amplifies the residual error instead of cancelling it.
pub struct SimulatedBootstrapper {
    params: Arc<ContextParams>,
    single_pass_bits: f64,
    max_iterations: u32,
    rng: Mutex<ChaCha20Rng>,
}

impl SimulatedBootstrapper {
    pub fn new(params: Arc<ContextParams>, single_pass_bits: f64, seed: u64) -> Result<Self> {
        if !(single_pass_bits > 0.0 && single_pass_bits <= SIM_PRECISION_CEILING_BITS) {
            return Err(RefreshError::InvalidParam(format!(
                "single-pass precision must be in (0, {SIM_PRECISION_CEILING_BITS}] bits, got {single_pass_bits}"
            )));
        }
        Ok(Self {
            params,
            single_pass_bits,
            max_iterations: MAX_REFRESH_ITERATIONS,
            rng: Mutex::new(ChaCha20Rng::seed_from_u64(seed)),
        })
    }

    pub fn with_max_iterations(mut self, max_iterations: u32) -> Self {
        self.max_iterations = max_iterations;
        self
    }

    pub fn params(&self) -> &Arc<ContextParams> {
        &self.params
    }

    /// Precision, in bits, of an `iterations`-pass refresh with the given hint.
    pub fn effective_bits(&self, iterations: u32, hint: u32) -> f64 {
        let single = self.single_pass_bits;
        if iterations <= 1 {
            return single;
        }
        let hint = hint as f64;
        let gain = if hint <= single {
            hint
        } else {
            (2.0 * single - hint).max(0.0)
        };
        (single + (iterations - 1) as f64 * gain).min(SIM_PRECISION_CEILING_BITS)
    }

    /// `levels` logical levels expressed in machine words.
    fn word_levels(&self, levels: u32) -> Result<u32> {
        levels
            .checked_mul(self.params.composite_degree)
            .ok_or(RefreshError::LevelBudgetExceeded {
                depth: self.params.multiplicative_depth(),
                consumed: levels,
            })
    }

    fn bootstrap(&self, ct: &SimCiphertext, iterations: u32, bits: f64) -> Result<SimCiphertext> {
        check_iterations(iterations, self.max_iterations)?;
        if iterations > self.params.iterations() {
            return Err(RefreshError::BootstrapFailed(format!(
                "context depth was planned for {} iteration(s), {} requested",
                self.params.iterations(),
                iterations
            )));
        }
        let chain = self.word_levels(self.params.multiplicative_depth())?;
        if ct.level > chain {
            return Err(RefreshError::BootstrapFailed(format!(
                "input level {} is outside the modulus chain of {} words",
                ct.level, chain
            )));
        }

        let sigma = 2f64.powf(-bits);
        let noise = {
            let mut rng = self
                .rng
                .lock()
                .map_err(|_| RefreshError::BootstrapFailed("noise source poisoned".into()))?;
            sample_complex_noise(ct.slots.len(), sigma, &mut *rng)
        };
        trace!(iterations, bits, "simulated bootstrap pass");

        let consumed = self.params.depth.bootstrap_depth().saturating_add(iterations - 1);
        Ok(SimCiphertext {
            slots: ct.slots.iter().zip(&noise).map(|(s, e)| s + e).collect(),
            level: self.word_levels(consumed)?,
            noise_scale_degree: 1,
        })
    }
}

impl BootstrapPrimitive for SimulatedBootstrapper {
    type Ciphertext = SimCiphertext;

    fn refresh(&self, ct: &SimCiphertext) -> Result<SimCiphertext> {
        self.bootstrap(ct, 1, self.single_pass_bits)
    }

    fn refresh_iterative(&self, ct: &SimCiphertext, iterations: u32, precision_hint: u32) -> Result<SimCiphertext> {
        self.bootstrap(ct, iterations, self.effective_bits(iterations, precision_hint))
    }

    fn max_iterations(&self) -> u32 {
        self.max_iterations
    }
}

/// Reads slot values straight out of a [`SimCiphertext`].
#[derive(Clone, Copy, Debug, Default)]
pub struct SimDecoder;

impl SlotDecoder<SimCiphertext> for SimDecoder {
    fn decode(&self, ct: &SimCiphertext) -> Result<Vec<Complex64>> {
        Ok(ct.slots.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::params::presets::{iterative_composite, single_pass};
    use crate::compat::{validate, BootstrapMethod, ParamSet, ValidatedPairing};
    use crate::params::{ContextParamsBuilder, ScalingTechnique};
    use crate::precision::{measure_precision, real_slots};

    fn ginx() -> ValidatedPairing {
        validate(BootstrapMethod::Ginx, ParamSet::Std128).unwrap()
    }

    #[test]
    fn test_effective_bits_model() {
        let sim = SimulatedBootstrapper::new(iterative_composite(ginx()).unwrap(), 20.0, 1).unwrap();
        assert_eq!(sim.effective_bits(1, 99), 20.0);
        assert_eq!(sim.effective_bits(2, 19), 39.0);
        assert_eq!(sim.effective_bits(2, 20), 40.0);
        assert_eq!(sim.effective_bits(2, 24), 36.0);
        assert_eq!(sim.effective_bits(2, 45), 20.0);
    }

    #[test]
    fn test_refresh_moves_level_to_bootstrap_cost() {
        let params = iterative_composite(ginx()).unwrap();
        let sim = SimulatedBootstrapper::new(params.clone(), 20.0, 1).unwrap();
        let ct = SimCiphertext::encrypt_depleted(&real_slots(&[0.5; 8]), &params).unwrap();
        assert_eq!(ct.level(), 3 * (params.multiplicative_depth() - 1));

        let once = sim.refresh(&ct).unwrap();
        assert_eq!(once.level(), 3 * params.depth.bootstrap_depth());
        let twice = sim.refresh_iterative(&ct, 2, 18).unwrap();
        assert_eq!(twice.level(), 3 * (params.depth.bootstrap_depth() + 1));
    }

    #[test]
    fn test_noise_matches_requested_precision() {
        let params = iterative_composite(ginx()).unwrap();
        let sim = SimulatedBootstrapper::new(params.clone(), 20.0, 5).unwrap();
        let values = real_slots(&[0.25; 64]);
        let ct = SimCiphertext::encrypt_depleted(&values, &params).unwrap();

        let once = measure_precision(sim.refresh(&ct).unwrap().slots(), &values).unwrap();
        assert!(once.bits() > 15.0 && once.bits() <= 21.0, "got {once}");

        let twice = measure_precision(sim.refresh_iterative(&ct, 2, 17).unwrap().slots(), &values).unwrap();
        assert!(twice.bits() > once.bits() + 12.0, "got {twice} after {once}");
    }

    #[test]
    fn test_iterations_beyond_plan_fail() {
        let params = single_pass(ginx()).unwrap();
        let sim = SimulatedBootstrapper::new(params.clone(), 20.0, 1).unwrap();
        let ct = SimCiphertext::encrypt_depleted(&real_slots(&[0.5]), &params).unwrap();
        assert!(matches!(
            sim.refresh_iterative(&ct, 2, 18),
            Err(RefreshError::BootstrapFailed(_))
        ));
        assert!(matches!(
            sim.refresh_iterative(&ct, 3, 18),
            Err(RefreshError::UnsupportedIterationCount { requested: 3, max: 2 })
        ));
    }

    #[test]
    fn test_encrypt_depleted_checks_slot_count() {
        let params = iterative_composite(ginx()).unwrap();
        assert!(SimCiphertext::encrypt_depleted(&[], &params).is_err());
        let too_many = real_slots(&vec![0.0; params.num_slots + 1]);
        assert!(SimCiphertext::encrypt_depleted(&too_many, &params).is_err());
    }

    #[test]
    fn test_rejects_bad_single_pass_precision() {
        let params = iterative_composite(ginx()).unwrap();
        assert!(SimulatedBootstrapper::new(params.clone(), 0.0, 1).is_err());
        assert!(SimulatedBootstrapper::new(params, 60.0, 1).is_err());
    }

    #[test]
    fn test_oversized_composite_degree_is_an_error() {
        let params = ContextParamsBuilder::new(ginx())
            .scaling_technique(ScalingTechnique::CompositeScalingManual)
            .composite_degree(u32::MAX)
            .iterations(2)
            .build()
            .unwrap();
        let values = real_slots(&[0.5]);
        assert!(matches!(
            SimCiphertext::encrypt_depleted(&values, &params),
            Err(RefreshError::InvalidParam(_))
        ));

        let sim = SimulatedBootstrapper::new(params, 20.0, 1).unwrap();
        let ct = SimCiphertext::new(values, 0, 1);
        assert!(matches!(sim.refresh(&ct), Err(RefreshError::LevelBudgetExceeded { .. })));
    }
}
