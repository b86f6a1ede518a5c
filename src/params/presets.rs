use std::sync::Arc;

use crate::compat::ValidatedPairing;
use crate::error::Result;
use crate::params::{ContextParams, ContextParamsBuilder, ScalingTechnique, SecretKeyDistribution};

/// Two-iteration bootstrapping with composite scaling, small enough for demos.
///
/// N = 2^7 with full packing (64 slots). 61-bit scaling moduli split over 27-bit
/// register words gives 3 words per level. Level budget [3, 3], 10 levels left for
/// computation after the refresh.
pub fn iterative_composite(pairing: ValidatedPairing) -> Result<Arc<ContextParams>> {
    ContextParamsBuilder::new(pairing)
        .ring_dim(1 << 7)
        .secret_key_dist(SecretKeyDistribution::UniformTernary)
        .scaling_technique(ScalingTechnique::CompositeScalingAuto)
        .scaling_mod_size(61)
        .first_mod_size(66)
        .register_word_size(27)
        .level_budget(3, 3)
        .levels_after_bootstrap(10)
        .iterations(2)
        .build()
}

/// Two-iteration bootstrapping on single-word levels.
/// N = 2^12, 59-bit scaling, 60-bit first modulus, 8 sparse slots.
pub fn iterative_flexible(pairing: ValidatedPairing) -> Result<Arc<ContextParams>> {
    ContextParamsBuilder::new(pairing)
        .ring_dim(1 << 12)
        .num_slots(8)
        .scaling_technique(ScalingTechnique::FlexibleAuto)
        .scaling_mod_size(59)
        .first_mod_size(60)
        .level_budget(4, 4)
        .levels_after_bootstrap(10)
        .iterations(2)
        .build()
}

/// Plain single-pass bootstrapping, the baseline the iterative presets are compared to.
pub fn single_pass(pairing: ValidatedPairing) -> Result<Arc<ContextParams>> {
    ContextParamsBuilder::new(pairing)
        .ring_dim(1 << 12)
        .num_slots(8)
        .scaling_technique(ScalingTechnique::FlexibleAuto)
        .level_budget(4, 4)
        .levels_after_bootstrap(10)
        .iterations(1)
        .build()
}
