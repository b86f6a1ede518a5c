pub mod presets;

use std::fmt;
use std::sync::Arc;

use crate::compat::{validate_tags, ValidatedPairing};
use crate::depth::{plan_depth, BootstrapDepthModel, ChebyshevDepthModel, DepthBudget};
use crate::error::{RefreshError, Result};

/// Number of refresh passes the reference bootstrapping primitive supports.
pub const MAX_REFRESH_ITERATIONS: u32 = 2;

/// Largest register word the composite scaling split targets.
const MAX_REGISTER_WORD_SIZE: u32 = 64;

/// Rescaling strategy of the CKKS context.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ScalingTechnique {
    FixedManual,
    FixedAuto,
    FlexibleAuto,
    FlexibleAutoExt,
    /// Each level spans several machine words, sized from the register word size.
    CompositeScalingAuto,
    /// Each level spans a caller-chosen number of machine words.
    CompositeScalingManual,
}

impl ScalingTechnique {
    pub fn is_composite(self) -> bool {
        matches!(self, Self::CompositeScalingAuto | Self::CompositeScalingManual)
    }
}

impl fmt::Display for ScalingTechnique {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::FixedManual => "FIXEDMANUAL",
            Self::FixedAuto => "FIXEDAUTO",
            Self::FlexibleAuto => "FLEXIBLEAUTO",
            Self::FlexibleAutoExt => "FLEXIBLEAUTOEXT",
            Self::CompositeScalingAuto => "COMPOSITESCALINGAUTO",
            Self::CompositeScalingManual => "COMPOSITESCALINGMANUAL",
        };
        f.write_str(name)
    }
}

/// Secret key distribution; it decides the depth of the modular reduction step.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum SecretKeyDistribution {
    #[default]
    UniformTernary,
    SparseTernary,
}

impl fmt::Display for SecretKeyDistribution {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UniformTernary => f.write_str("UNIFORM_TERNARY"),
            Self::SparseTernary => f.write_str("SPARSE_TERNARY"),
        }
    }
}

/// Levels spent by the homomorphic encoding (CoeffsToSlots) and decoding
/// (SlotsToCoeffs) linear transforms.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct LevelBudget {
    pub encode: u32,
    pub decode: u32,
}

impl LevelBudget {
    pub fn new(encode: u32, decode: u32) -> Result<Self> {
        if encode == 0 || decode == 0 {
            return Err(RefreshError::InvalidParam(format!(
                "level budget entries must be >= 1, got [{encode}, {decode}]"
            )));
        }
        Ok(Self { encode, decode })
    }
}

/// Configuration surface of a CKKS context set up for iterative bootstrapping.
#[derive(Clone, Debug)]
pub struct ContextParams {
    /// Bootstrapping method and parameter set accepted by the compatibility gate.
    pub pairing: ValidatedPairing,
    /// Ring dimension N (power of 2).
    pub ring_dim: usize,
    /// Number of packed slots; at most N/2.
    pub num_slots: usize,
    pub scaling_technique: ScalingTechnique,
    /// Bit size of each scaling modulus.
    pub scaling_mod_size: u32,
    /// Bit size of the first modulus.
    pub first_mod_size: u32,
    /// Target hardware word size for composite scaling.
    pub register_word_size: u32,
    /// Machine words per logical level. 1 unless composite scaling is on.
    pub composite_degree: u32,
    pub secret_key_dist: SecretKeyDistribution,
    pub level_budget: LevelBudget,
    /// Planned multiplicative depth.
    pub depth: DepthBudget,
}

impl ContextParams {
    /// Multiplicative depth to write into the context.
    pub fn multiplicative_depth(&self) -> u32 {
        self.depth.total()
    }

    pub fn iterations(&self) -> u32 {
        self.depth.iterations()
    }

    /// Consumed level of a freshly encoded ciphertext with no usable level left.
    pub fn depleted_level(&self) -> Result<u32> {
        self.multiplicative_depth()
            .checked_sub(1)
            .and_then(|levels| levels.checked_mul(self.composite_degree))
            .ok_or_else(|| {
                RefreshError::InvalidParam(format!(
                    "depleted level of depth {} at composite degree {} does not fit in u32",
                    self.multiplicative_depth(),
                    self.composite_degree
                ))
            })
    }

    /// Bit width of one machine word of a level.
    pub fn mod_bit_width(&self) -> f64 {
        self.scaling_mod_size as f64 / self.composite_degree as f64
    }
}

/// Builder for ContextParams.
///
/// Starts from a [`ValidatedPairing`], so no context exists for a bootstrapping
/// method and parameter set the compatibility gate rejected.
#[derive(Debug)]
pub struct ContextParamsBuilder {
    pairing: ValidatedPairing,
    ring_dim: usize,
    num_slots: Option<usize>,
    scaling_technique: ScalingTechnique,
    scaling_mod_size: u32,
    first_mod_size: u32,
    register_word_size: u32,
    composite_degree: Option<u32>,
    secret_key_dist: SecretKeyDistribution,
    level_budget: (u32, u32),
    levels_after_bootstrap: u32,
    iterations: u32,
}

impl ContextParamsBuilder {
    pub fn new(pairing: ValidatedPairing) -> Self {
        Self {
            pairing,
            ring_dim: 1 << 12,
            num_slots: None, // full packing
            scaling_technique: ScalingTechnique::FlexibleAuto,
            scaling_mod_size: 59,
            first_mod_size: 60,
            register_word_size: MAX_REGISTER_WORD_SIZE,
            composite_degree: None,
            secret_key_dist: SecretKeyDistribution::UniformTernary,
            level_budget: (4, 4),
            levels_after_bootstrap: 10,
            iterations: 1,
        }
    }

    /// Run the compatibility gate on raw tags and start a builder from the result.
    pub fn from_tags(method: &str, profile: &str) -> Result<Self> {
        Ok(Self::new(validate_tags(method, profile)?))
    }

    pub fn ring_dim(mut self, n: usize) -> Self {
        self.ring_dim = n;
        self
    }

    pub fn num_slots(mut self, slots: usize) -> Self {
        self.num_slots = Some(slots);
        self
    }

    pub fn scaling_technique(mut self, technique: ScalingTechnique) -> Self {
        self.scaling_technique = technique;
        self
    }

    pub fn scaling_mod_size(mut self, bits: u32) -> Self {
        self.scaling_mod_size = bits;
        self
    }

    pub fn first_mod_size(mut self, bits: u32) -> Self {
        self.first_mod_size = bits;
        self
    }

    pub fn register_word_size(mut self, bits: u32) -> Self {
        self.register_word_size = bits;
        self
    }

    /// Only meaningful with [`ScalingTechnique::CompositeScalingManual`].
    pub fn composite_degree(mut self, degree: u32) -> Self {
        self.composite_degree = Some(degree);
        self
    }

    pub fn secret_key_dist(mut self, dist: SecretKeyDistribution) -> Self {
        self.secret_key_dist = dist;
        self
    }

    pub fn level_budget(mut self, encode: u32, decode: u32) -> Self {
        self.level_budget = (encode, decode);
        self
    }

    pub fn levels_after_bootstrap(mut self, levels: u32) -> Self {
        self.levels_after_bootstrap = levels;
        self
    }

    pub fn iterations(mut self, iterations: u32) -> Self {
        self.iterations = iterations;
        self
    }

    pub fn build(self) -> Result<Arc<ContextParams>> {
        self.build_with_model(&ChebyshevDepthModel)
    }

    /// Build with the bootstrapping cost model of a specific primitive.
    pub fn build_with_model(self, model: &dyn BootstrapDepthModel) -> Result<Arc<ContextParams>> {
        if !self.ring_dim.is_power_of_two() || self.ring_dim < 2 {
            return Err(RefreshError::InvalidParam(format!(
                "ring dimension must be a power of 2, got {}",
                self.ring_dim
            )));
        }
        let max_slots = self.ring_dim / 2;
        let num_slots = self.num_slots.unwrap_or(max_slots);
        if num_slots == 0 || num_slots > max_slots || !num_slots.is_power_of_two() {
            return Err(RefreshError::InvalidParam(format!(
                "slot count must be a power of 2 in [1, {max_slots}], got {num_slots}"
            )));
        }
        if self.scaling_mod_size == 0 || self.first_mod_size < self.scaling_mod_size {
            return Err(RefreshError::InvalidParam(format!(
                "first modulus ({} bits) must be at least the scaling modulus ({} bits)",
                self.first_mod_size, self.scaling_mod_size
            )));
        }
        if self.register_word_size == 0 || self.register_word_size > MAX_REGISTER_WORD_SIZE {
            return Err(RefreshError::InvalidParam(format!(
                "register word size must be in [1, {MAX_REGISTER_WORD_SIZE}], got {}",
                self.register_word_size
            )));
        }

        let composite_degree = match self.scaling_technique {
            ScalingTechnique::CompositeScalingAuto => {
                self.scaling_mod_size.div_ceil(self.register_word_size)
            }
            ScalingTechnique::CompositeScalingManual => match self.composite_degree {
                Some(d) if d >= 1 => d,
                _ => {
                    return Err(RefreshError::InvalidParam(
                        "manual composite scaling needs a composite degree >= 1".into(),
                    ))
                }
            },
            _ => 1,
        };

        let level_budget = LevelBudget::new(self.level_budget.0, self.level_budget.1)?;
        let depth = plan_depth(
            self.levels_after_bootstrap,
            &level_budget,
            self.secret_key_dist,
            self.iterations,
            model,
        )?;
        if depth.total() == 0 {
            return Err(RefreshError::InvalidParam("multiplicative depth must be >= 1".into()));
        }

        Ok(Arc::new(ContextParams {
            pairing: self.pairing,
            ring_dim: self.ring_dim,
            num_slots,
            scaling_technique: self.scaling_technique,
            scaling_mod_size: self.scaling_mod_size,
            first_mod_size: self.first_mod_size,
            register_word_size: self.register_word_size,
            composite_degree,
            secret_key_dist: self.secret_key_dist,
            level_budget,
            depth,
        }))
    }
}
