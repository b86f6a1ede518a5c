//! Multiplicative depth planning for iterative bootstrapping.
//!
//! `depth = levels_after_bootstrap + base_bootstrap_depth + (iterations - 1)`: the first
//! pass is covered by the base cost, every further pass spends one level on its correction.

use tracing::debug;

use crate::error::{RefreshError, Result};
use crate::params::{LevelBudget, SecretKeyDistribution};

/// Double-angle iterations of the modular reduction for uniform ternary secrets.
const DOUBLE_ANGLE_UNIFORM: u32 = 6;
/// Double-angle iterations for sparse ternary secrets.
const DOUBLE_ANGLE_SPARSE: u32 = 3;
/// Chebyshev series length approximating the scaled cosine, uniform ternary secrets.
const CHEBYSHEV_COEFFS_UNIFORM: usize = 89;
/// Chebyshev series length for sparse ternary secrets.
const CHEBYSHEV_COEFFS_SPARSE: usize = 45;

/// Cost model of one bootstrapping pass, in levels.
pub trait BootstrapDepthModel {
    fn bootstrap_depth(&self, level_budget: &LevelBudget, secret_key_dist: SecretKeyDistribution) -> u32;
}

/// Levels consumed by CoeffsToSlots, the approximate modular reduction and SlotsToCoeffs.
#[derive(Clone, Copy, Debug, Default)]
pub struct ChebyshevDepthModel;

impl ChebyshevDepthModel {
    /// Depth of the approximate modular reduction alone.
    pub fn mod_reduction_depth(secret_key_dist: SecretKeyDistribution) -> u32 {
        match secret_key_dist {
            SecretKeyDistribution::UniformTernary => {
                coeff_vector_depth(CHEBYSHEV_COEFFS_UNIFORM, false) + DOUBLE_ANGLE_UNIFORM
            }
            SecretKeyDistribution::SparseTernary => {
                coeff_vector_depth(CHEBYSHEV_COEFFS_SPARSE, false) + DOUBLE_ANGLE_SPARSE
            }
        }
    }
}

impl BootstrapDepthModel for ChebyshevDepthModel {
    fn bootstrap_depth(&self, level_budget: &LevelBudget, secret_key_dist: SecretKeyDistribution) -> u32 {
        Self::mod_reduction_depth(secret_key_dist) + level_budget.encode + level_budget.decode
    }
}

/// Constant cost, for primitives that publish their own figure.
#[derive(Clone, Copy, Debug)]
pub struct FixedDepthModel(pub u32);

impl BootstrapDepthModel for FixedDepthModel {
    fn bootstrap_depth(&self, _level_budget: &LevelBudget, _secret_key_dist: SecretKeyDistribution) -> u32 {
        self.0
    }
}

/// Depth of a Paterson-Stockmeyer evaluation of a degree-`degree` polynomial.
pub fn paterson_stockmeyer_depth(degree: usize) -> u32 {
    match degree {
        0..=5 => 3,
        6..=13 => 4,
        14..=27 => 5,
        28..=59 => 6,
        60..=119 => 7,
        120..=247 => 8,
        248..=495 => 9,
        496..=1007 => 10,
        1008..=2031 => 11,
        _ => 12,
    }
}

/// Depth of evaluating a Chebyshev series with `num_coeffs` coefficients. A series that
/// is not normalized to `[-1, 1]` needs one more level for the affine input transform.
fn coeff_vector_depth(num_coeffs: usize, normalized: bool) -> u32 {
    let depth = paterson_stockmeyer_depth(num_coeffs.saturating_sub(1));
    if normalized {
        depth
    } else {
        depth + 1
    }
}

/// Multiplicative depth a context needs for `iterations` refresh passes.
///
/// Only [`plan_depth`] builds one, so `iterations >= 1` and the total fits in a `u32`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct DepthBudget {
    levels_after_bootstrap: u32,
    bootstrap_depth: u32,
    iterations: u32,
    total: u32,
}

impl DepthBudget {
    /// Total multiplicative depth to configure on the context.
    pub fn total(&self) -> u32 {
        self.total
    }

    pub fn levels_after_bootstrap(&self) -> u32 {
        self.levels_after_bootstrap
    }

    /// Levels of a single base bootstrapping pass.
    pub fn bootstrap_depth(&self) -> u32 {
        self.bootstrap_depth
    }

    pub fn iterations(&self) -> u32 {
        self.iterations
    }

    /// Levels one refresh with the planned number of passes spends.
    pub fn refresh_cost(&self) -> u32 {
        self.total - self.levels_after_bootstrap
    }
}

/// Plan the multiplicative depth for `iterations` refresh passes.
///
/// The planner itself accepts any `iterations >= 1`; the number of passes a primitive
/// actually supports is enforced when the refresh runs.
pub fn plan_depth(
    levels_after_bootstrap: u32,
    level_budget: &LevelBudget,
    secret_key_dist: SecretKeyDistribution,
    iterations: u32,
    model: &dyn BootstrapDepthModel,
) -> Result<DepthBudget> {
    if iterations == 0 {
        return Err(RefreshError::InvalidParam(
            "depth planning needs at least one refresh iteration".into(),
        ));
    }
    let bootstrap_depth = model.bootstrap_depth(level_budget, secret_key_dist);
    let total = levels_after_bootstrap
        .checked_add(bootstrap_depth)
        .and_then(|d| d.checked_add(iterations - 1))
        .ok_or_else(|| RefreshError::InvalidParam("multiplicative depth overflows u32".into()))?;
    let budget = DepthBudget {
        levels_after_bootstrap,
        bootstrap_depth,
        iterations,
        total,
    };
    debug!(
        levels_after_bootstrap,
        bootstrap_depth,
        iterations,
        depth = budget.total(),
        "planned multiplicative depth"
    );
    Ok(budget)
}

pub(crate) fn check_iterations(requested: u32, max: u32) -> Result<()> {
    if requested == 0 || requested > max {
        return Err(RefreshError::UnsupportedIterationCount { requested, max });
    }
    Ok(())
}
