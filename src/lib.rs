//! # iterboot: Iterative Bootstrapping Controller
//!
//! Drives multi-pass CKKS bootstrapping to multiply the precision of a refreshed
//! ciphertext (Bae-Cheon-Cho-Kim-Kim, "META-BTS: Bootstrapping Precision Beyond the
//! Limit", ePrint 2022/1167), and gates binary-gate bootstrapping methods against the
//! parameter sets they were designed for.
//!
//! The bootstrapping circuit itself comes from the FHE backend through
//! [`bootstrap::BootstrapPrimitive`]; this crate plans the level budget, measures
//! precision and runs the calibrate → amplify protocol around it.
//!
//! ## Quick Start
//!
//! ```no_run
//! use iterboot::prelude::*;
//!
//! // Gate the bootstrapping method, then size the context for 2 iterations:
//! // depth = 10 + bootstrap depth + 1
//! let pairing = validate_tags("GINX", "STD128").unwrap();
//! let params = iterboot::params::presets::iterative_composite(pairing).unwrap();
//!
//! // Simulated backend reaching ~20 bits per pass
//! let primitive = SimulatedBootstrapper::new(params.clone(), 20.0, 42).unwrap();
//! let boot = IterativeBootstrapper::with_params(primitive, SimDecoder, &params).unwrap();
//!
//! // Depleted input
//! let values = real_slots(&[0.25, 0.5, 0.75, 1.0]);
//! let ct = SimCiphertext::encrypt_depleted(&values, &params).unwrap();
//!
//! // Calibrate, then refresh with 2 passes
//! let outcome = boot.run(ct, &values, 2, None).unwrap();
//! let precision = measure_precision(outcome.ciphertext.slots(), &values).unwrap();
//! println!("{precision}, {} levels left", outcome.remaining_levels);
//! ```

pub mod error;
pub mod compat;
pub mod precision;
pub mod depth;
pub mod params;
pub mod sampling;
pub mod bootstrap;
pub mod sim;

/// Convenient re-exports for common types and functions.
pub mod prelude {
    pub use crate::error::{RefreshError, Result};
    pub use crate::compat::{validate, validate_tags, BootstrapMethod, ParamSet, ValidatedPairing};
    pub use crate::precision::{
        measure_precision, real_slots, PrecisionEstimate, PrecisionMetric, SlotComponent,
        ZeroErrorPolicy, SATURATED_PRECISION_BITS,
    };
    pub use crate::depth::{plan_depth, BootstrapDepthModel, ChebyshevDepthModel, DepthBudget, FixedDepthModel};
    pub use crate::params::{
        ContextParams, ContextParamsBuilder, LevelBudget, ScalingTechnique, SecretKeyDistribution,
        MAX_REFRESH_ITERATIONS,
    };
    pub use crate::bootstrap::{
        BootstrapPrimitive, Calibration, DepletionPolicy, IterativeBootstrapper, LevelAccounting,
        LevelledCiphertext, RefreshConfig, RefreshOutcome, RefreshSession, SessionState, SlotDecoder,
    };
    pub use crate::sim::{SimCiphertext, SimDecoder, SimulatedBootstrapper};
}
