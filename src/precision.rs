//! Precision measurement between decoded and expected slot vectors.
//!
//! The precision of a CKKS result is `|log2(e)|` where `e` is the infinity norm of the
//! slot-wise difference against the expected values. A higher number means a smaller error.

use num_complex::Complex64;

use crate::error::{RefreshError, Result};

/// Value reported for a zero error, and upper bound of every estimate.
pub const SATURATED_PRECISION_BITS: f64 = 64.0;

/// Which part of each slot enters the error.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum SlotComponent {
    /// Real parts only. Right for payloads that are real-valued after the encoding round-trip.
    #[default]
    Real,
    /// Modulus of the complex difference, so imaginary drift counts too.
    Complex,
}

/// What to do when the measured error is exactly zero.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum ZeroErrorPolicy {
    /// Report [`SATURATED_PRECISION_BITS`].
    #[default]
    Saturate,
    /// Fail with [`RefreshError::UnderflowPrecision`].
    Reject,
}

/// Precision in bits. Always finite and within `[0, SATURATED_PRECISION_BITS]`.
#[derive(Clone, Copy, Debug, PartialEq, PartialOrd)]
pub struct PrecisionEstimate(f64);

impl PrecisionEstimate {
    pub fn bits(&self) -> f64 {
        self.0
    }

    /// Rounding rule for turning a measurement into an integral precision hint.
    pub fn floor_bits(&self) -> u32 {
        self.0.floor() as u32
    }

    pub fn is_saturated(&self) -> bool {
        self.0 >= SATURATED_PRECISION_BITS
    }

    fn from_max_error(max_error: f64) -> Self {
        if max_error == 0.0 {
            return Self(SATURATED_PRECISION_BITS);
        }
        Self(max_error.log2().abs().min(SATURATED_PRECISION_BITS))
    }
}

impl std::fmt::Display for PrecisionEstimate {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:.2} bits", self.0)
    }
}

/// Comparison settings for [`PrecisionMetric::measure`].
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct PrecisionMetric {
    pub component: SlotComponent,
    pub zero_error: ZeroErrorPolicy,
}

impl PrecisionMetric {
    pub fn new(component: SlotComponent, zero_error: ZeroErrorPolicy) -> Self {
        Self { component, zero_error }
    }

    /// Infinity norm of the slot-wise difference.
    pub fn max_error(&self, observed: &[Complex64], expected: &[Complex64]) -> Result<f64> {
        if observed.len() != expected.len() {
            return Err(RefreshError::VectorLengthMismatch {
                expected: expected.len(),
                got: observed.len(),
            });
        }

        let mut max_error = 0.0f64;
        for (index, (o, e)) in observed.iter().zip(expected).enumerate() {
            let error = match self.component {
                SlotComponent::Real => (o.re - e.re).abs(),
                SlotComponent::Complex => (o - e).norm(),
            };
            if !error.is_finite() {
                return Err(RefreshError::NonFiniteValue { index });
            }
            if error > max_error {
                max_error = error;
            }
        }
        Ok(max_error)
    }

    pub fn measure(&self, observed: &[Complex64], expected: &[Complex64]) -> Result<PrecisionEstimate> {
        let max_error = self.max_error(observed, expected)?;
        if max_error == 0.0 && self.zero_error == ZeroErrorPolicy::Reject {
            return Err(RefreshError::UnderflowPrecision);
        }
        Ok(PrecisionEstimate::from_max_error(max_error))
    }
}

/// Measure with the default metric: real parts, saturating on zero error.
pub fn measure_precision(observed: &[Complex64], expected: &[Complex64]) -> Result<PrecisionEstimate> {
    PrecisionMetric::default().measure(observed, expected)
}

/// Lift real values into slots with a zero imaginary part.
pub fn real_slots(values: &[f64]) -> Vec<Complex64> {
    values.iter().map(|&x| Complex64::new(x, 0.0)).collect()
}
