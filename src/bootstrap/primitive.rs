use num_complex::Complex64;

use crate::error::Result;
use crate::params::MAX_REFRESH_ITERATIONS;

/// Level bookkeeping a CKKS ciphertext exposes after each operation.
pub trait LevelledCiphertext {
    /// Number of moduli dropped so far, counted in machine words.
    fn level(&self) -> u32;

    /// Number of scaling factors the ciphertext currently carries (1 right after rescale).
    fn noise_scale_degree(&self) -> u32;
}

/// Bootstrapping circuit supplied by the FHE backend.
///
/// Implementations consume a deterministic number of levels per call. With `n`
/// iterations and a precision hint of `p` bits, the result is expected to carry
/// roughly `n * p` bits of precision.
pub trait BootstrapPrimitive {
    type Ciphertext: LevelledCiphertext;

    /// One plain bootstrapping pass.
    fn refresh(&self, ct: &Self::Ciphertext) -> Result<Self::Ciphertext>;

    /// Bootstrapping with `iterations` passes, each correcting the residual error of
    /// the previous one assuming `precision_hint` bits of single-pass precision.
    fn refresh_iterative(
        &self,
        ct: &Self::Ciphertext,
        iterations: u32,
        precision_hint: u32,
    ) -> Result<Self::Ciphertext>;

    fn max_iterations(&self) -> u32 {
        MAX_REFRESH_ITERATIONS
    }
}

/// Decrypts and decodes a ciphertext back to its slot values.
pub trait SlotDecoder<C> {
    fn decode(&self, ct: &C) -> Result<Vec<Complex64>>;
}
