pub mod gaussian;
pub mod uniform;

pub use gaussian::{sample_gaussian, sample_complex_noise};
pub use uniform::{sample_unit_interval, sample_real_slots};
