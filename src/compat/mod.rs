//! Bootstrapping method / parameter set compatibility.
//!
//! Binary-gate bootstrapping comes in three blind-rotation families. Each family only
//! works with the parameter sets generated for it, so the pairing is checked against a
//! fixed table before any key or context generation starts.

pub mod table;

use std::fmt;
use std::str::FromStr;

use crate::error::RefreshError;

pub use table::{
    method_for, supported_profiles, validate, validate_tags, ValidatedPairing, COMPATIBILITY_TABLE,
};

/// Blind-rotation family used to refresh a binary-gate ciphertext.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BootstrapMethod {
    /// Ducas-Micciancio accumulator with windowed digit decomposition.
    Ap,
    /// Chillotti-Gama-Georgieva-Izabachene CMux accumulator.
    Ginx,
    /// Automorphism-based accumulator of Lee-Micciancio-Kim-Choi-Deryabin-Eom-Yoo.
    Lmkcdey,
}

impl BootstrapMethod {
    pub const ALL: [BootstrapMethod; 3] = [Self::Ap, Self::Ginx, Self::Lmkcdey];

    /// Enum-style tag, e.g. `GINX`.
    pub fn tag(self) -> &'static str {
        match self {
            Self::Ap => "AP",
            Self::Ginx => "GINX",
            Self::Lmkcdey => "LMKCDEY",
        }
    }

    /// Name of the scheme in the literature, used for display.
    pub fn scheme_name(self) -> &'static str {
        match self {
            Self::Ap => "DM",
            Self::Ginx => "CGGI",
            Self::Lmkcdey => "LMKCDEY",
        }
    }
}

impl fmt::Display for BootstrapMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.scheme_name())
    }
}

impl FromStr for BootstrapMethod {
    type Err = RefreshError;

    /// Accepts either the enum tag (`AP`, `GINX`) or the scheme name (`DM`, `CGGI`).
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        Self::ALL
            .into_iter()
            .find(|m| m.tag().eq_ignore_ascii_case(s) || m.scheme_name().eq_ignore_ascii_case(s))
            .ok_or_else(|| RefreshError::UnknownMethod(s.to_string()))
    }
}

/// Named parameter set: ring dimension, modulus chain shape and security level.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ParamSet {
    Toy,
    Medium,
    Std128Ap,
    Std128,
    Std128_3,
    Std128_4,
    Std128Q,
    Std128Q3,
    Std128Q4,
    Std192,
    Std192_3,
    Std192_4,
    Std192Q,
    Std192Q3,
    Std192Q4,
    Std256,
    Std256_3,
    Std256_4,
    Std256Q,
    Std256Q3,
    Std256Q4,
    Std128Lmkcdey,
    Std128_3Lmkcdey,
    Std128_4Lmkcdey,
    Std128QLmkcdey,
    Std128Q3Lmkcdey,
    Std128Q4Lmkcdey,
    Std192Lmkcdey,
    Std192_3Lmkcdey,
    Std192_4Lmkcdey,
    Std192QLmkcdey,
    Std192Q3Lmkcdey,
    Std192Q4Lmkcdey,
    Std256Lmkcdey,
    Std256_3Lmkcdey,
    Std256_4Lmkcdey,
    Std256QLmkcdey,
    Std256Q3Lmkcdey,
    Std256Q4Lmkcdey,
    LpfStd128,
    LpfStd128Q,
    LpfStd128Lmkcdey,
    LpfStd128QLmkcdey,
    SignedModTest,
}

impl ParamSet {
    pub const ALL: [ParamSet; 44] = [
        Self::Toy,
        Self::Medium,
        Self::Std128Ap,
        Self::Std128,
        Self::Std128_3,
        Self::Std128_4,
        Self::Std128Q,
        Self::Std128Q3,
        Self::Std128Q4,
        Self::Std192,
        Self::Std192_3,
        Self::Std192_4,
        Self::Std192Q,
        Self::Std192Q3,
        Self::Std192Q4,
        Self::Std256,
        Self::Std256_3,
        Self::Std256_4,
        Self::Std256Q,
        Self::Std256Q3,
        Self::Std256Q4,
        Self::Std128Lmkcdey,
        Self::Std128_3Lmkcdey,
        Self::Std128_4Lmkcdey,
        Self::Std128QLmkcdey,
        Self::Std128Q3Lmkcdey,
        Self::Std128Q4Lmkcdey,
        Self::Std192Lmkcdey,
        Self::Std192_3Lmkcdey,
        Self::Std192_4Lmkcdey,
        Self::Std192QLmkcdey,
        Self::Std192Q3Lmkcdey,
        Self::Std192Q4Lmkcdey,
        Self::Std256Lmkcdey,
        Self::Std256_3Lmkcdey,
        Self::Std256_4Lmkcdey,
        Self::Std256QLmkcdey,
        Self::Std256Q3Lmkcdey,
        Self::Std256Q4Lmkcdey,
        Self::LpfStd128,
        Self::LpfStd128Q,
        Self::LpfStd128Lmkcdey,
        Self::LpfStd128QLmkcdey,
        Self::SignedModTest,
    ];

    /// Canonical upper-case name, e.g. `STD128Q_3_LMKCDEY`.
    pub fn name(self) -> &'static str {
        match self {
            Self::Toy => "TOY",
            Self::Medium => "MEDIUM",
            Self::Std128Ap => "STD128_AP",
            Self::Std128 => "STD128",
            Self::Std128_3 => "STD128_3",
            Self::Std128_4 => "STD128_4",
            Self::Std128Q => "STD128Q",
            Self::Std128Q3 => "STD128Q_3",
            Self::Std128Q4 => "STD128Q_4",
            Self::Std192 => "STD192",
            Self::Std192_3 => "STD192_3",
            Self::Std192_4 => "STD192_4",
            Self::Std192Q => "STD192Q",
            Self::Std192Q3 => "STD192Q_3",
            Self::Std192Q4 => "STD192Q_4",
            Self::Std256 => "STD256",
            Self::Std256_3 => "STD256_3",
            Self::Std256_4 => "STD256_4",
            Self::Std256Q => "STD256Q",
            Self::Std256Q3 => "STD256Q_3",
            Self::Std256Q4 => "STD256Q_4",
            Self::Std128Lmkcdey => "STD128_LMKCDEY",
            Self::Std128_3Lmkcdey => "STD128_3_LMKCDEY",
            Self::Std128_4Lmkcdey => "STD128_4_LMKCDEY",
            Self::Std128QLmkcdey => "STD128Q_LMKCDEY",
            Self::Std128Q3Lmkcdey => "STD128Q_3_LMKCDEY",
            Self::Std128Q4Lmkcdey => "STD128Q_4_LMKCDEY",
            Self::Std192Lmkcdey => "STD192_LMKCDEY",
            Self::Std192_3Lmkcdey => "STD192_3_LMKCDEY",
            Self::Std192_4Lmkcdey => "STD192_4_LMKCDEY",
            Self::Std192QLmkcdey => "STD192Q_LMKCDEY",
            Self::Std192Q3Lmkcdey => "STD192Q_3_LMKCDEY",
            Self::Std192Q4Lmkcdey => "STD192Q_4_LMKCDEY",
            Self::Std256Lmkcdey => "STD256_LMKCDEY",
            Self::Std256_3Lmkcdey => "STD256_3_LMKCDEY",
            Self::Std256_4Lmkcdey => "STD256_4_LMKCDEY",
            Self::Std256QLmkcdey => "STD256Q_LMKCDEY",
            Self::Std256Q3Lmkcdey => "STD256Q_3_LMKCDEY",
            Self::Std256Q4Lmkcdey => "STD256Q_4_LMKCDEY",
            Self::LpfStd128 => "LPF_STD128",
            Self::LpfStd128Q => "LPF_STD128Q",
            Self::LpfStd128Lmkcdey => "LPF_STD128_LMKCDEY",
            Self::LpfStd128QLmkcdey => "LPF_STD128Q_LMKCDEY",
            Self::SignedModTest => "SIGNED_MOD_TEST",
        }
    }
}

impl fmt::Display for ParamSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for ParamSet {
    type Err = RefreshError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        Self::ALL
            .into_iter()
            .find(|p| p.name().eq_ignore_ascii_case(s))
            .ok_or_else(|| RefreshError::UnknownProfile(s.to_string()))
    }
}
