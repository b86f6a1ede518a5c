use tracing::{debug, warn};

use crate::compat::{BootstrapMethod, ParamSet};
use crate::error::{RefreshError, Result};

/// Parameter sets reserved for the windowed DM accumulator.
const AP_PROFILES: &[ParamSet] = &[ParamSet::Toy, ParamSet::Medium, ParamSet::Std128Ap];

/// Parameter sets generated for the CMux accumulator.
const GINX_PROFILES: &[ParamSet] = &[
    ParamSet::Std128,
    ParamSet::Std128_3,
    ParamSet::Std128_4,
    ParamSet::Std128Q,
    ParamSet::Std128Q3,
    ParamSet::Std128Q4,
    ParamSet::Std192,
    ParamSet::Std192_3,
    ParamSet::Std192_4,
    ParamSet::Std192Q,
    ParamSet::Std192Q3,
    ParamSet::Std192Q4,
    ParamSet::Std256,
    ParamSet::Std256_3,
    ParamSet::Std256_4,
    ParamSet::Std256Q,
    ParamSet::Std256Q3,
    ParamSet::Std256Q4,
    ParamSet::LpfStd128,
    ParamSet::LpfStd128Q,
    ParamSet::SignedModTest,
];

const LMKCDEY_PROFILES: &[ParamSet] = &[
    ParamSet::Std128Lmkcdey,
    ParamSet::Std128_3Lmkcdey,
    ParamSet::Std128_4Lmkcdey,
    ParamSet::Std128QLmkcdey,
    ParamSet::Std128Q3Lmkcdey,
    ParamSet::Std128Q4Lmkcdey,
    ParamSet::Std192Lmkcdey,
    ParamSet::Std192_3Lmkcdey,
    ParamSet::Std192_4Lmkcdey,
    ParamSet::Std192QLmkcdey,
    ParamSet::Std192Q3Lmkcdey,
    ParamSet::Std192Q4Lmkcdey,
    ParamSet::Std256Lmkcdey,
    ParamSet::Std256_3Lmkcdey,
    ParamSet::Std256_4Lmkcdey,
    ParamSet::Std256QLmkcdey,
    ParamSet::Std256Q3Lmkcdey,
    ParamSet::Std256Q4Lmkcdey,
    ParamSet::LpfStd128Lmkcdey,
    ParamSet::LpfStd128QLmkcdey,
];

/// Method → supported parameter sets. The profile sets are pairwise disjoint.
///
/// This is stricter than the OpenFHE binary-gate check, which also runs TOY and MEDIUM
/// under every method and lets AP use the GINX sets. Those pairings are rejected here.
pub static COMPATIBILITY_TABLE: [(BootstrapMethod, &[ParamSet]); 3] = [
    (BootstrapMethod::Ap, AP_PROFILES),
    (BootstrapMethod::Ginx, GINX_PROFILES),
    (BootstrapMethod::Lmkcdey, LMKCDEY_PROFILES),
];

/// Proof that a (method, parameter set) pairing passed the compatibility gate.
///
/// Only [`validate`] and [`validate_tags`] construct it, so context construction can
/// demand one in its signature instead of trusting the caller to have checked.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ValidatedPairing {
    method: BootstrapMethod,
    profile: ParamSet,
}

impl ValidatedPairing {
    pub fn method(&self) -> BootstrapMethod {
        self.method
    }

    pub fn profile(&self) -> ParamSet {
        self.profile
    }
}

/// Parameter sets the given method accepts.
pub fn supported_profiles(method: BootstrapMethod) -> &'static [ParamSet] {
    COMPATIBILITY_TABLE
        .iter()
        .find(|(m, _)| *m == method)
        .map(|(_, profiles)| *profiles)
        .unwrap_or(&[])
}

/// The single method whose table entry contains `profile`, if any.
pub fn method_for(profile: ParamSet) -> Option<BootstrapMethod> {
    COMPATIBILITY_TABLE
        .iter()
        .find(|(_, profiles)| profiles.contains(&profile))
        .map(|(m, _)| *m)
}

/// Check a bootstrapping method against a parameter set.
///
/// Pure lookup over static data; call it before any key or context generation.
pub fn validate(method: BootstrapMethod, profile: ParamSet) -> Result<ValidatedPairing> {
    if supported_profiles(method).contains(&profile) {
        debug!(%method, %profile, "bootstrap pairing accepted");
        return Ok(ValidatedPairing { method, profile });
    }
    warn!(%method, %profile, "bootstrap pairing rejected");
    Err(RefreshError::IncompatibleConfiguration {
        method: method.to_string(),
        profile: profile.to_string(),
    })
}

/// Parse raw method and parameter-set tags, then [`validate`] the pairing.
///
/// An unrecognized method is reported as [`RefreshError::UnknownMethod`], which
/// callers can tell apart from an incompatible but well-formed pairing.
pub fn validate_tags(method: &str, profile: &str) -> Result<ValidatedPairing> {
    let method: BootstrapMethod = method.parse()?;
    let profile: ParamSet = profile.parse()?;
    validate(method, profile)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_every_profile_has_exactly_one_method() {
        for profile in ParamSet::ALL {
            let owners = COMPATIBILITY_TABLE
                .iter()
                .filter(|(_, profiles)| profiles.contains(&profile))
                .count();
            assert_eq!(owners, 1, "{profile} belongs to {owners} methods");
        }
    }

    #[test]
    fn test_accumulator_family_is_largest() {
        assert!(GINX_PROFILES.len() > LMKCDEY_PROFILES.len());
        assert!(GINX_PROFILES.len() > AP_PROFILES.len());
    }

    #[test]
    fn test_validate_accepts_table_pairs() {
        for (method, profiles) in COMPATIBILITY_TABLE.iter() {
            for &profile in profiles.iter() {
                let pairing = validate(*method, profile).unwrap();
                assert_eq!(pairing.method(), *method);
                assert_eq!(pairing.profile(), profile);
            }
        }
    }

    #[test]
    fn test_validate_rejects_windowed_profile_for_accumulator() {
        let err = validate(BootstrapMethod::Ginx, ParamSet::Std128Ap).unwrap_err();
        match err {
            RefreshError::IncompatibleConfiguration { method, profile } => {
                assert_eq!(method, "CGGI");
                assert_eq!(profile, "STD128_AP");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_validate_rejects_cross_family() {
        assert!(validate(BootstrapMethod::Lmkcdey, ParamSet::Std128).is_err());
        assert!(validate(BootstrapMethod::Ginx, ParamSet::Std128Lmkcdey).is_err());
        assert!(validate(BootstrapMethod::Ap, ParamSet::Std192Q).is_err());
    }

    #[test]
    fn test_shared_toy_profiles_belong_to_ap_only() {
        assert!(validate(BootstrapMethod::Ap, ParamSet::Std128).is_err());
        assert!(validate(BootstrapMethod::Ginx, ParamSet::Toy).is_err());
        assert!(validate(BootstrapMethod::Lmkcdey, ParamSet::Toy).is_err());
        assert!(validate(BootstrapMethod::Lmkcdey, ParamSet::Medium).is_err());
        assert!(validate(BootstrapMethod::Ap, ParamSet::Medium).is_ok());
    }

    #[test]
    fn test_validate_tags_distinguishes_unknown_method() {
        let err = validate_tags("BOGUS", "STD128").unwrap_err();
        assert!(matches!(err, RefreshError::UnknownMethod(_)));
        assert!(err.to_string().contains("invalid bootstrapping method"));

        let err = validate_tags("GINX", "STD128_AP").unwrap_err();
        assert!(matches!(err, RefreshError::IncompatibleConfiguration { .. }));
        assert!(err.to_string().contains("incompatible"));

        let err = validate_tags("GINX", "STD4096").unwrap_err();
        assert!(matches!(err, RefreshError::UnknownProfile(_)));

        assert!(validate_tags("lmkcdey", "STD128Q_LMKCDEY").is_ok());
    }

    #[test]
    fn test_method_for() {
        assert_eq!(method_for(ParamSet::Toy), Some(BootstrapMethod::Ap));
        assert_eq!(method_for(ParamSet::SignedModTest), Some(BootstrapMethod::Ginx));
        assert_eq!(method_for(ParamSet::LpfStd128QLmkcdey), Some(BootstrapMethod::Lmkcdey));
    }
}
