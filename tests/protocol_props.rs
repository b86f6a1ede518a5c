use num_complex::Complex64;
use proptest::prelude::*;
use rand::SeedableRng;
use rand_chacha::ChaCha20Rng;

use iterboot::bootstrap::{IterativeBootstrapper, LevelAccounting, LevelledCiphertext, SessionState};
use iterboot::compat::{method_for, validate, BootstrapMethod, ParamSet, ValidatedPairing};
use iterboot::depth::{plan_depth, ChebyshevDepthModel, FixedDepthModel};
use iterboot::error::RefreshError;
use iterboot::params::presets::{iterative_composite, iterative_flexible};
use iterboot::params::{LevelBudget, SecretKeyDistribution};
use iterboot::precision::{measure_precision, real_slots, SATURATED_PRECISION_BITS};
use iterboot::sampling::sample_real_slots;
use iterboot::sim::{SimCiphertext, SimDecoder, SimulatedBootstrapper};

fn ginx() -> ValidatedPairing {
    validate(BootstrapMethod::Ginx, ParamSet::Std128).unwrap()
}

fn slots_strategy(len: usize) -> impl Strategy<Value = Vec<Complex64>> {
    prop::collection::vec((-1.0f64..1.0, -1.0f64..1.0), len)
        .prop_map(|pairs| pairs.into_iter().map(|(re, im)| Complex64::new(re, im)).collect())
}

fn paired_slots() -> impl Strategy<Value = (Vec<Complex64>, Vec<Complex64>)> {
    (1usize..32).prop_flat_map(|n| (slots_strategy(n), slots_strategy(n)))
}

fn dist_strategy() -> impl Strategy<Value = SecretKeyDistribution> {
    prop_oneof![
        Just(SecretKeyDistribution::UniformTernary),
        Just(SecretKeyDistribution::SparseTernary),
    ]
}

proptest! {
    #[test]
    fn prop_measure_is_symmetric((a, b) in paired_slots()) {
        let ab = measure_precision(&a, &b).unwrap();
        let ba = measure_precision(&b, &a).unwrap();
        prop_assert_eq!(ab.bits(), ba.bits());
    }

    #[test]
    fn prop_measure_against_itself_saturates(a in (1usize..32).prop_flat_map(slots_strategy)) {
        let p = measure_precision(&a, &a).unwrap();
        prop_assert!(p.bits().is_finite());
        prop_assert!(p.is_saturated());
        prop_assert_eq!(p.bits(), SATURATED_PRECISION_BITS);
    }

    #[test]
    fn prop_measure_rejects_length_mismatch(
        a in (1usize..16).prop_flat_map(slots_strategy),
        extra in 1usize..8,
        observed_longer in any::<bool>(),
    ) {
        let mut b = a.clone();
        b.extend(std::iter::repeat(Complex64::new(0.0, 0.0)).take(extra));
        let (observed, expected) = if observed_longer { (&b, &a) } else { (&a, &b) };
        let is_mismatch = matches!(
            measure_precision(observed, expected),
            Err(RefreshError::VectorLengthMismatch { .. })
        );
        prop_assert!(is_mismatch);
    }

    #[test]
    fn prop_measure_never_exceeds_saturation((a, b) in paired_slots()) {
        let p = measure_precision(&a, &b).unwrap();
        prop_assert!(p.bits() >= 0.0 && p.bits() <= SATURATED_PRECISION_BITS);
    }

    #[test]
    fn prop_each_extra_iteration_costs_one_level(
        levels_after in 0u32..64,
        base in 1u32..40,
        iterations in 1u32..16,
    ) {
        let budget = LevelBudget::new(3, 3).unwrap();
        let model = FixedDepthModel(base);
        let dist = SecretKeyDistribution::UniformTernary;
        let k = plan_depth(levels_after, &budget, dist, iterations, &model).unwrap();
        let next = plan_depth(levels_after, &budget, dist, iterations + 1, &model).unwrap();
        prop_assert_eq!(next.total(), k.total() + 1);
        let single = plan_depth(levels_after, &budget, dist, 1, &model).unwrap();
        prop_assert_eq!(single.total(), levels_after + base);
    }

    #[test]
    fn prop_chebyshev_depth_grows_with_budget(
        encode in 1u32..6,
        decode in 1u32..6,
        dist in dist_strategy(),
    ) {
        let small = LevelBudget::new(encode, decode).unwrap();
        let larger = LevelBudget::new(encode + 1, decode).unwrap();
        let a = plan_depth(10, &small, dist, 2, &ChebyshevDepthModel).unwrap();
        let b = plan_depth(10, &larger, dist, 2, &ChebyshevDepthModel).unwrap();
        prop_assert_eq!(b.total(), a.total() + 1);
    }

    #[test]
    fn prop_remaining_levels_scale_with_composite_degree(
        depth in 1u32..64,
        composite in 1u32..5,
        used in 0u32..64,
    ) {
        struct Ct(u32);
        impl LevelledCiphertext for Ct {
            fn level(&self) -> u32 { self.0 }
            fn noise_scale_degree(&self) -> u32 { 1 }
        }
        let acct = LevelAccounting::new(depth, composite).unwrap();
        let ct = Ct(used * composite);
        match acct.remaining(&ct) {
            Ok(left) => prop_assert_eq!(left, depth - used),
            Err(RefreshError::LevelBudgetExceeded { .. }) => prop_assert!(used > depth),
            Err(other) => prop_assert!(false, "unexpected error {}", other),
        }
    }

    #[test]
    fn prop_simulated_refresh_doubles_precision(seed in any::<u64>()) {
        let params = iterative_flexible(ginx()).unwrap();
        let mut rng = ChaCha20Rng::seed_from_u64(seed);
        let values = sample_real_slots(params.num_slots, &mut rng);
        let ct = SimCiphertext::encrypt_depleted(&values, &params).unwrap();
        let primitive = SimulatedBootstrapper::new(params.clone(), 20.0, seed).unwrap();
        let boot = IterativeBootstrapper::with_params(primitive, SimDecoder, &params).unwrap();

        let mut session = boot.open(ct, 2);
        let (_, calibration) = boot.calibrate(&mut session, &values).unwrap();
        prop_assert!(calibration.hint >= 15);
        let outcome = boot.amplify(&mut session, None).unwrap();
        prop_assert_eq!(session.state(), SessionState::Done);
        prop_assert_eq!(outcome.precision_hint, Some(calibration.hint));

        let amplified = measure_precision(outcome.ciphertext.slots(), &values).unwrap();
        prop_assert!(amplified.bits() > calibration.measured.bits() + 10.0);
    }
}

#[test]
fn test_every_param_set_has_exactly_one_method() {
    for profile in ParamSet::ALL {
        let owner = method_for(profile).expect("every parameter set belongs to a method");
        for method in BootstrapMethod::ALL {
            let result = validate(method, profile);
            if method == owner {
                assert!(result.is_ok(), "{method} should accept {profile}");
            } else {
                assert!(
                    matches!(result, Err(RefreshError::IncompatibleConfiguration { .. })),
                    "{method} should reject {profile}"
                );
            }
        }
    }
}

#[test]
fn test_composite_reference_run() {
    let params = iterative_composite(ginx()).unwrap();
    assert_eq!(params.composite_degree, 3);

    let values = real_slots(&[0.1, 0.2, 0.3, 0.4, 0.5, 0.6, 0.7, 0.8]);
    let ct = SimCiphertext::encrypt_depleted(&values, &params).unwrap();
    let primitive = SimulatedBootstrapper::new(params.clone(), 20.0, 7).unwrap();
    let boot = IterativeBootstrapper::with_params(primitive, SimDecoder, &params).unwrap();

    let outcome = boot.run(ct, &values, 2, Some(19)).unwrap();
    assert_eq!(outcome.precision_hint, Some(19));
    assert_eq!(outcome.remaining_levels, params.depth.levels_after_bootstrap());
    assert_eq!(outcome.ciphertext.level() % params.composite_degree, 0);
}
