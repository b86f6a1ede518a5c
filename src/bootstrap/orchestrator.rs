use num_complex::Complex64;
use rayon::prelude::*;
use tracing::{debug, info, warn};

use crate::bootstrap::primitive::{BootstrapPrimitive, SlotDecoder};
use crate::bootstrap::session::{
    Calibration, DepletionPolicy, LevelAccounting, RefreshOutcome, RefreshSession, SessionState,
};
use crate::depth::check_iterations;
use crate::error::{RefreshError, Result};
use crate::params::ContextParams;
use crate::precision::PrecisionMetric;

/// Settings of the refresh protocol for one context.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct RefreshConfig {
    pub accounting: LevelAccounting,
    pub metric: PrecisionMetric,
    pub depletion: DepletionPolicy,
}

impl RefreshConfig {
    /// Default metric and strict depletion, accounting taken from the context.
    pub fn from_params(params: &ContextParams) -> Result<Self> {
        Ok(Self {
            accounting: LevelAccounting::new(params.multiplicative_depth(), params.composite_degree)?,
            metric: PrecisionMetric::default(),
            depletion: DepletionPolicy::RequireDepleted,
        })
    }

    pub fn with_metric(mut self, metric: PrecisionMetric) -> Self {
        self.metric = metric;
        self
    }

    pub fn with_depletion(mut self, depletion: DepletionPolicy) -> Self {
        self.depletion = depletion;
        self
    }
}

/// Drives the two-phase iterative bootstrapping protocol.
///
/// 1. Calibrate: bootstrap once, decode, measure the precision reached.
/// 2. Amplify: bootstrap the same input with `n` passes, declaring the measured
///    precision so each pass can correct the residual error of the previous one.
///
/// Failed bootstrap calls are surfaced to the caller and never retried.
pub struct IterativeBootstrapper<P, D> {
    primitive: P,
    decoder: D,
    config: RefreshConfig,
}

impl<P, D> IterativeBootstrapper<P, D>
where
    P: BootstrapPrimitive,
    D: SlotDecoder<P::Ciphertext>,
{
    pub fn new(primitive: P, decoder: D, config: RefreshConfig) -> Self {
        Self {
            primitive,
            decoder,
            config,
        }
    }

    pub fn with_params(primitive: P, decoder: D, params: &ContextParams) -> Result<Self> {
        Ok(Self::new(primitive, decoder, RefreshConfig::from_params(params)?))
    }

    pub fn primitive(&self) -> &P {
        &self.primitive
    }

    pub fn decoder(&self) -> &D {
        &self.decoder
    }

    pub fn config(&self) -> &RefreshConfig {
        &self.config
    }

    /// Start a session for a depleted ciphertext.
    pub fn open(&self, input: P::Ciphertext, iterations: u32) -> RefreshSession<P::Ciphertext> {
        RefreshSession::new(input, iterations)
    }

    /// Run the single-pass calibration and measure it against `expected`.
    ///
    /// Returns the once-refreshed ciphertext with its measured precision. The session
    /// keeps that ciphertext, so a one-pass [`amplify`](Self::amplify) finishes from it
    /// without bootstrapping again.
    pub fn calibrate<'s>(
        &self,
        session: &'s mut RefreshSession<P::Ciphertext>,
        expected: &[Complex64],
    ) -> Result<(&'s P::Ciphertext, Calibration)> {
        session.expect_state(SessionState::Depleted)?;

        if let Err(err) = check_iterations(session.iterations, self.primitive.max_iterations()) {
            return Err(session.fail(err));
        }
        if let Err(err) = self.check_input(&session.input) {
            return Err(session.fail(err));
        }

        let refreshed = match self.primitive.refresh(&session.input) {
            Ok(ct) => ct,
            Err(err) => {
                warn!(error = %err, "calibration pass failed");
                return Err(session.fail(err));
            }
        };
        let measured = match self
            .decoder
            .decode(&refreshed)
            .and_then(|observed| self.config.metric.measure(&observed, expected))
        {
            Ok(measured) => measured,
            Err(err) => {
                warn!(error = %err, "calibration measurement failed");
                return Err(session.fail(err));
            }
        };

        let calibration = Calibration {
            measured,
            hint: measured.floor_bits(),
        };
        info!(
            precision_bits = measured.bits(),
            hint = calibration.hint,
            "bootstrapping precision after 1 iteration"
        );
        session.calibration = Some(calibration);
        session.state = SessionState::Calibrating;
        let refreshed: &P::Ciphertext = session.refreshed_once.insert(refreshed);
        Ok((refreshed, calibration))
    }

    /// Run the `n`-pass refresh of the session input.
    ///
    /// `declared` overrides the calibrated hint, e.g. with a value measured over many
    /// runs. Whatever hint is chosen reaches the primitive unchanged. With `n = 1` the
    /// calibration output is the result and the primitive is not called again.
    pub fn amplify(
        &self,
        session: &mut RefreshSession<P::Ciphertext>,
        declared: Option<u32>,
    ) -> Result<RefreshOutcome<P::Ciphertext>> {
        session.expect_state(SessionState::Calibrating)?;
        let (calibration, refreshed_once) = match (session.calibration, session.refreshed_once.take()) {
            (Some(c), Some(ct)) => (c, ct),
            _ => {
                return Err(session.fail(RefreshError::InvalidSessionState {
                    expected: SessionState::Calibrating.name(),
                    actual: SessionState::Depleted.name(),
                }))
            }
        };

        session.state = SessionState::Amplifying;
        let iterations = session.iterations;
        let (ciphertext, precision_hint) = if iterations == 1 {
            (refreshed_once, None)
        } else {
            let hint = declared.unwrap_or(calibration.hint);
            if hint != calibration.hint {
                debug!(calibrated = calibration.hint, declared = hint, "using declared precision hint");
            }
            match self.primitive.refresh_iterative(&session.input, iterations, hint) {
                Ok(ct) => (ct, Some(hint)),
                Err(err) => {
                    warn!(error = %err, iterations, "iterative bootstrapping failed");
                    return Err(session.fail(err));
                }
            }
        };

        let remaining_levels = match self.config.accounting.remaining(&ciphertext) {
            Ok(levels) => levels,
            Err(err) => return Err(session.fail(err)),
        };
        info!(iterations, hint = ?precision_hint, remaining_levels, "bootstrapping finished");

        session.state = SessionState::Done;
        session.remaining_levels = Some(remaining_levels);
        Ok(RefreshOutcome {
            ciphertext,
            iterations,
            precision_hint,
            calibration,
            remaining_levels,
        })
    }

    /// Calibrate then amplify in one call.
    pub fn run(
        &self,
        input: P::Ciphertext,
        expected: &[Complex64],
        iterations: u32,
        declared: Option<u32>,
    ) -> Result<RefreshOutcome<P::Ciphertext>> {
        let mut session = self.open(input, iterations);
        self.calibrate(&mut session, expected)?;
        self.amplify(&mut session, declared)
    }

    /// Refresh independent ciphertexts on the rayon pool, one session each.
    ///
    /// The primitive must be safe to call from several threads at once.
    pub fn refresh_batch(
        &self,
        jobs: Vec<(P::Ciphertext, Vec<Complex64>)>,
        iterations: u32,
    ) -> Vec<Result<RefreshOutcome<P::Ciphertext>>>
    where
        Self: Sync,
        P::Ciphertext: Send,
    {
        jobs.into_par_iter()
            .map(|(input, expected)| self.run(input, &expected, iterations, None))
            .collect()
    }

    fn check_input(&self, input: &P::Ciphertext) -> Result<()> {
        let usable = self.config.accounting.usable(input)?;
        if usable > 0 && self.config.depletion == DepletionPolicy::RequireDepleted {
            return Err(RefreshError::NotDepleted { remaining: usable });
        }
        Ok(())
    }
}
