use std::fmt;

use crate::bootstrap::primitive::LevelledCiphertext;
use crate::error::{RefreshError, Result};
use crate::precision::PrecisionEstimate;

/// Lifecycle of one refresh.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SessionState {
    /// Holds a ciphertext whose level budget is spent; nothing has run yet.
    Depleted,
    /// Calibration pass done; the measured precision is available.
    Calibrating,
    /// Multi-pass refresh in flight.
    Amplifying,
    /// Refreshed ciphertext handed out with its level accounting.
    Done,
    /// A step failed. No output is usable.
    Failed,
}

impl SessionState {
    pub fn name(self) -> &'static str {
        match self {
            Self::Depleted => "Depleted",
            Self::Calibrating => "Calibrating",
            Self::Amplifying => "Amplifying",
            Self::Done => "Done",
            Self::Failed => "Failed",
        }
    }

    pub fn is_terminal(self) -> bool {
        matches!(self, Self::Done | Self::Failed)
    }
}

impl fmt::Display for SessionState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Whether partially depleted inputs may be refreshed.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum DepletionPolicy {
    /// Only ciphertexts with no usable level left.
    #[default]
    RequireDepleted,
    /// Any ciphertext still inside the level budget.
    AcceptPartial,
}

/// Remaining-level arithmetic for one context.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct LevelAccounting {
    /// Multiplicative depth the context was built with.
    pub depth: u32,
    /// Machine words per level; never assumed to be 1.
    pub composite_degree: u32,
}

impl LevelAccounting {
    pub fn new(depth: u32, composite_degree: u32) -> Result<Self> {
        if composite_degree == 0 {
            return Err(RefreshError::InvalidParam("composite degree must be >= 1".into()));
        }
        Ok(Self { depth, composite_degree })
    }

    /// Levels spent so far: `level / composite_degree + (noise_scale_degree - 1)`.
    ///
    /// The figures come from the backend, so a sum past `u32::MAX` is reported as an
    /// exceeded budget.
    pub fn consumed<C: LevelledCiphertext>(&self, ct: &C) -> Result<u32> {
        let words = ct.level() / self.composite_degree;
        words
            .checked_add(ct.noise_scale_degree().saturating_sub(1))
            .ok_or(RefreshError::LevelBudgetExceeded {
                depth: self.depth,
                consumed: u32::MAX,
            })
    }

    /// `depth - level / composite_degree - (noise_scale_degree - 1)`.
    pub fn remaining<C: LevelledCiphertext>(&self, ct: &C) -> Result<u32> {
        let consumed = self.consumed(ct)?;
        self.depth.checked_sub(consumed).ok_or(RefreshError::LevelBudgetExceeded {
            depth: self.depth,
            consumed,
        })
    }

    /// Levels still usable for multiplication. The last level of the chain is never
    /// usable, so a ciphertext at `depth - 1` has none left.
    pub fn usable<C: LevelledCiphertext>(&self, ct: &C) -> Result<u32> {
        Ok(self.remaining(ct)?.saturating_sub(1))
    }
}

/// Outcome of the calibration pass.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Calibration {
    pub measured: PrecisionEstimate,
    /// `measured` floored to whole bits.
    pub hint: u32,
}

/// Refreshed ciphertext plus everything the caller needs to keep computing on it.
#[derive(Clone, Debug)]
pub struct RefreshOutcome<C> {
    pub ciphertext: C,
    pub iterations: u32,
    /// Precision hint the primitive was called with. `None` for a single pass,
    /// which takes no hint.
    pub precision_hint: Option<u32>,
    pub calibration: Calibration,
    /// Levels available for further homomorphic operations.
    pub remaining_levels: u32,
}

/// One input ciphertext moving through calibrate → amplify.
///
/// Owned by the caller for a single refresh and dropped afterwards; nothing carries
/// over to the next session.
#[derive(Debug)]
pub struct RefreshSession<C> {
    pub(crate) input: C,
    pub(crate) iterations: u32,
    pub(crate) state: SessionState,
    pub(crate) calibration: Option<Calibration>,
    /// Output of the calibration pass, kept until amplification.
    pub(crate) refreshed_once: Option<C>,
    pub(crate) remaining_levels: Option<u32>,
}

impl<C> RefreshSession<C> {
    pub fn new(input: C, iterations: u32) -> Self {
        Self {
            input,
            iterations,
            state: SessionState::Depleted,
            calibration: None,
            refreshed_once: None,
            remaining_levels: None,
        }
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    pub fn iterations(&self) -> u32 {
        self.iterations
    }

    pub fn input(&self) -> &C {
        &self.input
    }

    pub fn calibration(&self) -> Option<Calibration> {
        self.calibration
    }

    /// The ciphertext refreshed once by calibration, until amplification consumes it.
    pub fn refreshed_once(&self) -> Option<&C> {
        self.refreshed_once.as_ref()
    }

    /// Set once the session reaches `Done`.
    pub fn remaining_levels(&self) -> Option<u32> {
        self.remaining_levels
    }

    pub(crate) fn expect_state(&self, expected: SessionState) -> Result<()> {
        if self.state != expected {
            return Err(RefreshError::InvalidSessionState {
                expected: expected.name(),
                actual: self.state.name(),
            });
        }
        Ok(())
    }

    /// Record a failed step. Terminal.
    pub(crate) fn fail(&mut self, err: RefreshError) -> RefreshError {
        self.state = SessionState::Failed;
        self.refreshed_once = None;
        self.remaining_levels = None;
        err
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Ct {
        level: u32,
        nsd: u32,
    }

    impl LevelledCiphertext for Ct {
        fn level(&self) -> u32 {
            self.level
        }
        fn noise_scale_degree(&self) -> u32 {
            self.nsd
        }
    }

    #[test]
    fn test_remaining_divides_by_composite_degree() {
        let acct = LevelAccounting::new(30, 3).unwrap();
        let ct = Ct { level: 3 * 20, nsd: 1 };
        assert_eq!(acct.remaining(&ct).unwrap(), 10);
        assert_eq!(acct.usable(&ct).unwrap(), 9);
    }

    #[test]
    fn test_remaining_counts_pending_rescale() {
        let acct = LevelAccounting::new(30, 1).unwrap();
        let ct = Ct { level: 20, nsd: 2 };
        assert_eq!(acct.remaining(&ct).unwrap(), 9);
    }

    #[test]
    fn test_remaining_underflow_is_an_error() {
        let acct = LevelAccounting::new(5, 2).unwrap();
        let ct = Ct { level: 12, nsd: 1 };
        assert!(matches!(
            acct.remaining(&ct),
            Err(RefreshError::LevelBudgetExceeded { depth: 5, consumed: 6 })
        ));
    }

    #[test]
    fn test_depleted_ciphertext_has_no_usable_level() {
        let acct = LevelAccounting::new(24, 3).unwrap();
        let ct = Ct { level: 3 * 23, nsd: 1 };
        assert_eq!(acct.usable(&ct).unwrap(), 0);
    }

    #[test]
    fn test_oversized_level_report_is_an_error() {
        let acct = LevelAccounting::new(10, 1).unwrap();
        let ct = Ct { level: u32::MAX, nsd: 2 };
        assert!(matches!(
            acct.remaining(&ct),
            Err(RefreshError::LevelBudgetExceeded { depth: 10, .. })
        ));
        assert!(acct.usable(&ct).is_err());
    }

    #[test]
    fn test_zero_composite_degree_rejected() {
        assert!(LevelAccounting::new(10, 0).is_err());
    }

    #[test]
    fn test_new_session_starts_depleted() {
        let session = RefreshSession::new(Ct { level: 0, nsd: 1 }, 2);
        assert_eq!(session.state(), SessionState::Depleted);
        assert!(!session.state().is_terminal());
        assert!(session.calibration().is_none());
        assert!(session.refreshed_once().is_none());
        assert!(session.remaining_levels().is_none());
    }
}
