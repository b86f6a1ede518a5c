use thiserror::Error;

#[derive(Debug, Error)]
pub enum RefreshError {
    #[error("specified bootstrapping method {method} and parameter set {profile} are incompatible")]
    IncompatibleConfiguration { method: String, profile: String },

    #[error("invalid bootstrapping method: {0}")]
    UnknownMethod(String),

    #[error("unknown parameter set: {0}")]
    UnknownProfile(String),

    #[error("unsupported iteration count {requested}: supported range is 1..={max}")]
    UnsupportedIterationCount { requested: u32, max: u32 },

    #[error("cannot compare vectors with different numbers of elements: expected {expected}, got {got}")]
    VectorLengthMismatch { expected: usize, got: usize },

    #[error("approximation error is exactly zero: precision is undefined")]
    UnderflowPrecision,

    #[error("non-finite difference at slot {index}")]
    NonFiniteValue { index: usize },

    #[error("input ciphertext is not depleted: {remaining} usable level(s) remain")]
    NotDepleted { remaining: u32 },

    #[error("level accounting underflow: {consumed} level(s) consumed from a depth of {depth}")]
    LevelBudgetExceeded { depth: u32, consumed: u32 },

    #[error("refresh session is in state {actual}, expected {expected}")]
    InvalidSessionState {
        expected: &'static str,
        actual: &'static str,
    },

    #[error("bootstrap invocation failed: {0}")]
    BootstrapFailed(String),

    #[error("invalid parameter: {0}")]
    InvalidParam(String),
}

pub type Result<T> = std::result::Result<T, RefreshError>;
