pub mod primitive;
pub mod session;
pub mod orchestrator;

pub use primitive::{BootstrapPrimitive, LevelledCiphertext, SlotDecoder};
pub use session::{
    Calibration, DepletionPolicy, LevelAccounting, RefreshOutcome, RefreshSession, SessionState,
};
pub use orchestrator::{IterativeBootstrapper, RefreshConfig};
