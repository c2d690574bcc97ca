pub mod driver;
pub mod engine;
pub mod error;
pub mod loader;

// Re-exports for convenience
pub use driver::{TimerCommand, TimerDriver, TimerHandle};
pub use engine::display::{is_at_end, phase_reached, progress_fraction, remaining_secs};
pub use engine::{
    ControlOp, GraceAdvance, Reaction, SelectionDirection, SignalHandler, TimerEngine,
    TimerSignal, TICK_MS,
};
pub use error::TimerError;
pub use loader::{load_phases_from_file, load_phases_from_str, PhaseSet};
pub use tempo_types::{Phase, PhaseRef, TimerState};
