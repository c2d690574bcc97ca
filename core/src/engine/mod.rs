//! Timer engine
//!
//! This module provides:
//! - **Reducer**: `TimerEngine`, a pure function of `(state, op)` over the
//!   externally-owned `TimerState`
//! - **Signals**: the transition callback surface (`TimerSignal`,
//!   `SignalHandler`)
//! - **Display**: derived values for rendering (progress, remaining time)
//!
//! # Ownership
//!
//! The embedding caller owns the authoritative state. The engine receives the
//! current value with every operation and returns a [`Reaction`] proposing
//! the next one; the caller may reject or override any proposal. The only
//! state the engine keeps across calls is view-local: the selection cursor
//! and the anonymise flag.

pub mod display;
mod machine;
mod op;
mod signal;


pub use machine::{TimerEngine, TICK_MS};
pub use op::{ControlOp, GraceAdvance, Reaction};
pub use signal::{SelectionDirection, SignalHandler, TimerSignal};
