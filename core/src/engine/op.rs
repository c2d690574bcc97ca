//! Reducer input/output types
//!
//! The engine is a pure function of `(state, op)`. Every operation produces a
//! [`Reaction`]: an optional proposed next state, the signals that describe
//! the transition, and (for boundary ticks) a pending grace-delayed advance.

use tempo_types::TimerState;

use super::signal::TimerSignal;

/// A control operation against the current externally-owned state.
///
/// `Tick` and `FinishAdvance` are submitted by the scheduler; everything else
/// maps to a user-facing control.
#[derive(Debug, Clone, PartialEq)]
pub enum ControlOp {
    Start,
    Pause,
    /// Toggle the freeze flag, or force it to a specific value
    Freeze(Option<bool>),
    Stop,
    Reset,
    /// Move the view-local selection cursor back one reached phase
    Previous,
    /// Move the view-local selection cursor forward, up to the active phase
    Next,
    /// Set the selection cursor to a specific reached phase
    SelectPhase(usize),
    /// Toggle the cosmetic anonymise flag, or force it to a specific value
    ToggleAnonymise(Option<bool>),
    /// One second of scheduler time elapsed
    Tick,
    /// The grace delay after a boundary tick elapsed
    FinishAdvance(GraceAdvance),
}

/// A phase-complete transition waiting out its one-second grace delay.
///
/// Produced by a boundary tick and resubmitted as
/// [`ControlOp::FinishAdvance`] one second later. Carries enough of the
/// boundary snapshot for the reducer to re-check that the state was not
/// externally reset or replaced during the grace window.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GraceAdvance {
    /// Phase that reached its boundary
    pub phase_index: usize,

    /// That phase's full duration at boundary time
    pub duration_ms: u64,
}

/// The outcome of applying one operation.
///
/// An empty reaction (no proposal, no signals) is the uniform no-op result
/// for invalid preconditions: the engine never errors on its control surface.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Reaction {
    /// Proposed next state for the owner to apply (None = state untouched)
    pub proposed: Option<TimerState>,

    /// Transition signals, in firing order
    pub signals: Vec<TimerSignal>,

    /// A phase-complete transition to submit after the grace delay
    pub pending: Option<GraceAdvance>,
}

impl Reaction {
    /// The no-op reaction
    pub fn none() -> Self {
        Self::default()
    }

    /// True if the operation declined to do anything
    pub fn is_noop(&self) -> bool {
        self.proposed.is_none() && self.signals.is_empty() && self.pending.is_none()
    }
}
