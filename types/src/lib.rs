//! Shared timer types for Tempo
//!
//! This crate contains serializable types that are shared between the engine
//! crate (tempo-core) and any embedding frontend. The frontend owns the
//! authoritative `TimerState` and persists it however it likes; the engine
//! only proposes new values.

use serde::{Deserialize, Serialize};

// ─────────────────────────────────────────────────────────────────────────────
// Phases
// ─────────────────────────────────────────────────────────────────────────────

/// One timed segment of a multi-stage countdown/count-up sequence.
///
/// Phases are immutable once the ordered sequence is handed to the engine for
/// a run. The position in that sequence is the canonical identity; the title
/// is a display label and may repeat across phases.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Phase {
    /// Total duration in milliseconds
    pub duration_ms: u64,

    /// Optional display title
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
}

impl Phase {
    /// Create an untitled phase
    pub fn new(duration_ms: u64) -> Self {
        Self {
            duration_ms,
            title: None,
        }
    }

    /// Create a titled phase
    pub fn titled(duration_ms: u64, title: impl Into<String>) -> Self {
        Self {
            duration_ms,
            title: Some(title.into()),
        }
    }

    /// Whole seconds in this phase (floor)
    pub fn duration_secs(&self) -> u64 {
        self.duration_ms / 1000
    }
}

/// Display identity of a phase as surfaced in signals.
///
/// The index is authoritative (positions never repeat); the title is carried
/// purely for rendering and may be shared by several phases.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PhaseRef {
    /// Position in the phase sequence
    pub index: usize,

    /// Display title (cached from the phase)
    pub title: Option<String>,
}

impl PhaseRef {
    pub fn new(index: usize, title: Option<String>) -> Self {
        Self { index, title }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Timer State
// ─────────────────────────────────────────────────────────────────────────────

/// Externally-owned timer state.
///
/// The embedding caller is the sole writer of record: the engine receives the
/// current value with every operation and proposes the next one. Invariants
/// held in every proposed value:
/// - `elapsed_ms` never exceeds the active phase's duration
/// - `running` and `paused` are never both true
/// - `frozen` overrides `running` for the tick loop (frozen time never
///   advances even if `running` is true underneath)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimerState {
    /// Index of the active phase
    pub phase_index: usize,

    /// Elapsed milliseconds within the active phase
    pub elapsed_ms: u64,

    /// Tick loop active
    pub running: bool,

    /// Explicitly paused by the user (distinct from frozen)
    pub paused: bool,

    /// Controls suspended; the pre-freeze run/pause split is preserved so
    /// unfreezing restores exactly that state
    pub frozen: bool,
}

impl TimerState {
    /// State at mount/reset: phase 0, nothing elapsed, idle
    pub fn initial() -> Self {
        Self {
            phase_index: 0,
            elapsed_ms: 0,
            running: false,
            paused: false,
            frozen: false,
        }
    }

    /// Whole seconds elapsed within the active phase (floor)
    pub fn elapsed_secs(&self) -> u64 {
        self.elapsed_ms / 1000
    }
}

impl Default for TimerState {
    fn default() -> Self {
        Self::initial()
    }
}
