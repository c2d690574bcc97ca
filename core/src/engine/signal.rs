use tempo_types::PhaseRef;

/// Signals emitted by the engine for cross-cutting concerns.
/// These represent "interesting things that happened" at a higher level
/// than raw flag diffs: signals fire based on the *kind* of transition,
/// so a `Start` from a frozen timer announces an unfreeze, not a fresh start.
#[derive(Debug, Clone, PartialEq)]
pub enum TimerSignal {
    /// One second of elapsed time was applied within the active phase.
    /// At a phase boundary this carries the clamped, full-duration value.
    Tick {
        /// Whole seconds elapsed within the phase
        elapsed_secs: u64,
        phase: PhaseRef,
    },

    /// A phase ran to its full duration and the grace delay elapsed
    PhaseCompleted { phase: PhaseRef, duration_ms: u64 },

    /// The final phase completed; no further ticks will be proposed
    Completed,

    // User controls
    Paused,
    Unpaused,
    /// Freeze flag flipped (fires on both directions of the toggle)
    FreezeToggled { frozen: bool },
    /// Controls were unfrozen (also fired by `Start` on a frozen timer)
    Unfroze,
    Stopped,
    ResetDone,

    // View-local navigation (never touches the authoritative state)
    SelectionMoved {
        direction: SelectionDirection,
        phase: PhaseRef,
    },
    PhaseClicked { phase: PhaseRef },
    AnonymiseToggled { anonymised: bool },
}

/// Which way a previous/next navigation moved the selection cursor
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SelectionDirection {
    Previous,
    Next,
}

/// Receives engine signals synchronously within the owning call.
///
/// Embedding views implement this to drive rendering and side effects
/// (sounds, persistence hooks). Handlers must not call back into the
/// engine while handling a signal.
pub trait SignalHandler {
    /// Handle a single signal
    fn handle_signal(&mut self, signal: &TimerSignal);

    /// Handle multiple signals (default implementation calls handle_signal for each)
    fn handle_signals(&mut self, signals: &[TimerSignal]) {
        for signal in signals {
            self.handle_signal(signal);
        }
    }
}
