//! The timer reducer
//!
//! `TimerEngine` never holds authoritative state: every operation takes the
//! caller's current `TimerState` and returns a [`Reaction`] proposing the
//! next one. The only mutable fields are view-local (selection cursor,
//! anonymise flag) and never feed back into the authoritative state.

use hashbrown::HashMap;
use tempo_types::{Phase, PhaseRef, TimerState};

use super::op::{ControlOp, GraceAdvance, Reaction};
use super::signal::{SelectionDirection, SignalHandler, TimerSignal};

/// Milliseconds applied per scheduler tick
pub const TICK_MS: u64 = 1000;

/// The multi-phase timer state machine.
///
/// Owns the phase sequence and the view-local browsing state; computes
/// state transitions as a pure function of `(state, op)`.
#[derive(Debug, Clone, Default)]
pub struct TimerEngine {
    /// Ordered phase sequence; index is the canonical phase identity
    phases: Vec<Phase>,

    /// Display labels by phase index (views render unreached, unlabeled
    /// phases as placeholders)
    action_labels: HashMap<usize, String>,

    /// View-local browsing cursor into already-reached phases.
    /// None = following the active phase. Cleared whenever the active
    /// phase changes.
    selected: Option<usize>,

    /// Cosmetic flag, independent of run state
    anonymised: bool,
}

impl TimerEngine {
    pub fn new(phases: Vec<Phase>) -> Self {
        Self {
            phases,
            ..Self::default()
        }
    }

    /// Attach display action labels keyed by phase index
    pub fn with_action_labels(mut self, labels: HashMap<usize, String>) -> Self {
        self.action_labels = labels;
        self
    }

    // ─── Accessors ───────────────────────────────────────────────────────────

    pub fn phases(&self) -> &[Phase] {
        &self.phases
    }

    /// Replace the phase sequence. Run state is not touched; callers
    /// typically pair this with `Reset`. The selection cursor is cleared.
    pub fn set_phases(&mut self, phases: Vec<Phase>) {
        self.phases = phases;
        self.selected = None;
    }

    /// The phase the view is browsing: the cursor if set, else the active
    /// phase. A cursor past the active phase is stale (the owner replaced
    /// the state underneath us) and falls back to the active phase.
    pub fn selected_index(&self, state: &TimerState) -> usize {
        self.selected
            .filter(|&index| index <= state.phase_index)
            .unwrap_or(state.phase_index)
    }

    pub fn anonymised(&self) -> bool {
        self.anonymised
    }

    /// Display label for a phase, if one was configured
    pub fn action_label(&self, index: usize) -> Option<&str> {
        self.action_labels.get(&index).map(String::as_str)
    }

    /// The active phase, if the cursor is in bounds
    pub fn current_phase(&self, state: &TimerState) -> Option<&Phase> {
        self.phases.get(state.phase_index)
    }

    fn phase_ref(&self, index: usize) -> PhaseRef {
        PhaseRef::new(index, self.phases.get(index).and_then(|p| p.title.clone()))
    }

    // ─── Reducer ─────────────────────────────────────────────────────────────

    /// Apply one operation to the caller's current state.
    pub fn apply(&mut self, state: &TimerState, op: ControlOp) -> Reaction {
        match op {
            ControlOp::Start => self.start(state),
            ControlOp::Pause => self.pause(state),
            ControlOp::Freeze(force) => self.freeze(state, force),
            ControlOp::Stop => self.rewind(TimerSignal::Stopped),
            ControlOp::Reset => self.rewind(TimerSignal::ResetDone),
            ControlOp::Previous => self.previous(state),
            ControlOp::Next => self.next(state),
            ControlOp::SelectPhase(index) => self.select_phase(state, index),
            ControlOp::ToggleAnonymise(force) => self.toggle_anonymise(force),
            ControlOp::Tick => self.tick(state),
            ControlOp::FinishAdvance(adv) => self.finish_advance(state, adv),
        }
    }

    /// Apply one operation, dispatching signals to a handler and returning
    /// the proposed state. Convenience for synchronous embeddings.
    pub fn apply_with(
        &mut self,
        state: &TimerState,
        op: ControlOp,
        handler: &mut dyn SignalHandler,
    ) -> Option<TimerState> {
        let reaction = self.apply(state, op);
        handler.handle_signals(&reaction.signals);
        reaction.proposed
    }

    // ─── Controls ────────────────────────────────────────────────────────────

    fn start(&mut self, state: &TimerState) -> Reaction {
        if !self.cursor_in_bounds(state) {
            return Reaction::none();
        }

        let mut signals = Vec::new();
        if state.frozen {
            // Starting a frozen timer is semantically an unfreeze
            signals.push(TimerSignal::Unfroze);
        } else if state.paused {
            signals.push(TimerSignal::Unpaused);
        }

        let next = TimerState {
            running: true,
            paused: false,
            frozen: false,
            ..*state
        };

        Reaction {
            proposed: Some(next),
            signals,
            pending: None,
        }
    }

    fn pause(&mut self, state: &TimerState) -> Reaction {
        // Freeze takes precedence: pausing a frozen timer is rejected
        if state.frozen || !self.cursor_in_bounds(state) {
            return Reaction::none();
        }

        let next = TimerState {
            running: false,
            paused: true,
            ..*state
        };

        Reaction {
            proposed: Some(next),
            signals: vec![TimerSignal::Paused],
            pending: None,
        }
    }

    fn freeze(&mut self, state: &TimerState, force: Option<bool>) -> Reaction {
        let target = force.unwrap_or(!state.frozen);
        if target == state.frozen {
            return Reaction::none();
        }

        if target {
            // Freezing: halt the loop, preserve the pause flag as the
            // snapshot of what to restore on unfreeze
            let next = TimerState {
                running: false,
                frozen: true,
                ..*state
            };
            Reaction {
                proposed: Some(next),
                signals: vec![TimerSignal::FreezeToggled { frozen: true }],
                pending: None,
            }
        } else {
            // Unfreezing: resume running unless explicitly paused beforehand
            let next = TimerState {
                running: !state.paused,
                frozen: false,
                ..*state
            };
            Reaction {
                proposed: Some(next),
                signals: vec![
                    TimerSignal::FreezeToggled { frozen: false },
                    TimerSignal::Unfroze,
                ],
                pending: None,
            }
        }
    }

    /// Full rewind to phase 0 (`Stop` and `Reset` differ only in the signal)
    fn rewind(&mut self, signal: TimerSignal) -> Reaction {
        self.selected = None;
        Reaction {
            proposed: Some(TimerState::initial()),
            signals: vec![signal],
            pending: None,
        }
    }

    // ─── Navigation (view-local, never touches TimerState) ──────────────────

    fn previous(&mut self, state: &TimerState) -> Reaction {
        if self.phases.is_empty() {
            return Reaction::none();
        }

        let cursor = self.selected_index(state);
        if cursor == 0 {
            return Reaction::none();
        }

        let target = cursor - 1;
        self.selected = Some(target);
        Reaction {
            proposed: None,
            signals: vec![TimerSignal::SelectionMoved {
                direction: SelectionDirection::Previous,
                phase: self.phase_ref(target),
            }],
            pending: None,
        }
    }

    fn next(&mut self, state: &TimerState) -> Reaction {
        if self.phases.is_empty() {
            return Reaction::none();
        }

        let cursor = self.selected_index(state);
        if cursor >= state.phase_index {
            return Reaction::none();
        }

        let target = cursor + 1;
        self.selected = Some(target);
        Reaction {
            proposed: None,
            signals: vec![TimerSignal::SelectionMoved {
                direction: SelectionDirection::Next,
                phase: self.phase_ref(target),
            }],
            pending: None,
        }
    }

    fn select_phase(&mut self, state: &TimerState, index: usize) -> Reaction {
        // Only phases already reached can be browsed
        if index >= self.phases.len() || index > state.phase_index {
            return Reaction::none();
        }

        self.selected = Some(index);
        Reaction {
            proposed: None,
            signals: vec![TimerSignal::PhaseClicked {
                phase: self.phase_ref(index),
            }],
            pending: None,
        }
    }

    fn toggle_anonymise(&mut self, force: Option<bool>) -> Reaction {
        let target = force.unwrap_or(!self.anonymised);
        if target == self.anonymised {
            return Reaction::none();
        }

        self.anonymised = target;
        Reaction {
            proposed: None,
            signals: vec![TimerSignal::AnonymiseToggled { anonymised: target }],
            pending: None,
        }
    }

    // ─── Tick algorithm ──────────────────────────────────────────────────────

    /// One second of scheduler time.
    ///
    /// At a phase boundary the displayed time is clamped to exactly the
    /// phase duration and published immediately; the actual phase-complete
    /// transition is deferred behind the returned [`GraceAdvance`] so the
    /// boundary state stays visible for one tick.
    fn tick(&mut self, state: &TimerState) -> Reaction {
        if !state.running || state.frozen {
            return Reaction::none();
        }
        let Some(phase) = self.phases.get(state.phase_index) else {
            return Reaction::none();
        };

        let duration_ms = phase.duration_ms;
        let proposed_ms = state.elapsed_ms + TICK_MS;

        if proposed_ms >= duration_ms {
            // Boundary: never publish an overshoot
            let next = TimerState {
                elapsed_ms: duration_ms,
                ..*state
            };
            Reaction {
                proposed: Some(next),
                signals: vec![TimerSignal::Tick {
                    elapsed_secs: duration_ms / 1000,
                    phase: self.phase_ref(state.phase_index),
                }],
                pending: Some(GraceAdvance {
                    phase_index: state.phase_index,
                    duration_ms,
                }),
            }
        } else {
            let next = TimerState {
                elapsed_ms: proposed_ms,
                ..*state
            };
            Reaction {
                proposed: Some(next),
                signals: vec![TimerSignal::Tick {
                    elapsed_secs: proposed_ms / 1000,
                    phase: self.phase_ref(state.phase_index),
                }],
                pending: None,
            }
        }
    }

    /// The grace delay elapsed: complete the phase and advance or terminate.
    ///
    /// The state may have been stopped, replaced, frozen, or re-phased during
    /// the grace window, so every guard is re-checked before applying the
    /// transition; any mismatch degrades to a no-op.
    fn finish_advance(&mut self, state: &TimerState, adv: GraceAdvance) -> Reaction {
        if !state.running || state.frozen {
            return Reaction::none();
        }
        if state.phase_index != adv.phase_index {
            return Reaction::none();
        }
        let Some(phase) = self.phases.get(adv.phase_index) else {
            return Reaction::none();
        };
        if phase.duration_ms != adv.duration_ms || state.elapsed_ms != adv.duration_ms {
            return Reaction::none();
        }

        let completed = self.phase_ref(adv.phase_index);
        let mut signals = vec![TimerSignal::PhaseCompleted {
            phase: completed,
            duration_ms: adv.duration_ms,
        }];

        let next = if adv.phase_index + 1 < self.phases.len() {
            // Active phase changes: drop the browsing cursor
            self.selected = None;
            TimerState {
                phase_index: adv.phase_index + 1,
                elapsed_ms: 0,
                ..*state
            }
        } else {
            // Terminal: keep the elapsed time at the full duration
            signals.push(TimerSignal::Completed);
            TimerState {
                running: false,
                paused: false,
                ..*state
            }
        };

        Reaction {
            proposed: Some(next),
            signals,
            pending: None,
        }
    }

    fn cursor_in_bounds(&self, state: &TimerState) -> bool {
        state.phase_index < self.phases.len()
    }
}
