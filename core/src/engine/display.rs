//! Derived display values
//!
//! Pure helpers over the externally-owned state; views call these on every
//! published value.

use tempo_types::{Phase, TimerState};

/// Fill fraction for the active phase (0.0 = nothing elapsed, 1.0 = boundary).
/// A zero-duration or out-of-range phase reads as 0.0.
pub fn progress_fraction(state: &TimerState, phases: &[Phase]) -> f32 {
    let Some(phase) = phases.get(state.phase_index) else {
        return 0.0;
    };
    if phase.duration_ms == 0 {
        return 0.0;
    }

    (state.elapsed_ms as f32 / phase.duration_ms as f32).clamp(0.0, 1.0)
}

/// Whole seconds remaining in the active phase, floored at 0.
///
/// Uses floor-of-seconds on both sides so a phase at its boundary (or past
/// any whole-second remainder) reads as 0.
pub fn remaining_secs(state: &TimerState, phases: &[Phase]) -> u64 {
    let Some(phase) = phases.get(state.phase_index) else {
        return 0;
    };

    phase.duration_secs().saturating_sub(state.elapsed_secs())
}

/// True once the timer has run the final phase to its full duration and the
/// loop has terminated.
pub fn is_at_end(state: &TimerState, phases: &[Phase]) -> bool {
    let Some(last) = phases.last() else {
        return false;
    };

    !state.running
        && state.phase_index == phases.len() - 1
        && state.elapsed_ms >= last.duration_ms
}

/// True if the timer has reached (or passed) the given phase.
/// Views render unreached, unlabeled phases as placeholders.
pub fn phase_reached(state: &TimerState, index: usize) -> bool {
    index <= state.phase_index
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn progress_fraction_is_clamped() {
        let phases = vec![Phase::new(4000)];
        let mut state = TimerState::initial();

        state.elapsed_ms = 1000;
        assert_eq!(progress_fraction(&state, &phases), 0.25);

        // Overshoot (only reachable via an external override) still clamps
        state.elapsed_ms = 9000;
        assert_eq!(progress_fraction(&state, &phases), 1.0);
    }

    #[test]
    fn progress_fraction_zero_duration_reads_zero() {
        let phases = vec![Phase::new(0)];
        let state = TimerState::initial();
        assert_eq!(progress_fraction(&state, &phases), 0.0);
    }

    #[test]
    fn progress_fraction_out_of_range_reads_zero() {
        let state = TimerState {
            phase_index: 3,
            ..TimerState::initial()
        };
        assert_eq!(progress_fraction(&state, &[]), 0.0);
    }

    #[test]
    fn remaining_secs_floors_both_sides() {
        let phases = vec![Phase::new(3500)];
        let mut state = TimerState::initial();

        assert_eq!(remaining_secs(&state, &phases), 3);

        state.elapsed_ms = 1000;
        assert_eq!(remaining_secs(&state, &phases), 2);

        // Sub-second remainder reads as 0
        state.elapsed_ms = 3000;
        assert_eq!(remaining_secs(&state, &phases), 0);

        state.elapsed_ms = 3500;
        assert_eq!(remaining_secs(&state, &phases), 0);
    }

    #[test]
    fn at_end_requires_terminal_final_phase() {
        let phases = vec![Phase::new(2000), Phase::new(1000)];

        // Mid-run
        let running = TimerState {
            phase_index: 1,
            elapsed_ms: 1000,
            running: true,
            ..TimerState::initial()
        };
        assert!(!is_at_end(&running, &phases));

        // Terminal
        let done = TimerState {
            phase_index: 1,
            elapsed_ms: 1000,
            ..TimerState::initial()
        };
        assert!(is_at_end(&done, &phases));

        // Stopped at phase 0 boundary is not the end
        let early = TimerState {
            phase_index: 0,
            elapsed_ms: 2000,
            ..TimerState::initial()
        };
        assert!(!is_at_end(&early, &phases));

        assert!(!is_at_end(&TimerState::initial(), &[]));
    }

    #[test]
    fn phase_reached_tracks_active_index() {
        let state = TimerState {
            phase_index: 1,
            ..TimerState::initial()
        };
        assert!(phase_reached(&state, 0));
        assert!(phase_reached(&state, 1));
        assert!(!phase_reached(&state, 2));
    }
}
