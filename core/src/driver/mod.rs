//! Tick scheduler
//!
//! One spawned task per engine instance drives the one-second cadence and the
//! grace-delayed phase advance. All control operations are serialized through
//! a command channel, so no tick ever overlaps a control and a new cycle is
//! only armed after the previous one ran to completion.
//!
//! The embedding caller remains the owner of the authoritative state: every
//! proposal is published over a `watch` channel, and the owner can override
//! the driver's copy at any time with [`TimerCommand::Replace`].

use tempo_types::{Phase, TimerState};
use tokio::sync::{broadcast, mpsc, watch};
use tokio::time::{sleep, Duration, Instant};

use crate::engine::{ControlOp, GraceAdvance, TimerEngine, TimerSignal, TICK_MS};


/// Cadence of the tick loop
const TICK_PERIOD: Duration = Duration::from_millis(TICK_MS);

/// How long a boundary state stays visible before the phase advances
const GRACE_DELAY: Duration = Duration::from_millis(TICK_MS);

const COMMAND_BUFFER: usize = 32;
const SIGNAL_BUFFER: usize = 64;

/// Control messages accepted by the scheduler task
#[derive(Debug, Clone)]
pub enum TimerCommand {
    Start,
    Pause,
    Freeze(Option<bool>),
    Stop,
    Reset,
    Previous,
    Next,
    SelectPhase(usize),
    ToggleAnonymise(Option<bool>),
    /// Swap the phase sequence (does not reset run state)
    SetPhases(Vec<Phase>),
    /// Owner override: replace the authoritative state wholesale
    Replace(TimerState),
    Shutdown,
}

/// Handle to a running scheduler task.
///
/// Dropping every handle closes the command channel and terminates the task,
/// cancelling any pending tick or grace delay.
#[derive(Debug, Clone)]
pub struct TimerHandle {
    commands: mpsc::Sender<TimerCommand>,
    state: watch::Receiver<TimerState>,
    signals: broadcast::Sender<TimerSignal>,
}

impl TimerHandle {
    /// Send a raw command; dropped silently if the task has terminated
    pub async fn command(&self, cmd: TimerCommand) {
        let _ = self.commands.send(cmd).await;
    }

    pub async fn start(&self) {
        self.command(TimerCommand::Start).await;
    }

    pub async fn pause(&self) {
        self.command(TimerCommand::Pause).await;
    }

    pub async fn freeze(&self, force: Option<bool>) {
        self.command(TimerCommand::Freeze(force)).await;
    }

    pub async fn stop(&self) {
        self.command(TimerCommand::Stop).await;
    }

    pub async fn reset(&self) {
        self.command(TimerCommand::Reset).await;
    }

    pub async fn set_phases(&self, phases: Vec<Phase>) {
        self.command(TimerCommand::SetPhases(phases)).await;
    }

    /// Owner override of the authoritative state
    pub async fn replace(&self, state: TimerState) {
        self.command(TimerCommand::Replace(state)).await;
    }

    pub async fn shutdown(&self) {
        self.command(TimerCommand::Shutdown).await;
    }

    /// Watch channel carrying every state the engine proposes
    pub fn state(&self) -> watch::Receiver<TimerState> {
        self.state.clone()
    }

    /// Latest published state
    pub fn current_state(&self) -> TimerState {
        *self.state.borrow()
    }

    /// Subscribe to transition signals
    pub fn subscribe(&self) -> broadcast::Receiver<TimerSignal> {
        self.signals.subscribe()
    }
}

/// The scheduler task state
pub struct TimerDriver {
    engine: TimerEngine,
    state: TimerState,
    pending: Option<GraceAdvance>,
    commands: mpsc::Receiver<TimerCommand>,
    state_tx: watch::Sender<TimerState>,
    signal_tx: broadcast::Sender<TimerSignal>,
}

impl TimerDriver {
    /// Spawn the scheduler task for an engine and its initial state
    pub fn spawn(engine: TimerEngine, initial: TimerState) -> TimerHandle {
        let (cmd_tx, cmd_rx) = mpsc::channel(COMMAND_BUFFER);
        let (state_tx, state_rx) = watch::channel(initial);
        let (signal_tx, _) = broadcast::channel(SIGNAL_BUFFER);

        let driver = Self {
            engine,
            state: initial,
            pending: None,
            commands: cmd_rx,
            state_tx,
            signal_tx: signal_tx.clone(),
        };

        tokio::spawn(driver.run());

        TimerHandle {
            commands: cmd_tx,
            state: state_rx,
            signals: signal_tx,
        }
    }

    async fn run(mut self) {
        tracing::debug!(phases = self.engine.phases().len(), "Timer scheduler started");

        // Single timeline for both the tick cadence and the grace delay;
        // `pending` decides which one the next expiry means.
        let timer = sleep(TICK_PERIOD);
        tokio::pin!(timer);

        loop {
            let armed = self.pending.is_some() || self.ticking();

            tokio::select! {
                maybe_cmd = self.commands.recv() => {
                    let Some(cmd) = maybe_cmd else { break };
                    if matches!(cmd, TimerCommand::Shutdown) {
                        break;
                    }

                    let was_cadenced = self.ticking() && self.pending.is_none();
                    self.handle_command(cmd);

                    // Arm a fresh cycle when the loop (re)starts ticking
                    if self.ticking() && self.pending.is_none() && !was_cadenced {
                        timer.as_mut().reset(Instant::now() + TICK_PERIOD);
                    }
                }

                () = timer.as_mut(), if armed => {
                    if let Some(adv) = self.pending.take() {
                        self.apply(ControlOp::FinishAdvance(adv));
                    } else {
                        self.apply(ControlOp::Tick);
                    }

                    if self.pending.is_some() {
                        timer.as_mut().reset(Instant::now() + GRACE_DELAY);
                    } else if self.ticking() {
                        timer.as_mut().reset(Instant::now() + TICK_PERIOD);
                    }
                }
            }
        }

        tracing::debug!("Timer scheduler stopped");
    }

    /// Tick loop eligibility: frozen suppresses running
    fn ticking(&self) -> bool {
        self.state.running && !self.state.frozen
    }

    fn handle_command(&mut self, cmd: TimerCommand) {
        tracing::debug!(?cmd, "Timer command");

        match cmd {
            TimerCommand::Start => self.apply(ControlOp::Start),
            TimerCommand::Pause => self.apply(ControlOp::Pause),
            TimerCommand::Freeze(force) => self.apply(ControlOp::Freeze(force)),
            TimerCommand::Stop => self.apply(ControlOp::Stop),
            TimerCommand::Reset => self.apply(ControlOp::Reset),
            TimerCommand::Previous => self.apply(ControlOp::Previous),
            TimerCommand::Next => self.apply(ControlOp::Next),
            TimerCommand::SelectPhase(index) => self.apply(ControlOp::SelectPhase(index)),
            TimerCommand::ToggleAnonymise(force) => {
                self.apply(ControlOp::ToggleAnonymise(force));
            }
            TimerCommand::SetPhases(phases) => self.engine.set_phases(phases),
            TimerCommand::Replace(state) => {
                // Owner override: anything scheduled against the old state
                // is stale
                self.pending = None;
                self.state = state;
                let _ = self.state_tx.send(state);
            }
            TimerCommand::Shutdown => {}
        }
    }

    fn apply(&mut self, op: ControlOp) {
        let reaction = self.engine.apply(&self.state, op);

        if let Some(next) = reaction.proposed {
            self.state = next;
            let _ = self.state_tx.send(next);
        }

        for signal in reaction.signals {
            if matches!(signal, TimerSignal::Completed) {
                tracing::info!("Timer sequence completed");
            }
            // Send fails only when nobody is subscribed
            let _ = self.signal_tx.send(signal);
        }

        if reaction.pending.is_some() {
            self.pending = reaction.pending;
        } else if !self.ticking() {
            // Stop, reset, pause, and freeze all invalidate a queued advance
            self.pending = None;
        }
    }
}
