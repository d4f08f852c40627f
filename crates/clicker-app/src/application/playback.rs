//! PlaybackScheduler: replays the enabled clicks on a timer.
//!
//! A run is a Tokio task that walks a fresh snapshot of the enabled clicks on
//! every pass, injecting one synthetic click per entry and waiting the
//! configured delay in between.  The task is controlled through a
//! `tokio::sync::watch` channel carrying the desired [`RunControl`]; every
//! wait `select!`s on that channel so pause and stop take effect immediately.
//!
//! # Lock order
//!
//! `active` run slot → playback state → click store.  No lock is held across
//! an injector call or an await point.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;

use clicker_core::{DelayPolicy, Humanizer, PlaybackState, PolicyError, RepeatPolicy, Settings};
use parking_lot::Mutex;
use thiserror::Error;
use tokio::runtime::Handle;
use tokio::sync::watch;
use tokio::time::Instant;
use tracing::{debug, info};

use crate::application::{SharedState, SharedStore};
use crate::infrastructure::synthetic_input::SyntheticInput;

/// Error type for the playback use case.
#[derive(Debug, Error)]
pub enum PlaybackError {
    #[error("there are no enabled clicks to play")]
    EmptyClickList,
    #[error("cannot start playback while recording")]
    PlaybackWhileRecording,
    #[error("playback is already running")]
    AlreadyPlaying,
    #[error("invalid playback settings: {0}")]
    InvalidSettings(#[from] PolicyError),
}

/// Desired state of a running playback task.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum RunControl {
    Run,
    Pause,
    Stop,
}

/// Outcome of a wait inside the run loop.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Flow {
    Continue,
    Stop,
}

struct ActiveRun {
    id: u64,
    control: watch::Sender<RunControl>,
}

/// Everything a run task needs, cloned out of the scheduler at start.
struct RunContext {
    id: u64,
    injector: Arc<dyn SyntheticInput>,
    store: SharedStore,
    state: SharedState,
    active: Arc<Mutex<Option<ActiveRun>>>,
}

/// Starts, pauses, resumes and stops playback runs.
pub struct PlaybackScheduler {
    runtime: Handle,
    injector: Arc<dyn SyntheticInput>,
    store: SharedStore,
    state: SharedState,
    active: Arc<Mutex<Option<ActiveRun>>>,
    next_run_id: AtomicU64,
}

impl PlaybackScheduler {
    /// Creates a scheduler that spawns its run tasks on `runtime`.
    ///
    /// Taking a [`Handle`] rather than calling `tokio::spawn` lets hook
    /// threads, which are not runtime threads, start playback.
    pub fn new(
        runtime: Handle,
        injector: Arc<dyn SyntheticInput>,
        store: SharedStore,
        state: SharedState,
    ) -> Self {
        Self {
            runtime,
            injector,
            store,
            state,
            active: Arc::new(Mutex::new(None)),
            next_run_id: AtomicU64::new(1),
        }
    }

    /// Starts a run.
    ///
    /// # Errors
    ///
    /// - [`PlaybackError::PlaybackWhileRecording`] while recording.
    /// - [`PlaybackError::AlreadyPlaying`] while a run is playing or paused.
    /// - [`PlaybackError::EmptyClickList`] when no click is enabled.
    pub fn start(&self, repeat: RepeatPolicy, delay: DelayPolicy) -> Result<(), PlaybackError> {
        let mut active = self.active.lock();
        let mut state = self.state.lock();

        match *state {
            PlaybackState::Recording => return Err(PlaybackError::PlaybackWhileRecording),
            PlaybackState::Playing | PlaybackState::Paused => {
                return Err(PlaybackError::AlreadyPlaying)
            }
            PlaybackState::Idle => {}
        }
        let enabled = self.store.read().count_enabled();
        if enabled == 0 {
            return Err(PlaybackError::EmptyClickList);
        }

        let id = self.next_run_id.fetch_add(1, Ordering::SeqCst);
        let (control, control_rx) = watch::channel(RunControl::Run);
        let ctx = RunContext {
            id,
            injector: Arc::clone(&self.injector),
            store: Arc::clone(&self.store),
            state: Arc::clone(&self.state),
            active: Arc::clone(&self.active),
        };
        self.runtime
            .spawn(run_playback(ctx, control_rx, repeat, delay));

        *active = Some(ActiveRun { id, control });
        *state = PlaybackState::Playing;
        info!(run = id, enabled, ?repeat, delay_ms = delay.base_delay_ms, "playback started");
        Ok(())
    }

    /// Starts a run from persisted settings.
    ///
    /// # Errors
    ///
    /// [`PlaybackError::InvalidSettings`] for an invalid repeat count, plus
    /// everything [`start`](Self::start) returns.
    pub fn start_with(&self, settings: &Settings) -> Result<(), PlaybackError> {
        self.start(settings.repeat_policy()?, settings.delay_policy())
    }

    /// Pauses a playing run.  No-op in any other state.
    pub fn pause(&self) {
        let active = self.active.lock();
        let mut state = self.state.lock();
        if let (PlaybackState::Playing, Some(run)) = (*state, active.as_ref()) {
            run.control.send_replace(RunControl::Pause);
            *state = PlaybackState::Paused;
            info!(run = run.id, "playback paused");
        }
    }

    /// Resumes a paused run.  No-op in any other state.
    pub fn resume(&self) {
        let active = self.active.lock();
        let mut state = self.state.lock();
        if let (PlaybackState::Paused, Some(run)) = (*state, active.as_ref()) {
            run.control.send_replace(RunControl::Run);
            *state = PlaybackState::Playing;
            info!(run = run.id, "playback resumed");
        }
    }

    /// Ends the current run and returns to `Idle` immediately.
    ///
    /// No-op when idle or recording.
    pub fn stop(&self) {
        let mut active = self.active.lock();
        let mut state = self.state.lock();
        if let Some(run) = active.take() {
            run.control.send_replace(RunControl::Stop);
            info!(run = run.id, "playback stopped");
        }
        if state.is_playback_active() {
            *state = PlaybackState::Idle;
        }
    }

    /// Play/pause toggle used by the hotkey and the command surface.
    ///
    /// `Idle` starts a run from `settings`, `Playing` pauses and `Paused`
    /// resumes.  Returns the state after the toggle.
    ///
    /// # Errors
    ///
    /// Whatever [`start_with`](Self::start_with) returns when starting.
    pub fn toggle(&self, settings: &Settings) -> Result<PlaybackState, PlaybackError> {
        let current = *self.state.lock();
        match current {
            PlaybackState::Idle => self.start_with(settings)?,
            PlaybackState::Playing => self.pause(),
            PlaybackState::Paused => self.resume(),
            PlaybackState::Recording => return Err(PlaybackError::PlaybackWhileRecording),
        }
        Ok(*self.state.lock())
    }

    pub fn state(&self) -> PlaybackState {
        *self.state.lock()
    }
}

impl Drop for PlaybackScheduler {
    fn drop(&mut self) {
        if let Some(run) = self.active.lock().take() {
            run.control.send_replace(RunControl::Stop);
        }
    }
}

// ── Run task ──────────────────────────────────────────────────────────────────

async fn run_playback(
    ctx: RunContext,
    mut control: watch::Receiver<RunControl>,
    repeat: RepeatPolicy,
    delay: DelayPolicy,
) {
    let mut humanizer = Humanizer::from_entropy();
    let mut remaining = repeat.passes();
    let mut pass_number = 0u64;

    'passes: loop {
        // Re-sample every pass so enable/disable edits apply from the next pass.
        let pass = ctx.store.read().enabled_clicks();
        if pass.is_empty() {
            info!(run = ctx.id, "no enabled clicks left; ending playback");
            break;
        }
        pass_number += 1;
        let final_pass = remaining == Some(1);
        debug!(run = ctx.id, pass = pass_number, clicks = pass.len(), "pass started");

        for (index, click) in pass.iter().enumerate() {
            if wait_while_paused(&mut control).await == Flow::Stop {
                break 'passes;
            }

            let (x, y) = humanizer.target(&delay, click.x, click.y);
            ctx.injector.click(x, y);
            debug!(run = ctx.id, x, y, "click injected");

            if final_pass && index + 1 == pass.len() {
                break;
            }
            let wait = humanizer.delay(&delay);
            if sleep_interruptibly(&mut control, wait).await == Flow::Stop {
                break 'passes;
            }
        }

        if let Some(n) = remaining.as_mut() {
            *n -= 1;
            if *n == 0 {
                info!(run = ctx.id, passes = pass_number, "playback finished");
                break;
            }
        }
    }

    finish(&ctx);
}

/// Clears the run slot and returns to `Idle`, unless a newer run or a
/// `stop()` already replaced this one.
fn finish(ctx: &RunContext) {
    let mut active = ctx.active.lock();
    if active.as_ref().map(|run| run.id) != Some(ctx.id) {
        return;
    }
    *active = None;
    let mut state = ctx.state.lock();
    if state.is_playback_active() {
        *state = PlaybackState::Idle;
    }
}

/// Blocks while the run is paused.
async fn wait_while_paused(control: &mut watch::Receiver<RunControl>) -> Flow {
    loop {
        match *control.borrow_and_update() {
            RunControl::Run => return Flow::Continue,
            RunControl::Stop => return Flow::Stop,
            RunControl::Pause => {}
        }
        if control.changed().await.is_err() {
            return Flow::Stop;
        }
    }
}

/// Waits `duration` unless a pause or stop arrives first.
///
/// A pause abandons the rest of the delay; the caller then blocks in
/// [`wait_while_paused`] and fires the pending click on resume.
async fn sleep_interruptibly(
    control: &mut watch::Receiver<RunControl>,
    duration: Duration,
) -> Flow {
    let deadline = Instant::now() + duration;
    loop {
        tokio::select! {
            _ = tokio::time::sleep_until(deadline) => return Flow::Continue,
            changed = control.changed() => {
                if changed.is_err() {
                    return Flow::Stop;
                }
                match *control.borrow_and_update() {
                    RunControl::Run => {}
                    RunControl::Pause => return Flow::Continue,
                    RunControl::Stop => return Flow::Stop,
                }
            }
        }
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
