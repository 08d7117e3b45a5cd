//! Count-up animations for the stats fields
//!
//! A [`CounterAnimation`] is a pure state machine advanced one tick at a
//! time; [`Animations`] runs a group of them on tokio tasks and cancels the
//! group together.

use crate::config::CounterSettings;
use crate::display::DisplayField;
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::task::JoinHandle;
use tokio::time::{Instant, MissedTickBehavior};
use tokio_util::sync::CancellationToken;
use tracing::{debug, error};

/// Result of advancing a counter by one tick
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tick {
    /// Value to display; the animation continues
    Running(u64),
    /// Final value to display; no further ticks are needed
    Finished(u64),
}

/// Count-up from zero to a fixed target
///
/// Each tick adds `target / steps` to an accumulator and displays its floor.
/// The animation ends as soon as the accumulator reaches the target or after
/// `steps` ticks, whichever comes first, and always ends on the exact target.
#[derive(Debug, Clone)]
pub struct CounterAnimation {
    current: f64,
    target: u64,
    increment: f64,
    ticks: u32,
    steps: u32,
    finished: bool,
}

impl CounterAnimation {
    #[must_use]
    pub fn new(target: u64, steps: u32) -> Self {
        let steps = steps.max(1);
        #[allow(clippy::cast_precision_loss)]
        let increment = target as f64 / f64::from(steps);

        Self {
            current: 0.0,
            target,
            increment,
            ticks: 0,
            steps,
            finished: target == 0,
        }
    }

    #[must_use]
    pub fn target(&self) -> u64 {
        self.target
    }

    #[must_use]
    pub fn is_finished(&self) -> bool {
        self.finished
    }

    /// Advance the animation by one tick.
    pub fn tick(&mut self) -> Tick {
        if self.finished {
            return Tick::Finished(self.target);
        }

        self.current += self.increment;
        self.ticks += 1;

        #[allow(clippy::cast_precision_loss)]
        let reached = self.current >= self.target as f64;
        if reached || self.ticks >= self.steps {
            self.finished = true;
            return Tick::Finished(self.target);
        }

        #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
        let shown = self.current.floor() as u64;
        Tick::Running(shown.min(self.target))
    }

    /// Run the animation on its own task, writing each tick into `field`.
    ///
    /// The first tick happens one `period` after the call. If `cancel` fires
    /// first, the task stops without writing to the field again.
    ///
    /// # Arguments
    ///
    /// * `field` - Display field that receives every shown value
    /// * `period` - Time between ticks, at least one millisecond
    /// * `cancel` - Token that stops the animation early
    pub fn spawn(
        mut self,
        field: Arc<dyn DisplayField>,
        period: Duration,
        cancel: CancellationToken,
    ) -> JoinHandle<()> {
        tokio::spawn(async move {
            if cancel.is_cancelled() {
                return;
            }

            if self.is_finished() {
                field.set_text(&self.target.to_string());
                return;
            }

            let period = period.max(Duration::from_millis(1));
            let mut interval = tokio::time::interval_at(Instant::now() + period, period);
            interval.set_missed_tick_behavior(MissedTickBehavior::Delay);

            loop {
                tokio::select! {
                    biased;
                    () = cancel.cancelled() => {
                        debug!("Counter animation towards {} cancelled", self.target);
                        return;
                    }
                    _ = interval.tick() => {}
                }

                match self.tick() {
                    Tick::Running(value) => field.set_text(&value.to_string()),
                    Tick::Finished(value) => {
                        field.set_text(&value.to_string());
                        break;
                    }
                }
            }
        })
    }
}

/// Set of running counter animations that can be torn down together
///
/// Each animation gets a child of the set's cancellation token, so tearing
/// the set down stops every pending animation while leaving them otherwise
/// independent of one another.
#[derive(Debug, Default)]
pub struct Animations {
    cancel: CancellationToken,
    handles: Mutex<Vec<JoinHandle<()>>>,
}

impl Animations {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Start a count-up animation of `field` towards `target`.
    ///
    /// Does nothing once the set has been torn down.
    pub fn start(&self, field: Arc<dyn DisplayField>, target: u64, settings: &CounterSettings) {
        if self.cancel.is_cancelled() {
            debug!("Ignoring counter start after teardown");
            return;
        }

        let handle = CounterAnimation::new(target, settings.steps).spawn(
            field,
            settings.tick_interval(),
            self.cancel.child_token(),
        );

        match self.handles.lock() {
            Ok(mut handles) => handles.push(handle),
            Err(e) => error!("Failed to acquire animation registry lock: {e}"),
        }
    }

    /// Number of animations still running.
    #[must_use]
    pub fn active(&self) -> usize {
        match self.handles.lock() {
            Ok(handles) => handles.iter().filter(|h| !h.is_finished()).count(),
            Err(e) => {
                error!("Failed to acquire animation registry lock: {e}");
                0
            }
        }
    }

    /// Wait for every animation started so far to finish or be cancelled.
    pub async fn settle(&self) {
        let pending: Vec<JoinHandle<()>> = match self.handles.lock() {
            Ok(mut handles) => handles.drain(..).collect(),
            Err(e) => {
                error!("Failed to acquire animation registry lock: {e}");
                return;
            }
        };

        for handle in pending {
            if let Err(e) = handle.await {
                error!("Counter animation task failed: {e}");
            }
        }
    }

    /// Cancel every pending animation.
    pub fn teardown(&self) {
        self.cancel.cancel();
    }

    #[must_use]
    pub fn is_torn_down(&self) -> bool {
        self.cancel.is_cancelled()
    }
}
