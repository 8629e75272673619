//! Drives a [`FocusCountdown`] from a tokio interval.
//!
//! One ticker per open timer view. The tick task lives exactly as long as the
//! ticker: dropping it (or calling [`CountdownTicker::cancel`]) aborts the
//! task, so a closed view cannot fire a completion afterwards.
//!
//! Seconds are counted from the moment the countdown enters Running, so
//! issue commands through the ticker rather than the locked countdown.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use tokio::sync::Notify;
use tokio::task::JoinHandle;
use tokio::time::{interval_at, Instant, MissedTickBehavior};

use super::countdown::FocusCountdown;
use crate::events::Event;

const TICK_PERIOD: Duration = Duration::from_secs(1);

pub struct CountdownTicker<F> {
    countdown: Arc<Mutex<FocusCountdown<F>>>,
    rephase: Arc<Notify>,
    task: JoinHandle<()>,
}

impl<F> CountdownTicker<F>
where
    F: FnMut(u32) + Send + 'static,
{
    /// Spawn the tick task on the current tokio runtime.
    ///
    /// `on_event` sees every event a tick produces (only completion, today)
    /// after the countdown lock is released.
    ///
    /// # Panics
    /// Panics if called outside a tokio runtime.
    pub fn spawn<E>(countdown: FocusCountdown<F>, mut on_event: E) -> Self
    where
        E: FnMut(Event) + Send + 'static,
    {
        let countdown = Arc::new(Mutex::new(countdown));
        let rephase = Arc::new(Notify::new());
        let shared = Arc::clone(&countdown);
        let signal = Arc::clone(&rephase);
        let task = tokio::spawn(async move {
            let mut ticks = interval_at(Instant::now() + TICK_PERIOD, TICK_PERIOD);
            ticks.set_missed_tick_behavior(MissedTickBehavior::Burst);
            loop {
                tokio::select! {
                    biased;
                    () = signal.notified() => ticks.reset(),
                    _ = ticks.tick() => {
                        let event = shared
                            .lock()
                            .unwrap_or_else(PoisonError::into_inner)
                            .tick();
                        if let Some(event) = event {
                            on_event(event);
                        }
                    }
                }
            }
        });
        Self {
            countdown,
            rephase,
            task,
        }
    }

    /// Lock the countdown to read its state.
    pub fn countdown(&self) -> MutexGuard<'_, FocusCountdown<F>> {
        self.countdown
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
    }

    /// Start or resume. The next tick lands one full second from now.
    pub fn start(&self) -> Option<Event> {
        let mut countdown = self.countdown();
        let event = countdown.start();
        if event.is_some() {
            self.rephase.notify_one();
        }
        event
    }

    pub fn pause(&self) -> Option<Event> {
        self.countdown().pause()
    }

    pub fn reset(&self) -> Option<Event> {
        self.countdown().reset()
    }

    pub fn stop(&self) -> Option<Event> {
        self.countdown().stop()
    }

    /// Stop ticking for good.
    pub fn cancel(self) {
        drop(self);
    }
}

impl<F> Drop for CountdownTicker<F> {
    fn drop(&mut self) {
        self.task.abort();
    }
}
