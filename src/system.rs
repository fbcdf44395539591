// File: ./src/system.rs
//! Background timing for the views: the refresh that moves "today" at local
//! midnight (re-armed after the host wakes from sleep) and the interval
//! ticker driving the now-line in the day and week views.
use chrono::{DateTime, Local};
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio::time::Duration;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SystemEvent {
    /// The local date changed; views showing "today" need a redraw.
    MidnightRefresh,
    /// Reposition the time indicator.
    TimeIndicatorTick,
}

/// Signals the host feeds into the refresh actor.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SystemSignal {
    /// The machine resumed from sleep/hibernation.
    Wake,
    Shutdown,
}

/// Delay applied after a wake signal before refreshing, so the environment
/// has settled by the time views redraw.
pub const WAKE_SETTLE: Duration = Duration::from_secs(10);

/// Time remaining until the next local midnight. Never zero, so a timer
/// armed exactly at midnight still moves forward.
pub fn duration_until_next_midnight(now: DateTime<Local>) -> Duration {
    let tomorrow = now.date_naive() + chrono::Days::new(1);
    let midnight = tomorrow.and_hms_opt(0, 0, 0).unwrap();
    (midnight - now.naive_local())
        .to_std()
        .unwrap_or(Duration::from_secs(1))
}

/// Spawns the midnight refresh actor. Returns the sender for wake/shutdown
/// signals; the actor stops when the signal channel closes or the event
/// receiver goes away.
pub fn spawn_refresh_actor(events: mpsc::Sender<SystemEvent>) -> mpsc::Sender<SystemSignal> {
    spawn_refresh_actor_with_settle(events, WAKE_SETTLE)
}

/// Same as [`spawn_refresh_actor`] with an explicit wake settle delay.
pub fn spawn_refresh_actor_with_settle(
    events: mpsc::Sender<SystemEvent>,
    settle: Duration,
) -> mpsc::Sender<SystemSignal> {
    let (tx, mut rx) = mpsc::channel(10);

    tokio::spawn(async move {
        loop {
            let wait = duration_until_next_midnight(Local::now());
            tokio::select! {
                _ = tokio::time::sleep(wait) => {
                    if events.send(SystemEvent::MidnightRefresh).await.is_err() {
                        break;
                    }
                }
                signal = rx.recv() => match signal {
                    Some(SystemSignal::Wake) => {
                        tokio::time::sleep(settle).await;
                        if events.send(SystemEvent::MidnightRefresh).await.is_err() {
                            break;
                        }
                    }
                    Some(SystemSignal::Shutdown) | None => break,
                },
            }
        }
    });

    tx
}

/// Interval ticker for the now-line in day and week views. Start replaces
/// any running ticker; cancel is idempotent.
#[derive(Debug, Default)]
pub struct TimeIndicator {
    handle: Option<JoinHandle<()>>,
}

impl TimeIndicator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn start(&mut self, interval_secs: u32, events: mpsc::Sender<SystemEvent>) {
        self.cancel();
        let interval = Duration::from_secs(interval_secs.max(1) as u64);
        self.handle = Some(tokio::spawn(async move {
            let mut ticker = tokio::time::interval(interval);
            // The first tick of a tokio interval fires immediately.
            ticker.tick().await;
            loop {
                ticker.tick().await;
                if events.send(SystemEvent::TimeIndicatorTick).await.is_err() {
                    break;
                }
            }
        }));
    }

    pub fn cancel(&mut self) {
        if let Some(handle) = self.handle.take() {
            handle.abort();
        }
    }

    pub fn is_running(&self) -> bool {
        self.handle.is_some()
    }
}

impl Drop for TimeIndicator {
    fn drop(&mut self) {
        self.cancel();
    }
}
