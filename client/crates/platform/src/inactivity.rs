//! Inactivity Monitoring
//!
//! Tracks time since the last member input and raises a timeout signal once
//! the idle threshold elapses. The signal fires exactly once per idle
//! period and rearms on the next input. Route and auth state are not
//! consulted here; interpreting the signal is the subscriber's job.

use std::time::Duration;

use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio::time::{Instant, sleep_until};

/// Default idle threshold (5 minutes)
pub const DEFAULT_IDLE_THRESHOLD: Duration = Duration::from_secs(5 * 60);

/// Kind of input that counts as activity
///
/// All kinds reset the timer identically; the kind is only logged.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputKind {
    Pointer,
    Key,
    Touch,
    Scroll,
}

/// Raised when the idle threshold elapses without input
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IdleTimeout {
    /// Time between the last input and the signal
    pub idle_for: Duration,
}

// ============================================================================
// IdleTimer - clock-driven core
// ============================================================================

#[derive(Debug, Clone)]
pub struct IdleTimer {
    threshold: Duration,
    last_input: Instant,
    fired: bool,
}

impl IdleTimer {
    pub fn new(threshold: Duration, now: Instant) -> Self {
        Self {
            threshold,
            last_input: now,
            fired: false,
        }
    }

    pub fn threshold(&self) -> Duration {
        self.threshold
    }

    /// Reset the idle period and rearm
    pub fn record_input(&mut self, kind: InputKind, at: Instant) {
        tracing::trace!(?kind, "Input activity");
        self.last_input = at;
        self.fired = false;
    }

    /// When the next timeout is due, `None` once fired until the next input
    pub fn deadline(&self) -> Option<Instant> {
        (!self.fired).then(|| self.last_input + self.threshold)
    }

    /// Fire if the deadline has passed and this idle period has not fired yet
    pub fn poll(&mut self, now: Instant) -> Option<IdleTimeout> {
        let deadline = self.deadline()?;
        if now < deadline {
            return None;
        }
        self.fired = true;
        Some(IdleTimeout {
            idle_for: now.saturating_duration_since(self.last_input),
        })
    }
}

// ============================================================================
// InactivityMonitor - tokio task around IdleTimer
// ============================================================================

/// Cheap, cloneable handle for reporting input
#[derive(Debug, Clone)]
pub struct ActivityHandle {
    tx: mpsc::UnboundedSender<InputKind>,
}

impl ActivityHandle {
    /// Report an input event; a stopped monitor silently ignores it
    pub fn record(&self, kind: InputKind) {
        let _ = self.tx.send(kind);
    }
}

/// Background inactivity monitor
///
/// The task is aborted when the monitor is dropped.
#[derive(Debug)]
pub struct InactivityMonitor {
    activity: ActivityHandle,
    timeouts: mpsc::Receiver<IdleTimeout>,
    task: JoinHandle<()>,
}

impl InactivityMonitor {
    /// Start monitoring; the idle period begins now
    pub fn spawn(threshold: Duration) -> Self {
        let (input_tx, input_rx) = mpsc::unbounded_channel();
        let (timeout_tx, timeout_rx) = mpsc::channel(4);

        let timer = IdleTimer::new(threshold, Instant::now());
        let task = tokio::spawn(run(timer, input_rx, timeout_tx));

        tracing::debug!(threshold_secs = threshold.as_secs(), "Inactivity monitor started");

        Self {
            activity: ActivityHandle { tx: input_tx },
            timeouts: timeout_rx,
            task,
        }
    }

    pub fn handle(&self) -> ActivityHandle {
        self.activity.clone()
    }

    pub fn record(&self, kind: InputKind) {
        self.activity.record(kind);
    }

    /// Wait for the next timeout signal (cancel-safe)
    pub async fn next_timeout(&mut self) -> Option<IdleTimeout> {
        self.timeouts.recv().await
    }
}

impl Drop for InactivityMonitor {
    fn drop(&mut self) {
        self.task.abort();
    }
}

async fn run(
    mut timer: IdleTimer,
    mut inputs: mpsc::UnboundedReceiver<InputKind>,
    timeouts: mpsc::Sender<IdleTimeout>,
) {
    loop {
        let deadline = timer.deadline();
        tokio::select! {
            input = inputs.recv() => match input {
                Some(kind) => timer.record_input(kind, Instant::now()),
                None => break,
            },
            _ = sleep_until_deadline(deadline) => {
                if let Some(timeout) = timer.poll(Instant::now()) {
                    tracing::info!(
                        idle_secs = timeout.idle_for.as_secs(),
                        "Inactivity threshold reached"
                    );
                    if timeouts.send(timeout).await.is_err() {
                        break;
                    }
                }
            }
        }
    }
    tracing::debug!("Inactivity monitor stopped");
}

async fn sleep_until_deadline(deadline: Option<Instant>) {
    match deadline {
        Some(at) => sleep_until(at).await,
        None => std::future::pending().await,
    }
}
