use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use indicatif::ProgressBar;
use tokio::task::JoinHandle;

pub const DEFAULT_STATUS_INTERVAL: Duration = Duration::from_millis(500);

const MAX_DOTS: usize = 3;

// shared "still acquiring" flag, cloned into whoever needs to observe it
#[derive(Clone, Debug, Default)]
pub struct LoadingState {
    acquiring: Arc<AtomicBool>,
}

impl LoadingState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_acquiring(&self) -> bool {
        self.acquiring.load(Ordering::SeqCst)
    }

    /// Marks acquisition as started. The flag is cleared when the returned
    /// guard is dropped, including on early return.
    pub fn begin(&self) -> LoadingGuard {
        self.acquiring.store(true, Ordering::SeqCst);
        LoadingGuard {
            acquiring: self.acquiring.clone(),
        }
    }
}

#[derive(Debug)]
pub struct LoadingGuard {
    acquiring: Arc<AtomicBool>,
}

impl Drop for LoadingGuard {
    fn drop(&mut self) {
        self.acquiring.store(false, Ordering::SeqCst);
    }
}

pub fn status_frame(base: &str, tick: usize) -> String {
    format!("{}{}", base, ".".repeat(tick % (MAX_DOTS + 1)))
}

/// Animated status text on a progress bar.
///
/// The ticker task lives exactly as long as this value: `stop` or drop aborts
/// it, so it never writes to a bar that has been torn down.
#[derive(Debug)]
pub struct LoadingIndicator {
    handle: Option<JoinHandle<()>>,
    pb: ProgressBar,
}

impl LoadingIndicator {
    pub fn start(pb: ProgressBar, base: impl Into<String>, interval: Duration) -> Self {
        let base = base.into();
        let ticker_pb = pb.clone();
        let handle = tokio::spawn(async move {
            let mut ticker = tokio::time::interval(interval);
            let mut tick = 0usize;
            loop {
                ticker.tick().await;
                ticker_pb.set_message(status_frame(&base, tick));
                tick = tick.wrapping_add(1);
            }
        });
        Self {
            handle: Some(handle),
            pb,
        }
    }

    pub fn is_running(&self) -> bool {
        self.handle.as_ref().is_some_and(|h| !h.is_finished())
    }

    pub fn stop(mut self) {
        self.cancel();
        self.pb.set_message("");
    }

    fn cancel(&mut self) {
        if let Some(handle) = self.handle.take() {
            handle.abort();
        }
    }
}

impl Drop for LoadingIndicator {
    fn drop(&mut self) {
        self.cancel();
    }
}
