// src/timer.rs
//! One-shot scheduling collaborator: fire a callback once, no earlier than
//! the given delay. Production uses the tokio timer wheel; tests drive a
//! manual queue so deferred work is deterministic.

use std::sync::Mutex;
use std::time::Duration;

pub type Callback = Box<dyn FnOnce() + Send>;

pub trait Timer: Send + Sync {
    fn after(&self, delay: Duration, callback: Callback);
}

/// Spawns the callback onto the running tokio runtime.
#[derive(Debug, Default)]
pub struct TokioTimer;

impl Timer for TokioTimer {
    fn after(&self, delay: Duration, callback: Callback) {
        tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            callback();
        });
    }
}

/// Collects callbacks instead of scheduling them; `fire_all` runs whatever is
/// queued. Lets tests step "0.5s later" without a runtime.
#[derive(Default)]
pub struct ManualTimer {
    queue: Mutex<Vec<(Duration, Callback)>>,
}

impl ManualTimer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn pending(&self) -> usize {
        self.queue.lock().expect("timer mutex poisoned").len()
    }

    /// Delays of everything currently queued, in submission order.
    pub fn delays(&self) -> Vec<Duration> {
        self.queue
            .lock()
            .expect("timer mutex poisoned")
            .iter()
            .map(|(d, _)| *d)
            .collect()
    }

    pub fn fire_all(&self) {
        let drained: Vec<(Duration, Callback)> = {
            let mut q = self.queue.lock().expect("timer mutex poisoned");
            q.drain(..).collect()
        };
        for (_, cb) in drained {
            cb();
        }
    }
}

impl Timer for ManualTimer {
    fn after(&self, delay: Duration, callback: Callback) {
        self.queue
            .lock()
            .expect("timer mutex poisoned")
            .push((delay, callback));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicU32, Ordering};
    use std::sync::Arc;

    #[test]
    fn manual_timer_fires_once_in_order() {
        let timer = ManualTimer::new();
        let hits = Arc::new(AtomicU32::new(0));

        for _ in 0..3 {
            let hits = hits.clone();
            timer.after(
                Duration::from_millis(500),
                Box::new(move || {
                    hits.fetch_add(1, Ordering::SeqCst);
                }),
            );
        }
        assert_eq!(timer.pending(), 3);

        timer.fire_all();
        assert_eq!(hits.load(Ordering::SeqCst), 3);
        assert_eq!(timer.pending(), 0);

        // Nothing left to fire.
        timer.fire_all();
        assert_eq!(hits.load(Ordering::SeqCst), 3);
    }
}
