use std::future::Future;
use std::time::Duration;

use tokio::task::JoinHandle;
use tokio::time::{Instant, MissedTickBehavior};

/// Repeating tick task bound to one player generation.
///
/// The task calls `on_tick(generation, elapsed)` every `period` until the
/// callback returns `false` or the timer is aborted. Dropping the timer aborts
/// the task, so replacing the stored timer cancels the old one.
#[derive(Debug)]
pub struct ProgressTimer {
    generation: u64,
    task_handle: JoinHandle<()>,
}

impl ProgressTimer {
    pub fn spawn<F, Fut>(generation: u64, period: Duration, mut on_tick: F) -> Self
    where
        F: FnMut(u64, Duration) -> Fut + Send + 'static,
        Fut: Future<Output = bool> + Send + 'static,
    {
        let task_handle = tokio::spawn(async move {
            let mut interval = tokio::time::interval(period);
            interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
            // first tick completes immediately
            interval.tick().await;
            let mut last = Instant::now();
            loop {
                interval.tick().await;
                let now = Instant::now();
                let elapsed = now - last;
                last = now;
                if !on_tick(generation, elapsed).await {
                    tracing::trace!(generation, "Progress timer stopped");
                    break;
                }
            }
        });
        Self {
            generation,
            task_handle,
        }
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn is_finished(&self) -> bool {
        self.task_handle.is_finished()
    }
}

impl Drop for ProgressTimer {
    fn drop(&mut self) {
        self.task_handle.abort();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::sync::atomic::{AtomicU32, Ordering};

    #[tokio::test(start_paused = true)]
    async fn ticks_until_callback_stops() {
        let ticks = Arc::new(AtomicU32::new(0));
        let counter = ticks.clone();
        let timer = ProgressTimer::spawn(7, Duration::from_millis(10), move |generation, elapsed| {
            let counter = counter.clone();
            async move {
                assert_eq!(generation, 7);
                assert_eq!(elapsed, Duration::from_millis(10));
                counter.fetch_add(1, Ordering::SeqCst) + 1 < 3
            }
        });
        tokio::time::sleep(Duration::from_millis(100)).await;
        assert_eq!(ticks.load(Ordering::SeqCst), 3);
        assert!(timer.is_finished());
    }

    #[tokio::test(start_paused = true)]
    async fn dropping_cancels_ticks() {
        let ticks = Arc::new(AtomicU32::new(0));
        let counter = ticks.clone();
        let timer = ProgressTimer::spawn(1, Duration::from_millis(10), move |_, _| {
            let counter = counter.clone();
            async move {
                counter.fetch_add(1, Ordering::SeqCst);
                true
            }
        });
        tokio::time::sleep(Duration::from_millis(25)).await;
        drop(timer);
        let seen = ticks.load(Ordering::SeqCst);
        tokio::time::sleep(Duration::from_millis(100)).await;
        assert_eq!(ticks.load(Ordering::SeqCst), seen);
    }
}
