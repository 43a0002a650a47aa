//! The repeating ticker that drives both the clock and the countdown.
//!
//! A ticker is a tokio task running an `interval_at` loop that awaits a
//! callback on every period. The first call happens one full period after
//! scheduling. The task is owned by a [`TickerHandle`]: cancelling or dropping
//! the handle aborts it, so a ticker can never outlive its owner.

use std::future::Future;
use std::ops::ControlFlow;
use std::time::Duration;
use tokio::task::JoinHandle;
use tokio::time::{interval_at, Instant, MissedTickBehavior};

/// Owns a running ticker task.
#[derive(Debug)]
pub struct TickerHandle {
    task: Option<JoinHandle<()>>,
}

impl TickerHandle {
    /// Spawns a ticker on the current tokio runtime.
    ///
    /// The loop ends when the callback returns `ControlFlow::Break`, or when
    /// the handle is cancelled.
    pub fn spawn<F, Fut>(period: Duration, mut callback: F) -> Self
    where
        F: FnMut() -> Fut + Send + 'static,
        Fut: Future<Output = ControlFlow<()>> + Send + 'static,
    {
        let start = Instant::now() + period;
        let mut ticker = interval_at(start, period);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

        let task = tokio::spawn(async move {
            loop {
                ticker.tick().await;
                if callback().await.is_break() {
                    break;
                }
            }
        });
        Self { task: Some(task) }
    }

    /// Stops the ticker. Safe to call any number of times.
    ///
    /// Returns `true` if this call stopped it.
    pub fn cancel(&mut self) -> bool {
        match self.task.take() {
            Some(task) => {
                task.abort();
                true
            }
            None => false,
        }
    }

    /// Gives up ownership without aborting, for a ticker that is ending itself.
    pub fn release(mut self) {
        self.task.take();
    }

    /// True while the task has neither been cancelled nor run to completion.
    pub fn is_active(&self) -> bool {
        self.task.as_ref().is_some_and(|task| !task.is_finished())
    }
}

impl Drop for TickerHandle {
    fn drop(&mut self) {
        self.cancel();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    fn counting(period: Duration, counter: Arc<AtomicUsize>, limit: usize) -> TickerHandle {
        TickerHandle::spawn(period, move || {
            let counter = counter.clone();
            async move {
                let count = counter.fetch_add(1, Ordering::SeqCst) + 1;
                if count >= limit {
                    ControlFlow::Break(())
                } else {
                    ControlFlow::Continue(())
                }
            }
        })
    }

    #[tokio::test(start_paused = true)]
    async fn fires_once_per_period_after_the_first_period() {
        let counter = Arc::new(AtomicUsize::new(0));
        let _handle = counting(Duration::from_secs(1), counter.clone(), usize::MAX);

        tokio::time::sleep(Duration::from_millis(500)).await;
        assert_eq!(counter.load(Ordering::SeqCst), 0);

        tokio::time::sleep(Duration::from_millis(3000)).await;
        assert_eq!(counter.load(Ordering::SeqCst), 3);
    }

    #[tokio::test(start_paused = true)]
    async fn cancel_is_idempotent_and_stops_ticking() {
        let counter = Arc::new(AtomicUsize::new(0));
        let mut handle = counting(Duration::from_secs(1), counter.clone(), usize::MAX);

        tokio::time::sleep(Duration::from_millis(2500)).await;
        assert!(handle.cancel());
        assert!(!handle.cancel());
        assert!(!handle.is_active());

        tokio::time::sleep(Duration::from_secs(5)).await;
        assert_eq!(counter.load(Ordering::SeqCst), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn dropping_the_handle_cancels_the_task() {
        let counter = Arc::new(AtomicUsize::new(0));
        let handle = counting(Duration::from_secs(1), counter.clone(), usize::MAX);
        tokio::time::sleep(Duration::from_millis(1500)).await;
        drop(handle);

        tokio::time::sleep(Duration::from_secs(5)).await;
        assert_eq!(counter.load(Ordering::SeqCst), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn break_ends_the_loop() {
        let counter = Arc::new(AtomicUsize::new(0));
        let handle = counting(Duration::from_secs(1), counter.clone(), 2);

        tokio::time::sleep(Duration::from_secs(10)).await;
        assert_eq!(counter.load(Ordering::SeqCst), 2);
        assert!(!handle.is_active());
    }
}
