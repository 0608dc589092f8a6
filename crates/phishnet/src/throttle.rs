// SPDX-License-Identifier: GPL-3.0-or-later

use async_trait::async_trait;
use std::fmt::Debug;
use tokio::sync::{mpsc, Mutex};
use tokio::time::{sleep, Duration, Instant};
use tracing::trace;

/// Default spacing between Phish.Net API calls (120 requests per minute).
pub const DEFAULT_QUERY_RATE: Duration = Duration::from_millis(500);

/// Source of permits gating outbound API calls.
///
/// Each call to [`Throttle::acquire`] hands out exactly one permit. A client
/// owns a single throttle shared by all of its clones, so every concurrent
/// caller contends for the same permits.
#[async_trait]
pub trait Throttle: Debug + Send + Sync {
    /// Wait until the caller may issue its request.
    async fn acquire(&self);
}

/// Wall-clock throttle enforcing a minimum interval between permits.
///
/// The first permit is granted immediately. Later permits wait until
/// `min_interval` has elapsed since the previous grant. The lock is held
/// while waiting, so permits go out strictly one at a time.
#[derive(Debug)]
pub struct IntervalThrottle {
    min_interval: Duration,
    last_permit: Mutex<Option<Instant>>,
}

impl IntervalThrottle {
    /// Create a throttle with the given minimum interval between permits.
    pub fn new(min_interval: Duration) -> Self {
        Self {
            min_interval,
            last_permit: Mutex::new(None),
        }
    }

    /// Create a throttle from a requests-per-minute budget.
    pub fn per_minute(requests: u32) -> Self {
        Self::new(Duration::from_secs(60) / requests.max(1))
    }

    pub fn min_interval(&self) -> Duration {
        self.min_interval
    }
}

impl Default for IntervalThrottle {
    fn default() -> Self {
        Self::new(DEFAULT_QUERY_RATE)
    }
}

#[async_trait]
impl Throttle for IntervalThrottle {
    async fn acquire(&self) {
        let mut last = self.last_permit.lock().await;

        if let Some(last_instant) = *last {
            let elapsed = last_instant.elapsed();
            if elapsed < self.min_interval {
                let wait_time = self.min_interval - elapsed;
                trace!(target: "phishnet", "throttling: waiting {:?}", wait_time);
                sleep(wait_time).await;
            }
        }

        *last = Some(Instant::now());
    }
}

/// Throttle driven by an external tick source.
///
/// Every `()` received on the channel releases one waiting caller. Once all
/// senders are dropped no further permits are granted and `acquire` stays
/// pending.
#[derive(Debug)]
pub struct TickThrottle {
    ticks: Mutex<mpsc::Receiver<()>>,
}

impl TickThrottle {
    pub fn new(ticks: mpsc::Receiver<()>) -> Self {
        Self {
            ticks: Mutex::new(ticks),
        }
    }

    /// Create a throttle together with the sender that feeds it ticks.
    pub fn channel(buffer: usize) -> (mpsc::Sender<()>, Self) {
        let (tx, rx) = mpsc::channel(buffer.max(1));
        (tx, Self::new(rx))
    }
}

#[async_trait]
impl Throttle for TickThrottle {
    async fn acquire(&self) {
        let mut ticks = self.ticks.lock().await;
        if ticks.recv().await.is_some() {
            return;
        }
        drop(ticks);
        trace!(target: "phishnet", "tick source closed, no further permits");
        std::future::pending::<()>().await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    #[tokio::test(start_paused = true)]
    async fn test_first_permit_is_immediate() {
        let throttle = IntervalThrottle::new(Duration::from_millis(500));
        let start = Instant::now();

        throttle.acquire().await;

        assert_eq!(start.elapsed(), Duration::ZERO);
    }

    #[tokio::test(start_paused = true)]
    async fn test_second_permit_waits_full_interval() {
        let throttle = IntervalThrottle::new(Duration::from_millis(100));
        let start = Instant::now();

        throttle.acquire().await;
        throttle.acquire().await;

        let elapsed = start.elapsed();
        assert!(
            elapsed >= Duration::from_millis(100),
            "expected >= 100ms, got {:?}",
            elapsed
        );
        assert!(elapsed < Duration::from_millis(150));
    }

    #[tokio::test(start_paused = true)]
    async fn test_n_permits_take_n_minus_one_intervals() {
        let throttle = IntervalThrottle::new(Duration::from_millis(50));
        let start = Instant::now();

        for _ in 0..5 {
            throttle.acquire().await;
        }

        let elapsed = start.elapsed();
        assert!(
            elapsed >= Duration::from_millis(200),
            "expected >= 200ms, got {:?}",
            elapsed
        );
    }

    #[tokio::test(start_paused = true)]
    async fn test_concurrent_permits_are_spaced() {
        let throttle = Arc::new(IntervalThrottle::new(Duration::from_millis(500)));
        let mut handles = Vec::new();

        for _ in 0..8 {
            let throttle = throttle.clone();
            handles.push(tokio::spawn(async move {
                throttle.acquire().await;
                Instant::now()
            }));
        }

        let mut granted = Vec::new();
        for handle in handles {
            granted.push(handle.await.unwrap());
        }
        granted.sort();

        assert_eq!(granted.len(), 8);
        for pair in granted.windows(2) {
            assert!(
                pair[1] - pair[0] >= Duration::from_millis(500),
                "permits granted {:?} apart",
                pair[1] - pair[0]
            );
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_idle_time_counts_towards_interval() {
        let throttle = IntervalThrottle::new(Duration::from_millis(100));
        throttle.acquire().await;

        tokio::time::sleep(Duration::from_millis(250)).await;
        let before = Instant::now();
        throttle.acquire().await;

        assert_eq!(before.elapsed(), Duration::ZERO);
    }

    #[test]
    fn test_default_matches_120_per_minute() {
        assert_eq!(IntervalThrottle::default().min_interval(), DEFAULT_QUERY_RATE);
        assert_eq!(
            IntervalThrottle::per_minute(120).min_interval(),
            Duration::from_millis(500)
        );
    }

    #[tokio::test]
    async fn test_tick_throttle_releases_one_caller_per_tick() {
        let (tx, throttle) = TickThrottle::channel(4);
        let throttle = Arc::new(throttle);
        let released = Arc::new(AtomicUsize::new(0));

        let mut handles = Vec::new();
        for _ in 0..3 {
            let throttle = throttle.clone();
            let released = released.clone();
            handles.push(tokio::spawn(async move {
                throttle.acquire().await;
                released.fetch_add(1, Ordering::SeqCst);
            }));
        }

        tx.send(()).await.unwrap();
        tx.send(()).await.unwrap();
        tokio::time::sleep(Duration::from_millis(50)).await;
        assert_eq!(released.load(Ordering::SeqCst), 2);

        tx.send(()).await.unwrap();
        for handle in handles {
            handle.await.unwrap();
        }
        assert_eq!(released.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn test_tick_throttle_waits_after_source_closes() {
        let (tx, throttle) = TickThrottle::channel(1);
        drop(tx);

        let outcome =
            tokio::time::timeout(Duration::from_millis(50), throttle.acquire()).await;

        assert!(outcome.is_err(), "closed tick source must not grant permits");
    }
}
