//! Tokio tick source

use std::future::Future;
use std::time::Duration;

use flowbatch_core::samplers::IntervalSampler;
use flowbatch_core::time::Ticker;
use tokio::time::{interval_at, Instant, Interval, MissedTickBehavior};

/// Tokio-backed tick source for interval sampling.
pub struct TokioTicker {
    interval: Interval,
}

impl TokioTicker {
    /// Creates a ticker firing every `period`.
    ///
    /// The first tick fires one full `period` after creation, and missed
    /// ticks are delayed rather than bursted, so a slow consumer never sees
    /// a backlog of empty flushes.
    pub fn new(period: Duration) -> Self {
        let mut interval = interval_at(Instant::now() + period, period);
        interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
        Self { interval }
    }
}

impl Ticker for TokioTicker {
    fn next_tick(&mut self) -> impl Future<Output = ()> + Send {
        let interval = &mut self.interval;
        async move {
            interval.tick().await;
        }
    }
}

/// Builds an interval-based sampler flushing every `period` on the Tokio
/// clock.
pub fn interval_sampler(period: Duration) -> IntervalSampler<TokioTicker> {
    IntervalSampler::new(TokioTicker::new(period))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test(start_paused = true)]
    async fn first_tick_waits_a_full_period() {
        let mut ticker = TokioTicker::new(Duration::from_millis(100));
        let before = Instant::now();
        ticker.next_tick().await;
        assert!(before.elapsed() >= Duration::from_millis(100));
    }

    #[tokio::test(start_paused = true)]
    async fn ticks_keep_firing() {
        let mut ticker = TokioTicker::new(Duration::from_millis(50));
        let before = Instant::now();
        for _ in 0..3 {
            ticker.next_tick().await;
        }
        assert!(before.elapsed() >= Duration::from_millis(150));
    }
}
