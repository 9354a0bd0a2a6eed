use std::time::Duration;
use tokio::time::{self, Instant, Interval, MissedTickBehavior};

pub const ONE_SECOND: Duration = Duration::from_secs(1);

/// A cancellable repeating schedule owned by a quiz session or streak round.
///
/// The underlying interval is created lazily on the first [`Ticker::tick`] and
/// dropped by [`Ticker::cancel`]. Once cancelled nothing is left scheduled; the
/// next `tick` re-arms from scratch, so the first tick after re-arming always
/// lands a full period later.
#[derive(Debug)]
pub struct Ticker {
    period: Duration,
    interval: Option<Interval>,
}

impl Default for Ticker {
    fn default() -> Self {
        Self::new(ONE_SECOND)
    }
}

impl Ticker {
    pub fn new(period: Duration) -> Self {
        Self {
            period,
            interval: None,
        }
    }

    pub fn is_armed(&self) -> bool {
        self.interval.is_some()
    }

    pub fn cancel(&mut self) {
        if self.interval.take().is_some() {
            tracing::trace!("ticker cancelled");
        }
    }

    pub async fn tick(&mut self) {
        let period = self.period;
        let interval = self.interval.get_or_insert_with(|| {
            let mut interval = time::interval_at(Instant::now() + period, period);
            interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
            interval
        });
        interval.tick().await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test(start_paused = true)]
    async fn first_tick_waits_a_full_period() {
        let mut ticker = Ticker::default();
        let start = Instant::now();
        ticker.tick().await;
        assert_eq!(start.elapsed(), ONE_SECOND);
        assert!(ticker.is_armed());
    }

    #[tokio::test(start_paused = true)]
    async fn cancel_disarms_and_rearm_restarts_period() {
        let mut ticker = Ticker::new(Duration::from_millis(500));
        ticker.tick().await;
        ticker.cancel();
        assert!(!ticker.is_armed());

        time::advance(Duration::from_millis(300)).await;
        let start = Instant::now();
        ticker.tick().await;
        assert_eq!(start.elapsed(), Duration::from_millis(500));
    }
}
