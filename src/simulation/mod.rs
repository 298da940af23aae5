//! The delivery simulation: random draws on a fixed cadence.
//!
//! There is no real delivery system. Each cycle draws fresh numbers from the
//! ranges below, publishes them to the instruments and logs one line, then
//! sleeps. The loop never exits on its own; the task is dropped at shutdown.

use crate::core::config::SimulationConfig;
use crate::core::error::{Error, Result};
use crate::metrics::SharedMetrics;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::Deserialize;
use std::fmt;
use std::ops::RangeInclusive;
use std::str::FromStr;
use tracing::info;

/// Pending-deliveries draw range in normal mode
pub const PENDING_NORMAL_RANGE: RangeInclusive<i64> = 10..=20;
/// Pending-deliveries draw range in high mode; keeps the warning alert firing
pub const PENDING_HIGH_RANGE: RangeInclusive<i64> = 50..=100;
/// On-the-way draw range, mode independent
pub const ON_THE_WAY_RANGE: RangeInclusive<i64> = 5..=20;
/// Delivered draw range, mode independent; feeds the total only
pub const DELIVERED_RANGE: RangeInclusive<i64> = 30..=70;
/// Per-cycle delivery-time observation range in seconds, mode independent
pub const DELIVERY_TIME_RANGE: RangeInclusive<f64> = 15.0..=45.0;

/// Selects the random range used for pending deliveries
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PendingMode {
    /// Baseline pending volume
    Normal,
    /// Elevated pending volume, used to demonstrate the alerting path
    High,
}

impl PendingMode {
    fn pending_range(self) -> RangeInclusive<i64> {
        match self {
            PendingMode::Normal => PENDING_NORMAL_RANGE,
            PendingMode::High => PENDING_HIGH_RANGE,
        }
    }
}

impl FromStr for PendingMode {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "normal" => Ok(PendingMode::Normal),
            "high" => Ok(PendingMode::High),
            other => Err(Error::config(format!(
                "Invalid pending mode {:?} (expected \"normal\" or \"high\")",
                other
            ))),
        }
    }
}

impl fmt::Display for PendingMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PendingMode::Normal => f.write_str("normal"),
            PendingMode::High => f.write_str("high"),
        }
    }
}

/// One generation cycle's draws
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DeliverySample {
    /// Deliveries waiting to go out
    pub pending: i64,
    /// Deliveries currently on the road
    pub on_the_way: i64,
    /// Deliveries completed; folded into `total`, never exported on its own
    pub delivered: i64,
    /// Sum of the three components from this same cycle
    pub total: i64,
    /// Delivery-time observation in seconds
    pub avg_time: f64,
}

impl DeliverySample {
    /// Draw a fresh cycle of values. Pure in-memory arithmetic, cannot fail.
    pub fn draw(mode: PendingMode, rng: &mut impl Rng) -> Self {
        let pending = rng.random_range(mode.pending_range());
        let on_the_way = rng.random_range(ON_THE_WAY_RANGE);
        let delivered = rng.random_range(DELIVERED_RANGE);
        let avg_time = rng.random_range(DELIVERY_TIME_RANGE);

        Self {
            pending,
            on_the_way,
            delivered,
            total: pending + on_the_way + delivered,
            avg_time,
        }
    }
}

/// Drives the unbounded generate-and-publish loop
pub struct Simulator {
    config: SimulationConfig,
    metrics: SharedMetrics,
    rng: StdRng,
}

impl Simulator {
    /// Create a simulator with an OS-seeded generator
    pub fn new(config: SimulationConfig, metrics: SharedMetrics) -> Self {
        Self {
            config,
            metrics,
            rng: StdRng::from_os_rng(),
        }
    }

    /// Run forever: draw, publish, log, sleep. Generation happens first so
    /// values are live as soon as the process is up; an overlong cycle simply
    /// delays the next one.
    pub async fn run(mut self) {
        info!(
            "Starting delivery simulation (mode={}, interval={:?})",
            self.config.pending_mode, self.config.interval
        );

        loop {
            self.cycle();
            tokio::time::sleep(self.config.interval).await;
        }
    }

    /// One generation cycle: draw, publish, log
    fn cycle(&mut self) {
        let sample = DeliverySample::draw(self.config.pending_mode, &mut self.rng);
        self.metrics.apply(&sample);

        info!(
            "Updated delivery metrics: total={}, pending={}, on_the_way={}, delivered={}, avg_time={:.2}s",
            sample.total, sample.pending, sample.on_the_way, sample.delivered, sample.avg_time
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::metrics::DeliveryMetrics;
    use proptest::prelude::*;
    use std::sync::Arc;
    use std::time::Duration;

    fn seeded_rng() -> StdRng {
        StdRng::seed_from_u64(0x5EED)
    }

    #[test]
    fn test_normal_mode_ranges() {
        let mut rng = seeded_rng();
        for _ in 0..1000 {
            let s = DeliverySample::draw(PendingMode::Normal, &mut rng);
            assert!(PENDING_NORMAL_RANGE.contains(&s.pending));
            assert!(ON_THE_WAY_RANGE.contains(&s.on_the_way));
            assert!(DELIVERED_RANGE.contains(&s.delivered));
            assert!(DELIVERY_TIME_RANGE.contains(&s.avg_time));
        }
    }

    #[test]
    fn test_high_mode_widens_pending_only() {
        let mut rng = seeded_rng();
        for _ in 0..1000 {
            let s = DeliverySample::draw(PendingMode::High, &mut rng);
            assert!(PENDING_HIGH_RANGE.contains(&s.pending));
            // Always above the warning alert threshold.
            assert!(s.pending > 10);
            assert!(ON_THE_WAY_RANGE.contains(&s.on_the_way));
            assert!(DELIVERED_RANGE.contains(&s.delivered));
            assert!(DELIVERY_TIME_RANGE.contains(&s.avg_time));
        }
    }

    #[test]
    fn test_mode_parsing_is_strict() {
        assert_eq!("normal".parse::<PendingMode>().unwrap(), PendingMode::Normal);
        assert_eq!("high".parse::<PendingMode>().unwrap(), PendingMode::High);
        assert!("turbo".parse::<PendingMode>().is_err());
        assert!("HIGH".parse::<PendingMode>().is_err());
        assert!("".parse::<PendingMode>().is_err());
    }

    #[test]
    fn test_mode_display_round_trips() {
        for mode in [PendingMode::Normal, PendingMode::High] {
            assert_eq!(mode.to_string().parse::<PendingMode>().unwrap(), mode);
        }
    }

    proptest! {
        #[test]
        fn total_is_the_sum_of_its_components(seed in any::<u64>(), high in any::<bool>()) {
            let mode = if high { PendingMode::High } else { PendingMode::Normal };
            let mut rng = StdRng::seed_from_u64(seed);
            let s = DeliverySample::draw(mode, &mut rng);
            prop_assert_eq!(s.total, s.pending + s.on_the_way + s.delivered);
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_cycle_cadence() {
        let metrics = Arc::new(DeliveryMetrics::new().unwrap());
        let config = SimulationConfig {
            pending_mode: PendingMode::High,
            interval: Duration::from_secs(1),
        };
        tokio::spawn(Simulator::new(config, metrics.clone()).run());

        // On the paused clock, cycles land at t = 0s, 1s, 2s, 3s.
        tokio::time::sleep(Duration::from_millis(3500)).await;

        assert_eq!(metrics.average_delivery_time.count(), 4);
        let pending = metrics.pending_deliveries.get();
        assert!(PENDING_HIGH_RANGE.contains(&pending));
        assert!(pending > 10);
    }
}
