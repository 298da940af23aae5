//! Prometheus instruments for the simulated delivery pipeline.
//!
//! Four measurements are exported: three gauges that are overwritten wholesale
//! each generation cycle, and one summary that only ever grows. `delivered`
//! is drawn each cycle too but feeds `total_deliveries` only; it has no
//! series of its own.

pub mod summary;

pub use summary::TimeSummary;

use crate::core::Result;
use crate::simulation::DeliverySample;
use prometheus::{IntGauge, Registry, TextEncoder};
use std::sync::Arc;

/// Shared handle to the instruments: one writer (the simulation loop), many
/// readers (the scrape handlers). All values live in atomic cells, so no lock
/// is involved on either side.
pub type SharedMetrics = Arc<DeliveryMetrics>;

/// The exported delivery measurements and their registry
pub struct DeliveryMetrics {
    registry: Registry,

    /// Latest cycle's pending + on-the-way + delivered
    pub total_deliveries: IntGauge,

    /// Latest cycle's pending deliveries; the warning alert watches this
    pub pending_deliveries: IntGauge,

    /// Latest cycle's deliveries on the road
    pub on_the_way_deliveries: IntGauge,

    /// Running count/sum of per-cycle delivery-time observations; the
    /// critical alert derives the average from it
    pub average_delivery_time: TimeSummary,
}

impl DeliveryMetrics {
    /// Create all instruments and register them with a fresh registry
    pub fn new() -> Result<Self> {
        let registry = Registry::new();

        let total_deliveries = IntGauge::new("total_deliveries", "Total number of deliveries")?;
        let pending_deliveries =
            IntGauge::new("pending_deliveries", "Number of pending deliveries")?;
        let on_the_way_deliveries =
            IntGauge::new("on_the_way_deliveries", "Number of deliveries on the way")?;
        let average_delivery_time =
            TimeSummary::new("average_delivery_time", "Average delivery time in seconds")?;

        registry.register(Box::new(total_deliveries.clone()))?;
        registry.register(Box::new(pending_deliveries.clone()))?;
        registry.register(Box::new(on_the_way_deliveries.clone()))?;
        registry.register(Box::new(average_delivery_time.clone()))?;

        Ok(Self {
            registry,
            total_deliveries,
            pending_deliveries,
            on_the_way_deliveries,
            average_delivery_time,
        })
    }

    /// Publish one cycle: replace the gauges and record the time observation
    pub fn apply(&self, sample: &DeliverySample) {
        self.total_deliveries.set(sample.total);
        self.pending_deliveries.set(sample.pending);
        self.on_the_way_deliveries.set(sample.on_the_way);
        self.average_delivery_time.observe(sample.avg_time);
    }

    /// Render the current snapshot in the Prometheus text exposition format
    pub fn encode(&self) -> Result<String> {
        let encoder = TextEncoder::new();
        let metric_families = self.registry.gather();
        Ok(encoder.encode_to_string(&metric_families)?)
    }
}
