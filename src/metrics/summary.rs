//! A minimal Prometheus summary instrument.
//!
//! The `prometheus` crate ships counters, gauges and histograms but no
//! summary, and the delivery-time measurement is contractually a summary:
//! `# TYPE <name> summary` with `<name>_sum` and `<name>_count` series that a
//! consumer divides to derive the average. This implements the `Collector`
//! trait directly over the crate's lock-free atomic cells, with no quantiles.

use prometheus::core::{Atomic, AtomicF64, AtomicU64, Collector, Desc};
use prometheus::proto;
use std::collections::HashMap;
use std::sync::Arc;

/// Running count and sum of observations, exposed as a summary family.
///
/// Both values grow monotonically for the process lifetime; there is no
/// reset. One writer observes once per generation cycle while scrapes read
/// concurrently; a scrape landing between the two atomic updates sees the
/// previous observation's pair at worst, which consumers of the derived
/// average tolerate.
#[derive(Clone)]
pub struct TimeSummary {
    inner: Arc<SummaryInner>,
}

struct SummaryInner {
    desc: Desc,
    count: AtomicU64,
    sum: AtomicF64,
}

impl TimeSummary {
    /// Create a new summary with zero observations
    pub fn new(name: impl Into<String>, help: impl Into<String>) -> prometheus::Result<Self> {
        let desc = Desc::new(name.into(), help.into(), Vec::new(), HashMap::new())?;

        Ok(Self {
            inner: Arc::new(SummaryInner {
                desc,
                count: AtomicU64::new(0),
                sum: AtomicF64::new(0.0),
            }),
        })
    }

    /// Record one observation
    pub fn observe(&self, value: f64) {
        self.inner.sum.inc_by(value);
        self.inner.count.inc_by(1);
    }

    /// Number of observations recorded so far
    pub fn count(&self) -> u64 {
        self.inner.count.get()
    }

    /// Sum of all observations recorded so far
    pub fn sum(&self) -> f64 {
        self.inner.sum.get()
    }
}

impl Collector for TimeSummary {
    fn desc(&self) -> Vec<&Desc> {
        vec![&self.inner.desc]
    }

    fn collect(&self) -> Vec<proto::MetricFamily> {
        let mut summary = proto::Summary::default();
        summary.set_sample_count(self.count());
        summary.set_sample_sum(self.sum());

        let mut metric = proto::Metric::default();
        metric.set_summary(summary);

        let mut family = proto::MetricFamily::default();
        family.set_name(self.inner.desc.fq_name.clone());
        family.set_help(self.inner.desc.help.clone());
        family.set_field_type(proto::MetricType::SUMMARY);
        family.mut_metric().push(metric);

        vec![family]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_starts_empty() {
        let summary = TimeSummary::new("delivery_seconds", "help text").unwrap();
        assert_eq!(summary.count(), 0);
        assert_eq!(summary.sum(), 0.0);
    }

    #[test]
    fn test_observations_accumulate() {
        let summary = TimeSummary::new("delivery_seconds", "help text").unwrap();

        summary.observe(1.5);
        summary.observe(2.25);

        assert_eq!(summary.count(), 2);
        assert_eq!(summary.sum(), 3.75);
    }

    #[test]
    fn test_collect_emits_one_summary_family() {
        let summary = TimeSummary::new("delivery_seconds", "Delivery time").unwrap();
        summary.observe(30.5);

        let families = summary.collect();
        assert_eq!(families.len(), 1);

        let family = &families[0];
        assert_eq!(family.get_name(), "delivery_seconds");
        assert_eq!(family.get_help(), "Delivery time");
        assert_eq!(family.get_field_type(), proto::MetricType::SUMMARY);
        assert_eq!(family.get_metric().len(), 1);

        let proto_summary = family.get_metric()[0].get_summary();
        assert_eq!(proto_summary.get_sample_count(), 1);
        assert_eq!(proto_summary.get_sample_sum(), 30.5);
        assert!(proto_summary.get_quantile().is_empty());
    }

    #[test]
    fn test_clones_share_state() {
        let summary = TimeSummary::new("delivery_seconds", "help text").unwrap();
        let clone = summary.clone();

        summary.observe(10.0);
        clone.observe(5.0);

        assert_eq!(summary.count(), 2);
        assert_eq!(clone.sum(), 15.0);
    }
}
