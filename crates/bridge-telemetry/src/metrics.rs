//! Prometheus metrics for the bus bridge.
//!
//! All metrics follow the naming convention: `cb_<component>_<metric>_<unit>`
//!
//! ## Metric Types
//!
//! - **Counter**: Monotonically increasing value (e.g., dedup_frames_checked_total)
//! - **Gauge**: Value that can go up or down (e.g., dedup_cache_entries)
//! - **Histogram**: Distribution of values (e.g., dedup_check_duration_seconds)

use lazy_static::lazy_static;
use prometheus::{
    exponential_buckets, Encoder, Histogram, HistogramOpts, IntCounter, IntGauge, Registry,
    TextEncoder,
};

use crate::TelemetryError;

lazy_static! {
    /// Global metrics registry
    pub static ref REGISTRY: Registry = Registry::new();

    // =========================================================================
    // DEDUPLICATION METRICS
    // =========================================================================

    /// Frames presented to the duplicate detector
    pub static ref DEDUP_FRAMES_CHECKED: IntCounter = IntCounter::new(
        "cb_dedup_frames_checked_total",
        "Total number of frames checked for duplicates"
    ).expect("metric creation failed");

    /// Frames suppressed as bridged duplicates
    pub static ref DEDUP_DUPLICATES_SUPPRESSED: IntCounter = IntCounter::new(
        "cb_dedup_duplicates_suppressed_total",
        "Total number of frames suppressed as duplicates"
    ).expect("metric creation failed");

    /// Frames accepted and forwarded downstream
    pub static ref DEDUP_FRAMES_ACCEPTED: IntCounter = IntCounter::new(
        "cb_dedup_frames_accepted_total",
        "Total number of frames accepted as new occurrences"
    ).expect("metric creation failed");

    /// Cache entries removed by time-based expiry
    pub static ref DEDUP_ENTRIES_EXPIRED: IntCounter = IntCounter::new(
        "cb_dedup_entries_expired_total",
        "Cache entries removed because they aged out of the window"
    ).expect("metric creation failed");

    /// Cache entries removed by size-based eviction
    pub static ref DEDUP_ENTRIES_EVICTED: IntCounter = IntCounter::new(
        "cb_dedup_entries_evicted_total",
        "Cache entries evicted while still inside the window (cache full)"
    ).expect("metric creation failed");

    /// Current number of cached signatures
    pub static ref DEDUP_CACHE_SIZE: IntGauge = IntGauge::new(
        "cb_dedup_cache_entries",
        "Number of signatures currently cached"
    ).expect("metric creation failed");

    /// Time spent deciding one frame
    pub static ref DEDUP_CHECK_DURATION: Histogram = Histogram::with_opts(
        HistogramOpts::new(
            "cb_dedup_check_duration_seconds",
            "Time spent deciding whether a frame is a duplicate"
        ).buckets(exponential_buckets(0.000_000_1, 2.0, 16).expect("valid buckets"))
    ).expect("metric creation failed");

    // =========================================================================
    // INGEST METRICS
    // =========================================================================

    /// Frames rejected at ingress for breaking the bus contract
    pub static ref INGEST_FRAMES_REJECTED: IntCounter = IntCounter::new(
        "cb_ingest_frames_rejected_total",
        "Frames rejected before deduplication (oversized payload or id)"
    ).expect("metric creation failed");
}

/// Register all metrics with the global registry.
///
/// Safe to call more than once; already registered collectors are skipped.
pub fn register_metrics() -> Result<(), TelemetryError> {
    let metrics: Vec<Box<dyn prometheus::core::Collector>> = vec![
        // Deduplication
        Box::new(DEDUP_FRAMES_CHECKED.clone()),
        Box::new(DEDUP_DUPLICATES_SUPPRESSED.clone()),
        Box::new(DEDUP_FRAMES_ACCEPTED.clone()),
        Box::new(DEDUP_ENTRIES_EXPIRED.clone()),
        Box::new(DEDUP_ENTRIES_EVICTED.clone()),
        Box::new(DEDUP_CACHE_SIZE.clone()),
        Box::new(DEDUP_CHECK_DURATION.clone()),
        // Ingest
        Box::new(INGEST_FRAMES_REJECTED.clone()),
    ];

    for metric in metrics {
        match REGISTRY.register(metric) {
            Ok(()) | Err(prometheus::Error::AlreadyReg) => {}
            Err(e) => return Err(TelemetryError::MetricsInit(e.to_string())),
        }
    }

    Ok(())
}

/// Encode all metrics as Prometheus text format.
pub fn encode_metrics() -> Result<String, TelemetryError> {
    let encoder = TextEncoder::new();
    let metric_families = REGISTRY.gather();
    let mut buffer = Vec::new();
    encoder
        .encode(&metric_families, &mut buffer)
        .map_err(|e| TelemetryError::MetricsInit(e.to_string()))?;
    String::from_utf8(buffer).map_err(|e| TelemetryError::MetricsInit(e.to_string()))
}

/// Timer guard for automatic histogram observation.
pub struct HistogramTimer {
    histogram: Histogram,
    start: std::time::Instant,
}

impl HistogramTimer {
    /// Start a new timer for the given histogram.
    pub fn new(histogram: &Histogram) -> Self {
        Self {
            histogram: histogram.clone(),
            start: std::time::Instant::now(),
        }
    }
}

impl Drop for HistogramTimer {
    fn drop(&mut self) {
        self.histogram.observe(self.start.elapsed().as_secs_f64());
    }
}

/// Start timing for a histogram. Observation happens on drop.
#[macro_export]
macro_rules! time_histogram {
    ($histogram:expr) => {
        $crate::metrics::HistogramTimer::new(&$histogram)
    };
}
