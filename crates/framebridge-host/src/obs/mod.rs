//! Lightweight in-process metrics.
//!
//! Counters and gauges are stored as atomics behind `DashMap` label maps and
//! rendered in Prometheus text format on demand; the host app decides where
//! to expose the rendered output.

pub mod metrics;

pub use metrics::BridgeMetrics;
