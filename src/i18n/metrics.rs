//! Language switching metrics.
//!
//! Counters for switches, fallbacks and redirects so an embedding page can
//! report how often the no-reload path degrades.

use serde::Serialize;
use std::sync::atomic::{AtomicUsize, Ordering};

/// Counters owned by a [`LanguageService`](crate::service::LanguageService).
#[derive(Debug, Default)]
pub struct SwitchMetrics {
    /// Switches that changed the locale
    switches: AtomicUsize,

    /// Switch requests for the locale already active
    no_op_switches: AtomicUsize,

    /// Switches that fell back to a full page navigation
    fallbacks: AtomicUsize,

    /// Switches that exceeded the time budget
    slow_switches: AtomicUsize,

    /// Preference writes that failed
    persistence_failures: AtomicUsize,

    /// Automatic locale redirects issued at load
    auto_redirects: AtomicUsize,
}

impl SwitchMetrics {
    /// Create zeroed metrics.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record_switch(&self) {
        self.switches.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_no_op(&self) {
        self.no_op_switches.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_fallback(&self) {
        self.fallbacks.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_slow_switch(&self) {
        self.slow_switches.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_persistence_failure(&self) {
        self.persistence_failures.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_auto_redirect(&self) {
        self.auto_redirects.fetch_add(1, Ordering::Relaxed);
    }

    pub fn switches(&self) -> usize {
        self.switches.load(Ordering::Relaxed)
    }

    pub fn no_op_switches(&self) -> usize {
        self.no_op_switches.load(Ordering::Relaxed)
    }

    pub fn fallbacks(&self) -> usize {
        self.fallbacks.load(Ordering::Relaxed)
    }

    pub fn slow_switches(&self) -> usize {
        self.slow_switches.load(Ordering::Relaxed)
    }

    pub fn persistence_failures(&self) -> usize {
        self.persistence_failures.load(Ordering::Relaxed)
    }

    pub fn auto_redirects(&self) -> usize {
        self.auto_redirects.load(Ordering::Relaxed)
    }

    /// Generate a metrics report.
    pub fn report(&self) -> MetricsReport {
        let switches = self.switches();
        let fallbacks = self.fallbacks();
        let attempts = switches + fallbacks;
        let fallback_rate = if attempts > 0 {
            (fallbacks as f64 / attempts as f64) * 100.0
        } else {
            0.0
        };

        MetricsReport {
            switches,
            no_op_switches: self.no_op_switches(),
            fallbacks,
            fallback_rate,
            slow_switches: self.slow_switches(),
            persistence_failures: self.persistence_failures(),
            auto_redirects: self.auto_redirects(),
        }
    }
}

/// Snapshot of [`SwitchMetrics`].
#[derive(Debug, Clone, Serialize)]
pub struct MetricsReport {
    pub switches: usize,
    pub no_op_switches: usize,
    pub fallbacks: usize,

    /// Fallbacks as a percentage (0-100) of switches that reached navigation
    pub fallback_rate: f64,

    pub slow_switches: usize,
    pub persistence_failures: usize,
    pub auto_redirects: usize,
}
