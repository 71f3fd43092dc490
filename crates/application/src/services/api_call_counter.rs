//! Outbound API call counter
//!
//! Monotonic count of upstream calls keyed by location, endpoint and
//! response status. Owned by the collector and injected at construction, so
//! tests can inspect it directly.

use std::collections::BTreeMap;

use parking_lot::Mutex;

use crate::services::metric_registry::{API_CALLS_DESCRIPTOR, Sample};

/// Identity of one counter series
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct CallKey {
    /// Location name
    pub location: String,
    /// Endpoint URL without query string
    pub endpoint: String,
    /// HTTP status line
    pub status: String,
}

impl CallKey {
    fn new(location: &str, endpoint: &str, status: &str) -> Self {
        Self {
            location: location.to_string(),
            endpoint: endpoint.to_string(),
            status: status.to_string(),
        }
    }
}

/// Thread-safe counter of upstream calls
#[derive(Debug, Default)]
pub struct ApiCallCounter {
    counts: Mutex<BTreeMap<CallKey, u64>>,
}

impl ApiCallCounter {
    /// Create an empty counter
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Record one call that received a response
    pub fn record(&self, location: &str, endpoint: &str, status: &str) {
        let key = CallKey::new(location, endpoint, status);
        *self.counts.lock().entry(key).or_insert(0) += 1;
    }

    /// Current count of one series
    #[must_use]
    pub fn count(&self, location: &str, endpoint: &str, status: &str) -> u64 {
        let key = CallKey::new(location, endpoint, status);
        self.counts.lock().get(&key).copied().unwrap_or(0)
    }

    /// Sum over all series
    #[must_use]
    pub fn total(&self) -> u64 {
        self.counts.lock().values().sum()
    }

    /// Current values as samples of `openweather_api_calls_total`
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn samples(&self) -> Vec<Sample> {
        self.counts
            .lock()
            .iter()
            .map(|(key, count)| Sample {
                descriptor: API_CALLS_DESCRIPTOR,
                label_values: vec![
                    key.location.clone(),
                    key.endpoint.clone(),
                    key.status.clone(),
                ],
                value: *count as f64,
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;

    const ONECALL: &str = "https://api.openweathermap.org/data/3.0/onecall";

    #[test]
    fn starts_empty() {
        let counter = ApiCallCounter::new();
        assert_eq!(counter.total(), 0);
        assert!(counter.samples().is_empty());
        assert_eq!(counter.count("Seattle, WA", ONECALL, "200 OK"), 0);
    }

    #[test]
    fn counts_per_series() {
        let counter = ApiCallCounter::new();
        counter.record("Seattle, WA", ONECALL, "200 OK");
        counter.record("Seattle, WA", ONECALL, "200 OK");
        counter.record("Seattle, WA", ONECALL, "401 Unauthorized");

        assert_eq!(counter.count("Seattle, WA", ONECALL, "200 OK"), 2);
        assert_eq!(counter.count("Seattle, WA", ONECALL, "401 Unauthorized"), 1);
        assert_eq!(counter.total(), 3);
    }

    #[test]
    fn samples_carry_all_labels() {
        let counter = ApiCallCounter::new();
        counter.record("Seattle, WA", ONECALL, "200 OK");

        let samples = counter.samples();
        assert_eq!(samples.len(), 1);
        let sample = &samples[0];
        assert_eq!(sample.descriptor.name, "openweather_api_calls_total");
        assert_eq!(sample.label("location"), Some("Seattle, WA"));
        assert_eq!(sample.label("endpoint"), Some(ONECALL));
        assert_eq!(sample.label("response_status"), Some("200 OK"));
        assert!((sample.value - 1.0).abs() < f64::EPSILON);
    }

    #[test]
    fn concurrent_records_are_not_lost() {
        let counter = Arc::new(ApiCallCounter::new());
        let handles: Vec<_> = (0..8)
            .map(|_| {
                let counter = Arc::clone(&counter);
                std::thread::spawn(move || {
                    for _ in 0..100 {
                        counter.record("a", ONECALL, "200 OK");
                    }
                })
            })
            .collect();
        for handle in handles {
            handle.join().unwrap();
        }
        assert_eq!(counter.count("a", ONECALL, "200 OK"), 800);
    }
}
