use prometheus_client::metrics::{
    counter::Counter,
    family::Family,
    histogram::{Histogram, exponential_buckets},
};
use prometheus_client::registry::Registry;
use prometheus_client_derive_encode::{EncodeLabelSet, EncodeLabelValue};

#[derive(Clone, Debug, Hash, PartialEq, Eq, EncodeLabelValue)]
pub enum Method {
    Healthz,
    ListComment,
    CreateComment,
    UpdateComment,
    DeleteComment,
    DeleteCommentByVideoId,
}

#[derive(Clone, Debug, Hash, PartialEq, Eq, EncodeLabelValue)]
pub enum Status {
    Success,
    Error,
}

#[derive(Clone, Debug, Hash, PartialEq, Eq, EncodeLabelSet)]
pub struct MethodLabels {
    pub method: Method,
    pub status: Status,
}

/// Per-service request metrics. Cloning shares the underlying families.
#[derive(Debug, Clone)]
pub struct Metrics {
    pub request_counter: Family<MethodLabels, Counter>,
    pub request_duration: Family<MethodLabels, Histogram>,
}

impl Metrics {
    pub fn new() -> Self {
        Self {
            request_counter: Family::default(),
            request_duration: Family::new_with_constructor(|| {
                Histogram::new(exponential_buckets(0.001, 2.0, 12))
            }),
        }
    }

    pub fn register(&self, prefix: &str, registry: &mut Registry) {
        registry.register(
            format!("{prefix}_request_counter"),
            "Total number of requests handled",
            self.request_counter.clone(),
        );
        registry.register(
            format!("{prefix}_request_duration"),
            "Histogram of request durations in seconds",
            self.request_duration.clone(),
        );
    }

    pub fn record(&self, method: Method, status: Status, duration_secs: f64) {
        let labels = MethodLabels { method, status };

        self.request_counter.get_or_create(&labels).inc();
        self.request_duration
            .get_or_create(&labels)
            .observe(duration_secs);
    }
}

impl Default for Metrics {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use prometheus_client::encoding::text::encode;

    #[test]
    fn records_requests_per_method_and_status() {
        let mut registry = Registry::default();
        let metrics = Metrics::new();
        metrics.register("comment_service", &mut registry);

        metrics.record(Method::ListComment, Status::Success, 0.01);
        metrics.record(Method::ListComment, Status::Success, 0.02);
        metrics.record(Method::DeleteComment, Status::Error, 0.01);

        let success = MethodLabels {
            method: Method::ListComment,
            status: Status::Success,
        };
        let failure = MethodLabels {
            method: Method::DeleteComment,
            status: Status::Error,
        };
        assert_eq!(metrics.request_counter.get_or_create(&success).get(), 2);
        assert_eq!(metrics.request_counter.get_or_create(&failure).get(), 1);

        let mut buffer = String::new();
        encode(&mut buffer, &registry).unwrap();
        assert!(buffer.contains("comment_service_request_counter"));
        assert!(buffer.contains("method=\"ListComment\",status=\"Success\""));
    }
}
