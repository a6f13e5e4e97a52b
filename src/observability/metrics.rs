use prometheus::{
    CounterVec, Encoder, HistogramOpts, HistogramVec, IntGauge, Opts, Registry, TextEncoder,
};
use thiserror::Error;
use tracing::info;

#[derive(Debug, Error)]
pub enum MetricsError {
    #[error("Failed to register metric: {0}")]
    Registration(#[from] prometheus::Error),
    #[error("Failed to encode metrics: {0}")]
    Encoding(String),
}

/// Outcome label for cart operations
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OperationOutcome {
    /// The cart changed and a save was scheduled
    Applied,
    /// Valid request that left the cart unchanged
    Noop,
    /// Issued before the initial load; replayed once it completes
    Queued,
    /// Rejected by validation
    Rejected,
}

impl OperationOutcome {
    pub fn as_str(&self) -> &'static str {
        match self {
            OperationOutcome::Applied => "applied",
            OperationOutcome::Noop => "noop",
            OperationOutcome::Queued => "queued",
            OperationOutcome::Rejected => "rejected",
        }
    }
}

/// Metrics collected by the cart store
#[derive(Clone)]
pub struct StoreMetrics {
    registry: Registry,

    pub cart_operations_total: CounterVec,
    pub storage_operations_total: CounterVec,
    pub storage_operation_duration_seconds: HistogramVec,
    pub cart_line_items: IntGauge,
}

impl StoreMetrics {
    /// Create a new metrics instance with all metrics registered on a private registry
    pub fn new() -> Result<Self, MetricsError> {
        let registry = Registry::new();

        let cart_operations_total = CounterVec::new(
            Opts::new("cart_operations_total", "Total number of cart operations"),
            &["operation", "outcome"],
        )?;

        let storage_operations_total = CounterVec::new(
            Opts::new(
                "cart_storage_operations_total",
                "Total number of cart storage reads and writes",
            ),
            &["operation", "status"],
        )?;

        let storage_operation_duration_seconds = HistogramVec::new(
            HistogramOpts::new(
                "cart_storage_operation_duration_seconds",
                "Cart storage operation duration in seconds",
            )
            .buckets(vec![0.0005, 0.001, 0.005, 0.01, 0.025, 0.05, 0.1, 0.25, 0.5, 1.0]),
            &["operation"],
        )?;

        let cart_line_items = IntGauge::new(
            "cart_line_items",
            "Number of distinct line items currently in the cart",
        )?;

        registry.register(Box::new(cart_operations_total.clone()))?;
        registry.register(Box::new(storage_operations_total.clone()))?;
        registry.register(Box::new(storage_operation_duration_seconds.clone()))?;
        registry.register(Box::new(cart_line_items.clone()))?;

        info!("Cart metrics initialized");

        Ok(Self {
            registry,
            cart_operations_total,
            storage_operations_total,
            storage_operation_duration_seconds,
            cart_line_items,
        })
    }

    pub fn registry(&self) -> &Registry {
        &self.registry
    }

    /// Encode all metrics in Prometheus text format
    pub fn encode(&self) -> Result<String, MetricsError> {
        let encoder = TextEncoder::new();
        let metric_families = self.registry.gather();

        let mut buffer = Vec::new();
        encoder
            .encode(&metric_families, &mut buffer)
            .map_err(|e| MetricsError::Encoding(e.to_string()))?;

        String::from_utf8(buffer).map_err(|e| MetricsError::Encoding(e.to_string()))
    }

    pub fn record_cart_operation(&self, operation: &str, outcome: OperationOutcome) {
        self.cart_operations_total
            .with_label_values(&[operation, outcome.as_str()])
            .inc();
    }

    pub fn record_storage_operation(&self, operation: &str, success: bool, duration_seconds: f64) {
        let status = if success { "success" } else { "error" };

        self.storage_operations_total
            .with_label_values(&[operation, status])
            .inc();

        self.storage_operation_duration_seconds
            .with_label_values(&[operation])
            .observe(duration_seconds);
    }

    pub fn set_line_items(&self, count: usize) {
        self.cart_line_items
            .set(i64::try_from(count).unwrap_or(i64::MAX));
    }

    /// Current value of `cart_operations_total` for a label pair
    pub fn cart_operation_count(&self, operation: &str, outcome: OperationOutcome) -> f64 {
        self.cart_operations_total
            .with_label_values(&[operation, outcome.as_str()])
            .get()
    }

    /// Current value of `cart_storage_operations_total` for a label pair
    pub fn storage_operation_count(&self, operation: &str, success: bool) -> f64 {
        let status = if success { "success" } else { "error" };
        self.storage_operations_total
            .with_label_values(&[operation, status])
            .get()
    }
}
