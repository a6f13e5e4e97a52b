pub mod metrics;
pub mod tracing;

pub use self::metrics::{MetricsError, OperationOutcome, StoreMetrics};
pub use self::tracing::{default_filter_directive, init_observability, ObservabilityError};
