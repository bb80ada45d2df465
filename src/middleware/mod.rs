// Middleware module - request logging, metrics and legacy status compatibility

pub mod legacy_status;
pub mod metrics;
pub mod request_logger;

pub use legacy_status::legacy_status_middleware;
pub use metrics::metrics_middleware;
pub use request_logger::{auth_logger_middleware, request_logger_middleware};
