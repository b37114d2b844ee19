mod tracing_layer;
mod metrics_layer;
mod request_extractor;

pub use tracing_layer::*;
pub use metrics_layer::*;
pub use request_extractor::*;
