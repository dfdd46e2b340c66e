pub mod coerce;
pub mod model;

// Re-export main types and functions
pub use model::{IngressService, RawIngressService};
