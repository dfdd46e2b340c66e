pub mod exclusive;
pub mod extract;
pub mod inject;
pub mod spec;

// Re-export main types and functions
pub use exclusive::require_exactly_one;
pub use extract::extract;
pub use inject::inject;
pub use spec::{FieldShape, FieldSpec, ProjectionSpec};
