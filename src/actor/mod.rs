pub mod context;
pub mod model;
pub mod resolve;
pub mod wire;

// Re-export main types and functions
pub use context::{
    ActorContext, ENFORCEMENT_BOUNDARY_ACTORS, IP_TABLE_RULE_ACTORS, SECURITY_RULE_CONSUMERS,
    SECURITY_RULE_PROVIDERS,
};
pub use model::{ActorKind, ActorReference, AllSentinel, LabelSelector, RawActorBlock};
pub use resolve::resolve_actor;
