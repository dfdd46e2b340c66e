pub mod blocks;
pub mod enforcement_boundary;
pub mod rule;
pub mod rule_set;

// Re-export main types
pub use enforcement_boundary::{EnforcementBoundary, RawEnforcementBoundary};
pub use rule::{RawSecurityRule, ResolveLabelsAs, SecurityRule};
pub use rule_set::{RawRuleSet, RuleSet};
