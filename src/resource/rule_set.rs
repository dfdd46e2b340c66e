use serde::{Deserialize, Serialize};
use serde_json::{Map, Value, json};

use crate::error::PerimeterError;
use crate::projector::{FieldSpec, ProjectionSpec, extract, inject};
use crate::scope::{RULE_SET_SCOPE_MAX, RawScopeGroup, ScopeGroup, build_scope, extract_scope, inject_scope};

use super::blocks::wire_string;
use super::rule::{RawSecurityRule, SecurityRule};

/// Fields a rule set operation may touch on the wire.
pub static RULE_SET_PROJECTION: ProjectionSpec = ProjectionSpec::new(&[
    FieldSpec::scalar("name"),
    FieldSpec::scalar("description"),
    FieldSpec::scalar("enabled"),
    FieldSpec::scalar("scopes"),
    FieldSpec::scalar("rules"),
]);

/// One rule set as authored in flat configuration.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct RawRuleSet {
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default = "default_enabled")]
    pub enabled: bool,
    #[serde(default)]
    pub scopes: Vec<RawScopeGroup>,
    #[serde(default)]
    pub rules: Vec<RawSecurityRule>,
}

fn default_enabled() -> bool {
    true
}

/// A validated rule set: an ordered OR sequence of scope groups narrowing
/// which workloads its rules apply to.
#[derive(Debug, Clone, PartialEq)]
pub struct RuleSet {
    pub name: String,
    pub description: Option<String>,
    pub enabled: bool,
    pub scopes: Vec<ScopeGroup>,
    pub rules: Vec<SecurityRule>,
}

impl RuleSet {
    pub fn resolve(path: &str, raw: &RawRuleSet) -> Result<Self, PerimeterError> {
        let scopes = build_scope(&raw.scopes, RULE_SET_SCOPE_MAX)?;
        let rules = raw
            .rules
            .iter()
            .enumerate()
            .map(|(index, rule)| SecurityRule::resolve(&format!("{path}.rules[{index}]"), rule))
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self {
            name: raw.name.clone(),
            description: raw.description.clone(),
            enabled: raw.enabled,
            scopes,
            rules,
        })
    }

    pub fn to_wire(&self) -> Result<Value, PerimeterError> {
        let rules = self
            .rules
            .iter()
            .map(SecurityRule::to_wire)
            .collect::<Result<Vec<_>, _>>()?;

        let mut flat = Map::new();
        flat.insert("name".to_string(), json!(self.name));
        flat.insert(
            "description".to_string(),
            self.description.as_deref().map_or(Value::Null, Value::from),
        );
        flat.insert("enabled".to_string(), json!(self.enabled));
        flat.insert("scopes".to_string(), inject_scope(&self.scopes));
        flat.insert("rules".to_string(), Value::Array(rules));

        inject(&flat, &RULE_SET_PROJECTION)
    }

    pub fn from_wire(path: &str, document: &Value) -> Result<Self, PerimeterError> {
        let flat = extract(document, &RULE_SET_PROJECTION);

        let scopes = match &flat["scopes"] {
            Value::Null => Vec::new(),
            value => extract_scope(&format!("{path}.scopes"), value)?,
        };

        let rules = match &flat["rules"] {
            Value::Null => Vec::new(),
            value => value
                .as_array()
                .ok_or_else(|| PerimeterError::MalformedWire {
                    path: format!("{path}.rules"),
                    reason: "expected an array".to_string(),
                })?
                .iter()
                .enumerate()
                .map(|(index, rule)| {
                    SecurityRule::from_wire(&format!("{path}.rules[{index}]"), rule)
                })
                .collect::<Result<Vec<_>, _>>()?,
        };

        Ok(Self {
            name: wire_string(&format!("{path}.name"), &flat["name"])?,
            description: flat["description"].as_str().map(str::to_string),
            enabled: flat["enabled"].as_bool().unwrap_or(true),
            scopes,
            rules,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::actor::{LabelSelector, RawActorBlock};
    use crate::service::RawIngressService;

    const GROUP_HREF: &str = "/orgs/1/sec_policy/draft/label_groups/6506b99e-6a1e-4e9b-8e20-7fb6a9a299fc";

    fn sample_raw() -> RawRuleSet {
        RawRuleSet {
            name: "web tier".to_string(),
            description: None,
            enabled: true,
            scopes: vec![RawScopeGroup {
                labels: vec![LabelSelector::new("/orgs/1/labels/9")],
                label_groups: vec![LabelSelector::new(GROUP_HREF)],
            }],
            rules: vec![RawSecurityRule {
                providers: vec![RawActorBlock::label("/orgs/1/labels/9")],
                consumers: vec![RawActorBlock::ams()],
                ingress_services: vec![RawIngressService::tcp("443")],
                ..Default::default()
            }],
        }
    }

    #[test]
    fn resolve_validates_scopes_and_rules() {
        let rule_set = RuleSet::resolve("rule_set", &sample_raw()).unwrap();
        assert_eq!(rule_set.scopes.len(), 1);
        assert_eq!(rule_set.scopes[0].member_count(), 2);
        assert_eq!(rule_set.rules.len(), 1);
    }

    #[test]
    fn oversized_scope_group_fails() {
        let mut raw = sample_raw();
        raw.scopes[0].labels = (1..=3)
            .map(|id| LabelSelector::new(format!("/orgs/1/labels/{id}")))
            .collect();
        // 3 labels + 1 label group exceeds the rule set maximum of 3.
        let err = RuleSet::resolve("rule_set", &raw).unwrap_err();
        assert!(matches!(
            err,
            PerimeterError::ScopeCardinality { group: 0, count: 4, .. }
        ));
    }

    #[test]
    fn nested_rule_error_carries_rule_index() {
        let mut raw = sample_raw();
        raw.rules[0].providers.push(RawActorBlock::default());
        let err = RuleSet::resolve("rule_set", &raw).unwrap_err();
        match err {
            PerimeterError::ActorRequired { path } => {
                assert_eq!(path, "rule_set.rules[0].providers[1]");
            }
            other => panic!("expected ActorRequired, got {other}"),
        }
    }

    #[test]
    fn wire_round_trip_reproduces_the_rule_set() {
        let rule_set = RuleSet::resolve("rule_set", &sample_raw()).unwrap();
        let wire = rule_set.to_wire().unwrap();
        let back = RuleSet::from_wire("rule_set", &wire).unwrap();
        assert_eq!(back, rule_set);
    }

    #[test]
    fn scope_order_is_preserved_on_the_wire() {
        let mut raw = sample_raw();
        raw.scopes.push(RawScopeGroup {
            labels: vec![LabelSelector::new("/orgs/1/labels/2")],
            ..Default::default()
        });
        let rule_set = RuleSet::resolve("rule_set", &raw).unwrap();
        let wire = rule_set.to_wire().unwrap();
        let back = RuleSet::from_wire("rule_set", &wire).unwrap();
        assert_eq!(back.scopes, rule_set.scopes);
    }
}
