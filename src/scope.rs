use serde::{Deserialize, Serialize};
use serde_json::{Value, json};

use crate::actor::LabelSelector;
use crate::error::PerimeterError;
use crate::href::{ObjectKind, validate_href};

/// Maximum members per scope group on a rule set.
pub const RULE_SET_SCOPE_MAX: usize = 3;
/// Maximum members per scope group on a selective enforcement rule.
pub const SELECTIVE_ENFORCEMENT_SCOPE_MAX: usize = 4;

/// One scoping clause as authored in flat configuration: unordered label and
/// label-group reference sets, AND'd together.
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
pub struct RawScopeGroup {
    #[serde(default)]
    pub labels: Vec<LabelSelector>,
    #[serde(default)]
    pub label_groups: Vec<LabelSelector>,
}

/// A validated scoping clause. Members are AND'd within a group; a sequence
/// of groups is OR'd in order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ScopeGroup {
    pub labels: Vec<LabelSelector>,
    pub label_groups: Vec<LabelSelector>,
}

impl ScopeGroup {
    pub fn member_count(&self) -> usize {
        self.labels.len() + self.label_groups.len()
    }
}

/// Validate an ordered sequence of raw scope groups.
///
/// Each group's member count must not exceed `max` (see
/// [`RULE_SET_SCOPE_MAX`] and [`SELECTIVE_ENFORCEMENT_SCOPE_MAX`]); a
/// violation fails with the offending group's index rather than truncating.
/// Group order and intra-group input order are preserved.
pub fn build_scope(
    groups: &[RawScopeGroup],
    max: usize,
) -> Result<Vec<ScopeGroup>, PerimeterError> {
    let mut scope = Vec::with_capacity(groups.len());

    for (index, group) in groups.iter().enumerate() {
        let count = group.labels.len() + group.label_groups.len();
        if count > max {
            return Err(PerimeterError::ScopeCardinality {
                group: index,
                count,
                max,
            });
        }

        for selector in &group.labels {
            validate_href(ObjectKind::Label, &selector.href)?;
        }
        for selector in &group.label_groups {
            validate_href(ObjectKind::LabelGroup, &selector.href)?;
        }

        scope.push(ScopeGroup {
            labels: group.labels.clone(),
            label_groups: group.label_groups.clone(),
        });
    }

    Ok(scope)
}

/// Render a scope as its nested wire form: an array of groups, each an array
/// of single-key actor objects with the group's members commingled.
pub fn inject_scope(scope: &[ScopeGroup]) -> Value {
    let groups: Vec<Value> = scope
        .iter()
        .map(|group| {
            let mut members = Vec::with_capacity(group.member_count());
            for selector in &group.labels {
                members.push(json!({
                    "label": { "href": selector.href, "exclusion": selector.exclusion }
                }));
            }
            for selector in &group.label_groups {
                members.push(json!({
                    "label_group": { "href": selector.href, "exclusion": selector.exclusion }
                }));
            }
            Value::Array(members)
        })
        .collect();

    Value::Array(groups)
}

/// Reconstruct scope groups from the nested wire form.
///
/// Commingled wire members are segregated back into the label and
/// label-group buckets; group order is preserved. A previously injected
/// scope extracts to the same groups modulo that segregation.
pub fn extract_scope(path: &str, value: &Value) -> Result<Vec<ScopeGroup>, PerimeterError> {
    let wire_groups = value
        .as_array()
        .ok_or_else(|| PerimeterError::MalformedWire {
            path: path.to_string(),
            reason: "scope must be an array of groups".to_string(),
        })?;

    let mut scope = Vec::with_capacity(wire_groups.len());

    for (index, wire_group) in wire_groups.iter().enumerate() {
        let members = wire_group
            .as_array()
            .ok_or_else(|| PerimeterError::MalformedWire {
                path: format!("{path}[{index}]"),
                reason: "scope group must be an array of actors".to_string(),
            })?;

        let mut group = ScopeGroup::default();
        for (position, member) in members.iter().enumerate() {
            let member_path = format!("{path}[{index}][{position}]");
            let object = member
                .as_object()
                .ok_or_else(|| PerimeterError::MalformedWire {
                    path: member_path.clone(),
                    reason: "scope member must be an object".to_string(),
                })?;

            if let Some(label) = object.get("label").filter(|v| !v.is_null()) {
                group.labels.push(selector_from_wire(
                    &member_path,
                    ObjectKind::Label,
                    label,
                )?);
            } else if let Some(label_group) = object.get("label_group").filter(|v| !v.is_null()) {
                group.label_groups.push(selector_from_wire(
                    &member_path,
                    ObjectKind::LabelGroup,
                    label_group,
                )?);
            } else {
                return Err(PerimeterError::MalformedWire {
                    path: member_path,
                    reason: "scope member must be a label or label_group".to_string(),
                });
            }
        }

        scope.push(group);
    }

    Ok(scope)
}

fn selector_from_wire(
    path: &str,
    kind: ObjectKind,
    value: &Value,
) -> Result<LabelSelector, PerimeterError> {
    let object = value
        .as_object()
        .ok_or_else(|| PerimeterError::MalformedWire {
            path: path.to_string(),
            reason: format!("{kind} member must be an object"),
        })?;

    let href = object
        .get("href")
        .and_then(Value::as_str)
        .ok_or_else(|| PerimeterError::MalformedWire {
            path: path.to_string(),
            reason: format!("{kind} member is missing an href"),
        })?;
    validate_href(kind, href)?;

    Ok(LabelSelector {
        href: href.to_string(),
        exclusion: object
            .get("exclusion")
            .and_then(Value::as_bool)
            .unwrap_or(false),
    })
}
