use serde_json::{Map, Value, json};

use crate::error::PerimeterError;
use crate::href::validate_href;

use super::model::{ActorKind, ActorReference, AllSentinel};

impl ActorReference {
    /// Render this reference as one wire actor object, e.g.
    /// `{"label": {"href": ..., "exclusion": false}}` or `{"actors": "ams"}`.
    pub fn to_wire(&self) -> Value {
        match self {
            ActorReference::All(sentinel) => json!({ "actors": sentinel.as_str() }),
            ActorReference::Label { href, exclusion } => {
                json!({ "label": { "href": href, "exclusion": exclusion } })
            }
            ActorReference::LabelGroup { href, exclusion } => {
                json!({ "label_group": { "href": href, "exclusion": exclusion } })
            }
            ActorReference::Workload { href } => json!({ "workload": { "href": href } }),
            ActorReference::VirtualService { href } => {
                json!({ "virtual_service": { "href": href } })
            }
            ActorReference::VirtualServer { href } => json!({ "virtual_server": { "href": href } }),
            ActorReference::IpList { href } => json!({ "ip_list": { "href": href } }),
        }
    }

    /// Reconstruct a reference from one wire actor object.
    ///
    /// Wire documents are assumed well-formed at the source of truth, but the
    /// exactly-one invariant and href grammar are still enforced so a
    /// violated document surfaces the same errors as the write path.
    pub fn from_wire(path: &str, value: &Value) -> Result<Self, PerimeterError> {
        let object = value
            .as_object()
            .ok_or_else(|| PerimeterError::MalformedWire {
                path: path.to_string(),
                reason: "actor must be an object".to_string(),
            })?;

        const KINDS: [ActorKind; 7] = [
            ActorKind::All,
            ActorKind::Label,
            ActorKind::LabelGroup,
            ActorKind::Workload,
            ActorKind::VirtualService,
            ActorKind::VirtualServer,
            ActorKind::IpList,
        ];

        let populated: Vec<ActorKind> = KINDS
            .into_iter()
            .filter(|kind| matches!(object.get(kind.field_name()), Some(v) if !v.is_null()))
            .collect();

        let kind = match populated.as_slice() {
            [only] => *only,
            [] => {
                return Err(PerimeterError::ActorRequired {
                    path: path.to_string(),
                });
            }
            many => {
                return Err(PerimeterError::ActorCardinality {
                    path: path.to_string(),
                    populated: many.iter().map(|k| k.field_name().to_string()).collect(),
                });
            }
        };

        let field = &object[kind.field_name()];
        let reference = match kind {
            ActorKind::All => {
                let value = field.as_str().unwrap_or_default();
                let sentinel =
                    AllSentinel::parse(value).ok_or_else(|| PerimeterError::SentinelNotAllowed {
                        path: path.to_string(),
                        value: value.to_string(),
                    })?;
                ActorReference::All(sentinel)
            }
            ActorKind::Label => {
                let (href, exclusion) = href_and_exclusion(path, kind, field)?;
                ActorReference::Label { href, exclusion }
            }
            ActorKind::LabelGroup => {
                let (href, exclusion) = href_and_exclusion(path, kind, field)?;
                ActorReference::LabelGroup { href, exclusion }
            }
            ActorKind::Workload => ActorReference::Workload {
                href: wire_href(path, kind, field)?,
            },
            ActorKind::VirtualService => ActorReference::VirtualService {
                href: wire_href(path, kind, field)?,
            },
            ActorKind::VirtualServer => ActorReference::VirtualServer {
                href: wire_href(path, kind, field)?,
            },
            ActorKind::IpList => ActorReference::IpList {
                href: wire_href(path, kind, field)?,
            },
        };

        if let (Some(object_kind), Some(href)) = (kind.object_kind(), reference.href()) {
            validate_href(object_kind, href)?;
        }

        Ok(reference)
    }
}

fn wire_object<'a>(
    path: &str,
    kind: ActorKind,
    field: &'a Value,
) -> Result<&'a Map<String, Value>, PerimeterError> {
    field.as_object().ok_or_else(|| PerimeterError::MalformedWire {
        path: path.to_string(),
        reason: format!("{} actor must be an object", kind.field_name()),
    })
}

fn wire_href(path: &str, kind: ActorKind, field: &Value) -> Result<String, PerimeterError> {
    let object = wire_object(path, kind, field)?;
    object
        .get("href")
        .and_then(Value::as_str)
        .map(str::to_string)
        .ok_or_else(|| PerimeterError::MalformedWire {
            path: path.to_string(),
            reason: format!("{} actor is missing an href", kind.field_name()),
        })
}

fn href_and_exclusion(
    path: &str,
    kind: ActorKind,
    field: &Value,
) -> Result<(String, bool), PerimeterError> {
    let href = wire_href(path, kind, field)?;
    let exclusion = wire_object(path, kind, field)?
        .get("exclusion")
        .and_then(Value::as_bool)
        .unwrap_or(false);
    Ok((href, exclusion))
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    const GROUP_HREF: &str = "/orgs/1/sec_policy/draft/label_groups/6506b99e-6a1e-4e9b-8e20-7fb6a9a299fc";

    #[rstest]
    #[case(ActorReference::All(AllSentinel::Ams), "sentinel")]
    #[case(
        ActorReference::Label { href: "/orgs/1/labels/9".to_string(), exclusion: true },
        "excluded label"
    )]
    #[case(
        ActorReference::LabelGroup { href: GROUP_HREF.to_string(), exclusion: false },
        "label group"
    )]
    #[case(
        ActorReference::Workload { href: "/orgs/1/workloads/10".to_string() },
        "workload"
    )]
    #[case(
        ActorReference::IpList { href: "/orgs/1/sec_policy/active/ip_lists/7".to_string() },
        "ip list"
    )]
    fn wire_round_trip(#[case] actor: ActorReference, #[case] _description: &str) {
        let wire = actor.to_wire();
        let back = ActorReference::from_wire("providers[0]", &wire).unwrap();
        assert_eq!(back, actor);
    }

    #[test]
    fn from_wire_rejects_multiple_populated_keys() {
        let wire = json!({
            "label": {"href": "/orgs/1/labels/9"},
            "workload": {"href": "/orgs/1/workloads/10"},
        });
        let err = ActorReference::from_wire("consumers[0]", &wire).unwrap_err();
        assert!(matches!(err, PerimeterError::ActorCardinality { .. }));
    }

    #[test]
    fn from_wire_rejects_empty_object() {
        let err = ActorReference::from_wire("consumers[0]", &json!({})).unwrap_err();
        assert!(matches!(err, PerimeterError::ActorRequired { .. }));
    }

    #[test]
    fn from_wire_ignores_null_keys() {
        let wire = json!({"label": {"href": "/orgs/1/labels/9"}, "workload": null});
        let actor = ActorReference::from_wire("providers[0]", &wire).unwrap();
        assert_eq!(actor.kind(), ActorKind::Label);
    }

    #[test]
    fn from_wire_validates_href_grammar() {
        let wire = json!({"label": {"href": "not-an-href"}});
        let err = ActorReference::from_wire("providers[0]", &wire).unwrap_err();
        assert!(matches!(err, PerimeterError::InvalidHref { .. }));
    }

    #[test]
    fn from_wire_requires_href_on_reference_actors() {
        let wire = json!({"ip_list": {}});
        let err = ActorReference::from_wire("providers[0]", &wire).unwrap_err();
        assert!(matches!(err, PerimeterError::MalformedWire { .. }));
    }
}
