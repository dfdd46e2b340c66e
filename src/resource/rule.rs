use serde::{Deserialize, Serialize};
use serde_json::{Map, Value, json};

use crate::actor::{ActorReference, RawActorBlock, SECURITY_RULE_CONSUMERS, SECURITY_RULE_PROVIDERS};
use crate::error::PerimeterError;
use crate::projector::{FieldSpec, ProjectionSpec, extract, inject};
use crate::service::{IngressService, RawIngressService};

use super::blocks::{
    actors_from_wire, actors_to_wire, resolve_actors, resolve_services, services_from_wire,
    services_to_wire, wire_string,
};

/// Fields a security rule operation may touch on the wire.
/// `resolve_labels_as` is a bare object on the wire and a one-element list in
/// flat form.
pub static SECURITY_RULE_PROJECTION: ProjectionSpec = ProjectionSpec::new(&[
    FieldSpec::scalar("enabled"),
    FieldSpec::scalar("description"),
    FieldSpec::scalar("providers"),
    FieldSpec::scalar("consumers"),
    FieldSpec::scalar("ingress_services"),
    FieldSpec::singleton_list("resolve_labels_as"),
]);

const RESOLUTION_VALUES: [&str; 2] = ["workloads", "virtual_services"];

/// How label-based providers/consumers resolve to concrete objects.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
pub struct ResolveLabelsAs {
    pub providers: Vec<String>,
    pub consumers: Vec<String>,
}

impl ResolveLabelsAs {
    fn validate(&self, path: &str) -> Result<(), PerimeterError> {
        for value in self.providers.iter().chain(&self.consumers) {
            if !RESOLUTION_VALUES.contains(&value.as_str()) {
                return Err(PerimeterError::SentinelNotAllowed {
                    path: path.to_string(),
                    value: value.clone(),
                });
            }
        }
        Ok(())
    }
}

/// One security rule as authored in flat configuration.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct RawSecurityRule {
    #[serde(default = "default_enabled")]
    pub enabled: bool,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub providers: Vec<RawActorBlock>,
    #[serde(default)]
    pub consumers: Vec<RawActorBlock>,
    #[serde(default)]
    pub ingress_services: Vec<RawIngressService>,
    /// Flat form of a wire-side singleton object: at most one element.
    #[serde(default)]
    pub resolve_labels_as: Vec<ResolveLabelsAs>,
}

fn default_enabled() -> bool {
    true
}

impl Default for RawSecurityRule {
    fn default() -> Self {
        Self {
            enabled: true,
            description: None,
            providers: Vec::new(),
            consumers: Vec::new(),
            ingress_services: Vec::new(),
            resolve_labels_as: Vec::new(),
        }
    }
}

/// A fully validated security rule. Rebuilt fresh on every read and write
/// pass; never mutated in place.
#[derive(Debug, Clone, PartialEq)]
pub struct SecurityRule {
    pub enabled: bool,
    pub description: Option<String>,
    pub providers: Vec<ActorReference>,
    pub consumers: Vec<ActorReference>,
    pub ingress_services: Vec<IngressService>,
    pub resolve_labels_as: Option<ResolveLabelsAs>,
}

impl SecurityRule {
    /// Validate one flat rule. `path` prefixes every reported field path.
    pub fn resolve(path: &str, raw: &RawSecurityRule) -> Result<Self, PerimeterError> {
        let providers = resolve_actors(
            &SECURITY_RULE_PROVIDERS,
            &format!("{path}.providers"),
            &raw.providers,
        )?;
        let consumers = resolve_actors(
            &SECURITY_RULE_CONSUMERS,
            &format!("{path}.consumers"),
            &raw.consumers,
        )?;
        let ingress_services =
            resolve_services(&format!("{path}.ingress_services"), &raw.ingress_services)?;

        let resolve_labels_as = match raw.resolve_labels_as.as_slice() {
            [] => None,
            [only] => {
                only.validate(&format!("{path}.resolve_labels_as"))?;
                Some(only.clone())
            }
            many => {
                return Err(PerimeterError::SingletonCardinality {
                    path: format!("{path}.resolve_labels_as"),
                    len: many.len(),
                });
            }
        };

        Ok(Self {
            enabled: raw.enabled,
            description: raw.description.clone(),
            providers,
            consumers,
            ingress_services,
            resolve_labels_as,
        })
    }

    /// Assemble the wire document through the projector.
    pub fn to_wire(&self) -> Result<Value, PerimeterError> {
        let mut flat = Map::new();
        flat.insert("enabled".to_string(), json!(self.enabled));
        flat.insert(
            "description".to_string(),
            self.description.as_deref().map_or(Value::Null, Value::from),
        );
        flat.insert("providers".to_string(), actors_to_wire(&self.providers));
        flat.insert("consumers".to_string(), actors_to_wire(&self.consumers));
        flat.insert(
            "ingress_services".to_string(),
            services_to_wire(&self.ingress_services),
        );
        flat.insert(
            "resolve_labels_as".to_string(),
            match &self.resolve_labels_as {
                Some(resolution) => json!([{
                    "providers": resolution.providers,
                    "consumers": resolution.consumers,
                }]),
                None => Value::Null,
            },
        );

        inject(&flat, &SECURITY_RULE_PROJECTION)
    }

    /// Rebuild the rule from a wire document through the projector.
    pub fn from_wire(path: &str, document: &Value) -> Result<Self, PerimeterError> {
        let flat = extract(document, &SECURITY_RULE_PROJECTION);

        let providers = actors_from_wire(&format!("{path}.providers"), &flat["providers"])?;
        let consumers = actors_from_wire(&format!("{path}.consumers"), &flat["consumers"])?;
        let ingress_services = services_from_wire(
            &format!("{path}.ingress_services"),
            &flat["ingress_services"],
        )?;

        let resolve_labels_as = match &flat["resolve_labels_as"] {
            Value::Null => None,
            value => {
                let resolution_path = format!("{path}.resolve_labels_as");
                let items = value
                    .as_array()
                    .ok_or_else(|| PerimeterError::MalformedWire {
                        path: resolution_path.clone(),
                        reason: "expected a single-element list".to_string(),
                    })?;
                let [only] = items.as_slice() else {
                    return Err(PerimeterError::SingletonCardinality {
                        path: resolution_path,
                        len: items.len(),
                    });
                };
                let resolution = resolution_from_wire(&resolution_path, only)?;
                resolution.validate(&resolution_path)?;
                Some(resolution)
            }
        };

        Ok(Self {
            enabled: flat["enabled"].as_bool().unwrap_or(true),
            description: flat["description"].as_str().map(str::to_string),
            providers,
            consumers,
            ingress_services,
            resolve_labels_as,
        })
    }
}

fn resolution_from_wire(path: &str, value: &Value) -> Result<ResolveLabelsAs, PerimeterError> {
    let object = value
        .as_object()
        .ok_or_else(|| PerimeterError::MalformedWire {
            path: path.to_string(),
            reason: "expected an object".to_string(),
        })?;

    let mut resolution = ResolveLabelsAs::default();
    for (key, target) in [
        ("providers", &mut resolution.providers),
        ("consumers", &mut resolution.consumers),
    ] {
        if let Some(values) = object.get(key).filter(|v| !v.is_null()) {
            let items = values
                .as_array()
                .ok_or_else(|| PerimeterError::MalformedWire {
                    path: format!("{path}.{key}"),
                    reason: "expected an array of strings".to_string(),
                })?;
            for (index, item) in items.iter().enumerate() {
                target.push(wire_string(&format!("{path}.{key}[{index}]"), item)?);
            }
        }
    }

    Ok(resolution)
}
