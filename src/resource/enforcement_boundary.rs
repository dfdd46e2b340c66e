use serde::{Deserialize, Serialize};
use serde_json::{Map, Value, json};

use crate::actor::{ActorReference, ENFORCEMENT_BOUNDARY_ACTORS, RawActorBlock};
use crate::error::PerimeterError;
use crate::projector::{FieldSpec, ProjectionSpec, extract, inject};
use crate::service::{IngressService, RawIngressService};

use super::blocks::{
    actors_from_wire, actors_to_wire, resolve_actors, resolve_services, services_from_wire,
    services_to_wire, wire_string,
};

/// Fields an enforcement boundary operation may touch on the wire.
pub static ENFORCEMENT_BOUNDARY_PROJECTION: ProjectionSpec = ProjectionSpec::new(&[
    FieldSpec::scalar("name"),
    FieldSpec::scalar("providers"),
    FieldSpec::scalar("consumers"),
    FieldSpec::scalar("ingress_services"),
]);

/// One enforcement boundary as authored in flat configuration.
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
pub struct RawEnforcementBoundary {
    pub name: String,
    #[serde(default)]
    pub providers: Vec<RawActorBlock>,
    #[serde(default)]
    pub consumers: Vec<RawActorBlock>,
    #[serde(default)]
    pub ingress_services: Vec<RawIngressService>,
}

/// A validated enforcement boundary. Actor blocks are restricted to labels,
/// label groups and IP lists on both sides.
#[derive(Debug, Clone, PartialEq)]
pub struct EnforcementBoundary {
    pub name: String,
    pub providers: Vec<ActorReference>,
    pub consumers: Vec<ActorReference>,
    pub ingress_services: Vec<IngressService>,
}

impl EnforcementBoundary {
    pub fn resolve(path: &str, raw: &RawEnforcementBoundary) -> Result<Self, PerimeterError> {
        let providers = resolve_actors(
            &ENFORCEMENT_BOUNDARY_ACTORS,
            &format!("{path}.providers"),
            &raw.providers,
        )?;
        let consumers = resolve_actors(
            &ENFORCEMENT_BOUNDARY_ACTORS,
            &format!("{path}.consumers"),
            &raw.consumers,
        )?;
        let ingress_services =
            resolve_services(&format!("{path}.ingress_services"), &raw.ingress_services)?;

        Ok(Self {
            name: raw.name.clone(),
            providers,
            consumers,
            ingress_services,
        })
    }

    pub fn to_wire(&self) -> Result<Value, PerimeterError> {
        let mut flat = Map::new();
        flat.insert("name".to_string(), json!(self.name));
        flat.insert("providers".to_string(), actors_to_wire(&self.providers));
        flat.insert("consumers".to_string(), actors_to_wire(&self.consumers));
        flat.insert(
            "ingress_services".to_string(),
            services_to_wire(&self.ingress_services),
        );

        inject(&flat, &ENFORCEMENT_BOUNDARY_PROJECTION)
    }

    pub fn from_wire(path: &str, document: &Value) -> Result<Self, PerimeterError> {
        let flat = extract(document, &ENFORCEMENT_BOUNDARY_PROJECTION);

        Ok(Self {
            name: wire_string(&format!("{path}.name"), &flat["name"])?,
            providers: actors_from_wire(&format!("{path}.providers"), &flat["providers"])?,
            consumers: actors_from_wire(&format!("{path}.consumers"), &flat["consumers"])?,
            ingress_services: services_from_wire(
                &format!("{path}.ingress_services"),
                &flat["ingress_services"],
            )?,
        })
    }
}
