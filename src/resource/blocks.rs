//! Shared helpers for the repeated actor and ingress-service blocks of the
//! declared object types.

use serde_json::Value;

use crate::actor::{ActorContext, ActorReference, RawActorBlock, resolve_actor};
use crate::error::PerimeterError;
use crate::service::{IngressService, RawIngressService};

pub(crate) fn resolve_actors(
    ctx: &ActorContext,
    path: &str,
    blocks: &[RawActorBlock],
) -> Result<Vec<ActorReference>, PerimeterError> {
    blocks
        .iter()
        .enumerate()
        .map(|(index, block)| resolve_actor(ctx, &format!("{path}[{index}]"), block))
        .collect()
}

pub(crate) fn actors_to_wire(actors: &[ActorReference]) -> Value {
    Value::Array(actors.iter().map(ActorReference::to_wire).collect())
}

pub(crate) fn actors_from_wire(
    path: &str,
    value: &Value,
) -> Result<Vec<ActorReference>, PerimeterError> {
    // Extraction materializes absent allow-listed keys as explicit nulls.
    if value.is_null() {
        return Ok(Vec::new());
    }
    wire_array(path, value)?
        .iter()
        .enumerate()
        .map(|(index, member)| ActorReference::from_wire(&format!("{path}[{index}]"), member))
        .collect()
}

pub(crate) fn resolve_services(
    path: &str,
    blocks: &[RawIngressService],
) -> Result<Vec<IngressService>, PerimeterError> {
    blocks
        .iter()
        .enumerate()
        .map(|(index, block)| IngressService::resolve(&format!("{path}[{index}]"), block))
        .collect()
}

pub(crate) fn services_to_wire(services: &[IngressService]) -> Value {
    Value::Array(services.iter().map(IngressService::to_wire).collect())
}

pub(crate) fn services_from_wire(
    path: &str,
    value: &Value,
) -> Result<Vec<IngressService>, PerimeterError> {
    if value.is_null() {
        return Ok(Vec::new());
    }
    wire_array(path, value)?
        .iter()
        .enumerate()
        .map(|(index, member)| IngressService::from_wire(&format!("{path}[{index}]"), member))
        .collect()
}

pub(crate) fn wire_array<'a>(
    path: &str,
    value: &'a Value,
) -> Result<&'a Vec<Value>, PerimeterError> {
    value.as_array().ok_or_else(|| PerimeterError::MalformedWire {
        path: path.to_string(),
        reason: "expected an array".to_string(),
    })
}

pub(crate) fn wire_string(path: &str, value: &Value) -> Result<String, PerimeterError> {
    value
        .as_str()
        .map(str::to_string)
        .ok_or_else(|| PerimeterError::MalformedWire {
            path: path.to_string(),
            reason: "expected a string".to_string(),
        })
}
