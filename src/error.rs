use thiserror::Error;

use std::path::PathBuf;

use crate::href::ObjectKind;

#[derive(Debug, Error)]
pub enum PerimeterError {
    #[error("invalid {kind} href '{href}': {reason}")]
    InvalidHref {
        kind: ObjectKind,
        href: String,
        reason: String,
    },

    #[error("{path}: an actor reference is required")]
    ActorRequired { path: String },

    #[error("{path}: only one actor is allowed per block, found {}", populated.join(", "))]
    ActorCardinality { path: String, populated: Vec<String> },

    #[error("{path}: actor kind '{kind}' is not allowed in this context")]
    ActorNotAllowed { path: String, kind: &'static str },

    #[error("{path}: sentinel value '{value}' is not allowed in this context")]
    SentinelNotAllowed { path: String, value: String },

    #[error("scope group {group}: {count} members exceed the maximum of {max}")]
    ScopeCardinality {
        group: usize,
        count: usize,
        max: usize,
    },

    #[error("{path}: to_port {to_port} must be greater than port {port}")]
    PortRange {
        path: String,
        port: u16,
        to_port: u16,
    },

    #[error("{path}: {reason}")]
    ProtocolFieldConflict { path: String, reason: String },

    #[error("{path}: exactly one of {} must be set, found {}", expected.join(", "), populated.len())]
    MutualExclusion {
        path: String,
        expected: Vec<String>,
        populated: Vec<String>,
    },

    #[error("{path}: expected a single-element list, found {len} elements")]
    SingletonCardinality { path: String, len: usize },

    #[error("{path}: '{value}' is not a valid {field} number")]
    InvalidNumber {
        path: String,
        field: &'static str,
        value: String,
    },

    #[error("{path}: malformed wire document: {reason}")]
    MalformedWire { path: String, reason: String },

    #[error("failed to parse config {path}: {source}")]
    ConfigParse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}
