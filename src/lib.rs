//! Client-side modeling layer for declarative security-policy objects.
//!
//! Translates between a flat, user-authored configuration of policy objects
//! (rules, rule sets, enforcement boundaries) and the nested wire documents
//! of a remote policy API. The building blocks are:
//!
//! - [`href`]: syntactic validation of org-scoped object addresses,
//! - [`actor`]: the polymorphic actor reference model with its
//!   exactly-one-populated-variant invariant,
//! - [`scope`]: ordered OR groups of AND'd label/label-group references,
//! - [`projector`]: the generic allow-listed extract/inject engine,
//! - [`service`]: ingress-service descriptors with numeric/string port and
//!   protocol coercion,
//! - [`resource`]: the declared policy object types assembled from the above,
//! - [`config`]: TOML loading of the flat configuration.
//!
//! Everything here is a pure, synchronous transformation: no I/O beyond
//! [`config`], no shared mutable state, and every pass allocates fresh
//! output structures. HTTP transport, credentials and state persistence
//! belong to the surrounding tool.

pub mod actor;
pub mod config;
pub mod error;
pub mod href;
pub mod projector;
pub mod resource;
pub mod scope;
pub mod service;

pub use config::{ConfigFile, Resources};
pub use error::PerimeterError;
