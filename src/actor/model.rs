use serde::{Deserialize, Serialize};

use crate::href::ObjectKind;

/// The kinds of reference an actor block can resolve to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActorKind {
    All,
    Label,
    LabelGroup,
    Workload,
    VirtualService,
    VirtualServer,
    IpList,
}

impl ActorKind {
    /// The sub-block name carrying this kind in flat configuration and on
    /// the wire.
    pub const fn field_name(self) -> &'static str {
        match self {
            ActorKind::All => "actors",
            ActorKind::Label => "label",
            ActorKind::LabelGroup => "label_group",
            ActorKind::Workload => "workload",
            ActorKind::VirtualService => "virtual_service",
            ActorKind::VirtualServer => "virtual_server",
            ActorKind::IpList => "ip_list",
        }
    }

    /// Href object kind for reference-carrying actor kinds.
    pub const fn object_kind(self) -> Option<ObjectKind> {
        match self {
            ActorKind::All => None,
            ActorKind::Label => Some(ObjectKind::Label),
            ActorKind::LabelGroup => Some(ObjectKind::LabelGroup),
            ActorKind::Workload => Some(ObjectKind::Workload),
            ActorKind::VirtualService => Some(ObjectKind::VirtualService),
            ActorKind::VirtualServer => Some(ObjectKind::VirtualServer),
            ActorKind::IpList => Some(ObjectKind::IpList),
        }
    }
}

/// Enumerated values of the "all objects of this class" sentinel actor.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AllSentinel {
    /// All internally managed objects.
    Ams,
    /// The host of a container workload.
    ContainerHost,
}

impl AllSentinel {
    pub const fn as_str(self) -> &'static str {
        match self {
            AllSentinel::Ams => "ams",
            AllSentinel::ContainerHost => "container_host",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "ams" => Some(AllSentinel::Ams),
            "container_host" => Some(AllSentinel::ContainerHost),
            _ => None,
        }
    }
}

/// A label or label-group reference with its exclusion flag. Exclusion means
/// the reference subtracts from the matched set instead of adding to it.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct LabelSelector {
    pub href: String,
    #[serde(default)]
    pub exclusion: bool,
}

impl LabelSelector {
    pub fn new(href: impl Into<String>) -> Self {
        Self {
            href: href.into(),
            exclusion: false,
        }
    }
}

/// A resolved policy-object endpoint. Construction goes through
/// [`resolve_actor`](super::resolve::resolve_actor) or
/// [`from_wire`](ActorReference::from_wire), both of which guarantee the
/// exactly-one-populated-reference invariant, so holders never re-check it.
#[derive(Debug, Clone, PartialEq)]
pub enum ActorReference {
    All(AllSentinel),
    Label { href: String, exclusion: bool },
    LabelGroup { href: String, exclusion: bool },
    Workload { href: String },
    VirtualService { href: String },
    VirtualServer { href: String },
    IpList { href: String },
}

impl ActorReference {
    pub fn kind(&self) -> ActorKind {
        match self {
            ActorReference::All(_) => ActorKind::All,
            ActorReference::Label { .. } => ActorKind::Label,
            ActorReference::LabelGroup { .. } => ActorKind::LabelGroup,
            ActorReference::Workload { .. } => ActorKind::Workload,
            ActorReference::VirtualService { .. } => ActorKind::VirtualService,
            ActorReference::VirtualServer { .. } => ActorKind::VirtualServer,
            ActorReference::IpList { .. } => ActorKind::IpList,
        }
    }

    /// Href of the referenced object; `None` for the sentinel variant.
    pub fn href(&self) -> Option<&str> {
        match self {
            ActorReference::All(_) => None,
            ActorReference::Label { href, .. }
            | ActorReference::LabelGroup { href, .. }
            | ActorReference::Workload { href }
            | ActorReference::VirtualService { href }
            | ActorReference::VirtualServer { href }
            | ActorReference::IpList { href } => Some(href),
        }
    }
}

/// One actor block as authored in flat configuration: a set of optional
/// sub-blocks of which exactly one may be populated.
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
pub struct RawActorBlock {
    #[serde(default)]
    pub actors: Option<String>,
    #[serde(default)]
    pub label: Option<LabelSelector>,
    #[serde(default)]
    pub label_group: Option<LabelSelector>,
    #[serde(default)]
    pub workload: Option<String>,
    #[serde(default)]
    pub virtual_service: Option<String>,
    #[serde(default)]
    pub virtual_server: Option<String>,
    #[serde(default)]
    pub ip_list: Option<String>,
}

impl RawActorBlock {
    pub fn ams() -> Self {
        Self {
            actors: Some("ams".to_string()),
            ..Default::default()
        }
    }

    pub fn label(href: impl Into<String>) -> Self {
        Self {
            label: Some(LabelSelector::new(href)),
            ..Default::default()
        }
    }

    pub fn label_group(href: impl Into<String>) -> Self {
        Self {
            label_group: Some(LabelSelector::new(href)),
            ..Default::default()
        }
    }

    pub fn ip_list(href: impl Into<String>) -> Self {
        Self {
            ip_list: Some(href.into()),
            ..Default::default()
        }
    }
}
