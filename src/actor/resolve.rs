use crate::error::PerimeterError;
use crate::href::validate_href;
use crate::projector::require_exactly_one;

use super::context::ActorContext;
use super::model::{ActorKind, ActorReference, AllSentinel, RawActorBlock};

/// Resolve one flat actor block into a typed reference.
///
/// Enforces, in order: exactly one populated sub-block, the context's kind
/// allow-list, sentinel value legality, and the href grammar of the selected
/// kind. `path` names the block position for error reporting (e.g.
/// `providers[0]`).
///
/// # Examples
/// ```
/// use perimeter::actor::{
///     ActorReference, AllSentinel, RawActorBlock, SECURITY_RULE_PROVIDERS, resolve_actor,
/// };
///
/// let actor = resolve_actor(&SECURITY_RULE_PROVIDERS, "providers[0]", &RawActorBlock::ams());
/// assert_eq!(actor.unwrap(), ActorReference::All(AllSentinel::Ams));
/// ```
pub fn resolve_actor(
    ctx: &ActorContext,
    path: &str,
    raw: &RawActorBlock,
) -> Result<ActorReference, PerimeterError> {
    let fields = [
        (ActorKind::All.field_name(), raw.actors.is_some()),
        (ActorKind::Label.field_name(), raw.label.is_some()),
        (ActorKind::LabelGroup.field_name(), raw.label_group.is_some()),
        (ActorKind::Workload.field_name(), raw.workload.is_some()),
        (
            ActorKind::VirtualService.field_name(),
            raw.virtual_service.is_some(),
        ),
        (
            ActorKind::VirtualServer.field_name(),
            raw.virtual_server.is_some(),
        ),
        (ActorKind::IpList.field_name(), raw.ip_list.is_some()),
    ];

    require_exactly_one(&fields).map_err(|populated| {
        if populated.is_empty() {
            PerimeterError::ActorRequired {
                path: path.to_string(),
            }
        } else {
            PerimeterError::ActorCardinality {
                path: path.to_string(),
                populated,
            }
        }
    })?;

    let (kind, reference) = if let Some(value) = &raw.actors {
        let sentinel =
            AllSentinel::parse(value).ok_or_else(|| PerimeterError::SentinelNotAllowed {
                path: path.to_string(),
                value: value.clone(),
            })?;
        (ActorKind::All, ActorReference::All(sentinel))
    } else if let Some(selector) = &raw.label {
        (
            ActorKind::Label,
            ActorReference::Label {
                href: selector.href.clone(),
                exclusion: selector.exclusion,
            },
        )
    } else if let Some(selector) = &raw.label_group {
        (
            ActorKind::LabelGroup,
            ActorReference::LabelGroup {
                href: selector.href.clone(),
                exclusion: selector.exclusion,
            },
        )
    } else if let Some(href) = &raw.workload {
        (
            ActorKind::Workload,
            ActorReference::Workload { href: href.clone() },
        )
    } else if let Some(href) = &raw.virtual_service {
        (
            ActorKind::VirtualService,
            ActorReference::VirtualService { href: href.clone() },
        )
    } else if let Some(href) = &raw.virtual_server {
        (
            ActorKind::VirtualServer,
            ActorReference::VirtualServer { href: href.clone() },
        )
    } else if let Some(href) = &raw.ip_list {
        (
            ActorKind::IpList,
            ActorReference::IpList { href: href.clone() },
        )
    } else {
        // The cardinality check above guarantees one branch matched.
        return Err(PerimeterError::ActorRequired {
            path: path.to_string(),
        });
    };

    if !ctx.allows(kind) {
        return Err(PerimeterError::ActorNotAllowed {
            path: path.to_string(),
            kind: kind.field_name(),
        });
    }

    if let ActorReference::All(sentinel) = &reference
        && !ctx.allows_sentinel(*sentinel)
    {
        return Err(PerimeterError::SentinelNotAllowed {
            path: path.to_string(),
            value: sentinel.as_str().to_string(),
        });
    }

    if let (Some(object_kind), Some(href)) = (kind.object_kind(), reference.href()) {
        validate_href(object_kind, href)?;
    }

    Ok(reference)
}
