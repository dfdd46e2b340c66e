use std::{collections::HashMap, fmt, sync::LazyLock};

use regex::Regex;
use uuid::Uuid;

use crate::error::PerimeterError;

/// Policy object kinds addressable by href.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ObjectKind {
    Label,
    LabelGroup,
    IpList,
    Service,
    RuleSet,
    EnforcementBoundary,
    VirtualService,
    VirtualServer,
    Workload,
    Ven,
    ContainerCluster,
    PairingProfile,
}

impl ObjectKind {
    pub const ALL: [ObjectKind; 12] = [
        ObjectKind::Label,
        ObjectKind::LabelGroup,
        ObjectKind::IpList,
        ObjectKind::Service,
        ObjectKind::RuleSet,
        ObjectKind::EnforcementBoundary,
        ObjectKind::VirtualService,
        ObjectKind::VirtualServer,
        ObjectKind::Workload,
        ObjectKind::Ven,
        ObjectKind::ContainerCluster,
        ObjectKind::PairingProfile,
    ];

    /// Path segment used for this kind in hrefs.
    pub const fn path_segment(self) -> &'static str {
        match self {
            ObjectKind::Label => "labels",
            ObjectKind::LabelGroup => "label_groups",
            ObjectKind::IpList => "ip_lists",
            ObjectKind::Service => "services",
            ObjectKind::RuleSet => "rule_sets",
            ObjectKind::EnforcementBoundary => "enforcement_boundaries",
            ObjectKind::VirtualService => "virtual_services",
            ObjectKind::VirtualServer => "virtual_servers",
            ObjectKind::Workload => "workloads",
            ObjectKind::Ven => "vens",
            ObjectKind::ContainerCluster => "container_clusters",
            ObjectKind::PairingProfile => "pairing_profiles",
        }
    }

    /// Kinds addressed under a policy version (`draft`, `active`, or a
    /// numbered version). The remaining kinds use the flat
    /// `/orgs/{org}/{type}/{id}` form.
    const fn versioned(self) -> bool {
        matches!(
            self,
            ObjectKind::LabelGroup
                | ObjectKind::IpList
                | ObjectKind::Service
                | ObjectKind::RuleSet
                | ObjectKind::EnforcementBoundary
                | ObjectKind::VirtualService
                | ObjectKind::VirtualServer
        )
    }

    /// Kinds whose trailing identifier is an opaque UUID rather than a
    /// positive integer.
    const fn uuid_keyed(self) -> bool {
        matches!(
            self,
            ObjectKind::LabelGroup
                | ObjectKind::VirtualService
                | ObjectKind::Ven
                | ObjectKind::EnforcementBoundary
        )
    }
}

impl fmt::Display for ObjectKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ObjectKind::Label => "label",
            ObjectKind::LabelGroup => "label_group",
            ObjectKind::IpList => "ip_list",
            ObjectKind::Service => "service",
            ObjectKind::RuleSet => "rule_set",
            ObjectKind::EnforcementBoundary => "enforcement_boundary",
            ObjectKind::VirtualService => "virtual_service",
            ObjectKind::VirtualServer => "virtual_server",
            ObjectKind::Workload => "workload",
            ObjectKind::Ven => "ven",
            ObjectKind::ContainerCluster => "container_cluster",
            ObjectKind::PairingProfile => "pairing_profile",
        };
        f.write_str(name)
    }
}

// Per-kind path grammars, compiled once. The trailing identifier is captured
// as an opaque segment and checked separately so the error can say whether an
// integer or a UUID was expected.
static HREF_PATTERNS: LazyLock<HashMap<ObjectKind, Regex>> = LazyLock::new(|| {
    ObjectKind::ALL
        .iter()
        .map(|&kind| {
            let pattern = if kind.versioned() {
                format!(
                    r"^/orgs/[1-9][0-9]*/sec_policy/(?:draft|active|[1-9][0-9]*)/{}/([^/]+)$",
                    kind.path_segment()
                )
            } else {
                format!(r"^/orgs/[1-9][0-9]*/{}/([^/]+)$", kind.path_segment())
            };
            let regex = Regex::new(&pattern).expect("href pattern must compile");
            (kind, regex)
        })
        .collect()
});

/// Validate that `href` matches the addressing grammar for `kind`.
///
/// Purely syntactic: no existence check is performed against the remote
/// system. Rejects empty strings, wrong segment counts, non-numeric
/// org/version segments, and malformed trailing identifiers.
///
/// # Examples
/// ```
/// use perimeter::href::{ObjectKind, validate_href};
///
/// validate_href(ObjectKind::Service, "/orgs/1/sec_policy/draft/services/5").unwrap();
/// assert!(validate_href(ObjectKind::Service, "/orgs/1/services/5").is_err());
/// ```
pub fn validate_href(kind: ObjectKind, href: &str) -> Result<(), PerimeterError> {
    check_href(kind, href).map_err(|reason| PerimeterError::InvalidHref {
        kind,
        href: href.to_string(),
        reason,
    })
}

fn check_href(kind: ObjectKind, href: &str) -> Result<(), String> {
    if href.is_empty() {
        return Err("empty value".to_string());
    }

    let pattern = &HREF_PATTERNS[&kind];
    let captures = pattern.captures(href).ok_or_else(|| {
        if kind.versioned() {
            format!(
                "expected /orgs/<org>/sec_policy/<draft|active|version>/{}/<id>",
                kind.path_segment()
            )
        } else {
            format!("expected /orgs/<org>/{}/<id>", kind.path_segment())
        }
    })?;

    let id = &captures[1];
    if kind.uuid_keyed() {
        // Canonical hyphenated form only; Uuid::try_parse also accepts
        // braced/simple forms, so the length is pinned first.
        if id.len() != 36 || Uuid::try_parse(id).is_err() {
            return Err(format!("'{id}' is not a canonical UUID identifier"));
        }
    } else if !id.bytes().all(|b| b.is_ascii_digit()) || id.starts_with('0') {
        return Err(format!("'{id}' is not a positive integer identifier"));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(ObjectKind::Label, "/orgs/1/labels/9", "label with integer id")]
    #[case(
        ObjectKind::LabelGroup,
        "/orgs/1/sec_policy/draft/label_groups/6506b99e-6a1e-4e9b-8e20-7fb6a9a299fc",
        "label group with uuid"
    )]
    #[case(
        ObjectKind::IpList,
        "/orgs/12/sec_policy/active/ip_lists/7",
        "active ip list"
    )]
    #[case(
        ObjectKind::Service,
        "/orgs/1/sec_policy/42/services/5",
        "numbered policy version"
    )]
    #[case(
        ObjectKind::EnforcementBoundary,
        "/orgs/3/sec_policy/draft/enforcement_boundaries/0b1a9eaf-5e13-47a4-b6c4-fd06c2f70013",
        "boundary with uuid"
    )]
    #[case(ObjectKind::Workload, "/orgs/1/workloads/10", "unversioned workload")]
    #[case(
        ObjectKind::Ven,
        "/orgs/1/vens/6506b99e-6a1e-4e9b-8e20-7fb6a9a299fc",
        "unversioned ven with uuid"
    )]
    #[case(
        ObjectKind::PairingProfile,
        "/orgs/1/pairing_profiles/3",
        "pairing profile"
    )]
    fn valid_hrefs_pass(#[case] kind: ObjectKind, #[case] href: &str, #[case] _description: &str) {
        validate_href(kind, href).unwrap();
    }

    #[rstest]
    #[case(ObjectKind::Label, "", "empty string")]
    #[case(ObjectKind::Label, "/orgs/1/labels", "missing trailing id")]
    #[case(ObjectKind::Label, "/orgs/0/labels/9", "zero org id")]
    #[case(ObjectKind::Label, "/orgs/x/labels/9", "non-numeric org id")]
    #[case(ObjectKind::Label, "/orgs/1/labels/09", "leading zero id")]
    #[case(ObjectKind::Label, "/orgs/1/sec_policy/draft/labels/9", "versioned form for unversioned kind")]
    #[case(ObjectKind::Service, "/orgs/1/services/5", "unversioned form for versioned kind")]
    #[case(ObjectKind::Service, "/orgs/1/sec_policy/frozen/services/5", "unknown policy version")]
    #[case(ObjectKind::Service, "/orgs/1/sec_policy/0/services/5", "zero policy version")]
    #[case(
        ObjectKind::LabelGroup,
        "/orgs/1/sec_policy/draft/label_groups/42",
        "integer id for uuid kind"
    )]
    #[case(
        ObjectKind::LabelGroup,
        "/orgs/1/sec_policy/draft/label_groups/6506b99e6a1e4e9b8e207fb6a9a299fc",
        "unhyphenated uuid"
    )]
    #[case(
        ObjectKind::Workload,
        "/orgs/1/workloads/6506b99e-6a1e-4e9b-8e20-7fb6a9a299fc",
        "uuid id for integer kind"
    )]
    #[case(ObjectKind::Service, "orgs/1/sec_policy/draft/services/5", "missing leading slash")]
    #[case(ObjectKind::Service, "/orgs/1/sec_policy/draft/services/5/extra", "extra segment")]
    fn invalid_hrefs_fail(#[case] kind: ObjectKind, #[case] href: &str, #[case] _description: &str) {
        let result = validate_href(kind, href);
        assert!(result.is_err());
        if let Err(PerimeterError::InvalidHref { kind: k, href: h, .. }) = result {
            assert_eq!(k, kind);
            assert_eq!(h, href);
        } else {
            panic!("expected InvalidHref");
        }
    }

    #[test]
    fn error_reason_names_expected_grammar() {
        let err = validate_href(ObjectKind::Service, "/orgs/1/services/5").unwrap_err();
        let message = err.to_string();
        assert!(message.contains("sec_policy"));
        assert!(message.contains("services"));
    }
}
