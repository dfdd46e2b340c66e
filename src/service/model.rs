use serde::{Deserialize, Serialize};

/// IANA protocol numbers for the TCP/UDP port-carrying class.
pub const PROTO_TCP: u8 = 6;
pub const PROTO_UDP: u8 = 17;
/// IANA protocol numbers for the ICMP class.
pub const PROTO_ICMP: u8 = 1;
pub const PROTO_ICMPV6: u8 = 58;

pub(crate) fn is_port_class(protocol: u8) -> bool {
    protocol == PROTO_TCP || protocol == PROTO_UDP
}

pub(crate) fn is_icmp_class(protocol: u8) -> bool {
    protocol == PROTO_ICMP || protocol == PROTO_ICMPV6
}

/// One admitted traffic descriptor: a reference to a named service object,
/// or an explicit protocol descriptor. Built by
/// [`IngressService::resolve`](crate::service::coerce) which guarantees the
/// mutual-exclusion and field-legality invariants.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum IngressService {
    Reference {
        href: String,
    },
    Ports {
        protocol: u8,
        port: Option<u16>,
        to_port: Option<u16>,
        icmp_type: Option<u8>,
        icmp_code: Option<u8>,
    },
}

/// One ingress-service block as authored in flat configuration. Numeric
/// fields are carried as decimal strings so the configuration type can union
/// with non-numeric sentinels; the empty string is treated as absent, and
/// `"0"` is the distinguishable zero value.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
pub struct RawIngressService {
    #[serde(default)]
    pub href: Option<String>,
    #[serde(default)]
    pub proto: Option<String>,
    #[serde(default)]
    pub port: Option<String>,
    #[serde(default)]
    pub to_port: Option<String>,
    #[serde(default)]
    pub icmp_type: Option<String>,
    #[serde(default)]
    pub icmp_code: Option<String>,
}

impl RawIngressService {
    pub fn reference(href: impl Into<String>) -> Self {
        Self {
            href: Some(href.into()),
            ..Default::default()
        }
    }

    pub fn tcp(port: impl Into<String>) -> Self {
        Self {
            proto: Some(PROTO_TCP.to_string()),
            port: Some(port.into()),
            ..Default::default()
        }
    }
}
