use std::str::FromStr;

use serde_json::{Map, Value, json};

use crate::error::PerimeterError;
use crate::href::{ObjectKind, validate_href};
use crate::projector::require_exactly_one;

use super::model::{IngressService, RawIngressService, is_icmp_class, is_port_class};

impl IngressService {
    /// Resolve one flat ingress-service block into its typed form.
    ///
    /// Enforces: exactly one of {href, explicit descriptor}; decimal-string
    /// to integer coercion per field; `to_port > port` strictly; no ICMP
    /// fields with TCP/UDP; no port fields with ICMP; `icmp_code` only
    /// alongside `icmp_type`. Violations report the offending field path and
    /// never clamp or default.
    pub fn resolve(path: &str, raw: &RawIngressService) -> Result<Self, PerimeterError> {
        let href = present(&raw.href);
        let proto = present(&raw.proto);
        let port = present(&raw.port);
        let to_port = present(&raw.to_port);
        let icmp_type = present(&raw.icmp_type);
        let icmp_code = present(&raw.icmp_code);

        let descriptor_set =
            [proto, port, to_port, icmp_type, icmp_code].iter().any(Option::is_some);

        require_exactly_one(&[("href", href.is_some()), ("proto", descriptor_set)]).map_err(
            |populated| PerimeterError::MutualExclusion {
                path: path.to_string(),
                expected: vec!["href".to_string(), "proto".to_string()],
                populated,
            },
        )?;

        if let Some(href) = href {
            validate_href(ObjectKind::Service, href)?;
            return Ok(IngressService::Reference {
                href: href.to_string(),
            });
        }

        let Some(proto) = proto else {
            return Err(PerimeterError::ProtocolFieldConflict {
                path: path.to_string(),
                reason: "port and icmp fields require proto".to_string(),
            });
        };
        let protocol: u8 = parse_field(path, "proto", proto)?;

        let port: Option<u16> = port.map(|v| parse_field(path, "port", v)).transpose()?;
        let to_port: Option<u16> = to_port.map(|v| parse_field(path, "to_port", v)).transpose()?;
        let icmp_type: Option<u8> = icmp_type
            .map(|v| parse_field(path, "icmp_type", v))
            .transpose()?;
        let icmp_code: Option<u8> = icmp_code
            .map(|v| parse_field(path, "icmp_code", v))
            .transpose()?;

        if is_port_class(protocol) {
            if icmp_type.is_some() || icmp_code.is_some() {
                return Err(PerimeterError::ProtocolFieldConflict {
                    path: path.to_string(),
                    reason: "icmp_type and icmp_code are not valid for TCP or UDP".to_string(),
                });
            }
        } else if is_icmp_class(protocol) {
            if port.is_some() || to_port.is_some() {
                return Err(PerimeterError::ProtocolFieldConflict {
                    path: path.to_string(),
                    reason: "port and to_port are not valid for ICMP".to_string(),
                });
            }
            if icmp_code.is_some() && icmp_type.is_none() {
                return Err(PerimeterError::ProtocolFieldConflict {
                    path: path.to_string(),
                    reason: "icmp_code requires icmp_type".to_string(),
                });
            }
        } else if port.is_some() || to_port.is_some() || icmp_type.is_some() || icmp_code.is_some()
        {
            return Err(PerimeterError::ProtocolFieldConflict {
                path: path.to_string(),
                reason: format!("protocol {protocol} does not carry port or icmp fields"),
            });
        }

        match (port, to_port) {
            (Some(port), Some(to_port)) if to_port <= port => {
                return Err(PerimeterError::PortRange {
                    path: path.to_string(),
                    port,
                    to_port,
                });
            }
            (None, Some(_)) => {
                return Err(PerimeterError::ProtocolFieldConflict {
                    path: path.to_string(),
                    reason: "to_port requires port".to_string(),
                });
            }
            _ => {}
        }

        Ok(IngressService::Ports {
            protocol,
            port,
            to_port,
            icmp_type,
            icmp_code,
        })
    }

    /// Render as the wire service object. Numeric fields are emitted as
    /// integers; absent optionals are omitted from the document.
    pub fn to_wire(&self) -> Value {
        match self {
            IngressService::Reference { href } => json!({ "href": href }),
            IngressService::Ports {
                protocol,
                port,
                to_port,
                icmp_type,
                icmp_code,
            } => {
                let mut object = Map::new();
                object.insert("proto".to_string(), json!(protocol));
                if let Some(port) = port {
                    object.insert("port".to_string(), json!(port));
                }
                if let Some(to_port) = to_port {
                    object.insert("to_port".to_string(), json!(to_port));
                }
                if let Some(icmp_type) = icmp_type {
                    object.insert("icmp_type".to_string(), json!(icmp_type));
                }
                if let Some(icmp_code) = icmp_code {
                    object.insert("icmp_code".to_string(), json!(icmp_code));
                }
                Value::Object(object)
            }
        }
    }

    /// Parse one wire service object.
    ///
    /// Wire integers are re-rendered as decimal strings and pushed through
    /// [`resolve`](Self::resolve) so the read path enforces the same
    /// invariants as the write path.
    pub fn from_wire(path: &str, value: &Value) -> Result<Self, PerimeterError> {
        let object = value
            .as_object()
            .ok_or_else(|| PerimeterError::MalformedWire {
                path: path.to_string(),
                reason: "ingress service must be an object".to_string(),
            })?;

        let raw = RawIngressService {
            href: wire_string(object, "href"),
            proto: wire_number(path, object, "proto")?,
            port: wire_number(path, object, "port")?,
            to_port: wire_number(path, object, "to_port")?,
            icmp_type: wire_number(path, object, "icmp_type")?,
            icmp_code: wire_number(path, object, "icmp_code")?,
        };

        Self::resolve(path, &raw)
    }

    /// Flat configuration rendering: integers back to decimal strings,
    /// absent optionals stay absent.
    pub fn to_raw(&self) -> RawIngressService {
        match self {
            IngressService::Reference { href } => RawIngressService::reference(href.clone()),
            IngressService::Ports {
                protocol,
                port,
                to_port,
                icmp_type,
                icmp_code,
            } => RawIngressService {
                href: None,
                proto: Some(protocol.to_string()),
                port: port.map(|v| v.to_string()),
                to_port: to_port.map(|v| v.to_string()),
                icmp_type: icmp_type.map(|v| v.to_string()),
                icmp_code: icmp_code.map(|v| v.to_string()),
            },
        }
    }
}

// The empty string is the "absent" sentinel at the configuration boundary;
// "0" parses to zero and stays distinguishable from absent.
fn present(field: &Option<String>) -> Option<&str> {
    field.as_deref().filter(|value| !value.is_empty())
}

fn parse_field<T: FromStr>(
    path: &str,
    field: &'static str,
    value: &str,
) -> Result<T, PerimeterError> {
    value.parse().map_err(|_| PerimeterError::InvalidNumber {
        path: path.to_string(),
        field,
        value: value.to_string(),
    })
}

fn wire_string(object: &Map<String, Value>, key: &str) -> Option<String> {
    object.get(key).and_then(Value::as_str).map(str::to_string)
}

fn wire_number(
    path: &str,
    object: &Map<String, Value>,
    key: &str,
) -> Result<Option<String>, PerimeterError> {
    match object.get(key) {
        None | Some(Value::Null) => Ok(None),
        Some(value) => value
            .as_u64()
            .map(|n| Some(n.to_string()))
            .ok_or_else(|| PerimeterError::MalformedWire {
                path: path.to_string(),
                reason: format!("{key} must be a non-negative integer"),
            }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    const SERVICE_HREF: &str = "/orgs/1/sec_policy/draft/services/5";

    fn raw(
        href: Option<&str>,
        proto: Option<&str>,
        port: Option<&str>,
        to_port: Option<&str>,
        icmp_type: Option<&str>,
        icmp_code: Option<&str>,
    ) -> RawIngressService {
        RawIngressService {
            href: href.map(String::from),
            proto: proto.map(String::from),
            port: port.map(String::from),
            to_port: to_port.map(String::from),
            icmp_type: icmp_type.map(String::from),
            icmp_code: icmp_code.map(String::from),
        }
    }

    #[test]
    fn reference_form_resolves() {
        let service =
            IngressService::resolve("ingress_services[0]", &RawIngressService::reference(SERVICE_HREF))
                .unwrap();
        assert_eq!(
            service,
            IngressService::Reference {
                href: SERVICE_HREF.to_string()
            }
        );
    }

    #[test]
    fn href_with_port_fails_mutual_exclusion() {
        let input = raw(Some(SERVICE_HREF), None, Some("80"), None, None, None);
        let err = IngressService::resolve("ingress_services[0]", &input).unwrap_err();
        match err {
            PerimeterError::MutualExclusion { populated, .. } => {
                assert_eq!(populated.len(), 2);
            }
            other => panic!("expected MutualExclusion, got {other}"),
        }
    }

    #[test]
    fn empty_block_fails_mutual_exclusion() {
        let err =
            IngressService::resolve("ingress_services[0]", &RawIngressService::default()).unwrap_err();
        assert!(matches!(err, PerimeterError::MutualExclusion { .. }));
    }

    #[test]
    fn empty_strings_count_as_absent() {
        let input = raw(Some(SERVICE_HREF), Some(""), Some(""), None, None, None);
        let service = IngressService::resolve("ingress_services[0]", &input).unwrap();
        assert!(matches!(service, IngressService::Reference { .. }));
    }

    #[rstest]
    #[case(raw(None, Some("6"), Some("80"), Some("81"), None, None), true, "tcp range")]
    #[case(raw(None, Some("6"), Some("80"), Some("80"), None, None), false, "to_port equal to port")]
    #[case(raw(None, Some("6"), Some("80"), Some("79"), None, None), false, "to_port below port")]
    #[case(raw(None, Some("17"), Some("53"), None, None, None), true, "udp single port")]
    #[case(raw(None, Some("6"), None, None, None, None), true, "tcp without ports")]
    #[case(raw(None, Some("6"), None, Some("90"), None, None), false, "to_port without port")]
    #[case(raw(None, Some("6"), Some("0"), Some("1"), None, None), true, "zero port is a value")]
    fn port_range_rules(
        #[case] input: RawIngressService,
        #[case] ok: bool,
        #[case] _description: &str,
    ) {
        let result = IngressService::resolve("ingress_services[0]", &input);
        assert_eq!(result.is_ok(), ok, "{result:?}");
    }

    #[test]
    fn equal_ports_report_port_range_error() {
        let input = raw(None, Some("6"), Some("80"), Some("80"), None, None);
        let err = IngressService::resolve("ingress_services[0]", &input).unwrap_err();
        match err {
            PerimeterError::PortRange { port, to_port, .. } => {
                assert_eq!(port, 80);
                assert_eq!(to_port, 80);
            }
            other => panic!("expected PortRange, got {other}"),
        }
    }

    #[rstest]
    #[case(raw(None, Some("1"), None, None, Some("8"), Some("0")), true, "icmp echo")]
    #[case(raw(None, Some("58"), None, None, Some("128"), None), true, "icmpv6 type only")]
    #[case(raw(None, Some("1"), Some("80"), None, Some("8"), None), false, "port with icmp protocol")]
    #[case(raw(None, Some("1"), None, None, None, Some("0")), false, "icmp_code without icmp_type")]
    #[case(raw(None, Some("6"), Some("80"), None, Some("8"), None), false, "icmp_type with tcp")]
    #[case(raw(None, Some("17"), None, None, None, Some("0")), false, "icmp_code with udp")]
    #[case(raw(None, Some("47"), None, None, None, None), true, "bare gre protocol")]
    #[case(raw(None, Some("47"), Some("80"), None, None, None), false, "port with gre protocol")]
    fn protocol_field_legality(
        #[case] input: RawIngressService,
        #[case] ok: bool,
        #[case] _description: &str,
    ) {
        let result = IngressService::resolve("ingress_services[0]", &input);
        assert_eq!(result.is_ok(), ok, "{result:?}");
    }

    #[rstest]
    #[case(raw(None, Some("tcp"), None, None, None, None), "proto", "non-numeric proto")]
    #[case(raw(None, Some("6"), Some("any"), None, None, None), "port", "non-numeric port")]
    #[case(raw(None, Some("6"), Some("70000"), None, None, None), "port", "port out of range")]
    #[case(raw(None, Some("256"), None, None, None, None), "proto", "proto out of range")]
    #[case(raw(None, Some("1"), None, None, Some("-1"), None), "icmp_type", "negative icmp type")]
    fn coercion_failures_name_the_field(
        #[case] input: RawIngressService,
        #[case] field: &str,
        #[case] _description: &str,
    ) {
        let err = IngressService::resolve("ingress_services[0]", &input).unwrap_err();
        match err {
            PerimeterError::InvalidNumber { field: f, .. } => assert_eq!(f, field),
            other => panic!("expected InvalidNumber, got {other}"),
        }
    }

    #[rstest]
    #[case(raw(None, Some("6"), Some("80"), Some("8080"), None, None), "tcp range")]
    #[case(raw(None, Some("1"), None, None, Some("8"), Some("0")), "icmp echo")]
    #[case(raw(Some(SERVICE_HREF), None, None, None, None, None), "service reference")]
    #[case(raw(None, Some("47"), None, None, None, None), "bare protocol")]
    fn wire_round_trip(#[case] input: RawIngressService, #[case] _description: &str) {
        let service = IngressService::resolve("ingress_services[0]", &input).unwrap();
        let wire = service.to_wire();
        let back = IngressService::from_wire("ingress_services[0]", &wire).unwrap();
        assert_eq!(back, service);
    }

    #[test]
    fn to_wire_emits_integers() {
        let service = IngressService::resolve(
            "ingress_services[0]",
            &raw(None, Some("6"), Some("80"), Some("8080"), None, None),
        )
        .unwrap();
        assert_eq!(
            service.to_wire(),
            json!({"proto": 6, "port": 80, "to_port": 8080})
        );
    }

    #[test]
    fn to_raw_renders_decimal_strings() {
        let service = IngressService::Ports {
            protocol: 6,
            port: Some(0),
            to_port: Some(1),
            icmp_type: None,
            icmp_code: None,
        };
        let raw = service.to_raw();
        assert_eq!(raw.proto.as_deref(), Some("6"));
        assert_eq!(raw.port.as_deref(), Some("0"));
        assert_eq!(raw.to_port.as_deref(), Some("1"));
        assert!(raw.icmp_type.is_none());
    }

    #[test]
    fn from_wire_rejects_fractional_numbers() {
        let err =
            IngressService::from_wire("ingress_services[0]", &json!({"proto": 6.5})).unwrap_err();
        assert!(matches!(err, PerimeterError::MalformedWire { .. }));
    }
}
