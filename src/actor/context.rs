use super::model::{ActorKind, AllSentinel};

/// Per-context allow-list restricting which actor kinds and sentinel values
/// a block may resolve to. Each policy object position declares one.
#[derive(Debug, Clone, Copy)]
pub struct ActorContext {
    pub name: &'static str,
    pub allowed: &'static [ActorKind],
    pub sentinels: &'static [AllSentinel],
}

impl ActorContext {
    pub fn allows(&self, kind: ActorKind) -> bool {
        self.allowed.contains(&kind)
    }

    pub fn allows_sentinel(&self, sentinel: AllSentinel) -> bool {
        self.sentinels.contains(&sentinel)
    }
}

pub const SECURITY_RULE_PROVIDERS: ActorContext = ActorContext {
    name: "security rule providers",
    allowed: &[
        ActorKind::All,
        ActorKind::Label,
        ActorKind::LabelGroup,
        ActorKind::Workload,
        ActorKind::VirtualService,
        ActorKind::VirtualServer,
        ActorKind::IpList,
    ],
    sentinels: &[AllSentinel::Ams],
};

pub const SECURITY_RULE_CONSUMERS: ActorContext = ActorContext {
    name: "security rule consumers",
    allowed: &[
        ActorKind::All,
        ActorKind::Label,
        ActorKind::LabelGroup,
        ActorKind::Workload,
        ActorKind::VirtualService,
        ActorKind::VirtualServer,
        ActorKind::IpList,
    ],
    sentinels: &[AllSentinel::Ams, AllSentinel::ContainerHost],
};

/// Enforcement boundaries match on labels, label groups and IP lists only.
pub const ENFORCEMENT_BOUNDARY_ACTORS: ActorContext = ActorContext {
    name: "enforcement boundary actors",
    allowed: &[
        ActorKind::All,
        ActorKind::Label,
        ActorKind::LabelGroup,
        ActorKind::IpList,
    ],
    sentinels: &[AllSentinel::Ams],
};

pub const IP_TABLE_RULE_ACTORS: ActorContext = ActorContext {
    name: "ip table rule actors",
    allowed: &[
        ActorKind::All,
        ActorKind::Label,
        ActorKind::LabelGroup,
        ActorKind::Workload,
    ],
    sentinels: &[AllSentinel::Ams],
};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn boundary_context_excludes_workload_family() {
        assert!(!ENFORCEMENT_BOUNDARY_ACTORS.allows(ActorKind::Workload));
        assert!(!ENFORCEMENT_BOUNDARY_ACTORS.allows(ActorKind::VirtualService));
        assert!(!ENFORCEMENT_BOUNDARY_ACTORS.allows(ActorKind::VirtualServer));
        assert!(ENFORCEMENT_BOUNDARY_ACTORS.allows(ActorKind::LabelGroup));
    }

    #[test]
    fn container_host_is_consumer_only() {
        assert!(SECURITY_RULE_CONSUMERS.allows_sentinel(AllSentinel::ContainerHost));
        assert!(!SECURITY_RULE_PROVIDERS.allows_sentinel(AllSentinel::ContainerHost));
        assert!(SECURITY_RULE_PROVIDERS.allows_sentinel(AllSentinel::Ams));
    }
}
