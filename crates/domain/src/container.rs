use std::collections::BTreeMap;
use std::net::IpAddr;

/// Label a container sets to pick the network whose address gets published.
pub const NETWORK_LABEL: &str = "dps.network";
pub const NETWORK_DPS: &str = "dps";
pub const NETWORK_BRIDGE: &str = "bridge";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContainerNetwork {
    pub name: String,
    pub ipv4: Option<IpAddr>,
    pub ipv6: Option<IpAddr>,
}

/// What the lifecycle watcher knows about a running container.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ContainerInfo {
    pub id: String,
    pub name: String,
    pub hostname: Option<String>,
    pub domain_name: Option<String>,
    pub labels: BTreeMap<String, String>,
    pub networks: Vec<ContainerNetwork>,
    pub host_machine_ip: Option<IpAddr>,
}

impl ContainerInfo {
    /// Names this container answers to: its hostname (with and without the
    /// container's own domain) and `<name>.<container_domain>`.
    pub fn hostnames(&self, container_domain: &str) -> Vec<String> {
        let mut names: Vec<String> = Vec::with_capacity(3);
        let mut push = |name: String| {
            if !names.iter().any(|n| n.eq_ignore_ascii_case(&name)) {
                names.push(name);
            }
        };

        if let Some(hostname) = self.hostname.as_deref().filter(|h| !h.is_empty()) {
            push(hostname.to_string());
            if let Some(domain) = self.domain_name.as_deref().filter(|d| !d.is_empty()) {
                push(format!("{}.{}", hostname, domain));
            }
        }
        let name = self.name.trim_start_matches('/');
        if !name.is_empty() && !container_domain.is_empty() {
            push(format!("{}.{}", name, container_domain));
        }
        names
    }

    /// Network names in preference order: the labelled network, `dps`,
    /// `bridge`, then every other attached network by name.
    pub fn network_preference(&self) -> Vec<&str> {
        let mut order: Vec<&str> = Vec::with_capacity(self.networks.len() + 3);
        if let Some(label) = self.labels.get(NETWORK_LABEL) {
            order.push(label.as_str());
        }
        for preferred in [NETWORK_DPS, NETWORK_BRIDGE] {
            if !order.contains(&preferred) {
                order.push(preferred);
            }
        }
        let mut others: Vec<&str> = self
            .networks
            .iter()
            .map(|n| n.name.as_str())
            .filter(|n| !order.contains(n))
            .collect();
        others.sort_unstable();
        order.extend(others);
        order
    }

    fn best_address(&self, pick: impl Fn(&ContainerNetwork) -> Option<IpAddr>) -> Option<IpAddr> {
        self.network_preference()
            .into_iter()
            .filter_map(|name| self.networks.iter().find(|n| n.name == name))
            .find_map(pick)
    }

    /// Falls back to the host machine address when no network has one.
    pub fn best_ipv4(&self) -> Option<IpAddr> {
        self.best_address(|n| n.ipv4)
            .or(self.host_machine_ip.filter(|ip| ip.is_ipv4()))
    }

    pub fn best_ipv6(&self) -> Option<IpAddr> {
        self.best_address(|n| n.ipv6)
            .or(self.host_machine_ip.filter(|ip| ip.is_ipv6()))
    }
}
