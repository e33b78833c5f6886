use std::collections::HashSet;
use std::net::{Ipv4Addr, SocketAddr, SocketAddrV4, TcpStream};
use std::ops::Range;
use std::sync::Arc;
use std::time::Duration;

use log::{info, warn};

use super::{Node, try_guard};
use crate::config::Config;

/// Finds other nodes reachable from `host:port`.
pub trait PeerDiscovery: Send + Sync {
    fn discover_peers(&self, host: &str, port: u16) -> HashSet<SocketAddr>;
}

impl<T: PeerDiscovery + ?Sized> PeerDiscovery for Arc<T> {
    fn discover_peers(&self, host: &str, port: u16) -> HashSet<SocketAddr> {
        (**self).discover_peers(host, port)
    }
}

/// Probes `host` with its last octet shifted by each offset, on every port in
/// range, and keeps the addresses that accept a TCP connection.
#[derive(Debug, Clone)]
pub struct TcpProbe {
    ip_offsets: Range<u8>,
    ports: Range<u16>,
    timeout: Duration,
}

impl TcpProbe {
    pub fn new(ip_offsets: Range<u8>, ports: Range<u16>, timeout: Duration) -> Self {
        Self {
            ip_offsets,
            ports,
            timeout,
        }
    }

    pub fn from_config(config: &Config) -> Self {
        Self::new(
            config.peer_ip_offset_range.clone(),
            config.peer_port_range.clone(),
            config.peer_probe_timeout,
        )
    }
}

impl PeerDiscovery for TcpProbe {
    fn discover_peers(&self, host: &str, port: u16) -> HashSet<SocketAddr> {
        let Ok(base) = host.parse::<Ipv4Addr>() else {
            warn!("NEIGHBOURS - cannot probe around non-IPv4 host {host:?}");
            return HashSet::new();
        };
        let me = SocketAddr::V4(SocketAddrV4::new(base, port));
        let [a, b, c, d] = base.octets();

        let mut found = HashSet::new();
        for guess_port in self.ports.clone() {
            for offset in self.ip_offsets.clone() {
                let Some(last) = d.checked_add(offset) else {
                    continue;
                };
                let guess_host = Ipv4Addr::new(a, b, c, last);
                let guess = SocketAddr::V4(SocketAddrV4::new(guess_host, guess_port));
                if guess != me && TcpStream::connect_timeout(&guess, self.timeout).is_ok() {
                    found.insert(guess);
                }
            }
        }
        found
    }
}

impl Node {
    /// Refresh the neighbour list from the discovery collaborator.
    pub fn set_neighbours(&self) {
        let mut found: Vec<SocketAddr> = self
            .discovery
            .discover_peers(&self.config.host, self.config.port)
            .into_iter()
            .collect();
        found.sort();
        info!("NEIGHBOURS - {} found: {:?}", found.len(), found);
        *self.neighbours.write().expect("rwlock poisoned") = found;
    }

    /// Guarded refresh; skipped when another refresh is in flight.
    pub fn sync_neighbours(&self) -> bool {
        let Some(_guard) = try_guard(&self.sync_guard, "NEIGHBOURS - refresh") else {
            return false;
        };
        self.set_neighbours();
        true
    }
}
