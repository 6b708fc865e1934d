//! Network reachability gate consulted before a fetch is started.

use std::net::{IpAddr, Ipv4Addr, Ipv6Addr, SocketAddr, UdpSocket};
use std::sync::atomic::{AtomicBool, Ordering};

/// Synchronous, non-blocking "is the device online" query.
pub trait Connectivity: Send + Sync {
    fn is_online(&self) -> bool;
}

/// Online when the host has a route towards a probe address.
///
/// Connecting a UDP socket only selects a route; no packet is sent, so the
/// check returns immediately either way.
#[derive(Debug, Clone, Copy)]
pub struct RouteConnectivity {
    probe: SocketAddr,
}

impl RouteConnectivity {
    pub const DEFAULT_PROBE: SocketAddr =
        SocketAddr::new(IpAddr::V4(Ipv4Addr::new(8, 8, 8, 8)), 53);

    #[must_use]
    pub fn new(probe: SocketAddr) -> Self {
        Self { probe }
    }
}

impl Default for RouteConnectivity {
    fn default() -> Self {
        Self::new(Self::DEFAULT_PROBE)
    }
}

impl Connectivity for RouteConnectivity {
    fn is_online(&self) -> bool {
        let local: SocketAddr = match self.probe {
            SocketAddr::V4(_) => (Ipv4Addr::UNSPECIFIED, 0).into(),
            SocketAddr::V6(_) => (Ipv6Addr::UNSPECIFIED, 0).into(),
        };
        match UdpSocket::bind(local).and_then(|socket| socket.connect(self.probe)) {
            Ok(()) => true,
            Err(e) => {
                tracing::debug!(probe = %self.probe, "no route: {e}");
                false
            }
        }
    }
}

/// A gate whose answer is set explicitly.
#[derive(Debug)]
pub struct FixedConnectivity {
    online: AtomicBool,
}

impl FixedConnectivity {
    #[must_use]
    pub fn new(online: bool) -> Self {
        Self {
            online: AtomicBool::new(online),
        }
    }

    pub fn set_online(&self, online: bool) {
        self.online.store(online, Ordering::Release);
    }
}

impl Connectivity for FixedConnectivity {
    fn is_online(&self) -> bool {
        self.online.load(Ordering::Acquire)
    }
}
