//! Wifi interface seam
//!
//! The network stack's association primitives are opaque: request a join,
//! poll link status, tear down. The session layer owns the retry policy.

use async_trait::async_trait;

/// The wireless interface as seen by the network session
#[async_trait]
pub trait WifiInterface: Send {
    /// Request association with the given network; returns immediately,
    /// progress is observed through [`link_up`](Self::link_up)
    async fn start_join(&mut self, ssid: &str, password: &str);

    /// Whether the association is currently established
    async fn link_up(&mut self) -> bool;

    /// The radio's factory-programmed station address
    fn hardware_address(&self) -> [u8; 6];

    /// Drop the association; must be safe to call when not joined
    async fn leave(&mut self);
}

/// Host-bench wifi that associates on the first status poll
///
/// Stands in for the real radio the way a TCP-simulation mode stands in
/// for a real link during development.
#[derive(Debug)]
pub struct SimulatedWifi {
    address: [u8; 6],
    joined: bool,
}

impl SimulatedWifi {
    pub fn new(address: [u8; 6]) -> Self {
        Self {
            address,
            joined: false,
        }
    }
}

#[async_trait]
impl WifiInterface for SimulatedWifi {
    async fn start_join(&mut self, _ssid: &str, _password: &str) {
        self.joined = true;
    }

    async fn link_up(&mut self) -> bool {
        self.joined
    }

    fn hardware_address(&self) -> [u8; 6] {
        self.address
    }

    async fn leave(&mut self) {
        self.joined = false;
    }
}

/// Test wifi that comes up after a scripted number of status polls
#[cfg(test)]
pub(crate) struct ScriptedWifi {
    up_after: u32,
    address: [u8; 6],
    pub(crate) polls: std::sync::Arc<std::sync::atomic::AtomicU32>,
    pub(crate) leaves: std::sync::Arc<std::sync::atomic::AtomicU32>,
}

#[cfg(test)]
impl ScriptedWifi {
    /// `up_after = n` means the link reports up on the nth poll;
    /// `u32::MAX` never comes up
    pub(crate) fn new(up_after: u32) -> Self {
        Self {
            up_after,
            address: [0xAA, 0xBB, 0xCC, 0xDD, 0xEE, 0xFF],
            polls: std::sync::Arc::new(std::sync::atomic::AtomicU32::new(0)),
            leaves: std::sync::Arc::new(std::sync::atomic::AtomicU32::new(0)),
        }
    }
}

#[cfg(test)]
#[async_trait]
impl WifiInterface for ScriptedWifi {
    async fn start_join(&mut self, _ssid: &str, _password: &str) {}

    async fn link_up(&mut self) -> bool {
        use std::sync::atomic::Ordering;
        let poll = self.polls.fetch_add(1, Ordering::SeqCst) + 1;
        poll >= self.up_after
    }

    fn hardware_address(&self) -> [u8; 6] {
        self.address
    }

    async fn leave(&mut self) {
        self.leaves
            .fetch_add(1, std::sync::atomic::Ordering::SeqCst);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn simulated_wifi_joins_and_leaves() {
        let mut wifi = SimulatedWifi::new([0x02, 0, 0, 0, 0, 0x01]);
        assert!(!wifi.link_up().await);
        wifi.start_join("net", "pass").await;
        assert!(wifi.link_up().await);
        wifi.leave().await;
        assert!(!wifi.link_up().await);
        // leave is idempotent
        wifi.leave().await;
    }
}
