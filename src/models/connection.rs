//! Social account connection state

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::PlatformId;

/// Connection status of one platform
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ConnectionStatus {
    /// Not linked
    #[default]
    Disconnected,
    /// OAuth flow in progress
    Connecting,
    /// Linked
    Connected,
}

impl ConnectionStatus {
    /// Get emoji for status
    pub const fn emoji(&self) -> &'static str {
        match self {
            Self::Disconnected => "○",
            Self::Connecting => "⏳",
            Self::Connected => "✅",
        }
    }

    /// Get status as string
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Disconnected => "Not connected",
            Self::Connecting => "Connecting...",
            Self::Connected => "Connected",
        }
    }
}

/// Connection status for every platform
#[derive(Debug, Clone)]
pub struct SocialConnections {
    statuses: BTreeMap<PlatformId, ConnectionStatus>,
}

impl Default for SocialConnections {
    fn default() -> Self {
        Self {
            statuses: PlatformId::all()
                .iter()
                .map(|p| (*p, ConnectionStatus::Disconnected))
                .collect(),
        }
    }
}

impl SocialConnections {
    /// Status of a platform
    pub fn status(&self, platform: PlatformId) -> ConnectionStatus {
        self.statuses.get(&platform).copied().unwrap_or_default()
    }

    /// Whether a platform is linked
    pub fn is_connected(&self, platform: PlatformId) -> bool {
        self.status(platform) == ConnectionStatus::Connected
    }

    /// Number of linked platforms
    pub fn connected_count(&self) -> usize {
        self.statuses
            .values()
            .filter(|s| **s == ConnectionStatus::Connected)
            .count()
    }

    /// Start connecting; returns false when already connecting or connected
    pub fn begin_connect(&mut self, platform: PlatformId) -> bool {
        let status = self.statuses.entry(platform).or_default();
        if *status != ConnectionStatus::Disconnected {
            return false;
        }
        *status = ConnectionStatus::Connecting;
        true
    }

    /// Finish a connect attempt
    pub fn finish_connect(&mut self, platform: PlatformId, success: bool) {
        let status = self.statuses.entry(platform).or_default();
        if *status == ConnectionStatus::Connecting {
            *status = if success {
                ConnectionStatus::Connected
            } else {
                ConnectionStatus::Disconnected
            };
        }
    }

    /// Drop every in-progress connect back to Disconnected
    pub fn abort_pending(&mut self) -> usize {
        let mut aborted = 0;
        for status in self.statuses.values_mut() {
            if *status == ConnectionStatus::Connecting {
                *status = ConnectionStatus::Disconnected;
                aborted += 1;
            }
        }
        aborted
    }

    /// Unlink a platform (also aborts an in-progress connect)
    pub fn disconnect(&mut self, platform: PlatformId) {
        self.statuses.insert(platform, ConnectionStatus::Disconnected);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_connect_flow() {
        let mut connections = SocialConnections::default();
        assert!(connections.begin_connect(PlatformId::LinkedIn));
        assert!(!connections.begin_connect(PlatformId::LinkedIn));
        assert_eq!(
            connections.status(PlatformId::LinkedIn),
            ConnectionStatus::Connecting
        );

        connections.finish_connect(PlatformId::LinkedIn, true);
        assert!(connections.is_connected(PlatformId::LinkedIn));
        assert_eq!(connections.connected_count(), 1);
    }

    #[test]
    fn test_late_result_after_disconnect_is_ignored() {
        let mut connections = SocialConnections::default();
        connections.begin_connect(PlatformId::Twitter);
        connections.disconnect(PlatformId::Twitter);
        connections.finish_connect(PlatformId::Twitter, true);
        assert!(!connections.is_connected(PlatformId::Twitter));
    }

    #[test]
    fn test_failed_connect_reverts() {
        let mut connections = SocialConnections::default();
        connections.begin_connect(PlatformId::Facebook);
        connections.finish_connect(PlatformId::Facebook, false);
        assert_eq!(
            connections.status(PlatformId::Facebook),
            ConnectionStatus::Disconnected
        );
    }

    #[test]
    fn test_abort_pending_keeps_linked_accounts() {
        let mut connections = SocialConnections::default();
        connections.begin_connect(PlatformId::Twitter);
        connections.finish_connect(PlatformId::Twitter, true);
        connections.begin_connect(PlatformId::Instagram);

        assert_eq!(connections.abort_pending(), 1);
        assert!(connections.is_connected(PlatformId::Twitter));
        assert!(connections.begin_connect(PlatformId::Instagram));
    }
}
