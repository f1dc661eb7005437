#[cfg(test)]
#[path = "state_test.rs"]
mod state_test;

use std::fmt;

use crate::common::NetworkEvent;

/// Lifecycle of one session.
///
/// Transitions that do not apply to the current state return `None` and
/// leave the state untouched.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SessionState {
    #[default]
    Inactive,
    /// Connection task spawned, join not yet announced.
    Joining,
    Active,
    /// Transport failure; handlers stay bound and the state returns to
    /// `Active` if the transport reconnects.
    Errored,
}

impl SessionState {
    pub fn activate(self) -> Option<Self> {
        match self {
            Self::Inactive => Some(Self::Joining),
            Self::Joining | Self::Active | Self::Errored => None,
        }
    }

    pub fn deactivate(self) -> Option<Self> {
        match self {
            Self::Inactive => None,
            Self::Joining | Self::Active | Self::Errored => Some(Self::Inactive),
        }
    }

    /// State after an inbound network event, if it changes.
    pub fn on_event(self, event: &NetworkEvent) -> Option<Self> {
        match (self, event) {
            (Self::Joining | Self::Errored, NetworkEvent::Connected) => Some(Self::Active),
            (
                Self::Joining | Self::Active,
                NetworkEvent::ConnectError(_) | NetworkEvent::Disconnected(_),
            ) => Some(Self::Errored),
            _ => None,
        }
    }
}

impl fmt::Display for SessionState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::Inactive => "inactive",
            Self::Joining => "joining",
            Self::Active => "connected",
            Self::Errored => "connection error",
        };
        f.write_str(label)
    }
}
