//! Tab group lifecycle
//!
//! ```text
//! Closed
//!   ↓ open()
//! Opening ──(launch aborted)──→ Closed
//!   ↓ host created the window
//! Open
//!   ↓ close()
//! Closing
//!   ↓ host confirmed the window closed
//! Closed
//! ```

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LifecycleState {
    /// No host window; mutations are buffered
    #[default]
    Closed,
    /// Launch requested, waiting for the host to create the window
    Opening,
    /// Native surface attached, commands are forwarded immediately
    Open,
    /// Window finish requested, waiting for the host to confirm
    Closing,
}

impl LifecycleState {
    /// Check if transition to another state is valid
    pub fn can_transition_to(&self, target: LifecycleState) -> bool {
        match (self, target) {
            (LifecycleState::Closed, LifecycleState::Opening) => true,
            (LifecycleState::Opening, LifecycleState::Open) => true,
            // close() before the host created the window
            (LifecycleState::Opening, LifecycleState::Closing) => true,
            // Launch gave up, or the host went away while waiting
            (LifecycleState::Opening, LifecycleState::Closed) => true,
            (LifecycleState::Open, LifecycleState::Closing) => true,
            (LifecycleState::Closing, LifecycleState::Closed) => true,
            _ => false,
        }
    }

    pub fn is_open(&self) -> bool {
        matches!(self, LifecycleState::Open)
    }

    pub fn is_closed(&self) -> bool {
        matches!(self, LifecycleState::Closed)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            LifecycleState::Closed => "closed",
            LifecycleState::Opening => "opening",
            LifecycleState::Open => "open",
            LifecycleState::Closing => "closing",
        }
    }
}

impl std::fmt::Display for LifecycleState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for LifecycleState {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "closed" => Ok(LifecycleState::Closed),
            "opening" => Ok(LifecycleState::Opening),
            "open" => Ok(LifecycleState::Open),
            "closing" => Ok(LifecycleState::Closing),
            _ => Err(format!("Unknown lifecycle state: {}", s)),
        }
    }
}
