//! Tab group error types

use thiserror::Error;

use crate::tab::TabId;

#[derive(Error, Debug)]
pub enum TabGroupError {
    #[error("Invalid tab index: {0}")]
    InvalidTabIndex(i64),

    #[error("Cannot activate tab not in this group: {0}")]
    ForeignTab(TabId),

    #[error("Invalid state transition: {from} -> {to}")]
    InvalidTransition { from: String, to: String },

    #[error("Tab group failed to open: {0}")]
    LaunchFailed(#[source] HostError),

    #[error("Configuration error: {0}")]
    Config(#[from] serde_json::Error),
}

/// Failures reported by host collaborators
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum HostError {
    #[error("Window launch failed: {0}")]
    Launch(String),

    #[error("Theme not found: {0}")]
    ThemeNotFound(String),

    #[error("Host window is gone")]
    WindowGone,
}
