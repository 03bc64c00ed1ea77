//! Recorded host commands

use parking_lot::Mutex;
use serde::Serialize;
use std::sync::Arc;

use tabgroup_core::{LaunchRequest, StatusBarAttributes, TabId, TabStyle, WindowId};

/// Commands received by a tab bar
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "command", rename_all = "camelCase")]
pub enum SurfaceCommand {
    AddTab { tab: TabId, index: usize },
    RemoveTab { index: usize },
    SelectTab { tab: TabId },
    SetVisibility { visible: bool, animated: bool },
    SetNavigationEnabled { enabled: bool },
    UpdateTitle { title: String },
}

/// Commands received by host windows
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "command", content = "args", rename_all = "camelCase")]
pub enum HostCommand {
    LaunchWindow(LaunchRequest),
    ApplyTheme(String),
    AttachView { window: WindowId, style: TabStyle },
    SetStatusBar(StatusBarAttributes),
    FinishWindow(Option<WindowId>),
    Surface(SurfaceCommand),
}

/// Shared, ordered record of every command sent to the headless host
#[derive(Debug, Clone, Default)]
pub struct CommandLog {
    entries: Arc<Mutex<Vec<HostCommand>>>,
}

impl CommandLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&self, command: HostCommand) {
        tracing::trace!(?command, "Host command");
        self.entries.lock().push(command);
    }

    pub fn snapshot(&self) -> Vec<HostCommand> {
        self.entries.lock().clone()
    }

    /// Only the tab bar commands, in order
    pub fn surface_commands(&self) -> Vec<SurfaceCommand> {
        self.entries
            .lock()
            .iter()
            .filter_map(|c| match c {
                HostCommand::Surface(command) => Some(command.clone()),
                _ => None,
            })
            .collect()
    }

    pub fn count<F>(&self, predicate: F) -> usize
    where
        F: Fn(&HostCommand) -> bool,
    {
        self.entries.lock().iter().filter(|c| predicate(c)).count()
    }

    pub fn len(&self) -> usize {
        self.entries.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.lock().is_empty()
    }

    pub fn clear(&self) {
        self.entries.lock().clear();
    }
}
