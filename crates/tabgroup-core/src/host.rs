//! Host binding
//!
//! The tab group never creates windows or draws anything itself. It talks to
//! the host through these traits and is driven by [`HostSignal`]s coming back.

use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Duration;

use crate::config::{StatusBarAttributes, TabStyle};
use crate::error::HostError;
use crate::group::WeakTabGroup;
use crate::tab::TabEntry;

/// Identifier handed out by the active window registry
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct WindowId(pub u64);

impl std::fmt::Display for WindowId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

pub trait HostBinding: Send + Sync {
    /// The window a tab group is launched from, if the app has one
    fn top_window(&self) -> Option<Arc<dyn HostWindow>>;
}

/// A host-owned window. Either the window a group launches from, or the
/// window the host created for the group.
pub trait HostWindow: Send + Sync {
    fn is_finishing(&self) -> bool;

    fn is_destroyed(&self) -> bool;

    fn is_alive(&self) -> bool {
        !self.is_finishing() && !self.is_destroyed()
    }

    /// Whether the window is attached to a display yet
    fn display_available(&self) -> bool {
        true
    }

    /// Run `continuation` once, when the window gets a display
    fn when_display_available(&self, continuation: Box<dyn FnOnce() + Send>);

    fn apply_theme(&self, theme: &str) -> Result<(), HostError>;

    /// Ask the host to create a window for the registered group
    fn launch_window(&self, request: &LaunchRequest) -> Result<(), HostError>;

    /// Build the native tab bar inside this window
    fn attach_view(&self, spec: ViewSpec) -> Arc<dyn TabSurface>;

    fn set_status_bar(&self, attributes: &StatusBarAttributes);

    fn finish_window(&self);
}

/// Native tab bar. Picked once per open by the host from [`ViewSpec::style`].
///
/// `select_tab` is a request: the surface confirms by calling
/// [`crate::TabGroup::on_tab_selected`], possibly before `select_tab` returns.
pub trait TabSurface: Send + Sync {
    fn add_tab(&self, tab: &Arc<TabEntry>, index: usize);

    fn remove_tab(&self, index: usize);

    fn select_tab(&self, tab: &Arc<TabEntry>);

    fn set_visibility(&self, visible: bool, animated: bool);

    fn set_navigation_enabled(&self, enabled: bool);

    fn update_title(&self, title: &str);
}

/// Process-wide collection of windows waiting for, or owning, a host window.
/// The host looks groups up here by the id carried in the launch request.
pub trait WindowRegistry: Send + Sync {
    fn register(&self, group: WeakTabGroup) -> WindowId;

    fn unregister(&self, id: WindowId);
}

pub type ScheduledTask = Box<dyn FnOnce() -> crate::Result<()> + Send>;

/// Delayed execution on the UI loop
pub trait Scheduler: Send + Sync {
    fn schedule(&self, delay: Duration, task: ScheduledTask);
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LaunchRequest {
    pub window_id: WindowId,
    pub animated: bool,
    pub enter_animation: Option<i32>,
    pub exit_animation: Option<i32>,
    pub exit_on_close: bool,
}

impl LaunchRequest {
    /// The same request with every animation turned off
    pub fn without_animation(&self) -> Self {
        Self {
            animated: false,
            enter_animation: None,
            exit_animation: None,
            ..self.clone()
        }
    }
}

/// What the host needs to build the native tab bar
#[derive(Debug, Clone)]
pub struct ViewSpec {
    /// Where the surface reports selection changes
    pub group: WeakTabGroup,
    pub style: TabStyle,
    pub tab_mode: Option<i32>,
    pub swipeable: bool,
    pub smooth_scroll_on_tab_click: bool,
}

/// Lifecycle callbacks from the host
#[derive(Clone)]
pub enum HostSignal {
    /// The host created the group's window
    Created(Arc<dyn HostWindow>),
    Resumed,
    Paused,
    /// The window was destroyed, possibly without a close request
    Destroyed,
    FocusChanged(bool),
    /// The window finished closing
    HostClosed,
}

impl std::fmt::Debug for HostSignal {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            HostSignal::Created(_) => write!(f, "Created"),
            HostSignal::Resumed => write!(f, "Resumed"),
            HostSignal::Paused => write!(f, "Paused"),
            HostSignal::Destroyed => write!(f, "Destroyed"),
            HostSignal::FocusChanged(focused) => write!(f, "FocusChanged({})", focused),
            HostSignal::HostClosed => write!(f, "HostClosed"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_without_animation() {
        let request = LaunchRequest {
            window_id: WindowId(3),
            animated: true,
            enter_animation: Some(10),
            exit_animation: Some(11),
            exit_on_close: true,
        };

        let retry = request.without_animation();
        assert!(!retry.animated);
        assert_eq!(retry.enter_animation, None);
        assert_eq!(retry.exit_animation, None);
        assert_eq!(retry.window_id, WindowId(3));
        assert!(retry.exit_on_close);
    }

    #[test]
    fn test_window_ids_order_by_issue() {
        let mut ids = vec![WindowId(3), WindowId(1), WindowId(2)];
        ids.sort();

        assert_eq!(ids, vec![WindowId(1), WindowId(2), WindowId(3)]);
        assert!(WindowId(1) < WindowId(10));
    }
}
