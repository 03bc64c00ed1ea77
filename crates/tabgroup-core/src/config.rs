//! Tab group configuration

use serde::{Deserialize, Serialize};
use std::sync::Arc;

use crate::tab::TabEntry;
use crate::tab_list::TabSelector;
use crate::Result;

/// Native surface flavour, chosen once when the host window is created
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum TabStyle {
    #[default]
    TabLayout,
    BottomNavigation,
    ExperimentalBottomNavigation,
}

impl TabStyle {
    pub fn is_bottom_navigation(&self) -> bool {
        matches!(
            self,
            TabStyle::BottomNavigation | TabStyle::ExperimentalBottomNavigation
        )
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct StatusBarAttributes {
    /// Dark status bar icons on a light background
    pub light: bool,
    pub color: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct TabGroupConfig {
    /// Window title, pushed to the chrome once the group is open
    pub title: Option<String>,
    pub tab_bar_visible: bool,
    pub enabled: bool,
    /// Let the surface derive the title from the active tab
    pub auto_tab_title: bool,
    pub style: TabStyle,
    /// Forwarded to tab-layout surfaces only
    pub tab_mode: Option<i32>,
    /// Theme name, applied before launch for bottom navigation styles
    pub theme: Option<String>,
    pub status_bar: Option<StatusBarAttributes>,
    pub swipeable: bool,
    pub smooth_scroll_on_tab_click: bool,
    pub exit_on_close: bool,
}

impl Default for TabGroupConfig {
    fn default() -> Self {
        Self {
            title: None,
            tab_bar_visible: true,
            enabled: true,
            auto_tab_title: false,
            style: TabStyle::default(),
            tab_mode: None,
            theme: None,
            status_bar: None,
            swipeable: true,
            smooth_scroll_on_tab_click: true,
            exit_on_close: false,
        }
    }
}

impl TabGroupConfig {
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }
}

/// Options for a single `open()` call
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct OpenOptions {
    pub animated: bool,
    pub enter_animation: Option<i32>,
    pub exit_animation: Option<i32>,
}

impl Default for OpenOptions {
    fn default() -> Self {
        Self {
            animated: true,
            enter_animation: None,
            exit_animation: None,
        }
    }
}

/// Everything a tab group can be created with.
///
/// Applied in order: tabs, active tab, tab bar visibility, enabled,
/// auto tab title, title. The active tab is resolved against the tabs, so
/// they have to be present first.
#[derive(Debug, Clone, Default)]
pub struct TabGroupOptions {
    pub config: TabGroupConfig,
    pub tabs: Vec<Arc<TabEntry>>,
    pub active_tab: Option<TabSelector>,
}

impl TabGroupOptions {
    pub fn with_tabs(tabs: Vec<Arc<TabEntry>>) -> Self {
        Self {
            tabs,
            ..Self::default()
        }
    }
}
