//! Events emitted by tab groups and their tabs

use serde::Serialize;
use tabgroup_events::Event;

use crate::tab::TabId;

/// Payload of the focus, blur and selected events fired on a selection change.
///
/// `source` is the tab receiving the event: the newly selected tab for focus
/// and selected, the previously selected tab for blur.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FocusEvent {
    pub source: Option<TabId>,
    pub previous_tab: Option<TabId>,
    /// -1 when there was no previous selection
    pub previous_index: i32,
    pub tab: TabId,
    pub index: i32,
}

impl FocusEvent {
    /// Copy of this payload addressed to another source
    pub fn with_source(&self, source: Option<TabId>) -> Self {
        Self {
            source,
            ..self.clone()
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", content = "data", rename_all = "lowercase")]
pub enum TabGroupEvent {
    Open,
    Close,
    Selected(FocusEvent),
    /// `None` when focus returned without a selection change
    Focus(Option<FocusEvent>),
    Blur(Option<FocusEvent>),
    #[serde(rename = "safeareachanged")]
    SafeAreaChanged,
    Error(String),
}

impl TabGroupEvent {
    pub const OPEN: &'static str = "open";
    pub const CLOSE: &'static str = "close";
    pub const SELECTED: &'static str = "selected";
    pub const FOCUS: &'static str = "focus";
    pub const BLUR: &'static str = "blur";
    pub const SAFE_AREA_CHANGED: &'static str = "safeareachanged";
    pub const ERROR: &'static str = "error";

    pub fn focus_changed(focused: bool, payload: Option<FocusEvent>) -> Self {
        if focused {
            TabGroupEvent::Focus(payload)
        } else {
            TabGroupEvent::Blur(payload)
        }
    }
}

impl Event for TabGroupEvent {
    fn name(&self) -> &'static str {
        match self {
            TabGroupEvent::Open => Self::OPEN,
            TabGroupEvent::Close => Self::CLOSE,
            TabGroupEvent::Selected(_) => Self::SELECTED,
            TabGroupEvent::Focus(_) => Self::FOCUS,
            TabGroupEvent::Blur(_) => Self::BLUR,
            TabGroupEvent::SafeAreaChanged => Self::SAFE_AREA_CHANGED,
            TabGroupEvent::Error(_) => Self::ERROR,
        }
    }
}
