//! Tab entry
//!
//! A tab is an identity handle. It knows its title, the native window it
//! shows once that window exists, and which group it currently belongs to.
//! The group reference is weak: a tab never keeps its group alive.

use chrono::{DateTime, Utc};
use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use uuid::Uuid;

use tabgroup_events::{EventDispatcher, ListenerId};

use crate::event::{FocusEvent, TabGroupEvent};
use crate::group::{TabGroup, WeakTabGroup};
use crate::host::WindowId;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TabId(Uuid);

impl TabId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for TabId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for TabId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

struct TabEntryState {
    title: String,
    window: Option<WindowId>,
    group: WeakTabGroup,
    active: bool,
    focused: bool,
    last_selected_at: Option<DateTime<Utc>>,
}

pub struct TabEntry {
    id: TabId,
    created_at: DateTime<Utc>,
    state: Mutex<TabEntryState>,
    events: EventDispatcher<TabGroupEvent>,
}

impl TabEntry {
    pub fn new(title: impl Into<String>) -> Arc<Self> {
        Arc::new(Self {
            id: TabId::new(),
            created_at: Utc::now(),
            state: Mutex::new(TabEntryState {
                title: title.into(),
                window: None,
                group: WeakTabGroup::default(),
                active: false,
                focused: false,
                last_selected_at: None,
            }),
            events: EventDispatcher::new(),
        })
    }

    pub fn id(&self) -> TabId {
        self.id
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    pub fn title(&self) -> String {
        self.state.lock().title.clone()
    }

    pub fn set_title(&self, title: impl Into<String>) {
        self.state.lock().title = title.into();
    }

    /// Native window shown by this tab, if it has been opened
    pub fn window(&self) -> Option<WindowId> {
        self.state.lock().window
    }

    /// Called by the host once the tab's own window exists
    pub fn attach_window(&self, window: WindowId) {
        self.state.lock().window = Some(window);
    }

    /// The group this tab belongs to, if that group is still alive
    pub fn tab_group(&self) -> Option<TabGroup> {
        let group = self.state.lock().group.clone();
        group.upgrade()
    }

    pub fn is_active(&self) -> bool {
        self.state.lock().active
    }

    pub fn is_focused(&self) -> bool {
        self.state.lock().focused
    }

    pub fn last_selected_at(&self) -> Option<DateTime<Utc>> {
        self.state.lock().last_selected_at
    }

    pub fn events(&self) -> &EventDispatcher<TabGroupEvent> {
        &self.events
    }

    pub fn on<F>(&self, name: &'static str, listener: F) -> ListenerId
    where
        F: Fn(&TabGroupEvent) + Send + Sync + 'static,
    {
        self.events.on(name, listener)
    }

    pub(crate) fn set_tab_group(&self, group: WeakTabGroup) {
        self.state.lock().group = group;
    }

    pub(crate) fn clear_tab_group(&self) {
        self.state.lock().group = WeakTabGroup::default();
    }

    pub(crate) fn on_selection_changed(&self, selected: bool) {
        let mut state = self.state.lock();
        state.active = selected;
        if selected {
            state.last_selected_at = Some(Utc::now());
        }
    }

    pub(crate) fn on_focus_changed(&self, focused: bool, payload: Option<FocusEvent>) {
        self.state.lock().focused = focused;
        self.events.emit(TabGroupEvent::focus_changed(focused, payload));
    }

    /// Fire `selected` on this tab, then bubble it to the owning group
    pub(crate) fn fire_selected(&self, payload: FocusEvent) {
        self.events.emit(TabGroupEvent::Selected(payload.clone()));

        if let Some(group) = self.tab_group() {
            group.events().emit(TabGroupEvent::Selected(payload));
        }
    }

    pub(crate) fn fire_safe_area_changed(&self) {
        if self.window().is_some() {
            self.events.emit(TabGroupEvent::SafeAreaChanged);
        }
    }

    /// Drop the native window handle without closing the tab
    pub(crate) fn release_views(&self) {
        self.state.lock().window = None;
    }

    /// Close the tab's window
    pub(crate) fn close(&self) {
        {
            let mut state = self.state.lock();
            state.window = None;
            state.active = false;
            state.focused = false;
        }

        tracing::debug!(tab_id = %self.id, "Closed tab");

        self.events.emit(TabGroupEvent::Close);
    }
}

impl PartialEq for TabEntry {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for TabEntry {}

impl std::fmt::Debug for TabEntry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let state = self.state.lock();
        f.debug_struct("TabEntry")
            .field("id", &self.id)
            .field("title", &state.title)
            .field("window", &state.window)
            .field("active", &state.active)
            .finish()
    }
}
