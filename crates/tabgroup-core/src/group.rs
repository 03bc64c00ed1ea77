//! Tab group controller
//!
//! Owns the ordered tab list, the active selection and the open/close
//! lifecycle. Everything set before the host window exists is buffered and
//! flushed once when the window is created.
//!
//! The group state is never locked while calling into the host, a tab or a
//! listener, so native callbacks may re-enter the group at any point.

use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use std::sync::{Arc, Weak};
use std::time::Duration;
use uuid::Uuid;

use tabgroup_events::{EventDispatcher, ListenerId};

use crate::config::{OpenOptions, TabGroupConfig, TabGroupOptions};
use crate::error::TabGroupError;
use crate::event::{FocusEvent, TabGroupEvent};
use crate::host::{
    HostBinding, HostSignal, HostWindow, LaunchRequest, Scheduler, TabSurface, ViewSpec, WindowId,
    WindowRegistry,
};
use crate::state::LifecycleState;
use crate::tab::TabEntry;
use crate::tab_list::{TabList, TabSelector};
use crate::Result;

/// Delay before the single no-animation launch retry
pub const LAUNCH_RETRY_DELAY: Duration = Duration::from_millis(500);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct GroupId(Uuid);

impl std::fmt::Display for GroupId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// External collaborators of a tab group
#[derive(Clone)]
pub struct HostContext {
    pub host: Arc<dyn HostBinding>,
    pub registry: Arc<dyn WindowRegistry>,
    pub scheduler: Arc<dyn Scheduler>,
}

/// Argument of the deprecated [`TabGroup::disable_tab_navigation`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DisableTabNavigation {
    Flag(bool),
    Options { disabled: bool, animated: bool },
}

#[derive(Debug)]
enum Selection {
    None,
    /// Recorded before the native surface existed
    Pending(TabSelector),
    /// Confirmed by the native surface
    Active(Arc<TabEntry>),
}

impl Selection {
    fn refers_to(&self, tab: &TabEntry) -> bool {
        match self {
            Selection::None => false,
            Selection::Pending(selector) => selector.refers_to(tab),
            Selection::Active(active) => **active == *tab,
        }
    }
}

/// Native handles dropped when the group starts closing
struct Released {
    window: Option<Arc<dyn HostWindow>>,
    window_id: Option<WindowId>,
    tabs: Vec<Arc<TabEntry>>,
}

struct GroupState {
    lifecycle: LifecycleState,
    tabs: TabList,
    selection: Selection,
    /// Title, visibility, enabled and auto title live here in every state
    config: TabGroupConfig,
    /// Present while Opening (once created) and Open
    window: Option<Weak<dyn HostWindow>>,
    surface: Option<Arc<dyn TabSurface>>,
    window_id: Option<WindowId>,
    is_focused: bool,
}

impl GroupState {
    fn transition_to(&mut self, group_id: GroupId, to: LifecycleState) -> Result<()> {
        if !self.lifecycle.can_transition_to(to) {
            return Err(TabGroupError::InvalidTransition {
                from: self.lifecycle.to_string(),
                to: to.to_string(),
            });
        }

        tracing::debug!(
            group_id = %group_id,
            from = %self.lifecycle,
            to = %to,
            "Tab group state transition"
        );

        self.lifecycle = to;
        Ok(())
    }

    fn release_native(&mut self) -> Released {
        self.surface = None;
        Released {
            window: self.window.take().and_then(|w| w.upgrade()),
            window_id: self.window_id.take(),
            tabs: self.tabs.snapshot(),
        }
    }

    /// Active tab, falling back to the pending selection, then the first tab
    fn active_tab(&self) -> Option<Arc<TabEntry>> {
        match &self.selection {
            Selection::Active(tab) => Some(Arc::clone(tab)),
            Selection::Pending(selector) => {
                self.tabs.resolve(selector).ok().or_else(|| self.tabs.first())
            }
            Selection::None => self.tabs.first(),
        }
    }
}

pub(crate) struct GroupInner {
    id: GroupId,
    state: Mutex<GroupState>,
    events: EventDispatcher<TabGroupEvent>,
    context: HostContext,
}

/// Tab group controller handle. Clones share the same group.
#[derive(Clone)]
pub struct TabGroup {
    inner: Arc<GroupInner>,
}

/// Non-owning tab group handle
#[derive(Clone, Default)]
pub struct WeakTabGroup {
    inner: Weak<GroupInner>,
}

impl WeakTabGroup {
    pub fn upgrade(&self) -> Option<TabGroup> {
        self.inner.upgrade().map(|inner| TabGroup { inner })
    }
}

impl std::fmt::Debug for WeakTabGroup {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.inner.upgrade() {
            Some(inner) => write!(f, "WeakTabGroup({})", inner.id),
            None => write!(f, "WeakTabGroup(dropped)"),
        }
    }
}

impl TabGroup {
    pub fn new(context: HostContext) -> Self {
        Self::with_config(context, TabGroupConfig::default())
    }

    fn with_config(context: HostContext, config: TabGroupConfig) -> Self {
        Self {
            inner: Arc::new(GroupInner {
                id: GroupId(Uuid::new_v4()),
                state: Mutex::new(GroupState {
                    lifecycle: LifecycleState::Closed,
                    tabs: TabList::default(),
                    selection: Selection::None,
                    config,
                    window: None,
                    surface: None,
                    window_id: None,
                    is_focused: false,
                }),
                events: EventDispatcher::new(),
                context,
            }),
        }
    }

    /// Create a group and apply the creation options through the regular setters
    pub fn with_options(context: HostContext, options: TabGroupOptions) -> Self {
        let TabGroupOptions {
            config,
            tabs,
            active_tab,
        } = options;
        let group = Self::with_config(context, config.clone());

        group.set_tabs(tabs);
        if let Some(active_tab) = active_tab {
            group.set_active_tab(active_tab);
        }
        group.set_tab_bar_visible(config.tab_bar_visible);
        group.set_enabled(config.enabled);
        group.set_auto_tab_title(config.auto_tab_title);
        if let Some(title) = config.title {
            group.set_title(title);
        }

        group
    }

    pub fn id(&self) -> GroupId {
        self.inner.id
    }

    pub fn downgrade(&self) -> WeakTabGroup {
        WeakTabGroup {
            inner: Arc::downgrade(&self.inner),
        }
    }

    pub fn ptr_eq(&self, other: &TabGroup) -> bool {
        Arc::ptr_eq(&self.inner, &other.inner)
    }

    pub fn state(&self) -> LifecycleState {
        self.inner.state.lock().lifecycle
    }

    pub fn is_focused(&self) -> bool {
        self.inner.state.lock().is_focused
    }

    /// Registry id while the group is opening or open
    pub fn window_id(&self) -> Option<WindowId> {
        self.inner.state.lock().window_id
    }

    pub fn events(&self) -> &EventDispatcher<TabGroupEvent> {
        &self.inner.events
    }

    pub fn on<F>(&self, name: &'static str, listener: F) -> ListenerId
    where
        F: Fn(&TabGroupEvent) + Send + Sync + 'static,
    {
        self.inner.events.on(name, listener)
    }

    /// The native surface, if the group is open and its window still alive
    fn live_surface(&self) -> Option<Arc<dyn TabSurface>> {
        let (window, surface) = {
            let state = self.inner.state.lock();
            if !state.lifecycle.is_open() {
                return None;
            }
            (state.window.as_ref()?.upgrade(), state.surface.clone()?)
        };

        match window {
            Some(window) if window.is_alive() => Some(surface),
            _ => {
                tracing::debug!(group_id = %self.inner.id, "Host window gone, skipping native command");
                None
            }
        }
    }

    // === Tabs ===

    pub fn tabs(&self) -> Vec<Arc<TabEntry>> {
        self.inner.state.lock().tabs.snapshot()
    }

    pub fn tab_count(&self) -> usize {
        self.inner.state.lock().tabs.len()
    }

    pub fn tab_index(&self, tab: &TabEntry) -> Option<usize> {
        self.inner.state.lock().tabs.index_of(tab)
    }

    /// Append a tab. A tab owned by another group is moved here.
    pub fn add_tab(&self, tab: &Arc<TabEntry>) {
        if let Some(owner) = tab.tab_group() {
            if owner.ptr_eq(self) {
                tracing::error!(group_id = %self.inner.id, tab_id = %tab.id(), "Tab already in this group");
                return;
            }
            owner.remove_tab(tab);
        }

        let index = {
            let mut state = self.inner.state.lock();
            if !state.tabs.push(Arc::clone(tab)) {
                return;
            }
            tab.set_tab_group(self.downgrade());
            state.tabs.len() - 1
        };

        tracing::debug!(group_id = %self.inner.id, tab_id = %tab.id(), index, "Added tab");

        if let Some(surface) = self.live_surface() {
            surface.add_tab(tab, index);
        }
    }

    /// Remove a tab. Tabs not in this group are ignored.
    pub fn remove_tab(&self, tab: &Arc<TabEntry>) {
        if self.detach_tab(tab) && self.state().is_open() {
            self.select_default_tab();
        }
    }

    /// Remove a tab and clear its group reference. Returns true if the
    /// removed tab was the active one.
    fn detach_tab(&self, tab: &Arc<TabEntry>) -> bool {
        let (index, was_selected) = {
            let mut state = self.inner.state.lock();
            let Some(index) = state.tabs.remove(tab) else {
                return false;
            };
            let was_selected = state.selection.refers_to(tab);
            if was_selected {
                state.selection = Selection::None;
            }
            (index, was_selected)
        };

        if let Some(surface) = self.live_surface() {
            surface.remove_tab(index);
        }
        tab.clear_tab_group();

        tracing::debug!(group_id = %self.inner.id, tab_id = %tab.id(), index, "Removed tab");

        if was_selected {
            tab.on_selection_changed(false);
            if tab.is_focused() {
                tab.on_focus_changed(false, None);
            }
            tracing::debug!(group_id = %self.inner.id, "Removed active tab, falling back to first tab");
        }
        was_selected
    }

    /// Replace every tab
    pub fn set_tabs<I>(&self, tabs: I)
    where
        I: IntoIterator<Item = Arc<TabEntry>>,
    {
        let mut lost_selection = false;
        for tab in self.tabs() {
            lost_selection |= self.detach_tab(&tab);
        }
        for tab in tabs {
            self.add_tab(&tab);
        }

        if lost_selection && self.state().is_open() {
            self.select_default_tab();
        }
    }

    // === Selection ===

    /// The active tab. With no selection made yet this is the first tab.
    pub fn active_tab(&self) -> Option<Arc<TabEntry>> {
        self.inner.state.lock().active_tab()
    }

    /// Ask the native surface to show a tab.
    ///
    /// Before the surface exists the selector is stored as is and resolved
    /// when the group opens. Once open, invalid indices and tabs from other
    /// groups are logged and ignored. The selection itself only changes when
    /// the surface confirms through [`TabGroup::on_tab_selected`].
    pub fn set_active_tab(&self, selector: impl Into<TabSelector>) {
        let selector = selector.into();
        let resolved = {
            let mut state = self.inner.state.lock();
            if !state.lifecycle.is_open() || state.surface.is_none() {
                tracing::debug!(group_id = %self.inner.id, ?selector, "Deferring active tab until open");
                state.selection = Selection::Pending(selector);
                return;
            }
            state.tabs.resolve(&selector)
        };

        match resolved {
            Ok(tab) => {
                if let Some(surface) = self.live_surface() {
                    surface.select_tab(&tab);
                }
            }
            Err(e) => {
                tracing::error!(group_id = %self.inner.id, error = %e, "Cannot set active tab");
            }
        }
    }

    fn select_default_tab(&self) {
        let first = self.inner.state.lock().tabs.first();
        if let Some(tab) = first {
            self.set_active_tab(tab);
        }
    }

    /// Selection confirmed by the native surface
    pub fn on_tab_selected(&self, tab: &Arc<TabEntry>) {
        let (previous, focus) = {
            let mut state = self.inner.state.lock();
            let Some(index) = state.tabs.index_of(tab) else {
                tracing::warn!(group_id = %self.inner.id, tab_id = %tab.id(), "Selection reported for tab not in group");
                return;
            };

            let previous = match std::mem::replace(
                &mut state.selection,
                Selection::Active(Arc::clone(tab)),
            ) {
                Selection::Active(previous) => Some(previous),
                _ => None,
            };
            let previous_index = previous
                .as_ref()
                .and_then(|p| state.tabs.index_of(p))
                .map_or(-1, |i| i as i32);

            let focus = FocusEvent {
                source: Some(tab.id()),
                previous_tab: previous.as_ref().map(|p| p.id()),
                previous_index,
                tab: tab.id(),
                index: index as i32,
            };
            (previous, focus)
        };

        tracing::debug!(
            group_id = %self.inner.id,
            tab_id = %tab.id(),
            index = focus.index,
            previous_index = focus.previous_index,
            "Tab selected"
        );

        let blur = focus.with_source(previous.as_ref().map(|p| p.id()));

        if let Some(previous) = &previous {
            previous.on_selection_changed(false);
            previous.on_focus_changed(false, Some(blur));
        }
        tab.on_selection_changed(true);
        tab.on_focus_changed(true, Some(focus.clone()));

        tab.fire_selected(focus);
    }

    /// Selection confirmed by position
    pub fn on_tab_selected_at(&self, index: usize) {
        let tab = self.inner.state.lock().tabs.get(index as i64);
        match tab {
            Some(tab) => self.on_tab_selected(&tab),
            None => {
                tracing::warn!(group_id = %self.inner.id, index, "Selection reported for invalid index")
            }
        }
    }

    // === Focus ===

    /// Host window gained or lost focus
    pub fn on_host_focus_change(&self, focused: bool) {
        let tab = {
            let mut state = self.inner.state.lock();
            // Initial selection and host resume both restore focus
            if state.is_focused == focused {
                return;
            }
            state.is_focused = focused;
            state.active_tab()
        };

        match tab {
            Some(tab) => tab.on_focus_changed(focused, None),
            None => {
                self.inner
                    .events
                    .emit(TabGroupEvent::focus_changed(focused, None));
            }
        }
    }

    // === Presentation ===

    pub fn title(&self) -> Option<String> {
        self.inner.state.lock().config.title.clone()
    }

    pub fn set_title(&self, title: impl Into<String>) {
        let title = title.into();
        let chrome_title = {
            let mut state = self.inner.state.lock();
            state.config.title = Some(title.clone());
            if state.config.auto_tab_title {
                String::new()
            } else {
                title
            }
        };

        if let Some(surface) = self.live_surface() {
            surface.update_title(&chrome_title);
        }
    }

    pub fn auto_tab_title(&self) -> bool {
        self.inner.state.lock().config.auto_tab_title
    }

    pub fn set_auto_tab_title(&self, auto_tab_title: bool) {
        let chrome_title = {
            let mut state = self.inner.state.lock();
            if state.config.auto_tab_title == auto_tab_title {
                return;
            }
            state.config.auto_tab_title = auto_tab_title;
            if auto_tab_title {
                String::new()
            } else {
                state.config.title.clone().unwrap_or_default()
            }
        };

        if let Some(surface) = self.live_surface() {
            surface.update_title(&chrome_title);
        }
    }

    pub fn tab_bar_visible(&self) -> bool {
        self.inner.state.lock().config.tab_bar_visible
    }

    pub fn set_tab_bar_visible(&self, visible: bool) {
        self.update_tab_bar(visible, false);
    }

    /// Animated show
    pub fn show_tab_bar(&self) {
        self.update_tab_bar(true, true);
    }

    /// Animated hide
    pub fn hide_tab_bar(&self) {
        self.update_tab_bar(false, true);
    }

    fn update_tab_bar(&self, visible: bool, animated: bool) {
        self.inner.state.lock().config.tab_bar_visible = visible;
        if let Some(surface) = self.live_surface() {
            surface.set_visibility(visible, animated);
        }
    }

    pub fn enabled(&self) -> bool {
        self.inner.state.lock().config.enabled
    }

    pub fn set_enabled(&self, enabled: bool) {
        self.inner.state.lock().config.enabled = enabled;
        if let Some(surface) = self.live_surface() {
            surface.set_navigation_enabled(enabled);
        }
    }

    #[deprecated(note = "use set_enabled and set_tab_bar_visible")]
    pub fn disable_tab_navigation(&self, request: DisableTabNavigation) {
        tracing::warn!(
            group_id = %self.inner.id,
            "disable_tab_navigation is deprecated, use set_enabled and set_tab_bar_visible"
        );

        match request {
            DisableTabNavigation::Flag(disabled) => {
                self.set_enabled(!disabled);
                self.set_tab_bar_visible(!disabled);
            }
            DisableTabNavigation::Options { disabled, animated } => {
                self.set_enabled(!disabled);
                self.update_tab_bar(!disabled, animated);
            }
        }
    }

    /// Notify the group, then each tab, that the safe area changed
    pub fn fire_safe_area_changed(&self) {
        self.inner.events.emit(TabGroupEvent::SafeAreaChanged);

        // A handler may remove tabs, so walk a snapshot
        for tab in self.tabs() {
            tab.fire_safe_area_changed();
        }
    }

    // === Lifecycle ===

    /// Launch the group's window.
    ///
    /// Ignored unless the group is closed. Without a live host window this is
    /// a silent no-op and may be retried later.
    pub fn open(&self, options: OpenOptions) -> Result<()> {
        if !self.state().is_closed() {
            tracing::debug!(group_id = %self.inner.id, "Tab group already opening or open");
            return Ok(());
        }

        let Some(top) = self
            .inner
            .context
            .host
            .top_window()
            .filter(|window| window.is_alive())
        else {
            tracing::debug!(group_id = %self.inner.id, "No live host window, open ignored");
            return Ok(());
        };

        self.inner
            .state
            .lock()
            .transition_to(self.inner.id, LifecycleState::Opening)?;

        if !top.display_available() {
            tracing::debug!(group_id = %self.inner.id, "Waiting for display before launching");

            let group = self.downgrade();
            let launcher = Arc::downgrade(&top);
            top.when_display_available(Box::new(move || {
                let Some(group) = group.upgrade() else {
                    return;
                };
                if let Err(e) = group.launch(launcher, options) {
                    tracing::error!(group_id = %group.id(), error = %e, "Deferred launch failed");
                }
            }));
            return Ok(());
        }

        self.launch(Arc::downgrade(&top), options)
    }

    fn launch(&self, launcher: Weak<dyn HostWindow>, options: OpenOptions) -> Result<()> {
        let (theme, exit_on_close) = {
            let state = self.inner.state.lock();
            if state.lifecycle != LifecycleState::Opening {
                return Ok(());
            }
            let theme = state
                .config
                .theme
                .clone()
                .filter(|_| state.config.style.is_bottom_navigation());
            (theme, state.config.exit_on_close)
        };

        let Some(top) = launcher.upgrade().filter(|window| window.is_alive()) else {
            tracing::debug!(group_id = %self.inner.id, "Host window went away before launch");
            self.abort_open();
            return Ok(());
        };

        if let Some(theme) = theme {
            if let Err(e) = top.apply_theme(&theme) {
                tracing::debug!(group_id = %self.inner.id, error = %e, "Ignoring theme");
            }
        }

        let window_id = self.inner.context.registry.register(self.downgrade());
        self.inner.state.lock().window_id = Some(window_id);

        let request = LaunchRequest {
            window_id,
            animated: options.animated,
            enter_animation: options.enter_animation,
            exit_animation: options.exit_animation,
            exit_on_close,
        };

        if let Err(e) = top.launch_window(&request) {
            tracing::warn!(
                group_id = %self.inner.id,
                error = %e,
                "Launch failed, retrying without animation"
            );

            let group = self.downgrade();
            let retry = request.without_animation();
            self.inner.context.scheduler.schedule(
                LAUNCH_RETRY_DELAY,
                Box::new(move || match group.upgrade() {
                    Some(group) => group.retry_launch(launcher, retry),
                    None => Ok(()),
                }),
            );
        }

        Ok(())
    }

    fn retry_launch(&self, launcher: Weak<dyn HostWindow>, request: LaunchRequest) -> Result<()> {
        {
            let state = self.inner.state.lock();
            // A close and reopen since the failure registered a new window id
            if state.lifecycle != LifecycleState::Opening
                || state.window_id != Some(request.window_id)
            {
                tracing::debug!(
                    group_id = %self.inner.id,
                    window_id = %request.window_id,
                    "Dropping stale launch retry"
                );
                return Ok(());
            }
        }

        let Some(top) = launcher.upgrade().filter(|window| window.is_alive()) else {
            tracing::debug!(group_id = %self.inner.id, "Host window went away before retry");
            self.abort_open();
            return Ok(());
        };

        match top.launch_window(&request) {
            Ok(()) => Ok(()),
            Err(e) => {
                let error = TabGroupError::LaunchFailed(e);
                tracing::error!(group_id = %self.inner.id, error = %error, "Tab group failed to open");
                self.abort_open();
                self.inner
                    .events
                    .emit(TabGroupEvent::Error(error.to_string()));
                Err(error)
            }
        }
    }

    /// Roll an unfinished open back to closed
    fn abort_open(&self) {
        let window_id = {
            let mut state = self.inner.state.lock();
            if state.lifecycle != LifecycleState::Opening
                || state
                    .transition_to(self.inner.id, LifecycleState::Closed)
                    .is_err()
            {
                return;
            }
            state.window_id.take()
        };

        if let Some(id) = window_id {
            self.inner.context.registry.unregister(id);
        }
    }

    /// The host created the group's window: attach the tab bar and flush
    /// everything buffered while closed.
    pub fn on_created(&self, window: Arc<dyn HostWindow>) {
        let (spec, status_bar) = {
            let mut state = self.inner.state.lock();
            if state.lifecycle != LifecycleState::Opening {
                drop(state);
                tracing::warn!(group_id = %self.inner.id, "Window created for a group that is not opening");
                window.finish_window();
                return;
            }
            state.window = Some(Arc::downgrade(&window));

            let config = &state.config;
            let spec = ViewSpec {
                group: self.downgrade(),
                style: config.style,
                tab_mode: config.tab_mode,
                swipeable: config.swipeable,
                smooth_scroll_on_tab_click: config.smooth_scroll_on_tab_click,
            };
            (spec, config.status_bar.clone())
        };

        let surface = window.attach_view(spec);
        if let Some(attributes) = status_bar {
            window.set_status_bar(&attributes);
        }

        if let Err(e) = self
            .inner
            .state
            .lock()
            .transition_to(self.inner.id, LifecycleState::Open)
        {
            // Closed while the view was being attached
            tracing::debug!(group_id = %self.inner.id, error = %e, "Tab group not opened");
            return;
        }

        tracing::info!(group_id = %self.inner.id, "Tab group opened");

        // Listeners see `open` before any tab is selected or focused
        self.inner.events.emit(TabGroupEvent::Open);

        let (tabs, title, auto_tab_title) = {
            let mut state = self.inner.state.lock();
            if !state.lifecycle.is_open() {
                return;
            }
            state.surface = Some(Arc::clone(&surface));
            (
                state.tabs.snapshot(),
                state.config.title.clone(),
                state.config.auto_tab_title,
            )
        };

        if let Some(surface) = self.live_surface() {
            for (index, tab) in tabs.iter().enumerate() {
                surface.add_tab(tab, index);
            }
            if title.is_some() || auto_tab_title {
                let title = if auto_tab_title {
                    String::new()
                } else {
                    title.unwrap_or_default()
                };
                surface.update_title(&title);
            }
        }

        self.select_initial_tab();

        // The initial selection already focused the active tab
        self.inner.state.lock().is_focused = true;

        let (enabled, visible) = {
            let state = self.inner.state.lock();
            (state.config.enabled, state.config.tab_bar_visible)
        };
        if let Some(surface) = self.live_surface() {
            surface.set_navigation_enabled(enabled);
            surface.set_visibility(visible, false);
        }
    }

    fn select_initial_tab(&self) {
        let initial = {
            let state = self.inner.state.lock();
            match &state.selection {
                Selection::Pending(selector) => match state.tabs.resolve(selector) {
                    Ok(tab) => Some(tab),
                    Err(e) => {
                        tracing::error!(
                            group_id = %self.inner.id,
                            error = %e,
                            "Pending active tab is invalid, selecting first tab"
                        );
                        state.tabs.first()
                    }
                },
                Selection::Active(tab) => Some(Arc::clone(tab)),
                Selection::None => state.tabs.first(),
            }
        };

        if let Some(tab) = initial {
            self.set_active_tab(tab);
        }
    }

    /// Close the group's window. Idempotent.
    ///
    /// Native handles are released right away; tabs stay in the group. The
    /// `close` event fires once the host confirms the window closed.
    pub fn close(&self) {
        let released = {
            let mut state = self.inner.state.lock();
            if state
                .transition_to(self.inner.id, LifecycleState::Closing)
                .is_err()
            {
                tracing::debug!(group_id = %self.inner.id, state = %state.lifecycle, "Close ignored");
                return;
            }
            state.release_native()
        };

        let window_created = released.window.is_some();
        self.release(released);

        // Nothing was created, so no host confirmation will follow
        if !window_created {
            self.finish_close();
        }
    }

    fn release(&self, released: Released) {
        for tab in &released.tabs {
            tab.release_views();
        }
        if let Some(id) = released.window_id {
            self.inner.context.registry.unregister(id);
        }
        if let Some(window) = released.window {
            if window.is_alive() {
                window.finish_window();
            }
        }
    }

    /// The host confirmed the window closed
    pub fn on_host_closed(&self) {
        let released = {
            let mut state = self.inner.state.lock();
            match state.lifecycle {
                LifecycleState::Closing => None,
                // Closed by the host without a close() call
                LifecycleState::Opening | LifecycleState::Open => {
                    if let Err(e) = state.transition_to(self.inner.id, LifecycleState::Closing) {
                        tracing::error!(group_id = %self.inner.id, error = %e, "Cannot close tab group");
                        return;
                    }
                    Some(state.release_native())
                }
                LifecycleState::Closed => return,
            }
        };

        if let Some(released) = released {
            self.release(released);
        }
        self.finish_close();
    }

    fn finish_close(&self) {
        let tabs = {
            let mut state = self.inner.state.lock();
            if state
                .transition_to(self.inner.id, LifecycleState::Closed)
                .is_err()
            {
                return;
            }
            state.is_focused = false;
            // Reopening selects the same tab again as a fresh selection. A
            // selection requested while closing is kept as is.
            if let Selection::Active(tab) = &state.selection {
                state.selection = Selection::Pending(TabSelector::Tab(Arc::clone(tab)));
            }
            state.tabs.snapshot()
        };

        // Every tab closes before the group's close event
        for tab in &tabs {
            tab.close();
        }

        tracing::info!(group_id = %self.inner.id, "Tab group closed");

        self.inner.events.emit(TabGroupEvent::Close);
    }

    /// The host destroyed the window, possibly without being asked to
    pub fn on_destroyed(&self) {
        for tab in self.tabs() {
            tab.release_views();
        }
        if !self.state().is_closed() {
            self.on_host_closed();
        }
    }

    /// Route a host lifecycle callback
    pub fn handle_signal(&self, signal: HostSignal) {
        tracing::trace!(group_id = %self.inner.id, ?signal, "Host signal");

        match signal {
            HostSignal::Created(window) => self.on_created(window),
            HostSignal::Resumed => self.on_host_focus_change(true),
            HostSignal::Paused => self.on_host_focus_change(false),
            HostSignal::FocusChanged(focused) => self.on_host_focus_change(focused),
            HostSignal::Destroyed => self.on_destroyed(),
            HostSignal::HostClosed => self.on_host_closed(),
        }
    }
}

impl std::fmt::Debug for TabGroup {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let state = self.inner.state.lock();
        f.debug_struct("TabGroup")
            .field("id", &self.inner.id)
            .field("lifecycle", &state.lifecycle)
            .field("tabs", &state.tabs.len())
            .field("selection", &state.selection)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::host::ScheduledTask;
    use std::sync::atomic::{AtomicU64, Ordering};

    struct NoWindowHost;

    impl HostBinding for NoWindowHost {
        fn top_window(&self) -> Option<Arc<dyn HostWindow>> {
            None
        }
    }

    #[derive(Default)]
    struct CountingRegistry {
        next: AtomicU64,
    }

    impl WindowRegistry for CountingRegistry {
        fn register(&self, _group: WeakTabGroup) -> WindowId {
            WindowId(self.next.fetch_add(1, Ordering::Relaxed))
        }

        fn unregister(&self, _id: WindowId) {}
    }

    struct DroppingScheduler;

    impl Scheduler for DroppingScheduler {
        fn schedule(&self, _delay: Duration, _task: ScheduledTask) {}
    }

    fn closed_group() -> TabGroup {
        TabGroup::new(HostContext {
            host: Arc::new(NoWindowHost),
            registry: Arc::new(CountingRegistry::default()),
            scheduler: Arc::new(DroppingScheduler),
        })
    }

    fn record(group: &TabGroup) -> Arc<Mutex<Vec<&'static str>>> {
        use tabgroup_events::Event;

        let names = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&names);
        group.events().on_any(move |e| sink.lock().push(e.name()));
        names
    }

    #[test]
    fn test_new_group_is_closed_and_empty() {
        let group = closed_group();
        assert_eq!(group.state(), LifecycleState::Closed);
        assert!(group.tabs().is_empty());
        assert!(group.active_tab().is_none());
        assert!(group.tab_bar_visible());
        assert!(group.enabled());
    }

    #[test]
    fn test_add_and_remove_keep_order() {
        let group = closed_group();
        let tabs: Vec<_> = (0..4).map(|i| TabEntry::new(format!("tab-{}", i))).collect();
        for tab in &tabs {
            group.add_tab(tab);
        }

        group.remove_tab(&tabs[2]);
        group.remove_tab(&tabs[0]);
        // Not a member any more
        group.remove_tab(&tabs[0]);

        assert_eq!(group.tabs(), vec![tabs[1].clone(), tabs[3].clone()]);
        assert!(tabs[0].tab_group().is_none());
        assert!(tabs[1].tab_group().unwrap().ptr_eq(&group));
    }

    #[test]
    fn test_duplicate_add_ignored() {
        let group = closed_group();
        let tab = TabEntry::new("a");

        group.add_tab(&tab);
        group.add_tab(&tab);

        assert_eq!(group.tab_count(), 1);
    }

    #[test]
    fn test_add_moves_tab_between_groups() {
        let first = closed_group();
        let second = closed_group();
        let tab = TabEntry::new("a");

        first.add_tab(&tab);
        second.add_tab(&tab);

        assert!(first.tabs().is_empty());
        assert_eq!(second.tabs(), vec![tab.clone()]);
        assert!(tab.tab_group().unwrap().ptr_eq(&second));
    }

    #[test]
    fn test_set_tabs_round_trip() {
        let group = closed_group();
        let (a, b, c) = (TabEntry::new("a"), TabEntry::new("b"), TabEntry::new("c"));

        group.set_tabs(vec![a.clone(), b.clone(), c.clone()]);
        assert_eq!(group.tabs(), vec![a.clone(), b.clone(), c.clone()]);

        group.set_tabs(Vec::new());
        assert!(group.tabs().is_empty());
        for tab in [&a, &b, &c] {
            assert!(tab.tab_group().is_none());
        }
    }

    #[test]
    fn test_default_selection_is_first_tab() {
        let group = closed_group();
        let (a, b) = (TabEntry::new("a"), TabEntry::new("b"));
        group.add_tab(&a);
        group.add_tab(&b);

        assert_eq!(group.active_tab(), Some(a));
    }

    #[test]
    fn test_pending_selection_while_closed() {
        let group = closed_group();
        let events = record(&group);
        let only = TabEntry::new("only");
        group.add_tab(&only);

        group.set_active_tab(2);

        assert!(events.lock().is_empty());
        assert_eq!(group.active_tab(), Some(only.clone()));

        let (b, c) = (TabEntry::new("b"), TabEntry::new("c"));
        group.add_tab(&b);
        group.add_tab(&c);
        assert_eq!(group.active_tab(), Some(c));
    }

    #[test]
    fn test_removing_pending_tab_clears_selection() {
        let group = closed_group();
        let (a, b) = (TabEntry::new("a"), TabEntry::new("b"));
        group.set_tabs(vec![a.clone(), b.clone()]);

        group.set_active_tab(&b);
        assert_eq!(group.active_tab(), Some(b.clone()));

        group.remove_tab(&b);
        assert_eq!(group.active_tab(), Some(a));
    }

    #[test]
    fn test_buffered_presentation() {
        let group = closed_group();

        group.set_title("Inbox");
        group.hide_tab_bar();
        group.set_enabled(false);

        assert_eq!(group.title().as_deref(), Some("Inbox"));
        assert!(!group.tab_bar_visible());
        assert!(!group.enabled());
    }

    #[test]
    #[allow(deprecated)]
    fn test_disable_tab_navigation() {
        let group = closed_group();

        group.disable_tab_navigation(DisableTabNavigation::Flag(true));
        assert!(!group.enabled());
        assert!(!group.tab_bar_visible());

        group.disable_tab_navigation(DisableTabNavigation::Options {
            disabled: false,
            animated: true,
        });
        assert!(group.enabled());
        assert!(group.tab_bar_visible());
    }

    #[test]
    fn test_open_without_host_window_is_noop() {
        let group = closed_group();
        group.open(OpenOptions::default()).unwrap();
        assert_eq!(group.state(), LifecycleState::Closed);
    }

    #[test]
    fn test_close_when_closed_is_noop() {
        let group = closed_group();
        let events = record(&group);

        group.close();
        group.close();

        assert_eq!(group.state(), LifecycleState::Closed);
        assert!(events.lock().is_empty());
    }

    #[test]
    fn test_focus_without_tabs_falls_back_to_group() {
        let group = closed_group();
        let events = record(&group);

        group.on_host_focus_change(true);
        group.on_host_focus_change(true);
        group.on_host_focus_change(false);

        assert_eq!(*events.lock(), vec!["focus", "blur"]);
    }

    #[test]
    fn test_focus_forwarded_to_active_tab_once() {
        use tabgroup_events::Event;

        let group = closed_group();
        let tab = TabEntry::new("a");
        group.add_tab(&tab);

        let names = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&names);
        tab.events().on_any(move |e| {
            if let TabGroupEvent::Focus(payload) = e {
                assert!(payload.is_none());
            }
            sink.lock().push(e.name());
        });

        group.on_host_focus_change(true);
        group.on_host_focus_change(true);

        assert_eq!(*names.lock(), vec!["focus"]);
        assert!(group.is_focused());
    }

    #[test]
    fn test_with_options_applies_in_order() {
        let (a, b) = (TabEntry::new("a"), TabEntry::new("b"));
        let group = TabGroup::with_options(
            HostContext {
                host: Arc::new(NoWindowHost),
                registry: Arc::new(CountingRegistry::default()),
                scheduler: Arc::new(DroppingScheduler),
            },
            TabGroupOptions {
                config: TabGroupConfig {
                    title: Some("Mail".to_string()),
                    tab_bar_visible: false,
                    auto_tab_title: true,
                    ..TabGroupConfig::default()
                },
                tabs: vec![a.clone(), b.clone()],
                active_tab: Some(TabSelector::Index(1)),
            },
        );

        assert_eq!(group.tabs(), vec![a, b.clone()]);
        assert_eq!(group.active_tab(), Some(b));
        assert!(!group.tab_bar_visible());
        assert!(group.auto_tab_title());
        assert_eq!(group.title().as_deref(), Some("Mail"));
    }

    #[test]
    fn test_tab_does_not_keep_group_alive() {
        let tab = TabEntry::new("a");
        {
            let group = closed_group();
            group.add_tab(&tab);
            assert!(tab.tab_group().is_some());
        }
        assert!(tab.tab_group().is_none());
    }
}
