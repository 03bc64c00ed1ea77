//! Headless tab bar

use parking_lot::Mutex;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use tabgroup_core::{TabEntry, TabStyle, TabSurface, ViewSpec};

use crate::command::{CommandLog, HostCommand, SurfaceCommand};

/// When a tab bar confirms a selection request
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SelectionAck {
    /// Before `select_tab` returns, like most native tab bars
    #[default]
    Immediate,
    /// Only when [`HeadlessSurface::ack_pending`] is called
    Deferred,
}

pub struct HeadlessSurface {
    spec: ViewSpec,
    log: CommandLog,
    ack: SelectionAck,
    tabs: Mutex<Vec<Arc<TabEntry>>>,
    pending: Mutex<Vec<Arc<TabEntry>>>,
    selected: Mutex<Option<Arc<TabEntry>>>,
    visible: AtomicBool,
    enabled: AtomicBool,
    title: Mutex<String>,
}

impl HeadlessSurface {
    pub fn new(spec: ViewSpec, log: CommandLog, ack: SelectionAck) -> Self {
        Self {
            spec,
            log,
            ack,
            tabs: Mutex::new(Vec::new()),
            pending: Mutex::new(Vec::new()),
            selected: Mutex::new(None),
            visible: AtomicBool::new(true),
            enabled: AtomicBool::new(true),
            title: Mutex::new(String::new()),
        }
    }

    pub fn style(&self) -> TabStyle {
        self.spec.style
    }

    pub fn tabs(&self) -> Vec<Arc<TabEntry>> {
        self.tabs.lock().clone()
    }

    pub fn selected(&self) -> Option<Arc<TabEntry>> {
        self.selected.lock().clone()
    }

    pub fn is_visible(&self) -> bool {
        self.visible.load(Ordering::SeqCst)
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled.load(Ordering::SeqCst)
    }

    pub fn title(&self) -> String {
        self.title.lock().clone()
    }

    /// Confirm every deferred selection request, oldest first
    pub fn ack_pending(&self) -> usize {
        let pending = std::mem::take(&mut *self.pending.lock());
        let count = pending.len();
        for tab in pending {
            self.confirm(&tab);
        }
        count
    }

    /// A user tapped the tab at `index`
    pub fn tap(&self, index: usize) {
        let tab = self.tabs.lock().get(index).cloned();
        if let Some(tab) = tab {
            self.confirm(&tab);
        }
    }

    fn confirm(&self, tab: &Arc<TabEntry>) {
        *self.selected.lock() = Some(Arc::clone(tab));
        if let Some(group) = self.spec.group.upgrade() {
            group.on_tab_selected(tab);
        }
    }
}

impl TabSurface for HeadlessSurface {
    fn add_tab(&self, tab: &Arc<TabEntry>, index: usize) {
        {
            let mut tabs = self.tabs.lock();
            let index = index.min(tabs.len());
            tabs.insert(index, Arc::clone(tab));
        }
        self.log.push(HostCommand::Surface(SurfaceCommand::AddTab {
            tab: tab.id(),
            index,
        }));
    }

    fn remove_tab(&self, index: usize) {
        {
            let mut tabs = self.tabs.lock();
            if index < tabs.len() {
                tabs.remove(index);
            }
        }
        self.log
            .push(HostCommand::Surface(SurfaceCommand::RemoveTab { index }));
    }

    fn select_tab(&self, tab: &Arc<TabEntry>) {
        self.log
            .push(HostCommand::Surface(SurfaceCommand::SelectTab { tab: tab.id() }));

        match self.ack {
            SelectionAck::Immediate => self.confirm(tab),
            SelectionAck::Deferred => self.pending.lock().push(Arc::clone(tab)),
        }
    }

    fn set_visibility(&self, visible: bool, animated: bool) {
        self.visible.store(visible, Ordering::SeqCst);
        self.log
            .push(HostCommand::Surface(SurfaceCommand::SetVisibility {
                visible,
                animated,
            }));
    }

    fn set_navigation_enabled(&self, enabled: bool) {
        self.enabled.store(enabled, Ordering::SeqCst);
        self.log
            .push(HostCommand::Surface(SurfaceCommand::SetNavigationEnabled {
                enabled,
            }));
    }

    fn update_title(&self, title: &str) {
        *self.title.lock() = title.to_string();
        self.log
            .push(HostCommand::Surface(SurfaceCommand::UpdateTitle {
                title: title.to_string(),
            }));
    }
}
