//! Active window registry
//!
//! Maps the window id carried by a launch request back to the tab group that
//! asked for it. A group is registered from launch until it closes.

use parking_lot::RwLock;
use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};

use tabgroup_core::{TabGroup, WeakTabGroup, WindowId, WindowRegistry};

#[derive(Debug, Default)]
pub struct ActiveWindows {
    windows: RwLock<HashMap<WindowId, WeakTabGroup>>,
    next_id: AtomicU64,
}

impl ActiveWindows {
    pub fn new() -> Self {
        Self::default()
    }

    /// Find the group a window id was issued to
    pub fn lookup(&self, id: WindowId) -> Option<TabGroup> {
        self.windows.read().get(&id).and_then(|g| g.upgrade())
    }

    pub fn contains(&self, id: WindowId) -> bool {
        self.windows.read().contains_key(&id)
    }

    pub fn len(&self) -> usize {
        self.windows.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.windows.read().is_empty()
    }
}

impl WindowRegistry for ActiveWindows {
    fn register(&self, group: WeakTabGroup) -> WindowId {
        let id = WindowId(self.next_id.fetch_add(1, Ordering::Relaxed) + 1);
        self.windows.write().insert(id, group);

        tracing::debug!(window_id = %id, "Registered window");

        id
    }

    fn unregister(&self, id: WindowId) {
        if self.windows.write().remove(&id).is_some() {
            tracing::debug!(window_id = %id, "Unregistered window");
        }
    }
}
