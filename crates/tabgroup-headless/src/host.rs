//! Headless host binding
//!
//! Plays the part of the app's windowing system: hands out the launcher
//! window, turns launch requests into group windows and delivers lifecycle
//! signals.

use parking_lot::{Mutex, RwLock};
use std::collections::BTreeMap;
use std::sync::Arc;

use tabgroup_core::{
    HostBinding, HostContext, HostSignal, HostWindow, Scheduler, TabGroup, WindowId,
};

use crate::command::CommandLog;
use crate::registry::ActiveWindows;
use crate::surface::SelectionAck;
use crate::window::HeadlessWindow;

pub struct HeadlessHost {
    log: CommandLog,
    registry: Arc<ActiveWindows>,
    top: RwLock<Option<Arc<HeadlessWindow>>>,
    ack: Mutex<SelectionAck>,
    windows: Mutex<BTreeMap<WindowId, Arc<HeadlessWindow>>>,
}

impl HeadlessHost {
    /// A host with a live launcher window
    pub fn new() -> Arc<Self> {
        let log = CommandLog::new();
        let top = HeadlessWindow::launcher(log.clone());
        Arc::new(Self {
            log,
            registry: Arc::new(ActiveWindows::new()),
            top: RwLock::new(Some(top)),
            ack: Mutex::new(SelectionAck::default()),
            windows: Mutex::new(BTreeMap::new()),
        })
    }

    /// Collaborators for a new tab group
    pub fn context(self: &Arc<Self>, scheduler: Arc<dyn Scheduler>) -> HostContext {
        HostContext {
            host: Arc::clone(self) as Arc<dyn HostBinding>,
            registry: Arc::clone(&self.registry) as _,
            scheduler,
        }
    }

    pub fn log(&self) -> &CommandLog {
        &self.log
    }

    pub fn registry(&self) -> &Arc<ActiveWindows> {
        &self.registry
    }

    pub fn top(&self) -> Option<Arc<HeadlessWindow>> {
        self.top.read().clone()
    }

    pub fn set_top(&self, window: Option<Arc<HeadlessWindow>>) {
        *self.top.write() = window;
    }

    /// How tab bars of windows created from now on confirm selections
    pub fn set_selection_ack(&self, ack: SelectionAck) {
        *self.ack.lock() = ack;
    }

    /// The window currently owned by `group`
    pub fn window_for(&self, group: &TabGroup) -> Option<Arc<HeadlessWindow>> {
        let id = group.window_id()?;
        self.windows.lock().get(&id).cloned()
    }

    /// Every window created so far, in creation order
    pub fn windows(&self) -> Vec<Arc<HeadlessWindow>> {
        self.windows.lock().values().cloned().collect()
    }

    /// Create a window for every launch request the launcher accepted.
    ///
    /// Requests whose group is no longer registered get a window that is
    /// finished right away. Returns the number of windows created.
    pub fn complete_launches(&self) -> usize {
        let Some(top) = self.top() else {
            return 0;
        };

        let requests = top.take_launches();
        let ack = *self.ack.lock();

        for request in &requests {
            let window = HeadlessWindow::for_group(request.window_id, self.log.clone(), ack);
            self.windows
                .lock()
                .insert(request.window_id, Arc::clone(&window));

            match self.registry.lookup(request.window_id) {
                Some(group) => {
                    tracing::debug!(window_id = %request.window_id, "Window created");
                    window.bind(group.downgrade());
                    group.handle_signal(HostSignal::Created(window as Arc<dyn HostWindow>));
                }
                None => {
                    tracing::warn!(window_id = %request.window_id, "No group registered for window");
                    window.finish_window();
                }
            }
        }

        requests.len()
    }

    /// Confirm the close of every window asked to finish. Returns the
    /// number of windows confirmed.
    pub fn confirm_finished(&self) -> usize {
        let finishing: Vec<_> = self
            .windows
            .lock()
            .values()
            .filter(|w| w.is_finishing() && !w.is_destroyed())
            .cloned()
            .collect();

        for window in &finishing {
            window.confirm_closed();
        }
        finishing.len()
    }
}

impl HostBinding for HeadlessHost {
    fn top_window(&self) -> Option<Arc<dyn HostWindow>> {
        self.top().map(|w| w as Arc<dyn HostWindow>)
    }
}
