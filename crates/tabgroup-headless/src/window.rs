//! Headless host window

use parking_lot::Mutex;
use std::collections::HashSet;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Arc;

use tabgroup_core::{
    HostError, HostSignal, HostWindow, LaunchRequest, StatusBarAttributes, TabGroup, TabSurface,
    ViewSpec, WeakTabGroup, WindowId,
};

use crate::command::{CommandLog, HostCommand};
use crate::surface::{HeadlessSurface, SelectionAck};

type DisplayWaiter = Box<dyn FnOnce() + Send>;

pub struct HeadlessWindow {
    /// Registry id of the group this window was created for
    id: Option<WindowId>,
    log: CommandLog,
    ack: SelectionAck,
    finishing: AtomicBool,
    destroyed: AtomicBool,
    display: AtomicBool,
    display_waiters: Mutex<Vec<DisplayWaiter>>,
    launch_failures: AtomicUsize,
    launched: Mutex<Vec<LaunchRequest>>,
    themes: Mutex<HashSet<String>>,
    status_bar: Mutex<Option<StatusBarAttributes>>,
    surface: Mutex<Option<Arc<HeadlessSurface>>>,
    group: Mutex<WeakTabGroup>,
}

impl HeadlessWindow {
    fn build(id: Option<WindowId>, log: CommandLog, ack: SelectionAck) -> Arc<Self> {
        Arc::new(Self {
            id,
            log,
            ack,
            finishing: AtomicBool::new(false),
            destroyed: AtomicBool::new(false),
            display: AtomicBool::new(true),
            display_waiters: Mutex::new(Vec::new()),
            launch_failures: AtomicUsize::new(0),
            launched: Mutex::new(Vec::new()),
            themes: Mutex::new(HashSet::new()),
            status_bar: Mutex::new(None),
            surface: Mutex::new(None),
            group: Mutex::new(WeakTabGroup::default()),
        })
    }

    /// A window tab groups can be launched from
    pub fn launcher(log: CommandLog) -> Arc<Self> {
        Self::build(None, log, SelectionAck::default())
    }

    /// The window created for a launch request
    pub fn for_group(id: WindowId, log: CommandLog, ack: SelectionAck) -> Arc<Self> {
        Self::build(Some(id), log, ack)
    }

    pub fn id(&self) -> Option<WindowId> {
        self.id
    }

    pub fn surface(&self) -> Option<Arc<HeadlessSurface>> {
        self.surface.lock().clone()
    }

    pub fn status_bar(&self) -> Option<StatusBarAttributes> {
        self.status_bar.lock().clone()
    }

    pub fn group(&self) -> Option<TabGroup> {
        let group = self.group.lock().clone();
        group.upgrade()
    }

    pub fn bind(&self, group: WeakTabGroup) {
        *self.group.lock() = group;
    }

    pub fn add_theme(&self, name: impl Into<String>) {
        self.themes.lock().insert(name.into());
    }

    /// Make the next `count` launch attempts fail
    pub fn fail_next_launches(&self, count: usize) {
        self.launch_failures.store(count, Ordering::SeqCst);
    }

    pub fn take_launches(&self) -> Vec<LaunchRequest> {
        std::mem::take(&mut *self.launched.lock())
    }

    /// Attach or detach the window from a display. Attaching runs every
    /// waiting continuation once.
    pub fn set_display_available(&self, available: bool) {
        self.display.store(available, Ordering::SeqCst);
        if available {
            let waiters = std::mem::take(&mut *self.display_waiters.lock());
            for waiter in waiters {
                waiter();
            }
        }
    }

    pub fn mark_finishing(&self) {
        self.finishing.store(true, Ordering::SeqCst);
    }

    /// Deliver a lifecycle signal to the bound group
    pub fn signal(&self, signal: HostSignal) {
        match self.group() {
            Some(group) => group.handle_signal(signal),
            None => tracing::debug!(?signal, "No group bound to window"),
        }
    }

    pub fn resume(&self) {
        self.signal(HostSignal::Resumed);
    }

    pub fn pause(&self) {
        self.signal(HostSignal::Paused);
    }

    /// The window finished closing
    pub fn confirm_closed(&self) {
        self.destroyed.store(true, Ordering::SeqCst);
        self.signal(HostSignal::HostClosed);
    }

    /// The window was torn down without being asked to close
    pub fn destroy(&self) {
        self.destroyed.store(true, Ordering::SeqCst);
        self.signal(HostSignal::Destroyed);
    }
}

impl HostWindow for HeadlessWindow {
    fn is_finishing(&self) -> bool {
        self.finishing.load(Ordering::SeqCst)
    }

    fn is_destroyed(&self) -> bool {
        self.destroyed.load(Ordering::SeqCst)
    }

    fn display_available(&self) -> bool {
        self.display.load(Ordering::SeqCst)
    }

    fn when_display_available(&self, continuation: Box<dyn FnOnce() + Send>) {
        if self.display_available() {
            continuation();
        } else {
            self.display_waiters.lock().push(continuation);
        }
    }

    fn apply_theme(&self, theme: &str) -> Result<(), HostError> {
        if !self.themes.lock().contains(theme) {
            return Err(HostError::ThemeNotFound(theme.to_string()));
        }
        self.log.push(HostCommand::ApplyTheme(theme.to_string()));
        Ok(())
    }

    fn launch_window(&self, request: &LaunchRequest) -> Result<(), HostError> {
        if !self.is_alive() {
            return Err(HostError::WindowGone);
        }

        let failed = self
            .launch_failures
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |n| n.checked_sub(1))
            .is_ok();
        if failed {
            return Err(HostError::Launch("window container unavailable".to_string()));
        }

        self.log.push(HostCommand::LaunchWindow(request.clone()));
        self.launched.lock().push(request.clone());
        Ok(())
    }

    fn attach_view(&self, spec: ViewSpec) -> Arc<dyn TabSurface> {
        self.bind(spec.group.clone());
        self.log.push(HostCommand::AttachView {
            window: self.id.unwrap_or(WindowId(0)),
            style: spec.style,
        });

        let surface = Arc::new(HeadlessSurface::new(spec, self.log.clone(), self.ack));
        *self.surface.lock() = Some(Arc::clone(&surface));
        surface
    }

    fn set_status_bar(&self, attributes: &StatusBarAttributes) {
        *self.status_bar.lock() = Some(attributes.clone());
        self.log.push(HostCommand::SetStatusBar(attributes.clone()));
    }

    fn finish_window(&self) {
        self.mark_finishing();
        self.log.push(HostCommand::FinishWindow(self.id));
    }
}
