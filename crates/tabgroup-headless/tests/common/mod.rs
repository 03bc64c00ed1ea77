#![allow(dead_code)]

use parking_lot::Mutex;
use std::sync::Arc;

use tabgroup_core::{
    Event, EventDispatcher, OpenOptions, TabEntry, TabGroup, TabGroupConfig, TabGroupEvent,
    TabGroupOptions,
};
use tabgroup_headless::{HeadlessHost, HeadlessSurface, HeadlessWindow, ManualScheduler};

pub struct Harness {
    pub host: Arc<HeadlessHost>,
    pub scheduler: Arc<ManualScheduler>,
    pub group: TabGroup,
    pub tabs: Vec<Arc<TabEntry>>,
}

impl Harness {
    pub fn new(titles: &[&str]) -> Self {
        Self::with_config(titles, TabGroupConfig::default())
    }

    pub fn with_config(titles: &[&str], config: TabGroupConfig) -> Self {
        let host = HeadlessHost::new();
        let scheduler = Arc::new(ManualScheduler::new());
        let tabs: Vec<_> = titles.iter().map(|t| TabEntry::new(*t)).collect();

        let options = TabGroupOptions {
            config,
            tabs: tabs.clone(),
            active_tab: None,
        };
        let group = TabGroup::with_options(host.context(scheduler.clone()), options);

        Self {
            host,
            scheduler,
            group,
            tabs,
        }
    }

    pub fn top(&self) -> Arc<HeadlessWindow> {
        self.host.top().expect("launcher window")
    }

    /// Open and let the host create the window
    pub fn open(&self) {
        self.group.open(OpenOptions::default()).expect("open");
        assert_eq!(self.host.complete_launches(), 1);
    }

    pub fn window(&self) -> Arc<HeadlessWindow> {
        self.host.window_for(&self.group).expect("group window")
    }

    pub fn surface(&self) -> Arc<HeadlessSurface> {
        self.window().surface().expect("tab bar")
    }

    /// Close and confirm like the host would
    pub fn close(&self) {
        self.group.close();
        self.host.confirm_finished();
    }
}

/// Record every event a dispatcher emits
pub fn record(events: &EventDispatcher<TabGroupEvent>) -> Arc<Mutex<Vec<TabGroupEvent>>> {
    let sink = Arc::new(Mutex::new(Vec::new()));
    let recorded = Arc::clone(&sink);
    events.on_any(move |event: &TabGroupEvent| recorded.lock().push(event.clone()));
    sink
}

pub fn names(events: &Mutex<Vec<TabGroupEvent>>) -> Vec<&'static str> {
    events.lock().iter().map(|e| e.name()).collect()
}
