//! Tabgroup Core
//!
//! A tab group owns an ordered set of tabs, decides which one is active and
//! keeps its own open/close lifecycle in step with a host window it does not
//! own. Operations made before the host window exists are buffered and
//! flushed once it is created.

mod config;
mod error;
mod event;
mod group;
mod host;
mod state;
mod tab;
mod tab_list;

pub use config::{OpenOptions, StatusBarAttributes, TabGroupConfig, TabGroupOptions, TabStyle};
pub use error::{HostError, TabGroupError};
pub use event::{FocusEvent, TabGroupEvent};
pub use group::{
    DisableTabNavigation, GroupId, HostContext, TabGroup, WeakTabGroup, LAUNCH_RETRY_DELAY,
};
pub use host::{
    HostBinding, HostSignal, HostWindow, LaunchRequest, ScheduledTask, Scheduler, TabSurface,
    ViewSpec, WindowId, WindowRegistry,
};
pub use state::LifecycleState;
pub use tab::{TabEntry, TabId};
pub use tab_list::TabSelector;

pub use tabgroup_events::{Event, EventDispatcher, ListenerId};

pub type Result<T> = std::result::Result<T, TabGroupError>;
