//! Tabgroup Event Dispatch
//!
//! Fire-and-forget publishing of named events to registered listeners.
//! Payloads are handed to listeners by shared reference, so an emitted event
//! can never be mutated by the code that consumed it. Emitting the same data
//! twice with a different field means cloning it first.

mod dispatcher;

pub use dispatcher::{Event, EventDispatcher, Listener, ListenerId};
