//! Simulated activity feeding the store.
//!
//! An [`EventSource`] decides what happens on each timer tick; [`apply_event`]
//! turns the event into store commands. The timers themselves live in the
//! execution crate.

mod event;
mod scripted;

pub use event::{EventSource, SimulationEvent, TickKind, apply_event};
pub use scripted::ScriptedEventSource;
