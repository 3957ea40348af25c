//! # drape-telemetry
//!
//! Event bus for simulation telemetry. The simulation driver emits
//! structured events (tick timing, energy, pause changes) that pluggable
//! sinks consume: an in-memory buffer for tests, or `tracing` for logs.

pub mod bus;
pub mod events;
pub mod sinks;

pub use bus::EventBus;
pub use events::{EventKind, SimulationEvent};
pub use sinks::{EventSink, TracingSink, VecSink};
