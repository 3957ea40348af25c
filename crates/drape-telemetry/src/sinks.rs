//! Pluggable event sinks.

use std::sync::{Arc, Mutex};

use crate::events::SimulationEvent;

/// Trait for event consumers.
///
/// Implement this to create custom telemetry outputs.
pub trait EventSink: Send {
    /// Process a single event.
    fn handle(&mut self, event: &SimulationEvent);

    /// Called when the simulation ends. Flush buffers, close files, etc.
    fn finalize(&mut self) {}

    /// Returns a human-readable name for this sink.
    fn name(&self) -> &str;
}

/// Collects events in memory for testing and inspection.
///
/// Clones share one buffer, so a caller can keep a handle after boxing
/// a clone into the bus.
#[derive(Clone, Default)]
pub struct VecSink {
    events: Arc<Mutex<Vec<SimulationEvent>>>,
}

impl VecSink {
    /// Creates an empty vec sink.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns a copy of every event received so far.
    pub fn events(&self) -> Vec<SimulationEvent> {
        self.events
            .lock()
            .map(|events| events.clone())
            .unwrap_or_default()
    }

    /// Number of events received so far.
    pub fn len(&self) -> usize {
        self.events.lock().map(|events| events.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl EventSink for VecSink {
    fn handle(&mut self, event: &SimulationEvent) {
        if let Ok(mut events) = self.events.lock() {
            events.push(event.clone());
        }
    }

    fn name(&self) -> &str {
        "vec_sink"
    }
}

/// Forwards events to the `tracing` subscriber at a fixed level.
pub struct TracingSink {
    level: tracing::Level,
}

impl TracingSink {
    /// Creates a new tracing sink at the given log level.
    pub fn new(level: tracing::Level) -> Self {
        Self { level }
    }
}

impl EventSink for TracingSink {
    fn handle(&mut self, event: &SimulationEvent) {
        // `tracing` macros need a constant level.
        match self.level {
            tracing::Level::ERROR => {
                tracing::error!(tick = event.tick, event = ?event.kind, "simulation_event")
            }
            tracing::Level::WARN => {
                tracing::warn!(tick = event.tick, event = ?event.kind, "simulation_event")
            }
            tracing::Level::INFO => {
                tracing::info!(tick = event.tick, event = ?event.kind, "simulation_event")
            }
            tracing::Level::DEBUG => {
                tracing::debug!(tick = event.tick, event = ?event.kind, "simulation_event")
            }
            _ => {
                tracing::trace!(tick = event.tick, event = ?event.kind, "simulation_event")
            }
        }
    }

    fn name(&self) -> &str {
        "tracing_sink"
    }
}
