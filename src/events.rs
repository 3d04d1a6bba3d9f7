//! Typed engine notifications.
//!
//! The engine emits [`EngineEvent`]s to registered [`EventSink`]s at every
//! significant point of the solve pipeline: start, completion, failure,
//! fallback, predicted quantum advantage and performance alerts. Emission is
//! fire-and-forget and never gates the solve path; subscribers are known at
//! registration time rather than discovered through an event-emitter base.
//!
//! Events are tagged with `#[serde(tag = "type")]` so they serialize as
//! `{ "type": "fallback_triggered", ... }` for easy ingestion by external
//! collectors.

use std::sync::Mutex;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use tracing::info;

use crate::backend::BackendStrategy;
use crate::classical::Algorithm;

/// Events emitted during engine operation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum EngineEvent {
    /// A solve request passed validation and is about to execute.
    OptimizationStarted {
        /// Problem being solved.
        problem_id: String,
        /// Strategy selected for this solve.
        strategy: BackendStrategy,
        /// Predicted backend advantage at selection time.
        predicted_advantage: f64,
    },

    /// A solve produced a solution.
    OptimizationCompleted {
        /// Problem that was solved.
        problem_id: String,
        /// Algorithm that produced the result.
        algorithm: Algorithm,
        /// Final fitness.
        fitness: f64,
        /// Wall time of the solve.
        elapsed: Duration,
        /// Whether the result came from the cache.
        cache_hit: bool,
    },

    /// A solve failed terminally. Emitted before the error is raised.
    OptimizationFailed {
        /// Problem that failed.
        problem_id: String,
        /// Human-readable failure description.
        reason: String,
    },

    /// The backend path failed and the classical library is taking over.
    FallbackTriggered {
        /// Problem being re-solved classically.
        problem_id: String,
        /// Why the backend path was abandoned.
        reason: String,
        /// Classical algorithm running the fallback.
        algorithm: Algorithm,
    },

    /// The advantage heuristic predicts a meaningful backend speedup.
    QuantumAdvantageDetected {
        /// Problem the prediction applies to.
        problem_id: String,
        /// Predicted advantage ratio (1.0 = parity, capped at 2.0).
        advantage: f64,
    },

    /// A monitored metric crossed its configured threshold.
    PerformanceAlert {
        /// Name of the metric that breached.
        metric: String,
        /// Observed value.
        value: f64,
        /// Configured threshold.
        threshold: f64,
    },
}

/// A registered event consumer.
///
/// Implementations must be cheap and non-blocking: they run inline on the
/// solve path (and on the monitor thread) before the result is returned.
pub trait EventSink: Send + Sync {
    /// Receives one event.
    fn on_event(&self, event: &EngineEvent);
}

/// Buffers events in memory; the collector used by tests and local tooling.
#[derive(Debug, Default)]
pub struct MemorySink {
    events: Mutex<Vec<EngineEvent>>,
}

impl MemorySink {
    /// Creates an empty sink.
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of all events received so far.
    pub fn events(&self) -> Vec<EngineEvent> {
        self.events.lock().expect("event buffer poisoned").clone()
    }

    /// Number of events matching a predicate.
    pub fn count(&self, predicate: impl Fn(&EngineEvent) -> bool) -> usize {
        self.events
            .lock()
            .expect("event buffer poisoned")
            .iter()
            .filter(|e| predicate(e))
            .count()
    }
}

impl EventSink for MemorySink {
    fn on_event(&self, event: &EngineEvent) {
        self.events
            .lock()
            .expect("event buffer poisoned")
            .push(event.clone());
    }
}

/// Forwards events to the `tracing` subscriber at `info` level.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingSink;

impl EventSink for TracingSink {
    fn on_event(&self, event: &EngineEvent) {
        info!(?event, "engine event");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_memory_sink_buffers() {
        let sink = MemorySink::new();
        sink.on_event(&EngineEvent::PerformanceAlert {
            metric: "cache_hit_rate".into(),
            value: 0.1,
            threshold: 0.2,
        });
        sink.on_event(&EngineEvent::OptimizationFailed {
            problem_id: "p".into(),
            reason: "backend down".into(),
        });
        assert_eq!(sink.events().len(), 2);
        assert_eq!(
            sink.count(|e| matches!(e, EngineEvent::PerformanceAlert { .. })),
            1
        );
    }

    #[test]
    fn test_event_wire_shape() {
        let event = EngineEvent::FallbackTriggered {
            problem_id: "p7".into(),
            reason: "timeout".into(),
            algorithm: Algorithm::SimulatedAnnealing,
        };
        let json = serde_json::to_string(&event).unwrap();
        assert!(json.contains("\"type\":\"fallback_triggered\""));
        assert!(json.contains("\"algorithm\":\"simulated_annealing\""));

        let back: EngineEvent = serde_json::from_str(&json).unwrap();
        assert_eq!(back, event);
    }
}
