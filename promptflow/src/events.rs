//! Run observability callbacks.
//!
//! Presentation adapters implement [`RunObserver`] to surface per-stage
//! progress (for example, a terminal spinner per stage or intermediate
//! outputs in a web view). The runner never depends on observer behavior;
//! callbacks must not block for long and must not panic.

use tracing::{debug, info, warn, Level};

/// Callbacks fired as a pipeline run progresses.
pub trait RunObserver: Send + Sync {
    /// Called when a stage is about to dispatch its completion request.
    fn on_stage_started(&self, stage_id: &str);

    /// Called when a stage's output has been recorded.
    fn on_stage_completed(&self, stage_id: &str, output: &str);

    /// Called when a stage fails and the run is about to abort.
    fn on_stage_failed(&self, stage_id: &str, error: &str);

    /// Called when every stage has completed.
    fn on_run_completed(&self, final_stage_id: &str, duration_ms: f64);
}

/// A no-op observer that discards all callbacks.
///
/// Used as the default when no observer is configured.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoOpRunObserver;

impl RunObserver for NoOpRunObserver {
    fn on_stage_started(&self, _stage_id: &str) {}
    fn on_stage_completed(&self, _stage_id: &str, _output: &str) {}
    fn on_stage_failed(&self, _stage_id: &str, _error: &str) {}
    fn on_run_completed(&self, _final_stage_id: &str, _duration_ms: f64) {}
}

/// An observer that logs progress through the tracing framework.
#[derive(Debug, Clone)]
pub struct LoggingRunObserver {
    /// The log level for progress events.
    level: Level,
}

impl Default for LoggingRunObserver {
    fn default() -> Self {
        Self { level: Level::INFO }
    }
}

impl LoggingRunObserver {
    /// Creates a new logging observer at the specified level.
    #[must_use]
    pub fn new(level: Level) -> Self {
        Self { level }
    }

    /// Creates a debug-level logging observer.
    #[must_use]
    pub fn debug() -> Self {
        Self::new(Level::DEBUG)
    }

    fn log(&self, message: &str, stage_id: &str) {
        match self.level {
            Level::DEBUG => debug!(stage = %stage_id, "{message}"),
            _ => info!(stage = %stage_id, "{message}"),
        }
    }
}

impl RunObserver for LoggingRunObserver {
    fn on_stage_started(&self, stage_id: &str) {
        self.log("stage started", stage_id);
    }

    fn on_stage_completed(&self, stage_id: &str, output: &str) {
        match self.level {
            Level::DEBUG => debug!(stage = %stage_id, chars = output.len(), "stage completed"),
            _ => info!(stage = %stage_id, chars = output.len(), "stage completed"),
        }
    }

    fn on_stage_failed(&self, stage_id: &str, error: &str) {
        warn!(stage = %stage_id, error = %error, "stage failed");
    }

    fn on_run_completed(&self, final_stage_id: &str, duration_ms: f64) {
        match self.level {
            Level::DEBUG => {
                debug!(final_stage = %final_stage_id, duration_ms, "run completed");
            }
            _ => info!(final_stage = %final_stage_id, duration_ms, "run completed"),
        }
    }
}

/// A collecting observer for testing purposes.
#[derive(Debug, Default)]
pub struct CollectingRunObserver {
    events: parking_lot::RwLock<Vec<String>>,
}

impl CollectingRunObserver {
    /// Creates a new collecting observer.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the recorded event labels, in order.
    #[must_use]
    pub fn events(&self) -> Vec<String> {
        self.events.read().clone()
    }
}

impl RunObserver for CollectingRunObserver {
    fn on_stage_started(&self, stage_id: &str) {
        self.events.write().push(format!("started:{stage_id}"));
    }

    fn on_stage_completed(&self, stage_id: &str, _output: &str) {
        self.events.write().push(format!("completed:{stage_id}"));
    }

    fn on_stage_failed(&self, stage_id: &str, _error: &str) {
        self.events.write().push(format!("failed:{stage_id}"));
    }

    fn on_run_completed(&self, final_stage_id: &str, _duration_ms: f64) {
        self.events.write().push(format!("run:{final_stage_id}"));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_noop_observer_does_nothing() {
        let observer = NoOpRunObserver;
        observer.on_stage_started("structure");
        observer.on_stage_completed("structure", "text");
        observer.on_stage_failed("optimize", "boom");
        observer.on_run_completed("optimize", 12.5);
        // Should not panic
    }

    #[test]
    fn test_collecting_observer_records_in_order() {
        let observer = CollectingRunObserver::new();
        observer.on_stage_started("structure");
        observer.on_stage_completed("structure", "text");
        observer.on_run_completed("optimize", 1.0);

        assert_eq!(
            observer.events(),
            vec![
                "started:structure".to_string(),
                "completed:structure".to_string(),
                "run:optimize".to_string(),
            ]
        );
    }

    #[test]
    fn test_logging_observer_levels() {
        let observer = LoggingRunObserver::debug();
        observer.on_stage_started("structure");
        observer.on_stage_failed("structure", "boom");
        // Should not panic
    }
}
