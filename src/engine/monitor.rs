//! Background performance monitor.
//!
//! A dedicated thread samples the shared [`EngineMetrics`] on a fixed
//! interval and emits [`EngineEvent::PerformanceAlert`]s when cache hit
//! rate or average solve time breach their configured thresholds. The
//! handle stops and joins the thread on drop.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use std::thread::JoinHandle;
use std::time::Duration;

use tracing::warn;

use crate::events::{EngineEvent, EventSink};

/// Counters shared between the solve path and the monitor thread.
#[derive(Debug, Default)]
pub struct EngineMetrics {
    /// Cache lookups that returned a live entry.
    pub cache_hits: u64,
    /// Cache lookups that missed or found an expired entry.
    pub cache_misses: u64,
    /// Completed solves (cache hits excluded).
    pub solves: u64,
    /// Total wall time across completed solves.
    pub total_solve_time: Duration,
}

impl EngineMetrics {
    /// Cache hit rate over all lookups; 1.0 before any lookup happened.
    pub fn hit_rate(&self) -> f64 {
        let total = self.cache_hits + self.cache_misses;
        if total == 0 {
            return 1.0;
        }
        self.cache_hits as f64 / total as f64
    }

    /// Mean wall time per completed solve.
    pub fn avg_solve_time(&self) -> Duration {
        if self.solves == 0 {
            return Duration::ZERO;
        }
        self.total_solve_time / self.solves as u32
    }
}

/// Alert thresholds sampled by the monitor thread.
#[derive(Debug, Clone, Copy)]
pub struct MonitorThresholds {
    /// Hit rate below this raises a `cache_hit_rate` alert.
    pub min_hit_rate: f64,
    /// Average solve time above this raises an `avg_solve_time` alert.
    pub max_avg_solve_time: Duration,
}

/// Running monitor thread; stops and joins on drop.
pub struct MonitorHandle {
    stop: Arc<AtomicBool>,
    handle: Option<JoinHandle<()>>,
}

impl MonitorHandle {
    /// Spawns the monitor thread.
    pub fn start(
        interval: Duration,
        thresholds: MonitorThresholds,
        metrics: Arc<Mutex<EngineMetrics>>,
        sinks: Vec<Arc<dyn EventSink>>,
    ) -> Self {
        let stop = Arc::new(AtomicBool::new(false));
        let stop_flag = Arc::clone(&stop);

        let handle = std::thread::Builder::new()
            .name("mixopt-monitor".into())
            .spawn(move || {
                while !stop_flag.load(Ordering::Relaxed) {
                    std::thread::sleep(interval);
                    if stop_flag.load(Ordering::Relaxed) {
                        break;
                    }
                    check_once(&thresholds, &metrics, &sinks);
                }
            })
            .expect("failed to spawn monitor thread");

        Self {
            stop,
            handle: Some(handle),
        }
    }

    /// Signals the thread to stop without waiting for it.
    pub fn stop(&self) {
        self.stop.store(true, Ordering::Relaxed);
    }
}

impl Drop for MonitorHandle {
    fn drop(&mut self) {
        self.stop();
        if let Some(handle) = self.handle.take() {
            let _ = handle.join();
        }
    }
}

/// One monitoring sweep.
fn check_once(
    thresholds: &MonitorThresholds,
    metrics: &Mutex<EngineMetrics>,
    sinks: &[Arc<dyn EventSink>],
) {
    let (hit_rate, avg_solve, solves, lookups) = {
        let m = match metrics.lock() {
            Ok(m) => m,
            Err(_) => return,
        };
        (
            m.hit_rate(),
            m.avg_solve_time(),
            m.solves,
            m.cache_hits + m.cache_misses,
        )
    };

    if lookups > 0 && hit_rate < thresholds.min_hit_rate {
        warn!(hit_rate, threshold = thresholds.min_hit_rate, "cache hit rate below threshold");
        emit(
            sinks,
            &EngineEvent::PerformanceAlert {
                metric: "cache_hit_rate".into(),
                value: hit_rate,
                threshold: thresholds.min_hit_rate,
            },
        );
    }

    if solves > 0 && avg_solve > thresholds.max_avg_solve_time {
        warn!(?avg_solve, threshold = ?thresholds.max_avg_solve_time, "average solve time above threshold");
        emit(
            sinks,
            &EngineEvent::PerformanceAlert {
                metric: "avg_solve_time".into(),
                value: avg_solve.as_secs_f64(),
                threshold: thresholds.max_avg_solve_time.as_secs_f64(),
            },
        );
    }
}

fn emit(sinks: &[Arc<dyn EventSink>], event: &EngineEvent) {
    for sink in sinks {
        sink.on_event(event);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::events::MemorySink;

    #[test]
    fn test_metrics_defaults() {
        let metrics = EngineMetrics::default();
        assert_eq!(metrics.hit_rate(), 1.0);
        assert_eq!(metrics.avg_solve_time(), Duration::ZERO);
    }

    #[test]
    fn test_check_alerts_on_low_hit_rate() {
        let metrics = Mutex::new(EngineMetrics {
            cache_hits: 1,
            cache_misses: 9,
            solves: 0,
            total_solve_time: Duration::ZERO,
        });
        let sink = Arc::new(MemorySink::new());
        let thresholds = MonitorThresholds {
            min_hit_rate: 0.5,
            max_avg_solve_time: Duration::from_secs(10),
        };
        check_once(&thresholds, &metrics, &[sink.clone()]);

        assert_eq!(
            sink.count(|e| matches!(
                e,
                EngineEvent::PerformanceAlert { metric, .. } if metric == "cache_hit_rate"
            )),
            1
        );
    }

    #[test]
    fn test_check_alerts_on_slow_solves() {
        let metrics = Mutex::new(EngineMetrics {
            cache_hits: 5,
            cache_misses: 1,
            solves: 2,
            total_solve_time: Duration::from_secs(10),
        });
        let sink = Arc::new(MemorySink::new());
        let thresholds = MonitorThresholds {
            min_hit_rate: 0.2,
            max_avg_solve_time: Duration::from_secs(1),
        };
        check_once(&thresholds, &metrics, &[sink.clone()]);

        assert_eq!(
            sink.count(|e| matches!(
                e,
                EngineEvent::PerformanceAlert { metric, .. } if metric == "avg_solve_time"
            )),
            1
        );
    }

    #[test]
    fn test_quiet_system_raises_nothing() {
        let metrics = Mutex::new(EngineMetrics::default());
        let sink = Arc::new(MemorySink::new());
        let thresholds = MonitorThresholds {
            min_hit_rate: 0.5,
            max_avg_solve_time: Duration::from_millis(1),
        };
        check_once(&thresholds, &metrics, &[sink.clone()]);
        assert!(sink.events().is_empty());
    }

    #[test]
    fn test_handle_stops_on_drop() {
        let metrics = Arc::new(Mutex::new(EngineMetrics::default()));
        let handle = MonitorHandle::start(
            Duration::from_millis(5),
            MonitorThresholds {
                min_hit_rate: 0.0,
                max_avg_solve_time: Duration::from_secs(3600),
            },
            metrics,
            Vec::new(),
        );
        std::thread::sleep(Duration::from_millis(20));
        drop(handle);
    }
}
