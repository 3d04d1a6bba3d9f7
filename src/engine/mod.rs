//! Orchestration engine: strategy selection, caching, backend fallback,
//! analysis and monitoring around the classical library.
//!
//! The engine owns no global state; backends, evaluators and event sinks
//! are injected at construction. One engine instance is cheap and callers
//! that want a shared one wrap it in an `Arc` themselves.

mod cache;
mod monitor;
mod selection;

pub use cache::SolutionCache;
pub use monitor::{EngineMetrics, MonitorHandle, MonitorThresholds};
pub use selection::{algorithm_for, predicted_advantage, select_strategy, StrategyDecision};

use std::collections::HashMap;
use std::sync::mpsc;
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};

use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::analysis::SolutionAnalyzer;
use crate::backend::{BackendConfig, QuantumBackend};
use crate::classical::{Algorithm, ClassicalSolver, SolverParams};
use crate::error::EngineError;
use crate::events::{EngineEvent, EventSink};
use crate::fitness::ProblemEvaluator;
use crate::model::{OptimizationProblem, OptimizationSolution, ProblemKind};

/// Engine tuning knobs.
#[derive(Debug, Clone)]
pub struct EngineConfig {
    /// Whether the quantum backend path is eligible at all.
    pub backend_enabled: bool,
    /// Whether backend failures fall back to the classical library.
    /// When `false`, backend errors propagate to the caller.
    pub fallback_enabled: bool,
    /// Maximum cached solutions.
    pub cache_capacity: usize,
    /// Cached solution lifetime.
    pub cache_ttl: Duration,
    /// Wall-clock budget per solve, enforced on the backend path and
    /// handed to classical runners as a deadline.
    pub solve_timeout: Duration,
    /// Wall-clock budget for real-time solves; the same pipeline runs
    /// under this tighter deadline.
    pub realtime_timeout: Duration,
    /// Complexity score above which the annealing strategy is considered.
    pub complexity_threshold: usize,
    /// Predicted advantage required, together with high complexity, to
    /// choose the annealing strategy.
    pub advantage_threshold: f64,
    /// Predicted advantage above which an advantage event is emitted.
    pub advantage_alert_threshold: f64,
    /// Sampling interval of the performance monitor.
    pub monitor_interval: Duration,
    /// Cache hit rate below which the monitor raises an alert.
    pub min_hit_rate: f64,
    /// Average solve time above which the monitor raises an alert.
    pub max_avg_solve_time: Duration,
    /// Parameters handed to the classical solvers.
    pub solver_params: SolverParams,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            backend_enabled: true,
            fallback_enabled: true,
            cache_capacity: 128,
            cache_ttl: Duration::from_secs(300),
            solve_timeout: Duration::from_secs(30),
            realtime_timeout: Duration::from_secs(2),
            complexity_threshold: 100,
            advantage_threshold: 1.2,
            advantage_alert_threshold: 1.5,
            monitor_interval: Duration::from_secs(5),
            min_hit_rate: 0.2,
            max_avg_solve_time: Duration::from_secs(1),
            solver_params: SolverParams::default(),
        }
    }
}

/// Side-by-side comparison of the backend and classical paths on one
/// problem.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BenchmarkReport {
    /// Problem that was benchmarked.
    pub problem_id: String,
    /// Classical algorithm used for the comparison.
    pub algorithm: Algorithm,
    /// Best classical fitness.
    pub classical_fitness: f64,
    /// Classical wall time.
    pub classical_elapsed: Duration,
    /// Best backend fitness.
    pub backend_fitness: f64,
    /// Backend wall time.
    pub backend_elapsed: Duration,
    /// `backend_fitness / classical_fitness`; above 1.0 the backend won
    /// on quality.
    pub quality_ratio: f64,
    /// `classical_elapsed / backend_elapsed`; above 1.0 the backend won
    /// on speed.
    pub speedup: f64,
}

/// The orchestration engine.
pub struct OptimizationEngine {
    config: EngineConfig,
    backend: Option<Arc<dyn QuantumBackend>>,
    classical: ClassicalSolver,
    cache: Mutex<SolutionCache>,
    evaluators: HashMap<ProblemKind, Arc<dyn ProblemEvaluator>>,
    sinks: Vec<Arc<dyn EventSink>>,
    metrics: Arc<Mutex<EngineMetrics>>,
    analyzer: SolutionAnalyzer,
}

impl OptimizationEngine {
    /// Creates an engine with no backend, no evaluators and no sinks.
    pub fn new(config: EngineConfig) -> Self {
        let cache = SolutionCache::new(config.cache_capacity, config.cache_ttl);
        Self {
            config,
            backend: None,
            classical: ClassicalSolver::new(),
            cache: Mutex::new(cache),
            evaluators: HashMap::new(),
            sinks: Vec::new(),
            metrics: Arc::new(Mutex::new(EngineMetrics::default())),
            analyzer: SolutionAnalyzer::new(),
        }
    }

    /// Attaches a quantum backend.
    pub fn with_backend(mut self, backend: Arc<dyn QuantumBackend>) -> Self {
        self.backend = Some(backend);
        self
    }

    /// Registers the evaluator for a problem kind, replacing any previous
    /// registration.
    pub fn with_evaluator(
        mut self,
        kind: ProblemKind,
        evaluator: Arc<dyn ProblemEvaluator>,
    ) -> Self {
        self.evaluators.insert(kind, evaluator);
        self
    }

    /// Subscribes an event sink.
    pub fn with_sink(mut self, sink: Arc<dyn EventSink>) -> Self {
        self.sinks.push(sink);
        self
    }

    /// Solves a problem with the full pipeline: validation, cache lookup,
    /// strategy selection, backend-with-fallback or classical execution,
    /// analysis and caching.
    pub fn submit(
        &self,
        problem: &OptimizationProblem,
    ) -> Result<OptimizationSolution, EngineError> {
        self.solve_inner(problem, &self.config.solver_params, self.config.solve_timeout)
    }

    /// Latency-sensitive solve: reduced iteration budgets under the
    /// tighter `realtime_timeout`. Selection, backend routing, fallback,
    /// cache, analysis and events behave as in [`submit`].
    ///
    /// [`submit`]: OptimizationEngine::submit
    pub fn submit_realtime(
        &self,
        problem: &OptimizationProblem,
    ) -> Result<OptimizationSolution, EngineError> {
        self.solve_inner(
            problem,
            &SolverParams::realtime(),
            self.config.realtime_timeout,
        )
    }

    /// Runs the backend and the classical path on the same problem and
    /// compares quality and speed.
    pub fn benchmark(
        &self,
        problem: &OptimizationProblem,
    ) -> Result<BenchmarkReport, EngineError> {
        problem.validate()?;
        let backend = self.backend.as_ref().ok_or_else(|| EngineError::Backend {
            backend: "none".into(),
            reason: "benchmarking requires a configured backend".into(),
        })?;
        let evaluator = self.evaluator_for(problem)?;

        let decision = select_strategy(
            problem,
            self.config.complexity_threshold,
            self.config.advantage_threshold,
        );
        let algorithm = algorithm_for(decision.strategy);

        let classical_started = Instant::now();
        let classical = self.classical.optimize(
            problem,
            evaluator.as_ref(),
            algorithm,
            &self.config.solver_params,
            Some(Instant::now() + self.config.solve_timeout),
        );
        let classical_elapsed = classical_started.elapsed();

        let backend_started = Instant::now();
        let quantum = self.execute_backend(
            Arc::clone(backend),
            problem,
            &decision,
            self.config.solve_timeout,
        )?;
        let backend_elapsed = backend_started.elapsed();

        let quality_ratio = if classical.fitness.abs() < f64::EPSILON {
            1.0
        } else {
            quantum.solution.fitness / classical.fitness
        };
        let speedup = if backend_elapsed.is_zero() {
            1.0
        } else {
            classical_elapsed.as_secs_f64() / backend_elapsed.as_secs_f64()
        };

        info!(
            problem = %problem.id,
            quality_ratio,
            speedup,
            "benchmark complete"
        );

        Ok(BenchmarkReport {
            problem_id: problem.id.clone(),
            algorithm,
            classical_fitness: classical.fitness,
            classical_elapsed,
            backend_fitness: quantum.solution.fitness,
            backend_elapsed,
            quality_ratio,
            speedup,
        })
    }

    /// Starts the background performance monitor. The monitor stops when
    /// the returned handle is dropped.
    pub fn start_monitor(&self) -> MonitorHandle {
        MonitorHandle::start(
            self.config.monitor_interval,
            MonitorThresholds {
                min_hit_rate: self.config.min_hit_rate,
                max_avg_solve_time: self.config.max_avg_solve_time,
            },
            Arc::clone(&self.metrics),
            self.sinks.clone(),
        )
    }

    /// Number of classical solver invocations so far; cache hits do not
    /// count.
    pub fn solver_invocations(&self) -> usize {
        self.classical.invocations()
    }

    /// Snapshot of the shared metrics.
    pub fn metrics(&self) -> EngineMetrics {
        let m = self.metrics.lock().expect("metrics poisoned");
        EngineMetrics {
            cache_hits: m.cache_hits,
            cache_misses: m.cache_misses,
            solves: m.solves,
            total_solve_time: m.total_solve_time,
        }
    }

    fn solve_inner(
        &self,
        problem: &OptimizationProblem,
        params: &SolverParams,
        timeout: Duration,
    ) -> Result<OptimizationSolution, EngineError> {
        if let Err(e) = problem.validate() {
            self.emit(&EngineEvent::OptimizationFailed {
                problem_id: problem.id.clone(),
                reason: e.to_string(),
            });
            return Err(e.into());
        }
        let evaluator = match self.evaluator_for(problem) {
            Ok(e) => e,
            Err(e) => {
                self.emit(&EngineEvent::OptimizationFailed {
                    problem_id: problem.id.clone(),
                    reason: e.to_string(),
                });
                return Err(e);
            }
        };

        let key = problem.fingerprint();
        if let Some(cached) = self.cache.lock().expect("cache poisoned").get(&key) {
            self.record_hit();
            self.emit(&EngineEvent::OptimizationCompleted {
                problem_id: problem.id.clone(),
                algorithm: cached.algorithm,
                fitness: cached.fitness,
                elapsed: Duration::ZERO,
                cache_hit: true,
            });
            return Ok((*cached).clone());
        }
        self.record_miss();

        let decision = select_strategy(
            problem,
            self.config.complexity_threshold,
            self.config.advantage_threshold,
        );
        if decision.predicted_advantage > self.config.advantage_alert_threshold {
            self.emit(&EngineEvent::QuantumAdvantageDetected {
                problem_id: problem.id.clone(),
                advantage: decision.predicted_advantage,
            });
        }
        self.emit(&EngineEvent::OptimizationStarted {
            problem_id: problem.id.clone(),
            strategy: decision.strategy,
            predicted_advantage: decision.predicted_advantage,
        });

        let started = Instant::now();
        let algorithm = algorithm_for(decision.strategy);
        let deadline = Some(started + timeout);

        // Every non-cache solve routes through an enabled backend; the
        // predicted advantage only drives strategy choice and the
        // advantage event.
        let backend = if self.config.backend_enabled {
            self.backend.as_ref().map(Arc::clone)
        } else {
            None
        };

        let mut solution = if let Some(backend) = backend {
            let backend_name = backend.name().to_string();
            match self.execute_backend(backend, problem, &decision, timeout) {
                Ok(quantum) => quantum.solution,
                Err(e) if self.config.fallback_enabled => {
                    warn!(problem = %problem.id, error = %e, "backend failed, falling back");
                    self.emit(&EngineEvent::FallbackTriggered {
                        problem_id: problem.id.clone(),
                        reason: format!("{backend_name}: {e}"),
                        algorithm,
                    });
                    self.classical
                        .optimize(problem, evaluator.as_ref(), algorithm, params, deadline)
                }
                Err(e) => {
                    self.emit(&EngineEvent::OptimizationFailed {
                        problem_id: problem.id.clone(),
                        reason: e.to_string(),
                    });
                    return Err(e);
                }
            }
        } else {
            self.classical
                .optimize(problem, evaluator.as_ref(), algorithm, params, deadline)
        };
        let elapsed = started.elapsed();

        self.analyzer.analyze(problem, &mut solution);
        self.record_solve(elapsed);

        self.cache
            .lock()
            .expect("cache poisoned")
            .insert(key, Arc::new(solution.clone()));

        self.emit(&EngineEvent::OptimizationCompleted {
            problem_id: problem.id.clone(),
            algorithm: solution.algorithm,
            fitness: solution.fitness,
            elapsed,
            cache_hit: false,
        });

        Ok(solution)
    }

    /// Runs the backend on a worker thread so a hung backend cannot stall
    /// the solve path past `solve_timeout`.
    fn execute_backend(
        &self,
        backend: Arc<dyn QuantumBackend>,
        problem: &OptimizationProblem,
        decision: &StrategyDecision,
        timeout: Duration,
    ) -> Result<crate::model::QuantumOptimizationSolution, EngineError> {
        let config = BackendConfig {
            strategy: decision.strategy,
            time_limit: timeout,
            ..BackendConfig::default()
        };
        let owned_problem = problem.clone();
        let (tx, rx) = mpsc::channel();

        std::thread::spawn(move || {
            let result = backend.execute(&owned_problem, &config);
            // Receiver may have timed out and gone away.
            let _ = tx.send(result);
        });

        match rx.recv_timeout(timeout) {
            Ok(result) => result,
            Err(_) => Err(EngineError::Timeout(timeout)),
        }
    }

    fn evaluator_for(
        &self,
        problem: &OptimizationProblem,
    ) -> Result<Arc<dyn ProblemEvaluator>, EngineError> {
        self.evaluators
            .get(&problem.kind)
            .cloned()
            .ok_or(EngineError::NoEvaluator(problem.kind))
    }

    fn emit(&self, event: &EngineEvent) {
        for sink in &self.sinks {
            sink.on_event(event);
        }
    }

    fn record_hit(&self) {
        self.metrics.lock().expect("metrics poisoned").cache_hits += 1;
    }

    fn record_miss(&self) {
        self.metrics.lock().expect("metrics poisoned").cache_misses += 1;
    }

    fn record_solve(&self, elapsed: Duration) {
        let mut m = self.metrics.lock().expect("metrics poisoned");
        m.solves += 1;
        m.total_solve_time += elapsed;
    }
}
