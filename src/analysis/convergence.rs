//! Convergence-behavior assessment from the fitness history.

use serde::{Deserialize, Serialize};

/// Window used for the recent-improvement and stability statistics.
const RECENT_WINDOW: usize = 10;

/// Window used for oscillation detection.
const OSCILLATION_WINDOW: usize = 6;

/// Improvement below this over the recent window counts as a plateau.
const PLATEAU_EPSILON: f64 = 1e-9;

/// Convergence axis of a solution analysis.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConvergenceReport {
    /// How much of the total improvement happened early, in `[0, 1]`.
    /// High values mean the search front-loaded its progress.
    pub rate: f64,
    /// Inverse coefficient of variation over the recent window, in
    /// `(0, 1]`. `1.0` means the recent history is flat.
    pub stability: f64,
    /// Whether recent improvement has effectively stopped.
    pub plateau: bool,
    /// Whether the recent history alternates direction step to step.
    pub oscillating: bool,
    /// Iteration at which the run's own convergence check fired, if any.
    pub converged_at: Option<usize>,
}

/// Assesses convergence behavior from a best-so-far fitness history.
pub fn assess_convergence(history: &[f64], converged_at: Option<usize>) -> ConvergenceReport {
    ConvergenceReport {
        rate: convergence_rate(history),
        stability: stability(history),
        plateau: plateau(history),
        oscillating: oscillating(history),
        converged_at,
    }
}

/// Fraction of progress already banked: `1 − recent mean improvement /
/// overall mean improvement`. A search still improving as fast as it ever
/// did scores near zero; one that has flattened out scores near one.
fn convergence_rate(history: &[f64]) -> f64 {
    if history.len() < 2 {
        return 0.0;
    }
    let overall = mean_improvement(history);
    if overall <= 0.0 {
        return 1.0;
    }
    let start = history.len().saturating_sub(RECENT_WINDOW);
    let recent = mean_improvement(&history[start..]);
    (1.0 - recent / overall).clamp(0.0, 1.0)
}

/// Inverse coefficient of variation over the tail of the history.
pub fn stability(history: &[f64]) -> f64 {
    let start = history.len().saturating_sub(RECENT_WINDOW);
    let tail = &history[start..];
    if tail.len() < 2 {
        return 1.0;
    }
    let mean = tail.iter().sum::<f64>() / tail.len() as f64;
    let variance = tail.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / tail.len() as f64;
    let std = variance.sqrt();
    if mean.abs() < f64::EPSILON {
        return if std < f64::EPSILON { 1.0 } else { 0.0 };
    }
    1.0 / (1.0 + std / mean.abs())
}

fn plateau(history: &[f64]) -> bool {
    if history.len() < RECENT_WINDOW {
        return false;
    }
    let start = history.len() - RECENT_WINDOW;
    mean_improvement(&history[start..]) < PLATEAU_EPSILON
}

/// Direction alternation over the last few steps. Best-so-far histories are
/// monotone and never oscillate; raw current-fitness histories from SA-style
/// searches can.
fn oscillating(history: &[f64]) -> bool {
    if history.len() < OSCILLATION_WINDOW {
        return false;
    }
    let tail = &history[history.len() - OSCILLATION_WINDOW..];
    let mut alternations = 0;
    let mut prev_sign = 0i8;
    for pair in tail.windows(2) {
        let delta = pair[1] - pair[0];
        let sign = if delta > 0.0 {
            1
        } else if delta < 0.0 {
            -1
        } else {
            0
        };
        if sign != 0 && prev_sign != 0 && sign != prev_sign {
            alternations += 1;
        }
        if sign != 0 {
            prev_sign = sign;
        }
    }
    alternations >= OSCILLATION_WINDOW - 3
}

fn mean_improvement(history: &[f64]) -> f64 {
    if history.len() < 2 {
        return 0.0;
    }
    let total: f64 = history.windows(2).map(|p| (p[1] - p[0]).max(0.0)).sum();
    total / (history.len() - 1) as f64
}
