use super::evaluable::Evaluable;
use std::collections::VecDeque;
use tracing::{debug, trace};

const DEFAULT_MEMORY: usize = 10;
const ARMIJO_C1: f64 = 1e-4;
const MAX_BACKTRACKS: usize = 40;
const RELATIVE_VALUE_TOLERANCE: f64 = 1e-12;
const CURVATURE_EPSILON: f64 = 1e-10;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OptimizerSettings {
    pub max_iterations: usize,
    /// Convergence threshold on the root-mean-square of the gradient.
    pub tolerance: f64,
}

impl Default for OptimizerSettings {
    fn default() -> Self {
        Self {
            max_iterations: 200,
            tolerance: 1e-3,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OptimizationOutcome {
    pub value: f64,
    pub iterations: usize,
    pub converged: bool,
}

struct Correction {
    s: Vec<f64>,
    y: Vec<f64>,
    rho: f64,
}

/// Limited-memory BFGS with a backtracking Armijo line search.
///
/// Non-convergence within the iteration cap is not an error: the problem is
/// left at the best state reached and the outcome reports `converged = false`.
#[derive(Debug, Clone)]
pub struct LbfgsOptimizer {
    settings: OptimizerSettings,
    memory: usize,
}

impl LbfgsOptimizer {
    pub fn new(settings: OptimizerSettings) -> Self {
        Self {
            settings,
            memory: DEFAULT_MEMORY,
        }
    }

    pub fn optimize<E: Evaluable + ?Sized>(&self, problem: &mut E) -> OptimizationOutcome {
        let n = problem.dimension();
        let mut x = problem.state();
        let mut gradient = vec![0.0; n];
        let mut value = problem.fg_value(&mut gradient);

        if n == 0 {
            return OptimizationOutcome {
                value,
                iterations: 0,
                converged: true,
            };
        }

        let mut history: VecDeque<Correction> = VecDeque::with_capacity(self.memory);
        let mut trial = vec![0.0; n];
        let mut trial_gradient = vec![0.0; n];
        let mut iterations = 0;
        let mut converged = false;

        while iterations < self.settings.max_iterations {
            if rms(&gradient) < self.settings.tolerance {
                converged = true;
                break;
            }

            let mut direction = self.search_direction(&gradient, &history);
            let mut slope = dot(&direction, &gradient);
            if !(slope < 0.0) {
                trace!("L-BFGS direction is not a descent direction; resetting history.");
                history.clear();
                direction = gradient.iter().map(|g| -g).collect();
                slope = -dot(&gradient, &gradient);
            }

            let mut step = if history.is_empty() {
                (1.0 / norm(&gradient)).min(1.0)
            } else {
                1.0
            };

            let mut trial_value = f64::NAN;
            let mut accepted = false;
            for _ in 0..MAX_BACKTRACKS {
                for i in 0..n {
                    trial[i] = x[i] + step * direction[i];
                }
                problem.set_state(&trial);
                trial_value = problem.fg_value(&mut trial_gradient);
                if trial_value.is_finite() && trial_value <= value + ARMIJO_C1 * step * slope {
                    accepted = true;
                    break;
                }
                step *= 0.5;
            }

            if !accepted {
                debug!(
                    "Line search failed after {} backtracks at iteration {}; keeping last state.",
                    MAX_BACKTRACKS, iterations
                );
                problem.set_state(&x);
                break;
            }

            // Curvature pairs use the raw step; the problem may have wrapped
            // the state it was given, so the iterate is read back from it.
            let s: Vec<f64> = direction.iter().map(|d| step * d).collect();
            let y: Vec<f64> = trial_gradient
                .iter()
                .zip(&gradient)
                .map(|(a, b)| a - b)
                .collect();
            let sy = dot(&s, &y);
            if sy > CURVATURE_EPSILON {
                if history.len() == self.memory {
                    history.pop_front();
                }
                history.push_back(Correction { s, y, rho: 1.0 / sy });
            }

            let change = (value - trial_value).abs();
            let scale = value.abs().max(trial_value.abs()).max(1.0);

            problem.state_into(&mut x);
            gradient.copy_from_slice(&trial_gradient);
            value = trial_value;
            iterations += 1;

            if change <= RELATIVE_VALUE_TOLERANCE * scale {
                converged = true;
                break;
            }
        }

        debug!(
            "L-BFGS finished after {} iteration(s): value = {:.6}, converged = {}.",
            iterations, value, converged
        );
        OptimizationOutcome {
            value,
            iterations,
            converged,
        }
    }

    /// Two-loop recursion: `-H·g` for the implicit inverse Hessian `H`.
    fn search_direction(&self, gradient: &[f64], history: &VecDeque<Correction>) -> Vec<f64> {
        let mut q = gradient.to_vec();
        let mut alphas = Vec::with_capacity(history.len());

        for correction in history.iter().rev() {
            let alpha = correction.rho * dot(&correction.s, &q);
            axpy(-alpha, &correction.y, &mut q);
            alphas.push(alpha);
        }

        if let Some(last) = history.back() {
            let gamma = 1.0 / (last.rho * dot(&last.y, &last.y));
            q.iter_mut().for_each(|v| *v *= gamma);
        }

        for (correction, alpha) in history.iter().zip(alphas.iter().rev()) {
            let beta = correction.rho * dot(&correction.y, &q);
            axpy(alpha - beta, &correction.s, &mut q);
        }

        q.iter_mut().for_each(|v| *v = -*v);
        q
    }
}

#[inline]
fn dot(a: &[f64], b: &[f64]) -> f64 {
    a.iter().zip(b).map(|(x, y)| x * y).sum()
}

#[inline]
fn norm(a: &[f64]) -> f64 {
    dot(a, a).sqrt()
}

#[inline]
fn rms(a: &[f64]) -> f64 {
    (dot(a, a) / a.len() as f64).sqrt()
}

#[inline]
fn axpy(alpha: f64, x: &[f64], y: &mut [f64]) {
    for (yi, xi) in y.iter_mut().zip(x) {
        *yi += alpha * xi;
    }
}
