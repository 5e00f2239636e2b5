use super::energy::{ForceField, ForceFieldError};
use super::restraint::PositionalRestraint;
use crate::core::optimize::evaluable::Evaluable;
use crate::core::optimize::lbfgs::{LbfgsOptimizer, OptimizationOutcome, OptimizerSettings};
use nalgebra::{Point3, Vector3};
use tracing::debug;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MinimizeResult {
    /// Force-field energy at the final coordinates, restraint excluded.
    pub energy: f64,
    pub restraint_energy: f64,
    pub outcome: OptimizationOutcome,
}

/// Minimizes the force-field energy, plus an optional restraint, over all
/// Cartesian coordinates. `positions` is updated in place.
pub fn minimize<F: ForceField + ?Sized>(
    forcefield: &F,
    positions: &mut [Point3<f64>],
    restraint: Option<&PositionalRestraint>,
    settings: &OptimizerSettings,
) -> Result<MinimizeResult, ForceFieldError> {
    let expected = forcefield.atom_count();
    if positions.len() != expected {
        return Err(ForceFieldError::AtomCountMismatch {
            expected,
            found: positions.len(),
        });
    }
    if let Some(found) = restraint
        .map(|r| r.anchors().len())
        .filter(|&n| n != expected)
    {
        return Err(ForceFieldError::AtomCountMismatch { expected, found });
    }

    let mut problem = CartesianProblem {
        forcefield,
        restraint,
        positions: positions.to_vec(),
    };
    let outcome = LbfgsOptimizer::new(*settings).optimize(&mut problem);
    positions.copy_from_slice(&problem.positions);

    let energy = forcefield.energy(positions);
    let restraint_energy = restraint.map_or(0.0, |r| {
        let mut scratch = vec![Vector3::zeros(); positions.len()];
        r.energy_and_gradient(positions, &mut scratch)
    });
    debug!(
        "Minimization: E = {:.4}, restraint = {:.4}, {} iteration(s).",
        energy, restraint_energy, outcome.iterations
    );

    Ok(MinimizeResult {
        energy,
        restraint_energy,
        outcome,
    })
}

struct CartesianProblem<'a, F: ForceField + ?Sized> {
    forcefield: &'a F,
    restraint: Option<&'a PositionalRestraint>,
    positions: Vec<Point3<f64>>,
}

impl<F: ForceField + ?Sized> Evaluable for CartesianProblem<'_, F> {
    fn dimension(&self) -> usize {
        3 * self.positions.len()
    }

    fn state_into(&self, buffer: &mut [f64]) {
        for (chunk, position) in buffer.chunks_exact_mut(3).zip(&self.positions) {
            chunk.copy_from_slice(position.coords.as_slice());
        }
    }

    fn set_state(&mut self, state: &[f64]) {
        for (position, chunk) in self.positions.iter_mut().zip(state.chunks_exact(3)) {
            *position = Point3::new(chunk[0], chunk[1], chunk[2]);
        }
    }

    fn fg_value(&self, gradient: &mut [f64]) -> f64 {
        let mut cartesian = vec![Vector3::zeros(); self.positions.len()];
        let mut value = self
            .forcefield
            .energy_and_gradient(&self.positions, &mut cartesian);
        if let Some(restraint) = self.restraint {
            value += restraint.energy_and_gradient(&self.positions, &mut cartesian);
        }
        for (chunk, grad) in gradient.chunks_exact_mut(3).zip(&cartesian) {
            chunk.copy_from_slice(grad.as_slice());
        }
        value
    }
}
