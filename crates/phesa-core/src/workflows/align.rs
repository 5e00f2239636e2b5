use crate::core::descriptors::volume::MolecularVolume;
use crate::core::forcefield::energy::{ForceField, ForceFieldError};
use crate::core::forcefield::minimize::minimize;
use crate::core::forcefield::parameterization::Parameterizer;
use crate::core::forcefield::params::ForcefieldParams;
use crate::core::forcefield::restraint::PositionalRestraint;
use crate::core::models::molecule::Molecule;
use crate::core::optimize::lbfgs::LbfgsOptimizer;
use crate::core::topology::rotatable::{RotatableBond, RotatableBondAnalyzer};
use crate::core::utils::geometry::calculate_rmsd;
use crate::engine::config::{AlignmentConfig, ScoringConfig};
use crate::engine::error::EngineError;
use crate::engine::objective::AlignmentObjective;
use crate::engine::perturbation::TorsionPerturbator;
use crate::engine::progress::{Phase, Progress, ProgressReporter};
use crate::engine::state::{AlignmentResult, MonteCarloStep};
use nalgebra::Point3;
use tracing::{debug, info, instrument, warn};

/// Aligns `fit` onto `reference` and returns the best blended Tanimoto.
///
/// Force-field parameters are assigned from `params`. A fit molecule the
/// parameters do not cover is reported and scores `0.0` without touching its
/// coordinates. On success `fit` is left at the best pose found.
#[instrument(skip_all, name = "align")]
pub fn align(
    reference: &Molecule,
    fit: &mut Molecule,
    params: &ForcefieldParams,
    config: &AlignmentConfig,
) -> Result<f64, EngineError> {
    let forcefield = match Parameterizer::new(params).parameterize(fit) {
        Ok(forcefield) => forcefield,
        Err(ForceFieldError::MissingParameters { atom, element }) => {
            warn!(
                "No force-field parameters for atom {} ({}); skipping alignment.",
                atom, element
            );
            return Ok(0.0);
        }
        Err(e) => return Err(e.into()),
    };
    let result = run(reference, fit, &forcefield, config, &ProgressReporter::new())?;
    Ok(result.score)
}

/// Runs the full alignment with a caller-supplied force field.
///
/// The starting coordinates of `fit` are taken as its rigid prealignment
/// onto the reference.
#[instrument(skip_all, name = "alignment_workflow")]
pub fn run<F: ForceField + ?Sized>(
    reference: &Molecule,
    fit: &mut Molecule,
    forcefield: &F,
    config: &AlignmentConfig,
    reporter: &ProgressReporter,
) -> Result<AlignmentResult, EngineError> {
    config.validate()?;

    // === Phase 0: Preparation ===
    reporter.report(Progress::PhaseStart(Phase::Preparation));
    let reference_volume = MolecularVolume::from_molecule(reference);
    if reference_volume.atomic.is_empty() {
        return Err(EngineError::InvalidInput(
            "Reference molecule has no heavy atoms".to_string(),
        ));
    }
    let fit_volume = MolecularVolume::from_molecule(fit);
    if fit_volume.atomic.is_empty() {
        return Err(EngineError::InvalidInput(
            "Fit molecule has no heavy atoms".to_string(),
        ));
    }
    let bonds = RotatableBondAnalyzer::new(fit).analyze();
    info!(
        "Aligning {} fit atoms with {} rotatable bond(s) onto {} reference atoms.",
        fit.atom_count(),
        bonds.len(),
        reference.atom_count()
    );
    reporter.report(Progress::PhaseFinish(Phase::Preparation));

    // === Phase 1: Strain baseline ===
    let prealigned = fit.positions();
    let mut isolated = prealigned.clone();
    let baseline = minimize(
        forcefield,
        &mut isolated,
        None,
        &config.relaxation.settings(),
    )?;
    let strain_baseline = baseline.energy;
    debug!("Strain baseline e0 = {:.4}.", strain_baseline);

    // === Phase 2: Restrained relaxation ===
    let (relaxed, relaxation_cycles) =
        restrained_relaxation(forcefield, prealigned, strain_baseline, config, reporter)?;

    // === Phase 3: Local optimization ===
    reporter.report(Progress::PhaseStart(Phase::LocalOptimization));
    let pose_optimizer = PoseOptimizer {
        reference: &reference_volume,
        fit: &fit_volume,
        bonds: &bonds,
        forcefield,
        scoring: config.scoring,
        optimizer: LbfgsOptimizer::new(config.optimization.settings()),
        strain_baseline,
    };
    let (mut current, mut current_score) = pose_optimizer.optimize(relaxed);
    let initial_score = current_score;
    info!("Initial local optimization reached Tanimoto {:.4}.", initial_score);
    reporter.report(Progress::PhaseFinish(Phase::LocalOptimization));

    // === Phase 4: Monte Carlo refinement ===
    let mut best = (current.clone(), current_score);
    let mut trace = Vec::new();
    match TorsionPerturbator::init(&bonds, &config.monte_carlo) {
        Some(mut perturbator) => {
            let steps = config.monte_carlo.steps;
            reporter.report(Progress::PhaseStart(Phase::MonteCarlo));
            for step in 1..=steps {
                let mut trial = current.clone();
                let (bond, angle) = perturbator.step(&mut trial);
                let (candidate, score) = pose_optimizer.optimize(trial);
                let accepted = perturbator.accept(current_score, score);
                if accepted {
                    current = candidate;
                    current_score = score;
                    if score > best.1 {
                        best = (current.clone(), score);
                    }
                }
                trace.push(MonteCarloStep {
                    bond,
                    angle,
                    score,
                    accepted,
                });
                reporter.report(Progress::TrialScored {
                    step,
                    total: steps,
                    score,
                    accepted,
                });
            }
            reporter.report(Progress::PhaseFinish(Phase::MonteCarlo));
        }
        None => {
            info!("No rotatable bonds; skipping Monte Carlo refinement.");
            reporter.report(Progress::Message(
                "Rigid fit molecule: Monte Carlo refinement skipped".to_string(),
            ));
        }
    }

    // === Phase 5: Write back the best pose ===
    let (positions, score) = best;
    if let Some(rmsd) = calculate_rmsd(&fit.positions(), &positions) {
        debug!("Best pose lies {:.3} A RMSD from the input pose.", rmsd);
    }
    fit.set_positions(&positions).ok_or_else(|| {
        EngineError::Internal("Best pose does not match the fit molecule".to_string())
    })?;
    let final_energy = forcefield.energy(&positions);

    let result = AlignmentResult {
        score,
        initial_score,
        strain_baseline,
        final_energy,
        relaxation_cycles,
        monte_carlo: trace,
        positions,
    };
    info!(
        "Alignment complete: Tanimoto {:.4} (initial {:.4}), strain {:.4}, {}/{} Monte Carlo step(s) accepted.",
        result.score,
        result.initial_score,
        result.final_energy - result.strain_baseline,
        result.accepted_steps(),
        result.monte_carlo.len()
    );
    Ok(result)
}

/// Minimizes under a positional restraint anchored at the prealigned pose,
/// widening the restraint each cycle until the strain is within the cutoff.
fn restrained_relaxation<F: ForceField + ?Sized>(
    forcefield: &F,
    prealigned: Vec<Point3<f64>>,
    strain_baseline: f64,
    config: &AlignmentConfig,
    reporter: &ProgressReporter,
) -> Result<(Vec<Point3<f64>>, usize), EngineError> {
    let relaxation = &config.relaxation;
    let cutoff = config.scoring.strain_cutoff;

    let mut positions = prealigned.clone();
    if forcefield.energy(&positions) - strain_baseline <= cutoff {
        debug!("Prealigned pose is already within the strain cutoff.");
        return Ok((positions, 0));
    }

    reporter.report(Progress::PhaseStart(Phase::Relaxation));
    let settings = relaxation.settings();
    let mut restraint = PositionalRestraint::new(prealigned, relaxation.stiffness, 0.0);
    let mut cycles = 0;
    for cycle in 1..=relaxation.max_cycles {
        restraint = restraint.with_radius(relaxation.radius_increment * cycle as f64);
        let result = minimize(forcefield, &mut positions, Some(&restraint), &settings)?;
        cycles = cycle;
        let strain = result.energy - strain_baseline;
        reporter.report(Progress::RelaxationCycle { cycle, strain });
        debug!(
            "Relaxation cycle {}: radius {:.2}, strain {:.4}.",
            cycle,
            restraint.radius(),
            strain
        );
        if strain <= cutoff {
            break;
        }
    }
    if forcefield.energy(&positions) - strain_baseline > cutoff {
        warn!(
            "Strain still above {:.1} after {} relaxation cycle(s); continuing.",
            cutoff, cycles
        );
    }
    reporter.report(Progress::PhaseFinish(Phase::Relaxation));
    Ok((positions, cycles))
}

/// Shared inputs of every local optimization in one alignment run.
struct PoseOptimizer<'a, F: ForceField + ?Sized> {
    reference: &'a MolecularVolume,
    fit: &'a MolecularVolume,
    bonds: &'a [RotatableBond],
    forcefield: &'a F,
    scoring: ScoringConfig,
    optimizer: LbfgsOptimizer,
    strain_baseline: f64,
}

impl<F: ForceField + ?Sized> PoseOptimizer<'_, F> {
    /// Optimizes a fresh objective started at `snapshot`; returns the final
    /// coordinates and their unpenalized Tanimoto.
    fn optimize(&self, snapshot: Vec<Point3<f64>>) -> (Vec<Point3<f64>>, f64) {
        let mut objective = AlignmentObjective::new(
            self.reference,
            self.fit.clone(),
            snapshot,
            self.bonds,
            self.forcefield,
            self.scoring,
            self.strain_baseline,
        );
        let outcome = self.optimizer.optimize(&mut objective);
        if !outcome.converged {
            debug!(
                "Local optimization stopped after {} iteration(s) without converging.",
                outcome.iterations
            );
        }
        (objective.coordinates().to_vec(), objective.tanimoto())
    }
}
