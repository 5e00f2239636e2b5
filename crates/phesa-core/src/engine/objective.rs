//! The penalized overlap objective minimized during each local optimization.
//!
//! `value = -T + λ·strain²` with the blended Tanimoto
//! `T = (1 - w)·T_shape + w·T_pharmacophore` and
//! `strain = max(0, E - e0 - cutoff)`. The Cartesian gradient is propagated
//! into the state vector through [`FlexiblePose::backpropagate`].

use super::config::ScoringConfig;
use super::overlap::{
    Frame, pharmacophore_overlap, self_pharmacophore_overlap, self_shape_overlap, shape_overlap,
};
use super::pose::{FlexiblePose, RIGID_DOF};
use crate::core::descriptors::volume::MolecularVolume;
use crate::core::forcefield::energy::ForceField;
use crate::core::optimize::evaluable::Evaluable;
use crate::core::topology::rotatable::RotatableBond;
use crate::core::utils::geometry::normalize_angle;
use nalgebra::{Point3, Vector3};

/// Tanimoto denominators below this are treated as empty overlaps.
const DEGENERATE_DENOMINATOR: f64 = 1e-12;

/// One local-optimization phase of the fit molecule against a fixed reference.
///
/// Constructed from an owned coordinate snapshot; the reference self
/// overlaps are computed once here and never refreshed.
pub struct AlignmentObjective<'a, F: ForceField + ?Sized> {
    reference: &'a MolecularVolume,
    fit: MolecularVolume,
    pose: FlexiblePose<'a>,
    forcefield: &'a F,
    scoring: ScoringConfig,
    strain_baseline: f64,
    reference_shape: f64,
    reference_pharmacophore: f64,
    /// Blend weight of the pharmacophore term; zero when neither molecule
    /// carries a feature.
    pharmacophore_weight: f64,
    state: Vec<f64>,
}

struct Overlaps {
    shape_cross: f64,
    shape_self: f64,
    pharmacophore_cross: f64,
    pharmacophore_self: f64,
}

impl<'a, F: ForceField + ?Sized> AlignmentObjective<'a, F> {
    /// Starts at the identity state, so the working conformer equals `snapshot`.
    pub fn new(
        reference: &'a MolecularVolume,
        fit: MolecularVolume,
        snapshot: Vec<Point3<f64>>,
        bonds: &'a [RotatableBond],
        forcefield: &'a F,
        scoring: ScoringConfig,
        strain_baseline: f64,
    ) -> Self {
        let pose = FlexiblePose::new(snapshot, bonds);
        let state = pose.identity_state();
        let pharmacophore_weight =
            if reference.pharmacophores.is_empty() && fit.pharmacophores.is_empty() {
                0.0
            } else {
                scoring.pharmacophore_weight
            };
        let mut objective = Self {
            reference_shape: self_shape_overlap(reference, Frame::Rigid, None),
            reference_pharmacophore: self_pharmacophore_overlap(reference, Frame::Rigid, None),
            reference,
            fit,
            pose,
            forcefield,
            scoring,
            strain_baseline,
            pharmacophore_weight,
            state: Vec::new(),
        };
        objective.set_state(&state);
        objective
    }

    /// Unpenalized blended Tanimoto at the current state.
    pub fn tanimoto(&self) -> f64 {
        let overlaps = self.overlaps(None);
        self.blend(&overlaps)
    }

    pub fn coordinates(&self) -> &[Point3<f64>] {
        self.pose.coordinates()
    }

    fn blend(&self, overlaps: &Overlaps) -> f64 {
        let w = self.pharmacophore_weight;
        let shape = tanimoto(
            overlaps.shape_cross,
            self.reference_shape,
            overlaps.shape_self,
        );
        let pharmacophore = tanimoto(
            overlaps.pharmacophore_cross,
            self.reference_pharmacophore,
            overlaps.pharmacophore_self,
        );
        (1.0 - w) * shape + w * pharmacophore
    }

    /// Cross and self overlaps of the current fit conformer. The gradient
    /// buffers, when given, are `[d shape_cross, d shape_self, d pp_cross, d pp_self]`.
    fn overlaps(&self, gradients: Option<&mut [Vec<Vector3<f64>>; 4]>) -> Overlaps {
        let frame = Frame::Flexible(self.pose.coordinates());
        match gradients {
            None => Overlaps {
                shape_cross: shape_overlap(self.reference, &self.fit, None),
                shape_self: self_shape_overlap(&self.fit, frame, None),
                pharmacophore_cross: pharmacophore_overlap(self.reference, &self.fit, None),
                pharmacophore_self: self_pharmacophore_overlap(&self.fit, frame, None),
            },
            Some([d_ab, d_bb, d_ab_pp, d_bb_pp]) => Overlaps {
                shape_cross: shape_overlap(self.reference, &self.fit, Some(d_ab.as_mut_slice())),
                shape_self: self_shape_overlap(&self.fit, frame, Some(d_bb.as_mut_slice())),
                pharmacophore_cross: pharmacophore_overlap(
                    self.reference,
                    &self.fit,
                    Some(d_ab_pp.as_mut_slice()),
                ),
                pharmacophore_self: self_pharmacophore_overlap(
                    &self.fit,
                    frame,
                    Some(d_bb_pp.as_mut_slice()),
                ),
            },
        }
    }
}

impl<F: ForceField + ?Sized> Evaluable for AlignmentObjective<'_, F> {
    fn dimension(&self) -> usize {
        self.pose.dimension()
    }

    fn state_into(&self, buffer: &mut [f64]) {
        buffer.copy_from_slice(&self.state);
    }

    fn set_state(&mut self, state: &[f64]) {
        self.state.clear();
        self.state.extend_from_slice(state);
        for torsion in &mut self.state[RIGID_DOF..] {
            *torsion = normalize_angle(*torsion);
        }
        self.pose.update_coordinates(&self.state);
        self.fit.update_centers(self.pose.coordinates());
    }

    fn fg_value(&self, gradient: &mut [f64]) -> f64 {
        let positions = self.pose.coordinates();
        let n = positions.len();

        let mut buffers: [Vec<Vector3<f64>>; 4] = std::array::from_fn(|_| vec![Vector3::zeros(); n]);
        let overlaps = self.overlaps(Some(&mut buffers));
        let [d_ab, d_bb, d_ab_pp, d_bb_pp] = &buffers;

        let mut d_energy = vec![Vector3::zeros(); n];
        let energy = self.forcefield.energy_and_gradient(positions, &mut d_energy);

        let w = self.pharmacophore_weight;
        let total = self.blend(&overlaps);
        let strain = (energy - self.strain_baseline - self.scoring.strain_cutoff).max(0.0);
        let value = -total + self.scoring.strain_penalty * strain * strain;

        let mut d_total = vec![Vector3::zeros(); n];
        add_tanimoto_gradient(
            &mut d_total,
            1.0 - w,
            (overlaps.shape_cross, self.reference_shape, overlaps.shape_self),
            d_ab,
            d_bb,
        );
        if self.scoring.pharmacophore_gradient {
            add_tanimoto_gradient(
                &mut d_total,
                w,
                (
                    overlaps.pharmacophore_cross,
                    self.reference_pharmacophore,
                    overlaps.pharmacophore_self,
                ),
                d_ab_pp,
                d_bb_pp,
            );
        }

        let strain_scale = 2.0 * self.scoring.strain_penalty * strain;
        let cartesian: Vec<Vector3<f64>> = d_total
            .iter()
            .zip(&d_energy)
            .map(|(dt, de)| de * strain_scale - dt)
            .collect();
        self.pose.backpropagate(&cartesian, gradient);

        value
    }
}

/// `AB / (AA + BB - AB)`, or zero for a degenerate denominator.
#[inline]
fn tanimoto(ab: f64, aa: f64, bb: f64) -> f64 {
    let denominator = aa + bb - ab;
    if denominator.abs() < DEGENERATE_DENOMINATOR {
        0.0
    } else {
        ab / denominator
    }
}

/// Adds `weight · dT` to `out` by the quotient rule, where `AA` is constant.
fn add_tanimoto_gradient(
    out: &mut [Vector3<f64>],
    weight: f64,
    (ab, aa, bb): (f64, f64, f64),
    d_ab: &[Vector3<f64>],
    d_bb: &[Vector3<f64>],
) {
    let denominator = aa + bb - ab;
    if denominator.abs() < DEGENERATE_DENOMINATOR || weight == 0.0 {
        return;
    }
    let scale = weight / (denominator * denominator);
    for ((o, dab), dbb) in out.iter_mut().zip(d_ab).zip(d_bb) {
        *o += (dab * denominator - (dbb - dab) * ab) * scale;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::forcefield::energy::MolecularForceField;
    use crate::core::forcefield::parameterization::Parameterizer;
    use crate::core::forcefield::params::ForcefieldParams;
    use crate::core::optimize::lbfgs::{LbfgsOptimizer, OptimizerSettings};
    use crate::core::topology::rotatable::RotatableBondAnalyzer;
    use crate::test_utils::{NullForceField, featureless_chain, flexible_chain};

    struct Fixture {
        reference: MolecularVolume,
        positions: Vec<Point3<f64>>,
        bonds: Vec<RotatableBond>,
        forcefield: MolecularForceField,
    }

    fn fixture() -> Fixture {
        let molecule = flexible_chain();
        let forcefield = Parameterizer::new(&ForcefieldParams::default())
            .parameterize(&molecule)
            .unwrap();
        Fixture {
            reference: MolecularVolume::from_molecule(&molecule),
            positions: molecule.positions(),
            bonds: RotatableBondAnalyzer::new(&molecule).analyze(),
            forcefield,
        }
    }

    fn scoring(pharmacophore_gradient: bool) -> ScoringConfig {
        ScoringConfig {
            pharmacophore_gradient,
            ..ScoringConfig::default()
        }
    }

    fn perturbed_state<F: ForceField + ?Sized>(objective: &AlignmentObjective<'_, F>) -> Vec<f64> {
        let mut state = objective.state();
        let offsets = [0.3, -0.2, 0.15, 0.1, -0.08, 0.12, 0.25, -0.3];
        for (value, offset) in state.iter_mut().zip(offsets) {
            *value += offset;
        }
        state
    }

    #[test]
    fn identity_state_keeps_snapshot_and_scores_self_overlap() {
        let f = fixture();
        let null = NullForceField { atoms: 6 };
        let objective = AlignmentObjective::new(
            &f.reference,
            f.reference.clone(),
            f.positions.clone(),
            &f.bonds,
            &null,
            scoring(false),
            0.0,
        );
        assert_eq!(objective.coordinates(), f.positions.as_slice());
        assert!((objective.tanimoto() - 1.0).abs() < 1e-12);
        assert_eq!(objective.dimension(), RIGID_DOF + 2);
    }

    #[test]
    fn analytic_gradient_matches_finite_differences() {
        let f = fixture();
        let baseline = f.forcefield.energy(&f.positions) - 25.0;
        let mut objective = AlignmentObjective::new(
            &f.reference,
            MolecularVolume::from_molecule(&flexible_chain()),
            f.positions.clone(),
            &f.bonds,
            &f.forcefield,
            scoring(true),
            baseline,
        );
        let state = perturbed_state(&objective);
        objective.set_state(&state);
        let state = objective.state();

        let mut analytic = vec![0.0; state.len()];
        objective.fg_value(&mut analytic);

        let h = 1e-5;
        let mut scratch = vec![0.0; state.len()];
        for i in 0..state.len() {
            let mut plus = state.clone();
            let mut minus = state.clone();
            plus[i] += h;
            minus[i] -= h;
            objective.set_state(&plus);
            let f_plus = objective.fg_value(&mut scratch);
            objective.set_state(&minus);
            let f_minus = objective.fg_value(&mut scratch);
            let numeric = (f_plus - f_minus) / (2.0 * h);
            assert!(
                (numeric - analytic[i]).abs() < 1e-6 + 1e-4 * analytic[i].abs(),
                "component {i}: analytic {} vs numeric {numeric}",
                analytic[i]
            );
        }
    }

    #[test]
    fn default_gradient_omits_pharmacophore_term() {
        let f = fixture();
        let null = NullForceField { atoms: 6 };
        let build = |scoring: ScoringConfig| {
            let mut objective = AlignmentObjective::new(
                &f.reference,
                f.reference.clone(),
                f.positions.clone(),
                &f.bonds,
                &null,
                scoring,
                0.0,
            );
            let state = perturbed_state(&objective);
            objective.set_state(&state);
            let mut gradient = vec![0.0; objective.dimension()];
            let value = objective.fg_value(&mut gradient);
            (value, gradient)
        };

        let (blended_value, blended) = build(scoring(false));
        let (shape_value, shape_only) = build(ScoringConfig {
            pharmacophore_weight: 0.0,
            ..scoring(false)
        });

        assert_ne!(blended_value, shape_value);
        let w = ScoringConfig::default().pharmacophore_weight;
        for (b, s) in blended.iter().zip(&shape_only) {
            assert!((b - (1.0 - w) * s).abs() < 1e-12 * (1.0 + s.abs()));
        }
    }

    #[test]
    fn repeated_evaluation_is_identical() {
        let f = fixture();
        let mut objective = AlignmentObjective::new(
            &f.reference,
            f.reference.clone(),
            f.positions.clone(),
            &f.bonds,
            &f.forcefield,
            scoring(true),
            0.0,
        );
        let state = perturbed_state(&objective);
        objective.set_state(&state);

        let mut first = vec![0.0; objective.dimension()];
        let mut second = vec![0.0; objective.dimension()];
        let v1 = objective.fg_value(&mut first);
        let v2 = objective.fg_value(&mut second);
        assert_eq!(v1, v2);
        assert_eq!(first, second);
    }

    #[test]
    fn set_state_wraps_torsions_and_copies_state() {
        let f = fixture();
        let null = NullForceField { atoms: 6 };
        let mut objective = AlignmentObjective::new(
            &f.reference,
            f.reference.clone(),
            f.positions.clone(),
            &f.bonds,
            &null,
            scoring(false),
            0.0,
        );
        let mut state = objective.state();
        state[RIGID_DOF] = 1.0 + 2.0 * std::f64::consts::PI;
        objective.set_state(&state);

        let stored = objective.state();
        assert!((stored[RIGID_DOF] - 1.0).abs() < 1e-12);
        assert!((f.bonds[0].torsion(objective.coordinates()) - 1.0).abs() < 1e-9);

        state[0] = 99.0;
        assert_ne!(objective.state()[0], 99.0);
    }

    #[test]
    fn strain_below_cutoff_is_not_penalized() {
        let f = fixture();
        let energy = f.forcefield.energy(&f.positions);
        let objective = AlignmentObjective::new(
            &f.reference,
            f.reference.clone(),
            f.positions.clone(),
            &f.bonds,
            &f.forcefield,
            scoring(false),
            energy - 5.0,
        );
        let mut gradient = vec![0.0; objective.dimension()];
        let value = objective.fg_value(&mut gradient);
        assert!((value + objective.tanimoto()).abs() < 1e-12);
    }

    #[test]
    fn self_alignment_recovers_full_overlap() {
        let f = fixture();
        let null = NullForceField { atoms: 6 };
        let mut objective = AlignmentObjective::new(
            &f.reference,
            f.reference.clone(),
            f.positions.clone(),
            &f.bonds,
            &null,
            scoring(true),
            0.0,
        );
        let mut state = objective.state();
        for (value, offset) in state.iter_mut().zip([0.2, -0.1, 0.1, 0.05, 0.08, -0.06, 0.15, -0.1]) {
            *value += offset;
        }
        objective.set_state(&state);
        assert!(objective.tanimoto() < 0.99);

        LbfgsOptimizer::new(OptimizerSettings {
            max_iterations: 500,
            tolerance: 1e-6,
        })
        .optimize(&mut objective);
        assert!(objective.tanimoto() > 0.999);
    }

    #[test]
    fn featureless_molecules_score_on_shape_alone() {
        let molecule = featureless_chain();
        let reference = MolecularVolume::from_molecule(&molecule);
        let bonds = RotatableBondAnalyzer::new(&molecule).analyze();
        let null = NullForceField { atoms: 6 };
        let mut objective = AlignmentObjective::new(
            &reference,
            reference.clone(),
            molecule.positions(),
            &bonds,
            &null,
            scoring(true),
            0.0,
        );
        assert!((objective.tanimoto() - 1.0).abs() < 1e-12);

        let state = perturbed_state(&objective);
        objective.set_state(&state);
        let mut gradient = vec![0.0; objective.dimension()];
        let value = objective.fg_value(&mut gradient);
        assert!((value + objective.tanimoto()).abs() < 1e-12);
        assert!(gradient.iter().all(|g| g.is_finite()));
    }

    #[test]
    fn tanimoto_handles_degenerate_denominator() {
        assert_eq!(tanimoto(0.0, 0.0, 0.0), 0.0);
        assert!((tanimoto(2.0, 3.0, 3.0) - 0.5).abs() < 1e-15);

        let mut out = vec![Vector3::zeros(); 1];
        add_tanimoto_gradient(&mut out, 1.0, (0.0, 0.0, 0.0), &[Vector3::x()], &[Vector3::y()]);
        assert_eq!(out[0], Vector3::zeros());
    }
}
