use super::config::MonteCarloConfig;
use crate::core::topology::rotatable::RotatableBond;
use nalgebra::Point3;
use rand::{Rng, SeedableRng, rngs::StdRng};
use tracing::trace;

/// Relevance spans narrower than this are treated as a single value.
const DEGENERATE_RELEVANCE_SPAN: f64 = 1e-9;

/// Random torsion kicks and the Metropolis rule of the Monte Carlo search.
///
/// Each bond gets a fixed kick magnitude interpolated linearly from its
/// relevance: the least relevant bond gets `max_perturbation_deg`, the most
/// relevant one `min_perturbation_deg`.
#[derive(Debug, Clone)]
pub struct TorsionPerturbator<'a> {
    bonds: &'a [RotatableBond],
    magnitudes: Vec<f64>,
    temperature: f64,
    rng: StdRng,
    last_step: Option<(usize, f64)>,
}

impl<'a> TorsionPerturbator<'a> {
    /// Returns `None` when there is nothing to perturb.
    pub fn init(bonds: &'a [RotatableBond], config: &MonteCarloConfig) -> Option<Self> {
        if bonds.is_empty() {
            return None;
        }

        let (low, high) = bonds.iter().fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), b| {
            (lo.min(b.relevance), hi.max(b.relevance))
        });
        let (largest, smallest) = (
            config.max_perturbation_deg.to_radians(),
            config.min_perturbation_deg.to_radians(),
        );
        let span = high - low;
        let magnitudes = bonds
            .iter()
            .map(|bond| {
                if span < DEGENERATE_RELEVANCE_SPAN {
                    largest
                } else {
                    largest - (bond.relevance - low) / span * (largest - smallest)
                }
            })
            .collect();

        Some(Self {
            bonds,
            magnitudes,
            temperature: config.temperature,
            rng: StdRng::seed_from_u64(config.seed),
            last_step: None,
        })
    }

    /// Kick magnitude of each bond, in radians.
    pub fn magnitudes(&self) -> &[f64] {
        &self.magnitudes
    }

    /// Rotates a random bond by its magnitude with a random sign and returns
    /// `(bond index, signed angle)`.
    pub fn step(&mut self, positions: &mut [Point3<f64>]) -> (usize, f64) {
        let index = self.rng.gen_range(0..self.bonds.len());
        let sign = if self.rng.gen_bool(0.5) { 1.0 } else { -1.0 };
        let angle = sign * self.magnitudes[index];

        self.bonds[index].rotate(positions, angle);
        self.last_step = Some((index, angle));
        trace!("Perturbed bond {} by {:.1} degrees.", index, angle.to_degrees());
        (index, angle)
    }

    /// Reverses the most recent [`TorsionPerturbator::step`]; a no-op if
    /// there is none.
    pub fn undo_step(&mut self, positions: &mut [Point3<f64>]) {
        if let Some((index, angle)) = self.last_step.take() {
            self.bonds[index].rotate(positions, -angle);
        }
    }

    /// Metropolis criterion on overlap scores (higher is better).
    pub fn accept(&mut self, old_score: f64, new_score: f64) -> bool {
        new_score > old_score
            || self.rng.r#gen::<f64>() < (-(old_score - new_score) / self.temperature).exp()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::topology::rotatable::RotatableBondAnalyzer;
    use crate::test_utils::flexible_chain;

    fn chain_bonds() -> Vec<RotatableBond> {
        RotatableBondAnalyzer::new(&flexible_chain()).analyze()
    }

    #[test]
    fn init_without_bonds_returns_none() {
        assert!(TorsionPerturbator::init(&[], &MonteCarloConfig::default()).is_none());
    }

    #[test]
    fn magnitudes_interpolate_from_least_to_most_relevant() {
        let bonds = chain_bonds();
        let perturbator = TorsionPerturbator::init(&bonds, &MonteCarloConfig::default()).unwrap();
        let magnitudes = perturbator.magnitudes();
        // The central C1-C2 bond (relevance 1) gets the smallest kick.
        assert!((magnitudes[0] - 5f64.to_radians()).abs() < 1e-12);
        assert!((magnitudes[1] - 60f64.to_radians()).abs() < 1e-12);
    }

    #[test]
    fn equal_relevance_gives_largest_magnitude() {
        let bonds = vec![chain_bonds()[1].clone(); 3];
        let perturbator = TorsionPerturbator::init(&bonds, &MonteCarloConfig::default()).unwrap();
        assert!(
            perturbator
                .magnitudes()
                .iter()
                .all(|&m| (m - 60f64.to_radians()).abs() < 1e-12)
        );
    }

    #[test]
    fn step_changes_one_torsion_and_undo_restores_it() {
        let bonds = chain_bonds();
        let mut perturbator =
            TorsionPerturbator::init(&bonds, &MonteCarloConfig::default()).unwrap();
        let original = flexible_chain().positions();
        let mut positions = original.clone();

        let (index, angle) = perturbator.step(&mut positions);
        assert!((angle.abs() - perturbator.magnitudes()[index]).abs() < 1e-15);
        let change = crate::core::utils::geometry::normalize_angle(
            bonds[index].torsion(&positions) - bonds[index].torsion(&original),
        );
        assert!((change - angle).abs() < 1e-9);

        perturbator.undo_step(&mut positions);
        for (restored, expected) in positions.iter().zip(&original) {
            assert!((restored - expected).norm() < 1e-12);
        }

        let snapshot = positions.clone();
        perturbator.undo_step(&mut positions);
        assert_eq!(positions, snapshot);
    }

    #[test]
    fn improvements_and_ties_are_always_accepted() {
        let bonds = chain_bonds();
        let mut perturbator =
            TorsionPerturbator::init(&bonds, &MonteCarloConfig::default()).unwrap();
        for i in 0..1000 {
            let old = i as f64 * 1e-3;
            assert!(perturbator.accept(old, old + 0.01));
            assert!(perturbator.accept(old, old));
        }
    }

    #[test]
    fn small_regressions_are_accepted_at_metropolis_rate() {
        let bonds = chain_bonds();
        let mut perturbator =
            TorsionPerturbator::init(&bonds, &MonteCarloConfig::default()).unwrap();
        let trials = 20_000;
        let accepted = (0..trials)
            .filter(|_| perturbator.accept(0.80, 0.79))
            .count();
        let rate = accepted as f64 / trials as f64;
        let expected = (-0.01f64 / 0.0043).exp();
        assert!((rate - expected).abs() < 0.015, "rate {rate}, expected {expected}");
    }

    #[test]
    fn same_seed_gives_same_sequence() {
        let bonds = chain_bonds();
        let config = MonteCarloConfig {
            seed: 42,
            ..MonteCarloConfig::default()
        };
        let run = || {
            let mut perturbator = TorsionPerturbator::init(&bonds, &config).unwrap();
            let mut positions = flexible_chain().positions();
            (0..20)
                .map(|_| {
                    let step = perturbator.step(&mut positions);
                    (step, perturbator.accept(0.5, 0.495))
                })
                .collect::<Vec<_>>()
        };
        assert_eq!(run(), run());
    }
}
