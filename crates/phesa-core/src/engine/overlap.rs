//! Shape and pharmacophore overlap integrals between Gaussian descriptor sets.
//!
//! Cross overlaps read the stored centers of both sets and accumulate the
//! gradient on the atoms of the second (fit) set. Self overlaps sum over all
//! ordered pairs of one set.

use crate::core::descriptors::gaussian::{Gaussian, pair_overlap};
use crate::core::descriptors::pharmacophore::PPGaussian;
use crate::core::descriptors::volume::MolecularVolume;
use nalgebra::{Point3, Vector3};

/// Which coordinates a self overlap reads.
#[derive(Debug, Clone, Copy)]
pub enum Frame<'a> {
    /// Stored Gaussian centers; no gradient is produced.
    Rigid,
    /// Centers recomputed from the given atom coordinates.
    Flexible(&'a [Point3<f64>]),
}

impl Frame<'_> {
    fn center<G: Gaussian>(&self, gaussian: &G) -> Point3<f64> {
        match self {
            Frame::Rigid => gaussian.center(),
            Frame::Flexible(positions) => gaussian.center_in(positions),
        }
    }
}

/// Shape overlap `O_AB` of a fixed reference with the fit set.
///
/// Volume Gaussians of either side interact with the atomic Gaussians of the
/// other side, scaled by their role sign.
pub fn shape_overlap(
    reference: &MolecularVolume,
    fit: &MolecularVolume,
    mut gradient: Option<&mut [Vector3<f64>]>,
) -> f64 {
    let mut total = 0.0;

    for a in &reference.atomic {
        for b in &fit.atomic {
            total += accumulate(a, a.center, b, b.center, 1.0, &mut gradient, false);
        }
        for v in &fit.volumes {
            total += accumulate(a, a.center, v, v.center, v.role.sign(), &mut gradient, false);
        }
    }
    for v in &reference.volumes {
        for b in &fit.atomic {
            total += accumulate(v, v.center, b, b.center, v.role.sign(), &mut gradient, false);
        }
    }
    total
}

/// Shape self overlap `O_AA` (or `O_BB`) over all ordered pairs.
///
/// A gradient is only produced for a [`Frame::Flexible`] frame.
pub fn self_shape_overlap(
    volume: &MolecularVolume,
    frame: Frame<'_>,
    gradient: Option<&mut [Vector3<f64>]>,
) -> f64 {
    let mut gradient = match frame {
        Frame::Rigid => None,
        Frame::Flexible(_) => gradient,
    };
    let mut total = 0.0;

    for a in &volume.atomic {
        let center_a = frame.center(a);
        for b in &volume.atomic {
            total += accumulate(a, center_a, b, frame.center(b), 1.0, &mut gradient, true);
        }
        for v in &volume.volumes {
            // Both orders of the (atomic, volume) pair.
            let factor = 2.0 * v.role.sign();
            total += accumulate(a, center_a, v, frame.center(v), factor, &mut gradient, true);
        }
    }
    total
}

/// Pharmacophore overlap `O_AB^pp` of a fixed reference with the fit set.
pub fn pharmacophore_overlap(
    reference: &MolecularVolume,
    fit: &MolecularVolume,
    mut gradient: Option<&mut [Vector3<f64>]>,
) -> f64 {
    let mut total = 0.0;
    for a in &reference.pharmacophores {
        for b in &fit.pharmacophores {
            total += pharmacophore_pair(a, b, &mut gradient, false);
        }
    }
    total
}

/// Pharmacophore self overlap over all ordered pairs.
///
/// Both frames read the stored centers, so the result does not depend on the
/// frame; callers refresh the centers before asking for a flexible overlap.
pub fn self_pharmacophore_overlap(
    volume: &MolecularVolume,
    frame: Frame<'_>,
    gradient: Option<&mut [Vector3<f64>]>,
) -> f64 {
    let mut gradient = match frame {
        Frame::Rigid => None,
        Frame::Flexible(_) => gradient,
    };
    let mut total = 0.0;
    for a in &volume.pharmacophores {
        for b in &volume.pharmacophores {
            total += pharmacophore_pair(a, b, &mut gradient, true);
        }
    }
    total
}

fn pharmacophore_pair(
    a: &PPGaussian,
    b: &PPGaussian,
    gradient: &mut Option<&mut [Vector3<f64>]>,
    both_sides: bool,
) -> f64 {
    let interaction = a.interaction(b);
    if interaction == 0.0 {
        return 0.0;
    }
    accumulate(a, a.center, b, b.center, interaction, gradient, both_sides)
}

/// Adds `factor` times the pair overlap's gradient to the atom of `b`, and
/// its negation to the atom of `a` when `both_sides` is set.
#[inline]
fn accumulate<A: Gaussian, B: Gaussian>(
    a: &A,
    center_a: Point3<f64>,
    b: &B,
    center_b: Point3<f64>,
    factor: f64,
    gradient: &mut Option<&mut [Vector3<f64>]>,
    both_sides: bool,
) -> f64 {
    let Some((overlap, grad)) = pair_overlap(a, &center_a, b, &center_b) else {
        return 0.0;
    };
    if let Some(gradient) = gradient.as_deref_mut() {
        let scaled = grad * factor;
        gradient[b.atom()] += scaled;
        if both_sides {
            gradient[a.atom()] -= scaled;
        }
    }
    overlap * factor
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::descriptors::gaussian::{VolumeGaussian, VolumeRole};
    use crate::test_utils::flexible_chain;

    fn chain_volume() -> MolecularVolume {
        MolecularVolume::from_molecule(&flexible_chain())
    }

    /// Chain volume with one inclusion and one exclusion correction.
    fn corrected_volume() -> MolecularVolume {
        let molecule = flexible_chain();
        let atoms = molecule.atoms();
        MolecularVolume::from_molecule(&molecule)
            .with_volume_gaussian(VolumeGaussian::new(
                1,
                6,
                atoms[1].position,
                Vector3::new(0.0, 0.3, 1.2),
                VolumeRole::Inclusion,
            ))
            .with_volume_gaussian(VolumeGaussian::new(
                3,
                6,
                atoms[3].position,
                Vector3::new(0.4, -0.8, 0.1),
                VolumeRole::Exclusion,
            ))
    }

    /// Compares `analytic` with central differences of `overlap` at `base`.
    fn assert_gradient_matches<O>(base: &[Point3<f64>], analytic: &[Vector3<f64>], overlap: O)
    where
        O: Fn(&[Point3<f64>]) -> f64,
    {
        let h = 1e-6;
        for atom in 0..base.len() {
            for axis in 0..3 {
                let mut plus = base.to_vec();
                let mut minus = base.to_vec();
                plus[atom][axis] += h;
                minus[atom][axis] -= h;
                let numeric = (overlap(&plus) - overlap(&minus)) / (2.0 * h);
                assert!(
                    (numeric - analytic[atom][axis]).abs() < 1e-6,
                    "atom {atom} axis {axis}: analytic {} vs numeric {numeric}",
                    analytic[atom][axis]
                );
            }
        }
    }

    fn displaced(positions: &[Point3<f64>]) -> Vec<Point3<f64>> {
        positions
            .iter()
            .enumerate()
            .map(|(i, p)| p + Vector3::new(0.05 * i as f64, -0.1, 0.02 * (i * i) as f64))
            .collect()
    }

    #[test]
    fn cross_overlap_of_identical_sets_equals_self_overlap() {
        let volume = chain_volume();
        let cross = shape_overlap(&volume, &volume, None);
        let own = self_shape_overlap(&volume, Frame::Rigid, None);
        assert!((cross - own).abs() < 1e-9 * own);

        let cross_pp = pharmacophore_overlap(&volume, &volume, None);
        let own_pp = self_pharmacophore_overlap(&volume, Frame::Rigid, None);
        assert!((cross_pp - own_pp).abs() < 1e-12);
        assert!(own_pp > 0.0);
    }

    #[test]
    fn volume_gaussians_are_symmetric_between_cross_and_self() {
        let molecule = flexible_chain();
        let volume = MolecularVolume::from_molecule(&molecule).with_volume_gaussian(
            VolumeGaussian::new(
                1,
                6,
                molecule.atoms()[1].position,
                Vector3::new(0.0, 0.0, 1.2),
                VolumeRole::Exclusion,
            ),
        );
        let plain = self_shape_overlap(&chain_volume(), Frame::Rigid, None);
        let own = self_shape_overlap(&volume, Frame::Rigid, None);
        let cross = shape_overlap(&volume, &volume, None);
        assert!(own < plain);
        assert!((cross - own).abs() < 1e-9 * own.abs());
    }

    #[test]
    fn distant_sets_have_exactly_zero_overlap() {
        let reference = chain_volume();
        let mut fit = chain_volume();
        let far: Vec<_> = flexible_chain()
            .positions()
            .iter()
            .map(|p| p + Vector3::new(50.0, 0.0, 0.0))
            .collect();
        fit.update_centers(&far);

        let mut gradient = vec![Vector3::zeros(); far.len()];
        assert_eq!(shape_overlap(&reference, &fit, Some(&mut gradient)), 0.0);
        assert_eq!(pharmacophore_overlap(&reference, &fit, None), 0.0);
        assert!(gradient.iter().all(|g| *g == Vector3::zeros()));
    }

    #[test]
    fn cross_gradient_matches_finite_differences() {
        let reference = chain_volume();
        let base = displaced(&flexible_chain().positions());
        let mut fit = chain_volume();
        fit.update_centers(&base);

        let mut gradient = vec![Vector3::zeros(); base.len()];
        shape_overlap(&reference, &fit, Some(&mut gradient));

        let h = 1e-6;
        for atom in 0..base.len() {
            for axis in 0..3 {
                let mut plus = base.clone();
                let mut minus = base.clone();
                plus[atom][axis] += h;
                minus[atom][axis] -= h;
                fit.update_centers(&plus);
                let f_plus = shape_overlap(&reference, &fit, None);
                fit.update_centers(&minus);
                let f_minus = shape_overlap(&reference, &fit, None);
                let numeric = (f_plus - f_minus) / (2.0 * h);
                assert!((numeric - gradient[atom][axis]).abs() < 1e-6);
            }
        }
    }

    #[test]
    fn flexible_self_gradient_matches_finite_differences() {
        let volume = chain_volume();
        let base = displaced(&flexible_chain().positions());
        let mut gradient = vec![Vector3::zeros(); base.len()];
        self_shape_overlap(&volume, Frame::Flexible(&base), Some(&mut gradient));

        let h = 1e-6;
        for atom in 0..base.len() {
            for axis in 0..3 {
                let mut plus = base.clone();
                let mut minus = base.clone();
                plus[atom][axis] += h;
                minus[atom][axis] -= h;
                let f_plus = self_shape_overlap(&volume, Frame::Flexible(&plus), None);
                let f_minus = self_shape_overlap(&volume, Frame::Flexible(&minus), None);
                let numeric = (f_plus - f_minus) / (2.0 * h);
                assert!((numeric - gradient[atom][axis]).abs() < 1e-6);
            }
        }
    }

    #[test]
    fn cross_gradient_with_volume_corrections_matches_finite_differences() {
        let reference = corrected_volume();
        let base = displaced(&flexible_chain().positions());
        let mut fit = corrected_volume();
        fit.update_centers(&base);

        let mut gradient = vec![Vector3::zeros(); base.len()];
        let corrected = shape_overlap(&reference, &fit, Some(&mut gradient));

        let mut plain_fit = chain_volume();
        plain_fit.update_centers(&base);
        let mut plain_gradient = vec![Vector3::zeros(); base.len()];
        let plain = shape_overlap(&chain_volume(), &plain_fit, Some(&mut plain_gradient));
        assert!((corrected - plain).abs() > 1e-3);
        assert_ne!(gradient, plain_gradient);

        assert_gradient_matches(&base, &gradient, |positions| {
            let mut moved = fit.clone();
            moved.update_centers(positions);
            shape_overlap(&reference, &moved, None)
        });
    }

    #[test]
    fn flexible_self_gradient_with_volume_corrections_matches_finite_differences() {
        let volume = corrected_volume();
        let base = displaced(&flexible_chain().positions());

        let mut gradient = vec![Vector3::zeros(); base.len()];
        let corrected = self_shape_overlap(&volume, Frame::Flexible(&base), Some(&mut gradient));
        let plain = self_shape_overlap(&chain_volume(), Frame::Flexible(&base), None);
        assert!((corrected - plain).abs() > 1e-3);

        assert_gradient_matches(&base, &gradient, |positions| {
            self_shape_overlap(&volume, Frame::Flexible(positions), None)
        });
    }

    #[test]
    fn rigid_frame_ignores_gradient_buffer() {
        let volume = chain_volume();
        let mut gradient = vec![Vector3::new(1.0, 1.0, 1.0); 6];
        self_shape_overlap(&volume, Frame::Rigid, Some(&mut gradient));
        assert!(gradient.iter().all(|g| *g == Vector3::new(1.0, 1.0, 1.0)));
    }

    #[test]
    fn pharmacophore_self_overlap_ignores_frame_coordinates() {
        let volume = chain_volume();
        let moved = displaced(&flexible_chain().positions());

        let rigid = self_pharmacophore_overlap(&volume, Frame::Rigid, None);
        let flexible = self_pharmacophore_overlap(&volume, Frame::Flexible(&moved), None);
        assert_eq!(rigid, flexible);

        let rigid_shape = self_shape_overlap(&volume, Frame::Rigid, None);
        let flexible_shape = self_shape_overlap(&volume, Frame::Flexible(&moved), None);
        assert_ne!(rigid_shape, flexible_shape);
    }

    #[test]
    fn dissimilar_features_do_not_overlap() {
        let volume = chain_volume();
        // Acceptor (O4) and donor (N5) never interact, so only the two
        // diagonal pairs contribute.
        let own = self_pharmacophore_overlap(&volume, Frame::Rigid, None);
        let a = &volume.pharmacophores[0];
        let diagonal = pair_overlap(a, &a.center, a, &a.center).unwrap().0;
        assert!((own - 2.0 * diagonal).abs() < 1e-12);
    }
}
