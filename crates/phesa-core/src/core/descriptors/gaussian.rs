use crate::core::models::element;
use nalgebra::{Point3, Vector3};
use std::f64::consts::{PI, SQRT_2};

/// Height shared by every Gaussian (`2√2`).
pub const GAUSSIAN_HEIGHT: f64 = 2.0 * SQRT_2;
/// Width constant: `alpha = KAPPA / r²`.
pub const KAPPA: f64 = 2.41798793102;
/// Pairs at or beyond this squared distance (Å²) contribute exactly zero.
pub const CUTOFF_SQUARED: f64 = 10.0;

/// A spherical Gaussian attached to one atom of a molecule.
pub trait Gaussian {
    /// Index of the owning atom; gradients are accumulated on this atom.
    fn atom(&self) -> usize;
    /// Stored center, refreshed by [`Gaussian::update_center`].
    fn center(&self) -> Point3<f64>;
    fn alpha(&self) -> f64;
    fn height(&self) -> f64;
    /// Center this Gaussian would have for the given atom coordinates.
    fn center_in(&self, positions: &[Point3<f64>]) -> Point3<f64>;
    fn set_center(&mut self, center: Point3<f64>);

    fn update_center(&mut self, positions: &[Point3<f64>]) {
        let center = self.center_in(positions);
        self.set_center(center);
    }
}

#[inline]
pub fn alpha_for_radius(radius: f64) -> f64 {
    KAPPA / (radius * radius)
}

/// Normalization prefactor `(π / (alpha_i + alpha_j))^{3/2}` of a pair.
#[inline]
pub fn prefactor(alpha_i: f64, alpha_j: f64) -> f64 {
    (PI / (alpha_i + alpha_j)).powf(1.5)
}

/// Overlap of two Gaussians placed at `center_i` and `center_j`.
///
/// Returns the overlap and its gradient with respect to `center_j`; the
/// gradient with respect to `center_i` is the negation. Pairs with
/// `R² >= CUTOFF_SQUARED` return `None`.
#[inline]
pub fn pair_overlap<A, B>(
    gaussian_i: &A,
    center_i: &Point3<f64>,
    gaussian_j: &B,
    center_j: &Point3<f64>,
) -> Option<(f64, Vector3<f64>)>
where
    A: Gaussian + ?Sized,
    B: Gaussian + ?Sized,
{
    let offset = center_j - center_i;
    let r2 = offset.norm_squared();
    if r2 >= CUTOFF_SQUARED {
        return None;
    }

    let (alpha_i, alpha_j) = (gaussian_i.alpha(), gaussian_j.alpha());
    let sum = alpha_i + alpha_j;
    let product = alpha_i * alpha_j;
    let overlap = gaussian_i.height()
        * gaussian_j.height()
        * (-product * r2 / sum).exp()
        * prefactor(alpha_i, alpha_j);
    Some((overlap, offset * (overlap * (-2.0 * product / sum))))
}

/// Heavy-atom shape Gaussian centred on its atom.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AtomicGaussian {
    pub atom: usize,
    pub atomic_number: u8,
    pub center: Point3<f64>,
    pub alpha: f64,
    pub height: f64,
}

impl AtomicGaussian {
    /// Builds a Gaussian whose width follows the element's van der Waals radius.
    pub fn new(atom: usize, atomic_number: u8, center: Point3<f64>) -> Self {
        Self::with_radius(atom, atomic_number, center, element::vdw_radius(atomic_number))
    }

    pub fn with_radius(atom: usize, atomic_number: u8, center: Point3<f64>, radius: f64) -> Self {
        Self {
            atom,
            atomic_number,
            center,
            alpha: alpha_for_radius(radius),
            height: GAUSSIAN_HEIGHT,
        }
    }
}

impl Gaussian for AtomicGaussian {
    fn atom(&self) -> usize {
        self.atom
    }
    fn center(&self) -> Point3<f64> {
        self.center
    }
    fn alpha(&self) -> f64 {
        self.alpha
    }
    fn height(&self) -> f64 {
        self.height
    }
    fn center_in(&self, positions: &[Point3<f64>]) -> Point3<f64> {
        positions[self.atom]
    }
    fn set_center(&mut self, center: Point3<f64>) {
        self.center = center;
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum VolumeRole {
    /// Adds volume the fit molecule should occupy.
    Inclusion,
    /// Marks volume the fit molecule should avoid.
    Exclusion,
}

impl VolumeRole {
    #[inline]
    pub fn sign(&self) -> f64 {
        match self {
            Self::Inclusion => 1.0,
            Self::Exclusion => -1.0,
        }
    }
}

/// Auxiliary volume-correction Gaussian, displaced from its atom by a fixed
/// shift. Its overlaps with atomic Gaussians are multiplied by the role sign.
///
/// The shift is a lab-frame vector: it follows the owning atom's translation
/// but is not rotated with the rigid pose or with torsions. A volume Gaussian
/// on the fit molecule therefore changes its position relative to the rest
/// of the molecule as the pose rotates, and the fit's corrected shape is
/// orientation-dependent.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct VolumeGaussian {
    pub atom: usize,
    pub atomic_number: u8,
    pub shift: Vector3<f64>,
    pub center: Point3<f64>,
    pub alpha: f64,
    pub height: f64,
    pub role: VolumeRole,
}

impl VolumeGaussian {
    pub fn new(
        atom: usize,
        atomic_number: u8,
        atom_position: Point3<f64>,
        shift: Vector3<f64>,
        role: VolumeRole,
    ) -> Self {
        Self {
            atom,
            atomic_number,
            shift,
            center: atom_position + shift,
            alpha: alpha_for_radius(element::vdw_radius(atomic_number)),
            height: GAUSSIAN_HEIGHT,
            role,
        }
    }
}

impl Gaussian for VolumeGaussian {
    fn atom(&self) -> usize {
        self.atom
    }
    fn center(&self) -> Point3<f64> {
        self.center
    }
    fn alpha(&self) -> f64 {
        self.alpha
    }
    fn height(&self) -> f64 {
        self.height
    }
    fn center_in(&self, positions: &[Point3<f64>]) -> Point3<f64> {
        positions[self.atom] + self.shift
    }
    fn set_center(&mut self, center: Point3<f64>) {
        self.center = center;
    }
}
