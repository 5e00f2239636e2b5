use super::element;
use nalgebra::Point3;

/// Pharmacophore feature carried by an atom.
///
/// Features are assigned by the caller (or a feature perception step outside
/// this crate) and turned into pharmacophore Gaussians by the descriptor
/// builder.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum PharmacophoreType {
    /// Hydrogen-bond acceptor (e.g. carbonyl oxygen).
    Acceptor,
    /// Hydrogen-bond donor heavy atom (e.g. hydroxyl oxygen, amide nitrogen).
    Donor,
    /// Formally or effectively positive ionizable group.
    PositiveCharge,
    /// Formally or effectively negative ionizable group.
    NegativeCharge,
    /// Aromatic ring, represented on one ring atom.
    AromaticRing,
}

/// An atom of a small molecule.
#[derive(Debug, Clone, PartialEq)]
pub struct Atom {
    /// The name of the atom (e.g. "C1", "O3").
    pub name: String,
    /// Atomic number of the element.
    pub atomic_number: u8,
    /// The 3D coordinates of the atom in Angstroms.
    pub position: Point3<f64>,
    /// Optional pharmacophore feature located on this atom.
    pub feature: Option<PharmacophoreType>,
}

impl Atom {
    /// Creates a new `Atom` without a pharmacophore feature.
    pub fn new(name: &str, atomic_number: u8, position: Point3<f64>) -> Self {
        Self {
            name: name.to_string(),
            atomic_number,
            position,
            feature: None,
        }
    }

    pub fn with_feature(mut self, feature: PharmacophoreType) -> Self {
        self.feature = Some(feature);
        self
    }

    #[inline]
    pub fn is_hydrogen(&self) -> bool {
        self.atomic_number == 1
    }

    pub fn symbol(&self) -> Option<&'static str> {
        element::symbol_for(self.atomic_number)
    }
}
