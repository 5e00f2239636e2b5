use crate::core::forcefield::energy::ForceField;
use crate::core::models::atom::{Atom, PharmacophoreType};
use crate::core::models::molecule::Molecule;
use crate::core::models::topology::BondOrder;
use nalgebra::{Point3, Vector3};

/// Five-carbon-like chain with an acceptor at the end and a donor branch.
///
/// ```text
///            N5 (donor)
///            |
///   C0 ---- C1 ---- C2 ---- C3 ---- O4 (acceptor)
/// ```
///
/// C1-C2 and C2-C3 are rotatable; every other bond is terminal.
pub fn flexible_chain() -> Molecule {
    let mut molecule = Molecule::new();
    let c0 = molecule.add_atom(Atom::new("C0", 6, Point3::new(0.0, 0.0, 0.0)));
    let c1 = molecule.add_atom(Atom::new("C1", 6, Point3::new(1.25, 0.85, 0.0)));
    let c2 = molecule.add_atom(Atom::new("C2", 6, Point3::new(2.5, 0.0, 0.3)));
    let c3 = molecule.add_atom(Atom::new("C3", 6, Point3::new(3.75, 0.85, 0.1)));
    let o4 = molecule.add_atom(
        Atom::new("O4", 8, Point3::new(5.0, 0.1, 0.6)).with_feature(PharmacophoreType::Acceptor),
    );
    let n5 = molecule.add_atom(
        Atom::new("N5", 7, Point3::new(1.3, 1.75, 1.1)).with_feature(PharmacophoreType::Donor),
    );
    for (a, b) in [(c0, c1), (c1, c2), (c2, c3), (c3, o4), (c1, n5)] {
        molecule.add_bond(a, b, BondOrder::Single).unwrap();
    }
    molecule
}

/// Six-membered carbon ring (atoms 0-5) carrying a C6-O7 hydroxymethyl group
/// on atom 0. Only the C0-C6 bond is rotatable.
pub fn ring_with_side_chain() -> Molecule {
    let mut molecule = Molecule::new();
    let radius = 1.4;
    for i in 0..6 {
        let angle = i as f64 * std::f64::consts::PI / 3.0;
        let z = if i % 2 == 0 { 0.25 } else { -0.25 };
        molecule.add_atom(Atom::new(
            &format!("C{i}"),
            6,
            Point3::new(radius * angle.cos(), radius * angle.sin(), z),
        ));
    }
    for i in 0..6 {
        molecule.add_bond(i, (i + 1) % 6, BondOrder::Single).unwrap();
    }
    let c6 = molecule.add_atom(Atom::new("C6", 6, Point3::new(2.9, 0.1, 0.6)));
    let o7 = molecule.add_atom(
        Atom::new("O7", 8, Point3::new(3.5, 1.3, 0.2)).with_feature(PharmacophoreType::Donor),
    );
    molecule.add_bond(0, c6, BondOrder::Single).unwrap();
    molecule.add_bond(c6, o7, BondOrder::Single).unwrap();
    molecule
}

/// [`flexible_chain`] with every pharmacophore feature stripped.
pub fn featureless_chain() -> Molecule {
    let chain = flexible_chain();
    let mut molecule = Molecule::new();
    for atom in chain.atoms() {
        molecule.add_atom(Atom {
            feature: None,
            ..atom.clone()
        });
    }
    for bond in chain.bonds() {
        molecule.add_bond(bond.atom1, bond.atom2, bond.order).unwrap();
    }
    molecule
}

/// A force field with zero energy everywhere.
pub struct NullForceField {
    pub atoms: usize,
}

impl ForceField for NullForceField {
    fn atom_count(&self) -> usize {
        self.atoms
    }

    fn energy_and_gradient(&self, _positions: &[Point3<f64>], gradient: &mut [Vector3<f64>]) -> f64 {
        gradient.fill(Vector3::zeros());
        0.0
    }
}
