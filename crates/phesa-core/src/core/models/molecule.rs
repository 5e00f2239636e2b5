use super::atom::Atom;
use super::topology::{Bond, BondOrder};
use nalgebra::Point3;

/// A small molecule with a single 3D conformation.
///
/// Atoms are addressed by their insertion index, which is also the index
/// used for coordinate buffers, Gaussian descriptors, and gradients
/// throughout the alignment engine.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Molecule {
    /// Atoms in insertion order.
    atoms: Vec<Atom>,
    /// List of all bonds in the molecule.
    bonds: Vec<Bond>,
    /// Cached adjacency list, indexed by atom index.
    adjacency: Vec<Vec<usize>>,
}

impl Molecule {
    /// Creates a new, empty molecule.
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends an atom and returns its index.
    pub fn add_atom(&mut self, atom: Atom) -> usize {
        self.atoms.push(atom);
        self.adjacency.push(Vec::new());
        self.atoms.len() - 1
    }

    /// Adds a bond between two existing atoms.
    ///
    /// Returns `None` if either index is out of range or both indices are
    /// the same. Adding an existing bond again is a successful no-op.
    pub fn add_bond(&mut self, atom1: usize, atom2: usize, order: BondOrder) -> Option<()> {
        if atom1 >= self.atoms.len() || atom2 >= self.atoms.len() || atom1 == atom2 {
            return None;
        }
        if self.adjacency[atom1].contains(&atom2) {
            return Some(());
        }

        self.bonds.push(Bond::new(atom1, atom2, order));
        self.adjacency[atom1].push(atom2);
        self.adjacency[atom2].push(atom1);
        Some(())
    }

    pub fn atom(&self, index: usize) -> Option<&Atom> {
        self.atoms.get(index)
    }

    pub fn atoms(&self) -> &[Atom] {
        &self.atoms
    }

    pub fn atom_count(&self) -> usize {
        self.atoms.len()
    }

    pub fn bonds(&self) -> &[Bond] {
        &self.bonds
    }

    /// Bonded neighbours of an atom; empty for an unknown index.
    pub fn neighbors(&self, index: usize) -> &[usize] {
        self.adjacency.get(index).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn heavy_neighbors(&self, index: usize) -> impl Iterator<Item = usize> + '_ {
        self.neighbors(index)
            .iter()
            .copied()
            .filter(|&n| !self.atoms[n].is_hydrogen())
    }

    pub fn bond_between(&self, atom1: usize, atom2: usize) -> Option<&Bond> {
        self.bonds
            .iter()
            .find(|bond| bond.other(atom1) == Some(atom2))
    }

    /// Copies the current atom positions into a new buffer.
    pub fn positions(&self) -> Vec<Point3<f64>> {
        self.atoms.iter().map(|atom| atom.position).collect()
    }

    /// Overwrites atom positions from a buffer of the same length.
    ///
    /// Returns `None` and leaves the molecule untouched on a length mismatch.
    pub fn set_positions(&mut self, positions: &[Point3<f64>]) -> Option<()> {
        if positions.len() != self.atoms.len() {
            return None;
        }
        for (atom, position) in self.atoms.iter_mut().zip(positions) {
            atom.position = *position;
        }
        Some(())
    }
}
