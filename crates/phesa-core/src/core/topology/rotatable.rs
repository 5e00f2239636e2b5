use crate::core::models::molecule::Molecule;
use crate::core::models::topology::{Bond, BondOrder};
use crate::core::utils::geometry::{dihedral_angle, rotate_about_axis};
use nalgebra::{Point3, Unit, Vector3};
use std::collections::VecDeque;
use tracing::{debug, trace};

/// A single bond whose torsion is a degree of freedom.
#[derive(Debug, Clone, PartialEq)]
pub struct RotatableBond {
    /// Dihedral quadruple `[i, j, k, l]`; `j-k` is the bond itself and `k` is
    /// the end whose side moves.
    pub atoms: [usize; 4],
    /// Atoms rotated when the torsion changes: the smaller side of the bond,
    /// always containing `k` and never `j`.
    pub moving: Vec<usize>,
    /// `2·min(side, rest) / total` over heavy atoms, in `(0, 1]`; central
    /// bonds score close to 1.
    pub relevance: f64,
}

impl RotatableBond {
    /// Atom on the fixed side of the bond; the rotation center.
    #[inline]
    pub fn center(&self) -> usize {
        self.atoms[1]
    }

    #[inline]
    pub fn moving_end(&self) -> usize {
        self.atoms[2]
    }

    /// Unit rotation axis from the center to the moving end.
    pub fn axis(&self, positions: &[Point3<f64>]) -> Unit<Vector3<f64>> {
        Unit::new_normalize(positions[self.moving_end()] - positions[self.center()])
    }

    pub fn torsion(&self, positions: &[Point3<f64>]) -> f64 {
        let [i, j, k, l] = self.atoms;
        dihedral_angle(&positions[i], &positions[j], &positions[k], &positions[l])
    }

    /// Rotates the moving side in place, increasing the torsion by `angle`.
    pub fn rotate(&self, positions: &mut [Point3<f64>], angle: f64) {
        let origin = positions[self.center()];
        let axis = positions[self.moving_end()] - origin;
        for &atom in &self.moving {
            positions[atom] = rotate_about_axis(&positions[atom], &origin, &axis, angle);
        }
    }
}

/// Finds the rotatable bonds of a molecule and partitions each into a fixed
/// and a moving side.
///
/// A bond is rotatable when it is a single bond outside any ring, both ends
/// have a further heavy-atom neighbour, and neither end is linear (part of a
/// triple bond or of two double bonds).
pub struct RotatableBondAnalyzer<'a> {
    molecule: &'a Molecule,
}

impl<'a> RotatableBondAnalyzer<'a> {
    pub fn new(molecule: &'a Molecule) -> Self {
        Self { molecule }
    }

    /// Rotatable bonds in bond-table order.
    pub fn analyze(&self) -> Vec<RotatableBond> {
        let heavy_total = self
            .molecule
            .atoms()
            .iter()
            .filter(|atom| !atom.is_hydrogen())
            .count();

        let bonds: Vec<RotatableBond> = self
            .molecule
            .bonds()
            .iter()
            .filter(|bond| self.is_rotatable(bond))
            .filter_map(|bond| self.build(bond, heavy_total))
            .collect();

        debug!(
            "Found {} rotatable bond(s) among {} bonds.",
            bonds.len(),
            self.molecule.bonds().len()
        );
        bonds
    }

    fn is_rotatable(&self, bond: &Bond) -> bool {
        if !bond.order.is_single() {
            return false;
        }
        let atoms = self.molecule.atoms();
        if atoms[bond.atom1].is_hydrogen() || atoms[bond.atom2].is_hydrogen() {
            return false;
        }
        if self.is_terminal(bond.atom1, bond.atom2) || self.is_terminal(bond.atom2, bond.atom1) {
            return false;
        }
        if self.is_linear(bond.atom1) || self.is_linear(bond.atom2) {
            return false;
        }
        if self.side(bond.atom2, bond.atom1).contains(&bond.atom1) {
            trace!("Bond {}-{} is part of a ring.", bond.atom1, bond.atom2);
            return false;
        }
        true
    }

    fn is_terminal(&self, atom: usize, partner: usize) -> bool {
        self.molecule
            .heavy_neighbors(atom)
            .all(|neighbor| neighbor == partner)
    }

    fn is_linear(&self, atom: usize) -> bool {
        let mut doubles = 0;
        for &neighbor in self.molecule.neighbors(atom) {
            match self.molecule.bond_between(atom, neighbor).map(|b| b.order) {
                Some(BondOrder::Triple) => return true,
                Some(BondOrder::Double) => doubles += 1,
                _ => {}
            }
        }
        doubles >= 2
    }

    /// Atoms reachable from `start` without crossing the bond to `blocked`,
    /// sorted by index. Contains `blocked` only if the bond lies in a ring.
    fn side(&self, start: usize, blocked: usize) -> Vec<usize> {
        let mut visited = vec![false; self.molecule.atom_count()];
        let mut queue = VecDeque::from([start]);
        visited[start] = true;

        while let Some(atom) = queue.pop_front() {
            for &neighbor in self.molecule.neighbors(atom) {
                if atom == start && neighbor == blocked {
                    continue;
                }
                if !visited[neighbor] {
                    visited[neighbor] = true;
                    queue.push_back(neighbor);
                }
            }
        }

        visited
            .iter()
            .enumerate()
            .filter_map(|(index, &seen)| seen.then_some(index))
            .collect()
    }

    fn build(&self, bond: &Bond, heavy_total: usize) -> Option<RotatableBond> {
        let side2 = self.side(bond.atom2, bond.atom1);
        let side1_len = self.molecule.atom_count() - side2.len();

        let (center, moving_end, moving) = if side2.len() <= side1_len {
            (bond.atom1, bond.atom2, side2)
        } else {
            (bond.atom2, bond.atom1, self.side(bond.atom1, bond.atom2))
        };

        let first = self
            .molecule
            .heavy_neighbors(center)
            .find(|&n| n != moving_end)?;
        let last = self
            .molecule
            .heavy_neighbors(moving_end)
            .find(|&n| n != center)?;

        let atoms = self.molecule.atoms();
        let heavy_moving = moving.iter().filter(|&&a| !atoms[a].is_hydrogen()).count();
        let heavy_rest = heavy_total - heavy_moving;
        let relevance = 2.0 * heavy_moving.min(heavy_rest) as f64 / heavy_total as f64;

        Some(RotatableBond {
            atoms: [first, center, moving_end, last],
            moving,
            relevance,
        })
    }
}
