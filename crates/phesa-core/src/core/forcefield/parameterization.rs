use super::energy::{AngleTerm, BondTerm, ForceFieldError, MolecularForceField, VdwTerm};
use super::params::{ElementParam, ForcefieldParams};
use crate::core::models::molecule::Molecule;
use crate::core::models::topology::BondOrder;
use std::collections::VecDeque;
use tracing::debug;

const LINEAR_ANGLE_DEG: f64 = 180.0;
const TRIGONAL_ANGLE_DEG: f64 = 120.0;
const TETRAHEDRAL_ANGLE_DEG: f64 = 109.47;

/// Builds a [`MolecularForceField`] for one molecule from per-element parameters.
pub struct Parameterizer<'a> {
    params: &'a ForcefieldParams,
}

impl<'a> Parameterizer<'a> {
    pub fn new(params: &'a ForcefieldParams) -> Self {
        Self { params }
    }

    pub fn parameterize(&self, molecule: &Molecule) -> Result<MolecularForceField, ForceFieldError> {
        let elements = self.element_params(molecule)?;
        let globals = &self.params.globals;

        let bonds: Vec<BondTerm> = molecule
            .bonds()
            .iter()
            .map(|bond| BondTerm {
                atoms: [bond.atom1, bond.atom2],
                length: (elements[bond.atom1].covalent_radius
                    + elements[bond.atom2].covalent_radius)
                    * bond.order.length_scale(),
                stiffness: globals.bond_stiffness,
            })
            .collect();

        let mut angles = Vec::new();
        for center in 0..molecule.atom_count() {
            let neighbors = molecule.neighbors(center);
            let cos_ideal = ideal_angle_deg(molecule, center).to_radians().cos();
            for (n, &first) in neighbors.iter().enumerate() {
                for &last in &neighbors[n + 1..] {
                    angles.push(AngleTerm {
                        atoms: [first, center, last],
                        cos_ideal,
                        stiffness: globals.angle_stiffness,
                    });
                }
            }
        }

        let mut vdw = Vec::new();
        for a in 0..molecule.atom_count() {
            let separations = bond_separations(molecule, a, 3);
            for b in (a + 1)..molecule.atom_count() {
                let scale = match separations[b] {
                    Some(d) if d < 3 => continue,
                    Some(3) => globals.scale_14,
                    _ => 1.0,
                };
                vdw.push(VdwTerm {
                    atoms: [a, b],
                    r_min: elements[a].vdw_radius + elements[b].vdw_radius,
                    well_depth: scale * (elements[a].well_depth * elements[b].well_depth).sqrt(),
                });
            }
        }

        debug!(
            "Parameterized {} atoms: {} bond, {} angle, {} van der Waals terms.",
            molecule.atom_count(),
            bonds.len(),
            angles.len(),
            vdw.len()
        );

        Ok(MolecularForceField {
            atom_count: molecule.atom_count(),
            bonds,
            angles,
            vdw,
        })
    }

    fn element_params(&self, molecule: &Molecule) -> Result<Vec<ElementParam>, ForceFieldError> {
        molecule
            .atoms()
            .iter()
            .enumerate()
            .map(|(index, atom)| {
                atom.symbol()
                    .and_then(|symbol| self.params.element(symbol))
                    .copied()
                    .ok_or_else(|| ForceFieldError::MissingParameters {
                        atom: index,
                        element: atom
                            .symbol()
                            .map(str::to_string)
                            .unwrap_or_else(|| format!("Z={}", atom.atomic_number)),
                    })
            })
            .collect()
    }
}

/// Ideal bond angle around `center` from the orders of its bonds.
fn ideal_angle_deg(molecule: &Molecule, center: usize) -> f64 {
    let neighbors = molecule.neighbors(center);
    let orders: Vec<BondOrder> = neighbors
        .iter()
        .filter_map(|&n| molecule.bond_between(center, n).map(|bond| bond.order))
        .collect();
    let doubles = orders.iter().filter(|&&o| o == BondOrder::Double).count();
    let has_triple = orders.contains(&BondOrder::Triple);

    if neighbors.len() == 2 && (has_triple || doubles >= 2) {
        LINEAR_ANGLE_DEG
    } else if doubles > 0 || has_triple || orders.contains(&BondOrder::Aromatic) {
        TRIGONAL_ANGLE_DEG
    } else {
        TETRAHEDRAL_ANGLE_DEG
    }
}

/// Number of bonds between `start` and every atom, up to `max_depth`;
/// `None` for atoms further away or disconnected.
fn bond_separations(molecule: &Molecule, start: usize, max_depth: usize) -> Vec<Option<usize>> {
    let mut depth = vec![None; molecule.atom_count()];
    depth[start] = Some(0);
    let mut queue = VecDeque::from([start]);

    while let Some(atom) = queue.pop_front() {
        let d = depth[atom].unwrap_or(0);
        if d == max_depth {
            continue;
        }
        for &neighbor in molecule.neighbors(atom) {
            if depth[neighbor].is_none() {
                depth[neighbor] = Some(d + 1);
                queue.push_back(neighbor);
            }
        }
    }
    depth
}
