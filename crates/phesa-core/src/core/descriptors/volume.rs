use super::gaussian::{AtomicGaussian, Gaussian, VolumeGaussian};
use super::pharmacophore::PPGaussian;
use crate::core::models::molecule::Molecule;
use nalgebra::Point3;

/// Shape and pharmacophore descriptor set of one molecule conformation.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MolecularVolume {
    pub atomic: Vec<AtomicGaussian>,
    pub volumes: Vec<VolumeGaussian>,
    pub pharmacophores: Vec<PPGaussian>,
}

impl MolecularVolume {
    /// One atomic Gaussian per heavy atom and one pharmacophore Gaussian per
    /// atom that carries a feature. No volume Gaussians are created.
    pub fn from_molecule(molecule: &Molecule) -> Self {
        let atomic = molecule
            .atoms()
            .iter()
            .enumerate()
            .filter(|(_, atom)| !atom.is_hydrogen())
            .map(|(index, atom)| AtomicGaussian::new(index, atom.atomic_number, atom.position))
            .collect();
        let pharmacophores = molecule
            .atoms()
            .iter()
            .enumerate()
            .filter_map(|(index, atom)| {
                atom.feature
                    .map(|feature| PPGaussian::new(index, feature, atom.position))
            })
            .collect();

        Self {
            atomic,
            volumes: Vec::new(),
            pharmacophores,
        }
    }

    pub fn with_volume_gaussian(mut self, gaussian: VolumeGaussian) -> Self {
        self.volumes.push(gaussian);
        self
    }

    /// Recomputes every stored center from a coordinate buffer.
    pub fn update_centers(&mut self, positions: &[Point3<f64>]) {
        for gaussian in &mut self.atomic {
            gaussian.update_center(positions);
        }
        for gaussian in &mut self.volumes {
            gaussian.update_center(positions);
        }
        for gaussian in &mut self.pharmacophores {
            gaussian.update_center(positions);
        }
    }
}
