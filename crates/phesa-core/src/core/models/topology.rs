/// Bond multiplicity as perceived by the input toolkit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum BondOrder {
    #[default]
    Single,
    Double,
    Triple,
    Aromatic,
}

impl BondOrder {
    /// Contraction applied to the sum of covalent radii for the ideal length.
    pub fn length_scale(&self) -> f64 {
        match self {
            Self::Single => 1.0,
            Self::Aromatic => 0.93,
            Self::Double => 0.87,
            Self::Triple => 0.78,
        }
    }

    /// Only single bonds can be torsional degrees of freedom.
    pub fn is_single(&self) -> bool {
        matches!(self, Self::Single)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Bond {
    pub atom1: usize,
    pub atom2: usize,
    pub order: BondOrder,
}

impl Bond {
    pub fn new(atom1: usize, atom2: usize, order: BondOrder) -> Self {
        Self {
            atom1,
            atom2,
            order,
        }
    }

    /// Returns the partner of `atom` in this bond, if `atom` is part of it.
    pub fn other(&self, atom: usize) -> Option<usize> {
        if self.atom1 == atom {
            Some(self.atom2)
        } else if self.atom2 == atom {
            Some(self.atom1)
        } else {
            None
        }
    }
}
