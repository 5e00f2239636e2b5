use phf::{Map, phf_map};

/// Static per-element data used by the descriptor builder and the force field.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ElementData {
    pub atomic_number: u8,
    /// Covalent radius in Angstroms.
    pub covalent_radius: f64,
    /// Van der Waals radius in Angstroms.
    pub vdw_radius: f64,
}

static ELEMENTS: Map<&'static str, ElementData> = phf_map! {
    "H" => ElementData { atomic_number: 1, covalent_radius: 0.31, vdw_radius: 1.10 },
    "B" => ElementData { atomic_number: 5, covalent_radius: 0.84, vdw_radius: 1.92 },
    "C" => ElementData { atomic_number: 6, covalent_radius: 0.76, vdw_radius: 1.70 },
    "N" => ElementData { atomic_number: 7, covalent_radius: 0.71, vdw_radius: 1.55 },
    "O" => ElementData { atomic_number: 8, covalent_radius: 0.66, vdw_radius: 1.52 },
    "F" => ElementData { atomic_number: 9, covalent_radius: 0.57, vdw_radius: 1.47 },
    "Si" => ElementData { atomic_number: 14, covalent_radius: 1.11, vdw_radius: 2.10 },
    "P" => ElementData { atomic_number: 15, covalent_radius: 1.07, vdw_radius: 1.80 },
    "S" => ElementData { atomic_number: 16, covalent_radius: 1.05, vdw_radius: 1.80 },
    "Cl" => ElementData { atomic_number: 17, covalent_radius: 1.02, vdw_radius: 1.75 },
    "Se" => ElementData { atomic_number: 34, covalent_radius: 1.20, vdw_radius: 1.90 },
    "Br" => ElementData { atomic_number: 35, covalent_radius: 1.20, vdw_radius: 1.85 },
    "I" => ElementData { atomic_number: 53, covalent_radius: 1.39, vdw_radius: 1.98 },
};

/// Fallback radius for elements missing from the table.
pub const DEFAULT_VDW_RADIUS: f64 = 1.70;

pub fn element_by_symbol(symbol: &str) -> Option<&'static ElementData> {
    ELEMENTS.get(symbol.trim())
}

pub fn symbol_for(atomic_number: u8) -> Option<&'static str> {
    ELEMENTS
        .entries()
        .find(|(_, data)| data.atomic_number == atomic_number)
        .map(|(symbol, _)| *symbol)
}

pub fn element_by_number(atomic_number: u8) -> Option<&'static ElementData> {
    symbol_for(atomic_number).and_then(element_by_symbol)
}

/// Iterates over every tabulated element as `(symbol, data)`.
pub fn elements() -> impl Iterator<Item = (&'static str, &'static ElementData)> {
    ELEMENTS.entries().map(|(symbol, data)| (*symbol, data))
}

pub fn vdw_radius(atomic_number: u8) -> f64 {
    element_by_number(atomic_number)
        .map(|data| data.vdw_radius)
        .unwrap_or(DEFAULT_VDW_RADIUS)
}
