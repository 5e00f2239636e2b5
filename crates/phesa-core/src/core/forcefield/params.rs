use crate::core::models::element;
use phf::{Map, phf_map};
use serde::Deserialize;
use std::collections::HashMap;
use std::path::Path;
use thiserror::Error;

/// Lennard-Jones well depths (kcal/mol) of the built-in parameter set.
static WELL_DEPTHS: Map<&'static str, f64> = phf_map! {
    "H" => 0.044,
    "B" => 0.180,
    "C" => 0.105,
    "N" => 0.069,
    "O" => 0.060,
    "F" => 0.050,
    "Si" => 0.402,
    "P" => 0.305,
    "S" => 0.274,
    "Cl" => 0.227,
    "Se" => 0.291,
    "Br" => 0.251,
    "I" => 0.339,
};

#[derive(Debug, Deserialize, Clone, PartialEq)]
pub struct GlobalParams {
    /// Harmonic bond force constant, kcal/(mol·Å²).
    pub bond_stiffness: f64,
    /// Angle force constant on `(cos θ - cos θ0)²`, kcal/mol.
    pub angle_stiffness: f64,
    /// Scale applied to van der Waals pairs separated by exactly three bonds.
    pub scale_14: f64,
}

impl Default for GlobalParams {
    fn default() -> Self {
        Self {
            bond_stiffness: 350.0,
            angle_stiffness: 100.0,
            scale_14: 0.5,
        }
    }
}

#[derive(Debug, Deserialize, Clone, Copy, PartialEq)]
pub struct ElementParam {
    pub covalent_radius: f64,
    pub vdw_radius: f64,
    pub well_depth: f64,
}

/// Per-element parameters of the built-in force field.
///
/// Built explicitly by the host, either from the static tables
/// ([`ForcefieldParams::default`]) or from a TOML file.
#[derive(Debug, Deserialize, Clone, PartialEq)]
pub struct ForcefieldParams {
    #[serde(default)]
    pub globals: GlobalParams,
    pub elements: HashMap<String, ElementParam>,
}

#[derive(Debug, Error)]
pub enum ParamLoadError {
    #[error("File I/O error for '{path}': {source}")]
    Io {
        path: String,
        source: std::io::Error,
    },
    #[error("TOML parsing error for '{path}': {source}")]
    Toml {
        path: String,
        source: toml::de::Error,
    },
}

impl ForcefieldParams {
    pub fn load(path: &Path) -> Result<Self, ParamLoadError> {
        let content = std::fs::read_to_string(path).map_err(|e| ParamLoadError::Io {
            path: path.to_string_lossy().to_string(),
            source: e,
        })?;
        Self::from_toml_str(&content).map_err(|e| ParamLoadError::Toml {
            path: path.to_string_lossy().to_string(),
            source: e,
        })
    }

    pub fn from_toml_str(content: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(content)
    }

    pub fn element(&self, symbol: &str) -> Option<&ElementParam> {
        self.elements.get(symbol)
    }
}

impl Default for ForcefieldParams {
    fn default() -> Self {
        let elements = element::elements()
            .filter_map(|(symbol, data)| {
                WELL_DEPTHS.get(symbol).map(|&well_depth| {
                    (
                        symbol.to_string(),
                        ElementParam {
                            covalent_radius: data.covalent_radius,
                            vdw_radius: data.vdw_radius,
                            well_depth,
                        },
                    )
                })
            })
            .collect();

        Self {
            globals: GlobalParams::default(),
            elements,
        }
    }
}
