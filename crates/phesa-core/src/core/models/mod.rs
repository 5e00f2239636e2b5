//! # Core Models Module
//!
//! Data structures for the small molecules that take part in an alignment.
//!
//! ## Key Components
//!
//! - [`atom`] - Atoms with element, coordinates, and an optional pharmacophore feature
//! - [`molecule`] - A molecule with one conformation, bonds, and cached adjacency
//! - [`topology`] - Bonds and bond orders
//! - [`element`] - Static element table (radii, atomic numbers)
//!
//! ```ignore
//! use phesa::core::models::{atom::Atom, molecule::Molecule, topology::BondOrder};
//!
//! let mut mol = Molecule::new();
//! let c = mol.add_atom(Atom::new("C1", 6, Point3::new(0.0, 0.0, 0.0)));
//! let o = mol.add_atom(Atom::new("O1", 8, Point3::new(1.43, 0.0, 0.0)));
//! mol.add_bond(c, o, BondOrder::Single);
//! ```

pub mod atom;
pub mod element;
pub mod molecule;
pub mod topology;
