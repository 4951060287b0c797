//! # Core Models Module
//!
//! Data structures describing the particles of a binding simulation.
//!
//! - [`ids`] - Generational identifiers for proteins and ligands
//! - [`particle`] - Shared kinematic state and the two primitive motions
//! - [`protein`] - Proteins with a single binding slot
//! - [`ligand`] - Normal and competitor ligands with their binding state
//! - [`system`] - The arena that owns every particle and keeps bindings consistent
//!
//! Cross references between a protein and its bound ligand are stored as ids into the
//! [`system::ParticleSystem`] collections, never as references.
//!
//! ```ignore
//! use bindsim::core::models::{ligand::LigandVariant, system::ParticleSystem};
//! use nalgebra::Point2;
//!
//! let mut system = ParticleSystem::new();
//! let protein = system.add_protein(Point2::new(100.0, 100.0));
//! let ligand = system.add_ligand(LigandVariant::Normal, Point2::new(110.0, 100.0));
//! system.bind(ligand, protein)?;
//! ```

pub mod ids;
pub mod ligand;
pub mod particle;
pub mod protein;
pub mod system;
