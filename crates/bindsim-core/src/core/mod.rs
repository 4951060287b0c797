//! # Core Module
//!
//! Stateless building blocks of the binding simulation.
//!
//! - **Particle Representation** ([`models`]) - Particles, proteins, ligands and the arena that owns them
//! - **Geometry** ([`geometry`]) - The rectangular arena and random directions
//! - **Rate Kinetics** ([`kinetics`]) - Conversion of rate constants into per-tick probabilities
//!
//! Nothing in this module owns a random number generator; callers pass one in.

pub mod geometry;
pub mod kinetics;
pub mod models;
