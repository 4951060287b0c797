//! # bindsim Core Library
//!
//! A particle-based simulator of protein-ligand binding kinetics. Proteins, ligands and
//! competitor ligands diffuse under Brownian motion inside a bounded two-dimensional arena,
//! ligands bind to and unbind from single-site proteins as Poisson processes, and the number
//! of occupied proteins per ligand species is recorded every tick.
//!
//! ## Architectural Philosophy
//!
//! The library follows a three-layer architecture:
//!
//! - **[`core`]: The Foundation.** Plain data models (`ParticleSystem`, `Protein`, `Ligand`),
//!   arena geometry and the rate-to-probability conversion used by the binding state machine.
//!
//! - **[`engine`]: The Logic Core.** The stateful layer. It owns the random source, validates
//!   parameters, buffers commands until the next tick boundary, places and removes particles,
//!   advances the kinetics and records the metric series.
//!
//! - **[`workflows`]: The Public API.** Headless end-to-end runs that drive the engine for a
//!   fixed number of ticks with a schedule of parameter changes.

pub mod core;
pub mod engine;
pub mod workflows;
