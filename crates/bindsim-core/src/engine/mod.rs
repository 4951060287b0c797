//! # Engine Module
//!
//! The stateful layer of the binding simulator. It owns the random source, validates and
//! buffers parameter changes, keeps the particle population at its targets, advances the
//! binding kinetics one tick at a time and records how many proteins each ligand species
//! occupies.
//!
//! ## Architecture
//!
//! - **Configuration** ([`config`]) - Simulation parameters, defaults and validation
//! - **Commands** ([`command`]) - Parameter updates and control commands buffered until the next tick
//! - **Spawn Placement** ([`placement`]) - Collision-free random placement of new particles
//! - **Population Control** ([`population`]) - Reconciling live particle counts with their targets
//! - **Kinetics** ([`kinetics`]) - Brownian motion and the stochastic bind/unbind state machine
//! - **Metrics** ([`metrics`]) - Append-only bound-count time series
//! - **Snapshots** ([`snapshot`]) - Read-only views of particle state for renderers
//! - **Simulation** ([`simulation`]) - The facade tying everything together
//! - **Progress Monitoring** ([`progress`]) - Callbacks for long headless runs
//! - **Error Handling** ([`error`]) - Engine-level error types
//!
//! ## Tick Model
//!
//! A tick is one synchronous pass: pending commands are applied (reconciling the population
//! if a target changed), free particles move, bound ligands follow their proteins, bind and
//! unbind transitions are drawn, and a metrics sample is appended. Nothing mutates the
//! particle collections while the bind/unbind pass is iterating them.

pub mod command;
pub mod config;
pub mod error;
pub mod kinetics;
pub mod metrics;
pub mod placement;
pub mod population;
pub mod progress;
pub mod simulation;
pub mod snapshot;

#[cfg(test)]
pub(crate) mod testing;
