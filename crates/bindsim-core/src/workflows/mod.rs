//! # Workflows Module
//!
//! High-level entry points that drive a simulation from start to finish without an
//! interactive front end.
//!
//! ## Architecture
//!
//! - **Run Workflow** ([`run`]) - Advances a simulation for a fixed number of ticks, applying
//!   scheduled commands along the way, and returns the recorded metrics together with the
//!   final particle state and summary statistics.

pub mod run;
