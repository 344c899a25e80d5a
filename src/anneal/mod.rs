//! Simulated annealing over pairing configurations.
//!
//! Each step proposes a neighbor ([`crate::mutate::propose_neighbor`]),
//! scores it with the round's [`crate::EnergyModel`], and accepts it with
//! the Metropolis probability `min(1, exp(-beta * delta))`. The inverse
//! temperature `beta` grows geometrically up to a cap, so the search turns
//! greedier as it runs.
//!
//! A single seeded generator per run drives the pair swap, the left-out
//! swap and the acceptance draw, in that order, on every step.
//!
//! # References
//!
//! - Kirkpatrick, Gelatt & Vecchi (1983), "Optimization by Simulated Annealing"
//! - Metropolis et al. (1953), "Equation of State Calculations by Fast Computing Machines"

mod config;
mod runner;

pub use config::AnnealConfig;
pub use runner::{AnnealResult, AnnealRunner, StepRecord};
