//! # drape-solver
//!
//! Spring network construction, force accumulation, and time integration.
//!
//! ## Key Types
//!
//! - [`SimulationConfig`] — Immutable per-run parameters (time step,
//!   sub-steps, gravity, stiffness, damping, integration method)
//! - [`SpringNetwork`] — Node arena plus springs, built from a triangle list
//! - [`Node`] / [`Spring`] — Point masses and the elastic links between them
//! - [`IntegrationMethod`] — Explicit or symplectic Euler
//! - [`Simulation`] — Fixed-tick driver with sub-stepping and pause control

pub mod config;
pub mod integrator;
pub mod network;
pub mod node;
pub mod simulation;
pub mod spring;

pub use config::SimulationConfig;
pub use integrator::IntegrationMethod;
pub use network::{BuildStats, SpringNetwork};
pub use node::Node;
pub use simulation::{Simulation, TickReport};
pub use spring::{Spring, SpringKind};
