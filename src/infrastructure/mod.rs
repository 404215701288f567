//! Infrastructure layer.
//!
//! Technical concerns supporting the application without containing
//! business logic.
//!
//! # Submodules
//!
//! - [`bootstrap`] - Composition root for runtime wiring
//! - [`config`] - Configuration loading and validation
//! - [`health`] - Configuration health report

pub mod bootstrap;
pub mod config;
pub mod health;
