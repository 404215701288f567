//! Shared test utilities available to both unit and integration tests.
//!
//! Enabled via `#[cfg(test)]` (unit tests) or the `testkit` feature
//! (integration tests).
//!
//! # Modules
//!
//! - [`source`] - [`ScriptedSource`](source::ScriptedSource), a programmable
//!   [`FleetSource`](crate::port::FleetSource) with failure injection.
//! - [`domain`] - Builders for hosts and instances.
//! - [`config`] - Canonical test configurations.

pub mod config;
pub mod domain;
pub mod source;
