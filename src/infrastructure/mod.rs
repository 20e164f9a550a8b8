//! Infrastructure layer.
//!
//! Provides technical concerns that support the application without containing
//! business logic. This layer handles configuration, runtime wiring and
//! the status file.
//!
//! # Submodules
//!
//! - [`bootstrap`] - Composition root for runtime wiring
//! - [`config`] - Configuration loading and validation
//! - [`orchestration`] - Runtime orchestration
//! - [`status`] - JSON status file for external monitoring

pub mod bootstrap;
pub mod config;
pub mod orchestration;
pub mod status;
