//! # Core Runtime Module
//!
//! Provides foundational runtime infrastructure for the library view engine:
//! - Logging and tracing infrastructure
//! - Engine configuration
//! - Event bus system
//!
//! ## Overview
//!
//! This crate contains the runtime utilities that `core-library` depends on.
//! It establishes the logging conventions and event broadcasting mechanisms
//! used by the reactive engine.

pub mod config;
pub mod error;
pub mod events;
pub mod logging;

pub use error::{Error, Result};
