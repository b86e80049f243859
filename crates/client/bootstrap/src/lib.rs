//! Shared bootstrap utilities for mod-aware front-ends.
//!
//! Provides configuration loading and orchestrator assembly over the
//! filesystem collaborators, reusable by the CLI or any other front-end.
pub mod builder;
pub mod config;

pub use builder::{LoaderBuilder, LoaderSetup};
pub use config::BootstrapConfig;
