//! Domain models for joblab.

pub mod deployment;

// Re-exports for convenient access
pub use deployment::{Deployment, RawDeployment};
