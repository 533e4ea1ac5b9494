//! Reference-data loading and sea-routing backends.

pub mod loader;
pub mod searoute;
