//! Voyage economics for container vessels.
//!
//! Resolves a port rotation into sea legs, joins port-call tariffs, expands the
//! voyage over candidate speeds and charter hires, and projects slot and annual
//! economics. Each stage lives in [`domain`] and can be called on its own;
//! [`app::run_voyage`] chains them.

pub mod app;
pub mod domain;
pub mod infra;
pub mod util;
