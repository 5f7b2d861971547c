//! Centralized constants for the extdns-operator project.
//!
//! All project-wide constant values live here.
//! Change a value in one place and it applies everywhere.

pub mod naming;
pub mod paths;
pub mod state;
