//! CLI command modules.

pub mod config;
pub mod pair;
pub mod scan;
