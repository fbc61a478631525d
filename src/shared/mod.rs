//! Shared components - common types, errors, config and logging

pub mod types;
pub mod errors;
pub mod utils;
pub mod config;
pub mod logging;
