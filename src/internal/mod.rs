// Crate-wide error type and stream configuration

pub mod config;
pub mod error;
