pub mod config;
pub mod constants;
pub mod curve;
pub mod error;
pub mod types;
