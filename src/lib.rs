// Core modules
pub mod config;
pub mod engine;
pub mod error;
pub mod execution;
pub mod fusion;
pub mod indicators;
pub mod models;
pub mod oracle;
pub mod persistence;
pub mod risk;
pub mod strategy;
pub mod venue;
pub mod webhook;

// Re-export commonly used types
pub use error::{EngineError, Result};
pub use models::*;
pub use strategy::Strategy;
