//! Application layer: configuration shared by the CLI and embedding hosts.

pub mod config;

pub use config::{AppConfig, EvaluationConfig};
