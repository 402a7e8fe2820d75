pub mod comments;
pub mod config;
pub mod error;
pub mod telemetry;
