//! Shared library modules providing error types, env file parsing, path helpers, and telemetry initialization.

pub mod envfile;
pub mod errors;
pub mod paths;
pub mod telemetry;
