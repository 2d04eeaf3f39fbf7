//! The launcher: settings, launch planning and process replacement.
pub mod config;
pub mod runtime;
