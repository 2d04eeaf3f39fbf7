//! Launch plan assembly and process replacement.
mod exec;
mod plan;
mod startup;

pub use exec::{build_command, replace_process, resolve_interpreter};
pub use plan::{build_plan, load_settings, LaunchPlan};
pub use startup::{prepare, run, LaunchExit};
