use tracing::{debug, info};

use super::{LauncherSettings, SETTINGS_FILE_NAME};

pub fn log_source(path: &std::path::Path, explicit: bool) {
    if explicit {
        info!(
            target: "run_mail::config",
            path = %path.display(),
            "Loading launcher settings from --settings"
        );
    } else {
        debug!(
            target: "run_mail::config",
            path = %path.display(),
            default = SETTINGS_FILE_NAME,
            "Looking for launcher settings next to the executable"
        );
    }
}

pub fn log_defaults(path: &std::path::Path) {
    debug!(
        target: "run_mail::config",
        path = %path.display(),
        "No launcher settings found; using built-in defaults"
    );
}

pub fn log_loaded(settings: &LauncherSettings) {
    info!(
        target: "run_mail::config",
        path = %settings
            .source_path
            .as_deref()
            .map(|p| p.display().to_string())
            .unwrap_or_default(),
        env_file = %settings.launcher.env_file.display(),
        target_program = %settings.launcher.target.display(),
        interpreter = %settings.launcher.interpreter,
        malformed = settings.env.malformed.as_str(),
        override_existing = settings.env.override_existing,
        required = settings.env.required.len(),
        "Launcher settings loaded"
    );
}
