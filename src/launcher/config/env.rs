use std::path::Path;

use serde::Deserialize;

use crate::lib::{
    envfile::{is_valid_key, MalformedLinePolicy},
    errors::SettingsError,
};

/// How env file contents are applied.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EnvSection {
    pub malformed: MalformedLinePolicy,
    pub override_existing: bool,
    pub required: Vec<String>,
}

impl Default for EnvSection {
    fn default() -> Self {
        Self {
            malformed: MalformedLinePolicy::Reject,
            override_existing: true,
            required: Vec::new(),
        }
    }
}

#[derive(Debug, Default, Deserialize)]
pub struct RawEnvSection {
    pub malformed: Option<String>,
    pub override_existing: Option<bool>,
    pub required: Option<Vec<String>>,
}

pub fn parse_env_section(
    raw: Option<RawEnvSection>,
    path: &Path,
) -> Result<EnvSection, SettingsError> {
    let raw = raw.unwrap_or_default();

    let malformed = match raw.malformed.as_deref().map(str::trim) {
        None => MalformedLinePolicy::Reject,
        Some("reject") => MalformedLinePolicy::Reject,
        Some("warn") => MalformedLinePolicy::Warn,
        Some(other) => {
            return Err(SettingsError::InvalidField {
                path: path.to_path_buf(),
                field: "env.malformed",
                message: format!("expected `reject` or `warn`, got `{other}`"),
            })
        }
    };

    let required = raw.required.unwrap_or_default();
    if let Some(bad) = required.iter().find(|name| !is_valid_key(name)) {
        return Err(SettingsError::InvalidField {
            path: path.to_path_buf(),
            field: "env.required",
            message: format!("`{bad}` is not a valid variable name"),
        });
    }

    Ok(EnvSection {
        malformed,
        override_existing: raw.override_existing.unwrap_or(true),
        required,
    })
}
