//! Explicit `KEY=VALUE` environment file parser.
//!
//! The file is read as data, never executed. Accepted syntax is the subset of
//! POSIX shell assignments that env files use in practice: an optional
//! `export` keyword, unquoted, single-quoted and double-quoted values, and
//! `$NAME` / `${NAME}` expansion. Anything else (command substitution,
//! pipelines, bare statements) is a malformed line.

use std::{
    collections::HashMap,
    fs,
    path::{Path, PathBuf},
};

use tracing::{debug, warn};

use crate::lib::errors::LaunchError;

/// What to do with a line that is not a plain assignment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MalformedLinePolicy {
    /// Abort the launch.
    #[default]
    Reject,
    /// Log a warning and skip the line.
    Warn,
}

impl MalformedLinePolicy {
    pub const fn as_str(&self) -> &'static str {
        match self {
            MalformedLinePolicy::Reject => "reject",
            MalformedLinePolicy::Warn => "warn",
        }
    }
}

/// One assignment read from the file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EnvEntry {
    pub key: String,
    pub value: String,
    pub line: usize,
}

/// A line skipped under [`MalformedLinePolicy::Warn`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SkippedLine {
    pub line: usize,
    pub reason: String,
}

/// Parsed contents of an env file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EnvFile {
    pub path: PathBuf,
    pub entries: Vec<EnvEntry>,
    pub skipped: Vec<SkippedLine>,
}

impl EnvFile {
    /// Final value of `key`; later assignments win.
    pub fn get(&self, key: &str) -> Option<&str> {
        self.entries
            .iter()
            .rev()
            .find(|entry| entry.key == key)
            .map(|entry| entry.value.as_str())
    }

    /// Deduplicated `(key, value)` pairs in order of first definition.
    pub fn variables(&self) -> Vec<(String, String)> {
        let mut positions: HashMap<&str, usize> = HashMap::new();
        let mut out: Vec<(String, String)> = Vec::new();
        for entry in &self.entries {
            match positions.get(entry.key.as_str()) {
                Some(&index) => out[index].1 = entry.value.clone(),
                None => {
                    positions.insert(entry.key.as_str(), out.len());
                    out.push((entry.key.clone(), entry.value.clone()));
                }
            }
        }
        out
    }

    /// Variable names, deduplicated, in order of first definition.
    pub fn keys(&self) -> Vec<String> {
        self.variables().into_iter().map(|(key, _)| key).collect()
    }
}

/// How an env file is applied to the inherited environment.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EnvFileOptions {
    pub malformed: MalformedLinePolicy,
    /// When false, inherited variables keep their value and references to
    /// them expand to the inherited value.
    pub override_existing: bool,
}

impl Default for EnvFileOptions {
    fn default() -> Self {
        Self {
            malformed: MalformedLinePolicy::Reject,
            override_existing: true,
        }
    }
}

/// Read and parse the env file at `path`, expanding references against the
/// current process environment.
pub fn load_env_file(path: &Path, options: EnvFileOptions) -> Result<EnvFile, LaunchError> {
    let content = fs::read(path).map_err(|source| LaunchError::MissingConfig {
        path: path.to_path_buf(),
        source,
    })?;
    let parsed = parse_env_bytes(&content, path, options, |name| std::env::var(name).ok())?;
    debug!(
        target: "run_mail::envfile",
        path = %path.display(),
        variables = parsed.entries.len(),
        skipped = parsed.skipped.len(),
        "Loaded environment file"
    );
    Ok(parsed)
}

/// Parse env file `content`. `inherited` resolves names from the environment
/// the launcher was started with.
pub fn parse_env_str<F>(
    content: &str,
    path: &Path,
    options: EnvFileOptions,
    inherited: F,
) -> Result<EnvFile, LaunchError>
where
    F: Fn(&str) -> Option<String>,
{
    parse_env_bytes(content.as_bytes(), path, options, inherited)
}

/// Like [`parse_env_str`], but a line that is not valid UTF-8 is a malformed
/// line rather than a read failure. Comment lines are skipped unchecked.
pub fn parse_env_bytes<F>(
    content: &[u8],
    path: &Path,
    options: EnvFileOptions,
    inherited: F,
) -> Result<EnvFile, LaunchError>
where
    F: Fn(&str) -> Option<String>,
{
    let content = content.strip_prefix(b"\xef\xbb\xbf").unwrap_or(content);
    let mut defined: HashMap<String, String> = HashMap::new();
    let mut entries = Vec::new();
    let mut skipped = Vec::new();

    for (index, raw) in content.split(|byte| *byte == b'\n').enumerate() {
        let line_no = index + 1;
        let lookup = |name: &str| {
            if options.override_existing {
                defined.get(name).cloned().or_else(|| inherited(name))
            } else {
                inherited(name).or_else(|| defined.get(name).cloned())
            }
        };
        let outcome = match std::str::from_utf8(raw) {
            Ok(line) => parse_line(line.trim_end_matches('\r'), &lookup),
            Err(_) if is_comment(&String::from_utf8_lossy(raw)) => Ok(None),
            Err(error) => Err(format!(
                "invalid UTF-8 at byte {} of the line",
                error.valid_up_to() + 1
            )),
        };
        match outcome {
            Ok(None) => {}
            Ok(Some((key, value))) => {
                defined.insert(key.clone(), value.clone());
                entries.push(EnvEntry {
                    key,
                    value,
                    line: line_no,
                });
            }
            Err(reason) => match options.malformed {
                MalformedLinePolicy::Reject => {
                    return Err(LaunchError::MalformedEnv {
                        path: path.to_path_buf(),
                        line: line_no,
                        message: reason,
                    });
                }
                MalformedLinePolicy::Warn => {
                    warn!(
                        target: "run_mail::envfile",
                        path = %path.display(),
                        line = line_no,
                        reason = %reason,
                        "Skipping malformed environment line"
                    );
                    skipped.push(SkippedLine {
                        line: line_no,
                        reason,
                    });
                }
            },
        }
    }

    Ok(EnvFile {
        path: path.to_path_buf(),
        entries,
        skipped,
    })
}

fn is_blank(c: char) -> bool {
    matches!(c, ' ' | '\t')
}

fn is_comment(line: &str) -> bool {
    line.trim_start_matches(is_blank).starts_with('#')
}

/// Returns true if `name` is a valid POSIX shell variable name.
pub fn is_valid_key(name: &str) -> bool {
    let mut chars = name.chars();
    match chars.next() {
        Some(first) if first == '_' || first.is_ascii_alphabetic() => {}
        _ => return false,
    }
    chars.all(|c| c == '_' || c.is_ascii_alphanumeric())
}

fn parse_line(
    line: &str,
    lookup: &dyn Fn(&str) -> Option<String>,
) -> Result<Option<(String, String)>, String> {
    let mut line = line.trim_start_matches(is_blank);
    if line.is_empty() || line.starts_with('#') {
        return Ok(None);
    }
    if let Some(rest) = line.strip_prefix("export") {
        if rest.starts_with(is_blank) {
            line = rest.trim_start_matches(is_blank);
        }
    }

    let Some(eq) = line.find('=') else {
        return Err("expected `KEY=VALUE`".to_string());
    };
    let key = &line[..eq];
    if !is_valid_key(key) {
        return Err(format!("invalid variable name `{key}`"));
    }
    let value = parse_value(&line[eq + 1..], lookup)?;
    Ok(Some((key.to_string(), value)))
}

fn parse_value(raw: &str, lookup: &dyn Fn(&str) -> Option<String>) -> Result<String, String> {
    let mut out = String::new();
    let mut chars = raw.chars().peekable();

    while let Some(c) = chars.next() {
        match c {
            c if is_blank(c) => {
                let rest: String = chars.by_ref().collect();
                let rest = rest.trim_start_matches(is_blank);
                if rest.is_empty() || rest.starts_with('#') {
                    return Ok(out);
                }
                return Err(format!("unexpected text after value: `{rest}`"));
            }
            '\'' => loop {
                match chars.next() {
                    Some('\'') => break,
                    Some(inner) => out.push(inner),
                    None => return Err("unterminated single quote".to_string()),
                }
            },
            '"' => loop {
                match chars.next() {
                    Some('"') => break,
                    Some('\\') => match chars.next() {
                        Some(escaped @ ('\\' | '"' | '$' | '`')) => out.push(escaped),
                        Some(other) => {
                            out.push('\\');
                            out.push(other);
                        }
                        None => return Err("unterminated double quote".to_string()),
                    },
                    Some('$') => expand(&mut chars, &mut out, lookup)?,
                    Some('`') => return Err("command substitution is not supported".to_string()),
                    Some(inner) => out.push(inner),
                    None => return Err("unterminated double quote".to_string()),
                }
            },
            '\\' => match chars.next() {
                Some(escaped) => out.push(escaped),
                None => return Err("line continuation is not supported".to_string()),
            },
            '$' => expand(&mut chars, &mut out, lookup)?,
            '`' => return Err("command substitution is not supported".to_string()),
            ';' | '|' | '&' | '<' | '>' | '(' | ')' => {
                return Err(format!("shell syntax `{c}` is not supported"));
            }
            other => out.push(other),
        }
    }

    Ok(out)
}

/// Expand the reference following a `$`, appending its value to `out`.
fn expand(
    chars: &mut std::iter::Peekable<std::str::Chars<'_>>,
    out: &mut String,
    lookup: &dyn Fn(&str) -> Option<String>,
) -> Result<(), String> {
    match chars.peek().copied() {
        Some('{') => {
            chars.next();
            let mut name = String::new();
            loop {
                match chars.next() {
                    Some('}') => break,
                    Some(c) => name.push(c),
                    None => return Err("unterminated `${`".to_string()),
                }
            }
            if is_special_parameter(&name) {
                return Ok(());
            }
            if !is_valid_key(&name) {
                return Err(format!("unsupported parameter expansion `${{{name}}}`"));
            }
            out.push_str(&lookup(&name).unwrap_or_default());
        }
        Some('(') => return Err("command substitution is not supported".to_string()),
        // Positional and special parameters; the launcher has none to offer.
        Some(c) if c.is_ascii_digit() || "?#*@!-$".contains(c) => {
            chars.next();
        }
        Some(c) if c == '_' || c.is_ascii_alphabetic() => {
            let mut name = String::new();
            while let Some(&c) = chars.peek() {
                if c == '_' || c.is_ascii_alphanumeric() {
                    name.push(c);
                    chars.next();
                } else {
                    break;
                }
            }
            out.push_str(&lookup(&name).unwrap_or_default());
        }
        _ => out.push('$'),
    }
    Ok(())
}

fn is_special_parameter(name: &str) -> bool {
    matches!(name, "?" | "#" | "*" | "@" | "!" | "-" | "$")
        || (!name.is_empty() && name.chars().all(|c| c.is_ascii_digit()))
}
