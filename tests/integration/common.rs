use std::{
    fs,
    os::unix::fs::PermissionsExt,
    path::{Path, PathBuf},
    process::{Command, Output},
};

use tempfile::TempDir;

pub const BINARY_PATH: &str = env!("CARGO_BIN_EXE_run-mail");
pub const LAUNCHER_NAME: &str = "run_mail";
pub const TARGET_NAME: &str = "send_mail_test_v3.py";

/// A throwaway `/opt/mailer`-style installation with its own launcher copy.
pub struct Install {
    _temp: TempDir,
    pub root: PathBuf,
    pub dir: PathBuf,
    pub launcher: PathBuf,
}

impl Install {
    /// Copy the launcher into `<root>/opt/mailer/` and point it at `sh` so
    /// targets can be shell scripts.
    pub fn new() -> Self {
        let temp = tempfile::tempdir().expect("can create temp directory");
        let root = temp.path().canonicalize().expect("temp dir canonicalizes");
        let dir = root.join("opt").join("mailer");
        fs::create_dir_all(&dir).expect("can create install dir");
        fs::create_dir_all(root.join("tmp")).expect("can create caller dir");

        let launcher = dir.join(LAUNCHER_NAME);
        fs::copy(BINARY_PATH, &launcher).expect("can copy launcher binary");
        fs::set_permissions(&launcher, fs::Permissions::from_mode(0o755))
            .expect("can chmod launcher");

        let install = Self {
            _temp: temp,
            root,
            dir,
            launcher,
        };
        install.write_settings("[launcher]\ninterpreter = \"sh\"\n");
        install
    }

    pub fn caller_dir(&self) -> PathBuf {
        self.root.join("tmp")
    }

    pub fn write_env(&self, content: &str) {
        fs::write(self.dir.join(".gmail_env"), content).expect("can write env file");
    }

    pub fn write_settings(&self, content: &str) {
        fs::write(self.dir.join("launcher.toml"), content).expect("can write settings");
    }

    pub fn remove_settings(&self) {
        fs::remove_file(self.dir.join("launcher.toml")).expect("can remove settings");
    }

    pub fn write_target(&self, body: &str) {
        write_script(&self.dir.join(TARGET_NAME), body);
    }

    /// Path of a file the target creates as proof that it ran.
    pub fn marker(&self) -> PathBuf {
        self.root.join("target-ran")
    }

    /// Target that records its run and prints `env:$API_KEY`.
    pub fn write_marking_target(&self) {
        self.write_target(&format!(
            "touch '{}'\necho \"env:$API_KEY\"\n",
            self.marker().display()
        ));
    }

    pub fn command(&self, program: &Path) -> Command {
        let mut command = Command::new(program);
        command
            .current_dir(self.caller_dir())
            .env_remove("RUN_MAIL_DIR")
            .env_remove("RUST_LOG");
        command
    }

    pub fn run(&self, args: &[&str]) -> Output {
        self.command(&self.launcher)
            .args(args)
            .output()
            .expect("launcher should start")
    }
}

pub fn write_script(path: &Path, body: &str) {
    fs::write(path, format!("#!/bin/sh\n{body}")).expect("can write script");
    fs::set_permissions(path, fs::Permissions::from_mode(0o755)).expect("can chmod script");
}

pub fn stdout(output: &Output) -> String {
    String::from_utf8_lossy(&output.stdout).to_string()
}

pub fn stderr(output: &Output) -> String {
    String::from_utf8_lossy(&output.stderr).to_string()
}
