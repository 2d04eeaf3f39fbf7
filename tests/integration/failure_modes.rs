use std::fs;

use crate::common::{stderr, Install, TARGET_NAME};

#[test]
fn missing_env_file_fails_before_target_runs() {
    let install = Install::new();
    install.write_marking_target();

    let output = install.run(&[]);

    assert_eq!(output.status.code(), Some(66));
    assert!(stderr(&output).contains(".gmail_env"), "stderr: {}", stderr(&output));
    assert!(!install.marker().exists(), "target must not run");
}

#[test]
fn missing_env_file_is_reported_even_without_target() {
    let install = Install::new();

    let output = install.run(&[]);

    assert_eq!(output.status.code(), Some(66));
    assert!(
        !stderr(&output).contains(TARGET_NAME),
        "target must not be looked at: {}",
        stderr(&output)
    );
}

#[test]
fn missing_target_is_distinguishable_from_missing_env() {
    let install = Install::new();
    install.write_env("API_KEY=abc123\n");

    let output = install.run(&[]);

    assert_eq!(output.status.code(), Some(127));
    assert!(stderr(&output).contains(TARGET_NAME), "stderr: {}", stderr(&output));
    assert!(stderr(&output).contains("does not exist"));
}

#[test]
fn unreadable_env_file_is_missing_config() {
    let install = Install::new();
    install.write_marking_target();
    fs::create_dir_all(install.dir.join(".gmail_env")).expect("can create directory");

    let output = install.run(&[]);

    assert_eq!(output.status.code(), Some(66));
    assert!(!install.marker().exists());
}

#[test]
fn shell_statements_in_env_file_are_rejected() {
    let install = Install::new();
    install.write_env("API_KEY=abc123\ntouch /tmp/run-mail-pwned\n");
    install.write_marking_target();

    let output = install.run(&[]);

    assert_eq!(output.status.code(), Some(65));
    assert!(stderr(&output).contains("line 2"), "stderr: {}", stderr(&output));
    assert!(!install.marker().exists(), "target must not run");
}

#[test]
fn lenient_mode_skips_bad_lines_with_warning() {
    let install = Install::new();
    install.write_env("API_KEY=abc123\nsource ~/.profile\n");
    install.write_marking_target();

    let output = install.run(&["--lenient"]);

    assert!(output.status.success(), "stderr: {}", stderr(&output));
    assert!(
        stderr(&output).contains("Skipping malformed environment line"),
        "stderr: {}",
        stderr(&output)
    );
    assert!(install.marker().exists());
}

#[test]
fn required_variables_are_enforced() {
    let install = Install::new();
    install.write_env("GMAIL_USER=someone@example.com\n");
    install.write_settings(
        "[launcher]\ninterpreter = \"sh\"\n\n[env]\nrequired = [\"GMAIL_USER\", \"GMAIL_APP_PASS\"]\n",
    );
    install.write_marking_target();

    let output = install
        .command(&install.launcher)
        .env_remove("GMAIL_APP_PASS")
        .output()
        .expect("launcher should start");

    assert_eq!(output.status.code(), Some(78));
    assert!(stderr(&output).contains("GMAIL_APP_PASS"), "stderr: {}", stderr(&output));
    assert!(!install.marker().exists());
}

#[test]
fn unknown_interpreter_is_exec_error() {
    let install = Install::new();
    install.write_env("API_KEY=abc123\n");
    install.write_marking_target();

    let output = install.run(&["--interpreter", "run-mail-no-such-interpreter"]);

    assert_eq!(output.status.code(), Some(127));
    assert!(stderr(&output).contains("was not found"), "stderr: {}", stderr(&output));
}

#[test]
fn default_interpreter_requires_python3_on_path() {
    let install = Install::new();
    install.remove_settings();
    let bin = install.root.join("pybin");
    fs::create_dir_all(&bin).expect("can create bin dir");
    crate::common::write_script(&bin.join("python"), "echo wrong-python\n");
    install.write_env(&format!("PATH={}\n", bin.display()));
    install.write_marking_target();

    let output = install.run(&[]);

    assert_eq!(output.status.code(), Some(127));
    assert!(stderr(&output).contains("python3"), "stderr: {}", stderr(&output));
    assert!(!String::from_utf8_lossy(&output.stdout).contains("wrong-python"));
}

#[test]
fn non_utf8_env_line_is_malformed() {
    let install = Install::new();
    install.write_marking_target();
    fs::write(install.dir.join(".gmail_env"), b"A=1\nB=caf\xe9\n").expect("can write env file");

    let output = install.run(&[]);

    assert_eq!(output.status.code(), Some(65));
    assert!(stderr(&output).contains("line 2"), "stderr: {}", stderr(&output));
}

#[test]
fn invalid_settings_file_aborts() {
    let install = Install::new();
    install.write_env("API_KEY=abc123\n");
    install.write_settings("[env]\nmalformed = \"ignore\"\n");
    install.write_marking_target();

    let output = install.run(&[]);

    assert_eq!(output.status.code(), Some(78));
    assert!(stderr(&output).contains("env.malformed"), "stderr: {}", stderr(&output));
}

#[test]
fn missing_dir_override_fails_to_resolve() {
    let install = Install::new();

    let output = install.run(&["--dir", "does/not/exist"]);

    assert_eq!(output.status.code(), Some(70));
}

#[test]
fn unexpected_arguments_are_usage_errors() {
    let install = Install::new();
    install.write_env("API_KEY=abc123\n");
    install.write_marking_target();

    let output = install.run(&["extra-argument"]);

    assert_eq!(output.status.code(), Some(2));
    assert!(!install.marker().exists());
}
