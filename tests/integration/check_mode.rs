use std::{fs, path::Path};

use serde_json::Value;

use crate::common::{stderr, stdout, Install, BINARY_PATH, TARGET_NAME};

fn report(output: &std::process::Output) -> Value {
    assert!(output.status.success(), "stderr: {}", stderr(output));
    serde_json::from_str(&stdout(output)).expect("check output is JSON")
}

#[test]
fn check_reports_plan_without_running_target() {
    let install = Install::new();
    install.write_env("GMAIL_USER=someone@example.com\nGMAIL_APP_PASS='abcd efgh'\n");
    install.write_marking_target();

    let output = install.run(&["--check"]);
    let value = report(&output);

    assert_eq!(value["status"], "ready");
    assert_eq!(value["install_dir"], install.dir.display().to_string());
    assert_eq!(
        value["target"],
        install.dir.join(TARGET_NAME).display().to_string()
    );
    assert_eq!(
        value["variables"],
        serde_json::json!(["GMAIL_USER", "GMAIL_APP_PASS"])
    );
    assert!(!stdout(&output).contains("abcd efgh"), "values must not leak");
    assert!(!install.marker().exists(), "check must not run the target");
}

#[test]
fn check_through_symlink_reports_real_directory() {
    let install = Install::new();
    install.write_env("API_KEY=abc123\n");
    install.write_marking_target();
    let link = install.root.join("run_mail_link");
    std::os::unix::fs::symlink(&install.launcher, &link).expect("can create symlink");

    let value = report(
        &install
            .command(&link)
            .arg("--check")
            .output()
            .expect("launcher should start"),
    );

    assert_eq!(value["install_dir"], install.dir.display().to_string());
}

#[test]
fn env_var_dir_override_is_honoured() {
    let install = Install::new();
    install.write_env("API_KEY=abc123\n");
    install.write_marking_target();

    let value = report(
        &install
            .command(Path::new(BINARY_PATH))
            .env("RUN_MAIL_DIR", &install.dir)
            .arg("--check")
            .output()
            .expect("launcher should start"),
    );

    assert_eq!(value["install_dir"], install.dir.display().to_string());
}

#[test]
fn cli_dir_override_beats_env_var() {
    let install = Install::new();
    install.write_env("API_KEY=abc123\n");
    install.write_marking_target();
    let other = install.root.join("elsewhere");
    fs::create_dir_all(&other).expect("can create other dir");

    let value = report(
        &install
            .command(Path::new(BINARY_PATH))
            .env("RUN_MAIL_DIR", &other)
            .args(["--check", "--dir"])
            .arg(&install.dir)
            .output()
            .expect("launcher should start"),
    );

    assert_eq!(value["install_dir"], install.dir.display().to_string());
}

#[test]
fn check_lists_skipped_lines_in_lenient_mode() {
    let install = Install::new();
    install.write_env("API_KEY=abc123\nexport PATH=$PATH:$(pwd)\n");
    install.write_marking_target();

    let value = report(&install.run(&["--check", "--lenient"]));

    assert_eq!(value["skipped_lines"][0]["line"], 2);
    assert_eq!(value["variables"], serde_json::json!(["API_KEY"]));
}

#[test]
fn check_fails_like_a_launch_when_env_is_missing() {
    let install = Install::new();
    install.write_marking_target();

    let output = install.run(&["--check"]);

    assert_eq!(output.status.code(), Some(66));
    assert!(stdout(&output).is_empty());
}
