//! Entry point for run-mail.
use std::process::ExitCode;

use clap::Parser;
use run_mail::{
    cli::{render_check_report, LaunchArgs, LaunchProfile, ParsedCommand},
    launcher::runtime::{self, LaunchExit},
    lib::telemetry,
};

fn main() -> ExitCode {
    match bootstrap() {
        Ok(_) => ExitCode::SUCCESS,
        Err(exit) => exit.report(),
    }
}

fn bootstrap() -> Result<(), LaunchExit> {
    let args = LaunchArgs::parse();
    telemetry::init_tracing(args.verbose).map_err(LaunchExit::from_error)?;
    let command = args.into_command()?;

    match command {
        ParsedCommand::Launch(profile) => runtime::run(profile),
        ParsedCommand::Check(profile) => handle_check(&profile),
    }
}

fn handle_check(profile: &LaunchProfile) -> Result<(), LaunchExit> {
    let plan = runtime::prepare(profile)?;
    let report = render_check_report(&plan).map_err(LaunchExit::from_error)?;
    println!("{report}");
    Ok(())
}
