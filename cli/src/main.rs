//! relpin CLI — the command-line entry point.
//!
//! # Usage
//!
//! ```text
//! relpin bootstrap
//! relpin apply [--silent]
//! relpin check [--silent]
//! relpin status [--format json]
//! ```

use std::path::PathBuf;
use std::process;

use relpin_core::cli::parse_args;
use relpin_core::elevation::{self, PrivilegeProbe, SystemPrivilegeProbe};
use relpin_core::infrastructure::runner::{CommandRunner, ShellRunner};
use relpin_core::sys::Sys;
use relpin_core::types::response::Response;

fn main() {
    let args: Vec<String> = std::env::args().collect();
    let arg_refs: Vec<&str> = args[1..].iter().map(|s| s.as_str()).collect();

    let cmd = match parse_args(&arg_refs) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("relpin: {}", e);
            process::exit(1);
        }
    };

    let silent = cmd.is_silent();
    init_tracing(silent);

    // Mutating commands never proceed unprivileged: re-launch elevated and
    // exit this process without doing any work.
    if cmd.requires_elevation() {
        let probe = SystemPrivilegeProbe::new(Box::new(ShellRunner));
        if !probe.is_elevated() {
            relaunch_elevated(&args[1..], silent);
            return;
        }
    }

    let config_dir = resolve_config_dir();
    let response = match Sys::new(&config_dir) {
        Ok(mut sys) => sys.execute(cmd),
        Err(e) => Response::Error {
            message: format!("Failed to initialize: {}", e),
        },
    };

    match response {
        Response::Ok { output } => {
            if !silent && !output.is_empty() {
                println!("{}", output);
            }
        }
        Response::Error { message } => {
            eprintln!("relpin error: {}", message);
            process::exit(1);
        }
    }
}

fn init_tracing(silent: bool) {
    let level = if silent {
        tracing_subscriber::filter::LevelFilter::ERROR
    } else {
        tracing_subscriber::filter::LevelFilter::INFO
    };
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_target(false)
        .init();
}

fn relaunch_elevated(args: &[String], silent: bool) {
    let exe = std::env::current_exe()
        .map(|p| p.display().to_string())
        .unwrap_or_else(|_| "relpin".into());
    let cmd = elevation::elevated_relaunch_command(&exe, args);
    match ShellRunner.run(&cmd) {
        Ok(_) => {
            if !silent {
                eprintln!("relpin: not elevated; re-launched with elevation");
            }
        }
        Err(e) => {
            eprintln!("relpin: elevation required and re-launch failed: {}", e);
            process::exit(1);
        }
    }
}

fn resolve_config_dir() -> PathBuf {
    if let Ok(dir) = std::env::var("RELPIN_CONFIG_DIR") {
        return PathBuf::from(dir);
    }
    if let Ok(dir) = std::env::var("ProgramData") {
        return PathBuf::from(dir).join("relpin");
    }
    let home = std::env::var("HOME").unwrap_or_else(|_| "/tmp".into());
    PathBuf::from(home).join(".config").join("relpin")
}
