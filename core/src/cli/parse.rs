use crate::command::Command;

/// Parse CLI arguments into a typed Command enum.
///
/// Arguments are expected WITHOUT the program name (i.e., `args` should be
/// `["apply", "--silent"]`, not `["relpin", "apply", "--silent"]`).
pub fn parse_args(args: &[&str]) -> Result<Command, String> {
    if args.is_empty() {
        return Err("No command specified. Run 'relpin help' for usage.".into());
    }

    match args[0] {
        "apply" => parse_silent(args, |silent| Command::Apply { silent }),
        "check" => parse_silent(args, |silent| Command::Check { silent }),
        "bootstrap" => parse_silent(args, |silent| Command::Bootstrap { silent }),
        "status" => parse_status(args),
        "help" => parse_help(args),
        _ => Err(format!("Unknown command: '{}'", args[0])),
    }
}

// ---------------------------------------------------------------------------
// Sub-parsers
// ---------------------------------------------------------------------------

/// `relpin <apply|check|bootstrap> [--silent]`
fn parse_silent(args: &[&str], build: impl Fn(bool) -> Command) -> Result<Command, String> {
    let mut silent = false;
    for flag in &args[1..] {
        match *flag {
            "--silent" => silent = true,
            other => {
                return Err(format!("Unknown flag for {}: '{}'", args[0], other));
            }
        }
    }
    Ok(build(silent))
}

/// `relpin status [--format <fmt>]`
fn parse_status(args: &[&str]) -> Result<Command, String> {
    let mut format = None;
    let rest = &args[1..];
    let mut i = 0;
    while i < rest.len() {
        match rest[i] {
            "--format" => {
                i += 1;
                format = Some(take_arg(rest, i, "--format")?);
            }
            other => return Err(format!("Unknown flag for status: '{}'", other)),
        }
        i += 1;
    }
    Ok(Command::Status { format })
}

/// `relpin help [topic]`
fn parse_help(args: &[&str]) -> Result<Command, String> {
    let topic = if args.len() > 1 {
        Some(args[1..].join(" "))
    } else {
        None
    };
    Ok(Command::Help { topic })
}

/// Fetch the value following a flag, or error out.
fn take_arg(args: &[&str], index: usize, flag: &str) -> Result<String, String> {
    args.get(index)
        .map(|s| s.to_string())
        .ok_or_else(|| format!("Missing value for {}", flag))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_args_error() {
        assert!(parse_args(&[]).is_err());
    }

    #[test]
    fn unknown_command_error() {
        let err = parse_args(&["frobnicate"]).unwrap_err();
        assert!(err.contains("frobnicate"));
    }

    #[test]
    fn apply_plain() {
        assert_eq!(parse_args(&["apply"]).unwrap(), Command::Apply { silent: false });
    }

    #[test]
    fn apply_silent() {
        assert_eq!(
            parse_args(&["apply", "--silent"]).unwrap(),
            Command::Apply { silent: true }
        );
    }

    #[test]
    fn check_silent() {
        assert_eq!(
            parse_args(&["check", "--silent"]).unwrap(),
            Command::Check { silent: true }
        );
    }

    #[test]
    fn bootstrap_plain() {
        assert_eq!(
            parse_args(&["bootstrap"]).unwrap(),
            Command::Bootstrap { silent: false }
        );
    }

    #[test]
    fn unknown_flag_rejected() {
        assert!(parse_args(&["apply", "--force"]).is_err());
        assert!(parse_args(&["check", "-s"]).is_err());
    }

    #[test]
    fn status_plain() {
        assert_eq!(parse_args(&["status"]).unwrap(), Command::Status { format: None });
    }

    #[test]
    fn status_json() {
        assert_eq!(
            parse_args(&["status", "--format", "json"]).unwrap(),
            Command::Status { format: Some("json".into()) }
        );
    }

    #[test]
    fn status_format_missing_value() {
        assert!(parse_args(&["status", "--format"]).is_err());
    }

    #[test]
    fn help_plain_and_topic() {
        assert_eq!(parse_args(&["help"]).unwrap(), Command::Help { topic: None });
        assert_eq!(
            parse_args(&["help", "check"]).unwrap(),
            Command::Help { topic: Some("check".into()) }
        );
    }
}
