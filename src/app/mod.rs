pub mod cli;
pub mod commands;
pub mod signals;

use crate::apply::CancelToken;
use cli::{help_text, parse_cli_verb, CliVerb};

pub fn run_cli(args: Vec<String>) -> Result<String, String> {
    run_cli_with_cancel(args, &CancelToken::new())
}

/// Dispatches a CLI invocation. Commands that start the external tool stop
/// it once `cancel` fires.
pub fn run_cli_with_cancel(args: Vec<String>, cancel: &CancelToken) -> Result<String, String> {
    if args.is_empty() {
        return Ok(help_text());
    }

    match parse_cli_verb(args[0].as_str()) {
        CliVerb::Apply => commands::cmd_apply(&args[1..], cancel),
        CliVerb::Version => commands::cmd_version(&args[1..], cancel),
        CliVerb::Show => commands::cmd_show(&args[1..]),
        CliVerb::Help => Ok(help_text()),
        CliVerb::Unknown => Err(format!("unknown command `{}`", args[0])),
    }
}
