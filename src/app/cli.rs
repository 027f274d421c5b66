use std::path::PathBuf;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CliVerb {
    Apply,
    Version,
    Show,
    Help,
    Unknown,
}

pub fn parse_cli_verb(input: &str) -> CliVerb {
    match input {
        "apply" => CliVerb::Apply,
        "version" => CliVerb::Version,
        "show" => CliVerb::Show,
        "help" | "--help" | "-h" => CliVerb::Help,
        _ => CliVerb::Unknown,
    }
}

pub fn help_text() -> String {
    [
        "Usage: kubeapply <command> [options]",
        "",
        "Commands:",
        "  apply [options] <body.json|->       Run an apply request body and print the response",
        "  version [--config PATH]             Print the client version of the configured tool",
        "  show <audit-dir>                    Print the response saved in an audit directory",
        "  help                                Show this help",
        "",
        "Apply options:",
        "  --config PATH                       Settings file (default: $KUBEAPPLY_CONFIG or ~/.kubeapply/config.yaml)",
        "  --ip IP                             Requester address recorded in the audit trail",
        "  --no-save                           Do not write an audit directory for this call",
    ]
    .join("\n")
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CliOptions {
    pub config: Option<PathBuf>,
    pub requester_ip: Option<String>,
    pub save_audit: bool,
    pub positional: Vec<String>,
}

pub fn parse_options(args: &[String]) -> Result<CliOptions, String> {
    let mut options = CliOptions {
        save_audit: true,
        ..CliOptions::default()
    };
    let mut iter = args.iter();
    while let Some(arg) = iter.next() {
        match arg.as_str() {
            "--config" => {
                let value = iter.next().ok_or("`--config` requires a path")?;
                options.config = Some(PathBuf::from(value));
            }
            "--ip" => {
                let value = iter.next().ok_or("`--ip` requires an address")?;
                options.requester_ip = Some(value.clone());
            }
            "--no-save" => options.save_audit = false,
            other if other.starts_with("--") => {
                return Err(format!("unknown option `{other}`"));
            }
            _ => options.positional.push(arg.clone()),
        }
    }
    Ok(options)
}
