use crate::apply::{run_process, ApplyError, CancelToken, RunSpec};
use crate::config::Settings;

pub const VERSION_ARGS: [&str; 3] = ["version", "--client", "--output=json"];

/// Client version report of the configured executable, passed through as
/// the tool printed it: stdout followed by any stderr.
pub fn client_version(settings: &Settings, cancel: &CancelToken) -> Result<Vec<u8>, ApplyError> {
    let spec = RunSpec {
        executable: settings.executable.clone(),
        args: VERSION_ARGS.iter().map(|arg| arg.to_string()).collect(),
        cwd: None,
        timeout: settings.exec_timeout(),
    };
    let outcome = run_process(&spec, cancel);
    match outcome.error {
        None => {
            let mut combined = outcome.stdout;
            combined.extend_from_slice(&outcome.stderr);
            Ok(combined)
        }
        Some(error) => Err(error),
    }
}
