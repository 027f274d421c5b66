use crate::app::cli::{parse_options, CliOptions};
use crate::apply::{ApplyOrchestrator, AuditStore, CancelToken, Response};
use crate::config::{load_settings, Settings};
use crate::decoding::ApplyRequestBody;
use crate::version::client_version;
use std::io::Read;
use std::path::Path;

const LOCAL_REQUESTER: &str = "local";

pub fn cmd_apply(args: &[String], cancel: &CancelToken) -> Result<String, String> {
    let options = parse_options(args)?;
    let source = single_positional(&options, "apply <body.json|->")?;
    let raw = read_body(source)?;
    let settings = settings_for(&options)?;

    let body = ApplyRequestBody::from_slice(&raw).map_err(|err| format!("bad request: {err}"))?;
    let requester_ip = options.requester_ip.as_deref().unwrap_or(LOCAL_REQUESTER);
    let request = body
        .into_request(requester_ip, &raw, options.save_audit)
        .map_err(|err| err.to_string())?;

    let orchestrator = ApplyOrchestrator::new(settings);
    match orchestrator.apply(request, cancel) {
        Ok(response) => encode(&response),
        Err(failure) if failure.is_pre_execution() => {
            let body = encode(&failure.response)?;
            Err(format!("{}\n{body}", failure.error))
        }
        Err(failure) => encode(&failure.response),
    }
}

pub fn cmd_version(args: &[String], cancel: &CancelToken) -> Result<String, String> {
    let options = parse_options(args)?;
    let settings = settings_for(&options)?;
    let output = client_version(&settings, cancel)
        .map_err(|err| format!("cannot show version: {err}"))?;
    Ok(String::from_utf8_lossy(&output).trim_end().to_string())
}

pub fn cmd_show(args: &[String]) -> Result<String, String> {
    let options = parse_options(args)?;
    let dir = single_positional(&options, "show <audit-dir>")?;
    let response = AuditStore
        .load_response(Path::new(dir))
        .map_err(|err| err.to_string())?;
    encode(&response)
}

fn settings_for(options: &CliOptions) -> Result<Settings, String> {
    load_settings(options.config.as_deref()).map_err(|err| err.to_string())
}

fn single_positional<'a>(options: &'a CliOptions, usage: &str) -> Result<&'a str, String> {
    match options.positional.as_slice() {
        [value] => Ok(value.as_str()),
        _ => Err(format!("usage: kubeapply {usage}")),
    }
}

fn read_body(source: &str) -> Result<Vec<u8>, String> {
    if source == "-" {
        let mut raw = Vec::new();
        std::io::stdin()
            .read_to_end(&mut raw)
            .map_err(|err| format!("failed to read request body from stdin: {err}"))?;
        return Ok(raw);
    }
    std::fs::read(source).map_err(|err| format!("failed to read request body {source}: {err}"))
}

fn encode(response: &Response) -> Result<String, String> {
    serde_json::to_string_pretty(response).map_err(|err| format!("cannot encode response: {err}"))
}
