pub mod file_value;
pub mod flag_value;

pub use file_value::FileValue;
pub use flag_value::FlagValue;

use crate::apply::{ApplyError, ApplyRequest};
use serde::Deserialize;
use std::collections::BTreeMap;

/// JSON body of an apply call.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct ApplyRequestBody {
    #[serde(default)]
    pub command: String,
    #[serde(default)]
    pub files: BTreeMap<String, FileValue>,
    #[serde(default)]
    pub flags: BTreeMap<String, FlagValue>,
}

impl ApplyRequestBody {
    pub fn from_slice(raw: &[u8]) -> Result<Self, serde_json::Error> {
        serde_json::from_slice(raw)
    }

    pub fn into_request(
        self,
        requester_ip: &str,
        raw_request: &[u8],
        save_audit: bool,
    ) -> Result<ApplyRequest, ApplyError> {
        ApplyRequest::builder()
            .subcommand(self.command)
            .flags(
                self.flags
                    .into_iter()
                    .map(|(key, value)| (key, value.into_string())),
            )
            .files(
                self.files
                    .into_iter()
                    .map(|(path, value)| (path, value.into_bytes())),
            )
            .requester_ip(requester_ip)
            .raw_request(raw_request)
            .save_audit(save_audit)
            .build()
    }
}

/// Host part of a `host:port` remote address; anything unparseable is
/// returned unchanged.
pub fn filter_ip(remote_addr: &str) -> String {
    if let Some(rest) = remote_addr.strip_prefix('[') {
        return match rest.split_once("]:") {
            Some((host, port)) if !port.contains(':') => host.to_string(),
            _ => remote_addr.to_string(),
        };
    }
    match remote_addr.split_once(':') {
        Some((host, port)) if !port.contains(':') => host.to_string(),
        _ => remote_addr.to_string(),
    }
}
