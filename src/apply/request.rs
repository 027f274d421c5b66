use crate::apply::flags::{CommandLine, Flags};
use crate::apply::ApplyError;
use chrono::{DateTime, Utc};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

/// An apply invocation as received from the transport layer. Immutable once
/// built.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApplyRequest {
    pub subcommand: String,
    pub flags: Flags,
    pub files: BTreeMap<String, Vec<u8>>,
    pub requester_ip: String,
    pub raw_request: Vec<u8>,
    pub save_audit: bool,
}

impl ApplyRequest {
    pub fn builder() -> ApplyRequestBuilder {
        ApplyRequestBuilder::default()
    }

    pub fn filenames(&self) -> impl Iterator<Item = &str> {
        self.files.keys().map(String::as_str)
    }
}

#[derive(Debug, Clone)]
pub struct ApplyRequestBuilder {
    subcommand: String,
    flags: Vec<(String, String)>,
    files: Vec<(String, Vec<u8>)>,
    requester_ip: String,
    raw_request: Vec<u8>,
    save_audit: bool,
}

impl Default for ApplyRequestBuilder {
    fn default() -> Self {
        Self {
            subcommand: String::new(),
            flags: Vec::new(),
            files: Vec::new(),
            requester_ip: String::new(),
            raw_request: Vec::new(),
            save_audit: true,
        }
    }
}

impl ApplyRequestBuilder {
    /// An empty subcommand falls back to the configured default.
    pub fn subcommand(mut self, subcommand: impl Into<String>) -> Self {
        self.subcommand = subcommand.into();
        self
    }

    pub fn flag(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.flags.push((key.into(), value.into()));
        self
    }

    pub fn flags<K, V>(mut self, flags: impl IntoIterator<Item = (K, V)>) -> Self
    where
        K: Into<String>,
        V: Into<String>,
    {
        self.flags
            .extend(flags.into_iter().map(|(k, v)| (k.into(), v.into())));
        self
    }

    pub fn file(mut self, path: impl Into<String>, content: impl Into<Vec<u8>>) -> Self {
        self.files.push((path.into(), content.into()));
        self
    }

    pub fn files<P, C>(mut self, files: impl IntoIterator<Item = (P, C)>) -> Self
    where
        P: Into<String>,
        C: Into<Vec<u8>>,
    {
        self.files
            .extend(files.into_iter().map(|(p, c)| (p.into(), c.into())));
        self
    }

    pub fn requester_ip(mut self, ip: impl Into<String>) -> Self {
        self.requester_ip = ip.into();
        self
    }

    pub fn raw_request(mut self, raw: impl Into<Vec<u8>>) -> Self {
        self.raw_request = raw.into();
        self
    }

    /// Disables the audit trail for this call only.
    pub fn save_audit(mut self, enabled: bool) -> Self {
        self.save_audit = enabled;
        self
    }

    pub fn build(self) -> Result<ApplyRequest, ApplyError> {
        if self.flags.iter().any(|(key, _)| key.is_empty()) {
            return Err(ApplyError::InvalidRequest(
                "flag names must be non-empty".to_string(),
            ));
        }
        if self.files.iter().any(|(path, _)| path.is_empty()) {
            return Err(ApplyError::InvalidRequest(
                "file names must be non-empty".to_string(),
            ));
        }

        Ok(ApplyRequest {
            subcommand: self.subcommand,
            flags: self.flags.into_iter().collect(),
            files: self.files.into_iter().collect(),
            requester_ip: self.requester_ip,
            raw_request: self.raw_request,
            save_audit: self.save_audit,
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApplyIdentity {
    pub id: String,
    pub timestamp: DateTime<Utc>,
    pub audit_dir: PathBuf,
}

impl ApplyIdentity {
    pub fn generate(configurations_root: &Path) -> Self {
        Self::new(
            uuid::Uuid::new_v4().to_string(),
            Utc::now(),
            configurations_root,
        )
    }

    pub fn new(id: impl Into<String>, timestamp: DateTime<Utc>, configurations_root: &Path) -> Self {
        let id = id.into();
        let audit_dir = audit_dir_for(configurations_root, &id, timestamp);
        Self {
            id,
            timestamp,
            audit_dir,
        }
    }
}

/// `<root>/<YYYY-MM-DD>/<unix seconds>-<id>`
pub fn audit_dir_for(configurations_root: &Path, id: &str, timestamp: DateTime<Utc>) -> PathBuf {
    configurations_root
        .join(timestamp.format("%Y-%m-%d").to_string())
        .join(format!("{}-{}", timestamp.timestamp(), id))
}

/// A request with its identity and command line resolved. Built once by the
/// orchestrator and only read afterwards.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PreparedApply {
    pub request: ApplyRequest,
    pub identity: ApplyIdentity,
    pub command: CommandLine,
}

impl PreparedApply {
    /// Stateful requests get an audit directory and run inside it.
    pub fn is_stateful(&self) -> bool {
        self.request.save_audit
            && !self.command.args.is_empty()
            && !self.request.files.is_empty()
            && !self.command.has_help_flag()
    }
}
