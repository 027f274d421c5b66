use crate::apply::error::audit_write_error;
use crate::apply::request::PreparedApply;
use crate::apply::response::Response;
use crate::apply::ApplyError;
use std::fs;
use std::io::Write;
use std::path::Path;

pub const DESCRIPTION_FILE: &str = "description";
pub const REQUEST_FILE: &str = "request";
pub const RESPONSE_FILE: &str = "response";

#[cfg(unix)]
const FILE_MODE: u32 = 0o644;
#[cfg(unix)]
const DIR_MODE: u32 = 0o755;

const DESCRIPTION_DATE_FORMAT: &str = "%a %b %d %H:%M:%S %z %Y";

/// Writes the per-request audit record. Records are never rewritten or
/// removed here.
#[derive(Debug, Clone, Copy, Default)]
pub struct AuditStore;

impl AuditStore {
    /// Writes everything that must exist before the tool runs: the
    /// directory, `description`, each uploaded file, then `request`.
    pub fn materialize(&self, prepared: &PreparedApply) -> Result<(), ApplyError> {
        let dir = &prepared.identity.audit_dir;
        create_dir_all(dir)?;

        write_file(&dir.join(DESCRIPTION_FILE), describe(prepared).as_bytes())?;

        for (name, content) in &prepared.request.files {
            let path = dir.join(name);
            if let Some(parent) = path.parent() {
                create_dir_all(parent)?;
            }
            write_file(&path, content)?;
        }

        write_file(&dir.join(REQUEST_FILE), &prepared.request.raw_request)
    }

    pub fn save_response(&self, dir: &Path, response: &Response) -> Result<(), ApplyError> {
        let body = response.to_pretty_json()?;
        write_file(&dir.join(RESPONSE_FILE), &body)
    }

    pub fn load_response(&self, dir: &Path) -> Result<Response, ApplyError> {
        let path = dir.join(RESPONSE_FILE);
        let raw = fs::read(&path).map_err(|source| ApplyError::AuditRead {
            path: path.display().to_string(),
            source,
        })?;
        serde_json::from_slice(&raw).map_err(|source| ApplyError::DecodeResponse {
            path: path.display().to_string(),
            source,
        })
    }
}

pub fn describe(prepared: &PreparedApply) -> String {
    let files = prepared.request.filenames().collect::<Vec<_>>();
    format!(
        "ID: {}\nDate: {}\nIP: {}\n\nCommand:\n{} {}\n\nList of files:\n{}\n",
        prepared.identity.id,
        prepared.identity.timestamp.format(DESCRIPTION_DATE_FORMAT),
        prepared.request.requester_ip,
        prepared.command.executable,
        prepared.command.args.join(" "),
        files.join("\n"),
    )
}

fn create_dir_all(path: &Path) -> Result<(), ApplyError> {
    let mut builder = fs::DirBuilder::new();
    builder.recursive(true);
    #[cfg(unix)]
    {
        use std::os::unix::fs::DirBuilderExt;
        builder.mode(DIR_MODE);
    }
    builder
        .create(path)
        .map_err(|source| audit_write_error(path, source))
}

fn write_file(path: &Path, content: &[u8]) -> Result<(), ApplyError> {
    let mut options = fs::OpenOptions::new();
    options.write(true).create(true).truncate(true);
    #[cfg(unix)]
    {
        use std::os::unix::fs::OpenOptionsExt;
        options.mode(FILE_MODE);
    }
    let mut file = options
        .open(path)
        .map_err(|source| audit_write_error(path, source))?;
    file.write_all(content)
        .map_err(|source| audit_write_error(path, source))
}
