use crate::apply::response::Response;

#[derive(Debug, thiserror::Error)]
pub enum ApplyError {
    #[error("invalid apply request: {0}")]
    InvalidRequest(String),
    #[error("invalid timeout `{value}`: {reason}")]
    InvalidTimeout { value: String, reason: String },
    #[error("refusing to apply: unsafe filepath \"{path}\"")]
    UnsafeUpload { path: String },
    #[error("cannot write {path}: {source}")]
    AuditWrite {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("cannot read {path}: {source}")]
    AuditRead {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("cannot encode response: {0}")]
    EncodeResponse(#[source] serde_json::Error),
    #[error("cannot decode response {path}: {source}")]
    DecodeResponse {
        path: String,
        #[source]
        source: serde_json::Error,
    },
    #[error("exec: \"{executable}\": {source}")]
    Spawn {
        executable: String,
        #[source]
        source: std::io::Error,
    },
    #[error("failed waiting for \"{executable}\": {source}")]
    Wait {
        executable: String,
        #[source]
        source: std::io::Error,
    },
    #[error("process canceled before completion")]
    Canceled,
    #[error("process timed out after {timeout_ms}ms")]
    TimedOut { timeout_ms: u64 },
    #[error("exit status {code}")]
    ProcessExit { code: i32 },
    #[error("process terminated by signal")]
    ProcessSignaled,
}

impl ApplyError {
    /// True when the external tool ran and reported failure on its own.
    pub fn is_process_exit(&self) -> bool {
        matches!(self, Self::ProcessExit { .. } | Self::ProcessSignaled)
    }

    /// True when the request was rejected before the tool could be started:
    /// a malformed request, an unsafe upload or an unwritable audit record.
    pub fn is_pre_execution(&self) -> bool {
        matches!(
            self,
            Self::InvalidRequest(_) | Self::UnsafeUpload { .. } | Self::AuditWrite { .. }
        )
    }
}

/// A failed apply. The response is always populated so callers can report
/// exit code, stderr and cmdline without consulting server-side logs.
#[derive(Debug, thiserror::Error)]
#[error("{error}")]
pub struct ApplyFailure {
    #[source]
    pub error: ApplyError,
    pub response: Box<Response>,
}

impl ApplyFailure {
    pub fn new(error: ApplyError, response: Response) -> Self {
        Self {
            error,
            response: Box::new(response),
        }
    }

    /// Rejections that happened before execution. Every other failure,
    /// spawn errors, cancellation and timeouts included, is an ordinary
    /// response with the error folded into stderr.
    pub fn is_pre_execution(&self) -> bool {
        self.error.is_pre_execution()
    }

    pub fn into_response(self) -> Response {
        *self.response
    }
}

pub(crate) fn audit_write_error(path: &std::path::Path, source: std::io::Error) -> ApplyError {
    ApplyError::AuditWrite {
        path: path.display().to_string(),
        source,
    }
}
