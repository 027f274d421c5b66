pub mod audit_store;
pub mod error;
pub mod flags;
pub mod orchestrator;
pub mod request;
pub mod response;
pub mod runner;
pub mod uploads;

pub use audit_store::AuditStore;
pub use error::{ApplyError, ApplyFailure};
pub use flags::{build_command_line, normalize_flag, CommandLine, Flags};
pub use orchestrator::ApplyOrchestrator;
pub use request::{ApplyIdentity, ApplyRequest, ApplyRequestBuilder, PreparedApply};
pub use response::{CommandOutput, Response};
pub use runner::{run_process, CancelToken, ProcessOutcome, RunSpec};
pub use uploads::{UploadValidator, RESERVED_AUDIT_FILENAMES};
