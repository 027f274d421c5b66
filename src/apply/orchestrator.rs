use crate::apply::audit_store::AuditStore;
use crate::apply::flags::build_command_line;
use crate::apply::request::{ApplyIdentity, ApplyRequest, PreparedApply};
use crate::apply::response::{CommandOutput, Response};
use crate::apply::runner::{run_process, CancelToken, ProcessOutcome, RunSpec};
use crate::apply::uploads::UploadValidator;
use crate::apply::{ApplyError, ApplyFailure};
use crate::config::Settings;
use crate::shared::RuntimeLog;

/// Sequences a single apply: validate, write the audit record, run the
/// tool, persist the response.
#[derive(Debug, Clone)]
pub struct ApplyOrchestrator {
    settings: Settings,
    validator: UploadValidator,
    store: AuditStore,
    log: RuntimeLog,
}

impl ApplyOrchestrator {
    pub fn new(settings: Settings) -> Self {
        let log = RuntimeLog::new(settings.state_paths().log_path());
        Self {
            settings,
            validator: UploadValidator::default(),
            store: AuditStore,
            log,
        }
    }

    pub fn with_log(mut self, log: RuntimeLog) -> Self {
        self.log = log;
        self
    }

    pub fn with_validator(mut self, validator: UploadValidator) -> Self {
        self.validator = validator;
        self
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    /// Assigns identity and resolves the command line.
    pub fn prepare(&self, request: ApplyRequest) -> PreparedApply {
        let identity = ApplyIdentity::generate(&self.settings.state_paths().configurations_dir());
        self.prepare_with_identity(request, identity)
    }

    pub fn prepare_with_identity(
        &self,
        mut request: ApplyRequest,
        identity: ApplyIdentity,
    ) -> PreparedApply {
        if request.subcommand.is_empty() {
            request.subcommand = self.settings.default_subcommand.clone();
        }
        request.save_audit &= self.settings.save_audit;
        let command = build_command_line(
            &self.settings.executable,
            &request.subcommand,
            &request.flags,
            request.filenames(),
        );
        PreparedApply {
            request,
            identity,
            command,
        }
    }

    pub fn apply(
        &self,
        request: ApplyRequest,
        cancel: &CancelToken,
    ) -> Result<Response, ApplyFailure> {
        let prepared = self.prepare(request);
        self.run(&prepared, cancel)
    }

    pub fn run(
        &self,
        prepared: &PreparedApply,
        cancel: &CancelToken,
    ) -> Result<Response, ApplyFailure> {
        let id = prepared.identity.id.as_str();
        let stateful = prepared.is_stateful();
        self.log.info(
            "apply.started",
            &format!(
                "id={id} ip={} stateful={stateful} cmdline={}",
                prepared.request.requester_ip,
                prepared.command.cmdline()
            ),
        );

        if stateful {
            if let Err(error) = self.materialize(prepared) {
                self.log
                    .error("apply.audit.failed", &format!("id={id} error={error}"));
                let response = Response::aborted(id, &error);
                return Err(ApplyFailure::new(error, response));
            }
        }

        let spec = RunSpec {
            executable: prepared.command.executable.clone(),
            args: prepared.command.args.clone(),
            cwd: stateful.then(|| prepared.identity.audit_dir.clone()),
            timeout: self.settings.exec_timeout(),
        };
        let outcome = run_process(&spec, cancel);
        let (response, error) = build_response(prepared, stateful, outcome);

        if stateful {
            if let Err(save_error) = self
                .store
                .save_response(&prepared.identity.audit_dir, &response)
            {
                self.log.warn(
                    "apply.response.save_failed",
                    &format!("cannot save response for request {id}: {save_error}"),
                );
            }
        }

        self.log.info(
            "apply.finished",
            &format!("id={id} exit_code={}", response.exit_code),
        );

        match error {
            None => Ok(response),
            Some(error) => Err(ApplyFailure::new(error, response)),
        }
    }

    fn materialize(&self, prepared: &PreparedApply) -> Result<(), ApplyError> {
        self.validator.validate(&prepared.request.files)?;
        self.store.materialize(prepared)
    }
}

fn build_response(
    prepared: &PreparedApply,
    stateful: bool,
    outcome: ProcessOutcome,
) -> (Response, Option<ApplyError>) {
    let mut response = Response {
        id: prepared.identity.id.clone(),
        cmd: prepared.command.executable.clone(),
        args: prepared.command.args.clone(),
        cmdline: prepared.command.cmdline(),
        stderr: String::from_utf8_lossy(&outcome.stderr).into_owned(),
        stdout: CommandOutput::from_text(String::from_utf8_lossy(&outcome.stdout)),
        exit_code: outcome.exit_code,
        dir: stateful.then(|| prepared.identity.audit_dir.clone()),
    };

    if let Some(error) = &outcome.error {
        response.embed_error(error);
    }

    (response, outcome.error)
}
