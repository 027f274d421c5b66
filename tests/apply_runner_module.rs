use kubeapply::apply::{run_process, ApplyError, CancelToken, RunSpec};
use std::fs;
use std::os::unix::fs::PermissionsExt;
use std::path::Path;
use std::thread;
use std::time::{Duration, Instant};
use tempfile::tempdir;

fn write_script(path: &Path, body: &str) {
    fs::write(path, body).expect("write script");
    let mut perms = fs::metadata(path).expect("metadata").permissions();
    perms.set_mode(0o755);
    fs::set_permissions(path, perms).expect("chmod");
}

fn spec(executable: &Path, args: &[&str]) -> RunSpec {
    RunSpec {
        executable: executable.display().to_string(),
        args: args.iter().map(|arg| arg.to_string()).collect(),
        cwd: None,
        timeout: None,
    }
}

#[test]
fn runner_module_captures_stdout_and_stderr_separately() {
    let dir = tempdir().expect("tempdir");
    let bin = dir.path().join("tool");
    write_script(&bin, "#!/bin/sh\necho \"out $1\"\necho 'err' 1>&2\n");

    let outcome = run_process(&spec(&bin, &["apply"]), &CancelToken::new());
    assert!(outcome.success());
    assert_eq!(outcome.exit_code, 0);
    assert_eq!(outcome.stdout, b"out apply\n");
    assert_eq!(outcome.stderr, b"err\n");
}

#[test]
fn runner_module_reports_real_exit_code() {
    let dir = tempdir().expect("tempdir");
    let bin = dir.path().join("tool-fail");
    write_script(&bin, "#!/bin/sh\necho 'unknown command' 1>&2\nexit 2\n");

    let outcome = run_process(&spec(&bin, &[]), &CancelToken::new());
    assert_eq!(outcome.exit_code, 2);
    assert_eq!(outcome.stderr, b"unknown command\n");
    match outcome.error {
        Some(ApplyError::ProcessExit { code }) => assert_eq!(code, 2),
        other => panic!("unexpected error: {other:?}"),
    }
}

#[test]
fn runner_module_missing_binary_is_spawn_error() {
    let dir = tempdir().expect("tempdir");
    let outcome = run_process(
        &spec(&dir.path().join("does-not-exist"), &[]),
        &CancelToken::new(),
    );
    assert_eq!(outcome.exit_code, -1);
    assert!(outcome.stdout.is_empty());
    match outcome.error {
        Some(ApplyError::Spawn { executable, .. }) => {
            assert!(executable.ends_with("does-not-exist"))
        }
        other => panic!("unexpected error: {other:?}"),
    }
}

#[test]
fn runner_module_sets_working_directory() {
    let dir = tempdir().expect("tempdir");
    let bin = dir.path().join("tool-pwd");
    write_script(&bin, "#!/bin/sh\nls\n");
    let work = dir.path().join("work");
    fs::create_dir_all(&work).expect("mkdir");
    fs::write(work.join("marker.yaml"), "a: b\n").expect("write marker");

    let mut run = spec(&bin, &[]);
    run.cwd = Some(work);
    let outcome = run_process(&run, &CancelToken::new());
    assert!(outcome.success());
    assert_eq!(outcome.stdout, b"marker.yaml\n");
}

#[test]
fn runner_module_canceled_token_never_spawns() {
    let dir = tempdir().expect("tempdir");
    let marker = dir.path().join("ran");
    let bin = dir.path().join("tool-touch");
    write_script(&bin, &format!("#!/bin/sh\ntouch {}\n", marker.display()));

    let cancel = CancelToken::new();
    cancel.cancel();
    let outcome = run_process(&spec(&bin, &[]), &cancel);
    assert_eq!(outcome.exit_code, -1);
    assert!(matches!(outcome.error, Some(ApplyError::Canceled)));
    assert!(!marker.exists());
}

#[test]
fn runner_module_cancellation_terminates_running_process() {
    let dir = tempdir().expect("tempdir");
    let bin = dir.path().join("tool-slow");
    write_script(&bin, "#!/bin/sh\nexec sleep 10\n");

    let cancel = CancelToken::new();
    let trigger = cancel.clone();
    let canceller = thread::spawn(move || {
        thread::sleep(Duration::from_millis(100));
        trigger.cancel();
    });

    let start = Instant::now();
    let outcome = run_process(&spec(&bin, &[]), &cancel);
    canceller.join().expect("join canceller");

    assert!(start.elapsed() < Duration::from_secs(5));
    assert_eq!(outcome.exit_code, -1);
    assert!(matches!(outcome.error, Some(ApplyError::Canceled)));
}

#[test]
fn runner_module_timeout_is_explicit() {
    let dir = tempdir().expect("tempdir");
    let bin = dir.path().join("tool-timeout");
    write_script(&bin, "#!/bin/sh\nexec sleep 10\n");

    let mut run = spec(&bin, &[]);
    run.timeout = Some(Duration::from_millis(100));
    let start = Instant::now();
    let outcome = run_process(&run, &CancelToken::new());

    assert!(start.elapsed() < Duration::from_secs(5));
    assert_eq!(outcome.exit_code, -1);
    match outcome.error {
        Some(ApplyError::TimedOut { timeout_ms }) => assert_eq!(timeout_ms, 100),
        other => panic!("unexpected error: {other:?}"),
    }
}
