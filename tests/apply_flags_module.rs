use kubeapply::apply::{build_command_line, ApplyError, Flags};
use std::time::Duration;

fn args_for(flags: &[(&str, &str)], files: &[&str]) -> Vec<String> {
    let flags = flags.iter().copied().collect::<Flags>();
    build_command_line("kubectl", "apply", &flags, files.iter().copied()).args
}

#[test]
fn flags_module_sorts_keys() {
    let flags = [
        ("b", ""),
        ("a", ""),
        ("-x", ""),
        ("c", ""),
        ("--z", ""),
        ("d", ""),
    ]
    .into_iter()
    .collect::<Flags>();
    assert_eq!(flags.keys(), vec!["--z", "-x", "a", "b", "c", "d"]);
}

#[test]
fn flags_module_parses_timeout_accessor() {
    let flags = [("timeout", "3m"), ("a", "none")].into_iter().collect::<Flags>();
    assert_eq!(
        flags.timeout().expect("valid timeout"),
        Some(Duration::from_secs(180))
    );

    assert_eq!(Flags::new().timeout().expect("no timeout"), None);

    let flags = [("timeout", "invalid")].into_iter().collect::<Flags>();
    match flags.timeout() {
        Err(ApplyError::InvalidTimeout { value, .. }) => assert_eq!(value, "invalid"),
        other => panic!("unexpected result: {other:?}"),
    }
}

#[test]
fn malformed_timeout_does_not_affect_command_building() {
    assert_eq!(
        args_for(&[("timeout", "soon")], &[]),
        vec!["apply", "--timeout=soon", "--output=json"]
    );
}

#[test]
fn basic_command_forces_json_output() {
    let command = build_command_line("kubectl", "apply", &Flags::new(), Vec::<&str>::new());
    assert_eq!(command.executable, "kubectl");
    assert_eq!(command.args, vec!["apply", "--output=json"]);
    assert_eq!(command.cmdline(), "kubectl apply --output=json");
}

#[test]
fn single_letter_flag_with_value() {
    assert_eq!(
        args_for(&[("f", "file.yaml")], &[]),
        vec!["apply", "-f=file.yaml", "--output=json"]
    );
}

#[test]
fn boolean_flag_has_no_value_suffix() {
    assert_eq!(
        args_for(&[("--force", "")], &[]),
        vec!["apply", "--force", "--output=json"]
    );
}

#[test]
fn order_of_insertion_does_not_matter() {
    let expected = vec![
        "apply",
        "--force",
        "-f=file.yaml",
        "--timeout=1m",
        "--output=json",
    ];
    assert_eq!(
        args_for(&[("timeout", "1m"), ("--force", ""), ("-f", "file.yaml")], &[]),
        expected
    );
    assert_eq!(
        args_for(&[("-f", "file.yaml"), ("timeout", "1m"), ("--force", "")], &[]),
        expected
    );
    assert_eq!(
        args_for(&[("--force", ""), ("-f", "file.yaml"), ("timeout", "1m")], &[]),
        expected
    );
}

#[test]
fn key_with_embedded_equals_is_an_opaque_boolean_flag() {
    assert_eq!(
        args_for(&[("timeout=1m", ""), ("--force", ""), ("-f", "file.yaml")], &[]),
        vec![
            "apply",
            "--force",
            "-f=file.yaml",
            "--timeout=1m",
            "--output=json"
        ]
    );
    assert_eq!(
        args_for(&[("odd=key", "v")], &[]),
        vec!["apply", "--odd=key=v", "--output=json"]
    );
}

#[test]
fn explicit_output_flag_suppresses_default() {
    assert_eq!(
        args_for(&[("o", "yaml")], &[]),
        vec!["apply", "-o=yaml"]
    );
    assert_eq!(
        args_for(&[("output", "name")], &[]),
        vec!["apply", "--output=name"]
    );
    assert_eq!(
        args_for(&[("--output", "wide")], &[]),
        vec!["apply", "--output=wide"]
    );
}

#[test]
fn configuration_uploads_add_recursive_filename() {
    assert_eq!(
        args_for(&[], &["deploy/app.yaml", "notes.txt"]),
        vec!["apply", "--filename=./", "--recursive", "--output=json"]
    );
    assert_eq!(
        args_for(&[("prune", "")], &["svc.json"]),
        vec![
            "apply",
            "--prune",
            "--filename=./",
            "--recursive",
            "--output=json"
        ]
    );
}

#[test]
fn explicit_filename_flag_suppresses_default() {
    assert_eq!(
        args_for(&[("f", "app.yaml")], &["app.yaml"]),
        vec!["apply", "-f=app.yaml", "--output=json"]
    );
    assert_eq!(
        args_for(&[("filename", "dir/")], &["dir/app.yml"]),
        vec!["apply", "--filename=dir/", "--output=json"]
    );
}

#[test]
fn uploads_without_configuration_extension_are_not_passed() {
    assert_eq!(
        args_for(&[], &["README", "kustomization"]),
        vec!["apply", "--output=json"]
    );
}
