#![cfg(unix)]

use std::time::{Duration, Instant};

use classforge_codegen::{
    CancelToken, ClassBuilder, CompileError, MemberSpec, ProcessBackend, Severity,
};
use classforge_ir::TypeRef;
use classforge_manifest::BackendConfig;

fn shell(script: &str) -> BackendConfig {
    BackendConfig::new("sh").arg("-c").arg(script)
}

#[test]
fn copies_source_into_output() {
    let backend = ProcessBackend::new(
        shell(r#"cp "$0" "$1""#)
            .arg("{source}")
            .arg("{output}"),
    );
    let mut builder = ClassBuilder::new("Generated", &backend);
    builder.add_field(&MemberSpec::new("health", "System.Int32"));

    let assembly = builder.compile().unwrap();

    assert_eq!(assembly.type_name, "Generated");
    assert_eq!(
        String::from_utf8_lossy(&assembly.image),
        builder.render().unwrap()
    );
}

#[test]
fn reference_argument_repeats_per_type() {
    let backend = ProcessBackend::new(
        shell(r#"printf '%s\n' "$@" > "$0""#)
            .arg("{output}")
            .arg("-r:{reference}"),
    );
    let mut builder = ClassBuilder::new("Generated", &backend);
    builder
        .add_base_type(TypeRef::class("Base"))
        .unwrap()
        .add_field(&MemberSpec::new("health", "System.Int32"));

    let assembly = builder.compile().unwrap();

    assert_eq!(
        String::from_utf8_lossy(&assembly.image),
        "-r:Base\n-r:System.Int32\n"
    );
}

#[test]
fn failing_compiler_reports_diagnostics() {
    let backend = ProcessBackend::new(shell(
        "echo \"Generated.cs(3,5): error CS0246: The type 'Foo' could not be found\"; exit 1",
    ));
    let mut builder = ClassBuilder::new("Generated", &backend);
    builder.add_field(&MemberSpec::new("a", "Foo"));

    let err = builder.compile().unwrap_err();

    let diags = err.diagnostics();
    assert_eq!(diags.len(), 1);
    assert_eq!(diags[0].severity, Severity::Error);
    assert_eq!(diags[0].location.as_deref(), Some("Generated.cs(3,5)"));
    assert_eq!(builder.cached_artifacts(), 0);
}

#[test]
fn non_utf8_output_keeps_diagnostics() {
    let backend = ProcessBackend::new(shell(
        r"printf 'Generated.cs(3,5): error CS0246: type \351 not found\n'; exit 1",
    ));
    let mut builder = ClassBuilder::new("Generated", &backend);

    let err = builder.compile().unwrap_err();

    let diags = err.diagnostics();
    assert_eq!(diags.len(), 1);
    assert_eq!(diags[0].location.as_deref(), Some("Generated.cs(3,5)"));
    assert_eq!(diags[0].message, "CS0246: type \u{fffd} not found");
}

#[test]
fn type_name_cannot_leave_work_directory() {
    let backend = ProcessBackend::new(shell(r#"cp "$0" "$1""#).arg("{source}").arg("{output}"));
    let mut builder = ClassBuilder::new("../escape", &backend);

    let err = builder.compile().unwrap_err();

    assert!(matches!(err, CompileError::Compilation { .. }));
    assert!(err.diagnostics()[0].message.contains("../escape"));
}

#[test]
fn unparsed_failure_output_becomes_single_diagnostic() {
    let backend = ProcessBackend::new(shell("echo 'something went wrong' >&2; exit 3"));
    let mut builder = ClassBuilder::new("Generated", &backend);

    let err = builder.compile().unwrap_err();

    assert_eq!(err.diagnostics().len(), 1);
    assert_eq!(err.diagnostics()[0].message, "something went wrong");
}

#[test]
fn warnings_are_kept_on_success() {
    let backend = ProcessBackend::new(
        shell(r#"echo "Generated.cs(1,1): warning CS0414: unused"; : > "$0""#).arg("{output}"),
    );
    let mut builder = ClassBuilder::new("Generated", &backend);

    let assembly = builder.compile().unwrap();

    assert_eq!(assembly.warnings.len(), 1);
    assert!(assembly.warnings[0].severity.is_warning());
    assert!(assembly.image.is_empty());
}

#[test]
fn missing_program_is_unavailable() {
    let backend = ProcessBackend::new(BackendConfig::new("classforge-no-such-compiler"));
    let mut builder = ClassBuilder::new("Generated", &backend);

    let err = builder.compile().unwrap_err();

    assert!(matches!(err, CompileError::BackendUnavailable { .. }));
}

#[test]
fn timeout_kills_compiler() {
    let mut config = shell("sleep 10");
    config.timeout_ms = Some(100);
    let backend = ProcessBackend::new(config);
    let mut builder = ClassBuilder::new("Generated", &backend);

    let started = Instant::now();
    let err = builder.compile().unwrap_err();

    assert!(matches!(err, CompileError::BackendUnavailable { .. }));
    assert!(started.elapsed() < Duration::from_secs(5));
}

#[test]
fn cancellation_kills_compiler() {
    let backend = ProcessBackend::new(shell("sleep 10"));
    let mut builder = ClassBuilder::new("Generated", &backend);
    let cancel = CancelToken::new();

    let trigger = cancel.clone();
    let handle = std::thread::spawn(move || {
        std::thread::sleep(Duration::from_millis(100));
        trigger.cancel();
    });

    let started = Instant::now();
    let err = builder.compile_with(&cancel).unwrap_err();
    handle.join().unwrap();

    assert!(err.is_cancelled());
    assert!(started.elapsed() < Duration::from_secs(5));
    assert!(!builder.is_compiled());
}
