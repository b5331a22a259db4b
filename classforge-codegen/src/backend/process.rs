//! Backend that runs an external compiler process.

use std::{
    fs::{self, File},
    path::{Component, Path},
    process::{Child, Command, ExitStatus, Stdio},
    thread,
    time::{Duration, Instant},
};

use classforge_manifest::BackendConfig;

use super::{BackendFailure, CancelToken, CompilationBackend, CompilationUnit, Diagnostic, Severity};

const POLL_INTERVAL: Duration = Duration::from_millis(10);

/// A compiled type produced by [`ProcessBackend`].
///
/// The compiler output is read into memory; nothing is left on disk.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompiledAssembly {
    /// Qualified name of the compiled type.
    pub type_name: String,
    /// Bytes of the compiler's output file.
    pub image: Vec<u8>,
    /// Non-fatal diagnostics printed by the compiler.
    pub warnings: Vec<Diagnostic>,
}

/// Runs a configured compiler executable on the rendered source.
///
/// Each compilation gets its own temporary work directory containing the
/// source file; the compiler is expected to write its output file there.
/// Combined stdout/stderr is parsed for diagnostics.
///
/// # Example
///
/// ```ignore
/// let backend = ProcessBackend::new(
///     BackendConfig::new("csc")
///         .arg("-target:library")
///         .arg("-out:{output}")
///         .arg("-r:{reference}")
///         .arg("{source}"),
/// );
/// let mut builder = ClassBuilder::new("Player", backend);
/// ```
#[derive(Debug, Clone)]
pub struct ProcessBackend {
    config: BackendConfig,
}

impl ProcessBackend {
    pub fn new(config: BackendConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &BackendConfig {
        &self.config
    }

    /// Expand argument templates for one unit.
    fn expand_args(&self, unit: &CompilationUnit<'_>, source: &Path, output: &Path) -> Vec<String> {
        let source = source.display().to_string();
        let output = output.display().to_string();
        let fill = |template: &str| {
            template
                .replace("{source}", &source)
                .replace("{output}", &output)
                .replace("{type}", unit.type_name)
        };

        let mut args = Vec::with_capacity(self.config.args.len());
        for template in &self.config.args {
            if template.contains("{reference}") {
                for reference in unit.references {
                    args.push(fill(&template.replace("{reference}", reference.as_str())));
                }
            } else {
                args.push(fill(template));
            }
        }
        args
    }

    fn wait(&self, child: &mut Child, cancel: &CancelToken) -> Result<ExitStatus, BackendFailure> {
        let started = Instant::now();
        loop {
            match child.try_wait() {
                Ok(Some(status)) => return Ok(status),
                Ok(None) => {}
                Err(e) => {
                    return Err(BackendFailure::Unavailable(format!(
                        "failed to wait for {}: {}",
                        self.config.program, e
                    )));
                }
            }

            if cancel.is_cancelled() {
                stop(child);
                return Err(BackendFailure::Cancelled);
            }

            if let Some(timeout) = self.config.timeout()
                && started.elapsed() >= timeout
            {
                stop(child);
                return Err(BackendFailure::Unavailable(format!(
                    "{} timed out after {} ms",
                    self.config.program,
                    timeout.as_millis()
                )));
            }

            thread::sleep(POLL_INTERVAL);
        }
    }
}

fn stop(child: &mut Child) {
    // The child may already have exited between polls.
    let _ = child.kill();
    let _ = child.wait();
}

/// The type name as a single file name inside the work directory.
fn file_stem(type_name: &str) -> Result<&str, BackendFailure> {
    let mut components = Path::new(type_name).components();
    match (components.next(), components.next()) {
        (Some(Component::Normal(_)), None) if !type_name.contains(['/', '\\']) => Ok(type_name),
        _ => Err(BackendFailure::Diagnostics(vec![Diagnostic::error(format!(
            "type name '{}' cannot be used as a file name",
            type_name
        ))])),
    }
}

fn io_failure(what: &str, e: std::io::Error) -> BackendFailure {
    BackendFailure::Unavailable(format!("{}: {}", what, e))
}

impl CompilationBackend for ProcessBackend {
    type Artifact = CompiledAssembly;

    fn name(&self) -> &str {
        &self.config.program
    }

    fn compile(&self, unit: &CompilationUnit<'_>) -> Result<CompiledAssembly, BackendFailure> {
        if unit.cancel.is_cancelled() {
            return Err(BackendFailure::Cancelled);
        }

        let stem = file_stem(unit.type_name)?;
        let dir = tempfile::tempdir().map_err(|e| io_failure("failed to create work directory", e))?;
        let source_path = dir
            .path()
            .join(format!("{}.{}", stem, self.config.source_extension));
        let output_path = dir
            .path()
            .join(self.config.output_file.replace("{type}", stem));
        let log_path = dir.path().join("compiler.log");

        fs::write(&source_path, unit.source).map_err(|e| io_failure("failed to write source", e))?;
        let stdout = File::create(&log_path).map_err(|e| io_failure("failed to create log", e))?;
        let stderr = stdout
            .try_clone()
            .map_err(|e| io_failure("failed to create log", e))?;

        let args = self.expand_args(unit, &source_path, &output_path);
        tracing::debug!(program = %self.config.program, ?args, "running compiler");

        let mut child = Command::new(&self.config.program)
            .args(&args)
            .current_dir(dir.path())
            .stdin(Stdio::null())
            .stdout(Stdio::from(stdout))
            .stderr(Stdio::from(stderr))
            .spawn()
            .map_err(|e| {
                BackendFailure::Unavailable(format!("failed to run {}: {}", self.config.program, e))
            })?;

        let status = self.wait(&mut child, unit.cancel)?;
        let log = fs::read(&log_path).map_err(|e| io_failure("failed to read compiler log", e))?;
        let output = String::from_utf8_lossy(&log);
        let mut diagnostics = parse_diagnostics(&output);

        if !status.success() {
            if !diagnostics.iter().any(|d| d.severity.is_error()) {
                let detail = output.trim();
                diagnostics.push(Diagnostic::error(if detail.is_empty() {
                    format!("{} exited with {}", self.config.program, status)
                } else {
                    detail.to_string()
                }));
            }
            return Err(BackendFailure::Diagnostics(diagnostics));
        }

        let image = fs::read(&output_path).map_err(|e| {
            BackendFailure::Diagnostics(vec![Diagnostic::error(format!(
                "compiler produced no output file '{}': {}",
                output_path.display(),
                e
            ))])
        })?;

        Ok(CompiledAssembly {
            type_name: unit.type_name.to_string(),
            image,
            warnings: diagnostics,
        })
    }
}

/// Parse compiler output into diagnostics.
///
/// Recognises `location: error CODE: message`, `location: warning ...` and
/// location-less `error ...` lines; other lines are ignored. The first
/// severity keyword on a line decides its severity.
pub(crate) fn parse_diagnostics(output: &str) -> Vec<Diagnostic> {
    output.lines().filter_map(parse_line).collect()
}

fn parse_line(line: &str) -> Option<Diagnostic> {
    let line = line.trim();
    let (start, marker, severity) = [("error", Severity::Error), ("warning", Severity::Warning)]
        .into_iter()
        .filter_map(|(marker, severity)| Some((find_marker(line, marker)?, marker, severity)))
        .min_by_key(|(start, ..)| *start)?;

    let location = line[..start].trim_end().trim_end_matches(':').trim();
    let location = (!location.is_empty()).then_some(location);
    Some(diagnostic(severity, &line[start + marker.len()..], location))
}

/// Position of `marker` as a whole word, either starting the line or
/// following a `": "` separator.
fn find_marker(line: &str, marker: &str) -> Option<usize> {
    line.match_indices(marker).map(|(idx, _)| idx).find(|&idx| {
        let before = &line[..idx];
        let after = &line[idx + marker.len()..];
        (before.is_empty() || before.ends_with(": "))
            && (after.is_empty() || after.starts_with(|c: char| c == ':' || c.is_whitespace()))
    })
}

fn diagnostic(severity: Severity, rest: &str, location: Option<&str>) -> Diagnostic {
    let message = rest.trim_start_matches(':').trim().to_string();
    let diag = Diagnostic {
        severity,
        message,
        location: None,
    };
    match location {
        Some(loc) => diag.at(loc),
        None => diag,
    }
}
