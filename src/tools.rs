//! External command invocation.
//!
//! The pipeline only talks to the outside world through [`CommandRunner`],
//! so tests can script tool behaviour without samtools or bcftools installed.

use std::ffi::{OsStr, OsString};
use std::fmt;
use std::fs::File;
use std::path::{Path, PathBuf};
use std::process::{Child, Command, Stdio};

use tracing::{debug, warn};

use crate::{PipelineError, Result};

/// One external command line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Invocation {
    /// Program name or path.
    pub program: String,
    /// Arguments, in order.
    pub args: Vec<OsString>,
    /// File (relative to the working directory) receiving standard output.
    pub stdout: Option<PathBuf>,
}

impl Invocation {
    /// Start an invocation of `program`.
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
            args: Vec::new(),
            stdout: None,
        }
    }

    /// Append one argument.
    pub fn arg(mut self, arg: impl AsRef<OsStr>) -> Self {
        self.args.push(arg.as_ref().to_os_string());
        self
    }

    /// Append several arguments.
    pub fn args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<OsStr>,
    {
        self.args
            .extend(args.into_iter().map(|arg| arg.as_ref().to_os_string()));
        self
    }

    /// Redirect standard output into `path`.
    pub fn stdout_to(mut self, path: impl Into<PathBuf>) -> Self {
        self.stdout = Some(path.into());
        self
    }

    /// Whether any argument equals `value`.
    pub fn has_arg(&self, value: &str) -> bool {
        self.args.iter().any(|arg| arg == value)
    }
}

impl fmt::Display for Invocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.program)?;
        for arg in &self.args {
            write!(f, " {}", arg.to_string_lossy())?;
        }
        if let Some(path) = &self.stdout {
            write!(f, " > {}", path.display())?;
        }
        Ok(())
    }
}

/// Result of running an invocation to completion.
#[derive(Debug, Clone, Default)]
pub struct ToolOutput {
    /// Rendered command line.
    pub command: String,
    /// Exit code, `None` when killed by a signal.
    pub code: Option<i32>,
    /// Whether every process involved exited successfully.
    pub success: bool,
    /// Captured standard output; empty when redirected to a file.
    pub stdout: Vec<u8>,
    /// Captured standard error.
    pub stderr: String,
}

impl ToolOutput {
    /// Successful output with the given stdout (useful for scripted runners).
    pub fn ok(command: impl Into<String>, stdout: impl Into<Vec<u8>>) -> Self {
        Self {
            command: command.into(),
            code: Some(0),
            success: true,
            stdout: stdout.into(),
            stderr: String::new(),
        }
    }

    /// Failed output with the given exit code and stderr.
    pub fn failed(command: impl Into<String>, code: i32, stderr: impl Into<String>) -> Self {
        Self {
            command: command.into(),
            code: Some(code),
            success: false,
            stdout: Vec::new(),
            stderr: stderr.into(),
        }
    }

    /// Standard output decoded lossily.
    pub fn stdout_text(&self) -> String {
        String::from_utf8_lossy(&self.stdout).into_owned()
    }

    /// Turn an unsuccessful run into [`PipelineError::StepFailed`].
    pub fn ensure_success(self, step: &str) -> Result<Self> {
        if self.success {
            return Ok(self);
        }
        Err(PipelineError::StepFailed {
            step: step.to_string(),
            command: self.command,
            code: self.code,
            stderr: self.stderr.trim().to_string(),
        })
    }
}

/// Runs external commands for the pipeline.
pub trait CommandRunner {
    /// Run one command and wait for it to exit.
    fn run(&mut self, invocation: &Invocation) -> Result<ToolOutput>;

    /// Run `upstream | downstream` and wait for both to exit.
    fn run_piped(&mut self, upstream: &Invocation, downstream: &Invocation)
        -> Result<ToolOutput>;
}

impl<R: CommandRunner + ?Sized> CommandRunner for &mut R {
    fn run(&mut self, invocation: &Invocation) -> Result<ToolOutput> {
        (**self).run(invocation)
    }

    fn run_piped(
        &mut self,
        upstream: &Invocation,
        downstream: &Invocation,
    ) -> Result<ToolOutput> {
        (**self).run_piped(upstream, downstream)
    }
}

/// [`CommandRunner`] backed by real child processes.
#[derive(Debug, Clone)]
pub struct SystemRunner {
    workdir: PathBuf,
}

impl SystemRunner {
    /// Runner whose children start in `workdir`.
    pub fn new(workdir: impl AsRef<Path>) -> Self {
        Self {
            workdir: workdir.as_ref().to_path_buf(),
        }
    }

    fn command(&self, invocation: &Invocation) -> Result<Command> {
        let mut command = Command::new(&invocation.program);
        command.args(&invocation.args).current_dir(&self.workdir);
        if let Some(path) = &invocation.stdout {
            let file = File::create(self.workdir.join(path))?;
            command.stdout(Stdio::from(file));
        }
        Ok(command)
    }
}

fn spawn_error(invocation: &Invocation, source: std::io::Error) -> PipelineError {
    PipelineError::Spawn {
        program: invocation.program.clone(),
        source,
    }
}

/// Kill and wait for a producer whose consumer never started.
fn reap(child: &mut Child) {
    if let Err(err) = child.kill() {
        debug!(%err, "producer already exited");
    }
    if let Err(err) = child.wait() {
        warn!(%err, "failed to reap producer");
    }
}

impl CommandRunner for SystemRunner {
    fn run(&mut self, invocation: &Invocation) -> Result<ToolOutput> {
        debug!(command = %invocation, "running");
        let output = self
            .command(invocation)?
            .output()
            .map_err(|err| spawn_error(invocation, err))?;

        Ok(ToolOutput {
            command: invocation.to_string(),
            code: output.status.code(),
            success: output.status.success(),
            stdout: output.stdout,
            stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
        })
    }

    fn run_piped(
        &mut self,
        upstream: &Invocation,
        downstream: &Invocation,
    ) -> Result<ToolOutput> {
        let command = format!("{upstream} | {downstream}");
        debug!(%command, "running pipeline");

        let mut consumer = self.command(downstream)?;

        // Upstream stderr is inherited: nothing drains it while the consumer runs.
        let mut producer = self
            .command(upstream)?
            .stdout(Stdio::piped())
            .stderr(Stdio::inherit())
            .spawn()
            .map_err(|err| spawn_error(upstream, err))?;
        let Some(pipe) = producer.stdout.take() else {
            reap(&mut producer);
            return Err(spawn_error(
                upstream,
                std::io::Error::other("stdout not captured"),
            ));
        };

        let consumer = match consumer.stdin(Stdio::from(pipe)).output() {
            Ok(output) => output,
            Err(err) => {
                reap(&mut producer);
                return Err(spawn_error(downstream, err));
            }
        };
        let producer_status = producer.wait()?;

        let code = if producer_status.success() {
            consumer.status.code()
        } else {
            producer_status.code()
        };

        Ok(ToolOutput {
            command,
            code,
            success: producer_status.success() && consumer.status.success(),
            stdout: consumer.stdout,
            stderr: String::from_utf8_lossy(&consumer.stderr).into_owned(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_renders_shell_like_command() {
        let invocation = Invocation::new("samtools")
            .args(["view", "seq.cram", "chr15:1-10", "-b"])
            .stdout_to("CYP1A2.bam");
        assert_eq!(
            invocation.to_string(),
            "samtools view seq.cram chr15:1-10 -b > CYP1A2.bam"
        );
        assert!(invocation.has_arg("-b"));
        assert!(!invocation.has_arg("-c"));
    }

    #[test]
    fn failed_output_becomes_step_error() {
        let err = ToolOutput::failed("samtools index seq.cram", 1, "no such file\n")
            .ensure_success("Indexing CRAM file")
            .unwrap_err();
        match err {
            PipelineError::StepFailed {
                step,
                command,
                code,
                stderr,
            } => {
                assert_eq!(step, "Indexing CRAM file");
                assert_eq!(command, "samtools index seq.cram");
                assert_eq!(code, Some(1));
                assert_eq!(stderr, "no such file");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[cfg(unix)]
    #[test]
    fn system_runner_captures_stdout_and_exit_codes() {
        let dir = tempfile::tempdir().unwrap();
        let mut runner = SystemRunner::new(dir.path());

        let output = runner
            .run(&Invocation::new("sh").args(["-c", "printf 'a\\tb\\n'"]))
            .unwrap();
        assert!(output.success);
        assert_eq!(output.stdout_text(), "a\tb\n");

        let output = runner
            .run(&Invocation::new("sh").args(["-c", "echo oops >&2; exit 3"]))
            .unwrap();
        assert!(!output.success);
        assert_eq!(output.code, Some(3));
        assert_eq!(output.stderr.trim(), "oops");
    }

    #[cfg(unix)]
    #[test]
    fn system_runner_redirects_and_pipes() {
        let dir = tempfile::tempdir().unwrap();
        let mut runner = SystemRunner::new(dir.path());

        let output = runner
            .run_piped(
                &Invocation::new("printf").arg("x\\ny\\n"),
                &Invocation::new("wc").arg("-l").stdout_to("count.txt"),
            )
            .unwrap();
        assert!(output.success);
        let count = std::fs::read_to_string(dir.path().join("count.txt")).unwrap();
        assert_eq!(count.trim(), "2");
    }

    #[cfg(unix)]
    #[test]
    fn failing_producer_fails_the_pipe() {
        let dir = tempfile::tempdir().unwrap();
        let mut runner = SystemRunner::new(dir.path());

        let output = runner
            .run_piped(
                &Invocation::new("sh").args(["-c", "exit 2"]),
                &Invocation::new("cat"),
            )
            .unwrap();
        assert!(!output.success);
        assert_eq!(output.code, Some(2));
    }

    #[cfg(target_os = "linux")]
    #[test]
    fn producer_is_reaped_when_consumer_cannot_start() {
        let dir = tempfile::tempdir().unwrap();
        let mut runner = SystemRunner::new(dir.path());

        let err = runner
            .run_piped(
                &Invocation::new("sh").args(["-c", "echo $$ > producer.pid; exec sleep 30"]),
                &Invocation::new("definitely-not-a-real-tool-7f3a"),
            )
            .unwrap_err();
        assert!(matches!(err, PipelineError::Spawn { ref program, .. } if program.starts_with("definitely")));

        // The shell may be killed before it records its pid; only a recorded
        // pid can be checked.
        if let Ok(pid) = std::fs::read_to_string(dir.path().join("producer.pid")) {
            let proc_entry = PathBuf::from("/proc").join(pid.trim());
            assert!(!proc_entry.exists(), "producer {} still present", pid.trim());
        }
    }

    #[test]
    fn missing_program_is_a_spawn_error() {
        let dir = tempfile::tempdir().unwrap();
        let mut runner = SystemRunner::new(dir.path());
        let err = runner
            .run(&Invocation::new("definitely-not-a-real-tool-7f3a"))
            .unwrap_err();
        assert!(matches!(err, PipelineError::Spawn { .. }));
    }
}
