// src/executor.rs

//! The executor: one shell command, run once, with both output streams
//! drained concurrently.

use std::fmt;
use std::path::{Path, PathBuf};
use std::process::Stdio;
use std::sync::{Arc, Mutex, PoisonError};

use tracing::{debug, error, info};

use crate::errors::{ExecError, Result};
use crate::shell::Shell;
use crate::sink::{LineSink, LineTarget, StreamKind};
use crate::stream::drain_lines;

/// Exit code reported before a run has finished, or when none exists.
pub const UNKNOWN_EXIT_CODE: i32 = -1;

/// Lifecycle of a single [`Executor::run`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunState {
    NotStarted,
    /// Building the command and spawning the child.
    Starting,
    /// Child is up; both readers are consuming its output.
    Running,
    /// Both streams hit end-of-stream; waiting for the exit status.
    Draining,
    /// Finished. Holds the exit code, or -1 if none could be determined.
    Terminated(i32),
    /// Spawning failed; nothing ran.
    StartFailed,
}

/// Runs a shell command, mirroring and dispatching its output line by line.
///
/// Configure with the setters, call [`run`](Self::run) (or
/// [`run_blocking`](Self::run_blocking)) once, then read
/// [`exit_code`](Self::exit_code). Setters take `&mut self` and `run` takes
/// `&self`, so configuration cannot change while a run is in flight.
pub struct Executor {
    command: String,
    dir: Option<PathBuf>,
    extra_env: Vec<(String, String)>,
    shell: Shell,
    mirror: bool,
    on_stdout: Option<LineSink>,
    on_stderr: Option<LineSink>,
    state: Mutex<RunState>,
}

impl Executor {
    pub fn new(command: impl Into<String>) -> Self {
        Self {
            command: command.into(),
            dir: None,
            extra_env: Vec::new(),
            shell: Shell::host(),
            mirror: true,
            on_stdout: None,
            on_stderr: None,
            state: Mutex::new(RunState::NotStarted),
        }
    }

    pub fn command(&self) -> &str {
        &self.command
    }

    /// Run the child in `path` instead of the caller's current directory.
    /// An empty path clears the override.
    pub fn set_working_dir(&mut self, path: impl Into<PathBuf>) -> &mut Self {
        let path = path.into();
        self.dir = if path.as_os_str().is_empty() {
            None
        } else {
            Some(path)
        };
        self
    }

    pub fn working_dir(&self) -> Option<&Path> {
        self.dir.as_deref()
    }

    /// Append `key=value` to the child's environment.
    ///
    /// Entries are applied in insertion order on top of the inherited
    /// environment, so a later duplicate key wins.
    pub fn add_env(&mut self, key: impl Into<String>, value: impl Into<String>) -> &mut Self {
        self.extra_env.push((key.into(), value.into()));
        self
    }

    pub fn extra_env(&self) -> &[(String, String)] {
        &self.extra_env
    }

    /// The extra environment as `KEY=VALUE` strings, in insertion order.
    pub fn extra_env_entries(&self) -> Vec<String> {
        self.extra_env
            .iter()
            .map(|(k, v)| format!("{k}={v}"))
            .collect()
    }

    pub fn set_shell(&mut self, shell: Shell) -> &mut Self {
        self.shell = shell;
        self
    }

    pub fn shell(&self) -> &Shell {
        &self.shell
    }

    /// Enable or disable echoing child output to this process's
    /// stdout/stderr. Enabled by default.
    pub fn set_mirror(&mut self, mirror: bool) -> &mut Self {
        self.mirror = mirror;
        self
    }

    pub fn mirror(&self) -> bool {
        self.mirror
    }

    /// Register a callback for each stdout line (terminator stripped).
    pub fn on_stdout<F>(&mut self, f: F) -> &mut Self
    where
        F: Fn(&str) + Send + Sync + 'static,
    {
        self.on_stdout = Some(Arc::new(f));
        self
    }

    /// Register a callback for each stderr line (terminator stripped).
    pub fn on_stderr<F>(&mut self, f: F) -> &mut Self
    where
        F: Fn(&str) + Send + Sync + 'static,
    {
        self.on_stderr = Some(Arc::new(f));
        self
    }

    pub fn state(&self) -> RunState {
        *self.lock_state()
    }

    /// Exit code of the finished run, or -1 if the run has not finished or
    /// no code could be determined (e.g. killed by a signal).
    pub fn exit_code(&self) -> i32 {
        match *self.lock_state() {
            RunState::Terminated(code) => code,
            _ => UNKNOWN_EXIT_CODE,
        }
    }

    /// Execute the command and block (asynchronously) until its output has
    /// been fully delivered and the process has exited.
    ///
    /// - `Err(ExecError::Startup)` if the child could not be spawned.
    /// - `Err(ExecError::NonZeroExit)` if it exited non-zero or was killed.
    /// - `Err(ExecError::Wait)` if its exit status could not be collected.
    /// - `Err(ExecError::AlreadyRun)` on any call after the first.
    pub async fn run(&self) -> Result<()> {
        self.begin()?;

        info!(cmd = %self.command, shell = ?self.shell, dir = ?self.dir, "starting process");

        let mut cmd = self.shell.build_command(&self.command);
        if let Some(dir) = &self.dir {
            cmd.current_dir(dir);
        }
        for (key, value) in &self.extra_env {
            cmd.env(key, value);
        }
        cmd.stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true);

        let mut child = match cmd.spawn() {
            Ok(child) => child,
            Err(source) => {
                self.set_state(RunState::StartFailed);
                error!(cmd = %self.command, error = %source, "failed to spawn process");
                return Err(ExecError::Startup {
                    command: self.command.clone(),
                    source,
                });
            }
        };

        let (stdout, stderr) = match (child.stdout.take(), child.stderr.take()) {
            (Some(stdout), Some(stderr)) => (stdout, stderr),
            _ => {
                self.set_state(RunState::StartFailed);
                if let Err(e) = child.start_kill() {
                    debug!(error = %e, "failed to kill child without pipes");
                }
                if let Err(e) = child.wait().await {
                    debug!(error = %e, "failed to reap child without pipes");
                }
                return Err(ExecError::Startup {
                    command: self.command.clone(),
                    source: std::io::Error::other("child output pipe unavailable"),
                });
            }
        };

        self.set_state(RunState::Running);

        let stdout_task = tokio::spawn(drain_lines(stdout, self.target(StreamKind::Stdout)));
        let stderr_task = tokio::spawn(drain_lines(stderr, self.target(StreamKind::Stderr)));

        let (stdout_res, stderr_res) = tokio::join!(stdout_task, stderr_task);
        for (kind, res) in [(StreamKind::Stdout, stdout_res), (StreamKind::Stderr, stderr_res)] {
            match res {
                Ok(lines) => debug!(stream = %kind, lines, "reader finished"),
                Err(e) => error!(stream = %kind, error = %e, "reader task failed"),
            }
        }

        self.set_state(RunState::Draining);

        let status = match child.wait().await {
            Ok(status) => status,
            Err(e) => {
                self.set_state(RunState::Terminated(UNKNOWN_EXIT_CODE));
                error!(cmd = %self.command, error = %e, "failed to wait for process");
                return Err(ExecError::Wait(e));
            }
        };

        #[cfg(unix)]
        {
            use std::os::unix::process::ExitStatusExt;
            if let Some(signal) = status.signal() {
                tracing::warn!(cmd = %self.command, signal, "process terminated by signal");
            }
        }

        let code = status.code().unwrap_or(UNKNOWN_EXIT_CODE);
        self.set_state(RunState::Terminated(code));

        info!(
            cmd = %self.command,
            exit_code = code,
            success = status.success(),
            "process exited"
        );

        if status.success() {
            Ok(())
        } else {
            Err(ExecError::NonZeroExit)
        }
    }

    /// [`run`](Self::run) on a private current-thread Tokio runtime.
    ///
    /// For callers without a runtime of their own. Panics if called from
    /// inside an async context, like any nested `block_on`.
    pub fn run_blocking(&self) -> Result<()> {
        let rt = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()?;
        rt.block_on(self.run())
    }

    fn begin(&self) -> Result<()> {
        let mut state = self.lock_state();
        if *state != RunState::NotStarted {
            return Err(ExecError::AlreadyRun);
        }
        *state = RunState::Starting;
        Ok(())
    }

    fn target(&self, kind: StreamKind) -> LineTarget {
        let sink = match kind {
            StreamKind::Stdout => self.on_stdout.clone(),
            StreamKind::Stderr => self.on_stderr.clone(),
        };
        LineTarget::new(kind, self.mirror, sink)
    }

    fn set_state(&self, next: RunState) {
        *self.lock_state() = next;
    }

    fn lock_state(&self) -> std::sync::MutexGuard<'_, RunState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl fmt::Debug for Executor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Executor")
            .field("command", &self.command)
            .field("dir", &self.dir)
            .field("extra_env", &self.extra_env)
            .field("shell", &self.shell)
            .field("mirror", &self.mirror)
            .field("on_stdout", &self.on_stdout.is_some())
            .field("on_stderr", &self.on_stderr.is_some())
            .field("state", &self.state())
            .finish()
    }
}
