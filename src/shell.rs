// src/shell.rs

//! Shell selection.
//!
//! A command string is never executed directly: it is handed to a shell
//! interpreter so pipes, globbing, variable expansion and `&&` chains behave
//! the way the user typed them. Which interpreter is used is a [`Shell`]
//! value rather than a `cfg!` branch buried in the executor, so tests can pin
//! a strategy regardless of the host.

use serde::Deserialize;
use tokio::process::Command;

/// How a command string is turned into a concrete child process.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum Shell {
    /// `sh -c <command>`
    Posix,
    /// `cmd /C powershell -Command <command>`
    Windows,
    /// `<program> <args...> <command>`
    Custom {
        program: String,
        #[serde(default)]
        args: Vec<String>,
    },
}

impl Shell {
    /// The strategy matching the platform this binary was built for.
    pub fn host() -> Self {
        if cfg!(windows) {
            Shell::Windows
        } else {
            Shell::Posix
        }
    }

    /// Program and full argument list used to run `command`.
    pub fn program_and_args(&self, command: &str) -> (String, Vec<String>) {
        match self {
            Shell::Posix => ("sh".to_string(), vec!["-c".to_string(), command.to_string()]),
            Shell::Windows => (
                "cmd".to_string(),
                vec![
                    "/C".to_string(),
                    "powershell".to_string(),
                    "-Command".to_string(),
                    command.to_string(),
                ],
            ),
            Shell::Custom { program, args } => {
                let mut full = args.clone();
                full.push(command.to_string());
                (program.clone(), full)
            }
        }
    }

    /// Build an unconfigured process builder for `command`.
    ///
    /// Stdio, working directory and environment are left untouched; the
    /// executor wires those up.
    pub fn build_command(&self, command: &str) -> Command {
        let (program, args) = self.program_and_args(command);
        let mut cmd = Command::new(program);
        cmd.args(args);
        cmd
    }
}

impl Default for Shell {
    fn default() -> Self {
        Shell::host()
    }
}
