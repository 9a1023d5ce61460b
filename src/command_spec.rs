// src/command_spec.rs

//! Declarative description of a command to run.
//!
//! `CommandSpec` derives `Deserialize` so it can be embedded in whatever
//! configuration format the caller already uses; this crate never reads
//! files itself.

use std::collections::BTreeMap;
use std::path::PathBuf;

use serde::Deserialize;

use crate::executor::Executor;
use crate::shell::Shell;

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct CommandSpec {
    /// Shell command line.
    pub cmd: String,

    /// Working directory override.
    #[serde(default)]
    pub cwd: Option<PathBuf>,

    /// Extra environment variables, applied in key order.
    #[serde(default)]
    pub env: BTreeMap<String, String>,

    /// Echo child output to this process's console.
    #[serde(default = "default_mirror")]
    pub mirror: bool,

    /// Shell strategy; the host default when absent.
    #[serde(default)]
    pub shell: Option<Shell>,
}

fn default_mirror() -> bool {
    true
}

impl CommandSpec {
    pub fn new(cmd: impl Into<String>) -> Self {
        Self {
            cmd: cmd.into(),
            cwd: None,
            env: BTreeMap::new(),
            mirror: true,
            shell: None,
        }
    }
}

impl Executor {
    /// Build an executor configured from `spec`. Callbacks are not part of
    /// the spec and must be registered afterwards.
    pub fn from_spec(spec: &CommandSpec) -> Self {
        let mut exec = Executor::new(spec.cmd.clone());
        if let Some(dir) = &spec.cwd {
            exec.set_working_dir(dir.clone());
        }
        for (key, value) in &spec.env {
            exec.add_env(key.clone(), value.clone());
        }
        if let Some(shell) = &spec.shell {
            exec.set_shell(shell.clone());
        }
        exec.set_mirror(spec.mirror);
        exec
    }
}
