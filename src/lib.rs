// src/lib.rs

//! Run a shell command, mirror its output to the console line by line,
//! hand each line to optional callbacks, and report the exit code.
//!
//! ```no_run
//! # async fn demo() -> shellrun::errors::Result<()> {
//! let mut exec = shellrun::Executor::new("echo hello");
//! exec.on_stdout(|line| println!("got: {line}"));
//! exec.run().await?;
//! assert_eq!(exec.exit_code(), 0);
//! # Ok(())
//! # }
//! ```

pub mod command_spec;
pub mod errors;
pub mod executor;
pub mod logging;
pub mod shell;
pub mod sink;
pub mod stream;

pub use command_spec::CommandSpec;
pub use errors::{ExecError, Result};
pub use executor::{Executor, RunState, UNKNOWN_EXIT_CODE};
pub use shell::Shell;
pub use sink::{LineSink, LineTarget, StreamKind};
