#![allow(dead_code)]

pub use shellrun_test_utils::{LineRecorder, init_tracing, quiet_executor, with_timeout};

/// Executor with both streams recorded and console mirroring off.
pub fn recorded(cmd: &str) -> (shellrun::Executor, LineRecorder, LineRecorder) {
    let out = LineRecorder::new();
    let err = LineRecorder::new();
    let mut exec = quiet_executor(cmd);
    exec.on_stdout(out.sink());
    exec.on_stderr(err.sink());
    (exec, out, err)
}
