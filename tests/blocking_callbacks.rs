#![cfg(unix)]

mod common;
use crate::common::{LineRecorder, init_tracing, quiet_executor, with_timeout};

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, mpsc};
use std::time::Duration;

use shellrun::Executor;

/// Stdout callback that blocks until the stderr callback has seen `wanted`.
///
/// Returns the executor plus a flag set when the wait succeeded.
fn stdout_waits_for_stderr(cmd: &str, wanted: &'static str) -> (Executor, Arc<AtomicBool>) {
    let (seen_tx, seen_rx) = mpsc::channel::<()>();
    let seen_rx = Mutex::new(seen_rx);
    let saw_stderr = Arc::new(AtomicBool::new(false));

    let mut exec = quiet_executor(cmd);
    let flag = Arc::clone(&saw_stderr);
    exec.on_stdout(move |_line| {
        let rx = seen_rx.lock().unwrap();
        if rx.recv_timeout(Duration::from_secs(4)).is_ok() {
            flag.store(true, Ordering::SeqCst);
        }
    });
    let seen_tx = Mutex::new(seen_tx);
    exec.on_stderr(move |line| {
        if line == wanted {
            let _ = seen_tx.lock().unwrap().send(());
        }
    });

    (exec, saw_stderr)
}

#[tokio::test]
async fn stderr_is_delivered_while_stdout_callback_blocks() {
    init_tracing();
    let (exec, saw_stderr) = stdout_waits_for_stderr("echo out; echo err >&2", "err");

    with_timeout(exec.run()).await.unwrap();

    assert!(saw_stderr.load(Ordering::SeqCst));
}

#[test]
fn run_blocking_delivers_streams_in_parallel() {
    init_tracing();
    let (exec, saw_stderr) = stdout_waits_for_stderr("echo out; echo err >&2", "err");

    let started = std::time::Instant::now();
    exec.run_blocking().unwrap();

    assert!(saw_stderr.load(Ordering::SeqCst));
    assert!(started.elapsed() < Duration::from_secs(3));
}

#[tokio::test]
async fn stderr_keeps_draining_past_pipe_buffer_while_stdout_blocks() {
    init_tracing();
    // Far more stderr than a pipe buffer holds, all emitted while the stdout
    // callback is still waiting for the final stderr line.
    let script = "echo out; i=0; while [ $i -lt 20000 ]; do echo \"noise $i\" >&2; i=$((i+1)); done; echo last >&2";
    let (exec, saw_stderr) = stdout_waits_for_stderr(script, "last");

    with_timeout(exec.run()).await.unwrap();

    assert!(saw_stderr.load(Ordering::SeqCst));
    assert_eq!(exec.exit_code(), 0);
}

#[tokio::test]
async fn slow_callback_still_sees_every_line_in_order() {
    init_tracing();
    let out = LineRecorder::new();
    let record = out.sink();
    let mut exec = quiet_executor("for i in 1 2 3 4 5; do echo $i; done");
    exec.on_stdout(move |line| {
        std::thread::sleep(Duration::from_millis(20));
        record(line);
    });

    with_timeout(exec.run()).await.unwrap();

    assert_eq!(out.lines(), vec!["1", "2", "3", "4", "5"]);
}
