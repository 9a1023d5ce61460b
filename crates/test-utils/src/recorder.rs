use std::sync::{Arc, Mutex};

/// Thread-safe collector for lines delivered to a callback.
///
/// Clones share the same buffer, so one clone can be moved into the
/// executor while the test keeps another for assertions.
#[derive(Debug, Clone, Default)]
pub struct LineRecorder {
    lines: Arc<Mutex<Vec<String>>>,
}

impl LineRecorder {
    pub fn new() -> Self {
        Self::default()
    }

    /// A callback suitable for `Executor::on_stdout` / `on_stderr`.
    pub fn sink(&self) -> impl Fn(&str) + Send + Sync + 'static {
        let lines = Arc::clone(&self.lines);
        move |line: &str| {
            lines.lock().unwrap().push(line.to_string());
        }
    }

    pub fn lines(&self) -> Vec<String> {
        self.lines.lock().unwrap().clone()
    }

    pub fn len(&self) -> usize {
        self.lines.lock().unwrap().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
