//! Install log sink
//!
//! Messages logged through an install context funnel into a [`LogFile`]:
//! an append-only sink whose writes are debounced. Appends land in an
//! in-memory buffer guarded by a mutex and a deferred task flushes the
//! buffer once a short window has passed, so a burst of messages becomes a
//! single write. The sink never raises: the first failed flush retries
//! against the system temp directory (keeping only the file name) and a
//! second failure silently disables file logging for the rest of the
//! process.

pub mod relay;

use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};
use std::thread;
use std::time::Duration;

/// Window within which appended lines coalesce into one write
const FLUSH_WINDOW: Duration = Duration::from_millis(100);

#[derive(Debug, Default)]
struct SinkState {
    path: Option<PathBuf>,
    buffer: String,
    flush_scheduled: bool,
    disabled: bool,
}

/// Debounced append-only log file shared by everything that logs through
/// one install context
#[derive(Debug, Clone)]
pub struct LogFile {
    shared: Arc<Mutex<SinkState>>,
}

impl LogFile {
    /// Creates a sink targeting `path`; `None` creates a disabled sink
    pub fn new(path: Option<PathBuf>) -> Self {
        let disabled = path.is_none();
        Self {
            shared: Arc::new(Mutex::new(SinkState {
                path,
                disabled,
                ..SinkState::default()
            })),
        }
    }

    /// A sink that drops everything
    pub fn disabled() -> Self {
        Self::new(None)
    }

    /// The current target path, `None` once file logging is disabled.
    /// Changes after a successful fallback to the temp directory.
    pub fn path(&self) -> Option<PathBuf> {
        let Ok(state) = self.shared.lock() else {
            return None;
        };
        if state.disabled { None } else { state.path.clone() }
    }

    /// Buffers one line and schedules a deferred flush
    pub fn append(&self, line: &str) {
        let Ok(mut state) = self.shared.lock() else {
            return;
        };
        if state.disabled {
            return;
        }
        state.buffer.push_str(line);
        state.buffer.push('\n');
        if !state.flush_scheduled {
            state.flush_scheduled = true;
            let shared = Arc::clone(&self.shared);
            thread::spawn(move || {
                thread::sleep(FLUSH_WINDOW);
                flush_state(&shared);
            });
        }
    }

    /// Writes out anything still buffered without waiting for the window
    pub fn flush(&self) {
        flush_state(&self.shared);
    }
}

impl Drop for LogFile {
    fn drop(&mut self) {
        // last handle out flushes whatever the deferred task did not get to
        if Arc::strong_count(&self.shared) == 1 {
            flush_state(&self.shared);
        }
    }
}

fn flush_state(shared: &Mutex<SinkState>) {
    let Ok(mut state) = shared.lock() else {
        return;
    };
    state.flush_scheduled = false;
    if state.disabled || state.buffer.is_empty() {
        return;
    }
    let pending = std::mem::take(&mut state.buffer);
    let Some(path) = state.path.clone() else {
        state.disabled = true;
        return;
    };
    if append_to(&path, &pending).is_ok() {
        return;
    }
    if let Some(fallback) = fallback_path(&path) {
        if append_to(&fallback, &pending).is_ok() {
            state.path = Some(fallback);
            return;
        }
    }
    state.disabled = true;
    state.path = None;
}

/// Same file name, relocated under the system temp directory
fn fallback_path(path: &Path) -> Option<PathBuf> {
    path.file_name().map(|name| std::env::temp_dir().join(name))
}

fn append_to(path: &Path, text: &str) -> std::io::Result<()> {
    use std::io::Write;
    let mut file = std::fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)?;
    file.write_all(text.as_bytes())
}

#[cfg(test)]
mod tests;
