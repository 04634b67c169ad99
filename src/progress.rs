//! Spinner display for long-running phase walks
//!
//! The spinner mirrors the install log: it subscribes to the process-wide
//! log relay and shows the most recent line as its message, so the console
//! stays alive even when a unit spends a long time inside one entry.

use std::time::Duration;

use indicatif::{ProgressBar, ProgressStyle};

use crate::logging::relay::{self, ObserverToken};

/// Spinner shown while a phase walk runs
pub struct PhaseProgress {
    bar: ProgressBar,
    token: Option<ObserverToken>,
}

impl PhaseProgress {
    /// Starts the spinner and begins mirroring log lines into its message
    pub fn start(label: &str) -> Self {
        let bar = ProgressBar::new_spinner();
        bar.set_style(
            ProgressStyle::default_spinner()
                .template("{spinner:.cyan} {msg}")
                .unwrap(),
        );
        bar.enable_steady_tick(Duration::from_millis(120));
        bar.set_message(label.to_string());

        let mirror = bar.clone();
        let token = relay::subscribe(move |line: &str| {
            if !line.trim().is_empty() {
                mirror.set_message(truncate_message(line));
            }
        });

        Self {
            bar,
            token: Some(token),
        }
    }

    /// Stops the spinner, leaving a final success line
    pub fn finish(mut self, message: &str) {
        self.detach();
        self.bar.finish_with_message(message.to_string());
    }

    /// Stops the spinner, leaving the failure line visible
    pub fn abandon(mut self, message: &str) {
        self.detach();
        self.bar.abandon_with_message(message.to_string());
    }

    fn detach(&mut self) {
        if let Some(token) = self.token.take() {
            relay::unsubscribe(token);
        }
    }
}

impl Drop for PhaseProgress {
    fn drop(&mut self) {
        self.detach();
    }
}

/// Truncates long log lines so the spinner stays on one row
fn truncate_message(line: &str) -> String {
    const MAX_LEN: usize = 72;
    if line.chars().count() > MAX_LEN {
        let shown: String = line.chars().take(MAX_LEN - 3).collect();
        format!("{}...", shown)
    } else {
        line.to_string()
    }
}
