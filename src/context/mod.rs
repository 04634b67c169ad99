//! Install context
//!
//! An [`InstallContext`] carries the parameters of one install run and the
//! log sink every participating node writes through. Parameters come from
//! `-name` / `-name=value` command-line tokens: names are lower-cased and
//! looked up case-insensitively, values keep their case, and a name given
//! twice keeps its original position with the later value winning.

use std::path::{Path, PathBuf};

use crate::error::StagehandError;
use crate::logging::{LogFile, relay};

/// Rendered in place of the `password` parameter value wherever the
/// parameter table is dumped
const REDACTED: &str = "********";

/// Parameter name whose value is never echoed
const PASSWORD_PARAM: &str = "password";

/// Parameters and log sink of one install run
#[derive(Debug)]
pub struct InstallContext {
    params: Vec<(String, String)>,
    log: LogFile,
}

impl InstallContext {
    /// Builds a context from raw command-line tokens.
    ///
    /// `default_log` names the log file used when no `logfile` parameter is
    /// present; an explicitly empty `-logfile=` disables file logging.
    pub fn new(default_log: Option<&Path>, tokens: &[String]) -> Self {
        let mut params = parse_command_line(tokens);
        if !params.iter().any(|(name, _)| name == "logfile") {
            if let Some(path) = default_log {
                params.push(("logfile".to_string(), path.display().to_string()));
            }
        }
        let log = match params
            .iter()
            .find(|(name, _)| name == "logfile")
            .map(|(_, value)| value.as_str())
        {
            None | Some("") => LogFile::disabled(),
            Some(path) => LogFile::new(Some(PathBuf::from(path))),
        };
        Self { params, log }
    }

    /// A context with no log file and the console mirror turned off
    #[cfg(test)]
    pub fn silent() -> Self {
        Self::new(None, &["-logtoconsole=no".to_string()])
    }

    /// Looks up a parameter case-insensitively
    pub fn param(&self, name: &str) -> Option<&str> {
        let key = name.to_lowercase();
        self.params
            .iter()
            .find(|(k, _)| *k == key)
            .map(|(_, v)| v.as_str())
    }

    /// Sets a parameter, overwriting in place if it already exists
    pub fn set_param(&mut self, name: &str, value: impl Into<String>) {
        let key = name.to_lowercase();
        if let Some(slot) = self.params.iter_mut().find(|(k, _)| *k == key) {
            slot.1 = value.into();
        } else {
            self.params.push((key, value.into()));
        }
    }

    /// Whether a parameter is set to a truthy value: present with an empty
    /// value, or equal to "true", "yes" or "1" ignoring case
    pub fn is_parameter_set(&self, name: &str) -> bool {
        match self.param(name) {
            Some(value) => {
                value.is_empty()
                    || value.eq_ignore_ascii_case("true")
                    || value.eq_ignore_ascii_case("yes")
                    || value == "1"
            }
            None => false,
        }
    }

    /// Parameters in their original order
    pub fn params(&self) -> impl Iterator<Item = (&str, &str)> {
        self.params.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// Logs one line: buffered into the log file, mirrored to the console
    /// unless `logtoconsole` says otherwise, and broadcast to the relay
    pub fn log_message(&self, message: &str) {
        self.log.append(message);
        if self.is_parameter_set("logtoconsole") || self.param("logtoconsole").is_none() {
            println!("{message}");
        }
        relay::broadcast(message);
    }

    /// Logs an error with its cause chain; `-verbose` adds the debug
    /// rendering of the terminal error
    pub fn log_error(&self, err: &StagehandError) {
        self.log_message(&err.to_string());
        let mut source = std::error::Error::source(err);
        while let Some(cause) = source {
            self.log_message(&format!("Caused by: {cause}"));
            source = cause.source();
        }
        if self.is_parameter_set("verbose") {
            self.log_message(&format!("Details: {err:?}"));
        }
    }

    /// Logs the parameter table with the password value redacted
    pub fn log_parameters(&self) {
        self.log_message("Parameters:");
        for (name, value) in &self.params {
            let shown = if name == PASSWORD_PARAM { REDACTED } else { value };
            self.log_message(&format!("   {name} = {shown}"));
        }
    }

    /// The file currently receiving log lines, if any
    pub fn log_path(&self) -> Option<PathBuf> {
        self.log.path()
    }

    /// Forces out anything the deferred flush has not written yet
    pub fn flush_log(&self) {
        self.log.flush();
    }
}

/// Parses `-name` / `-name=value` tokens. At most one leading dash is
/// stripped, the first `=` separates name from value, and tokens without a
/// dash are still accepted as names.
fn parse_command_line(tokens: &[String]) -> Vec<(String, String)> {
    let mut params: Vec<(String, String)> = Vec::new();
    for token in tokens {
        let stripped = token.strip_prefix('-').unwrap_or(token);
        let (name, value) = match stripped.split_once('=') {
            Some((name, value)) => (name.to_lowercase(), value.to_string()),
            None => (stripped.to_lowercase(), String::new()),
        };
        if let Some(slot) = params.iter_mut().find(|(k, _)| *k == name) {
            slot.1 = value;
        } else {
            params.push((name, value));
        }
    }
    params
}
