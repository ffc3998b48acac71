//! Error level and last-error state
//!
//! Every failure records its message. The error level then decides what
//! else happens:
//! - `silent`: nothing
//! - `warn`: the message goes to the [`Notifier`]
//! - `fatal`: the error is returned to the caller

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::LoadError;

/// How failures are surfaced
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ErrorLevel {
    #[default]
    #[serde(alias = "none")]
    Silent,
    Warn,
    #[serde(alias = "die")]
    Fatal,
}

impl FromStr for ErrorLevel {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "silent" | "none" => Ok(ErrorLevel::Silent),
            "warn" => Ok(ErrorLevel::Warn),
            "fatal" | "die" => Ok(ErrorLevel::Fatal),
            other => Err(format!(
                "Unknown error level: {other} (expected silent, warn or fatal)"
            )),
        }
    }
}

impl fmt::Display for ErrorLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ErrorLevel::Silent => "silent",
            ErrorLevel::Warn => "warn",
            ErrorLevel::Fatal => "fatal",
        };
        f.write_str(name)
    }
}

/// User-visible, non-fatal warning channel
pub trait Notifier {
    fn notify(&self, message: &str);
}

impl<F: Fn(&str)> Notifier for F {
    fn notify(&self, message: &str) {
        self(message)
    }
}

/// Emits warnings as `tracing` events
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingNotifier;

impl Notifier for TracingNotifier {
    fn notify(&self, message: &str) {
        tracing::warn!("{message}");
    }
}

/// Process-wide error configuration and last error message
pub struct Diagnostics {
    level: ErrorLevel,
    last_error: Option<String>,
    notifier: Box<dyn Notifier>,
}

impl Default for Diagnostics {
    fn default() -> Self {
        Self::new(ErrorLevel::default())
    }
}

impl Diagnostics {
    pub fn new(level: ErrorLevel) -> Self {
        Self {
            level,
            last_error: None,
            notifier: Box::new(TracingNotifier),
        }
    }

    /// Replace the warning channel
    pub fn with_notifier(mut self, notifier: impl Notifier + 'static) -> Self {
        self.notifier = Box::new(notifier);
        self
    }

    pub fn set_notifier(&mut self, notifier: impl Notifier + 'static) {
        self.notifier = Box::new(notifier);
    }

    pub fn level(&self) -> ErrorLevel {
        self.level
    }

    pub fn set_level(&mut self, level: ErrorLevel) {
        self.level = level;
    }

    /// Most recent error message, regardless of level
    pub fn last_error(&self) -> Option<&str> {
        self.last_error.as_deref()
    }

    /// Record a load error and act on it
    ///
    /// Returns `Err` only when the effective level (the override, else the
    /// configured level) is fatal.
    pub fn report(&mut self, error: LoadError, level: Option<ErrorLevel>) -> Result<(), LoadError> {
        let message = error.to_string();
        tracing::debug!(%message, "load error recorded");
        self.last_error = Some(message);

        match level.unwrap_or(self.level) {
            ErrorLevel::Silent => Ok(()),
            ErrorLevel::Warn => {
                if let Some(message) = &self.last_error {
                    self.notifier.notify(message);
                }
                Ok(())
            }
            ErrorLevel::Fatal => Err(error),
        }
    }

    /// Record a host-supplied message
    pub fn report_error(
        &mut self,
        message: impl Into<String>,
        level: Option<ErrorLevel>,
    ) -> Result<(), LoadError> {
        self.report(LoadError::Reported(message.into()), level)
    }
}

impl fmt::Debug for Diagnostics {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Diagnostics")
            .field("level", &self.level)
            .field("last_error", &self.last_error)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::rc::Rc;

    fn recording() -> (Rc<RefCell<Vec<String>>>, impl Notifier) {
        let seen = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&seen);
        (seen, move |msg: &str| sink.borrow_mut().push(msg.to_string()))
    }

    #[test]
    fn test_default_level_is_silent() {
        let mut diag = Diagnostics::default();
        assert_eq!(diag.level(), ErrorLevel::Silent);
        assert!(diag.report_error("quiet", None).is_ok());
        assert_eq!(diag.last_error(), Some("quiet"));
    }

    #[test]
    fn test_message_overwritten() {
        let mut diag = Diagnostics::default();
        diag.report_error("first", None).unwrap();
        diag.report_error("second", None).unwrap();
        assert_eq!(diag.last_error(), Some("second"));
    }

    #[test]
    fn test_warn_notifies() {
        let (seen, notifier) = recording();
        let mut diag = Diagnostics::new(ErrorLevel::Warn).with_notifier(notifier);

        assert!(diag.report_error("careful", None).is_ok());
        assert_eq!(*seen.borrow(), vec!["careful".to_string()]);
    }

    #[test]
    fn test_fatal_returns_error() {
        let mut diag = Diagnostics::new(ErrorLevel::Fatal);
        let err = diag.report_error("boom", None).unwrap_err();
        assert_eq!(err.to_string(), "boom");
        assert_eq!(diag.last_error(), Some("boom"));
    }

    #[test]
    fn test_override_beats_configured_level() {
        let (seen, notifier) = recording();
        let mut diag = Diagnostics::new(ErrorLevel::Fatal).with_notifier(notifier);

        assert!(diag.report_error("soft", Some(ErrorLevel::Silent)).is_ok());
        assert!(diag.report_error("loud", Some(ErrorLevel::Warn)).is_ok());
        assert_eq!(*seen.borrow(), vec!["loud".to_string()]);
    }

    #[test]
    fn test_parse_levels() {
        assert_eq!("none".parse::<ErrorLevel>(), Ok(ErrorLevel::Silent));
        assert_eq!("WARN".parse::<ErrorLevel>(), Ok(ErrorLevel::Warn));
        assert_eq!("die".parse::<ErrorLevel>(), Ok(ErrorLevel::Fatal));
        assert!("loud".parse::<ErrorLevel>().is_err());
    }
}
