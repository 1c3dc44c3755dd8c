//! Diagnostic sink shared by the register files.
//!
//! Two severities: advisory (`warn`, execution continues) and fatal
//! (`fatal`, the run is aborted and the call never returns).

use std::fmt;

use log::{error, warn};

pub trait Reporter {
    fn warn(&self, args: fmt::Arguments<'_>);
    fn fatal(&self, args: fmt::Arguments<'_>) -> !;
}

/// Production reporter: forwards to the `log` facade and panics on fatal.
#[derive(Debug, Default, Clone, Copy)]
pub struct LogReporter;

impl Reporter for LogReporter {
    fn warn(&self, args: fmt::Arguments<'_>) {
        warn!("{}", args);
    }

    fn fatal(&self, args: fmt::Arguments<'_>) -> ! {
        let msg = args.to_string();
        error!("{}", msg);
        panic!("{}", msg);
    }
}

#[cfg(test)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    Warn,
    Fatal,
}

/// Records every diagnostic so tests can assert on them.
#[cfg(test)]
#[derive(Debug, Default)]
pub struct CaptureReporter {
    records: std::cell::RefCell<Vec<(Severity, String)>>,
}

#[cfg(test)]
impl CaptureReporter {
    pub fn new() -> std::rc::Rc<Self> {
        std::rc::Rc::new(Self::default())
    }

    pub fn records(&self) -> Vec<(Severity, String)> {
        self.records.borrow().clone()
    }

    pub fn count(&self, severity: Severity) -> usize {
        self.records.borrow().iter().filter(|(s, _)| *s == severity).count()
    }
}

#[cfg(test)]
impl Reporter for CaptureReporter {
    fn warn(&self, args: fmt::Arguments<'_>) {
        self.records.borrow_mut().push((Severity::Warn, args.to_string()));
    }

    fn fatal(&self, args: fmt::Arguments<'_>) -> ! {
        let msg = args.to_string();
        self.records.borrow_mut().push((Severity::Fatal, msg.clone()));
        panic!("{}", msg);
    }
}
