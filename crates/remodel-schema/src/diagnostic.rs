use derive_more::Display;
use serde::Serialize;
use std::fmt;

///
/// Severity
///

#[derive(Clone, Copy, Debug, Display, Eq, PartialEq, Serialize)]
pub enum Severity {
    #[display("error")]
    Error,

    #[display("warning")]
    Warning,
}

///
/// Diagnostic
///
/// One recorded problem, attached to the declaration or property it was
/// found on. Diagnostics are data: they are collected and returned from
/// every component boundary, never thrown as control flow.
///

#[derive(Clone, Debug, Serialize)]
pub struct Diagnostic {
    pub severity: Severity,
    pub subject: String,
    pub message: String,
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}: {}", self.severity, self.subject, self.message)
    }
}

///
/// Diagnostics
///
/// Append-only accumulator for one processing run. The full batch is
/// rendered together at the end so a user sees every problem in one pass.
///

#[derive(Clone, Debug, Default, Serialize)]
pub struct Diagnostics {
    items: Vec<Diagnostic>,
}

impl Diagnostics {
    #[must_use]
    pub const fn new() -> Self {
        Self { items: Vec::new() }
    }

    pub fn error(&mut self, subject: impl Into<String>, message: impl Into<String>) {
        self.items.push(Diagnostic {
            severity: Severity::Error,
            subject: subject.into(),
            message: message.into(),
        });
    }

    pub fn warning(&mut self, subject: impl Into<String>, message: impl Into<String>) {
        self.items.push(Diagnostic {
            severity: Severity::Warning,
            subject: subject.into(),
            message: message.into(),
        });
    }

    pub fn merge(&mut self, other: Self) {
        self.items.extend(other.items);
    }

    #[must_use]
    pub fn has_errors(&self) -> bool {
        self.items
            .iter()
            .any(|d| d.severity == Severity::Error)
    }

    #[must_use]
    pub fn errors(&self) -> impl Iterator<Item = &Diagnostic> {
        self.items.iter().filter(|d| d.severity == Severity::Error)
    }

    #[must_use]
    pub fn warnings(&self) -> impl Iterator<Item = &Diagnostic> {
        self.items
            .iter()
            .filter(|d| d.severity == Severity::Warning)
    }

    #[must_use]
    pub fn iter(&self) -> std::slice::Iter<'_, Diagnostic> {
        self.items.iter()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

impl fmt::Display for Diagnostics {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for item in &self.items {
            writeln!(f, "{item}")?;
        }
        Ok(())
    }
}

impl<'a> IntoIterator for &'a Diagnostics {
    type Item = &'a Diagnostic;
    type IntoIter = std::slice::Iter<'a, Diagnostic>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.iter()
    }
}

/// Record an error diagnostic with format arguments.
#[macro_export]
macro_rules! err {
    ($diags:expr, $subject:expr, $($arg:tt)+) => {
        $diags.error($subject, format!($($arg)+))
    };
}

/// Record a warning diagnostic with format arguments.
#[macro_export]
macro_rules! warning {
    ($diags:expr, $subject:expr, $($arg:tt)+) => {
        $diags.warning($subject, format!($($arg)+))
    };
}
