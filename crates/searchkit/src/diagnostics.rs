//! Diagnostics sink for skipped conditions.
//!
//! Compiling and applying a filter never fails. Problems are reported here
//! instead: a [`Diagnostic`] for anything malformed (annotation or user
//! input), a [`Skip`] for the ordinary "nothing to filter on" cases.

use std::fmt;

use crate::error::FilterError;

/// A condition that was dropped because something was malformed.
#[derive(Debug, Clone, PartialEq)]
pub struct Diagnostic {
    /// Type name of the filter.
    pub filter: &'static str,
    /// Dotted field name; empty for type-level problems.
    pub field: String,
    pub error: FilterError,
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.field.is_empty() {
            write!(f, "{}: {}", self.filter, self.error)
        } else {
            write!(f, "{}.{}: {}", self.filter, self.field, self.error)
        }
    }
}

/// Why a well-formed condition produced no builder call.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Skip {
    /// The field was not supplied.
    NotPresent,
    /// Pattern or range text, or a range sequence, was empty.
    EmptyText,
    /// The membership list had no elements.
    EmptyList,
    /// A null-check field was not `true`.
    GateClosed,
}

impl Skip {
    pub fn as_str(self) -> &'static str {
        match self {
            Skip::NotPresent => "not present",
            Skip::EmptyText => "empty text",
            Skip::EmptyList => "empty list",
            Skip::GateClosed => "gate closed",
        }
    }
}

impl fmt::Display for Skip {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Receives diagnostics from compiling and applying predicates.
///
/// Injected through [`PredicateBuilder::diagnostics`](crate::PredicateBuilder::diagnostics);
/// defaults to [`TracingDiagnostics`].
pub trait Diagnostics: Send + Sync {
    /// A condition was dropped because something was malformed.
    fn warn(&self, diagnostic: &Diagnostic);

    /// A condition produced no call for an ordinary reason.
    fn skipped(&self, _filter: &'static str, _field: &str, _reason: Skip) {}
}

/// Sends diagnostics to `tracing`: warnings at `WARN`, skips at `DEBUG`.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingDiagnostics;

impl Diagnostics for TracingDiagnostics {
    fn warn(&self, diagnostic: &Diagnostic) {
        tracing::warn!(
            filter = diagnostic.filter,
            field = %diagnostic.field,
            error = %diagnostic.error,
            "search condition skipped"
        );
    }

    fn skipped(&self, filter: &'static str, field: &str, reason: Skip) {
        tracing::debug!(
            filter = filter,
            field = field,
            reason = reason.as_str(),
            "search condition not applied"
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_includes_field_when_known() {
        let diagnostic = Diagnostic {
            filter: "PostSearch",
            field: "created".to_string(),
            error: FilterError::RangeArity { found: 1 },
        };
        assert_eq!(
            diagnostic.to_string(),
            "PostSearch.created: range expects 2 endpoints, got 1"
        );

        let diagnostic = Diagnostic {
            filter: "u32",
            field: String::new(),
            error: FilterError::NotARecord { type_name: "u32" },
        };
        assert!(diagnostic.to_string().starts_with("u32: u32 is not a record"));
    }

    #[test]
    fn tracing_sink_accepts_events_without_subscriber() {
        let sink = TracingDiagnostics;
        sink.warn(&Diagnostic {
            filter: "F",
            field: "x".to_string(),
            error: FilterError::DiveOnLeaf,
        });
        sink.skipped("F", "x", Skip::EmptyText);
    }
}
