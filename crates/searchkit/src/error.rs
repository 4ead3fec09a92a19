//! Error types for the searchkit crate.
//!
//! None of these abort a request. The compiler and the dispatcher report them
//! to a [`Diagnostics`](crate::Diagnostics) sink and skip the affected
//! condition; only the standalone parsing helpers return them directly.

use thiserror::Error;

use crate::op::Operator;
use crate::value::ValueType;

/// Problems found while compiling a filter type or applying a filter value.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FilterError {
    /// The filter type does not describe a record.
    #[error("{type_name} is not a record type, predicate will not constrain anything")]
    NotARecord { type_name: &'static str },

    /// The annotation names an operator that does not exist.
    #[error("unknown operator '{0}'")]
    UnknownOperator(String),

    /// The annotation names a value type hint that does not exist.
    #[error("unknown value type '{0}', expected one of: int, decimal, date, time, datetime")]
    UnknownValueType(String),

    /// An annotation segment could not be understood.
    #[error("malformed annotation segment '{0}'")]
    MalformedAnnotation(String),

    /// A column or alias is not a plain identifier.
    #[error("invalid identifier '{0}'")]
    InvalidIdentifier(String),

    /// Several columns were given for an operator that targets exactly one.
    #[error("operator '{op}' accepts a single column, got {count}")]
    MultiColumn { op: Operator, count: usize },

    /// A dive was requested on a field that is not a nested record.
    #[error("field is marked 'dive' but is not a nested filter record")]
    DiveOnLeaf,

    /// Dived records nest deeper than the compiler follows.
    #[error("nested filters deeper than {depth} levels are not compiled")]
    DepthLimit { depth: usize },

    /// A range did not have exactly two endpoints.
    #[error("range expects 2 endpoints, got {found}")]
    RangeArity { found: usize },

    /// A textual value could not be parsed as the requested type.
    #[error("cannot parse '{input}' as {expected}")]
    Parse { input: String, expected: ValueType },

    /// A range condition received a value that is not range-shaped.
    #[error("expected a range, got a {actual} value")]
    NotARange { actual: &'static str },

    /// The resolved value has a shape the operator family cannot use.
    #[error("operator '{op}' cannot use a {actual} value")]
    TypeMismatch { op: Operator, actual: &'static str },
}

/// Result type for searchkit parsing helpers.
pub type Result<T> = std::result::Result<T, FilterError>;
