//! Searchkit - compile annotated filter structs into query conditions.
//!
//! A search endpoint usually receives a struct of optional criteria and turns
//! each populated field into a `WHERE` clause. Searchkit does that mapping
//! declaratively: annotate the struct once, compile it into a [`Predicate`],
//! and apply the predicate to any number of filter values. It supports:
//!
//! - 24 operators in five families: comparison, range, set, null, pattern
//! - Ranges given as a [`Between`] record, a delimited string or a pair
//! - Nullable wrappers ([`Null`]) whose invalid state means "not supplied"
//! - Nested filter records (`dive`) and ignored fields (`-`)
//! - One pattern matched against several columns, OR-combined
//!
//! Searchkit never writes SQL. It drives a [`ConditionBuilder`] that you
//! implement over your query builder of choice; [`Recorder`] is a ready-made
//! one that records calls as data.
//!
//! # Quick Start
//!
//! ```rust
//! use searchkit::{Between, Call, Filter, NullString, Operator, Predicate, Recorder, Value, Number};
//!
//! #[derive(Filter, Default)]
//! struct PostSearch {
//!     #[search("contains,column=title|body")]
//!     q: String,
//!     #[search("in,params=type:int")]
//!     author_id: String,
//!     #[search("between")]
//!     likes: Option<Between<i64>>,
//!     status: NullString,
//! }
//!
//! let predicate = Predicate::<PostSearch>::compile();
//!
//! let filter = PostSearch {
//!     author_id: "3,4".into(),
//!     likes: Some(Between::new(10, 100)),
//!     ..Default::default()
//! };
//!
//! let mut recorder = Recorder::new();
//! predicate.apply(&mut recorder, &filter, Some("p"));
//!
//! assert_eq!(
//!     recorder.calls()[0],
//!     Call::Set {
//!         op: Operator::In,
//!         column: "p.author_id".into(),
//!         values: vec![Value::Number(Number::I64(3)), Value::Number(Number::I64(4))],
//!     }
//! );
//! assert_eq!(recorder.len(), 2);
//! ```
//!
//! # Annotation Grammar
//!
//! ```text
//! #[search("<operator>,column=a|b,alias=t,params=type:date delimiter::")]
//! #[search("-")]       field is ignored
//! #[search("dive")]    field is a nested filter record
//! ```
//!
//! The first segment may be a bare operator. Every later segment is
//! `key=value`:
//!
//! | Key | Meaning | Default |
//! |-----|---------|---------|
//! | `operator` | operator name, overrides the bare one | `eq` |
//! | `column` | target column, `|`-separated for pattern operators | field name in snake_case |
//! | `alias` | table alias | caller's alias |
//! | `params` | space-separated `key:value` pairs | none |
//!
//! # Operators
//!
//! | Family | Operators | Value |
//! |--------|-----------|-------|
//! | Comparison | `eq`, `neq`, `gt`, `gte`, `lt`, `lte` | any |
//! | Range | `between`, `notBetween` | `Between`, `"a,b"`, 2-element list |
//! | Set | `in`, `notIn` | `"a,b,c"` or a list |
//! | Null | `isNull`, `isNotNull` | `true` fires, anything else is a no-op |
//! | Pattern | `[not][i]contains`, `[not][i]startsWith`, `[not][i]endsWith` | non-empty string |
//!
//! # Diagnostics
//!
//! Neither compiling nor applying ever fails. Malformed annotations and
//! malformed values drop the affected condition and are reported to a
//! [`Diagnostics`] sink, [`TracingDiagnostics`] unless another is configured
//! through [`Predicate::builder`].

mod annotation;
mod builder;
mod compile;
mod condition;
mod diagnostics;
mod dispatch;
mod error;
mod extract;
mod nullable;
mod op;
mod predicate;
mod range;
mod recorder;
mod shape;
mod value;

// Re-export public API
pub use annotation::{is_identifier, snake_case, Annotation, FieldSpec};
pub use builder::ConditionBuilder;
pub use compile::{compile_shape, MAX_DEPTH};
pub use condition::{Condition, Params};
pub use diagnostics::{Diagnostic, Diagnostics, Skip, TracingDiagnostics};
pub use dispatch::{dispatch, qualify, Dispatch};
pub use error::{FilterError, Result};
pub use extract::resolve;
pub use nullable::{
    nullable_value, Null, NullBool, NullByte, NullDate, NullDateTime, NullDecimal, NullFloat64,
    NullInt16, NullInt32, NullInt64, NullString, NullTime, Nullable,
};
pub use op::{Family, MatchKind, Operator, Pattern};
pub use predicate::{Predicate, PredicateBuilder};
pub use range::{parse_range, Between, Bounds};
pub use recorder::{Call, Recorder};
pub use shape::{Field, FieldDef, FieldKind, Fields, Filter, Shape};
pub use value::{FilterValue, Number, Value, ValueType};

#[cfg(feature = "derive")]
pub use searchkit_macros::Filter;
