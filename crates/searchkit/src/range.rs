//! Range values and their three accepted encodings.
//!
//! A range-family condition accepts:
//!
//! 1. an explicit [`Between`] record (`Value::Range`),
//! 2. a delimited string such as `"10,20"` or `"2024-01-01:2024-01-31"`,
//!    split once on the condition's delimiter and parsed per its type hint,
//! 3. a two-element sequence (`Value::List` of length 2), used as-is.
//!
//! Anything else is reported and the condition is skipped.

use std::borrow::Cow;

use serde::{Deserialize, Serialize};

use crate::condition::Params;
use crate::error::{FilterError, Result};
use crate::value::{FilterValue, Value};

/// Explicit two-endpoint range record.
///
/// Both endpoints must be present for the range to be present: a
/// `Between<Option<T>>` with either side `None` skips its condition.
///
/// # Example
///
/// ```
/// use searchkit::{Between, FilterValue, Value, Number};
///
/// let span = Between::new(1u32, 9u32);
/// assert_eq!(
///     span.filter_value(),
///     Some(Value::range(Value::Number(Number::U64(1)), Value::Number(Number::U64(9))))
/// );
/// ```
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Between<T> {
    pub start: T,
    pub end: T,
}

impl<T> Between<T> {
    pub fn new(start: T, end: T) -> Self {
        Between { start, end }
    }
}

impl<T: FilterValue> FilterValue for Between<T> {
    fn filter_value(&self) -> Option<Value<'_>> {
        let start = self.start.filter_value()?;
        let end = self.end.filter_value()?;
        Some(Value::range(start, end))
    }
}

/// Start and end of a parsed range.
pub type Bounds<'a> = (Value<'a>, Value<'a>);

/// Interprets `value` as a range.
///
/// Returns `Ok(None)` for a blank string or an empty sequence, which means
/// the caller left the field blank and the condition is quietly skipped.
/// Any other sequence length is a [`FilterError::RangeArity`].
pub fn parse_range<'a>(value: Value<'a>, params: &Params) -> Result<Option<Bounds<'a>>> {
    match value {
        Value::Range(bounds) => Ok(Some(*bounds)),
        Value::String(text) if text.trim().is_empty() => Ok(None),
        Value::String(text) => split_range(text, params).map(Some),
        Value::List(items) if items.is_empty() => Ok(None),
        Value::List(items) => {
            let found = items.len();
            let mut items = items.into_iter();
            match (items.next(), items.next(), items.next()) {
                (Some(start), Some(end), None) => Ok(Some((start, end))),
                _ => Err(FilterError::RangeArity { found }),
            }
        }
        other => Err(FilterError::NotARange {
            actual: other.kind(),
        }),
    }
}

fn split_range<'a>(text: Cow<'a, str>, params: &Params) -> Result<Bounds<'a>> {
    match text {
        Cow::Borrowed(text) => split_once(text, params),
        Cow::Owned(text) => {
            split_once(&text, params).map(|(start, end)| (start.into_owned(), end.into_owned()))
        }
    }
}

/// Splits a delimited range string once; further delimiters stay in the end
/// part, where the typed parse will reject them.
fn split_once<'a>(text: &'a str, params: &Params) -> Result<Bounds<'a>> {
    let (start, end) = text
        .split_once(params.delimiter())
        .ok_or(FilterError::RangeArity { found: 1 })?;
    Ok((endpoint(start, params)?, endpoint(end, params)?))
}

fn endpoint<'a>(text: &'a str, params: &Params) -> Result<Value<'a>> {
    match params.value_type() {
        Some(ty) => ty.parse(text),
        None => Ok(Value::from(text.trim())),
    }
}
