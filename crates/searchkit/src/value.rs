//! Runtime value types for filter fields.
//!
//! The [`Value`] enum is what the value extractor hands to the dispatcher and
//! what a [`ConditionBuilder`](crate::ConditionBuilder) finally receives.
//! Field types opt in through [`FilterValue`], which also decides presence:
//! `None` means "the caller did not supply this field".

use std::borrow::Cow;
use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, NaiveDate, NaiveDateTime, NaiveTime, Utc};
use rust_decimal::Decimal;

use crate::error::{FilterError, Result};

/// Resolved value of a filter field, borrowed from the filter instance where
/// possible.
#[derive(Debug, Clone, PartialEq)]
pub enum Value<'a> {
    /// String value, usually borrowed from the filter.
    String(Cow<'a, str>),
    /// Numeric value.
    Number(Number),
    /// Boolean value.
    Bool(bool),
    /// Exact decimal value.
    Decimal(Decimal),
    /// Calendar date.
    Date(NaiveDate),
    /// Wall-clock time.
    Time(NaiveTime),
    /// Date and time, no zone.
    DateTime(NaiveDateTime),
    /// Sequence of values.
    List(Vec<Value<'a>>),
    /// Explicit two-endpoint record.
    Range(Box<(Value<'a>, Value<'a>)>),
}

impl<'a> Value<'a> {
    /// Builds a range value from its endpoints.
    pub fn range(start: Value<'a>, end: Value<'a>) -> Self {
        Value::Range(Box::new((start, end)))
    }

    /// Returns `true` if this is a `String` value.
    pub fn is_string(&self) -> bool {
        matches!(self, Value::String(_))
    }

    /// Extracts the string value, if present.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::String(s) => Some(&**s),
            _ => None,
        }
    }

    /// Extracts the number value, if present.
    pub fn as_number(&self) -> Option<Number> {
        match self {
            Value::Number(n) => Some(*n),
            _ => None,
        }
    }

    /// Extracts the boolean value, if present.
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Bool(b) => Some(*b),
            _ => None,
        }
    }

    /// Extracts the list elements, if present.
    pub fn as_list(&self) -> Option<&[Value<'a>]> {
        match self {
            Value::List(items) => Some(items),
            _ => None,
        }
    }

    /// Detaches the value from the filter it was borrowed from.
    pub fn into_owned(self) -> Value<'static> {
        match self {
            Value::String(s) => Value::String(Cow::Owned(s.into_owned())),
            Value::Number(n) => Value::Number(n),
            Value::Bool(b) => Value::Bool(b),
            Value::Decimal(d) => Value::Decimal(d),
            Value::Date(d) => Value::Date(d),
            Value::Time(t) => Value::Time(t),
            Value::DateTime(dt) => Value::DateTime(dt),
            Value::List(items) => Value::List(items.into_iter().map(Value::into_owned).collect()),
            Value::Range(bounds) => {
                let (start, end) = *bounds;
                Value::range(start.into_owned(), end.into_owned())
            }
        }
    }

    /// Short name of the value's kind, for diagnostics.
    pub fn kind(&self) -> &'static str {
        match self {
            Value::String(_) => "string",
            Value::Number(_) => "number",
            Value::Bool(_) => "bool",
            Value::Decimal(_) => "decimal",
            Value::Date(_) => "date",
            Value::Time(_) => "time",
            Value::DateTime(_) => "datetime",
            Value::List(_) => "list",
            Value::Range(_) => "range",
        }
    }
}

impl fmt::Display for Value<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::String(s) => write!(f, "{:?}", s),
            Value::Number(n) => write!(f, "{}", n),
            Value::Bool(b) => write!(f, "{}", b),
            Value::Decimal(d) => write!(f, "{}", d),
            Value::Date(d) => write!(f, "{}", d),
            Value::Time(t) => write!(f, "{}", t),
            Value::DateTime(dt) => write!(f, "{}", dt),
            Value::List(items) => {
                f.write_str("[")?;
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{}", item)?;
                }
                f.write_str("]")
            }
            Value::Range(bounds) => write!(f, "{}..={}", bounds.0, bounds.1),
        }
    }
}

impl<'a> From<&'a str> for Value<'a> {
    fn from(s: &'a str) -> Self {
        Value::String(Cow::Borrowed(s))
    }
}

impl From<String> for Value<'static> {
    fn from(s: String) -> Self {
        Value::String(Cow::Owned(s))
    }
}

impl From<bool> for Value<'static> {
    fn from(b: bool) -> Self {
        Value::Bool(b)
    }
}

impl From<Number> for Value<'static> {
    fn from(n: Number) -> Self {
        Value::Number(n)
    }
}

/// Numeric value supporting all common numeric types.
///
/// Numbers are stored in one of three variants to preserve precision:
/// - `I64` for signed integers
/// - `U64` for unsigned integers
/// - `F64` for floating point
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Number {
    /// Signed 64-bit integer.
    I64(i64),
    /// Unsigned 64-bit integer.
    U64(u64),
    /// 64-bit floating point.
    F64(f64),
}

impl fmt::Display for Number {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Number::I64(n) => write!(f, "{}", n),
            Number::U64(n) => write!(f, "{}", n),
            Number::F64(n) => write!(f, "{}", n),
        }
    }
}

macro_rules! number_from {
    ($variant:ident as $wide:ty: $($t:ty),*) => {
        $(
            impl From<$t> for Number {
                fn from(n: $t) -> Self {
                    Number::$variant(n as $wide)
                }
            }
        )*
    };
}

number_from!(I64 as i64: i8, i16, i32, i64, isize);
number_from!(U64 as u64: u8, u16, u32, u64, usize);
number_from!(F64 as f64: f32, f64);

/// Type hint for parsing textual values (`params=type:<hint>`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ValueType {
    Int,
    Decimal,
    Date,
    Time,
    DateTime,
}

const DATE_FORMAT: &str = "%Y-%m-%d";
const TIME_FORMATS: &[&str] = &["%H:%M:%S%.f", "%H:%M"];
const DATETIME_FORMATS: &[&str] = &["%Y-%m-%d %H:%M:%S%.f", "%Y-%m-%dT%H:%M:%S%.f"];

impl ValueType {
    /// Returns the annotation name of this hint.
    pub fn as_str(self) -> &'static str {
        match self {
            ValueType::Int => "int",
            ValueType::Decimal => "decimal",
            ValueType::Date => "date",
            ValueType::Time => "time",
            ValueType::DateTime => "datetime",
        }
    }

    /// Parses `text` (surrounding whitespace ignored) as a value of this type.
    ///
    /// Accepted layouts:
    /// - `int`: base-10 `i64`
    /// - `decimal`: plain or scientific notation
    /// - `date`: `YYYY-MM-DD`
    /// - `time`: `HH:MM[:SS[.fff]]`
    /// - `datetime`: `YYYY-MM-DD HH:MM:SS[.fff]`, the same with a `T`
    ///   separator, or RFC 3339 with an offset (normalized to UTC)
    pub fn parse(self, text: &str) -> Result<Value<'static>> {
        let text = text.trim();
        let parsed = match self {
            ValueType::Int => text.parse::<i64>().ok().map(|n| Value::Number(n.into())),
            ValueType::Decimal => Decimal::from_str(text)
                .or_else(|_| Decimal::from_scientific(text))
                .ok()
                .map(Value::Decimal),
            ValueType::Date => NaiveDate::parse_from_str(text, DATE_FORMAT)
                .ok()
                .map(Value::Date),
            ValueType::Time => TIME_FORMATS
                .iter()
                .find_map(|fmt| NaiveTime::parse_from_str(text, fmt).ok())
                .map(Value::Time),
            ValueType::DateTime => DATETIME_FORMATS
                .iter()
                .find_map(|fmt| NaiveDateTime::parse_from_str(text, fmt).ok())
                .or_else(|| {
                    DateTime::parse_from_rfc3339(text)
                        .ok()
                        .map(|dt| dt.naive_utc())
                })
                .map(Value::DateTime),
        };
        parsed.ok_or_else(|| FilterError::Parse {
            input: text.to_string(),
            expected: self,
        })
    }
}

impl fmt::Display for ValueType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ValueType {
    type Err = FilterError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "int" | "integer" => Ok(ValueType::Int),
            "decimal" | "numeric" => Ok(ValueType::Decimal),
            "date" => Ok(ValueType::Date),
            "time" => Ok(ValueType::Time),
            "datetime" | "timestamp" => Ok(ValueType::DateTime),
            _ => Err(FilterError::UnknownValueType(s.trim().to_string())),
        }
    }
}

/// Conversion from a filter field to a [`Value`].
///
/// Returning `None` means the field was not supplied and its condition is
/// skipped. Plain values are always present, zero and empty included;
/// [`Option`] and [`Null`](crate::Null) carry their own presence.
///
/// `#[derive(Filter)]` calls this for every leaf field, so a custom field
/// type only needs this impl to be usable in a filter.
///
/// # Example
///
/// ```
/// use searchkit::{FilterValue, Value};
///
/// struct Sku(String);
///
/// impl FilterValue for Sku {
///     fn filter_value(&self) -> Option<Value<'_>> {
///         Some(Value::from(self.0.as_str()))
///     }
/// }
///
/// assert_eq!(Sku("A-1".into()).filter_value(), Some(Value::from("A-1")));
/// ```
pub trait FilterValue {
    /// Returns the field's value, or `None` if it was not supplied.
    fn filter_value(&self) -> Option<Value<'_>>;
}

impl FilterValue for str {
    fn filter_value(&self) -> Option<Value<'_>> {
        Some(Value::from(self))
    }
}

impl FilterValue for String {
    fn filter_value(&self) -> Option<Value<'_>> {
        Some(Value::from(self.as_str()))
    }
}

impl FilterValue for bool {
    fn filter_value(&self) -> Option<Value<'_>> {
        Some(Value::Bool(*self))
    }
}

macro_rules! number_filter_value {
    ($($t:ty),*) => {
        $(
            impl FilterValue for $t {
                fn filter_value(&self) -> Option<Value<'_>> {
                    Some(Value::Number(Number::from(*self)))
                }
            }
        )*
    };
}

number_filter_value!(i8, i16, i32, i64, isize, u8, u16, u32, u64, usize, f32, f64);

impl FilterValue for Decimal {
    fn filter_value(&self) -> Option<Value<'_>> {
        Some(Value::Decimal(*self))
    }
}

impl FilterValue for NaiveDate {
    fn filter_value(&self) -> Option<Value<'_>> {
        Some(Value::Date(*self))
    }
}

impl FilterValue for NaiveTime {
    fn filter_value(&self) -> Option<Value<'_>> {
        Some(Value::Time(*self))
    }
}

impl FilterValue for NaiveDateTime {
    fn filter_value(&self) -> Option<Value<'_>> {
        Some(Value::DateTime(*self))
    }
}

impl FilterValue for DateTime<Utc> {
    fn filter_value(&self) -> Option<Value<'_>> {
        Some(Value::DateTime(self.naive_utc()))
    }
}

impl<T: FilterValue> FilterValue for Option<T> {
    fn filter_value(&self) -> Option<Value<'_>> {
        self.as_ref().and_then(FilterValue::filter_value)
    }
}

impl<T: FilterValue + ?Sized> FilterValue for &T {
    fn filter_value(&self) -> Option<Value<'_>> {
        (**self).filter_value()
    }
}

impl<T: FilterValue + ?Sized> FilterValue for Box<T> {
    fn filter_value(&self) -> Option<Value<'_>> {
        (**self).filter_value()
    }
}

/// A sequence is present only if every element is; one absent element makes
/// the whole field absent, so the element count seen downstream is the
/// caller's.
impl<T: FilterValue> FilterValue for [T] {
    fn filter_value(&self) -> Option<Value<'_>> {
        self.iter()
            .map(FilterValue::filter_value)
            .collect::<Option<Vec<_>>>()
            .map(Value::List)
    }
}

impl<T: FilterValue> FilterValue for Vec<T> {
    fn filter_value(&self) -> Option<Value<'_>> {
        self.as_slice().filter_value()
    }
}
