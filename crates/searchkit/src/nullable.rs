//! Nullable wrappers that separate "not supplied" from "zero".
//!
//! A plain `i32` filter field is always present, so `0` constrains the query.
//! Wrapping it in [`Null`] makes presence explicit: an invalid `Null` skips
//! its condition whatever the operator, a valid one passes its value through
//! even when that value is zero or empty.

use std::fmt;

use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use rust_decimal::Decimal;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::value::{FilterValue, Value};

/// Presence capability shared by every nullable wrapper.
///
/// Implement this for a custom wrapper and forward [`FilterValue`] through
/// [`nullable_value`] to make it usable as a filter field.
pub trait Nullable {
    /// The wrapped type.
    type Inner: FilterValue;

    /// Returns `true` if the wrapper holds a supplied value.
    fn present(&self) -> bool;

    /// Returns the wrapped value. Meaningless when [`present`](Self::present)
    /// is `false`.
    fn value(&self) -> &Self::Inner;
}

/// Resolves a nullable wrapper: the validity flag alone decides presence.
pub fn nullable_value<N: Nullable + ?Sized>(nullable: &N) -> Option<Value<'_>> {
    if nullable.present() {
        nullable.value().filter_value()
    } else {
        None
    }
}

/// A value paired with an explicit validity flag.
///
/// Deserializes from an optional value: `null` or a missing field (with
/// `#[serde(default)]`) produce an invalid wrapper.
///
/// # Example
///
/// ```
/// use searchkit::{FilterValue, Null, Value, Number};
///
/// let unset: Null<i32> = Null::null();
/// assert_eq!(unset.filter_value(), None);
///
/// let zero = Null::new(0i32);
/// assert_eq!(zero.filter_value(), Some(Value::Number(Number::I64(0))));
/// ```
#[derive(Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct Null<T> {
    value: T,
    valid: bool,
}

impl<T> Null<T> {
    /// Creates a valid wrapper.
    pub fn new(value: T) -> Self {
        Null { value, valid: true }
    }

    /// Creates an invalid wrapper holding `T::default()`.
    pub fn null() -> Self
    where
        T: Default,
    {
        Null {
            value: T::default(),
            valid: false,
        }
    }

    /// Returns `true` if the wrapper holds a supplied value.
    pub fn is_valid(&self) -> bool {
        self.valid
    }

    /// Returns the value if valid.
    pub fn get(&self) -> Option<&T> {
        self.valid.then_some(&self.value)
    }

    /// Converts into an `Option`, dropping the stored value if invalid.
    pub fn into_option(self) -> Option<T> {
        self.valid.then_some(self.value)
    }
}

impl<T: Default> From<Option<T>> for Null<T> {
    fn from(value: Option<T>) -> Self {
        match value {
            Some(v) => Null::new(v),
            None => Null::null(),
        }
    }
}

impl<T: fmt::Debug> fmt::Debug for Null<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.valid {
            f.debug_tuple("Null").field(&self.value).finish()
        } else {
            f.write_str("Null(<unset>)")
        }
    }
}

impl<T: FilterValue> Nullable for Null<T> {
    type Inner = T;

    fn present(&self) -> bool {
        self.valid
    }

    fn value(&self) -> &T {
        &self.value
    }
}

impl<T: FilterValue> FilterValue for Null<T> {
    fn filter_value(&self) -> Option<Value<'_>> {
        nullable_value(self)
    }
}

impl<T: Serialize> Serialize for Null<T> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.get().serialize(serializer)
    }
}

impl<'de, T: Deserialize<'de> + Default> Deserialize<'de> for Null<T> {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        Option::<T>::deserialize(deserializer).map(Null::from)
    }
}

pub type NullString = Null<String>;
pub type NullInt16 = Null<i16>;
pub type NullInt32 = Null<i32>;
pub type NullInt64 = Null<i64>;
pub type NullFloat64 = Null<f64>;
pub type NullBool = Null<bool>;
pub type NullByte = Null<u8>;
pub type NullDate = Null<NaiveDate>;
pub type NullTime = Null<NaiveTime>;
pub type NullDateTime = Null<NaiveDateTime>;
pub type NullDecimal = Null<Decimal>;
