//! Compiled condition descriptors.
//!
//! A [`Condition`] is built once per filter field when a
//! [`Predicate`](crate::Predicate) is compiled and is read-only afterwards.

use std::collections::BTreeMap;
use std::fmt;

use crate::error::{FilterError, Result};
use crate::op::Operator;
use crate::value::ValueType;

/// Named parameters from the `params=` annotation key.
///
/// The text is a space-separated list of `key:value` pairs, split on the
/// first colon so `delimiter::` sets the delimiter to `:`. Recognized keys:
///
/// - `delimiter`: separator for range and list strings (default `,`)
/// - `type`: parse hint for string endpoints and list elements
/// - `default`: substitute for a present but empty string value
///
/// Other keys are kept and available through [`Params::get`].
///
/// Commas inside `params=` survive annotation parsing: unkeyed segments that
/// follow it are appended to the params text, as in
/// `between,params=type:int default:0,10`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Params {
    delimiter: Option<String>,
    value_type: Option<ValueType>,
    default: Option<String>,
    extra: BTreeMap<String, String>,
}

impl Params {
    /// Delimiter used when none is declared.
    pub const DEFAULT_DELIMITER: &'static str = ",";

    /// Parses a `params` specification.
    ///
    /// ```
    /// use searchkit::{Params, ValueType};
    ///
    /// let params = Params::parse("type:date delimiter::").unwrap();
    /// assert_eq!(params.value_type(), Some(ValueType::Date));
    /// assert_eq!(params.delimiter(), ":");
    /// ```
    pub fn parse(spec: &str) -> Result<Self> {
        let mut params = Params::default();
        for pair in spec.split_whitespace() {
            let (key, value) = pair
                .split_once(':')
                .filter(|(key, value)| !key.is_empty() && !value.is_empty())
                .ok_or_else(|| FilterError::MalformedAnnotation(pair.to_string()))?;
            match key {
                "delimiter" => params.delimiter = Some(value.to_string()),
                "type" => params.value_type = Some(value.parse()?),
                "default" => params.default = Some(value.to_string()),
                _ => {
                    params.extra.insert(key.to_string(), value.to_string());
                }
            }
        }
        Ok(params)
    }

    /// Separator for range and list strings.
    pub fn delimiter(&self) -> &str {
        self.delimiter.as_deref().unwrap_or(Self::DEFAULT_DELIMITER)
    }

    /// Declared parse hint, if any.
    pub fn value_type(&self) -> Option<ValueType> {
        self.value_type
    }

    /// Substitute text for an empty string value, if any.
    pub fn default_value(&self) -> Option<&str> {
        self.default.as_deref()
    }

    /// Looks up any parameter by key, recognized or not.
    pub fn get(&self, key: &str) -> Option<&str> {
        match key {
            "delimiter" => self.delimiter.as_deref(),
            "type" => self.value_type.map(ValueType::as_str),
            "default" => self.default.as_deref(),
            _ => self.extra.get(key).map(String::as_str),
        }
    }
}

/// One filter field compiled against its annotation.
#[derive(Debug, Clone, PartialEq)]
pub struct Condition {
    pub(crate) field_path: Vec<usize>,
    pub(crate) field_name: String,
    pub(crate) columns: Vec<String>,
    pub(crate) operator: Operator,
    pub(crate) alias: Option<String>,
    pub(crate) params: Params,
}

impl Condition {
    /// Field indices from the root filter down to this field.
    pub fn field_path(&self) -> &[usize] {
        &self.field_path
    }

    /// Dotted field name, e.g. `author.name` for a dived field.
    pub fn field_name(&self) -> &str {
        &self.field_name
    }

    /// Target columns; never empty.
    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    /// First target column.
    pub fn column(&self) -> &str {
        &self.columns[0]
    }

    pub fn operator(&self) -> Operator {
        self.operator
    }

    /// Explicit table alias, overriding the caller's default.
    pub fn alias(&self) -> Option<&str> {
        self.alias.as_deref()
    }

    pub fn params(&self) -> &Params {
        &self.params
    }
}

impl fmt::Display for Condition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(alias) = &self.alias {
            write!(f, "{}.", alias)?;
        }
        write!(f, "{} {}", self.columns.join("|"), self.operator)
    }
}
