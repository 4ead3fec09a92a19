//! The per-field annotation grammar.
//!
//! ```text
//! annotation := "-" | "dive" | [shorthand] ("," key "=" value)*
//! key        := "column" | "operator" | "alias" | "params"
//! ```
//!
//! - `-` ignores the field and everything below it.
//! - `dive` recurses into a nested filter without a condition of its own.
//! - A leading unkeyed token is operator shorthand: `"contains,column=title"`.
//!   An explicit `operator=` always wins over the shorthand.
//! - `column` lists one or more targets separated by `|`.
//! - `params` holds space-separated `key:value` pairs, see
//!   [`Params`](crate::Params).

use std::sync::LazyLock;

use regex::Regex;

use crate::condition::Params;
use crate::error::{FilterError, Result};
use crate::op::Operator;

static IDENTIFIER: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[A-Za-z_][A-Za-z0-9_]*$").expect("identifier pattern is valid")
});

/// Parsed form of one field annotation.
#[derive(Debug, Clone, PartialEq)]
pub enum Annotation {
    /// `-`: the field and its subtree are excluded.
    Ignore,
    /// `dive`: recurse into the nested filter.
    Dive,
    /// A leaf field.
    Field(FieldSpec),
}

/// Settings for a leaf field. Unset parts fall back to defaults at compile
/// time: operator `eq`, column `snake_case(field name)`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FieldSpec {
    pub operator: Option<Operator>,
    pub columns: Vec<String>,
    pub alias: Option<String>,
    pub params: Params,
}

impl Annotation {
    /// Parses an annotation string. An empty string is a leaf with defaults.
    ///
    /// Unkeyed segments after `params=` continue the params text, so a
    /// `default` or `delimiter` may contain commas.
    ///
    /// ```
    /// use searchkit::{Annotation, Operator};
    ///
    /// let Annotation::Field(spec) = Annotation::parse("contains,column=title|body").unwrap() else {
    ///     unreachable!()
    /// };
    /// assert_eq!(spec.operator, Some(Operator::Contains));
    /// assert_eq!(spec.columns, ["title", "body"]);
    /// ```
    pub fn parse(text: &str) -> Result<Self> {
        let mut shorthand = None;
        let mut spec = FieldSpec::default();
        let mut params: Option<String> = None;
        let mut in_params = false;

        for (position, segment) in text.split(',').map(str::trim).enumerate() {
            if segment.is_empty() {
                continue;
            }

            let Some((key, value)) = segment.split_once('=') else {
                if let Some(params) = params.as_mut().filter(|_| in_params) {
                    params.push(',');
                    params.push_str(segment);
                    continue;
                }
                if position > 0 {
                    return Err(FilterError::MalformedAnnotation(segment.to_string()));
                }
                match segment {
                    "-" => return Ok(Annotation::Ignore),
                    "dive" => return Ok(Annotation::Dive),
                    _ => shorthand = Some(segment.parse::<Operator>()?),
                }
                continue;
            };

            let value = value.trim();
            in_params = false;
            match key.trim() {
                "column" | "columns" => {
                    spec.columns = value
                        .split('|')
                        .map(str::trim)
                        .filter(|column| !column.is_empty())
                        .map(identifier)
                        .collect::<Result<_>>()?;
                }
                "operator" | "op" => spec.operator = Some(value.parse()?),
                "alias" => spec.alias = Some(identifier(value)?),
                "params" => {
                    params = Some(value.to_string());
                    in_params = true;
                }
                _ => return Err(FilterError::MalformedAnnotation(segment.to_string())),
            }
        }

        if let Some(params) = params {
            spec.params = Params::parse(&params)?;
        }
        spec.operator = spec.operator.or(shorthand);
        Ok(Annotation::Field(spec))
    }
}

/// Accepts plain SQL identifiers only.
fn identifier(name: &str) -> Result<String> {
    if IDENTIFIER.is_match(name) {
        Ok(name.to_string())
    } else {
        Err(FilterError::InvalidIdentifier(name.to_string()))
    }
}

/// Returns `true` if `name` is usable as a column or alias.
pub fn is_identifier(name: &str) -> bool {
    IDENTIFIER.is_match(name)
}

/// Converts a field name to `snake_case`.
///
/// Word boundaries are lower-to-upper transitions and the last capital of an
/// acronym followed by a lowercase letter: `createdAt` → `created_at`,
/// `HTTPStatus` → `http_status`. A raw identifier prefix (`r#`) is dropped.
pub fn snake_case(name: &str) -> String {
    let name = name.strip_prefix("r#").unwrap_or(name);
    let chars: Vec<char> = name.chars().collect();
    let mut out = String::with_capacity(name.len() + 4);

    for (i, &c) in chars.iter().enumerate() {
        if c == '-' || c == ' ' {
            out.push('_');
            continue;
        }
        if c.is_uppercase() {
            let prev = i.checked_sub(1).map(|p| chars[p]);
            let next = chars.get(i + 1).copied();
            let boundary = match prev {
                Some(p) if p.is_lowercase() || p.is_ascii_digit() => true,
                Some(p) if p.is_uppercase() => next.is_some_and(char::is_lowercase),
                _ => false,
            };
            if boundary && !out.ends_with('_') {
                out.push('_');
            }
            out.extend(c.to_lowercase());
        } else {
            out.push(c);
        }
    }

    out
}
