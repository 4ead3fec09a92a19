//! Maps one resolved condition onto [`ConditionBuilder`] calls.
//!
//! Family rules:
//!
//! | Family | Accepts | Skips |
//! |--------|---------|-------|
//! | Comparison | any value | never |
//! | Range | [`Between`](crate::Between), delimited string, 2-element list | empty string or list |
//! | Set | delimited string, list | empty result |
//! | Null | `true` | anything else |
//! | Pattern | non-empty string | empty string |

use std::borrow::Cow;

use crate::builder::ConditionBuilder;
use crate::condition::{Condition, Params};
use crate::diagnostics::Skip;
use crate::error::{FilterError, Result};
use crate::op::{Operator, Pattern};
use crate::range::parse_range;
use crate::value::{Value, ValueType};

/// What a dispatched condition did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Dispatch {
    Applied,
    Skipped(Skip),
}

/// Issues the builder calls for `condition` given its resolved `value`.
///
/// An `Err` means the value was malformed for the operator; no call was made.
pub fn dispatch<'a, B: ConditionBuilder>(
    builder: &mut B,
    condition: &'a Condition,
    value: Value<'a>,
    default_alias: Option<&'a str>,
) -> Result<Dispatch> {
    let op = condition.operator();
    let params = condition.params();
    let alias = condition.alias().or(default_alias);
    let value = with_default(value, params);
    let column = qualify(condition.column(), alias);

    match op {
        Operator::Eq => builder.equals(&column, value),
        Operator::Neq => builder.not_equals(&column, value),
        Operator::Gt => builder.greater_than(&column, value),
        Operator::Gte => builder.greater_than_or_equal(&column, value),
        Operator::Lt => builder.less_than(&column, value),
        Operator::Lte => builder.less_than_or_equal(&column, value),

        Operator::Between | Operator::NotBetween => {
            let Some((start, end)) = parse_range(value, params)? else {
                return Ok(Dispatch::Skipped(Skip::EmptyText));
            };
            if op == Operator::Between {
                builder.between(&column, start, end);
            } else {
                builder.not_between(&column, start, end);
            }
        }

        Operator::In | Operator::NotIn => {
            let items = list_items(op, value, params)?;
            if items.is_empty() {
                return Ok(Dispatch::Skipped(Skip::EmptyList));
            }
            if op == Operator::In {
                builder.is_in(&column, items);
            } else {
                builder.not_in(&column, items);
            }
        }

        Operator::IsNull | Operator::IsNotNull => {
            if value != Value::Bool(true) {
                return Ok(Dispatch::Skipped(Skip::GateClosed));
            }
            if op == Operator::IsNull {
                builder.is_null(&column);
            } else {
                builder.is_not_null(&column);
            }
        }

        Operator::Contains => return like(builder, condition, value, alias, Pattern::CONTAINS),
        Operator::NotContains => {
            return like(builder, condition, value, alias, Pattern::NOT_CONTAINS)
        }
        Operator::IContains => return like(builder, condition, value, alias, Pattern::I_CONTAINS),
        Operator::NotIContains => {
            return like(builder, condition, value, alias, Pattern::NOT_I_CONTAINS)
        }
        Operator::StartsWith => return like(builder, condition, value, alias, Pattern::STARTS_WITH),
        Operator::NotStartsWith => {
            return like(builder, condition, value, alias, Pattern::NOT_STARTS_WITH)
        }
        Operator::IStartsWith => {
            return like(builder, condition, value, alias, Pattern::I_STARTS_WITH)
        }
        Operator::NotIStartsWith => {
            return like(builder, condition, value, alias, Pattern::NOT_I_STARTS_WITH)
        }
        Operator::EndsWith => return like(builder, condition, value, alias, Pattern::ENDS_WITH),
        Operator::NotEndsWith => {
            return like(builder, condition, value, alias, Pattern::NOT_ENDS_WITH)
        }
        Operator::IEndsWith => return like(builder, condition, value, alias, Pattern::I_ENDS_WITH),
        Operator::NotIEndsWith => {
            return like(builder, condition, value, alias, Pattern::NOT_I_ENDS_WITH)
        }
    }

    Ok(Dispatch::Applied)
}

/// Pattern family: one direct call, or an OR group over several columns.
fn like<B: ConditionBuilder>(
    builder: &mut B,
    condition: &Condition,
    value: Value<'_>,
    alias: Option<&str>,
    pattern: Pattern,
) -> Result<Dispatch> {
    let text = match &value {
        Value::String(text) => text,
        other => {
            return Err(FilterError::TypeMismatch {
                op: condition.operator(),
                actual: other.kind(),
            })
        }
    };
    if text.is_empty() {
        return Ok(Dispatch::Skipped(Skip::EmptyText));
    }

    match condition.columns() {
        [column] => builder.matches(&qualify(column, alias), pattern, text),
        columns => builder.group(|scope| {
            for column in columns {
                scope.or_matches(&qualify(column, alias), pattern, text);
            }
        }),
    }
    Ok(Dispatch::Applied)
}

/// Prefixes `column` with `alias` when there is one.
pub fn qualify<'c>(column: &'c str, alias: Option<&str>) -> Cow<'c, str> {
    match alias {
        Some(alias) if !alias.is_empty() => Cow::Owned(format!("{}.{}", alias, column)),
        _ => Cow::Borrowed(column),
    }
}

fn with_default<'a>(value: Value<'a>, params: &'a Params) -> Value<'a> {
    match (&value, params.default_value()) {
        (Value::String(text), Some(default)) if text.is_empty() => Value::from(default),
        _ => value,
    }
}

fn list_items<'a>(op: Operator, value: Value<'a>, params: &Params) -> Result<Vec<Value<'a>>> {
    match value {
        Value::List(items) => Ok(items),
        Value::String(Cow::Borrowed(text)) => split_list(text, params),
        Value::String(Cow::Owned(text)) => Ok(split_list(&text, params)?
            .into_iter()
            .map(Value::into_owned)
            .collect()),
        other => Err(FilterError::TypeMismatch {
            op,
            actual: other.kind(),
        }),
    }
}

/// Elements are trimmed and blanks dropped; `type:int` coerces each one,
/// other hints leave them as strings.
fn split_list<'a>(text: &'a str, params: &Params) -> Result<Vec<Value<'a>>> {
    let as_int = params.value_type() == Some(ValueType::Int);
    text.split(params.delimiter())
        .map(str::trim)
        .filter(|item| !item.is_empty())
        .map(|item| {
            if as_int {
                ValueType::Int.parse(item)
            } else {
                Ok(Value::from(item))
            }
        })
        .collect()
}
