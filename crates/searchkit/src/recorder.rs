//! A [`ConditionBuilder`] that records calls as data.
//!
//! Useful for testing filter definitions without a database: apply a
//! predicate to a [`Recorder`] and compare its [`Call`]s.

use crate::builder::ConditionBuilder;
use crate::op::{Operator, Pattern};
use crate::value::Value;

/// One recorded builder call.
#[derive(Debug, Clone, PartialEq)]
pub enum Call {
    /// `eq`, `neq`, `gt`, `gte`, `lt`, `lte`.
    Compare {
        op: Operator,
        column: String,
        value: Value<'static>,
    },
    /// `between`, `not_between`.
    Range {
        op: Operator,
        column: String,
        start: Value<'static>,
        end: Value<'static>,
    },
    /// `is_in`, `not_in`.
    Set {
        op: Operator,
        column: String,
        values: Vec<Value<'static>>,
    },
    /// `is_null`, `is_not_null`.
    Null { op: Operator, column: String },
    /// `matches`, or `or_matches` when `or` is set.
    Match {
        pattern: Pattern,
        column: String,
        text: String,
        or: bool,
    },
    /// A nested scope.
    Group(Vec<Call>),
}

/// Records every builder call in order.
///
/// # Example
///
/// ```
/// use searchkit::{Call, ConditionBuilder, Operator, Recorder, Value};
///
/// let mut recorder = Recorder::new();
/// recorder.equals("status", Value::from("open"));
/// assert_eq!(
///     recorder.calls(),
///     [Call::Compare {
///         op: Operator::Eq,
///         column: "status".to_string(),
///         value: Value::from("open"),
///     }]
/// );
/// ```
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Recorder {
    calls: Vec<Call>,
}

impl Recorder {
    pub fn new() -> Self {
        Recorder::default()
    }

    /// Calls recorded so far.
    pub fn calls(&self) -> &[Call] {
        &self.calls
    }

    pub fn into_calls(self) -> Vec<Call> {
        self.calls
    }

    /// Number of top-level calls.
    pub fn len(&self) -> usize {
        self.calls.len()
    }

    pub fn is_empty(&self) -> bool {
        self.calls.is_empty()
    }

    fn compare(&mut self, op: Operator, column: &str, value: Value<'_>) {
        self.calls.push(Call::Compare {
            op,
            column: column.to_string(),
            value: value.into_owned(),
        });
    }

    fn range(&mut self, op: Operator, column: &str, start: Value<'_>, end: Value<'_>) {
        self.calls.push(Call::Range {
            op,
            column: column.to_string(),
            start: start.into_owned(),
            end: end.into_owned(),
        });
    }

    fn set(&mut self, op: Operator, column: &str, values: Vec<Value<'_>>) {
        self.calls.push(Call::Set {
            op,
            column: column.to_string(),
            values: values.into_iter().map(Value::into_owned).collect(),
        });
    }

    fn null(&mut self, op: Operator, column: &str) {
        self.calls.push(Call::Null {
            op,
            column: column.to_string(),
        });
    }

    fn pattern(&mut self, pattern: Pattern, column: &str, text: &str, or: bool) {
        self.calls.push(Call::Match {
            pattern,
            column: column.to_string(),
            text: text.to_string(),
            or,
        });
    }
}

impl ConditionBuilder for Recorder {
    fn equals(&mut self, column: &str, value: Value<'_>) {
        self.compare(Operator::Eq, column, value);
    }

    fn not_equals(&mut self, column: &str, value: Value<'_>) {
        self.compare(Operator::Neq, column, value);
    }

    fn greater_than(&mut self, column: &str, value: Value<'_>) {
        self.compare(Operator::Gt, column, value);
    }

    fn greater_than_or_equal(&mut self, column: &str, value: Value<'_>) {
        self.compare(Operator::Gte, column, value);
    }

    fn less_than(&mut self, column: &str, value: Value<'_>) {
        self.compare(Operator::Lt, column, value);
    }

    fn less_than_or_equal(&mut self, column: &str, value: Value<'_>) {
        self.compare(Operator::Lte, column, value);
    }

    fn between(&mut self, column: &str, start: Value<'_>, end: Value<'_>) {
        self.range(Operator::Between, column, start, end);
    }

    fn not_between(&mut self, column: &str, start: Value<'_>, end: Value<'_>) {
        self.range(Operator::NotBetween, column, start, end);
    }

    fn is_in(&mut self, column: &str, values: Vec<Value<'_>>) {
        self.set(Operator::In, column, values);
    }

    fn not_in(&mut self, column: &str, values: Vec<Value<'_>>) {
        self.set(Operator::NotIn, column, values);
    }

    fn is_null(&mut self, column: &str) {
        self.null(Operator::IsNull, column);
    }

    fn is_not_null(&mut self, column: &str) {
        self.null(Operator::IsNotNull, column);
    }

    fn matches(&mut self, column: &str, pattern: Pattern, text: &str) {
        self.pattern(pattern, column, text, false);
    }

    fn or_matches(&mut self, column: &str, pattern: Pattern, text: &str) {
        self.pattern(pattern, column, text, true);
    }

    /// Empty groups are not recorded.
    fn group<F>(&mut self, build: F)
    where
        F: FnOnce(&mut Self),
    {
        let mut scope = Recorder::new();
        build(&mut scope);
        if !scope.is_empty() {
            self.calls.push(Call::Group(scope.calls));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::value::Number;

    #[test]
    fn records_values_owned() {
        let mut recorder = Recorder::new();
        {
            let text = String::from("2024");
            recorder.between("year", Value::from(text.as_str()), Value::from(text.as_str()));
        }
        assert_eq!(
            recorder.calls(),
            [Call::Range {
                op: Operator::Between,
                column: "year".to_string(),
                start: Value::from("2024"),
                end: Value::from("2024"),
            }]
        );
    }

    #[test]
    fn nested_groups() {
        let contains = Operator::Contains.pattern().unwrap();
        let mut recorder = Recorder::new();
        recorder.group(|g| {
            g.or_matches("a", contains, "x");
            g.or_matches("b", contains, "x");
        });
        assert_eq!(recorder.len(), 1);
        let Call::Group(inner) = &recorder.calls()[0] else {
            panic!("expected group");
        };
        assert_eq!(inner.len(), 2);
    }

    #[test]
    fn empty_group_is_dropped() {
        let mut recorder = Recorder::new();
        recorder.group(|_| {});
        assert!(recorder.is_empty());
    }

    #[test]
    fn apply_helpers() {
        let mut recorder = Recorder::new();
        recorder
            .apply(|b| b.is_null("deleted_at"))
            .apply_if(false, |b| b.greater_than("age", Value::Number(Number::I64(1))))
            .apply_if(true, |b| b.not_in("id", vec![Value::from("7")]));
        assert_eq!(
            recorder.into_calls(),
            vec![
                Call::Null {
                    op: Operator::IsNull,
                    column: "deleted_at".to_string(),
                },
                Call::Set {
                    op: Operator::NotIn,
                    column: "id".to_string(),
                    values: vec![Value::from("7")],
                },
            ]
        );
    }
}
