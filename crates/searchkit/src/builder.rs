//! The condition-builder capability a predicate drives.
//!
//! searchkit never writes SQL. It calls a [`ConditionBuilder`], usually a thin
//! adapter over an ORM or query builder, once per applicable condition.
//! Consecutive calls combine with AND; calls made inside [`group`] form one
//! parenthesized sub-expression, and the `or_` variants join it with OR.
//!
//! [`group`]: ConditionBuilder::group

use crate::op::Pattern;
use crate::value::Value;

/// Target of a compiled predicate.
///
/// Column names arrive already qualified (`alias.column`) when an alias
/// applies.
pub trait ConditionBuilder {
    /// `column = value`
    fn equals(&mut self, column: &str, value: Value<'_>);
    /// `column <> value`
    fn not_equals(&mut self, column: &str, value: Value<'_>);
    /// `column > value`
    fn greater_than(&mut self, column: &str, value: Value<'_>);
    /// `column >= value`
    fn greater_than_or_equal(&mut self, column: &str, value: Value<'_>);
    /// `column < value`
    fn less_than(&mut self, column: &str, value: Value<'_>);
    /// `column <= value`
    fn less_than_or_equal(&mut self, column: &str, value: Value<'_>);

    /// `column BETWEEN start AND end`
    fn between(&mut self, column: &str, start: Value<'_>, end: Value<'_>);
    /// `column NOT BETWEEN start AND end`
    fn not_between(&mut self, column: &str, start: Value<'_>, end: Value<'_>);

    /// `column IN (values)`; never called with an empty list.
    fn is_in(&mut self, column: &str, values: Vec<Value<'_>>);
    /// `column NOT IN (values)`; never called with an empty list.
    fn not_in(&mut self, column: &str, values: Vec<Value<'_>>);

    /// `column IS NULL`
    fn is_null(&mut self, column: &str);
    /// `column IS NOT NULL`
    fn is_not_null(&mut self, column: &str);

    /// Pattern match joined with AND. `text` is never empty.
    fn matches(&mut self, column: &str, pattern: Pattern, text: &str);
    /// Pattern match joined with OR, used inside [`group`](Self::group).
    fn or_matches(&mut self, column: &str, pattern: Pattern, text: &str);

    /// Runs `build` in a nested scope that is joined to the outer
    /// conditions with AND.
    fn group<F>(&mut self, build: F)
    where
        F: FnOnce(&mut Self),
        Self: Sized;

    /// Runs a composable fragment against this builder.
    fn apply<F>(&mut self, fragment: F) -> &mut Self
    where
        F: FnOnce(&mut Self),
        Self: Sized,
    {
        fragment(self);
        self
    }

    /// Runs a fragment only when `condition` holds.
    fn apply_if<F>(&mut self, condition: bool, fragment: F) -> &mut Self
    where
        F: FnOnce(&mut Self),
        Self: Sized,
    {
        if condition {
            fragment(self);
        }
        self
    }
}
