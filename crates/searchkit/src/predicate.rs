//! The compiled, reusable predicate for one filter type.

use std::fmt;
use std::marker::PhantomData;
use std::sync::Arc;

use crate::annotation::is_identifier;
use crate::builder::ConditionBuilder;
use crate::compile::compile_shape;
use crate::condition::Condition;
use crate::diagnostics::{Diagnostic, Diagnostics, Skip, TracingDiagnostics};
use crate::dispatch::{dispatch, Dispatch};
use crate::error::FilterError;
use crate::extract::resolve;
use crate::shape::{Filter, Shape};

/// Conditions compiled from a [`Filter`] type, ready to apply to any number
/// of filter values.
///
/// Compile once, typically at startup, and share: a `Predicate` is immutable,
/// `Send` and `Sync`.
///
/// # Example
///
/// ```ignore
/// use searchkit::{Filter, Predicate, Recorder};
///
/// #[derive(Filter)]
/// struct UserSearch {
///     #[search("iContains")]
///     name: Option<String>,
/// }
///
/// let predicate = Predicate::<UserSearch>::compile();
/// let mut recorder = Recorder::new();
/// predicate.apply(&mut recorder, &UserSearch { name: Some("ann".into()) }, Some("u"));
/// assert_eq!(recorder.len(), 1);
/// ```
pub struct Predicate<T> {
    type_name: &'static str,
    record: bool,
    conditions: Vec<Condition>,
    diagnostics: Arc<dyn Diagnostics>,
    default_alias: Option<String>,
    marker: PhantomData<fn(&T)>,
}

impl<T: Filter> Predicate<T> {
    /// Compiles `T` with the default settings.
    ///
    /// Problems with individual fields are reported to [`TracingDiagnostics`]
    /// and those fields are left out; compilation itself never fails.
    pub fn compile() -> Self {
        Self::builder().build()
    }

    /// Starts a configurable compilation.
    pub fn builder() -> PredicateBuilder<T> {
        PredicateBuilder {
            diagnostics: Arc::new(TracingDiagnostics),
            default_alias: None,
            marker: PhantomData,
        }
    }

    /// Applies the conditions for `filter` to `builder`.
    ///
    /// Conditions run in field declaration order. Fields that are not
    /// present, or whose value does not fit the operator, issue no call.
    /// `alias` qualifies columns whose annotation has no alias of its own;
    /// without it the predicate's configured default alias is used.
    pub fn apply<B: ConditionBuilder>(&self, builder: &mut B, filter: &T, alias: Option<&str>) {
        if !self.record {
            self.warn(
                "",
                FilterError::NotARecord {
                    type_name: self.type_name,
                },
            );
            return;
        }

        let alias = alias.or(self.default_alias.as_deref());
        for condition in &self.conditions {
            let Some(value) = resolve(filter, condition.field_path()) else {
                self.diagnostics
                    .skipped(self.type_name, condition.field_name(), Skip::NotPresent);
                continue;
            };
            match dispatch(builder, condition, value, alias) {
                Ok(Dispatch::Applied) => {}
                Ok(Dispatch::Skipped(reason)) => {
                    self.diagnostics
                        .skipped(self.type_name, condition.field_name(), reason)
                }
                Err(error) => self.warn(condition.field_name(), error),
            }
        }
    }

    /// Returns a builder fragment that applies `filter`.
    ///
    /// Combine with [`ConditionBuilder::apply`] or [`ConditionBuilder::group`].
    pub fn scope<'a, B: ConditionBuilder>(
        &'a self,
        filter: &'a T,
        alias: Option<&'a str>,
    ) -> impl FnOnce(&mut B) + 'a {
        move |builder: &mut B| self.apply(builder, filter, alias)
    }

    /// Returns a function that turns a filter value into a boxed builder
    /// fragment, for code that stores fragments before running them.
    pub fn as_applier<'a, B>(&'a self) -> impl Fn(&'a T) -> Box<dyn FnOnce(&mut B) + 'a> + 'a
    where
        B: ConditionBuilder + 'a,
    {
        move |filter: &'a T| -> Box<dyn FnOnce(&mut B) + 'a> {
            Box::new(move |builder: &mut B| self.apply(builder, filter, None))
        }
    }
}

impl<T> Predicate<T> {
    /// Compiled conditions, in application order.
    pub fn conditions(&self) -> &[Condition] {
        &self.conditions
    }

    /// True when no condition survived compilation.
    pub fn is_empty(&self) -> bool {
        self.conditions.is_empty()
    }

    pub fn type_name(&self) -> &'static str {
        self.type_name
    }

    fn warn(&self, field: &str, error: FilterError) {
        self.diagnostics.warn(&Diagnostic {
            filter: self.type_name,
            field: field.to_string(),
            error,
        });
    }
}

impl<T> Clone for Predicate<T> {
    fn clone(&self) -> Self {
        Predicate {
            type_name: self.type_name,
            record: self.record,
            conditions: self.conditions.clone(),
            diagnostics: Arc::clone(&self.diagnostics),
            default_alias: self.default_alias.clone(),
            marker: PhantomData,
        }
    }
}

impl<T> fmt::Debug for Predicate<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Predicate")
            .field("type_name", &self.type_name)
            .field("conditions", &self.conditions)
            .field("default_alias", &self.default_alias)
            .finish_non_exhaustive()
    }
}

/// Settings for compiling a [`Predicate`].
///
/// ```ignore
/// let predicate = Predicate::<PostSearch>::builder()
///     .diagnostics(MySink::default())
///     .default_alias("p")
///     .build();
/// ```
pub struct PredicateBuilder<T> {
    diagnostics: Arc<dyn Diagnostics>,
    default_alias: Option<String>,
    marker: PhantomData<fn(&T)>,
}

impl<T: Filter> PredicateBuilder<T> {
    /// Sink for compile and apply diagnostics.
    pub fn diagnostics(mut self, sink: impl Diagnostics + 'static) -> Self {
        self.diagnostics = Arc::new(sink);
        self
    }

    /// Like [`diagnostics`](Self::diagnostics), sharing a sink between predicates.
    pub fn shared_diagnostics(mut self, sink: Arc<dyn Diagnostics>) -> Self {
        self.diagnostics = sink;
        self
    }

    /// Alias used when neither the annotation nor the caller gives one.
    ///
    /// Must be a plain identifier; anything else is reported and ignored.
    pub fn default_alias(mut self, alias: impl Into<String>) -> Self {
        self.default_alias = Some(alias.into());
        self
    }

    /// Compiles `T`.
    pub fn build(self) -> Predicate<T> {
        let type_name = std::any::type_name::<T>();
        let shape = T::shape();
        let record = matches!(shape, Shape::Record(_));
        let conditions = compile_shape(&shape, type_name, &*self.diagnostics);

        let default_alias = match self.default_alias {
            Some(alias) if !is_identifier(&alias) => {
                self.diagnostics.warn(&Diagnostic {
                    filter: type_name,
                    field: String::new(),
                    error: FilterError::InvalidIdentifier(alias),
                });
                None
            }
            alias => alias,
        };

        tracing::debug!(
            filter = type_name,
            conditions = conditions.len(),
            "compiled search predicate"
        );

        Predicate {
            type_name,
            record,
            conditions,
            diagnostics: self.diagnostics,
            default_alias,
            marker: PhantomData,
        }
    }
}
