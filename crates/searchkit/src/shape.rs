//! Structural descriptors and field access for filter types.
//!
//! This module provides the [`Filter`] trait, implemented by
//! `#[derive(Filter)]`, which stands in for runtime reflection: [`Filter::shape`]
//! describes the declared fields once, and [`Fields::field`] reads one field of
//! an instance by position.

use crate::value::Value;

/// Structural description of a filter type.
#[derive(Debug, Clone)]
pub enum Shape {
    /// A record with named fields, in declaration order.
    Record(Vec<FieldDef>),
    /// Anything that is not a record. Compiles to a predicate that does
    /// nothing.
    Opaque,
}

impl Shape {
    /// Starts an empty record shape for hand-written [`Filter`] impls.
    pub fn record() -> Self {
        Shape::Record(Vec::new())
    }

    /// Appends a field to a record shape. Has no effect on [`Shape::Opaque`].
    pub fn field(mut self, def: FieldDef) -> Self {
        if let Shape::Record(fields) = &mut self {
            fields.push(def);
        }
        self
    }
}

/// One declared field.
#[derive(Debug, Clone)]
pub struct FieldDef {
    /// Field name as declared.
    pub name: &'static str,
    /// Annotation string, if the field carries one.
    pub annotation: Option<&'static str>,
    pub kind: FieldKind,
}

/// What a declared field holds.
#[derive(Debug, Clone, Copy)]
pub enum FieldKind {
    /// A value read through [`FilterValue`](crate::FilterValue).
    Leaf,
    /// A nested filter record, dived into.
    Record(fn() -> Shape),
    /// A field the filter never reads.
    Opaque,
}

impl FieldDef {
    pub fn leaf(name: &'static str, annotation: Option<&'static str>) -> Self {
        FieldDef {
            name,
            annotation,
            kind: FieldKind::Leaf,
        }
    }

    pub fn record(name: &'static str, annotation: Option<&'static str>, shape: fn() -> Shape) -> Self {
        FieldDef {
            name,
            annotation,
            kind: FieldKind::Record(shape),
        }
    }

    pub fn ignored(name: &'static str) -> Self {
        FieldDef {
            name,
            annotation: Some("-"),
            kind: FieldKind::Opaque,
        }
    }
}

/// Value of one field of a filter instance.
#[derive(Clone)]
pub enum Field<'a> {
    /// A leaf value; `None` if not supplied.
    Value(Option<Value<'a>>),
    /// A nested record; `None` if the optional record is absent.
    Record(Option<&'a dyn Fields>),
    /// Nothing readable at this position.
    Opaque,
}

/// Positional field access on a filter instance.
///
/// Object-safe so nested records of different types can be walked through
/// `&dyn Fields`.
pub trait Fields {
    /// Returns the field at `index`, in declaration order.
    fn field(&self, index: usize) -> Field<'_>;
}

/// A type that can be compiled into a [`Predicate`](crate::Predicate).
///
/// Usually derived:
///
/// ```ignore
/// use searchkit::Filter;
///
/// #[derive(Filter)]
/// struct PostSearch {
///     #[search("contains,column=title|body")]
///     q: String,
///     #[search("in,params=type:int")]
///     author_id: String,
/// }
/// ```
///
/// Implementing it by hand registers the fields explicitly:
///
/// ```
/// use searchkit::{Field, FieldDef, Fields, Filter, FilterValue, Shape};
///
/// struct PostSearch {
///     q: String,
///     author_id: Option<i64>,
/// }
///
/// impl Fields for PostSearch {
///     fn field(&self, index: usize) -> Field<'_> {
///         match index {
///             0 => Field::Value(self.q.filter_value()),
///             1 => Field::Value(self.author_id.filter_value()),
///             _ => Field::Opaque,
///         }
///     }
/// }
///
/// impl Filter for PostSearch {
///     fn shape() -> Shape {
///         Shape::record()
///             .field(FieldDef::leaf("q", Some("contains,column=title|body")))
///             .field(FieldDef::leaf("author_id", None))
///     }
/// }
/// ```
pub trait Filter: Fields {
    /// Describes the type's declared fields.
    fn shape() -> Shape
    where
        Self: Sized;
}

impl<T: Fields + ?Sized> Fields for Box<T> {
    fn field(&self, index: usize) -> Field<'_> {
        (**self).field(index)
    }
}

impl<T: Filter> Filter for Box<T> {
    fn shape() -> Shape {
        T::shape()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn record_builder_appends_in_order() {
        let shape = Shape::record()
            .field(FieldDef::leaf("a", None))
            .field(FieldDef::ignored("b"));
        let Shape::Record(fields) = shape else {
            panic!("expected record");
        };
        let names: Vec<_> = fields.iter().map(|f| f.name).collect();
        assert_eq!(names, ["a", "b"]);
        assert_eq!(fields[1].annotation, Some("-"));
    }

    #[test]
    fn opaque_shape_ignores_fields() {
        let shape = Shape::Opaque.field(FieldDef::leaf("a", None));
        assert!(matches!(shape, Shape::Opaque));
    }
}
