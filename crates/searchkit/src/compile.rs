//! Compiles a filter type's [`Shape`] into its ordered condition list.

use crate::annotation::{snake_case, Annotation, FieldSpec};
use crate::condition::Condition;
use crate::diagnostics::{Diagnostic, Diagnostics};
use crate::error::FilterError;
use crate::op::Operator;
use crate::shape::{FieldDef, FieldKind, Shape};

/// Deepest nesting followed through dived records. Guards self-referencing
/// filter types.
pub const MAX_DEPTH: usize = 16;

/// Walks `shape` depth-first and returns one condition per leaf field, in
/// declaration order.
///
/// Never fails: fields with a malformed annotation are reported to
/// `diagnostics` and left out, and a non-record shape yields no conditions.
pub fn compile_shape(
    shape: &Shape,
    filter: &'static str,
    diagnostics: &dyn Diagnostics,
) -> Vec<Condition> {
    let Shape::Record(fields) = shape else {
        diagnostics.warn(&Diagnostic {
            filter,
            field: String::new(),
            error: FilterError::NotARecord { type_name: filter },
        });
        return Vec::new();
    };

    let mut walker = Walker {
        filter,
        diagnostics,
        path: Vec::new(),
        conditions: Vec::new(),
    };
    walker.record(fields, "");
    walker.conditions
}

struct Walker<'d> {
    filter: &'static str,
    diagnostics: &'d dyn Diagnostics,
    path: Vec<usize>,
    conditions: Vec<Condition>,
}

impl Walker<'_> {
    fn record(&mut self, fields: &[FieldDef], prefix: &str) {
        for (index, def) in fields.iter().enumerate() {
            let name = if prefix.is_empty() {
                def.name.to_string()
            } else {
                format!("{}.{}", prefix, def.name)
            };
            self.path.push(index);
            self.field(def, &name);
            self.path.pop();
        }
    }

    fn field(&mut self, def: &FieldDef, name: &str) {
        let annotation = match Annotation::parse(def.annotation.unwrap_or("")) {
            Ok(annotation) => annotation,
            Err(error) => return self.warn(name, error),
        };

        match (annotation, def.kind) {
            (Annotation::Ignore, _) | (_, FieldKind::Opaque) => {}
            (_, FieldKind::Record(shape)) => self.dive(shape(), name),
            (Annotation::Dive, FieldKind::Leaf) => self.warn(name, FilterError::DiveOnLeaf),
            (Annotation::Field(spec), FieldKind::Leaf) => {
                if let Some(condition) = self.condition(def, name, spec) {
                    self.conditions.push(condition);
                }
            }
        }
    }

    fn dive(&mut self, shape: Shape, name: &str) {
        if self.path.len() > MAX_DEPTH {
            return self.warn(name, FilterError::DepthLimit { depth: MAX_DEPTH });
        }
        match shape {
            Shape::Record(fields) => self.record(&fields, name),
            Shape::Opaque => self.warn(name, FilterError::DiveOnLeaf),
        }
    }

    fn condition(&mut self, def: &FieldDef, name: &str, spec: FieldSpec) -> Option<Condition> {
        let operator = spec.operator.unwrap_or(Operator::Eq);
        let columns = if spec.columns.is_empty() {
            vec![snake_case(def.name)]
        } else {
            spec.columns
        };

        if columns.len() > 1 && !operator.accepts_multiple_columns() {
            self.warn(
                name,
                FilterError::MultiColumn {
                    op: operator,
                    count: columns.len(),
                },
            );
            return None;
        }

        Some(Condition {
            field_path: self.path.clone(),
            field_name: name.to_string(),
            columns,
            operator,
            alias: spec.alias,
            params: spec.params,
        })
    }

    fn warn(&self, field: &str, error: FilterError) {
        self.diagnostics.warn(&Diagnostic {
            filter: self.filter,
            field: field.to_string(),
            error,
        });
    }
}
