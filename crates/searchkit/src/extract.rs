//! Resolves a condition's field on a filter instance.

use crate::shape::{Field, Fields};
use crate::value::Value;

/// Follows `path` from `root` and returns the leaf value.
///
/// `None` means "not present": an absent optional record on the way down, an
/// absent or invalid leaf, or a path that does not lead to a leaf.
pub fn resolve<'a>(root: &'a dyn Fields, path: &[usize]) -> Option<Value<'a>> {
    let (leaf, parents) = path.split_last()?;

    let mut record = root;
    for &index in parents {
        match record.field(index) {
            Field::Record(Some(nested)) => record = nested,
            _ => return None,
        }
    }

    match record.field(*leaf) {
        Field::Value(value) => value,
        Field::Record(_) | Field::Opaque => None,
    }
}
