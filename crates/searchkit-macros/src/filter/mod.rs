//! Implementation of the `#[derive(Filter)]` macro.
//!
//! This module turns `#[search(...)]` field annotations into the field
//! descriptors and accessors the searchkit predicate compiler walks.

mod attrs;
mod derive;

pub use derive::filter_derive_impl;
