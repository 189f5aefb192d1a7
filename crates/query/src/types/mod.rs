//! Core types for the query engine.
//!
//! - [`FilterNode`], [`FilterOp`] - the recursive filter tree
//! - [`SortSpec`], [`SortField`], [`SortDirection`] - sort specifications
//! - [`PageRequest`], [`PageWindow`], [`PageCursor`], [`PageResult`] - pagination

mod filter;
mod pagination;
mod sort;

pub use filter::{FilterNode, FilterOp};
pub use pagination::{PageCursor, PageRequest, PageResult, PageWindow};
pub use sort::{SortDirection, SortField, SortSpec};
