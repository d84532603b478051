//! Derived, read-only views over contact state.
//!
//! # Responsibility
//! - Filter contacts by search query.
//! - Order names with a locale-aware comparison and bucket them by letter.
//! - Hold static display options used to label rows.
//!
//! # Invariants
//! - View functions never mutate their input.
//! - Grouping neither drops nor duplicates contacts.

pub mod collation;
pub mod display;
pub mod filter;
pub mod grouping;
