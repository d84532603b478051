//! Flutter bridge for the contacts core.

pub mod api;
