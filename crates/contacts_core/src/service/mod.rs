//! Use-case level application state.
//!
//! # Responsibility
//! - Turn presentation intents into state transitions.
//! - Re-derive the read-only view after every change.
//! - Bridge local state to a persistence gateway without blocking intents.

pub mod contact_book;
