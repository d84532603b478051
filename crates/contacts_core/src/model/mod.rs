//! Contact domain model.
//!
//! # Responsibility
//! - Define the canonical contact record shared by state, view and persistence.
//! - Own field normalization rules (trim, "no number" sentinel).
//!
//! # Invariants
//! - Every contact is identified by a stable, non-nil `ContactId`.
//! - A contact name is never blank once constructed or deserialized.

pub mod contact;
