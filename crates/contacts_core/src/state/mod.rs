//! In-memory contact state.
//!
//! # Responsibility
//! - Own the authoritative contact collection and favorite membership.
//! - Model the single-contact edit session as an explicit state machine.
//!
//! # Invariants
//! - Contact ids are unique across the collection.
//! - Every favorite id references an existing contact.
//! - Failed operations never mutate state.

pub mod contact_store;
pub mod edit_session;
pub mod favorite_set;
