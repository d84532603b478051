//! Durability sink for contacts.
//!
//! # Responsibility
//! - Define the save/load/delete gateway contract consumed by the service.
//! - Provide SQLite and in-memory gateway implementations.
//! - Queue writes so the interaction loop never waits on storage.
//!
//! # Invariants
//! - Local in-memory state is authoritative during a session; gateways are
//!   only read at hydration time.
//! - Pending writes are last-write-wins per contact id.

pub mod gateway;
pub mod journal;
pub mod memory_gateway;
pub mod sqlite_gateway;
