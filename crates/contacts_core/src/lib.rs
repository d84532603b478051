//! Core domain logic for the contacts app.
//! This crate is the single source of truth for contact invariants.

pub mod config;
pub mod db;
pub mod logging;
pub mod model;
pub mod persistence;
pub mod service;
pub mod state;
pub mod view;

pub use config::{ConfigError, CoreConfig};
pub use logging::{default_log_level, init_logging, logging_status, LoggingError};
pub use model::contact::{
    Contact, ContactId, ContactValidationError, MIN_PHONE_LEN, NO_NUMBER_PHONE,
};
pub use persistence::gateway::{ContactGateway, GatewayError, GatewayResult};
pub use persistence::journal::{FlushReport, PendingWrite, WriteJournal};
pub use persistence::memory_gateway::{FailureMode, MemoryContactGateway};
pub use persistence::sqlite_gateway::SqliteContactGateway;
pub use service::contact_book::{
    AddForm, BookError, BookSnapshot, ContactBook, ContactRow, HydrateReport,
};
pub use state::contact_store::{ContactError, ContactStore};
pub use state::edit_session::{EditDraft, EditSession, EditSessionError};
pub use state::favorite_set::FavoriteSet;
pub use view::collation::compare_names;
pub use view::display::DisplayOptions;
pub use view::filter::{filter_contacts, matches_query};
pub use view::grouping::{group_by_letter, sort_by_name, LetterGroup, ViewError};

/// Minimal health-check API for early integration.
pub fn ping() -> &'static str {
    "pong"
}

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
