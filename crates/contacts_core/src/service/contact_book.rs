//! Contact book application state.
//!
//! # Responsibility
//! - Own the contact store, edit session, search query and add-form draft.
//! - Expose one method per presentation intent with explicit results.
//! - Record successful mutations in a write journal for later flushing.
//!
//! # Invariants
//! - A failed intent leaves state and journal untouched.
//! - Deleting the contact under edit also ends the edit session.
//! - Gateways are read only by `hydrate`; local state stays authoritative.

use crate::model::contact::{Contact, ContactId};
use crate::persistence::gateway::{ContactGateway, GatewayError};
use crate::persistence::journal::{FlushReport, PendingWrite, WriteJournal};
use crate::state::contact_store::{ContactError, ContactStore};
use crate::state::edit_session::{EditDraft, EditSession, EditSessionError};
use crate::view::display::DisplayOptions;
use crate::view::filter::filter_contacts;
use crate::view::grouping::{group_by_letter, LetterGroup, ViewError};
use log::{info, warn};
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Errors returned by contact book intents.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BookError {
    /// Store rejected the mutation.
    Contact(ContactError),
    /// Edit session transition was invalid or its save was rejected.
    Edit(EditSessionError),
}

impl Display for BookError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Contact(err) => write!(f, "{err}"),
            Self::Edit(err) => write!(f, "{err}"),
        }
    }
}

impl Error for BookError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Contact(err) => Some(err),
            Self::Edit(err) => Some(err),
        }
    }
}

impl From<ContactError> for BookError {
    fn from(value: ContactError) -> Self {
        Self::Contact(value)
    }
}

impl From<EditSessionError> for BookError {
    fn from(value: EditSessionError) -> Self {
        Self::Edit(value)
    }
}

/// Text typed into the "new contact" inputs.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AddForm {
    pub name: String,
    pub phone: String,
}

/// One rendered contact line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContactRow {
    pub id: ContactId,
    pub name: String,
    pub phone: String,
    /// Preformatted `name - phone` label.
    pub label: String,
    pub is_favorite: bool,
    /// Star glyph matching `is_favorite`.
    pub favorite_glyph: &'static str,
    /// Whether this row should render the edit inputs instead of the label.
    pub is_editing: bool,
}

/// Read-only view of the whole screen.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BookSnapshot {
    /// Search-filtered contacts grouped by first letter.
    pub sections: Vec<LetterGroup<ContactRow>>,
    /// Favorites in marking order; not affected by the search query.
    pub favorites: Vec<ContactRow>,
    pub edit: Option<EditDraft>,
    pub search_query: String,
    pub add_form: AddForm,
    pub total_contacts: usize,
    pub visible_contacts: usize,
    pub pending_writes: usize,
}

/// Counters from [`ContactBook::hydrate`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct HydrateReport {
    pub loaded: usize,
    pub skipped: usize,
}

/// Application state for the contact list screen.
#[derive(Debug, Clone, Default)]
pub struct ContactBook {
    store: ContactStore,
    session: EditSession,
    search_query: String,
    add_form: AddForm,
    journal: WriteJournal,
    display: DisplayOptions,
}

impl ContactBook {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_display(display: DisplayOptions) -> Self {
        Self {
            display,
            ..Self::default()
        }
    }

    /// Loads stored contacts into the local store.
    ///
    /// Contacts already present locally (same id) are skipped; local state
    /// wins. Loaded contacts are not re-journaled.
    pub fn hydrate<G: ContactGateway>(&mut self, gateway: &G) -> Result<HydrateReport, GatewayError> {
        let mut report = HydrateReport::default();
        for contact in gateway.load_all()? {
            let id = contact.id;
            match self.store.insert_existing(contact) {
                Ok(()) => report.loaded += 1,
                Err(err) => {
                    warn!("event=book_hydrate module=service status=skip id={id} error={err}");
                    report.skipped += 1;
                }
            }
        }
        info!(
            "event=book_hydrate module=service status=ok loaded={} skipped={}",
            report.loaded, report.skipped
        );
        Ok(report)
    }

    /// Pushes pending writes to `gateway`.
    pub fn flush<G: ContactGateway>(&mut self, gateway: &G) -> FlushReport {
        self.journal.flush(gateway)
    }

    /// Detaches the pending writes so they can be flushed without this book.
    pub fn take_pending_writes(&mut self) -> WriteJournal {
        self.journal.take()
    }

    /// Returns writes a detached flush could not complete.
    ///
    /// Writes superseded by intents recorded in the meantime are discarded;
    /// the count of discarded writes is returned.
    pub fn restore_pending_writes(&mut self, leftovers: WriteJournal) -> usize {
        self.journal.requeue(leftovers)
    }

    /// Adds a contact from explicit values.
    pub fn add_contact(&mut self, name: &str, phone: Option<&str>) -> Result<Contact, BookError> {
        let contact = self.store.add(name, phone)?;
        self.journal.record_save(&contact);
        Ok(contact)
    }

    pub fn set_add_form_name(&mut self, text: impl Into<String>) {
        self.add_form.name = text.into();
    }

    pub fn set_add_form_phone(&mut self, text: impl Into<String>) {
        self.add_form.phone = text.into();
    }

    /// Adds a contact from the add-form draft and clears the form on success.
    pub fn submit_add_form(&mut self) -> Result<Contact, BookError> {
        let form = self.add_form.clone();
        let contact = self.add_contact(&form.name, Some(&form.phone))?;
        self.add_form = AddForm::default();
        Ok(contact)
    }

    /// Flips favorite membership; returns the new membership.
    pub fn toggle_favorite(&mut self, id: ContactId) -> Result<bool, BookError> {
        Ok(self.store.toggle_favorite(id)?)
    }

    /// Deletes a contact. Unknown ids are ignored and return `None`.
    pub fn delete_contact(&mut self, id: ContactId) -> Option<Contact> {
        let removed = self.store.remove(id)?;
        if self.session.target_id() == Some(id) {
            self.session.cancel();
        }
        self.journal.record_delete(id);
        Some(removed)
    }

    /// Starts editing `id`, discarding any other unsaved draft.
    pub fn start_editing(&mut self, id: ContactId) -> Result<(), BookError> {
        let contact = self.store.get(id).ok_or(ContactError::NotFound(id))?;
        self.session.start_editing(contact);
        Ok(())
    }

    /// Returns `false` when no edit is active.
    pub fn update_draft_name(&mut self, text: impl Into<String>) -> bool {
        self.session.change_draft_name(text)
    }

    /// Returns `false` when no edit is active.
    pub fn update_draft_phone(&mut self, text: impl Into<String>) -> bool {
        self.session.change_draft_phone(text)
    }

    /// Commits the draft of `id`.
    ///
    /// # Errors
    /// - [`EditSessionError::NotEditing`] / [`EditSessionError::TargetMismatch`]
    ///   when `id` is not the contact under edit.
    /// - [`EditSessionError::Rejected`] when validation fails; the session
    ///   keeps its draft.
    pub fn save_contact(&mut self, id: ContactId) -> Result<Contact, BookError> {
        match self.session.target_id() {
            None => return Err(EditSessionError::NotEditing.into()),
            Some(editing) if editing != id => {
                return Err(EditSessionError::TargetMismatch {
                    editing,
                    requested: id,
                }
                .into())
            }
            Some(_) => {}
        }
        let saved = self.session.save(&mut self.store)?;
        self.journal.record_save(&saved);
        Ok(saved)
    }

    /// Abandons the active draft, if any.
    pub fn cancel_editing(&mut self) -> Option<EditDraft> {
        self.session.cancel()
    }

    pub fn set_search_query(&mut self, text: impl Into<String>) {
        self.search_query = text.into();
    }

    /// Derives the full screen view from current state.
    ///
    /// # Errors
    /// - [`ViewError`] when stored state violates a data invariant.
    pub fn snapshot(&self) -> Result<BookSnapshot, ViewError> {
        let visible = filter_contacts(self.store.all(), &self.search_query);
        let visible_contacts = visible.len();
        let sections = group_by_letter(visible)?
            .into_iter()
            .map(|group| LetterGroup {
                letter: group.letter,
                contacts: group
                    .contacts
                    .into_iter()
                    .map(|contact| self.row(contact))
                    .collect(),
            })
            .collect();
        let favorites = self
            .store
            .list_favorites()
            .into_iter()
            .map(|contact| self.row(contact))
            .collect();

        Ok(BookSnapshot {
            sections,
            favorites,
            edit: self.session.draft().cloned(),
            search_query: self.search_query.clone(),
            add_form: self.add_form.clone(),
            total_contacts: self.store.len(),
            visible_contacts,
            pending_writes: self.journal.len(),
        })
    }

    fn row(&self, contact: &Contact) -> ContactRow {
        let is_favorite = self.store.is_favorite(contact.id);
        ContactRow {
            id: contact.id,
            name: contact.name.clone(),
            phone: contact.phone.clone(),
            label: self.display.label(contact),
            is_favorite,
            favorite_glyph: self.display.glyph_for(is_favorite),
            is_editing: self.session.target_id() == Some(contact.id),
        }
    }

    pub fn store(&self) -> &ContactStore {
        &self.store
    }

    pub fn session(&self) -> &EditSession {
        &self.session
    }

    pub fn search_query(&self) -> &str {
        &self.search_query
    }

    pub fn add_form(&self) -> &AddForm {
        &self.add_form
    }

    pub fn display(&self) -> &DisplayOptions {
        &self.display
    }

    pub fn pending_writes(&self) -> &[PendingWrite] {
        self.journal.pending()
    }
}
