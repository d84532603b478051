//! Authoritative contact collection.
//!
//! # Responsibility
//! - Provide add/edit/remove/lookup over the in-memory contact collection.
//! - Keep the owned [`FavoriteSet`] consistent with the collection.
//!
//! # Invariants
//! - `add` and `edit` reject blank names; `edit` also rejects phones shorter
//!   than [`MIN_PHONE_LEN`] characters.
//! - `remove` cascades into the favorite set, so no favorite id dangles.
//! - Rejected operations leave the store untouched.

use crate::model::contact::{
    phone_len, Contact, ContactId, ContactValidationError, MIN_PHONE_LEN,
};
use crate::state::favorite_set::FavoriteSet;
use log::debug;
use std::error::Error;
use std::fmt::{Display, Formatter};
use uuid::Uuid;

/// Outcome of a rejected contact mutation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ContactError {
    /// Name is blank after trimming.
    EmptyName,
    /// Phone is shorter than the minimum edit length after trimming.
    PhoneTooShort { len: usize },
    /// No contact exists with the given id.
    NotFound(ContactId),
    /// A contact with this id already exists.
    DuplicateId(ContactId),
    /// Record failed structural validation.
    Invalid(ContactValidationError),
}

impl Display for ContactError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::EmptyName => write!(f, "contact name must not be blank"),
            Self::PhoneTooShort { len } => write!(
                f,
                "phone must have at least {MIN_PHONE_LEN} characters, got {len}"
            ),
            Self::NotFound(id) => write!(f, "contact not found: {id}"),
            Self::DuplicateId(id) => write!(f, "contact id already exists: {id}"),
            Self::Invalid(err) => write!(f, "{err}"),
        }
    }
}

impl Error for ContactError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Invalid(err) => Some(err),
            _ => None,
        }
    }
}

impl From<ContactValidationError> for ContactError {
    fn from(value: ContactValidationError) -> Self {
        match value {
            ContactValidationError::EmptyName => Self::EmptyName,
            other => Self::Invalid(other),
        }
    }
}

/// In-memory collection of contacts plus their favorite membership.
///
/// Storage order is insertion order; it carries no meaning and callers sort
/// for display.
#[derive(Debug, Clone, Default)]
pub struct ContactStore {
    contacts: Vec<Contact>,
    favorites: FavoriteSet,
}

impl ContactStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates and appends a new contact.
    ///
    /// A blank or missing phone is stored as the "no number" sentinel.
    ///
    /// # Errors
    /// - [`ContactError::EmptyName`] when `name` trims to empty.
    pub fn add(&mut self, name: &str, phone: Option<&str>) -> Result<Contact, ContactError> {
        let mut contact = match Contact::new(name, phone) {
            Ok(contact) => contact,
            Err(err) => {
                debug!("event=contact_add module=state status=rejected reason=empty_name");
                return Err(err.into());
            }
        };
        while self.contains(contact.id) {
            contact.id = Uuid::new_v4();
        }

        self.contacts.push(contact.clone());
        debug!(
            "event=contact_add module=state status=ok id={} total={}",
            contact.id,
            self.contacts.len()
        );
        Ok(contact)
    }

    /// Inserts a contact that already carries an id, e.g. one loaded from storage.
    ///
    /// # Errors
    /// - [`ContactError::DuplicateId`] when the id is already present.
    /// - Validation errors when the record is structurally invalid.
    pub fn insert_existing(&mut self, contact: Contact) -> Result<(), ContactError> {
        contact.validate()?;
        if self.contains(contact.id) {
            return Err(ContactError::DuplicateId(contact.id));
        }
        self.contacts.push(contact);
        Ok(())
    }

    /// Removes a contact and its favorite mark.
    ///
    /// Returns the removed contact, or `None` when the id was unknown.
    pub fn remove(&mut self, id: ContactId) -> Option<Contact> {
        self.favorites.remove_if_present(id);
        let index = self.contacts.iter().position(|contact| contact.id == id)?;
        let removed = self.contacts.remove(index);
        debug!(
            "event=contact_remove module=state status=ok id={} total={}",
            id,
            self.contacts.len()
        );
        Some(removed)
    }

    /// Replaces name and phone of an existing contact.
    ///
    /// Validation only checks content length; any phone with at least
    /// [`MIN_PHONE_LEN`] characters passes.
    ///
    /// # Errors
    /// - [`ContactError::EmptyName`] when `name` trims to empty.
    /// - [`ContactError::PhoneTooShort`] when `phone` is too short.
    /// - [`ContactError::NotFound`] when no contact has this id.
    pub fn edit(&mut self, id: ContactId, name: &str, phone: &str) -> Result<&Contact, ContactError> {
        let name = name.trim();
        let phone = phone.trim();
        if name.is_empty() {
            debug!("event=contact_edit module=state status=rejected id={id} reason=empty_name");
            return Err(ContactError::EmptyName);
        }
        let len = phone_len(phone);
        if len < MIN_PHONE_LEN {
            debug!(
                "event=contact_edit module=state status=rejected id={id} reason=phone_too_short len={len}"
            );
            return Err(ContactError::PhoneTooShort { len });
        }

        let Some(contact) = self.contacts.iter_mut().find(|contact| contact.id == id) else {
            debug!("event=contact_edit module=state status=rejected id={id} reason=not_found");
            return Err(ContactError::NotFound(id));
        };
        contact.name = name.to_string();
        contact.phone = phone.to_string();
        debug!("event=contact_edit module=state status=ok id={id}");
        Ok(&*contact)
    }

    /// Gets one contact by id.
    pub fn get(&self, id: ContactId) -> Option<&Contact> {
        self.contacts.iter().find(|contact| contact.id == id)
    }

    /// Returns all contacts in storage order.
    pub fn all(&self) -> &[Contact] {
        &self.contacts
    }

    pub fn contains(&self, id: ContactId) -> bool {
        self.get(id).is_some()
    }

    pub fn len(&self) -> usize {
        self.contacts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.contacts.is_empty()
    }

    /// Flips the favorite mark of an existing contact.
    ///
    /// Returns the new membership (`true` when now a favorite).
    ///
    /// # Errors
    /// - [`ContactError::NotFound`] when no contact has this id.
    pub fn toggle_favorite(&mut self, id: ContactId) -> Result<bool, ContactError> {
        if !self.contains(id) {
            return Err(ContactError::NotFound(id));
        }
        let now_favorite = self.favorites.toggle(id);
        debug!("event=favorite_toggle module=state status=ok id={id} favorite={now_favorite}");
        Ok(now_favorite)
    }

    /// Read-only view of favorite membership.
    pub fn favorites(&self) -> &FavoriteSet {
        &self.favorites
    }

    pub fn is_favorite(&self, id: ContactId) -> bool {
        self.favorites.is_favorite(id)
    }

    /// Resolves favorites to contacts in the order they were marked.
    pub fn list_favorites(&self) -> Vec<&Contact> {
        self.favorites.list_favorites(self)
    }
}
