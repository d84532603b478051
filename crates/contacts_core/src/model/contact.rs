//! Contact record and field normalization.
//!
//! # Responsibility
//! - Define `Contact` and its validation rules.
//! - Provide the normalization helpers used by add/edit paths.
//!
//! # Invariants
//! - `id` is assigned once at creation and never changes.
//! - `name` is trimmed and non-empty.
//! - `phone` is trimmed; a missing phone is stored as [`NO_NUMBER_PHONE`].

use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};
use uuid::Uuid;

/// Stable identifier of a contact.
pub type ContactId = Uuid;

/// Placeholder stored when a contact is created without a phone number.
pub const NO_NUMBER_PHONE: &str = "Brak numeru";

/// Minimum phone length (in characters, after trim) accepted by edits.
pub const MIN_PHONE_LEN: usize = 9;

/// Structural validation failures for a contact record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ContactValidationError {
    /// The nil UUID is reserved and never identifies a contact.
    NilId,
    /// Name is blank after trimming.
    EmptyName,
}

impl Display for ContactValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NilId => write!(f, "contact id must not be nil"),
            Self::EmptyName => write!(f, "contact name must not be blank"),
        }
    }
}

impl Error for ContactValidationError {}

/// A named entry in the address book.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "ContactWire")]
pub struct Contact {
    /// Stable id, serialized in hyphenated string form.
    pub id: ContactId,
    /// Display name.
    pub name: String,
    /// Display phone string, or [`NO_NUMBER_PHONE`].
    pub phone: String,
}

#[derive(Deserialize)]
struct ContactWire {
    id: ContactId,
    name: String,
    phone: String,
}

impl TryFrom<ContactWire> for Contact {
    type Error = ContactValidationError;

    fn try_from(value: ContactWire) -> Result<Self, Self::Error> {
        let contact = Contact {
            id: value.id,
            name: value.name,
            phone: value.phone,
        };
        contact.validate()?;
        Ok(contact)
    }
}

impl Contact {
    /// Creates a contact with a freshly generated id.
    ///
    /// Name and phone are normalized before validation; an empty phone becomes
    /// [`NO_NUMBER_PHONE`].
    pub fn new(name: &str, phone: Option<&str>) -> Result<Self, ContactValidationError> {
        Self::with_id(Uuid::new_v4(), name, phone)
    }

    /// Creates a contact with a caller-provided id.
    ///
    /// Used by hydration paths where identity already exists in storage.
    pub fn with_id(
        id: ContactId,
        name: &str,
        phone: Option<&str>,
    ) -> Result<Self, ContactValidationError> {
        let contact = Self {
            id,
            name: name.trim().to_string(),
            phone: normalize_new_phone(phone),
        };
        contact.validate()?;
        Ok(contact)
    }

    /// Checks the structural invariants of this record.
    pub fn validate(&self) -> Result<(), ContactValidationError> {
        if self.id.is_nil() {
            return Err(ContactValidationError::NilId);
        }
        if self.name.trim().is_empty() {
            return Err(ContactValidationError::EmptyName);
        }
        Ok(())
    }

    /// Returns whether this contact was created without a phone number.
    pub fn has_phone(&self) -> bool {
        self.phone != NO_NUMBER_PHONE
    }
}

/// Normalizes the optional phone supplied at creation time.
pub fn normalize_new_phone(phone: Option<&str>) -> String {
    match phone.map(str::trim) {
        Some(value) if !value.is_empty() => value.to_string(),
        _ => NO_NUMBER_PHONE.to_string(),
    }
}

/// Returns the phone length as counted by edit validation.
pub fn phone_len(phone: &str) -> usize {
    phone.trim().chars().count()
}
