//! Single-contact edit session state machine.
//!
//! # Responsibility
//! - Track which contact (if any) is being edited and its draft fields.
//! - Commit drafts through [`ContactStore::edit`] validation.
//!
//! # Invariants
//! - At most one contact is edited at a time.
//! - Starting a new edit discards any unsaved draft without warning.
//! - A rejected save keeps the session in `Editing` with the draft intact.

use crate::model::contact::{Contact, ContactId};
use crate::state::contact_store::{ContactError, ContactStore};
use log::debug;
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Unsaved field values for the contact under edit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EditDraft {
    pub target_id: ContactId,
    pub name: String,
    pub phone: String,
}

/// Edit session state.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum EditSession {
    #[default]
    Idle,
    Editing(EditDraft),
}

/// Errors from edit session transitions.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EditSessionError {
    /// Save requested while no contact is being edited.
    NotEditing,
    /// Save requested for a contact other than the one under edit.
    TargetMismatch {
        editing: ContactId,
        requested: ContactId,
    },
    /// Store rejected the draft.
    Rejected(ContactError),
}

impl Display for EditSessionError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NotEditing => write!(f, "no contact is being edited"),
            Self::TargetMismatch { editing, requested } => write!(
                f,
                "contact {requested} is not under edit (editing {editing})"
            ),
            Self::Rejected(err) => write!(f, "{err}"),
        }
    }
}

impl Error for EditSessionError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Rejected(err) => Some(err),
            _ => None,
        }
    }
}

impl EditSession {
    pub fn new() -> Self {
        Self::Idle
    }

    /// Enters `Editing` for `contact`, seeding the draft from its fields.
    ///
    /// Any previous draft is dropped.
    pub fn start_editing(&mut self, contact: &Contact) {
        if let Self::Editing(previous) = self {
            if previous.target_id != contact.id {
                debug!(
                    "event=edit_start module=state status=discard_draft previous={}",
                    previous.target_id
                );
            }
        }
        *self = Self::Editing(EditDraft {
            target_id: contact.id,
            name: contact.name.clone(),
            phone: contact.phone.clone(),
        });
    }

    /// Replaces the draft name. Returns `false` when idle.
    pub fn change_draft_name(&mut self, text: impl Into<String>) -> bool {
        match self {
            Self::Editing(draft) => {
                draft.name = text.into();
                true
            }
            Self::Idle => false,
        }
    }

    /// Replaces the draft phone. Returns `false` when idle.
    pub fn change_draft_phone(&mut self, text: impl Into<String>) -> bool {
        match self {
            Self::Editing(draft) => {
                draft.phone = text.into();
                true
            }
            Self::Idle => false,
        }
    }

    /// Commits the draft to `store` and returns to `Idle` on success.
    ///
    /// # Errors
    /// - [`EditSessionError::NotEditing`] when idle.
    /// - [`EditSessionError::Rejected`] when the store rejects the draft; the
    ///   session stays in `Editing`.
    pub fn save(&mut self, store: &mut ContactStore) -> Result<Contact, EditSessionError> {
        let Self::Editing(draft) = self else {
            return Err(EditSessionError::NotEditing);
        };
        let saved = store
            .edit(draft.target_id, &draft.name, &draft.phone)
            .map_err(EditSessionError::Rejected)?
            .clone();
        *self = Self::Idle;
        Ok(saved)
    }

    /// Abandons the current draft. Returns it, or `None` when idle.
    pub fn cancel(&mut self) -> Option<EditDraft> {
        match std::mem::take(self) {
            Self::Editing(draft) => Some(draft),
            Self::Idle => None,
        }
    }

    pub fn target_id(&self) -> Option<ContactId> {
        self.draft().map(|draft| draft.target_id)
    }

    pub fn draft(&self) -> Option<&EditDraft> {
        match self {
            Self::Editing(draft) => Some(draft),
            Self::Idle => None,
        }
    }

    pub fn is_editing(&self) -> bool {
        matches!(self, Self::Editing(_))
    }
}

#[cfg(test)]
mod tests {
    use super::{EditSession, EditSessionError};
    use crate::state::contact_store::{ContactError, ContactStore};

    #[test]
    fn start_editing_seeds_draft_from_contact() {
        let mut store = ContactStore::new();
        let ann = store.add("Ann", Some("222222222")).unwrap();
        let mut session = EditSession::new();

        session.start_editing(&ann);
        let draft = session.draft().unwrap();
        assert_eq!(draft.target_id, ann.id);
        assert_eq!(draft.name, "Ann");
        assert_eq!(draft.phone, "222222222");
    }

    #[test]
    fn rejected_save_stays_editing() {
        let mut store = ContactStore::new();
        let ann = store.add("Ann", Some("222222222")).unwrap();
        let mut session = EditSession::new();
        session.start_editing(&ann);
        session.change_draft_phone("12345");

        let err = session.save(&mut store).unwrap_err();
        assert_eq!(
            err,
            EditSessionError::Rejected(ContactError::PhoneTooShort { len: 5 })
        );
        assert_eq!(session.target_id(), Some(ann.id));
        assert_eq!(store.get(ann.id).unwrap().phone, "222222222");
    }

    #[test]
    fn successful_save_returns_to_idle() {
        let mut store = ContactStore::new();
        let ann = store.add("Ann", None).unwrap();
        let mut session = EditSession::new();
        session.start_editing(&ann);
        session.change_draft_name("Anna");
        session.change_draft_phone("123456789");

        let saved = session.save(&mut store).unwrap();
        assert_eq!(saved.name, "Anna");
        assert!(!session.is_editing());
    }

    #[test]
    fn idle_session_ignores_draft_changes_and_save() {
        let mut store = ContactStore::new();
        let mut session = EditSession::new();
        assert!(!session.change_draft_name("x"));
        assert!(!session.change_draft_phone("y"));
        assert_eq!(session.save(&mut store), Err(EditSessionError::NotEditing));
        assert_eq!(session.cancel(), None);
    }

    #[test]
    fn starting_new_edit_discards_previous_draft() {
        let mut store = ContactStore::new();
        let ann = store.add("Ann", Some("222222222")).unwrap();
        let bob = store.add("Bob", Some("333333333")).unwrap();
        let mut session = EditSession::new();

        session.start_editing(&ann);
        session.change_draft_name("Changed");
        session.start_editing(&bob);
        session.start_editing(&ann);

        assert_eq!(session.draft().unwrap().name, "Ann");
    }
}
