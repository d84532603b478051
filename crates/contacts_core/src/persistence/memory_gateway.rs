//! In-process gateway used by previews and tests.

use crate::model::contact::{Contact, ContactId};
use crate::persistence::gateway::{ContactGateway, GatewayError, GatewayResult};
use std::cell::{Cell, RefCell};

/// Failure behavior injected into [`MemoryContactGateway`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum FailureMode {
    #[default]
    None,
    /// Every call fails with a retryable error.
    Unavailable,
    /// Every write fails with a non-retryable error.
    RejectWrites,
}

/// Gateway that keeps documents in a vector, in first-save order.
#[derive(Debug, Default)]
pub struct MemoryContactGateway {
    documents: RefCell<Vec<Contact>>,
    failure: Cell<FailureMode>,
}

impl MemoryContactGateway {
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a gateway pre-populated with `contacts`.
    pub fn with_contacts(contacts: Vec<Contact>) -> Self {
        Self {
            documents: RefCell::new(contacts),
            failure: Cell::new(FailureMode::None),
        }
    }

    pub fn set_failure(&self, mode: FailureMode) {
        self.failure.set(mode);
    }

    /// Returns a copy of the stored documents.
    pub fn documents(&self) -> Vec<Contact> {
        self.documents.borrow().clone()
    }

    fn check_write(&self) -> GatewayResult<()> {
        match self.failure.get() {
            FailureMode::None => Ok(()),
            FailureMode::Unavailable => Err(GatewayError::Unavailable(
                "memory gateway offline".to_string(),
            )),
            FailureMode::RejectWrites => Err(GatewayError::Rejected(
                "memory gateway is read-only".to_string(),
            )),
        }
    }
}

impl ContactGateway for MemoryContactGateway {
    fn save(&self, contact: &Contact) -> GatewayResult<()> {
        self.check_write()?;
        contact.validate()?;
        let mut documents = self.documents.borrow_mut();
        match documents.iter_mut().find(|stored| stored.id == contact.id) {
            Some(stored) => *stored = contact.clone(),
            None => documents.push(contact.clone()),
        }
        Ok(())
    }

    fn load_all(&self) -> GatewayResult<Vec<Contact>> {
        if self.failure.get() == FailureMode::Unavailable {
            return Err(GatewayError::Unavailable(
                "memory gateway offline".to_string(),
            ));
        }
        Ok(self.documents())
    }

    fn delete(&self, id: ContactId) -> GatewayResult<()> {
        self.check_write()?;
        self.documents.borrow_mut().retain(|stored| stored.id != id);
        Ok(())
    }
}
