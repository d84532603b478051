//! Alphabetical bucketing of contacts.
//!
//! # Invariants
//! - Contacts inside a bucket follow [`compare_names`] order.
//! - Bucket keys are the uppercased first character of the folded name, so
//!   `Ágata` lands in `A` and `Łukasz` in `L`.
//! - Buckets appear in the order of their first member; flattening them yields
//!   exactly the [`sort_by_name`] sequence.

use crate::model::contact::{Contact, ContactId};
use crate::view::collation::{compare_names, fold_key};
use log::error;
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Data-invariant violations detected while deriving views.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ViewError {
    /// A contact reached the view layer with an empty name.
    EmptyName { id: ContactId },
}

impl Display for ViewError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::EmptyName { id } => {
                write!(f, "contact {id} has an empty name and cannot be grouped")
            }
        }
    }
}

impl Error for ViewError {}

/// One letter section of the contact list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LetterGroup<T> {
    /// Uppercased first character of every member's folded name.
    pub letter: String,
    pub contacts: Vec<T>,
}

/// Returns `contacts` sorted ascending by name.
pub fn sort_by_name<'a, I>(contacts: I) -> Vec<&'a Contact>
where
    I: IntoIterator<Item = &'a Contact>,
{
    let mut sorted = contacts.into_iter().collect::<Vec<_>>();
    sorted.sort_by(|left, right| compare_names(&left.name, &right.name));
    sorted
}

/// Returns the bucket key for a name, or `None` when the name is empty.
///
/// A name made only of combining marks folds to nothing and keys on its raw
/// first character instead.
pub fn letter_key(name: &str) -> Option<String> {
    let first = fold_key(name).chars().next().or_else(|| name.chars().next())?;
    Some(first.to_uppercase().collect())
}

/// Sorts `contacts` by name and partitions them by first letter.
///
/// # Errors
/// - [`ViewError::EmptyName`] when any contact has an empty name. Core write
///   paths reject such names, so this signals corrupted state; no partial
///   grouping is returned.
pub fn group_by_letter<'a, I>(contacts: I) -> Result<Vec<LetterGroup<&'a Contact>>, ViewError>
where
    I: IntoIterator<Item = &'a Contact>,
{
    let mut groups: Vec<LetterGroup<&'a Contact>> = Vec::new();
    for contact in sort_by_name(contacts) {
        let Some(letter) = letter_key(&contact.name) else {
            error!(
                "event=group_contacts module=view status=error error_code=empty_name id={}",
                contact.id
            );
            return Err(ViewError::EmptyName { id: contact.id });
        };
        match groups.last_mut() {
            Some(group) if group.letter == letter => group.contacts.push(contact),
            _ => groups.push(LetterGroup {
                letter,
                contacts: vec![contact],
            }),
        }
    }

    Ok(groups)
}
