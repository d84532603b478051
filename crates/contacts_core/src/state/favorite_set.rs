//! Favorite membership over the contact collection.
//!
//! # Invariants
//! - Each id appears at most once.
//! - Order is the order in which contacts were marked.

use crate::model::contact::{Contact, ContactId};
use crate::state::contact_store::ContactStore;

/// Insertion-ordered set of favorite contact ids.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FavoriteSet {
    ids: Vec<ContactId>,
}

impl FavoriteSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds the id when absent, removes it when present.
    ///
    /// Returns `true` when the id is a favorite after the call. Callers are
    /// responsible for passing ids of existing contacts; see
    /// [`ContactStore::toggle_favorite`] for the checked variant.
    pub fn toggle(&mut self, id: ContactId) -> bool {
        if self.remove_if_present(id) {
            false
        } else {
            self.ids.push(id);
            true
        }
    }

    pub fn is_favorite(&self, id: ContactId) -> bool {
        self.ids.contains(&id)
    }

    /// Drops the id if it is marked. Returns whether anything was removed.
    pub fn remove_if_present(&mut self, id: ContactId) -> bool {
        let before = self.ids.len();
        self.ids.retain(|current| *current != id);
        self.ids.len() != before
    }

    /// Resolves marked ids through the store, skipping ids without a contact.
    pub fn list_favorites<'a>(&self, store: &'a ContactStore) -> Vec<&'a Contact> {
        self.ids.iter().filter_map(|id| store.get(*id)).collect()
    }

    pub fn ids(&self) -> &[ContactId] {
        &self.ids
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::FavoriteSet;
    use crate::state::contact_store::ContactStore;
    use uuid::Uuid;

    #[test]
    fn toggle_adds_then_removes() {
        let mut favorites = FavoriteSet::new();
        let id = Uuid::new_v4();

        assert!(favorites.toggle(id));
        assert!(favorites.is_favorite(id));
        assert!(!favorites.toggle(id));
        assert!(!favorites.is_favorite(id));
        assert!(favorites.is_empty());
    }

    #[test]
    fn list_favorites_keeps_marking_order_and_skips_dangling_ids() {
        let mut store = ContactStore::new();
        let first = store.add("Zenon", None).unwrap();
        let second = store.add("Adam", None).unwrap();

        let mut favorites = FavoriteSet::new();
        favorites.toggle(first.id);
        favorites.toggle(Uuid::new_v4());
        favorites.toggle(second.id);

        let names = favorites
            .list_favorites(&store)
            .into_iter()
            .map(|contact| contact.name.as_str())
            .collect::<Vec<_>>();
        assert_eq!(names, vec!["Zenon", "Adam"]);
    }

    #[test]
    fn remove_if_present_reports_change() {
        let mut favorites = FavoriteSet::new();
        let id = Uuid::new_v4();
        assert!(!favorites.remove_if_present(id));
        favorites.toggle(id);
        assert!(favorites.remove_if_present(id));
        assert_eq!(favorites.len(), 0);
    }
}
