//! Search query filtering.
//!
//! A contact matches when its name contains the query ignoring case, or its
//! phone contains the query verbatim. The query is used as typed, without
//! trimming; an empty query matches everything.

use crate::model::contact::Contact;

/// Returns whether `contact` matches `query`.
pub fn matches_query(contact: &Contact, query: &str) -> bool {
    if query.is_empty() {
        return true;
    }
    contact.name.to_lowercase().contains(&query.to_lowercase()) || contact.phone.contains(query)
}

/// Returns the subsequence of `contacts` matching `query`, in input order.
pub fn filter_contacts<'a, I>(contacts: I, query: &str) -> Vec<&'a Contact>
where
    I: IntoIterator<Item = &'a Contact>,
{
    contacts
        .into_iter()
        .filter(|contact| matches_query(contact, query))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::{filter_contacts, matches_query};
    use crate::model::contact::Contact;

    fn contact(name: &str, phone: &str) -> Contact {
        Contact::new(name, Some(phone)).unwrap()
    }

    #[test]
    fn name_match_ignores_case() {
        let anna = contact("Anna Nowak", "500600700");
        assert!(matches_query(&anna, "NOWAK"));
        assert!(matches_query(&anna, "anna"));
        assert!(!matches_query(&anna, "kowal"));
    }

    #[test]
    fn phone_match_is_literal_substring() {
        let anna = contact("Anna", "+48 500-600-700");
        assert!(matches_query(&anna, "500-600"));
        assert!(!matches_query(&anna, "500600"));
    }

    #[test]
    fn empty_query_keeps_everything_in_order() {
        let contacts = vec![contact("Bob", "1"), contact("Al", "2")];
        let filtered = filter_contacts(&contacts, "");
        assert_eq!(filtered.len(), 2);
        assert_eq!(filtered[0].name, "Bob");
    }

    #[test]
    fn query_is_not_trimmed() {
        let contacts = vec![contact("Anna", "123456789")];
        assert!(filter_contacts(&contacts, " anna").is_empty());
    }
}
