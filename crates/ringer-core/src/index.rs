//! Lookup table from inbound addresses to known contacts.
//!
//! Every phone number is indexed twice: once as its full digit string and
//! once cut down to the matching window, so that a number which arrives
//! without its country or trunk prefix still resolves with a single map
//! lookup. Email addresses are indexed verbatim.
//!
//! Entries are inserted contact by contact, phones before emails, in source
//! order. When two entries share a key the later one replaces the earlier.

use crate::domain::{
    digits_only, is_phone_like, matching_key, Contact, ContactAddress, MatchedContact,
    NormalizedPhoneNumber,
};
use crate::source::ContactsSource;
use std::collections::HashMap;
use tracing::debug;

#[derive(Debug, Clone)]
pub struct ContactMatchingIndex {
    entries: HashMap<String, MatchedContact>,
    max_phone_number_length: usize,
}

impl ContactMatchingIndex {
    pub fn new(contacts: &[Contact], max_phone_number_length: usize) -> Self {
        let mut entries = HashMap::new();
        for contact in contacts {
            for phone in &contact.phones {
                let full = digits_only(&phone.number);
                if full.is_empty() {
                    continue;
                }
                let short =
                    NormalizedPhoneNumber::new(&phone.number, max_phone_number_length).into_string();
                let matched = MatchedContact::new(
                    contact.name.clone(),
                    ContactAddress::phone(phone.number.clone(), phone.label.clone()),
                );
                if short == full {
                    entries.insert(full, matched);
                } else {
                    entries.insert(full, matched.clone());
                    entries.insert(short, matched);
                }
            }
            for email in &contact.emails {
                entries.insert(
                    email.address.clone(),
                    MatchedContact::new(
                        contact.name.clone(),
                        ContactAddress::email(email.address.clone(), email.label.clone()),
                    ),
                );
            }
        }

        debug!(
            contacts = contacts.len(),
            keys = entries.len(),
            window = max_phone_number_length,
            "contact matching index built"
        );

        Self {
            entries,
            max_phone_number_length,
        }
    }

    pub fn from_source<S: ContactsSource>(
        source: &S,
        max_phone_number_length: usize,
    ) -> Result<Self, S::Error> {
        let contacts = source.contacts()?;
        debug!(source = source.source_name(), "building index from contacts source");
        Ok(Self::new(&contacts, max_phone_number_length))
    }

    /// Exact lookup. The address is not normalized here: pass a stored
    /// number, an email, or a key normalized with the same window.
    pub fn contact(&self, address: &str) -> Option<MatchedContact> {
        self.entries.get(address).cloned()
    }

    /// Lookup for an address as delivered by signaling: tries the address
    /// as given, then its digits, then its digits cut to the window.
    pub fn resolve(&self, address: &str) -> Option<MatchedContact> {
        if let Some(found) = self.contact(address) {
            return Some(found);
        }
        if !is_phone_like(address) {
            return None;
        }
        self.contact(&digits_only(address))
            .or_else(|| self.contact(&matching_key(address, self.max_phone_number_length)))
    }

    pub fn max_phone_number_length(&self) -> usize {
        self.max_phone_number_length
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn entries(&self) -> impl Iterator<Item = (&str, &MatchedContact)> {
        self.entries.iter().map(|(key, value)| (key.as_str(), value))
    }
}
