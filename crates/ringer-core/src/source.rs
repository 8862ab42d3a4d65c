use crate::domain::Contact;
use std::convert::Infallible;

/// Address book the matching index is built from.
pub trait ContactsSource {
    type Error: std::error::Error + Send + Sync + 'static;

    fn source_name(&self) -> &'static str;
    fn contacts(&self) -> Result<Vec<Contact>, Self::Error>;
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SimpleContacts(Vec<Contact>);

impl SimpleContacts {
    pub fn new(contacts: Vec<Contact>) -> Self {
        Self(contacts)
    }
}

impl From<Vec<Contact>> for SimpleContacts {
    fn from(contacts: Vec<Contact>) -> Self {
        Self(contacts)
    }
}

impl ContactsSource for SimpleContacts {
    type Error = Infallible;

    fn source_name(&self) -> &'static str {
        "memory"
    }

    fn contacts(&self) -> Result<Vec<Contact>, Self::Error> {
        Ok(self.0.clone())
    }
}
