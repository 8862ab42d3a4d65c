use serde::{Deserialize, Serialize};
use std::fmt;

/// The contact an inbound address resolved to, and which of its addresses
/// produced the match.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MatchedContact {
    pub name: String,
    pub address: ContactAddress,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ContactAddress {
    Phone { number: String, label: String },
    Email { address: String, label: String },
}

impl MatchedContact {
    pub fn new(name: impl Into<String>, address: ContactAddress) -> Self {
        Self {
            name: name.into(),
            address,
        }
    }
}

impl ContactAddress {
    pub fn phone(number: impl Into<String>, label: impl Into<String>) -> Self {
        Self::Phone {
            number: number.into(),
            label: label.into(),
        }
    }

    pub fn email(address: impl Into<String>, label: impl Into<String>) -> Self {
        Self::Email {
            address: address.into(),
            label: label.into(),
        }
    }

    pub fn value(&self) -> &str {
        match self {
            ContactAddress::Phone { number, .. } => number,
            ContactAddress::Email { address, .. } => address,
        }
    }

    pub fn label(&self) -> &str {
        match self {
            ContactAddress::Phone { label, .. } | ContactAddress::Email { label, .. } => label,
        }
    }
}

impl fmt::Display for MatchedContact {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} <{}>", self.name, self.address.value())?;
        let label = self.address.label();
        if !label.is_empty() {
            write!(f, " ({label})")?;
        }
        Ok(())
    }
}
