use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Contact {
    pub name: String,
    pub phones: Vec<Phone>,
    pub emails: Vec<Email>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Phone {
    pub number: String,
    pub label: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Email {
    pub address: String,
    pub label: String,
}

impl Contact {
    pub fn new(name: impl Into<String>, phones: Vec<Phone>, emails: Vec<Email>) -> Self {
        Self {
            name: name.into(),
            phones,
            emails,
        }
    }
}

impl Phone {
    pub fn new(number: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            number: number.into(),
            label: label.into(),
        }
    }
}

impl Email {
    pub fn new(address: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            address: address.into(),
            label: label.into(),
        }
    }
}
