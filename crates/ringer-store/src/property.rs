//! Property lists: ordered sequences of string-keyed dictionaries holding
//! strings, integers, booleans and dates.

use crate::error::{Result, StoreError};
use chrono::{DateTime, Utc};
use std::cell::RefCell;
use std::collections::BTreeMap;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PropertyValue {
    String(String),
    Integer(i64),
    Bool(bool),
    Date(DateTime<Utc>),
}

pub type PropertyDictionary = BTreeMap<String, PropertyValue>;

impl PropertyValue {
    pub fn kind(&self) -> &'static str {
        match self {
            PropertyValue::String(_) => "string",
            PropertyValue::Integer(_) => "integer",
            PropertyValue::Bool(_) => "bool",
            PropertyValue::Date(_) => "date",
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            PropertyValue::String(value) => Some(value),
            _ => None,
        }
    }

    pub fn as_integer(&self) -> Option<i64> {
        match self {
            PropertyValue::Integer(value) => Some(*value),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            PropertyValue::Bool(value) => Some(*value),
            _ => None,
        }
    }

    pub fn as_date(&self) -> Option<DateTime<Utc>> {
        match self {
            PropertyValue::Date(value) => Some(*value),
            _ => None,
        }
    }
}

impl From<&str> for PropertyValue {
    fn from(value: &str) -> Self {
        PropertyValue::String(value.to_string())
    }
}

impl From<String> for PropertyValue {
    fn from(value: String) -> Self {
        PropertyValue::String(value)
    }
}

impl From<i64> for PropertyValue {
    fn from(value: i64) -> Self {
        PropertyValue::Integer(value)
    }
}

impl From<bool> for PropertyValue {
    fn from(value: bool) -> Self {
        PropertyValue::Bool(value)
    }
}

impl From<DateTime<Utc>> for PropertyValue {
    fn from(value: DateTime<Utc>) -> Self {
        PropertyValue::Date(value)
    }
}

/// Durable home of one property list. `load` fails with
/// [`StoreError::NotFound`] when nothing was ever saved.
pub trait PropertyListStorage {
    fn load(&self) -> Result<Vec<PropertyDictionary>>;
    fn save(&self, list: &[PropertyDictionary]) -> Result<()>;
    fn delete(&self) -> Result<()>;
}

#[derive(Debug, Default)]
pub struct MemoryPropertyListStorage {
    list: RefCell<Option<Vec<PropertyDictionary>>>,
}

impl MemoryPropertyListStorage {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_list(list: Vec<PropertyDictionary>) -> Self {
        Self {
            list: RefCell::new(Some(list)),
        }
    }

    pub fn snapshot(&self) -> Option<Vec<PropertyDictionary>> {
        self.list.borrow().clone()
    }
}

impl PropertyListStorage for MemoryPropertyListStorage {
    fn load(&self) -> Result<Vec<PropertyDictionary>> {
        self.list
            .borrow()
            .clone()
            .ok_or_else(|| StoreError::NotFound("property list".to_string()))
    }

    fn save(&self, list: &[PropertyDictionary]) -> Result<()> {
        *self.list.borrow_mut() = Some(list.to_vec());
        Ok(())
    }

    fn delete(&self) -> Result<()> {
        match self.list.borrow_mut().take() {
            Some(_) => Ok(()),
            None => Err(StoreError::NotFound("property list".to_string())),
        }
    }
}
