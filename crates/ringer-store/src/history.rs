//! Call history that mirrors every change into a property list.
//!
//! Storage failures never reach the caller. They are logged and the
//! in-memory history stays authoritative for the life of the process.

use crate::error::StoreError;
use crate::property::{PropertyDictionary, PropertyListStorage, PropertyValue};
use ringer_core::{distant_past, CallAddress, CallHistory, CallHistoryEventTarget, CallRecord};
use tracing::{debug, warn};

pub const USER_KEY: &str = "user";
pub const HOST_KEY: &str = "host";
pub const DATE_KEY: &str = "date";
pub const DURATION_KEY: &str = "duration";
pub const INCOMING_KEY: &str = "incoming";
pub const MISSED_KEY: &str = "missed";

pub struct PersistentCallHistory<H, S> {
    origin: H,
    storage: S,
}

impl<H: CallHistory, S: PropertyListStorage> PersistentCallHistory<H, S> {
    /// Clears `origin` and refills it from `storage`.
    pub fn new(mut origin: H, storage: S) -> Self {
        origin.remove_all();
        let mut history = Self { origin, storage };
        history.load();
        history
    }

    pub fn storage(&self) -> &S {
        &self.storage
    }

    pub fn into_parts(self) -> (H, S) {
        (self.origin, self.storage)
    }

    fn load(&mut self) {
        match self.storage.load() {
            Ok(list) => {
                for dictionary in &list {
                    self.origin.add(record_from_dictionary(dictionary));
                }
                debug!(records = list.len(), "call history loaded");
            }
            Err(StoreError::NotFound(what)) => {
                debug!(%what, "no stored call history, starting empty");
            }
            Err(err) => {
                warn!(error = %err, "could not read call history");
            }
        }
    }

    fn save(&self) {
        let list: Vec<PropertyDictionary> = self
            .origin
            .all_records()
            .iter()
            .map(record_to_dictionary)
            .collect();
        if let Err(err) = self.storage.save(&list) {
            warn!(error = %err, "could not save call history");
        }
    }
}

impl<H: CallHistory, S: PropertyListStorage> CallHistory for PersistentCallHistory<H, S> {
    fn all_records(&self) -> &[CallRecord] {
        self.origin.all_records()
    }

    fn add(&mut self, record: CallRecord) {
        self.origin.add(record);
        self.save();
    }

    fn remove(&mut self, record: &CallRecord) {
        self.origin.remove(record);
        self.save();
    }

    fn remove_all(&mut self) {
        self.origin.remove_all();
        match self.storage.delete() {
            Ok(()) => {}
            Err(StoreError::NotFound(what)) => {
                debug!(%what, "no stored call history to delete");
            }
            Err(err) => {
                warn!(error = %err, "could not delete call history");
            }
        }
    }

    fn update_target(&mut self, target: Box<dyn CallHistoryEventTarget>) {
        self.origin.update_target(target);
    }
}

pub fn record_to_dictionary(record: &CallRecord) -> PropertyDictionary {
    PropertyDictionary::from([
        (USER_KEY.to_string(), PropertyValue::from(record.address.user.as_str())),
        (HOST_KEY.to_string(), PropertyValue::from(record.address.host.as_str())),
        (DATE_KEY.to_string(), PropertyValue::from(record.date)),
        (DURATION_KEY.to_string(), PropertyValue::from(record.duration)),
        (INCOMING_KEY.to_string(), PropertyValue::from(record.incoming)),
        (MISSED_KEY.to_string(), PropertyValue::from(record.missed)),
    ])
}

/// Missing or mistyped keys fall back to empty strings, the distant past,
/// zero and false.
pub fn record_from_dictionary(dictionary: &PropertyDictionary) -> CallRecord {
    let text = |key: &str| {
        dictionary
            .get(key)
            .and_then(PropertyValue::as_str)
            .unwrap_or_default()
            .to_string()
    };
    let flag = |key: &str| {
        dictionary
            .get(key)
            .and_then(PropertyValue::as_bool)
            .unwrap_or(false)
    };

    CallRecord {
        address: CallAddress::new(text(USER_KEY), text(HOST_KEY)),
        date: dictionary
            .get(DATE_KEY)
            .and_then(PropertyValue::as_date)
            .unwrap_or_else(distant_past),
        duration: dictionary
            .get(DURATION_KEY)
            .and_then(PropertyValue::as_integer)
            .unwrap_or(0),
        incoming: flag(INCOMING_KEY),
        missed: flag(MISSED_KEY),
    }
}
