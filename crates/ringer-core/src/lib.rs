pub mod domain;
pub mod error;
pub mod history;
pub mod index;
pub mod source;

pub use domain::*;
pub use error::CoreError;
pub use history::{CallHistory, CallHistoryEventTarget, InMemoryCallHistory};
pub use index::ContactMatchingIndex;
pub use source::{ContactsSource, SimpleContacts};
