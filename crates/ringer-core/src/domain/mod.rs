pub mod call_record;
pub mod contact;
pub mod matched;
pub mod phone;

pub use call_record::{distant_past, CallAddress, CallRecord};
pub use contact::{Contact, Email, Phone};
pub use matched::{ContactAddress, MatchedContact};
pub use phone::{digits_only, is_phone_like, matching_key, NormalizedPhoneNumber};
