pub mod property_lists;

pub use property_lists::PropertyListRepo;
