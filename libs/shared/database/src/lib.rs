pub mod airtable;
pub mod formula;
pub mod store;

pub use airtable::AirtableClient;
pub use formula::Formula;
pub use store::{to_fields, ListQuery, RecordStore, SortDirection};

#[cfg(feature = "mocks")]
pub use store::MockRecordStore;
