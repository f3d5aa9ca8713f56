pub mod intent;
pub mod photo;
pub mod query;
pub mod store;
pub mod types;

pub use intent::{Intent, Journal, RenderSink};
pub use query::SortCriterion;
pub use store::{EntryStore, StoreLocation};
pub use types::{Entry, EntryId, EntryInput, Photo};
