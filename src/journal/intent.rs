//! Presentation boundary: intents in, renders and signals out.
//!
//! A front end raises [`Intent`]s and hands them to [`Journal::dispatch`]
//! together with its [`RenderSink`]. The journal runs the matching store or
//! query operation and pushes the result to the sink. Nothing in the store or
//! query layer knows the sink exists.

use crate::error::Result;
use crate::journal::query::{self, SortCriterion};
use crate::journal::store::EntryStore;
use crate::journal::types::{Entry, EntryId, EntryInput};

/// A user request raised by the presentation layer.
#[derive(Debug, Clone, PartialEq)]
pub enum Intent {
    AddRequested(EntryInput),
    SortRequested(SortCriterion),
    SearchRequested(String),
    /// The user asked to delete; the sink is asked to confirm.
    DeleteRequested(EntryId),
    DeleteConfirmed(EntryId),
}

/// Consumer of journal output. Implementations only draw; they never call
/// back into the store.
pub trait RenderSink {
    /// Replace whatever is displayed with `entries`, in the given order.
    fn render(&mut self, entries: &[Entry]);

    /// Ask the user to confirm deleting `id`.
    fn confirm_delete(&mut self, id: EntryId);

    /// A confirmed delete of `id` finished. `removed` is false when no such
    /// entry existed.
    fn deleted(&mut self, id: EntryId, removed: bool);

    /// A new entry was stored.
    fn added(&mut self, _id: EntryId) {}
}

/// Dispatches intents against an opened [`EntryStore`].
#[derive(Debug, Clone)]
pub struct Journal {
    store: EntryStore,
}

impl Journal {
    pub fn new(store: EntryStore) -> Self {
        Self { store }
    }

    pub fn store(&self) -> &EntryStore {
        &self.store
    }

    /// Render the full collection in store order.
    pub async fn refresh(&self, sink: &mut dyn RenderSink) -> Result<()> {
        let entries = self.store.list_all().await?;
        sink.render(&entries);
        Ok(())
    }

    pub async fn dispatch(&self, intent: Intent, sink: &mut dyn RenderSink) -> Result<()> {
        match intent {
            Intent::AddRequested(input) => {
                let id = self.store.add_entry(input).await?;
                sink.added(id);
                self.refresh(sink).await
            }
            Intent::SortRequested(criterion) => {
                let entries = query::sort_by(&self.store, criterion).await?;
                sink.render(&entries);
                Ok(())
            }
            Intent::SearchRequested(text) => {
                let entries = query::search(&self.store, &text).await?;
                sink.render(&entries);
                Ok(())
            }
            Intent::DeleteRequested(id) => {
                sink.confirm_delete(id);
                Ok(())
            }
            Intent::DeleteConfirmed(id) => {
                let removed = self.store.delete_entry(id).await?;
                sink.deleted(id, removed);
                self.refresh(sink).await
            }
        }
    }
}
