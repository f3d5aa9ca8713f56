pub mod assets;
pub mod entries;
pub mod export;

use anyhow::{Context, Result};
use brewlog::config::BrewlogConfig;
use brewlog::journal::{Entry, EntryId, EntryStore, RenderSink, StoreLocation};

/// Open the configured journal database.
pub async fn open_store(config: &BrewlogConfig) -> Result<EntryStore> {
    let db_path = config.resolved_db_path();
    EntryStore::open_at(StoreLocation::File(db_path.clone()))
        .await
        .with_context(|| format!("failed to open journal at {}", db_path.display()))
}

/// Terminal rendering of journal output. Remembers the id awaiting
/// confirmation so the caller can prompt for it.
#[derive(Debug, Default)]
pub struct TerminalSink {
    pub pending_delete: Option<EntryId>,
}

impl RenderSink for TerminalSink {
    fn render(&mut self, entries: &[Entry]) {
        if entries.is_empty() {
            println!("No entries.");
            return;
        }
        for entry in entries {
            print!("{}", format_card(entry));
            println!();
        }
    }

    fn confirm_delete(&mut self, id: EntryId) {
        self.pending_delete = Some(id);
    }

    fn deleted(&mut self, id: EntryId, removed: bool) {
        self.pending_delete = None;
        println!("{}", deleted_message(id, removed));
        println!();
    }

    fn added(&mut self, id: EntryId) {
        println!("New entry #{id} added successfully!");
        println!();
    }
}

fn deleted_message(id: EntryId, removed: bool) -> String {
    if removed {
        format!("Entry #{id} deleted.")
    } else {
        format!("No entry #{id}; nothing deleted.")
    }
}

/// One entry as a text card.
pub fn format_card(entry: &Entry) -> String {
    let rating = match entry.rating {
        Some(r) => format!("{r} stars"),
        None => "Not rated".to_string(),
    };
    let mut card = format!(
        "#{} {}\n  Address: {}\n  Order:   {}\n  Price:   ${}\n  Rating:  {}\n  Review:  {}\n",
        entry.id, entry.name, entry.address, entry.order, entry.price, rating, entry.review
    );
    if let Some(photo) = &entry.photo {
        card.push_str(&format!("  Photo:   {} bytes\n", photo.len()));
    }
    card
}
