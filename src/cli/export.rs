use anyhow::Result;
use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;
use serde::Serialize;

use brewlog::config::BrewlogConfig;
use brewlog::journal::{Entry, EntryId};

/// Export format — one record per entry, photo as base64.
#[derive(Debug, Serialize)]
struct ExportEntry<'a> {
    id: EntryId,
    name: &'a str,
    address: &'a str,
    order: &'a str,
    price: f64,
    rating: Option<u8>,
    review: &'a str,
    photo: Option<String>,
}

impl<'a> From<&'a Entry> for ExportEntry<'a> {
    fn from(entry: &'a Entry) -> Self {
        Self {
            id: entry.id,
            name: &entry.name,
            address: &entry.address,
            order: &entry.order,
            price: entry.price,
            rating: entry.rating,
            review: &entry.review,
            photo: entry.photo.as_ref().map(|p| STANDARD.encode(p.as_bytes())),
        }
    }
}

/// Export all entries as JSON to stdout.
pub async fn export(config: &BrewlogConfig) -> Result<()> {
    let store = super::open_store(config).await?;
    let entries = store.list_all().await?;

    let data: Vec<ExportEntry<'_>> = entries.iter().map(ExportEntry::from).collect();
    let json = serde_json::to_string_pretty(&data)?;
    println!("{json}");

    eprintln!("Exported {} entries.", data.len());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use brewlog::journal::{EntryInput, Photo};

    #[test]
    fn photo_is_base64_in_export() {
        let entry = EntryInput::new("Luna")
            .photo(Some(Photo(b"jpg".to_vec())))
            .into_entry(EntryId(4));
        let json = serde_json::to_value(ExportEntry::from(&entry)).unwrap();
        assert_eq!(json["id"], 4);
        assert_eq!(json["photo"], "anBn");
        assert!(json["rating"].is_null());
    }
}
