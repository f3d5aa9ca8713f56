#![allow(dead_code)]

use brewlog::journal::{EntryId, EntryInput, EntryStore, StoreLocation};

/// Open a fresh in-memory store with the schema installed.
pub async fn test_store() -> EntryStore {
    EntryStore::open_at(StoreLocation::Memory).await.unwrap()
}

/// The three shops used across the query tests.
pub fn luna() -> EntryInput {
    EntryInput::new("Luna")
        .address("4 Moon Rd")
        .order("Cortado")
        .price(4.5)
        .rating(Some(5))
        .review("Silky and sweet")
}

pub fn alto() -> EntryInput {
    EntryInput::new("Alto")
        .address("12 Harbour St")
        .order("Flat White")
        .price(3.0)
        .rating(None)
        .review("")
}

pub fn beanery() -> EntryInput {
    EntryInput::new("Beanery")
        .address("88 Roast Ave")
        .order("Pour over")
        .price(5.25)
        .rating(Some(3))
        .review("Bright, a bit sour")
}

/// Insert Luna, Alto and Beanery in that order. Returns their ids.
pub async fn seed(store: &EntryStore) -> (EntryId, EntryId, EntryId) {
    let l = store.add_entry(luna()).await.unwrap();
    let a = store.add_entry(alto()).await.unwrap();
    let b = store.add_entry(beanery()).await.unwrap();
    (l, a, b)
}

pub fn names(entries: &[brewlog::journal::Entry]) -> Vec<&str> {
    entries.iter().map(|e| e.name.as_str()).collect()
}
