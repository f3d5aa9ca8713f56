//! Sort and search over the full entry collection.
//!
//! Every call reads the current state through [`EntryStore::list_all`] and
//! orders or filters in memory. The `name`/`order` indexes are not consulted.

use std::cmp::Ordering;

use serde::{Deserialize, Serialize};
use unicode_normalization::char::is_combining_mark;
use unicode_normalization::UnicodeNormalization;

use crate::error::Result;
use crate::journal::store::EntryStore;
use crate::journal::types::Entry;

/// Field to order entries by.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SortCriterion {
    /// Cheapest first.
    Price,
    /// Best rated first; unrated last.
    Rating,
    /// Alphabetical.
    Name,
}

impl SortCriterion {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Price => "price",
            Self::Rating => "rating",
            Self::Name => "name",
        }
    }
}

impl std::fmt::Display for SortCriterion {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for SortCriterion {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s {
            "price" => Ok(Self::Price),
            "rating" => Ok(Self::Rating),
            "name" => Ok(Self::Name),
            _ => Err(format!("unknown sort criterion: {s}")),
        }
    }
}

/// Fetch all entries and order them by `criterion`. Ties keep store order.
pub async fn sort_by(store: &EntryStore, criterion: SortCriterion) -> Result<Vec<Entry>> {
    let mut entries = store.list_all().await?;
    sort_entries(&mut entries, criterion);
    tracing::debug!(criterion = %criterion, count = entries.len(), "entries sorted");
    Ok(entries)
}

/// Fetch all entries whose name, address, order or review contains `query`,
/// ignoring case. An empty query matches everything.
pub async fn search(store: &EntryStore, query: &str) -> Result<Vec<Entry>> {
    let entries = store.list_all().await?;
    let matched = filter_entries(entries, query);
    tracing::debug!(query, count = matched.len(), "entries searched");
    Ok(matched)
}

/// Stable in-place sort.
pub fn sort_entries(entries: &mut [Entry], criterion: SortCriterion) {
    match criterion {
        SortCriterion::Price => entries.sort_by(|a, b| a.price.total_cmp(&b.price)),
        SortCriterion::Rating => {
            entries.sort_by(|a, b| b.rating_or_zero().cmp(&a.rating_or_zero()))
        }
        SortCriterion::Name => entries.sort_by(|a, b| compare_names(&a.name, &b.name)),
    }
}

pub fn filter_entries(entries: Vec<Entry>, query: &str) -> Vec<Entry> {
    let needle = query.to_lowercase();
    if needle.is_empty() {
        return entries;
    }
    entries.into_iter().filter(|e| e.matches(&needle)).collect()
}

/// Collation for names, compared in three passes:
///
/// 1. base letters, ignoring case and accents (`Café` sits with `Cafe`,
///    ahead of `Cafz`);
/// 2. accents, on the decomposed lowercase form (`Cafe` < `Café`);
/// 3. exact code points (`Alto` < `alto`).
pub fn compare_names(a: &str, b: &str) -> Ordering {
    base_letters(a)
        .cmp(base_letters(b))
        .then_with(|| folded(a).cmp(folded(b)))
        .then_with(|| a.cmp(b))
}

fn folded(s: &str) -> impl Iterator<Item = char> + '_ {
    s.nfd().flat_map(char::to_lowercase)
}

fn base_letters(s: &str) -> impl Iterator<Item = char> + '_ {
    folded(s).filter(|c| !is_combining_mark(*c))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::journal::types::{EntryId, EntryInput};

    fn entry(id: i64, name: &str, price: f64, rating: Option<u8>) -> Entry {
        EntryInput::new(name)
            .price(price)
            .rating(rating)
            .into_entry(EntryId(id))
    }

    fn names(entries: &[Entry]) -> Vec<&str> {
        entries.iter().map(|e| e.name.as_str()).collect()
    }

    #[test]
    fn price_sort_is_ascending() {
        let mut v = vec![
            entry(1, "Luna", 4.5, Some(5)),
            entry(2, "Alto", 3.0, None),
            entry(3, "Beanery", 5.25, Some(3)),
        ];
        sort_entries(&mut v, SortCriterion::Price);
        assert_eq!(names(&v), ["Alto", "Luna", "Beanery"]);
    }

    #[test]
    fn rating_sort_puts_unrated_last() {
        let mut v = vec![
            entry(1, "Alto", 3.0, None),
            entry(2, "Luna", 4.5, Some(5)),
            entry(3, "Beanery", 5.25, Some(3)),
        ];
        sort_entries(&mut v, SortCriterion::Rating);
        assert_eq!(names(&v), ["Luna", "Beanery", "Alto"]);
    }

    #[test]
    fn sort_is_stable_for_ties() {
        let mut v = vec![
            entry(1, "First", 2.0, Some(4)),
            entry(2, "Second", 2.0, Some(4)),
            entry(3, "Third", 1.0, Some(4)),
        ];
        sort_entries(&mut v, SortCriterion::Price);
        assert_eq!(names(&v), ["Third", "First", "Second"]);

        sort_entries(&mut v, SortCriterion::Rating);
        assert_eq!(names(&v), ["Third", "First", "Second"]);
    }

    #[test]
    fn name_sort_ignores_case() {
        let mut v = vec![
            entry(1, "beanery", 0.0, None),
            entry(2, "Alto", 0.0, None),
            entry(3, "Café Luna", 0.0, None),
            entry(4, "alto", 0.0, None),
        ];
        sort_entries(&mut v, SortCriterion::Name);
        assert_eq!(names(&v), ["Alto", "alto", "beanery", "Café Luna"]);
    }

    #[test]
    fn name_sort_places_accented_letters_with_their_base() {
        let mut v = vec![
            entry(1, "Zebra", 0.0, None),
            entry(2, "Éclair", 0.0, None),
            entry(3, "Cafz", 0.0, None),
            entry(4, "Café", 0.0, None),
        ];
        sort_entries(&mut v, SortCriterion::Name);
        assert_eq!(names(&v), ["Café", "Cafz", "Éclair", "Zebra"]);
    }

    #[test]
    fn accents_break_ties_before_case() {
        assert_eq!(compare_names("Cafe", "Café"), Ordering::Less);
        assert_eq!(compare_names("café", "Cafe"), Ordering::Greater);
        assert_eq!(compare_names("Alto", "alto"), Ordering::Less);
        assert_eq!(compare_names("Café", "Cafe\u{301}"), Ordering::Greater);
    }

    #[test]
    fn empty_query_keeps_everything() {
        let v = vec![entry(1, "Luna", 0.0, None), entry(2, "Alto", 0.0, None)];
        assert_eq!(filter_entries(v.clone(), ""), v);
    }

    #[test]
    fn query_is_lowercased_before_matching() {
        let v = vec![entry(1, "Luna", 0.0, None), entry(2, "Alto", 0.0, None)];
        assert_eq!(names(&filter_entries(v.clone(), "ALT")), ["Alto"]);
        assert!(filter_entries(v, "mocha").is_empty());
    }

    #[test]
    fn criterion_parses_from_text() {
        assert_eq!("rating".parse::<SortCriterion>().unwrap(), SortCriterion::Rating);
        assert!("date".parse::<SortCriterion>().is_err());
    }
}
