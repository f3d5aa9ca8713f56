//! Core journal type definitions.
//!
//! Defines [`EntryId`] (the store-assigned key), [`Entry`] (a persisted
//! record), [`EntryInput`] (what a caller supplies to create one), [`Photo`]
//! (raw image bytes) and the lenient parsers used when input arrives as text.

use serde::{Deserialize, Serialize};

/// Store-assigned identifier of an entry. Never reused within a database.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EntryId(pub i64);

impl std::fmt::Display for EntryId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl std::str::FromStr for EntryId {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.trim()
            .parse::<i64>()
            .map(EntryId)
            .map_err(|_| format!("invalid entry id: {s}"))
    }
}

/// Raw image bytes stored alongside an entry.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Photo(pub Vec<u8>);

impl Photo {
    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl std::fmt::Debug for Photo {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Photo({} bytes)", self.0.len())
    }
}

/// A recorded coffee shop visit, matching the `entries` table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Entry {
    pub id: EntryId,
    pub name: String,
    pub address: String,
    /// The item ordered.
    pub order: String,
    pub price: f64,
    /// 1–5, `None` when not rated.
    pub rating: Option<u8>,
    pub review: String,
    pub photo: Option<Photo>,
}

impl Entry {
    /// Rating used for ordering: unrated counts as zero.
    pub fn rating_or_zero(&self) -> u8 {
        self.rating.unwrap_or(0)
    }

    /// Whether `needle` (already lowercased) occurs in any searchable field.
    pub(crate) fn matches(&self, needle: &str) -> bool {
        [&self.name, &self.address, &self.order, &self.review]
            .iter()
            .any(|field| field.to_lowercase().contains(needle))
    }
}

/// Fields supplied when creating an entry. The id is assigned by the store.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EntryInput {
    pub name: String,
    pub address: String,
    pub order: String,
    pub price: f64,
    pub rating: Option<u8>,
    pub review: String,
    pub photo: Option<Photo>,
}

impl EntryInput {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    pub fn address(mut self, address: impl Into<String>) -> Self {
        self.address = address.into();
        self
    }

    pub fn order(mut self, order: impl Into<String>) -> Self {
        self.order = order.into();
        self
    }

    pub fn price(mut self, price: f64) -> Self {
        self.price = price;
        self
    }

    pub fn rating(mut self, rating: Option<u8>) -> Self {
        self.rating = rating;
        self
    }

    pub fn review(mut self, review: impl Into<String>) -> Self {
        self.review = review.into();
        self
    }

    pub fn photo(mut self, photo: Option<Photo>) -> Self {
        self.photo = photo;
        self
    }

    /// Attach the store-assigned id, producing the persisted form.
    pub fn into_entry(self, id: EntryId) -> Entry {
        Entry {
            id,
            name: self.name,
            address: self.address,
            order: self.order,
            price: self.price,
            rating: self.rating,
            review: self.review,
            photo: self.photo,
        }
    }
}

/// Parse a price typed by the user. Anything that is not a finite,
/// non-negative number becomes `0.0`.
///
/// Like a browser's `parseFloat`, a leading numeric prefix is accepted,
/// exponent included (`"4.50 eur"` → `4.5`, `"1e3"` → `1000`).
pub fn parse_price(raw: &str) -> f64 {
    let trimmed = raw.trim_start();
    let prefix_len = numeric_prefix_len(trimmed);
    match trimmed[..prefix_len].parse::<f64>() {
        Ok(v) if v.is_finite() && v >= 0.0 => v,
        _ => 0.0,
    }
}

/// Length of the longest `[+-]digits[.digits][(e|E)[+-]digits]` prefix.
fn numeric_prefix_len(s: &str) -> usize {
    let bytes = s.as_bytes();
    let mut i = 0;
    if matches!(bytes.first(), Some(b'+') | Some(b'-')) {
        i += 1;
    }
    let mut seen_digit = false;
    let mut seen_dot = false;
    let mut end = 0;
    while i < bytes.len() {
        match bytes[i] {
            b'0'..=b'9' => {
                seen_digit = true;
                end = i + 1;
            }
            b'.' if !seen_dot => seen_dot = true,
            _ => break,
        }
        i += 1;
    }
    if !seen_digit {
        return 0;
    }

    // Exponent only counts when at least one digit follows it
    if matches!(bytes.get(i), Some(b'e') | Some(b'E')) {
        let mut j = i + 1;
        if matches!(bytes.get(j), Some(b'+') | Some(b'-')) {
            j += 1;
        }
        let digits = bytes[j.min(bytes.len())..]
            .iter()
            .take_while(|b| b.is_ascii_digit())
            .count();
        if digits > 0 {
            end = j + digits;
        }
    }
    end
}

/// Parse a rating choice. Only `1`–`5` count; anything else is "not rated".
pub fn parse_rating(raw: &str) -> Option<u8> {
    raw.trim()
        .parse::<u8>()
        .ok()
        .filter(|r| (1..=5).contains(r))
}
