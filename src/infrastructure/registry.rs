//! Concurrent in-memory URL registry.

use crate::domain::entities::ShortLink;
use dashmap::DashMap;
use dashmap::mapref::entry::Entry;

/// Mapping from short identifier to destination URL.
///
/// Backed by a sharded [`DashMap`]: readers and writers touching different keys
/// do not contend on a global lock, and an entry is only ever visible fully
/// written. Absence is reported as `None`, never as an error.
#[derive(Debug, Default)]
pub struct UrlRegistry {
    links: DashMap<String, String>,
}

impl UrlRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts a mapping, overwriting any previous destination for `id`.
    pub fn put(&self, id: impl Into<String>, url: impl Into<String>) {
        self.links.insert(id.into(), url.into());
    }

    /// Inserts a [`ShortLink`].
    pub fn insert_link(&self, link: ShortLink) {
        self.links.insert(link.id, link.url);
    }

    /// Inserts a mapping only if `id` is unused; returns whether it was inserted.
    pub fn insert_new(&self, id: &str, url: &str) -> bool {
        match self.links.entry(id.to_string()) {
            Entry::Occupied(_) => false,
            Entry::Vacant(slot) => {
                slot.insert(url.to_string());
                true
            }
        }
    }

    pub fn get(&self, id: &str) -> Option<String> {
        self.links.get(id).map(|entry| entry.value().clone())
    }

    /// Removes a mapping and returns its destination if it existed.
    pub fn remove(&self, id: &str) -> Option<String> {
        self.links.remove(id).map(|(_, url)| url)
    }

    pub fn contains(&self, id: &str) -> bool {
        self.links.contains_key(id)
    }

    pub fn clear(&self) {
        self.links.clear();
    }

    pub fn len(&self) -> usize {
        self.links.len()
    }

    pub fn is_empty(&self) -> bool {
        self.links.is_empty()
    }
}
