use std::collections::HashMap;

/// Name of the fallback entry used for unresolvable references
pub const SENTINEL_NAME: &str = "unknown";

/// Normalize a reference name for lookup
pub fn normalize(name: &str) -> String {
    name.trim().to_lowercase()
}

/// Case-insensitive name -> entry table.
///
/// Later inserts under the same normalized name replace earlier ones.
#[derive(Debug, Clone)]
pub struct NameIndex<T> {
    entries: HashMap<String, T>,
}

impl<T> NameIndex<T> {
    pub fn new() -> Self {
        Self {
            entries: HashMap::new(),
        }
    }

    pub fn insert(&mut self, name: &str, entry: T) {
        self.entries.insert(normalize(name), entry);
    }

    pub fn get(&self, name: &str) -> Option<&T> {
        self.entries.get(&normalize(name))
    }

    pub fn sentinel(&self) -> Option<&T> {
        self.entries.get(SENTINEL_NAME)
    }

    pub fn has_sentinel(&self) -> bool {
        self.entries.contains_key(SENTINEL_NAME)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn values(&self) -> impl Iterator<Item = &T> {
        self.entries.values()
    }
}

impl<T> Default for NameIndex<T> {
    fn default() -> Self {
        Self::new()
    }
}

/// Outcome of resolving one referenced name
#[derive(Debug, Clone, PartialEq)]
pub enum Resolution<'a, T> {
    Found(&'a T),
    /// Name missing, fell back to the sentinel entry
    Fallback(&'a T),
    /// Name missing and there is no sentinel
    Unresolved,
}

impl<T> NameIndex<T> {
    pub fn resolve(&self, name: &str) -> Resolution<'_, T> {
        match (self.get(name), self.sentinel()) {
            (Some(entry), _) => Resolution::Found(entry),
            (None, Some(sentinel)) => Resolution::Fallback(sentinel),
            (None, None) => Resolution::Unresolved,
        }
    }
}
