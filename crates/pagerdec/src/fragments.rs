//! FLEX fragment reassembly

use std::collections::HashMap;

/// Partial FLEX messages awaiting completion, keyed by address
///
/// Holds at most one fragment per address. Storing a new fragment
/// for an address replaces any older one. Fragments which are never
/// completed stay until they are replaced.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct FragmentStore {
    pending: HashMap<String, String>,
}

impl FragmentStore {
    /// Create an empty store
    pub fn new() -> Self {
        Self::default()
    }

    /// Hold `text` for `address`, replacing any older fragment
    pub fn insert<A, T>(&mut self, address: A, text: T)
    where
        A: Into<String>,
        T: Into<String>,
    {
        self.pending.insert(address.into(), text.into());
    }

    /// Peek at the fragment held for `address`
    pub fn get(&self, address: &str) -> Option<&str> {
        self.pending.get(address).map(String::as_str)
    }

    /// Remove and return the fragment held for `address`
    pub fn take(&mut self, address: &str) -> Option<String> {
        self.pending.remove(address)
    }

    /// True if a fragment is held for `address`
    pub fn contains(&self, address: &str) -> bool {
        self.pending.contains_key(address)
    }

    /// Number of held fragments
    pub fn len(&self) -> usize {
        self.pending.len()
    }

    /// True if no fragments are held
    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }
}
