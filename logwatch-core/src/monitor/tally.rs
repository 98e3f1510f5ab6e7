use serde::Serialize;
use std::collections::HashMap;

/// Per-key hit counter.
///
/// Invariant: no key ever maps to zero. Decrementing a key down to zero
/// removes it, so the key set is exactly the set of values present in the
/// window.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct Tally(HashMap<String, u64>);

impl Tally {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn increment(&mut self, key: &str) {
        match self.0.get_mut(key) {
            Some(count) => *count += 1,
            None => {
                self.0.insert(key.to_string(), 1);
            }
        }
    }

    /// Returns `false` when the key was not present.
    pub fn decrement(&mut self, key: &str) -> bool {
        match self.0.get_mut(key) {
            Some(count) if *count > 1 => {
                *count -= 1;
                true
            }
            Some(_) => {
                self.0.remove(key);
                true
            }
            None => false,
        }
    }

    pub fn get(&self, key: &str) -> u64 {
        self.0.get(key).copied().unwrap_or(0)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn total(&self) -> u64 {
        self.0.values().sum()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, u64)> {
        self.0.iter().map(|(k, v)| (k.as_str(), *v))
    }

    pub fn top(&self, n: usize) -> Vec<(String, u64)> {
        top_entries(&self.0, n)
    }

    pub fn to_map(&self) -> HashMap<String, u64> {
        self.0.clone()
    }
}

/// The `n` most frequent entries, highest count first. Ties are broken by
/// key so the ordering is stable between renders.
pub fn top_entries(counts: &HashMap<String, u64>, n: usize) -> Vec<(String, u64)> {
    let mut entries: Vec<_> = counts.iter().map(|(k, v)| (k.clone(), *v)).collect();
    entries.sort_by(|(ka, ca), (kb, cb)| cb.cmp(ca).then_with(|| ka.cmp(kb)));
    entries.truncate(n);
    entries
}
