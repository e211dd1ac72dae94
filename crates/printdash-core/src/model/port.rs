// ── Port registry ──
//
// Deduplicated set of serial ports seen across all printer hosts. The
// merge logic lives in `store/reconcile.rs`.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize, Serializer};

/// A discovered port. Identity is `(name, host_key)`: the same device path
/// on two hosts is two different ports.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Port {
    pub name: String,
    pub host_key: String,
    pub available: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub(crate) struct PortKey {
    pub(crate) name: String,
    pub(crate) host_key: String,
}

impl PortKey {
    pub(crate) fn new(name: &str, host_key: &str) -> Self {
        Self {
            name: name.to_owned(),
            host_key: host_key.to_owned(),
        }
    }
}

/// Ports in first-seen order, unique by `(name, host_key)`.
///
/// Entries are never removed; only their availability changes.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PortRegistry {
    pub(crate) entries: IndexMap<PortKey, Port>,
}

impl PortRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, name: &str, host_key: &str) -> Option<&Port> {
        self.entries.get(&PortKey::new(name, host_key))
    }

    pub fn iter(&self) -> impl Iterator<Item = &Port> {
        self.entries.values()
    }

    /// Ports no printer currently has selected.
    pub fn free(&self) -> impl Iterator<Item = &Port> {
        self.iter().filter(|p| p.available)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn to_vec(&self) -> Vec<Port> {
        self.iter().cloned().collect()
    }
}

impl Serialize for PortRegistry {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_seq(self.entries.values())
    }
}
