//! Flat `opcode -> name` lookup, rebuilt whenever the region changes.
//!
//! The upstream tables are split per region into a server-to-client list and
//! a client-to-server list. This module only knows how to merge two
//! `(name, opcode)` lists into one lookup table; fetching those lists for a
//! region is `wiresniff-config`'s job.

use std::{collections::HashMap, sync::Arc};

/// Name returned for an opcode absent from the index.
pub const UNKNOWN_NAME: &str = "unknown";

/// Lower the first character of `name`, leaving the rest untouched.
///
/// The upstream catalog names messages in UpperCamelCase (`NpcSpawn`); this
/// protocol's decoder registry keys on the lowerCamelCase form
/// (`npcSpawn`), matching how the message names are surfaced on the `message`
/// event.
#[must_use]
pub fn lower_first(name: &str) -> String {
    let mut chars = name.chars();
    match chars.next() {
        Some(first) => first.to_lowercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// Flat opcode-to-name lookup for the currently selected region.
#[derive(Debug, Clone, Default)]
pub struct OpcodeIndex {
    names: HashMap<u16, Arc<str>>,
}

impl OpcodeIndex {
    /// An index with no entries; every lookup returns [`UNKNOWN_NAME`].
    #[must_use]
    pub fn empty() -> Self {
        Self { names: HashMap::new() }
    }

    /// Build an index by merging two `(name, opcode)` lists for one region.
    ///
    /// `server_zone` is merged first, `client_zone` second, so a collision
    /// (the same opcode present in both lists) takes the `client_zone`
    /// entry. This mirrors observed upstream behavior and is documented as
    /// benign: in practice the two lists are disjoint.
    #[must_use]
    pub fn build<'a>(
        server_zone: impl IntoIterator<Item = (&'a str, u16)>,
        client_zone: impl IntoIterator<Item = (&'a str, u16)>,
    ) -> Self {
        let mut names = HashMap::new();
        for (name, opcode) in server_zone {
            names.insert(opcode, Arc::from(lower_first(name)));
        }
        for (name, opcode) in client_zone {
            names.insert(opcode, Arc::from(lower_first(name)));
        }
        Self { names }
    }

    /// Look up the name for `opcode`, or [`UNKNOWN_NAME`] if absent.
    #[must_use]
    pub fn lookup(&self, opcode: u16) -> Arc<str> {
        self.names.get(&opcode).cloned().unwrap_or_else(|| Arc::from(UNKNOWN_NAME))
    }

    /// Number of opcodes currently mapped.
    #[must_use]
    pub fn len(&self) -> usize {
        self.names.len()
    }

    /// Whether the index has no entries.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lower_first_lowers_only_leading_char() {
        assert_eq!(lower_first("NpcSpawn"), "npcSpawn");
        assert_eq!(lower_first("A"), "a");
        assert_eq!(lower_first(""), "");
    }

    #[test]
    fn unknown_opcode_returns_unknown() {
        let index = OpcodeIndex::empty();
        assert_eq!(&*index.lookup(0x1234), UNKNOWN_NAME);
    }

    #[test]
    fn disjoint_lists_merge_cleanly() {
        let index = OpcodeIndex::build([("NpcSpawn", 0x100)], [("ChatMessage", 0x200)]);
        assert_eq!(&*index.lookup(0x100), "npcSpawn");
        assert_eq!(&*index.lookup(0x200), "chatMessage");
        assert_eq!(index.len(), 2);
    }

    #[test]
    fn colliding_opcode_prefers_client_zone() {
        let index = OpcodeIndex::build([("ServerName", 0x50)], [("ClientName", 0x50)]);
        assert_eq!(&*index.lookup(0x50), "clientName");
    }
}
