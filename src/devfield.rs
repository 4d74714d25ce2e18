//! Developer-field (XDATA) stable key computation (§4.8) and the external
//! `xdata_registry` collaborator (§6): a caller-owned mapping from a stable
//! developer-field key to whatever metadata the embedding application keeps
//! for it.
//!
//! The design notes call out the source's "global XDATA registry mutated on
//! a database-open notification" as something to re-architect into an
//! explicit, caller-owned object with an explicit `reset()` rather than a
//! process global — this is that object.

use std::collections::HashMap;

/// Computes the stable key for a developer field, given the already-known
/// application guid for its developer-data index (if any), the field
/// definition number, and the raw field-name bytes from its
/// `field_description` message.
///
/// - If `app_guid` is `Some`, the key is `"<guid>-<field_number>"`.
/// - Otherwise, the key is the field name itself, decoded as UTF-8.
pub fn stable_key(app_guid: Option<&str>, field_number: u8, name: &str) -> String {
    match app_guid {
        Some(guid) => format!("{guid}-{field_number}"),
        None => name.to_string(),
    }
}

/// Converts a 16-byte application or developer id into a lowercase hex
/// string (GeoELAN renders UUID-shaped byte fields the same way when
/// surfacing them to callers).
pub fn hex_encode(bytes: &[u8]) -> String {
    let mut out = String::with_capacity(bytes.len() * 2);
    for b in bytes {
        out.push_str(&format!("{b:02x}"));
    }
    out
}

/// Per-process (really: per-owning-application) registry mapping a
/// developer field's stable key to caller-defined metadata. The crate never
/// creates or owns one itself; it is passed in by the embedding application,
/// which decides when to `reset()` it (e.g. on its own "database opened"
/// notification).
#[derive(Debug, Default, Clone)]
pub struct XdataRegistry<M> {
    entries: HashMap<String, M>,
}

impl<M> XdataRegistry<M> {
    pub fn new() -> Self {
        XdataRegistry { entries: HashMap::new() }
    }

    pub fn insert(&mut self, key: impl Into<String>, metadata: M) {
        self.entries.insert(key.into(), metadata);
    }

    pub fn get(&self, key: &str) -> Option<&M> {
        self.entries.get(key)
    }

    /// Flushes all registered metadata, the explicit analogue of the
    /// source's "reset on database-open notification" behavior.
    pub fn reset(&mut self) {
        self.entries.clear();
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stable_key_with_known_application() {
        assert_eq!(stable_key(Some("27dfb7e5900f4c2d80abc57015f42124"), 1, "eE"), "27dfb7e5900f4c2d80abc57015f42124-1");
    }

    #[test]
    fn stable_key_falls_back_to_field_name() {
        assert_eq!(stable_key(None, 1, "eE"), "eE");
    }

    #[test]
    fn hex_encode_is_lowercase_and_zero_padded() {
        assert_eq!(hex_encode(&[0x27, 0x0F, 0xFF]), "270fff");
    }

    #[test]
    fn registry_reset_clears_entries() {
        let mut reg = XdataRegistry::new();
        reg.insert("k", 1u32);
        assert_eq!(reg.len(), 1);
        reg.reset();
        assert!(reg.is_empty());
    }
}
