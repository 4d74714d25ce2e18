//! Decoded field values and the insertion-ordered [`Message`] representation.
//!
//! The source material represents a decoded record as an association list of
//! `(field-name . value)` pairs with "first wins" lookup semantics (useful
//! when a developer field happens to share a name with a native one). Rather
//! than translate that literally, `Message` is a small insertion-ordered map:
//! a `Vec<(String, FieldValue)>` with `get`/`prepend` helpers that preserve
//! the same first-wins, prepend-and-displace behavior the builder's
//! `process_fields` step depends on.

/// A single decoded FIT field value.
///
/// FIT's sixteen base types collapse into six semantic shapes here: signed
/// and unsigned scalars are kept distinct (several FIT types, e.g. `uint32z`
/// and `byte`, are unsigned-only and should not be silently reinterpreted),
/// floats, text, raw byte strings, and same-type vectors whose elements may
/// be independently "no value" (a field whose byte size exceeds one type
/// width, per §4.2).
#[derive(Debug, Clone, PartialEq)]
pub enum FieldValue {
    SInt(i64),
    UInt(u64),
    Float(f64),
    Text(String),
    Bytes(Vec<u8>),
    SIntVec(Vec<Option<i64>>),
    UIntVec(Vec<Option<u64>>),
    FloatVec(Vec<Option<f64>>),
}

impl FieldValue {
    /// Widens any scalar numeric variant to `i64`. Vectors and text return `None`.
    pub fn as_i64(&self) -> Option<i64> {
        match self {
            FieldValue::SInt(v) => Some(*v),
            FieldValue::UInt(v) => Some(*v as i64),
            FieldValue::Float(v) => Some(*v as i64),
            _ => None,
        }
    }

    /// Widens any scalar numeric variant to `f64`. Vectors and text return `None`.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            FieldValue::SInt(v) => Some(*v as f64),
            FieldValue::UInt(v) => Some(*v as f64),
            FieldValue::Float(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            FieldValue::Text(s) => Some(s.as_str()),
            _ => None,
        }
    }

    pub fn as_bytes(&self) -> Option<&[u8]> {
        match self {
            FieldValue::Bytes(b) => Some(b.as_slice()),
            _ => None,
        }
    }

    /// Number of elements for vector variants; `1` for scalars (including text
    /// and bytes, which are a single logical value), used by index-extracting
    /// derived-field rules (e.g. power-phase start/end).
    pub fn len(&self) -> usize {
        match self {
            FieldValue::SIntVec(v) => v.len(),
            FieldValue::UIntVec(v) => v.len(),
            FieldValue::FloatVec(v) => v.len(),
            _ => 1,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Extracts element `idx` as a scalar `f64`, from either a vector variant
    /// (`None` if that slot is itself "no value") or, for `idx == 0`, a plain
    /// scalar.
    pub fn element_f64(&self, idx: usize) -> Option<f64> {
        match self {
            FieldValue::SIntVec(v) => v.get(idx).copied().flatten().map(|x| x as f64),
            FieldValue::UIntVec(v) => v.get(idx).copied().flatten().map(|x| x as f64),
            FieldValue::FloatVec(v) => v.get(idx).copied().flatten(),
            _ if idx == 0 => self.as_f64(),
            _ => None,
        }
    }
}

/// An ordered sequence of `(field name, value)` entries decoded from one FIT
/// data message (or synthesized by the activity builder). Lookups resolve to
/// the first matching entry; [`Message::prepend`] removes any existing
/// entries under the same name before inserting at the front, which is how
/// derived fields (§4.6 `process_fields`) take priority without leaving stale
/// duplicates behind.
#[derive(Debug, Clone, Default)]
pub struct Message {
    entries: Vec<(String, FieldValue)>,
}

impl Message {
    pub fn new() -> Self {
        Message { entries: Vec::new() }
    }

    pub fn push(&mut self, name: impl Into<String>, value: FieldValue) {
        self.entries.push((name.into(), value));
    }

    /// Removes every entry named `name`, then inserts `(name, value)` at the front.
    pub fn prepend(&mut self, name: impl Into<String>, value: FieldValue) {
        let name = name.into();
        self.entries.retain(|(n, _)| n != &name);
        self.entries.insert(0, (name, value));
    }

    pub fn remove(&mut self, name: &str) -> Option<FieldValue> {
        if let Some(idx) = self.entries.iter().position(|(n, _)| n == name) {
            Some(self.entries.remove(idx).1)
        } else {
            None
        }
    }

    pub fn get(&self, name: &str) -> Option<&FieldValue> {
        self.entries.iter().find(|(n, _)| n == name).map(|(_, v)| v)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.entries.iter().any(|(n, _)| n == name)
    }

    pub fn iter(&self) -> impl Iterator<Item = &(String, FieldValue)> {
        self.entries.iter()
    }

    pub fn into_iter(self) -> impl Iterator<Item = (String, FieldValue)> {
        self.entries.into_iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Merges `other`'s entries by appending them (used by `on-record` when
    /// two records share a timestamp and a device has split one sample
    /// across multiple FIT records, §4.6).
    pub fn append(&mut self, other: Message) {
        self.entries.extend(other.entries);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn get_resolves_first_match() {
        let mut m = Message::new();
        m.push("cadence", FieldValue::UInt(85));
        m.push("cadence", FieldValue::UInt(99));
        assert_eq!(m.get("cadence").unwrap().as_i64(), Some(85));
    }

    #[test]
    fn prepend_displaces_existing_entries() {
        let mut m = Message::new();
        m.push("cadence", FieldValue::UInt(85));
        m.push("other", FieldValue::UInt(1));
        m.prepend("cadence", FieldValue::Float(85.5));
        assert_eq!(m.len(), 2);
        assert_eq!(m.get("cadence").unwrap().as_f64(), Some(85.5));
    }

    #[test]
    fn element_f64_indexes_vectors() {
        let v = FieldValue::UIntVec(vec![Some(10), None, Some(30)]);
        assert_eq!(v.element_f64(0), Some(10.0));
        assert_eq!(v.element_f64(1), None);
        assert_eq!(v.element_f64(2), Some(30.0));
    }
}
