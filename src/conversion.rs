//! The `(global_message, field)` → conversion-descriptor table (§4.4, §9):
//! a small lookup from a decoded field's identity to a scale/offset pair,
//! applied element-wise to the raw value the codec produced before it
//! reaches the dispatcher.
//!
//! The distilled spec treats the *content* of this table (which fields carry
//! which scale/offset) as opaque, externally-owned configuration, the same
//! way `messages.rs`'s name tables are: nobody outside the FIT SDK's own
//! Profile.xlsx gets to invent a scale factor. What the core format layer
//! does own is the table *mechanism* itself, so [`ConversionTable`] ships a
//! handful of well-known FIT SDK entries as defaults and lets a caller
//! install its own via [`ConversionTable::insert`]/[`ConversionTable::new`]
//! for any message/field this crate doesn't seed.

use std::collections::HashMap;

use crate::messages::{GLOBAL_LAP, GLOBAL_RECORD, GLOBAL_SESSION};
use crate::value::FieldValue;

/// A scalar-to-scalar conversion: `real = raw / scale - offset`, the FIT SDK
/// convention for every scaled field in the Profile.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ConversionDescriptor {
    pub scale: f64,
    pub offset: f64,
}

impl ConversionDescriptor {
    pub fn new(scale: f64, offset: f64) -> Self {
        ConversionDescriptor { scale, offset }
    }

    pub fn identity() -> Self {
        ConversionDescriptor { scale: 1.0, offset: 0.0 }
    }

    pub fn is_identity(&self) -> bool {
        self.scale == 1.0 && self.offset == 0.0
    }

    fn convert(&self, raw: f64) -> f64 {
        raw / self.scale - self.offset
    }

    /// Applies the conversion element-wise: scalar numeric variants become
    /// `Float`, vector variants become `FloatVec` with "no value" slots
    /// preserved. Text/byte values and the identity descriptor pass through
    /// unchanged.
    pub fn apply(&self, value: FieldValue) -> FieldValue {
        if self.is_identity() {
            return value;
        }
        match value {
            FieldValue::UInt(v) => FieldValue::Float(self.convert(v as f64)),
            FieldValue::SInt(v) => FieldValue::Float(self.convert(v as f64)),
            FieldValue::Float(v) => FieldValue::Float(self.convert(v)),
            FieldValue::UIntVec(vs) => FieldValue::FloatVec(vs.into_iter().map(|o| o.map(|v| self.convert(v as f64))).collect()),
            FieldValue::SIntVec(vs) => FieldValue::FloatVec(vs.into_iter().map(|o| o.map(|v| self.convert(v as f64))).collect()),
            FieldValue::FloatVec(vs) => FieldValue::FloatVec(vs.into_iter().map(|o| o.map(|v| self.convert(v))).collect()),
            other @ (FieldValue::Text(_) | FieldValue::Bytes(_)) => other,
        }
    }
}

/// Lookup from `(global message id, field name)` to its
/// [`ConversionDescriptor`], consulted once per decoded field.
#[derive(Debug, Clone)]
pub struct ConversionTable {
    entries: HashMap<(u16, String), ConversionDescriptor>,
}

impl ConversionTable {
    /// An empty table: every field decodes at its raw wire value.
    pub fn new() -> Self {
        ConversionTable { entries: HashMap::new() }
    }

    pub fn insert(&mut self, global_id: u16, field_name: impl Into<String>, descriptor: ConversionDescriptor) {
        self.entries.insert((global_id, field_name.into()), descriptor);
    }

    /// Applies the registered descriptor for `(global_id, field_name)` to
    /// `value`, or returns `value` unchanged if no entry exists.
    pub fn apply(&self, global_id: u16, field_name: &str, value: FieldValue) -> FieldValue {
        match self.entries.get(&(global_id, field_name)) {
            Some(descriptor) => descriptor.apply(value),
            None => value,
        }
    }
}

impl Default for ConversionTable {
    /// A handful of the FIT SDK's own well-known scale/offset pairs, enough
    /// to demonstrate the mechanism without pretending to be a full Profile
    /// transcription. Callers decoding fields this table doesn't cover see
    /// them pass through unconverted, same as if no entry were registered.
    fn default() -> Self {
        let mut table = ConversionTable::new();
        table.insert(GLOBAL_RECORD, "speed", ConversionDescriptor::new(1000.0, 0.0));
        table.insert(GLOBAL_RECORD, "enhanced_speed", ConversionDescriptor::new(1000.0, 0.0));
        table.insert(GLOBAL_RECORD, "altitude", ConversionDescriptor::new(5.0, 500.0));
        table.insert(GLOBAL_RECORD, "enhanced_altitude", ConversionDescriptor::new(5.0, 500.0));
        table.insert(GLOBAL_RECORD, "distance", ConversionDescriptor::new(100.0, 0.0));
        table.insert(GLOBAL_SESSION, "total_distance", ConversionDescriptor::new(100.0, 0.0));
        table.insert(GLOBAL_SESSION, "avg_speed", ConversionDescriptor::new(1000.0, 0.0));
        table.insert(GLOBAL_SESSION, "max_speed", ConversionDescriptor::new(1000.0, 0.0));
        table.insert(GLOBAL_LAP, "total_distance", ConversionDescriptor::new(100.0, 0.0));
        table.insert(GLOBAL_LAP, "avg_speed", ConversionDescriptor::new(1000.0, 0.0));
        table.insert(GLOBAL_LAP, "max_speed", ConversionDescriptor::new(1000.0, 0.0));
        table
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn identity_descriptor_passes_values_through() {
        let d = ConversionDescriptor::identity();
        assert_eq!(d.apply(FieldValue::UInt(42)), FieldValue::UInt(42));
    }

    #[test]
    fn scale_and_offset_convert_a_scalar() {
        // record.altitude: scale 5, offset 500 -> (raw / 5) - 500
        let d = ConversionDescriptor::new(5.0, 500.0);
        assert_eq!(d.apply(FieldValue::UInt(2500)), FieldValue::Float(0.0));
    }

    #[test]
    fn vector_conversion_preserves_missing_slots() {
        let d = ConversionDescriptor::new(2.0, 0.0);
        let converted = d.apply(FieldValue::UIntVec(vec![Some(10), None, Some(20)]));
        assert_eq!(converted, FieldValue::FloatVec(vec![Some(5.0), None, Some(10.0)]));
    }

    #[test]
    fn table_applies_registered_entry_and_passes_through_unknown_fields() {
        let table = ConversionTable::default();
        let converted = table.apply(GLOBAL_RECORD, "speed", FieldValue::UInt(5000));
        assert_eq!(converted, FieldValue::Float(5.0));

        let untouched = table.apply(GLOBAL_RECORD, "heart_rate", FieldValue::UInt(150));
        assert_eq!(untouched, FieldValue::UInt(150));
    }
}
