//! Keyed-value aggregator: `grouping-key -> {attr -> float}` with additive
//! semantics. The reference grouping key is `(gear_id, time)`; the value
//! attrs are the fixed set `{a, hours_fished, value}`.
//!
//! Kept as explicit structs and a real array of attrs (not a dynamic
//! dictionary) so iteration over `value_attrs` is a plain slice walk.

use std::collections::BTreeMap;

/// The fixed set of numeric attributes summed per key.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum ValueAttr {
    A,
    HoursFished,
    Value,
}

impl ValueAttr {
    pub(crate) const ALL: [ValueAttr; 3] = [ValueAttr::A, ValueAttr::HoursFished, ValueAttr::Value];

    pub(crate) fn name(self) -> &'static str {
        match self {
            ValueAttr::A => "a",
            ValueAttr::HoursFished => "hours_fished",
            ValueAttr::Value => "value",
        }
    }
}

/// Default-zero values for the fixed attr set.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub(crate) struct ValuesDict {
    a: f64,
    hours_fished: f64,
    value: f64,
}

impl ValuesDict {
    pub(crate) fn get(&self, attr: ValueAttr) -> f64 {
        match attr {
            ValueAttr::A => self.a,
            ValueAttr::HoursFished => self.hours_fished,
            ValueAttr::Value => self.value,
        }
    }

    pub(crate) fn get_mut(&mut self, attr: ValueAttr) -> &mut f64 {
        match attr {
            ValueAttr::A => &mut self.a,
            ValueAttr::HoursFished => &mut self.hours_fished,
            ValueAttr::Value => &mut self.value,
        }
    }

    pub(crate) fn add(&mut self, attr: ValueAttr, amount: f64) {
        *self.get_mut(attr) += amount;
    }

    /// Scale every attr by `factor`, used to build a cracked cell's
    /// area-proportional share of its parent cell's current totals.
    pub(crate) fn scaled(&self, factor: f64) -> ValuesDict {
        ValuesDict { a: self.a * factor, hours_fished: self.hours_fished * factor, value: self.value * factor }
    }
}

/// Grouping key: `(gear_id, time)`. `time` is an integer year, coerced from
/// the raw float field during mapping (see `effort.rs`). A missing
/// component is `None`, and a key with any `None` component is distinct
/// from every key with a `Some` in that slot.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub(crate) struct EffortKey {
    pub gear_id: Option<String>,
    pub time: Option<i64>,
}

/// `EffortKey -> ValuesDict`, ordered for reproducible iteration.
pub(crate) type KeyedValues = BTreeMap<EffortKey, ValuesDict>;

/// Add `amount` for `attr` under `key`, creating a zeroed entry if absent.
pub(crate) fn add_value(kv: &mut KeyedValues, key: EffortKey, attr: ValueAttr, amount: f64) {
    kv.entry(key).or_default().add(attr, amount);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn values_dict_starts_zeroed() {
        let vd = ValuesDict::default();
        for attr in ValueAttr::ALL {
            assert_eq!(vd.get(attr), 0.0);
        }
    }

    #[test]
    fn add_value_accumulates() {
        let mut kv = KeyedValues::new();
        let key = EffortKey { gear_id: Some("GC10".into()), time: Some(2020) };
        add_value(&mut kv, key.clone(), ValueAttr::A, 1.0);
        add_value(&mut kv, key.clone(), ValueAttr::A, 2.0);
        assert_eq!(kv.get(&key).unwrap().get(ValueAttr::A), 3.0);
    }

    #[test]
    fn keys_with_none_are_distinct() {
        let mut kv = KeyedValues::new();
        add_value(&mut kv, EffortKey { gear_id: None, time: Some(2020) }, ValueAttr::A, 1.0);
        add_value(&mut kv, EffortKey { gear_id: Some("GC10".into()), time: Some(2020) }, ValueAttr::A, 1.0);
        assert_eq!(kv.len(), 2);
    }

    #[test]
    fn scaled_multiplies_every_attr() {
        let mut vd = ValuesDict::default();
        vd.add(ValueAttr::A, 4.0);
        vd.add(ValueAttr::Value, 2.0);
        let scaled = vd.scaled(0.5);
        assert_eq!(scaled.get(ValueAttr::A), 2.0);
        assert_eq!(scaled.get(ValueAttr::Value), 1.0);
    }
}
