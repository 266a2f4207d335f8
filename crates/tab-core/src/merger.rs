//! Attribute merging under per-key policies.
//!
//! Keys in the additive set are unioned with first-seen order, a single
//! value counting as a one-element list; structured (map) additive values
//! are unioned per sub-key. Every other key is replaced wholesale by the
//! more specific value.

use crate::model::ADDITIVE_KEY;
use crate::ordered_set::OrderedSet;
use crate::value::{Attributes, Value};

/// Merge `addon` over `base` without mutating either.
///
/// `additive_keys` names the keys merged as unions. `additiveAttributes`
/// is always merged as a union, declared or not.
pub fn merge(
    base: &Attributes,
    addon: &Attributes,
    additive_keys: &OrderedSet<String>,
) -> Attributes {
    let mut result = base.clone();
    for (key, value) in addon {
        let merged = if key == ADDITIVE_KEY || additive_keys.contains(key) {
            union(base.get(key), value)
        } else {
            value.clone()
        };
        result.insert(key.clone(), merged);
    }
    result
}

/// Additive union of two values.
///
/// Maps are unioned per sub-key. Anything else is treated as a sequence,
/// with a single value counting as a one-element sequence, and the result
/// is the first-seen-order union of both sides.
pub fn union(base: Option<&Value>, addon: &Value) -> Value {
    match addon {
        Value::Map(addon_map) => union_map(base, addon_map),
        _ => union_items(base, addon),
    }
}

/// Union of one sub-field inside a structured value. Lists and maps are
/// unioned; a single value replaces the previous one.
fn union_field(base: Option<&Value>, addon: &Value) -> Value {
    match addon {
        Value::Map(addon_map) => union_map(base, addon_map),
        Value::List(_) => union_items(base, addon),
        scalar => scalar.clone(),
    }
}

fn union_map(base: Option<&Value>, addon_map: &Attributes) -> Value {
    let mut result = match base {
        Some(Value::Map(base_map)) => base_map.clone(),
        _ => Attributes::new(),
    };
    for (sub_key, sub_value) in addon_map {
        let merged = union_field(result.get(sub_key), sub_value);
        result.insert(sub_key.clone(), merged);
    }
    Value::Map(result)
}

fn union_items(base: Option<&Value>, addon: &Value) -> Value {
    let mut items: OrderedSet<Value> = items_of(base).collect();
    items.extend(items_of(Some(addon)));
    Value::List(items.into_vec())
}

fn items_of(value: Option<&Value>) -> impl Iterator<Item = Value> {
    let items = match value {
        Some(Value::List(items)) => items.clone(),
        Some(Value::Null) | Some(Value::Map(_)) | None => Vec::new(),
        Some(single) => vec![single.clone()],
    };
    items.into_iter()
}

#[cfg(test)]
mod tests {
    use proptest::prelude::*;
    use serde_json::json;

    use super::*;
    use crate::value::attributes_from_json;

    fn attrs(json: serde_json::Value) -> Attributes {
        attributes_from_json(json).unwrap()
    }

    fn keys(names: &[&str]) -> OrderedSet<String> {
        names.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn non_additive_key_is_replaced() {
        let base = attrs(json!({"mass": 1, "grammar": {"nouns": ["rock"]}}));
        let addon = attrs(json!({"mass": 5, "grammar": {"adjectives": ["grey"]}}));
        let merged = merge(&base, &addon, &keys(&[]));
        assert_eq!(merged["mass"], Value::Integer(5));
        assert_eq!(merged["grammar"], Value::from(json!({"adjectives": ["grey"]})));
    }

    #[test]
    fn additive_key_is_unioned_in_first_seen_order() {
        let base = attrs(json!({"behaviors": ["thing", "object"]}));
        let addon = attrs(json!({"behaviors": ["ball", "thing"]}));
        let merged = merge(&base, &addon, &keys(&["behaviors"]));
        assert_eq!(merged["behaviors"], Value::from(json!(["thing", "object", "ball"])));
    }

    #[test]
    fn additive_key_missing_from_base_starts_empty() {
        let merged = merge(
            &Attributes::new(),
            &attrs(json!({"behaviors": ["a", "a", "b"]})),
            &keys(&["behaviors"]),
        );
        assert_eq!(merged["behaviors"], Value::from(json!(["a", "b"])));
    }

    #[test]
    fn additive_attributes_key_is_always_unioned() {
        let base = attrs(json!({"additiveAttributes": ["behaviors"]}));
        let addon = attrs(json!({"additiveAttributes": ["grammar"]}));
        let merged = merge(&base, &addon, &keys(&[]));
        assert_eq!(
            merged[ADDITIVE_KEY],
            Value::from(json!(["behaviors", "grammar"]))
        );
    }

    #[test]
    fn additive_single_value_is_appended() {
        let base = attrs(json!({"behaviors": ["thing", "object"]}));
        let merged = merge(&base, &attrs(json!({"behaviors": "ball"})), &keys(&["behaviors"]));
        assert_eq!(merged["behaviors"], Value::from(json!(["thing", "object", "ball"])));

        let again = merge(&merged, &attrs(json!({"behaviors": "thing"})), &keys(&["behaviors"]));
        assert_eq!(again["behaviors"], Value::from(json!(["thing", "object", "ball"])));
    }

    #[test]
    fn single_additive_attributes_entry_keeps_inherited_ones() {
        let base = attrs(json!({"additiveAttributes": ["behaviors"]}));
        let addon = attrs(json!({"additiveAttributes": "grammar"}));
        let merged = merge(&base, &addon, &keys(&[]));
        assert_eq!(
            merged[ADDITIVE_KEY],
            Value::from(json!(["behaviors", "grammar"]))
        );
    }

    #[test]
    fn structured_additive_value_unions_per_sub_key() {
        let base = attrs(json!({"grammar": {"nouns": ["bag"], "adjectives": ["small"]}}));
        let addon = attrs(json!({"grammar": {"nouns": ["sack", "bag"], "article": "the"}}));
        let merged = merge(&base, &addon, &keys(&["grammar"]));
        assert_eq!(
            merged["grammar"],
            Value::from(json!({
                "nouns": ["bag", "sack"],
                "adjectives": ["small"],
                "article": "the"
            }))
        );
    }

    #[test]
    fn base_only_keys_carry_through() {
        let base = attrs(json!({"mass": 1, "name": "rock"}));
        let merged = merge(&base, &attrs(json!({"name": "pebble"})), &keys(&[]));
        assert_eq!(merged["mass"], Value::Integer(1));
        assert_eq!(merged["name"], Value::from("pebble"));
    }

    #[test]
    fn inputs_are_not_mutated() {
        let base = attrs(json!({"behaviors": ["thing"]}));
        let addon = attrs(json!({"behaviors": ["object"]}));
        let _ = merge(&base, &addon, &keys(&["behaviors"]));
        assert_eq!(base["behaviors"], Value::from(json!(["thing"])));
        assert_eq!(addon["behaviors"], Value::from(json!(["object"])));
    }

    fn small_list() -> impl Strategy<Value = Vec<i64>> {
        prop::collection::vec(0i64..8, 0..6)
    }

    /// Either a bare integer or a list of integers.
    fn single_or_list() -> impl Strategy<Value = Value> {
        prop_oneof![
            (0i64..8).prop_map(Value::Integer),
            small_list()
                .prop_map(|items| Value::List(items.into_iter().map(Value::Integer).collect())),
        ]
    }

    fn tagged(value: &Value) -> Attributes {
        let mut map = Attributes::new();
        map.insert("tags".to_string(), value.clone());
        map
    }

    fn as_sorted(value: &Value) -> Vec<i64> {
        let mut out: Vec<i64> = value
            .as_list()
            .unwrap_or(&[])
            .iter()
            .filter_map(Value::as_i64)
            .collect();
        out.sort_unstable();
        out
    }

    fn list_attrs(key: &str, items: &[i64]) -> Attributes {
        let mut map = Attributes::new();
        map.insert(
            key.to_string(),
            Value::List(items.iter().copied().map(Value::Integer).collect()),
        );
        map
    }

    proptest! {
        #[test]
        fn merging_empty_addon_is_identity(items in small_list(), mass in any::<i64>()) {
            let mut base = list_attrs("behaviors", &items);
            base.insert("mass".into(), Value::Integer(mass));
            let merged = merge(&base, &Attributes::new(), &keys(&["behaviors"]));
            prop_assert_eq!(merged, base);
        }

        #[test]
        fn additive_union_is_commutative_as_a_set(a in single_or_list(), b in single_or_list()) {
            let additive = keys(&["tags"]);
            let ab = merge(&tagged(&a), &tagged(&b), &additive);
            let ba = merge(&tagged(&b), &tagged(&a), &additive);
            prop_assert_eq!(as_sorted(&ab["tags"]), as_sorted(&ba["tags"]));
        }

        #[test]
        fn additive_union_has_no_duplicates(a in small_list(), b in small_list()) {
            let additive = keys(&["tags"]);
            let merged = merge(&list_attrs("tags", &a), &list_attrs("tags", &b), &additive);
            let sorted = as_sorted(&merged["tags"]);
            let mut deduped = sorted.clone();
            deduped.dedup();
            prop_assert_eq!(sorted, deduped);
        }

        #[test]
        fn non_additive_key_takes_last_value(x in any::<i64>(), y in any::<i64>()) {
            let mut first = Attributes::new();
            first.insert("mass".into(), Value::Integer(x));
            let mut second = Attributes::new();
            second.insert("mass".into(), Value::Integer(y));
            let merged = merge(&first, &second, &keys(&[]));
            prop_assert_eq!(&merged["mass"], &Value::Integer(y));
            let reversed = merge(&second, &first, &keys(&[]));
            prop_assert_eq!(&reversed["mass"], &Value::Integer(x));
        }
    }
}
