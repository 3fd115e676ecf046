//! Base stores: the per-base `items` mapping of item id to quantity.
//!
//! Quantity zero means the key must not exist at all — the engine treats a
//! present-but-zero entry as a distinct (and confusing) state, so setting a
//! quantity to zero deletes the key.

use super::{EditError, ValidationError, bases, display_label};
use crate::changes::ChangeEntry;
use crate::statics;
use crate::tracker::ChangeTracker;
use crate::value::{Mapping, Value};
use indexmap::IndexMap;

fn items_path(base: usize) -> String {
    format!("{}.{base}.{}", statics::OX_BASES, statics::OX_ITEMS)
}

/// The item/quantity map of one base. Missing or malformed stores read as
/// empty; non-integer quantities are skipped.
pub fn base_inventory(doc: &Value, base: usize) -> IndexMap<String, i64> {
    bases(doc)
        .get(base)
        .and_then(|b| b.get(statics::OX_ITEMS))
        .and_then(Value::as_mapping)
        .map(|map| {
            map.iter()
                .filter_map(|(k, v)| v.as_i64().map(|q| (k.clone(), q)))
                .collect()
        })
        .unwrap_or_default()
}

/// Inventories of every base, indexed by base position.
pub fn all_inventories(doc: &Value) -> Vec<(usize, IndexMap<String, i64>)> {
    (0..bases(doc).len())
        .map(|i| (i, base_inventory(doc, i)))
        .collect()
}

pub fn quantity(doc: &Value, base: usize, item: &str) -> i64 {
    base_inventory(doc, base).get(item).copied().unwrap_or(0)
}

/// Set one item's quantity. Zero deletes the key; positive upserts.
pub fn set_quantity(
    tracker: &mut ChangeTracker,
    base: usize,
    item: &str,
    qty: i64,
) -> Result<(), EditError> {
    if qty < 0 {
        return Err(ValidationError::NegativeAmount {
            what: "item quantity",
            value: qty,
        }
        .into());
    }

    if qty == 0 {
        let Some(mut map) = tracker
            .read(&items_path(base))?
            .and_then(Value::as_mapping)
            .cloned()
        else {
            return Ok(());
        };
        if map.shift_remove(item).is_some() {
            tracker.write(&items_path(base), Value::Mapping(map))?;
        }
        return Ok(());
    }

    tracker.write(&format!("{}.{item}", items_path(base)), Value::from(qty))?;
    Ok(())
}

/// Add `qty` (positive) of an item to a base's stores.
pub fn add_item(
    tracker: &mut ChangeTracker,
    base: usize,
    item: &str,
    qty: i64,
) -> Result<(), EditError> {
    if qty <= 0 {
        return Err(ValidationError::AmountNotPositive {
            what: "quantity to add",
            value: qty,
        }
        .into());
    }
    let current = quantity(tracker.current(), base, item);
    set_quantity(tracker, base, item, current + qty)
}

/// Remove `qty` of an item, or everything when `qty` is `None`. Removal past
/// zero floors at zero (which deletes the key).
pub fn remove_item(
    tracker: &mut ChangeTracker,
    base: usize,
    item: &str,
    qty: Option<i64>,
) -> Result<(), EditError> {
    match qty {
        None => set_quantity(tracker, base, item, 0),
        Some(n) if n <= 0 => Err(ValidationError::AmountNotPositive {
            what: "quantity to remove",
            value: n,
        }
        .into()),
        Some(n) => {
            let current = quantity(tracker.current(), base, item);
            set_quantity(tracker, base, item, (current - n).max(0))
        }
    }
}

/// Every distinct item id across all bases, sorted.
pub fn unique_items(doc: &Value) -> Vec<String> {
    let mut items: Vec<String> = all_inventories(doc)
        .into_iter()
        .flat_map(|(_, inv)| inv.into_keys())
        .collect();
    items.sort();
    items.dedup();
    items
}

/// Total quantity of each item across all bases.
pub fn totals(doc: &Value) -> IndexMap<String, i64> {
    let mut totals = IndexMap::new();
    for (_, inventory) in all_inventories(doc) {
        for (item, qty) in inventory {
            *totals.entry(item).or_insert(0) += qty;
        }
    }
    totals
}

/// Case-insensitive search over raw ids and display names; returns matching
/// items with their cross-base totals.
pub fn search(doc: &Value, term: &str) -> IndexMap<String, i64> {
    let needle = term.to_lowercase();
    totals(doc)
        .into_iter()
        .filter(|(item, _)| {
            item.to_lowercase().contains(&needle)
                || display_label(item).to_lowercase().contains(&needle)
        })
        .collect()
}

/// Apply many quantity updates to one base. Returns the number applied.
/// Quantities are all validated before the first write.
pub fn bulk_set(
    tracker: &mut ChangeTracker,
    base: usize,
    updates: &[(&str, i64)],
) -> Result<usize, EditError> {
    for (_, qty) in updates {
        if *qty < 0 {
            return Err(ValidationError::NegativeAmount {
                what: "item quantity",
                value: *qty,
            }
            .into());
        }
    }
    for (item, qty) in updates {
        set_quantity(tracker, base, item, *qty)?;
    }
    Ok(updates.len())
}

/// How [`copy_between_bases`] combines the two inventories.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CopyMode {
    /// Target becomes an exact copy of the source.
    Replace,
    /// Source quantities are added onto the target's.
    Add,
    /// Target keeps the per-item maximum of the two.
    Merge,
}

impl std::str::FromStr for CopyMode {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "replace" => Ok(CopyMode::Replace),
            "add" => Ok(CopyMode::Add),
            "merge" => Ok(CopyMode::Merge),
            other => Err(ValidationError::UnknownCopyMode {
                mode: other.to_owned(),
            }),
        }
    }
}

/// Copy one base's stores onto another. Returns the number of item types
/// written.
pub fn copy_between_bases(
    tracker: &mut ChangeTracker,
    source: usize,
    target: usize,
    mode: CopyMode,
) -> Result<usize, EditError> {
    let source_inv = base_inventory(tracker.current(), source);

    match mode {
        CopyMode::Replace => {
            let map: Mapping = source_inv
                .iter()
                .map(|(k, v)| (k.clone(), Value::from(*v)))
                .collect();
            tracker.write(&items_path(target), Value::Mapping(map))?;
            Ok(source_inv.len())
        }
        CopyMode::Add => {
            let target_inv = base_inventory(tracker.current(), target);
            for (item, qty) in &source_inv {
                let existing = target_inv.get(item).copied().unwrap_or(0);
                set_quantity(tracker, target, item, existing + qty)?;
            }
            Ok(source_inv.len())
        }
        CopyMode::Merge => {
            let target_inv = base_inventory(tracker.current(), target);
            let mut items: Vec<&String> = source_inv.keys().chain(target_inv.keys()).collect();
            items.sort();
            items.dedup();
            let count = items.len();
            for item in items {
                let high = source_inv
                    .get(item)
                    .copied()
                    .unwrap_or(0)
                    .max(target_inv.get(item).copied().unwrap_or(0));
                set_quantity(tracker, target, item, high)?;
            }
            Ok(count)
        }
    }
}

pub(crate) fn changes(original: &Value, current: &Value) -> Vec<ChangeEntry> {
    let before = all_inventories(original);
    let after = all_inventories(current);

    let mut changed_items = 0usize;
    let mut changed_bases = 0usize;
    for (base, current_inv) in &after {
        let original_inv = before
            .iter()
            .find(|(b, _)| b == base)
            .map(|(_, inv)| inv.clone())
            .unwrap_or_default();
        let mut keys: Vec<&String> = original_inv.keys().chain(current_inv.keys()).collect();
        keys.sort();
        keys.dedup();
        let base_changes = keys
            .into_iter()
            .filter(|k| {
                original_inv.get(*k).copied().unwrap_or(0) != current_inv.get(*k).copied().unwrap_or(0)
            })
            .count();
        if base_changes > 0 {
            changed_bases += 1;
            changed_items += base_changes;
        }
    }

    if changed_items == 0 {
        return Vec::new();
    }
    vec![ChangeEntry {
        field: "Base Inventory".to_owned(),
        before: "Original inventory".to_owned(),
        after: format!("{changed_items} item quantities changed in {changed_bases} base(s)"),
    }]
}

#[cfg(test)]
mod tests {
    use super::{add_item, base_inventory, quantity, remove_item, search, set_quantity, totals};
    use crate::tracker::ChangeTracker;
    use crate::value::Value;

    fn tracker() -> ChangeTracker {
        let doc = Value::parse_documents(concat!(
            "bases:\n",
            "- name: Alpha\n",
            "  items:\n",
            "    STR_RIFLE: 5\n",
            "    STR_GRENADE: 12\n",
            "- name: Beta\n",
            "  items:\n",
            "    STR_RIFLE: 2\n",
        ))
        .unwrap()
        .remove(0);
        ChangeTracker::new(doc)
    }

    #[test]
    fn zero_quantity_deletes_the_key() {
        let mut t = tracker();
        set_quantity(&mut t, 0, "STR_RIFLE", 0).unwrap();
        let inv = base_inventory(t.current(), 0);
        assert!(!inv.contains_key("STR_RIFLE"));
        assert_eq!(inv.get("STR_GRENADE"), Some(&12));
    }

    #[test]
    fn zeroing_an_absent_item_writes_nothing() {
        let mut t = tracker();
        set_quantity(&mut t, 0, "STR_NOT_THERE", 0).unwrap();
        assert!(!t.is_dirty());
    }

    #[test]
    fn upsert_creates_the_store_when_missing() {
        let doc = Value::parse_documents("bases:\n- name: Gamma\n").unwrap().remove(0);
        let mut t = ChangeTracker::new(doc);
        set_quantity(&mut t, 0, "STR_MEDI_KIT", 3).unwrap();
        assert_eq!(quantity(t.current(), 0, "STR_MEDI_KIT"), 3);
    }

    #[test]
    fn negative_quantity_is_rejected() {
        let mut t = tracker();
        assert!(set_quantity(&mut t, 0, "STR_RIFLE", -1).is_err());
        assert!(!t.is_dirty());
    }

    #[test]
    fn add_and_remove_adjust_quantities() {
        let mut t = tracker();
        add_item(&mut t, 1, "STR_RIFLE", 3).unwrap();
        assert_eq!(quantity(t.current(), 1, "STR_RIFLE"), 5);

        remove_item(&mut t, 1, "STR_RIFLE", Some(10)).unwrap();
        // Floors at zero, which deletes.
        assert!(!base_inventory(t.current(), 1).contains_key("STR_RIFLE"));
    }

    #[test]
    fn merge_copy_keeps_the_higher_quantity() {
        let mut t = tracker();
        super::copy_between_bases(&mut t, 1, 0, "merge".parse().unwrap()).unwrap();
        // Alpha already had more rifles than Beta; nothing shrinks.
        assert_eq!(quantity(t.current(), 0, "STR_RIFLE"), 5);
        assert_eq!(quantity(t.current(), 0, "STR_GRENADE"), 12);

        assert!("sideways".parse::<super::CopyMode>().is_err());
    }

    #[test]
    fn totals_and_search_span_bases() {
        let t = tracker();
        assert_eq!(totals(t.current()).get("STR_RIFLE"), Some(&7));

        let hits = search(t.current(), "rifle");
        assert_eq!(hits.len(), 1);
        assert_eq!(hits.get("STR_RIFLE"), Some(&7));
    }
}
