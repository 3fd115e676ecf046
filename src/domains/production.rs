//! Manufacturing queues (`productions` per base).
//!
//! The save does not carry per-item production costs, so "complete" bumps
//! `spent` past any plausible requirement instead of computing the true
//! finish point: `max(spent + amount*10, 100)` for normal runs and
//! `max(spent + 50, 100)` for infinite ones. A deliberate approximation
//! inherited from the on-disk format's limits — not to be "fixed" without a
//! real cost table.

use super::{Coords, EditError, ValidationError, collection_entries, display_label};
use crate::changes::ChangeEntry;
use crate::statics;
use crate::tracker::ChangeTracker;
use crate::value::{Mapping, Value};

/// View over one production queue entry.
#[derive(Debug, Clone, Copy)]
pub struct ProductionItem<'a> {
    data: &'a Mapping,
    pub coords: Coords,
}

impl PartialEq for ProductionItem<'_> {
    fn eq(&self, other: &Self) -> bool {
        self.coords == other.coords
    }
}

impl<'a> ProductionItem<'a> {
    pub fn item(&self) -> &'a str {
        self.data
            .get(statics::OX_ITEM)
            .and_then(Value::as_str)
            .unwrap_or("Unknown Item")
    }

    pub fn display_name(&self) -> String {
        display_label(self.item())
    }

    pub fn assigned_engineers(&self) -> i64 {
        self.int_field(statics::OX_ASSIGNED, 0)
    }

    pub fn spent(&self) -> i64 {
        self.int_field(statics::OX_SPENT, 0)
    }

    pub fn amount(&self) -> i64 {
        self.int_field(statics::OX_AMOUNT, 1)
    }

    pub fn is_infinite(&self) -> bool {
        self.data
            .get(statics::OX_INFINITE)
            .and_then(Value::as_bool)
            .unwrap_or(false)
    }

    /// Being worked on: engineers assigned or hours already sunk.
    pub fn is_active(&self) -> bool {
        self.assigned_engineers() > 0 || self.spent() > 0
    }

    pub fn is_completed(&self) -> bool {
        if self.is_infinite() {
            return false;
        }
        self.spent() > 0 && self.amount() <= 1
    }

    fn int_field(&self, key: &str, default: i64) -> i64 {
        self.data.get(key).and_then(Value::as_i64).unwrap_or(default)
    }
}

pub fn all(doc: &Value) -> Vec<ProductionItem<'_>> {
    collection_entries(doc, statics::OX_PRODUCTIONS)
        .into_iter()
        .map(|(coords, data)| ProductionItem { data, coords })
        .collect()
}

pub fn by_base(doc: &Value, base: usize) -> Vec<ProductionItem<'_>> {
    all(doc)
        .into_iter()
        .filter(|p| p.coords.base == base)
        .collect()
}

pub fn active(doc: &Value) -> Vec<ProductionItem<'_>> {
    all(doc).into_iter().filter(ProductionItem::is_active).collect()
}

fn field_path(at: Coords, field: &str) -> String {
    format!(
        "{}.{}.{}.{}.{field}",
        statics::OX_BASES,
        at.base,
        statics::OX_PRODUCTIONS,
        at.entry
    )
}

fn read_int(tracker: &ChangeTracker, at: Coords, field: &str, default: i64) -> Result<i64, EditError> {
    Ok(tracker
        .read(&field_path(at, field))?
        .and_then(Value::as_i64)
        .unwrap_or(default))
}

/// Push the entry's `spent` hours past completion, per the policy above.
pub fn complete(tracker: &mut ChangeTracker, at: Coords) -> Result<(), EditError> {
    let spent = read_int(tracker, at, statics::OX_SPENT, 0)?;
    let infinite = tracker
        .read(&field_path(at, statics::OX_INFINITE))?
        .and_then(Value::as_bool)
        .unwrap_or(false);

    let completion = if infinite {
        // Current batch only; infinite runs never finish.
        (spent + 50).max(100)
    } else {
        let amount = read_int(tracker, at, statics::OX_AMOUNT, 1)?;
        (spent + amount * 10).max(100)
    };

    tracker.write(&field_path(at, statics::OX_SPENT), Value::from(completion))?;
    Ok(())
}

/// Set hours of work completed, floored at zero.
pub fn set_progress(tracker: &mut ChangeTracker, at: Coords, hours: i64) -> Result<(), EditError> {
    tracker.write(&field_path(at, statics::OX_SPENT), Value::from(hours.max(0)))?;
    Ok(())
}

/// Set the number of units to produce.
pub fn set_amount(tracker: &mut ChangeTracker, at: Coords, amount: i64) -> Result<(), EditError> {
    if amount < 1 {
        return Err(ValidationError::AmountTooSmall { value: amount }.into());
    }
    tracker.write(&field_path(at, statics::OX_AMOUNT), Value::from(amount))?;
    Ok(())
}

/// Complete every Active entry. Returns the count; an empty Active set means
/// no writes.
pub fn complete_all(tracker: &mut ChangeTracker) -> Result<usize, EditError> {
    let targets: Vec<Coords> = active(tracker.current()).iter().map(|p| p.coords).collect();
    for &at in &targets {
        complete(tracker, at)?;
    }
    Ok(targets.len())
}

/// Complete every Active entry in one base.
pub fn complete_all_in_base(tracker: &mut ChangeTracker, base: usize) -> Result<usize, EditError> {
    let targets: Vec<Coords> = active(tracker.current())
        .iter()
        .filter(|p| p.coords.base == base)
        .map(|p| p.coords)
        .collect();
    for &at in &targets {
        complete(tracker, at)?;
    }
    Ok(targets.len())
}

/// Counts used by status overviews: (total, active).
pub fn summary_counts(doc: &Value) -> (usize, usize) {
    let items = all(doc);
    let active = items.iter().filter(|p| p.is_active()).count();
    (items.len(), active)
}

pub(crate) fn changes(original: &Value, current: &Value) -> Vec<ChangeEntry> {
    let before = all(original);
    let modified = all(current)
        .into_iter()
        .filter(|cur| {
            before
                .iter()
                .find(|orig| orig.coords == cur.coords)
                .is_some_and(|orig| orig.spent() != cur.spent())
        })
        .count();

    if modified == 0 {
        return Vec::new();
    }
    vec![ChangeEntry {
        field: "Production Progress".to_owned(),
        before: "Original production progress".to_owned(),
        after: format!("{modified} production item(s) modified"),
    }]
}

#[cfg(test)]
mod tests {
    use super::{active, all, complete, complete_all, set_amount};
    use crate::tracker::ChangeTracker;
    use crate::value::Value;

    fn tracker() -> ChangeTracker {
        let doc = Value::parse_documents(concat!(
            "bases:\n",
            "- name: Alpha\n",
            "  productions:\n",
            "  - item: STR_LASER_CANNON\n",
            "    assigned: 20\n",
            "    spent: 15\n",
            "    amount: 4\n",
            "  - item: STR_FLYING_SUIT\n",
            "    assigned: 0\n",
            "    spent: 0\n",
            "    amount: 1\n",
            "  - item: STR_ALLOY_AMMO\n",
            "    assigned: 5\n",
            "    spent: 30\n",
            "    infinite: true\n",
        ))
        .unwrap()
        .remove(0);
        ChangeTracker::new(doc)
    }

    #[test]
    fn active_means_engineers_or_hours() {
        let t = tracker();
        let ids: Vec<&str> = active(t.current()).iter().map(|p| p.item()).collect();
        assert_eq!(ids, vec!["STR_LASER_CANNON", "STR_ALLOY_AMMO"]);
    }

    #[test]
    fn completion_policy_for_finite_runs() {
        let mut t = tracker();
        let at = all(t.current())[0].coords;
        complete(&mut t, at).unwrap();
        // max(15 + 4*10, 100) = 100
        assert_eq!(all(t.current())[0].spent(), 100);
    }

    #[test]
    fn completion_policy_for_infinite_runs() {
        let mut t = tracker();
        let at = all(t.current())[2].coords;
        complete(&mut t, at).unwrap();
        // max(30 + 50, 100) = 100, and the entry stays incomplete.
        let item = &all(t.current())[2];
        assert_eq!(item.spent(), 100);
        assert!(!item.is_completed());
        assert!(item.is_active());
    }

    #[test]
    fn complete_all_returns_transition_count() {
        let mut t = tracker();
        assert_eq!(complete_all(&mut t).unwrap(), 2);
    }

    #[test]
    fn amount_below_one_is_rejected() {
        let mut t = tracker();
        let at = all(t.current())[0].coords;
        assert!(set_amount(&mut t, at, 0).is_err());
        assert!(!t.is_dirty());
        set_amount(&mut t, at, 10).unwrap();
        assert_eq!(all(t.current())[0].amount(), 10);
    }
}
