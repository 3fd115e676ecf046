//! Soldiers and their editable statistics.
//!
//! The twelve stat fields live under `currentStats`; each is an 8-bit value
//! in the engine, so writes are bounds-checked to 0–255 before anything
//! touches the document.

use super::{Coords, EditError, ValidationError, collection_entries};
use crate::changes::ChangeEntry;
use crate::statics::{self, SOLDIER_STATS, STAT_MAX, STAT_MIN};
use crate::tracker::ChangeTracker;
use crate::value::{Mapping, Value};

/// View over one soldier.
#[derive(Debug, Clone, Copy)]
pub struct Soldier<'a> {
    data: &'a Mapping,
    pub coords: Coords,
}

impl PartialEq for Soldier<'_> {
    fn eq(&self, other: &Self) -> bool {
        self.coords == other.coords
    }
}

impl<'a> Soldier<'a> {
    pub fn name(&self) -> String {
        self.data
            .get(statics::OX_NAME)
            .and_then(Value::as_str)
            .map(str::to_owned)
            .unwrap_or_else(|| format!("Soldier {}", self.coords.entry + 1))
    }

    pub fn rank(&self) -> i64 {
        self.int_field(statics::OX_RANK)
    }

    pub fn missions(&self) -> i64 {
        self.int_field(statics::OX_MISSIONS)
    }

    pub fn kills(&self) -> i64 {
        self.int_field(statics::OX_KILLS)
    }

    pub fn stat(&self, name: &str) -> i64 {
        stat_from(self.data.get(statics::OX_CURRENT_STATS), name)
    }

    pub fn initial_stat(&self, name: &str) -> i64 {
        stat_from(self.data.get(statics::OX_INITIAL_STATS), name)
    }

    fn int_field(&self, key: &str) -> i64 {
        self.data.get(key).and_then(Value::as_i64).unwrap_or(0)
    }
}

fn stat_from(stats: Option<&Value>, name: &str) -> i64 {
    stats
        .and_then(|s| s.get(name))
        .and_then(Value::as_i64)
        .unwrap_or(0)
}

pub fn all(doc: &Value) -> Vec<Soldier<'_>> {
    collection_entries(doc, statics::OX_SOLDIERS)
        .into_iter()
        .map(|(coords, data)| Soldier { data, coords })
        .collect()
}

pub fn by_base(doc: &Value, base: usize) -> Vec<Soldier<'_>> {
    all(doc)
        .into_iter()
        .filter(|s| s.coords.base == base)
        .collect()
}

fn stat_path(at: Coords, stat: &str) -> String {
    format!(
        "{}.{}.{}.{}.{}.{stat}",
        statics::OX_BASES,
        at.base,
        statics::OX_SOLDIERS,
        at.entry,
        statics::OX_CURRENT_STATS
    )
}

fn check_stat(stat: &str, value: i64) -> Result<(), ValidationError> {
    if !SOLDIER_STATS.contains(&stat) {
        return Err(ValidationError::UnknownStat {
            name: stat.to_owned(),
        });
    }
    if !(STAT_MIN..=STAT_MAX).contains(&value) {
        return Err(ValidationError::StatOutOfRange {
            name: stat.to_owned(),
            value,
            min: STAT_MIN,
            max: STAT_MAX,
        });
    }
    Ok(())
}

/// Write one stat for the soldier at `at`. Rejects unrecognized stat names
/// and out-of-range values before any write happens.
pub fn set_stat(
    tracker: &mut ChangeTracker,
    at: Coords,
    stat: &str,
    value: i64,
) -> Result<(), EditError> {
    check_stat(stat, value)?;
    tracker.write(&stat_path(at, stat), Value::from(value))?;
    Ok(())
}

/// Write several stats at once. Every pair is validated up front so a bad
/// entry rejects the whole call with the document untouched.
pub fn set_stats(
    tracker: &mut ChangeTracker,
    at: Coords,
    stats: &[(&str, i64)],
) -> Result<(), EditError> {
    for (stat, value) in stats {
        check_stat(stat, *value)?;
    }
    for (stat, value) in stats {
        tracker.write(&stat_path(at, stat), Value::from(*value))?;
    }
    Ok(())
}

/// Set every stat of one soldier to `ceiling`, clamped to 1–255.
pub fn max_stats(tracker: &mut ChangeTracker, at: Coords, ceiling: i64) -> Result<(), EditError> {
    let ceiling = ceiling.clamp(1, STAT_MAX);
    let pairs: Vec<(&str, i64)> = SOLDIER_STATS.iter().map(|s| (*s, ceiling)).collect();
    set_stats(tracker, at, &pairs)
}

/// Max out every soldier in the document. Returns the soldier count.
pub fn max_all(tracker: &mut ChangeTracker, ceiling: i64) -> Result<usize, EditError> {
    let targets: Vec<Coords> = all(tracker.current()).iter().map(|s| s.coords).collect();
    for &at in &targets {
        max_stats(tracker, at, ceiling)?;
    }
    Ok(targets.len())
}

/// Max out every soldier in one base. Returns the soldier count.
pub fn max_all_in_base(
    tracker: &mut ChangeTracker,
    base: usize,
    ceiling: i64,
) -> Result<usize, EditError> {
    let targets: Vec<Coords> = all(tracker.current())
        .iter()
        .filter(|s| s.coords.base == base)
        .map(|s| s.coords)
        .collect();
    for &at in &targets {
        max_stats(tracker, at, ceiling)?;
    }
    Ok(targets.len())
}

/// Observed (min, max, mean, sample count) per stat, over non-zero values.
pub fn stat_ranges(doc: &Value) -> Vec<(&'static str, i64, i64, f64, usize)> {
    let soldiers = all(doc);
    let mut out = Vec::new();
    for stat in SOLDIER_STATS {
        let values: Vec<i64> = soldiers
            .iter()
            .map(|s| s.stat(stat))
            .filter(|v| *v > 0)
            .collect();
        if values.is_empty() {
            continue;
        }
        let min = values.iter().min().copied().unwrap_or(0);
        let max = values.iter().max().copied().unwrap_or(0);
        let mean = values.iter().sum::<i64>() as f64 / values.len() as f64;
        out.push((stat, min, max, mean, values.len()));
    }
    out
}

pub(crate) fn changes(original: &Value, current: &Value) -> Vec<ChangeEntry> {
    let before = all(original);
    let modified = all(current)
        .into_iter()
        .filter(|cur| {
            before
                .iter()
                .find(|orig| orig.coords == cur.coords)
                .is_some_and(|orig| SOLDIER_STATS.iter().any(|s| orig.stat(s) != cur.stat(s)))
        })
        .count();

    if modified == 0 {
        return Vec::new();
    }
    vec![ChangeEntry {
        field: "Soldier Statistics".to_owned(),
        before: "Original soldier statistics".to_owned(),
        after: format!("{modified} soldier(s) stats modified"),
    }]
}

#[cfg(test)]
mod tests {
    use super::{all, max_stats, set_stat};
    use crate::domains::ValidationError;
    use crate::tracker::ChangeTracker;
    use crate::value::Value;

    fn tracker() -> ChangeTracker {
        let doc = Value::parse_documents(concat!(
            "bases:\n",
            "- name: Alpha\n",
            "  soldiers:\n",
            "  - name: Vera Kowalski\n",
            "    rank: 3\n",
            "    missions: 12\n",
            "    kills: 9\n",
            "    currentStats:\n",
            "      tu: 60\n",
            "      health: 40\n",
            "    initialStats:\n",
            "      tu: 50\n",
            "      health: 35\n",
        ))
        .unwrap()
        .remove(0);
        ChangeTracker::new(doc)
    }

    #[test]
    fn boundary_values_are_enforced() {
        let mut t = tracker();
        let at = all(t.current())[0].coords;

        let err = set_stat(&mut t, at, "health", 256).unwrap_err();
        assert!(matches!(
            err,
            crate::domains::EditError::Validation(ValidationError::StatOutOfRange { .. })
        ));
        assert!(!t.is_dirty());
        assert_eq!(all(t.current())[0].stat("health"), 40);

        set_stat(&mut t, at, "health", 255).unwrap();
        assert_eq!(all(t.current())[0].stat("health"), 255);
    }

    #[test]
    fn unknown_stat_name_is_rejected() {
        let mut t = tracker();
        let at = all(t.current())[0].coords;
        let err = set_stat(&mut t, at, "bogus", 10).unwrap_err();
        assert!(matches!(
            err,
            crate::domains::EditError::Validation(ValidationError::UnknownStat { .. })
        ));
        assert!(!t.is_dirty());
    }

    #[test]
    fn max_stats_fills_all_twelve() {
        let mut t = tracker();
        let at = all(t.current())[0].coords;
        max_stats(&mut t, at, 100).unwrap();

        let soldier = &all(t.current())[0];
        for stat in crate::statics::SOLDIER_STATS {
            assert_eq!(soldier.stat(stat), 100, "stat {stat}");
        }
        // Initial stats are untouched.
        assert_eq!(soldier.initial_stat("tu"), 50);
    }

    #[test]
    fn accessors_read_identity_fields() {
        let t = tracker();
        let soldier = &all(t.current())[0];
        assert_eq!(soldier.name(), "Vera Kowalski");
        assert_eq!(soldier.rank(), 3);
        assert_eq!(soldier.missions(), 12);
        assert_eq!(soldier.kills(), 9);
    }
}
