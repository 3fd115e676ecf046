//! Research projects, across every base's `research` queue.
//!
//! A project is Active while `spent < cost`; completing it sets `spent` to
//! `cost` so the engine finishes it on the next tick.

use super::{Coords, EditError, collection_entries, display_label};
use crate::changes::ChangeEntry;
use crate::statics;
use crate::tracker::ChangeTracker;
use crate::value::{Mapping, Value};

/// View over one research project. Field accessors read the underlying
/// mapping on demand; nothing is cached.
#[derive(Debug, Clone, Copy)]
pub struct ResearchProject<'a> {
    data: &'a Mapping,
    pub coords: Coords,
}

impl PartialEq for ResearchProject<'_> {
    fn eq(&self, other: &Self) -> bool {
        // Same entity across two enumerations, not same referenced object.
        self.coords == other.coords
    }
}

impl<'a> ResearchProject<'a> {
    pub fn name(&self) -> &'a str {
        self.data
            .get(statics::OX_PROJECT)
            .and_then(Value::as_str)
            .unwrap_or("Unknown Project")
    }

    pub fn display_name(&self) -> String {
        display_label(self.name())
    }

    pub fn assigned_scientists(&self) -> i64 {
        int_field(self.data, statics::OX_ASSIGNED)
    }

    pub fn spent(&self) -> i64 {
        int_field(self.data, statics::OX_SPENT)
    }

    pub fn cost(&self) -> i64 {
        int_field(self.data, statics::OX_COST)
    }

    pub fn remaining(&self) -> i64 {
        (self.cost() - self.spent()).max(0)
    }

    pub fn progress_percent(&self) -> f64 {
        if self.cost() == 0 {
            return 100.0;
        }
        self.spent() as f64 / self.cost() as f64 * 100.0
    }

    pub fn is_completed(&self) -> bool {
        self.spent() >= self.cost()
    }
}

fn int_field(map: &Mapping, key: &str) -> i64 {
    map.get(key).and_then(Value::as_i64).unwrap_or(0)
}

/// Every research project in the document, across all bases.
pub fn all(doc: &Value) -> Vec<ResearchProject<'_>> {
    collection_entries(doc, statics::OX_RESEARCH)
        .into_iter()
        .map(|(coords, data)| ResearchProject { data, coords })
        .collect()
}

pub fn active(doc: &Value) -> Vec<ResearchProject<'_>> {
    all(doc).into_iter().filter(|p| !p.is_completed()).collect()
}

pub fn completed(doc: &Value) -> Vec<ResearchProject<'_>> {
    all(doc).into_iter().filter(|p| p.is_completed()).collect()
}

pub fn by_base(doc: &Value, base: usize) -> Vec<ResearchProject<'_>> {
    all(doc)
        .into_iter()
        .filter(|p| p.coords.base == base)
        .collect()
}

fn field_path(at: Coords, field: &str) -> String {
    format!(
        "{}.{}.{}.{}.{field}",
        statics::OX_BASES,
        at.base,
        statics::OX_RESEARCH,
        at.entry
    )
}

fn read_cost(tracker: &ChangeTracker, at: Coords) -> Result<i64, EditError> {
    Ok(tracker
        .read(&field_path(at, statics::OX_COST))?
        .and_then(Value::as_i64)
        .unwrap_or(0))
}

/// Complete the project at `at` by writing `spent = cost`.
pub fn complete(tracker: &mut ChangeTracker, at: Coords) -> Result<(), EditError> {
    let cost = read_cost(tracker, at)?;
    tracker.write(&field_path(at, statics::OX_SPENT), Value::from(cost))?;
    Ok(())
}

/// Set progress to a percentage of the total cost, clamped to 0–100.
pub fn set_progress(tracker: &mut ChangeTracker, at: Coords, percent: f64) -> Result<(), EditError> {
    let percent = percent.clamp(0.0, 100.0);
    let cost = read_cost(tracker, at)?;
    let spent = (percent / 100.0 * cost as f64) as i64;
    tracker.write(&field_path(at, statics::OX_SPENT), Value::from(spent))?;
    Ok(())
}

/// Complete every Active project. Returns the number transitioned; a call
/// with nothing Active performs no writes.
pub fn complete_all(tracker: &mut ChangeTracker) -> Result<usize, EditError> {
    let targets: Vec<Coords> = active(tracker.current()).iter().map(|p| p.coords).collect();
    for &at in &targets {
        complete(tracker, at)?;
    }
    Ok(targets.len())
}

/// Complete every Active project in one base.
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

/// Counts used by status overviews: (total, active, completed).
pub fn summary_counts(doc: &Value) -> (usize, usize, usize) {
    let projects = all(doc);
    let active = projects.iter().filter(|p| !p.is_completed()).count();
    (projects.len(), active, projects.len() - active)
}

pub(crate) fn changes(original: &Value, current: &Value) -> Vec<ChangeEntry> {
    let before = all(original);
    let newly_completed = all(current)
        .into_iter()
        .filter(|cur| {
            cur.is_completed()
                && before
                    .iter()
                    .find(|orig| orig.coords == cur.coords)
                    .is_some_and(|orig| !orig.is_completed())
        })
        .count();

    if newly_completed == 0 {
        return Vec::new();
    }
    vec![ChangeEntry {
        field: "Research Progress".to_owned(),
        before: "Research projects in progress".to_owned(),
        after: format!("{newly_completed} research project(s) completed"),
    }]
}

#[cfg(test)]
mod tests {
    use super::{active, all, complete, complete_all};
    use crate::tracker::ChangeTracker;
    use crate::value::Value;

    fn tracker() -> ChangeTracker {
        let doc = Value::parse_documents(concat!(
            "bases:\n",
            "- name: Alpha\n",
            "  research:\n",
            "  - project: STR_LASER_WEAPONS\n",
            "    assigned: 10\n",
            "    spent: 30\n",
            "    cost: 100\n",
            "  - project: STR_ALIEN_ALLOYS\n",
            "    spent: 80\n",
            "    cost: 80\n",
        ))
        .unwrap()
        .remove(0);
        ChangeTracker::new(doc)
    }

    #[test]
    fn views_expose_derived_progress() {
        let t = tracker();
        let projects = all(t.current());
        assert_eq!(projects.len(), 2);

        let laser = &projects[0];
        assert_eq!(laser.display_name(), "Laser Weapons");
        assert_eq!(laser.remaining(), 70);
        assert!(!laser.is_completed());
        assert!((laser.progress_percent() - 30.0).abs() < f64::EPSILON);

        assert!(projects[1].is_completed());
    }

    #[test]
    fn complete_writes_spent_to_cost() {
        let mut t = tracker();
        let at = active(t.current())[0].coords;
        complete(&mut t, at).unwrap();

        let project = &all(t.current())[0];
        assert_eq!(project.spent(), 100);
        assert!(project.is_completed());
        assert!(t.is_dirty());
    }

    #[test]
    fn complete_all_skips_already_complete() {
        let mut t = tracker();
        assert_eq!(complete_all(&mut t).unwrap(), 1);

        // Second pass finds nothing Active and stays clean of writes.
        t.rebase();
        assert_eq!(complete_all(&mut t).unwrap(), 0);
        assert!(!t.is_dirty());
    }
}
