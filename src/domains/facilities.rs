//! Base facilities and construction state.
//!
//! A facility is under construction while it carries a positive `buildTime`
//! (hours remaining). Completion removes the field entirely — the engine
//! treats its mere presence as "still building", so zeroing it is not enough.

use super::{Coords, EditError, collection_entries, display_label};
use crate::changes::ChangeEntry;
use crate::statics;
use crate::tracker::ChangeTracker;
use crate::value::{Mapping, Value};

/// View over one facility.
#[derive(Debug, Clone, Copy)]
pub struct Facility<'a> {
    data: &'a Mapping,
    pub coords: Coords,
}

impl PartialEq for Facility<'_> {
    fn eq(&self, other: &Self) -> bool {
        self.coords == other.coords
    }
}

impl<'a> Facility<'a> {
    pub fn kind(&self) -> &'a str {
        self.data
            .get(statics::OX_TYPE)
            .and_then(Value::as_str)
            .unwrap_or("Unknown Facility")
    }

    pub fn display_name(&self) -> String {
        display_label(self.kind())
    }

    pub fn position(&self) -> (i64, i64) {
        let coord = |key| self.data.get(key).and_then(Value::as_i64).unwrap_or(0);
        (coord(statics::OX_POS_X), coord(statics::OX_POS_Y))
    }

    /// Hours of construction left, if the field is present at all.
    pub fn build_time(&self) -> Option<i64> {
        self.data.get(statics::OX_BUILD_TIME).and_then(Value::as_i64)
    }

    pub fn is_under_construction(&self) -> bool {
        self.build_time().is_some_and(|hours| hours > 0)
    }

    pub fn is_completed(&self) -> bool {
        !self.is_under_construction()
    }
}

pub fn all(doc: &Value) -> Vec<Facility<'_>> {
    collection_entries(doc, statics::OX_FACILITIES)
        .into_iter()
        .map(|(coords, data)| Facility { data, coords })
        .collect()
}

pub fn by_base(doc: &Value, base: usize) -> Vec<Facility<'_>> {
    all(doc)
        .into_iter()
        .filter(|f| f.coords.base == base)
        .collect()
}

pub fn under_construction(doc: &Value) -> Vec<Facility<'_>> {
    all(doc)
        .into_iter()
        .filter(Facility::is_under_construction)
        .collect()
}

pub fn completed(doc: &Value) -> Vec<Facility<'_>> {
    all(doc).into_iter().filter(Facility::is_completed).collect()
}

fn facility_path(at: Coords) -> String {
    format!(
        "{}.{}.{}.{}",
        statics::OX_BASES,
        at.base,
        statics::OX_FACILITIES,
        at.entry
    )
}

fn read_facility(tracker: &ChangeTracker, at: Coords) -> Result<Option<Mapping>, EditError> {
    Ok(tracker
        .read(&facility_path(at))?
        .and_then(Value::as_mapping)
        .cloned())
}

/// Finish construction by dropping `buildTime`. Already-complete facilities
/// (or coordinates that resolve to nothing) are left untouched — no write,
/// no dirty flag.
pub fn complete(tracker: &mut ChangeTracker, at: Coords) -> Result<(), EditError> {
    let Some(mut map) = read_facility(tracker, at)? else {
        return Ok(());
    };
    let building = map
        .get(statics::OX_BUILD_TIME)
        .and_then(Value::as_i64)
        .is_some_and(|hours| hours > 0);
    if !building {
        return Ok(());
    }
    map.shift_remove(statics::OX_BUILD_TIME);
    tracker.write(&facility_path(at), Value::Mapping(map))?;
    Ok(())
}

/// Set remaining construction hours. Zero or negative hours complete the
/// facility instead (removing the field).
pub fn set_build_time(tracker: &mut ChangeTracker, at: Coords, hours: i64) -> Result<(), EditError> {
    if hours <= 0 {
        return complete(tracker, at);
    }
    let Some(mut map) = read_facility(tracker, at)? else {
        return Ok(());
    };
    map.insert(statics::OX_BUILD_TIME.to_owned(), Value::from(hours));
    tracker.write(&facility_path(at), Value::Mapping(map))?;
    Ok(())
}

/// Complete every facility currently under construction. Returns the count;
/// nothing Active means no writes.
pub fn complete_all(tracker: &mut ChangeTracker) -> Result<usize, EditError> {
    let targets: Vec<Coords> = under_construction(tracker.current())
        .iter()
        .map(|f| f.coords)
        .collect();
    for &at in &targets {
        complete(tracker, at)?;
    }
    Ok(targets.len())
}

/// Complete every under-construction facility in one base.
pub fn complete_all_in_base(tracker: &mut ChangeTracker, base: usize) -> Result<usize, EditError> {
    let targets: Vec<Coords> = under_construction(tracker.current())
        .iter()
        .filter(|f| f.coords.base == base)
        .map(|f| f.coords)
        .collect();
    for &at in &targets {
        complete(tracker, at)?;
    }
    Ok(targets.len())
}

/// Counts used by status overviews: (total, under construction, completed).
pub fn summary_counts(doc: &Value) -> (usize, usize, usize) {
    let facilities = all(doc);
    let building = facilities
        .iter()
        .filter(|f| f.is_under_construction())
        .count();
    (facilities.len(), building, facilities.len() - building)
}

pub(crate) fn changes(original: &Value, current: &Value) -> Vec<ChangeEntry> {
    let before = under_construction(original).len();
    let after = under_construction(current).len();
    if after >= before {
        return Vec::new();
    }
    vec![ChangeEntry {
        field: "Facility Construction".to_owned(),
        before: format!("{before} facilities under construction"),
        after: format!("{} facility construction(s) completed", before - after),
    }]
}
