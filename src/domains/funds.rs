//! Council funding. The `funds` sequence stores the previous period's balance
//! at index 0 and the current one at index 1 — the engine's own convention,
//! preserved as-is.

use super::{EditError, ValidationError};
use crate::changes::{ChangeEntry, group_digits};
use crate::statics;
use crate::tracker::ChangeTracker;
use crate::value::Value;

/// Raw funds values, truncated to the two tracked periods. Absent or
/// malformed funds read as zeros.
pub fn raw(doc: &Value) -> (i64, i64) {
    let seq = doc
        .get(statics::OX_FUNDS)
        .and_then(Value::as_sequence)
        .unwrap_or(&[]);
    let at = |i: usize| seq.get(i).and_then(Value::as_i64).unwrap_or(0);
    (at(statics::FUNDS_PREVIOUS), at(statics::FUNDS_CURRENT))
}

/// Funds in display orientation: `(current, previous)`.
pub fn display(doc: &Value) -> (i64, i64) {
    let (previous, current) = raw(doc);
    (current, previous)
}

/// Set both periods. Extra trailing entries in the on-disk sequence are kept
/// untouched.
pub fn set(tracker: &mut ChangeTracker, current: i64, previous: i64) -> Result<(), EditError> {
    if current < 0 {
        return Err(ValidationError::NegativeAmount {
            what: "current funds",
            value: current,
        }
        .into());
    }
    if previous < 0 {
        return Err(ValidationError::NegativeAmount {
            what: "previous funds",
            value: previous,
        }
        .into());
    }

    let mut seq = tracker
        .read(statics::OX_FUNDS)?
        .and_then(Value::as_sequence)
        .map(<[Value]>::to_vec)
        .unwrap_or_default();
    if seq.len() < 2 {
        seq.resize(2, Value::from(0_i64));
    }
    seq[statics::FUNDS_PREVIOUS] = Value::from(previous);
    seq[statics::FUNDS_CURRENT] = Value::from(current);

    tracker.write(statics::OX_FUNDS, Value::Sequence(seq))?;
    Ok(())
}

/// Set only the current period's balance.
pub fn set_current(tracker: &mut ChangeTracker, amount: i64) -> Result<(), EditError> {
    if amount < 0 {
        return Err(ValidationError::NegativeAmount {
            what: "funds amount",
            value: amount,
        }
        .into());
    }
    let (_, previous) = display(tracker.current());
    set(tracker, amount, previous)
}

/// Adjust the current balance by `delta`. Debits beyond the balance saturate
/// at zero rather than erroring.
pub fn add(tracker: &mut ChangeTracker, delta: i64) -> Result<(), EditError> {
    let (current, previous) = display(tracker.current());
    let adjusted = current.saturating_add(delta).max(0);
    set(tracker, adjusted, previous)
}

pub(crate) fn changes(original: &Value, current: &Value) -> Vec<ChangeEntry> {
    let before = display(original);
    let after = display(current);
    if before == after {
        return Vec::new();
    }
    let fmt = |(cur, prev): (i64, i64)| {
        format!(
            "Current: {}, Previous: {}",
            group_digits(cur),
            group_digits(prev)
        )
    };
    vec![ChangeEntry {
        field: "Funds".to_owned(),
        before: fmt(before),
        after: fmt(after),
    }]
}
