//! Pre-commit structural validation.
//!
//! Checks are split into two severities: errors block a commit, warnings are
//! reported alongside but never stop the save. The bar is "will the engine
//! still load this", not schema perfection — mods add fields freely and a
//! save with oddities the player put there on purpose must remain writable.

use crate::statics::{self, SOLDIER_STATS};
use crate::value::Value;
use serde::Serialize;
use thiserror::Error;

#[derive(Debug, Clone, Default, Serialize)]
pub struct ValidationReport {
    pub errors: Vec<String>,
    pub warnings: Vec<String>,
}

impl ValidationReport {
    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }

    fn error(&mut self, message: String) {
        self.errors.push(message);
    }

    fn warn(&mut self, message: String) {
        self.warnings.push(message);
    }
}

/// The document failed pre-persist validation; the commit was aborted and
/// nothing was written.
#[derive(Debug, Error)]
#[error("save validation failed: {}", report.errors.join("; "))]
pub struct StructuralValidationError {
    pub report: ValidationReport,
}

const FUNDS_SANITY_CAP: i64 = 999_999_999;
const STAT_PLAUSIBLE_MAX: i64 = 200;

/// Validate the whole game document. Never fails itself — the result carries
/// everything found.
pub fn validate_document(doc: &Value) -> ValidationReport {
    let mut report = ValidationReport::default();

    let Some(root) = doc.as_mapping() else {
        report.error(format!(
            "Save document must be a mapping, got {}",
            doc.type_name()
        ));
        return report;
    };

    for key in [statics::OX_FUNDS, statics::OX_BASES] {
        if !root.contains_key(key) {
            report.error(format!("Missing required key: {key}"));
        }
    }

    for (key, expected) in [
        (statics::OX_FUNDS, "sequence"),
        (statics::OX_BASES, "sequence"),
        (statics::OX_MONTHS_PASSED, "number"),
        (statics::OX_DAYS_PASSED, "number"),
        (statics::OX_DIFFICULTY, "number"),
    ] {
        if let Some(value) = root.get(key)
            && value.type_name() != expected
        {
            report.error(format!(
                "Invalid type for {key}: expected {expected}, got {}",
                value.type_name()
            ));
        }
    }

    if let Some(funds) = root.get(statics::OX_FUNDS).and_then(Value::as_sequence) {
        check_funds(funds, &mut report);
    }
    if let Some(bases) = root.get(statics::OX_BASES).and_then(Value::as_sequence) {
        check_bases(bases, &mut report);
    }
    check_calendar(doc, &mut report);

    report
}

fn check_funds(funds: &[Value], report: &mut ValidationReport) {
    if funds.len() < 2 {
        report.error("Funds list must contain at least 2 values".to_owned());
        return;
    }
    for (i, value) in funds.iter().enumerate() {
        match value.as_i64() {
            None => report.error(format!("Fund value at index {i} must be an integer")),
            Some(amount) if amount < 0 => {
                report.warn(format!("Negative funds at index {i}: {amount}"));
            }
            Some(amount) if amount > FUNDS_SANITY_CAP => {
                report.warn(format!("Very high funds at index {i}: {amount}"));
            }
            Some(_) => {}
        }
    }
}

fn check_bases(bases: &[Value], report: &mut ValidationReport) {
    if bases.is_empty() {
        report.error("At least one base must exist".to_owned());
        return;
    }

    for (i, base) in bases.iter().enumerate() {
        let Some(base) = base.as_mapping() else {
            report.error(format!("Base {i} must be a mapping"));
            continue;
        };

        for key in [statics::OX_NAME, statics::OX_FACILITIES] {
            if !base.contains_key(key) {
                report.error(format!("Base {i} missing required key: {key}"));
            }
        }

        if let Some(facilities) = base.get(statics::OX_FACILITIES) {
            check_facilities(facilities, i, report);
        }
        if let Some(soldiers) = base.get(statics::OX_SOLDIERS) {
            check_soldiers(soldiers, i, report);
        }
    }
}

fn check_facilities(facilities: &Value, base: usize, report: &mut ValidationReport) {
    let Some(facilities) = facilities.as_sequence() else {
        report.error(format!("Base {base} facilities must be a sequence"));
        return;
    };

    for (j, facility) in facilities.iter().enumerate() {
        let Some(facility) = facility.as_mapping() else {
            report.error(format!("Base {base} facility {j} must be a mapping"));
            continue;
        };

        if !facility.contains_key(statics::OX_TYPE) {
            report.error(format!("Base {base} facility {j} missing type"));
        }

        if let Some(build_time) = facility.get(statics::OX_BUILD_TIME) {
            match build_time.as_i64() {
                None => report.error(format!(
                    "Base {base} facility {j} buildTime must be an integer"
                )),
                Some(hours) if hours < 0 => {
                    report.warn(format!("Base {base} facility {j} has negative build time"));
                }
                Some(_) => {}
            }
        }
    }
}

fn check_soldiers(soldiers: &Value, base: usize, report: &mut ValidationReport) {
    let Some(soldiers) = soldiers.as_sequence() else {
        report.error(format!("Base {base} soldiers must be a sequence"));
        return;
    };

    for (j, soldier) in soldiers.iter().enumerate() {
        let Some(soldier) = soldier.as_mapping() else {
            report.error(format!("Base {base} soldier {j} must be a mapping"));
            continue;
        };

        for key in [statics::OX_NAME, statics::OX_CURRENT_STATS] {
            if !soldier.contains_key(key) {
                report.error(format!("Base {base} soldier {j} missing required key: {key}"));
            }
        }

        if let Some(stats) = soldier.get(statics::OX_CURRENT_STATS) {
            let Some(stats) = stats.as_mapping() else {
                report.error(format!(
                    "Base {base} soldier {j} currentStats must be a mapping"
                ));
                continue;
            };
            for stat in SOLDIER_STATS {
                let Some(value) = stats.get(stat) else {
                    continue;
                };
                match value.as_i64() {
                    None => report.error(format!(
                        "Base {base} soldier {j} {stat} must be an integer"
                    )),
                    Some(v) if !(0..=STAT_PLAUSIBLE_MAX).contains(&v) => {
                        report.warn(format!(
                            "Base {base} soldier {j} {stat} value {v} outside reasonable range (0-{STAT_PLAUSIBLE_MAX})"
                        ));
                    }
                    Some(_) => {}
                }
            }
        }
    }
}

fn check_calendar(doc: &Value, report: &mut ValidationReport) {
    if let Some(time) = doc.get(statics::OX_TIME).and_then(Value::as_mapping) {
        let ranges: [(&str, i64, i64); 6] = [
            ("second", 0, 59),
            ("minute", 0, 59),
            ("hour", 0, 23),
            ("day", 1, 31),
            ("month", 1, 12),
            ("year", 1990, 2100),
        ];
        for (field, min, max) in ranges {
            if let Some(value) = time.get(field) {
                let ok = value.as_i64().is_some_and(|v| (min..=max).contains(&v));
                if !ok {
                    let shown = value
                        .as_i64()
                        .map(|v| v.to_string())
                        .unwrap_or_else(|| value.type_name().to_owned());
                    report.warn(format!(
                        "Time field {field} value {shown} outside reasonable range ({min}-{max})"
                    ));
                }
            }
        }
    }

    if let Some(months) = doc.get(statics::OX_MONTHS_PASSED).and_then(Value::as_i64)
        && !(0..=1200).contains(&months)
    {
        report.warn(format!("Months passed {months} seems unreasonable"));
    }
    if let Some(days) = doc.get(statics::OX_DAYS_PASSED).and_then(Value::as_i64)
        && !(0..=36_500).contains(&days)
    {
        report.warn(format!("Days passed {days} seems unreasonable"));
    }
}
