//! Dotted-path access into a save document.
//!
//! Paths address one location in the tree, e.g. `bases.0.research.2.spent`.
//! Numeral segments are resolved by the container actually found at traversal
//! time: an index into a sequence, an ordinary key into a mapping. A missing
//! mapping key is "absent", not an error; a bad sequence index or an attempt
//! to step into a scalar is a structural mismatch and always surfaces.

use crate::value::{Mapping, Value};
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PathError {
    #[error("index {index} is out of bounds for sequence of length {len} at `{at}`")]
    IndexOutOfBounds { at: String, index: usize, len: usize },

    #[error("`{segment}` is not a valid sequence index at `{at}`")]
    InvalidIndex { at: String, segment: String },

    #[error("cannot traverse into {kind} value at `{at}`")]
    NotAContainer { at: String, kind: &'static str },
}

fn joined(segments: &[&str], upto: usize) -> String {
    segments[..upto].join(".")
}

fn parse_index(segments: &[&str], upto: usize, segment: &str) -> Result<usize, PathError> {
    segment.parse::<usize>().map_err(|_| PathError::InvalidIndex {
        at: joined(segments, upto),
        segment: segment.to_owned(),
    })
}

/// Read the value at `path`. Returns `Ok(None)` the moment a mapping lookup
/// misses; errors only on structural mismatches.
pub fn get_path<'a>(root: &'a Value, path: &str) -> Result<Option<&'a Value>, PathError> {
    let segments: Vec<&str> = path.split('.').collect();
    let mut current = root;

    for (pos, segment) in segments.iter().enumerate() {
        current = match current {
            Value::Mapping(map) => match map.get(*segment) {
                Some(next) => next,
                None => return Ok(None),
            },
            Value::Sequence(values) => {
                let index = parse_index(&segments, pos + 1, segment)?;
                match values.get(index) {
                    Some(next) => next,
                    None => {
                        return Err(PathError::IndexOutOfBounds {
                            at: joined(&segments, pos + 1),
                            index,
                            len: values.len(),
                        });
                    }
                }
            }
            other => {
                return Err(PathError::NotAContainer {
                    at: joined(&segments, pos),
                    kind: other.type_name(),
                });
            }
        };
    }

    Ok(Some(current))
}

/// Mutable variant of [`get_path`]; same absence and error semantics.
pub fn get_path_mut<'a>(root: &'a mut Value, path: &str) -> Result<Option<&'a mut Value>, PathError> {
    let segments: Vec<&str> = path.split('.').collect();
    let mut current = root;

    for (pos, segment) in segments.iter().enumerate() {
        current = match current {
            Value::Mapping(map) => match map.get_mut(*segment) {
                Some(next) => next,
                None => return Ok(None),
            },
            Value::Sequence(values) => {
                let len = values.len();
                let index = parse_index(&segments, pos + 1, segment)?;
                match values.get_mut(index) {
                    Some(next) => next,
                    None => {
                        return Err(PathError::IndexOutOfBounds {
                            at: joined(&segments, pos + 1),
                            index,
                            len,
                        });
                    }
                }
            }
            other => {
                return Err(PathError::NotAContainer {
                    at: joined(&segments, pos),
                    kind: other.type_name(),
                });
            }
        };
    }

    Ok(Some(current))
}

/// Write `value` at `path`, mutating the document in place.
///
/// Missing mapping keys on the way down are auto-vivified as empty mappings.
/// Sequence elements are never created: an out-of-range index is an error at
/// any position, and the final segment must land on an existing slot or a
/// mapping key.
pub fn set_path(root: &mut Value, path: &str, value: Value) -> Result<(), PathError> {
    let segments: Vec<&str> = path.split('.').collect();
    let Some((last, parents)) = segments.split_last() else {
        return Ok(());
    };

    let mut current = root;
    for (pos, segment) in parents.iter().enumerate() {
        current = match current {
            Value::Mapping(map) => map
                .entry((*segment).to_owned())
                .or_insert_with(|| Value::Mapping(Mapping::new())),
            Value::Sequence(values) => {
                let len = values.len();
                let index = parse_index(&segments, pos + 1, segment)?;
                match values.get_mut(index) {
                    Some(next) => next,
                    None => {
                        return Err(PathError::IndexOutOfBounds {
                            at: joined(&segments, pos + 1),
                            index,
                            len,
                        });
                    }
                }
            }
            other => {
                return Err(PathError::NotAContainer {
                    at: joined(&segments, pos),
                    kind: other.type_name(),
                });
            }
        };
    }

    match current {
        Value::Mapping(map) => {
            map.insert((*last).to_owned(), value);
            Ok(())
        }
        Value::Sequence(values) => {
            let len = values.len();
            let index = parse_index(&segments, segments.len(), last)?;
            match values.get_mut(index) {
                Some(slot) => {
                    *slot = value;
                    Ok(())
                }
                None => Err(PathError::IndexOutOfBounds {
                    at: joined(&segments, segments.len()),
                    index,
                    len,
                }),
            }
        }
        other => Err(PathError::NotAContainer {
            at: joined(&segments, parents.len()),
            kind: other.type_name(),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::{PathError, get_path, set_path};
    use crate::value::Value;

    fn doc(text: &str) -> Value {
        Value::parse_documents(text).unwrap().remove(0)
    }

    #[test]
    fn get_traverses_mappings_and_sequences() {
        let root = doc("bases:\n- name: Omega\n  research:\n  - project: STR_LASER\n    spent: 30\n");
        let spent = get_path(&root, "bases.0.research.0.spent").unwrap();
        assert_eq!(spent.and_then(Value::as_i64), Some(30));
    }

    #[test]
    fn missing_mapping_key_is_absent_not_error() {
        let root = doc("bases: []\n");
        assert_eq!(get_path(&root, "nothing.here.at.all").unwrap(), None);
    }

    #[test]
    fn sequence_index_out_of_bounds_is_error() {
        let root = doc("funds:\n- 100\n- 200\n");
        let err = get_path(&root, "funds.5").unwrap_err();
        assert_eq!(
            err,
            PathError::IndexOutOfBounds {
                at: "funds.5".to_owned(),
                index: 5,
                len: 2,
            }
        );
    }

    #[test]
    fn non_numeric_segment_against_sequence_is_error() {
        let root = doc("funds:\n- 100\n");
        assert!(matches!(
            get_path(&root, "funds.first"),
            Err(PathError::InvalidIndex { .. })
        ));
    }

    #[test]
    fn keying_into_scalar_is_error() {
        let root = doc("difficulty: 2\n");
        assert!(matches!(
            get_path(&root, "difficulty.deeper"),
            Err(PathError::NotAContainer { kind: "number", .. })
        ));
    }

    #[test]
    fn set_autovivifies_missing_mappings() {
        let mut root = doc("bases: []\n");
        set_path(&mut root, "alienStrategy.regions.STR_EUROPE", Value::from(5_i64)).unwrap();
        let v = get_path(&root, "alienStrategy.regions.STR_EUROPE").unwrap();
        assert_eq!(v.and_then(Value::as_i64), Some(5));
    }

    #[test]
    fn set_never_creates_sequence_elements() {
        let mut root = doc("funds:\n- 100\nbases: []\n");
        assert!(matches!(
            set_path(&mut root, "funds.3", Value::from(1_i64)),
            Err(PathError::IndexOutOfBounds { .. })
        ));
        // Intermediate sequence positions are just as strict.
        assert!(matches!(
            set_path(&mut root, "bases.2.name", Value::from("X")),
            Err(PathError::IndexOutOfBounds { .. })
        ));
    }

    #[test]
    fn numeral_segment_is_a_key_when_container_is_a_mapping() {
        let mut root = doc("codes:\n  '7': old\n");
        set_path(&mut root, "codes.7", Value::from("new")).unwrap();
        let v = get_path(&root, "codes.7").unwrap();
        assert_eq!(v.and_then(Value::as_str), Some("new"));
    }
}
