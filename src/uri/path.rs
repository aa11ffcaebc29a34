//! Binds `/`-separated path segments to the scheme's declared syntax slots.

use crate::catalog::SyntaxSlot;

use super::types::{PathParamInstance, TextRange};

/// Name given to a segment with no declared slot.
pub fn synthetic_name(index: usize) -> String {
    format!("segment{index}")
}

/// Segments `path` (starting at absolute offset `start`) left to right.
///
/// Segments beyond the declared slots keep synthetic names; slots beyond the
/// segments produce nothing. An empty path yields no segment, while a trailing
/// `/` yields a trailing empty one.
pub(crate) fn segment_path(path: &str, start: usize, syntax: &[SyntaxSlot]) -> Vec<PathParamInstance> {
    if path.is_empty() {
        return Vec::new();
    }

    let mut offset = start;
    path.split('/')
        .enumerate()
        .map(|(index, value)| {
            let range = TextRange::new(offset, offset + value.len());
            offset = range.end + 1;

            PathParamInstance {
                name: syntax
                    .get(index)
                    .map(|slot| slot.name.clone())
                    .unwrap_or_else(|| synthetic_name(index)),
                value: value.to_string(),
                range,
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn slots(names: &[(&str, bool)]) -> Vec<SyntaxSlot> {
        names
            .iter()
            .map(|(name, required)| SyntaxSlot {
                name: name.to_string(),
                required: *required,
            })
            .collect()
    }

    #[test]
    fn test_binds_slots_in_order() {
        let params = segment_path("foo", 6, &slots(&[("timerName", true)]));
        assert_eq!(params.len(), 1);
        assert_eq!(params[0].name, "timerName");
        assert_eq!(params[0].value, "foo");
        assert_eq!(params[0].range, TextRange::new(6, 9));
    }

    #[test]
    fn test_extra_segments_get_synthetic_names() {
        let params = segment_path("a/b/c", 10, &slots(&[("first", true)]));
        let names: Vec<_> = params.iter().map(|p| p.name.as_str()).collect();
        assert_eq!(names, vec!["first", "segment1", "segment2"]);
        assert_eq!(params[2].range, TextRange::new(14, 15));
    }

    #[test]
    fn test_missing_slots_are_not_defaulted() {
        let params = segment_path("a", 0, &slots(&[("first", true), ("second", true)]));
        assert_eq!(params.len(), 1);
    }

    #[test]
    fn test_empty_path_has_no_segment() {
        assert!(segment_path("", 0, &[]).is_empty());
    }

    #[test]
    fn test_trailing_slash_keeps_empty_segment() {
        let params = segment_path("a/", 0, &[]);
        assert_eq!(params.len(), 2);
        assert_eq!(params[1].value, "");
        assert_eq!(params[1].range, TextRange::empty(2));
    }
}
