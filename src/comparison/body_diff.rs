//! Byte-level first-difference search.

use crate::comparison::record::{DiffResult, FirstDifference};

/// Bytes of context captured on each side of the divergence.
pub const CONTEXT_RADIUS: usize = 5;

// Chunks are compared with slice equality (memcmp); only the first unequal
// chunk is scanned byte by byte.
const CHUNK: usize = 256;

/// Locate the first byte at which `primary` and `secondary` diverge.
///
/// A strict prefix diverges at the length of the shorter body.
pub fn first_difference(primary: &[u8], secondary: &[u8]) -> FirstDifference {
    if primary == secondary {
        return FirstDifference::Identical;
    }

    let position = mismatch_index(primary, secondary);
    FirstDifference::Differs(DiffResult {
        position,
        context_primary: context(primary, position),
        context_secondary: context(secondary, position),
    })
}

fn mismatch_index(a: &[u8], b: &[u8]) -> usize {
    let common = a.len().min(b.len());
    let mut offset = 0;

    while offset < common {
        let end = (offset + CHUNK).min(common);
        let (left, right) = (&a[offset..end], &b[offset..end]);
        if left != right {
            return left
                .iter()
                .zip(right)
                .position(|(x, y)| x != y)
                .map_or(end, |i| offset + i);
        }
        offset = end;
    }

    common
}

fn context(body: &[u8], position: usize) -> String {
    let start = position.saturating_sub(CONTEXT_RADIUS).min(body.len());
    let end = position
        .saturating_add(CONTEXT_RADIUS + 1)
        .min(body.len());
    String::from_utf8_lossy(&body[start..end]).into_owned()
}

#[cfg(test)]
mod tests {
    use super::*;

    const BASE: &str = "a string of length 20";

    fn diff(a: &str, b: &str) -> DiffResult {
        match first_difference(a.as_bytes(), b.as_bytes()) {
            FirstDifference::Differs(diff) => diff,
            other => panic!("expected a difference, got {:?}", other),
        }
    }

    #[test]
    fn test_identical_bodies() {
        assert_eq!(first_difference(BASE.as_bytes(), BASE.as_bytes()), FirstDifference::Identical);
        assert_eq!(first_difference(b"", b""), FirstDifference::Identical);
    }

    #[test]
    fn test_position_of_first_difference() {
        assert_eq!(diff(BASE, "a different string").position, 2);
    }

    #[test]
    fn test_context_in_the_middle() {
        let d = diff(BASE, "a string!of length 20");
        assert_eq!(d.position, 8);
        assert_eq!(d.context_primary, "tring of le");
        assert_eq!(d.context_secondary, "tring!of le");
    }

    #[test]
    fn test_context_clamped_at_end() {
        let d = diff(BASE, "a string of length!20");
        assert_eq!(d.position, 18);
        assert_eq!(d.context_primary, "ength 20");
        assert_eq!(d.context_secondary, "ength!20");
    }

    #[test]
    fn test_context_clamped_at_start() {
        let d = diff(BASE, "a!string of length 20");
        assert_eq!(d.position, 1);
        assert_eq!(d.context_primary, "a strin");
        assert_eq!(d.context_secondary, "a!strin");
    }

    #[test]
    fn test_strict_prefix() {
        let d = diff("abc", "abcdef");
        assert_eq!(d.position, 3);
        assert_eq!(d.context_primary, "abc");
        assert_eq!(d.context_secondary, "abcdef");

        let d = diff("abcdef", "abc");
        assert_eq!(d.position, 3);
    }

    #[test]
    fn test_long_bodies_across_chunks() {
        let a = vec![b'x'; 10_000];
        let mut b = a.clone();
        b[7_777] = b'y';
        match first_difference(&a, &b) {
            FirstDifference::Differs(d) => {
                assert_eq!(d.position, 7_777);
                assert_eq!(d.context_secondary, "xxxxxyxxxxx");
            }
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn test_empty_against_non_empty() {
        let d = diff("", "abc");
        assert_eq!(d.position, 0);
        assert_eq!(d.context_primary, "");
        assert_eq!(d.context_secondary, "abc");
    }
}
