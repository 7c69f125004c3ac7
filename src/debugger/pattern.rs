//! Substring and wildcard search over the accumulated debugger output.
//!
//! Wildcard pattern language:
//! * `*` - a run (possibly empty) of ascii alphanumeric characters
//! * `+` - any single character
//! * `X?` - optional literal `X`
//!
//! Any other character is matched literally.

/// Return offset of the leftmost occurrence of `literal` in `haystack`, but only if it starts
/// at or before `max_offset`.
pub fn find_from_start(haystack: &[u8], literal: &str, max_offset: usize) -> Option<usize> {
    let needle = literal.as_bytes();
    if needle.len() > haystack.len() {
        return None;
    }
    let pos = haystack
        .windows(needle.len())
        .position(|window| window == needle)?;
    (pos <= max_offset).then_some(pos)
}

/// Return offset of the rightmost occurrence of `literal` in `haystack`, but only if no more
/// than `max_trailing_slack` bytes follow it.
pub fn find_from_end(haystack: &[u8], literal: &str, max_trailing_slack: usize) -> Option<usize> {
    let needle = literal.as_bytes();
    if needle.len() > haystack.len() {
        return None;
    }
    let last = haystack.len() - needle.len();
    let first = last.saturating_sub(max_trailing_slack);
    (first..=last)
        .rev()
        .find(|&i| &haystack[i..i + needle.len()] == needle)
}

/// Return offset of the rightmost position where `pattern` matches, but only if no more than
/// `max_trailing_slack` bytes follow the matched text.
pub fn find_from_end_wildcard(
    haystack: &[u8],
    pattern: &str,
    max_trailing_slack: usize,
) -> Option<usize> {
    (0..haystack.len()).rev().find(|&i| {
        match_wildcard(&haystack[i..], pattern)
            .is_some_and(|len| haystack.len() - i - len <= max_trailing_slack)
    })
}

/// Return offset of the leftmost position (at or before `max_offset`) where `pattern` matches.
pub fn find_from_start_wildcard(
    haystack: &[u8],
    pattern: &str,
    max_offset: usize,
) -> Option<usize> {
    (0..haystack.len())
        .take(max_offset + 1)
        .find(|&i| match_wildcard(&haystack[i..], pattern).is_some())
}

/// Match `pattern` against the head of `s`. Return length of matched text.
/// An empty match is not a match.
pub fn match_wildcard(s: &[u8], pattern: &str) -> Option<usize> {
    let pattern = pattern.as_bytes();
    let mut pos = 0;
    let mut p = 0;

    while p < pattern.len() {
        match pattern[p] {
            b'*' => {
                while s.get(pos).is_some_and(u8::is_ascii_alphanumeric) {
                    pos += 1;
                }
                p += 1;
            }
            b'+' => {
                s.get(pos)?;
                pos += 1;
                p += 1;
            }
            c if pattern.get(p + 1) == Some(&b'?') => {
                if s.get(pos) == Some(&c) {
                    pos += 1;
                }
                p += 2;
            }
            c => {
                if s.get(pos) != Some(&c) {
                    return None;
                }
                pos += 1;
                p += 1;
            }
        }
    }

    (pos > 0).then_some(pos)
}
