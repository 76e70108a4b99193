use std::ops::Range;

/// Splits `source` on every `.` and returns each piece with its byte range.
/// Empty pieces are kept so callers can report them.
pub fn split_tokens(source: &str) -> Vec<(&str, Range<usize>)> {
    let mut start = 0;
    source
        .split('.')
        .map(|token| {
            let range = start..start + token.len();
            start = range.end + 1;
            (token, range)
        })
        .collect()
}
