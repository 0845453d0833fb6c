//! Fixed-width string marshaling
//!
//! Names, ids and long names are stored in character variables with a fixed
//! stride per string. Values are right-padded with spaces on write and
//! right-trimmed (spaces and NUL) on read.

/// Trims trailing padding (spaces, NUL and other whitespace) from a string.
#[must_use]
pub fn trim(value: &str) -> &str {
    value.trim_end_matches(|c: char| c == '\0' || c.is_whitespace())
}

/// Pads or truncates `value` to exactly `width` bytes.
///
/// Truncation never splits a UTF-8 character; the remainder is padded instead.
#[must_use]
pub fn pad(value: &str, width: usize) -> Vec<u8> {
    let mut end = value.len().min(width);
    while !value.is_char_boundary(end) {
        end -= 1;
    }

    let mut bytes = Vec::with_capacity(width);
    bytes.extend_from_slice(&value.as_bytes()[..end]);
    bytes.resize(width, b' ');
    bytes
}

/// Packs an ordered sequence of strings into one buffer with stride `width`.
#[must_use]
pub fn pack_strings<S: AsRef<str>>(values: &[S], width: usize) -> Vec<u8> {
    let mut bytes = Vec::with_capacity(values.len() * width);
    for value in values {
        bytes.extend(pad(value.as_ref(), width));
    }
    bytes
}

/// Splits a buffer with stride `width` back into trimmed strings.
///
/// Bytes that are not valid UTF-8 are replaced, a trailing partial chunk is kept.
#[must_use]
pub fn unpack_strings(bytes: &[u8], width: usize) -> Vec<String> {
    if width == 0 {
        return Vec::new();
    }

    bytes
        .chunks(width)
        .map(|chunk| trim(&String::from_utf8_lossy(chunk)).to_owned())
        .collect()
}

/// Decodes a whole character buffer into one trimmed string.
#[must_use]
pub fn bytes_to_string(bytes: &[u8]) -> String {
    trim(&String::from_utf8_lossy(bytes)).to_owned()
}
