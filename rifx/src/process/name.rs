use super::{DEFAULT_NAME, RECORD_EXTENSION};
use crate::utils::stream::ByteStream;

/// Recovers a file name for the marker at `marker_offset`.
///
/// Scans backward from `marker_offset - 1` down to offset 0, collecting runs
/// of word characters (ASCII letters, digits, `_`). Each run is checked once
/// a separator byte terminates it; the first run containing an underscore
/// becomes the name, with a `.wem` extension. Runs without an underscore are
/// dropped and the scan continues.
///
/// Falls back to [`DEFAULT_NAME`] when no run qualifies. A run still open
/// when the scan reaches offset 0 has no separator before it and is never
/// checked.
///
/// # Example
///
/// ```rust
/// use rifx::process::name::recover_name;
/// use rifx::utils::stream::ByteStream;
///
/// let stream = ByteStream::from(&b"\x00vo_intro\x00123\x00RIFX"[..]);
/// assert_eq!(recover_name(&stream, 14), "vo_intro.wem");
/// ```
pub fn recover_name(stream: &ByteStream, marker_offset: usize) -> String {
    recover_name_within(stream, marker_offset, None)
}

/// Same as [`recover_name`], looking back at most `lookback` bytes.
///
/// A run cut off by the lookback limit is unterminated and never accepted.
pub fn recover_name_within(
    stream: &ByteStream,
    marker_offset: usize,
    lookback: Option<usize>,
) -> String {
    let end = marker_offset.min(stream.len());
    let floor = lookback.map_or(0, |n| end.saturating_sub(n));
    let data = &stream.as_slice()[floor..end];

    let mut token_end = None;
    for i in (0..data.len()).rev() {
        match (is_word_byte(data[i]), token_end) {
            (true, None) => token_end = Some(i + 1),
            (false, Some(te)) => {
                if let Some(name) = accept(&data[i + 1..te]) {
                    return name;
                }
                token_end = None;
            }
            _ => {}
        }
    }

    DEFAULT_NAME.to_string()
}

fn is_word_byte(byte: u8) -> bool {
    byte.is_ascii_alphanumeric() || byte == b'_'
}

fn accept(token: &[u8]) -> Option<String> {
    if !token.contains(&b'_') {
        return None;
    }

    // Word bytes are ASCII, so this never fails.
    let token = std::str::from_utf8(token).ok()?;
    Some(format!("{token}.{RECORD_EXTENSION}"))
}
