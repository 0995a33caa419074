use super::MAGIC;
use crate::utils::stream::ByteStream;

/// Finds the first `RIFX` marker starting at or after `start_offset`.
///
/// Every position `p` with `start_offset <= p < len - 4` is a candidate.
/// When the byte at `p` matches the first marker byte, the next three bytes
/// are compared; on a mismatch the scan resumes at `p + 1`, so a failed
/// probe never hides a marker starting inside it.
///
/// # Returns
///
/// The offset of the marker's first byte, or `None` when no candidate
/// position remains. Streams shorter than five bytes never match.
///
/// # Example
///
/// ```rust
/// use rifx::process::scan::find_marker;
/// use rifx::utils::stream::ByteStream;
///
/// let stream = ByteStream::from(&b"RRIFXdata"[..]);
/// assert_eq!(find_marker(&stream, 0), Some(1));
/// assert_eq!(find_marker(&stream, 2), None);
/// ```
pub fn find_marker(stream: &ByteStream, start_offset: usize) -> Option<usize> {
    let data = stream.as_slice();
    let search_end = data.len().saturating_sub(MAGIC.len());

    (start_offset..search_end).find(|&p| data[p] == MAGIC[0] && data[p + 1..p + 4] == MAGIC[1..])
}

#[test]
fn short_streams_never_match() {
    for len in 0..5 {
        let stream = ByteStream::from(&b"RIFXX"[..len]);
        assert_eq!(find_marker(&stream, 0), None, "len {len}");
    }
    assert_eq!(find_marker(&ByteStream::from(&b"RIFXX"[..]), 0), Some(0));
}

#[test]
fn overlapping_first_byte_is_rescanned() {
    let stream = ByteStream::from(&b"RIRRIFX...."[..]);
    assert_eq!(find_marker(&stream, 0), Some(3));
}

#[test]
fn start_offset_is_inclusive() {
    let stream = ByteStream::from(&b"..RIFX..RIFX.."[..]);
    assert_eq!(find_marker(&stream, 2), Some(2));
    assert_eq!(find_marker(&stream, 3), Some(8));
    assert_eq!(find_marker(&stream, 9), None);
    assert_eq!(find_marker(&stream, 1000), None);
}

#[test]
fn no_marker_in_large_stream() {
    let data: Vec<u8> = (0..1000).map(|i| (i * 7 % 80) as u8).collect();
    assert!(!data.windows(4).any(|w| w == MAGIC));

    let mut tail = data.clone();
    tail.truncate(996);
    tail.extend_from_slice(b"RIF");
    tail.push(b'R');

    assert_eq!(find_marker(&ByteStream::from(data), 0), None);
    assert_eq!(find_marker(&ByteStream::from(tail), 0), None);
}

#[test]
fn marker_in_final_window_is_not_a_candidate() {
    let stream = ByteStream::from(&b"....RIFX"[..]);
    assert_eq!(find_marker(&stream, 0), None);
}
