use super::MIN_PAYLOAD_LEN;
use crate::utils::stream::ByteStream;

/// Result of a boundary probe.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Probe {
    /// Accepted end offset, if any.
    pub end: Option<usize>,
    /// Offset where the probe stopped reading.
    pub stopped_at: usize,
}

/// Finds the end of the record whose marker sits at `marker_offset`.
///
/// Reads non-overlapping 4-byte strides starting at the marker. The first
/// all-zero stride at or beyond `marker_offset + MIN_PAYLOAD_LEN` marks the
/// end; its first byte is returned. Zero strides closer to the marker are
/// header fields and are passed over.
///
/// Padding that does not start on a stride boundary relative to the marker
/// is not detected.
pub fn find_end(stream: &ByteStream, marker_offset: usize) -> Option<usize> {
    find_end_probe(stream, marker_offset).end
}

/// Same as [`find_end`], also reporting where the probe stopped.
pub fn find_end_probe(stream: &ByteStream, marker_offset: usize) -> Probe {
    let data = stream.as_slice();
    let min_end = marker_offset.saturating_add(MIN_PAYLOAD_LEN);

    let mut pos = marker_offset;
    while pos.saturating_add(4) <= data.len() {
        let stride = &data[pos..pos + 4];
        pos += 4;

        if stride == [0; 4] && pos - 4 >= min_end {
            return Probe {
                end: Some(pos - 4),
                stopped_at: pos,
            };
        }
    }

    Probe {
        end: None,
        stopped_at: pos.max(marker_offset).min(data.len()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::process::MAGIC;
    use crate::process::fixtures::{FILL, push_record};

    #[test]
    fn accepts_first_pad_past_minimum() {
        let mut blob = vec![FILL; 6];
        let start = push_record(&mut blob, b"", 224);
        blob.extend_from_slice(&[FILL; 32]);

        let stream = ByteStream::from(blob);
        assert_eq!(find_end(&stream, start), Some(start + 224));
    }

    #[test]
    fn header_zeros_are_ignored() {
        let mut blob = MAGIC.to_vec();
        blob.extend_from_slice(&[0; 16]);
        blob.resize(220, FILL);
        blob.extend_from_slice(&[0; 4]);
        blob.resize(300, FILL);
        blob.extend_from_slice(&[0; 4]);
        blob.resize(320, FILL);

        // Strides at 4..20 and at 220 are all zero but too close.
        let stream = ByteStream::from(blob);
        assert_eq!(find_end(&stream, 0), Some(300));
    }

    #[test]
    fn nearest_stride_past_minimum_is_accepted() {
        // 224 is the first stride at or beyond 221.
        let mut blob = MAGIC.to_vec();
        blob.resize(224, FILL);
        blob.extend_from_slice(&[0; 4]);
        blob.resize(240, FILL);

        let stream = ByteStream::from(blob);
        assert_eq!(find_end(&stream, 0), Some(224));
    }

    #[test]
    fn misaligned_pad_is_missed() {
        let mut blob = MAGIC.to_vec();
        blob.resize(230, FILL);
        blob.extend_from_slice(&[0; 4]);
        blob.resize(260, FILL);

        let stream = ByteStream::from(blob);
        let probe = find_end_probe(&stream, 0);
        assert_eq!(probe.end, None);
        assert_eq!(probe.stopped_at, 260);
    }

    #[test]
    fn partial_final_stride_is_not_read() {
        let mut blob = MAGIC.to_vec();
        blob.resize(226, FILL);
        blob.extend_from_slice(&[0; 3]);

        let stream = ByteStream::from(blob);
        let probe = find_end_probe(&stream, 0);
        assert_eq!(probe.end, None);
        assert_eq!(probe.stopped_at, 228);
    }

    #[test]
    fn pad_in_final_window_is_accepted() {
        let mut blob = MAGIC.to_vec();
        blob.resize(224, FILL);
        blob.extend_from_slice(&[0; 4]);
        assert_eq!(blob.len(), 228);

        let stream = ByteStream::from(blob);
        let probe = find_end_probe(&stream, 0);
        assert_eq!(probe.end, Some(224));
        assert_eq!(probe.stopped_at, 228);
    }

    #[test]
    fn marker_past_end() {
        let stream = ByteStream::from(&b"RIFX"[..]);
        assert_eq!(find_end(&stream, 10), None);
        assert_eq!(find_end_probe(&stream, 10).stopped_at, 4);
    }
}
