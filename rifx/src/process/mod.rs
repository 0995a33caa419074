/// Marker search.
///
/// Provides [`find_marker`](scan::find_marker) for locating the next `RIFX`
/// marker at or after an offset.
pub mod scan;

/// Record name recovery.
///
/// Provides [`recover_name`](name::recover_name), a backward scan for the
/// nearest underscore-bearing identifier before a marker.
pub mod name;

/// Record end detection.
///
/// Provides [`find_end`](boundary::find_end), which locates the trailing
/// zero padding after a marker.
pub mod boundary;

/// Byte-range export.
///
/// Provides [`export`](export::export) for copying a record out of the
/// source file into its own file.
pub mod export;

/// Scan orchestration.
///
/// Provides the [`Extractor`](extract::Extractor) state machine and the
/// [`run`](extract::run) driver that exports every record it yields.
pub mod extract;

/// Big-endian RIFF magic that opens every embedded record.
pub const MAGIC: [u8; 4] = *b"RIFX";

/// Smallest distance from a marker at which zero padding may end a record.
/// Shorter zero runs sit inside the record header.
pub const MIN_PAYLOAD_LEN: usize = 0xDD;

/// Extension given to exported records.
pub const RECORD_EXTENSION: &str = "wem";

/// Name used when no identifier precedes a marker.
pub const DEFAULT_NAME: &str = "Untitled.wem";
