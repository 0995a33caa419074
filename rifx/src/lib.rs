//! Heuristic extraction of RIFX audio records from opaque archive blobs.
//!
//! ## Technical Overview
//!
//! Some game archives, once decompressed, are a single undifferentiated blob
//! with Wwise `.wem` payloads (big-endian RIFF, magic `RIFX`) packed inside.
//! This crate does not interpret any table of contents. It recovers records
//! purely from byte patterns:
//!
//! - **Marker**: every record starts with the four bytes `RIFX`.
//! - **Name**: the nearest identifier-like token before the marker that
//!   contains an underscore, e.g. `vo_intro_01`.
//! - **End**: the first 4-byte all-zero stride at least 221 bytes past the
//!   marker, scanning in non-overlapping strides from the marker.
//!
//! Results are best-effort.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use rifx::process::extract::{ExtractOptions, Extractor, Outcome};
//! use rifx::utils::stream::ByteStream;
//!
//! let stream = ByteStream::open("sound_bank.pkz.dec")?;
//!
//! for outcome in Extractor::new(stream, ExtractOptions::default()) {
//!     match outcome {
//!         Outcome::Extracted(record) => println!("{record}"),
//!         Outcome::Skipped { marker_offset, .. } => {
//!             eprintln!("no end boundary for marker at {marker_offset:#X}")
//!         }
//!     }
//! }
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```
//!
//! To write the records to disk as well, use [`process::extract::run`].

/// Scanning, naming, bounding and exporting records.
///
/// 1. **Marker scan** ([`process::scan`]): finds the next `RIFX` marker.
/// 2. **Name recovery** ([`process::name`]): backward token scan.
/// 3. **Boundary** ([`process::boundary`]): zero-padding end detection.
/// 4. **Export** ([`process::export`]): byte-range copy to a file.
/// 5. **Orchestration** ([`process::extract`]): the scan state machine and
///    the run driver.
pub mod process;

/// Data structures produced by the scan.
pub mod structs;

/// Byte stream access and error types.
pub mod utils;
