use std::collections::HashSet;
use std::io::SeekFrom;
use std::path::{Path, PathBuf};

use log::{Level, debug, info, warn};
use serde::Serialize;

use super::MAGIC;
use super::boundary::find_end_probe;
use super::export::Exporter;
use super::name::recover_name_within;
use super::scan::find_marker;
use crate::log_or_err;
use crate::structs::record::Record;
use crate::utils::errors::ExtractError;
use crate::utils::stream::ByteStream;

/// What to do with the cursor when a marker has no end boundary.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SkipPolicy {
    /// Keep scanning right after the failed marker.
    #[default]
    Resume,
    /// Continue from wherever the boundary probe stopped. The probe reads
    /// to the end of the stream when it fails, so this normally ends the run.
    Stop,
}

#[derive(Debug, Clone)]
pub struct ExtractOptions {
    pub skip_policy: SkipPolicy,
    /// Upper bound for the backward name scan, `None` scans to offset 0.
    pub name_lookback: Option<usize>,
    /// Events logged at or above this level abort the run instead.
    pub fail_level: Level,
    pub exporter: Exporter,
}

impl Default for ExtractOptions {
    fn default() -> Self {
        Self {
            skip_policy: SkipPolicy::default(),
            name_lookback: None,
            fail_level: Level::Error,
            exporter: Exporter::default(),
        }
    }
}

/// One step of the scan.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    /// A marker with a valid end boundary.
    Extracted(Record),
    /// A marker without an end boundary.
    Skipped { marker_offset: usize, name: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum State {
    Scanning,
    EndOfStream,
}

/// Scan state machine over a [`ByteStream`].
///
/// Each call to [`next`](Iterator::next) searches for a marker from the
/// cursor, recovers its name and probes for its end:
///
/// - boundary found: yields [`Outcome::Extracted`], cursor moves to the end.
/// - no boundary: yields [`Outcome::Skipped`], cursor moves per [`SkipPolicy`].
/// - no marker: the iterator is exhausted for good.
///
/// The cursor only ever moves forward, so every stream is scanned in a
/// finite number of steps. No I/O happens here; see [`run`] for exporting.
///
/// # Example
///
/// ```rust
/// use rifx::process::extract::{ExtractOptions, Extractor};
/// use rifx::utils::stream::ByteStream;
///
/// let stream = ByteStream::from(vec![0u8; 1000]);
/// assert_eq!(Extractor::new(stream, ExtractOptions::default()).count(), 0);
/// ```
#[derive(Debug)]
pub struct Extractor {
    stream: ByteStream,
    state: State,
    skip_policy: SkipPolicy,
    name_lookback: Option<usize>,
    markers_found: usize,
}

impl Extractor {
    pub fn new(mut stream: ByteStream, options: ExtractOptions) -> Self {
        stream.seek(SeekFrom::Start(0));
        Self {
            stream,
            state: State::Scanning,
            skip_policy: options.skip_policy,
            name_lookback: options.name_lookback,
            markers_found: 0,
        }
    }

    /// Offset where the next marker search starts.
    pub fn position(&self) -> usize {
        self.stream.position()
    }

    pub fn stream(&self) -> &ByteStream {
        &self.stream
    }

    pub fn markers_found(&self) -> usize {
        self.markers_found
    }

    pub fn is_finished(&self) -> bool {
        self.state == State::EndOfStream
    }

    fn advance_to(&mut self, offset: usize) {
        debug_assert!(offset > self.stream.position());
        self.stream.seek(SeekFrom::Start(offset as u64));
    }
}

impl Iterator for Extractor {
    type Item = Outcome;

    fn next(&mut self) -> Option<Self::Item> {
        if self.state == State::EndOfStream {
            return None;
        }

        let Some(marker_offset) = find_marker(&self.stream, self.stream.position()) else {
            self.stream.seek(SeekFrom::End(0));
            self.state = State::EndOfStream;
            return None;
        };
        self.markers_found += 1;

        let name = recover_name_within(&self.stream, marker_offset, self.name_lookback);
        debug!("Marker at {marker_offset:#X}, recovered name {name}");

        let probe = find_end_probe(&self.stream, marker_offset);
        let record = probe.end.and_then(|end_offset| {
            Record::new(marker_offset, end_offset, name.as_str(), self.stream.len())
                .map_err(|err| warn!("Discarding record at {marker_offset:#X}: {err}"))
                .ok()
        });
        match record {
            Some(record) => {
                self.advance_to(record.end_offset);
                Some(Outcome::Extracted(record))
            }
            None => {
                let past_marker = marker_offset + MAGIC.len();
                let resume_at = match self.skip_policy {
                    SkipPolicy::Resume => past_marker,
                    SkipPolicy::Stop => probe.stopped_at.max(past_marker),
                };
                self.advance_to(resume_at);
                Some(Outcome::Skipped {
                    marker_offset,
                    name,
                })
            }
        }
    }
}

/// Runs the scan without writing anything.
pub fn scan(stream: ByteStream, options: &ExtractOptions) -> Vec<Outcome> {
    Extractor::new(stream, options.clone()).collect()
}

/// Hooks for following a [`run`] as it happens.
pub trait ExtractObserver {
    /// Called after every step with the cursor and the stream length.
    fn on_progress(&mut self, _position: usize, _len: usize) {}

    /// Called for each outcome before it is exported.
    fn on_outcome(&mut self, _outcome: &Outcome) {}
}

impl ExtractObserver for () {}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ExportedRecord {
    #[serde(flatten)]
    pub record: Record,
    pub path: PathBuf,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SkippedMarker {
    pub marker_offset: usize,
    pub name: String,
}

/// Summary of a finished [`run`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ExtractionReport {
    pub source: PathBuf,
    pub output_directory: PathBuf,
    pub bytes_scanned: usize,
    pub extracted: Vec<ExportedRecord>,
    pub skipped: Vec<SkippedMarker>,
}

impl ExtractionReport {
    pub fn extracted_count(&self) -> usize {
        self.extracted.len()
    }

    /// Exported paths in order, each listed once even when a later record
    /// overwrote an earlier one with the same name.
    pub fn unique_paths(&self) -> Vec<&Path> {
        let mut seen = HashSet::with_capacity(self.extracted.len());
        self.extracted
            .iter()
            .map(|exported| exported.path.as_path())
            .filter(|path| seen.insert(*path))
            .collect()
    }
}

/// Scans `source_path` and exports every record into `output_directory`.
///
/// The directory must already exist. Export failures abort the run. A
/// marker without an end boundary is logged at [`Level::Warn`] and skipped,
/// unless `options.fail_level` makes warnings fatal.
pub fn run(
    source_path: &Path,
    output_directory: &Path,
    options: &ExtractOptions,
    observer: &mut dyn ExtractObserver,
) -> Result<ExtractionReport, ExtractError> {
    let stream = ByteStream::open(source_path).map_err(|source| ExtractError::Open {
        path: source_path.to_path_buf(),
        source,
    })?;
    let len = stream.len();
    info!("Scanning {} ({len} bytes)", source_path.display());

    let mut report = ExtractionReport {
        source: source_path.to_path_buf(),
        output_directory: output_directory.to_path_buf(),
        ..Default::default()
    };

    let mut extractor = Extractor::new(stream, options.clone());
    while let Some(outcome) = extractor.next() {
        observer.on_outcome(&outcome);

        match outcome {
            Outcome::Extracted(record) => {
                info!("Audio header found at {:#X}", record.start_offset);
                let path = options.exporter.export(
                    source_path,
                    extractor.stream(),
                    output_directory,
                    &record,
                )?;
                info!("Saved {record}");
                report.extracted.push(ExportedRecord { record, path });
            }
            Outcome::Skipped {
                marker_offset,
                name,
            } => {
                info!("Audio header found at {marker_offset:#X}");
                log_or_err!(
                    options,
                    Level::Warn,
                    ExtractError::BoundaryNotFound(marker_offset)
                );
                report.skipped.push(SkippedMarker {
                    marker_offset,
                    name,
                });
            }
        }

        observer.on_progress(extractor.position(), len);
    }

    report.bytes_scanned = len;
    observer.on_progress(len, len);
    info!(
        "{} records extracted, {} markers skipped",
        report.extracted.len(),
        report.skipped.len()
    );

    Ok(report)
}
