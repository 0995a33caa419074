use std::fs::File;
use std::io::{self, BufWriter, Read, Seek, SeekFrom, Write};
use std::path::{Path, PathBuf};

use crate::structs::record::Record;
use crate::utils::errors::ExportError;
use crate::utils::stream::ByteStream;

/// Copies `start..end` of `source_path` into `output_directory/name`.
///
/// The source is opened with its own read handle. An existing file with the
/// same name is truncated and overwritten. Both handles are dropped before
/// returning, on success and on error.
///
/// # Errors
///
/// [`ExportError::EmptyRange`] when `start >= end`, before anything is opened.
/// [`ExportError::ShortRead`] when the source holds fewer than `end - start`
/// bytes past `start`; the other variants wrap the failing I/O call.
pub fn export(
    source_path: &Path,
    output_directory: &Path,
    name: &str,
    start: usize,
    end: usize,
) -> Result<PathBuf, ExportError> {
    if start >= end {
        return Err(ExportError::EmptyRange { start, end });
    }

    let mut source = File::open(source_path).map_err(|source| ExportError::Open {
        path: source_path.to_path_buf(),
        source,
    })?;
    source
        .seek(SeekFrom::Start(start as u64))
        .map_err(|source| ExportError::Seek {
            offset: start,
            source,
        })?;

    let expected = end - start;
    let mut buffer = Vec::with_capacity(expected);
    source
        .take(expected as u64)
        .read_to_end(&mut buffer)
        .map_err(|source| ExportError::Read {
            path: source_path.to_path_buf(),
            source,
        })?;
    if buffer.len() != expected {
        return Err(ExportError::ShortRead {
            offset: start,
            expected,
            actual: buffer.len(),
        });
    }

    write_output(output_directory, name, &buffer)
}

/// Writes `record` from an in-memory stream, with the same output rules as
/// [`export`].
pub fn export_bytes(
    stream: &ByteStream,
    output_directory: &Path,
    record: &Record,
) -> Result<PathBuf, ExportError> {
    let bytes = stream.peek(record.start_offset, record.len());
    if bytes.len() != record.len() {
        return Err(ExportError::ShortRead {
            offset: record.start_offset,
            expected: record.len(),
            actual: bytes.len(),
        });
    }

    write_output(output_directory, &record.name, bytes)
}

fn write_output(output_directory: &Path, name: &str, bytes: &[u8]) -> Result<PathBuf, ExportError> {
    let path = output_directory.join(name);

    let file = File::create(&path).map_err(|source| ExportError::Create {
        path: path.clone(),
        source,
    })?;

    let write = |file: File| -> io::Result<()> {
        let mut writer = BufWriter::new(file);
        writer.write_all(bytes)?;
        writer.flush()
    };
    write(file).map_err(|source| ExportError::Write {
        path: path.clone(),
        source,
    })?;

    Ok(path)
}

/// Where [`run`](super::extract::run) takes record bytes from.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Exporter {
    /// Re-read each range from the source file with a fresh handle.
    #[default]
    SourceFile,
    /// Slice the already loaded stream.
    InMemory,
}

impl Exporter {
    pub fn export(
        self,
        source_path: &Path,
        stream: &ByteStream,
        output_directory: &Path,
        record: &Record,
    ) -> Result<PathBuf, ExportError> {
        match self {
            Exporter::SourceFile => export(
                source_path,
                output_directory,
                &record.name,
                record.start_offset,
                record.end_offset,
            ),
            Exporter::InMemory => export_bytes(stream, output_directory, record),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn source_file(dir: &TempDir, bytes: &[u8]) -> PathBuf {
        let path = dir.path().join("bank.bin");
        fs::write(&path, bytes).unwrap();
        path
    }

    #[test]
    fn copies_exact_range() {
        let dir = TempDir::new().unwrap();
        let data: Vec<u8> = (0..=255u8).cycle().take(4096).collect();
        let source = source_file(&dir, &data);

        let out = export(&source, dir.path(), "vo_line.wem", 100, 1337).unwrap();

        assert_eq!(out, dir.path().join("vo_line.wem"));
        let written = fs::read(&out).unwrap();
        assert_eq!(written.len(), 1237);
        assert_eq!(written, &data[100..1337]);
    }

    #[test]
    fn overwrites_existing_output() {
        let dir = TempDir::new().unwrap();
        let source = source_file(&dir, b"0123456789abcdef");
        fs::write(dir.path().join("a_b.wem"), vec![0xEE; 64]).unwrap();

        let out = export(&source, dir.path(), "a_b.wem", 2, 6).unwrap();
        assert_eq!(fs::read(out).unwrap(), b"2345");
    }

    #[test]
    fn short_source_is_an_error() {
        let dir = TempDir::new().unwrap();
        let source = source_file(&dir, b"0123456789");

        let err = export(&source, dir.path(), "a_b.wem", 4, 20).unwrap_err();
        assert!(matches!(
            err,
            ExportError::ShortRead {
                offset: 4,
                expected: 16,
                actual: 6
            }
        ));
    }

    #[test]
    fn empty_range_is_rejected() {
        let dir = TempDir::new().unwrap();
        let source = source_file(&dir, b"0123456789");

        let err = export(&source, dir.path(), "a_b.wem", 5, 5).unwrap_err();
        assert!(matches!(err, ExportError::EmptyRange { start: 5, end: 5 }));
        assert_eq!(err.to_string(), "Export range 0x5..0x5 is empty");
        assert!(!dir.path().join("a_b.wem").exists());

        let err = export(&source, dir.path(), "a_b.wem", 8, 3).unwrap_err();
        assert!(matches!(err, ExportError::EmptyRange { start: 8, end: 3 }));
    }

    #[test]
    fn missing_source_and_directory() {
        let dir = TempDir::new().unwrap();
        let missing = dir.path().join("missing.bin");

        let err = export(&missing, dir.path(), "a_b.wem", 0, 4).unwrap_err();
        assert!(matches!(err, ExportError::Open { .. }));

        let source = source_file(&dir, b"0123456789");
        let err = export(&source, &dir.path().join("nope"), "a_b.wem", 0, 4).unwrap_err();
        assert!(matches!(err, ExportError::Create { .. }));
    }

    #[test]
    fn in_memory_matches_file_export() {
        let dir = TempDir::new().unwrap();
        let data: Vec<u8> = (0..512u32).map(|i| (i * 13) as u8).collect();
        let source = source_file(&dir, &data);
        let stream = ByteStream::from(data.clone());

        let from_file = Record::new(8, 300, "from_file.wem", data.len()).unwrap();
        let from_memory = Record::new(8, 300, "from_memory.wem", data.len()).unwrap();
        let a = Exporter::SourceFile
            .export(&source, &stream, dir.path(), &from_file)
            .unwrap();
        let b = Exporter::InMemory
            .export(&source, &stream, dir.path(), &from_memory)
            .unwrap();

        assert_eq!(fs::read(a).unwrap(), fs::read(b).unwrap());
    }
}
