use std::fs;
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};

use serde::Serialize;

/// Turns file `input` into file `output`, or fails.
pub trait Transcoder {
    fn transcode(&self, input: &Path, output: &Path) -> Result<(), TranscodeError>;
}

#[derive(thiserror::Error, Debug)]
pub enum TranscodeError {
    #[error("Cannot start {program}: {source}")]
    Spawn {
        program: PathBuf,
        source: std::io::Error,
    },

    #[error("{program} exited with {status}: {stderr}")]
    Failed {
        program: PathBuf,
        status: String,
        stderr: String,
    },
}

/// External command line decoder, invoked as `<program> -o <output> <input>`.
///
/// The default program is `vgmstream-cli`.
#[derive(Debug, Clone)]
pub struct ExternalDecoder {
    program: PathBuf,
}

impl ExternalDecoder {
    pub fn new(program: impl Into<PathBuf>) -> Self {
        Self {
            program: program.into(),
        }
    }
}

impl Transcoder for ExternalDecoder {
    fn transcode(&self, input: &Path, output: &Path) -> Result<(), TranscodeError> {
        log::debug!(
            "Running {} -o {} {}",
            self.program.display(),
            output.display(),
            input.display()
        );

        let result = Command::new(&self.program)
            .arg("-o")
            .arg(output)
            .arg(input)
            .stdin(Stdio::null())
            .output()
            .map_err(|source| TranscodeError::Spawn {
                program: self.program.clone(),
                source,
            })?;

        if result.status.success() {
            Ok(())
        } else {
            Err(TranscodeError::Failed {
                program: self.program.clone(),
                status: result.status.to_string(),
                stderr: String::from_utf8_lossy(&result.stderr).trim().to_string(),
            })
        }
    }
}

/// Result of converting one extracted file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Conversion {
    pub input: PathBuf,
    pub output: PathBuf,
    pub converted: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// Output path for `input` with its extension replaced by `.wav`.
pub fn wav_path_for(input: &Path) -> PathBuf {
    input.with_extension("wav")
}

/// Converts every file in `inputs` to a sibling `.wav`.
///
/// A converted input is deleted unless `keep_raw` is set. Failures are
/// logged, leave the input in place, and do not stop the remaining files.
pub fn convert_all<'a, I>(
    transcoder: &dyn Transcoder,
    inputs: I,
    keep_raw: bool,
    mut on_done: impl FnMut(&Conversion),
) -> Vec<Conversion>
where
    I: IntoIterator<Item = &'a Path>,
{
    let mut conversions = Vec::new();

    for input in inputs {
        let output = wav_path_for(input);
        let file_name = |p: &Path| p.file_name().unwrap_or_default().to_string_lossy().into_owned();

        let conversion = match transcoder.transcode(input, &output) {
            Ok(()) => {
                log::info!("Converted {} to {}", file_name(input), file_name(&output));
                if !keep_raw {
                    if let Err(e) = fs::remove_file(input) {
                        log::warn!("Cannot remove {}: {e}", input.display());
                    }
                }
                Conversion {
                    input: input.to_path_buf(),
                    output,
                    converted: true,
                    error: None,
                }
            }
            Err(e) => {
                log::error!("Error converting {} to .wav: {e}", file_name(input));
                Conversion {
                    input: input.to_path_buf(),
                    output,
                    converted: false,
                    error: Some(e.to_string()),
                }
            }
        };

        on_done(&conversion);
        conversions.push(conversion);
    }

    conversions
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    /// Copies input to output, failing for names that contain "bad".
    struct FakeDecoder;

    impl Transcoder for FakeDecoder {
        fn transcode(&self, input: &Path, output: &Path) -> Result<(), TranscodeError> {
            if input.to_string_lossy().contains("bad") {
                return Err(TranscodeError::Failed {
                    program: PathBuf::from("fake"),
                    status: "exit status: 1".to_string(),
                    stderr: "unsupported codec".to_string(),
                });
            }
            fs::copy(input, output).map_err(|source| TranscodeError::Spawn {
                program: PathBuf::from("fake"),
                source,
            })?;
            Ok(())
        }
    }

    #[test]
    fn successes_replace_raw_and_failures_keep_it() {
        let dir = TempDir::new().unwrap();
        let good = dir.path().join("vo_good.wem");
        let bad = dir.path().join("vo_bad.wem");
        fs::write(&good, b"good").unwrap();
        fs::write(&bad, b"bad").unwrap();

        let mut seen = 0;
        let results = convert_all(
            &FakeDecoder,
            [good.as_path(), bad.as_path()],
            false,
            |_| seen += 1,
        );

        assert_eq!(seen, 2);
        assert!(results[0].converted);
        assert!(!good.exists());
        assert_eq!(fs::read(dir.path().join("vo_good.wav")).unwrap(), b"good");

        assert!(!results[1].converted);
        assert!(bad.exists());
        assert!(!dir.path().join("vo_bad.wav").exists());
        assert!(results[1].error.as_deref().unwrap().contains("unsupported codec"));
    }

    #[test]
    fn keep_raw_leaves_inputs() {
        let dir = TempDir::new().unwrap();
        let raw = dir.path().join("amb_rain.wem");
        fs::write(&raw, b"rain").unwrap();

        let results = convert_all(&FakeDecoder, [raw.as_path()], true, |_| {});

        assert!(results[0].converted);
        assert!(raw.exists());
        assert!(dir.path().join("amb_rain.wav").exists());
    }

    #[test]
    fn missing_program_is_a_spawn_error() {
        let dir = TempDir::new().unwrap();
        let raw = dir.path().join("amb_rain.wem");
        fs::write(&raw, b"rain").unwrap();

        let decoder = ExternalDecoder::new(dir.path().join("no-such-decoder"));
        let err = decoder.transcode(&raw, &wav_path_for(&raw)).unwrap_err();

        assert!(matches!(err, TranscodeError::Spawn { .. }));
        assert!(raw.exists());
    }

    #[test]
    fn wav_path_replaces_extension() {
        assert_eq!(
            wav_path_for(Path::new("out/vo_intro.wem")),
            PathBuf::from("out/vo_intro.wav")
        );
        assert_eq!(
            wav_path_for(Path::new("out/Untitled.wem")),
            PathBuf::from("out/Untitled.wav")
        );
    }
}
