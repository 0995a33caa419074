use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use rifx::process::extract::{ExtractionReport, SkipPolicy};
use serde::Serialize;

use crate::transcode::Conversion;

pub const REPORT_VERSION: &str = "1";

/// YAML document written by `extract --report`.
#[derive(Debug, Serialize)]
pub struct RunReport<'a> {
    pub version: &'static str,
    pub creation_tool: &'static str,
    pub creation_tool_version: &'static str,
    pub skip_policy: SkipPolicy,
    #[serde(flatten)]
    pub extraction: &'a ExtractionReport,
    #[serde(skip_serializing_if = "no_conversions")]
    pub conversions: &'a [Conversion],
}

fn no_conversions(conversions: &&[Conversion]) -> bool {
    conversions.is_empty()
}

impl<'a> RunReport<'a> {
    pub fn new(
        extraction: &'a ExtractionReport,
        skip_policy: SkipPolicy,
        conversions: &'a [Conversion],
    ) -> Self {
        Self {
            version: REPORT_VERSION,
            creation_tool: env!("CARGO_PKG_NAME"),
            creation_tool_version: env!("CARGO_PKG_VERSION"),
            skip_policy,
            extraction,
            conversions,
        }
    }

    pub fn to_yaml(&self) -> Result<String> {
        Ok(serde_yaml_ng::to_string(self)?)
    }

    pub fn write(&self, path: &Path) -> Result<()> {
        fs::write(path, self.to_yaml()?)
            .with_context(|| format!("Cannot write report {}", path.display()))?;
        log::info!("Report written to {}", path.display());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rifx::process::extract::{ExportedRecord, SkippedMarker};
    use rifx::structs::record::Record;
    use std::path::PathBuf;

    #[test]
    fn yaml_layout() {
        let extraction = ExtractionReport {
            source: PathBuf::from("bank.dec"),
            output_directory: PathBuf::from("bank"),
            bytes_scanned: 4096,
            extracted: vec![ExportedRecord {
                record: Record::new(16, 272, "vo_intro.wem", 4096).unwrap(),
                path: PathBuf::from("bank/vo_intro.wem"),
            }],
            skipped: vec![SkippedMarker {
                marker_offset: 300,
                name: "Untitled.wem".to_string(),
            }],
        };

        let yaml = RunReport::new(&extraction, SkipPolicy::Resume, &[])
            .to_yaml()
            .unwrap();

        assert!(yaml.contains("creation_tool: rifxd"));
        assert!(yaml.contains("creation_tool_version:"));
        assert!(yaml.contains("skip_policy: resume"));
        assert!(yaml.contains("bytes_scanned: 4096"));
        assert!(yaml.contains("start_offset: 16"));
        assert!(yaml.contains("end_offset: 272"));
        assert!(yaml.contains("path: bank/vo_intro.wem"));
        assert!(yaml.contains("marker_offset: 300"));
        assert!(!yaml.contains("conversions"));

        // One key style for the whole document, flattened fields included.
        for line in yaml.lines() {
            let key = line.trim_start().trim_start_matches("- ");
            if let Some((key, _)) = key.split_once(':') {
                assert!(
                    !key.chars().any(|c| c.is_ascii_uppercase()),
                    "key {key:?} is not snake_case"
                );
            }
        }
    }

    #[test]
    fn conversions_are_listed() {
        let extraction = ExtractionReport::default();
        let conversions = [Conversion {
            input: PathBuf::from("bank/a_b.wem"),
            output: PathBuf::from("bank/a_b.wav"),
            converted: false,
            error: Some("exit status: 1".to_string()),
        }];

        let yaml = RunReport::new(&extraction, SkipPolicy::Stop, &conversions)
            .to_yaml()
            .unwrap();

        assert!(yaml.contains("skip_policy: stop"));
        assert!(yaml.contains("conversions:"));
        assert!(yaml.contains("converted: false"));
    }
}
