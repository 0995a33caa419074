use std::fs;

use anyhow::Result;
use indicatif::MultiProgress;
use rifx::process::extract::{ExtractionReport, run};

use super::command::{Cli, ExtractArgs};
use super::extract_options;
use super::output::{check_input, default_output_directory, ensure_output_directory};
use super::progress::{ProgressObserver, create_spinner};
use crate::report::RunReport;
use crate::transcode::{Conversion, ExternalDecoder, Transcoder, convert_all};

pub fn cmd_extract(args: &ExtractArgs, cli: &Cli, multi: Option<&MultiProgress>) -> Result<()> {
    check_input(&args.input)?;

    let output_directory = match &args.output_path {
        Some(path) => {
            log::info!("Output path specified: {}", path.display());
            path.clone()
        }
        None => default_output_directory(&args.input),
    };

    let options = extract_options(&args.scan, cli);
    log::info!(
        "Extracting records: {} (strict mode: {}, on missing end: {:?})",
        args.input.display(),
        cli.strict,
        options.skip_policy
    );

    ensure_output_directory(&output_directory)?;

    let total_bytes = fs::metadata(&args.input)?.len();
    let mut observer = multi
        .map(|multi| ProgressObserver::new(multi, total_bytes))
        .transpose()?;

    let result = match observer.as_mut() {
        Some(observer) => run(&args.input, &output_directory, &options, observer),
        None => run(&args.input, &output_directory, &options, &mut ()),
    };
    if let Some(observer) = &observer {
        observer.finish();
    }
    let report = result?;

    let conversions = if report.extracted.is_empty() || args.no_convert {
        Vec::new()
    } else {
        let decoder = ExternalDecoder::new(&args.decoder);
        convert_records(&decoder, &report, args.keep_raw, multi)?
    };

    print_summary(&report, &conversions, args.no_convert);

    if let Some(path) = &args.report {
        RunReport::new(&report, options.skip_policy, &conversions).write(path)?;
    }

    Ok(())
}

fn convert_records(
    transcoder: &dyn Transcoder,
    report: &ExtractionReport,
    keep_raw: bool,
    multi: Option<&MultiProgress>,
) -> Result<Vec<Conversion>> {
    let paths = report.unique_paths();

    let pb = multi
        .map(|multi| create_spinner(multi, "converting"))
        .transpose()?;
    if let Some(pb) = &pb {
        pb.set_length(paths.len() as u64);
    }

    let conversions = convert_all(transcoder, paths, keep_raw, |_| {
        if let Some(pb) = &pb {
            pb.inc(1);
        }
    });

    if let Some(pb) = &pb {
        pb.finish_and_clear();
    }

    Ok(conversions)
}

fn print_summary(report: &ExtractionReport, conversions: &[Conversion], no_convert: bool) {
    let extracted = report.extracted_count();
    if extracted == 0 {
        println!("No files were extracted.");
        return;
    }

    let failed = conversions.iter().filter(|c| !c.converted).count();
    if no_convert {
        println!("{extracted} files were extracted.");
    } else if failed == 0 {
        println!("{extracted} files were extracted and converted.");
    } else {
        println!(
            "{extracted} files were extracted, {failed} of {} failed to convert.",
            conversions.len()
        );
    }

    if !report.skipped.is_empty() {
        println!(
            "{} markers had no end boundary and were skipped.",
            report.skipped.len()
        );
    }
    println!("Output directory: {}", report.output_directory.display());
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::command::Commands;
    use clap::Parser as ClapParser;
    use rifx::process::{MAGIC, MIN_PAYLOAD_LEN};
    use std::path::Path;
    use tempfile::TempDir;

    fn archive(dir: &Path) -> (std::path::PathBuf, Vec<u8>) {
        let mut blob = b"\x00\x00hdr\x00bgm_title\x00".to_vec();
        blob.extend_from_slice(&MAGIC);
        blob.resize(blob.len() + MIN_PAYLOAD_LEN + 3, 0x11);
        // Pad onto the marker's 4-byte grid.
        while (blob.len() - 16) % 4 != 0 {
            blob.push(0x11);
        }
        blob.extend_from_slice(&[0; 8]);

        let path = dir.join("music.pkz");
        fs::write(&path, &blob).unwrap();
        (path, blob)
    }

    fn extract(argv: &[&str]) -> Result<()> {
        let cli = Cli::try_parse_from(argv).unwrap();
        let Commands::Extract(args) = &cli.command else {
            panic!("expected extract");
        };
        cmd_extract(args, &cli, None)
    }

    #[test]
    fn extracts_next_to_input_and_writes_report() {
        let dir = TempDir::new().unwrap();
        let (input, blob) = archive(dir.path());
        let report = dir.path().join("run.yaml");

        extract(&[
            "rifxd",
            "extract",
            input.to_str().unwrap(),
            "--no-convert",
            "--report",
            report.to_str().unwrap(),
        ])
        .unwrap();

        let out = dir.path().join("music").join("bgm_title.wem");
        let written = fs::read(&out).unwrap();
        assert_eq!(&written[..4], &MAGIC);
        assert_eq!(written, &blob[16..blob.len() - 8]);

        let yaml = fs::read_to_string(report).unwrap();
        assert!(yaml.contains("name: bgm_title.wem"));
        assert!(yaml.contains("start_offset: 16"));
    }

    #[test]
    fn missing_input_creates_nothing() {
        let dir = TempDir::new().unwrap();
        let input = dir.path().join("absent.pkz");

        let err = extract(&["rifxd", "extract", input.to_str().unwrap()]).unwrap_err();

        assert!(err.to_string().contains("File not found"));
        assert!(!dir.path().join("absent").exists());
    }

    #[test]
    fn failed_conversion_keeps_raw_file() {
        let dir = TempDir::new().unwrap();
        let (input, _) = archive(dir.path());
        let out_dir = dir.path().join("custom");
        let decoder = dir.path().join("missing-decoder");

        extract(&[
            "rifxd",
            "extract",
            input.to_str().unwrap(),
            "--output-path",
            out_dir.to_str().unwrap(),
            "--decoder",
            decoder.to_str().unwrap(),
        ])
        .unwrap();

        assert!(out_dir.join("bgm_title.wem").exists());
        assert!(!out_dir.join("bgm_title.wav").exists());
    }
}
