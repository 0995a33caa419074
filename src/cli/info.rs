use anyhow::Result;
use indicatif::{MultiProgress, ProgressBar, ProgressStyle};

use super::command::{Cli, InfoArgs};
use super::extract_options;
use super::output::check_input;
use rifx::process::extract::{Extractor, Outcome};
use rifx::utils::errors::ExtractError;
use rifx::utils::stream::ByteStream;

pub fn cmd_info(args: &InfoArgs, cli: &Cli, multi: Option<&MultiProgress>) -> Result<()> {
    log::info!("Analyzing archive: {}", args.input.display());
    check_input(&args.input)?;

    let stream = ByteStream::open(&args.input)?;
    let total_bytes = stream.len();
    let options = extract_options(&args.scan, cli);

    let mut context = ListingContext::default();

    if let Some(multi) = multi {
        let pb = multi.add(ProgressBar::new(total_bytes as u64));
        pb.set_style(ProgressStyle::with_template(
            "{spinner:.green} {bytes}/{total_bytes} {msg}",
        )?);
        pb.enable_steady_tick(std::time::Duration::from_millis(100));
        pb.set_message("Scanning for records...");
        context.pb = Some(pb);
    }

    let mut extractor = Extractor::new(stream, options);
    for outcome in extractor.by_ref() {
        if let Outcome::Skipped { marker_offset, .. } = &outcome {
            if cli.strict {
                return Err(ExtractError::BoundaryNotFound(*marker_offset).into());
            }
            log::warn!("No end boundary found for marker at {marker_offset:#X}");
        }
        context.process_outcome(&outcome);
    }

    context.finish(extractor.markers_found(), total_bytes);
    Ok(())
}

#[derive(Default)]
struct ListingContext {
    pb: Option<ProgressBar>,
    header_displayed: bool,
    records: usize,
    skipped: usize,
    payload_bytes: usize,
}

impl ListingContext {
    fn process_outcome(&mut self, outcome: &Outcome) {
        let mut lines = Vec::new();
        if !self.header_displayed {
            lines.push(String::new());
            lines.push("RIFX Records".to_string());
            lines.push("============".to_string());
            lines.push(String::new());
            lines.push(format!(
                "{:<12}{:<12}{:>10}  {}",
                "Start", "End", "Size", "Name"
            ));
            self.header_displayed = true;
        }

        lines.push(match outcome {
            Outcome::Extracted(record) => {
                self.records += 1;
                self.payload_bytes += record.len();
                format!(
                    "{:<12}{:<12}{:>10}  {}",
                    format!("{:#X}", record.start_offset),
                    format!("{:#X}", record.end_offset),
                    record.len(),
                    record.name
                )
            }
            Outcome::Skipped {
                marker_offset,
                name,
            } => {
                self.skipped += 1;
                format!(
                    "{:<12}{:<12}{:>10}  {name} (no end boundary)",
                    format!("{marker_offset:#X}"),
                    "-",
                    "-"
                )
            }
        });

        self.print(&lines);

        if let (Some(pb), Outcome::Extracted(record)) = (&self.pb, outcome) {
            pb.set_position(record.end_offset as u64);
        }
    }

    fn print(&self, lines: &[String]) {
        let emit = || {
            for line in lines {
                println!("{line}");
            }
        };

        // Temporarily pause progress bar for clean output
        match &self.pb {
            Some(pb) => pb.suspend(emit),
            None => emit(),
        }
    }

    fn finish(self, markers: usize, total_bytes: usize) {
        if let Some(ref pb) = self.pb {
            pb.finish_and_clear();
        }

        if markers == 0 {
            println!("No RIFX markers found in the file.");
            println!("This doesn't appear to contain embedded audio records.");
            return;
        }

        let size_mb = total_bytes as f64 / 1_000_000.0;
        let coverage = self.payload_bytes as f64 * 100.0 / total_bytes.max(1) as f64;

        println!();
        println!("Scan Summary");
        println!("  Markers found             {markers}");
        println!("  Records                   {}", self.records);
        println!("  Skipped markers           {}", self.skipped);
        println!("  Size                      {size_mb:.2} MB ({total_bytes} bytes)");
        println!(
            "  Record payload            {} bytes ({coverage:.1}%)",
            self.payload_bytes
        );
    }
}
