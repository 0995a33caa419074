use anyhow::Result;
use indicatif::{MultiProgress, ProgressBar, ProgressStyle};
use rifx::process::extract::{ExtractObserver, Outcome};

/// Byte-based progress bar fed by the extraction run.
pub struct ProgressObserver {
    pb: ProgressBar,
    extracted: usize,
    skipped: usize,
}

impl ProgressObserver {
    pub fn new(multi: &MultiProgress, total_bytes: u64) -> Result<Self> {
        let pb = multi.add(ProgressBar::new(total_bytes));
        pb.set_style(ProgressStyle::with_template(
            "{bar:40.cyan/blue} {bytes}/{total_bytes} ({percent}%)\n{msg} | elapsed: {elapsed_precise} | ETA: {eta_precise}",
        )?);
        pb.enable_steady_tick(std::time::Duration::from_millis(100));
        pb.set_message("scanning");

        Ok(Self {
            pb,
            extracted: 0,
            skipped: 0,
        })
    }

    pub fn finish(&self) {
        self.pb.finish_and_clear();
    }
}

impl ExtractObserver for ProgressObserver {
    fn on_progress(&mut self, position: usize, _len: usize) {
        self.pb.set_position(position as u64);
    }

    fn on_outcome(&mut self, outcome: &Outcome) {
        match outcome {
            Outcome::Extracted(_) => self.extracted += 1,
            Outcome::Skipped { .. } => self.skipped += 1,
        }
        self.pb.set_message(format!(
            "{} extracted, {} skipped",
            self.extracted, self.skipped
        ));
    }
}

/// Spinner for steps without a known length.
pub fn create_spinner(multi: &MultiProgress, message: &'static str) -> Result<ProgressBar> {
    let pb = multi.add(ProgressBar::new_spinner());
    pb.set_style(ProgressStyle::with_template(
        "{spinner:.green} {pos}/{len} {msg} | elapsed: {elapsed_precise}",
    )?);
    pb.enable_steady_tick(std::time::Duration::from_millis(100));
    pb.set_message(message);
    Ok(pb)
}
