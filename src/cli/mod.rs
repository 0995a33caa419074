pub mod command;
pub mod extract;
pub mod info;
pub mod output;
pub mod progress;

use log::Level;
use rifx::process::extract::ExtractOptions;

use command::{Cli, ScanArgs};

/// Scan options shared by `extract` and `info`.
pub fn extract_options(scan: &ScanArgs, cli: &Cli) -> ExtractOptions {
    // Configure fail level based on strict mode
    let fail_level = if cli.strict {
        Level::Warn
    } else {
        Level::Error
    };

    ExtractOptions {
        skip_policy: scan.on_missing_end.into(),
        name_lookback: scan.name_lookback,
        fail_level,
        ..Default::default()
    }
}
