use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result, bail};

/// Fails unless `input` is an existing regular file.
pub fn check_input(input: &Path) -> Result<()> {
    match fs::metadata(input) {
        Ok(meta) if meta.is_file() => Ok(()),
        Ok(_) => bail!("Not a file: {}", input.display()),
        Err(_) => bail!("File not found: {}", input.display()),
    }
}

/// `dir/bank.pkz` maps to `dir/bank`, next to the input. An input without
/// extension gets an `_extracted` suffix instead so the two never collide.
pub fn default_output_directory(input: &Path) -> PathBuf {
    let mut stem = input
        .file_stem()
        .map(|s| s.to_os_string())
        .unwrap_or_else(|| "output".into());
    if input.extension().is_none() {
        stem.push("_extracted");
    }

    match input.parent() {
        Some(parent) => parent.join(stem),
        None => PathBuf::from(stem),
    }
}

/// Creates `dir` and its parents when missing.
pub fn ensure_output_directory(dir: &Path) -> Result<()> {
    if !dir.is_dir() {
        fs::create_dir_all(dir)
            .with_context(|| format!("Cannot create output directory {}", dir.display()))?;
        log::info!("Created output directory {}", dir.display());
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn output_directory_is_sibling_stem() {
        assert_eq!(
            default_output_directory(Path::new("data/sfx_bank.pkz")),
            PathBuf::from("data/sfx_bank")
        );
        assert_eq!(
            default_output_directory(Path::new("bank.pkz.dec")),
            PathBuf::from("bank.pkz")
        );
        assert_eq!(
            default_output_directory(Path::new("bank")),
            PathBuf::from("bank_extracted")
        );
    }

    #[test]
    fn missing_input_is_reported() {
        let dir = TempDir::new().unwrap();
        let err = check_input(&dir.path().join("absent.pkz")).unwrap_err();
        assert!(err.to_string().starts_with("File not found"));
        assert!(check_input(dir.path()).is_err());

        let file = dir.path().join("present.pkz");
        fs::write(&file, b"x").unwrap();
        assert!(check_input(&file).is_ok());
    }

    #[test]
    fn ensure_creates_nested() {
        let dir = TempDir::new().unwrap();
        let nested = dir.path().join("a").join("b");
        ensure_output_directory(&nested).unwrap();
        assert!(nested.is_dir());
        ensure_output_directory(&nested).unwrap();
    }
}
