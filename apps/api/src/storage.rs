//! Ephemeral filesystem storage: staged uploads and produced downloads.
//!
//! Two separate directories so a produced file can never overwrite an
//! upload. No retention policy: files stay until the operator clears them.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use tokio::fs;

use crate::config::Config;

/// Creates the upload and output directories at startup.
pub async fn ensure_dirs(config: &Config) -> Result<()> {
    fs::create_dir_all(&config.upload_dir)
        .await
        .with_context(|| format!("creating upload dir {}", config.upload_dir.display()))?;
    fs::create_dir_all(&config.output_dir)
        .await
        .with_context(|| format!("creating output dir {}", config.output_dir.display()))?;
    Ok(())
}

/// Reduces a client-supplied filename to its final path component so an
/// upload can never escape the staging directory.
pub fn sanitize_filename(filename: &str) -> String {
    Path::new(filename)
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default()
}

/// Stages uploaded bytes under the upload directory; returns the stored path.
pub async fn stage_upload(dir: &Path, filename: &str, bytes: &[u8]) -> Result<PathBuf> {
    let path = dir.join(sanitize_filename(filename));
    fs::write(&path, bytes)
        .await
        .with_context(|| format!("staging upload {}", path.display()))?;
    Ok(path)
}

/// Writes a produced document under the output directory; returns the path.
pub async fn write_output(dir: &Path, filename: &str, bytes: &[u8]) -> Result<PathBuf> {
    let path = dir.join(sanitize_filename(filename));
    fs::write(&path, bytes)
        .await
        .with_context(|| format!("writing output {}", path.display()))?;
    Ok(path)
}
