/// Delivering a regenerated pose file to disk
use std::path::{Path, PathBuf};

use tracing::info;

use super::disposition::FALLBACK_FILENAME;
use crate::error::Result;

/// A successful response body and the name it should be saved under
#[derive(Debug, Clone, PartialEq)]
pub struct Download {
    pub filename: String,
    pub bytes: Vec<u8>,
}

/// Keep only the final path component so a header cannot escape the target dir
pub fn safe_filename(name: &str) -> String {
    Path::new(name)
        .file_name()
        .map(|n| n.to_string_lossy().to_string())
        .filter(|n| !n.trim().is_empty())
        .unwrap_or_else(|| FALLBACK_FILENAME.to_string())
}

/// Write the download into `dir`, creating it if needed
pub async fn save_download(dir: &Path, download: &Download) -> Result<PathBuf> {
    tokio::fs::create_dir_all(dir).await?;
    let path = dir.join(safe_filename(&download.filename));
    tokio::fs::write(&path, &download.bytes).await?;

    info!("💾 Saved {} ({} bytes)", path.display(), download.bytes.len());
    Ok(path)
}
