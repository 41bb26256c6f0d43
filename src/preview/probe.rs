/// Natural dimension probing for preview images
///
/// Decoding headers can take a while for large files, so it runs on the
/// blocking pool. Any failure yields `None`; callers fall back to contain-fit.
use std::io::Cursor;
use std::path::PathBuf;

use tokio::task;
use tracing::debug;

/// Where the image bytes for a render pass come from
#[derive(Debug, Clone, PartialEq)]
pub enum ProbeSource {
    Bytes(Vec<u8>),
    File(PathBuf),
    /// Nothing rendered
    Empty,
}

/// Read the natural `(width, height)` of an image
pub async fn probe_dimensions(source: ProbeSource) -> Option<(u32, u32)> {
    task::spawn_blocking(move || probe_blocking(&source))
        .await
        .ok()
        .flatten()
}

fn probe_blocking(source: &ProbeSource) -> Option<(u32, u32)> {
    let dimensions = match source {
        ProbeSource::Bytes(bytes) => image::ImageReader::new(Cursor::new(bytes))
            .with_guessed_format()
            .ok()?
            .into_dimensions()
            .ok(),
        ProbeSource::File(path) => image::image_dimensions(path).ok(),
        ProbeSource::Empty => None,
    };

    if dimensions.is_none() {
        debug!("could not decode preview dimensions");
    }
    dimensions
}
