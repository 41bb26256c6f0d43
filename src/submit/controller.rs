/// Submission of the edited document
///
/// `prepare` runs every local check and reads the files, so nothing reaches
/// the network unless the request is complete. `perform` posts it and turns
/// the response into a saved download. `finish` always re-enables
/// submission, whatever the outcome.
use std::path::{Path, PathBuf};

use tracing::{error, info, warn};

use super::disposition::filename_from_disposition;
use super::download::{save_download, Download};
use super::form::{OutboundRequest, Resize, Route};
use super::transport::{Transport, TransportResponse};
use crate::error::{EditorError, Result};
use crate::preview::host::PreviewHost;
use crate::state::data::{MAX_POSE_BYTES, MAX_TOTAL_BYTES};
use crate::state::session::{EditorSession, POSE_TOO_LARGE};

pub const NO_POSE_SELECTED: &str = "Please upload a .pose file first";
pub const COMBINED_TOO_LARGE: &str = "Error: Combined upload (pose + image) exceeds 10 MB";
pub const ALREADY_SUBMITTING: &str = "A submission is already in progress";
pub const GENERIC_SERVER_ERROR: &str = "Server error";

/// A request that passed every local check
#[derive(Debug, Clone, PartialEq)]
pub struct PreparedSubmission {
    pub request: OutboundRequest,
    /// Advisory limit message; never blocks the request
    pub warning: Option<&'static str>,
}

#[derive(Debug, Default)]
pub struct SubmissionController {
    busy: bool,
}

impl SubmissionController {
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether a request is in flight (submit control disabled)
    pub fn is_busy(&self) -> bool {
        self.busy
    }

    /// Validate the session and build the advanced request.
    /// On success the controller is busy until `finish` is called.
    pub fn prepare<H: PreviewHost>(
        &mut self,
        session: &EditorSession<H>,
        resize: Resize,
    ) -> Result<PreparedSubmission> {
        self.ensure_idle()?;

        let source = session
            .source()
            .ok_or_else(|| EditorError::Validation(NO_POSE_SELECTED.to_string()))?;
        let pose_size = std::fs::metadata(&source.path)?.len();
        let staged = session.staged_image();
        check_sizes(pose_size, staged.map(|s| s.size))?;

        let warning = session.advisory_warning();
        if let Some(message) = warning {
            warn!("{}", message);
        }

        let changes = session
            .build_payload()
            .to_json()
            .map_err(|e| EditorError::Validation(format!("Cannot encode changes: {}", e)))?;

        let pose_bytes = std::fs::read(&source.path)?;
        let mut request = OutboundRequest::new(Route::Advanced)
            .file("pose_file", source.name.clone(), pose_bytes)
            .text("changes", changes)
            .text("resize", resize.as_str());

        if let Some(staged) = staged {
            let bytes = std::fs::read(&staged.path).map_err(|e| {
                error!(file = %staged.name, "cannot read staged image: {}", e);
                EditorError::ImageProcessing
            })?;
            request = request.file("image_file", staged.name.clone(), bytes);
        }

        self.begin();
        Ok(PreparedSubmission { request, warning })
    }

    /// Re-enable submission and pass the outcome through
    pub fn finish<T>(&mut self, result: Result<T>) -> Result<T> {
        self.busy = false;
        match &result {
            Ok(_) => info!("✅ Submission complete"),
            Err(e) => warn!("submission failed: {}", e),
        }
        result
    }

    pub(crate) fn ensure_idle(&self) -> Result<()> {
        if self.busy {
            return Err(EditorError::Validation(ALREADY_SUBMITTING.to_string()));
        }
        Ok(())
    }

    pub(crate) fn begin(&mut self) {
        self.busy = true;
        info!("⏳ Submitting to processing endpoint");
    }
}

/// Hard ceilings for a single pose file and for the whole upload
pub(crate) fn check_sizes(pose_size: u64, image_size: Option<u64>) -> Result<()> {
    if pose_size > MAX_POSE_BYTES {
        return Err(EditorError::Validation(POSE_TOO_LARGE.to_string()));
    }
    if pose_size + image_size.unwrap_or(0) > MAX_TOTAL_BYTES {
        return Err(EditorError::Validation(COMBINED_TOO_LARGE.to_string()));
    }
    Ok(())
}

/// Turn an endpoint response into a download or a server error
pub fn interpret(response: TransportResponse) -> Result<Download> {
    if !response.is_success() {
        let text = String::from_utf8_lossy(&response.body).to_string();
        let message = if text.is_empty() {
            GENERIC_SERVER_ERROR.to_string()
        } else {
            text
        };
        return Err(EditorError::Server(message));
    }

    Ok(Download {
        filename: filename_from_disposition(response.content_disposition.as_deref()),
        bytes: response.body,
    })
}

/// Post a prepared request and save the regenerated file into `download_dir`
pub async fn perform<T: Transport>(
    transport: &T,
    request: OutboundRequest,
    download_dir: &Path,
) -> Result<PathBuf> {
    let response = transport.send(request).await?;
    let download = interpret(response)?;
    save_download(download_dir, &download).await
}
