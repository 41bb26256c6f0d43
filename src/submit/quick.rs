/// Quick image swap: replace only the embedded image of a pose file
///
/// Either side can be a local file or a URL the server fetches itself.
use super::controller::{check_sizes, SubmissionController};
use super::form::{OutboundRequest, Route};
use crate::error::{EditorError, Result};
use crate::state::data::{SelectedFile, StagedImage};

pub const NO_IMAGE_PROVIDED: &str = "Error: No image provided (URL or file)";
pub const NO_POSE_PROVIDED: &str = "Error: No pose file provided (URL or file)";

#[derive(Debug, Clone, PartialEq)]
pub enum PoseSource {
    File(SelectedFile),
    Url(String),
}

#[derive(Debug, Clone, PartialEq)]
pub enum ImageSource {
    File(StagedImage),
    Url(String),
}

/// Inputs of the quick swap form. A file wins over a URL.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct QuickSwap {
    pub pose_file: Option<SelectedFile>,
    pub pose_url: String,
    pub image_file: Option<StagedImage>,
    pub image_url: String,
}

impl QuickSwap {
    pub fn pose(&self) -> Option<PoseSource> {
        match (&self.pose_file, self.pose_url.trim()) {
            (Some(file), _) => Some(PoseSource::File(file.clone())),
            (None, "") => None,
            (None, url) => Some(PoseSource::Url(url.to_string())),
        }
    }

    pub fn image(&self) -> Option<ImageSource> {
        match (&self.image_file, self.image_url.trim()) {
            (Some(file), _) => Some(ImageSource::File(file.clone())),
            (None, "") => None,
            (None, url) => Some(ImageSource::Url(url.to_string())),
        }
    }
}

impl SubmissionController {
    /// Validate the quick swap form and build its request
    pub fn prepare_quick(&mut self, swap: &QuickSwap) -> Result<OutboundRequest> {
        self.ensure_idle()?;

        let image = swap
            .image()
            .ok_or_else(|| EditorError::Validation(NO_IMAGE_PROVIDED.to_string()))?;
        let pose = swap
            .pose()
            .ok_or_else(|| EditorError::Validation(NO_POSE_PROVIDED.to_string()))?;

        let pose_size = match &pose {
            PoseSource::File(file) => std::fs::metadata(&file.path)?.len(),
            PoseSource::Url(_) => 0,
        };
        let image_size = match &image {
            ImageSource::File(file) => Some(file.size),
            ImageSource::Url(_) => None,
        };
        check_sizes(pose_size, image_size)?;

        let mut request = OutboundRequest::new(Route::Quick);
        request = match image {
            ImageSource::File(file) => {
                let bytes = std::fs::read(&file.path).map_err(|_| EditorError::ImageProcessing)?;
                request.file("image_file", file.name, bytes)
            }
            ImageSource::Url(url) => request.text("image_url", url),
        };
        request = match pose {
            PoseSource::File(file) => {
                let bytes = std::fs::read(&file.path)?;
                request.file("pose_file", file.name, bytes)
            }
            PoseSource::Url(url) => request.text("pose_url", url),
        };

        self.begin();
        Ok(request)
    }
}
