/// Preview handle capability
///
/// The lifecycle manager never creates display handles itself. It asks a
/// host, and every handle obtained through `acquire` must go back through
/// `release` exactly once.
use iced::widget::image::Handle;
use tracing::debug;

use crate::error::Result;
use crate::state::data::StagedImage;

pub trait PreviewHost {
    type Handle: Clone;

    /// Handle for image bytes already in memory (embedded base64).
    /// Not transient; nothing to release.
    fn inline(&mut self, bytes: Vec<u8>) -> Self::Handle;

    /// Create a transient handle for a file on disk
    fn acquire(&mut self, image: &StagedImage) -> Result<Self::Handle>;

    /// Release a handle previously returned by `acquire`
    fn release(&mut self, handle: &Self::Handle);
}

/// Host backed by iced image handles
///
/// Acquired handles are kept in a registry until released, so `live()`
/// reports how many transient previews are outstanding.
#[derive(Debug, Default)]
pub struct IcedPreviewHost {
    live: Vec<Handle>,
}

impl IcedPreviewHost {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn live(&self) -> usize {
        self.live.len()
    }
}

impl PreviewHost for IcedPreviewHost {
    type Handle = Handle;

    fn inline(&mut self, bytes: Vec<u8>) -> Handle {
        Handle::from_bytes(bytes)
    }

    fn acquire(&mut self, image: &StagedImage) -> Result<Handle> {
        let bytes = std::fs::read(&image.path)?;
        let handle = Handle::from_bytes(bytes);
        self.live.push(handle.clone());
        debug!(file = %image.name, live = self.live.len(), "acquired preview handle");
        Ok(handle)
    }

    fn release(&mut self, handle: &Handle) {
        let before = self.live.len();
        self.live.retain(|live| live.id() != handle.id());
        if self.live.len() < before {
            debug!(live = self.live.len(), "released preview handle");
        }
    }
}
