/// Image preview lifecycle
///
/// Owns the preview host and the single transient handle created for a
/// staged replacement file. Every transition out of the replacement state
/// releases that handle, as do `dispose` and drop.
use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use tracing::{debug, warn};

use super::host::PreviewHost;
use super::probe::ProbeSource;
use crate::error::Result;
use crate::state::data::StagedImage;

/// Horizontal padding between the preview and its container
const CONTAINER_PADDING: f32 = 60.0;

/// Aspect ratios inside this band are treated as square
const SQUARE_MIN: f32 = 0.95;
const SQUARE_MAX: f32 = 1.05;

/// Where the displayed image comes from
#[derive(Debug, Clone, PartialEq)]
pub enum ImageState {
    /// No image was ever present
    None,
    /// Base64 image from the loaded document
    Embedded(String),
    /// Freshly chosen file, uploaded as raw bytes on submit
    Replacement(StagedImage),
    /// User explicitly removed the image
    Cleared,
}

/// How the preview fills its square frame
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FitMode {
    /// Crop to fill (near-square images)
    Fill,
    /// Letterbox, never crop
    #[default]
    Contain,
}

/// Pick the fit for an image's natural dimensions.
/// Unknown or degenerate dimensions use contain-fit.
pub fn select_fit(dimensions: Option<(u32, u32)>) -> FitMode {
    match dimensions {
        Some((w, h)) if w > 0 && h > 0 => {
            let ratio = w as f32 / h as f32;
            if (SQUARE_MIN..=SQUARE_MAX).contains(&ratio) {
                FitMode::Fill
            } else {
                FitMode::Contain
            }
        }
        _ => FitMode::Contain,
    }
}

/// A started render whose dimensions still need probing
#[derive(Debug, Clone, PartialEq)]
pub struct RenderPass {
    pub seq: u64,
    pub source: ProbeSource,
}

pub struct ImageManager<H: PreviewHost> {
    host: H,
    state: ImageState,
    /// Embedded image of the original snapshot
    original: Option<String>,
    displayed: Option<H::Handle>,
    /// The one live transient handle, if any
    lease: Option<H::Handle>,
    fit: FitMode,
    render_seq: u64,
    preview_width: f32,
}

impl<H: PreviewHost> ImageManager<H> {
    pub fn new(host: H) -> Self {
        Self {
            host,
            state: ImageState::None,
            original: None,
            displayed: None,
            lease: None,
            fit: FitMode::Contain,
            render_seq: 0,
            preview_width: 0.0,
        }
    }

    pub fn state(&self) -> &ImageState {
        &self.state
    }

    pub fn displayed(&self) -> Option<&H::Handle> {
        self.displayed.as_ref()
    }

    pub fn fit(&self) -> FitMode {
        self.fit
    }

    pub fn preview_width(&self) -> f32 {
        self.preview_width
    }

    pub fn host(&self) -> &H {
        &self.host
    }

    /// The staged replacement file, if one is pending
    pub fn staged(&self) -> Option<&StagedImage> {
        match &self.state {
            ImageState::Replacement(staged) => Some(staged),
            _ => None,
        }
    }

    pub fn has_transient(&self) -> bool {
        self.lease.is_some()
    }

    /// Start over from a document's embedded image (or none)
    pub fn reset_to(&mut self, original: Option<String>) -> RenderPass {
        self.dispose();
        self.original = original.clone();
        match original {
            Some(b64) => self.show_embedded(&b64),
            None => {
                self.state = ImageState::None;
                self.render_nothing()
            }
        }
    }

    /// Render base64 image data; no transient handle is created
    pub fn show_embedded(&mut self, b64: &str) -> RenderPass {
        self.release_lease();
        self.state = ImageState::Embedded(b64.to_string());

        let cleaned: String = b64.chars().filter(|c| !c.is_whitespace()).collect();
        match STANDARD.decode(cleaned) {
            Ok(bytes) => {
                self.displayed = Some(self.host.inline(bytes.clone()));
                self.begin_render(ProbeSource::Bytes(bytes))
            }
            Err(e) => {
                warn!("embedded image is not valid base64: {}", e);
                self.displayed = None;
                self.begin_render(ProbeSource::Empty)
            }
        }
    }

    /// Preview a freshly chosen file.
    ///
    /// The previous transient handle is released before the new one is
    /// acquired. If acquisition fails, whatever was shown before comes back,
    /// including its render pass and fit.
    pub fn show_replacement(&mut self, staged: StagedImage) -> Result<RenderPass> {
        let previous = self.state.clone();
        let (seq, fit) = (self.render_seq, self.fit);
        self.release_lease();

        match self.host.acquire(&staged) {
            Ok(handle) => {
                debug!(file = %staged.name, "showing replacement image");
                Ok(self.display_replacement(handle, staged))
            }
            Err(e) => {
                warn!(file = %staged.name, "cannot preview replacement: {}", e);
                self.restore(previous);
                self.render_seq = seq;
                self.fit = fit;
                Err(e)
            }
        }
    }

    /// Drop the replacement (back to the original image) or remove the image
    pub fn clear_image(&mut self) -> RenderPass {
        if matches!(self.state, ImageState::Replacement(_)) {
            self.release_lease();
            self.restore_original()
        } else {
            self.state = ImageState::Cleared;
            self.render_nothing()
        }
    }

    /// Apply probed dimensions. Results for superseded passes are ignored.
    pub fn finish_render(&mut self, seq: u64, dimensions: Option<(u32, u32)>) -> Option<FitMode> {
        if seq != self.render_seq {
            return None;
        }
        self.fit = select_fit(dimensions);
        Some(self.fit)
    }

    /// Track the container width after a viewport resize
    pub fn set_container_width(&mut self, width: f32) {
        self.preview_width = (width - CONTAINER_PADDING).max(0.0);
    }

    /// Release any live transient handle
    pub fn dispose(&mut self) {
        self.release_lease();
    }

    fn display_replacement(&mut self, handle: H::Handle, staged: StagedImage) -> RenderPass {
        self.lease = Some(handle.clone());
        self.displayed = Some(handle);
        let source = ProbeSource::File(staged.path.clone());
        self.state = ImageState::Replacement(staged);
        self.begin_render(source)
    }

    /// Put a previous display state back after a failed replacement
    fn restore(&mut self, previous: ImageState) -> RenderPass {
        match previous {
            ImageState::Embedded(b64) => self.show_embedded(&b64),
            ImageState::Replacement(staged) => match self.host.acquire(&staged) {
                Ok(handle) => self.display_replacement(handle, staged),
                Err(e) => {
                    // The earlier file is gone too; show what the payload will send
                    warn!(file = %staged.name, "cannot restore replacement: {}", e);
                    self.state = ImageState::Cleared;
                    self.render_nothing()
                }
            },
            state @ (ImageState::Cleared | ImageState::None) => {
                self.state = state;
                self.render_nothing()
            }
        }
    }

    fn restore_original(&mut self) -> RenderPass {
        match self.original.clone() {
            Some(b64) => self.show_embedded(&b64),
            None => {
                self.state = ImageState::None;
                self.render_nothing()
            }
        }
    }

    fn release_lease(&mut self) {
        if let Some(handle) = self.lease.take() {
            self.host.release(&handle);
            self.displayed = None;
        }
    }

    fn render_nothing(&mut self) -> RenderPass {
        self.displayed = None;
        self.begin_render(ProbeSource::Empty)
    }

    fn begin_render(&mut self, source: ProbeSource) -> RenderPass {
        self.render_seq += 1;
        self.fit = FitMode::Contain;
        RenderPass {
            seq: self.render_seq,
            source,
        }
    }
}

impl<H: PreviewHost> Drop for ImageManager<H> {
    fn drop(&mut self) {
        self.dispose();
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::error::EditorError;
    use std::cell::RefCell;
    use std::rc::Rc;

    /// Host that hands out numbered handles and checks release discipline
    #[derive(Debug, Default)]
    pub(crate) struct CountingHost {
        pub(crate) next: u32,
        pub(crate) live: Vec<u32>,
        pub(crate) max_live: usize,
        pub(crate) fail_acquire: bool,
        pub(crate) released: Rc<RefCell<Vec<u32>>>,
    }

    impl PreviewHost for CountingHost {
        type Handle = u32;

        fn inline(&mut self, _bytes: Vec<u8>) -> u32 {
            u32::MAX
        }

        fn acquire(&mut self, image: &StagedImage) -> Result<u32> {
            if self.fail_acquire {
                return Err(EditorError::Io(format!("cannot read {}", image.name)));
            }
            self.next += 1;
            self.live.push(self.next);
            self.max_live = self.max_live.max(self.live.len());
            Ok(self.next)
        }

        fn release(&mut self, handle: &u32) {
            let pos = self
                .live
                .iter()
                .position(|h| h == handle)
                .expect("released a handle that is not live");
            self.live.remove(pos);
            self.released.borrow_mut().push(*handle);
        }
    }

    pub(crate) fn staged(name: &str) -> StagedImage {
        StagedImage {
            path: format!("/tmp/{}", name).into(),
            name: name.to_string(),
            size: 10,
        }
    }

    // "hi" in base64 - decodes fine, not a real image
    const B64: &str = "aGk=";

    #[test]
    fn test_select_fit() {
        assert_eq!(select_fit(Some((200, 200))), FitMode::Fill);
        assert_eq!(select_fit(Some((240, 200))), FitMode::Contain);
        assert_eq!(select_fit(Some((96, 100))), FitMode::Fill);
        assert_eq!(select_fit(Some((105, 100))), FitMode::Fill);
        assert_eq!(select_fit(Some((94, 100))), FitMode::Contain);
        assert_eq!(select_fit(Some((0, 100))), FitMode::Contain);
        assert_eq!(select_fit(None), FitMode::Contain);
    }

    #[test]
    fn test_embedded_creates_no_transient() {
        let mut manager = ImageManager::new(CountingHost::default());
        let pass = manager.reset_to(Some(B64.to_string()));

        assert_eq!(pass.source, ProbeSource::Bytes(b"hi".to_vec()));
        assert_eq!(manager.state(), &ImageState::Embedded(B64.to_string()));
        assert_eq!(manager.displayed(), Some(&u32::MAX));
        assert!(!manager.has_transient());
        assert!(manager.host().live.is_empty());
    }

    #[test]
    fn test_invalid_base64_renders_nothing() {
        let mut manager = ImageManager::new(CountingHost::default());
        let pass = manager.reset_to(Some("!!!".to_string()));

        assert_eq!(pass.source, ProbeSource::Empty);
        assert_eq!(manager.displayed(), None);
        assert_eq!(manager.finish_render(pass.seq, None), Some(FitMode::Contain));
    }

    #[test]
    fn test_replacements_never_leak() {
        let mut manager = ImageManager::new(CountingHost::default());
        manager.reset_to(Some(B64.to_string()));

        for i in 0..5 {
            manager.show_replacement(staged(&format!("{}.jpg", i))).unwrap();
            assert_eq!(manager.host().live.len(), 1);
        }
        manager.clear_image();
        assert!(manager.host().live.is_empty());

        manager.show_replacement(staged("again.jpg")).unwrap();
        manager.reset_to(None);
        assert!(manager.host().live.is_empty());
        assert_eq!(manager.host().max_live, 1);
    }

    #[test]
    fn test_clear_replacement_restores_original() {
        let mut manager = ImageManager::new(CountingHost::default());
        manager.reset_to(Some(B64.to_string()));
        manager.show_replacement(staged("honk.jpg")).unwrap();
        assert_eq!(manager.staged().map(|s| s.name.as_str()), Some("honk.jpg"));

        manager.clear_image();
        assert_eq!(manager.state(), &ImageState::Embedded(B64.to_string()));
        assert_eq!(manager.displayed(), Some(&u32::MAX));
        assert_eq!(manager.staged(), None);
    }

    #[test]
    fn test_clear_replacement_without_original() {
        let mut manager = ImageManager::new(CountingHost::default());
        manager.reset_to(None);
        manager.show_replacement(staged("honk.jpg")).unwrap();

        manager.clear_image();
        assert_eq!(manager.state(), &ImageState::None);
        assert_eq!(manager.displayed(), None);
    }

    #[test]
    fn test_clear_embedded_marks_cleared() {
        let mut manager = ImageManager::new(CountingHost::default());
        manager.reset_to(Some(B64.to_string()));

        manager.clear_image();
        assert_eq!(manager.state(), &ImageState::Cleared);
        assert_eq!(manager.displayed(), None);
    }

    #[test]
    fn test_failed_acquire_falls_back() {
        let host = CountingHost {
            fail_acquire: true,
            ..CountingHost::default()
        };
        let mut manager = ImageManager::new(host);
        manager.reset_to(Some(B64.to_string()));

        assert!(manager.show_replacement(staged("broken.jpg")).is_err());
        assert_eq!(manager.state(), &ImageState::Embedded(B64.to_string()));
        assert!(!manager.has_transient());
    }

    #[test]
    fn test_failed_acquire_keeps_cleared_image() {
        let mut manager = ImageManager::new(CountingHost::default());
        manager.reset_to(Some(B64.to_string()));
        manager.clear_image();

        manager.host.fail_acquire = true;
        assert!(manager.show_replacement(staged("broken.jpg")).is_err());
        assert_eq!(manager.state(), &ImageState::Cleared);
        assert_eq!(manager.displayed(), None);
    }

    #[test]
    fn test_failed_acquire_keeps_previous_replacement() {
        /// Host that can read the first file it is given and nothing else
        #[derive(Debug, Default)]
        struct OnlyFirst {
            inner: CountingHost,
            readable: Option<String>,
        }

        impl PreviewHost for OnlyFirst {
            type Handle = u32;

            fn inline(&mut self, bytes: Vec<u8>) -> u32 {
                self.inner.inline(bytes)
            }

            fn acquire(&mut self, image: &StagedImage) -> Result<u32> {
                let readable = self.readable.get_or_insert_with(|| image.name.clone());
                if *readable != image.name {
                    return Err(EditorError::Io(format!("cannot read {}", image.name)));
                }
                self.inner.acquire(image)
            }

            fn release(&mut self, handle: &u32) {
                self.inner.release(handle)
            }
        }

        let mut manager = ImageManager::new(OnlyFirst::default());
        manager.reset_to(Some(B64.to_string()));
        let pass = manager.show_replacement(staged("a.jpg")).unwrap();

        assert!(manager.show_replacement(staged("b.jpg")).is_err());
        assert_eq!(manager.staged().map(|s| s.name.as_str()), Some("a.jpg"));
        assert_eq!(manager.host().inner.live.len(), 1);
        // The pending probe for "a.jpg" still applies
        assert_eq!(manager.finish_render(pass.seq, Some((100, 100))), Some(FitMode::Fill));
    }

    #[test]
    fn test_stale_probe_is_ignored() {
        let mut manager = ImageManager::new(CountingHost::default());
        let first = manager.show_replacement(staged("a.jpg")).unwrap();
        let second = manager.show_replacement(staged("b.jpg")).unwrap();

        assert_eq!(manager.finish_render(first.seq, Some((200, 200))), None);
        assert_eq!(manager.fit(), FitMode::Contain);
        assert_eq!(manager.finish_render(second.seq, Some((200, 200))), Some(FitMode::Fill));
    }

    #[test]
    fn test_drop_releases_transient() {
        let released = Rc::new(RefCell::new(Vec::new()));
        let host = CountingHost {
            released: released.clone(),
            ..CountingHost::default()
        };
        let mut manager = ImageManager::new(host);
        manager.show_replacement(staged("a.jpg")).unwrap();

        drop(manager);
        assert_eq!(*released.borrow(), vec![1]);
    }

    #[test]
    fn test_preview_width_tracks_container() {
        let mut manager = ImageManager::new(CountingHost::default());
        manager.set_container_width(660.0);
        assert_eq!(manager.preview_width(), 600.0);
        manager.set_container_width(20.0);
        assert_eq!(manager.preview_width(), 0.0);
    }
}
