/// The editing session
///
/// One explicit object holds the original snapshot, the working copy, the
/// touched-field tracker and the image lifecycle. The UI only calls the
/// operations below; every edit marks its field as touched.
use tracing::{info, warn};

use super::changes::ChangeTracker;
use super::data::{
    Counter, Document, Field, SelectedFile, StagedImage, MAX_AUTHOR_LEN, MAX_DESCRIPTION_LEN,
    MAX_POSE_BYTES, MAX_TAGS, MAX_VERSION_LEN,
};
use super::payload::{ChangePayload, WorkingValues};
use super::tags::{TagCollection, TagGesture, TagInput};
use crate::error::{EditorError, Result};
use crate::preview::host::PreviewHost;
use crate::preview::lifecycle::{ImageManager, RenderPass};

pub const POSE_TOO_LARGE: &str = "Error: Pose file exceeds 10 MB";
pub const FIELDS_OVER_LIMIT: &str = "One or more fields exceed maximum lengths (see counters)";

pub struct EditorSession<H: PreviewHost> {
    /// The pose file the current document was loaded from
    source: Option<SelectedFile>,
    original: Option<Document>,
    author: String,
    description: String,
    version: String,
    tags: TagCollection,
    tag_input: TagInput,
    image: ImageManager<H>,
    changes: ChangeTracker,
}

impl<H: PreviewHost> EditorSession<H> {
    pub fn new(host: H) -> Self {
        Self {
            source: None,
            original: None,
            author: String::new(),
            description: String::new(),
            version: String::new(),
            tags: TagCollection::default(),
            tag_input: TagInput::default(),
            image: ImageManager::new(host),
            changes: ChangeTracker::new(),
        }
    }

    // ========== Document lifecycle ==========

    /// Read, size-check and load a pose file.
    ///
    /// On any failure the previous document stays loaded.
    pub fn load_file(&mut self, file: SelectedFile) -> Result<RenderPass> {
        if file.size > MAX_POSE_BYTES {
            warn!(file = %file.name, size = file.size, "pose file rejected");
            return Err(EditorError::Validation(POSE_TOO_LARGE.to_string()));
        }

        let bytes = std::fs::read(&file.path)?;
        let text = String::from_utf8(bytes).map_err(|_| EditorError::Parse)?;
        let pass = self.load(&text)?;

        info!(file = %file.name, "loaded pose document");
        self.source = Some(file);
        Ok(pass)
    }

    /// Parse a document and reset the working copy to match it exactly
    pub fn load(&mut self, text: &str) -> Result<RenderPass> {
        let document = Document::parse(text)?;

        self.author = document.author.clone();
        self.description = document.description.clone();
        self.version = document.version.clone();
        self.tags = TagCollection::from_tags(&document.tags);
        self.tag_input.clear();
        self.changes.clear();
        let pass = self.image.reset_to(document.embedded_image.clone());
        self.original = Some(document);

        Ok(pass)
    }

    /// Forget the document and every edit
    pub fn clear(&mut self) -> RenderPass {
        info!("editor cleared");
        self.dispose();
        self.source = None;
        self.original = None;
        self.author.clear();
        self.description.clear();
        self.version.clear();
        self.tags = TagCollection::default();
        self.tag_input.clear();
        self.changes.clear();
        self.image.reset_to(None)
    }

    /// Release the transient preview handle, if any
    pub fn dispose(&mut self) {
        self.image.dispose();
    }

    pub fn is_loaded(&self) -> bool {
        self.original.is_some()
    }

    pub fn source(&self) -> Option<&SelectedFile> {
        self.source.as_ref()
    }

    pub fn original(&self) -> Option<&Document> {
        self.original.as_ref()
    }

    pub fn changes(&self) -> &ChangeTracker {
        &self.changes
    }

    // ========== Scalar fields ==========

    pub fn author(&self) -> &str {
        &self.author
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn version(&self) -> &str {
        &self.version
    }

    pub fn set_author(&mut self, value: String) {
        self.author = value;
        self.changes.mark(Field::Author);
    }

    pub fn set_description(&mut self, value: String) {
        self.description = value;
        self.changes.mark(Field::Description);
    }

    pub fn set_version(&mut self, value: String) {
        self.version = value;
        self.changes.mark(Field::Version);
    }

    // ========== Tags ==========

    pub fn tags(&self) -> &[String] {
        self.tags.as_slice()
    }

    pub fn tag_input(&self) -> &str {
        self.tag_input.value()
    }

    pub fn commit_tag(&mut self, raw: &str) -> Option<String> {
        let token = self.tags.commit_pending(raw)?;
        self.changes.mark(Field::Tags);
        Some(token)
    }

    pub fn remove_tag(&mut self, index: usize) -> Option<String> {
        let removed = self.tags.remove_at(index)?;
        self.changes.mark(Field::Tags);
        Some(removed)
    }

    pub fn remove_last_tag(&mut self) -> Option<String> {
        let removed = self.tags.remove_last()?;
        self.changes.mark(Field::Tags);
        Some(removed)
    }

    /// The tag input text changed
    pub fn edit_tag_input(&mut self, new_value: String) {
        let gesture = self.tag_input.edit(new_value);
        self.apply_tag_gesture(gesture);
    }

    /// Enter was pressed in the tag input
    pub fn submit_tag_input(&mut self) {
        let gesture = self.tag_input.submit();
        self.apply_tag_gesture(gesture);
    }

    fn apply_tag_gesture(&mut self, gesture: TagGesture) {
        match gesture {
            TagGesture::Typing => {}
            TagGesture::Commit(raw) => {
                self.commit_tag(&raw);
            }
            TagGesture::DeleteLast => {
                self.remove_last_tag();
            }
        }
    }

    // ========== Image ==========

    pub fn image(&self) -> &ImageManager<H> {
        &self.image
    }

    pub fn image_mut(&mut self) -> &mut ImageManager<H> {
        &mut self.image
    }

    pub fn staged_image(&self) -> Option<&StagedImage> {
        self.image.staged()
    }

    pub fn show_replacement(&mut self, staged: StagedImage) -> Result<RenderPass> {
        let pass = self.image.show_replacement(staged)?;
        self.changes.mark(Field::Base64Image);
        Ok(pass)
    }

    pub fn clear_image(&mut self) -> RenderPass {
        let pass = self.image.clear_image();
        self.changes.mark(Field::Base64Image);
        pass
    }

    // ========== Payload & limits ==========

    pub fn build_payload(&self) -> ChangePayload {
        ChangePayload::build(
            &self.changes,
            WorkingValues {
                author: &self.author,
                description: &self.description,
                version: &self.version,
                tags: self.tags.as_slice(),
                replacement_staged: self.image.staged().is_some(),
            },
        )
    }

    pub fn counter(&self, field: Field) -> Option<Counter> {
        let counter = match field {
            Field::Author => Counter::new(self.author.chars().count(), MAX_AUTHOR_LEN),
            Field::Description => {
                Counter::new(self.description.chars().count(), MAX_DESCRIPTION_LEN)
            }
            Field::Version => Counter::new(self.version.chars().count(), MAX_VERSION_LEN),
            Field::Tags => Counter::new(self.tags.len(), MAX_TAGS),
            Field::Base64Image => return None,
        };
        Some(counter)
    }

    /// Advisory message when any counter is over its limit; never blocks submission
    pub fn advisory_warning(&self) -> Option<&'static str> {
        Field::ALL
            .iter()
            .filter_map(|field| self.counter(*field))
            .any(|counter| counter.over_limit())
            .then_some(FIELDS_OVER_LIMIT)
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::preview::lifecycle::tests::{staged, CountingHost};
    use crate::preview::lifecycle::ImageState;
    use serde_json::json;
    use std::io::Write;

    pub(crate) const SAMPLE: &str =
        r#"{"Author":"A","Description":"desc","Version":"1","Tags":["x","y"],"Base64Image":"aGk="}"#;

    pub(crate) fn session() -> EditorSession<CountingHost> {
        EditorSession::new(CountingHost::default())
    }

    fn payload_json(session: &EditorSession<CountingHost>) -> serde_json::Value {
        serde_json::to_value(session.build_payload()).unwrap()
    }

    #[test]
    fn test_load_leaves_nothing_touched() {
        let mut session = session();
        session.load(SAMPLE).unwrap();

        assert!(session.changes().is_empty());
        assert!(session.build_payload().is_empty());
        assert_eq!(session.author(), "A");
        assert_eq!(session.tags(), ["x", "y"]);
    }

    #[test]
    fn test_reload_resets_tracker() {
        let mut session = session();
        session.load(SAMPLE).unwrap();
        session.set_author("B".into());
        session.show_replacement(staged("honk.jpg")).unwrap();

        session.load(r#"{"Author":"C"}"#).unwrap();
        assert!(session.changes().is_empty());
        assert_eq!(session.author(), "C");
        assert!(session.tags().is_empty());
        assert_eq!(session.staged_image(), None);
        assert!(session.image().host().live.is_empty());
    }

    #[test]
    fn test_failed_load_preserves_state() {
        let mut session = session();
        session.load(SAMPLE).unwrap();
        session.set_version("2".into());

        assert_eq!(session.load("{oops"), Err(EditorError::Parse));
        assert_eq!(session.version(), "2");
        assert!(session.changes().is_touched(Field::Version));
        assert_eq!(session.original().map(|d| d.author.as_str()), Some("A"));
    }

    #[test]
    fn test_same_value_still_counts_as_touched() {
        let mut session = session();
        session.load(SAMPLE).unwrap();
        session.set_author("A".into());

        assert_eq!(payload_json(&session), json!({"Author": "A"}));
    }

    #[test]
    fn test_clearing_author() {
        let mut session = session();
        session.load(SAMPLE).unwrap();
        session.set_author(String::new());

        assert_eq!(payload_json(&session), json!({"Author": null}));
    }

    #[test]
    fn test_committing_tags_on_untagged_document() {
        let mut session = session();
        session.load(r#"{"Author":"A"}"#).unwrap();
        session.edit_tag_input("red".into());
        session.submit_tag_input();
        session.edit_tag_input("blue ".into());

        assert_eq!(payload_json(&session), json!({"Tags": ["red", "blue"]}));
    }

    #[test]
    fn test_removing_every_tag_sends_null() {
        let mut session = session();
        session.load(SAMPLE).unwrap();
        session.remove_tag(0);
        // Backspace on the empty input removes the last tag
        session.edit_tag_input(String::new());

        assert!(session.tags().is_empty());
        assert_eq!(payload_json(&session), json!({"Tags": null}));
    }

    #[test]
    fn test_space_typed_before_pending_text_keeps_it() {
        let mut session = session();
        session.load(r#"{"Author":"A"}"#).unwrap();
        session.edit_tag_input("red".into());
        session.edit_tag_input(" red".into());
        session.edit_tag_input("blue".into());
        session.edit_tag_input("bl ue".into());

        assert_eq!(session.tags(), ["red", "blue"]);
        assert_eq!(session.tag_input(), "");
    }

    #[test]
    fn test_load_skips_byte_order_mark() {
        let mut session = session();
        session.load(&format!("\u{feff}{}", SAMPLE)).unwrap();
        assert_eq!(session.author(), "A");
    }

    #[test]
    fn test_failed_replacement_after_clear_keeps_it_cleared() {
        let mut session = EditorSession::new(CountingHost {
            fail_acquire: true,
            ..CountingHost::default()
        });
        session.load(SAMPLE).unwrap();
        session.clear_image();

        assert!(session.show_replacement(staged("broken.jpg")).is_err());
        assert_eq!(session.image().state(), &ImageState::Cleared);
        assert_eq!(session.image().displayed(), None);
        assert_eq!(payload_json(&session), json!({"Base64Image": null}));
    }

    #[test]
    fn test_blank_commit_does_not_touch() {
        let mut session = session();
        session.load(SAMPLE).unwrap();
        session.submit_tag_input();
        assert!(session.changes().is_empty());
    }

    #[test]
    fn test_image_payload_rules() {
        let mut session = session();
        session.load(SAMPLE).unwrap();

        session.show_replacement(staged("honk.jpg")).unwrap();
        assert!(session.changes().is_touched(Field::Base64Image));
        assert!(session.build_payload().is_empty());

        session.clear_image();
        assert_eq!(payload_json(&session), json!({"Base64Image": null}));
        assert!(matches!(session.image().state(), ImageState::Embedded(_)));
    }

    #[test]
    fn test_clear_resets_everything() {
        let mut session = session();
        session.load(SAMPLE).unwrap();
        session.set_description("new".into());
        session.show_replacement(staged("honk.jpg")).unwrap();

        session.clear();
        assert!(!session.is_loaded());
        assert!(session.changes().is_empty());
        assert_eq!(session.description(), "");
        assert_eq!(session.image().state(), &ImageState::None);
        assert!(session.image().host().live.is_empty());
    }

    #[test]
    fn test_advisory_warning() {
        let mut session = session();
        session.load(SAMPLE).unwrap();
        assert_eq!(session.advisory_warning(), None);

        session.set_version("12345678901".into());
        assert_eq!(session.advisory_warning(), Some(FIELDS_OVER_LIMIT));
        assert_eq!(session.counter(Field::Version), Some(Counter::new(11, 10)));
    }

    #[test]
    fn test_counter_counts_characters() {
        let mut session = session();
        session.set_author("héllo".into());
        assert_eq!(session.counter(Field::Author), Some(Counter::new(5, 50)));
        assert_eq!(session.counter(Field::Base64Image), None);
    }

    #[test]
    fn test_load_file() {
        let mut file = tempfile::Builder::new().suffix(".pose").tempfile().unwrap();
        file.write_all(SAMPLE.as_bytes()).unwrap();

        let mut session = session();
        session
            .load_file(SelectedFile::from_path(file.path()).unwrap())
            .unwrap();
        assert!(session.is_loaded());
        assert!(session.source().is_some());
    }

    #[test]
    fn test_load_file_rejects_oversized() {
        let file = tempfile::NamedTempFile::new().unwrap();
        file.as_file().set_len(MAX_POSE_BYTES + 1).unwrap();

        let mut session = session();
        session.load(SAMPLE).unwrap();
        let err = session
            .load_file(SelectedFile::from_path(file.path()).unwrap())
            .unwrap_err();

        assert_eq!(err.to_string(), POSE_TOO_LARGE);
        assert_eq!(session.author(), "A");
        assert!(session.source().is_none());
    }
}
