/// Tag collection and the pending tag input buffer
///
/// Tags are ordered by insertion and may repeat. A committed tag never
/// contains whitespace and the collection never grows past `MAX_TAGS`.
use super::data::MAX_TAGS;

#[derive(Debug, Clone, Default, PartialEq)]
pub struct TagCollection {
    tags: Vec<String>,
}

impl TagCollection {
    pub fn from_tags(tags: &[String]) -> Self {
        Self { tags: tags.to_vec() }
    }

    pub fn as_slice(&self) -> &[String] {
        &self.tags
    }

    pub fn len(&self) -> usize {
        self.tags.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tags.is_empty()
    }

    pub fn is_full(&self) -> bool {
        self.tags.len() >= MAX_TAGS
    }

    /// Commit raw input as a tag.
    ///
    /// Only the first whitespace-delimited segment is kept. Returns the
    /// committed token, or `None` when the input is blank or the collection
    /// is full.
    pub fn commit_pending(&mut self, raw: &str) -> Option<String> {
        if self.is_full() {
            return None;
        }
        let token = raw.split_whitespace().next()?.to_string();
        self.tags.push(token.clone());
        Some(token)
    }

    pub fn remove_at(&mut self, index: usize) -> Option<String> {
        (index < self.tags.len()).then(|| self.tags.remove(index))
    }

    pub fn remove_last(&mut self) -> Option<String> {
        self.tags.pop()
    }
}

/// What a keystroke in the tag input amounts to
#[derive(Debug, Clone, PartialEq)]
pub enum TagGesture {
    /// Nothing to do besides keeping the new buffer text
    Typing,
    /// A delimiter was hit; commit this text
    Commit(String),
    /// Delete was pressed on an empty buffer
    DeleteLast,
}

/// Pending input buffer for the tag field
///
/// Text widgets report the whole new buffer on every edit, so delimiters are
/// recognised from the edit itself and never stored.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TagInput {
    buffer: String,
}

impl TagInput {
    pub fn value(&self) -> &str {
        &self.buffer
    }

    /// Interpret an edit of the buffer
    pub fn edit(&mut self, new_value: String) -> TagGesture {
        if new_value.is_empty() && self.buffer.is_empty() {
            return TagGesture::DeleteLast;
        }

        if new_value.contains(char::is_whitespace) {
            let buffer = std::mem::take(&mut self.buffer);
            // A single delimiter keystroke commits the buffer wherever the
            // cursor was; anything else (a paste) commits its first segment
            if is_single_insert(&buffer, &new_value) {
                return TagGesture::Commit(buffer);
            }
            return TagGesture::Commit(new_value);
        }

        self.buffer = new_value;
        TagGesture::Typing
    }

    /// Enter was pressed; the buffer is emptied either way
    pub fn submit(&mut self) -> TagGesture {
        TagGesture::Commit(std::mem::take(&mut self.buffer))
    }

    pub fn clear(&mut self) {
        self.buffer.clear();
    }
}

/// Whether `new` is `old` with exactly one whitespace character inserted
fn is_single_insert(old: &str, new: &str) -> bool {
    new.char_indices()
        .filter(|(_, c)| c.is_whitespace())
        .any(|(i, c)| {
            let rest = i + c.len_utf8();
            new.len() == old.len() + c.len_utf8()
                && old.get(..i) == Some(&new[..i])
                && old.get(i..) == Some(&new[rest..])
        })
}
