/// Minimal change payload sent alongside the original pose file
///
/// Omitted keys mean "leave unchanged", `null` means "clear".
use serde::{Serialize, Serializer};

use super::changes::ChangeTracker;
use super::data::Field;

/// New value for a touched field
#[derive(Debug, Clone, PartialEq)]
pub enum Change<T> {
    Set(T),
    Clear,
}

impl<T: Serialize> Serialize for Change<T> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Change::Set(value) => value.serialize(serializer),
            Change::Clear => serializer.serialize_none(),
        }
    }
}

#[derive(Serialize, Debug, Clone, Default, PartialEq)]
pub struct ChangePayload {
    #[serde(rename = "Author", skip_serializing_if = "Option::is_none")]
    pub author: Option<Change<String>>,
    #[serde(rename = "Description", skip_serializing_if = "Option::is_none")]
    pub description: Option<Change<String>>,
    #[serde(rename = "Version", skip_serializing_if = "Option::is_none")]
    pub version: Option<Change<String>>,
    #[serde(rename = "Tags", skip_serializing_if = "Option::is_none")]
    pub tags: Option<Change<Vec<String>>>,
    /// Only ever `Clear`; a staged replacement travels as raw bytes
    #[serde(rename = "Base64Image", skip_serializing_if = "Option::is_none")]
    pub base64_image: Option<Change<String>>,
}

/// Working values the payload is built from
#[derive(Debug, Clone, Copy)]
pub struct WorkingValues<'a> {
    pub author: &'a str,
    pub description: &'a str,
    pub version: &'a str,
    pub tags: &'a [String],
    pub replacement_staged: bool,
}

impl ChangePayload {
    pub fn build(changes: &ChangeTracker, values: WorkingValues<'_>) -> Self {
        let text = |field: Field, value: &str| {
            changes.is_touched(field).then(|| match value.trim() {
                "" => Change::Clear,
                trimmed => Change::Set(trimmed.to_string()),
            })
        };

        let tags = changes.is_touched(Field::Tags).then(|| {
            if values.tags.is_empty() {
                Change::Clear
            } else {
                Change::Set(values.tags.to_vec())
            }
        });

        let base64_image = (changes.is_touched(Field::Base64Image) && !values.replacement_staged)
            .then_some(Change::Clear);

        Self {
            author: text(Field::Author, values.author),
            description: text(Field::Description, values.description),
            version: text(Field::Version, values.version),
            tags,
            base64_image,
        }
    }

    /// Fields present in the payload, either set or cleared
    pub fn fields(&self) -> Vec<Field> {
        let present = [
            (Field::Author, self.author.is_some()),
            (Field::Description, self.description.is_some()),
            (Field::Version, self.version.is_some()),
            (Field::Tags, self.tags.is_some()),
            (Field::Base64Image, self.base64_image.is_some()),
        ];
        present
            .into_iter()
            .filter_map(|(field, is_present)| is_present.then_some(field))
            .collect()
    }

    pub fn is_empty(&self) -> bool {
        self.fields().is_empty()
    }

    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn values<'a>(tags: &'a [String], staged: bool) -> WorkingValues<'a> {
        WorkingValues {
            author: "  Someone  ",
            description: "   ",
            version: "1.2",
            tags,
            replacement_staged: staged,
        }
    }

    #[test]
    fn test_untouched_fields_are_omitted() {
        let payload = ChangePayload::build(&ChangeTracker::new(), values(&[], false));
        assert!(payload.is_empty());
        assert_eq!(payload.to_json().unwrap(), "{}");
    }

    #[test]
    fn test_text_fields_trim_and_clear() {
        let mut changes = ChangeTracker::new();
        changes.mark(Field::Author);
        changes.mark(Field::Description);

        let payload = ChangePayload::build(&changes, values(&[], false));
        let json: serde_json::Value = serde_json::to_value(&payload).unwrap();
        assert_eq!(json, json!({"Author": "Someone", "Description": null}));
    }

    #[test]
    fn test_empty_tags_serialize_as_null() {
        let mut changes = ChangeTracker::new();
        changes.mark(Field::Tags);

        let payload = ChangePayload::build(&changes, values(&[], false));
        assert_eq!(serde_json::to_value(&payload).unwrap(), json!({"Tags": null}));

        let tags = vec!["red".to_string(), "blue".to_string()];
        let payload = ChangePayload::build(&changes, values(&tags, false));
        assert_eq!(
            serde_json::to_value(&payload).unwrap(),
            json!({"Tags": ["red", "blue"]})
        );
    }

    #[test]
    fn test_image_clear_only_without_staged_file() {
        let mut changes = ChangeTracker::new();
        changes.mark(Field::Base64Image);

        let cleared = ChangePayload::build(&changes, values(&[], false));
        assert_eq!(cleared.fields(), vec![Field::Base64Image]);
        assert_eq!(serde_json::to_value(&cleared).unwrap(), json!({"Base64Image": null}));

        let staged = ChangePayload::build(&changes, values(&[], true));
        assert!(staged.is_empty());
    }

    #[test]
    fn test_touched_matches_present() {
        let mut changes = ChangeTracker::new();
        for field in [Field::Author, Field::Description, Field::Version, Field::Tags] {
            changes.mark(field);
            let payload = ChangePayload::build(&changes, values(&[], false));
            let touched: Vec<_> = changes.fields().collect();
            assert_eq!(payload.fields(), touched);
        }
    }
}
