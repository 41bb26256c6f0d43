/// Outbound multipart request, independent of the HTTP client
use std::fmt;

/// Server-side resize directive for the embedded image
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, serde::Deserialize, serde::Serialize)]
pub enum Resize {
    #[default]
    #[serde(rename = "none")]
    None,
    #[serde(rename = "1080")]
    P1080,
    #[serde(rename = "720")]
    P720,
    #[serde(rename = "480")]
    P480,
}

impl Resize {
    pub const ALL: [Resize; 4] = [Resize::None, Resize::P1080, Resize::P720, Resize::P480];

    /// Value sent in the `resize` form field
    pub fn as_str(&self) -> &'static str {
        match self {
            Resize::None => "none",
            Resize::P1080 => "1080",
            Resize::P720 => "720",
            Resize::P480 => "480",
        }
    }
}

impl fmt::Display for Resize {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Resize::None => f.write_str("Original size"),
            other => write!(f, "{} px", other.as_str()),
        }
    }
}

/// Endpoint a request is posted to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Route {
    /// Changed fields + optional replacement image
    Advanced,
    /// Image swap only
    Quick,
}

impl Route {
    pub fn path(&self) -> &'static str {
        match self {
            Route::Advanced => "/process_advanced",
            Route::Quick => "/process",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum FieldValue {
    Text(String),
    File { file_name: String, bytes: Vec<u8> },
}

#[derive(Debug, Clone, PartialEq)]
pub struct FormField {
    pub name: &'static str,
    pub value: FieldValue,
}

#[derive(Debug, Clone, PartialEq)]
pub struct OutboundRequest {
    pub route: Route,
    pub fields: Vec<FormField>,
}

impl OutboundRequest {
    pub fn new(route: Route) -> Self {
        Self {
            route,
            fields: Vec::new(),
        }
    }

    pub fn text(mut self, name: &'static str, value: impl Into<String>) -> Self {
        self.fields.push(FormField {
            name,
            value: FieldValue::Text(value.into()),
        });
        self
    }

    pub fn file(mut self, name: &'static str, file_name: impl Into<String>, bytes: Vec<u8>) -> Self {
        self.fields.push(FormField {
            name,
            value: FieldValue::File {
                file_name: file_name.into(),
                bytes,
            },
        });
        self
    }

    pub fn get(&self, name: &str) -> Option<&FieldValue> {
        self.fields.iter().find(|f| f.name == name).map(|f| &f.value)
    }

    pub fn names(&self) -> Vec<&'static str> {
        self.fields.iter().map(|f| f.name).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resize_values() {
        let values: Vec<_> = Resize::ALL.iter().map(Resize::as_str).collect();
        assert_eq!(values, ["none", "1080", "720", "480"]);
        assert_eq!(Resize::default(), Resize::None);
        assert_eq!(Resize::P720.to_string(), "720 px");
    }

    #[test]
    fn test_resize_config_names() {
        let resize: Resize = serde_json::from_str("\"480\"").unwrap();
        assert_eq!(resize, Resize::P480);
    }

    #[test]
    fn test_builder_keeps_order() {
        let request = OutboundRequest::new(Route::Advanced)
            .file("pose_file", "a.pose", b"{}".to_vec())
            .text("changes", "{}")
            .text("resize", "none");

        assert_eq!(request.names(), ["pose_file", "changes", "resize"]);
        assert_eq!(request.get("resize"), Some(&FieldValue::Text("none".into())));
        assert_eq!(request.get("image_file"), None);
    }
}
