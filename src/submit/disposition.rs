/// Output filename from a `Content-Disposition` header
use regex::Regex;
use std::sync::LazyLock;

/// Used when the header is missing or carries no filename
pub const FALLBACK_FILENAME: &str = "updated.pose";

// First match wins: either the RFC 5987 extended form or the plain (optionally quoted) form
static FILENAME: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"filename\*=UTF-8''([^;\n\r]+)|filename="?([^";]+)"?"#)
        .expect("filename pattern is valid")
});

pub fn filename_from_disposition(header: Option<&str>) -> String {
    let Some(captures) = header.and_then(|h| FILENAME.captures(h)) else {
        return FALLBACK_FILENAME.to_string();
    };

    let raw = captures
        .get(1)
        .or_else(|| captures.get(2))
        .map(|m| m.as_str())
        .unwrap_or(FALLBACK_FILENAME);

    match urlencoding::decode(raw) {
        Ok(decoded) => decoded.into_owned(),
        Err(_) => raw.to_string(),
    }
}
