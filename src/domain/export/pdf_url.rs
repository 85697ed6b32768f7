//! Correction of the PDF URL returned by a finished export.
//!
//! Quip puts the generated file name into the `filename` query parameter
//! without escaping it, so a title such as `Q&A notes (draft).pdf` arrives
//! as raw text inside the URL. The query is split into key/value pairs, each
//! value percent-decoded once and re-encoded strictly, and the URL
//! reserialized with the corrected query.

use url::Url;

use crate::domain::foundation::ValidationError;

/// Query parameter carrying the generated file name.
pub const FILENAME_PARAM: &str = "filename";

/// A PDF URL safe to fetch, plus the human-readable file name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PdfLocation {
    /// URL with every query value strictly percent-encoded.
    pub url: Url,
    /// Unescaped file name, used as the upload title.
    pub filename: String,
}

/// Re-escapes the query of a raw PDF URL.
///
/// Everything after the first `?` is query text, including a `#`, since an
/// unescaped file name may contain one. `fallback_name` is used when the URL
/// carries no usable `filename`.
pub fn correct_pdf_url(raw: &str, fallback_name: &str) -> Result<PdfLocation, ValidationError> {
    let (base, query) = match raw.trim().split_once('?') {
        Some((base, query)) => (base, Some(query)),
        None => (raw.trim(), None),
    };

    let mut url =
        Url::parse(base).map_err(|e| ValidationError::invalid_format("pdf_url", e.to_string()))?;

    let pairs = query.map(split_query).unwrap_or_default();

    let filename = pairs
        .iter()
        .find(|(key, _)| key == FILENAME_PARAM)
        .map(|(_, value)| value.trim().to_string())
        .filter(|name| !name.is_empty())
        .unwrap_or_else(|| fallback_name.to_string());

    if !pairs.is_empty() {
        let query = pairs
            .iter()
            .map(|(key, value)| {
                format!("{}={}", urlencoding::encode(key), urlencoding::encode(value))
            })
            .collect::<Vec<_>>()
            .join("&");
        url.set_query(Some(&query));
    }

    Ok(PdfLocation { url, filename })
}

/// Splits a query into decoded pairs.
///
/// A segment without `=` cannot start a parameter, so it is treated as an
/// unescaped `&` inside the previous value.
fn split_query(query: &str) -> Vec<(String, String)> {
    let mut pairs: Vec<(String, String)> = Vec::new();
    for segment in query.split('&') {
        match segment.split_once('=') {
            Some((key, value)) => pairs.push((decode(key), decode(value))),
            None => match pairs.last_mut() {
                Some((_, value)) => {
                    value.push('&');
                    value.push_str(&decode(segment));
                }
                None if !segment.is_empty() => pairs.push((decode(segment), String::new())),
                None => {}
            },
        }
    }
    pairs
}

fn decode(component: &str) -> String {
    urlencoding::decode(component)
        .map(|decoded| decoded.into_owned())
        .unwrap_or_else(|_| component.to_string())
}
