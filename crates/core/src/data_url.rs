//! Data-URL helpers for inline image payloads.
//!
//! Generated images are stored on the dish record as
//! `data:<mime>;base64,<payload>` strings so the media type travels with
//! the payload. The editor strips the tag before sending the raw base64
//! data back to the backend and reattaches the reported type afterwards.

/// Compose a data URL from a media type and an already-base64 payload.
pub fn compose(mime_type: &str, base64_data: &str) -> String {
    format!("data:{mime_type};base64,{base64_data}")
}

/// Split a data URL into its media type and base64 payload.
///
/// Returns `None` when the string is not a `data:` URL with a base64 tag.
pub fn split(data_url: &str) -> Option<(&str, &str)> {
    let rest = data_url.strip_prefix("data:")?;
    let (mime_type, payload) = rest.split_once(";base64,")?;
    Some((mime_type, payload))
}
