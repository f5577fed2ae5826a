use base64::Engine;
use serde::Serialize;
use url::Url;

use crate::Error;

const PLAIN_URL_PREFIX: &str = "https://";
const CLEARKEY_ID_PREFIX: &str = "key=";
const CLEARKEY_PREFIX: &str = "key2=";

/// Packaging family of a stream, inferred from its URL.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum StreamKind {
    /// Segmented playlist (`.m3u8` anywhere in the URL, case-insensitive).
    Hls,
    /// Fragmented manifest. The default for everything else.
    Dash,
}

impl StreamKind {
    pub fn infer(url: &str) -> Self {
        if url.to_ascii_lowercase().contains(".m3u8") {
            StreamKind::Hls
        } else {
            StreamKind::Dash
        }
    }
}

/// Clearkey pair for encrypted streams. Both halves travel together: the
/// decoder never emits one without the other.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClearKey {
    pub key_id: String,
    pub key: String,
}

/// A fully decoded stream note payload. Only ever constructed from content
/// that decoded completely; see [`decode_content`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StreamDescriptor {
    pub url: String,
    pub kind: StreamKind,
    pub clear_key: Option<ClearKey>,
}

impl StreamDescriptor {
    fn build(url: String, clear_key: Option<ClearKey>) -> Result<Self, Error> {
        Url::parse(&url)?;
        let kind = StreamKind::infer(&url);
        Ok(Self {
            url,
            kind,
            clear_key,
        })
    }
}

/// Decode a stream note's content field.
///
/// Content starting with `https://` is already a plain manifest URL. Anything
/// else is the composite form: `&`-separated parts where the first part is
/// the base64-encoded URL, `key=` parts carry the base64 clearkey id and
/// `key2=` parts the base64 clearkey. Parts with other prefixes are skipped
/// so new fields can ship without breaking old consumers. Key material is
/// decoded as-is; no length or hex validation happens here.
pub fn decode_content(content: &str) -> Result<StreamDescriptor, Error> {
    if content.starts_with(PLAIN_URL_PREFIX) {
        return StreamDescriptor::build(content.to_string(), None);
    }

    let mut parts = content.split('&');
    let url = decode_part(parts.next().unwrap_or_default())?;

    let mut key_id = None;
    let mut key = None;
    for part in parts {
        if let Some(rest) = part.strip_prefix(CLEARKEY_ID_PREFIX) {
            key_id = Some(decode_part(rest)?);
        } else if let Some(rest) = part.strip_prefix(CLEARKEY_PREFIX) {
            key = Some(decode_part(rest)?);
        }
    }

    let clear_key = match (key_id, key) {
        (Some(key_id), Some(key)) => Some(ClearKey { key_id, key }),
        (None, None) => None,
        (Some(_), None) => return Err(Error::UnpairedClearKey("key")),
        (None, Some(_)) => return Err(Error::UnpairedClearKey("key2")),
    };

    StreamDescriptor::build(url, clear_key)
}

fn decode_part(part: &str) -> Result<String, Error> {
    let bytes = base64::engine::general_purpose::STANDARD.decode(part)?;
    Ok(String::from_utf8(bytes)?)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn b64(input: &str) -> String {
        base64::engine::general_purpose::STANDARD.encode(input)
    }

    #[test]
    fn test_plain_https_url_passes_through() {
        let descriptor = decode_content("https://ex.com/live.m3u8").unwrap();
        assert_eq!(descriptor.url, "https://ex.com/live.m3u8");
        assert_eq!(descriptor.kind, StreamKind::Hls);
        assert!(descriptor.clear_key.is_none());
    }

    #[test]
    fn test_composite_with_clearkey_pair() {
        let content = "aHR0cHM6Ly9leC5jb20vbWFuaWZlc3QubXBk&key=a2V5MQ==&key2=a2V5Mg==";
        let descriptor = decode_content(content).unwrap();
        assert_eq!(descriptor.url, "https://ex.com/manifest.mpd");
        assert_eq!(descriptor.kind, StreamKind::Dash);
        let clear_key = descriptor.clear_key.unwrap();
        assert_eq!(clear_key.key_id, "key1");
        assert_eq!(clear_key.key, "key2");
    }

    #[test]
    fn test_bare_base64_url_is_valid_without_keys() {
        let content = b64("https://ex.com/manifest.mpd");
        let descriptor = decode_content(&content).unwrap();
        assert_eq!(descriptor.url, "https://ex.com/manifest.mpd");
        assert!(descriptor.clear_key.is_none());
    }

    #[test]
    fn test_unrecognized_parts_are_ignored() {
        let content = format!(
            "{}&foo=bar&key={}&quality=hd&key2={}",
            b64("https://ex.com/manifest.mpd"),
            b64("id"),
            b64("k"),
        );
        let descriptor = decode_content(&content).unwrap();
        let clear_key = descriptor.clear_key.unwrap();
        assert_eq!(clear_key.key_id, "id");
        assert_eq!(clear_key.key, "k");
    }

    #[test]
    fn test_key_without_key2_is_rejected() {
        let content = format!("{}&key={}", b64("https://ex.com/a.mpd"), b64("id"));
        let err = decode_content(&content).unwrap_err();
        assert!(matches!(err, Error::UnpairedClearKey("key")));
        assert!(err.is_malformed_payload());
    }

    #[test]
    fn test_key2_without_key_is_rejected() {
        let content = format!("{}&key2={}", b64("https://ex.com/a.mpd"), b64("k"));
        let err = decode_content(&content).unwrap_err();
        assert!(matches!(err, Error::UnpairedClearKey("key2")));
    }

    #[test]
    fn test_invalid_base64_url_is_a_hard_failure() {
        let err = decode_content("!!!not-base64!!!").unwrap_err();
        assert!(matches!(err, Error::Base64(_)));
        assert!(err.is_malformed_payload());
    }

    #[test]
    fn test_decoded_garbage_is_not_a_url() {
        let err = decode_content(&b64("not a url at all")).unwrap_err();
        assert!(matches!(err, Error::InvalidUrl(_)));
        assert!(err.is_malformed_payload());
    }

    #[test]
    fn test_kind_inference_is_case_insensitive() {
        assert_eq!(StreamKind::infer("https://ex.com/a.M3U8"), StreamKind::Hls);
        assert_eq!(StreamKind::infer("https://ex.com/a.m3U8?x=1"), StreamKind::Hls);
        assert_eq!(StreamKind::infer("https://ex.com/a.mpd"), StreamKind::Dash);
        assert_eq!(StreamKind::infer("https://ex.com/a"), StreamKind::Dash);
    }
}
