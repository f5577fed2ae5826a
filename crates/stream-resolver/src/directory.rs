use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::Error;

/// Title given to tokens that match no directory entry.
pub const FALLBACK_TITLE: &str = "Live Stream";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChannelEntry {
    pub name: String,
    pub title: String,
    #[serde(rename = "noteId")]
    pub note_id: String,
}

/// Static channel-name-to-note-id directory, loaded once at startup and
/// never mutated.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ChannelDirectory {
    pub channels: Vec<ChannelEntry>,
}

impl ChannelDirectory {
    pub fn from_json(json: &str) -> Result<Self, Error> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn from_path(path: &Path) -> Result<Self, Error> {
        Self::from_json(&fs::read_to_string(path)?)
    }

    /// Exact-name lookup. Unknown tokens are assumed to be direct note
    /// references, so this never fails: the fallback entry carries the
    /// token verbatim under a generic title.
    pub fn resolve(&self, token: &str) -> ChannelEntry {
        self.channels
            .iter()
            .find(|channel| channel.name == token)
            .cloned()
            .unwrap_or_else(|| ChannelEntry {
                name: token.to_string(),
                title: FALLBACK_TITLE.to_string(),
                note_id: token.to_string(),
            })
    }

    pub fn entries(&self) -> &[ChannelEntry] {
        &self.channels
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn directory() -> ChannelDirectory {
        ChannelDirectory {
            channels: vec![
                ChannelEntry {
                    name: "news".to_string(),
                    title: "News Channel".to_string(),
                    note_id: "note1abc".to_string(),
                },
                ChannelEntry {
                    name: "sports".to_string(),
                    title: "Sports".to_string(),
                    note_id: "note1def".to_string(),
                },
            ],
        }
    }

    #[test]
    fn test_resolve_known_name_returns_entry_unchanged() {
        let entry = directory().resolve("news");
        assert_eq!(entry.title, "News Channel");
        assert_eq!(entry.note_id, "note1abc");
    }

    #[test]
    fn test_resolve_unknown_token_is_identity_fallback() {
        let entry = directory().resolve("xyz123");
        assert_eq!(entry.note_id, "xyz123");
        assert_eq!(entry.title, FALLBACK_TITLE);
    }

    #[test]
    fn test_from_json_uses_original_field_names() {
        let json = r#"{"channels":[{"name":"news","title":"News Channel","noteId":"note1abc"}]}"#;
        let directory = ChannelDirectory::from_json(json).unwrap();
        assert_eq!(directory.entries().len(), 1);
        assert_eq!(directory.entries()[0].note_id, "note1abc");
    }

    #[test]
    fn test_from_json_rejects_garbage() {
        assert!(ChannelDirectory::from_json("not json").is_err());
    }
}
