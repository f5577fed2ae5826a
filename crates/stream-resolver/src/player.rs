use serde::Serialize;

use crate::decode::{StreamDescriptor, StreamKind};

/// Setup descriptor in the exact shape the playback surface consumes:
/// `{file, type, drm: {clearkey: {keyId, key}}}`. The `drm` block is only
/// emitted for encrypted streams.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PlayerSetup {
    pub file: String,
    #[serde(rename = "type")]
    pub kind: StreamKind,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub drm: Option<DrmSetup>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DrmSetup {
    pub clearkey: ClearKeySetup,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ClearKeySetup {
    #[serde(rename = "keyId")]
    pub key_id: String,
    pub key: String,
}

impl PlayerSetup {
    pub fn from_descriptor(descriptor: &StreamDescriptor) -> Self {
        Self {
            file: descriptor.url.clone(),
            kind: descriptor.kind,
            drm: descriptor.clear_key.as_ref().map(|clear_key| DrmSetup {
                clearkey: ClearKeySetup {
                    key_id: clear_key.key_id.clone(),
                    key: clear_key.key.clone(),
                },
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::decode::decode_content;
    use serde_json::json;

    #[test]
    fn test_serializes_to_the_playback_surface_shape() {
        let descriptor =
            decode_content("aHR0cHM6Ly9leC5jb20vbWFuaWZlc3QubXBk&key=a2V5MQ==&key2=a2V5Mg==")
                .unwrap();
        let setup = PlayerSetup::from_descriptor(&descriptor);
        let value = serde_json::to_value(&setup).unwrap();
        assert_eq!(
            value,
            json!({
                "file": "https://ex.com/manifest.mpd",
                "type": "dash",
                "drm": {"clearkey": {"keyId": "key1", "key": "key2"}}
            })
        );
    }

    #[test]
    fn test_unencrypted_stream_has_no_drm_field() {
        let descriptor = decode_content("https://ex.com/live.m3u8").unwrap();
        let setup = PlayerSetup::from_descriptor(&descriptor);
        let value = serde_json::to_value(&setup).unwrap();
        assert_eq!(value, json!({"file": "https://ex.com/live.m3u8", "type": "hls"}));
    }
}
