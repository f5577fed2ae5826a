//! Resolve decentralized stream notes into playable stream descriptors.
//!
//! A channel name or note id is resolved against a static channel
//! directory, the referenced text note is fetched from a single Nostr
//! relay, and the note's content is decoded into a player setup: a manifest
//! URL plus optional clearkey material.
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────────┐
//! │                      STREAM-RESOLVER                          │
//! │                                                               │
//! │  navigation token                                             │
//! │        │                                                      │
//! │        ▼                                                      │
//! │  ┌──────────────┐    ┌───────────────┐    ┌───────────────┐   │
//! │  │ Channel      │    │ StreamSession │    │ RelayTransport│   │
//! │  │ Directory    │───▶│ (orchestrator)│───▶│ (NostrRelay)  │   │
//! │  └──────────────┘    └───────┬───────┘    └───────┬───────┘   │
//! │                              │                    │           │
//! │                       decode_content        Nostr relay       │
//! │                              │                                │
//! │                              ▼                                │
//! │                        PlayerSetup ──▶ playback surface       │
//! └──────────────────────────────────────────────────────────────┘
//! ```
//!
//! # Note payload format
//!
//! A stream note's content is either a plain `https://` manifest URL, or a
//! composite string: the base64-encoded URL, then optional `&key=` /
//! `&key2=` parts carrying base64 clearkey material. See
//! [`decode_content`].
//!
//! # Example
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use stream_resolver::{ChannelDirectory, NostrRelay, RelayConfig, StreamSession};
//!
//! let directory = ChannelDirectory::from_json(r#"{"channels": []}"#)?;
//! let relay = Arc::new(NostrRelay::new(RelayConfig::default()));
//! let session = StreamSession::new(relay, directory);
//!
//! let mut setup = session.setup();
//! session.navigate("news").await;
//! if let Some(setup) = setup.borrow().as_ref() {
//!     println!("{}", serde_json::to_string(setup)?);
//! }
//! ```

mod config;
mod decode;
mod directory;
mod error;
mod events;
mod player;
mod relay;
mod session;

pub use config::{RelayConfig, DEFAULT_RELAY_URL};
pub use decode::{decode_content, ClearKey, StreamDescriptor, StreamKind};
pub use directory::{ChannelDirectory, ChannelEntry, FALLBACK_TITLE};
pub use error::Error;
pub use events::{NoteEvent, NoteReference, KIND_TEXT_NOTE};
pub use player::{ClearKeySetup, DrmSetup, PlayerSetup};
pub use relay::{NostrRelay, RelayStatus, RelayTransport};
pub use session::{
    StreamSession, STATUS_DECODED, STATUS_FETCH_FAILED, STATUS_MALFORMED, STATUS_NOT_FOUND,
};

/// Crate version.
pub fn version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
