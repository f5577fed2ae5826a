use std::fmt;

use nostr_sdk::prelude::*;
use tracing::debug;

/// Nostr kind for plain text notes (NIP-01). Stream notes are published as
/// ordinary text notes.
pub const KIND_TEXT_NOTE: u16 = 1;

/// Crate-owned view of a relay event. Only the fields the resolver consumes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NoteEvent {
    pub id: String,
    pub content: String,
}

impl NoteEvent {
    pub fn from_event(event: &Event) -> Self {
        Self {
            id: event.id.to_string(),
            content: event.content.clone(),
        }
    }
}

/// The resolved id a stream note is queried by.
///
/// Accepts NIP-19 `note1...` ids, `nevent1...` pointers, and raw hex ids.
/// A token that decodes as none of these is carried verbatim: the relay
/// simply matches nothing for it, which the session reports as not found.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NoteReference(String);

impl NoteReference {
    pub fn resolve(token: &str) -> Self {
        if let Ok(id) = EventId::from_bech32(token) {
            return Self(id.to_hex());
        }
        if let Ok(pointer) = Nip19Event::from_bech32(token) {
            return Self(pointer.event_id.to_hex());
        }
        if let Ok(id) = EventId::from_hex(token) {
            return Self(id.to_hex());
        }
        debug!(token, "token is not a decodable note id, using it verbatim");
        Self(token.to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// The typed event id, when the reference holds a valid one.
    pub fn event_id(&self) -> Option<EventId> {
        EventId::from_hex(&self.0).ok()
    }
}

impl fmt::Display for NoteReference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
