use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use tokio::sync::{watch, Mutex};
use tracing::{debug, info, warn};

use crate::decode::{decode_content, StreamDescriptor};
use crate::directory::ChannelDirectory;
use crate::events::{NoteEvent, NoteReference};
use crate::player::PlayerSetup;
use crate::relay::{RelayStatus, RelayTransport};
use crate::Error;

pub const STATUS_DECODED: &str = "stream url found and decoded";
pub const STATUS_NOT_FOUND: &str = "stream note not found";
pub const STATUS_FETCH_FAILED: &str = "error fetching stream note";
pub const STATUS_MALFORMED: &str = "stream note payload is malformed";

/// Orchestrates one resolution at a time: directory lookup, reference
/// decoding, relay connect, note fetch, payload decode, and publication of
/// the result to the consuming surface.
///
/// Three observable axes, each a watch channel: the relay connection status,
/// a free-text publication status, and the resolved player setup. Every
/// library error is converted into status text here; nothing escapes to the
/// playback surface as a failure value.
///
/// At most one resolution runs per (connection, reference) pair. A
/// `navigate` call that changes the reference supersedes any resolution
/// still in flight: the old result is discarded on arrival, never applied
/// over the newer one.
pub struct StreamSession {
    relay: Arc<dyn RelayTransport>,
    directory: ChannelDirectory,
    generation: AtomicU64,
    resolved: Mutex<Option<String>>,
    publication: watch::Sender<String>,
    setup: watch::Sender<Option<PlayerSetup>>,
}

impl StreamSession {
    pub fn new(relay: Arc<dyn RelayTransport>, directory: ChannelDirectory) -> Self {
        let (publication, _) = watch::channel(String::new());
        let (setup, _) = watch::channel(None);
        Self {
            relay,
            directory,
            generation: AtomicU64::new(0),
            resolved: Mutex::new(None),
            publication,
            setup,
        }
    }

    pub fn relay_status(&self) -> watch::Receiver<RelayStatus> {
        self.relay.subscribe_status()
    }

    pub fn publication(&self) -> watch::Receiver<String> {
        self.publication.subscribe()
    }

    pub fn setup(&self) -> watch::Receiver<Option<PlayerSetup>> {
        self.setup.subscribe()
    }

    /// React to a navigation token: resolve it and publish the outcome.
    ///
    /// The relay connection is established on first use, with a single
    /// attempt; if it fails, the status channel carries the terminal
    /// "connection error" state and no query is issued.
    pub async fn navigate(&self, token: &str) {
        let channel = self.directory.resolve(token);
        let reference = NoteReference::resolve(&channel.note_id);
        info!(token, title = %channel.title, reference = %reference, "resolving stream");

        if !self.relay.status().is_connected() {
            match self.relay.connect().await {
                Ok(()) => {
                    // Fresh connection: previous resolutions no longer bind.
                    self.resolved.lock().await.take();
                }
                Err(err) => {
                    warn!(error = %err, "relay connection failed, no query issued");
                    return;
                }
            }
        }

        {
            let mut resolved = self.resolved.lock().await;
            if resolved.as_deref() == Some(reference.as_str()) {
                debug!(reference = %reference, "already resolved on this connection");
                return;
            }
            *resolved = Some(reference.as_str().to_string());
        }

        let generation = self.generation.fetch_add(1, Ordering::SeqCst) + 1;
        let result = self.relay.fetch_notes(&reference).await;

        if self.generation.load(Ordering::SeqCst) != generation {
            debug!(reference = %reference, "discarding stale resolution result");
            return;
        }

        self.publish(result);
    }

    /// The playback surface reports runtime failures back through here.
    pub fn report_playback_error(&self, message: &str) {
        self.publication
            .send_replace(format!("playback error: {message}"));
    }

    /// Tear down the relay connection. Dropping the session without calling
    /// this closes the transport with it.
    pub async fn close(&self) {
        self.relay.disconnect().await;
    }

    fn publish(&self, result: Result<Vec<NoteEvent>, Error>) {
        match result.and_then(first_descriptor) {
            Ok(descriptor) => {
                info!(url = %descriptor.url, kind = ?descriptor.kind, "stream descriptor published");
                self.setup
                    .send_replace(Some(PlayerSetup::from_descriptor(&descriptor)));
                self.publication.send_replace(STATUS_DECODED.to_string());
            }
            Err(err) => {
                let status = match &err {
                    Error::NotFound => STATUS_NOT_FOUND,
                    err if err.is_malformed_payload() => STATUS_MALFORMED,
                    _ => STATUS_FETCH_FAILED,
                };
                if !matches!(err, Error::NotFound) {
                    warn!(error = %err, "stream resolution failed");
                }
                self.setup.send_replace(None);
                self.publication.send_replace(status.to_string());
            }
        }
    }
}

fn first_descriptor(notes: Vec<NoteEvent>) -> Result<StreamDescriptor, Error> {
    let note = notes.first().ok_or(Error::NotFound)?;
    if notes.len() > 1 {
        // More than one event matched the id filter: the first one wins.
        debug!(count = notes.len(), "multiple notes matched, using the first");
    }
    decode_content(&note.content)
}
