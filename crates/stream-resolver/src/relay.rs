use std::fmt;

use async_trait::async_trait;
use nostr_sdk::prelude::*;
use tokio::sync::watch;
use tracing::{info, warn};

use crate::config::RelayConfig;
use crate::events::{NoteEvent, NoteReference, KIND_TEXT_NOTE};
use crate::Error;

/// Connection state of the single relay session.
///
/// `Failed` is the terminal error flavor of being disconnected: it renders
/// as "connection error" so the consuming surface can tell a failed attempt
/// apart from never having connected.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RelayStatus {
    Disconnected,
    Connecting,
    Connected,
    Failed,
}

impl RelayStatus {
    pub fn is_connected(&self) -> bool {
        matches!(self, RelayStatus::Connected)
    }
}

impl fmt::Display for RelayStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            RelayStatus::Disconnected => "disconnected",
            RelayStatus::Connecting => "connecting",
            RelayStatus::Connected => "connected",
            RelayStatus::Failed => "connection error",
        };
        f.write_str(label)
    }
}

/// Seam between the session and the wire. The session owns one transport
/// instance per resolution session; tests substitute their own.
#[async_trait]
pub trait RelayTransport: Send + Sync {
    /// Make exactly one connection attempt. No automatic retry.
    async fn connect(&self) -> Result<(), Error>;

    /// One-shot fetch of all text notes matching the reference. Resolves
    /// with the events currently known to the relay, then completes; it
    /// does not stay open for live updates. Precondition: `Connected`.
    async fn fetch_notes(&self, reference: &NoteReference) -> Result<Vec<NoteEvent>, Error>;

    fn status(&self) -> RelayStatus;

    fn subscribe_status(&self) -> watch::Receiver<RelayStatus>;

    async fn disconnect(&self);
}

/// Relay transport backed by a `nostr_sdk::Client` pointed at one endpoint.
pub struct NostrRelay {
    client: Client,
    config: RelayConfig,
    status: watch::Sender<RelayStatus>,
}

impl NostrRelay {
    pub fn new(config: RelayConfig) -> Self {
        let (status, _) = watch::channel(RelayStatus::Disconnected);
        Self {
            client: Client::default(),
            config,
            status,
        }
    }

    fn set_status(&self, status: RelayStatus) {
        self.status.send_replace(status);
    }
}

#[async_trait]
impl RelayTransport for NostrRelay {
    async fn connect(&self) -> Result<(), Error> {
        self.set_status(RelayStatus::Connecting);

        if let Err(err) = self.client.add_relay(&self.config.url).await {
            self.set_status(RelayStatus::Failed);
            return Err(err.into());
        }
        self.client.connect().await;

        let relay = match self.client.relay(&self.config.url).await {
            Ok(relay) => relay,
            Err(err) => {
                self.set_status(RelayStatus::Failed);
                return Err(err.into());
            }
        };

        relay.wait_for_connection(self.config.timeout).await;
        if relay.is_connected() {
            info!(relay = %self.config.url, "relay connected");
            self.set_status(RelayStatus::Connected);
            Ok(())
        } else {
            warn!(relay = %self.config.url, "relay did not acknowledge connection in time");
            self.set_status(RelayStatus::Failed);
            Err(Error::Connection(self.config.url.clone()))
        }
    }

    async fn fetch_notes(&self, reference: &NoteReference) -> Result<Vec<NoteEvent>, Error> {
        let status = self.status();
        if !status.is_connected() {
            return Err(Error::NotConnected(status));
        }

        // A reference that never decoded to a real event id cannot match
        // anything; an empty result set lets the session report not-found.
        let Some(id) = reference.event_id() else {
            warn!(reference = %reference, "reference is not a valid event id, skipping relay query");
            return Ok(Vec::new());
        };

        let filter = Filter::new().kind(Kind::from(KIND_TEXT_NOTE)).id(id);
        match self.client.fetch_events(filter, self.config.timeout).await {
            Ok(events) => {
                let notes: Vec<NoteEvent> = events.iter().map(NoteEvent::from_event).collect();
                info!(reference = %reference, count = notes.len(), "fetched stream notes");
                Ok(notes)
            }
            Err(err) => {
                self.set_status(RelayStatus::Failed);
                Err(err.into())
            }
        }
    }

    fn status(&self) -> RelayStatus {
        *self.status.borrow()
    }

    fn subscribe_status(&self) -> watch::Receiver<RelayStatus> {
        self.status.subscribe()
    }

    async fn disconnect(&self) {
        self.client.disconnect().await;
        self.set_status(RelayStatus::Disconnected);
    }
}
