use std::time::Duration;

use stream_resolver::{NostrRelay, NoteReference, RelayConfig, RelayStatus, RelayTransport};

#[tokio::test]
#[ignore]
async fn connect_and_fetch_live_note() {
    let relay_url = std::env::var("NOSTR_TEST_RELAY").expect("NOSTR_TEST_RELAY missing");
    let note_id = std::env::var("NOSTR_TEST_NOTE_ID").expect("NOSTR_TEST_NOTE_ID missing");

    let mut config = RelayConfig::new(relay_url);
    config.timeout = Duration::from_secs(10);

    let relay = NostrRelay::new(config);
    relay.connect().await.unwrap();
    assert_eq!(relay.status(), RelayStatus::Connected);

    let reference = NoteReference::resolve(&note_id);
    let notes = relay.fetch_notes(&reference).await.unwrap();
    assert!(!notes.is_empty());

    relay.disconnect().await;
    assert_eq!(relay.status(), RelayStatus::Disconnected);
}
