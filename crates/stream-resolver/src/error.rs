use thiserror::Error;

use crate::relay::RelayStatus;

#[derive(Debug, Error)]
pub enum Error {
    #[error("nostr client error: {0}")]
    NostrClient(#[from] nostr_sdk::client::Error),
    #[error("relay connection failed: {0}")]
    Connection(String),
    #[error("stream note not found")]
    NotFound,
    #[error("serde json error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("base64 error: {0}")]
    Base64(#[from] base64::DecodeError),
    #[error("invalid utf8: {0}")]
    Utf8(#[from] std::string::FromUtf8Error),
    #[error("invalid stream url: {0}")]
    InvalidUrl(#[from] url::ParseError),
    #[error("clearkey part `{0}` present without its pair")]
    UnpairedClearKey(&'static str),
    #[error("query issued while relay is {0}")]
    NotConnected(RelayStatus),
}

impl Error {
    /// The payload-decode failure family. The orchestration layer reports
    /// all of these as one malformed-payload status.
    pub fn is_malformed_payload(&self) -> bool {
        matches!(
            self,
            Error::Base64(_) | Error::Utf8(_) | Error::InvalidUrl(_) | Error::UnpairedClearKey(_)
        )
    }
}
