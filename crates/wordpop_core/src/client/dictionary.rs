//! Client for the local dictionary lookup service.

use crate::model::definition::{DefinitionEnvelope, DefinitionRecord};
use log::{info, warn};
use percent_encoding::{utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};
use reqwest::blocking::Client;
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::time::Duration;

/// Characters left unescaped in a query component, as `encodeURIComponent`
/// leaves them.
const QUERY_COMPONENT: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'!')
    .remove(b'~')
    .remove(b'*')
    .remove(b'\'')
    .remove(b'(')
    .remove(b')');

/// Word lookup contract.
pub trait DictionaryService: Send + Sync {
    fn lookup(&self, word: &str) -> Result<DefinitionRecord, DictionaryError>;
}

#[derive(Debug)]
pub enum DictionaryError {
    /// Connection, DNS, timeout or body read failure.
    Transport(reqwest::Error),
    /// Non-2xx answer; `body` is the plain-text detail.
    Status { status: u16, body: String },
    /// 2xx answer whose body is not `{message: ...}` JSON.
    Decode(serde_json::Error),
}

impl Display for DictionaryError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Transport(err) => write!(f, "{err}"),
            Self::Status { status, body } => write!(f, "API error {status}: {body}"),
            Self::Decode(err) => write!(f, "invalid dictionary response: {err}"),
        }
    }
}

impl Error for DictionaryError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Transport(err) => Some(err),
            Self::Status { .. } => None,
            Self::Decode(err) => Some(err),
        }
    }
}

/// Blocking HTTP implementation of [`DictionaryService`].
pub struct HttpDictionaryClient {
    client: Client,
    base_url: String,
}

impl HttpDictionaryClient {
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Result<Self, DictionaryError> {
        let base_url = base_url.into();
        let mut builder = Client::builder().timeout(timeout);
        if base_url.starts_with("http://127.0.0.1") || base_url.starts_with("http://localhost") {
            builder = builder.no_proxy();
        }
        let client = builder.build().map_err(DictionaryError::Transport)?;
        Ok(Self { client, base_url })
    }

    /// Full lookup URL for `word`.
    pub fn lookup_url(&self, word: &str) -> String {
        lookup_url(&self.base_url, word)
    }
}

impl DictionaryService for HttpDictionaryClient {
    fn lookup(&self, word: &str) -> Result<DefinitionRecord, DictionaryError> {
        let url = self.lookup_url(word);
        let response = self
            .client
            .get(url)
            .send()
            .map_err(DictionaryError::Transport)?;
        let status = response.status();
        let body = response.text().map_err(DictionaryError::Transport)?;

        if !status.is_success() {
            warn!(
                "event=dictionary_lookup module=client status=error http_status={}",
                status.as_u16()
            );
            return Err(DictionaryError::Status {
                status: status.as_u16(),
                body,
            });
        }

        let record = parse_definition_body(&body)?;
        info!("event=dictionary_lookup module=client status=ok empty={}", record.is_empty());
        Ok(record)
    }
}

/// Builds `{base}/get?word=<percent-encoded word>`.
pub fn lookup_url(base_url: &str, word: &str) -> String {
    format!(
        "{}/get?word={}",
        base_url.trim_end_matches('/'),
        utf8_percent_encode(word, QUERY_COMPONENT)
    )
}

/// Decodes a successful lookup body.
pub fn parse_definition_body(body: &str) -> Result<DefinitionRecord, DictionaryError> {
    let envelope: DefinitionEnvelope =
        serde_json::from_str(body).map_err(DictionaryError::Decode)?;
    Ok(envelope.message)
}
