//! Background message router.
//!
//! # Responsibility
//! - Accept `getDefinition`, `saveWord` and `saveEntry` messages from the
//!   popup context and answer with a `{success, data | error}` envelope.
//! - Route definitions to the dictionary client and saves to the word store.
//!
//! # Invariants
//! - Every request yields exactly one response; failures never escape as
//!   panics or transport errors.
//! - Both save actions write the canonical `savedWords` list and reject
//!   duplicate words.

use crate::client::dictionary::DictionaryService;
use crate::model::definition::DefinitionEnvelope;
use crate::model::saved_word::SavedWordEntry;
use crate::repo::word_store::{SaveError, WordStore};
use log::{info, warn};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

mod background;

pub use background::{BackgroundHost, PendingReply};

/// User-facing text for a duplicate save.
pub const ALREADY_SAVED: &str = "Already saved!";

/// Message sent from the popup context.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "action")]
pub enum RouterRequest {
    #[serde(rename = "getDefinition")]
    GetDefinition { word: String },
    /// Bare `word -> translation` save.
    #[serde(rename = "saveWord")]
    SaveWord {
        word: String,
        #[serde(default)]
        translation: String,
    },
    /// Fully built entry from the popup save flow.
    #[serde(rename = "saveEntry")]
    SaveEntry { entry: SavedWordEntry },
}

impl RouterRequest {
    pub fn action(&self) -> &'static str {
        match self {
            Self::GetDefinition { .. } => "getDefinition",
            Self::SaveWord { .. } => "saveWord",
            Self::SaveEntry { .. } => "saveEntry",
        }
    }
}

/// Response envelope. `data` is only set for successful definition lookups.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RouterResponse {
    pub success: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<DefinitionEnvelope>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl RouterResponse {
    pub fn ok() -> Self {
        Self {
            success: true,
            data: None,
            error: None,
        }
    }

    pub fn with_data(data: DefinitionEnvelope) -> Self {
        Self {
            success: true,
            data: Some(data),
            error: None,
        }
    }

    pub fn failure(error: impl Into<String>) -> Self {
        Self {
            success: false,
            data: None,
            error: Some(error.into()),
        }
    }

    /// The error text, or `Unknown error` for a failure without one.
    pub fn error_text(&self) -> &str {
        self.error.as_deref().unwrap_or("Unknown error")
    }
}

/// Requester side of the message channel.
pub trait MessageChannel: Send + Sync {
    fn request(&self, request: RouterRequest) -> RouterResponse;
}

/// Dispatches requests to the dictionary client and the word store.
#[derive(Clone)]
pub struct MessageRouter {
    dictionary: Arc<dyn DictionaryService>,
    words: WordStore,
}

impl MessageRouter {
    pub fn new(dictionary: Arc<dyn DictionaryService>, words: WordStore) -> Self {
        Self { dictionary, words }
    }

    pub fn dispatch(&self, request: RouterRequest) -> RouterResponse {
        let action = request.action();
        let response = match request {
            RouterRequest::GetDefinition { word } => self.get_definition(&word),
            RouterRequest::SaveWord { word, translation } => {
                self.save(SavedWordEntry::from_translation(word, translation))
            }
            RouterRequest::SaveEntry { entry } => self.save(entry),
        };
        info!(
            "event=router_dispatch module=router action={} status={}",
            action,
            if response.success { "ok" } else { "error" }
        );
        response
    }

    /// Decodes one JSON message, dispatches it and encodes the reply.
    ///
    /// Malformed messages get a failure envelope rather than an error.
    pub fn dispatch_json(&self, raw: &str) -> String {
        let response = match serde_json::from_str::<RouterRequest>(raw) {
            Ok(request) => self.dispatch(request),
            Err(err) => {
                warn!("event=router_decode module=router status=error error={err}");
                RouterResponse::failure(format!("invalid message: {err}"))
            }
        };
        encode_response(&response)
    }

    fn get_definition(&self, word: &str) -> RouterResponse {
        match self.dictionary.lookup(word) {
            Ok(message) => RouterResponse::with_data(DefinitionEnvelope { message }),
            Err(err) => RouterResponse::failure(err.to_string()),
        }
    }

    fn save(&self, entry: SavedWordEntry) -> RouterResponse {
        match self.words.insert_unique(entry) {
            Ok(()) => RouterResponse::ok(),
            Err(SaveError::AlreadySaved(_)) => RouterResponse::failure(ALREADY_SAVED),
            Err(err) => RouterResponse::failure(err.to_string()),
        }
    }
}

impl MessageChannel for MessageRouter {
    fn request(&self, request: RouterRequest) -> RouterResponse {
        self.dispatch(request)
    }
}

fn encode_response(response: &RouterResponse) -> String {
    serde_json::to_string(response).unwrap_or_else(|err| {
        format!(r#"{{"success":false,"error":"failed to encode response: {err}"}}"#)
    })
}
