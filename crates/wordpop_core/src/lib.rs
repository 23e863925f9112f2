//! Core logic for the Korean word popup.
//! Storage, lookup clients, message routing, the popup view-model and CSV
//! export live here; hosts only wire them together.

pub mod client;
pub mod config;
pub mod db;
pub mod hanja;
pub mod logging;
pub mod model;
pub mod popup;
pub mod repo;
pub mod router;
pub mod service;

pub use client::chat::{ChatCompletionClient, ChatError, LanguageModel};
pub use client::dictionary::{DictionaryError, DictionaryService, HttpDictionaryClient};
pub use client::translation::TranslationClient;
pub use config::{AppConfig, ConfigError};
pub use hanja::{hanja_chars, is_hanja};
pub use logging::{default_log_level, init_logging, logging_status};
pub use model::definition::{DefinitionEnvelope, DefinitionRecord};
pub use model::history::ExportHistoryEntry;
pub use model::saved_word::{HanjaMeaning, SavedWordEntry};
pub use model::settings::{parse_setting_field, SaveSettings, SettingField};
pub use popup::{PopupController, PopupView, SaveFeedback, Tab, Trigger};
pub use repo::storage::{StorageAccessor, StorageError, StorageResult};
pub use repo::word_store::{SaveError, WordStore};
pub use router::{BackgroundHost, MessageChannel, MessageRouter, RouterRequest, RouterResponse};
pub use service::export_service::{ExportController, ExportError, ExportFile};

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
