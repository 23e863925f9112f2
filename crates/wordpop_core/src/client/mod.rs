//! HTTP clients for the dictionary service and the chat-completion API.
//!
//! # Responsibility
//! - Keep request shapes, status handling and payload decoding in one place.
//! - Expose trait seams (`DictionaryService`, `LanguageModel`) so callers can
//!   run without network access.
//!
//! # Invariants
//! - No call is retried; the only timeout is the configured transport one.

pub mod chat;
pub mod dictionary;
pub mod translation;
