//! Domain records shared by the router, popup and export flows.
//!
//! # Invariants
//! - `SavedWordEntry::word` is the unique key of the saved collection.
//! - Serialized field names match the persisted key-value layout.

pub mod definition;
pub mod history;
pub mod saved_word;
pub mod settings;
