//! Persistence layer over the key-value store.
//!
//! # Responsibility
//! - Provide typed, defaulted access to the `savedWords`, `saveSettings` and
//!   `exportHistory` keys.
//! - Run every read-modify-write as one serialized, atomic transform.
//!
//! # Invariants
//! - `savedWords` is always stored as an ordered list of entries.
//! - Whole keys are written back; there are no partial field updates.

pub mod storage;
pub mod word_store;
