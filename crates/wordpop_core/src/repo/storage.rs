//! Key-value storage accessor.
//!
//! Values are JSON documents stored in the `kv_store` table. All access goes
//! through one connection behind a mutex, and every [`StorageAccessor::transform`]
//! runs inside an `IMMEDIATE` transaction, so two writers never interleave a
//! read-modify-write.

use crate::db::{open_db, open_db_in_memory, DbError};
use crate::model::history::ExportHistoryEntry;
use crate::model::saved_word::SavedWordEntry;
use crate::model::settings::SaveSettings;
use log::{info, warn};
use parking_lot::Mutex;
use rusqlite::{params, Connection, OptionalExtension, Transaction, TransactionBehavior};
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::marker::PhantomData;
use std::path::Path;

pub type StorageResult<T> = Result<T, StorageError>;

/// Typed name of one storage key.
pub struct StorageKey<T> {
    name: &'static str,
    _value: PhantomData<fn() -> T>,
}

impl<T> StorageKey<T> {
    pub const fn new(name: &'static str) -> Self {
        Self {
            name,
            _value: PhantomData,
        }
    }

    pub fn name(&self) -> &'static str {
        self.name
    }
}

/// Canonical list of saved vocabulary entries.
pub const SAVED_WORDS: StorageKey<Vec<SavedWordEntry>> = StorageKey::new("savedWords");
/// Save/display toggles.
pub const SAVE_SETTINGS: StorageKey<SaveSettings> = StorageKey::new("saveSettings");
/// Append-only export log.
pub const EXPORT_HISTORY: StorageKey<Vec<ExportHistoryEntry>> = StorageKey::new("exportHistory");

#[derive(Debug)]
pub enum StorageError {
    Db(DbError),
    Encode {
        key: &'static str,
        source: serde_json::Error,
    },
    Decode {
        key: &'static str,
        source: serde_json::Error,
    },
    /// The stored document has a shape this version refuses to interpret.
    UnexpectedShape {
        key: &'static str,
        found: &'static str,
    },
}

impl Display for StorageError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Db(err) => write!(f, "{err}"),
            Self::Encode { key, source } => write!(f, "failed to encode `{key}`: {source}"),
            Self::Decode { key, source } => write!(f, "failed to decode `{key}`: {source}"),
            Self::UnexpectedShape { key, found } => {
                write!(f, "unexpected stored shape for `{key}`: {found}")
            }
        }
    }
}

impl Error for StorageError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Db(err) => Some(err),
            Self::Encode { source, .. } | Self::Decode { source, .. } => Some(source),
            Self::UnexpectedShape { .. } => None,
        }
    }
}

impl From<DbError> for StorageError {
    fn from(value: DbError) -> Self {
        Self::Db(value)
    }
}

impl From<rusqlite::Error> for StorageError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Db(DbError::Sqlite(value))
    }
}

/// Shared handle to the key-value store.
pub struct StorageAccessor {
    conn: Mutex<Connection>,
}

impl StorageAccessor {
    /// Opens (or creates) the store file and migrates legacy data.
    pub fn open(path: impl AsRef<Path>) -> StorageResult<Self> {
        Self::from_connection(open_db(path)?)
    }

    /// Opens a private in-memory store.
    pub fn open_in_memory() -> StorageResult<Self> {
        Self::from_connection(open_db_in_memory()?)
    }

    fn from_connection(conn: Connection) -> StorageResult<Self> {
        let accessor = Self {
            conn: Mutex::new(conn),
        };
        accessor.migrate_legacy_saved_words()?;
        Ok(accessor)
    }

    /// Reads a key, falling back to the type default when absent.
    pub fn get<T>(&self, key: &StorageKey<T>) -> StorageResult<T>
    where
        T: DeserializeOwned + Default,
    {
        self.transform(|txn| txn.get(key))
    }

    /// Replaces a key wholesale.
    pub fn set<T: Serialize>(&self, key: &StorageKey<T>, value: &T) -> StorageResult<()> {
        self.transform(|txn| txn.set(key, value))
    }

    /// Runs `apply` as one atomic read-modify-write.
    ///
    /// Writes made through the [`StorageTxn`] are committed only when `apply`
    /// returns `Ok`; an `Err` rolls every write back.
    pub fn transform<R, E>(
        &self,
        apply: impl FnOnce(&mut StorageTxn<'_>) -> Result<R, E>,
    ) -> Result<R, E>
    where
        E: From<StorageError>,
    {
        let mut conn = self.conn.lock();
        let tx = conn
            .transaction_with_behavior(TransactionBehavior::Immediate)
            .map_err(StorageError::from)?;
        let mut txn = StorageTxn { tx };
        let result = apply(&mut txn)?;
        txn.tx.commit().map_err(StorageError::from)?;
        Ok(result)
    }

    /// Converts a legacy `word -> translation` map under `savedWords` into the
    /// canonical entry list.
    ///
    /// Returns the number of migrated entries. Shapes other than a list or a
    /// string-valued map are rejected.
    pub fn migrate_legacy_saved_words(&self) -> StorageResult<usize> {
        self.transform(|txn| {
            let Some(raw) = txn.get_raw(SAVED_WORDS.name())? else {
                return Ok(0);
            };
            let map = match raw {
                Value::Array(_) => return Ok(0),
                Value::Object(map) => map,
                other => {
                    warn!(
                        "event=storage_migrate module=storage status=error key=savedWords found={}",
                        json_kind(&other)
                    );
                    return Err(StorageError::UnexpectedShape {
                        key: SAVED_WORDS.name(),
                        found: json_kind(&other),
                    });
                }
            };

            let mut entries = Vec::with_capacity(map.len());
            for (word, translation) in map {
                let Value::String(translation) = translation else {
                    return Err(StorageError::UnexpectedShape {
                        key: SAVED_WORDS.name(),
                        found: "map with non-string values",
                    });
                };
                entries.push(SavedWordEntry::from_translation(word, translation));
            }

            txn.set(&SAVED_WORDS, &entries)?;
            info!(
                "event=storage_migrate module=storage status=ok key=savedWords migrated={}",
                entries.len()
            );
            Ok(entries.len())
        })
    }
}

/// View of the store inside one [`StorageAccessor::transform`] call.
pub struct StorageTxn<'conn> {
    tx: Transaction<'conn>,
}

impl StorageTxn<'_> {
    pub fn get<T>(&self, key: &StorageKey<T>) -> StorageResult<T>
    where
        T: DeserializeOwned + Default,
    {
        let Some(text) = self.get_text(key.name())? else {
            return Ok(T::default());
        };
        serde_json::from_str(&text).map_err(|source| StorageError::Decode {
            key: key.name(),
            source,
        })
    }

    pub fn set<T: Serialize>(&mut self, key: &StorageKey<T>, value: &T) -> StorageResult<()> {
        let text = serde_json::to_string(value).map_err(|source| StorageError::Encode {
            key: key.name(),
            source,
        })?;
        self.tx.execute(
            "INSERT INTO kv_store (key, value) VALUES (?1, ?2)
             ON CONFLICT(key) DO UPDATE SET
                value = excluded.value,
                updated_at = (strftime('%s', 'now') * 1000);",
            params![key.name(), text],
        )?;
        Ok(())
    }

    fn get_text(&self, name: &'static str) -> StorageResult<Option<String>> {
        let text = self
            .tx
            .query_row(
                "SELECT value FROM kv_store WHERE key = ?1;",
                [name],
                |row| row.get::<_, String>(0),
            )
            .optional()?;
        Ok(text)
    }

    fn get_raw(&self, name: &'static str) -> StorageResult<Option<Value>> {
        let Some(text) = self.get_text(name)? else {
            return Ok(None);
        };
        serde_json::from_str(&text)
            .map(Some)
            .map_err(|source| StorageError::Decode { key: name, source })
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "list",
        Value::Object(_) => "map",
    }
}
