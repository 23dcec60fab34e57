//! # Run History Store
//!
//! Durable mapping from run key (the RFC 3339 start time) to an encoded
//! [`RunResult`], kept in a single sled tree inside one database directory.
//!
//! sled serializes writers and lets readers proceed without locking, so a
//! reader sees either the previous value for a key or the new one, never a
//! partially written record. Only one process may hold the database open at a
//! time; a second `open` fails with a [`StatsError::Store`] error, which callers
//! can retry with their own backoff.

use crate::{
    defaults,
    error::{Result, StatsError},
    results::RunResult,
};
use sled::transaction::{ConflictableTransactionError, TransactionError};
use std::path::Path;
use tracing::{debug, info};

/// Stored run history.
#[derive(Clone)]
pub struct ResultStore {
    db: sled::Db,
    tree: sled::Tree,
}

impl ResultStore {
    /// Open (or create) the store at `path` using the default bucket.
    pub fn open(path: &Path) -> Result<Self> {
        Self::open_bucket(path, defaults::BUCKET)
    }

    /// Open (or create) the store at `path`, keeping results in `bucket`.
    pub fn open_bucket(path: &Path, bucket: &str) -> Result<Self> {
        let db = sled::open(path)?;
        let tree = db.open_tree(bucket)?;
        debug!("Opened result store {:?} (bucket '{}')", path, bucket);
        Ok(Self { db, tree })
    }

    /// Insert or overwrite the result stored under `result.key()`.
    ///
    /// The write happens inside a transaction; if it fails, the previous value
    /// for the key is left untouched.
    pub fn upsert(&self, result: &RunResult) -> Result<()> {
        let key = result.key();
        let value = result.encode()?;

        self.tree
            .transaction(|tx| {
                tx.insert(key.as_bytes(), value.as_slice())?;
                Ok::<_, ConflictableTransactionError<StatsError>>(())
            })
            .map_err(|e| match e {
                TransactionError::Abort(err) => err,
                TransactionError::Storage(err) => StatsError::Store(err),
            })?;
        self.tree.flush()?;

        info!("Saved run {} ({} bytes)", key, value.len());
        Ok(())
    }

    /// Fetch and decode the run stored under `key`.
    pub fn get(&self, key: &str) -> Result<RunResult> {
        let bytes = self
            .tree
            .get(key.as_bytes())?
            .ok_or_else(|| StatsError::NotFound(key.to_string()))?;
        RunResult::decode(&bytes)
    }

    /// Every stored key in ascending order, which for RFC 3339 keys is chronological.
    pub fn list_keys(&self) -> Result<Vec<String>> {
        self.tree
            .iter()
            .keys()
            .map(|key| {
                let key = key?;
                String::from_utf8(key.to_vec())
                    .map_err(|e| StatsError::MalformedData(format!("non UTF-8 key: {}", e)))
            })
            .collect()
    }

    /// Number of stored runs.
    pub fn len(&self) -> usize {
        self.tree.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tree.is_empty()
    }

    /// Block until all pending writes are on disk.
    pub fn flush(&self) -> Result<()> {
        self.db.flush()?;
        Ok(())
    }
}
