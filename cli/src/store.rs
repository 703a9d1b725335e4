//! JSON Ledger Store
//!
//! Owns the on-disk format: a pretty-printed JSON envelope holding the
//! ledger snapshot and its integrity hash. The hash is verified before any
//! entry is replayed, so a truncated or hand-edited file is rejected up
//! front instead of producing corrupt balances.

use serde::{Deserialize, Serialize};
use splitledger_core::{
    compute_snapshot_hash, restore_ledger, Ledger, LedgerSnapshot, SnapshotError,
};
use std::fs;
use std::path::Path;
use thiserror::Error;

/// Errors raised by the file store
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Malformed snapshot file: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Snapshot error: {0}")]
    Snapshot(#[from] SnapshotError),
}

/// On-disk envelope: integrity hash + snapshot
#[derive(Debug, Serialize, Deserialize)]
struct SnapshotFile {
    integrity_hash: String,
    ledger: LedgerSnapshot,
}

/// Serialize the ledger to `path`
pub fn save(path: &Path, ledger: &Ledger) -> Result<(), StoreError> {
    let snapshot = LedgerSnapshot::from(ledger);
    let file = SnapshotFile {
        integrity_hash: compute_snapshot_hash(&snapshot)?,
        ledger: snapshot,
    };
    fs::write(path, serde_json::to_string_pretty(&file)?)?;
    Ok(())
}

/// Load and fully re-validate a ledger from `path`
///
/// Balances are not stored; the returned ledger recomputes them from the
/// replayed entry history.
pub fn load(path: &Path) -> Result<Ledger, StoreError> {
    let raw = fs::read_to_string(path)?;
    let file: SnapshotFile = serde_json::from_str(&raw)?;

    let computed = compute_snapshot_hash(&file.ledger)?;
    if computed != file.integrity_hash {
        return Err(SnapshotError::HashMismatch {
            expected: file.integrity_hash,
            computed,
        }
        .into());
    }

    Ok(restore_ledger(&file.ledger)?)
}
