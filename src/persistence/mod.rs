//! Save/load persistence with integrity checks
//!
//! Features:
//! - Versioned JSON envelope
//! - Structural validation of the restored state
//! - Corruption detection (the caller starts fresh instead)

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::platform::{KeyValueStore, StorageError};
use crate::sim::GameState;

/// Bump when `GameState` changes shape
pub const SAVE_VERSION: u32 = 1;
/// Storage key for the in-progress run
pub const SAVE_KEY: &str = "hexa_rush_save";

/// Why a save could not be written or restored
#[derive(Debug)]
pub enum PersistenceError {
    Encode(serde_json::Error),
    Decode(serde_json::Error),
    Version { found: u32, expected: u32 },
    Invalid(&'static str),
    Storage(StorageError),
}

impl fmt::Display for PersistenceError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PersistenceError::Encode(e) => write!(f, "failed to encode save: {e}"),
            PersistenceError::Decode(e) => write!(f, "corrupted save: {e}"),
            PersistenceError::Version { found, expected } => {
                write!(f, "save version {found} is not supported (expected {expected})")
            }
            PersistenceError::Invalid(reason) => write!(f, "invalid save: {reason}"),
            PersistenceError::Storage(e) => write!(f, "{e}"),
        }
    }
}

impl std::error::Error for PersistenceError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            PersistenceError::Encode(e) | PersistenceError::Decode(e) => Some(e),
            PersistenceError::Storage(e) => Some(e),
            _ => None,
        }
    }
}

impl From<StorageError> for PersistenceError {
    fn from(e: StorageError) -> Self {
        PersistenceError::Storage(e)
    }
}

#[derive(Serialize)]
struct SaveEnvelopeRef<'a> {
    version: u32,
    saved_at_ms: f64,
    state: &'a GameState,
}

/// Header read first so a version mismatch is reported as such, not as a
/// decode error
#[derive(Deserialize)]
struct SaveHeader {
    version: u32,
}

/// A decoded save
#[derive(Debug, Deserialize)]
pub struct SaveEnvelope {
    pub version: u32,
    pub saved_at_ms: f64,
    pub state: GameState,
}

/// Serialize a state into a save envelope
pub fn encode(state: &GameState, saved_at_ms: f64) -> Result<String, PersistenceError> {
    serde_json::to_string(&SaveEnvelopeRef {
        version: SAVE_VERSION,
        saved_at_ms,
        state,
    })
    .map_err(PersistenceError::Encode)
}

/// Parse and validate a save envelope
pub fn decode(json: &str) -> Result<SaveEnvelope, PersistenceError> {
    let header: SaveHeader = serde_json::from_str(json).map_err(PersistenceError::Decode)?;
    if header.version != SAVE_VERSION {
        return Err(PersistenceError::Version {
            found: header.version,
            expected: SAVE_VERSION,
        });
    }

    let envelope: SaveEnvelope = serde_json::from_str(json).map_err(PersistenceError::Decode)?;
    envelope.state.validate().map_err(PersistenceError::Invalid)?;
    Ok(envelope)
}

/// Write the run to storage
pub fn save<S: KeyValueStore + ?Sized>(
    store: &mut S,
    state: &GameState,
    saved_at_ms: f64,
) -> Result<(), PersistenceError> {
    let json = encode(state, saved_at_ms)?;
    store.set(SAVE_KEY, &json)?;
    log::info!("Game saved at {:.1}s", state.elapsed);
    Ok(())
}

/// Read the saved run, if there is one
pub fn load<S: KeyValueStore + ?Sized>(store: &S) -> Result<Option<SaveEnvelope>, PersistenceError> {
    match store.get(SAVE_KEY)? {
        Some(json) => decode(&json).map(Some),
        None => Ok(None),
    }
}

/// Remove the saved run
pub fn clear<S: KeyValueStore + ?Sized>(store: &mut S) -> Result<(), PersistenceError> {
    store.remove(SAVE_KEY)?;
    log::info!("Saved game cleared");
    Ok(())
}
