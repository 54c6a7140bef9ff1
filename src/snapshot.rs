//! Persistence codec: the saved document mirrors `GameState` as JSON with
//! ISO-8601 timestamps. Loading deep-merges whatever was saved over full
//! defaults, so a partial or older document backfills instead of failing.

use std::fs;
use std::path::Path;

use chrono::{DateTime, Utc};
use serde_json::Value;
use thiserror::Error;

use crate::state::GameState;

#[derive(Debug, Error)]
pub enum SnapshotError {
    #[error("snapshot io: {0}")]
    Io(#[from] std::io::Error),
    #[error("snapshot encoding: {0}")]
    Encode(#[from] serde_json::Error),
}

pub fn save(state: &GameState, path: impl AsRef<Path>) -> Result<(), SnapshotError> {
    let data = serde_json::to_string_pretty(state)?;
    fs::write(path, data)?;
    Ok(())
}

pub fn load(path: impl AsRef<Path>) -> Result<GameState, SnapshotError> {
    let text = fs::read_to_string(path)?;
    let document: Value = serde_json::from_str(&text)?;
    Ok(merge_onto_defaults(document)?)
}

/// Missing or unreadable saves fall back to a fresh game; a save problem
/// is never fatal to the player.
pub fn load_or_default(path: impl AsRef<Path>, now: DateTime<Utc>) -> GameState {
    let path = path.as_ref();
    match load(path) {
        Ok(state) => state,
        Err(SnapshotError::Io(err)) if err.kind() == std::io::ErrorKind::NotFound => {
            GameState::new(now)
        }
        Err(err) => {
            tracing::warn!(path = %path.display(), %err, "discarding unreadable save");
            GameState::new(now)
        }
    }
}

/// Field-by-field merge of a (possibly partial) saved document over the
/// baseline defaults. Objects merge recursively; everything else,
/// arrays included, is taken wholesale from the saved side.
pub fn merge_onto_defaults(document: Value) -> Result<GameState, serde_json::Error> {
    let mut base = serde_json::to_value(GameState::default())?;
    merge(&mut base, document);
    let mut state: GameState = serde_json::from_value(base)?;
    state.plant.ensure_id_headroom();
    Ok(state)
}

fn merge(base: &mut Value, overlay: Value) {
    match (base, overlay) {
        (Value::Object(base_map), Value::Object(overlay_map)) => {
            for (key, value) in overlay_map {
                match base_map.get_mut(&key) {
                    Some(slot) => merge(slot, value),
                    None => {
                        base_map.insert(key, value);
                    }
                }
            }
        }
        (slot, value) => *slot = value,
    }
}
