//! Seat discovery and credential loading from the seats directory.
//!
//! Every call goes back to disk: auth files are refreshed externally and
//! must never be served stale.

use std::path::{Path, PathBuf};

use thiserror::Error;
use tracing::{debug, warn};

use super::types::{AuthRecord, SeatMeta};

/// Errors from the seat credential store
#[derive(Debug, Error)]
pub enum SeatError {
    /// Seat id is empty or could escape the seats directory
    #[error("Invalid seat id")]
    InvalidSeatId,

    /// The seats directory is missing or not readable
    #[error(
        "SEATS_DIRECTORY \"{}\" does not exist or is not readable. \
         Create the directory and add auth JSON files, or update SEATS_DIRECTORY.",
        path.display()
    )]
    DirectoryUnreadable { path: PathBuf },

    /// Reading a file failed
    #[error("Failed to read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The auth file is not valid JSON of the expected shape
    #[error("Failed to parse {}: {source}", path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

/// Resolve a seat id to its auth file, refusing anything outside `seats_dir`
pub fn seat_auth_path(seats_dir: &Path, seat_id: &str) -> Result<PathBuf, SeatError> {
    if seat_id.is_empty()
        || seat_id.contains('/')
        || seat_id.contains('\\')
        || seat_id.contains("..")
        || seat_id.contains('\0')
    {
        return Err(SeatError::InvalidSeatId);
    }

    let base = absolute_dir(seats_dir);
    let candidate = base.join(format!("{}.json", seat_id));
    if candidate.parent() != Some(base.as_path()) {
        return Err(SeatError::InvalidSeatId);
    }
    Ok(candidate)
}

fn absolute_dir(dir: &Path) -> PathBuf {
    std::path::absolute(dir).unwrap_or_else(|_| dir.to_path_buf())
}

/// List all seats in the directory with their safe metadata, sorted by id.
///
/// Only regular `*.json` files are considered. A file that fails to parse
/// still yields an entry, carrying the parse error.
pub async fn list_seats(seats_dir: &Path) -> Result<Vec<SeatMeta>, SeatError> {
    let base = absolute_dir(seats_dir);
    let mut entries = tokio::fs::read_dir(&base)
        .await
        .map_err(|_| SeatError::DirectoryUnreadable { path: base.clone() })?;

    let mut seats = Vec::new();
    loop {
        let entry = match entries.next_entry().await {
            Ok(Some(entry)) => entry,
            Ok(None) => break,
            Err(source) => {
                return Err(SeatError::Io {
                    path: base.clone(),
                    source,
                })
            }
        };

        let path = entry.path();
        let is_file = entry
            .file_type()
            .await
            .map(|ft| ft.is_file())
            .unwrap_or(false);
        if !is_file || path.extension().and_then(|ext| ext.to_str()) != Some("json") {
            continue;
        }
        let Some(id) = path.file_stem().and_then(|stem| stem.to_str()) else {
            continue;
        };
        let id = id.to_string();

        match read_auth_file(&path).await {
            Ok(auth) => seats.push(SeatMeta {
                id,
                auth_mode: auth.auth_mode,
                last_refresh: auth.last_refresh,
                error: None,
            }),
            Err(e) => {
                warn!("Failed to read seat {} from {}: {}", id, path.display(), e);
                let reason = match &e {
                    SeatError::Parse { source, .. } => source.to_string(),
                    SeatError::Io { source, .. } => source.to_string(),
                    other => other.to_string(),
                };
                seats.push(SeatMeta {
                    id,
                    auth_mode: None,
                    last_refresh: None,
                    error: Some(format!("Failed to parse: {}", reason)),
                });
            }
        }
    }

    // Case-insensitive first, byte order breaks ties
    seats.sort_by(|a, b| {
        a.id.to_lowercase()
            .cmp(&b.id.to_lowercase())
            .then_with(|| a.id.cmp(&b.id))
    });
    debug!("Listed {} seats from {}", seats.len(), base.display());
    Ok(seats)
}

/// Load a seat's auth record (including tokens)
pub async fn load_seat_auth(seats_dir: &Path, seat_id: &str) -> Result<AuthRecord, SeatError> {
    let path = seat_auth_path(seats_dir, seat_id)?;
    read_auth_file(&path).await
}

async fn read_auth_file(path: &Path) -> Result<AuthRecord, SeatError> {
    let raw = tokio::fs::read_to_string(path)
        .await
        .map_err(|source| SeatError::Io {
            path: path.to_path_buf(),
            source,
        })?;
    serde_json::from_str(&raw).map_err(|source| SeatError::Parse {
        path: path.to_path_buf(),
        source,
    })
}
