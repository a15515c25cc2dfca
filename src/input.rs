use std::fs;
use std::path::Path;

use serde_json::Value;
use tracing::info;

use crate::error::{Result, SyncError};
use crate::types::RawRelease;

/// Loads pre-fetched releases from disk instead of the live API.
///
/// Accepts either a full Discogs page payload carrying a `releases` array
/// or a bare release list; any other shape is rejected before the records
/// reach normalization.
pub fn load_releases_from_json(path: &Path) -> Result<Vec<RawRelease>> {
    let contents = fs::read_to_string(path)?;
    let data: Value = serde_json::from_str(&contents)?;

    let releases = match data {
        Value::Object(mut payload) => match payload.remove("releases") {
            Some(Value::Array(releases)) => releases,
            _ => {
                return Err(SyncError::Config(
                    "unsupported JSON structure: expected a release list or a payload with releases"
                        .to_string(),
                ))
            }
        },
        Value::Array(releases) => releases,
        _ => {
            return Err(SyncError::Config(
                "unsupported JSON structure: expected a release list or a payload with releases"
                    .to_string(),
            ))
        }
    };

    info!(releases = releases.len(), path = %path.display(), "loaded local releases");
    Ok(releases)
}
