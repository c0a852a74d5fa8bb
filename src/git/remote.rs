//! Remote selection

use crate::error::{Error, Result};
use crate::types::GitRemote;

/// Pick the remote to query
///
/// An explicitly requested remote must exist. Otherwise `origin` wins,
/// falling back to the first configured remote.
pub fn select_remote(remotes: &[GitRemote], requested: Option<&str>) -> Result<String> {
    if let Some(name) = requested {
        return remotes
            .iter()
            .find(|r| r.name == name)
            .map(|r| r.name.clone())
            .ok_or_else(|| Error::RemoteNotFound(name.to_string()));
    }

    remotes
        .iter()
        .find(|r| r.name == "origin")
        .or_else(|| remotes.first())
        .map(|r| r.name.clone())
        .ok_or(Error::NoSupportedRemotes)
}
