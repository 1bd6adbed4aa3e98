//! Token file persistence
//!
//! The client only ever holds the token record in memory. Callers that want
//! tokens to survive a restart snapshot the record after use and write it
//! here. Writes go to a temp file that is renamed over the target, so a crash
//! mid-write leaves the previous file intact.

use std::path::Path;

use tracing::debug;

use crate::error::{Error, Result};
use crate::token::OAuthTokenData;

/// Read a token record written by `save_token`.
pub async fn load_token(path: &Path) -> Result<OAuthTokenData> {
    let contents = tokio::fs::read_to_string(path)
        .await
        .map_err(|e| Error::Io(format!("reading token file {}: {e}", path.display())))?;
    let data: OAuthTokenData = serde_json::from_str(&contents)
        .map_err(|e| Error::CredentialParse(format!("parsing token file: {e}")))?;
    debug!(path = %path.display(), client_id = %data.client_id, "loaded token file");
    Ok(data)
}

/// Write a token record atomically with 0600 permissions (unix only), since
/// the file holds the refresh token and client secret.
pub async fn save_token(path: &Path, data: &OAuthTokenData) -> Result<()> {
    let json = serde_json::to_string_pretty(data)
        .map_err(|e| Error::CredentialParse(format!("serializing token: {e}")))?;

    let dir = path
        .parent()
        .ok_or_else(|| Error::Io("token path has no parent directory".into()))?;

    let tmp_path = dir.join(format!(".open-cloud-token.tmp.{}", std::process::id()));

    tokio::fs::write(&tmp_path, json.as_bytes())
        .await
        .map_err(|e| Error::Io(format!("writing temp token file: {e}")))?;

    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        let perms = std::fs::Permissions::from_mode(0o600);
        tokio::fs::set_permissions(&tmp_path, perms)
            .await
            .map_err(|e| Error::Io(format!("setting token file permissions: {e}")))?;
    }

    tokio::fs::rename(&tmp_path, path)
        .await
        .map_err(|e| Error::Io(format!("renaming temp token file: {e}")))?;

    debug!(path = %path.display(), "persisted token");
    Ok(())
}
