//! API credentials.
//!
//! Each value is taken from its environment variable when set. Anything
//! missing is filled in from a JSON credentials file, which is only read
//! when needed.

use std::fmt;
use std::path::{Path, PathBuf};

use serde::Deserialize;
use tracing::debug;

pub const AMADEUS_CLIENT_ID_VAR: &str = "AMADEUS_CLIENT_ID";
pub const AMADEUS_CLIENT_SECRET_VAR: &str = "AMADEUS_CLIENT_SECRET";
pub const AVIATIONSTACK_API_KEY_VAR: &str = "AVIATIONSTACK_API_KEY";

/// Environment variable naming the credentials file.
pub const CREDENTIALS_FILE_VAR: &str = "FLYNOW_CREDENTIALS";

pub const DEFAULT_CREDENTIALS_FILE: &str = "config/demo-tokens.json";

/// Errors loading credentials.
#[derive(Debug, thiserror::Error)]
pub enum CredentialsError {
    #[error("reading credentials file {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("parsing credentials file {}: {source}", path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

/// Layout of the credentials file. Absent keys read as empty.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct CredentialsFile {
    #[serde(default)]
    amadeus_client_id: String,
    #[serde(default)]
    amadeus_client_secret: String,
    #[serde(default)]
    aviation_stack_api_key: String,
}

/// Credentials for both upstream APIs. Values are opaque.
#[derive(Clone, PartialEq, Eq)]
pub struct Credentials {
    pub amadeus_client_id: String,
    pub amadeus_client_secret: String,
    pub aviationstack_api_key: String,
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("amadeus_client_id", &self.amadeus_client_id)
            .field("amadeus_client_secret", &"..")
            .field("aviationstack_api_key", &"..")
            .finish()
    }
}

impl Credentials {
    /// Load credentials from the process environment, falling back to the
    /// credentials file.
    pub fn load() -> Result<Self, CredentialsError> {
        Self::resolve(|name| std::env::var(name).ok())
    }

    /// Load credentials using `lookup` in place of the environment.
    pub fn resolve(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, CredentialsError> {
        let client_id = lookup(AMADEUS_CLIENT_ID_VAR);
        let client_secret = lookup(AMADEUS_CLIENT_SECRET_VAR);
        let api_key = lookup(AVIATIONSTACK_API_KEY_VAR);

        if let (Some(id), Some(secret), Some(key)) = (&client_id, &client_secret, &api_key) {
            debug!("using credentials from environment");
            return Ok(Self {
                amadeus_client_id: id.clone(),
                amadeus_client_secret: secret.clone(),
                aviationstack_api_key: key.clone(),
            });
        }

        let path = lookup(CREDENTIALS_FILE_VAR)
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from(DEFAULT_CREDENTIALS_FILE));
        let file = Self::from_file(&path)?;

        Ok(Self {
            amadeus_client_id: client_id.unwrap_or(file.amadeus_client_id),
            amadeus_client_secret: client_secret.unwrap_or(file.amadeus_client_secret),
            aviationstack_api_key: api_key.unwrap_or(file.aviationstack_api_key),
        })
    }

    /// Read every value from a credentials file.
    pub fn from_file(path: &Path) -> Result<Self, CredentialsError> {
        debug!(path = %path.display(), "reading credentials file");
        let data = std::fs::read_to_string(path).map_err(|source| CredentialsError::Read {
            path: path.to_path_buf(),
            source,
        })?;

        let file: CredentialsFile =
            serde_json::from_str(&data).map_err(|source| CredentialsError::Parse {
                path: path.to_path_buf(),
                source,
            })?;

        Ok(Self {
            amadeus_client_id: file.amadeus_client_id,
            amadeus_client_secret: file.amadeus_client_secret,
            aviationstack_api_key: file.aviation_stack_api_key,
        })
    }
}
