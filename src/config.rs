use crate::utils::CleanupError;
use clap::Parser;
use serde::Deserialize;
use std::env;
use std::fs;
use std::path::{Path, PathBuf};

pub const DEFAULT_COLLECTION: &str = "users";

/// Null out empty-string profileImage values in a user collection.
#[derive(Debug, Parser)]
#[command(name = "profile-image-cleanup", version)]
pub struct Cli {
    /// Path to a JSON credential document ({"uri": ..., "database": ...})
    #[arg(long, env = "CLEANUP_CREDENTIALS_FILE")]
    pub credentials: Option<PathBuf>,

    /// Collection to sweep
    #[arg(long, env = "CLEANUP_COLLECTION", default_value = DEFAULT_COLLECTION)]
    pub collection: String,

    /// Scan and report matches without writing anything
    #[arg(long, env = "CLEANUP_DRY_RUN")]
    pub dry_run: bool,
}

/// Connection credential for the document store.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Credentials {
    pub uri: String,
    #[serde(default)]
    pub database: Option<String>,
}

impl Credentials {
    pub fn from_file(path: &Path) -> Result<Self, CleanupError> {
        let invalid = |reason: String| CleanupError::InvalidCredential {
            path: path.display().to_string(),
            reason,
        };

        let content = fs::read_to_string(path).map_err(|e| invalid(e.to_string()))?;
        let credentials: Credentials =
            serde_json::from_str(&content).map_err(|e| invalid(e.to_string()))?;

        if credentials.uri.trim().is_empty() {
            return Err(invalid("\"uri\" is empty".to_string()));
        }

        Ok(credentials)
    }

    /// Falls back to MONGODB_URI / MONGODB_DATABASE.
    pub fn from_env() -> Option<Self> {
        let uri = env::var("MONGODB_URI").ok().filter(|u| !u.trim().is_empty())?;
        let database = env::var("MONGODB_DATABASE").ok().filter(|d| !d.is_empty());
        Some(Self { uri, database })
    }

    /// Explicit database name, else the path segment of the URI.
    pub fn database_name(&self) -> Result<String, CleanupError> {
        if let Some(name) = self.database.as_deref().filter(|n| !n.is_empty()) {
            return Ok(name.to_string());
        }

        let without_scheme = self
            .uri
            .split_once("://")
            .map(|(_, rest)| rest)
            .unwrap_or(&self.uri);

        without_scheme
            .split_once('/')
            .map(|(_, path)| path.split('?').next().unwrap_or(""))
            .filter(|name| !name.is_empty())
            .map(str::to_string)
            .ok_or_else(|| {
                CleanupError::MissingCredential(
                    "no database name in credential or connection URI".to_string(),
                )
            })
    }
}

#[derive(Debug, Clone)]
pub struct CleanupConfig {
    pub credentials: Credentials,
    pub collection: String,
    pub dry_run: bool,
}

impl CleanupConfig {
    pub fn resolve(cli: Cli) -> Result<Self, CleanupError> {
        let credentials = match cli.credentials.as_deref() {
            Some(path) => Credentials::from_file(path)?,
            None => Credentials::from_env().ok_or_else(|| {
                CleanupError::MissingCredential(
                    "set --credentials, CLEANUP_CREDENTIALS_FILE or MONGODB_URI".to_string(),
                )
            })?,
        };

        Ok(Self {
            credentials,
            collection: cli.collection,
            dry_run: cli.dry_run,
        })
    }
}
