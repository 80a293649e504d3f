//! Typed errors for the fetch, credential, filter and configuration layers.
//!
//! API-level errors (`status != "ok"`) are deliberately absent here: the
//! response decoded fine, so they travel as a normal [`NewsResponse`] and are
//! turned into a banner by the dashboard.
//!
//! [`NewsResponse`]: crate::models::NewsResponse

use std::io;
use std::path::PathBuf;

/// Failure to obtain a decodable response from the news endpoint.
#[derive(Debug, thiserror::Error)]
pub enum FetchError {
    #[error("transport failure: {0}")]
    Transport(#[source] Box<dyn std::error::Error + Send + Sync>),
    #[error("response was not valid JSON: {0}")]
    Decode(#[from] serde_json::Error),
}

/// A filter value the dashboard refuses to forward.
#[derive(Debug, PartialEq, Eq, thiserror::Error)]
pub enum ParamError {
    #[error("days must be between {min} and {max}, got {got}")]
    DaysOutOfRange { got: i64, min: u32, max: u32 },
    #[error("count must be between {min} and {max}, got {got}")]
    CountOutOfRange { got: i64, min: u32, max: u32 },
    #[error("unknown category '{0}' (try finance, crypto, stock-market, esg or all)")]
    UnknownCategory(String),
    #[error("'{0}' is not a number")]
    NotANumber(String),
    #[error("unrecognized command '{0}' (type 'help')")]
    UnknownCommand(String),
}

#[derive(Debug, thiserror::Error)]
pub enum CredentialError {
    #[error("failed to read credential: {0}")]
    Io(#[from] io::Error),
    #[error("secrets file {path} is malformed: {source}")]
    Secrets {
        path: PathBuf,
        #[source]
        source: serde_yaml::Error,
    },
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read config {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("config {path} is malformed: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_yaml::Error,
    },
}
