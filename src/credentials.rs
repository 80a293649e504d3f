//! NewsAPI key resolution.
//!
//! The key can come from a secret store (an explicit value or a YAML secrets
//! file) or from an interactive prompt. Both sit behind [`CredentialProvider`],
//! and [`resolve_credential`] asks each provider in turn. The fetcher never
//! knows where its key came from.

use crate::error::CredentialError;
use serde_yaml::{Mapping, Value};
use std::io::{BufRead, Write};
use std::path::Path;
use tracing::{debug, info, instrument};

/// Name of the key in the secrets file.
pub const SECRET_KEY_NAME: &str = "NEWS_API_KEY";

/// Something that may be able to produce an API key.
pub trait CredentialProvider {
    /// Short name for logs.
    fn name(&self) -> &'static str;

    /// The credential, `Ok(None)` when this provider has none to offer.
    fn credential(&mut self) -> Result<Option<String>, CredentialError>;
}

/// Secret-store provider: an explicit value wins, then the YAML secrets file.
#[derive(Default)]
pub struct SecretStoreCredentials {
    explicit: Option<String>,
    secrets: Mapping,
}

impl SecretStoreCredentials {
    pub fn new(explicit: Option<String>) -> Self {
        Self {
            explicit,
            secrets: Mapping::new(),
        }
    }

    /// Parse a YAML mapping of secrets. Only [`SECRET_KEY_NAME`] is ever read;
    /// other entries may hold anything, nested sections included.
    pub fn with_secrets_yaml(mut self, yaml: &str, path: &Path) -> Result<Self, CredentialError> {
        if yaml.trim().is_empty() {
            return Ok(self);
        }
        self.secrets = serde_yaml::from_str(yaml).map_err(|source| CredentialError::Secrets {
            path: path.to_path_buf(),
            source,
        })?;
        Ok(self)
    }

    /// Load the secrets file at `path`. A missing file is an empty store.
    #[instrument(level = "info", skip_all, fields(path = %path.display()))]
    pub fn with_secrets_file(self, path: &Path) -> Result<Self, CredentialError> {
        if self.explicit.as_deref().and_then(non_blank).is_some() {
            debug!("Explicit key given; secrets file not read");
            return Ok(self);
        }
        match std::fs::read_to_string(path) {
            Ok(yaml) => self.with_secrets_yaml(&yaml, path),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                debug!("No secrets file; secret store has only explicit values");
                Ok(self)
            }
            Err(e) => Err(CredentialError::Io(e)),
        }
    }
}

impl std::fmt::Debug for SecretStoreCredentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SecretStoreCredentials")
            .field("explicit", &self.explicit.is_some())
            .field(
                "secret_names",
                &self.secrets.iter().filter_map(|(k, _)| k.as_str()).collect::<Vec<_>>(),
            )
            .finish()
    }
}

impl CredentialProvider for SecretStoreCredentials {
    fn name(&self) -> &'static str {
        "secret-store"
    }

    fn credential(&mut self) -> Result<Option<String>, CredentialError> {
        let found = self
            .explicit
            .as_deref()
            .and_then(non_blank)
            .or_else(|| self.secrets.get(SECRET_KEY_NAME).and_then(scalar_secret));
        Ok(found)
    }
}

/// Interactive provider: asks once on `output`, reads one line from `input`.
pub struct PromptCredentials<R, W> {
    input: R,
    output: W,
}

impl<R, W> PromptCredentials<R, W>
where
    R: BufRead,
    W: Write,
{
    pub fn new(input: R, output: W) -> Self {
        Self { input, output }
    }
}

impl<R, W> CredentialProvider for PromptCredentials<R, W>
where
    R: BufRead,
    W: Write,
{
    fn name(&self) -> &'static str {
        "prompt"
    }

    fn credential(&mut self) -> Result<Option<String>, CredentialError> {
        write!(self.output, "Enter your News API key: ")?;
        self.output.flush()?;
        let mut line = String::new();
        self.input.read_line(&mut line)?;
        Ok(non_blank(&line))
    }
}

/// Ask each provider in order; the first non-blank credential wins.
pub fn resolve_credential(
    providers: &mut [&mut dyn CredentialProvider],
) -> Result<Option<String>, CredentialError> {
    for provider in providers.iter_mut() {
        if let Some(key) = provider.credential()? {
            info!(provider = provider.name(), "Resolved News API key");
            return Ok(Some(key));
        }
        debug!(provider = provider.name(), "Provider had no News API key");
    }
    Ok(None)
}

/// Guidance printed when no key could be found.
pub fn missing_credential_help(secrets_file: Option<&Path>) -> String {
    let target = secrets_file
        .map(|p| p.display().to_string())
        .unwrap_or_else(|| "secrets.yaml".to_string());
    format!(
        "Please enter your News API key. You can get one from https://newsapi.org/\n\n\
         To run without the prompt, store the key in one of these places:\n\n\
         1. The NEWS_API_KEY environment variable\n\
         2. The --api-key flag\n\
         3. The secrets file {target}, in this format:\n\n\
         ```\n\
         {SECRET_KEY_NAME}: 'your-api-key-here'\n\
         ```\n"
    )
}

fn non_blank(s: &str) -> Option<String> {
    let trimmed = s.trim();
    (!trimmed.is_empty()).then(|| trimmed.to_string())
}

// An unquoted all-digit key is a YAML number, not a string.
fn scalar_secret(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => non_blank(s),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}
