//! API key loading.
//!
//! Keys come from a `KEY=VALUE` file (default `keys.txt`) with environment
//! variables of the same name filling any gaps. Loaded once at startup and
//! shared read-only.
//!
//! The file uses dotenv syntax, so `$NAME` in an unquoted or double-quoted
//! value is substituted. A key containing `$` must be single-quoted
//! (`CHATGPT_API='sk-$abc'`); unquoted ones are reported with a warning.

use std::fmt;
use std::path::Path;

use log::{debug, warn};
use strum::IntoEnumIterator;

use crate::config::{CHATGPT_KEY_NAME, GEMINI_KEY_NAME};
use crate::models::Provider;

/// API keys per provider. Blank values count as missing.
#[derive(Clone, Default, PartialEq, Eq)]
pub struct Secrets {
    gemini: Option<String>,
    chatgpt: Option<String>,
}

impl Secrets {
    pub fn new(gemini: Option<String>, chatgpt: Option<String>) -> Self {
        Self {
            gemini: non_blank(gemini),
            chatgpt: non_blank(chatgpt),
        }
    }

    /// Loads keys from `path`, then fills missing ones from the process environment.
    ///
    /// A missing or unreadable file is not an error: a warning is logged and only
    /// the environment is consulted.
    pub fn load(path: &Path) -> Self {
        Self::load_with_env(path, |name| std::env::var(name).ok())
    }

    /// Like [`Secrets::load`], with an injectable environment lookup.
    pub fn load_with_env<F>(path: &Path, env: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut secrets = Self::from_file(path);
        if secrets.gemini.is_none() {
            secrets.gemini = non_blank(env(GEMINI_KEY_NAME));
        }
        if secrets.chatgpt.is_none() {
            secrets.chatgpt = non_blank(env(CHATGPT_KEY_NAME));
        }
        secrets
    }

    fn from_file(path: &Path) -> Self {
        let iter = match dotenvy::from_path_iter(path) {
            Ok(iter) => iter,
            Err(dotenvy::Error::Io(e)) if e.kind() == std::io::ErrorKind::NotFound => {
                warn!(
                    "Keys file {} not found, falling back to environment variables",
                    path.display()
                );
                return Self::default();
            }
            Err(e) => {
                warn!("Could not read keys file {}: {}", path.display(), e);
                return Self::default();
            }
        };

        let mut secrets = Self::default();
        for item in iter {
            match item {
                Ok((key, value)) => match key.as_str() {
                    GEMINI_KEY_NAME => secrets.gemini = non_blank(Some(value)),
                    CHATGPT_KEY_NAME => secrets.chatgpt = non_blank(Some(value)),
                    other => debug!("Ignoring unknown key '{}' in {}", other, path.display()),
                },
                Err(e) => warn!("Skipping malformed line in {}: {}", path.display(), e),
            }
        }

        if let Ok(raw) = std::fs::read_to_string(path) {
            for name in keys_with_substitution(&raw) {
                warn!(
                    "{} in {} contains '$' and was expanded as a variable; \
                     single-quote the value to keep it literal",
                    name,
                    path.display()
                );
            }
        }
        secrets
    }

    /// The key for `provider`, if one is configured.
    pub fn get_key(&self, provider: Provider) -> Option<&str> {
        match provider {
            Provider::Gemini => self.gemini.as_deref(),
            Provider::ChatGpt => self.chatgpt.as_deref(),
        }
    }

    pub fn has_key(&self, provider: Provider) -> bool {
        self.get_key(provider).is_some()
    }

    /// Providers with a key, in stable order.
    pub fn configured(&self) -> Vec<Provider> {
        Provider::iter().filter(|p| self.has_key(*p)).collect()
    }
}

impl fmt::Debug for Secrets {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let redact = |key: &Option<String>| if key.is_some() { "<set>" } else { "<unset>" };
        f.debug_struct("Secrets")
            .field("gemini", &redact(&self.gemini))
            .field("chatgpt", &redact(&self.chatgpt))
            .finish()
    }
}

/// Recognized key names whose value has a `$` outside single quotes.
fn keys_with_substitution(raw: &str) -> Vec<&str> {
    raw.lines()
        .filter_map(|line| {
            let line = line.trim_start();
            let line = line.strip_prefix("export ").unwrap_or(line);
            let (name, value) = line.split_once('=')?;
            let name = name.trim();
            let value = value.trim_start();
            let recognized = name == GEMINI_KEY_NAME || name == CHATGPT_KEY_NAME;
            (recognized && !value.starts_with('\'') && value.contains('$')).then_some(name)
        })
        .collect()
}

fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}
