use serde::Deserialize;
use serde_json::{Map, Value};
use std::ffi::OsString;
use std::fs;
use std::path::{Path, PathBuf};

use crate::error::ConfigError;

pub const DEFAULT_SETTINGS_FILE: &str = "appsettings.json";
pub const SECTION: &str = "EmailOptions";
pub const SETTINGS_ENV: &str = "EMAIL_TESTER_SETTINGS";

/// The settings file named by `EMAIL_TESTER_SETTINGS`, or `appsettings.json`
/// in the working directory when it is unset or empty.
pub fn settings_path(value: Option<OsString>) -> PathBuf {
    match value {
        Some(path) if !path.is_empty() => PathBuf::from(path),
        _ => PathBuf::from(DEFAULT_SETTINGS_FILE),
    }
}

/// SMTP settings read from the `EmailOptions` section of the settings file.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EmailOptions {
    pub sender_email: String,
    pub smtp_host: String,
    /// Always a usable TCP port once loaded; `0` means the setting was absent.
    /// Negative or oversized values are rejected by [`EmailOptions::load`].
    pub smtp_port: u16,
}

/// A settings value as it may appear in JSON. Everything is read back as text.
#[derive(Deserialize)]
#[serde(untagged)]
enum Scalar {
    Text(String),
    Number(serde_json::Number),
    Flag(bool),
}

impl Scalar {
    fn into_text(self) -> String {
        match self {
            Scalar::Text(text) => text,
            Scalar::Number(number) => number.to_string(),
            Scalar::Flag(flag) => flag.to_string(),
        }
    }
}

impl EmailOptions {
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let contents = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let document: Value =
            serde_json::from_str(&contents).map_err(|source| ConfigError::Parse {
                path: path.to_path_buf(),
                source,
            })?;
        Self::from_document(&document)
    }

    /// Binds the `EmailOptions` section of an already parsed document.
    /// Keys match case-insensitively; absent keys stay empty, and so does
    /// every field when the section is missing or not an object.
    pub fn from_document(document: &Value) -> Result<Self, ConfigError> {
        let root = document.as_object().ok_or(ConfigError::NotAnObject)?;

        let section = match lookup(root, SECTION) {
            Some(Value::Object(section)) => section,
            _ => return Ok(Self::default()),
        };

        let sender_email = text_field(section, "SenderEmail")?.unwrap_or_default();
        let smtp_host = text_field(section, "SmtpHost")?.unwrap_or_default();
        // Range-checked at load time: a value that cannot be a TCP port is a
        // configuration error, not a send failure.
        let smtp_port = match text_field(section, "SmtpPort")? {
            Some(value) if !value.trim().is_empty() => value.trim().parse::<u16>().map_err(
                |source| ConfigError::InvalidPort {
                    key: format!("{SECTION}:SmtpPort"),
                    value: value.clone(),
                    source,
                },
            )?,
            _ => 0,
        };

        Ok(EmailOptions {
            sender_email,
            smtp_host,
            smtp_port,
        })
    }

    /// Names of the required settings that are empty or zero.
    pub fn missing_fields(&self) -> Vec<&'static str> {
        let mut missing = vec![];
        if self.sender_email.is_empty() {
            missing.push("SenderEmail");
        }
        if self.smtp_host.is_empty() {
            missing.push("SmtpHost");
        }
        if self.smtp_port == 0 {
            missing.push("SmtpPort");
        }
        missing
    }

    pub fn is_complete(&self) -> bool {
        self.missing_fields().is_empty()
    }
}

fn lookup<'a>(object: &'a Map<String, Value>, key: &str) -> Option<&'a Value> {
    object
        .iter()
        .find(|(name, _)| name.eq_ignore_ascii_case(key))
        .map(|(_, value)| value)
}

fn text_field(section: &Map<String, Value>, key: &str) -> Result<Option<String>, ConfigError> {
    match lookup(section, key) {
        None | Some(Value::Null) => Ok(None),
        Some(value) => serde_json::from_value::<Scalar>(value.clone())
            .map(|scalar| Some(scalar.into_text()))
            .map_err(|_| ConfigError::NotScalar {
                key: format!("{SECTION}:{key}"),
            }),
    }
}
