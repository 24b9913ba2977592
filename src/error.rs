//! Error types for the email tester and the helpers that print their causes.

use std::error::Error;
use std::io::{self, Write};
use std::num::ParseIntError;
use std::path::PathBuf;

use thiserror::Error;

/// Errors raised while reading the settings file.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The settings file could not be read.
    #[error("The configuration file '{}' could not be read.", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// The settings file is not valid JSON.
    #[error("Failed to load configuration from file '{}'.", path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("The configuration document must be a JSON object.")]
    NotAnObject,

    /// An object or array was found where a single value is expected.
    #[error("The configuration value at '{key}' must be a single value.")]
    NotScalar { key: String },

    #[error("Failed to convert configuration value '{value}' at '{key}' to a port number.")]
    InvalidPort {
        key: String,
        value: String,
        #[source]
        source: ParseIntError,
    },
}

/// Errors raised by a single send attempt.
#[derive(Debug, Error)]
pub enum SendError {
    #[error("Unable to build the test email.")]
    Compose(#[from] lettre::error::Error),

    #[error("Failure sending mail.")]
    Transport(#[from] lettre::transport::smtp::Error),
}

/// Iterates over an error and each of its causes, outermost first.
pub fn chain<'a>(err: &'a (dyn Error + 'static)) -> impl Iterator<Item = &'a (dyn Error + 'static)> {
    std::iter::successors(Some(err), |err| (*err).source())
}

/// Writes one line per level of the error chain.
pub fn write_chain<W: Write>(out: &mut W, err: &(dyn Error + 'static)) -> io::Result<()> {
    for cause in chain(err) {
        writeln!(out, "{cause}")?;
    }
    Ok(())
}
