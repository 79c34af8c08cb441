// SPDX-License-Identifier: MPL-2.0
use std::fmt;

/// Application error type.
///
/// Variants are `Clone` so failures can travel inside UI messages. The
/// first five cover the load pipeline (adapter, download, decode); `Io`
/// and `Config` cover preference persistence.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Error {
    /// Transport failure or non-success HTTP status. The message carries
    /// the numeric status when one was received.
    Network(String),

    /// The response body did not have the expected shape (missing field,
    /// empty result list, invalid JSON).
    Parse(String),

    /// The load deadline elapsed before the request settled.
    Timeout,

    /// The selected source does not serve the requested category.
    UnsupportedCategory {
        source: &'static str,
        category: &'static str,
    },

    /// The image bytes were downloaded but could not be decoded.
    Decode(String),

    Io(String),
    Config(String),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::Network(e) => write!(f, "Network error: {}", e),
            Error::Parse(e) => write!(f, "Unexpected response: {}", e),
            Error::Timeout => write!(f, "Request timeout"),
            Error::UnsupportedCategory { source, category } => {
                write!(f, "{} does not serve {} images", source, category)
            }
            Error::Decode(e) => write!(f, "Failed to display image: {}", e),
            Error::Io(e) => write!(f, "I/O Error: {}", e),
            Error::Config(e) => write!(f, "Config Error: {}", e),
        }
    }
}

impl From<reqwest::Error> for Error {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            return Error::Timeout;
        }
        if let Some(status) = err.status() {
            return Error::Network(format!("API error: {}", status.as_u16()));
        }
        Error::Network(err.to_string())
    }
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Error::Parse(err.to_string())
    }
}

impl From<image_rs::ImageError> for Error {
    fn from(err: image_rs::ImageError) -> Self {
        Error::Decode(err.to_string())
    }
}

impl From<std::io::Error> for Error {
    fn from(err: std::io::Error) -> Self {
        Error::Io(err.to_string())
    }
}

impl From<toml::de::Error> for Error {
    fn from(err: toml::de::Error) -> Self {
        Error::Config(err.to_string())
    }
}

impl From<toml::ser::Error> for Error {
    fn from(err: toml::ser::Error) -> Self {
        Error::Config(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, Error>;
