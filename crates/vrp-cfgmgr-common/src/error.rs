//! Error types for reconciler operations.
//!
//! This module defines the error types used throughout the cfgmgr crates.
//! All errors implement `std::error::Error` via `thiserror`.

use std::io;
use thiserror::Error;
use vrp_types::ParseError;

use crate::manager::State;

/// Result type alias for cfgmgr operations.
pub type CfgMgrResult<T> = Result<T, CfgMgrError>;

/// Errors that can occur while reconciling interface resources.
#[derive(Debug, Error)]
pub enum CfgMgrError {
    /// The desired configuration is empty for an intent that requires it.
    #[error("value of config parameter must not be empty for state {state}")]
    MissingConfig {
        /// The requested intent.
        state: State,
    },

    /// A VLAN span whose end is not above its start.
    #[error(
        "Command rejected: Bad VLAN list - end of range not larger than the start of range: {token}"
    )]
    InvalidVlanRange {
        /// The offending token, e.g. `"20-10"`.
        token: String,
    },

    /// Configuration validation error.
    #[error("Invalid configuration for {field}: {message}")]
    InvalidConfig {
        /// The field that failed validation.
        field: String,
        /// Error message.
        message: String,
    },

    /// Failed to read a facts, config or settings file.
    #[error("Failed to read '{path}': {source}")]
    Io {
        /// The file path.
        path: String,
        /// The underlying IO error.
        #[source]
        source: io::Error,
    },

    /// A file was read but could not be decoded.
    #[error("Failed to parse '{path}': {message}")]
    Parse {
        /// The file path.
        path: String,
        /// Decoder message.
        message: String,
    },

    /// The command sink could not deliver the commands.
    #[error("Failed to apply commands: {message}")]
    Sink {
        /// Error message.
        message: String,
    },
}

impl CfgMgrError {
    /// Creates a missing-config error for the given intent.
    pub fn missing_config(state: State) -> Self {
        Self::MissingConfig { state }
    }

    /// Creates an invalid VLAN range error.
    pub fn invalid_vlan_range(token: impl Into<String>) -> Self {
        Self::InvalidVlanRange {
            token: token.into(),
        }
    }

    /// Creates an invalid configuration error.
    pub fn invalid_config(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self::InvalidConfig {
            field: field.into(),
            message: message.into(),
        }
    }

    /// Creates an IO error bound to a path.
    pub fn io(path: impl Into<String>, source: io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    /// Creates a parse error bound to a path.
    pub fn parse(path: impl Into<String>, message: impl ToString) -> Self {
        Self::Parse {
            path: path.into(),
            message: message.to_string(),
        }
    }

    /// Creates a sink error.
    pub fn sink(message: impl Into<String>) -> Self {
        Self::Sink {
            message: message.into(),
        }
    }

    /// Returns true if this error indicates a transient condition
    /// that may succeed on retry.
    ///
    /// Only delivery to the device is retryable; reconciliation itself is
    /// deterministic.
    pub fn is_retryable(&self) -> bool {
        matches!(self, CfgMgrError::Sink { .. })
    }
}

impl From<ParseError> for CfgMgrError {
    fn from(err: ParseError) -> Self {
        match err {
            ParseError::InvalidVlanRange(token) => Self::invalid_vlan_range(token),
            ParseError::InvalidVlanId(id) => {
                Self::invalid_config("vlan", format!("{} out of range 1-4094", id))
            }
            ParseError::InvalidInterfaceName(name) => {
                Self::invalid_config("name", format!("invalid interface name {:?}", name))
            }
        }
    }
}
