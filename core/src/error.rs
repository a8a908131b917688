//! Error types for the wallet adapter layer.

use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// Result type alias using our Error type.
pub type Result<T> = std::result::Result<T, Error>;

/// The closed set of failures a wallet adapter reports to its caller.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WalletError {
    UserCancelled,
    WalletNotInstalled,
    WalletNotSupported,
    WalletNotInSameNetwork,
    InvalidNetwork,
    WalletNotConnected,
    WalletBusy,
    RpcError,
}

impl WalletError {
    /// Every kind, in declaration order.
    pub const ALL: [WalletError; 8] = [
        WalletError::UserCancelled,
        WalletError::WalletNotInstalled,
        WalletError::WalletNotSupported,
        WalletError::WalletNotInSameNetwork,
        WalletError::InvalidNetwork,
        WalletError::WalletNotConnected,
        WalletError::WalletBusy,
        WalletError::RpcError,
    ];

    /// Human-readable message shown for this kind.
    pub fn message(self) -> &'static str {
        match self {
            WalletError::UserCancelled => "Operation cancelled by user",
            WalletError::WalletNotInstalled => "Selected wallet is not installed",
            WalletError::WalletNotSupported => "Selected wallet is not supported",
            WalletError::WalletNotInSameNetwork => "Selected wallet is not in the right network",
            WalletError::InvalidNetwork => "Selected network is invalid",
            WalletError::WalletNotConnected => "Wallet is not connected",
            WalletError::WalletBusy => "Wallet is busy",
            WalletError::RpcError => "RPC error occured",
        }
    }

    /// Stable snake_case identifier, e.g. `user_cancelled`.
    pub fn code(self) -> &'static str {
        match self {
            WalletError::UserCancelled => "user_cancelled",
            WalletError::WalletNotInstalled => "wallet_not_installed",
            WalletError::WalletNotSupported => "wallet_not_supported",
            WalletError::WalletNotInSameNetwork => "wallet_not_in_same_network",
            WalletError::InvalidNetwork => "invalid_network",
            WalletError::WalletNotConnected => "wallet_not_connected",
            WalletError::WalletBusy => "wallet_busy",
            WalletError::RpcError => "rpc_error",
        }
    }
}

impl fmt::Display for WalletError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

/// Raw failure reported by a provider's RPC endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RpcFault {
    pub code: i64,
    pub message: String,
}

/// A wallet failure: one [`WalletError`] kind and its fixed message.
///
/// `rpc_error` failures may also carry the provider's own code and message.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("{}", describe(.kind, .fault))]
pub struct WalletException {
    kind: WalletError,
    fault: Option<RpcFault>,
}

impl WalletException {
    pub fn new(kind: WalletError) -> Self {
        Self { kind, fault: None }
    }

    /// An `rpc_error` carrying the provider's failure details.
    pub fn rpc(fault: RpcFault) -> Self {
        Self {
            kind: WalletError::RpcError,
            fault: Some(fault),
        }
    }

    pub fn kind(&self) -> WalletError {
        self.kind
    }

    pub fn message(&self) -> &'static str {
        self.kind.message()
    }

    pub fn fault(&self) -> Option<&RpcFault> {
        self.fault.as_ref()
    }
}

impl From<WalletError> for WalletException {
    fn from(kind: WalletError) -> Self {
        WalletException::new(kind)
    }
}

fn describe(kind: &WalletError, fault: &Option<RpcFault>) -> String {
    match fault {
        Some(fault) => format!("{} ({}: {})", kind.message(), fault.code, fault.message),
        None => kind.message().to_string(),
    }
}

/// Failure reported by a provider before it is translated by an adapter.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("{message}")]
pub struct ProviderError {
    pub code: Option<i64>,
    pub message: String,
}

impl ProviderError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            code: None,
            message: message.into(),
        }
    }

    pub fn with_code(code: i64, message: impl Into<String>) -> Self {
        Self {
            code: Some(code),
            message: message.into(),
        }
    }
}

/// Errors that can occur in the wallet adapter layer.
#[derive(Error, Debug)]
pub enum Error {
    /// A failure from the wallet taxonomy.
    #[error(transparent)]
    Wallet(#[from] WalletException),

    /// Caller-supplied data was not valid base64 or hex.
    #[error("Encoding error: {0}")]
    Encoding(String),

    /// Parse error.
    #[error("Parse error: {0}")]
    Parse(String),

    /// Serialization/deserialization error.
    #[error("Serialization error: {0}")]
    Serde(#[from] serde_json::Error),

    /// Provider failure returned without translation.
    #[error("Provider error: {0}")]
    Provider(ProviderError),
}

impl Error {
    /// The wallet error kind, if this is a taxonomy failure.
    pub fn kind(&self) -> Option<WalletError> {
        match self {
            Error::Wallet(exception) => Some(exception.kind()),
            _ => None,
        }
    }
}

impl From<WalletError> for Error {
    fn from(kind: WalletError) -> Self {
        Error::Wallet(WalletException::new(kind))
    }
}
