//! Request/response sats-connect provider boundary.
//!
//! Every call goes through one generic `request(method, params)` entry point
//! and comes back as a [`RpcResponse`] discriminated by `status`.

use crate::adapter::MaybeSendSync;
use crate::error::RpcFault;
use crate::provider::ProviderFuture;
use crate::provider::sats_connect::SatsConnectProtocol;
use crate::types::{Address, AddressPurpose, WalletType};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;

/// Reserved JSON-RPC error codes used by sats-connect providers.
pub mod error_code {
    pub const PARSE_ERROR: i64 = -32700;
    pub const INVALID_REQUEST: i64 = -32600;
    pub const METHOD_NOT_FOUND: i64 = -32601;
    pub const INVALID_PARAMS: i64 = -32602;
    pub const INTERNAL_ERROR: i64 = -32603;
    /// The user rejected the prompt.
    pub const USER_REJECTION: i64 = -32000;
    pub const METHOD_NOT_SUPPORTED: i64 = -32001;
    pub const ACCESS_DENIED: i64 = -32002;
}

/// RPC method names.
pub mod method {
    pub const WALLET_CONNECT: &str = "wallet_connect";
    pub const SIGN_PSBT: &str = "signPsbt";
    pub const SIGN_MESSAGE: &str = "signMessage";
}

/// Discriminated result of one RPC request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "lowercase")]
pub enum RpcResponse {
    Success { result: Value },
    Error { error: RpcFault },
}

impl RpcResponse {
    pub fn success(result: Value) -> Self {
        RpcResponse::Success { result }
    }

    pub fn error(code: i64, message: impl Into<String>) -> Self {
        RpcResponse::Error {
            error: RpcFault {
                code,
                message: message.into(),
            },
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WalletConnectParams {
    pub addresses: Vec<AddressPurpose>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

/// Network the wallet reports being connected to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConnectedNetwork {
    #[serde(default)]
    pub bitcoin: Option<NetworkName>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NetworkName {
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WalletConnectResult {
    pub addresses: Vec<Address>,
    #[serde(default)]
    pub wallet_type: WalletType,
    #[serde(default)]
    pub network: Option<ConnectedNetwork>,
}

impl WalletConnectResult {
    /// Bitcoin network name reported by the wallet, if any.
    pub fn bitcoin_network(&self) -> Option<&str> {
        self.network
            .as_ref()
            .and_then(|n| n.bitcoin.as_ref())
            .map(|n| n.name.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SignPsbtParams {
    pub psbt: String,
    /// Input indexes to sign, keyed by address.
    pub sign_inputs: BTreeMap<String, Vec<u32>>,
    pub broadcast: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SignPsbtResult {
    pub psbt: String,
    #[serde(default)]
    pub txid: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SignMessageParams {
    pub address: String,
    pub message: String,
    pub protocol: SatsConnectProtocol,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SignMessageResult {
    pub signature: String,
    #[serde(default)]
    pub message_hash: Option<String>,
}

/// A provider exposing sats-connect's generic `request` entry point.
pub trait RpcProvider: MaybeSendSync {
    /// Send one request.
    ///
    /// `Err` means the provider could not be reached. Failures reported by
    /// the provider itself come back as [`RpcResponse::Error`].
    fn request(&self, method: &str, params: Value) -> ProviderFuture<'_, RpcResponse>;
}

/// Scripted RPC provider for testing.
#[cfg(test)]
pub mod mock {
    use super::*;
    use crate::error::ProviderError;
    use std::collections::VecDeque;
    use std::sync::Mutex;

    #[derive(Default)]
    pub struct MockRpcProvider {
        responses: Mutex<VecDeque<Result<RpcResponse, ProviderError>>>,
        requests: Mutex<Vec<(String, Value)>>,
    }

    impl MockRpcProvider {
        pub fn new() -> Self {
            Self::default()
        }

        pub fn push(&self, response: RpcResponse) {
            self.responses.lock().unwrap().push_back(Ok(response));
        }

        pub fn push_unreachable(&self) {
            self.responses
                .lock()
                .unwrap()
                .push_back(Err(ProviderError::new("extension unreachable")));
        }

        pub fn requests(&self) -> Vec<(String, Value)> {
            self.requests.lock().unwrap().clone()
        }
    }

    impl RpcProvider for MockRpcProvider {
        fn request(&self, method: &str, params: Value) -> ProviderFuture<'_, RpcResponse> {
            let method = method.to_string();
            Box::pin(async move {
                self.requests.lock().unwrap().push((method, params));
                self.responses
                    .lock()
                    .unwrap()
                    .pop_front()
                    .unwrap_or_else(|| Err(ProviderError::new("no scripted response")))
            })
        }
    }
}
