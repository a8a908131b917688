//! Xverse adapter over the sats-connect `request` RPC.

use crate::adapter::{BitcoinWallet, ProgressFn, WalletFuture, WalletState, sign_sequentially};
use crate::error::{Result, WalletError, WalletException};
use crate::network::{BitcoinNetworkType, Network};
use crate::options::ConnectOptions;
use crate::provider::rpc::{
    RpcProvider, RpcResponse, SignMessageParams, SignMessageResult, SignPsbtParams,
    SignPsbtResult, WalletConnectParams, WalletConnectResult, error_code, method,
};
use crate::types::{
    Address, AddressPurpose, InputToSign, MessageSigningProtocol, UnsignedPsbt, WalletName,
    WalletType,
};
use serde::Serialize;
use serde::de::DeserializeOwned;
use std::collections::BTreeMap;
use std::sync::Arc;

/// Purposes requested on connect unless the caller overrides them.
const DEFAULT_PURPOSES: [AddressPurpose; 2] = [AddressPurpose::Ordinals, AddressPurpose::Payment];

/// Xverse wallet session.
pub struct XverseWallet {
    state: WalletState,
    provider: Arc<dyn RpcProvider>,
    internal_network: BitcoinNetworkType,
    options: ConnectOptions,
}

impl XverseWallet {
    /// Build a session from addresses the provider already returned.
    ///
    /// The wallet type comes from the provider's connect response.
    pub fn new(
        network: Network,
        addresses: Vec<Address>,
        provider: Arc<dyn RpcProvider>,
        wallet_type: WalletType,
        options: ConnectOptions,
    ) -> Result<Self> {
        let internal_network = network.to_sats_connect()?;
        let state = WalletState::new(network, addresses, wallet_type)?;

        Ok(Self {
            state,
            provider,
            internal_network,
            options,
        })
    }

    /// Connect to the provider and return a new session.
    pub async fn connect(
        provider: Arc<dyn RpcProvider>,
        network: Network,
        options: ConnectOptions,
    ) -> Result<Self> {
        let internal_network = network.to_sats_connect()?;

        let params = WalletConnectParams {
            addresses: options.purposes_or(&DEFAULT_PURPOSES),
            message: options.address_message.clone(),
        };
        let result: WalletConnectResult =
            request(provider.as_ref(), method::WALLET_CONNECT, &params).await?;

        if let Some(connected) = result.bitcoin_network() {
            if !connected.eq_ignore_ascii_case(internal_network.as_str()) {
                log::warn!(
                    "Xverse is on {} but {} was requested",
                    connected,
                    internal_network
                );
                return Err(WalletError::WalletNotInSameNetwork.into());
            }
        }

        log::debug!(
            "Xverse connected {} addresses on {}",
            result.addresses.len(),
            network
        );
        Self::new(network, result.addresses, provider, result.wallet_type, options)
    }

    /// Network type sent to the provider.
    pub fn internal_network(&self) -> BitcoinNetworkType {
        self.internal_network
    }
}

/// Group signing indexes by address, keeping each address's indexes in input order.
pub fn group_sign_inputs(inputs: &[InputToSign]) -> BTreeMap<String, Vec<u32>> {
    let mut grouped: BTreeMap<String, Vec<u32>> = BTreeMap::new();
    for input in inputs {
        grouped
            .entry(input.address.clone())
            .or_default()
            .extend(&input.signing_indexes);
    }
    grouped
}

/// Send one request and translate the provider's answer into the wallet taxonomy.
async fn request<P: Serialize, R: DeserializeOwned>(
    provider: &dyn RpcProvider,
    rpc_method: &str,
    params: &P,
) -> Result<R> {
    let params = serde_json::to_value(params)?;
    let response = provider.request(rpc_method, params).await.map_err(|e| {
        log::error!("Wallet not installed: {}", e);
        WalletError::WalletNotInstalled
    })?;

    match response {
        RpcResponse::Success { result } => serde_json::from_value(result).map_err(|e| {
            log::error!("Unexpected {} result: {}", rpc_method, e);
            WalletError::RpcError.into()
        }),
        RpcResponse::Error { error } if error.code == error_code::USER_REJECTION => {
            log::warn!("User cancelled");
            Err(WalletError::UserCancelled.into())
        }
        RpcResponse::Error { error } => {
            log::error!("{} failed: {}: {}", rpc_method, error.code, error.message);
            Err(WalletException::rpc(error).into())
        }
    }
}

impl BitcoinWallet for XverseWallet {
    fn wallet_name(&self) -> WalletName {
        WalletName::Xverse
    }

    fn state(&self) -> &WalletState {
        &self.state
    }

    fn initialize(&self, network: Network) -> WalletFuture<'_, Box<dyn BitcoinWallet>> {
        Box::pin(async move {
            let wallet =
                XverseWallet::connect(self.provider.clone(), network, self.options.clone())
                    .await?;
            Ok(Box::new(wallet) as Box<dyn BitcoinWallet>)
        })
    }

    fn sign_psbt<'a>(
        &'a self,
        psbt: &'a UnsignedPsbt,
        broadcast: bool,
    ) -> WalletFuture<'a, String> {
        Box::pin(async move {
            let params = SignPsbtParams {
                psbt: psbt.psbt64.clone(),
                sign_inputs: group_sign_inputs(&psbt.inputs_to_sign),
                broadcast,
            };
            let result: SignPsbtResult =
                request(self.provider.as_ref(), method::SIGN_PSBT, &params).await?;
            Ok(result.psbt)
        })
    }

    fn sign_psbts<'a>(
        &'a self,
        psbts: &'a [UnsignedPsbt],
        broadcast: bool,
        progress: Option<&'a dyn ProgressFn>,
    ) -> WalletFuture<'a, Vec<String>> {
        Box::pin(sign_sequentially(self, psbts, broadcast, progress))
    }

    fn sign_message<'a>(
        &'a self,
        message: &'a str,
        protocol: Option<MessageSigningProtocol>,
    ) -> WalletFuture<'a, String> {
        Box::pin(async move {
            let params = SignMessageParams {
                address: self.get_signer_address().address.clone(),
                message: message.to_string(),
                protocol: protocol.unwrap_or_default().into(),
            };
            let result: SignMessageResult =
                request(self.provider.as_ref(), method::SIGN_MESSAGE, &params).await?;
            Ok(result.signature)
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::provider::rpc::mock::MockRpcProvider;
    use serde_json::json;
    use std::sync::Mutex;

    fn connect_result() -> serde_json::Value {
        json!({
            "addresses": [
                {
                    "address": "bc1qpay",
                    "publicKey": "02aa",
                    "purpose": "payment",
                    "addressType": "p2wpkh",
                    "walletType": "ledger",
                },
                {
                    "address": "bc1pord",
                    "publicKey": "03bb",
                    "purpose": "ordinals",
                    "addressType": "p2tr",
                    "walletType": "ledger",
                },
            ],
            "walletType": "ledger",
        })
    }

    fn psbt(address: &str, indexes: Vec<u32>) -> UnsignedPsbt {
        UnsignedPsbt {
            psbt64: format!("psbt-{}", address),
            inputs_to_sign: vec![InputToSign {
                address: address.to_string(),
                signing_indexes: indexes,
                sig_hash: None,
            }],
        }
    }

    async fn connected(provider: &Arc<MockRpcProvider>) -> XverseWallet {
        provider.push(RpcResponse::success(connect_result()));
        XverseWallet::connect(provider.clone(), Network::Mainnet, ConnectOptions::default())
            .await
            .unwrap()
    }

    #[tokio::test]
    async fn test_connect_reads_wallet_type_from_provider() {
        let provider = Arc::new(MockRpcProvider::new());
        let wallet = connected(&provider).await;

        assert_eq!(wallet.wallet_name(), WalletName::Xverse);
        assert_eq!(wallet.wallet_type(), WalletType::Ledger);
        assert_eq!(wallet.get_signer_address().address, "bc1pord");
        assert_eq!(wallet.payment_address().unwrap().address, "bc1qpay");
        assert!(wallet.check_is_address_type_p2tr());
        assert_eq!(wallet.internal_network(), BitcoinNetworkType::Mainnet);

        let requests = provider.requests();
        assert_eq!(requests[0].0, "wallet_connect");
        assert_eq!(requests[0].1["addresses"], json!(["ordinals", "payment"]));
        assert!(requests[0].1.get("message").is_none());
    }

    #[tokio::test]
    async fn test_connect_forwards_caller_options() {
        let provider = Arc::new(MockRpcProvider::new());
        provider.push(RpcResponse::success(connect_result()));
        let options = ConnectOptions {
            purposes: Some(vec![AddressPurpose::Payment]),
            address_message: Some("Connect to the swap".to_string()),
            ..Default::default()
        };

        XverseWallet::connect(provider.clone(), Network::Mainnet, options)
            .await
            .unwrap();

        let requests = provider.requests();
        assert_eq!(requests[0].1["addresses"], json!(["payment"]));
        assert_eq!(requests[0].1["message"], "Connect to the swap");
    }

    #[tokio::test]
    async fn test_connect_rejected_by_user() {
        let provider = Arc::new(MockRpcProvider::new());
        provider.push(RpcResponse::error(error_code::USER_REJECTION, "rejected"));

        let err = XverseWallet::connect(provider, Network::Mainnet, ConnectOptions::default())
            .await
            .err()
            .unwrap();
        assert_eq!(err.kind(), Some(WalletError::UserCancelled));
    }

    #[tokio::test]
    async fn test_connect_unreachable_provider() {
        let provider = Arc::new(MockRpcProvider::new());
        provider.push_unreachable();

        let err = XverseWallet::connect(provider, Network::Testnet, ConnectOptions::default())
            .await
            .err()
            .unwrap();
        assert_eq!(err.kind(), Some(WalletError::WalletNotInstalled));
    }

    #[tokio::test]
    async fn test_connect_network_mismatch() {
        let provider = Arc::new(MockRpcProvider::new());
        let mut result = connect_result();
        result["network"] = json!({ "bitcoin": { "name": "Testnet" } });
        provider.push(RpcResponse::success(result));

        let err = XverseWallet::connect(provider, Network::Mainnet, ConnectOptions::default())
            .await
            .err()
            .unwrap();
        assert_eq!(err.kind(), Some(WalletError::WalletNotInSameNetwork));
    }

    #[tokio::test]
    async fn test_regtest_is_rejected_before_contacting_provider() {
        let provider = Arc::new(MockRpcProvider::new());
        let err = XverseWallet::connect(provider.clone(), Network::Regtest, ConnectOptions::default())
            .await
            .err()
            .unwrap();

        assert_eq!(err.kind(), Some(WalletError::InvalidNetwork));
        assert!(provider.requests().is_empty());
    }

    #[tokio::test]
    async fn test_initialize_returns_fresh_session() {
        let provider = Arc::new(MockRpcProvider::new());
        let wallet = connected(&provider).await;

        provider.push(RpcResponse::success(json!({
            "addresses": [{
                "address": "tb1qonly",
                "publicKey": "02cc",
                "purpose": "payment",
                "addressType": "p2wpkh",
            }],
            "walletType": "software",
        })));
        let fresh = wallet.initialize(Network::Testnet).await.unwrap();

        assert_eq!(fresh.network(), Network::Testnet);
        assert_eq!(fresh.get_signer_address().address, "tb1qonly");
        assert!(!fresh.check_is_address_type_p2tr());
        // The old session is untouched.
        assert_eq!(wallet.network(), Network::Mainnet);
        assert_eq!(wallet.get_signer_address().address, "bc1pord");
    }

    #[tokio::test]
    async fn test_sign_psbt_groups_indexes_by_address() {
        let provider = Arc::new(MockRpcProvider::new());
        let wallet = connected(&provider).await;
        provider.push(RpcResponse::success(json!({ "psbt": "signed" })));

        let unsigned = UnsignedPsbt {
            psbt64: "cHNidP8=".to_string(),
            inputs_to_sign: vec![
                InputToSign {
                    address: "bc1pord".to_string(),
                    signing_indexes: vec![0],
                    sig_hash: None,
                },
                InputToSign {
                    address: "bc1qpay".to_string(),
                    signing_indexes: vec![1, 2],
                    sig_hash: None,
                },
                InputToSign {
                    address: "bc1pord".to_string(),
                    signing_indexes: vec![3],
                    sig_hash: None,
                },
            ],
        };
        let signed = wallet.sign_psbt(&unsigned, true).await.unwrap();
        assert_eq!(signed, "signed");

        let (name, params) = provider.requests().pop().unwrap();
        assert_eq!(name, "signPsbt");
        assert_eq!(
            params,
            json!({
                "psbt": "cHNidP8=",
                "signInputs": { "bc1pord": [0, 3], "bc1qpay": [1, 2] },
                "broadcast": true,
            })
        );
    }

    #[tokio::test]
    async fn test_sign_psbt_provider_failure_keeps_code() {
        let provider = Arc::new(MockRpcProvider::new());
        let wallet = connected(&provider).await;
        provider.push(RpcResponse::error(error_code::INTERNAL_ERROR, "boom"));

        let err = wallet.sign_psbt(&psbt("bc1pord", vec![0]), false).await.unwrap_err();
        match err {
            crate::Error::Wallet(exception) => {
                assert_eq!(exception.kind(), WalletError::RpcError);
                assert_eq!(exception.fault().unwrap().code, error_code::INTERNAL_ERROR);
                assert_eq!(exception.fault().unwrap().message, "boom");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[tokio::test]
    async fn test_sign_psbts_stops_at_first_failure() {
        let provider = Arc::new(MockRpcProvider::new());
        let wallet = connected(&provider).await;
        provider.push(RpcResponse::success(json!({ "psbt": "signed-0" })));
        provider.push(RpcResponse::success(json!({ "psbt": "signed-1" })));
        provider.push(RpcResponse::error(error_code::USER_REJECTION, "no"));
        provider.push(RpcResponse::success(json!({ "psbt": "signed-3" })));

        let psbts: Vec<UnsignedPsbt> = (0..4).map(|i| psbt("bc1pord", vec![i])).collect();
        let seen = Mutex::new(Vec::new());
        let progress = |i: usize| seen.lock().unwrap().push(i);

        let err = wallet
            .sign_psbts(&psbts, false, Some(&progress))
            .await
            .unwrap_err();

        assert_eq!(err.kind(), Some(WalletError::UserCancelled));
        assert_eq!(*seen.lock().unwrap(), vec![0, 1]);
        // connect + three signing attempts; item 3 is never sent.
        assert_eq!(provider.requests().len(), 4);
    }

    #[tokio::test]
    async fn test_sign_psbts_reports_every_index() {
        let provider = Arc::new(MockRpcProvider::new());
        let wallet = connected(&provider).await;
        provider.push(RpcResponse::success(json!({ "psbt": "a" })));
        provider.push(RpcResponse::success(json!({ "psbt": "b" })));

        let psbts = vec![psbt("bc1pord", vec![0]), psbt("bc1qpay", vec![1])];
        let seen = Mutex::new(Vec::new());
        let progress = |i: usize| seen.lock().unwrap().push(i);

        let signed = wallet.sign_psbts(&psbts, false, Some(&progress)).await.unwrap();
        assert_eq!(signed, vec!["a", "b"]);
        assert_eq!(*seen.lock().unwrap(), vec![0, 1]);
    }

    #[tokio::test]
    async fn test_sign_message_uses_signer_address() {
        let provider = Arc::new(MockRpcProvider::new());
        let wallet = connected(&provider).await;
        provider.push(RpcResponse::success(json!({ "signature": "sig", "messageHash": "h" })));
        provider.push(RpcResponse::success(json!({ "signature": "sig2" })));

        assert_eq!(wallet.sign_message("hello", None).await.unwrap(), "sig");
        assert_eq!(
            wallet
                .sign_message("hello", Some(MessageSigningProtocol::Ecdsa))
                .await
                .unwrap(),
            "sig2"
        );

        let requests = provider.requests();
        assert_eq!(
            requests[1].1,
            json!({ "address": "bc1pord", "message": "hello", "protocol": "BIP322" })
        );
        assert_eq!(requests[2].1["protocol"], json!("ECDSA"));
    }

    #[tokio::test]
    async fn test_sign_message_rejected() {
        let provider = Arc::new(MockRpcProvider::new());
        let wallet = connected(&provider).await;
        provider.push(RpcResponse::error(error_code::USER_REJECTION, "no"));

        let err = wallet.sign_message("hello", None).await.unwrap_err();
        assert_eq!(err.kind(), Some(WalletError::UserCancelled));
    }

    #[test]
    fn test_group_sign_inputs_merges_addresses() {
        let grouped = group_sign_inputs(&[
            InputToSign {
                address: "a".to_string(),
                signing_indexes: vec![2],
                sig_hash: None,
            },
            InputToSign {
                address: "a".to_string(),
                signing_indexes: vec![0],
                sig_hash: None,
            },
        ]);
        assert_eq!(grouped["a"], vec![2, 0]);
    }
}
