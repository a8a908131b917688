//! Magic Eden adapter over sats-connect's callback helpers.

use crate::adapter::{BitcoinWallet, ProgressFn, WalletFuture, WalletState, sign_sequentially};
use crate::error::{Error, Result, WalletError, WalletException};
use crate::network::{BitcoinNetworkType, Network};
use crate::options::{ConnectOptions, DEFAULT_ADDRESS_MESSAGE};
use crate::provider::ProviderFuture;
use crate::provider::sats_connect::{
    Callbacks, GetAddressPayload, NetworkPayload, Outcome, SatsConnectProvider,
    SignMessagePayload, SignTransactionPayload,
};
use crate::types::{
    Address, AddressPurpose, MessageSigningProtocol, UnsignedPsbt, WalletName, WalletType,
};
use futures::channel::oneshot;
use std::sync::Arc;

/// Purposes requested on connect unless the caller overrides them.
const DEFAULT_PURPOSES: [AddressPurpose; 2] = [AddressPurpose::Payment, AddressPurpose::Ordinals];

/// Magic Eden wallet session.
pub struct MagicEdenWallet {
    state: WalletState,
    provider: Arc<dyn SatsConnectProvider>,
    internal_network: BitcoinNetworkType,
    options: ConnectOptions,
}

impl MagicEdenWallet {
    pub fn new(
        network: Network,
        addresses: Vec<Address>,
        provider: Arc<dyn SatsConnectProvider>,
        options: ConnectOptions,
    ) -> Result<Self> {
        let internal_network = network.to_sats_connect()?;
        let state = WalletState::new(network, addresses, WalletType::Software)?;

        Ok(Self {
            state,
            provider,
            internal_network,
            options,
        })
    }

    /// Ask the provider for payment and ordinals addresses and return a new session.
    pub async fn connect(
        provider: Arc<dyn SatsConnectProvider>,
        network: Network,
        options: ConnectOptions,
    ) -> Result<Self> {
        let payload = GetAddressPayload {
            purposes: options.purposes_or(&DEFAULT_PURPOSES),
            message: options
                .address_message
                .clone()
                .unwrap_or_else(|| DEFAULT_ADDRESS_MESSAGE.to_string()),
            network: NetworkPayload {
                network_type: network.to_sats_connect()?,
            },
        };

        let (callbacks, receiver) = Callbacks::channel();
        let response = settle(provider.get_address(payload, callbacks), receiver).await?;

        log::debug!(
            "Magic Eden connected {} addresses on {}",
            response.addresses.len(),
            network
        );
        Self::new(network, response.addresses, provider, options)
    }

    /// Network type sent to the provider.
    pub fn internal_network(&self) -> BitcoinNetworkType {
        self.internal_network
    }

    fn network_payload(&self) -> NetworkPayload {
        NetworkPayload {
            network_type: self.internal_network,
        }
    }
}

/// Drive one callback-style call to completion.
///
/// An invocation failure means the provider is missing, unless the
/// callbacks were already settled before it failed.
async fn settle<T>(
    invocation: ProviderFuture<'_, ()>,
    mut receiver: oneshot::Receiver<Outcome<T>>,
) -> Result<T> {
    let outcome = match invocation.await {
        Ok(()) => receiver.await.ok(),
        Err(e) => match receiver.try_recv() {
            Ok(Some(outcome)) => Some(outcome),
            _ => {
                log::error!("Wallet not installed: {}", e);
                return Err(WalletError::WalletNotInstalled.into());
            }
        },
    };

    match outcome {
        Some(Outcome::Finished(response)) => Ok(response),
        Some(Outcome::Failed(e)) => {
            log::error!("Provider answered with an unreadable response: {}", e);
            Err(WalletException::new(WalletError::RpcError).into())
        }
        Some(Outcome::Cancelled) | None => {
            log::warn!("User cancelled");
            Err(WalletError::UserCancelled.into())
        }
    }
}

impl BitcoinWallet for MagicEdenWallet {
    fn wallet_name(&self) -> WalletName {
        WalletName::MagicEden
    }

    fn state(&self) -> &WalletState {
        &self.state
    }

    fn initialize(&self, network: Network) -> WalletFuture<'_, Box<dyn BitcoinWallet>> {
        Box::pin(async move {
            let wallet =
                MagicEdenWallet::connect(self.provider.clone(), network, self.options.clone())
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
            let payload = SignTransactionPayload {
                network: self.network_payload(),
                message: self.options.transaction_message.clone(),
                psbt_base64: psbt.psbt64.clone(),
                broadcast,
                inputs_to_sign: psbt.inputs_to_sign.clone(),
            };

            let (callbacks, receiver) = Callbacks::channel();
            let response =
                settle(self.provider.sign_transaction(payload, callbacks), receiver).await?;

            // A response without a PSBT means nothing was signed.
            match response.psbt_base64 {
                Some(psbt) => Ok(psbt),
                None => {
                    log::warn!("User cancelled");
                    Err(Error::from(WalletError::UserCancelled))
                }
            }
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
            let payload = SignMessagePayload {
                address: self.get_signer_address().address.clone(),
                message: message.to_string(),
                network: self.network_payload(),
                protocol: protocol.unwrap_or_default().into(),
            };

            let (callbacks, receiver) = Callbacks::channel();
            settle(self.provider.sign_message(payload, callbacks), receiver).await
        })
    }
}
