//! Unisat adapter over the injected provider object.
//!
//! Unisat exchanges hex PSBTs, so every PSBT is converted from base64 on the
//! way in and back to base64 on the way out.

use crate::adapter::{BitcoinWallet, ProgressFn, WalletFuture, WalletState};
use crate::address::classify;
use crate::encoding::{base64_to_hex, hex_to_base64};
use crate::error::{Error, Result, WalletError};
use crate::network::Network;
use crate::provider::unisat::{Chain, SignPsbtOptions, UnisatProvider};
use crate::types::{
    Address, AddressPurpose, MessageSigningProtocol, UnsignedPsbt, WalletName, WalletType,
};
use std::sync::Arc;

/// Unisat wallet session.
pub struct UnisatWallet {
    state: WalletState,
    provider: Option<Arc<dyn UnisatProvider>>,
    chain: Chain,
}

impl UnisatWallet {
    pub fn new(
        network: Network,
        addresses: Vec<Address>,
        provider: Option<Arc<dyn UnisatProvider>>,
    ) -> Result<Self> {
        let chain = Chain::from_network(network)?;
        let state = WalletState::new(network, addresses, WalletType::Software)?;

        Ok(Self {
            state,
            provider,
            chain,
        })
    }

    /// Move the provider onto `network`'s chain, request its accounts and
    /// return a new session.
    ///
    /// `provider` is `None` when the extension isn't injected.
    pub async fn connect(
        provider: Option<Arc<dyn UnisatProvider>>,
        network: Network,
    ) -> Result<Self> {
        let unisat = installed(provider.as_ref())?;
        let chain = Chain::from_network(network)?;

        let current = unisat.get_chain().await.map_err(|e| {
            log::error!("Failed to read Unisat chain: {}", e);
            WalletError::RpcError
        })?;

        if !current.is(chain) {
            log::debug!("Switching Unisat from {} to {}", current.chain, chain);
            let switched = unisat.switch_chain(chain).await.map_err(|e| {
                log::warn!("Unisat refused to switch to {}: {}", chain, e);
                WalletError::WalletNotInSameNetwork
            })?;
            if !switched.is(chain) {
                log::warn!("Unisat is on {} but {} was requested", switched.chain, chain);
                return Err(WalletError::WalletNotInSameNetwork.into());
            }
        }

        let accounts = match unisat.request_accounts().await {
            Ok(Some(accounts)) => accounts,
            Ok(None) | Err(_) => {
                log::warn!("User cancelled");
                return Err(WalletError::UserCancelled.into());
            }
        };

        let public_key = unisat.get_public_key().await.map_err(|e| {
            log::error!("Failed to read Unisat public key: {}", e);
            WalletError::RpcError
        })?;

        let addresses = accounts
            .into_iter()
            .map(|address| {
                Ok(Address {
                    address_type: classify(&address)?,
                    address,
                    public_key: public_key.clone(),
                    purpose: AddressPurpose::Ordinals,
                    wallet_type: WalletType::Software,
                })
            })
            .collect::<Result<Vec<_>>>()?;

        log::debug!("Unisat connected {} addresses on {}", addresses.len(), network);
        Self::new(network, addresses, provider)
    }

    /// Chain the provider was moved onto.
    pub fn chain(&self) -> Chain {
        self.chain
    }

    fn provider(&self) -> Result<&Arc<dyn UnisatProvider>> {
        installed(self.provider.as_ref())
    }
}

fn installed(provider: Option<&Arc<dyn UnisatProvider>>) -> Result<&Arc<dyn UnisatProvider>> {
    provider.ok_or_else(|| {
        log::error!("Unisat is not installed");
        Error::from(WalletError::WalletNotInstalled)
    })
}

/// Convert a signed hex PSBT from the provider back to base64.
fn signed_to_base64(signed_hex: &str) -> Result<String> {
    hex_to_base64(signed_hex).map_err(|e| {
        log::error!("Unisat returned an unreadable PSBT: {}", e);
        WalletError::RpcError.into()
    })
}

impl BitcoinWallet for UnisatWallet {
    fn wallet_name(&self) -> WalletName {
        WalletName::Unisat
    }

    fn state(&self) -> &WalletState {
        &self.state
    }

    fn initialize(&self, network: Network) -> WalletFuture<'_, Box<dyn BitcoinWallet>> {
        Box::pin(async move {
            let wallet = UnisatWallet::connect(self.provider.clone(), network).await?;
            Ok(Box::new(wallet) as Box<dyn BitcoinWallet>)
        })
    }

    fn sign_psbt<'a>(
        &'a self,
        psbt: &'a UnsignedPsbt,
        broadcast: bool,
    ) -> WalletFuture<'a, String> {
        Box::pin(async move {
            let unisat = self.provider()?;
            let psbt_hex = base64_to_hex(&psbt.psbt64)?;
            let options = SignPsbtOptions::for_psbt(psbt, broadcast);

            let signed = unisat.sign_psbt(psbt_hex, options).await.map_err(|e| {
                log::warn!("User cancelled: {}", e);
                WalletError::UserCancelled
            })?;
            signed_to_base64(&signed)
        })
    }

    /// Signs the whole batch in one prompt, so progress is reported once with
    /// the last index.
    fn sign_psbts<'a>(
        &'a self,
        psbts: &'a [UnsignedPsbt],
        broadcast: bool,
        progress: Option<&'a dyn ProgressFn>,
    ) -> WalletFuture<'a, Vec<String>> {
        Box::pin(async move {
            let unisat = self.provider()?;

            match psbts {
                [] => return Ok(Vec::new()),
                [single] => return Ok(vec![self.sign_psbt(single, broadcast).await?]),
                _ => {}
            }

            let mut psbt_hexs = Vec::with_capacity(psbts.len());
            let mut options = Vec::with_capacity(psbts.len());
            for psbt in psbts {
                psbt_hexs.push(base64_to_hex(&psbt.psbt64)?);
                options.push(SignPsbtOptions::for_psbt(psbt, broadcast));
            }

            let signed = unisat.sign_psbts(psbt_hexs, options).await.map_err(|e| {
                log::warn!("User cancelled: {}", e);
                WalletError::UserCancelled
            })?;

            if signed.len() != psbts.len() {
                log::error!(
                    "Unisat signed {} PSBTs out of {}",
                    signed.len(),
                    psbts.len()
                );
                return Err(WalletError::RpcError.into());
            }

            if let Some(progress) = progress {
                progress(signed.len() - 1);
            }

            signed
                .iter()
                .map(|hex| signed_to_base64(hex))
                .collect::<Result<Vec<_>>>()
        })
    }

    /// Provider failures are returned as [`Error::Provider`], untranslated.
    fn sign_message<'a>(
        &'a self,
        message: &'a str,
        protocol: Option<MessageSigningProtocol>,
    ) -> WalletFuture<'a, String> {
        Box::pin(async move {
            let unisat = self.provider()?;
            unisat
                .sign_message(message.to_string(), protocol.unwrap_or_default())
                .await
                .map_err(Error::Provider)
        })
    }
}
