//! The capability contract every wallet provider adapter implements.
//!
//! Callers only ever see [`BitcoinWallet`]. How a given provider is reached
//! (callbacks, RPC requests or an injected object) stays inside its adapter.

use crate::error::{Result, WalletError};
use crate::network::Network;
use crate::types::{
    Address, AddressPurpose, AddressType, MessageSigningProtocol, UnsignedPsbt, WalletName,
    WalletType,
};
use std::future::Future;
use std::pin::Pin;

/// Type alias for adapter futures.
///
/// On WASM targets, futures don't need to be `Send` since JavaScript is single-threaded.
/// On native targets, futures should be `Send` to allow use with multi-threaded runtimes.
#[cfg(target_arch = "wasm32")]
pub type WalletFuture<'a, T> = Pin<Box<dyn Future<Output = Result<T>> + 'a>>;

#[cfg(not(target_arch = "wasm32"))]
pub type WalletFuture<'a, T> = Pin<Box<dyn Future<Output = Result<T>> + Send + 'a>>;

/// Thread-safety bound for adapters and provider handles.
///
/// Empty on WASM, where JavaScript handles are never `Send`.
#[cfg(target_arch = "wasm32")]
pub trait MaybeSendSync {}

#[cfg(target_arch = "wasm32")]
impl<T: ?Sized> MaybeSendSync for T {}

#[cfg(not(target_arch = "wasm32"))]
pub trait MaybeSendSync: Send + Sync {}

#[cfg(not(target_arch = "wasm32"))]
impl<T: Send + Sync + ?Sized> MaybeSendSync for T {}

/// Batch signing progress callback, called with the index of a signed PSBT.
pub trait ProgressFn: Fn(usize) + MaybeSendSync {}

impl<F: Fn(usize) + MaybeSendSync + ?Sized> ProgressFn for F {}

/// Connection state shared by all adapters.
///
/// Built once per successful connection and never mutated afterwards.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WalletState {
    network: Network,
    signer_address: Address,
    addresses: Vec<Address>,
    wallet_type: WalletType,
    payment_address: Option<Address>,
}

impl WalletState {
    /// Derive the signer and payment addresses from a provider's address list.
    ///
    /// An empty list means the provider connected nothing and fails with
    /// `wallet_not_connected`.
    pub fn new(network: Network, addresses: Vec<Address>, wallet_type: WalletType) -> Result<Self> {
        let signer_address = select_signer_address(&addresses)
            .cloned()
            .ok_or_else(|| {
                log::error!("Provider returned no addresses");
                WalletError::WalletNotConnected
            })?;
        let payment_address = find_payment_address(&addresses).cloned();

        Ok(Self {
            network,
            signer_address,
            addresses,
            wallet_type,
            payment_address,
        })
    }

    pub fn network(&self) -> Network {
        self.network
    }

    pub fn signer_address(&self) -> &Address {
        &self.signer_address
    }

    pub fn addresses(&self) -> &[Address] {
        &self.addresses
    }

    pub fn wallet_type(&self) -> WalletType {
        self.wallet_type
    }

    pub fn payment_address(&self) -> Option<&Address> {
        self.payment_address.as_ref()
    }
}

/// First `Ordinals` address, falling back to the first address.
pub fn select_signer_address(addresses: &[Address]) -> Option<&Address> {
    addresses
        .iter()
        .find(|a| a.purpose == AddressPurpose::Ordinals)
        .or_else(|| addresses.first())
}

/// First `Payment` address, if any.
pub fn find_payment_address(addresses: &[Address]) -> Option<&Address> {
    addresses
        .iter()
        .find(|a| a.purpose == AddressPurpose::Payment)
}

/// A connected wallet session with one provider.
///
/// Operations on one instance are single-flight: don't start a second
/// signing request before the first has resolved.
pub trait BitcoinWallet: MaybeSendSync {
    /// Fixed identifier of the provider behind this adapter.
    fn wallet_name(&self) -> WalletName;

    /// Connection state captured when this instance was created.
    fn state(&self) -> &WalletState;

    fn network(&self) -> Network {
        self.state().network()
    }

    fn addresses(&self) -> &[Address] {
        self.state().addresses()
    }

    fn wallet_type(&self) -> WalletType {
        self.state().wallet_type()
    }

    fn payment_address(&self) -> Option<&Address> {
        self.state().payment_address()
    }

    /// Address used for ordinal and rune signing.
    fn get_signer_address(&self) -> &Address {
        self.state().signer_address()
    }

    fn check_is_address_type_p2tr(&self) -> bool {
        self.get_signer_address().address_type == AddressType::P2tr
    }

    /// Run the provider handshake for `network` and return a fresh session.
    ///
    /// `self` is left untouched and stays usable.
    fn initialize(&self, network: Network) -> WalletFuture<'_, Box<dyn BitcoinWallet>>;

    /// Sign one PSBT, returning it base64-encoded.
    fn sign_psbt<'a>(&'a self, psbt: &'a UnsignedPsbt, broadcast: bool)
    -> WalletFuture<'a, String>;

    /// Sign PSBTs in order. Fails as a whole on the first failure.
    fn sign_psbts<'a>(
        &'a self,
        psbts: &'a [UnsignedPsbt],
        broadcast: bool,
        progress: Option<&'a dyn ProgressFn>,
    ) -> WalletFuture<'a, Vec<String>>;

    /// Sign `message` with the signer address. Defaults to BIP-322 simple.
    fn sign_message<'a>(
        &'a self,
        message: &'a str,
        protocol: Option<MessageSigningProtocol>,
    ) -> WalletFuture<'a, String>;
}

/// Sign each PSBT in turn, reporting every index as soon as it is signed.
pub(crate) async fn sign_sequentially<W: BitcoinWallet + ?Sized>(
    wallet: &W,
    psbts: &[UnsignedPsbt],
    broadcast: bool,
    progress: Option<&dyn ProgressFn>,
) -> Result<Vec<String>> {
    let mut signed = Vec::with_capacity(psbts.len());
    for (index, psbt) in psbts.iter().enumerate() {
        signed.push(wallet.sign_psbt(psbt, broadcast).await?);
        if let Some(progress) = progress {
            progress(index);
        }
    }
    Ok(signed)
}
