//! Injected-object provider boundary (the object browsers expose as `window.unisat`).
//!
//! The provider speaks hex-encoded PSBTs and selects networks by chain.

use crate::adapter::MaybeSendSync;
use crate::error::{Result, WalletError};
use crate::network::Network;
use crate::provider::ProviderFuture;
use crate::types::{MessageSigningProtocol, UnsignedPsbt};
use serde::{Deserialize, Serialize};

/// Chains the provider can switch between.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Chain {
    BitcoinMainnet,
    BitcoinTestnet,
    BitcoinTestnet4,
    BitcoinSignet,
    FractalBitcoinMainnet,
    FractalBitcoinTestnet,
}

impl Chain {
    /// Chain serving `network`.
    ///
    /// Fails with `invalid_network` for regtest, which the provider can't reach.
    pub fn from_network(network: Network) -> Result<Self> {
        match network {
            Network::Mainnet => Ok(Chain::BitcoinMainnet),
            Network::Testnet => Ok(Chain::BitcoinTestnet),
            Network::Testnet4 => Ok(Chain::BitcoinTestnet4),
            Network::Regtest => Err(WalletError::InvalidNetwork.into()),
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Chain::BitcoinMainnet => "BITCOIN_MAINNET",
            Chain::BitcoinTestnet => "BITCOIN_TESTNET",
            Chain::BitcoinTestnet4 => "BITCOIN_TESTNET4",
            Chain::BitcoinSignet => "BITCOIN_SIGNET",
            Chain::FractalBitcoinMainnet => "FRACTAL_BITCOIN_MAINNET",
            Chain::FractalBitcoinTestnet => "FRACTAL_BITCOIN_TESTNET",
        }
    }
}

impl std::fmt::Display for Chain {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Chain the provider reports being on.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChainInfo {
    /// Chain identifier, e.g. `BITCOIN_MAINNET`.
    #[serde(rename = "enum")]
    pub chain: String,
    pub name: String,
    /// `livenet` or `testnet`.
    pub network: String,
}

impl ChainInfo {
    pub fn is(&self, chain: Chain) -> bool {
        self.chain == chain.as_str()
    }
}

/// One input the provider should sign.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ToSignInput {
    pub address: String,
    pub index: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sighash_types: Option<Vec<u8>>,
    #[serde(default)]
    pub disable_tweak_signer: bool,
}

/// Options accompanying every PSBT handed to the provider.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SignPsbtOptions {
    /// Finalize inputs after signing.
    pub auto_finalized: bool,
    #[serde(default)]
    pub to_sign_inputs: Vec<ToSignInput>,
}

impl SignPsbtOptions {
    /// Flatten per-address signing instructions into one entry per input index.
    pub fn for_psbt(psbt: &UnsignedPsbt, auto_finalized: bool) -> Self {
        let to_sign_inputs = psbt
            .inputs_to_sign
            .iter()
            .flat_map(|input| {
                input.signing_indexes.iter().map(|&index| ToSignInput {
                    address: input.address.clone(),
                    index,
                    sighash_types: input.sig_hash.map(|sig_hash| vec![sig_hash]),
                    disable_tweak_signer: false,
                })
            })
            .collect();

        Self {
            auto_finalized,
            to_sign_inputs,
        }
    }
}

/// The injected provider object.
///
/// Every `Err` is the provider's own rejection, unparsed.
pub trait UnisatProvider: MaybeSendSync {
    fn get_chain(&self) -> ProviderFuture<'_, ChainInfo>;

    fn switch_chain(&self, chain: Chain) -> ProviderFuture<'_, ChainInfo>;

    /// Prompt the user to connect. `None` if the prompt produced nothing.
    fn request_accounts(&self) -> ProviderFuture<'_, Option<Vec<String>>>;

    /// Public key (hex) of the current account.
    fn get_public_key(&self) -> ProviderFuture<'_, String>;

    /// Sign a hex PSBT, returning the signed hex PSBT.
    fn sign_psbt(&self, psbt_hex: String, options: SignPsbtOptions) -> ProviderFuture<'_, String>;

    /// Sign several hex PSBTs in one prompt.
    fn sign_psbts(
        &self,
        psbt_hexs: Vec<String>,
        options: Vec<SignPsbtOptions>,
    ) -> ProviderFuture<'_, Vec<String>>;

    fn sign_message(
        &self,
        message: String,
        protocol: MessageSigningProtocol,
    ) -> ProviderFuture<'_, String>;
}
