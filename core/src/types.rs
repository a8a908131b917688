//! Shared domain types for the wallet adapters.

use crate::error::{Error, WalletError};
use serde::{Deserialize, Serialize};

/// Intended role of an address exposed by a wallet.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AddressPurpose {
    /// Funds fees and non-ordinal inputs.
    Payment,
    /// Holds ordinals and runes; signs for them.
    Ordinals,
}

/// Script type of an address.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AddressType {
    P2pkh,
    P2sh,
    P2wpkh,
    P2wsh,
    P2tr,
    Stacks,
}

/// Where the keys behind an address live.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WalletType {
    #[default]
    Software,
    Ledger,
    Keystone,
}

impl AddressPurpose {
    pub fn as_str(self) -> &'static str {
        match self {
            AddressPurpose::Payment => "payment",
            AddressPurpose::Ordinals => "ordinals",
        }
    }
}

impl AddressType {
    pub fn as_str(self) -> &'static str {
        match self {
            AddressType::P2pkh => "p2pkh",
            AddressType::P2sh => "p2sh",
            AddressType::P2wpkh => "p2wpkh",
            AddressType::P2wsh => "p2wsh",
            AddressType::P2tr => "p2tr",
            AddressType::Stacks => "stacks",
        }
    }
}

impl WalletType {
    pub fn as_str(self) -> &'static str {
        match self {
            WalletType::Software => "software",
            WalletType::Ledger => "ledger",
            WalletType::Keystone => "keystone",
        }
    }

    pub fn is_hardware(self) -> bool {
        !matches!(self, WalletType::Software)
    }
}

/// A Bitcoin address returned by a wallet provider.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Address {
    pub address: String,
    /// Public key (hex-encoded).
    pub public_key: String,
    pub purpose: AddressPurpose,
    pub address_type: AddressType,
    #[serde(default)]
    pub wallet_type: WalletType,
}

/// Inputs of a PSBT that one address must sign.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InputToSign {
    pub address: String,
    pub signing_indexes: Vec<u32>,
    /// Sighash type override for these inputs.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sig_hash: Option<u8>,
}

/// A base64 PSBT together with its signing instructions.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UnsignedPsbt {
    pub psbt64: String,
    pub inputs_to_sign: Vec<InputToSign>,
}

/// Provider an adapter talks to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum WalletName {
    Xverse,
    Unisat,
    MagicEden,
}

impl WalletName {
    pub fn as_str(self) -> &'static str {
        match self {
            WalletName::Xverse => "xverse",
            WalletName::Unisat => "unisat",
            WalletName::MagicEden => "magic-eden",
        }
    }
}

impl std::fmt::Display for WalletName {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for WalletName {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "xverse" => Ok(WalletName::Xverse),
            "unisat" => Ok(WalletName::Unisat),
            "magic-eden" | "magiceden" => Ok(WalletName::MagicEden),
            _ => Err(WalletError::WalletNotSupported.into()),
        }
    }
}

/// Protocol used to sign arbitrary messages.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MessageSigningProtocol {
    #[serde(rename = "ecdsa")]
    Ecdsa,
    #[default]
    #[serde(rename = "bip322-simple")]
    Bip322Simple,
}

impl MessageSigningProtocol {
    pub fn as_str(self) -> &'static str {
        match self {
            MessageSigningProtocol::Ecdsa => "ecdsa",
            MessageSigningProtocol::Bip322Simple => "bip322-simple",
        }
    }
}

impl std::str::FromStr for MessageSigningProtocol {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "ecdsa" => Ok(MessageSigningProtocol::Ecdsa),
            "bip322-simple" | "bip322" => Ok(MessageSigningProtocol::Bip322Simple),
            other => Err(Error::Parse(format!(
                "Unknown message signing protocol: {}",
                other
            ))),
        }
    }
}
