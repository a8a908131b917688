//! Bitcoin networks and their provider-specific names.

use crate::error::{Error, Result, WalletError};
use serde::{Deserialize, Serialize};

/// Bitcoin network a wallet is connected to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Network {
    /// Bitcoin mainnet.
    Mainnet,
    /// Bitcoin testnet3.
    Testnet,
    /// Bitcoin testnet4.
    Testnet4,
    /// Bitcoin regtest (local development).
    Regtest,
}

impl Network {
    /// Translate to the sats-connect network type.
    ///
    /// Fails with `invalid_network` for networks sats-connect wallets don't serve.
    pub fn to_sats_connect(self) -> Result<BitcoinNetworkType> {
        match self {
            Network::Mainnet => Ok(BitcoinNetworkType::Mainnet),
            Network::Testnet => Ok(BitcoinNetworkType::Testnet),
            Network::Testnet4 => Ok(BitcoinNetworkType::Testnet4),
            Network::Regtest => Err(WalletError::InvalidNetwork.into()),
        }
    }
}

impl std::str::FromStr for Network {
    type Err = Error;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "mainnet" | "bitcoin" => Ok(Network::Mainnet),
            "testnet" | "testnet3" => Ok(Network::Testnet),
            "testnet4" => Ok(Network::Testnet4),
            "regtest" => Ok(Network::Regtest),
            _ => Err(WalletError::InvalidNetwork.into()),
        }
    }
}

impl std::fmt::Display for Network {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Network::Mainnet => write!(f, "mainnet"),
            Network::Testnet => write!(f, "testnet"),
            Network::Testnet4 => write!(f, "testnet4"),
            Network::Regtest => write!(f, "regtest"),
        }
    }
}

/// Network type as named by sats-connect providers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BitcoinNetworkType {
    Mainnet,
    Testnet,
    Testnet4,
    Signet,
    Regtest,
}

impl BitcoinNetworkType {
    pub fn as_str(self) -> &'static str {
        match self {
            BitcoinNetworkType::Mainnet => "Mainnet",
            BitcoinNetworkType::Testnet => "Testnet",
            BitcoinNetworkType::Testnet4 => "Testnet4",
            BitcoinNetworkType::Signet => "Signet",
            BitcoinNetworkType::Regtest => "Regtest",
        }
    }
}

impl std::fmt::Display for BitcoinNetworkType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sats_connect_translation() {
        assert_eq!(
            Network::Mainnet.to_sats_connect().unwrap(),
            BitcoinNetworkType::Mainnet
        );
        assert_eq!(
            Network::Testnet.to_sats_connect().unwrap(),
            BitcoinNetworkType::Testnet
        );
        assert_eq!(
            Network::Testnet4.to_sats_connect().unwrap(),
            BitcoinNetworkType::Testnet4
        );

        let err = Network::Regtest.to_sats_connect().unwrap_err();
        assert_eq!(err.kind(), Some(WalletError::InvalidNetwork));
    }

    #[test]
    fn test_parse_network() {
        assert_eq!("bitcoin".parse::<Network>().unwrap(), Network::Mainnet);
        assert_eq!("Testnet4".parse::<Network>().unwrap(), Network::Testnet4);
        assert_eq!("testnet3".parse::<Network>().unwrap(), Network::Testnet);

        let err = "signet".parse::<Network>().unwrap_err();
        assert_eq!(err.kind(), Some(WalletError::InvalidNetwork));
    }

    #[test]
    fn test_display_round_trips() {
        for network in [
            Network::Mainnet,
            Network::Testnet,
            Network::Testnet4,
            Network::Regtest,
        ] {
            assert_eq!(network.to_string().parse::<Network>().unwrap(), network);
            assert_eq!(
                serde_json::to_value(network).unwrap(),
                serde_json::Value::String(network.to_string())
            );
        }
    }

    #[test]
    fn test_sats_connect_wire_names() {
        assert_eq!(
            serde_json::to_value(BitcoinNetworkType::Testnet4).unwrap(),
            serde_json::json!("Testnet4")
        );
    }
}
