//! Bitcoin Wallet Adapter - Core Library
//!
//! One capability contract over the Xverse, Magic Eden and Unisat browser wallets.
//!
//! Each provider speaks its own protocol (sats-connect RPC requests, sats-connect
//! callbacks, an injected object with hex PSBTs). The adapters hide that behind
//! [`BitcoinWallet`] and report every failure in one closed [`WalletError`] taxonomy.
//! Providers are reached through traits so the host can inject JavaScript handles
//! in the browser or fakes in tests.
//!
//! # Example
//!
//! ```rust,ignore
//! use wallet_adapter_core::{connect, ConnectOptions, Network, WalletProvider};
//!
//! // Connect through a provider handle supplied by the host
//! let wallet = connect(WalletProvider::Xverse(my_rpc_provider), Network::Mainnet, ConnectOptions::default()).await?;
//!
//! // Sign with the ordinals address
//! let signed = wallet.sign_psbt(&unsigned, false).await?;
//! ```

pub mod adapter;
pub mod address;
pub mod connect;
pub mod encoding;
pub mod error;
pub mod network;
pub mod options;
pub mod provider;
pub mod types;
pub mod wallets;

pub use adapter::{BitcoinWallet, MaybeSendSync, ProgressFn, WalletFuture, WalletState};
pub use connect::{WalletProvider, connect};
pub use encoding::{base64_to_hex, hex_to_base64};
pub use error::{Error, ProviderError, Result, RpcFault, WalletError, WalletException};
pub use network::{BitcoinNetworkType, Network};
pub use options::ConnectOptions;
pub use provider::ProviderFuture;
pub use types::{
    Address, AddressPurpose, AddressType, InputToSign, MessageSigningProtocol, UnsignedPsbt,
    WalletName, WalletType,
};
pub use wallets::{MagicEdenWallet, UnisatWallet, XverseWallet};
