//! Connecting to any supported provider through one entry point.

use crate::adapter::BitcoinWallet;
use crate::error::Result;
use crate::network::Network;
use crate::options::ConnectOptions;
use crate::provider::rpc::RpcProvider;
use crate::provider::sats_connect::SatsConnectProvider;
use crate::provider::unisat::UnisatProvider;
use crate::types::WalletName;
use crate::wallets::{MagicEdenWallet, UnisatWallet, XverseWallet};
use std::sync::Arc;

/// Handle to one provider, as injected by the host environment.
#[derive(Clone)]
pub enum WalletProvider {
    Xverse(Arc<dyn RpcProvider>),
    MagicEden(Arc<dyn SatsConnectProvider>),
    /// `None` when `window.unisat` is missing.
    Unisat(Option<Arc<dyn UnisatProvider>>),
}

impl WalletProvider {
    pub fn wallet_name(&self) -> WalletName {
        match self {
            WalletProvider::Xverse(_) => WalletName::Xverse,
            WalletProvider::MagicEden(_) => WalletName::MagicEden,
            WalletProvider::Unisat(_) => WalletName::Unisat,
        }
    }
}

/// Connect to `provider` on `network`.
///
/// `options` only affects the sats-connect providers. Unisat has no prompt
/// messages or purposes to configure.
pub async fn connect(
    provider: WalletProvider,
    network: Network,
    options: ConnectOptions,
) -> Result<Box<dyn BitcoinWallet>> {
    log::debug!("Connecting to {} on {}", provider.wallet_name(), network);

    let wallet: Box<dyn BitcoinWallet> = match provider {
        WalletProvider::Xverse(handle) => {
            Box::new(XverseWallet::connect(handle, network, options).await?)
        }
        WalletProvider::MagicEden(handle) => {
            Box::new(MagicEdenWallet::connect(handle, network, options).await?)
        }
        WalletProvider::Unisat(handle) => Box::new(UnisatWallet::connect(handle, network).await?),
    };
    Ok(wallet)
}
