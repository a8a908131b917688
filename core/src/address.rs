//! Address classification for providers that don't report the address type.

use crate::error::{Result, WalletError};
use crate::types::AddressType;
use bitcoin::address::NetworkUnchecked;

/// Derive the script type of an address from its string form.
///
/// Anything that doesn't parse as a Bitcoin address of a known type is
/// reported as `rpc_error`: the provider handed us something unusable.
pub fn classify(address: &str) -> Result<AddressType> {
    let parsed: bitcoin::Address<NetworkUnchecked> = address.parse().map_err(|e| {
        log::error!("Provider returned an invalid address {}: {}", address, e);
        WalletError::RpcError
    })?;

    match parsed.assume_checked().address_type() {
        Some(bitcoin::AddressType::P2pkh) => Ok(AddressType::P2pkh),
        Some(bitcoin::AddressType::P2sh) => Ok(AddressType::P2sh),
        Some(bitcoin::AddressType::P2wpkh) => Ok(AddressType::P2wpkh),
        Some(bitcoin::AddressType::P2wsh) => Ok(AddressType::P2wsh),
        Some(bitcoin::AddressType::P2tr) => Ok(AddressType::P2tr),
        other => {
            log::error!("Unsupported address type {:?} for {}", other, address);
            Err(WalletError::RpcError.into())
        }
    }
}
