//! WASM-friendly type wrappers.
//!
//! These types wrap the core SDK types with wasm_bindgen annotations
//! for seamless JavaScript interop.

use wasm_bindgen::prelude::*;

/// A Bitcoin address exposed by the connected wallet.
#[wasm_bindgen]
#[derive(Debug, Clone)]
pub struct Address {
    #[wasm_bindgen(getter_with_clone)]
    pub address: String,
    /// Public key (hex-encoded).
    #[wasm_bindgen(getter_with_clone, js_name = "publicKey")]
    pub public_key: String,
    /// `payment` or `ordinals`.
    #[wasm_bindgen(getter_with_clone)]
    pub purpose: String,
    /// `p2pkh`, `p2sh`, `p2wpkh`, `p2wsh`, `p2tr` or `stacks`.
    #[wasm_bindgen(getter_with_clone, js_name = "addressType")]
    pub address_type: String,
    /// `software`, `ledger` or `keystone`.
    #[wasm_bindgen(getter_with_clone, js_name = "walletType")]
    pub wallet_type: String,
}

impl From<&wallet_adapter_core::Address> for Address {
    fn from(address: &wallet_adapter_core::Address) -> Self {
        Self {
            address: address.address.clone(),
            public_key: address.public_key.clone(),
            purpose: address.purpose.as_str().to_string(),
            address_type: address.address_type.as_str().to_string(),
            wallet_type: address.wallet_type.as_str().to_string(),
        }
    }
}
