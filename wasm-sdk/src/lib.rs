//! Bitcoin Wallet Adapter - WASM Bindings
//!
//! This crate exposes the core wallet adapters to JavaScript. The browser's
//! provider objects (sats-connect's `request` and callback helpers, `window.unisat`)
//! are wrapped so the core adapters can drive them.
//!
//! **Note:** This crate is WASM-only and will not compile for native targets.
//!
//! # Usage from JavaScript/TypeScript
//!
//! ```javascript
//! import init, { Wallet, JsXverseProvider } from '@wallet-adapter/sdk';
//! import { request } from 'sats-connect';
//!
//! // Initialize WASM
//! await init();
//!
//! // Connect through sats-connect's request function
//! const wallet = await Wallet.connectXverse(new JsXverseProvider(request), 'mainnet');
//!
//! // Sign with the ordinals address
//! const signed = await wallet.signPsbt({ psbt64, inputsToSign }, false);
//! ```

// This crate only compiles for WASM targets
#![cfg(target_arch = "wasm32")]

mod error;
mod js_types;
mod providers;
mod wallet;

use serde::Serialize;
use wasm_bindgen::prelude::*;

pub use error::*;
pub use js_types::*;
pub use providers::*;
pub use wallet::*;

/// Initialize the WASM module.
///
/// This sets up logging and panic hooks for better debugging.
#[wasm_bindgen(start)]
pub fn initialize() {
    // Set up panic hook for better error messages
    #[cfg(feature = "console_error_panic_hook")]
    console_error_panic_hook::set_once();

    // Initialize logging
    console_log::init_with_level(log::Level::Debug).ok();
    log::info!("Wallet adapter initialized");
}

/// Serialize a value to JsValue as a plain object (not a Map).
fn to_js_value<T: Serialize + ?Sized>(value: &T) -> Result<JsValue, JsValue> {
    let serializer = serde_wasm_bindgen::Serializer::new().serialize_maps_as_objects(true);
    value
        .serialize(&serializer)
        .map_err(|e| JsValue::from_str(&format!("Serialization error: {}", e)))
}
