//! Error conversion utilities for WASM.

use js_sys::Reflect;
use wallet_adapter_core::{Error, ProviderError};
use wasm_bindgen::prelude::*;

/// `name` of every error object built from a wallet failure.
pub const WALLET_EXCEPTION_NAME: &str = "WalletException";

/// Convert a core error into a JavaScript `Error`.
///
/// Wallet failures get `name = "WalletException"` and a `code` property holding
/// the snake_case kind. Provider details of an `rpc_error` are attached as
/// `providerCode` and `providerMessage`.
pub fn to_js_error(err: Error) -> JsValue {
    match err {
        Error::Wallet(exception) => {
            let error = js_sys::Error::new(exception.message());
            error.set_name(WALLET_EXCEPTION_NAME);
            set(&error, "code", &JsValue::from_str(exception.kind().code()));
            if let Some(fault) = exception.fault() {
                set(&error, "providerCode", &JsValue::from_f64(fault.code as f64));
                set(&error, "providerMessage", &JsValue::from_str(&fault.message));
            }
            error.into()
        }
        Error::Provider(provider) => {
            let error = js_sys::Error::new(&provider.message);
            if let Some(code) = provider.code {
                set(&error, "code", &JsValue::from_f64(code as f64));
            }
            error.into()
        }
        other => js_sys::Error::new(&other.to_string()).into(),
    }
}

fn set(error: &js_sys::Error, key: &str, value: &JsValue) {
    // Setting a property on a fresh Error object can't fail.
    let _ = Reflect::set(error, &JsValue::from_str(key), value);
}

/// Read a value thrown or rejected by a provider.
///
/// Picks up `message` and a numeric `code` when the value is an object,
/// otherwise stringifies it.
pub fn provider_error(value: JsValue) -> ProviderError {
    if let Some(message) = value.as_string() {
        return ProviderError::new(message);
    }

    let message = Reflect::get(&value, &JsValue::from_str("message"))
        .ok()
        .and_then(|m| m.as_string())
        .unwrap_or_else(|| format!("{:?}", value));
    let code = Reflect::get(&value, &JsValue::from_str("code"))
        .ok()
        .and_then(|c| c.as_f64());

    match code {
        Some(code) => ProviderError::with_code(code as i64, message),
        None => ProviderError::new(message),
    }
}
