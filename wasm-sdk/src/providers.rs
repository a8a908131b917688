//! JavaScript provider adapters for WASM.
//!
//! This module bridges the wallet SDKs living in the page (sats-connect and the
//! injected `window.unisat` object) to the provider traits of the core library.

use crate::error::provider_error;
use crate::to_js_value;
use js_sys::{Array, Function, Object, Promise, Reflect};
use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::cell::RefCell;
use std::rc::Rc;
use wallet_adapter_core::ProviderError;
use wallet_adapter_core::provider::ProviderFuture;
use wallet_adapter_core::provider::rpc::{RpcProvider, RpcResponse, error_code};
use wallet_adapter_core::provider::sats_connect::{
    Callbacks, GetAddressPayload, GetAddressResponse, SatsConnectProvider, SignMessagePayload,
    SignTransactionPayload, SignTransactionResponse,
};
use wallet_adapter_core::provider::unisat::{Chain, ChainInfo, SignPsbtOptions, UnisatProvider};
use wallet_adapter_core::types::MessageSigningProtocol;
use wasm_bindgen::prelude::*;
use wasm_bindgen_futures::JsFuture;

/// Call `function` and await its result if it returned a Promise.
async fn call(
    function: &Function,
    this: &JsValue,
    args: &[JsValue],
) -> Result<JsValue, ProviderError> {
    let args: Array = args.iter().collect();
    let result = function.apply(this, &args).map_err(provider_error)?;

    match result.dyn_into::<Promise>() {
        Ok(promise) => JsFuture::from(promise).await.map_err(provider_error),
        Err(value) => Ok(value),
    }
}

fn to_js<T: Serialize + ?Sized>(value: &T) -> Result<JsValue, ProviderError> {
    to_js_value(value).map_err(provider_error)
}

fn from_js<T: DeserializeOwned>(value: JsValue, what: &str) -> Result<T, ProviderError> {
    serde_wasm_bindgen::from_value(value)
        .map_err(|e| ProviderError::new(format!("Unexpected {} response: {}", what, e)))
}

/// sats-connect's `request` function, used by Xverse.
///
/// # Example (TypeScript)
///
/// ```typescript
/// import { request } from 'sats-connect';
///
/// const provider = new JsXverseProvider(request);
/// ```
#[wasm_bindgen]
#[derive(Clone)]
pub struct JsXverseProvider {
    request_fn: Function,
}

#[wasm_bindgen]
impl JsXverseProvider {
    /// Create a provider from `request: (method: string, params: object) => Promise<RpcResponse>`.
    #[wasm_bindgen(constructor)]
    pub fn new(request_fn: Function) -> Self {
        Self { request_fn }
    }
}

impl RpcProvider for JsXverseProvider {
    fn request(&self, method: &str, params: Value) -> ProviderFuture<'_, RpcResponse> {
        let method = JsValue::from_str(method);

        Box::pin(async move {
            let params = to_js(&params)?;
            let response = call(&self.request_fn, &JsValue::NULL, &[method, params]).await?;

            // An answer we can't read is the provider's fault, not a missing provider.
            Ok(from_js::<RpcResponse>(response, "request").unwrap_or_else(|e| {
                RpcResponse::error(error_code::INTERNAL_ERROR, e.message)
            }))
        })
    }
}

/// Magic Eden through sats-connect's callback helpers.
///
/// # Example (TypeScript)
///
/// ```typescript
/// import { getAddress, signTransaction, signMessage } from 'sats-connect';
///
/// const provider = new JsMagicEdenProvider(
///     getAddress,
///     signTransaction,
///     signMessage,
///     window.magicEden?.bitcoin,
/// );
/// ```
#[wasm_bindgen]
#[derive(Clone)]
pub struct JsMagicEdenProvider {
    get_address_fn: Function,
    sign_transaction_fn: Function,
    sign_message_fn: Function,
    provider: JsValue,
}

#[wasm_bindgen]
impl JsMagicEdenProvider {
    /// Create a provider from sats-connect helpers.
    ///
    /// # Arguments
    /// * `get_address_fn` - Function: `(options) => Promise<void>`
    /// * `sign_transaction_fn` - Function: `(options) => Promise<void>`
    /// * `sign_message_fn` - Function: `(options) => Promise<void>`
    /// * `provider` - The Magic Eden Bitcoin provider, handed to `getProvider`
    #[wasm_bindgen(constructor)]
    pub fn new(
        get_address_fn: Function,
        sign_transaction_fn: Function,
        sign_message_fn: Function,
        provider: JsValue,
    ) -> Self {
        Self {
            get_address_fn,
            sign_transaction_fn,
            sign_message_fn,
            provider,
        }
    }
}

impl JsMagicEdenProvider {
    /// Run one helper with a `{ payload, getProvider, onFinish, onCancel }` object.
    ///
    /// The closures are released once the helper's promise settles. Callbacks
    /// fired after that are lost and the call counts as cancelled.
    async fn invoke<P, T>(
        &self,
        helper: &Function,
        payload: &P,
        callbacks: Callbacks<T>,
    ) -> Result<(), ProviderError>
    where
        P: Serialize,
        T: DeserializeOwned + 'static,
    {
        let slot = Rc::new(RefCell::new(Some(callbacks)));

        let finish_slot = slot.clone();
        let on_finish = Closure::wrap(Box::new(move |response: JsValue| {
            if let Some(callbacks) = finish_slot.borrow_mut().take() {
                match from_js::<T>(response, "onFinish") {
                    Ok(response) => callbacks.on_finish(response),
                    Err(e) => callbacks.on_error(e),
                }
            }
        }) as Box<dyn FnMut(JsValue)>);

        let cancel_slot = slot.clone();
        let on_cancel = Closure::wrap(Box::new(move || {
            if let Some(callbacks) = cancel_slot.borrow_mut().take() {
                callbacks.on_cancel();
            }
        }) as Box<dyn FnMut()>);

        let provider = self.provider.clone();
        let get_provider = Closure::wrap(
            Box::new(move || Promise::resolve(&provider)) as Box<dyn FnMut() -> Promise>
        );

        let options = Object::new();
        for (key, value) in [
            ("payload", to_js(payload)?),
            ("getProvider", get_provider.as_ref().clone()),
            ("onFinish", on_finish.as_ref().clone()),
            ("onCancel", on_cancel.as_ref().clone()),
        ] {
            Reflect::set(&options, &JsValue::from_str(key), &value).map_err(provider_error)?;
        }

        call(helper, &JsValue::NULL, &[options.into()]).await?;
        Ok(())
    }
}

impl SatsConnectProvider for JsMagicEdenProvider {
    fn get_address(
        &self,
        payload: GetAddressPayload,
        callbacks: Callbacks<GetAddressResponse>,
    ) -> ProviderFuture<'_, ()> {
        Box::pin(async move { self.invoke(&self.get_address_fn, &payload, callbacks).await })
    }

    fn sign_transaction(
        &self,
        payload: SignTransactionPayload,
        callbacks: Callbacks<SignTransactionResponse>,
    ) -> ProviderFuture<'_, ()> {
        Box::pin(async move {
            self.invoke(&self.sign_transaction_fn, &payload, callbacks)
                .await
        })
    }

    fn sign_message(
        &self,
        payload: SignMessagePayload,
        callbacks: Callbacks<String>,
    ) -> ProviderFuture<'_, ()> {
        Box::pin(async move { self.invoke(&self.sign_message_fn, &payload, callbacks).await })
    }
}

/// The injected `window.unisat` object.
#[wasm_bindgen]
#[derive(Clone)]
pub struct JsUnisatProvider {
    unisat: JsValue,
}

#[wasm_bindgen]
impl JsUnisatProvider {
    /// Wrap an injected Unisat object.
    #[wasm_bindgen(constructor)]
    pub fn new(unisat: JsValue) -> Self {
        Self { unisat }
    }

    /// The `window.unisat` object, or `undefined` if the extension isn't installed.
    #[wasm_bindgen(js_name = "fromWindow")]
    pub fn from_window() -> Option<JsUnisatProvider> {
        let window = web_sys::window()?;
        let unisat = Reflect::get(&window, &JsValue::from_str("unisat")).ok()?;
        if unisat.is_undefined() || unisat.is_null() {
            return None;
        }
        Some(Self::new(unisat))
    }
}

impl JsUnisatProvider {
    async fn call_method(&self, name: &str, args: &[JsValue]) -> Result<JsValue, ProviderError> {
        let method: Function = Reflect::get(&self.unisat, &JsValue::from_str(name))
            .map_err(provider_error)?
            .dyn_into()
            .map_err(|_| ProviderError::new(format!("unisat.{} is not a function", name)))?;

        call(&method, &self.unisat, args).await
    }
}

impl UnisatProvider for JsUnisatProvider {
    fn get_chain(&self) -> ProviderFuture<'_, ChainInfo> {
        Box::pin(async move {
            let info = self.call_method("getChain", &[]).await?;
            from_js::<ChainInfo>(info, "getChain")
        })
    }

    fn switch_chain(&self, chain: Chain) -> ProviderFuture<'_, ChainInfo> {
        Box::pin(async move {
            let info = self
                .call_method("switchChain", &[JsValue::from_str(chain.as_str())])
                .await?;
            from_js::<ChainInfo>(info, "switchChain")
        })
    }

    fn request_accounts(&self) -> ProviderFuture<'_, Option<Vec<String>>> {
        Box::pin(async move {
            let accounts = self.call_method("requestAccounts", &[]).await?;
            if accounts.is_undefined() || accounts.is_null() {
                return Ok(None);
            }
            from_js::<Vec<String>>(accounts, "requestAccounts").map(Some)
        })
    }

    fn get_public_key(&self) -> ProviderFuture<'_, String> {
        Box::pin(async move {
            let key = self.call_method("getPublicKey", &[]).await?;
            key.as_string()
                .ok_or_else(|| ProviderError::new("getPublicKey did not return a string"))
        })
    }

    fn sign_psbt(&self, psbt_hex: String, options: SignPsbtOptions) -> ProviderFuture<'_, String> {
        Box::pin(async move {
            let args = [JsValue::from_str(&psbt_hex), to_js(&options)?];
            let signed = self.call_method("signPsbt", &args).await?;
            signed
                .as_string()
                .ok_or_else(|| ProviderError::new("signPsbt did not return a string"))
        })
    }

    fn sign_psbts(
        &self,
        psbt_hexs: Vec<String>,
        options: Vec<SignPsbtOptions>,
    ) -> ProviderFuture<'_, Vec<String>> {
        Box::pin(async move {
            let args = [to_js(&psbt_hexs)?, to_js(&options)?];
            let signed = self.call_method("signPsbts", &args).await?;
            from_js::<Vec<String>>(signed, "signPsbts")
        })
    }

    fn sign_message(
        &self,
        message: String,
        protocol: MessageSigningProtocol,
    ) -> ProviderFuture<'_, String> {
        Box::pin(async move {
            let args = [
                JsValue::from_str(&message),
                JsValue::from_str(protocol.as_str()),
            ];
            let signature = self.call_method("signMessage", &args).await?;
            signature
                .as_string()
                .ok_or_else(|| ProviderError::new("signMessage did not return a string"))
        })
    }
}
