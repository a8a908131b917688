use crate::Address;
use crate::error::to_js_error;
use crate::providers::{JsMagicEdenProvider, JsUnisatProvider, JsXverseProvider};
use crate::to_js_value;
use js_sys::Function;
use std::sync::Arc;
use wallet_adapter_core::provider::unisat::UnisatProvider;
use wallet_adapter_core::{
    BitcoinWallet, ConnectOptions, MessageSigningProtocol, Network, ProgressFn, UnsignedPsbt,
    WalletProvider,
};
use wasm_bindgen::JsValue;
use wasm_bindgen::prelude::wasm_bindgen;

fn parse_network(network: &str) -> Result<Network, JsValue> {
    network.parse().map_err(to_js_error)
}

/// `undefined` or `null` means the defaults.
fn parse_options(options: JsValue) -> Result<ConnectOptions, JsValue> {
    if options.is_undefined() || options.is_null() {
        return Ok(ConnectOptions::default());
    }
    serde_wasm_bindgen::from_value(options)
        .map_err(|e| JsValue::from_str(&format!("Invalid connect options: {}", e)))
}

fn parse_psbts(psbts: JsValue) -> Result<Vec<UnsignedPsbt>, JsValue> {
    serde_wasm_bindgen::from_value(psbts)
        .map_err(|e| JsValue::from_str(&format!("Invalid PSBT: {}", e)))
}

/// A connected wallet session.
#[wasm_bindgen]
pub struct Wallet {
    inner: Box<dyn BitcoinWallet>,
}

impl Wallet {
    async fn connect(
        provider: WalletProvider,
        network: String,
        options: JsValue,
    ) -> Result<Wallet, JsValue> {
        let network = parse_network(&network)?;
        let options = parse_options(options)?;

        let inner = wallet_adapter_core::connect(provider, network, options)
            .await
            .map_err(to_js_error)?;
        Ok(Wallet { inner })
    }
}

#[wasm_bindgen]
impl Wallet {
    /// Connect to Xverse.
    ///
    /// # Arguments
    /// * `provider` - Wraps sats-connect's `request` function
    /// * `network` - "mainnet", "testnet", "testnet4" or "regtest"
    /// * `options` - Optional `{ purposes, addressMessage, transactionMessage }`
    #[wasm_bindgen(js_name = "connectXverse")]
    pub async fn connect_xverse(
        provider: JsXverseProvider,
        network: String,
        options: JsValue,
    ) -> Result<Wallet, JsValue> {
        Self::connect(WalletProvider::Xverse(Arc::new(provider)), network, options).await
    }

    /// Connect to Magic Eden.
    #[wasm_bindgen(js_name = "connectMagicEden")]
    pub async fn connect_magic_eden(
        provider: JsMagicEdenProvider,
        network: String,
        options: JsValue,
    ) -> Result<Wallet, JsValue> {
        Self::connect(WalletProvider::MagicEden(Arc::new(provider)), network, options).await
    }

    /// Connect to Unisat.
    ///
    /// Uses `window.unisat` when `provider` is omitted.
    #[wasm_bindgen(js_name = "connectUnisat")]
    pub async fn connect_unisat(
        provider: Option<JsUnisatProvider>,
        network: String,
    ) -> Result<Wallet, JsValue> {
        let provider = provider
            .or_else(JsUnisatProvider::from_window)
            .map(|p| Arc::new(p) as Arc<dyn UnisatProvider>);
        Self::connect(WalletProvider::Unisat(provider), network, JsValue::UNDEFINED).await
    }

    /// Reconnect on `network`, returning a new session.
    ///
    /// This session stays usable.
    pub async fn initialize(&self, network: String) -> Result<Wallet, JsValue> {
        let network = parse_network(&network)?;
        let inner = self.inner.initialize(network).await.map_err(to_js_error)?;
        Ok(Wallet { inner })
    }

    #[wasm_bindgen(getter, js_name = "walletName")]
    pub fn wallet_name(&self) -> String {
        self.inner.wallet_name().to_string()
    }

    #[wasm_bindgen(getter)]
    pub fn network(&self) -> String {
        self.inner.network().to_string()
    }

    #[wasm_bindgen(getter, js_name = "walletType")]
    pub fn wallet_type(&self) -> String {
        self.inner.wallet_type().as_str().to_string()
    }

    #[wasm_bindgen(getter)]
    pub fn addresses(&self) -> Vec<Address> {
        self.inner.addresses().iter().map(Address::from).collect()
    }

    /// Address used for ordinal and rune signing.
    #[wasm_bindgen(getter, js_name = "signerAddress")]
    pub fn signer_address(&self) -> Address {
        Address::from(self.inner.get_signer_address())
    }

    #[wasm_bindgen(getter, js_name = "paymentAddress")]
    pub fn payment_address(&self) -> Option<Address> {
        self.inner.payment_address().map(Address::from)
    }

    #[wasm_bindgen(js_name = "checkIsAddressTypeP2tr")]
    pub fn check_is_address_type_p2tr(&self) -> bool {
        self.inner.check_is_address_type_p2tr()
    }

    /// Sign one `{ psbt64, inputsToSign }`, returning the signed base64 PSBT.
    #[wasm_bindgen(js_name = "signPsbt")]
    pub async fn sign_psbt(&self, psbt: JsValue, broadcast: bool) -> Result<String, JsValue> {
        let psbt: UnsignedPsbt = serde_wasm_bindgen::from_value(psbt)
            .map_err(|e| JsValue::from_str(&format!("Invalid PSBT: {}", e)))?;

        self.inner
            .sign_psbt(&psbt, broadcast)
            .await
            .map_err(to_js_error)
    }

    /// Sign several PSBTs.
    ///
    /// # Arguments
    /// * `psbts` - Array of `{ psbt64, inputsToSign }`
    /// * `broadcast` - Ask the wallet to broadcast after signing
    /// * `progress` - Optional `(index: number) => void`
    #[wasm_bindgen(js_name = "signPsbts")]
    pub async fn sign_psbts(
        &self,
        psbts: JsValue,
        broadcast: bool,
        progress: Option<Function>,
    ) -> Result<JsValue, JsValue> {
        let psbts = parse_psbts(psbts)?;

        let report = progress.map(|callback| {
            move |index: usize| {
                if let Err(e) = callback.call1(&JsValue::NULL, &JsValue::from_f64(index as f64)) {
                    log::warn!("Progress callback threw: {:?}", e);
                }
            }
        });
        let report = report.as_ref().map(|f| f as &dyn ProgressFn);

        let signed = self
            .inner
            .sign_psbts(&psbts, broadcast, report)
            .await
            .map_err(to_js_error)?;
        to_js_value(&signed)
    }

    /// Sign `message` with the signer address.
    ///
    /// `protocol` is "ecdsa" or "bip322-simple" (the default).
    #[wasm_bindgen(js_name = "signMessage")]
    pub async fn sign_message(
        &self,
        message: String,
        protocol: Option<String>,
    ) -> Result<String, JsValue> {
        let protocol = protocol
            .map(|p| p.parse::<MessageSigningProtocol>())
            .transpose()
            .map_err(to_js_error)?;

        self.inner
            .sign_message(&message, protocol)
            .await
            .map_err(to_js_error)
    }
}
