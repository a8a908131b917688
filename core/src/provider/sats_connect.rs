//! Callback-style sats-connect provider boundary.
//!
//! sats-connect's helper functions take a payload plus `onFinish`/`onCancel`
//! callbacks. Here the callbacks are a one-shot [`Callbacks`] handle: the
//! provider settles it exactly once, and the adapter awaits the other end.

use crate::adapter::MaybeSendSync;
use crate::error::ProviderError;
use crate::network::BitcoinNetworkType;
use crate::provider::ProviderFuture;
use crate::types::{Address, AddressPurpose, InputToSign, MessageSigningProtocol};
use futures::channel::oneshot;
use serde::{Deserialize, Serialize};

/// How a callback-style call was settled.
#[derive(Debug)]
pub enum Outcome<T> {
    /// `onFinish` fired with a response.
    Finished(T),
    /// `onCancel` fired.
    Cancelled,
    /// The provider answered with something that could not be understood.
    Failed(ProviderError),
}

/// One-shot `onFinish`/`onCancel` handle passed to the provider.
///
/// Dropping it without settling counts as a cancellation.
pub struct Callbacks<T> {
    sender: oneshot::Sender<Outcome<T>>,
}

impl<T> Callbacks<T> {
    pub(crate) fn channel() -> (Self, oneshot::Receiver<Outcome<T>>) {
        let (sender, receiver) = oneshot::channel();
        (Self { sender }, receiver)
    }

    pub fn on_finish(self, response: T) {
        // The receiver is gone only if the caller stopped waiting.
        let _ = self.sender.send(Outcome::Finished(response));
    }

    pub fn on_cancel(self) {
        let _ = self.sender.send(Outcome::Cancelled);
    }

    pub fn on_error(self, error: ProviderError) {
        let _ = self.sender.send(Outcome::Failed(error));
    }
}

/// Message signing protocol names on the sats-connect wire.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SatsConnectProtocol {
    #[serde(rename = "ECDSA")]
    Ecdsa,
    #[serde(rename = "BIP322")]
    Bip322,
}

impl From<MessageSigningProtocol> for SatsConnectProtocol {
    fn from(protocol: MessageSigningProtocol) -> Self {
        match protocol {
            MessageSigningProtocol::Ecdsa => SatsConnectProtocol::Ecdsa,
            MessageSigningProtocol::Bip322Simple => SatsConnectProtocol::Bip322,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NetworkPayload {
    #[serde(rename = "type")]
    pub network_type: BitcoinNetworkType,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GetAddressPayload {
    pub purposes: Vec<AddressPurpose>,
    pub message: String,
    pub network: NetworkPayload,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GetAddressResponse {
    pub addresses: Vec<Address>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SignTransactionPayload {
    pub network: NetworkPayload,
    pub message: String,
    pub psbt_base64: String,
    pub broadcast: bool,
    pub inputs_to_sign: Vec<InputToSign>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SignTransactionResponse {
    #[serde(default)]
    pub psbt_base64: Option<String>,
    #[serde(default)]
    pub txid: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SignMessagePayload {
    pub address: String,
    pub message: String,
    pub network: NetworkPayload,
    pub protocol: SatsConnectProtocol,
}

/// A provider reached through sats-connect's callback helpers.
///
/// Each method starts one provider interaction and settles `callbacks` once
/// the user has answered. An `Err` return means the provider could not be
/// invoked at all.
pub trait SatsConnectProvider: MaybeSendSync {
    fn get_address(
        &self,
        payload: GetAddressPayload,
        callbacks: Callbacks<GetAddressResponse>,
    ) -> ProviderFuture<'_, ()>;

    fn sign_transaction(
        &self,
        payload: SignTransactionPayload,
        callbacks: Callbacks<SignTransactionResponse>,
    ) -> ProviderFuture<'_, ()>;

    /// Settles with the signature.
    fn sign_message(
        &self,
        payload: SignMessagePayload,
        callbacks: Callbacks<String>,
    ) -> ProviderFuture<'_, ()>;
}

/// Scripted sats-connect provider for testing.
#[cfg(test)]
pub mod mock {
    use super::*;
    use std::collections::VecDeque;
    use std::sync::Mutex;

    /// What the fake provider does with one call.
    pub enum Step<T> {
        Finish(T),
        Cancel,
        /// Settle with an unreadable response.
        Error(ProviderError),
        /// Fail to invoke, like a missing extension.
        Throw,
        /// Drop the callbacks without settling them.
        Ignore,
    }

    fn play<T>(step: Option<Step<T>>, callbacks: Callbacks<T>) -> Result<(), ProviderError> {
        match step {
            Some(Step::Finish(response)) => {
                callbacks.on_finish(response);
                Ok(())
            }
            Some(Step::Cancel) => {
                callbacks.on_cancel();
                Ok(())
            }
            Some(Step::Error(error)) => {
                callbacks.on_error(error);
                Ok(())
            }
            Some(Step::Ignore) => Ok(()),
            Some(Step::Throw) | None => Err(ProviderError::new("provider is not available")),
        }
    }

    #[derive(Default)]
    pub struct MockSatsConnectProvider {
        pub addresses: Mutex<VecDeque<Step<GetAddressResponse>>>,
        pub transactions: Mutex<VecDeque<Step<SignTransactionResponse>>>,
        pub messages: Mutex<VecDeque<Step<String>>>,
        pub address_payloads: Mutex<Vec<GetAddressPayload>>,
        pub transaction_payloads: Mutex<Vec<SignTransactionPayload>>,
        pub message_payloads: Mutex<Vec<SignMessagePayload>>,
    }

    impl MockSatsConnectProvider {
        pub fn new() -> Self {
            Self::default()
        }

        pub fn push_address(&self, step: Step<GetAddressResponse>) {
            self.addresses.lock().unwrap().push_back(step);
        }

        pub fn push_transaction(&self, step: Step<SignTransactionResponse>) {
            self.transactions.lock().unwrap().push_back(step);
        }

        pub fn push_message(&self, step: Step<String>) {
            self.messages.lock().unwrap().push_back(step);
        }

        pub fn signed(psbt: &str) -> Step<SignTransactionResponse> {
            Step::Finish(SignTransactionResponse {
                psbt_base64: Some(psbt.to_string()),
                txid: None,
            })
        }
    }

    impl SatsConnectProvider for MockSatsConnectProvider {
        fn get_address(
            &self,
            payload: GetAddressPayload,
            callbacks: Callbacks<GetAddressResponse>,
        ) -> ProviderFuture<'_, ()> {
            Box::pin(async move {
                self.address_payloads.lock().unwrap().push(payload);
                let step = self.addresses.lock().unwrap().pop_front();
                play(step, callbacks)
            })
        }

        fn sign_transaction(
            &self,
            payload: SignTransactionPayload,
            callbacks: Callbacks<SignTransactionResponse>,
        ) -> ProviderFuture<'_, ()> {
            Box::pin(async move {
                self.transaction_payloads.lock().unwrap().push(payload);
                let step = self.transactions.lock().unwrap().pop_front();
                play(step, callbacks)
            })
        }

        fn sign_message(
            &self,
            payload: SignMessagePayload,
            callbacks: Callbacks<String>,
        ) -> ProviderFuture<'_, ()> {
            Box::pin(async move {
                self.message_payloads.lock().unwrap().push(payload);
                let step = self.messages.lock().unwrap().pop_front();
                play(step, callbacks)
            })
        }
    }
}
