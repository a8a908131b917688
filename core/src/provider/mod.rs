//! Boundary traits for the wallet provider SDKs.
//!
//! Each provider is reached through a trait so the hosting environment can
//! inject its own handle: JavaScript bindings in the browser, fakes in tests.
//! Implementations report raw [`ProviderError`]s. Translating them into the
//! wallet taxonomy is the adapters' job.

pub mod rpc;
pub mod sats_connect;
pub mod unisat;

use crate::error::ProviderError;
use std::future::Future;
use std::pin::Pin;

/// Type alias for provider futures.
///
/// Follows the same `Send` split as [`crate::adapter::WalletFuture`].
#[cfg(target_arch = "wasm32")]
pub type ProviderFuture<'a, T> =
    Pin<Box<dyn Future<Output = std::result::Result<T, ProviderError>> + 'a>>;

#[cfg(not(target_arch = "wasm32"))]
pub type ProviderFuture<'a, T> =
    Pin<Box<dyn Future<Output = std::result::Result<T, ProviderError>> + Send + 'a>>;
