//! Connection options shared by the sats-connect based adapters.

use crate::types::AddressPurpose;
use serde::{Deserialize, Serialize};

/// Prompt text shown by the provider when addresses are requested.
pub const DEFAULT_ADDRESS_MESSAGE: &str = "Address for receiving Ordinals and payments";

/// Options applied when connecting to a provider.
///
/// Unset fields fall back to the adapter's own defaults, so hosts can pass a
/// partial JSON object.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ConnectOptions {
    /// Address purposes requested on connect.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub purposes: Option<Vec<AddressPurpose>>,
    /// Prompt shown when requesting addresses.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub address_message: Option<String>,
    /// Prompt shown when signing a transaction.
    pub transaction_message: String,
}

impl ConnectOptions {
    /// The requested purposes, or `default` when none were set.
    pub fn purposes_or(&self, default: &[AddressPurpose]) -> Vec<AddressPurpose> {
        self.purposes
            .clone()
            .unwrap_or_else(|| default.to_vec())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_options_leave_the_rest_unset() {
        let options: ConnectOptions =
            serde_json::from_str(r#"{ "addressMessage": "Connect to the swap" }"#).unwrap();

        assert_eq!(options.address_message.as_deref(), Some("Connect to the swap"));
        assert_eq!(options.purposes, None);
        assert!(options.transaction_message.is_empty());
    }

    #[test]
    fn test_purposes_or() {
        let defaults = [AddressPurpose::Ordinals, AddressPurpose::Payment];
        assert_eq!(ConnectOptions::default().purposes_or(&defaults), defaults.to_vec());

        let options = ConnectOptions {
            purposes: Some(vec![AddressPurpose::Payment]),
            ..Default::default()
        };
        assert_eq!(options.purposes_or(&defaults), vec![AddressPurpose::Payment]);
    }
}
