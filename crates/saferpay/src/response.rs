use serde::Serialize;

use crate::callback::CallbackData;
use crate::constants::RESULT_SUCCESS;
use crate::params::Fields;

/// Result of [`handle_pay_confirm`](crate::SaferpayClient::handle_pay_confirm).
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PayConfirmation {
    /// Fields returned by the verification request (`id`, `token`, ...).
    #[serde(flatten)]
    pub fields: Fields,
    /// The caller-supplied callback, normalized.
    pub callback_data: CallbackData,
}

impl PayConfirmation {
    pub fn get(&self, key: &str) -> Option<&str> {
        self.fields.get(key).map(String::as_str)
    }

    /// Transaction id to pass to [`complete_payment`](crate::SaferpayClient::complete_payment).
    pub fn id(&self) -> Option<&str> {
        self.get("id")
    }
}

/// Result of [`complete_payment`](crate::SaferpayClient::complete_payment).
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PaymentCompletion {
    #[serde(flatten)]
    pub fields: Fields,
    pub successful: bool,
}

impl PaymentCompletion {
    /// `successful` is derived from the `result` field.
    pub fn from_fields(fields: Fields) -> Self {
        let successful = fields.get("result").map(String::as_str) == Some(RESULT_SUCCESS);
        Self { fields, successful }
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.fields.get(key).map(String::as_str)
    }
}
