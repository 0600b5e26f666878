//! Confirmation callback handling.
//!
//! After a payment the gateway redirects the shopper (or notifies the shop)
//! with two parameters: `DATA`, a URL-encoded XML document whose `IDP`
//! element carries the transaction attributes, and `SIGNATURE`. This module
//! extracts those attributes and compares them against what the shop
//! originally requested.

use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;
use serde::Serialize;

use crate::constants::{
    ACCOUNT_ONLY_CHECK_FIELDS, DATA, IDP_ELEMENT, SIGNATURE, TAMPER_CHECK_FIELDS,
};
use crate::error::SaferpayError;
use crate::params::{normalize_key, url_decode, Fields, Params};
use crate::security::field_matches;

/// Normalized callback parameters.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CallbackData {
    /// Attributes of the `IDP` element in `DATA`.
    pub data: Fields,
    pub signature: String,
    /// Any other callback parameter, normalized.
    #[serde(flatten)]
    pub extra: Fields,
}

impl CallbackData {
    /// Normalize the raw callback parameters and parse the `DATA` XML.
    pub fn from_params(params: &Params) -> Result<Self, SaferpayError> {
        let mut data = None;
        let mut signature = None;
        let mut extra = Fields::new();

        for (key, value) in params.iter() {
            let value = url_decode(value);
            match key {
                DATA => data = Some(value),
                SIGNATURE => signature = Some(value),
                _ => {
                    extra.insert(normalize_key(key), value);
                }
            }
        }

        let xml = data.ok_or_else(|| missing(DATA))?;
        let signature = signature.ok_or_else(|| missing(SIGNATURE))?;
        let data = parse_idp_attributes(&xml)
            .ok_or_else(|| SaferpayError::BadRequest("Could not load DATA XML".to_string()))?;

        Ok(Self {
            data,
            signature,
            extra,
        })
    }
}

fn missing(attribute: &str) -> SaferpayError {
    SaferpayError::BadRequest(format!("Missing {attribute} attribute"))
}

/// Attributes of the first `IDP` element in `xml`, with lower-cased names
/// and URL-decoded values. `None` if the document cannot be read up to
/// such an element.
pub fn parse_idp_attributes(xml: &str) -> Option<Fields> {
    let mut reader = Reader::from_str(xml);

    loop {
        match reader.read_event() {
            Ok(Event::Start(e)) | Ok(Event::Empty(e))
                if e.name().as_ref() == IDP_ELEMENT.as_bytes() =>
            {
                return element_attributes(&e);
            }
            Ok(Event::Eof) => return None,
            Ok(_) => {}
            Err(e) => {
                tracing::debug!(error = %e, "callback XML rejected");
                return None;
            }
        }
    }
}

fn element_attributes(element: &BytesStart<'_>) -> Option<Fields> {
    let mut fields = Fields::new();
    for attr in element.attributes() {
        let attr = attr.ok()?;
        let key = String::from_utf8_lossy(attr.key.as_ref());
        let value = String::from_utf8_lossy(&attr.value);
        fields.insert(normalize_key(&key), url_decode(&value));
    }
    Some(fields)
}

/// Compare the transaction-defining fields of the original request with
/// the attributes echoed in the signed callback.
///
/// With no `original`, only `ACCOUNTID` is compared (against `defaults`);
/// otherwise `AMOUNT`, `CURRENCY`, `ORDERID` and `ACCOUNTID`. Mismatching
/// fields are reported in that fixed order.
pub fn check_tampering(
    original: Option<&Params>,
    defaults: Params,
    echoed: &Fields,
) -> Result<(), SaferpayError> {
    let fields: &[&str] = match original {
        Some(_) => &TAMPER_CHECK_FIELDS,
        None => &ACCOUNT_ONLY_CHECK_FIELDS,
    };
    let original = original.cloned().unwrap_or_default().merged_over(defaults);

    let mismatches: Vec<&str> = fields
        .iter()
        .copied()
        .filter(|field| {
            let echoed = echoed.get(&normalize_key(field)).map(String::as_str);
            !field_matches(original.get(field), echoed)
        })
        .collect();

    if mismatches.is_empty() {
        return Ok(());
    }

    tracing::warn!(fields = ?mismatches, "callback does not match the original request");
    Err(SaferpayError::BadRequest(format!(
        "Possible manipulation - {} not matching",
        mismatches.join(", ")
    )))
}
