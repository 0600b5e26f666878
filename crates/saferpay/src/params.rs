//! Request parameters and response field normalization.
//!
//! Outgoing parameters are kept in insertion order with upper-cased keys
//! (`AMOUNT`, `CURRENCY`, `ACCOUNTID`, ...). Everything coming back from the
//! gateway is normalized the other way: lower-cased keys and URL-decoded
//! values, collected into [`Fields`].

use std::collections::BTreeMap;

use crate::constants::OK_PREFIX;

/// Normalized response fields: lower-cased keys, decoded values.
pub type Fields = BTreeMap<String, String>;

/// Ordered gateway request parameters.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Params {
    entries: Vec<(String, String)>,
}

impl Params {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style [`insert`](Self::insert).
    pub fn with(mut self, key: impl AsRef<str>, value: impl Into<String>) -> Self {
        self.insert(key, value);
        self
    }

    /// Set a parameter, replacing any existing value for the same key
    /// (compared upper-cased) in place.
    pub fn insert(&mut self, key: impl AsRef<str>, value: impl Into<String>) {
        let key = key.as_ref().to_ascii_uppercase();
        let value = value.into();
        match self.entries.iter_mut().find(|(k, _)| *k == key) {
            Some(entry) => entry.1 = value,
            None => self.entries.push((key, value)),
        }
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        let key = key.to_ascii_uppercase();
        self.entries
            .iter()
            .find(|(k, _)| *k == key)
            .map(|(_, v)| v.as_str())
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.get(key).is_some()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(k, _)| k.as_str())
    }

    /// Overlay these parameters on `defaults`. Keys from `self` win; keys
    /// only present in `defaults` come first, in their original order.
    pub fn merged_over(&self, defaults: Params) -> Params {
        let mut merged = defaults;
        for (key, value) in &self.entries {
            merged.insert(key, value.clone());
        }
        merged
    }

    pub fn into_query(self) -> Vec<(String, String)> {
        self.entries
    }
}

impl<K: AsRef<str>, V: Into<String>> FromIterator<(K, V)> for Params {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut params = Params::new();
        params.extend(iter);
        params
    }
}

impl<K: AsRef<str>, V: Into<String>> Extend<(K, V)> for Params {
    fn extend<I: IntoIterator<Item = (K, V)>>(&mut self, iter: I) {
        for (key, value) in iter {
            self.insert(key, value);
        }
    }
}

pub fn normalize_key(key: &str) -> String {
    key.to_lowercase()
}

/// Percent-decode a value. Invalid UTF-8 sequences are replaced rather
/// than rejected; `+` is left as is.
pub fn url_decode(value: &str) -> String {
    String::from_utf8_lossy(&urlencoding::decode_binary(value.as_bytes())).into_owned()
}

/// Normalize arbitrary key/value pairs into [`Fields`].
pub fn normalize<'a, I>(pairs: I) -> Fields
where
    I: IntoIterator<Item = (&'a str, &'a str)>,
{
    pairs
        .into_iter()
        .map(|(k, v)| (normalize_key(k), url_decode(v)))
        .collect()
}

/// Content following the first `OK:` marker of a response body.
pub fn ok_payload(body: &str) -> Option<&str> {
    body.find(OK_PREFIX)
        .map(|idx| body[idx + OK_PREFIX.len()..].trim_end())
}

/// Parse an `OK:key=value&...` body into normalized fields.
pub fn parse_ok_query(body: &str) -> Option<Fields> {
    let payload = ok_payload(body)?;
    Some(
        url::form_urlencoded::parse(payload.as_bytes())
            .map(|(k, v)| (normalize_key(&k), v.into_owned()))
            .collect(),
    )
}
