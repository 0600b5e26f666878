use thiserror::Error;

use crate::config::ConfigError;
use crate::constants::ERROR_PREFIX;
use crate::transport::GatewayResponse;

/// Errors returned by Saferpay operations.
///
/// The 4xx-style variants form the client error family and the 5xx-style
/// variants the server error family; [`SaferpayError::Generic`] is the base
/// kind used for status codes without a dedicated variant. Logical errors
/// reported by the gateway in the response body are always `BadRequest`,
/// whatever the transport status was.
#[derive(Debug, Error)]
pub enum SaferpayError {
    #[error("{0}")]
    BadRequest(String),

    #[error("{0}")]
    Unauthorized(String),

    #[error("{0}")]
    Forbidden(String),

    #[error("{0}")]
    NotFound(String),

    #[error("{0}")]
    NotAcceptable(String),

    #[error("{0}")]
    RequestTimeout(String),

    #[error("{0}")]
    UnprocessableEntity(String),

    #[error("{0}")]
    InternalServerError(String),

    #[error("{0}")]
    BadGateway(String),

    #[error("{0}")]
    ServiceUnavailable(String),

    #[error("{0}")]
    GatewayTimeout(String),

    #[error("{message}")]
    Generic { message: String, code: Option<u16> },

    /// The transport failed before a response was received.
    #[error("transport error: {0}")]
    Transport(String),

    #[error(transparent)]
    Config(#[from] ConfigError),
}

/// Discriminant of a [`SaferpayError`], without its payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    BadRequest,
    Unauthorized,
    Forbidden,
    NotFound,
    NotAcceptable,
    RequestTimeout,
    UnprocessableEntity,
    InternalServerError,
    BadGateway,
    ServiceUnavailable,
    GatewayTimeout,
    Generic,
    Transport,
    Config,
}

impl SaferpayError {
    /// Classify a failed gateway response.
    ///
    /// Must only be called for a failing outcome: either the body carries an
    /// `ERROR: ` line or the status is not a success status.
    pub fn from_response(response: &GatewayResponse) -> Self {
        if let Some(message) = gateway_error_message(&response.body) {
            return SaferpayError::BadRequest(message);
        }

        let reason = response.reason.trim();
        let message = if reason.is_empty() {
            default_reason(response.status)
        } else if is_compact_status_name(reason) {
            humanize_status_name(reason)
        } else {
            reason.to_string()
        };

        Self::from_status(response.status, message)
    }

    /// Map a numeric HTTP status to its error variant.
    pub fn from_status(code: u16, message: impl Into<String>) -> Self {
        let message = message.into();
        match code {
            400 => SaferpayError::BadRequest(message),
            401 => SaferpayError::Unauthorized(message),
            403 => SaferpayError::Forbidden(message),
            404 => SaferpayError::NotFound(message),
            406 => SaferpayError::NotAcceptable(message),
            408 => SaferpayError::RequestTimeout(message),
            422 => SaferpayError::UnprocessableEntity(message),
            500 => SaferpayError::InternalServerError(message),
            502 => SaferpayError::BadGateway(message),
            503 => SaferpayError::ServiceUnavailable(message),
            504 => SaferpayError::GatewayTimeout(message),
            _ => SaferpayError::Generic {
                message,
                code: Some(code),
            },
        }
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            SaferpayError::BadRequest(_) => ErrorKind::BadRequest,
            SaferpayError::Unauthorized(_) => ErrorKind::Unauthorized,
            SaferpayError::Forbidden(_) => ErrorKind::Forbidden,
            SaferpayError::NotFound(_) => ErrorKind::NotFound,
            SaferpayError::NotAcceptable(_) => ErrorKind::NotAcceptable,
            SaferpayError::RequestTimeout(_) => ErrorKind::RequestTimeout,
            SaferpayError::UnprocessableEntity(_) => ErrorKind::UnprocessableEntity,
            SaferpayError::InternalServerError(_) => ErrorKind::InternalServerError,
            SaferpayError::BadGateway(_) => ErrorKind::BadGateway,
            SaferpayError::ServiceUnavailable(_) => ErrorKind::ServiceUnavailable,
            SaferpayError::GatewayTimeout(_) => ErrorKind::GatewayTimeout,
            SaferpayError::Generic { .. } => ErrorKind::Generic,
            SaferpayError::Transport(_) => ErrorKind::Transport,
            SaferpayError::Config(_) => ErrorKind::Config,
        }
    }

    /// HTTP status associated with this error, if any.
    pub fn code(&self) -> Option<u16> {
        match self {
            SaferpayError::BadRequest(_) => Some(400),
            SaferpayError::Unauthorized(_) => Some(401),
            SaferpayError::Forbidden(_) => Some(403),
            SaferpayError::NotFound(_) => Some(404),
            SaferpayError::NotAcceptable(_) => Some(406),
            SaferpayError::RequestTimeout(_) => Some(408),
            SaferpayError::UnprocessableEntity(_) => Some(422),
            SaferpayError::InternalServerError(_) => Some(500),
            SaferpayError::BadGateway(_) => Some(502),
            SaferpayError::ServiceUnavailable(_) => Some(503),
            SaferpayError::GatewayTimeout(_) => Some(504),
            SaferpayError::Generic { code, .. } => *code,
            SaferpayError::Transport(_) | SaferpayError::Config(_) => None,
        }
    }

    pub fn message(&self) -> String {
        self.to_string()
    }

    pub fn is_client_error(&self) -> bool {
        matches!(
            self,
            SaferpayError::BadRequest(_)
                | SaferpayError::Unauthorized(_)
                | SaferpayError::Forbidden(_)
                | SaferpayError::NotFound(_)
                | SaferpayError::NotAcceptable(_)
                | SaferpayError::RequestTimeout(_)
                | SaferpayError::UnprocessableEntity(_)
        )
    }

    pub fn is_server_error(&self) -> bool {
        matches!(
            self,
            SaferpayError::InternalServerError(_)
                | SaferpayError::BadGateway(_)
                | SaferpayError::ServiceUnavailable(_)
                | SaferpayError::GatewayTimeout(_)
        )
    }
}

/// Extract and clean the message of the first `ERROR: ` line in a body.
///
/// One trailing `.`, `?` or `;` is dropped, any `PayComplete: ` marker is
/// removed and a leading lowercase letter is capitalized.
pub fn gateway_error_message(body: &str) -> Option<String> {
    let raw = body
        .lines()
        .find_map(|line| line.strip_prefix(ERROR_PREFIX))
        .filter(|rest| !rest.is_empty())?;

    let trimmed = raw
        .strip_suffix(['.', '?', ';'])
        .unwrap_or(raw)
        .replace("PayComplete: ", "");

    let mut chars = trimmed.chars();
    Some(match chars.next() {
        Some(first) if first.is_ascii_lowercase() => {
            first.to_ascii_uppercase().to_string() + chars.as_str()
        }
        _ => trimmed,
    })
}

/// Turn a compact status name into words: `HTTPNotFound` -> `Not Found`.
pub fn humanize_status_name(name: &str) -> String {
    let name = name.replace("HTTP", "");
    let mut out = String::with_capacity(name.len() + 4);
    for c in name.chars() {
        if c.is_ascii_uppercase() {
            out.push(' ');
        }
        out.push(c);
    }
    out.trim().to_string()
}

fn is_compact_status_name(reason: &str) -> bool {
    !reason.contains(char::is_whitespace)
        && reason.chars().skip(1).any(|c| c.is_ascii_uppercase())
        && reason.chars().any(|c| c.is_ascii_lowercase())
        && reason.chars().all(|c| c.is_ascii_alphabetic())
}

fn default_reason(status: u16) -> String {
    reqwest::StatusCode::from_u16(status)
        .ok()
        .and_then(|s| s.canonical_reason())
        .unwrap_or("Unknown Response")
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn response(status: u16, reason: &str, body: &str) -> GatewayResponse {
        GatewayResponse {
            status,
            reason: reason.to_string(),
            body: body.to_string(),
        }
    }

    #[test]
    fn test_error_line_strips_trailing_period() {
        let err = SaferpayError::from_response(&response(
            200,
            "OK",
            "ERROR: Missing AMOUNT attribute.",
        ));
        assert_eq!(err.kind(), ErrorKind::BadRequest);
        assert_eq!(err.to_string(), "Missing AMOUNT attribute");
        assert_eq!(err.code(), Some(400));
    }

    #[test]
    fn test_error_line_is_bad_request_regardless_of_status() {
        let err = SaferpayError::from_response(&response(500, "", "ERROR: An Error occurred"));
        assert!(matches!(err, SaferpayError::BadRequest(ref m) if m == "An Error occurred"));
    }

    #[test]
    fn test_error_line_removes_pay_complete_marker_and_capitalizes() {
        assert_eq!(
            gateway_error_message("ERROR: PayComplete: invalid ID?").as_deref(),
            Some("Invalid ID")
        );
    }

    #[test]
    fn test_error_line_only_one_trailing_char_removed() {
        assert_eq!(
            gateway_error_message("ERROR: really;;").as_deref(),
            Some("Really;")
        );
    }

    #[test]
    fn test_error_line_found_on_later_line() {
        assert_eq!(
            gateway_error_message("<html>\r\nERROR: Missing DATA attribute.\r\n").as_deref(),
            Some("Missing DATA attribute")
        );
    }

    #[test]
    fn test_no_error_line() {
        assert!(gateway_error_message("OK:ID=1").is_none());
        assert!(gateway_error_message("ERROR: ").is_none());
        assert!(gateway_error_message(" ERROR: indented").is_none());
    }

    #[test]
    fn test_status_mapping() {
        let cases = [
            (400, ErrorKind::BadRequest),
            (401, ErrorKind::Unauthorized),
            (403, ErrorKind::Forbidden),
            (404, ErrorKind::NotFound),
            (406, ErrorKind::NotAcceptable),
            (408, ErrorKind::RequestTimeout),
            (422, ErrorKind::UnprocessableEntity),
            (500, ErrorKind::InternalServerError),
            (502, ErrorKind::BadGateway),
            (503, ErrorKind::ServiceUnavailable),
            (504, ErrorKind::GatewayTimeout),
        ];
        for (code, kind) in cases {
            let err = SaferpayError::from_status(code, "x");
            assert_eq!(err.kind(), kind, "status {code}");
            assert_eq!(err.code(), Some(code));
        }
    }

    #[test]
    fn test_unmapped_status_falls_back_to_generic() {
        let err = SaferpayError::from_response(&response(418, "I'm a teapot", ""));
        assert_eq!(err.kind(), ErrorKind::Generic);
        assert_eq!(err.code(), Some(418));
        assert_eq!(err.message(), "I'm a teapot");
        assert!(!err.is_client_error());
        assert!(!err.is_server_error());
    }

    #[test]
    fn test_empty_reason_uses_status_name() {
        let err = SaferpayError::from_response(&response(404, "", ""));
        assert_eq!(err.kind(), ErrorKind::NotFound);
        assert_eq!(err.to_string(), "Not Found");
    }

    #[test]
    fn test_compact_reason_is_humanized() {
        assert_eq!(humanize_status_name("HTTPNotFound"), "Not Found");
        assert_eq!(humanize_status_name("HTTPGatewayTimeOut"), "Gateway Time Out");
        let err = SaferpayError::from_response(&response(503, "ServiceUnavailable", ""));
        assert_eq!(err.to_string(), "Service Unavailable");
    }

    #[test]
    fn test_families() {
        assert!(SaferpayError::from_status(422, "").is_client_error());
        assert!(SaferpayError::from_status(502, "").is_server_error());
        assert!(!SaferpayError::Transport("refused".into()).is_client_error());
        assert_eq!(SaferpayError::Transport("refused".into()).code(), None);
    }
}
