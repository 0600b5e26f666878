/// Base URL of the Saferpay hosting gateway.
pub const DEFAULT_ENDPOINT: &str = "https://www.saferpay.com/hosting";

/// `User-Agent` sent with every gateway request.
pub const DEFAULT_USER_AGENT: &str = "Saferpay API Rust Wrapper";

/// Saferpay public test account.
pub const TEST_ACCOUNT_ID: &str = "99867-94913159";

/// Creates a payment session and returns the hosted payment page URL.
pub const CREATE_PAY_INIT_PATH: &str = "/CreatePayInit.asp";

/// Verifies the DATA/SIGNATURE pair of a confirmation callback.
pub const VERIFY_PAY_CONFIRM_PATH: &str = "/VerifyPayConfirm.asp";

/// Captures (completes) an authorized payment.
pub const PAY_COMPLETE_PATH: &str = "/PayCompleteV2.asp";

/// Prefix of a successful structured response body.
pub const OK_PREFIX: &str = "OK:";

/// Prefix of a gateway-reported error line.
pub const ERROR_PREFIX: &str = "ERROR: ";

/// Element carrying the transaction attributes in callback and completion XML.
pub const IDP_ELEMENT: &str = "IDP";

// Request parameter names.
pub const ACCOUNTID: &str = "ACCOUNTID";
pub const AMOUNT: &str = "AMOUNT";
pub const CURRENCY: &str = "CURRENCY";
pub const ORDERID: &str = "ORDERID";
pub const SUCCESSLINK: &str = "SUCCESSLINK";
pub const FAILLINK: &str = "FAILLINK";
pub const BACKLINK: &str = "BACKLINK";
pub const NOTIFYURL: &str = "NOTIFYURL";
pub const DATA: &str = "DATA";
pub const SIGNATURE: &str = "SIGNATURE";

/// Fields compared between the original request and the signed callback,
/// in the order they are reported on mismatch.
pub const TAMPER_CHECK_FIELDS: [&str; 4] = [AMOUNT, CURRENCY, ORDERID, ACCOUNTID];

/// Field compared when the caller has no record of the original request.
pub const ACCOUNT_ONLY_CHECK_FIELDS: [&str; 1] = [ACCOUNTID];

/// `RESULT` value reported by a successful completion.
pub const RESULT_SUCCESS: &str = "0";
