//! Drives the reqwest transport against a mock gateway.

use saferpay::constants::{DEFAULT_USER_AGENT, TEST_ACCOUNT_ID};
use saferpay::{Config, ErrorKind, Params, SaferpayClient};
use url::Url;
use wiremock::matchers::{header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

const IDP: &str = r#"<IDP MSGTYPE="PayConfirm" KEYID="1-0" ID="A668MSAprOj4tAzv7G9lAQUfUr3A" ACCOUNTID="99867-94913159" ORDERID="123456789-001" AMOUNT="1000" CURRENCY="EUR" />"#;

async fn client_for(server: &MockServer) -> SaferpayClient {
    let mut config = Config::default();
    config.endpoint = Url::parse(&format!("{}/hosting", server.uri())).unwrap();
    SaferpayClient::with_config(config).unwrap()
}

#[tokio::test]
async fn payment_url_round_trip() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/hosting/CreatePayInit.asp"))
        .and(query_param("ACCOUNTID", TEST_ACCOUNT_ID))
        .and(query_param("AMOUNT", "1000"))
        .and(query_param("XYZ", "something"))
        .and(header("user-agent", DEFAULT_USER_AGENT))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_string("https://www.saferpay.com/vt2/Pay.aspx?DATA=1"),
        )
        .expect(1)
        .mount(&server)
        .await;

    let client = client_for(&server).await;
    let params = Params::new()
        .with("AMOUNT", "1000")
        .with("CURRENCY", "EUR")
        .with("DESCRIPTION", "Test")
        .with("XYZ", "something");

    let url = client.get_payment_url(&params).await.unwrap();
    assert_eq!(url, "https://www.saferpay.com/vt2/Pay.aspx?DATA=1");
}

#[tokio::test]
async fn verify_sends_callback_params_decoded_once() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/hosting/VerifyPayConfirm.asp"))
        .and(query_param("DATA", IDP))
        .and(query_param("SIGNATURE", "sig"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_string("OK:ID=A668MSAprOj4tAzv7G9lAQUfUr3A&TOKEN=%28unused%29"),
        )
        .mount(&server)
        .await;

    let client = client_for(&server).await;
    let callback = Params::new().with("DATA", IDP).with("SIGNATURE", "sig");
    let original = Params::new()
        .with("AMOUNT", "1000")
        .with("CURRENCY", "EUR")
        .with("ORDERID", "123456789-001");

    let confirmation = client
        .handle_pay_confirm(&callback, Some(&original))
        .await
        .unwrap();
    assert_eq!(confirmation.get("token"), Some("(unused)"));
    assert_eq!(confirmation.callback_data.data["orderid"], "123456789-001");
}

#[tokio::test]
async fn complete_payment_success() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/hosting/PayCompleteV2.asp"))
        .and(query_param("ID", "A668MSAprOj4tAzv7G9lAQUfUr3A"))
        .respond_with(ResponseTemplate::new(200).set_body_string(
            r#"OK:<IDP RESULT="0" MSGTYPE="PayConfirm" ID="A668MSAprOj4tAzv7G9lAQUfUr3A"/>"#,
        ))
        .mount(&server)
        .await;

    let client = client_for(&server).await;
    let completion = client
        .complete_payment(&Params::new().with("ID", "A668MSAprOj4tAzv7G9lAQUfUr3A"))
        .await
        .unwrap();
    assert!(completion.successful);
}

#[tokio::test]
async fn gateway_error_line_is_bad_request() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/hosting/CreatePayInit.asp"))
        .respond_with(
            ResponseTemplate::new(200).set_body_string("ERROR: Missing CURRENCY attribute."),
        )
        .mount(&server)
        .await;

    let client = client_for(&server).await;
    let err = client
        .get_payment_url(&Params::new().with("AMOUNT", "1000"))
        .await
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::BadRequest);
    assert_eq!(err.to_string(), "Missing CURRENCY attribute");
}

#[tokio::test]
async fn http_status_is_classified() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&server)
        .await;

    let client = client_for(&server).await;
    let err = client.complete_payment(&Params::new()).await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::NotFound);
    assert_eq!(err.code(), Some(404));
    assert_eq!(err.to_string(), "Not Found");
}

#[tokio::test]
async fn unreachable_gateway_is_transport_error() {
    let mut config = Config::default();
    config.endpoint = Url::parse("http://127.0.0.1:9/hosting").unwrap();
    let client = SaferpayClient::with_config(config).unwrap();

    let err = client.get_payment_url(&Params::new()).await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Transport);
}
