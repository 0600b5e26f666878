use crate::callback::{check_tampering, parse_idp_attributes, CallbackData};
use crate::config::{self, ClientOptions, Config};
use crate::constants::{
    ACCOUNTID, BACKLINK, CREATE_PAY_INIT_PATH, FAILLINK, NOTIFYURL, PAY_COMPLETE_PATH,
    SUCCESSLINK, VERIFY_PAY_CONFIRM_PATH,
};
use crate::error::{gateway_error_message, SaferpayError};
use crate::params::{ok_payload, parse_ok_query, Params};
use crate::response::{PayConfirmation, PaymentCompletion};
use crate::transport::{GatewayRequest, HttpTransport, ReqwestTransport};

/// Client for the Saferpay hosting gateway.
///
/// Every operation goes through the same pipeline: merge configured
/// defaults under the caller's parameters, GET the endpoint, and turn any
/// `ERROR: ` body or non-2xx status into a [`SaferpayError`] before the
/// body is looked at.
#[derive(Debug, Clone)]
pub struct SaferpayClient<T: HttpTransport = ReqwestTransport> {
    config: Config,
    transport: T,
}

impl SaferpayClient<ReqwestTransport> {
    /// Build a client from the process-wide configuration plus `options`.
    ///
    /// The transport talks to the process-wide endpoint; an endpoint in
    /// `options` is ignored.
    pub fn new(options: ClientOptions) -> Result<Self, SaferpayError> {
        let config = config::current().merged(options);
        let transport = ReqwestTransport::new(config.endpoint.clone())?;
        Ok(Self { config, transport })
    }

    /// Build a client from an explicit configuration, endpoint included.
    pub fn with_config(config: Config) -> Result<Self, SaferpayError> {
        let transport = ReqwestTransport::new(config.endpoint.clone())?;
        Ok(Self { config, transport })
    }
}

impl<T: HttpTransport> SaferpayClient<T> {
    /// Use a custom transport. The transport decides the base URL;
    /// `config.endpoint` is informational.
    pub fn with_transport(config: Config, transport: T) -> Self {
        Self { config, transport }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn account_id(&self) -> &str {
        &self.config.account_id
    }

    pub fn user_agent(&self) -> &str {
        &self.config.user_agent
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// Request a hosted payment page URL.
    ///
    /// `ACCOUNTID` and any configured `SUCCESSLINK`, `FAILLINK`, `BACKLINK`
    /// and `NOTIFYURL` are sent unless `params` overrides them. The body is
    /// returned as is.
    pub async fn get_payment_url(&self, params: &Params) -> Result<String, SaferpayError> {
        let query = params.merged_over(self.payment_url_defaults());
        self.perform(CREATE_PAY_INIT_PATH, query).await
    }

    /// Verify a confirmation callback and check it against the original
    /// request.
    ///
    /// `request_params` are the `DATA`/`SIGNATURE` parameters the gateway
    /// sent to the shop. They are first verified by the gateway, then parsed
    /// locally, and the echoed transaction fields are compared with
    /// `original_params` (see [`check_tampering`]).
    pub async fn handle_pay_confirm(
        &self,
        request_params: &Params,
        original_params: Option<&Params>,
    ) -> Result<PayConfirmation, SaferpayError> {
        let query = request_params.merged_over(self.account_defaults());
        let body = self.perform(VERIFY_PAY_CONFIRM_PATH, query).await?;
        let fields = parse_ok_query(&body).ok_or_else(unexpected_response)?;

        let callback_data = CallbackData::from_params(request_params)?;
        check_tampering(original_params, self.account_defaults(), &callback_data.data)?;

        tracing::debug!(id = ?fields.get("id"), "pay confirmation verified");
        Ok(PayConfirmation {
            fields,
            callback_data,
        })
    }

    /// Complete (capture) a verified payment. `params` usually carries `ID`
    /// from [`PayConfirmation::id`].
    pub async fn complete_payment(
        &self,
        params: &Params,
    ) -> Result<PaymentCompletion, SaferpayError> {
        let query = params.merged_over(self.account_defaults());
        let body = self.perform(PAY_COMPLETE_PATH, query).await?;

        let xml = ok_payload(&body).ok_or_else(unexpected_response)?;
        let fields = parse_idp_attributes(xml)
            .ok_or_else(|| SaferpayError::BadRequest("Could not load response XML".to_string()))?;
        let completion = PaymentCompletion::from_fields(fields);

        tracing::info!(
            id = ?completion.get("id"),
            successful = completion.successful,
            "payment completed"
        );
        Ok(completion)
    }

    async fn perform(&self, path: &'static str, params: Params) -> Result<String, SaferpayError> {
        tracing::debug!(path, params = ?params.keys().collect::<Vec<_>>(), "saferpay request");

        let response = self
            .transport
            .get(GatewayRequest {
                path,
                query: params.into_query(),
                user_agent: self.config.user_agent.clone(),
            })
            .await?;

        if !response.is_success() || gateway_error_message(&response.body).is_some() {
            let err = SaferpayError::from_response(&response);
            tracing::warn!(path, status = response.status, error = %err, "saferpay request failed");
            return Err(err);
        }

        Ok(response.body)
    }

    fn account_defaults(&self) -> Params {
        Params::new().with(ACCOUNTID, self.config.account_id.as_str())
    }

    fn payment_url_defaults(&self) -> Params {
        let mut defaults = self.account_defaults();
        let links = [
            (SUCCESSLINK, &self.config.success_link),
            (FAILLINK, &self.config.fail_link),
            (BACKLINK, &self.config.back_link),
            (NOTIFYURL, &self.config.notify_url),
        ];
        for (key, value) in links {
            if let Some(value) = value {
                defaults.insert(key, value.as_str());
            }
        }
        defaults
    }
}

fn unexpected_response() -> SaferpayError {
    SaferpayError::Generic {
        message: "Unexpected response from gateway".to_string(),
        code: None,
    }
}
