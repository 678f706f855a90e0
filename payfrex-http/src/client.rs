//! A `reqwest`-based client for the Payfrex gateway.
//!
//! [`GatewayClient`] drives one request end to end: it validates the
//! parameters, encodes them into the canonical query, secures the query with
//! the merchant key, posts the envelope, and normalizes whatever comes back.
//!
//! ## Error Handling
//!
//! Every failure surfaces as an [`HttpError`]:
//! - URL construction
//! - HTTP transport failures
//! - unexpected HTTP status responses
//! - core SDK errors (validation, crypto, notification parsing)

use std::time::Duration;

use http::StatusCode;
use payfrex::error::NotificationError;
use payfrex::params::RequestParameters;
use payfrex::{Credentials, FieldSet, TransactionResult, encode, notification, security};
use reqwest::Client;
use url::Url;

#[cfg(feature = "telemetry")]
use tracing::instrument;

use crate::constants::{DEFAULT_TIMEOUT_SECS, H2H_PAYMENT_PATH, HOSTED_PAYMENT_PATH};
use crate::error::HttpError;
use crate::headers::{envelope_headers, form_body};

/// Client for the gateway's payment endpoints.
#[derive(Clone, Debug)]
pub struct GatewayClient {
    credentials: Credentials,
    /// Environment host, or an override.
    base_url: Url,
    /// Full URL of the hosted payment endpoint.
    hosted_url: Url,
    /// Full URL of the host-to-host payment endpoint.
    h2h_url: Url,
    client: Client,
    timeout: Option<Duration>,
}

impl GatewayClient {
    /// Creates a client for the environment named in `credentials`.
    ///
    /// # Errors
    ///
    /// Returns [`HttpError`] if the merchant key is not a valid AES key.
    pub fn try_new(credentials: Credentials) -> Result<Self, HttpError> {
        let base_url = parse_base_url(credentials.environment.base_url())?;
        Self::with_base_url(credentials, base_url)
    }

    /// Creates a client that talks to `base_url` instead of the environment
    /// host.
    ///
    /// # Errors
    ///
    /// Returns [`HttpError`] if the merchant key is not a valid AES key or an
    /// endpoint URL cannot be built.
    pub fn with_base_url(credentials: Credentials, base_url: Url) -> Result<Self, HttpError> {
        credentials.validate()?;

        let hosted_url = base_url
            .join(HOSTED_PAYMENT_PATH)
            .map_err(|source| HttpError::UrlParse {
                context: "Failed to construct hosted payment URL",
                source,
            })?;
        let h2h_url = base_url
            .join(H2H_PAYMENT_PATH)
            .map_err(|source| HttpError::UrlParse {
                context: "Failed to construct host-to-host payment URL",
                source,
            })?;

        Ok(Self {
            credentials,
            base_url,
            hosted_url,
            h2h_url,
            client: Client::new(),
            timeout: Some(Duration::from_secs(DEFAULT_TIMEOUT_SECS)),
        })
    }

    /// Replaces the underlying reqwest client.
    #[must_use]
    pub fn with_http_client(mut self, client: Client) -> Self {
        self.client = client;
        self
    }

    /// Sets the per-request timeout. `None` disables it.
    #[must_use]
    pub const fn with_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.timeout = timeout;
        self
    }

    /// Returns the credentials used to secure requests.
    pub const fn credentials(&self) -> &Credentials {
        &self.credentials
    }

    /// Returns the base URL.
    pub const fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Returns the hosted payment endpoint URL.
    pub const fn hosted_url(&self) -> &Url {
        &self.hosted_url
    }

    /// Returns the host-to-host payment endpoint URL.
    pub const fn h2h_url(&self) -> &Url {
        &self.h2h_url
    }

    /// Starts a hosted payment and returns the checkout URL the customer must
    /// be redirected to.
    ///
    /// # Errors
    ///
    /// Returns [`HttpError`] if validation fails, the request fails, or the
    /// gateway answers with a non-200 status or an empty body.
    #[cfg_attr(
        feature = "telemetry",
        instrument(name = "payfrex.gateway_client.hosted_payment", skip_all, err)
    )]
    pub async fn hosted_payment<P>(&self, params: &P) -> Result<String, HttpError>
    where
        P: RequestParameters + Sync + ?Sized,
    {
        let fields = params.validated()?;
        let body = self
            .post_secured(&self.hosted_url, "POST hosted payment", &fields)
            .await?;

        let redirect = body.trim();
        if redirect.is_empty() {
            return Err(NotificationError::Empty.into());
        }
        Ok(redirect.to_owned())
    }

    /// Runs a host-to-host payment and resolves the gateway's answer.
    ///
    /// # Errors
    ///
    /// Returns [`HttpError`] if validation fails, the request fails, the
    /// gateway answers with a non-200 status, or the answer is not a
    /// recognizable notification.
    #[cfg_attr(
        feature = "telemetry",
        instrument(name = "payfrex.gateway_client.h2h_payment", skip_all, err)
    )]
    pub async fn h2h_payment<P>(&self, params: &P) -> Result<TransactionResult, HttpError>
    where
        P: RequestParameters + Sync + ?Sized,
    {
        let fields = params.validated()?;
        let body = self
            .post_secured(&self.h2h_url, "POST h2h payment", &fields)
            .await?;

        let notification = notification::parse_str(&body)?;
        let result = TransactionResult::from(notification);

        #[cfg(feature = "telemetry")]
        tracing::debug!(
            outcome = %result.outcome,
            terminal = result.terminal,
            "Resolved host-to-host payment"
        );

        Ok(result)
    }

    /// Encodes, secures and posts `fields`, returning the response body.
    async fn post_secured(
        &self,
        url: &Url,
        context: &'static str,
        fields: &FieldSet,
    ) -> Result<String, HttpError> {
        let query = encode(fields);
        let envelope = security::secure(query.as_str(), self.credentials.key())?;
        let headers = envelope_headers(&envelope.headers(self.credentials.api_version))?;
        let body = form_body(&envelope.body(self.credentials.merchant_id.as_str()));

        #[cfg(feature = "telemetry")]
        tracing::debug!(%url, fields = fields.len(), "Sending secured request");

        let mut req = self.client.post(url.clone()).headers(headers).body(body);
        if let Some(timeout) = self.timeout {
            req = req.timeout(timeout);
        }
        let response = req
            .send()
            .await
            .map_err(|source| HttpError::Transport { context, source })?;

        let status = response.status();

        #[cfg(feature = "telemetry")]
        tracing::debug!(%status, "Gateway responded");

        let text = response
            .text()
            .await
            .map_err(|source| HttpError::Transport { context, source })?;

        if status == StatusCode::OK {
            Ok(text)
        } else {
            Err(HttpError::Status {
                context,
                status,
                body: text,
            })
        }
    }
}

fn parse_base_url(raw: &str) -> Result<Url, HttpError> {
    // Endpoint paths are joined relative to the base, which needs a trailing slash.
    let mut normalized = raw.trim_end_matches('/').to_owned();
    normalized.push('/');
    Url::parse(&normalized).map_err(|source| HttpError::UrlParse {
        context: "Failed to parse base url",
        source,
    })
}

impl TryFrom<Credentials> for GatewayClient {
    type Error = HttpError;

    fn try_from(value: Credentials) -> Result<Self, Self::Error> {
        Self::try_new(value)
    }
}
