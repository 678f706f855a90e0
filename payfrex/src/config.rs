//! Merchant credentials and gateway environments.
//!
//! Credentials can be built in code, deserialized from any serde format, or
//! read from the process environment:
//!
//! - `PAYFREX_MERCHANT_ID`: merchant identifier (required)
//! - `PAYFREX_MERCHANT_KEY`: AES key material, 16, 24 or 32 bytes (required)
//! - `PAYFREX_PRODUCT_ID`: product identifier (required)
//! - `PAYFREX_API_VERSION`: integer API version (default: `5`)
//! - `PAYFREX_ENVIRONMENT`: `staging` or `production` (default: `staging`)

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
use crate::security;

/// Default value of the `apiVersion` header.
pub const DEFAULT_API_VERSION: u32 = 5;

/// Gateway environment.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Environment {
    /// Integration sandbox.
    #[default]
    Staging,
    /// Live gateway.
    Production,
}

impl Environment {
    /// Base URL of the checkout host, without trailing slash.
    #[must_use]
    pub const fn base_url(self) -> &'static str {
        match self {
            Self::Staging => "https://checkout.stg-eu-west1.epgint.com",
            Self::Production => "https://checkout.epg.com",
        }
    }
}

impl FromStr for Environment {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "staging" | "stg" | "sandbox" => Ok(Self::Staging),
            "production" | "prod" | "live" => Ok(Self::Production),
            other => Err(other.to_owned()),
        }
    }
}

/// Merchant credentials.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Credentials {
    /// Merchant identifier.
    pub merchant_id: String,
    /// Merchant secret, used directly as the AES key. Never serialized.
    #[serde(skip_serializing)]
    pub merchant_key: String,
    /// Product identifier.
    pub product_id: String,
    /// Value of the `apiVersion` header.
    #[serde(default = "default_api_version")]
    pub api_version: u32,
    /// Target environment.
    #[serde(default)]
    pub environment: Environment,
}

const fn default_api_version() -> u32 {
    DEFAULT_API_VERSION
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("merchant_id", &self.merchant_id)
            .field("merchant_key", &"<redacted>")
            .field("product_id", &self.product_id)
            .field("api_version", &self.api_version)
            .field("environment", &self.environment)
            .finish()
    }
}

impl Credentials {
    /// Creates staging credentials with the default API version.
    #[must_use]
    pub fn new(
        merchant_id: impl Into<String>,
        merchant_key: impl Into<String>,
        product_id: impl Into<String>,
    ) -> Self {
        Self {
            merchant_id: merchant_id.into(),
            merchant_key: merchant_key.into(),
            product_id: product_id.into(),
            api_version: DEFAULT_API_VERSION,
            environment: Environment::Staging,
        }
    }

    /// Sets the environment.
    #[must_use]
    pub const fn with_environment(mut self, environment: Environment) -> Self {
        self.environment = environment;
        self
    }

    /// Sets the API version.
    #[must_use]
    pub const fn with_api_version(mut self, api_version: u32) -> Self {
        self.api_version = api_version;
        self
    }

    /// Reads credentials from `PAYFREX_*` environment variables.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] if a required variable is missing or a value
    /// cannot be parsed.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Reads credentials through an arbitrary variable lookup.
    ///
    /// # Errors
    ///
    /// See [`Credentials::from_env`].
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let required = |name: &'static str| {
            lookup(name)
                .filter(|v| !v.is_empty())
                .ok_or(ConfigError::MissingVar(name))
        };

        let mut credentials = Self::new(
            required("PAYFREX_MERCHANT_ID")?,
            required("PAYFREX_MERCHANT_KEY")?,
            required("PAYFREX_PRODUCT_ID")?,
        );

        if let Some(value) = lookup("PAYFREX_API_VERSION") {
            credentials.api_version =
                value.trim().parse().map_err(|_| ConfigError::InvalidVar {
                    name: "PAYFREX_API_VERSION",
                    value: value.clone(),
                })?;
        }
        if let Some(value) = lookup("PAYFREX_ENVIRONMENT") {
            credentials.environment = value.parse().map_err(|_| ConfigError::InvalidVar {
                name: "PAYFREX_ENVIRONMENT",
                value: value.clone(),
            })?;
        }

        Ok(credentials)
    }

    /// Raw AES key bytes.
    #[must_use]
    pub fn key(&self) -> &[u8] {
        self.merchant_key.as_bytes()
    }

    /// Checks that the merchant key is a valid AES key length.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Key`] otherwise.
    pub fn validate(&self) -> Result<(), ConfigError> {
        security::validate_key(self.key())?;
        Ok(())
    }

    /// Joins the environment base URL and an endpoint path.
    #[must_use]
    pub fn endpoint(&self, path: &str) -> String {
        format!(
            "{}/{}",
            self.environment.base_url(),
            path.trim_start_matches('/')
        )
    }
}
