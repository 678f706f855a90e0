//! HTTP-specific constants for the Payfrex gateway.

/// Header carrying the caller's API version.
pub const API_VERSION_HEADER: &str = "apiVersion";

/// Header carrying the cipher mode, always `CBC`.
pub const ENCRYPTION_MODE_HEADER: &str = "encryptionMode";

/// Header carrying the Base64 initialization vector.
pub const IV_HEADER: &str = "iv";

/// Content type of secured request bodies.
pub const FORM_CONTENT_TYPE: &str = "application/x-www-form-urlencoded";

/// Hosted (redirection) payment endpoint, relative to the environment host.
/// Answers with the checkout URL the customer must be sent to.
pub const HOSTED_PAYMENT_PATH: &str = "EPGCheckout/rest/online/tokenize";

/// Host-to-host payment endpoint, relative to the environment host.
/// Answers with a notification document.
pub const H2H_PAYMENT_PATH: &str = "EPGCheckout/rest/online/pay";

/// Default request timeout in seconds.
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;
