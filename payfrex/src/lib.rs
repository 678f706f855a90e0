#![cfg_attr(docsrs, feature(doc_auto_cfg))]

//! Core of the Payfrex payment gateway client SDK.
//!
//! This crate holds the transport-independent half of a gateway round trip:
//! turning request parameters into a deterministic query, securing that query
//! for the wire, and making sense of whatever the gateway sends back.
//!
//! # Overview
//!
//! An outbound request flows through three stages:
//!
//! 1. A [`params::RequestParameters`] implementation validates itself and
//!    yields an ordered [`FieldSet`].
//! 2. [`encode`] serializes the fields into a [`CanonicalQuery`].
//! 3. [`secure`] encrypts the query with AES-CBC under the merchant key and
//!    signs the plaintext with SHA-256.
//!
//! Inbound documents (synchronous responses, redirect callbacks, webhooks) go
//! through [`parse`], which accepts JSON, JSON-wrapped XML and both XML
//! dialects, and yields one [`Notification`]. The [`outcome`] module then
//! resolves the last operation into a [`TransactionOutcome`].
//!
//! # Modules
//!
//! - [`config`] - Merchant credentials and gateway environments
//! - [`encoding`] - Base64 wrapper used for wire material
//! - [`error`] - Error types for each stage
//! - [`notification`] - Notification model and normalization
//! - [`outcome`] - Transaction outcome resolution
//! - [`params`] - Request parameter sets and validation chains
//! - [`query`] - Canonical query serialization
//! - [`security`] - Payload encryption and integrity signing
//!
//! # Feature Flags
//!
//! - `telemetry` - Enables tracing instrumentation for debugging and monitoring

pub mod config;
pub mod encoding;
pub mod error;
pub mod notification;
pub mod outcome;
pub mod params;
pub mod query;
pub mod security;

pub use config::{Credentials, Environment};
pub use error::PayfrexError;
pub use notification::{Notification, Operation, parse, parse_str};
pub use outcome::{TransactionOutcome, TransactionResult};
pub use query::{CanonicalQuery, FieldSet, FieldValue, encode};
pub use rust_decimal::Decimal;
pub use security::{SecuredEnvelope, secure};
