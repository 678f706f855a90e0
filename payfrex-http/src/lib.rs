//! HTTP transport layer for the Payfrex gateway SDK.
//!
//! Turns a secured request envelope into HTTP headers and a form body, and
//! (feature-gated) drives the full request/response cycle against the gateway.
//!
//! # Modules
//!
//! - [`constants`] - HTTP header names, endpoint paths, content types
//! - [`headers`] - Envelope to `HeaderMap` and form body conversion
//! - [`error`] - HTTP transport error types
//! - [`client`] - Gateway client (feature: `client`)

pub mod constants;
pub mod error;
pub mod headers;

#[cfg(feature = "client")]
pub mod client;

pub use error::HttpError;
