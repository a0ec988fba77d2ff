//! HTTP client module
//!
//! Provides the HTTP client every API handle goes through.
//!
//! # Features
//!
//! - **Authentication**: token attached per [`crate::auth::AuthScheme`]
//! - **Organization scoping**: `x-deepint-organization` header per request
//! - **Error mapping**: non-success statuses become [`crate::Error::Api`]
//! - **Timeouts**: request and connect timeouts passed through to reqwest

mod client;

pub use client::{HttpClient, HttpClientConfig, HttpClientConfigBuilder, RequestConfig};
