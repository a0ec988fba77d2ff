//! Record trait
//!
//! Implemented by every typed projection of a remote payload.

use serde::de::DeserializeOwned;

/// A typed record mapped from an API response
pub trait Record: DeserializeOwned {
    /// Record kind reported when a payload does not match, e.g. `"source"`
    const KIND: &'static str;
}

impl Record for serde_json::Value {
    const KIND: &'static str = "value";
}
