//! Typed response mapper
//!
//! Turns the raw JSON returned by an endpoint into typed records.
//!
//! # Overview
//!
//! Every record type implements [`Record`], which names the record kind used
//! in [`crate::Error::MalformedResponse`]. Mapping is stateless and fails
//! closed: a payload with missing or mistyped required fields, or an unknown
//! discriminator, is an error and never a partially filled value.
//!
//! The [`fields`] helpers cover the loose spots in the platform's payloads
//! (several date layouts, counters sent as strings, `null` strings).

pub mod fields;
mod mapper;
mod types;

pub use mapper::{decode, decode_list, id_field, record};
pub use types::Record;

#[cfg(test)]
mod tests;
