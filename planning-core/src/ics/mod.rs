//! ICS (RFC 5545) export and import of planning events.

mod generate;
mod parse;

pub use generate::{encode, encode_at};
pub use parse::decode;

/// Carries the event id when the UID had to be changed to stay unique.
const ID_PROPERTY: &str = "X-PLANNING-ID";
/// Marks events the user added locally.
const SOURCE_PROPERTY: &str = "X-PLANNING-SOURCE";
const LOCAL_SOURCE: &str = "LOCAL";
