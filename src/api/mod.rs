//! Resource accessors.
//!
//! Each accessor maps one Trello endpoint onto a method. Accessors add no
//! behavior of their own beyond filling in the path template: parameters go
//! through to Trello as given, and the result type is whatever the caller
//! deserializes into, either `serde_json::Value` or one of the models here.
//!
//! - [`Organizations`]: `organizations/{id}` and friends
//! - [`Boards`]: `boards/{id}` and friends
//! - [`Members`]: `members/{id}` and friends

pub mod board;
pub mod member;
pub mod organization;

pub use board::{Board, Boards};
pub use member::{Member, Members};
pub use organization::{MemberType, Membership, Organization, Organizations};

use crate::{Error, Result};
use std::borrow::Cow;

/// Percent-encodes an id so it stays a single path segment.
///
/// `.` and `..` are rejected: URL parsing folds them (and their `%2E` forms)
/// into the surrounding path, so they can never address a resource by id.
pub(crate) fn segment(id: &str) -> Result<Cow<'_, str>> {
    if matches!(id, "." | "..") {
        return Err(Error::InvalidValue {
            field: "id",
            value: id.to_string(),
        });
    }
    Ok(urlencoding::encode(id))
}
