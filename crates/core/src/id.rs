//! Strongly-typed identifiers used across the domain.
//!
//! Identifiers are human-readable slugs (`cola-cooled`, `container`) rather than
//! random ids: the catalog is re-parsed on every start and ids must come out the
//! same each time.

use core::str::FromStr;
use serde::{Deserialize, Serialize};

use crate::error::DomainError;

/// Identifier of a countable item (one product at one location).
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ItemId(String);

/// Identifier of a storage location.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LocationId(String);

macro_rules! impl_slug_newtype {
    ($t:ty, $name:literal) => {
        impl $t {
            /// Wrap an already-normalized identifier.
            ///
            /// No validation is performed; use `FromStr` for untrusted input.
            pub fn new(value: impl Into<String>) -> Self {
                Self(value.into())
            }

            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl core::fmt::Display for $t {
            fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
                f.pad(&self.0)
            }
        }

        impl From<$t> for String {
            fn from(value: $t) -> Self {
                value.0
            }
        }

        impl AsRef<str> for $t {
            fn as_ref(&self) -> &str {
                &self.0
            }
        }

        impl FromStr for $t {
            type Err = DomainError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                let trimmed = s.trim();
                if trimmed.is_empty() {
                    return Err(DomainError::invalid_id(format!("{}: empty", $name)));
                }
                if trimmed.chars().any(char::is_whitespace) {
                    return Err(DomainError::invalid_id(format!(
                        "{}: contains whitespace: {trimmed:?}",
                        $name
                    )));
                }
                Ok(Self(trimmed.to_string()))
            }
        }
    };
}

impl_slug_newtype!(ItemId, "ItemId");
impl_slug_newtype!(LocationId, "LocationId");

/// Lowercase `raw` and collapse every run of characters outside `[a-z0-9]`
/// into a single `-`.
///
/// Leading and trailing runs are kept as a dash, so `"(Cola)"` becomes
/// `"-cola-"`; two names that differ only in punctuation share a slug.
pub fn slugify(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    let mut in_separator = false;

    for ch in raw.chars().flat_map(char::to_lowercase) {
        if ch.is_ascii_lowercase() || ch.is_ascii_digit() {
            out.push(ch);
            in_separator = false;
        } else if !in_separator {
            out.push('-');
            in_separator = true;
        }
    }

    out
}
