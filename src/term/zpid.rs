use core::fmt::Debug;
use std::fmt::Display;

use crate::{ZpError, ZpResult, MAX_ZP_ID_INTEGER};

const ZP_PREFIX: &str = "ZP";

/// The identifier of a generated Zebrafish Phenotype class
///
/// `ZpId`s are displayed as OBO IDs with a 7 digit, zero-padded numerical
/// suffix (`ZP:0000007`) and used as `ZP_0000007` inside IRIs.
#[derive(Copy, Clone, Eq, Hash, Ord, PartialEq, PartialOrd)]
pub struct ZpId {
    inner: u32,
}

impl ZpId {
    /// The numerical part of the ID
    pub fn as_u32(&self) -> u32 {
        self.inner
    }

    /// The ID following `self`
    ///
    /// # Errors
    ///
    /// [`ZpError::InvariantViolation`] if the identifier space of 7 digits is exhausted
    pub fn next(&self) -> ZpResult<ZpId> {
        if self.inner >= MAX_ZP_ID_INTEGER {
            return Err(ZpError::InvariantViolation(format!(
                "no identifier left after {self}"
            )));
        }
        Ok(ZpId {
            inner: self.inner + 1,
        })
    }

    /// The last segment of the class IRI, e.g. `ZP_0000007`
    pub fn iri_fragment(&self) -> String {
        format!("{ZP_PREFIX}_{:07}", self.inner)
    }

    /// Parses the last segment of a class IRI (`ZP_0000007`)
    ///
    /// # Errors
    ///
    /// [`ZpError::InvalidTermId`] if the fragment is not a ZP class
    pub fn from_iri_fragment(fragment: &str) -> ZpResult<ZpId> {
        Self::parse_with_separator(fragment, '_')
    }

    /// Returns `true` if the IRI fragment or OBO ID has the `ZP` prefix
    pub fn is_zp(id: &str) -> bool {
        id.strip_prefix(ZP_PREFIX)
            .is_some_and(|rest| rest.starts_with(['_', ':']))
    }

    fn parse_with_separator(s: &str, sep: char) -> ZpResult<ZpId> {
        let Some((prefix, number)) = s.split_once(sep) else {
            return Err(ZpError::InvalidTermId(s.to_string()));
        };
        if prefix != ZP_PREFIX || number.is_empty() || !number.bytes().all(|b| b.is_ascii_digit())
        {
            return Err(ZpError::InvalidTermId(s.to_string()));
        }
        let inner = number.parse::<u32>()?;
        if inner > MAX_ZP_ID_INTEGER {
            return Err(ZpError::InvalidTermId(s.to_string()));
        }
        Ok(ZpId { inner })
    }
}

impl TryFrom<&str> for ZpId {
    type Error = ZpError;
    fn try_from(s: &str) -> ZpResult<Self> {
        Self::parse_with_separator(s, ':')
    }
}

impl From<u32> for ZpId {
    fn from(inner: u32) -> Self {
        Self { inner }
    }
}

impl Debug for ZpId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "ZpId({})", self)
    }
}

impl Display for ZpId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{ZP_PREFIX}:{:07}", self.inner)
    }
}

impl PartialEq<str> for ZpId {
    fn eq(&self, other: &str) -> bool {
        ZpId::try_from(other).is_ok_and(|other| *self == other)
    }
}

impl PartialEq<&str> for ZpId {
    fn eq(&self, other: &&str) -> bool {
        self == *other
    }
}
