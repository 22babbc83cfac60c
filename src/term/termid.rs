use core::fmt::Debug;
use std::fmt::Display;

use crate::{ZpError, ZpResult};

/// The identifier of a term of an OBO ontology, e.g. `ZFA:0000108`
///
/// A `TermId` consists of a prefix (the ontology namespace, `ZFA`) and a
/// local part (`0000108`), separated by a colon. Both parts are restricted
/// to a small character set, so that a `TermId` can never contain any of
/// the delimiters used by [`crate::Fingerprint`] or by the ontology document.
#[derive(Clone, Eq, Hash, Ord, PartialEq, PartialOrd)]
pub struct TermId {
    inner: String,
    sep: usize,
}

impl TermId {
    /// The namespace of the term, e.g. `ZFA`
    pub fn prefix(&self) -> &str {
        &self.inner[..self.sep]
    }

    /// The local part of the term, e.g. `0000108`
    pub fn local(&self) -> &str {
        &self.inner[self.sep + 1..]
    }

    /// The full OBO ID, e.g. `ZFA:0000108`
    pub fn as_str(&self) -> &str {
        &self.inner
    }

    /// Returns `true` if the term belongs to the namespace `prefix`
    pub fn in_namespace(&self, prefix: &str) -> bool {
        self.prefix() == prefix
    }

    /// The last segment of the term's IRI, e.g. `ZFA_0000108`
    ///
    /// # Examples
    ///
    /// ```
    /// use zpgen::TermId;
    ///
    /// let id = TermId::try_from("ZFA:0000108").unwrap();
    /// assert_eq!(id.iri_fragment(), "ZFA_0000108");
    /// ```
    pub fn iri_fragment(&self) -> String {
        format!("{}_{}", self.prefix(), self.local())
    }

    /// Parses the last segment of an OBO IRI (`ZFA_0000108`) into a `TermId`
    ///
    /// # Errors
    ///
    /// [`ZpError::InvalidTermId`] if the fragment does not contain an underscore
    /// or if either part contains invalid characters
    pub fn from_iri_fragment(fragment: &str) -> ZpResult<Self> {
        let Some((prefix, local)) = fragment.split_once('_') else {
            return Err(ZpError::InvalidTermId(fragment.to_string()));
        };
        Self::from_parts(prefix, local)
    }

    /// Builds a `TermId` from a prefix and local part known to be valid
    pub(crate) fn known(prefix: &'static str, local: &'static str) -> Self {
        debug_assert!(Self::from_parts(prefix, local).is_ok());
        TermId {
            inner: format!("{prefix}:{local}"),
            sep: prefix.len(),
        }
    }

    fn from_parts(prefix: &str, local: &str) -> ZpResult<Self> {
        let valid_prefix =
            !prefix.is_empty() && prefix.chars().all(|c| c.is_ascii_alphanumeric());
        let valid_local = !local.is_empty()
            && local
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || matches!(c, '_' | '.' | '-'));
        if !(valid_prefix && valid_local) {
            return Err(ZpError::InvalidTermId(format!("{prefix}:{local}")));
        }
        Ok(TermId {
            inner: format!("{prefix}:{local}"),
            sep: prefix.len(),
        })
    }
}

impl TryFrom<&str> for TermId {
    type Error = ZpError;
    fn try_from(s: &str) -> ZpResult<Self> {
        let Some((prefix, local)) = s.trim().split_once(':') else {
            return Err(ZpError::InvalidTermId(s.to_string()));
        };
        Self::from_parts(prefix, local)
    }
}

impl Debug for TermId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "TermId({})", self)
    }
}

impl Display for TermId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.inner)
    }
}

impl PartialEq<str> for TermId {
    fn eq(&self, other: &str) -> bool {
        self.inner == other
    }
}

impl PartialEq<&str> for TermId {
    fn eq(&self, other: &&str) -> bool {
        self.inner == *other
    }
}
