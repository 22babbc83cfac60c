#![doc = include_str!("../README.md")]

use std::num::ParseIntError;
use thiserror::Error;

pub mod composer;
pub mod entry;
pub mod expression;
pub mod generator;
pub mod parser;
pub mod store;
pub mod term;
pub mod vocabulary;
pub mod writer;

pub use composer::{Composed, Composer, Composition, SkipReason};
pub use entry::{Entity, EntityTerm, PhenotypeEntry};
pub use expression::{ClassExpression, Fingerprint};
pub use generator::{Generator, GeneratorConfig, RunSummary};
pub use store::{IdRecord, IdStore, Identified, SharedIdStore};
pub use term::{TermId, ZpId};
pub use vocabulary::Vocabulary;

const DEFAULT_NUM_RECORDS: usize = 20_000;
const MAX_ZP_ID_INTEGER: u32 = 9_999_999;

/// Base IRI of all OBO library classes and properties
pub const OBO_IRI: &str = "http://purl.obolibrary.org/obo/";

/// Main Error type for this crate
#[derive(Error, Debug)]
#[non_exhaustive]
pub enum ZpError {
    /// A single input row is malformed. This error only affects the row
    #[error("invalid row {line}: {reason}")]
    InvalidRow {
        /// 1-based line number of the row
        line: usize,
        /// Description of the problem
        reason: String,
    },
    /// A term ID is not a valid `PREFIX:LOCAL` identifier
    #[error("invalid term id: {0}")]
    InvalidTermId(String),
    /// A term ID belongs to a namespace that is not allowed in its slot
    #[error("unsupported ontology prefix for {slot} term \"{id}\"")]
    UnsupportedNamespace {
        /// The offending term ID
        id: String,
        /// The slot of the entry that contained the ID
        slot: &'static str,
    },
    /// An entry cannot be turned into a phenotype class
    #[error("{location}: {source}")]
    InvalidEntry {
        /// Input line and gene of the entry
        location: String,
        /// The underlying error
        #[source]
        source: Box<ZpError>,
    },
    /// A previously generated ontology document cannot be read
    #[error("invalid ontology document: {0}")]
    InvalidOntology(String),
    /// Failed to open a file
    #[error("cannot open file {0}")]
    CannotOpenFile(String),
    /// Configuration is inconsistent
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
    /// The canonical identifier store is in an inconsistent state
    #[error("internal invariant violated: {0}")]
    InvariantViolation(String),
    /// Reading from or writing to a file failed
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    /// Unable to parse an integer
    #[error("unable to parse Integer")]
    ParseIntError,
}

impl ZpError {
    /// Returns `true` if the error only invalidates a single input row
    ///
    /// All other errors are systemic and must abort the run.
    pub fn is_row_scoped(&self) -> bool {
        matches!(self, ZpError::InvalidRow { .. })
    }
}

impl From<ParseIntError> for ZpError {
    fn from(_: ParseIntError) -> Self {
        ZpError::ParseIntError
    }
}

/// Shortcut for `Result<T, ZpError>`
pub type ZpResult<T> = Result<T, ZpError>;
