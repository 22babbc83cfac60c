//! Identifiers of ontology terms
//!
//! [`TermId`] references a class or an object property of an external OBO
//! ontology (e.g. `ZFA:0000108` or `BFO:0000051`), [`ZpId`] is the identifier
//! of a generated Zebrafish Phenotype class (e.g. `ZP:0000007`).

mod termid;
mod zpid;

pub use termid::TermId;
pub use zpid::ZpId;
