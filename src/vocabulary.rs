//! The fixed set of relations and terms used to compose phenotype classes

use crate::{TermId, ZpError, ZpResult};

/// Relations, marker classes and accepted namespaces of the composition grammar
///
/// The table is built once at startup and handed to the [`crate::Composer`].
/// [`Vocabulary::default`] returns the table used for the Zebrafish
/// Phenotype Ontology:
///
/// | Field | Term |
/// | --- | --- |
/// | `has_part` | `BFO:0000051` |
/// | `part_of` | `BFO:0000050` |
/// | `inheres_in` | `BFO:0000052` |
/// | `towards` | `BFO:0000070` |
/// | `qualifier` | `RO:0002180` |
/// | `abnormal` | `PATO:0000460` |
/// | `anatomical_system` | `ZFA:0001439` |
/// | `generic_quality` | `PATO:0000001` |
#[derive(Debug, Clone)]
pub struct Vocabulary {
    /// `has part` relation wrapping the whole phenotype
    pub has_part: TermId,
    /// `part of` relation linking a subterm to its superterm
    pub part_of: TermId,
    /// `inheres in` relation linking the quality to the first entity
    pub inheres_in: TermId,
    /// `towards` relation linking the quality to the second entity
    pub towards: TermId,
    /// `qualifier` relation used for the abnormal marker
    pub qualifier: TermId,
    /// The `abnormal` quality class
    pub abnormal: TermId,
    /// The `anatomical system` superterm of the exclusion rule
    pub anatomical_system: TermId,
    /// The most generic quality (`quality`) of the exclusion rule
    pub generic_quality: TermId,
    /// Namespaces accepted for entity super- and subterms
    pub entity_namespaces: Vec<String>,
    /// Namespaces accepted for the quality term
    pub quality_namespaces: Vec<String>,
}

impl Vocabulary {
    /// Builds a vocabulary from plain OBO IDs
    ///
    /// `terms` must be ordered like the fields of [`Vocabulary`], starting
    /// with `has_part` and ending with `generic_quality`.
    ///
    /// # Errors
    ///
    /// - [`ZpError::InvalidTermId`] if any of the terms is not a valid OBO ID
    /// - [`ZpError::InvalidConfig`] if no namespaces are accepted for entities or qualities
    pub fn from_ids(
        terms: [&str; 8],
        entity_namespaces: &[&str],
        quality_namespaces: &[&str],
    ) -> ZpResult<Self> {
        if entity_namespaces.is_empty() || quality_namespaces.is_empty() {
            return Err(ZpError::InvalidConfig(
                "entity and quality namespaces must not be empty".to_string(),
            ));
        }
        let [has_part, part_of, inheres_in, towards, qualifier, abnormal, anatomical_system, generic_quality] =
            terms;
        Ok(Self {
            has_part: TermId::try_from(has_part)?,
            part_of: TermId::try_from(part_of)?,
            inheres_in: TermId::try_from(inheres_in)?,
            towards: TermId::try_from(towards)?,
            qualifier: TermId::try_from(qualifier)?,
            abnormal: TermId::try_from(abnormal)?,
            anatomical_system: TermId::try_from(anatomical_system)?,
            generic_quality: TermId::try_from(generic_quality)?,
            entity_namespaces: entity_namespaces.iter().map(|ns| ns.to_string()).collect(),
            quality_namespaces: quality_namespaces.iter().map(|ns| ns.to_string()).collect(),
        })
    }

    /// Returns `true` if `id` may be used as an entity super- or subterm
    pub fn is_entity(&self, id: &TermId) -> bool {
        self.entity_namespaces.iter().any(|ns| id.in_namespace(ns))
    }

    /// Returns `true` if `id` may be used as a quality
    pub fn is_quality(&self, id: &TermId) -> bool {
        self.quality_namespaces.iter().any(|ns| id.in_namespace(ns))
    }
}

impl Default for Vocabulary {
    fn default() -> Self {
        Self {
            has_part: TermId::known("BFO", "0000051"),
            part_of: TermId::known("BFO", "0000050"),
            inheres_in: TermId::known("BFO", "0000052"),
            towards: TermId::known("BFO", "0000070"),
            qualifier: TermId::known("RO", "0002180"),
            abnormal: TermId::known("PATO", "0000460"),
            anatomical_system: TermId::known("ZFA", "0001439"),
            generic_quality: TermId::known("PATO", "0000001"),
            entity_namespaces: ["GO", "ZFA", "BSPO", "MPATH"]
                .iter()
                .map(|ns| ns.to_string())
                .collect(),
            quality_namespaces: vec!["PATO".to_string()],
        }
    }
}
