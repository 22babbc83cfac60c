//! Builds the logical definition and label of a phenotype class
//!
//! Every abnormal [`PhenotypeEntry`] is turned into a class expression of
//! the form
//!
//! ```text
//! has_part some (
//!     <quality>
//!     and (qualifier some abnormal)
//!     and (inheres_in some <entity 1>)
//!     and (towards some <entity 2>)          # only if entity 2 is present
//! )
//! ```
//!
//! An entity with a subterm is expressed as `<subterm> and (part_of some <superterm>)`,
//! an entity without subterm is just `<superterm>`.

use tracing::trace;

use crate::entry::{Entity, EntityTerm, PhenotypeEntry};
use crate::expression::ClassExpression;
use crate::term::TermId;
use crate::vocabulary::Vocabulary;
use crate::{ZpError, ZpResult};

/// The class expression and label of a composed phenotype
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Composed {
    /// The logical definition of the phenotype class
    pub expression: ClassExpression,
    /// The human readable label of the phenotype class
    pub label: String,
}

/// Reasons why an entry does not result in a phenotype class
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkipReason {
    /// The entry describes a normal phenotype
    Normal,
    /// The entry matches the `anatomical system` - `quality` exclusion rule
    ///
    /// See [`Composer::is_degenerate_anatomical_system`]
    DegenerateAnatomicalSystem,
}

/// The result of composing a single entry
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Composition {
    /// The entry was turned into a phenotype class
    Composed(Composed),
    /// The entry does not describe a phenotype class
    Skipped(SkipReason),
}

/// Composes [`PhenotypeEntry`]s into class expressions and labels
///
/// The composer is stateless apart from its [`Vocabulary`]: composing the
/// same entry twice yields identical expressions. It never allocates
/// identifiers, that is the job of the [`crate::IdStore`].
#[derive(Debug, Clone, Default)]
pub struct Composer {
    vocabulary: Vocabulary,
}

impl Composer {
    /// Constructs a new `Composer` using the given [`Vocabulary`]
    pub fn new(vocabulary: Vocabulary) -> Self {
        Self { vocabulary }
    }

    /// The vocabulary used for composition
    pub fn vocabulary(&self) -> &Vocabulary {
        &self.vocabulary
    }

    /// Builds the class expression and label of `entry`
    ///
    /// # Errors
    ///
    /// - [`ZpError::InvalidTermId`] if a term ID of the entry is malformed
    /// - [`ZpError::UnsupportedNamespace`] if an entity term is not from one of the
    ///   entity namespaces or the quality is not from one of the quality namespaces
    ///
    /// Both errors indicate a mismatch between the input data and the
    /// vocabulary and must abort the whole run.
    ///
    /// # Examples
    ///
    /// ```
    /// use zpgen::composer::Composition;
    /// use zpgen::{Composer, Entity, EntityTerm, PhenotypeEntry};
    ///
    /// let entry = PhenotypeEntry::new(
    ///     "ZDB-GENE-040426-1716",
    ///     Entity::from_columns("ZFA:0000108", "fin", "", "").unwrap(),
    ///     None,
    ///     EntityTerm::new("PATO:0000628", "shape"),
    ///     true,
    /// );
    ///
    /// let Composition::Composed(composed) = Composer::default().compose(&entry).unwrap() else {
    ///     panic!("abnormal entries are composed");
    /// };
    /// assert_eq!(composed.label, "abnormal(ly) shape fin");
    /// ```
    pub fn compose(&self, entry: &PhenotypeEntry) -> ZpResult<Composition> {
        if !entry.is_abnormal() {
            return Ok(Composition::Skipped(SkipReason::Normal));
        }
        if self.is_degenerate_anatomical_system(entry) {
            trace!("Excluding {} anatomical system - quality entry", entry.gene_id());
            return Ok(Composition::Skipped(SkipReason::DegenerateAnatomicalSystem));
        }

        let voc = &self.vocabulary;
        let quality = self.quality_class(entry.quality())?;

        let mut operands = Vec::with_capacity(4);
        operands.push(quality);
        operands.push(ClassExpression::some(
            voc.qualifier.clone(),
            ClassExpression::class(voc.abnormal.clone()),
        ));

        let entity1 = entry.entity1();
        operands.push(ClassExpression::some(
            voc.inheres_in.clone(),
            self.entity_expression(entity1)?,
        ));
        let mut label = format!(
            "abnormal(ly) {} {}",
            entry.quality().name,
            entity_label(entity1)
        );

        if let Some(entity2) = entry.entity2() {
            operands.push(ClassExpression::some(
                voc.towards.clone(),
                self.entity_expression(entity2)?,
            ));
            label.push_str(" towards ");
            label.push_str(&entity_label(entity2));
        }

        let expression = ClassExpression::some(
            voc.has_part.clone(),
            ClassExpression::intersection_of(operands),
        );
        Ok(Composition::Composed(Composed { expression, label }))
    }

    /// Exclusion rule for a known degenerate annotation
    ///
    /// Entries with `anatomical system` as entity 1 superterm, the generic
    /// `quality` as quality and no subterm on either entity do not carry
    /// any phenotype information:
    ///
    /// ```text
    /// ZFA:0001439|anatomical system|||||||PATO:0000001|quality|abnormal|
    /// ```
    ///
    /// All other fields of the entry are ignored by this rule.
    pub fn is_degenerate_anatomical_system(&self, entry: &PhenotypeEntry) -> bool {
        let voc = &self.vocabulary;
        let entity1 = entry.entity1();
        entity1.superterm().id == voc.anatomical_system.as_str()
            && entry.quality().id == voc.generic_quality.as_str()
            && entity1.subterm().is_none()
            && entry.entity2().map_or(true, |e| e.subterm().is_none())
    }

    /// `<subterm> and (part_of some <superterm>)` or `<superterm>`
    fn entity_expression(&self, entity: &Entity) -> ZpResult<ClassExpression> {
        let superterm = self.entity_class(entity.superterm())?;
        match entity.subterm() {
            Some(subterm) => Ok(ClassExpression::intersection_of([
                self.entity_class(subterm)?,
                ClassExpression::some(self.vocabulary.part_of.clone(), superterm),
            ])),
            None => Ok(superterm),
        }
    }

    fn entity_class(&self, term: &EntityTerm) -> ZpResult<ClassExpression> {
        let id = TermId::try_from(term.id.as_str())?;
        if !self.vocabulary.is_entity(&id) {
            return Err(ZpError::UnsupportedNamespace {
                id: term.id.clone(),
                slot: "entity",
            });
        }
        Ok(ClassExpression::class(id))
    }

    fn quality_class(&self, term: &EntityTerm) -> ZpResult<ClassExpression> {
        let id = TermId::try_from(term.id.as_str())?;
        if !self.vocabulary.is_quality(&id) {
            return Err(ZpError::UnsupportedNamespace {
                id: term.id.clone(),
                slot: "quality",
            });
        }
        Ok(ClassExpression::class(id))
    }
}

// The more specific part comes last, e.g. "swim bladder epithelium"
fn entity_label(entity: &Entity) -> String {
    match entity.subterm() {
        Some(subterm) => format!("{} {}", entity.superterm().name, subterm.name),
        None => entity.superterm().name.clone(),
    }
}
