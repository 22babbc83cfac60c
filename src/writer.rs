//! Writing the generated ontology and the side files
//!
//! - [`OntologyWriter`]: the ontology in OWL Functional Syntax
//! - [`AnnotationWriter`]: `<gene>\t<ZP id>\t<label>` lines, one per composed entry
//! - [`SourceInfoWriter`]: `<ZP id>\t<source information>` lines, one per class used in the run

use std::collections::HashMap;
use std::io::Write;

use tracing::debug;

use crate::parser::owl::ObsoleteClass;
use crate::store::IdRecord;
use crate::term::ZpId;
use crate::{ZpResult, OBO_IRI};

/// IRI of the generated ontology
pub const ONTOLOGY_IRI: &str = "http://purl.obolibrary.org/obo/zp.owl";

/// Writes phenotype classes as an OWL Functional Syntax document
///
/// Each class is written as
///
/// ```text
/// Declaration(Class(obo:ZP_0000001))
/// EquivalentClasses(obo:ZP_0000001 ObjectSomeValuesFrom(obo:BFO_0000051 ...))
/// AnnotationAssertion(rdfs:label obo:ZP_0000001 "abnormal(ly) shape fin")
/// ```
///
/// and each obsolete identifier as a deprecated class, pointing to its
/// replacement if there is one:
///
/// ```text
/// Declaration(Class(obo:ZP_0000004))
/// AnnotationAssertion(rdfs:label obo:ZP_0000004 "abnormal(ly) shape fin")
/// AnnotationAssertion(owl:deprecated obo:ZP_0000004 "true"^^xsd:boolean)
/// AnnotationAssertion(obo:IAO_0100001 obo:ZP_0000004 obo:ZP_0000001)
/// ```
///
/// The output can be read back with [`crate::parser::owl::parse_ontology`].
pub struct OntologyWriter<W: Write> {
    out: W,
}

impl<W: Write> OntologyWriter<W> {
    /// Constructs a new `OntologyWriter`
    pub fn new(out: W) -> Self {
        Self { out }
    }

    /// Writes the whole ontology document
    ///
    /// Classes and obsolete classes are written ordered by identifier.
    /// `comments` holds optional `rdfs:comment` annotations, e.g. the source
    /// information of the classes used in the run.
    ///
    /// # Errors
    ///
    /// [`crate::ZpError::Io`] if writing fails
    pub fn write(
        mut self,
        records: &[&IdRecord],
        obsolete: &[&ObsoleteClass],
        comments: &HashMap<ZpId, String>,
    ) -> ZpResult<W> {
        writeln!(self.out, "Prefix(obo:=<{OBO_IRI}>)")?;
        writeln!(
            self.out,
            "Prefix(rdfs:=<http://www.w3.org/2000/01/rdf-schema#>)"
        )?;
        writeln!(self.out, "Prefix(owl:=<http://www.w3.org/2002/07/owl#>)")?;
        writeln!(self.out, "Prefix(xsd:=<http://www.w3.org/2001/XMLSchema#>)")?;
        writeln!(self.out)?;
        writeln!(self.out, "Ontology(<{ONTOLOGY_IRI}>")?;

        debug!(
            "Writing {} classes and {} obsolete classes",
            records.len(),
            obsolete.len()
        );
        let mut records = records.iter().peekable();
        let mut obsolete = obsolete.iter().peekable();
        loop {
            let next_is_record = match (records.peek(), obsolete.peek()) {
                (Some(record), Some(class)) => record.id() < class.id,
                (Some(_), None) => true,
                (None, Some(_)) => false,
                (None, None) => break,
            };
            if next_is_record {
                if let Some(record) = records.next() {
                    self.write_class(record, comments.get(&record.id()))?;
                }
            } else if let Some(class) = obsolete.next() {
                self.write_obsolete(class)?;
            }
        }

        writeln!(self.out, ")")?;
        self.out.flush()?;
        Ok(self.out)
    }

    fn write_class(&mut self, record: &IdRecord, comment: Option<&String>) -> ZpResult<()> {
        let class = format!("obo:{}", record.id().iri_fragment());
        writeln!(self.out)?;
        writeln!(self.out, "Declaration(Class({class}))")?;
        writeln!(self.out, "EquivalentClasses({class} {})", record.expression())?;
        if let Some(label) = record.label() {
            writeln!(
                self.out,
                "AnnotationAssertion(rdfs:label {class} \"{}\")",
                escape(label)
            )?;
        }
        if let Some(comment) = comment {
            writeln!(
                self.out,
                "AnnotationAssertion(rdfs:comment {class} \"{}\")",
                escape(comment)
            )?;
        }
        Ok(())
    }

    fn write_obsolete(&mut self, class: &ObsoleteClass) -> ZpResult<()> {
        let iri = format!("obo:{}", class.id.iri_fragment());
        writeln!(self.out)?;
        writeln!(self.out, "Declaration(Class({iri}))")?;
        if let Some(label) = &class.label {
            writeln!(
                self.out,
                "AnnotationAssertion(rdfs:label {iri} \"{}\")",
                escape(label)
            )?;
        }
        writeln!(
            self.out,
            "AnnotationAssertion(owl:deprecated {iri} \"true\"^^xsd:boolean)"
        )?;
        if let Some(replacement) = class.replaced_by {
            writeln!(
                self.out,
                "AnnotationAssertion(obo:IAO_0100001 {iri} obo:{})",
                replacement.iri_fragment()
            )?;
        }
        Ok(())
    }
}

fn escape(literal: &str) -> String {
    literal.replace('\\', "\\\\").replace('"', "\\\"")
}

/// Writes one `<gene>\t<ZP id>\t<label>` line per composed entry
///
/// Lines are written in the order of the calls, duplicates included.
pub struct AnnotationWriter<W: Write> {
    out: W,
    lines: usize,
}

impl<W: Write> AnnotationWriter<W> {
    /// Constructs a new `AnnotationWriter`
    pub fn new(out: W) -> Self {
        Self { out, lines: 0 }
    }

    /// Appends a single annotation line
    ///
    /// # Errors
    ///
    /// [`crate::ZpError::Io`] if writing fails
    pub fn write(&mut self, gene_id: &str, id: ZpId, label: &str) -> ZpResult<()> {
        writeln!(self.out, "{gene_id}\t{id}\t{label}")?;
        self.lines += 1;
        Ok(())
    }

    /// The number of written lines
    pub fn lines(&self) -> usize {
        self.lines
    }

    /// Flushes and returns the inner writer
    ///
    /// # Errors
    ///
    /// [`crate::ZpError::Io`] if flushing fails
    pub fn finish(mut self) -> ZpResult<W> {
        self.out.flush()?;
        Ok(self.out)
    }
}

/// Writes one `<ZP id>\t<source information>` line per class
pub struct SourceInfoWriter<W: Write> {
    out: W,
}

impl<W: Write> SourceInfoWriter<W> {
    /// Constructs a new `SourceInfoWriter`
    pub fn new(out: W) -> Self {
        Self { out }
    }

    /// Appends the source information of a class
    ///
    /// # Errors
    ///
    /// [`crate::ZpError::Io`] if writing fails
    pub fn write(&mut self, id: ZpId, source: &str) -> ZpResult<()> {
        writeln!(self.out, "{id}\t{source}")?;
        Ok(())
    }

    /// Flushes and returns the inner writer
    ///
    /// # Errors
    ///
    /// [`crate::ZpError::Io`] if flushing fails
    pub fn finish(mut self) -> ZpResult<W> {
        self.out.flush()?;
        Ok(self.out)
    }
}
