//! A single decomposed phenotype - gene association

/// An anatomical or structural location of a phenotype
///
/// The `superterm` is always present. The optional `subterm` describes a
/// part of the superterm, e.g. the `epithelium` of the `swim bladder`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Entity {
    superterm: EntityTerm,
    subterm: Option<EntityTerm>,
}

/// A raw term as found in the input: OBO ID and name
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EntityTerm {
    /// The OBO ID as written in the input, e.g. `ZFA:0000108`
    pub id: String,
    /// The human readable name of the term
    pub name: String,
}

impl EntityTerm {
    /// Constructs a new `EntityTerm`
    pub fn new(id: &str, name: &str) -> Self {
        Self {
            id: id.to_string(),
            name: name.to_string(),
        }
    }
}

impl Entity {
    /// Constructs a new `Entity` from its superterm and an optional subterm
    pub fn new(superterm: EntityTerm, subterm: Option<EntityTerm>) -> Self {
        Self { superterm, subterm }
    }

    /// Builds an `Entity` from the four raw columns of the input
    ///
    /// Returns `None` if the superterm ID is empty. An empty subterm ID
    /// means that the entity has no subterm.
    pub fn from_columns(
        super_id: &str,
        super_name: &str,
        sub_id: &str,
        sub_name: &str,
    ) -> Option<Self> {
        if super_id.trim().is_empty() {
            return None;
        }
        let subterm = if sub_id.trim().is_empty() {
            None
        } else {
            Some(EntityTerm::new(sub_id.trim(), sub_name))
        };
        Some(Self::new(EntityTerm::new(super_id.trim(), super_name), subterm))
    }

    /// The superterm of the entity
    pub fn superterm(&self) -> &EntityTerm {
        &self.superterm
    }

    /// The subterm of the entity, if present
    pub fn subterm(&self) -> Option<&EntityTerm> {
        self.subterm.as_ref()
    }
}

/// One decomposed phenotype - gene association
///
/// Each entry describes a phenotype as `quality` of `entity1`, optionally
/// `towards` `entity2`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PhenotypeEntry {
    gene_id: String,
    entity1: Entity,
    entity2: Option<Entity>,
    quality: EntityTerm,
    abnormal: bool,
    line_number: Option<usize>,
}

impl PhenotypeEntry {
    /// Constructs a new `PhenotypeEntry`
    pub fn new(
        gene_id: &str,
        entity1: Entity,
        entity2: Option<Entity>,
        quality: EntityTerm,
        abnormal: bool,
    ) -> Self {
        Self {
            gene_id: gene_id.to_string(),
            entity1,
            entity2,
            quality,
            abnormal,
            line_number: None,
        }
    }

    /// Sets the input line the entry was read from
    #[must_use]
    pub fn with_line_number(mut self, line_number: usize) -> Self {
        self.line_number = Some(line_number);
        self
    }

    /// The 1-based input line, if the entry was read from a file
    pub fn line_number(&self) -> Option<usize> {
        self.line_number
    }

    /// Names the entry in error messages, e.g. `line 12 (gene ZDB-GENE-1)`
    pub fn location(&self) -> String {
        match self.line_number {
            Some(line) => format!("line {line} (gene {})", self.gene_id),
            None => format!("gene {}", self.gene_id),
        }
    }

    /// The ZFIN ID of the gene, e.g. `ZDB-GENE-040426-1716`
    pub fn gene_id(&self) -> &str {
        &self.gene_id
    }

    /// The mandatory first entity
    pub fn entity1(&self) -> &Entity {
        &self.entity1
    }

    /// The optional second entity
    pub fn entity2(&self) -> Option<&Entity> {
        self.entity2.as_ref()
    }

    /// The quality (PATO) term
    pub fn quality(&self) -> &EntityTerm {
        &self.quality
    }

    /// Returns `true` if the entry describes an abnormal phenotype
    pub fn is_abnormal(&self) -> bool {
        self.abnormal
    }

    /// Tab delimited description of the terms that make up the entry
    ///
    /// The columns are the IDs of entity 1 superterm, entity 1 subterm,
    /// quality, entity 2 superterm and entity 2 subterm. Absent terms
    /// are written as empty columns.
    pub fn source_information(&self) -> String {
        fn ids(entity: Option<&Entity>) -> (&str, &str) {
            match entity {
                Some(entity) => (
                    entity.superterm().id.as_str(),
                    entity.subterm().map_or("", |t| t.id.as_str()),
                ),
                None => ("", ""),
            }
        }
        let (e1_super, e1_sub) = ids(Some(&self.entity1));
        let (e2_super, e2_sub) = ids(self.entity2.as_ref());
        [e1_super, e1_sub, self.quality.id.as_str(), e2_super, e2_sub].join("\t")
    }
}
