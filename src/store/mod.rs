//! Canonical identifier store for generated phenotype classes
//!
//! The [`IdStore`] maps the [`Fingerprint`] of every class expression to a
//! [`ZpId`]. Equivalent expressions always receive the same identifier and
//! two different expressions never share one.
//!
//! When regenerating an ontology, the store can be pre-seeded with the
//! classes of the previous output ([`IdStore::preseed`]), so that already
//! published identifiers keep their meaning. Identifiers that lost their
//! class are kept as [`ObsoleteClass`]es and are never assigned again.

use std::collections::hash_map::Entry;
use std::collections::HashMap;
use std::path::Path;

use tracing::{debug, info, warn};

use crate::expression::{ClassExpression, Fingerprint};
use crate::parser::owl::{self, ObsoleteClass, OwlClass};
use crate::term::ZpId;
use crate::{ZpError, ZpResult, DEFAULT_NUM_RECORDS};

mod shared;
pub use shared::SharedIdStore;

/// A single assigned identifier
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IdRecord {
    id: ZpId,
    expression: ClassExpression,
    label: Option<String>,
    sequence: Option<usize>,
}

impl IdRecord {
    /// The identifier of the class
    pub fn id(&self) -> ZpId {
        self.id
    }

    /// The logical definition of the class
    pub fn expression(&self) -> &ClassExpression {
        &self.expression
    }

    /// The label of the class
    ///
    /// This is the label of the first lookup in the current run, or the label
    /// of the previous output for pre-seeded classes that were not used yet.
    pub fn label(&self) -> Option<&str> {
        self.label.as_deref()
    }

    /// The 0-based position of the first lookup of the record in the current run
    ///
    /// Returns `None` for pre-seeded records that were not requested
    /// in the current run.
    pub fn sequence(&self) -> Option<usize> {
        self.sequence
    }

    /// Returns `true` if the record was requested in the current run
    pub fn is_used(&self) -> bool {
        self.sequence.is_some()
    }
}

/// Result of [`IdStore::identify`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Identified {
    /// The identifier of the expression
    pub id: ZpId,
    /// `true` if the identifier was allocated by this call
    pub is_new: bool,
    /// `true` if the record already had a different label
    pub label_conflict: bool,
}

/// Maps class expressions to stable identifiers
///
/// # Examples
///
/// ```
/// use zpgen::{ClassExpression, IdStore, TermId};
///
/// let a = ClassExpression::class(TermId::try_from("ZFA:0000001").unwrap());
/// let b = ClassExpression::class(TermId::try_from("ZFA:0000002").unwrap());
///
/// let mut store = IdStore::new();
/// let first = store.identify(&a, "a").unwrap();
/// assert!(first.is_new);
/// assert_eq!(first.id, "ZP:0000001");
///
/// let second = store.identify(&b, "b").unwrap();
/// assert_eq!(second.id, "ZP:0000002");
///
/// let again = store.identify(&a, "a").unwrap();
/// assert!(!again.is_new);
/// assert_eq!(again.id, first.id);
/// ```
#[derive(Debug)]
pub struct IdStore {
    records: HashMap<Fingerprint, IdRecord>,
    ids: HashMap<ZpId, Fingerprint>,
    obsolete: HashMap<ZpId, ObsoleteClass>,
    next_id: ZpId,
    lookups: usize,
}

impl Default for IdStore {
    fn default() -> Self {
        Self {
            records: HashMap::with_capacity(DEFAULT_NUM_RECORDS),
            ids: HashMap::with_capacity(DEFAULT_NUM_RECORDS),
            obsolete: HashMap::new(),
            next_id: ZpId::from(1u32),
            lookups: 0,
        }
    }
}

impl IdStore {
    /// Constructs an empty store. The first allocated ID is `ZP:0000001`
    pub fn new() -> Self {
        Self::default()
    }

    /// Constructs a store pre-seeded from a previously generated ontology file
    ///
    /// If `path` does not exist, an empty store is returned.
    ///
    /// # Errors
    ///
    /// See [`IdStore::preseed`], [`IdStore::reserve`] and [`owl::read_ontology_file`]
    pub fn from_previous<P: AsRef<Path>>(path: P) -> ZpResult<Self> {
        let path = path.as_ref();
        let mut store = Self::new();
        if !path.exists() {
            warn!(
                "Ignoring non-existent file \"{}\" for keeping the ids",
                path.display()
            );
            return Ok(store);
        }
        let document = owl::read_ontology_file(path)?;
        let classes = store.preseed(document.classes)?;
        let obsolete = store.reserve(document.obsolete)?;
        info!(
            "Keeping {} ids and {} obsolete ids from \"{}\", next id is {}",
            classes,
            obsolete,
            path.display(),
            store.next_id
        );
        Ok(store)
    }

    /// Adds the classes of a previous output to the store
    ///
    /// Every class keeps its published identifier. The next allocated
    /// identifier will be larger than all identifiers of the previous output,
    /// regardless of whether those classes are used again or not.
    ///
    /// If two identifiers have equivalent expressions, the smaller one is
    /// kept and the larger one becomes an [`ObsoleteClass`] replaced by it.
    /// Repeated definitions of an identifier with an equivalent expression
    /// are ignored.
    ///
    /// Returns the number of added records.
    ///
    /// # Errors
    ///
    /// [`ZpError::InvalidOntology`] if two different expressions claim the
    /// same identifier or an identifier is already present in the store
    pub fn preseed<I: IntoIterator<Item = OwlClass>>(&mut self, classes: I) -> ZpResult<usize> {
        let mut added = 0;
        for class in classes {
            let fingerprint = class.expression.fingerprint();
            if self.is_repeated_definition(class.id, &fingerprint)? {
                debug!("Ignoring repeated definition of {}", class.id);
                continue;
            }
            match self.records.entry(fingerprint) {
                Entry::Occupied(entry) => {
                    let kept = entry.get().id.min(class.id);
                    warn!(
                        "{} and {} are equivalent, using {}",
                        entry.get().id,
                        class.id,
                        kept
                    );
                    let obsolete = if class.id < entry.get().id {
                        let fingerprint = entry.key().clone();
                        let record = entry.into_mut();
                        let previous = ObsoleteClass {
                            id: record.id,
                            replaced_by: Some(class.id),
                            label: record.label.take(),
                        };
                        self.ids.remove(&record.id);
                        self.ids.insert(class.id, fingerprint);
                        record.id = class.id;
                        record.label = class.label;
                        for other in self.obsolete.values_mut() {
                            if other.replaced_by == Some(previous.id) {
                                other.replaced_by = Some(class.id);
                            }
                        }
                        previous
                    } else {
                        ObsoleteClass {
                            id: class.id,
                            replaced_by: Some(entry.get().id),
                            label: class.label,
                        }
                    };
                    self.obsolete.insert(obsolete.id, obsolete);
                }
                Entry::Vacant(entry) => {
                    self.ids.insert(class.id, entry.key().clone());
                    entry.insert(IdRecord {
                        id: class.id,
                        expression: class.expression,
                        label: class.label,
                        sequence: None,
                    });
                    added += 1;
                }
            }
            if class.id >= self.next_id {
                self.next_id = class.id.next()?;
            }
        }
        Ok(added)
    }

    /// Returns `true` if `id` is already known for an equivalent expression
    fn is_repeated_definition(&self, id: ZpId, fingerprint: &Fingerprint) -> ZpResult<bool> {
        let existing = match (self.ids.get(&id), self.obsolete.get(&id)) {
            (Some(existing), _) => existing,
            (None, Some(obsolete)) => match obsolete.replaced_by.and_then(|r| self.ids.get(&r)) {
                Some(existing) => existing,
                None => {
                    return Err(ZpError::InvalidOntology(format!(
                        "{id} is obsolete and defined"
                    )))
                }
            },
            (None, None) => return Ok(false),
        };
        if existing == fingerprint {
            Ok(true)
        } else {
            Err(ZpError::InvalidOntology(format!(
                "{id} is defined twice: {existing} and {fingerprint}"
            )))
        }
    }

    /// Reserves the identifiers of obsolete classes of a previous output
    ///
    /// Obsolete identifiers are never assigned again and are written back
    /// as deprecated classes. Returns the number of added identifiers.
    ///
    /// # Errors
    ///
    /// [`ZpError::InvalidOntology`] if an identifier is already used by a
    /// class of the store
    pub fn reserve<I: IntoIterator<Item = ObsoleteClass>>(&mut self, obsolete: I) -> ZpResult<usize> {
        let mut added = 0;
        for class in obsolete {
            if self.ids.contains_key(&class.id) {
                return Err(ZpError::InvalidOntology(format!(
                    "{} is obsolete and defined",
                    class.id
                )));
            }
            if class.id >= self.next_id {
                self.next_id = class.id.next()?;
            }
            if let Entry::Vacant(entry) = self.obsolete.entry(class.id) {
                entry.insert(class);
                added += 1;
            }
        }
        Ok(added)
    }

    /// Returns the identifier of `expression`, allocating a new one if needed
    ///
    /// `label` is stored with newly allocated identifiers. If the expression
    /// was already requested in this run with a different label, the stored
    /// label is kept and the conflict is reported in the result.
    ///
    /// # Errors
    ///
    /// [`ZpError::InvariantViolation`] if the identifier space is exhausted or
    /// the allocated identifier is already in use
    pub fn identify(&mut self, expression: &ClassExpression, label: &str) -> ZpResult<Identified> {
        let fingerprint = expression.fingerprint();
        let sequence = self.lookups;
        self.lookups += 1;

        if let Some(record) = self.records.get_mut(&fingerprint) {
            let mut label_conflict = false;
            match record.sequence {
                Some(_) => {
                    if record.label.as_deref() != Some(label) {
                        warn!(
                            "Label \"{}\" of {} differs from \"{}\"",
                            label,
                            record.id,
                            record.label.as_deref().unwrap_or_default()
                        );
                        label_conflict = true;
                    }
                }
                None => {
                    // pre-seeded record, first use in this run
                    record.sequence = Some(sequence);
                    record.label = Some(label.to_string());
                }
            }
            return Ok(Identified {
                id: record.id,
                is_new: false,
                label_conflict,
            });
        }

        let id = self.next_id;
        if let Some(other) = self.ids.get(&id) {
            return Err(ZpError::InvariantViolation(format!(
                "{id} is already assigned to {other}, cannot assign it to {fingerprint}"
            )));
        }
        if self.obsolete.contains_key(&id) {
            return Err(ZpError::InvariantViolation(format!(
                "{id} is obsolete, cannot assign it to {fingerprint}"
            )));
        }
        self.next_id = id.next()?;
        debug!("Assigning {} to {}", id, fingerprint);

        self.ids.insert(id, fingerprint.clone());
        self.records.insert(
            fingerprint,
            IdRecord {
                id,
                expression: expression.clone(),
                label: Some(label.to_string()),
                sequence: Some(sequence),
            },
        );
        Ok(Identified {
            id,
            is_new: true,
            label_conflict: false,
        })
    }

    /// Returns the identifier of `expression` without allocating one
    pub fn get(&self, expression: &ClassExpression) -> Option<ZpId> {
        self.records.get(&expression.fingerprint()).map(|r| r.id)
    }

    /// Returns the record of the identifier `id`
    pub fn record(&self, id: ZpId) -> Option<&IdRecord> {
        self.ids.get(&id).and_then(|fp| self.records.get(fp))
    }

    /// The identifier that will be allocated next
    pub fn next_id(&self) -> ZpId {
        self.next_id
    }

    /// The number of records in the store
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Returns `true` if the store does not contain any records
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// All records, ordered by their identifier
    pub fn records(&self) -> Vec<&IdRecord> {
        let mut records: Vec<&IdRecord> = self.records.values().collect();
        records.sort_unstable_by_key(|r| r.id);
        records
    }

    /// All obsolete classes, ordered by their identifier
    pub fn obsolete(&self) -> Vec<&ObsoleteClass> {
        let mut obsolete: Vec<&ObsoleteClass> = self.obsolete.values().collect();
        obsolete.sort_unstable_by_key(|o| o.id);
        obsolete
    }
}
