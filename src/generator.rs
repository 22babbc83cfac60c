//! The single-pass pipeline that generates the ontology

use std::collections::HashMap;
use std::fmt::Display;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use tracing::{info, warn};

use crate::composer::{Composer, Composition, SkipReason};
use crate::entry::PhenotypeEntry;
use crate::parser::zfin::{ColumnLayout, EntryReader};
use crate::store::{IdStore, Identified};
use crate::term::ZpId;
use crate::vocabulary::Vocabulary;
use crate::writer::{AnnotationWriter, OntologyWriter, SourceInfoWriter};
use crate::{ZpError, ZpResult};

/// Settings of a single generator run
#[derive(Debug, Clone)]
pub struct GeneratorConfig {
    /// The ZFIN phenotype file, plain or gzip compressed
    pub input: PathBuf,
    /// Where the ontology is written to
    pub ontology_output: PathBuf,
    /// Where the annotation file is written to
    pub annotation_output: PathBuf,
    /// Re-use the identifiers of an existing ontology at `ontology_output`
    pub keep_ids: bool,
    /// Add the source information of each class as `rdfs:comment`
    pub add_source_information: bool,
    /// Also write the source information to this file
    pub source_information_output: Option<PathBuf>,
    /// Column layout of `input`
    pub layout: ColumnLayout,
    /// Relations and terms used for composition
    pub vocabulary: Vocabulary,
}

impl GeneratorConfig {
    /// Constructs a config with the ZFIN layout and the default vocabulary
    pub fn new<P: Into<PathBuf>>(input: P, ontology_output: P, annotation_output: P) -> Self {
        Self {
            input: input.into(),
            ontology_output: ontology_output.into(),
            annotation_output: annotation_output.into(),
            keep_ids: false,
            add_source_information: false,
            source_information_output: None,
            layout: ColumnLayout::zfin(),
            vocabulary: Vocabulary::default(),
        }
    }

    /// Returns `true` if source information is collected
    ///
    /// A source information output file implies the `rdfs:comment` annotations.
    pub fn source_information_enabled(&self) -> bool {
        self.add_source_information || self.source_information_output.is_some()
    }
}

/// Statistics of a generator run
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RunSummary {
    /// Number of non-empty input rows
    pub rows: usize,
    /// Rows that could not be parsed
    pub malformed: usize,
    /// Rows describing a normal phenotype
    pub normal: usize,
    /// Rows matching the anatomical system exclusion rule
    pub excluded: usize,
    /// Written annotation lines
    pub annotations: usize,
    /// Newly allocated identifiers
    pub new_ids: usize,
    /// Lookups that returned an existing identifier
    pub reused_ids: usize,
    /// Lookups whose label differed from the stored label
    pub label_conflicts: usize,
}

impl Display for RunSummary {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{} rows ({} malformed, {} normal, {} excluded), {} annotations, {} new ids, {} reused ids, {} label conflicts",
            self.rows,
            self.malformed,
            self.normal,
            self.excluded,
            self.annotations,
            self.new_ids,
            self.reused_ids,
            self.label_conflicts
        )
    }
}

#[cfg_attr(doc, aquamarine::aquamarine)]
/// Turns phenotype entries into classes and annotations
///
/// Entries are processed strictly one after the other:
///
/// ```mermaid
/// flowchart LR
///     R[EntryReader] -->|PhenotypeEntry| C[Composer]
///     C -->|ClassExpression + label| S[IdStore]
///     S -->|ZpId| A[AnnotationWriter]
///     S -->|records| O[OntologyWriter]
/// ```
///
/// Malformed rows are logged and skipped, all other errors abort the run.
///
/// # Examples
///
/// ```
/// use zpgen::parser::zfin::{ColumnLayout, EntryReader};
/// use zpgen::writer::AnnotationWriter;
/// use zpgen::{Composer, Generator, IdStore};
///
/// let mut cols = vec![""; 17];
/// cols[0] = "G1";
/// cols[6] = "ZFA:0000001";
/// cols[7] = "organ";
/// cols[10] = "PATO:0000052";
/// cols[11] = "shape";
/// cols[12] = "abnormal";
/// let input = cols.join("\t");
///
/// let entries = EntryReader::new(input.as_bytes(), ColumnLayout::zfin()).unwrap();
/// let mut annotations = AnnotationWriter::new(Vec::new());
///
/// let mut generator = Generator::new(Composer::default(), IdStore::new());
/// generator.process(entries, &mut annotations).unwrap();
///
/// let lines = String::from_utf8(annotations.finish().unwrap()).unwrap();
/// assert_eq!(lines, "G1\tZP:0000001\tabnormal(ly) shape organ\n");
/// ```
pub struct Generator {
    composer: Composer,
    store: IdStore,
    sources: HashMap<ZpId, String>,
    add_source_information: bool,
    summary: RunSummary,
}

impl Generator {
    /// Constructs a new `Generator`
    ///
    /// `store` is either empty or pre-seeded with a previous output.
    pub fn new(composer: Composer, store: IdStore) -> Self {
        Self {
            composer,
            store,
            sources: HashMap::new(),
            add_source_information: false,
            summary: RunSummary::default(),
        }
    }

    /// Collect the source information of each used class
    #[must_use]
    pub fn with_source_information(mut self, enabled: bool) -> Self {
        self.add_source_information = enabled;
        self
    }

    /// Processes all entries in order
    ///
    /// # Errors
    ///
    /// Any error except [`ZpError::InvalidRow`] aborts processing, see
    /// [`Generator::process_entry`]
    pub fn process<I, W>(&mut self, entries: I, annotations: &mut AnnotationWriter<W>) -> ZpResult<()>
    where
        I: IntoIterator<Item = ZpResult<PhenotypeEntry>>,
        W: Write,
    {
        for entry in entries {
            self.summary.rows += 1;
            match entry {
                Ok(entry) => {
                    self.process_entry(&entry, annotations)?;
                }
                Err(err) if err.is_row_scoped() => {
                    warn!("Skipping {}", err);
                    self.summary.malformed += 1;
                }
                Err(err) => return Err(err),
            }
        }
        Ok(())
    }

    /// Composes, identifies and annotates a single entry
    ///
    /// Returns `None` if the entry was skipped.
    ///
    /// # Errors
    ///
    /// - [`ZpError::InvalidEntry`] wrapping the [`ZpError::UnsupportedNamespace`]
    ///   or [`ZpError::InvalidTermId`] of the [`Composer`]
    /// - [`ZpError::InvariantViolation`] from the [`IdStore`]
    /// - [`ZpError::Io`] if the annotation cannot be written
    pub fn process_entry<W: Write>(
        &mut self,
        entry: &PhenotypeEntry,
        annotations: &mut AnnotationWriter<W>,
    ) -> ZpResult<Option<Identified>> {
        let composition = self
            .composer
            .compose(entry)
            .map_err(|err| ZpError::InvalidEntry {
                location: entry.location(),
                source: Box::new(err),
            })?;
        let composed = match composition {
            Composition::Composed(composed) => composed,
            Composition::Skipped(SkipReason::Normal) => {
                self.summary.normal += 1;
                return Ok(None);
            }
            Composition::Skipped(SkipReason::DegenerateAnatomicalSystem) => {
                self.summary.excluded += 1;
                return Ok(None);
            }
        };

        let identified = self.store.identify(&composed.expression, &composed.label)?;
        if identified.is_new {
            self.summary.new_ids += 1;
        } else {
            self.summary.reused_ids += 1;
        }
        if identified.label_conflict {
            self.summary.label_conflicts += 1;
        }
        if self.add_source_information {
            self.sources
                .entry(identified.id)
                .or_insert_with(|| entry.source_information());
        }

        annotations.write(entry.gene_id(), identified.id, &composed.label)?;
        self.summary.annotations += 1;
        Ok(Some(identified))
    }

    /// The identifier store
    pub fn store(&self) -> &IdStore {
        &self.store
    }

    /// Statistics of the entries processed so far
    pub fn summary(&self) -> RunSummary {
        self.summary
    }

    /// Source information of the used classes
    ///
    /// Empty unless enabled with [`Generator::with_source_information`]
    pub fn sources(&self) -> &HashMap<ZpId, String> {
        &self.sources
    }

    /// Writes all classes and obsolete classes of the store as an ontology document
    ///
    /// # Errors
    ///
    /// [`ZpError::Io`] if writing fails
    pub fn write_ontology<W: Write>(&self, out: W) -> ZpResult<W> {
        OntologyWriter::new(out).write(
            &self.store.records(),
            &self.store.obsolete(),
            &self.sources,
        )
    }

    /// Writes the source information of all used classes, ordered by identifier
    ///
    /// # Errors
    ///
    /// [`ZpError::Io`] if writing fails
    pub fn write_source_information<W: Write>(&self, out: W) -> ZpResult<W> {
        let mut ids: Vec<&ZpId> = self.sources.keys().collect();
        ids.sort_unstable();
        let mut writer = SourceInfoWriter::new(out);
        for id in ids {
            writer.write(*id, &self.sources[id])?;
        }
        writer.finish()
    }
}

fn create_file(path: &Path) -> ZpResult<BufWriter<File>> {
    File::create(path)
        .map(BufWriter::new)
        .map_err(|err| ZpError::CannotOpenFile(format!("{}: {err}", path.display())))
}

/// Runs the whole generation as configured
///
/// 1. Pre-seeds the identifier store from the existing ontology (`keep_ids`)
/// 2. Processes all entries of the input file and writes the annotation file
/// 3. Writes the ontology and, if requested, the source information file
///
/// # Errors
///
/// All errors are fatal for the run, see [`Generator::process`]
pub fn run(config: &GeneratorConfig) -> ZpResult<RunSummary> {
    let store = if config.keep_ids {
        IdStore::from_previous(&config.ontology_output)?
    } else {
        IdStore::new()
    };

    let entries = EntryReader::from_file(&config.input, config.layout)?;
    let mut annotations = AnnotationWriter::new(create_file(&config.annotation_output)?);

    let mut generator = Generator::new(Composer::new(config.vocabulary.clone()), store)
        .with_source_information(config.source_information_enabled());
    generator.process(entries, &mut annotations)?;
    annotations.finish()?;
    info!("Wrote \"{}\"", config.annotation_output.display());

    generator.write_ontology(create_file(&config.ontology_output)?)?;
    info!("Wrote \"{}\"", config.ontology_output.display());

    if let Some(path) = &config.source_information_output {
        generator.write_source_information(create_file(path)?)?;
        info!("Wrote \"{}\"", path.display());
    }

    let summary = generator.summary();
    info!("{}", summary);
    Ok(summary)
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::entry::{Entity, EntityTerm};

    fn entry(gene: &str, e1: (&str, &str), quality: (&str, &str), abnormal: bool) -> PhenotypeEntry {
        PhenotypeEntry::new(
            gene,
            Entity::from_columns(e1.0, e1.1, "", "").unwrap(),
            None,
            EntityTerm::new(quality.0, quality.1),
            abnormal,
        )
    }

    fn generator() -> Generator {
        Generator::new(Composer::default(), IdStore::new())
    }

    #[test]
    fn same_phenotype_of_two_genes() {
        let mut gen = generator();
        let mut annotations = AnnotationWriter::new(Vec::new());
        let entries = vec![
            Ok(entry("G1", ("ZFA:0000001", "organ"), ("PATO:0000052", "shape"), true)),
            Ok(entry("G2", ("ZFA:0000001", "organ"), ("PATO:0000052", "shape"), true)),
        ];
        gen.process(entries, &mut annotations).unwrap();

        let out = String::from_utf8(annotations.finish().unwrap()).unwrap();
        assert_eq!(
            out,
            "G1\tZP:0000001\tabnormal(ly) shape organ\nG2\tZP:0000001\tabnormal(ly) shape organ\n"
        );
        assert_eq!(gen.store().len(), 1);
        let summary = gen.summary();
        assert_eq!(summary.new_ids, 1);
        assert_eq!(summary.reused_ids, 1);
        assert_eq!(summary.annotations, 2);
    }

    #[test]
    fn skipped_entries_are_not_annotated() {
        let mut gen = generator();
        let mut annotations = AnnotationWriter::new(Vec::new());
        let entries = vec![
            Ok(entry("G1", ("ZFA:0000001", "organ"), ("PATO:0000052", "shape"), false)),
            Ok(entry("G2", ("ZFA:0001439", "anatomical system"), ("PATO:0000001", "quality"), true)),
            Err(ZpError::InvalidRow {
                line: 3,
                reason: "broken".to_string(),
            }),
            Ok(entry("G4", ("ZFA:0000001", "organ"), ("PATO:0000052", "shape"), true)),
        ];
        gen.process(entries, &mut annotations).unwrap();

        assert_eq!(annotations.lines(), 1);
        let summary = gen.summary();
        assert_eq!(summary.rows, 4);
        assert_eq!(summary.normal, 1);
        assert_eq!(summary.excluded, 1);
        assert_eq!(summary.malformed, 1);
        assert_eq!(summary.annotations, 1);
    }

    #[test]
    fn unsupported_namespace_aborts() {
        let mut gen = generator();
        let mut annotations = AnnotationWriter::new(Vec::new());
        let entries = vec![
            Ok(entry("G1", ("UBERON:0000001", "organ"), ("PATO:0000052", "shape"), true)),
            Ok(entry("G2", ("ZFA:0000001", "organ"), ("PATO:0000052", "shape"), true)),
        ];
        let err = gen.process(entries, &mut annotations).unwrap_err();
        assert_eq!(
            err.to_string(),
            "gene G1: unsupported ontology prefix for entity term \"UBERON:0000001\""
        );
        let ZpError::InvalidEntry { source, .. } = err else {
            panic!("composition errors name the entry");
        };
        assert!(matches!(*source, ZpError::UnsupportedNamespace { slot: "entity", .. }));
        assert_eq!(annotations.lines(), 0);
    }

    #[test]
    fn io_errors_abort() {
        let mut gen = generator();
        let mut annotations = AnnotationWriter::new(Vec::new());
        let entries = vec![Err(ZpError::Io(std::io::Error::new(
            std::io::ErrorKind::Other,
            "boom",
        )))];
        assert!(gen.process(entries, &mut annotations).is_err());
    }

    #[test]
    fn label_conflicts_are_counted() {
        let mut gen = generator();
        let mut annotations = AnnotationWriter::new(Vec::new());
        let entries = vec![
            Ok(entry("G1", ("ZFA:0000001", "organ"), ("PATO:0000052", "shape"), true)),
            Ok(entry("G2", ("ZFA:0000001", "Organ"), ("PATO:0000052", "shape"), true)),
        ];
        gen.process(entries, &mut annotations).unwrap();
        assert_eq!(gen.summary().label_conflicts, 1);

        let record = gen.store().record(ZpId::from(1u32)).unwrap();
        assert_eq!(record.label(), Some("abnormal(ly) shape organ"));

        // the annotation file uses the label of each entry
        let out = String::from_utf8(annotations.finish().unwrap()).unwrap();
        assert!(out.ends_with("G2\tZP:0000001\tabnormal(ly) shape Organ\n"));
    }

    #[test]
    fn source_information_of_used_classes() {
        let mut gen = generator().with_source_information(true);
        let mut annotations = AnnotationWriter::new(Vec::new());
        let entries = vec![
            Ok(entry("G1", ("ZFA:0000002", "eye"), ("PATO:0000052", "shape"), true)),
            Ok(entry("G2", ("ZFA:0000001", "organ"), ("PATO:0000052", "shape"), true)),
            Ok(entry("G3", ("ZFA:0000002", "eye"), ("PATO:0000052", "shape"), true)),
        ];
        gen.process(entries, &mut annotations).unwrap();
        assert_eq!(gen.sources().len(), 2);

        let out = String::from_utf8(gen.write_source_information(Vec::new()).unwrap()).unwrap();
        assert_eq!(
            out,
            "ZP:0000001\tZFA:0000002\t\tPATO:0000052\t\t\nZP:0000002\tZFA:0000001\t\tPATO:0000052\t\t\n"
        );
    }

    #[test]
    fn source_information_disabled() {
        let mut gen = generator();
        let mut annotations = AnnotationWriter::new(Vec::new());
        gen.process(
            vec![Ok(entry("G1", ("ZFA:0000002", "eye"), ("PATO:0000052", "shape"), true))],
            &mut annotations,
        )
        .unwrap();
        assert!(gen.sources().is_empty());
    }

    #[test]
    fn config_defaults() {
        let mut config = GeneratorConfig::new("in.txt", "zp.owl", "zp.annot");
        assert!(!config.keep_ids);
        assert!(!config.source_information_enabled());
        config.source_information_output = Some(PathBuf::from("zp.src"));
        assert!(config.source_information_enabled());
    }
}
