//! Parser for the ZFIN `phenotype.txt` file
//!
//! The file is tab separated and has no header. The relevant columns
//! (0-based) are:
//!
//! | Column | Content |
//! | --- | --- |
//! | 0 | ZFIN gene ID |
//! | 6, 7 | Entity 1 superterm ID and name |
//! | 8, 9 | Entity 1 subterm ID and name |
//! | 10, 11 | Quality (PATO) ID and name |
//! | 12 | Tag: `abnormal` or `normal` |
//! | 13, 14 | Entity 2 superterm ID and name |
//! | 15, 16 | Entity 2 subterm ID and name |
//!
//! ```text
//! ZDB-GENE-040426-1716  393723  6223  rps19  ...  ZFA:0000108  fin  ...  PATO:0000462  absent  abnormal  ...
//! ```

use std::io::BufRead;
use std::path::Path;

use tracing::trace;

use crate::entry::{Entity, EntityTerm, PhenotypeEntry};
use crate::parser::open_input;
use crate::{ZpError, ZpResult};

/// Column positions of the four fields of an [`Entity`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EntityColumns {
    /// Column of the superterm ID
    pub superterm_id: usize,
    /// Column of the superterm name
    pub superterm_name: usize,
    /// Column of the subterm ID
    pub subterm_id: usize,
    /// Column of the subterm name
    pub subterm_name: usize,
}

impl EntityColumns {
    fn indices(&self) -> [usize; 4] {
        [
            self.superterm_id,
            self.superterm_name,
            self.subterm_id,
            self.subterm_name,
        ]
    }

    fn entity(&self, cols: &[&str]) -> Option<Entity> {
        Entity::from_columns(
            cols[self.superterm_id],
            cols[self.superterm_name],
            cols[self.subterm_id],
            cols[self.subterm_name],
        )
    }
}

/// Column layout of the input file
///
/// Use [`ColumnLayout::zfin`] (also the `Default`) for the layout of
/// the ZFIN `phenotype.txt` file. Custom layouts must be checked with
/// [`ColumnLayout::validate`] before use, which [`EntryReader::new`] does.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ColumnLayout {
    /// Column of the gene ID
    pub gene_id: usize,
    /// Columns of entity 1
    pub entity1: EntityColumns,
    /// Columns of entity 2
    pub entity2: EntityColumns,
    /// Column of the quality ID
    pub quality_id: usize,
    /// Column of the quality name
    pub quality_name: usize,
    /// Column of the `abnormal` / `normal` tag
    pub tag: usize,
}

impl ColumnLayout {
    /// The layout of the ZFIN `phenotype.txt` file
    pub fn zfin() -> Self {
        Self {
            gene_id: 0,
            entity1: EntityColumns {
                superterm_id: 6,
                superterm_name: 7,
                subterm_id: 8,
                subterm_name: 9,
            },
            entity2: EntityColumns {
                superterm_id: 13,
                superterm_name: 14,
                subterm_id: 15,
                subterm_name: 16,
            },
            quality_id: 10,
            quality_name: 11,
            tag: 12,
        }
    }

    fn indices(&self) -> Vec<usize> {
        let mut indices = vec![self.gene_id, self.quality_id, self.quality_name, self.tag];
        indices.extend(self.entity1.indices());
        indices.extend(self.entity2.indices());
        indices
    }

    /// Checks that no column is used for two different fields
    ///
    /// # Errors
    ///
    /// [`ZpError::InvalidConfig`] if a column index is used more than once
    pub fn validate(&self) -> ZpResult<()> {
        let mut indices = self.indices();
        indices.sort_unstable();
        if let Some(pair) = indices.windows(2).find(|pair| pair[0] == pair[1]) {
            return Err(ZpError::InvalidConfig(format!(
                "column {} is used for more than one field",
                pair[0]
            )));
        }
        Ok(())
    }

    /// The minimum number of columns a row must have
    pub fn min_columns(&self) -> usize {
        self.indices().into_iter().max().unwrap_or_default() + 1
    }

    /// Parses a single row into a [`PhenotypeEntry`]
    ///
    /// `line_number` is only used for error reporting.
    ///
    /// # Errors
    ///
    /// [`ZpError::InvalidRow`] if the row has too few columns, or the gene,
    /// entity 1 superterm or quality is missing
    pub fn parse_line(&self, line: &str, line_number: usize) -> ZpResult<PhenotypeEntry> {
        let invalid = |reason: String| ZpError::InvalidRow {
            line: line_number,
            reason,
        };

        let cols: Vec<&str> = line.split('\t').collect();
        if cols.len() < self.min_columns() {
            return Err(invalid(format!(
                "expected at least {} columns, found {}",
                self.min_columns(),
                cols.len()
            )));
        }

        let gene_id = cols[self.gene_id].trim();
        if gene_id.is_empty() {
            return Err(invalid("gene ID is missing".to_string()));
        }

        let Some(entity1) = self.entity1.entity(&cols) else {
            return Err(invalid("entity 1 superterm is missing".to_string()));
        };

        let quality_id = cols[self.quality_id].trim();
        if quality_id.is_empty() {
            return Err(invalid("quality is missing".to_string()));
        }

        Ok(PhenotypeEntry::new(
            gene_id,
            entity1,
            self.entity2.entity(&cols),
            EntityTerm::new(quality_id, cols[self.quality_name]),
            cols[self.tag].trim().eq_ignore_ascii_case("abnormal"),
        )
        .with_line_number(line_number))
    }
}

impl Default for ColumnLayout {
    fn default() -> Self {
        Self::zfin()
    }
}

/// Lazy, forward-only iterator of [`PhenotypeEntry`]s
///
/// Each call to `next` reads one row. Malformed rows are returned as
/// [`ZpError::InvalidRow`] and do not stop the iteration. Read errors
/// are returned as [`ZpError::Io`]. Empty rows and rows starting with `#`
/// are skipped.
pub struct EntryReader<R> {
    reader: R,
    layout: ColumnLayout,
    line_number: usize,
    buf: String,
}

impl<R: BufRead> EntryReader<R> {
    /// Constructs a new `EntryReader`
    ///
    /// # Errors
    ///
    /// [`ZpError::InvalidConfig`] if `layout` is invalid
    pub fn new(reader: R, layout: ColumnLayout) -> ZpResult<Self> {
        layout.validate()?;
        Ok(Self {
            reader,
            layout,
            line_number: 0,
            buf: String::with_capacity(256),
        })
    }

    /// The number of lines read so far
    pub fn line_number(&self) -> usize {
        self.line_number
    }
}

impl EntryReader<Box<dyn BufRead>> {
    /// Opens a (possibly gzip compressed) ZFIN file
    ///
    /// # Errors
    ///
    /// - [`ZpError::CannotOpenFile`] if the file cannot be opened
    /// - [`ZpError::InvalidConfig`] if `layout` is invalid
    pub fn from_file<P: AsRef<Path>>(path: P, layout: ColumnLayout) -> ZpResult<Self> {
        Self::new(open_input(path)?, layout)
    }
}

impl<R: BufRead> Iterator for EntryReader<R> {
    type Item = ZpResult<PhenotypeEntry>;
    fn next(&mut self) -> Option<Self::Item> {
        loop {
            self.buf.clear();
            match self.reader.read_line(&mut self.buf) {
                Ok(0) => return None,
                Ok(_) => {
                    self.line_number += 1;
                    let line = self.buf.trim_end_matches(['\n', '\r']);
                    if line.trim().is_empty() || line.starts_with('#') {
                        trace!("Ignoring line {}", self.line_number);
                        continue;
                    }
                    return Some(self.layout.parse_line(line, self.line_number));
                }
                Err(err) => return Some(Err(ZpError::Io(err))),
            }
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;

    fn row(fields: &[(usize, &str)]) -> String {
        let mut cols = vec![""; 17];
        for (idx, value) in fields {
            cols[*idx] = value;
        }
        cols.join("\t")
    }

    fn fin_row() -> String {
        row(&[
            (0, "ZDB-GENE-040426-1716"),
            (1, "393723"),
            (3, "rps19"),
            (6, "ZFA:0000108"),
            (7, "fin"),
            (10, "PATO:0000462"),
            (11, "absent"),
            (12, "abnormal"),
        ])
    }

    #[test]
    fn zfin_layout_is_valid() {
        assert!(ColumnLayout::zfin().validate().is_ok());
        assert_eq!(ColumnLayout::zfin().min_columns(), 17);
    }

    #[test]
    fn duplicate_columns() {
        let mut layout = ColumnLayout::zfin();
        layout.quality_name = 7;
        assert!(matches!(layout.validate(), Err(ZpError::InvalidConfig(_))));
        assert!(EntryReader::new("".as_bytes(), layout).is_err());
    }

    #[test]
    fn parse_single_entity() {
        let entry = ColumnLayout::zfin().parse_line(&fin_row(), 3).unwrap();
        assert_eq!(entry.line_number(), Some(3));
        assert_eq!(entry.gene_id(), "ZDB-GENE-040426-1716");
        assert_eq!(entry.entity1().superterm().id, "ZFA:0000108");
        assert_eq!(entry.entity1().superterm().name, "fin");
        assert!(entry.entity1().subterm().is_none());
        assert!(entry.entity2().is_none());
        assert_eq!(entry.quality().id, "PATO:0000462");
        assert_eq!(entry.quality().name, "absent");
        assert!(entry.is_abnormal());
    }

    #[test]
    fn parse_two_entities() {
        let line = row(&[
            (0, "G1"),
            (6, "ZFA:0000076"),
            (7, "swim bladder"),
            (8, "ZFA:0001486"),
            (9, "epithelium"),
            (10, "PATO:0000628"),
            (11, "position"),
            (12, "Abnormal"),
            (13, "ZFA:0000107"),
            (14, "eye"),
            (15, "BSPO:0000084"),
            (16, "ventral region"),
        ]);
        let entry = ColumnLayout::zfin().parse_line(&line, 1).unwrap();
        assert_eq!(entry.entity1().subterm().unwrap().name, "epithelium");
        let entity2 = entry.entity2().unwrap();
        assert_eq!(entity2.superterm().id, "ZFA:0000107");
        assert_eq!(entity2.subterm().unwrap().id, "BSPO:0000084");
        assert!(entry.is_abnormal());
    }

    #[test]
    fn parse_normal_tag() {
        let line = fin_row().replace("abnormal", "normal");
        assert!(!ColumnLayout::zfin().parse_line(&line, 1).unwrap().is_abnormal());
    }

    #[test]
    fn too_few_columns() {
        let line = "G1\tfoo\tbar";
        let err = ColumnLayout::zfin().parse_line(line, 4).unwrap_err();
        assert!(err.is_row_scoped());
        assert!(matches!(err, ZpError::InvalidRow { line: 4, .. }));
    }

    #[test]
    fn missing_entity1() {
        let line = row(&[(0, "G1"), (10, "PATO:0000462"), (12, "abnormal")]);
        assert!(ColumnLayout::zfin().parse_line(&line, 1).is_err());
    }

    #[test]
    fn missing_gene() {
        let line = fin_row().replacen("ZDB-GENE-040426-1716", "", 1);
        assert!(ColumnLayout::zfin().parse_line(&line, 1).is_err());
    }

    #[test]
    fn missing_quality() {
        let line = fin_row().replacen("PATO:0000462", "", 1);
        assert!(ColumnLayout::zfin().parse_line(&line, 1).is_err());
    }

    #[test]
    fn reader_continues_after_malformed_rows() {
        let input = format!("{}\nbroken row\n\n{}\r\n", fin_row(), fin_row().replace("G", "X"));
        let mut reader = EntryReader::new(input.as_bytes(), ColumnLayout::zfin()).unwrap();

        assert!(reader.next().unwrap().is_ok());
        let err = reader.next().unwrap().unwrap_err();
        assert!(matches!(err, ZpError::InvalidRow { line: 2, .. }));
        let last = reader.next().unwrap().unwrap();
        assert_eq!(last.gene_id(), "ZDB-XENE-040426-1716");
        assert_eq!(last.quality().name, "absent");
        assert!(reader.next().is_none());
        assert_eq!(reader.line_number(), 4);
    }

    #[test]
    fn reader_from_fixture() {
        let reader = EntryReader::from_file("tests/phenotype_small.txt", ColumnLayout::zfin()).unwrap();
        let entries: Vec<ZpResult<PhenotypeEntry>> = reader.collect();
        assert_eq!(entries.len(), 8);
        assert_eq!(entries.iter().filter(|e| e.is_err()).count(), 1);
    }
}
