//! Parsing the ZFIN phenotype file and previously generated ontologies

use std::fs::File;
use std::io::{BufRead, BufReader, Read};
use std::path::Path;

use flate2::read::MultiGzDecoder;
use tracing::debug;

use crate::{ZpError, ZpResult};

/// Module to parse a previously generated ontology document
pub mod owl;
/// Module to parse decomposed phenotype - gene associations
pub mod zfin;

const GZIP_MAGIC: [u8; 2] = [0x1f, 0x8b];

/// Opens `path` for buffered reading
///
/// gzip compressed files are detected by their magic bytes and
/// decompressed on the fly, all other files are read as they are.
///
/// # Errors
///
/// [`ZpError::CannotOpenFile`] if the path is a directory or can't be opened
pub fn open_input<P: AsRef<Path>>(path: P) -> ZpResult<Box<dyn BufRead>> {
    let path = path.as_ref();
    let filename = path.display().to_string();
    if path.is_dir() {
        return Err(ZpError::CannotOpenFile(format!(
            "{filename} must point to a file and not a directory"
        )));
    }
    let file = File::open(path).map_err(|_| ZpError::CannotOpenFile(filename.clone()))?;
    let mut reader = BufReader::new(file);

    let is_gzip = reader.fill_buf()?.starts_with(&GZIP_MAGIC);
    if is_gzip {
        debug!("Reading gzip compressed {}", filename);
        Ok(Box::new(BufReader::new(MultiGzDecoder::new(reader))))
    } else {
        Ok(Box::new(reader))
    }
}

/// Reads the whole (possibly gzip compressed) file into a `String`
pub(crate) fn read_to_string<P: AsRef<Path>>(path: P) -> ZpResult<String> {
    let mut content = String::new();
    open_input(path)?.read_to_string(&mut content)?;
    Ok(content)
}
