//! A record of how the gene table was built, written next to it for reproducibility.

use crate::refseq::Source;
use crate::Store;
use chrono::{DateTime, Utc};
use color_eyre::eyre::{Report, Result, WrapErr};
use serde::{Deserialize, Serialize};
use std::fmt::Debug;
use std::path::{Path, PathBuf};

/// A source file that the gene table was built from.
#[derive(Clone, Debug, Deserialize, PartialEq, Serialize)]
pub struct SourceFile {
    /// Which [`Source`] this is.
    pub source: Source,
    /// Download URL.
    pub url: String,
    /// Local path at build time.
    pub local_path: PathBuf,
    /// Modification time of the local file, which is when it was downloaded.
    pub date_downloaded: Option<DateTime<Utc>>,
}

impl SourceFile {
    /// Describes `source` as currently present in `store`.
    pub fn from_store(source: Source, store: &Store) -> Result<Self, Report> {
        let local_path = store.join(&source.file_name()?);
        let date_downloaded = std::fs::metadata(&local_path)
            .and_then(|metadata| metadata.modified())
            .ok()
            .map(DateTime::<Utc>::from);

        Ok(SourceFile { source, url: source.url().to_string(), local_path, date_downloaded })
    }
}

/// Provenance of a built gene table.
#[derive(Clone, Debug, Deserialize, PartialEq, Serialize)]
pub struct Provenance {
    /// Name and version of the program that built the table (ex. "ideogen 0.1.0").
    pub version: String,
    /// When the table was built.
    pub date_built: DateTime<Utc>,
    /// Files the table was built from.
    pub sources: Vec<SourceFile>,
    /// Number of genes in the table.
    pub rows: usize,
}

impl Provenance {
    /// Returns the [`Provenance`] of a table built now.
    pub fn new(sources: Vec<SourceFile>, rows: usize) -> Self {
        Provenance {
            version: format!("{} {}", env!("CARGO_PKG_NAME"), env!("CARGO_PKG_VERSION")),
            date_built: Utc::now(),
            sources,
            rows,
        }
    }

    /// Read provenance from JSON file.
    pub fn read<P>(path: &P) -> Result<Provenance, Report>
    where
        P: AsRef<Path> + Debug + ?Sized,
    {
        let provenance = std::fs::read_to_string(path)
            .wrap_err_with(|| format!("Failed to read file: {path:?}."))?;
        let provenance = serde_json::from_str(&provenance)
            .wrap_err_with(|| format!("Failed to parse file: {path:?}"))?;
        Ok(provenance)
    }

    /// Write provenance to JSON file.
    pub fn write<P>(&self, path: &P) -> Result<(), Report>
    where
        P: AsRef<Path> + Debug + ?Sized,
    {
        let output = serde_json::to_string_pretty(self)
            .wrap_err_with(|| format!("Failed to parse: {self:?}"))?;
        crate::utils::write_atomic(&path.as_ref(), format!("{output}\n").as_bytes())
            .wrap_err_with(|| format!("Failed to write file: {path:?}"))?;
        Ok(())
    }
}
