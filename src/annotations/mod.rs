//! Gene [`Annotation`]s in the shape Ideogram.js expects.


#[cfg(feature = "download")]
use crate::{refseq, Store};
use color_eyre::eyre::{Report, Result, WrapErr};
use log::debug;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fmt::Debug;
use std::io::Read;
use std::path::Path;

/// A gene drawn on the ideogram.
///
/// ## Examples
///
/// ```rust
/// use ideogen::Annotation;
///
/// let annotation = Annotation {
///     ncbigene_id: "7157".to_string(),
///     name: "TP53".to_string(),
///     chr: "17".to_string(),
///     start: 7661778,
///     stop: 7687537,
/// };
/// assert_eq!(
///     serde_json::to_string(&annotation)?,
///     r#"{"ncbigene_id":"7157","name":"TP53","chr":"17","start":7661778,"stop":7687537}"#
/// );
/// # Ok::<(), color_eyre::eyre::Report>(())
/// ```
#[derive(Clone, Debug, Deserialize, Eq, Hash, PartialEq, Serialize)]
pub struct Annotation {
    /// NCBI Gene identifier.
    pub ncbigene_id: String,
    /// Gene symbol.
    pub name: String,
    /// Chromosome.
    pub chr: String,
    /// Start coordinate.
    pub start: u64,
    /// Stop coordinate.
    pub stop: u64,
}

/// Returns the rows of a gene table whose `name` is one of `gene_symbols`, in table order.
///
/// ## Examples
///
/// ```rust
/// use ideogen::annotations::read_annotations;
///
/// let table = "ncbigene_id\tname\tchr\tstart\tstop\n\
///              672\tBRCA1\t17\t43044294\t43125482\n\
///              7157\tTP53\t17\t7661778\t7687537\n";
/// let annotations = read_annotations(table.as_bytes(), ["TP53"])?;
/// assert_eq!(annotations.len(), 1);
/// assert_eq!(annotations[0].start, 7661778);
/// # Ok::<(), color_eyre::eyre::Report>(())
/// ```
pub fn read_annotations<R, I, S>(reader: R, gene_symbols: I) -> Result<Vec<Annotation>, Report>
where
    R: Read,
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let gene_symbols: HashSet<String> =
        gene_symbols.into_iter().map(|s| s.as_ref().to_string()).collect();

    let mut reader = csv::ReaderBuilder::new()
        .delimiter(b'\t')
        .has_headers(true)
        .quoting(false)
        .from_reader(reader);

    let mut annotations = Vec::new();
    for record in reader.deserialize() {
        let annotation: Annotation = record.wrap_err("Failed to parse gene table row.")?;
        if gene_symbols.contains(&annotation.name) {
            annotations.push(annotation);
        }
    }

    debug!("Found {} annotations for {} gene symbols.", annotations.len(), gene_symbols.len());
    Ok(annotations)
}

/// Returns the annotations of `gene_symbols` from the gene table at `path`.
pub fn read_annotations_path<P, I, S>(path: &P, gene_symbols: I) -> Result<Vec<Annotation>, Report>
where
    P: AsRef<Path> + Debug + ?Sized,
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let file = std::fs::File::open(path).wrap_err_with(|| format!("Failed to open: {path:?}"))?;
    read_annotations(std::io::BufReader::new(file), gene_symbols)
        .wrap_err_with(|| format!("Failed to read gene table: {path:?}"))
}

/// Returns the annotations of `gene_symbols`, building the gene table in `store` if needed.
#[cfg(feature = "download")]
pub async fn get_ideogram_annotations<I, S>(
    gene_symbols: I,
    store: &Store,
) -> Result<Vec<Annotation>, Report>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let path = refseq::ensure_human_refseq(store, &refseq::BuildOptions::default()).await?;
    read_annotations_path(&path, gene_symbols)
}
