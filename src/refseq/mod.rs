//! Human gene coordinates derived from NCBI [RefSeq](https://www.ncbi.nlm.nih.gov/refseq/).
//!
//! Two NCBI [`Source`] files are combined into a single tab-separated table of
//! `ncbigene_id`, `name`, `chr`, `start`, and `stop`, restricted to human genes on
//! the primary GRCh38 assembly.

mod provenance;
#[cfg(test)]
pub(crate) mod tests;

#[doc(inline)]
pub use provenance::{Provenance, SourceFile};

use crate::{utils, Store};
use color_eyre::eyre::{eyre, Report, Result, WrapErr};
use log::{debug, info};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeSet, HashMap};
use std::fmt::{Debug, Display, Formatter};
use std::fs::File;
use std::io::Read;
use std::path::Path;
#[cfg(feature = "download")]
use std::path::PathBuf;
use strum::{EnumIter, EnumProperty, IntoEnumIterator};
use tabled::Table;

/// NCBI taxonomy identifier of *Homo sapiens*.
pub const HUMAN_TAX_ID: &str = "9606";
/// Assembly name of the rows kept from gene2refseq.
pub const PRIMARY_ASSEMBLY: &str = "Reference GRCh38.p13 Primary Assembly";
/// RefSeq status of rows that are dropped.
pub const SUPPRESSED: &str = "SUPPRESSED";
/// File name of the derived table inside the [`Store`].
pub const TABLE_NAME: &str = "refseq_human.tsv";
/// File name of the derived table's [`Provenance`] inside the [`Store`].
pub const PROVENANCE_NAME: &str = "refseq_human.json";
/// Column names of the derived table.
pub const HEADERS: [&str; 5] = ["ncbigene_id", "name", "chr", "start", "stop"];

// gene_info columns
const GENE_INFO_GENE_ID: usize = 1;
const GENE_INFO_CHROMOSOME: usize = 6;

// gene2refseq columns
const TAX_ID: usize = 0;
const GENE_ID: usize = 1;
const STATUS: usize = 2;
const START: usize = 9;
const STOP: usize = 10;
const ASSEMBLY: usize = 12;
const SYMBOL: usize = 15;

// ----------------------------------------------------------------------------
// Source
// ----------------------------------------------------------------------------

/// A remote NCBI file used to build the gene table.
#[derive(Clone, Copy, Debug, Deserialize, EnumIter, EnumProperty, PartialEq, Eq, Serialize)]
pub enum Source {
    /// Gene metadata for *Homo sapiens*, used for the chromosome of each gene.
    #[serde(rename = "gene_info")]
    #[strum(props(description = "Chromosome of each human gene"))]
    GeneInfo,
    /// Gene to RefSeq mapping for all organisms, used for gene coordinates.
    #[serde(rename = "gene2refseq")]
    #[strum(props(description = "Genomic coordinates of every RefSeq gene (~1GB)"))]
    Gene2RefSeq,
}

impl Display for Source {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        let name = match self {
            Source::GeneInfo => "gene_info",
            Source::Gene2RefSeq => "gene2refseq",
        };
        write!(f, "{name}")
    }
}

impl Source {
    /// Returns the download URL.
    pub fn url(&self) -> &'static str {
        match self {
            Source::GeneInfo => {
                "https://ftp.ncbi.nlm.nih.gov/refseq/H_sapiens/Homo_sapiens.gene_info.gz"
            }
            Source::Gene2RefSeq => "https://ftp.ncbi.nlm.nih.gov/gene/DATA/gene2refseq.gz",
        }
    }

    /// Returns the local file name inside the [`Store`].
    pub fn file_name(&self) -> Result<String, Report> {
        utils::url_file_name(self.url())
    }
}

// ----------------------------------------------------------------------------
// Row
// ----------------------------------------------------------------------------

/// One gene of the derived table.
///
/// Rows order by gene identifier first, so a [`BTreeSet`] of rows is both
/// deduplicated and sorted the way the table is written.
#[derive(Clone, Debug, Deserialize, Eq, Hash, Ord, PartialEq, PartialOrd, Serialize)]
pub struct Row {
    /// NCBI Gene identifier.
    pub ncbigene_id: u64,
    /// Gene symbol.
    pub name: String,
    /// Chromosome, empty if unknown.
    pub chr: String,
    /// Start coordinate on the chromosome.
    pub start: u64,
    /// Stop coordinate on the chromosome.
    pub stop: u64,
}

// ----------------------------------------------------------------------------
// Build Options
// ----------------------------------------------------------------------------

/// Options for [`ensure_human_refseq`].
#[derive(Clone, Debug, Deserialize, PartialEq, Eq, Serialize)]
pub struct BuildOptions {
    /// Rebuild the table even if it already exists.
    pub force_extract: bool,
    /// Download the sources even if they already exist.
    pub force_download: bool,
    /// Delete the large gene2refseq download after building.
    pub cleanup: bool,
}

impl Default for BuildOptions {
    fn default() -> Self {
        BuildOptions::new()
    }
}

impl BuildOptions {
    pub fn new() -> Self {
        BuildOptions { force_extract: false, force_download: false, cleanup: true }
    }
}

// ----------------------------------------------------------------------------
// Parsing
// ----------------------------------------------------------------------------

fn tsv_reader<R: Read>(reader: R) -> csv::Reader<R> {
    csv::ReaderBuilder::new()
        .delimiter(b'\t')
        .has_headers(true)
        .flexible(true)
        .quoting(false)
        .from_reader(reader)
}

fn field<'r>(record: &'r csv::StringRecord, i: usize) -> Result<&'r str, Report> {
    record.get(i).ok_or_else(|| {
        let line = record.position().map(|p| p.line()).unwrap_or_default();
        eyre!("Line {line} has {} columns, expected at least {}.", record.len(), i + 1)
    })
}

/// Returns a map of gene identifier to chromosome, read from an uncompressed gene_info table.
///
/// ## Examples
///
/// ```rust
/// use ideogen::refseq::chromosome_map;
///
/// let gene_info = "#tax_id\tGeneID\tSymbol\tLocusTag\tSynonyms\tdbXrefs\tchromosome\n\
///                  9606\t7157\tTP53\t-\t-\t-\t17\n";
/// let map = chromosome_map(gene_info.as_bytes())?;
/// assert_eq!(map["7157"], "17");
/// # Ok::<(), color_eyre::eyre::Report>(())
/// ```
pub fn chromosome_map<R: Read>(reader: R) -> Result<HashMap<String, String>, Report> {
    let mut map = HashMap::new();
    for record in tsv_reader(reader).records() {
        let record = record.wrap_err("Failed to parse gene_info record.")?;
        let gene_id = field(&record, GENE_INFO_GENE_ID)?;
        let chromosome = field(&record, GENE_INFO_CHROMOSOME)?;
        map.insert(gene_id.to_string(), chromosome.to_string());
    }
    debug!("Read chromosomes for {} genes.", map.len());
    Ok(map)
}

/// Returns the human primary-assembly rows of an uncompressed gene2refseq table.
///
/// Rows are kept when the taxonomy is [`HUMAN_TAX_ID`], the assembly is
/// [`PRIMARY_ASSEMBLY`], and the status is not [`SUPPRESSED`]. Rows without numeric
/// coordinates are skipped. The chromosome comes from `chromosomes`, or is empty.
pub fn filter_refseq<R: Read>(
    reader: R,
    chromosomes: &HashMap<String, String>,
) -> Result<BTreeSet<Row>, Report> {
    let mut rows = BTreeSet::new();
    let mut skipped = 0;

    for record in tsv_reader(reader).records() {
        let record = record.wrap_err("Failed to parse gene2refseq record.")?;

        // most rows belong to other organisms, check the taxonomy first
        if field(&record, TAX_ID)? != HUMAN_TAX_ID
            || field(&record, ASSEMBLY)? != PRIMARY_ASSEMBLY
            || field(&record, STATUS)? == SUPPRESSED
        {
            continue;
        }

        let gene_id = field(&record, GENE_ID)?;
        let (Ok(ncbigene_id), Ok(start), Ok(stop)) = (
            gene_id.parse::<u64>(),
            field(&record, START)?.parse::<u64>(),
            field(&record, STOP)?.parse::<u64>(),
        ) else {
            skipped += 1;
            continue;
        };

        rows.insert(Row {
            ncbigene_id,
            name: field(&record, SYMBOL)?.to_string(),
            chr: chromosomes.get(gene_id).cloned().unwrap_or_default(),
            start,
            stop,
        });
    }

    if skipped > 0 {
        debug!("Skipped {skipped} rows without numeric coordinates.");
    }
    Ok(rows)
}

/// Writes `rows` as a tab-separated table with [`HEADERS`].
pub fn write_table<'r, I, P>(rows: I, path: &P) -> Result<usize, Report>
where
    I: IntoIterator<Item = &'r Row>,
    P: AsRef<Path> + Debug + ?Sized,
{
    let path = path.as_ref();
    let partial = utils::partial_path(path);

    let mut writer = csv::WriterBuilder::new()
        .delimiter(b'\t')
        .has_headers(false)
        .from_path(&partial)
        .wrap_err_with(|| format!("Unable to create file: {partial:?}"))?;
    writer.write_record(HEADERS).wrap_err_with(|| format!("Unable to write headers: {partial:?}"))?;

    let mut count = 0;
    for row in rows {
        writer.serialize(row).wrap_err_with(|| format!("Unable to write row: {row:?}"))?;
        count += 1;
    }
    writer.flush().wrap_err_with(|| format!("Unable to write file: {partial:?}"))?;
    drop(writer);

    std::fs::rename(&partial, path)
        .wrap_err_with(|| format!("Unable to move {partial:?} to {path:?}"))?;
    Ok(count)
}

/// Builds the gene table at `output` from local gzip compressed sources.
///
/// Returns the number of rows written.
pub fn extract<P>(gene_info: &P, gene2refseq: &P, output: &P) -> Result<usize, Report>
where
    P: AsRef<Path> + Debug,
{
    info!("Reading chromosomes: {gene_info:?}");
    let chromosomes = chromosome_map(utils::open_gz(gene_info)?)?;

    info!("Processing RefSeq genes: {gene2refseq:?}");
    let file =
        File::open(gene2refseq).wrap_err_with(|| format!("Failed to open: {gene2refseq:?}"))?;

    #[cfg(feature = "download")]
    let (progress, file) = {
        let len = file.metadata().map(|m| m.len()).ok();
        let progress = utils::progress_bar(len, "Processing gene2refseq")?;
        (progress.clone(), progress.wrap_read(file))
    };

    let rows = filter_refseq(utils::gz_reader(file), &chromosomes)?;

    #[cfg(feature = "download")]
    progress.finish_and_clear();

    info!("Writing {} genes: {output:?}", rows.len());
    write_table(&rows, output)
}

/// Returns the path of the human gene table, downloading and building it if needed.
///
/// ## Examples
///
/// ```no_run
/// use ideogen::{refseq, Store};
/// # use tokio_test::{assert_ok, block_on};
///
/// let store = Store::new("test/refseq");
/// # assert_ok!(block_on(async {
/// let path = refseq::ensure_human_refseq(&store, &refseq::BuildOptions::default()).await?;
/// # Ok::<(), color_eyre::eyre::Report>(())
/// # }));
/// ```
#[cfg(feature = "download")]
pub async fn ensure_human_refseq(store: &Store, options: &BuildOptions) -> Result<PathBuf, Report> {
    let path = store.join(TABLE_NAME);
    if path.exists() && !options.force_extract {
        debug!("Using existing gene table: {path:?}");
        return Ok(path);
    }

    info!("Building gene table: {path:?}");
    store.create()?;

    let gene_info = store.ensure(Source::GeneInfo.url(), options.force_download).await?;
    let gene2refseq = store.ensure(Source::Gene2RefSeq.url(), options.force_download).await?;

    let rows = extract(&gene_info, &gene2refseq, &path)?;

    let sources = Source::iter()
        .map(|source| SourceFile::from_store(source, store))
        .collect::<Result<Vec<_>, Report>>()?;
    let provenance = Provenance::new(sources, rows);
    let provenance_path = store.join(PROVENANCE_NAME);
    info!("Writing provenance: {provenance_path:?}");
    provenance.write(&provenance_path)?;

    if options.cleanup {
        store.remove(&Source::Gene2RefSeq.file_name()?)?;
    }

    info!("Done.");
    Ok(path)
}

/// Returns a [`Table`] of the sources and derived files, and whether they exist locally.
pub fn sources(store: &Store) -> Result<Table, Report> {
    let mut builder = tabled::builder::Builder::default();
    builder.push_record(["Name", "Description", "URL", "Local Path", "Present"]);

    Source::iter().try_for_each(|source| {
        let file_name = source.file_name()?;
        builder.push_record([
            source.to_string(),
            source.get_str("description").unwrap_or_default().to_string(),
            source.url().to_string(),
            store.join(&file_name).display().to_string(),
            store.contains(&file_name).to_string(),
        ]);
        Ok::<(), Report>(())
    })?;

    builder.push_record([
        "table".to_string(),
        "Human genes on the primary assembly".to_string(),
        String::new(),
        store.join(TABLE_NAME).display().to_string(),
        store.contains(TABLE_NAME).to_string(),
    ]);

    Ok(builder.build())
}
