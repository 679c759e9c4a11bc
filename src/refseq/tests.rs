use crate::refseq::{
    chromosome_map, extract, filter_refseq, sources, write_table, Provenance, Row, Source,
    SourceFile, HEADERS, PRIMARY_ASSEMBLY,
};
#[cfg(feature = "download")]
use crate::refseq::{ensure_human_refseq, BuildOptions, PROVENANCE_NAME, TABLE_NAME};
use crate::Store;
use color_eyre::eyre::{Report, Result};
use flate2::{write::GzEncoder, Compression};
use std::collections::HashMap;
use std::io::Write;
use std::path::Path;

const GENE_INFO: &str = "\
#tax_id\tGeneID\tSymbol\tLocusTag\tSynonyms\tdbXrefs\tchromosome
9606\t672\tBRCA1\t-\t-\t-\t17
9606\t7157\tTP53\t-\t-\t-\t17
9606\t1956\tEGFR\t-\t-\t-\t7
";

/// Returns a gene2refseq row with the columns the filter reads.
fn refseq_row(tax_id: &str, gene_id: &str, status: &str, start: &str, stop: &str, assembly: &str, symbol: &str) -> String {
    let mut columns = vec!["-"; 16];
    columns[0] = tax_id;
    columns[1] = gene_id;
    columns[2] = status;
    columns[9] = start;
    columns[10] = stop;
    columns[12] = assembly;
    columns[15] = symbol;
    columns.join("\t")
}

fn gene2refseq() -> String {
    let other = "Reference GRCh38.p14 Alternate Assembly";
    let rows = [
        refseq_row("9606", "7157", "REVIEWED", "7661778", "7687537", PRIMARY_ASSEMBLY, "TP53"),
        // duplicated transcript of the same gene
        refseq_row("9606", "7157", "REVIEWED", "7661778", "7687537", PRIMARY_ASSEMBLY, "TP53"),
        refseq_row("9606", "672", "REVIEWED", "43044294", "43125482", PRIMARY_ASSEMBLY, "BRCA1"),
        refseq_row("9606", "1956", "SUPPRESSED", "55019016", "55211627", PRIMARY_ASSEMBLY, "EGFR"),
        refseq_row("9606", "1956", "VALIDATED", "55019016", "55211627", other, "EGFR"),
        refseq_row("10090", "22059", "REVIEWED", "69580359", "69591873", PRIMARY_ASSEMBLY, "Trp53"),
        refseq_row("9606", "100", "MODEL", "-", "-", PRIMARY_ASSEMBLY, "ADA"),
        refseq_row("9606", "999999", "PROVISIONAL", "10", "20", PRIMARY_ASSEMBLY, "NOVEL"),
    ];
    let header = "#tax_id\tGeneID\tstatus\tRNA\tRNA_gi\tprotein\tprotein_gi\tgenomic\tgenomic_gi\tstart\tend\torientation\tassembly\tpeptide\tpeptide_gi\tSymbol";
    format!("{header}\n{}\n", rows.join("\n"))
}

fn write_gz(path: &Path, contents: &str) -> Result<(), Report> {
    let mut encoder = GzEncoder::new(Vec::new(), Compression::fast());
    encoder.write_all(contents.as_bytes())?;
    std::fs::write(path, encoder.finish()?)?;
    Ok(())
}

/// Writes both NCBI sources into `store`, so that building the table needs no network.
#[cfg(feature = "download")]
pub(crate) fn seed_store(store: &Store) -> Result<(), Report> {
    store.create()?;
    write_gz(&store.join(&Source::GeneInfo.file_name()?), GENE_INFO)?;
    write_gz(&store.join(&Source::Gene2RefSeq.file_name()?), &gene2refseq())?;
    Ok(())
}

fn expected_rows() -> Vec<Row> {
    vec![
        Row { ncbigene_id: 672, name: "BRCA1".into(), chr: "17".into(), start: 43044294, stop: 43125482 },
        Row { ncbigene_id: 7157, name: "TP53".into(), chr: "17".into(), start: 7661778, stop: 7687537 },
        Row { ncbigene_id: 999999, name: "NOVEL".into(), chr: "".into(), start: 10, stop: 20 },
    ]
}

#[test]
fn source_urls() -> Result<(), Report> {
    assert_eq!(Source::GeneInfo.file_name()?, "Homo_sapiens.gene_info.gz");
    assert_eq!(Source::Gene2RefSeq.file_name()?, "gene2refseq.gz");
    assert!(Source::Gene2RefSeq.url().starts_with("https://"));
    assert_eq!(Source::Gene2RefSeq.to_string(), "gene2refseq");
    Ok(())
}

#[test]
fn chromosomes() -> Result<(), Report> {
    let map = chromosome_map(GENE_INFO.as_bytes())?;
    let expected: HashMap<String, String> = [("672", "17"), ("7157", "17"), ("1956", "7")]
        .into_iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect();
    assert_eq!(map, expected);
    Ok(())
}

#[test]
fn chromosomes_short_row() {
    let gene_info = "#tax_id\tGeneID\tSymbol\n9606\t672\tBRCA1\n";
    assert!(chromosome_map(gene_info.as_bytes()).is_err());
}

#[test]
fn filter_human_primary() -> Result<(), Report> {
    let map = chromosome_map(GENE_INFO.as_bytes())?;
    let rows = filter_refseq(gene2refseq().as_bytes(), &map)?;
    assert_eq!(rows.into_iter().collect::<Vec<_>>(), expected_rows());
    Ok(())
}

#[test]
fn write_and_read_table() -> Result<(), Report> {
    let dir = tempfile::tempdir()?;
    let path = dir.path().join("refseq_human.tsv");

    let count = write_table(&expected_rows(), &path)?;
    assert_eq!(count, 3);

    let contents = std::fs::read_to_string(&path)?;
    let expected = format!(
        "{}\n672\tBRCA1\t17\t43044294\t43125482\n7157\tTP53\t17\t7661778\t7687537\n999999\tNOVEL\t\t10\t20\n",
        HEADERS.join("\t")
    );
    assert_eq!(contents, expected);
    Ok(())
}

#[test]
fn extract_from_gz() -> Result<(), Report> {
    let dir = tempfile::tempdir()?;
    let gene_info = dir.path().join("Homo_sapiens.gene_info.gz");
    let refseq = dir.path().join("gene2refseq.gz");
    let output = dir.path().join("refseq_human.tsv");
    write_gz(&gene_info, GENE_INFO)?;
    write_gz(&refseq, &gene2refseq())?;

    let count = extract(&gene_info, &refseq, &output)?;
    assert_eq!(count, 3);
    assert!(std::fs::read_to_string(&output)?.starts_with("ncbigene_id\tname\tchr\tstart\tstop\n672\t"));
    Ok(())
}

#[test]
fn provenance_round_trip() -> Result<(), Report> {
    let dir = tempfile::tempdir()?;
    let store = Store::new(dir.path());
    write_gz(&store.join("Homo_sapiens.gene_info.gz"), GENE_INFO)?;

    let sources = vec![
        SourceFile::from_store(Source::GeneInfo, &store)?,
        SourceFile::from_store(Source::Gene2RefSeq, &store)?,
    ];
    assert!(sources[0].date_downloaded.is_some());
    assert!(sources[1].date_downloaded.is_none());

    let provenance = Provenance::new(sources, 3);
    assert!(provenance.version.starts_with("ideogen "));

    let path = store.join("refseq_human.json");
    provenance.write(&path)?;
    assert_eq!(Provenance::read(&path)?, provenance);
    Ok(())
}

#[test]
fn sources_table() -> Result<(), Report> {
    let dir = tempfile::tempdir()?;
    let store = Store::new(dir.path());
    write_gz(&store.join("Homo_sapiens.gene_info.gz"), GENE_INFO)?;

    let table = sources(&store)?.to_string();
    assert!(table.contains("gene_info"));
    assert!(table.contains("gene2refseq"));
    assert!(table.contains("true"));
    assert!(table.contains("false"));
    Ok(())
}

#[cfg(feature = "download")]
#[tokio::test]
async fn ensure_builds_from_cached_sources() -> Result<(), Report> {
    let dir = tempfile::tempdir()?;
    let store = Store::new(dir.path());
    seed_store(&store)?;

    let path = ensure_human_refseq(&store, &BuildOptions::default()).await?;
    assert_eq!(path, store.join(TABLE_NAME));
    assert!(std::fs::read_to_string(&path)?.contains("7157\tTP53\t17\t7661778\t7687537"));

    // cleanup removes gene2refseq only
    assert!(!store.contains(&Source::Gene2RefSeq.file_name()?));
    assert!(store.contains(&Source::GeneInfo.file_name()?));

    let provenance = Provenance::read(&store.join(PROVENANCE_NAME))?;
    assert_eq!(provenance.rows, 3);
    assert_eq!(provenance.sources.len(), 2);
    assert_eq!(provenance.sources[1].url, Source::Gene2RefSeq.url());
    Ok(())
}

#[cfg(feature = "download")]
#[tokio::test]
async fn ensure_keeps_source() -> Result<(), Report> {
    let dir = tempfile::tempdir()?;
    let store = Store::new(dir.path());
    seed_store(&store)?;

    let options = BuildOptions { cleanup: false, ..Default::default() };
    ensure_human_refseq(&store, &options).await?;
    assert!(store.contains(&Source::Gene2RefSeq.file_name()?));
    assert!(store.contains(TABLE_NAME));
    Ok(())
}

#[cfg(feature = "download")]
#[tokio::test]
async fn ensure_uses_existing_table() -> Result<(), Report> {
    let dir = tempfile::tempdir()?;
    let store = Store::new(dir.path());
    seed_store(&store)?;

    let path = ensure_human_refseq(&store, &BuildOptions::default()).await?;
    let custom = format!("{}\n1\tCUSTOM\t1\t1\t2\n", HEADERS.join("\t"));
    std::fs::write(&path, &custom)?;

    // the table exists, so nothing is rebuilt or downloaded
    let again = ensure_human_refseq(&store, &BuildOptions::default()).await?;
    assert_eq!(again, path);
    assert_eq!(std::fs::read_to_string(&path)?, custom);
    assert!(!store.contains(&Source::Gene2RefSeq.file_name()?));
    Ok(())
}

#[cfg(feature = "download")]
#[tokio::test]
async fn ensure_force_extract_rebuilds() -> Result<(), Report> {
    let dir = tempfile::tempdir()?;
    let store = Store::new(dir.path());
    seed_store(&store)?;

    let options = BuildOptions { cleanup: false, ..Default::default() };
    let path = ensure_human_refseq(&store, &options).await?;
    std::fs::write(&path, "stale\n")?;

    let options = BuildOptions { force_extract: true, cleanup: false, ..Default::default() };
    ensure_human_refseq(&store, &options).await?;
    assert!(std::fs::read_to_string(&path)?.starts_with("ncbigene_id\tname"));
    Ok(())
}
