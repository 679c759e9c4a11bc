//! File and network helpers shared by the [store](crate::store) and [refseq](crate::refseq) modules.


use color_eyre::eyre::{eyre, ContextCompat, Report, Result, WrapErr};
#[cfg(feature = "download")]
use color_eyre::Help;
use flate2::read::MultiGzDecoder;
#[cfg(feature = "download")]
use indicatif::{ProgressBar, ProgressStyle};
use std::fmt::Debug;
use std::fs::File;
use std::io::{BufReader, BufWriter, Read, Write};
use std::path::{Path, PathBuf};

/// Returns the final path segment of a URL, which is used as the local file name.
///
/// ## Examples
///
/// ```rust
/// use ideogen::utils::url_file_name;
///
/// let url = "https://ftp.ncbi.nlm.nih.gov/gene/DATA/gene2refseq.gz";
/// assert_eq!(url_file_name(url)?, "gene2refseq.gz");
/// assert!(url_file_name("https://ftp.ncbi.nlm.nih.gov/gene/DATA/").is_err());
/// # Ok::<(), color_eyre::eyre::Report>(())
/// ```
pub fn url_file_name(url: &str) -> Result<String, Report> {
    let name = url
        .split(['?', '#'])
        .next()
        .and_then(|path| path.rsplit('/').next())
        .filter(|name| !name.is_empty())
        .wrap_err_with(|| format!("Failed to get a file name from url: {url:?}"))?;
    Ok(name.to_string())
}

/// Returns a buffered reader that decompresses a gzip `reader`.
///
/// Concatenated gzip members are read as a single stream.
pub fn gz_reader<R: Read>(reader: R) -> BufReader<MultiGzDecoder<R>> {
    BufReader::new(MultiGzDecoder::new(reader))
}

/// Opens a gzip compressed file for buffered reading.
pub fn open_gz<P>(path: &P) -> Result<BufReader<MultiGzDecoder<File>>, Report>
where
    P: AsRef<Path> + Debug,
{
    let file = File::open(path).wrap_err_with(|| format!("Failed to open: {path:?}"))?;
    Ok(gz_reader(file))
}

/// Returns the path an in-progress write goes to before it is renamed to `path`.
pub fn partial_path(path: &Path) -> PathBuf {
    let mut partial = path.as_os_str().to_os_string();
    partial.push(".part");
    PathBuf::from(partial)
}

/// Writes `contents` to `path`, replacing it only once the write succeeded.
pub fn write_atomic<P>(path: &P, contents: &[u8]) -> Result<(), Report>
where
    P: AsRef<Path> + Debug,
{
    let path = path.as_ref();
    let partial = partial_path(path);
    let mut file = BufWriter::new(
        File::create(&partial).wrap_err_with(|| format!("Failed to create file: {partial:?}"))?,
    );
    file.write_all(contents).wrap_err_with(|| format!("Failed to write file: {partial:?}"))?;
    file.flush().wrap_err_with(|| format!("Failed to write file: {partial:?}"))?;
    drop(file);
    std::fs::rename(&partial, path)
        .wrap_err_with(|| eyre!("Failed to move {partial:?} to {path:?}"))?;
    Ok(())
}

/// Returns a progress bar for `len` units, or a spinner if the length is unknown.
#[cfg(feature = "download")]
pub fn progress_bar(len: Option<u64>, message: &str) -> Result<ProgressBar, Report> {
    let progress = match len {
        Some(len) => {
            let style = ProgressStyle::with_template(
                "{msg} [{elapsed_precise}] [{bar:40.cyan/blue}] {bytes}/{total_bytes} ({eta})",
            )?
            .progress_chars("#>-");
            ProgressBar::new(len).with_style(style)
        }
        None => {
            let style = ProgressStyle::with_template("{spinner:.green} {msg} [{elapsed_precise}] {pos}")?;
            ProgressBar::new_spinner().with_style(style)
        }
    };
    Ok(progress.with_message(message.to_string()))
}

/// Download file from url to path.
///
/// The response body is streamed to `<output>.part` and renamed when complete,
/// so an interrupted download never leaves a truncated file at `output`.
///
/// ## Examples
///
/// ```no_run
/// # use tokio_test::{block_on, assert_ok};
/// use ideogen::utils::download_file;
///
/// let url = "https://ftp.ncbi.nlm.nih.gov/refseq/H_sapiens/Homo_sapiens.gene_info.gz";
/// # assert_ok!(block_on(async {
/// let output = "test/utils/download_file/Homo_sapiens.gene_info.gz";
/// download_file(&url, &output).await?;
/// # Ok::<(), color_eyre::eyre::Report>(())
/// # }));
/// ```
#[cfg(feature = "download")]
pub async fn download_file<P>(url: &str, output: &P) -> Result<PathBuf, Report>
where
    P: AsRef<Path> + Debug,
{
    // convert from generics to Path and PathBuf
    let output: PathBuf = output.as_ref().into();

    // check if we need to create an output directory
    if let Some(output_dir) = output.parent() {
        if !output_dir.exists() {
            std::fs::create_dir_all(output_dir)
                .wrap_err_with(|| format!("Failed to create directory: {output_dir:?}"))?;
        }
    }

    // get URL response
    let mut response =
        reqwest::get(url).await.wrap_err_with(|| format!("Failed to request: {url:?}"))?;
    if !response.status().is_success() {
        Err(eyre!("Failed to download: {url:?}")
            .suggestion(format!("Status code: {}", response.status())))?;
    }

    let partial = partial_path(&output);
    let mut file = BufWriter::new(
        File::create(&partial).wrap_err_with(|| format!("Unable to create: {partial:?}"))?,
    );

    let file_name = url_file_name(url)?;
    let progress = progress_bar(response.content_length(), &format!("Downloading {file_name}"))?;
    while let Some(chunk) =
        response.chunk().await.wrap_err_with(|| format!("Failed to download: {url:?}"))?
    {
        file.write_all(&chunk).wrap_err_with(|| format!("Unable to write: {partial:?}"))?;
        progress.inc(chunk.len() as u64);
    }
    file.flush().wrap_err_with(|| format!("Unable to write: {partial:?}"))?;
    drop(file);
    progress.finish_and_clear();

    std::fs::rename(&partial, &output)
        .wrap_err_with(|| format!("Unable to move {partial:?} to {output:?}"))?;

    Ok(output)
}
