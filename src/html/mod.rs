//! Stand-alone HTML pages showing an ideogram outside a notebook.


use crate::jupyter::{annotations_json, validate_container, Error};
#[cfg(feature = "download")]
use crate::{annotations, jupyter::DEFAULT_ID, Store};
use askama::Template;
use color_eyre::eyre::{Report, Result, WrapErr};
use log::info;
use serde::Serialize;
use std::fmt::Debug;
#[cfg(feature = "download")]
use std::io::Write;
use std::path::Path;

/// Page title used when none is given.
pub const DEFAULT_TITLE: &str = "Ideogram";

/// The stand-alone page. `annotations` must already be JSON.
#[derive(Template)]
#[template(path = "ideogram.html")]
pub struct IdeogramPage<'a> {
    pub container: &'a str,
    pub title: &'a str,
    pub annotations: &'a str,
}

/// Returns a complete HTML page drawing `annotations` into element `container`.
///
/// The title is HTML-escaped. The annotations are embedded as raw JSON.
///
/// ## Examples
///
/// ```rust
/// use ideogen::html::render_html;
///
/// let page = render_html("viz1", "Genes <1>", &serde_json::json!([]))?;
/// assert!(page.starts_with("<!DOCTYPE html>"));
/// assert!(page.contains("<title>Genes &lt;1&gt;</title>"));
/// assert!(page.contains(r#"<div id="viz1"></div>"#));
/// # Ok::<(), ideogen::jupyter::Error>(())
/// ```
pub fn render_html<T>(container: &str, title: &str, annotations: &T) -> Result<String, Error>
where
    T: Serialize + ?Sized,
{
    validate_container(container)?;
    let annotations = annotations_json(annotations)?;
    let page = IdeogramPage { container, title, annotations: &annotations };
    Ok(page.render()?)
}

/// Returns the HTML page for `gene_symbols`, building the gene table in `store` if needed.
#[cfg(feature = "download")]
pub async fn to_html_str<I, S>(
    gene_symbols: I,
    container: Option<&str>,
    title: Option<&str>,
    store: &Store,
) -> Result<String, Report>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let container = container.unwrap_or(DEFAULT_ID);
    validate_container(container)?;
    let annotations = annotations::get_ideogram_annotations(gene_symbols, store).await?;
    info!("Using {} annotations in ideogram.", annotations.len());
    Ok(render_html(container, title.unwrap_or(DEFAULT_TITLE), &annotations)?)
}

/// Writes the HTML page for `gene_symbols` to `writer`.
#[cfg(feature = "download")]
pub async fn to_html_file<I, S, W>(
    gene_symbols: I,
    container: Option<&str>,
    title: Option<&str>,
    store: &Store,
    mut writer: W,
) -> Result<(), Report>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
    W: Write,
{
    let page = to_html_str(gene_symbols, container, title, store).await?;
    writer.write_all(page.as_bytes()).wrap_err("Failed to write HTML page.")?;
    writer.flush()?;
    Ok(())
}

/// Writes the HTML page for `gene_symbols` to the file at `path`.
#[cfg(feature = "download")]
pub async fn to_html_path<I, S, P>(
    gene_symbols: I,
    container: Option<&str>,
    title: Option<&str>,
    store: &Store,
    path: &P,
) -> Result<(), Report>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
    P: AsRef<Path> + Debug + ?Sized,
{
    let page = to_html_str(gene_symbols, container, title, store).await?;
    write_page(&page, path)
}

/// Writes a rendered page to `path`, creating parent directories as needed.
pub fn write_page<P>(page: &str, path: &P) -> Result<(), Report>
where
    P: AsRef<Path> + Debug + ?Sized,
{
    if let Some(parent) = path.as_ref().parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)
            .wrap_err_with(|| format!("Failed to create directory: {parent:?}"))?;
    }
    info!("Writing HTML page: {path:?}");
    std::fs::write(path, page).wrap_err_with(|| format!("Failed to write: {path:?}"))
}
