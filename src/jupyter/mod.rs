//! Bootstrap scripts that draw an ideogram inside a Jupyter notebook cell.
//!
//! A notebook first prepares an empty container element with [`prepare`], then
//! displays the script returned by [`render`] (or [`to_javascript`]) as JavaScript
//! output. The script loads Ideogram.js through the notebook's RequireJS loader and
//! builds the widget once the module is available:
//!
//! ```javascript
//! require.config({ paths: { Ideogram: 'https://unpkg.com/ideogram@1.5.0/dist/js/ideogram.min' } });
//!
//! require(['Ideogram'], function (module) {
//!     var Ideogram = module.default;
//!     window.Ideogram = Ideogram;
//!     var ideogram = new Ideogram({ container: '#<id>', ..., annotations: <json> });
//! });
//! ```


#[cfg(feature = "download")]
use crate::{annotations, Store};
use askama::Template;
use serde::Serialize;
use thiserror::Error;

/// Container element id used when none is given.
pub const DEFAULT_ID: &str = "ideo-container";
/// Version of Ideogram.js the scripts load.
pub const IDEOGRAM_VERSION: &str = "1.5.0";
/// Module path given to the RequireJS loader.
pub const IDEOGRAM_MODULE_URL: &str = "https://unpkg.com/ideogram@1.5.0/dist/js/ideogram.min";

/// Errors raised while rendering a notebook script.
#[derive(Debug, Error)]
pub enum Error {
    /// The container id or the annotations are not acceptable.
    #[error("invalid input: {0}")]
    InvalidInput(String),
    /// The template failed to render.
    #[error(transparent)]
    Template(#[from] askama::Error),
}

/// The notebook bootstrap script.
///
/// `container` is escaped on insertion, `annotations` must already be JSON.
#[derive(Template)]
#[template(path = "ideogram_jupyter.js", escape = "html")]
pub struct BootstrapScript<'a> {
    pub container: &'a str,
    pub annotations: &'a str,
}

/// Checks that `container` can be used as an HTML element id, a CSS id selector,
/// and the body of a single-quoted JavaScript string.
///
/// Ids start with an ASCII letter or `_`, followed by ASCII letters, digits, `_` or `-`.
///
/// ```
/// use ideogen::jupyter::validate_container;
///
/// assert!(validate_container("chr-view").is_ok());
/// assert!(validate_container("").is_err());
/// assert!(validate_container("#chr-view").is_err());
/// assert!(validate_container("chr view").is_err());
/// assert!(validate_container("viz\\").is_err());
/// ```
pub fn validate_container(container: &str) -> Result<(), Error> {
    let mut chars = container.chars();
    let first = match chars.next() {
        None => return Err(Error::InvalidInput("container id is empty".to_string())),
        Some('#') => {
            return Err(Error::InvalidInput(format!(
                "container id {container:?} must not start with '#'"
            )))
        }
        Some(c) => c,
    };
    if !(first.is_ascii_alphabetic() || first == '_') {
        return Err(Error::InvalidInput(format!(
            "container id {container:?} must start with a letter or '_'"
        )));
    }
    if let Some(c) = chars.find(|c| !(c.is_ascii_alphanumeric() || *c == '_' || *c == '-')) {
        return Err(Error::InvalidInput(format!(
            "container id {container:?} contains invalid character {c:?}"
        )));
    }
    Ok(())
}

/// Returns the compact JSON of `annotations`, or [`Error::InvalidInput`] if it cannot be serialized.
pub(crate) fn annotations_json<T>(annotations: &T) -> Result<String, Error>
where
    T: Serialize + ?Sized,
{
    serde_json::to_string(annotations)
        .map_err(|e| Error::InvalidInput(format!("annotations are not JSON serializable: {e}")))
}

/// Returns the bootstrap script for an ideogram in element `container` showing `annotations`.
///
/// `annotations` is serialized to compact JSON and inserted verbatim as a JavaScript
/// literal. The output is a pure function of the inputs. Nothing is returned if
/// either input is rejected.
///
/// ## Examples
///
/// ```rust
/// use ideogen::jupyter::render;
///
/// let script = render("chr-view", &serde_json::json!([]))?;
/// assert!(script.contains("container: '#chr-view'"));
/// assert!(script.contains("annotations: []"));
///
/// let script = render("viz1", &serde_json::json!({"chr1": [{"start": 0, "end": 100}]}))?;
/// assert!(script.contains(r#"annotations: {"chr1":[{"start":0,"end":100}]}"#));
///
/// assert!(render("", &serde_json::json!([])).is_err());
/// # Ok::<(), ideogen::jupyter::Error>(())
/// ```
pub fn render<T>(container: &str, annotations: &T) -> Result<String, Error>
where
    T: Serialize + ?Sized,
{
    validate_container(container)?;
    let annotations = annotations_json(annotations)?;
    let script = BootstrapScript { container, annotations: &annotations };
    Ok(script.render()?)
}

/// Returns the snippet that appends an empty container element to the current output cell.
///
/// ```
/// use ideogen::jupyter::prepare;
///
/// assert_eq!(prepare(None)?, r#"element.append("<div id='ideo-container'></div>");"#);
/// assert_eq!(prepare(Some("viz1"))?, r#"element.append("<div id='viz1'></div>");"#);
/// # Ok::<(), ideogen::jupyter::Error>(())
/// ```
pub fn prepare(container: Option<&str>) -> Result<String, Error> {
    let container = container.unwrap_or(DEFAULT_ID);
    validate_container(container)?;
    Ok(format!(r#"element.append("<div id='{container}'></div>");"#))
}

/// Returns the bootstrap script for the genes named by `gene_symbols`.
///
/// The gene table in `store` is built first if it does not exist yet.
#[cfg(feature = "download")]
pub async fn to_javascript<I, S>(
    gene_symbols: I,
    container: Option<&str>,
    store: &Store,
) -> Result<String, color_eyre::eyre::Report>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let container = container.unwrap_or(DEFAULT_ID);
    validate_container(container)?;
    let annotations = annotations::get_ideogram_annotations(gene_symbols, store).await?;
    log::info!("Using {} annotations in ideogram.", annotations.len());
    Ok(render(container, &annotations)?)
}
